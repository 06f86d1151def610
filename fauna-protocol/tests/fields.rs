use std::collections::BTreeMap;
use std::error::Error;

use pretty_assertions::assert_eq;
use test_case::test_case;

use fauna_protocol::codec::parse;
use fauna_protocol::decode::Decode;
use fauna_protocol::field::{Field, FieldError, Path, Segment};
use fauna_protocol::model::Ref;
use fauna_protocol::path;
use fauna_protocol::value::Value;

fn spell() -> Value {
    parse(br#"{
        "ref": {"@ref": "classes/spells/181388642046968320"},
        "class": {"@ref": "classes/spells"},
        "ts": 1509244539203043,
        "data": {
            "name": "Fire Beak",
            "element": ["air", "fire"],
            "cost": 15,
            "levels": {"novice": 1, "master": 10},
            "nothing": null
        }
    }"#).unwrap()
}

#[test]
fn nested_field() -> Result<(), Box<dyn Error>> {
    let value = spell();
    assert_eq!(value.get::<String>(path!("data", "name"))?,
               Some("Fire Beak".into()));
    assert_eq!(value.get::<Ref>("ref")?,
               Some(Ref::new("classes/spells/181388642046968320")));
    assert_eq!(value.get::<String>(path!("data", "element", 1usize))?,
               Some("fire".into()));
    assert_eq!(value.get::<f64>(path!("data", "cost"))?, Some(15.0));
    Ok(())
}

#[test_case(path!("data", "missing"); "missing key")]
#[test_case(path!("missing", "deeper", 0usize); "missing parent")]
#[test_case(path!("data", "element", 5usize); "index out of range")]
#[test_case(path!("data", "nothing"); "null")]
fn absent(path: Path) {
    assert_eq!(spell().get::<String>(path).unwrap(), None);
}

#[test]
fn error_names_full_path() {
    let value = Value::object([("a", "string")]);
    let field = Field::<i64>::new(path!("a", "b", 1usize));
    let err = field.get(&value).unwrap_err();
    assert!(matches!(err, FieldError::UnexpectedType {
        expected: "object", actual: "string", ..
    }));
    assert_eq!(err.path(), &path!("a", "b"));
    assert!(err.to_string().contains("a / b"), "{}", err);
}

#[test]
fn index_into_object() {
    let err = spell().get::<String>(path!("data", 0usize)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "expected array at `data / 0` but found object",
    );
}

#[test]
fn decode_mismatch() {
    let err = spell().get::<i64>(path!("data", "name")).unwrap_err();
    assert!(matches!(err, FieldError::DecodeMismatch {
        expected: "integer", actual: "string", ..
    }));
    assert_eq!(err.path().to_string(), "data / name");
}

#[test]
fn collect_array() -> Result<(), Box<dyn Error>> {
    let elements = Field::<Value>::new(path!("data", "element"))
        .collect(Field::<String>::root());
    assert_eq!(spell().get_field(&elements)?,
               Some(vec!["air".to_string(), "fire".to_string()]));
    assert_eq!(spell().get_array::<String>(path!("data", "element"))?,
               Some(vec!["air".to_string(), "fire".to_string()]));
    Ok(())
}

#[test]
fn collect_skips_absent() -> Result<(), Box<dyn Error>> {
    let value = parse(br#"{"items": [{"n": 1}, {}, {"n": null}, {"n": 4}]}"#)?;
    let numbers = Field::<Value>::new("items").collect(Field::<i64>::new("n"));
    assert_eq!(numbers.get(&value)?, Some(vec![1, 4]));
    Ok(())
}

#[test]
fn null_elements() -> Result<(), Box<dyn Error>> {
    let value = parse(br#"{"costs": [15, null, 20]}"#)?;
    assert_eq!(value.get_array::<i64>("costs")?, Some(vec![15, 20]));
    assert_eq!(value.get::<Vec<Option<i64>>>("costs")?,
               Some(vec![Some(15), None, Some(20)]));
    let err = value.get::<Vec<i64>>("costs").unwrap_err();
    assert_eq!(err.path(), &path!("costs", 1usize));
    Ok(())
}

#[test]
fn collect_failing_element() {
    let value = parse(br#"{"items": [1, 2, "three"]}"#).unwrap();
    let err = value.get_array::<i64>("items").unwrap_err();
    match &err {
        FieldError::CollectionElement { element, source, .. } => {
            assert_eq!(element, &Segment::Index(2));
            assert!(matches!(**source, FieldError::DecodeMismatch { .. }));
        }
        _ => panic!("unexpected error {:?}", err),
    }
    assert_eq!(err.path(), &path!("items", 2usize));
    assert_eq!(
        err.to_string(),
        "cannot collect element 2 of `items`: \
         cannot decode string at `items / 2` as integer",
    );
}

#[test]
fn collect_requires_array() {
    let err = spell().get_array::<String>(path!("data", "name")).unwrap_err();
    assert!(matches!(err, FieldError::UnexpectedType {
        expected: "array", actual: "string", ..
    }));
}

#[test]
fn collect_map() -> Result<(), Box<dyn Error>> {
    let levels = spell().get_object::<i64>(path!("data", "levels"))?;
    let expected: BTreeMap<_, _> = [("master".to_string(), 10), ("novice".to_string(), 1)]
        .into_iter()
        .collect();
    assert_eq!(levels, Some(expected));

    let err = spell().get_object::<String>(path!("data", "levels")).unwrap_err();
    assert_eq!(err.path(), &path!("data", "levels", "master"));
    Ok(())
}

#[test]
fn map_and_flat_map() -> Result<(), Box<dyn Error>> {
    let cost = Field::<i64>::new(path!("data", "cost")).map(|c| c * 2);
    assert_eq!(cost.get(&spell())?, Some(30));

    let cheap = Field::<i64>::new(path!("data", "cost"))
        .flat_map(|c| (c < 10).then_some(c));
    assert_eq!(cheap.get(&spell())?, None);

    let missing = Field::<i64>::new("nope").map(|_| -> i64 {
        panic!("transform must not run for absent values")
    });
    assert_eq!(missing.get(&spell())?, None);
    Ok(())
}

#[test]
fn at_appends_path() -> Result<(), Box<dyn Error>> {
    let data = Field::<String>::new("data");
    let name = data.at("name");
    assert_eq!(name.path(), &path!("data", "name"));
    assert_eq!(name.get(&spell())?, Some("Fire Beak".into()));
    Ok(())
}

#[derive(Debug, PartialEq)]
struct Cost(u8);

impl Decode for Cost {
    fn decode(value: &Value) -> Result<Self, FieldError> {
        let cost = u8::decode(value)?;
        if cost == 0 {
            return Err(FieldError::invalid("cost must be positive"));
        }
        Ok(Cost(cost))
    }
}

#[test]
fn user_decode() -> Result<(), Box<dyn Error>> {
    assert_eq!(spell().get::<Cost>(path!("data", "cost"))?, Some(Cost(15)));

    let value = Value::object([("cost", 0)]);
    let err = value.get::<Cost>("cost").unwrap_err();
    assert_eq!(err.to_string(),
               "invalid value at `cost`: cost must be positive");

    let value = Value::object([("cost", 300)]);
    let err = value.get::<Cost>("cost").unwrap_err();
    assert!(matches!(err, FieldError::OutOfRange { expected: "u8", .. }));
    Ok(())
}

#[test]
fn decode_with_closure() -> Result<(), Box<dyn Error>> {
    let upper = Field::decode_with(path!("data", "name"), |v| {
        Ok(Option::<String>::decode(v)?.map(|s| s.to_uppercase()))
    });
    assert_eq!(upper.get(&spell())?, Some("FIRE BEAK".to_string()));
    Ok(())
}

#[test]
fn field_error_kind() {
    let err: fauna_errors::Error = spell()
        .get::<bool>(path!("data", "cost"))
        .unwrap_err()
        .into();
    assert!(err.is::<fauna_errors::ValueDecodeError>());
}
