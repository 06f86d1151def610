use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::time::SystemTime;

use bytes::Bytes;
use chrono::{DateTime, NaiveDate, Utc};

use crate::field::{DecodeMismatch, FieldError, OutOfRange, Path, Segment};
use crate::field::UnexpectedType;
use crate::model::{Date, HighPrecisionTime, Ref, SetRef};
use crate::value::Value;

/// Type that can be decoded from a non-null [`Value`].
///
/// Errors are reported relative to the decoded value, i.e. with an empty
/// path; [`Field`](crate::field::Field) prepends the location it was
/// applied at.
///
/// ```rust
/// # use fauna_protocol::decode::Decode;
/// # use fauna_protocol::field::FieldError;
/// # use fauna_protocol::value::Value;
/// struct Level(u8);
///
/// impl Decode for Level {
///     fn decode(value: &Value) -> Result<Self, FieldError> {
///         match i64::decode(value)? {
///             n @ 1..=99 => Ok(Level(n as u8)),
///             n => Err(FieldError::invalid(format!("bad level {}", n))),
///         }
///     }
/// }
/// ```
pub trait Decode: Sized {
    fn decode(value: &Value) -> Result<Self, FieldError>;
}

fn mismatch<T>(expected: &'static str, value: &Value)
    -> Result<T, FieldError>
{
    DecodeMismatch {
        path: Path::root(),
        expected,
        actual: value.kind(),
    }.fail()
}

fn out_of_range<T>(expected: &'static str) -> Result<T, FieldError> {
    OutOfRange { path: Path::root(), expected }.fail()
}

impl Decode for Value {
    fn decode(value: &Value) -> Result<Self, FieldError> {
        Ok(value.clone())
    }
}

impl Decode for String {
    fn decode(value: &Value) -> Result<Self, FieldError> {
        match value {
            Value::Str(s) => Ok(s.clone()),
            _ => mismatch("string", value),
        }
    }
}

impl Decode for bool {
    fn decode(value: &Value) -> Result<Self, FieldError> {
        match value {
            Value::Bool(b) => Ok(*b),
            _ => mismatch("boolean", value),
        }
    }
}

impl Decode for i64 {
    fn decode(value: &Value) -> Result<Self, FieldError> {
        match value {
            Value::Int(v) => Ok(*v),
            _ => mismatch("integer", value),
        }
    }
}

macro_rules! decode_narrow_int {
    ($($ty:ty),*) => {$(
        impl Decode for $ty {
            fn decode(value: &Value) -> Result<Self, FieldError> {
                let wide = i64::decode(value)?;
                <$ty>::try_from(wide)
                    .or_else(|_| out_of_range(stringify!($ty)))
            }
        }
    )*}
}

decode_narrow_int!(i8, i16, i32, u8, u16, u32, u64, usize);

impl Decode for f64 {
    fn decode(value: &Value) -> Result<Self, FieldError> {
        match value {
            Value::Double(v) => Ok(*v),
            Value::Int(v) => Ok(*v as f64),
            _ => mismatch("double", value),
        }
    }
}

impl Decode for f32 {
    fn decode(value: &Value) -> Result<Self, FieldError> {
        f64::decode(value).map(|v| v as f32)
    }
}

impl Decode for HighPrecisionTime {
    fn decode(value: &Value) -> Result<Self, FieldError> {
        match value {
            Value::Time(ts) => Ok(*ts),
            _ => mismatch("time", value),
        }
    }
}

impl Decode for DateTime<Utc> {
    fn decode(value: &Value) -> Result<Self, FieldError> {
        HighPrecisionTime::decode(value).map(HighPrecisionTime::to_datetime)
    }
}

impl Decode for SystemTime {
    fn decode(value: &Value) -> Result<Self, FieldError> {
        SystemTime::try_from(HighPrecisionTime::decode(value)?)
            .or_else(|_| out_of_range("SystemTime"))
    }
}

impl Decode for Date {
    fn decode(value: &Value) -> Result<Self, FieldError> {
        match value {
            Value::Date(date) => Ok(*date),
            _ => mismatch("date", value),
        }
    }
}

impl Decode for NaiveDate {
    fn decode(value: &Value) -> Result<Self, FieldError> {
        Date::decode(value).map(Date::to_naive_date)
    }
}

impl Decode for Ref {
    fn decode(value: &Value) -> Result<Self, FieldError> {
        match value {
            Value::Ref(r) => Ok(r.clone()),
            _ => mismatch("ref", value),
        }
    }
}

impl Decode for SetRef {
    fn decode(value: &Value) -> Result<Self, FieldError> {
        match value {
            Value::SetRef(set) => Ok(set.clone()),
            _ => mismatch("set", value),
        }
    }
}

impl Decode for Bytes {
    fn decode(value: &Value) -> Result<Self, FieldError> {
        match value {
            Value::Bytes(data) => Ok(data.clone()),
            _ => mismatch("bytes", value),
        }
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode(value: &Value) -> Result<Self, FieldError> {
        match value {
            Value::Null => Ok(None),
            _ => T::decode(value).map(Some),
        }
    }
}

/// Every element must decode, a `null` element fails like any other
/// mismatch. Decode into `Vec<Option<T>>` to keep nulls in place, or use
/// [`Value::get_array`] which skips them.
impl<T: Decode> Decode for Vec<T> {
    fn decode(value: &Value) -> Result<Self, FieldError> {
        let Value::Array(items) = value else {
            return UnexpectedType {
                path: Path::root(),
                expected: "array",
                actual: value.kind(),
            }.fail();
        };
        items.iter()
            .enumerate()
            .map(|(idx, item)| {
                T::decode(item).map_err(|e| e.in_element(Segment::Index(idx)))
            })
            .collect()
    }
}

fn decode_entries<'a, T: Decode + 'a>(value: &'a Value)
    -> Result<impl Iterator<Item = Result<(String, T), FieldError>> + 'a,
              FieldError>
{
    let Value::Object(fields) = value else {
        return UnexpectedType {
            path: Path::root(),
            expected: "object",
            actual: value.kind(),
        }.fail();
    };
    Ok(fields.iter().map(|(key, item)| {
        T::decode(item)
            .map(|v| (key.clone(), v))
            .map_err(|e| e.in_element(Segment::Key(key.clone())))
    }))
}

impl<T: Decode> Decode for BTreeMap<String, T> {
    fn decode(value: &Value) -> Result<Self, FieldError> {
        decode_entries(value)?.collect()
    }
}

impl<T: Decode, S: BuildHasher + Default> Decode for HashMap<String, T, S> {
    fn decode(value: &Value) -> Result<Self, FieldError> {
        decode_entries(value)?.collect()
    }
}

#[cfg(test)]
mod test {
    use super::Decode;
    use crate::field::FieldError;
    use crate::value::Value;

    #[test]
    fn narrow_ints() {
        assert_eq!(u8::decode(&Value::Int(255)).unwrap(), 255);
        assert!(matches!(u8::decode(&Value::Int(256)),
                         Err(FieldError::OutOfRange { .. })));
        assert!(matches!(u32::decode(&Value::Int(-1)),
                         Err(FieldError::OutOfRange { .. })));
    }

    #[test]
    fn double_accepts_integer() {
        assert_eq!(f64::decode(&Value::Int(3)).unwrap(), 3.0);
        assert!(i64::decode(&Value::Double(3.0)).is_err());
    }

    #[test]
    fn vec_null_element() {
        let value = Value::array([Value::Int(1), Value::Null]);
        let err = Vec::<i64>::decode(&value).unwrap_err();
        assert_eq!(err.path().to_string(), "1");
        match &err {
            FieldError::CollectionElement { source, .. } => {
                assert!(matches!(**source, FieldError::DecodeMismatch { .. }));
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(Vec::<Option<i64>>::decode(&value).unwrap(),
                   vec![Some(1), None]);
    }

    #[test]
    fn vec_element_path() {
        let value = Value::array([Value::Int(1), Value::from("x")]);
        let err = Vec::<i64>::decode(&value).unwrap_err();
        assert_eq!(err.path().to_string(), "1");
    }
}
