/*!
Conversion between raw bytes, the [`Json`] wire representation and
[`Value`].

The mapping is asymmetric. Responses mark special values with a reserved
single-key object (`{"@ref": "..."}`, `{"@ts": "..."}`, ...) and these are
decoded by [`parse`]. Requests are produced by lowering an
[`Expr`](crate::expr::Expr) with [`serialize`], where a literal object is
always wrapped as `{"object": {...}}` so the server does not read it as a
function call.
*/
use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;
use snafu::{OptionExt, ResultExt};

use crate::errors::{self, ParseError};
use crate::expr::Expr;
use crate::json::Json;
use crate::model::{Date, HighPrecisionTime, Ref, SetRef};
use crate::value::Value;

pub const REF_TAG: &str = "@ref";
pub const SET_TAG: &str = "@set";
pub const TS_TAG: &str = "@ts";
pub const DATE_TAG: &str = "@date";
pub const BYTES_TAG: &str = "@bytes";
pub const OBJ_TAG: &str = "@obj";

const RESERVED_TAGS: [&str; 6] =
    [REF_TAG, SET_TAG, TS_TAG, DATE_TAG, BYTES_TAG, OBJ_TAG];

/// Parses a JSON document into a [`Value`].
pub fn parse(data: &[u8]) -> Result<Value, ParseError> {
    Value::from_json(Json::parse(data)?)
}

/// Parses the body of a successful response and returns its `resource`.
pub fn parse_resource(data: &[u8]) -> Result<Value, ParseError> {
    let resource = match Json::parse(data)? {
        Json::Object(mut fields) => fields.remove("resource"),
        _ => None,
    };
    Value::from_json(resource.context(errors::MissingResource)?)
}

/// Lowers an expression and renders it as request body.
///
/// Top-level scalars are written as bare literals (`"text"`, `12`,
/// `true`, `null`).
pub fn serialize<E: Expr + ?Sized>(expr: &E) -> Bytes {
    expr.to_wire().to_bytes()
}

pub(crate) fn is_reserved(key: &str) -> bool {
    RESERVED_TAGS.contains(&key)
}

impl Value {
    pub fn from_json(json: Json) -> Result<Value, ParseError> {
        let value = match json {
            Json::Null => Value::Null,
            Json::Bool(v) => Value::Bool(v),
            Json::Int(v) => Value::Int(v),
            Json::Double(v) => Value::Double(v),
            Json::Str(v) => Value::Str(v),
            Json::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(Value::from_json)
                    .collect::<Result<_, _>>()?,
            ),
            Json::Object(mut fields) => {
                if fields.len() == 1 {
                    if let Some((key, payload)) = fields.pop_first() {
                        return decode_tagged(key, payload);
                    }
                }
                Value::Object(decode_fields(fields)?)
            }
        };
        Ok(value)
    }

    /// Renders the value in the form the server uses in responses.
    ///
    /// This is the exact inverse of [`Value::from_json`]: a plain object
    /// whose only key looks like a tag is wrapped into `@obj`.
    pub fn to_json(&self) -> Json {
        match self {
            Value::Null => Json::Null,
            Value::Str(v) => Json::Str(v.clone()),
            Value::Int(v) => Json::Int(*v),
            Value::Double(v) => Json::Double(*v),
            Value::Bool(v) => Json::Bool(*v),
            Value::Time(v) => time_json(v),
            Value::Date(v) => date_json(v),
            Value::Ref(v) => ref_json(v),
            Value::Bytes(v) => bytes_json(v),
            Value::SetRef(set) => Json::tagged(
                SET_TAG,
                Json::Object(
                    set.parameters()
                        .iter()
                        .map(|(k, v)| (k.clone(), v.to_json()))
                        .collect(),
                ),
            ),
            Value::Array(items) => {
                Json::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(fields) => {
                let object = Json::Object(
                    fields
                        .iter()
                        .map(|(k, v)| (k.clone(), v.to_json()))
                        .collect(),
                );
                if fields.len() == 1 && fields.keys().all(|k| is_reserved(k)) {
                    Json::tagged(OBJ_TAG, object)
                } else {
                    object
                }
            }
        }
    }
}

fn decode_fields(
    fields: BTreeMap<String, Json>,
) -> Result<BTreeMap<String, Value>, ParseError> {
    fields
        .into_iter()
        .map(|(k, v)| Ok((k, Value::from_json(v)?)))
        .collect()
}

fn decode_tagged(key: String, payload: Json) -> Result<Value, ParseError> {
    let value = match (key.as_str(), payload) {
        (REF_TAG, Json::Str(id)) => Value::Ref(Ref::new(id)),
        (TS_TAG, Json::Str(text)) => match text.parse::<HighPrecisionTime>() {
            Ok(ts) => Value::Time(ts),
            Err(_) => return errors::InvalidTimestamp { value: text }.fail(),
        },
        (DATE_TAG, Json::Str(text)) => match text.parse::<Date>() {
            Ok(date) => Value::Date(date),
            Err(_) => return errors::InvalidDate { value: text }.fail(),
        },
        (BYTES_TAG, Json::Str(text)) => {
            let data = BASE64.decode(text).context(errors::InvalidBytes)?;
            Value::Bytes(Bytes::from(data))
        }
        (SET_TAG, Json::Object(fields)) => {
            Value::SetRef(SetRef::new(decode_fields(fields)?))
        }
        (OBJ_TAG, Json::Object(fields)) => Value::Object(decode_fields(fields)?),
        // not a tag, or a tag with unexpected payload: keep it verbatim
        (_, payload) => {
            let mut fields = BTreeMap::new();
            fields.insert(key.clone(), Value::from_json(payload)?);
            Value::Object(fields)
        }
    };
    Ok(value)
}

pub(crate) fn time_json(value: &HighPrecisionTime) -> Json {
    Json::tagged(TS_TAG, Json::Str(value.to_string()))
}

pub(crate) fn date_json(value: &Date) -> Json {
    Json::tagged(DATE_TAG, Json::Str(value.to_string()))
}

pub(crate) fn ref_json(value: &Ref) -> Json {
    Json::tagged(REF_TAG, Json::Str(value.as_str().to_string()))
}

pub(crate) fn bytes_json(value: &[u8]) -> Json {
    Json::tagged(BYTES_TAG, Json::Str(BASE64.encode(value)))
}
