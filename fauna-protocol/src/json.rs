/*!
Minimal JSON representation used on the wire.

[`Json`] is independent of the [`Value`](crate::value::Value) model: the
value codec lowers into it and parses out of it, while this module only
deals with text.

Composite documents (arrays and objects) are written with the structural
writer of `serde_json`. Top-level scalars are written by a separate literal
serializer, because a bare string or number is not a document on its own.
*/
use std::collections::BTreeMap;
use std::fmt;

use bytes::Bytes;
use snafu::ResultExt;

use crate::errors::{self, ParseError};

#[derive(Clone, Debug, PartialEq)]
pub enum Json {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    Str(String),
    Array(Vec<Json>),
    Object(BTreeMap<String, Json>),
}

impl Json {
    /// Parses a complete JSON document.
    ///
    /// Numbers written with a fraction or an exponent become
    /// [`Json::Double`], integers that fit `i64` become [`Json::Int`].
    pub fn parse(data: &[u8]) -> Result<Json, ParseError> {
        let raw: serde_json::Value =
            serde_json::from_slice(data).context(errors::MalformedJson)?;
        Ok(Json::from(raw))
    }

    pub fn object<K, I>(pairs: I) -> Json
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Json)>,
    {
        Json::Object(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// A single-key object, the shape of every wire tag and function call.
    pub fn tagged(tag: &str, value: Json) -> Json {
        let mut map = BTreeMap::new();
        map.insert(tag.to_string(), value);
        Json::Object(map)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Json::Null => "null",
            Json::Bool(..) => "boolean",
            Json::Int(..) => "integer",
            Json::Double(..) => "double",
            Json::Str(..) => "string",
            Json::Array(..) => "array",
            Json::Object(..) => "object",
        }
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, Json::Array(..) | Json::Object(..))
    }

    /// Renders the value as UTF-8 JSON text.
    pub fn to_bytes(&self) -> Bytes {
        Bytes::from(self.to_string())
    }
}

impl fmt::Display for Json {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_scalar() {
            write_literal(self, f)
        } else {
            fmt::Display::fmt(&serde_json::Value::from(self), f)
        }
    }
}

fn write_literal(json: &Json, f: &mut fmt::Formatter) -> fmt::Result {
    match json {
        Json::Null => f.write_str("null"),
        Json::Bool(true) => f.write_str("true"),
        Json::Bool(false) => f.write_str("false"),
        Json::Int(v) => write!(f, "{}", v),
        // Debug formatting always keeps a fraction or an exponent, so the
        // number is read back as a double
        Json::Double(v) if v.is_finite() => write!(f, "{:?}", v),
        Json::Double(_) => f.write_str("null"),
        Json::Str(s) => write_quoted(s, f),
        Json::Array(..) | Json::Object(..) => {
            fmt::Display::fmt(&serde_json::Value::from(json), f)
        }
    }
}

fn write_quoted(s: &str, f: &mut fmt::Formatter) -> fmt::Result {
    use std::fmt::Write;

    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\u{08}' => f.write_str("\\b")?,
            '\u{0C}' => f.write_str("\\f")?,
            c if (c as u32) < 0x20 => write!(f, "\\u{:04x}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

impl From<serde_json::Value> for Json {
    fn from(value: serde_json::Value) -> Json {
        use serde_json::Value as V;

        match value {
            V::Null => Json::Null,
            V::Bool(b) => Json::Bool(b),
            V::Number(n) => match n.as_i64() {
                Some(i) => Json::Int(i),
                None => Json::Double(n.as_f64().unwrap_or(f64::NAN)),
            },
            V::String(s) => Json::Str(s),
            V::Array(items) => {
                Json::Array(items.into_iter().map(Json::from).collect())
            }
            V::Object(map) => Json::Object(
                map.into_iter().map(|(k, v)| (k, Json::from(v))).collect(),
            ),
        }
    }
}

impl From<&Json> for serde_json::Value {
    fn from(json: &Json) -> serde_json::Value {
        use serde_json::Value as V;

        match json {
            Json::Null => V::Null,
            Json::Bool(b) => V::Bool(*b),
            Json::Int(i) => V::Number((*i).into()),
            Json::Double(d) => serde_json::Number::from_f64(*d)
                .map(V::Number)
                .unwrap_or(V::Null),
            Json::Str(s) => V::String(s.clone()),
            Json::Array(items) => V::Array(items.iter().map(V::from).collect()),
            Json::Object(map) => V::Object(
                map.iter().map(|(k, v)| (k.clone(), V::from(v))).collect(),
            ),
        }
    }
}
