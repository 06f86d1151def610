use std::collections::BTreeMap;

use bytes::Bytes;

use crate::model::{Date, HighPrecisionTime, Ref, SetRef};

/// Any value exchanged with the server.
///
/// Values are built bottom-up, either from a parsed response or from
/// literals, so the tree never shares or cycles.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Str(String),
    Int(i64),
    Double(f64),
    Bool(bool),
    Time(HighPrecisionTime),
    Date(Date),
    Ref(Ref),
    SetRef(SetRef),
    Bytes(Bytes),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        use Value::*;
        match self {
            Null => "null",
            Str(..) => "string",
            Int(..) => "integer",
            Double(..) => "double",
            Bool(..) => "boolean",
            Time(..) => "time",
            Date(..) => "date",
            Ref(..) => "ref",
            SetRef(..) => "set",
            Bytes(..) => "bytes",
            Array(..) => "array",
            Object(..) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Create an object from key-value pairs
    pub fn object<N: ToString, V: Into<Value>>(
        iter: impl IntoIterator<Item = (N, V)>,
    ) -> Value {
        Value::Object(
            iter.into_iter()
                .map(|(key, val)| (key.to_string(), val.into()))
                .collect(),
        )
    }

    pub fn array<V: Into<Value>>(iter: impl IntoIterator<Item = V>) -> Value {
        Value::Array(iter.into_iter().map(Into::into).collect())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::Str(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Value {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Value {
        Value::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Value {
        Value::Double(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Value {
        Value::Bool(v)
    }
}

impl From<HighPrecisionTime> for Value {
    fn from(v: HighPrecisionTime) -> Value {
        Value::Time(v)
    }
}

impl From<Date> for Value {
    fn from(v: Date) -> Value {
        Value::Date(v)
    }
}

impl From<Ref> for Value {
    fn from(v: Ref) -> Value {
        Value::Ref(v)
    }
}

impl From<SetRef> for Value {
    fn from(v: SetRef) -> Value {
        Value::SetRef(v)
    }
}

impl From<Bytes> for Value {
    fn from(v: Bytes) -> Value {
        Value::Bytes(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Value {
        Value::Array(v)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(v: BTreeMap<String, Value>) -> Value {
        Value::Object(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Value {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}
