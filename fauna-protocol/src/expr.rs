/*!
Contains the [`Expr`] trait and the literal builders [`Obj`] and [`Arr`].

Every node of a query, whether a plain literal or a function call built
with [`query`](crate::query), only has to know how to lower itself into
the wire representation.
*/
use std::collections::{BTreeMap, HashMap};

use bytes::Bytes;

use crate::codec::{bytes_json, date_json, ref_json, time_json, SET_TAG};
use crate::json::Json;
use crate::model::{Date, HighPrecisionTime, Ref, SetRef};
use crate::value::Value;

/// A node of a query expression.
pub trait Expr {
    /// Lowers the expression into its wire representation.
    fn to_wire(&self) -> Json;
}

/// An object literal.
///
/// Sent as `{"object": {...}}`, fields are lowered as expressions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Obj(BTreeMap<String, Json>);

/// An array literal whose items may be of different types.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Arr(Vec<Json>);

fn object_literal(fields: BTreeMap<String, Json>) -> Json {
    Json::tagged("object", Json::Object(fields))
}

impl Obj {
    pub fn new() -> Obj {
        Obj::default()
    }
    pub fn field(mut self, key: impl Into<String>, value: impl Expr) -> Obj {
        self.0.insert(key.into(), value.to_wire());
        self
    }
}

impl Arr {
    pub fn new() -> Arr {
        Arr::default()
    }
    pub fn item(mut self, value: impl Expr) -> Arr {
        self.0.push(value.to_wire());
        self
    }
}

impl Expr for Obj {
    fn to_wire(&self) -> Json {
        object_literal(self.0.clone())
    }
}

impl Expr for Arr {
    fn to_wire(&self) -> Json {
        Json::Array(self.0.clone())
    }
}

impl Expr for Json {
    fn to_wire(&self) -> Json {
        self.clone()
    }
}

impl<E: Expr + ?Sized> Expr for &E {
    fn to_wire(&self) -> Json {
        (**self).to_wire()
    }
}

impl<E: Expr + ?Sized> Expr for Box<E> {
    fn to_wire(&self) -> Json {
        (**self).to_wire()
    }
}

impl Expr for str {
    fn to_wire(&self) -> Json {
        Json::Str(self.to_string())
    }
}

impl Expr for String {
    fn to_wire(&self) -> Json {
        Json::Str(self.clone())
    }
}

impl Expr for i64 {
    fn to_wire(&self) -> Json {
        Json::Int(*self)
    }
}

impl Expr for i32 {
    fn to_wire(&self) -> Json {
        Json::Int((*self).into())
    }
}

impl Expr for u32 {
    fn to_wire(&self) -> Json {
        Json::Int((*self).into())
    }
}

impl Expr for f64 {
    fn to_wire(&self) -> Json {
        Json::Double(*self)
    }
}

impl Expr for bool {
    fn to_wire(&self) -> Json {
        Json::Bool(*self)
    }
}

impl<E: Expr> Expr for Option<E> {
    fn to_wire(&self) -> Json {
        match self {
            Some(e) => e.to_wire(),
            None => Json::Null,
        }
    }
}

impl Expr for HighPrecisionTime {
    fn to_wire(&self) -> Json {
        time_json(self)
    }
}

impl Expr for Date {
    fn to_wire(&self) -> Json {
        date_json(self)
    }
}

impl Expr for Ref {
    fn to_wire(&self) -> Json {
        ref_json(self)
    }
}

impl Expr for SetRef {
    fn to_wire(&self) -> Json {
        Json::tagged(
            SET_TAG,
            Json::Object(
                self.parameters()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_wire()))
                    .collect(),
            ),
        )
    }
}

impl Expr for Bytes {
    fn to_wire(&self) -> Json {
        bytes_json(self)
    }
}

impl<E: Expr> Expr for [E] {
    fn to_wire(&self) -> Json {
        Json::Array(self.iter().map(Expr::to_wire).collect())
    }
}

impl<E: Expr> Expr for Vec<E> {
    fn to_wire(&self) -> Json {
        self.as_slice().to_wire()
    }
}

impl<E: Expr> Expr for BTreeMap<String, E> {
    fn to_wire(&self) -> Json {
        object_literal(
            self.iter().map(|(k, v)| (k.clone(), v.to_wire())).collect(),
        )
    }
}

impl<E: Expr, S: std::hash::BuildHasher> Expr for HashMap<String, E, S> {
    fn to_wire(&self) -> Json {
        object_literal(
            self.iter().map(|(k, v)| (k.clone(), v.to_wire())).collect(),
        )
    }
}

impl Expr for Value {
    fn to_wire(&self) -> Json {
        match self {
            Value::Null => Json::Null,
            Value::Str(v) => v.to_wire(),
            Value::Int(v) => v.to_wire(),
            Value::Double(v) => v.to_wire(),
            Value::Bool(v) => v.to_wire(),
            Value::Time(v) => v.to_wire(),
            Value::Date(v) => v.to_wire(),
            Value::Ref(v) => v.to_wire(),
            Value::SetRef(v) => v.to_wire(),
            Value::Bytes(v) => v.to_wire(),
            Value::Array(items) => items.to_wire(),
            Value::Object(fields) => fields.to_wire(),
        }
    }
}
