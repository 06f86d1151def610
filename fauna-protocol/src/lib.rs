/*!
Value model, wire codec and typed extraction for the Fauna client.

Everything the server returns is parsed into a [`Value`](crate::value::Value)
tree by [`codec::parse`]. Queries are built from anything implementing
[`Expr`](crate::expr::Expr), either plain literals or the function calls in
[`query`], and rendered with [`codec::serialize`].

Reading typed data out of a response goes through
[`Field`](crate::field::Field) and the [`Decode`](crate::decode::Decode)
trait:

```rust
# use fauna_protocol::codec::parse_resource;
# use fauna_protocol::model::Ref;
let value = parse_resource(
    br#"{"resource": {"ref": {"@ref": "classes/spells/42"}}}"#).unwrap();
let spell: Option<Ref> = value.get("ref").unwrap();
assert_eq!(spell, Some(Ref::new("classes/spells/42")));
```

The [`Value`](crate::value::Value) enum:

```rust,ignore
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
```
*/

pub mod codec;
pub mod decode;
pub mod errors;
pub mod expr;
#[macro_use]
pub mod field;
pub mod json;
pub mod model;
pub mod query;
pub mod value;

pub use decode::Decode;
pub use expr::Expr;
pub use field::{Field, FieldError, Path};
pub use value::Value;
