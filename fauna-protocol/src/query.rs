/*!
Builders for server function calls.

Every builder returns a [`Call`], an expression that lowers to the
function-call object the server evaluates:

```rust
# use fauna_protocol::query::{class, create};
# use fauna_protocol::expr::Obj;
# use fauna_protocol::codec::serialize;
let q = create(class("spells"), Obj::new().field("data", Obj::new()
    .field("name", "Fire Beak")));
assert_eq!(
    serialize(&q),
    r#"{"create":{"class":"spells"},"params":{"object":{"data":{"object":{"name":"Fire Beak"}}}}}"#,
);
```
*/
use std::sync::atomic::{AtomicU64, Ordering};

use crate::expr::Expr;
use crate::field::{Path, Segment};
use crate::json::Json;

/// A lowered function call.
#[derive(Clone, Debug, PartialEq)]
pub struct Call(Json);

/// Reference to a variable bound by [`let_`] or [`lambda`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Var(String);

/// Source of names for lambda parameters.
///
/// Names are `v1`, `v2`, ... in the order [`VarNames::fresh`] is called, so
/// building the same query with a fresh `VarNames` gives the same output.
#[derive(Debug, Default)]
pub struct VarNames {
    next: AtomicU64,
}

/// Options of [`paginate`].
#[derive(Clone, Debug)]
pub struct Paginate {
    set: Json,
    size: Option<i64>,
    after: Option<Json>,
    before: Option<Json>,
    ts: Option<Json>,
    events: Option<bool>,
}

fn call<'a>(args: impl IntoIterator<Item = (&'a str, Json)>) -> Call {
    Call(Json::object(args))
}

impl Call {
    pub fn into_json(self) -> Json {
        self.0
    }
}

impl Expr for Call {
    fn to_wire(&self) -> Json {
        self.0.clone()
    }
}

impl Var {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Expr for Var {
    fn to_wire(&self) -> Json {
        Json::tagged("var", Json::Str(self.0.clone()))
    }
}

impl VarNames {
    pub fn new() -> VarNames {
        VarNames::default()
    }

    pub fn fresh(&self) -> Var {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        Var(format!("v{}", n))
    }

    pub fn reset(&self) {
        self.next.store(0, Ordering::Relaxed);
    }
}

pub fn class(name: impl Expr) -> Call {
    call([("class", name.to_wire())])
}

pub fn index(name: impl Expr) -> Call {
    call([("index", name.to_wire())])
}

pub fn var(name: impl Into<String>) -> Var {
    Var(name.into())
}

pub fn get(reference: impl Expr) -> Call {
    call([("get", reference.to_wire())])
}

/// Reads `reference` as of the snapshot `ts`.
pub fn get_at(reference: impl Expr, ts: impl Expr) -> Call {
    call([("get", reference.to_wire()), ("ts", ts.to_wire())])
}

pub fn exists(reference: impl Expr) -> Call {
    call([("exists", reference.to_wire())])
}

pub fn create(class_ref: impl Expr, params: impl Expr) -> Call {
    call([("create", class_ref.to_wire()), ("params", params.to_wire())])
}

pub fn update(reference: impl Expr, params: impl Expr) -> Call {
    call([("update", reference.to_wire()), ("params", params.to_wire())])
}

pub fn replace(reference: impl Expr, params: impl Expr) -> Call {
    call([("replace", reference.to_wire()), ("params", params.to_wire())])
}

pub fn delete(reference: impl Expr) -> Call {
    call([("delete", reference.to_wire())])
}

pub fn match_index(index: impl Expr, terms: impl Expr) -> Call {
    call([("match", index.to_wire()), ("terms", terms.to_wire())])
}

pub fn paginate(set: impl Expr) -> Paginate {
    Paginate {
        set: set.to_wire(),
        size: None,
        after: None,
        before: None,
        ts: None,
        events: None,
    }
}

impl Paginate {
    pub fn size(mut self, size: i64) -> Paginate {
        self.size = Some(size);
        self
    }
    pub fn after(mut self, cursor: impl Expr) -> Paginate {
        self.after = Some(cursor.to_wire());
        self
    }
    pub fn before(mut self, cursor: impl Expr) -> Paginate {
        self.before = Some(cursor.to_wire());
        self
    }
    pub fn ts(mut self, ts: impl Expr) -> Paginate {
        self.ts = Some(ts.to_wire());
        self
    }
    pub fn events(mut self, events: bool) -> Paginate {
        self.events = Some(events);
        self
    }
}

impl Expr for Paginate {
    fn to_wire(&self) -> Json {
        let mut args = vec![("paginate", self.set.clone())];
        if let Some(size) = self.size {
            args.push(("size", Json::Int(size)));
        }
        if let Some(after) = &self.after {
            args.push(("after", after.clone()));
        }
        if let Some(before) = &self.before {
            args.push(("before", before.clone()));
        }
        if let Some(ts) = &self.ts {
            args.push(("ts", ts.clone()));
        }
        if let Some(events) = self.events {
            args.push(("events", Json::Bool(events)));
        }
        Json::object(args)
    }
}

/// One-argument lambda, the parameter name is taken from `names`.
pub fn lambda<E, F>(names: &VarNames, body: F) -> Call
    where F: FnOnce(Var) -> E,
          E: Expr,
{
    let param = names.fresh();
    let name = Json::Str(param.0.clone());
    call([("lambda", name), ("expr", body(param).to_wire())])
}

/// Lambda over explicitly named parameters.
///
/// More than one name destructures an array argument.
pub fn lambda_named<I, S>(params: I, body: impl Expr) -> Call
    where I: IntoIterator<Item = S>,
          S: Into<String>,
{
    let mut params: Vec<Json> = params.into_iter()
        .map(|name| Json::Str(name.into()))
        .collect();
    let params = if params.len() == 1 {
        params.remove(0)
    } else {
        Json::Array(params)
    };
    call([("lambda", params), ("expr", body.to_wire())])
}

pub fn let_<I, S, E>(bindings: I, body: impl Expr) -> Call
    where I: IntoIterator<Item = (S, E)>,
          S: Into<String>,
          E: Expr,
{
    let bindings = Json::object(
        bindings.into_iter().map(|(name, value)| (name, value.to_wire())));
    call([("let", bindings), ("in", body.to_wire())])
}

pub fn if_(cond: impl Expr, then: impl Expr, otherwise: impl Expr) -> Call {
    call([
        ("if", cond.to_wire()),
        ("then", then.to_wire()),
        ("else", otherwise.to_wire()),
    ])
}

pub fn do_<E: Expr>(exprs: impl IntoIterator<Item = E>) -> Call {
    let exprs = exprs.into_iter().map(|e| e.to_wire()).collect();
    call([("do", Json::Array(exprs))])
}

pub fn map(collection: impl Expr, lambda: impl Expr) -> Call {
    call([("map", lambda.to_wire()), ("collection", collection.to_wire())])
}

fn path_json(path: &Path) -> Json {
    Json::Array(
        path.segments()
            .iter()
            .map(|segment| match segment {
                Segment::Key(key) => Json::Str(key.clone()),
                Segment::Index(idx) => i64::try_from(*idx)
                    .map(Json::Int)
                    .unwrap_or(Json::Null),
            })
            .collect(),
    )
}

pub fn select(path: impl Into<Path>, from: impl Expr) -> Call {
    call([("select", path_json(&path.into())), ("from", from.to_wire())])
}

pub fn select_or(path: impl Into<Path>, from: impl Expr, default: impl Expr)
    -> Call
{
    call([
        ("select", path_json(&path.into())),
        ("from", from.to_wire()),
        ("default", default.to_wire()),
    ])
}

#[cfg(test)]
mod test {
    use super::VarNames;

    #[test]
    fn fresh_names() {
        let names = VarNames::new();
        assert_eq!(names.fresh().name(), "v1");
        assert_eq!(names.fresh().name(), "v2");
        names.reset();
        assert_eq!(names.fresh().name(), "v1");
    }
}
