use std::collections::BTreeMap;
use std::fmt;

use crate::value::Value;

/// Server-assigned identifier of a database entity,
/// e.g. `classes/spells/123`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ref(String);

/// Identity of a set: the unevaluated query that produces it.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct SetRef(BTreeMap<String, Value>);

impl Ref {
    pub fn new(id: impl Into<String>) -> Ref {
        Ref(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last segment of the identifier.
    pub fn id(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Reference with the last segment removed, if there is one.
    pub fn parent(&self) -> Option<Ref> {
        self.0.rsplit_once('/').map(|(parent, _)| Ref::new(parent))
    }
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Ref> for String {
    fn from(value: Ref) -> String {
        value.0
    }
}

impl SetRef {
    pub fn new(parameters: BTreeMap<String, Value>) -> SetRef {
        SetRef(parameters)
    }

    pub fn from_pairs<N: ToString, V: Into<Value>>(
        iter: impl IntoIterator<Item = (N, V)>,
    ) -> SetRef {
        SetRef(iter.into_iter().map(|(k, v)| (k.to_string(), v.into())).collect())
    }

    pub fn parameters(&self) -> &BTreeMap<String, Value> {
        &self.0
    }

    pub fn into_parameters(self) -> BTreeMap<String, Value> {
        self.0
    }
}

#[cfg(test)]
mod test {
    use super::Ref;

    #[test]
    fn parts() {
        let r = Ref::new("classes/spells/123");
        assert_eq!(r.id(), "123");
        assert_eq!(r.parent(), Some(Ref::new("classes/spells")));
        assert_eq!(Ref::new("classes").parent(), None);
        assert_eq!(Ref::new("classes").id(), "classes");
    }
}
