/*!
Path based extraction of typed data out of a [`Value`].

A [`Field`] pairs a [`Path`] with a codec. Building a field does nothing;
it is applied to a value with [`Field::get`]:

```rust
# use fauna_protocol::field::Field;
# use fauna_protocol::value::Value;
# use fauna_protocol::path;
let name = Field::<String>::new(path!("data", "name"));
let scores = Field::<Value>::new(path!("data", "scores"))
    .collect(Field::<i64>::root());

let value = Value::object([("data", Value::object([
    ("name", Value::from("Fire Beak")),
    ("scores", Value::array([10, 20])),
]))]);
assert_eq!(name.get(&value).unwrap(), Some("Fire Beak".to_string()));
assert_eq!(scores.get(&value).unwrap(), Some(vec![10, 20]));
```

Absence is not an error: a missing key, an index past the end of an array
or a `null` at the end of the path all produce `Ok(None)`. Finding a value
of the wrong shape is an error, and every error names the full path from
the value the field was applied to.
*/
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use snafu::{IntoError, Snafu};

use crate::decode::Decode;
use crate::value::Value;

/// One step of a [`Path`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

/// A sequence of object keys and array indexes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<Segment>);

/// Builds a [`Path`] out of keys and indexes.
///
/// ```rust
/// # use fauna_protocol::path;
/// let path = path!("data", "scores", 0usize);
/// assert_eq!(path.to_string(), "data / scores / 0");
/// ```
#[macro_export]
macro_rules! path {
    () => { $crate::field::Path::root() };
    ($($segment:expr),+ $(,)?) => {
        $crate::field::Path::new(
            vec![$($crate::field::Segment::from($segment)),+])
    };
}

#[derive(Snafu, Debug)]
#[snafu(visibility(pub(crate)), context(suffix(false)))]
#[non_exhaustive]
pub enum FieldError {
    #[snafu(display("expected {} at `{}` but found {}",
                    expected, path, actual))]
    UnexpectedType {
        path: Path,
        expected: &'static str,
        actual: &'static str,
    },
    #[snafu(display("cannot decode {} at `{}` as {}", actual, path, expected))]
    DecodeMismatch {
        path: Path,
        expected: &'static str,
        actual: &'static str,
    },
    #[snafu(display("value at `{}` is out of range for {}", path, expected))]
    OutOfRange { path: Path, expected: &'static str },
    #[snafu(display("invalid value at `{}`: {}", path, message))]
    Invalid { path: Path, message: String },
    #[snafu(display("cannot collect element {} of `{}`: {}",
                    element, path, source))]
    CollectionElement {
        path: Path,
        element: Segment,
        source: Box<FieldError>,
    },
}

type CodecFn<T> = dyn Fn(&Value) -> Result<Option<T>, FieldError> + Send + Sync;

/// A reusable extractor of `T` at a fixed path.
pub struct Field<T> {
    path: Path,
    codec: Arc<CodecFn<T>>,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Segment::Key(key) => f.write_str(key),
            Segment::Index(idx) => write!(f, "{}", idx),
        }
    }
}

impl From<&str> for Segment {
    fn from(key: &str) -> Segment {
        Segment::Key(key.to_string())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Segment {
        Segment::Key(key)
    }
}

impl From<usize> for Segment {
    fn from(idx: usize) -> Segment {
        Segment::Index(idx)
    }
}

impl Path {
    pub fn root() -> Path {
        Path(Vec::new())
    }

    pub fn new(segments: Vec<Segment>) -> Path {
        Path(segments)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// This path followed by `other`.
    pub fn join(&self, other: &Path) -> Path {
        let mut segments = Vec::with_capacity(self.0.len() + other.0.len());
        segments.extend_from_slice(&self.0);
        segments.extend_from_slice(&other.0);
        Path(segments)
    }

    pub fn push(&mut self, segment: impl Into<Segment>) {
        self.0.push(segment.into());
    }

    /// Finds the value at this path.
    ///
    /// Returns `Ok(None)` as soon as a key is missing or an index is past
    /// the end of its array. Stepping into anything other than an object
    /// (for a key) or an array (for an index) is an error.
    pub fn extract<'a>(&self, value: &'a Value)
        -> Result<Option<&'a Value>, FieldError>
    {
        let mut current = value;
        for (n, segment) in self.0.iter().enumerate() {
            let next = match (segment, current) {
                (Segment::Key(key), Value::Object(fields)) => fields.get(key),
                (Segment::Index(idx), Value::Array(items)) => items.get(*idx),
                (Segment::Key(_), other) => {
                    return UnexpectedType {
                        path: Path(self.0[..=n].to_vec()),
                        expected: "object",
                        actual: other.kind(),
                    }.fail();
                }
                (Segment::Index(_), other) => {
                    return UnexpectedType {
                        path: Path(self.0[..=n].to_vec()),
                        expected: "array",
                        actual: other.kind(),
                    }.fail();
                }
            };
            match next {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (n, segment) in self.0.iter().enumerate() {
            if n > 0 {
                f.write_str(" / ")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl From<Segment> for Path {
    fn from(segment: Segment) -> Path {
        Path(vec![segment])
    }
}

impl From<&str> for Path {
    fn from(key: &str) -> Path {
        Path(vec![key.into()])
    }
}

impl From<String> for Path {
    fn from(key: String) -> Path {
        Path(vec![key.into()])
    }
}

impl From<usize> for Path {
    fn from(idx: usize) -> Path {
        Path(vec![idx.into()])
    }
}

impl From<Vec<Segment>> for Path {
    fn from(segments: Vec<Segment>) -> Path {
        Path(segments)
    }
}

impl FromIterator<Segment> for Path {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Path {
        Path(iter.into_iter().collect())
    }
}

impl FieldError {
    /// Full path of the value that failed.
    pub fn path(&self) -> &Path {
        use FieldError::*;
        match self {
            UnexpectedType { path, .. }
            | DecodeMismatch { path, .. }
            | OutOfRange { path, .. }
            | Invalid { path, .. } => path,
            CollectionElement { source, .. } => source.path(),
        }
    }

    /// Error for user decoders that reject a value of the right shape.
    pub fn invalid(message: impl Into<String>) -> FieldError {
        FieldError::Invalid { path: Path::root(), message: message.into() }
    }

    /// Re-anchors an error produced relative to `prefix`.
    pub fn prefixed(self, prefix: &Path) -> FieldError {
        use FieldError::*;
        if prefix.is_empty() {
            return self;
        }
        match self {
            UnexpectedType { path, expected, actual } => UnexpectedType {
                path: prefix.join(&path),
                expected,
                actual,
            },
            DecodeMismatch { path, expected, actual } => DecodeMismatch {
                path: prefix.join(&path),
                expected,
                actual,
            },
            OutOfRange { path, expected } => OutOfRange {
                path: prefix.join(&path),
                expected,
            },
            Invalid { path, message } => Invalid {
                path: prefix.join(&path),
                message,
            },
            CollectionElement { path, element, source } => CollectionElement {
                path: prefix.join(&path),
                element,
                source: Box::new(source.prefixed(prefix)),
            },
        }
    }

    pub(crate) fn in_element(self, element: Segment) -> FieldError {
        let source = self.prefixed(&Path::from(element.clone()));
        CollectionElement { path: Path::root(), element }
            .into_error(Box::new(source))
    }
}

fn decode_value<T: Decode>(value: &Value) -> Result<Option<T>, FieldError> {
    match value {
        Value::Null => Ok(None),
        value => T::decode(value).map(Some),
    }
}

impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        Field { path: self.path.clone(), codec: self.codec.clone() }
    }
}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Field")
            .field("path", &self.path)
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: Decode + 'static> Field<T> {
    /// Field decoded with the [`Decode`] implementation of `T`.
    pub fn new(path: impl Into<Path>) -> Field<T> {
        Field {
            path: path.into(),
            codec: Arc::new(decode_value::<T>),
        }
    }

    /// Field that decodes the value it is applied to.
    pub fn root() -> Field<T> {
        Field::new(Path::root())
    }
}

impl<T: 'static> Field<T> {
    /// Field decoded by a custom function.
    ///
    /// Errors returned by `codec` are relative to the decoded value, the
    /// field path is prepended to them.
    pub fn decode_with<F>(path: impl Into<Path>, codec: F) -> Field<T>
        where F: Fn(&Value) -> Result<Option<T>, FieldError>
                 + Send + Sync + 'static,
    {
        Field { path: path.into(), codec: Arc::new(codec) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Same field nested deeper: `path` is appended to the field's path.
    pub fn at(&self, path: impl Into<Path>) -> Field<T> {
        Field {
            path: self.path.join(&path.into()),
            codec: self.codec.clone(),
        }
    }

    /// Applies the field to `value`.
    pub fn get(&self, value: &Value) -> Result<Option<T>, FieldError> {
        match self.path.extract(value)? {
            None => Ok(None),
            Some(found) => {
                (self.codec)(found).map_err(|e| e.prefixed(&self.path))
            }
        }
    }

    /// Transforms a decoded value, absent values stay absent.
    pub fn map<U, F>(self, f: F) -> Field<U>
        where F: Fn(T) -> U + Send + Sync + 'static,
              U: 'static,
    {
        let codec = self.codec;
        Field {
            path: self.path,
            codec: Arc::new(move |value| Ok(codec(value)?.map(&f))),
        }
    }

    /// Like [`map`](Field::map), but the transform may turn a value
    /// into an absent one.
    pub fn flat_map<U, F>(self, f: F) -> Field<U>
        where F: Fn(T) -> Option<U> + Send + Sync + 'static,
              U: 'static,
    {
        let codec = self.codec;
        Field {
            path: self.path,
            codec: Arc::new(move |value| Ok(codec(value)?.and_then(&f))),
        }
    }
}

impl Field<Value> {
    /// Applies `inner` to every element of the array at this field's path.
    ///
    /// Elements for which `inner` finds nothing are skipped. A failing
    /// element fails the whole field, the error names its index.
    pub fn collect<U: 'static>(&self, inner: Field<U>) -> Field<Vec<U>> {
        Field::decode_with(self.path.clone(), move |value| match value {
            Value::Null => Ok(None),
            Value::Array(items) => {
                let mut result = Vec::with_capacity(items.len());
                for (idx, item) in items.iter().enumerate() {
                    match inner.get(item) {
                        Ok(Some(v)) => result.push(v),
                        Ok(None) => {}
                        Err(e) => return Err(e.in_element(Segment::Index(idx))),
                    }
                }
                Ok(Some(result))
            }
            other => UnexpectedType {
                path: Path::root(),
                expected: "array",
                actual: other.kind(),
            }.fail(),
        })
    }

    /// Applies `inner` to every entry of the object at this field's path.
    pub fn collect_map<U: 'static>(&self, inner: Field<U>)
        -> Field<BTreeMap<String, U>>
    {
        Field::decode_with(self.path.clone(), move |value| match value {
            Value::Null => Ok(None),
            Value::Object(fields) => {
                let mut result = BTreeMap::new();
                for (key, item) in fields {
                    match inner.get(item) {
                        Ok(Some(v)) => {
                            result.insert(key.clone(), v);
                        }
                        Ok(None) => {}
                        Err(e) => {
                            return Err(e.in_element(Segment::Key(key.clone())))
                        }
                    }
                }
                Ok(Some(result))
            }
            other => UnexpectedType {
                path: Path::root(),
                expected: "object",
                actual: other.kind(),
            }.fail(),
        })
    }
}

impl Value {
    /// Decodes the value at `path`.
    pub fn get<T: Decode>(&self, path: impl Into<Path>)
        -> Result<Option<T>, FieldError>
    {
        let path = path.into();
        match path.extract(self)? {
            None => Ok(None),
            Some(found) => decode_value(found).map_err(|e| e.prefixed(&path)),
        }
    }

    /// Decodes every element of the array at `path`.
    ///
    /// Null elements are skipped, as in [`Field::collect`]. This differs
    /// from `get::<Vec<T>>`, which fails on them.
    pub fn get_array<T: Decode + 'static>(&self, path: impl Into<Path>)
        -> Result<Option<Vec<T>>, FieldError>
    {
        Field::<Value>::new(path).collect(Field::<T>::root()).get(self)
    }

    /// Decodes every entry of the object at `path`.
    pub fn get_object<T: Decode + 'static>(&self, path: impl Into<Path>)
        -> Result<Option<BTreeMap<String, T>>, FieldError>
    {
        Field::<Value>::new(path).collect_map(Field::<T>::root()).get(self)
    }

    pub fn get_field<T: 'static>(&self, field: &Field<T>)
        -> Result<Option<T>, FieldError>
    {
        field.get(self)
    }
}
