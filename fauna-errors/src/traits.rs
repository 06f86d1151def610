use std::borrow::Cow;
use std::error::Error as StdError;
use std::sync::Arc;

use crate::Error;

/// Trait that marks Fauna errors
///
/// Currently sealed, because error kinds may change in future
pub trait ErrorKind: Sealed {
    fn with_message<S: Into<Cow<'static, str>>>(s: S) -> Error {
        Self::build().context(s)
    }
    fn with_source<E: StdError + Send + Sync + 'static>(src: E) -> Error {
        let mut err = Error::from_code(Self::CODE);
        err.0.error = Some(Arc::new(src));
        err
    }
    fn with_source_box(src: Box<dyn StdError + Send + Sync>) -> Error {
        let mut err = Error::from_code(Self::CODE);
        err.0.error = Some(Arc::from(src));
        err
    }
    fn build() -> Error {
        Error::from_code(Self::CODE)
    }
}

pub trait Sealed {
    const CODE: u32;
    const NAME: &'static str;
    fn is_superclass_of(code: u32) -> bool;
}

/// Adds context to the error inside a result.
pub trait ResultExt<T> {
    fn context<C>(self, context: C) -> Result<T, Error>
    where
        C: Into<Cow<'static, str>>;
    fn with_context<C, F>(self, f: F) -> Result<T, Error>
    where
        C: Into<Cow<'static, str>>,
        F: FnOnce() -> C;
}

impl<T> ResultExt<T> for Result<T, Error> {
    fn context<C>(self, context: C) -> Result<T, Error>
    where
        C: Into<Cow<'static, str>>,
    {
        self.map_err(|e| e.context(context))
    }
    fn with_context<C, F>(self, f: F) -> Result<T, Error>
    where
        C: Into<Cow<'static, str>>,
        F: FnOnce() -> C,
    {
        self.map_err(|e| e.context(f()))
    }
}
