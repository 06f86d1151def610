use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::details::QueryError;
use crate::kinds::error_name;
use crate::traits::ErrorKind;

/// Error type returned from any Fauna client call.
// This includes boxed error, because propagating through call chain is
// faster when error is just one pointer
#[derive(Debug, Clone)]
pub struct Error(pub(crate) Box<Inner>);

#[derive(Debug, Clone)]
pub(crate) struct Inner {
    pub code: u32,
    pub messages: Vec<Cow<'static, str>>,
    pub error: Option<Arc<dyn StdError + Send + Sync + 'static>>,
    pub status: Option<u16>,
    pub errors: Vec<QueryError>,
}

impl Error {
    pub fn is<T: ErrorKind>(&self) -> bool {
        T::is_superclass_of(self.0.code)
    }
    pub fn context<S: Into<Cow<'static, str>>>(mut self, msg: S) -> Error {
        self.0.messages.push(msg.into());
        self
    }
    /// HTTP status of the response this error was built from, if any.
    pub fn status(&self) -> Option<u16> {
        self.0.status
    }
    pub fn with_status(mut self, status: u16) -> Error {
        self.0.status = Some(status);
        self
    }
    /// Structured errors reported by the server.
    pub fn query_errors(&self) -> &[QueryError] {
        &self.0.errors
    }
    pub fn with_query_errors(mut self, errors: Vec<QueryError>) -> Error {
        self.0.errors = errors;
        self
    }
    pub fn kind_name(&self) -> &str {
        error_name(self.0.code)
    }
    pub fn kind_debug(&self) -> impl fmt::Display {
        format!("{} [0x{:08X}]", error_name(self.0.code), self.0.code)
    }
    pub fn initial_message(&self) -> Option<&str> {
        self.0.messages.first().map(|m| &m[..])
    }
    pub fn contexts(&self) -> impl Iterator<Item = &str> {
        self.0.messages.iter().skip(1).map(|m| &m[..])
    }
    pub fn from_code(code: u32) -> Error {
        Error(Box::new(Inner {
            code,
            messages: Vec::new(),
            error: None,
            status: None,
            errors: Vec::new(),
        }))
    }
    pub fn refine_kind<T: ErrorKind>(mut self) -> Error {
        self.0.code = T::CODE;
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = self.kind_name();
        write!(f, "{}", kind)?;
        if let Some(status) = self.0.status {
            write!(f, " (HTTP {})", status)?;
        }
        if f.alternate() {
            for msg in self.0.messages.iter().rev() {
                write!(f, ": {}", msg)?;
            }
            if let Some(mut src) = self.source() {
                write!(f, ": {}", src)?;
                while let Some(next) = src.source() {
                    write!(f, ": {}", next)?;
                    src = next;
                }
            }
        } else if let Some(last) = self.0.messages.last() {
            write!(f, ": {}", last)?;
        }
        for err in &self.0.errors {
            write!(f, "\n  Error: {}", err)?;
            for failure in &err.failures {
                write!(f, "\n    Failure: {}", failure)?;
            }
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.error.as_ref().map(|b| b.as_ref() as &dyn StdError)
    }
}

#[cfg(test)]
mod test {
    use std::io;

    use crate::details::{QueryError, ValidationFailure};
    use crate::kinds::*;
    use crate::{ErrorKind, ResultExt};

    #[test]
    fn hierarchy() {
        let err = NotFoundError::with_message("instance not found");
        assert!(err.is::<NotFoundError>());
        assert!(err.is::<ServerError>());
        assert!(!err.is::<ClientError>());
        assert!(!err.is::<BadRequestError>());

        let err = ClientTimeoutError::build();
        assert!(err.is::<ClientError>());
        assert!(!err.is::<ServerError>());
    }

    #[test]
    fn display_contexts_and_source() {
        let err = TransportError::with_source(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "connection refused",
        ))
        .context("cannot send request");
        assert_eq!(err.to_string(), "TransportError: cannot send request");
        assert_eq!(
            format!("{:#}", err),
            "TransportError: cannot send request: connection refused"
        );
    }

    #[test]
    fn display_server_errors() {
        let err = BadRequestError::with_message("validation failed")
            .with_status(400)
            .with_query_errors(vec![QueryError {
                position: vec!["create".into()],
                code: "validation failed".into(),
                description: "document data is not valid.".into(),
                failures: vec![ValidationFailure {
                    field: vec!["data".into(), "name".into()],
                    code: "value required".into(),
                    description: "Value required.".into(),
                }],
            }]);
        assert_eq!(
            err.to_string(),
            "BadRequestError (HTTP 400): validation failed\n  \
             Error: validation failed: document data is not valid. \
             (at create)\n    \
             Failure: value required: Value required. (at data / name)"
        );
    }

    #[test]
    fn result_context() {
        let res: Result<(), _> = Err(UnavailableError::build());
        let err = res.context("server is down").unwrap_err();
        assert_eq!(err.initial_message(), Some("server is down"));
        assert!(err.is::<UnavailableError>());
    }

    #[test]
    fn refine() {
        let err = ServerError::build().refine_kind::<InternalServerError>();
        assert_eq!(err.kind_name(), "InternalServerError");
    }
}
