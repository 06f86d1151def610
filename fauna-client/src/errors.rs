//! Errors that can be returned by the client
pub use fauna_errors::*;

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

/// Source of a [`ClientTimeoutError`] raised by
/// [`QueryResult::wait`](crate::QueryResult::wait).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed {
    duration: Duration,
}

impl Elapsed {
    pub(crate) fn new(duration: Duration) -> Elapsed {
        Elapsed { duration }
    }

    /// Time spent waiting before giving up.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Finds the elapsed time in the source chain of `err`.
    pub fn find(err: &Error) -> Option<Duration> {
        let mut source = std::error::Error::source(err);
        while let Some(err) = source {
            if let Some(elapsed) = err.downcast_ref::<Elapsed>() {
                return Some(elapsed.duration);
            }
            source = err.source();
        }
        None
    }
}

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "no result after {}",
               humantime::format_duration(self.duration))
    }
}

impl std::error::Error for Elapsed {}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    errors: Vec<RawQueryError>,
}

#[derive(Deserialize, Debug)]
struct RawQueryError {
    #[serde(default)]
    position: Vec<serde_json::Value>,
    code: String,
    description: String,
    #[serde(default)]
    failures: Vec<RawFailure>,
}

#[derive(Deserialize, Debug)]
struct RawFailure {
    #[serde(default)]
    field: Vec<serde_json::Value>,
    code: String,
    description: String,
}

fn segment(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

impl From<RawQueryError> for QueryError {
    fn from(raw: RawQueryError) -> QueryError {
        QueryError {
            position: raw.position.into_iter().map(segment).collect(),
            code: raw.code,
            description: raw.description,
            failures: raw.failures.into_iter().map(|f| ValidationFailure {
                field: f.field.into_iter().map(segment).collect(),
                code: f.code,
                description: f.description,
            }).collect(),
        }
    }
}

fn status_error(status: u16) -> Error {
    match status {
        400 => BadRequestError::build(),
        401 => UnauthorizedError::build(),
        403 => PermissionDeniedError::build(),
        404 => NotFoundError::build(),
        500 => InternalServerError::build(),
        503 => UnavailableError::build(),
        _ => UnknownServerError::build(),
    }
}

/// Converts a non-successful response into an error.
///
/// Returns `None` for any 2xx status; the body then holds the resource.
pub fn check_response(status: u16, body: &[u8]) -> Option<Error> {
    if (200..300).contains(&status) {
        return None;
    }
    let err = status_error(status).with_status(status);
    let err = match serde_json::from_slice::<ErrorBody>(body) {
        Ok(parsed) => {
            let errors: Vec<QueryError> = parsed.errors
                .into_iter()
                .map(QueryError::from)
                .collect();
            let message = match errors.first() {
                Some(first) => first.description.clone(),
                None => format!("request failed with status {}", status),
            };
            err.context(message).with_query_errors(errors)
        }
        Err(e) => {
            log::debug!("Cannot parse error response: {:#}", e);
            err.context(String::from_utf8_lossy(body).into_owned())
        }
    };
    Some(err)
}
