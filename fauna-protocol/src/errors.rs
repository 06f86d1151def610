use snafu::{Backtrace, Snafu};

use fauna_errors::{Error, ErrorKind};
use fauna_errors::{ProtocolEncodingError, ValueDecodeError};

use crate::field::FieldError;

#[derive(Snafu, Debug)]
#[snafu(visibility(pub(crate)), context(suffix(false)))]
#[non_exhaustive]
pub enum ParseError {
    #[snafu(display("malformed json: {}", source))]
    MalformedJson { backtrace: Backtrace, source: serde_json::Error },
    #[snafu(display("invalid timestamp {:?}", value))]
    InvalidTimestamp { backtrace: Backtrace, value: String },
    #[snafu(display("invalid date {:?}", value))]
    InvalidDate { backtrace: Backtrace, value: String },
    #[snafu(display("invalid base64 in bytes value: {}", source))]
    InvalidBytes { backtrace: Backtrace, source: base64::DecodeError },
    #[snafu(display("response has no `resource` field"))]
    MissingResource { backtrace: Backtrace },
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Error {
        ProtocolEncodingError::with_source(e)
    }
}

impl From<FieldError> for Error {
    fn from(e: FieldError) -> Error {
        ValueDecodeError::with_source(e)
    }
}
