mod reference;
mod time;

pub use self::reference::{Ref, SetRef};
pub use self::time::{Date, HighPrecisionTime, ParseTimeError};

use std::fmt;

#[derive(Debug)]
pub struct OutOfRangeError;

impl std::error::Error for OutOfRangeError {}
impl fmt::Display for OutOfRangeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("value is out of range")
    }
}

impl From<std::num::TryFromIntError> for OutOfRangeError {
    fn from(_: std::num::TryFromIntError) -> OutOfRangeError {
        OutOfRangeError
    }
}
