//! Miette support for Fauna errors
//!
//! [miette](https://docs.rs/miette) allows nice formatting of error
//!
use std::fmt::Display;

use crate::Error;

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn Display + '_>> {
        Some(Box::new(self.kind_name()))
    }
    fn help(&self) -> Option<Box<dyn Display + '_>> {
        self.query_errors()
            .first()
            .map(|e| Box::new(&e.description) as Box<dyn Display + '_>)
    }
}
