//! Structured errors reported by the server alongside a failed response.
use std::fmt;

/// A single entry of the `errors` array of a failed response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    /// Position of the failing sub-expression, segments rendered as strings.
    pub position: Vec<String>,
    pub code: String,
    pub description: String,
    pub failures: Vec<ValidationFailure>,
}

/// A field-level validation failure attached to a [`QueryError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub field: Vec<String>,
    pub code: String,
    pub description: String,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.description)?;
        if !self.position.is_empty() {
            write!(f, " (at {})", self.position.join(" / "))?;
        }
        Ok(())
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.description)?;
        if !self.field.is_empty() {
            write!(f, " (at {})", self.field.join(" / "))?;
        }
        Ok(())
    }
}
