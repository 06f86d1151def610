use std::fmt;

use crate::{Error, InternalServerError};

pub struct DisplayError<'a>(&'a Error, bool);
pub struct VerboseError<'a>(&'a Error);

struct DisplayStatus(Option<u16>);

pub fn display_error(e: &Error, verbose: bool) -> DisplayError {
    DisplayError(e, verbose)
}
pub fn display_error_verbose(e: &Error) -> VerboseError {
    VerboseError(e)
}

impl fmt::Display for DisplayError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let DisplayError(ref e, verbose) = self;
        write!(f, "{:#}", e)?;
        if e.is::<InternalServerError>() || *verbose {
            for line in e.contexts() {
                write!(f, "\n  Context: {}", line)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            Some(x) => write!(f, "{}", x),
            None => f.write_str("-"),
        }
    }
}

impl fmt::Display for VerboseError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let e = self.0;
        writeln!(f, "Error type: {}", e.kind_debug())?;
        writeln!(f, "HTTP status: {}", DisplayStatus(e.status()))?;
        if let Some(msg) = e.initial_message() {
            writeln!(f, "Message: {}", msg)?;
        }
        let errors = e.query_errors();
        if !errors.is_empty() {
            writeln!(f, "Server errors:")?;
            for err in errors {
                writeln!(f, "  position: [{}]", err.position.join(", "))?;
                writeln!(f, "    code: {}", err.code)?;
                writeln!(f, "    description: {}", err.description)?;
                for failure in &err.failures {
                    writeln!(
                        f,
                        "    failure: [{}] {}: {}",
                        failure.field.join(", "),
                        failure.code,
                        failure.description
                    )?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::display_error_verbose;
    use crate::details::QueryError;
    use crate::{ErrorKind, NotFoundError};

    #[test]
    fn verbose() {
        let err = NotFoundError::with_message("instance not found")
            .with_status(404)
            .with_query_errors(vec![QueryError {
                position: vec!["ref".into()],
                code: "instance not found".into(),
                description: "Instance not found.".into(),
                failures: Vec::new(),
            }]);
        assert_eq!(
            display_error_verbose(&err).to_string(),
            "Error type: NotFoundError [0x02040000]\n\
             HTTP status: 404\n\
             Message: instance not found\n\
             Server errors:\n  \
             position: [ref]\n    \
             code: instance not found\n    \
             description: Instance not found.\n"
        );
    }
}
