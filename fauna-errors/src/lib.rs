/*!
# Error Handling for the Fauna client

All errors that the client produces at the network boundary are
encapsulated into the [`Error`] structure. The structure is a bit like
`Box<dyn Error>`, except it can only contain Fauna error kinds.

Each error kind is represented as a separate type that implements the
[`ErrorKind`] trait. Error kinds are used like marker structs; you can
use [`Error::is`] for error kinds and use them to create instances of the
error:

```rust
# use std::io;
# use fauna_errors::{TransportError, ErrorKind};
let err = TransportError::with_source(io::Error::from(io::ErrorKind::ConnectionReset));
assert!(err.is::<TransportError>());
```

Since errors are hierarchical, [`Error::is`] works with any ancestor:

```rust
# use fauna_errors::*;
let err = NotFoundError::with_message("instance not found");
assert!(err.is::<NotFoundError>());
assert!(err.is::<ServerError>());  // implied by the assertion above
assert!(!err.is::<ClientError>());
```

Errors returned by the server carry the HTTP status and the structured
list of [`QueryError`]s from the response body. Both are part of the
[`Display`](std::fmt::Display) output.
*/
mod error;
mod traits;

pub mod details;
pub mod display;
pub mod kinds;

#[cfg(feature = "miette")]
pub mod miette;

pub use details::{QueryError, ValidationFailure};
pub use error::Error;
pub use kinds::*;
pub use traits::{ErrorKind, ResultExt};
