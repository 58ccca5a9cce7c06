//! Error that is thrown when a file reader is asked for an open mode it doesn't know.
use thiserror::Error;

/// The open mode string was not one of `r`, `w` or `x`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("mode {0:?} is not 'r', 'w' or 'x'")]
pub struct UnsupportedMode(pub String);
