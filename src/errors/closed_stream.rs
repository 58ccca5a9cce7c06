//! Error that is thrown when reading from a reader that has been closed.
use thiserror::Error;

/// A read was attempted after the reader released its source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("TS stream {name:?} is closed")]
pub struct ClosedStream {
    /// Name of the closed stream.
    pub name: String,
}
