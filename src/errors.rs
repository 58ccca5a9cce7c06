//! Define errors used in the reading and decoding of the transport stream.
//!
//! Each kind of failure has its own type. [`TSError`] wraps all of them so that callers can use
//! a single `Result` across the crate. Reaching the end of a stream is never an error; readers
//! return `Ok(None)` for it.
use thiserror::Error;

pub mod closed_stream;
pub mod field_constraint;
pub mod malformed_packet;
pub mod short_read;
pub mod unsupported_mode;

pub use closed_stream::ClosedStream;
pub use field_constraint::{Constraint, FieldConstraint, FieldOverrun};
pub use malformed_packet::MalformedPacket;
pub use short_read::ShortRead;
pub use unsupported_mode::UnsupportedMode;

/// Any error produced by this crate.
#[derive(Error, Debug)]
pub enum TSError {
    /// See [`MalformedPacket`].
    #[error(transparent)]
    MalformedPacket(#[from] MalformedPacket),
    /// See [`ShortRead`].
    #[error(transparent)]
    ShortRead(#[from] ShortRead),
    /// See [`ClosedStream`].
    #[error(transparent)]
    ClosedStream(#[from] ClosedStream),
    /// See [`FieldConstraint`].
    #[error(transparent)]
    FieldConstraint(#[from] FieldConstraint),
    /// See [`FieldOverrun`].
    #[error(transparent)]
    FieldOverrun(#[from] FieldOverrun),
    /// See [`UnsupportedMode`].
    #[error(transparent)]
    UnsupportedMode(#[from] UnsupportedMode),
    /// The byte source itself failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, TSError>;
