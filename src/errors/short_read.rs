//! Error that is thrown when the source ends partway through a packet.
use thiserror::Error;

/// Fewer than [`PACKET_SIZE`](crate::PACKET_SIZE) (but more than zero) bytes were available for
/// the next packet.
///
/// This normally means the stream ends with a truncated packet. `data` holds whatever *was* read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "error reading from TS stream {name:?}, read {} byte{} instead of 188",
    .data.len(),
    plural(.data.len())
)]
pub struct ShortRead {
    /// Name of the stream being read.
    pub name: String,
    /// The partial packet bytes.
    pub data: Vec<u8>,
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}
