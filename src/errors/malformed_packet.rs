//! Errors for byte buffers that cannot be framed as a transport stream packet.
use thiserror::Error;

/// Error that is thrown when trying to build a packet from a buffer that either doesn't start with
/// a `SYNC_BYTE` or isn't exactly [`PACKET_SIZE`](crate::PACKET_SIZE) bytes long.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedPacket {
    /// Invalid first byte.
    #[error("first byte of TS packet is {0:#04x}, not 0x47")]
    InvalidFirstByte(u8),
    /// Invalid buffer length.
    #[error("TS packet is {0} bytes long, not 188")]
    InvalidLength(usize),
}
