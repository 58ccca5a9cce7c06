//! Holds all the information regarding a given packet from the transport stream.
//!
//! A [`TSPacket`] is only a framed, validated buffer plus its PID. Everything else is decoded on
//! request with [`TSPacket::decode`], which returns a separate [`DecodedPacket`].
mod adaptation_extension;
mod adaptation_field;
mod header;
mod payload;

use std::fmt;
use std::hash::{Hash, Hasher};

use getset::{CopyGetters, Getters};

use crate::errors::{MalformedPacket, Result};
use crate::helpers::bit_cursor::BitCursor;
use crate::{DecodeMode, PACKET_SIZE, PADDING_PID, SYNC_BYTE};

pub use adaptation_extension::{AdaptationExtension, LegalTimeWindow, SeamlessSplice};
pub use adaptation_field::{ClockReference, TSAdaptationField};
pub use header::TSHeader;
pub use payload::TSPayload;

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

/// Number of bytes shown after the header when displaying a packet.
const DISPLAY_BYTES: usize = 11;

/// Extract the 13-bit PID from bytes 1 and 2 of a packet buffer.
///
/// `buf` must be at least 3 bytes long.
pub(crate) fn pid_of(buf: &[u8]) -> u16 {
    (u16::from(buf[1] & 0x1F) << 8) | u16::from(buf[2])
}

/// A single framed transport stream packet.
///
/// Two packets are equal when their bytes are equal; where they were read from does not matter.
#[derive(Clone, CopyGetters)]
pub struct TSPacket {
    data: [u8; PACKET_SIZE],
    /// Zero-based position of this packet among the packets read from one stream, if it came from
    /// a stream.
    #[getset(get_copy = "pub")]
    index: Option<u64>,
    /// Byte offset of this packet within the stream, if it came from a stream.
    #[getset(get_copy = "pub")]
    offset: Option<u64>,
    /// PID: Packet identifier of the packet.
    #[getset(get_copy = "pub")]
    pid: u16,
}

impl TSPacket {
    /// Create a TSPacket from a byte array that was not read from a stream.
    ///
    /// The buffer has to start with [`SYNC_BYTE`] and be exactly [`PACKET_SIZE`] bytes long.
    pub fn from_bytes(buf: &[u8]) -> Result<TSPacket> {
        Self::from_bytes_at(buf, None, None)
    }

    /// Create a TSPacket from a byte array, recording where in a stream it was found.
    pub fn from_bytes_at(buf: &[u8], index: Option<u64>, offset: Option<u64>) -> Result<TSPacket> {
        // Check if the first byte is SYNC byte.
        match buf.first() {
            Some(&SYNC_BYTE) => {}
            Some(&byte) => {
                #[cfg(feature = "tracing")]
                debug!("Rejecting packet with first byte {:#04x}", byte);
                return Err(MalformedPacket::InvalidFirstByte(byte).into());
            }
            None => return Err(MalformedPacket::InvalidLength(0).into()),
        }

        let data: [u8; PACKET_SIZE] = buf.try_into().map_err(|_| {
            #[cfg(feature = "tracing")]
            debug!("Rejecting packet of {} bytes", buf.len());
            MalformedPacket::InvalidLength(buf.len())
        })?;

        Ok(TSPacket {
            pid: pid_of(&data),
            data,
            index,
            offset,
        })
    }

    /// Return the raw bytes of the packet.
    pub fn data(&self) -> &[u8; PACKET_SIZE] {
        &self.data
    }

    /// Returns if this is a padding (null) packet.
    pub fn is_padding(&self) -> bool {
        self.pid == PADDING_PID
    }

    /// Decode the header, the adaptation field and the payload boundaries.
    ///
    /// The result is not cached; keep the [`DecodedPacket`] around if it is needed more than once.
    pub fn decode(&self, mode: DecodeMode) -> Result<DecodedPacket> {
        let mut cursor = BitCursor::new(&self.data, mode);

        let header = TSHeader::decode(&mut cursor)?;
        let adaptation_field_control = header.adaptation_field_control();

        let adaptation_field = if adaptation_field_control.has_adaptation_field() {
            Some(TSAdaptationField::decode(
                &mut cursor,
                adaptation_field_control.has_payload(),
            )?)
        } else {
            None
        };

        let payload = if adaptation_field_control.has_payload() {
            Some(TSPayload::extract(&mut cursor)?)
        } else {
            None
        };

        #[cfg(feature = "tracing")]
        trace!(
            "Decoded packet PID {:#06x} ({}): {}",
            self.pid,
            mode,
            adaptation_field_control
        );

        Ok(DecodedPacket {
            header,
            adaptation_field,
            payload,
        })
    }
}

impl PartialEq for TSPacket {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Eq for TSPacket {}

impl Hash for TSPacket {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.data.hash(state);
    }
}

impl fmt::Display for TSPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TS packet PID {:04x}", self.pid)?;

        let rest = &self.data[TSHeader::SIZE..];
        for byte in rest.iter().take(DISPLAY_BYTES) {
            write!(f, " {:02x}", byte)?;
        }
        if rest.len() > DISPLAY_BYTES {
            write!(f, " ...")?;
        }
        Ok(())
    }
}

impl fmt::Debug for TSPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TSPacket(\"")?;
        for byte in &self.data {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, "\")")
    }
}

/// The fields of a packet, as produced by [`TSPacket::decode`].
#[derive(Clone, Debug, PartialEq, Eq, Getters)]
#[getset(get = "pub")]
pub struct DecodedPacket {
    /// Header object which tracks header attributes of the packet.
    header: TSHeader,
    /// Adaptation field data. This field will be `None` when the adaptation field control field has
    /// a `0` in the MSB place.
    adaptation_field: Option<TSAdaptationField>,
    /// Payload data. This field will be `None` when the adaptation field control field has a `0`
    /// in the LSB place.
    payload: Option<TSPayload>,
}
