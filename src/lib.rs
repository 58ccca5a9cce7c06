#![forbid(unsafe_code)]
#![deny(future_incompatible, missing_docs, rust_2018_idioms)]
#![doc = include_str!("../README.md")]

use derive_more::{Display, IsVariant};

pub mod errors;

pub mod file;

pub mod packet;

pub mod reader;

mod helpers {
    pub mod bit_cursor;
}

pub use file::OpenMode;
pub use packet::{DecodedPacket, TSPacket};
pub use reader::TSReader;

/// Every transport stream packet is exactly this many bytes long.
pub const PACKET_SIZE: usize = 188;

/// All transport stream packets start with a SYNC byte.
pub const SYNC_BYTE: u8 = 0x47;

/// PID reserved for padding (null) packets.
pub const PADDING_PID: u16 = 0x1FFF;

/// Largest value a 13-bit PID can take.
pub const MAX_PID: u16 = 0x1FFF;

/// Whether the payload is scrambled and with which key.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, IsVariant)]
pub enum TransportScramblingControl {
    /// `00`: payload is not scrambled.
    #[display("not scrambled")]
    NoScrambling = 0,
    /// `01`: reserved for future use.
    #[display("reserved")]
    Reserved = 1,
    /// `10`: scrambled with the even key.
    #[display("even key")]
    EvenKey = 2,
    /// `11`: scrambled with the odd key.
    #[display("odd key")]
    OddKey = 3,
}

impl From<u8> for TransportScramblingControl {
    /// Only the two low bits are considered.
    fn from(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Self::NoScrambling,
            1 => Self::Reserved,
            2 => Self::EvenKey,
            _ => Self::OddKey,
        }
    }
}

/// Describes whether a packet carries an adaptation field, a payload, or both.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, IsVariant)]
pub enum AdaptationFieldControl {
    /// `00`: reserved for future use.
    #[display("reserved")]
    Reserved = 0,
    /// `01`: payload only.
    #[display("payload only")]
    Payload = 1,
    /// `10`: adaptation field only.
    #[display("adaptation field only")]
    AdaptationField = 2,
    /// `11`: adaptation field followed by payload.
    #[display("adaptation field and payload")]
    AdaptationAndPayload = 3,
}

impl AdaptationFieldControl {
    /// `true` for `10` and `11`.
    pub fn has_adaptation_field(self) -> bool {
        matches!(self, Self::AdaptationField | Self::AdaptationAndPayload)
    }

    /// `true` for `01` and `11`.
    pub fn has_payload(self) -> bool {
        matches!(self, Self::Payload | Self::AdaptationAndPayload)
    }
}

impl From<u8> for AdaptationFieldControl {
    /// Only the two low bits are considered.
    fn from(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Self::Reserved,
            1 => Self::Payload,
            2 => Self::AdaptationField,
            _ => Self::AdaptationAndPayload,
        }
    }
}

/// How strictly field constraints are enforced when decoding a packet.
///
/// Both modes walk exactly the same bit layout.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq, Hash, IsVariant)]
pub enum DecodeMode {
    /// Fixed values, ranges and reserved bits are checked, and the first violation fails the
    /// decode.
    #[default]
    #[display("validating")]
    Validating,
    /// No constraint is checked. Broken broadcast streams still decode as far as the layout
    /// allows.
    #[display("forgiving")]
    Forgiving,
}
