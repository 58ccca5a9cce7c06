use getset::CopyGetters;

use crate::errors::Result;
use crate::helpers::bit_cursor::BitCursor;
use crate::{AdaptationFieldControl, SYNC_BYTE, TransportScramblingControl};

/// The fixed 4-byte header found at the start of every packet.
///
/// Field meanings follow the [MPEG transport stream](https://en.wikipedia.org/wiki/MPEG_transport_stream)
/// packet layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct TSHeader {
    /// TEI: Transport error indicator is set when a demodulator cannot correct errors in the
    /// packet and indicates that the packet is corrupt.
    tei: bool,
    /// PUSI: Payload unit start indicator indicates if this packet contains the first byte of a
    /// payload since they can be spread across multiple packets.
    pusi: bool,
    /// Transport priority, set when the current packet is higher priority than other packets of the
    /// same PID.
    transport_priority: bool,
    /// PID: Packet identifier of the transport stream packet. Describes what the payload data is.
    pid: u16,
    /// TSC: Transport scrambling control indicates whether the payload is encrypted and with what
    /// key.
    tsc: TransportScramblingControl,
    /// Adaptation field control describes if this packet contains adaptation field data,
    /// payload data, or both.
    adaptation_field_control: AdaptationFieldControl,
    /// Continuity counter is used for determining the sequence of data in each PID.
    continuity_counter: u8,
}

impl TSHeader {
    /// Header size in bytes.
    pub const SIZE: usize = 4;

    /// Decode the 32 header bits, sync byte included.
    ///
    /// `adaptation_field_control == 00` is reserved and only accepted by forgiving decode.
    pub(crate) fn decode(cursor: &mut BitCursor<'_>) -> Result<Self> {
        cursor.read_const(8, "sync_byte", u64::from(SYNC_BYTE))?;
        let tei = cursor.read_flag("transport_error_indicator")?;
        let pusi = cursor.read_flag("payload_unit_start_indicator")?;
        let transport_priority = cursor.read_flag("transport_priority")?;
        let pid = cursor.read(13, "PID")? as u16;
        let tsc = cursor.read(2, "transport_scrambling_control")? as u8;
        let adaptation_field_control = cursor.read_range(2, "adaptation_field_control", 1, 3)? as u8;
        let continuity_counter = cursor.read(4, "continuity_counter")? as u8;

        Ok(TSHeader {
            tei,
            pusi,
            transport_priority,
            pid,
            tsc: tsc.into(),
            adaptation_field_control: adaptation_field_control.into(),
            continuity_counter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DecodeMode;
    use crate::errors::TSError;

    #[test]
    fn decodes_every_header_field() {
        // TEI clear, PUSI set, priority set, PID 0x1ABC, TSC odd key, AF + payload, CC 9.
        let data = [0x47, 0b0111_1010, 0xBC, 0b1111_1001];
        let mut cursor = BitCursor::new(&data, DecodeMode::Validating);
        let header = TSHeader::decode(&mut cursor).unwrap();

        assert!(!header.tei());
        assert!(header.pusi());
        assert!(header.transport_priority());
        assert_eq!(header.pid(), 0x1ABC);
        assert_eq!(header.tsc(), TransportScramblingControl::OddKey);
        assert_eq!(header.adaptation_field_control(), AdaptationFieldControl::AdaptationAndPayload);
        assert_eq!(header.continuity_counter(), 9);
        assert_eq!(cursor.position(), TSHeader::SIZE * 8);
    }

    #[test]
    fn reserved_adaptation_field_control() {
        let data = [0x47, 0x00, 0x21, 0b0000_0101];

        let mut cursor = BitCursor::new(&data, DecodeMode::Validating);
        let err = TSHeader::decode(&mut cursor).unwrap_err();
        assert!(matches!(
            err,
            TSError::FieldConstraint(ref e) if e.field == "adaptation_field_control" && e.value == 0
        ));

        let mut cursor = BitCursor::new(&data, DecodeMode::Forgiving);
        let header = TSHeader::decode(&mut cursor).unwrap();
        assert_eq!(header.adaptation_field_control(), AdaptationFieldControl::Reserved);
        assert_eq!(header.continuity_counter(), 5);
    }
}
