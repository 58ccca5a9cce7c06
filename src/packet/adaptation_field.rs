use getset::{CopyGetters, Getters};

use crate::errors::Result;
use crate::helpers::bit_cursor::BitCursor;
use crate::packet::adaptation_extension::AdaptationExtension;

/// A 42-bit clock reference as carried in the PCR and OPCR fields.
///
/// The base counts a 90 kHz clock and the extension counts the remaining 27 MHz ticks, so the
/// full value is `base * 300 + extension`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct ClockReference {
    /// 33-bit base, in 90 kHz units.
    base: u64,
    /// The 6 reserved bits between base and extension, exactly as read.
    reserved: u8,
    /// 9-bit extension, in 27 MHz units.
    extension: u16,
}

impl ClockReference {
    /// Full value in 27 MHz ticks.
    pub fn value(&self) -> u64 {
        self.base * 300 + u64::from(self.extension)
    }

    fn decode(cursor: &mut BitCursor<'_>, names: [&'static str; 3]) -> Result<Self> {
        let [base_name, reserved_name, extension_name] = names;
        let base = cursor.read(33, base_name)?;
        let reserved = cursor.read_reserved(6, reserved_name)? as u8;
        let extension = cursor.read(9, extension_name)? as u16;

        Ok(ClockReference {
            base,
            reserved,
            extension,
        })
    }
}

const PCR_FIELDS: [&str; 3] = [
    "program_clock_reference_base",
    "reserved",
    "program_clock_reference_extension",
];

const OPCR_FIELDS: [&str; 3] = [
    "original_program_clock_reference_base",
    "reserved",
    "original_program_clock_reference_extension",
];

/// Adaptation field data, present when the adaptation field control has a `1` in the MSB place.
#[derive(Clone, Debug, Default, PartialEq, Eq, Getters, CopyGetters)]
pub struct TSAdaptationField {
    /// Number of bytes that make up the adaptation field, not counting this length byte itself.
    #[getset(get_copy = "pub")]
    adaptation_field_length: u8,
    /// Set if current TS packet is in a discontinuity state with respect to either the continuity
    /// counter or the program clock reference
    #[getset(get_copy = "pub")]
    discontinuity_indicator: bool,
    /// Set when the stream may be decoded without errors from this point
    #[getset(get_copy = "pub")]
    random_access_indicator: bool,
    /// Set when this stream should be considered "high priority"
    #[getset(get_copy = "pub")]
    elementary_stream_priority_indicator: bool,
    /// Set when PCR (Program Clock Reference) field is present
    #[getset(get_copy = "pub")]
    pcr_flag: bool,
    /// Set when OPCR (Original Program Clock Reference) field is present
    #[getset(get_copy = "pub")]
    opcr_flag: bool,
    /// Set when splice countdown field is present
    #[getset(get_copy = "pub")]
    splicing_point_flag: bool,
    /// Set when transport private data is present
    #[getset(get_copy = "pub")]
    transport_private_data_flag: bool,
    /// Set when adaptation extension data is present
    #[getset(get_copy = "pub")]
    adaptation_field_extension_flag: bool,
    /// Program clock reference. The PCR indicates the intended time of arrival of the byte
    /// containing the last bit of the program_clock_reference_base at the input of the system
    /// target decoder.
    ///
    /// Is `None` if the PCR Flag is `false`.
    #[getset(get_copy = "pub")]
    pcr: Option<ClockReference>,
    /// Original Program clock reference. Helps when one TS is copied into another.
    ///
    /// Is `None` if the OPCR Flag is `false`.
    #[getset(get_copy = "pub")]
    opcr: Option<ClockReference>,
    /// Indicates how many TS packets from this one a splicing point occurs. May be negative.
    ///
    /// Is `None` if the Splicing Point Flag is `false`.
    #[getset(get_copy = "pub")]
    splice_countdown: Option<i8>,
    /// Length of the Transport Private Data field, as declared in the stream.
    ///
    /// Is `None` if the Transport Private Data Flag is `false`.
    #[getset(get_copy = "pub")]
    transport_private_data_length: Option<u8>,
    /// Transport private data.
    ///
    /// Is `None` if the Transport Private Data Flag is `false`.
    #[getset(get = "pub")]
    transport_private_data: Option<Box<[u8]>>,
    /// Adaptation field extension.
    ///
    /// Is `None` if the Adaptation Field Extension Flag is `false`.
    #[getset(get = "pub")]
    extension: Option<AdaptationExtension>,
}

impl TSAdaptationField {
    /// Decode the adaptation field, starting at its length byte.
    ///
    /// Leaves `cursor` just past the declared field (clipped to the end of the packet), which is
    /// where the payload starts. Stuffing bytes after the optional fields are skipped.
    ///
    /// When `has_payload` is set the field has to leave at least one byte for the payload, so the
    /// largest valid length in a full packet is 182 instead of 183.
    pub(crate) fn decode(cursor: &mut BitCursor<'_>, has_payload: bool) -> Result<Self> {
        let (adaptation_field_length, mut field) = cursor
            .read_length_prefixed_leaving("adaptation_field_length", usize::from(has_payload))?;

        // A zero length is a single stuffing byte; there are no flags to read.
        if adaptation_field_length == 0 {
            return Ok(TSAdaptationField::default());
        }

        let discontinuity_indicator = field.read_flag("discontinuity_indicator")?;
        let random_access_indicator = field.read_flag("random_access_indicator")?;
        let elementary_stream_priority_indicator =
            field.read_flag("elementary_stream_priority_indicator")?;
        let pcr_flag = field.read_flag("PCR_flag")?;
        let opcr_flag = field.read_flag("OPCR_flag")?;
        let splicing_point_flag = field.read_flag("splicing_point_flag")?;
        let transport_private_data_flag = field.read_flag("transport_private_data_flag")?;
        let adaptation_field_extension_flag = field.read_flag("adaptation_field_extension_flag")?;

        let pcr = pcr_flag
            .then(|| ClockReference::decode(&mut field, PCR_FIELDS))
            .transpose()?;
        let opcr = opcr_flag
            .then(|| ClockReference::decode(&mut field, OPCR_FIELDS))
            .transpose()?;

        let splice_countdown = splicing_point_flag
            .then(|| field.read(8, "splice_countdown").map(|bits| bits as u8 as i8))
            .transpose()?;

        let (transport_private_data_length, transport_private_data) = if transport_private_data_flag {
            let (length, mut data) = field.read_length_prefixed("transport_private_data_length")?;
            let available = data.remaining() / 8;
            (Some(length), Some(data.read_bytes(available, "private_data_byte")?))
        } else {
            (None, None)
        };

        let extension = adaptation_field_extension_flag
            .then(|| AdaptationExtension::decode(&mut field))
            .transpose()?;

        Ok(TSAdaptationField {
            adaptation_field_length,
            discontinuity_indicator,
            random_access_indicator,
            elementary_stream_priority_indicator,
            pcr_flag,
            opcr_flag,
            splicing_point_flag,
            transport_private_data_flag,
            adaptation_field_extension_flag,
            pcr,
            opcr,
            splice_countdown,
            transport_private_data_length,
            transport_private_data,
            extension,
        })
    }
}
