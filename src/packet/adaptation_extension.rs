use getset::CopyGetters;

use crate::errors::Result;
use crate::helpers::bit_cursor::BitCursor;

/// Legal time window, used by re-multiplexers to bound buffer fullness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct LegalTimeWindow {
    /// Set when `offset` is valid.
    valid: bool,
    /// 15-bit offset, in units of 300 / fs seconds.
    offset: u16,
}

/// Seamless splice parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct SeamlessSplice {
    /// Splice type, i.e. the parameters of the H.262 splice.
    splice_type: u8,
    /// 33-bit decoding time stamp of the first access unit after the splice point.
    dts_next_access_unit: u64,
}

/// Adaptation field extension.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct AdaptationExtension {
    /// Bytes following the length byte.
    length: u8,
    /// Set when the legal time window is present.
    ltw_flag: bool,
    /// Set when the piecewise rate is present.
    piecewise_rate_flag: bool,
    /// Set when the seamless splice parameters are present.
    seamless_splice_flag: bool,
    /// Cleared when adaptation field descriptors follow the extension fields. Older streams carry
    /// a reserved `1` here.
    af_descriptor_not_present_flag: bool,
    /// Is `None` if the LTW flag is `false`.
    legal_time_window: Option<LegalTimeWindow>,
    /// 22-bit piecewise rate in units of 50 bytes/second.
    ///
    /// Is `None` if the piecewise rate flag is `false`.
    piecewise_rate: Option<u32>,
    /// Is `None` if the seamless splice flag is `false`.
    seamless_splice: Option<SeamlessSplice>,
}

impl AdaptationExtension {
    pub(crate) fn decode(cursor: &mut BitCursor<'_>) -> Result<Self> {
        let (length, mut ext) = cursor.read_length_prefixed("adaptation_field_extension_length")?;
        if length == 0 {
            return Ok(AdaptationExtension::default());
        }

        let ltw_flag = ext.read_flag("ltw_flag")?;
        let piecewise_rate_flag = ext.read_flag("piecewise_rate_flag")?;
        let seamless_splice_flag = ext.read_flag("seamless_splice_flag")?;
        let af_descriptor_not_present_flag = ext.read_flag("af_descriptor_not_present_flag")?;
        ext.read_reserved(4, "reserved")?;

        let legal_time_window = if ltw_flag {
            let valid = ext.read_flag("ltw_valid_flag")?;
            let offset = ext.read(15, "ltw_offset")? as u16;
            Some(LegalTimeWindow { valid, offset })
        } else {
            None
        };

        let piecewise_rate = if piecewise_rate_flag {
            ext.read_reserved(2, "reserved")?;
            Some(ext.read(22, "piecewise_rate")? as u32)
        } else {
            None
        };

        let seamless_splice = if seamless_splice_flag {
            let splice_type = ext.read(4, "splice_type")? as u8;
            let high = ext.read(3, "DTS_next_AU[32..30]")?;
            ext.read_const(1, "marker_bit", 1)?;
            let middle = ext.read(15, "DTS_next_AU[29..15]")?;
            ext.read_const(1, "marker_bit", 1)?;
            let low = ext.read(15, "DTS_next_AU[14..0]")?;
            ext.read_const(1, "marker_bit", 1)?;
            Some(SeamlessSplice {
                splice_type,
                dts_next_access_unit: (high << 30) | (middle << 15) | low,
            })
        } else {
            None
        };

        Ok(AdaptationExtension {
            length,
            ltw_flag,
            piecewise_rate_flag,
            seamless_splice_flag,
            af_descriptor_not_present_flag,
            legal_time_window,
            piecewise_rate,
            seamless_splice,
        })
    }
}
