use crate::errors::Result;
use crate::helpers::bit_cursor::BitCursor;

/// Payload bytes of a single packet, present when the adaptation field control has a `1` in the
/// LSB place.
///
/// The bytes are not interpreted. Reassembling PES packets or PSI sections out of them is left to
/// the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TSPayload {
    /// Everything from the end of the header (and adaptation field, if any) to the end of the
    /// packet.
    data: Box<[u8]>,
}

impl TSPayload {
    /// Take the rest of the packet as payload. Empty if the adaptation field filled the packet.
    pub(crate) fn extract(cursor: &mut BitCursor<'_>) -> Result<TSPayload> {
        let len = cursor.remaining() / 8;
        Ok(TSPayload {
            data: cursor.read_bytes(len, "data_byte")?,
        })
    }

    /// Return the payload bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of payload bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if there are no payload bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
