use bitvec::prelude::*;

use crate::DecodeMode;
use crate::errors::{Constraint, FieldConstraint, FieldOverrun, Result};

#[cfg(feature = "tracing")]
use tracing::debug;

/// Reads big-endian bit fields out of a byte slice, front to back.
///
/// Constraint checks only fail under [`DecodeMode::Validating`]. Running out of bits fails in
/// either mode.
pub(crate) struct BitCursor<'a> {
    bits: &'a BitSlice<u8, Msb0>,
    position: usize,
    mode: DecodeMode,
}

impl<'a> BitCursor<'a> {
    pub fn new(bytes: &'a [u8], mode: DecodeMode) -> Self {
        BitCursor {
            bits: bytes.view_bits::<Msb0>(),
            position: 0,
            mode,
        }
    }

    /// Position in bits from the start of the slice.
    #[cfg(test)]
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.bits.len() - self.position
    }

    /// Plain read of `width` bits, `width <= 64`.
    pub fn read(&mut self, width: usize, name: &'static str) -> Result<u64> {
        debug_assert!(width <= 64);
        let end = self.claim(width, name)?;
        let value = if width == 0 {
            0
        } else {
            self.bits[self.position..end].load_be::<u64>()
        };
        self.position = end;
        Ok(value)
    }

    pub fn read_flag(&mut self, name: &'static str) -> Result<bool> {
        Ok(self.read(1, name)? == 1)
    }

    /// Read a field that has exactly one legal value.
    pub fn read_const(&mut self, width: usize, name: &'static str, expected: u64) -> Result<u64> {
        let value = self.read(width, name)?;
        if value != expected {
            self.violated(name, value, Constraint::Equals(expected))?;
        }
        Ok(value)
    }

    /// Read a field whose legal values are `min..=max`.
    pub fn read_range(&mut self, width: usize, name: &'static str, min: u64, max: u64) -> Result<u64> {
        let value = self.read(width, name)?;
        if !(min..=max).contains(&value) {
            self.violated(name, value, Constraint::Range { min, max })?;
        }
        Ok(value)
    }

    /// Read reserved bits, which are all ones in a well-formed stream.
    pub fn read_reserved(&mut self, width: usize, name: &'static str) -> Result<u64> {
        let value = self.read(width, name)?;
        let ones = if width >= 64 { u64::MAX } else { (1 << width) - 1 };
        if value != ones {
            self.violated(name, value, Constraint::AllOnes { width })?;
        }
        Ok(value)
    }

    /// Read `count` whole bytes. The cursor does not have to be byte aligned.
    pub fn read_bytes(&mut self, count: usize, name: &'static str) -> Result<Box<[u8]>> {
        self.claim(count * 8, name)?;
        (0..count).map(|_| self.read(8, name).map(|byte| byte as u8)).collect()
    }

    /// Split off the next `count` bytes as a cursor of their own and step over them.
    ///
    /// Used for length-prefixed regions, so that the fields inside can never read past the
    /// declared length.
    pub fn take_bytes(&mut self, count: usize, name: &'static str) -> Result<BitCursor<'a>> {
        let end = self.claim(count * 8, name)?;
        let bits: &'a BitSlice<u8, Msb0> = self.bits;
        let region = BitCursor {
            bits: &bits[self.position..end],
            position: 0,
            mode: self.mode,
        };
        self.position = end;
        Ok(region)
    }

    /// Read an 8-bit length and split off the region it declares.
    ///
    /// A length that runs past the end of this cursor fails validation. Forgiving decode clips the
    /// region to what is actually there. Returns the declared length with the region.
    pub fn read_length_prefixed(&mut self, name: &'static str) -> Result<(u8, BitCursor<'a>)> {
        self.read_length_prefixed_leaving(name, 0)
    }

    /// Same as [`BitCursor::read_length_prefixed`], but the region must also leave at least
    /// `keep` bytes after it.
    pub fn read_length_prefixed_leaving(
        &mut self,
        name: &'static str,
        keep: usize,
    ) -> Result<(u8, BitCursor<'a>)> {
        let max = (self.remaining().saturating_sub(8) / 8).saturating_sub(keep) as u64;
        let length = self.read_range(8, name, 0, max)? as u8;
        let available = usize::from(length).min(self.remaining() / 8);
        let region = self.take_bytes(available, name)?;
        Ok((length, region))
    }

    fn claim(&self, width: usize, name: &'static str) -> Result<usize> {
        if width > self.remaining() {
            return Err(FieldOverrun {
                field: name,
                needed: width,
                remaining: self.remaining(),
            }
            .into());
        }
        Ok(self.position + width)
    }

    fn violated(&self, name: &'static str, value: u64, constraint: Constraint) -> Result<()> {
        if self.mode.is_forgiving() {
            return Ok(());
        }

        #[cfg(feature = "tracing")]
        debug!("Field {} failed validation: {:#x}, expected {}", name, value, constraint);

        Err(FieldConstraint {
            field: name,
            value,
            constraint,
        }
        .into())
    }
}
