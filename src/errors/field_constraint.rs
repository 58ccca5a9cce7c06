//! Errors raised by the bit-level field decoder.
use derive_more::Display;
use thiserror::Error;

/// The rule a field's value has to satisfy under validating decode.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum Constraint {
    /// Must equal this exact value.
    #[display("{_0:#x}")]
    Equals(u64),
    /// Must lie within `min..=max`.
    #[display("a value in {min}..={max}")]
    Range {
        /// Inclusive lower bound.
        min: u64,
        /// Inclusive upper bound.
        max: u64,
    },
    /// Reserved bits, which must all be set.
    #[display("all {width} bits set")]
    AllOnes {
        /// Number of reserved bits.
        width: usize,
    },
}

/// A decoded field value broke its constraint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("field {field} is {value:#x}, expected {constraint}")]
pub struct FieldConstraint {
    /// Name of the field, as written in ISO/IEC 13818-1.
    pub field: &'static str,
    /// The raw value that was read.
    pub value: u64,
    /// What the value should have been.
    pub constraint: Constraint,
}

/// A field's bits run past the end of the region being decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("field {field} needs {needed} bits but only {remaining} remain")]
pub struct FieldOverrun {
    /// Name of the field.
    pub field: &'static str,
    /// Width of the field in bits.
    pub needed: usize,
    /// Bits left in the region.
    pub remaining: usize,
}
