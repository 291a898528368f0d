// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Variant tags for the on-wire type table.
//!
//! The tag enumeration is fixed and published by the host project's type
//! table format; third-party tools read the table independently, so the
//! numeric assignment below must never change.

/// Wire tag identifying one [`TypeDescriptor`](crate::TypeDescriptor) variant.
///
/// Tag values match the host project's type table format document. The
/// assignment is append-only: new variants get new numbers, existing numbers
/// are frozen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeTag {
    /// Placeholder for an indeterminate type.
    Unknown = 0,
    /// Boolean type.
    Bool = 1,
    /// Integral type (signedness + bit-width).
    Int = 2,
    /// Character-like type (bit-width).
    Char = 3,
    /// Floating point type (bit-width).
    Float = 4,
    /// Function type (return + ordered parameters).
    Function = 5,
    /// Pointer to another type.
    Pointer = 6,
    /// Fixed-length array of one element type.
    Array = 7,
    /// Aggregate with byte size and offset-sorted fields.
    Struct = 8,
    /// Zero-size marker type.
    Void = 9,
    /// Transparent alias of another type.
    Alias = 10,
}

impl TypeTag {
    /// Canonical wire representation of this tag.
    pub const fn to_u64(self) -> u64 {
        self as u64
    }

    /// Convert from a wire tag, rejecting values outside the published range.
    pub const fn from_u64(value: u64) -> Option<Self> {
        match value {
            0 => Some(TypeTag::Unknown),
            1 => Some(TypeTag::Bool),
            2 => Some(TypeTag::Int),
            3 => Some(TypeTag::Char),
            4 => Some(TypeTag::Float),
            5 => Some(TypeTag::Function),
            6 => Some(TypeTag::Pointer),
            7 => Some(TypeTag::Array),
            8 => Some(TypeTag::Struct),
            9 => Some(TypeTag::Void),
            10 => Some(TypeTag::Alias),
            _ => None,
        }
    }

    /// Returns true for variants whose payload embeds identifiers of other
    /// types (i.e. variants that create edges in the graph).
    pub const fn is_referential(self) -> bool {
        matches!(
            self,
            TypeTag::Function | TypeTag::Pointer | TypeTag::Array | TypeTag::Struct | TypeTag::Alias
        )
    }

    /// Returns true for variants with an empty payload.
    pub const fn is_marker(self) -> bool {
        matches!(self, TypeTag::Unknown | TypeTag::Bool | TypeTag::Void)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_values_frozen() {
        // Wire compatibility: these values are published and must not drift.
        assert_eq!(TypeTag::Unknown.to_u64(), 0);
        assert_eq!(TypeTag::Bool.to_u64(), 1);
        assert_eq!(TypeTag::Int.to_u64(), 2);
        assert_eq!(TypeTag::Char.to_u64(), 3);
        assert_eq!(TypeTag::Float.to_u64(), 4);
        assert_eq!(TypeTag::Function.to_u64(), 5);
        assert_eq!(TypeTag::Pointer.to_u64(), 6);
        assert_eq!(TypeTag::Array.to_u64(), 7);
        assert_eq!(TypeTag::Struct.to_u64(), 8);
        assert_eq!(TypeTag::Void.to_u64(), 9);
        assert_eq!(TypeTag::Alias.to_u64(), 10);
    }

    #[test]
    fn test_from_u64_roundtrip() {
        for raw in 0..=10u64 {
            let tag = TypeTag::from_u64(raw).expect("tag in published range");
            assert_eq!(tag.to_u64(), raw);
        }
    }

    #[test]
    fn test_from_u64_rejects_unknown() {
        assert_eq!(TypeTag::from_u64(11), None);
        assert_eq!(TypeTag::from_u64(u64::MAX), None);
    }

    #[test]
    fn test_classification() {
        assert!(TypeTag::Pointer.is_referential());
        assert!(TypeTag::Struct.is_referential());
        assert!(!TypeTag::Int.is_referential());
        assert!(TypeTag::Void.is_marker());
        assert!(!TypeTag::Alias.is_marker());
    }
}
