// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Opaque 128-bit identifiers for type graph nodes.
//!
//! A [`TypeId`] is the sole way one descriptor refers to another: the graph
//! stays flat and serializable because edges are identifiers, never embedded
//! values. Identifier bytes are preserved verbatim across encode/decode.

use std::fmt;

/// Opaque, globally-unique 128-bit identifier naming one node in a type graph.
///
/// Identifiers are compared and hashed by value and never mutated. The table
/// owning the graph is the only component that maps identifiers to
/// descriptors; everything else treats a `TypeId` as an opaque 16-byte token.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId([u8; 16]);

impl TypeId {
    /// Construct an identifier from raw bytes (e.g. read from wire data).
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        TypeId(bytes)
    }

    /// Raw 16-byte value, exactly as stored on the wire.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Generate a fresh random identifier (UUID v4).
    pub fn generate() -> Self {
        TypeId(uuid::Uuid::new_v4().into_bytes())
    }

    /// The all-zero identifier. Useful as a sentinel in tests and tools;
    /// carries no special meaning inside a table.
    pub const fn nil() -> Self {
        TypeId([0u8; 16])
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self)
    }
}

impl From<[u8; 16]> for TypeId {
    fn from(bytes: [u8; 16]) -> Self {
        TypeId(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_bytes() {
        let bytes = [
            0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
            0x0f, 0x10,
        ];
        let id = TypeId::from_bytes(bytes);
        assert_eq!(id.as_bytes(), &bytes);
    }

    #[test]
    fn test_generate_unique() {
        let a = TypeId::generate();
        let b = TypeId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_display_hex() {
        let id = TypeId::from_bytes([0xab; 16]);
        assert_eq!(format!("{}", id), "ab".repeat(16));
        assert!(format!("{:?}", id).starts_with("TypeId(ab"));
    }

    #[test]
    fn test_nil_is_zero() {
        assert_eq!(TypeId::nil().as_bytes(), &[0u8; 16]);
    }
}
