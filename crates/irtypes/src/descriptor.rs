// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors: the closed tagged union stored per identifier.
//!
//! A [`TypeDescriptor`] is pure data. It carries the shape of one type and
//! refers to other types exclusively through [`TypeId`] values; it never owns
//! or embeds another descriptor. Constructors take exactly the payload fields
//! of their variant and assign no identifier, keeping identity decoupled from
//! shape.

use crate::tag::TypeTag;
use crate::type_id::TypeId;

/// Floating point bit-widths accepted by the validator.
///
/// 80 covers the x87 extended format frequently recovered from x86 binaries.
pub const SUPPORTED_FLOAT_WIDTHS: [u64; 4] = [32, 64, 80, 128];

/// One struct member: byte offset within the aggregate plus the field's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructField {
    /// Byte offset from the start of the struct. Must be `< size` of the
    /// enclosing struct; gaps between fields are padding.
    pub offset: u64,
    /// Type of the field, by reference.
    pub ty: TypeId,
}

/// Shape of one type in the graph.
///
/// Identifiers embedded in payloads are references into the owning
/// [`TypeTable`](crate::TypeTable); they may dangle transiently while a graph
/// is under construction and are checked by
/// [`validate`](crate::validate::validate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    /// Placeholder for a type nothing further is known about.
    Unknown,
    /// Zero-size marker type.
    Void,
    /// Boolean.
    Bool,
    /// Integral type.
    Int {
        /// Two's-complement signedness.
        signed: bool,
        /// Width in bits, non-zero.
        bits: u64,
    },
    /// Character-like type of `bits` width, non-zero.
    Char { bits: u64 },
    /// Floating point type; `bits` must be one of [`SUPPORTED_FLOAT_WIDTHS`].
    Float { bits: u64 },
    /// Function type. Parameter order is call order and significant.
    Function { ret: TypeId, params: Vec<TypeId> },
    /// Pointer to another type. The pointee may be the pointer's own
    /// identifier (self-reference) or a forward reference.
    Pointer { pointee: TypeId },
    /// Fixed-length array. A count of 0 models flexible/unknown-length arrays.
    Array { element: TypeId, count: u64 },
    /// Aggregate of fields at caller-supplied offsets, sorted ascending.
    Struct { size: u64, fields: Vec<StructField> },
    /// Transparent alias. Chains of aliases must terminate at a non-alias
    /// variant; a chain that never does is a cycle and rejected.
    Alias { target: TypeId },
}

impl TypeDescriptor {
    pub const fn unknown() -> Self {
        TypeDescriptor::Unknown
    }

    pub const fn void() -> Self {
        TypeDescriptor::Void
    }

    pub const fn boolean() -> Self {
        TypeDescriptor::Bool
    }

    pub const fn integer(signed: bool, bits: u64) -> Self {
        TypeDescriptor::Int { signed, bits }
    }

    pub const fn character(bits: u64) -> Self {
        TypeDescriptor::Char { bits }
    }

    pub const fn float(bits: u64) -> Self {
        TypeDescriptor::Float { bits }
    }

    pub fn function(ret: TypeId, params: Vec<TypeId>) -> Self {
        TypeDescriptor::Function { ret, params }
    }

    pub const fn pointer(pointee: TypeId) -> Self {
        TypeDescriptor::Pointer { pointee }
    }

    pub const fn array(element: TypeId, count: u64) -> Self {
        TypeDescriptor::Array { element, count }
    }

    pub fn structure(size: u64, fields: Vec<StructField>) -> Self {
        TypeDescriptor::Struct { size, fields }
    }

    pub const fn alias(target: TypeId) -> Self {
        TypeDescriptor::Alias { target }
    }

    /// Wire tag of this variant.
    pub const fn tag(&self) -> TypeTag {
        match self {
            TypeDescriptor::Unknown => TypeTag::Unknown,
            TypeDescriptor::Bool => TypeTag::Bool,
            TypeDescriptor::Int { .. } => TypeTag::Int,
            TypeDescriptor::Char { .. } => TypeTag::Char,
            TypeDescriptor::Float { .. } => TypeTag::Float,
            TypeDescriptor::Function { .. } => TypeTag::Function,
            TypeDescriptor::Pointer { .. } => TypeTag::Pointer,
            TypeDescriptor::Array { .. } => TypeTag::Array,
            TypeDescriptor::Struct { .. } => TypeTag::Struct,
            TypeDescriptor::Void => TypeTag::Void,
            TypeDescriptor::Alias { .. } => TypeTag::Alias,
        }
    }

    /// Identifiers this descriptor refers to, in declared order (function
    /// return before parameters, struct fields in field order).
    pub fn references(&self) -> Vec<TypeId> {
        match self {
            TypeDescriptor::Unknown
            | TypeDescriptor::Void
            | TypeDescriptor::Bool
            | TypeDescriptor::Int { .. }
            | TypeDescriptor::Char { .. }
            | TypeDescriptor::Float { .. } => Vec::new(),
            TypeDescriptor::Function { ret, params } => {
                let mut ids = Vec::with_capacity(1 + params.len());
                ids.push(*ret);
                ids.extend_from_slice(params);
                ids
            }
            TypeDescriptor::Pointer { pointee } => vec![*pointee],
            TypeDescriptor::Array { element, .. } => vec![*element],
            TypeDescriptor::Struct { fields, .. } => fields.iter().map(|f| f.ty).collect(),
            TypeDescriptor::Alias { target } => vec![*target],
        }
    }
}
