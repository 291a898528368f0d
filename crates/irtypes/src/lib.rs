// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # irtypes - recovered type information for binary-analysis IR modules
//!
//! Binary-analysis pipelines recover C-like type information (integers,
//! pointers, structs, typedefs, function prototypes) and need to attach it to
//! an IR module so later passes and other tools can consume it. This crate
//! models that information as a graph of descriptors keyed by opaque 128-bit
//! identifiers and serializes the graph to the module's aux-data tables.
//!
//! Identifiers substitute for pointers: descriptors never embed each other,
//! they reference table keys. That keeps cyclic graphs (`struct node { struct
//! node* next; }`) trivially representable and serializable.
//!
//! ## Quick Start
//!
//! ```rust
//! use irtypes::{ModuleTypes, MemoryStore, TypeDescriptor, TypeId};
//!
//! fn main() -> irtypes::Result<()> {
//!     let mut types = ModuleTypes::new();
//!
//!     // int32_t and a pointer to it.
//!     let int_id = TypeId::generate();
//!     let ptr_id = TypeId::generate();
//!     types.add_type(int_id, TypeDescriptor::integer(true, 32), None);
//!     types.add_type(ptr_id, TypeDescriptor::pointer(int_id), None);
//!
//!     // Persist into a module's aux-data tables.
//!     let mut store = MemoryStore::new();
//!     types.save(&mut store)?;
//!
//!     let loaded = ModuleTypes::load(&store)?;
//!     assert_eq!(loaded.table.len(), 2);
//!     Ok(())
//! }
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`TypeId`] | Opaque 128-bit identifier naming one graph node |
//! | [`TypeDescriptor`] | One node: a closed set of eleven type variants |
//! | [`TypeTable`] | The graph: identifier to descriptor, unchecked mutation |
//! | [`ModuleTypes`] | Type, name, and prototype tables of one IR module |
//! | [`Violation`] | One structural defect; errors carry all of them at once |
//!
//! ## Design
//!
//! Mutation never validates. [`validate`] is an explicit exhaustive pass that
//! reports every violation in one shot, and [`encode_table`] /
//! [`decode_table`] run it at the serialization boundary so no invalid table
//! crosses the wire in either direction.
//!
//! The wire format is fixed-layout little-endian, deterministic (entries
//! sorted by identifier bytes), and documented in [`codec`].

/// Host IR aux-table access ([`AuxTableStore`], [`ModuleTypes`]).
pub mod aux;
/// Wire serialization of the type table.
pub mod codec;
/// Type descriptors and struct fields.
pub mod descriptor;
/// C-style rendering of types for human-facing output.
pub mod display;
/// Violations and the crate error type.
pub mod error;
/// Identifiers naming graph nodes.
pub mod type_id;
/// Wire tags, one per descriptor variant.
pub mod tag;
/// The identifier-to-descriptor table.
pub mod table;
/// Structural validation.
pub mod validate;

pub(crate) mod wire;

pub use aux::{
    AuxTableStore, MemoryStore, ModuleTypes, NAME_TABLE_KEY, PROTOTYPE_TABLE_KEY, TYPE_TABLE_KEY,
};
pub use codec::{decode_table, encode_table};
pub use descriptor::{StructField, TypeDescriptor, SUPPORTED_FLOAT_WIDTHS};
pub use display::c_decl;
pub use error::{Error, Result, Violation};
pub use table::TypeTable;
pub use tag::TypeTag;
pub use type_id::TypeId;
pub use validate::{validate, violations};
