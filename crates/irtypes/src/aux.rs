// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Host IR aux-table glue.
//!
//! The host IR module exposes a generic key/value metadata mechanism; this
//! crate only ever touches three keys:
//!
//! - [`TYPE_TABLE_KEY`] — the type graph itself,
//! - [`NAME_TABLE_KEY`] — identifier to display name,
//! - [`PROTOTYPE_TABLE_KEY`] — function UUID (a host code-object id) to the
//!   identifier of that function's type.
//!
//! [`AuxTableStore`] is the narrow interface consumed from the host;
//! [`MemoryStore`] is an in-memory stand-in for tests and tools.
//! [`ModuleTypes`] bundles the three tables and moves them through a store
//! in one `load`/`save` pair. Missing tables load as empty; malformed tables
//! are errors.

use crate::codec::{decode_table, encode_table};
use crate::descriptor::TypeDescriptor;
use crate::error::{Error, Result, Violation};
use crate::table::TypeTable;
use crate::type_id::TypeId;
use crate::wire::{decode_id, decode_len, decode_str, encode_id, encode_str, encode_u64, WireError};
use std::collections::HashMap;

/// Aux-data key holding the type graph.
pub const TYPE_TABLE_KEY: &str = "typeTable";
/// Aux-data key holding identifier-to-name mappings.
pub const NAME_TABLE_KEY: &str = "typeNameTable";
/// Aux-data key mapping function UUIDs to their prototype's type identifier.
pub const PROTOTYPE_TABLE_KEY: &str = "prototypeTable";

/// Generic metadata table access on the host IR module.
///
/// The store hands out opaque byte blobs; this crate never inspects keys
/// other than its own three.
pub trait AuxTableStore {
    /// Wire bytes stored under `key`, if any.
    fn get_table(&self, key: &str) -> Option<&[u8]>;
    /// Store `data` under `key`, replacing any previous blob.
    fn set_table(&mut self, key: &str, data: Vec<u8>);
}

/// In-memory [`AuxTableStore`] for tests and standalone tools.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl AuxTableStore for MemoryStore {
    fn get_table(&self, key: &str) -> Option<&[u8]> {
        self.tables.get(key).map(Vec::as_slice)
    }

    fn set_table(&mut self, key: &str, data: Vec<u8>) {
        self.tables.insert(key.to_string(), data);
    }
}

/// The type graph of one IR module plus its name and prototype side tables.
#[derive(Debug, Clone, Default)]
pub struct ModuleTypes {
    /// The graph itself.
    pub table: TypeTable,
    names: HashMap<TypeId, String>,
    prototypes: HashMap<TypeId, TypeId>,
}

impl ModuleTypes {
    pub fn new() -> Self {
        ModuleTypes::default()
    }

    /// Load all three tables from `store`. Keys the store does not have load
    /// as empty tables, matching a module that was never annotated.
    pub fn load(store: &impl AuxTableStore) -> Result<Self> {
        let table = match store.get_table(TYPE_TABLE_KEY) {
            Some(data) => decode_table(data)?,
            None => TypeTable::new(),
        };
        let names = match store.get_table(NAME_TABLE_KEY) {
            Some(data) => decode_name_table(data)?,
            None => HashMap::new(),
        };
        let prototypes = match store.get_table(PROTOTYPE_TABLE_KEY) {
            Some(data) => decode_prototype_table(data)?,
            None => HashMap::new(),
        };
        log::debug!(
            "loaded module types: {} types, {} names, {} prototypes",
            table.len(),
            names.len(),
            prototypes.len()
        );
        Ok(ModuleTypes {
            table,
            names,
            prototypes,
        })
    }

    /// Validate and write all three tables back to `store`.
    ///
    /// Fails atomically: an invalid type table writes nothing.
    pub fn save(&self, store: &mut impl AuxTableStore) -> Result<()> {
        let type_data = encode_table(&self.table)?;
        store.set_table(TYPE_TABLE_KEY, type_data);
        store.set_table(NAME_TABLE_KEY, encode_name_table(&self.names));
        store.set_table(PROTOTYPE_TABLE_KEY, encode_prototype_table(&self.prototypes));
        Ok(())
    }

    /// Insert a type, optionally naming it. Replace semantics on both maps.
    pub fn add_type(&mut self, id: TypeId, descriptor: TypeDescriptor, name: Option<&str>) {
        self.table.insert(id, descriptor);
        if let Some(name) = name {
            self.names.insert(id, name.to_string());
        }
    }

    /// Record that the function identified by `function_uuid` in the host IR
    /// has prototype `type_id` (normally a Function descriptor).
    pub fn add_prototype(&mut self, function_uuid: TypeId, type_id: TypeId) {
        self.prototypes.insert(function_uuid, type_id);
    }

    /// Display name recorded for `id`, if any.
    pub fn name_of(&self, id: TypeId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// Prototype type recorded for a host function UUID, if any.
    pub fn prototype_of(&self, function_uuid: TypeId) -> Option<TypeId> {
        self.prototypes.get(&function_uuid).copied()
    }
}

fn wire_violation(err: WireError) -> Error {
    Error::new(Violation::MalformedPayload {
        id: None,
        detail: err.to_string(),
    })
}

fn encode_name_table(names: &HashMap<TypeId, String>) -> Vec<u8> {
    let mut entries: Vec<(&TypeId, &String)> = names.iter().collect();
    entries.sort_by_key(|(id, _)| *id.as_bytes());

    let mut buf = Vec::new();
    encode_u64(entries.len() as u64, &mut buf);
    for (id, name) in entries {
        encode_id(id, &mut buf);
        encode_str(name, &mut buf);
    }
    buf
}

fn decode_name_table(data: &[u8]) -> Result<HashMap<TypeId, String>> {
    let mut offset = 0usize;
    let count = decode_len(data, &mut offset).map_err(wire_violation)?;
    let mut names = HashMap::with_capacity(count);
    for _ in 0..count {
        let id = decode_id(data, &mut offset).map_err(wire_violation)?;
        let name = decode_str(data, &mut offset).map_err(wire_violation)?;
        names.insert(id, name);
    }
    Ok(names)
}

fn encode_prototype_table(prototypes: &HashMap<TypeId, TypeId>) -> Vec<u8> {
    let mut entries: Vec<(&TypeId, &TypeId)> = prototypes.iter().collect();
    entries.sort_by_key(|(id, _)| *id.as_bytes());

    let mut buf = Vec::new();
    encode_u64(entries.len() as u64, &mut buf);
    for (function_uuid, type_id) in entries {
        encode_id(function_uuid, &mut buf);
        encode_id(type_id, &mut buf);
    }
    buf
}

fn decode_prototype_table(data: &[u8]) -> Result<HashMap<TypeId, TypeId>> {
    let mut offset = 0usize;
    let count = decode_len(data, &mut offset).map_err(wire_violation)?;
    let mut prototypes = HashMap::with_capacity(count);
    for _ in 0..count {
        let function_uuid = decode_id(data, &mut offset).map_err(wire_violation)?;
        let type_id = decode_id(data, &mut offset).map_err(wire_violation)?;
        prototypes.insert(function_uuid, type_id);
    }
    Ok(prototypes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(byte: u8) -> TypeId {
        TypeId::from_bytes([byte; 16])
    }

    #[test]
    fn test_load_from_empty_store() {
        let store = MemoryStore::new();
        let types = ModuleTypes::load(&store).expect("missing tables load empty");
        assert!(types.table.is_empty());
        assert_eq!(types.name_of(id(1)), None);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let mut types = ModuleTypes::new();
        let int_id = id(1);
        let func_id = id(2);
        let function_uuid = id(0xf0);

        types.add_type(int_id, TypeDescriptor::integer(true, 32), Some("int"));
        types.add_type(
            func_id,
            TypeDescriptor::function(int_id, vec![int_id]),
            Some("main"),
        );
        types.add_prototype(function_uuid, func_id);

        let mut store = MemoryStore::new();
        types.save(&mut store).expect("valid tables save");
        assert!(store.get_table(TYPE_TABLE_KEY).is_some());
        assert!(store.get_table(NAME_TABLE_KEY).is_some());
        assert!(store.get_table(PROTOTYPE_TABLE_KEY).is_some());

        let loaded = ModuleTypes::load(&store).expect("loads back");
        assert_eq!(loaded.table, types.table);
        assert_eq!(loaded.name_of(int_id), Some("int"));
        assert_eq!(loaded.name_of(func_id), Some("main"));
        assert_eq!(loaded.prototype_of(function_uuid), Some(func_id));
    }

    #[test]
    fn test_save_rejects_invalid_table_atomically() {
        let mut types = ModuleTypes::new();
        types.add_type(id(1), TypeDescriptor::pointer(id(9)), None);

        let mut store = MemoryStore::new();
        assert!(types.save(&mut store).is_err());
        // Nothing written on failure.
        assert!(store.get_table(TYPE_TABLE_KEY).is_none());
        assert!(store.get_table(NAME_TABLE_KEY).is_none());
    }

    #[test]
    fn test_load_rejects_malformed_name_table() {
        let mut store = MemoryStore::new();
        store.set_table(NAME_TABLE_KEY, vec![1, 2, 3]); // not even a count
        assert!(ModuleTypes::load(&store).is_err());
    }

    #[test]
    fn test_only_known_keys_touched() {
        let mut store = MemoryStore::new();
        store.set_table("sectionTable", vec![0xde, 0xad]);

        let types = ModuleTypes::new();
        types.save(&mut store).expect("empty saves");
        assert_eq!(store.get_table("sectionTable"), Some(&[0xde, 0xad][..]));
    }
}
