// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// End-to-end exercises of the public API: build a graph, persist it through
// a store, read it back, check it is the same graph.

use irtypes::{
    c_decl, decode_table, encode_table, validate, AuxTableStore, MemoryStore, ModuleTypes,
    StructField, TypeDescriptor, TypeId, TypeTable, Violation, TYPE_TABLE_KEY,
};

fn id(byte: u8) -> TypeId {
    TypeId::from_bytes([byte; 16])
}

#[test]
fn test_linked_list_roundtrip() {
    // struct node { int32_t value; struct node* next; }
    let int_id = TypeId::generate();
    let node_id = TypeId::generate();
    let next_id = TypeId::generate();

    let mut table = TypeTable::new();
    table.insert(int_id, TypeDescriptor::integer(true, 32));
    table.insert(
        node_id,
        TypeDescriptor::structure(
            16,
            vec![
                StructField { offset: 0, ty: int_id },
                StructField { offset: 8, ty: next_id },
            ],
        ),
    );
    table.insert(next_id, TypeDescriptor::pointer(node_id));

    validate(&table).expect("cyclic graph is structurally valid");

    let wire = encode_table(&table).expect("encodes");
    let decoded = decode_table(&wire).expect("decodes");
    assert_eq!(decoded, table);

    // Decode is deterministic too: re-encoding gives identical bytes.
    let wire2 = encode_table(&decoded).expect("re-encodes");
    assert_eq!(wire, wire2);
}

#[test]
fn test_module_types_through_store() {
    let mut types = ModuleTypes::new();

    let int_id = TypeId::generate();
    let ptr_id = TypeId::generate();
    let func_id = TypeId::generate();
    let function_uuid = TypeId::generate();

    types.add_type(int_id, TypeDescriptor::integer(false, 64), Some("uint64_t"));
    types.add_type(ptr_id, TypeDescriptor::pointer(int_id), None);
    types.add_type(
        func_id,
        TypeDescriptor::function(int_id, vec![ptr_id]),
        Some("checksum"),
    );
    types.add_prototype(function_uuid, func_id);

    let mut store = MemoryStore::new();
    types.save(&mut store).expect("valid module saves");

    let loaded = ModuleTypes::load(&store).expect("loads back");
    assert_eq!(loaded.table, types.table);
    assert_eq!(loaded.name_of(func_id), Some("checksum"));
    assert_eq!(loaded.prototype_of(function_uuid), Some(func_id));

    assert_eq!(
        c_decl(&loaded, func_id, true).expect("renders"),
        "uint64_t (*)(uint64_t*)"
    );
}

#[test]
fn test_remove_then_save_fails_without_cascade() {
    let mut types = ModuleTypes::new();
    let int_id = id(1);
    let ptr_id = id(2);
    types.add_type(int_id, TypeDescriptor::integer(true, 32), None);
    types.add_type(ptr_id, TypeDescriptor::pointer(int_id), None);

    // Removal succeeds immediately; the dangling pointer surfaces at save.
    assert!(types.table.remove(int_id).is_some());

    let mut store = MemoryStore::new();
    let err = types.save(&mut store).expect_err("dangling reference");
    assert_eq!(
        err.violations(),
        &[Violation::DanglingReference {
            id: ptr_id,
            missing: int_id,
        }]
    );
    assert!(store.get_table(TYPE_TABLE_KEY).is_none());
}

#[test]
fn test_corrupt_store_returns_no_partial_table() {
    let mut types = ModuleTypes::new();
    types.add_type(id(1), TypeDescriptor::integer(true, 32), None);
    types.add_type(id(2), TypeDescriptor::boolean(), None);

    let mut store = MemoryStore::new();
    types.save(&mut store).expect("saves");

    // Chop the blob mid-entry.
    let blob = store.get_table(TYPE_TABLE_KEY).unwrap().to_vec();
    store.set_table(TYPE_TABLE_KEY, blob[..blob.len() - 3].to_vec());

    assert!(ModuleTypes::load(&store).is_err());
}

#[test]
fn test_randomized_tables_roundtrip() {
    fastrand::seed(0x1a2b_3c4d);

    for _ in 0..50 {
        let table = random_table();
        let wire = encode_table(&table).expect("generated tables are valid");
        let decoded = decode_table(&wire).expect("decodes");
        assert_eq!(decoded, table);
    }
}

/// A random structurally-valid table: scalars first, then reference types
/// pointing only at already-present entries.
fn random_table() -> TypeTable {
    let mut table = TypeTable::new();
    let mut ids = Vec::new();

    for _ in 0..fastrand::usize(1..8) {
        let id = TypeId::generate();
        let descriptor = match fastrand::u8(0..5) {
            0 => TypeDescriptor::integer(fastrand::bool(), 8 << fastrand::u64(0..4)),
            1 => TypeDescriptor::boolean(),
            2 => TypeDescriptor::character(8),
            3 => TypeDescriptor::float([32u64, 64, 80, 128][fastrand::usize(0..4)]),
            _ => TypeDescriptor::void(),
        };
        table.insert(id, descriptor);
        ids.push(id);
    }

    for _ in 0..fastrand::usize(0..8) {
        let pick = |ids: &[TypeId]| ids[fastrand::usize(0..ids.len())];
        let id = TypeId::generate();
        let descriptor = match fastrand::u8(0..4) {
            0 => TypeDescriptor::pointer(pick(&ids)),
            1 => TypeDescriptor::array(pick(&ids), fastrand::u64(0..16)),
            2 => TypeDescriptor::alias(pick(&ids)),
            _ => {
                let params = (0..fastrand::usize(0..4)).map(|_| pick(&ids)).collect();
                TypeDescriptor::function(pick(&ids), params)
            }
        };
        table.insert(id, descriptor);
        ids.push(id);
    }

    table
}
