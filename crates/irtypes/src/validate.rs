// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Structural validation of a type table.
//!
//! Validation is pure, idempotent, and exhaustive: one pass over the table
//! reports *all* violations found, so a decode failure or a pre-encode check
//! yields actionable diagnostics instead of a first-error guessing game.
//!
//! Checks per entry:
//! 1. every referenced identifier resolves to a key in the table,
//! 2. struct fields are offset-sorted (non-decreasing) with offsets in
//!    `[0, size)`,
//! 3. alias chains terminate at a non-alias variant within table-size hops,
//! 4. numeric payloads are in range (bit-widths > 0, supported float widths).

use crate::descriptor::{TypeDescriptor, SUPPORTED_FLOAT_WIDTHS};
use crate::error::{Error, Result, Violation};
use crate::table::TypeTable;
use crate::type_id::TypeId;

/// Check all structural invariants of `table`.
///
/// Returns `Ok(())` for a table that is safe to encode and traverse, or an
/// error listing every violation found.
pub fn validate(table: &TypeTable) -> Result<()> {
    let violations = violations(table);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(Error::from_violations(violations))
    }
}

/// Collect every violation in `table` without failing.
///
/// Detection order follows the table's iteration order and is not otherwise
/// specified; within one entry, range checks precede reference checks.
pub fn violations(table: &TypeTable) -> Vec<Violation> {
    let mut out = Vec::new();

    for (&id, descriptor) in table.iter() {
        check_ranges(id, descriptor, &mut out);
        check_references(table, id, descriptor, &mut out);

        if let TypeDescriptor::Struct { size, fields } = descriptor {
            check_field_ordering(id, *size, fields, &mut out);
        }
        if matches!(descriptor, TypeDescriptor::Alias { .. }) {
            check_alias_termination(table, id, &mut out);
        }
    }

    out
}

fn check_ranges(id: TypeId, descriptor: &TypeDescriptor, out: &mut Vec<Violation>) {
    match descriptor {
        TypeDescriptor::Int { bits, .. } => {
            if *bits == 0 {
                out.push(Violation::OutOfRangeValue {
                    id,
                    what: "int bit-width",
                    value: 0,
                });
            }
        }
        TypeDescriptor::Char { bits } => {
            if *bits == 0 {
                out.push(Violation::OutOfRangeValue {
                    id,
                    what: "char bit-width",
                    value: 0,
                });
            }
        }
        TypeDescriptor::Float { bits } => {
            if !SUPPORTED_FLOAT_WIDTHS.contains(bits) {
                out.push(Violation::OutOfRangeValue {
                    id,
                    what: "float bit-width",
                    value: *bits,
                });
            }
        }
        _ => {}
    }
}

fn check_references(
    table: &TypeTable,
    id: TypeId,
    descriptor: &TypeDescriptor,
    out: &mut Vec<Violation>,
) {
    for referenced in descriptor.references() {
        if !table.contains(referenced) {
            out.push(Violation::DanglingReference {
                id,
                missing: referenced,
            });
        }
    }
}

fn check_field_ordering(
    id: TypeId,
    size: u64,
    fields: &[crate::descriptor::StructField],
    out: &mut Vec<Violation>,
) {
    let mut previous: Option<u64> = None;
    for field in fields {
        if let Some(prev) = previous {
            if field.offset < prev {
                out.push(Violation::InvalidFieldOrdering {
                    id,
                    offset: field.offset,
                    previous: prev,
                });
            }
        }
        if field.offset >= size {
            out.push(Violation::OutOfRangeValue {
                id,
                what: "struct field offset",
                value: field.offset,
            });
        }
        previous = Some(field.offset);
    }
}

/// Walk the alias chain starting at `id`. Dangling links are already
/// reported by the reference check, so only an exhausted hop budget (a
/// cycle, by pigeonhole) adds a violation here.
fn check_alias_termination(table: &TypeTable, id: TypeId, out: &mut Vec<Violation>) {
    let mut current = id;
    for _ in 0..=table.len() {
        match table.get(current) {
            Some(TypeDescriptor::Alias { target }) => current = *target,
            _ => return,
        }
    }
    out.push(Violation::AliasCycle { id });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::StructField;

    fn id(byte: u8) -> TypeId {
        TypeId::from_bytes([byte; 16])
    }

    #[test]
    fn test_empty_table_valid() {
        assert!(validate(&TypeTable::new()).is_ok());
    }

    #[test]
    fn test_cyclic_pointer_struct_valid() {
        let mut table = TypeTable::new();
        let st = id(1);
        let ptr = id(2);
        table.insert(
            st,
            TypeDescriptor::structure(8, vec![StructField { offset: 0, ty: ptr }]),
        );
        table.insert(ptr, TypeDescriptor::pointer(st));
        assert!(validate(&table).is_ok());
    }

    #[test]
    fn test_self_pointer_valid() {
        let mut table = TypeTable::new();
        let p = id(1);
        table.insert(p, TypeDescriptor::pointer(p));
        assert!(validate(&table).is_ok());
    }

    #[test]
    fn test_dangling_pointer_reported() {
        let mut table = TypeTable::new();
        let p = id(1);
        let missing = id(9);
        table.insert(p, TypeDescriptor::pointer(missing));

        let vs = violations(&table);
        assert_eq!(vs, vec![Violation::DanglingReference { id: p, missing }]);
    }

    #[test]
    fn test_zero_bit_widths_reported() {
        let mut table = TypeTable::new();
        table.insert(id(1), TypeDescriptor::integer(true, 0));
        table.insert(id(2), TypeDescriptor::character(0));

        let mut vs = violations(&table);
        vs.sort_by_key(|v| match v {
            Violation::OutOfRangeValue { what, .. } => *what,
            _ => "",
        });
        assert_eq!(vs.len(), 2);
        assert!(matches!(
            vs[0],
            Violation::OutOfRangeValue {
                what: "char bit-width",
                ..
            }
        ));
        assert!(matches!(
            vs[1],
            Violation::OutOfRangeValue {
                what: "int bit-width",
                ..
            }
        ));
    }

    #[test]
    fn test_float_width_set() {
        let mut table = TypeTable::new();
        table.insert(id(1), TypeDescriptor::float(80));
        assert!(validate(&table).is_ok());

        table.insert(id(2), TypeDescriptor::float(48));
        let vs = violations(&table);
        assert_eq!(
            vs,
            vec![Violation::OutOfRangeValue {
                id: id(2),
                what: "float bit-width",
                value: 48,
            }]
        );
    }

    #[test]
    fn test_struct_field_ordering() {
        let mut table = TypeTable::new();
        let int_id = id(1);
        table.insert(int_id, TypeDescriptor::integer(true, 32));

        // Descending offsets: rejected.
        let bad = id(2);
        table.insert(
            bad,
            TypeDescriptor::structure(
                16,
                vec![
                    StructField { offset: 8, ty: int_id },
                    StructField { offset: 0, ty: int_id },
                ],
            ),
        );
        let vs = violations(&table);
        assert_eq!(
            vs,
            vec![Violation::InvalidFieldOrdering {
                id: bad,
                offset: 0,
                previous: 8,
            }]
        );

        // Ascending offsets with padding: accepted.
        table.insert(
            bad,
            TypeDescriptor::structure(
                16,
                vec![
                    StructField { offset: 0, ty: int_id },
                    StructField { offset: 8, ty: int_id },
                ],
            ),
        );
        assert!(validate(&table).is_ok());
    }

    #[test]
    fn test_struct_offset_past_size() {
        let mut table = TypeTable::new();
        let int_id = id(1);
        table.insert(int_id, TypeDescriptor::integer(true, 32));
        let st = id(2);
        table.insert(
            st,
            TypeDescriptor::structure(4, vec![StructField { offset: 4, ty: int_id }]),
        );
        let vs = violations(&table);
        assert_eq!(
            vs,
            vec![Violation::OutOfRangeValue {
                id: st,
                what: "struct field offset",
                value: 4,
            }]
        );
    }

    #[test]
    fn test_alias_cycle_reported_per_member() {
        let mut table = TypeTable::new();
        let a = id(1);
        let b = id(2);
        table.insert(a, TypeDescriptor::alias(b));
        table.insert(b, TypeDescriptor::alias(a));

        let mut vs = violations(&table);
        vs.sort_by_key(|v| match v {
            Violation::AliasCycle { id } => *id.as_bytes(),
            _ => [0xff; 16],
        });
        assert_eq!(
            vs,
            vec![
                Violation::AliasCycle { id: a },
                Violation::AliasCycle { id: b }
            ]
        );
    }

    #[test]
    fn test_alias_chain_ok() {
        let mut table = TypeTable::new();
        let a = id(1);
        let b = id(2);
        table.insert(a, TypeDescriptor::alias(b));
        table.insert(b, TypeDescriptor::integer(false, 8));
        assert!(validate(&table).is_ok());
    }

    #[test]
    fn test_all_violations_in_one_pass() {
        let mut table = TypeTable::new();
        table.insert(id(1), TypeDescriptor::integer(true, 0));
        table.insert(id(2), TypeDescriptor::pointer(id(9)));
        table.insert(id(3), TypeDescriptor::alias(id(3)));

        let vs = violations(&table);
        assert_eq!(vs.len(), 3);
    }
}
