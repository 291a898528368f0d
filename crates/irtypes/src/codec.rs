// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec between a [`TypeTable`] and its aux-data wire form.
//!
//! Wire layout (all integers little-endian):
//!
//! ```text
//! u64 entry-count
//! per entry:
//!   16-byte identifier
//!   u64 variant tag            (see TypeTag; published, frozen)
//!   payload, fixed shape per tag:
//!     Unknown/Bool/Void  -> (empty)
//!     Int                -> u8 signed, u64 bit-width
//!     Char               -> u64 bit-width
//!     Float              -> u64 bit-width
//!     Function           -> 16-byte return id, u64 count, count * 16-byte id
//!     Pointer            -> 16-byte pointee id
//!     Array              -> 16-byte element id, u64 count
//!     Struct             -> u64 size, u64 count, count * (u64 offset, 16-byte id)
//!     Alias              -> 16-byte target id
//! ```
//!
//! Identifiers inside payloads stay raw: the table is flat and descriptors
//! are never nested inline, which is what lets cyclic graphs serialize at
//! all. Encoding sorts entries by identifier bytes so output is
//! deterministic for a given table.
//!
//! Sequence counts (entries, function parameters, struct fields) are part of
//! the wire contract and capped at 1,000,000 in both directions: encode
//! rejects what decode would refuse to read, so round-trip never breaks
//! silently at the cap.
//!
//! Decoding is one linear pass that never chases references; resolvability
//! and the other graph invariants are the validator's job, which runs before
//! any table is handed back. No partial table is ever returned.

use crate::descriptor::{StructField, TypeDescriptor};
use crate::error::{Error, Result, Violation};
use crate::table::TypeTable;
use crate::tag::TypeTag;
use crate::type_id::TypeId;
use crate::validate;
use crate::wire::{
    decode_bool, decode_id, decode_len, decode_u64, encode_bool, encode_id, encode_u64, WireError,
    MAX_SEQUENCE_LENGTH,
};

/// Encode `table` into aux-data wire bytes.
///
/// Validates first and fails atomically: on any violation no wire output is
/// produced. For a table that passes [`validate`](crate::validate::validate)
/// this never fails.
pub fn encode_table(table: &TypeTable) -> Result<Vec<u8>> {
    validate::validate(table)?;

    let mut entries: Vec<(&TypeId, &TypeDescriptor)> = table.iter().collect();
    entries.sort_by_key(|(id, _)| *id.as_bytes());

    if entries.len() as u64 > MAX_SEQUENCE_LENGTH {
        return Err(Error::new(wire_violation(
            None,
            WireError::SequenceTooLong {
                len: entries.len() as u64,
            },
        )));
    }

    let mut buf = Vec::new();
    encode_u64(entries.len() as u64, &mut buf);
    for (id, descriptor) in entries {
        if let Some(len) = oversized_sequence(descriptor) {
            return Err(Error::new(wire_violation(
                Some(*id),
                WireError::SequenceTooLong { len },
            )));
        }
        encode_id(id, &mut buf);
        encode_u64(descriptor.tag().to_u64(), &mut buf);
        encode_payload(descriptor, &mut buf);
    }

    log::debug!(
        "encoded type table: {} entries, {} bytes",
        table.len(),
        buf.len()
    );
    Ok(buf)
}

/// Decode aux-data wire bytes into a [`TypeTable`].
///
/// Rejects unknown tags and malformed payloads, then validates the
/// reconstructed graph. Every violation reachable before the stream becomes
/// unparseable is collected and reported together; a truncated stream or an
/// unknown tag (whose payload size cannot be known) aborts the scan with
/// everything found so far.
pub fn decode_table(data: &[u8]) -> Result<TypeTable> {
    let mut violations = Vec::new();
    let mut table = TypeTable::new();
    let mut offset = 0usize;

    match decode_entries(data, &mut offset, &mut table, &mut violations) {
        Ok(()) => {
            if offset != data.len() {
                violations.push(Violation::MalformedPayload {
                    id: None,
                    detail: format!("{} trailing bytes after last entry", data.len() - offset),
                });
            }
        }
        Err(fatal) => violations.push(fatal),
    }

    violations.extend(validate::violations(&table));

    if violations.is_empty() {
        log::debug!(
            "decoded type table: {} entries from {} bytes",
            table.len(),
            data.len()
        );
        Ok(table)
    } else {
        log::warn!(
            "rejecting type table wire data: {} violation(s)",
            violations.len()
        );
        Err(Error::from_violations(violations))
    }
}

fn encode_payload(descriptor: &TypeDescriptor, buf: &mut Vec<u8>) {
    match descriptor {
        TypeDescriptor::Unknown | TypeDescriptor::Void | TypeDescriptor::Bool => {}
        TypeDescriptor::Int { signed, bits } => {
            encode_bool(*signed, buf);
            encode_u64(*bits, buf);
        }
        TypeDescriptor::Char { bits } | TypeDescriptor::Float { bits } => {
            encode_u64(*bits, buf);
        }
        TypeDescriptor::Function { ret, params } => {
            encode_id(ret, buf);
            encode_u64(params.len() as u64, buf);
            for param in params {
                encode_id(param, buf);
            }
        }
        TypeDescriptor::Pointer { pointee } => encode_id(pointee, buf),
        TypeDescriptor::Array { element, count } => {
            encode_id(element, buf);
            encode_u64(*count, buf);
        }
        TypeDescriptor::Struct { size, fields } => {
            encode_u64(*size, buf);
            encode_u64(fields.len() as u64, buf);
            for field in fields {
                encode_u64(field.offset, buf);
                encode_id(&field.ty, buf);
            }
        }
        TypeDescriptor::Alias { target } => encode_id(target, buf),
    }
}

/// Scan all entries. Returns `Err` only for conditions that make the rest of
/// the stream unreadable (truncation, unknown tag, oversized sequence).
fn decode_entries(
    data: &[u8],
    offset: &mut usize,
    table: &mut TypeTable,
    violations: &mut Vec<Violation>,
) -> core::result::Result<(), Violation> {
    let count = decode_len(data, offset).map_err(|e| wire_violation(None, e))?;

    for _ in 0..count {
        let id = decode_id(data, offset).map_err(|e| wire_violation(None, e))?;
        let raw_tag = decode_u64(data, offset).map_err(|e| wire_violation(Some(id), e))?;

        let Some(tag) = TypeTag::from_u64(raw_tag) else {
            // The payload shape is unknown, so the stream cannot be resynced.
            return Err(Violation::UnknownVariantTag { id, tag: raw_tag });
        };

        let descriptor =
            decode_payload(tag, data, offset).map_err(|e| wire_violation(Some(id), e))?;

        if table.insert(id, descriptor).is_some() {
            violations.push(Violation::MalformedPayload {
                id: Some(id),
                detail: "duplicate identifier".into(),
            });
        }
    }

    Ok(())
}

fn decode_payload(
    tag: TypeTag,
    data: &[u8],
    offset: &mut usize,
) -> core::result::Result<TypeDescriptor, WireError> {
    let descriptor = match tag {
        TypeTag::Unknown => TypeDescriptor::Unknown,
        TypeTag::Void => TypeDescriptor::Void,
        TypeTag::Bool => TypeDescriptor::Bool,
        TypeTag::Int => {
            let signed = decode_bool(data, offset)?;
            let bits = decode_u64(data, offset)?;
            TypeDescriptor::Int { signed, bits }
        }
        TypeTag::Char => TypeDescriptor::Char {
            bits: decode_u64(data, offset)?,
        },
        TypeTag::Float => TypeDescriptor::Float {
            bits: decode_u64(data, offset)?,
        },
        TypeTag::Function => {
            let ret = decode_id(data, offset)?;
            let count = decode_len(data, offset)?;
            let mut params = Vec::with_capacity(count);
            for _ in 0..count {
                params.push(decode_id(data, offset)?);
            }
            TypeDescriptor::Function { ret, params }
        }
        TypeTag::Pointer => TypeDescriptor::Pointer {
            pointee: decode_id(data, offset)?,
        },
        TypeTag::Array => {
            let element = decode_id(data, offset)?;
            let count = decode_u64(data, offset)?;
            TypeDescriptor::Array { element, count }
        }
        TypeTag::Struct => {
            let size = decode_u64(data, offset)?;
            let count = decode_len(data, offset)?;
            let mut fields = Vec::with_capacity(count);
            for _ in 0..count {
                let field_offset = decode_u64(data, offset)?;
                let ty = decode_id(data, offset)?;
                fields.push(StructField {
                    offset: field_offset,
                    ty,
                });
            }
            TypeDescriptor::Struct { size, fields }
        }
        TypeTag::Alias => TypeDescriptor::Alias {
            target: decode_id(data, offset)?,
        },
    };
    Ok(descriptor)
}

/// Length of a descriptor's embedded sequence when it exceeds the wire cap.
fn oversized_sequence(descriptor: &TypeDescriptor) -> Option<u64> {
    let len = match descriptor {
        TypeDescriptor::Function { params, .. } => params.len() as u64,
        TypeDescriptor::Struct { fields, .. } => fields.len() as u64,
        _ => return None,
    };
    (len > MAX_SEQUENCE_LENGTH).then_some(len)
}

fn wire_violation(id: Option<TypeId>, err: WireError) -> Violation {
    Violation::MalformedPayload {
        id,
        detail: err.to_string(),
    }
}
