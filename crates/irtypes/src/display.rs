// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! C-style rendering of type descriptors.
//!
//! [`c_decl`] turns a graph node into a C-like declaration string for
//! human-facing output (reports, dumps, debuggers). Rendering is best-effort
//! display logic, not a C code generator: anonymous types get synthetic
//! names, unknown layouts suppress padding fillers, and cycles terminate by
//! falling back to the node's name instead of recursing forever.

use crate::aux::ModuleTypes;
use crate::descriptor::TypeDescriptor;
use crate::error::{Error, Result, Violation};
use crate::type_id::TypeId;
use std::collections::HashSet;

/// Render the type at `id` as a C-like string.
///
/// With `define: true` aggregate and alias types render as definitions
/// (`struct name { ... }`, `typedef ... name;`); with `define: false` they
/// render as references (`struct name`, the alias name). Nested types always
/// render as references, matching how C declarations nest.
///
/// Fails with `DanglingReference` when the graph refers to an identifier the
/// table does not hold.
pub fn c_decl(types: &ModuleTypes, id: TypeId, define: bool) -> Result<String> {
    let mut active = HashSet::new();
    render(types, id, id, define, &mut active)
}

fn render(
    types: &ModuleTypes,
    owner: TypeId,
    id: TypeId,
    define: bool,
    active: &mut HashSet<TypeId>,
) -> Result<String> {
    let Some(descriptor) = types.table.get(id) else {
        return Err(Error::new(Violation::DanglingReference {
            id: owner,
            missing: id,
        }));
    };

    // Cycle cut: a node already being rendered falls back to its name. Only
    // pure pointer/alias cycles reach this; struct references never recurse.
    if !active.insert(id) {
        return Ok(display_name(types, id));
    }

    let result = match descriptor {
        TypeDescriptor::Unknown => Ok("unknown_t".to_string()),
        TypeDescriptor::Void => Ok("void".to_string()),
        TypeDescriptor::Bool => Ok("bool".to_string()),
        TypeDescriptor::Int { signed, bits } => {
            let prefix = if *signed { "" } else { "u" };
            Ok(format!("{}int{}_t", prefix, bits))
        }
        TypeDescriptor::Char { bits } => {
            if *bits == 8 {
                Ok("char".to_string())
            } else {
                Ok(format!("char{}_t", bits))
            }
        }
        TypeDescriptor::Float { bits } => match bits {
            32 => Ok("float".to_string()),
            64 => Ok("double".to_string()),
            _ => Ok(format!("float{}_t", bits)),
        },
        TypeDescriptor::Pointer { pointee } => {
            let inner = render(types, id, *pointee, false, active)?;
            Ok(format!("{}*", inner))
        }
        TypeDescriptor::Array { element, count } => {
            let inner = render(types, id, *element, false, active)?;
            Ok(format!("{}[{}]", inner, count))
        }
        TypeDescriptor::Alias { target } => {
            if define {
                let inner = render(types, id, *target, false, active)?;
                Ok(format!("typedef {} {};", inner, display_name(types, id)))
            } else if let Some(name) = types.name_of(id) {
                Ok(name.to_string())
            } else {
                render(types, id, *target, false, active)
            }
        }
        TypeDescriptor::Struct { size, fields } => {
            if define {
                render_struct_body(types, id, *size, fields, active)
            } else {
                Ok(format!("struct {}", display_name(types, id)))
            }
        }
        TypeDescriptor::Function { ret, params } => {
            let ret_str = render(types, id, *ret, false, active)?;
            let mut args = Vec::with_capacity(params.len());
            for param in params {
                args.push(render(types, id, *param, false, active)?);
            }
            Ok(format!("{} (*)({})", ret_str, args.join(", ")))
        }
    };

    active.remove(&id);
    result
}

fn render_struct_body(
    types: &ModuleTypes,
    id: TypeId,
    size: u64,
    fields: &[crate::descriptor::StructField],
    active: &mut HashSet<TypeId>,
) -> Result<String> {
    let mut body = String::new();
    let mut cursor: Option<u64> = Some(0);

    for field in fields {
        // Padding filler between the previous field's known end and here.
        if let Some(loc) = cursor {
            if field.offset > loc {
                body.push_str(&format!("\tchar gap_{:x}[{}];\n", loc, field.offset - loc));
            }
        }

        let ty_str = render(types, id, field.ty, false, active)?;
        body.push_str(&format!("\t{} field_{:x};\n", ty_str, field.offset));

        cursor = byte_size(types, field.ty).and_then(|s| field.offset.checked_add(s));
    }

    // Trailing padding up to the declared size, when the last end is known.
    if let Some(loc) = cursor {
        if loc < size {
            body.push_str(&format!("\tchar gap_{:x}[{}];\n", loc, size - loc));
        }
    }

    Ok(format!("struct {} {{\n{}}}", display_name(types, id), body))
}

/// Recorded name, or a synthetic one derived from the identifier.
fn display_name(types: &ModuleTypes, id: TypeId) -> String {
    match types.name_of(id) {
        Some(name) => name.to_string(),
        None => {
            let hex = id.to_string();
            format!("t_{}", &hex[..8])
        }
    }
}

/// Byte size of a type, from stored data only. `None` when the layout is not
/// recorded (pointers, functions, unknowns), when an array's element chain
/// loops back on itself, or when a size computation overflows `u64`; no
/// layout is ever derived.
fn byte_size(types: &ModuleTypes, id: TypeId) -> Option<u64> {
    byte_size_bounded(types, id, &mut HashSet::new())
}

fn byte_size_bounded(types: &ModuleTypes, id: TypeId, seen: &mut HashSet<TypeId>) -> Option<u64> {
    // Revisit means the element chain is cyclic and the size indeterminate.
    if !seen.insert(id) {
        return None;
    }
    let resolved = types.table.resolve_alias_chain(id).ok()?;
    match resolved {
        TypeDescriptor::Bool => Some(1),
        TypeDescriptor::Int { bits, .. }
        | TypeDescriptor::Char { bits }
        | TypeDescriptor::Float { bits } => Some(bits.div_ceil(8)),
        TypeDescriptor::Struct { size, .. } => Some(*size),
        TypeDescriptor::Array { element, count } => {
            byte_size_bounded(types, *element, seen)?.checked_mul(*count)
        }
        TypeDescriptor::Void => Some(0),
        TypeDescriptor::Unknown
        | TypeDescriptor::Pointer { .. }
        | TypeDescriptor::Function { .. }
        | TypeDescriptor::Alias { .. } => None,
    }
}
