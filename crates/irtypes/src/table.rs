// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The type table: sole owner of all descriptors in one graph.
//!
//! A [`TypeTable`] maps identifiers to descriptors. References between
//! descriptors are identifiers, so graphs may be cyclic and entries can be
//! inserted in any order; nothing is checked on mutation. Validation is an
//! explicit pass ([`validate`](crate::validate::validate)) or implied by
//! [`encode_table`](crate::codec::encode_table) /
//! [`decode_table`](crate::codec::decode_table).
//!
//! The table is a plain in-memory value: no interior locking, no background
//! work. Read operations take `&self` and may run concurrently; mutation
//! requires `&mut self` and therefore an exclusive borrow.

use crate::descriptor::TypeDescriptor;
use crate::error::{Error, Result, Violation};
use crate::type_id::TypeId;
use std::collections::{HashMap, HashSet};

/// Mapping from [`TypeId`] to [`TypeDescriptor`]; the type graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeTable {
    entries: HashMap<TypeId, TypeDescriptor>,
}

impl TypeTable {
    /// Create an empty table.
    pub fn new() -> Self {
        TypeTable::default()
    }

    /// Add or replace the descriptor for `id`.
    ///
    /// The descriptor's internal references need not resolve yet; forward and
    /// even self references are how cyclic graphs get built. Returns the
    /// previous descriptor when replacing.
    pub fn insert(&mut self, id: TypeId, descriptor: TypeDescriptor) -> Option<TypeDescriptor> {
        self.entries.insert(id, descriptor)
    }

    /// Look up the descriptor stored for `id`. Never follows references.
    pub fn get(&self, id: TypeId) -> Option<&TypeDescriptor> {
        self.entries.get(&id)
    }

    /// Delete the entry for `id` without cascading. References left dangling
    /// by removal surface at validation or encode time, not here.
    pub fn remove(&mut self, id: TypeId) -> Option<TypeDescriptor> {
        self.entries.remove(&id)
    }

    /// Whether `id` has an entry.
    pub fn contains(&self, id: TypeId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&TypeId, &TypeDescriptor)> {
        self.entries.iter()
    }

    /// Iterate over all identifiers in unspecified order.
    pub fn ids(&self) -> impl Iterator<Item = &TypeId> {
        self.entries.keys()
    }

    /// Follow alias links from `id` until a non-alias descriptor is reached.
    ///
    /// The walk is bounded by the table size: visiting more identifiers than
    /// the table holds proves a cycle by pigeonhole, so termination is
    /// guaranteed even on adversarial input. A missing link fails with
    /// `DanglingReference`, an unterminated chain with `AliasCycle`.
    pub fn resolve_alias_chain(&self, id: TypeId) -> Result<&TypeDescriptor> {
        let mut current = id;
        for _ in 0..=self.len() {
            match self.get(current) {
                None => {
                    return Err(Error::new(Violation::DanglingReference {
                        id,
                        missing: current,
                    }))
                }
                Some(TypeDescriptor::Alias { target }) => current = *target,
                Some(concrete) => return Ok(concrete),
            }
        }
        Err(Error::new(Violation::AliasCycle { id }))
    }

    /// Visit every distinct identifier reachable from `start`, exactly once
    /// each, in depth-first preorder.
    ///
    /// Cycle-safe: a visited set keyed by identifier caps the walk regardless
    /// of how many edges reach a node. Edges are followed in each variant's
    /// declared order (function return then parameters, struct fields in
    /// field order). References to identifiers absent from the table are
    /// skipped; reporting them is the validator's job.
    pub fn traverse<F>(&self, start: TypeId, mut visitor: F)
    where
        F: FnMut(TypeId, &TypeDescriptor),
    {
        let mut visited: HashSet<TypeId> = HashSet::new();
        let mut stack = vec![start];

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let Some(descriptor) = self.get(id) else {
                continue;
            };
            visitor(id, descriptor);

            // Push in reverse so declared order pops first.
            let refs = descriptor.references();
            for next in refs.into_iter().rev() {
                if !visited.contains(&next) {
                    stack.push(next);
                }
            }
        }
    }
}
