// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error reporting for type table operations.
//!
//! Wire data may come from untrusted or independently-produced files, so
//! decode and validation collect *every* violation they can reach instead of
//! stopping at the first. [`Error`] is therefore a non-empty list of
//! [`Violation`]s; single-cause failures (e.g. an alias cycle hit during
//! resolution) carry a one-element list.

use crate::type_id::TypeId;
use std::fmt;

/// One structural violation found in a table or its wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Wire data carried a variant tag outside the published range.
    UnknownVariantTag { id: TypeId, tag: u64 },
    /// Payload bytes did not match the shape its tag requires, the stream
    /// was truncated, or an entry was otherwise unparseable. `id` is absent
    /// when the damage precedes any entry.
    MalformedPayload { id: Option<TypeId>, detail: String },
    /// A descriptor references an identifier absent from the table.
    DanglingReference { id: TypeId, missing: TypeId },
    /// Struct fields are not sorted by ascending offset.
    InvalidFieldOrdering {
        id: TypeId,
        offset: u64,
        previous: u64,
    },
    /// A numeric payload field is outside its stated range (zero bit-width,
    /// unsupported float width, field offset at or past the struct size).
    OutOfRangeValue {
        id: TypeId,
        what: &'static str,
        value: u64,
    },
    /// An alias chain failed to reach a non-alias descriptor within
    /// table-size hops.
    AliasCycle { id: TypeId },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::UnknownVariantTag { id, tag } => {
                write!(f, "entry {}: unknown variant tag {}", id, tag)
            }
            Violation::MalformedPayload { id: Some(id), detail } => {
                write!(f, "entry {}: malformed payload: {}", id, detail)
            }
            Violation::MalformedPayload { id: None, detail } => {
                write!(f, "malformed payload: {}", detail)
            }
            Violation::DanglingReference { id, missing } => {
                write!(f, "entry {}: dangling reference to {}", id, missing)
            }
            Violation::InvalidFieldOrdering {
                id,
                offset,
                previous,
            } => write!(
                f,
                "entry {}: field offset {} after offset {} breaks ascending order",
                id, offset, previous
            ),
            Violation::OutOfRangeValue { id, what, value } => {
                write!(f, "entry {}: {} {} out of range", id, what, value)
            }
            Violation::AliasCycle { id } => {
                write!(f, "entry {}: alias chain does not terminate", id)
            }
        }
    }
}

/// Failure of a table operation, carrying every violation detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    violations: Vec<Violation>,
}

impl Error {
    /// Error from a single violation.
    pub fn new(violation: Violation) -> Self {
        Error {
            violations: vec![violation],
        }
    }

    /// Error from a batch of violations. Callers must pass a non-empty list.
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        debug_assert!(!violations.is_empty());
        Error { violations }
    }

    /// All violations behind this error, in detection order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type table invalid ({} violation", self.violations.len())?;
        if self.violations.len() != 1 {
            write!(f, "s")?;
        }
        write!(f, "): ")?;
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", v)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

/// Convenient alias for results using the crate [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
