// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Low-level wire primitives for aux-data table payloads.
//!
//! All multi-byte integers are little-endian; identifiers are 16 raw bytes;
//! sequences are length-prefixed with a `u64` count. Decoding tracks an
//! explicit offset through the input slice and never reads past it.
//!
//! These helpers are deliberately dumb: shape and range checking belong to
//! the codec and the validator, not here.

use std::fmt;

/// Maximum accepted sequence length, to stop allocation bombs from malformed
/// input. 1M elements is far beyond any legitimate type table.
pub(crate) const MAX_SEQUENCE_LENGTH: u64 = 1_000_000;

/// Low-level wire failure. Converted into a
/// [`Violation`](crate::error::Violation) at the codec boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum WireError {
    /// Input ended before the value at `offset` could be read.
    UnexpectedEof { offset: usize },
    /// A sequence length prefix exceeded [`MAX_SEQUENCE_LENGTH`].
    SequenceTooLong { len: u64 },
    /// String bytes starting at `offset` are not valid UTF-8.
    InvalidUtf8 { offset: usize },
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireError::UnexpectedEof { offset } => {
                write!(f, "unexpected end of input at offset {}", offset)
            }
            WireError::SequenceTooLong { len } => {
                write!(
                    f,
                    "sequence length {} exceeds maximum allowed ({})",
                    len, MAX_SEQUENCE_LENGTH
                )
            }
            WireError::InvalidUtf8 { offset } => {
                write!(f, "invalid utf-8 string data at offset {}", offset)
            }
        }
    }
}

impl std::error::Error for WireError {}

// ============================================================================
// Encoding
// ============================================================================

pub(crate) fn encode_u8(value: u8, dst: &mut Vec<u8>) {
    dst.push(value);
}

pub(crate) fn encode_u64(value: u64, dst: &mut Vec<u8>) {
    dst.extend_from_slice(&value.to_le_bytes());
}

pub(crate) fn encode_bool(value: bool, dst: &mut Vec<u8>) {
    encode_u8(u8::from(value), dst);
}

pub(crate) fn encode_id(id: &crate::TypeId, dst: &mut Vec<u8>) {
    dst.extend_from_slice(id.as_bytes());
}

pub(crate) fn encode_str(value: &str, dst: &mut Vec<u8>) {
    encode_u64(value.len() as u64, dst);
    dst.extend_from_slice(value.as_bytes());
}

// ============================================================================
// Decoding
// ============================================================================

pub(crate) fn decode_u8(src: &[u8], offset: &mut usize) -> Result<u8, WireError> {
    if *offset >= src.len() {
        return Err(WireError::UnexpectedEof { offset: *offset });
    }
    let value = src[*offset];
    *offset += 1;
    Ok(value)
}

pub(crate) fn decode_u64(src: &[u8], offset: &mut usize) -> Result<u64, WireError> {
    if *offset + 8 > src.len() {
        return Err(WireError::UnexpectedEof { offset: *offset });
    }
    let bytes = src[*offset..*offset + 8]
        .try_into()
        .map_err(|_| WireError::UnexpectedEof { offset: *offset })?;
    *offset += 8;
    Ok(u64::from_le_bytes(bytes))
}

pub(crate) fn decode_bool(src: &[u8], offset: &mut usize) -> Result<bool, WireError> {
    Ok(decode_u8(src, offset)? != 0)
}

pub(crate) fn decode_id(src: &[u8], offset: &mut usize) -> Result<crate::TypeId, WireError> {
    if *offset + 16 > src.len() {
        return Err(WireError::UnexpectedEof { offset: *offset });
    }
    let bytes: [u8; 16] = src[*offset..*offset + 16]
        .try_into()
        .map_err(|_| WireError::UnexpectedEof { offset: *offset })?;
    *offset += 16;
    Ok(crate::TypeId::from_bytes(bytes))
}

/// Decode a `u64` length prefix, bounded by [`MAX_SEQUENCE_LENGTH`].
pub(crate) fn decode_len(src: &[u8], offset: &mut usize) -> Result<usize, WireError> {
    let len = decode_u64(src, offset)?;
    if len > MAX_SEQUENCE_LENGTH {
        return Err(WireError::SequenceTooLong { len });
    }
    Ok(len as usize)
}

pub(crate) fn decode_str(src: &[u8], offset: &mut usize) -> Result<String, WireError> {
    let len = decode_len(src, offset)?;
    if *offset + len > src.len() {
        return Err(WireError::UnexpectedEof { offset: *offset });
    }
    let bytes = src[*offset..*offset + len].to_vec();
    *offset += len;
    // Reported at the offset of the string body.
    String::from_utf8(bytes).map_err(|_| WireError::InvalidUtf8 { offset: *offset - len })
}
