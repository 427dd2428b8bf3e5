// Source abstraction for document text
//
// This module defines the boundary between obtaining documents (disk, memory,
// anything else) and evaluating them. Everything after this point works with
// plain text and is storage-agnostic.

use crate::error::AuditError;
use anyhow::Result;

const BOM: char = '\u{FEFF}';

/// DocumentSource trait - turns identifiers into document text
///
/// Implementations must release whatever they acquire for a read (file
/// handles, buffers) before `read` returns, on success and on failure.
pub trait DocumentSource {
    /// Read one document as text.
    ///
    /// Errors with `AuditError::NotFound` when the identifier has no source and
    /// `AuditError::Decode` when the bytes are not UTF-8 text.
    fn read(&self, identifier: &str) -> Result<String, AuditError>;

    /// List the identifiers this source can serve, sorted.
    fn discover(&self) -> Result<Vec<String>>;

    /// Get source name for debugging/logging
    fn name(&self) -> &str;
}

/// Decode raw bytes as UTF-8, dropping a leading byte-order mark.
pub fn decode_text(identifier: &str, bytes: Vec<u8>) -> Result<String, AuditError> {
    let text = String::from_utf8(bytes).map_err(|e| AuditError::Decode {
        identifier: identifier.to_string(),
        reason: e.utf8_error().to_string(),
    })?;

    match text.strip_prefix(BOM) {
        Some(stripped) => Ok(stripped.to_string()),
        None => Ok(text),
    }
}
