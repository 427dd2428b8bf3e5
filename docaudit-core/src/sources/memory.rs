use super::source::{decode_text, DocumentSource};
use crate::error::AuditError;
use anyhow::Result;
use std::collections::BTreeMap;

/// Documents held in memory, keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: BTreeMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, identifier: &str, text: &str) -> Self {
        self.insert(identifier, text.as_bytes().to_vec());
        self
    }

    pub fn with_bytes(mut self, identifier: &str, bytes: &[u8]) -> Self {
        self.insert(identifier, bytes.to_vec());
        self
    }

    pub fn insert(&mut self, identifier: &str, bytes: Vec<u8>) {
        self.documents.insert(identifier.to_string(), bytes);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentSource for MemorySource {
    fn read(&self, identifier: &str) -> Result<String, AuditError> {
        let bytes = self
            .documents
            .get(identifier)
            .ok_or_else(|| AuditError::NotFound {
                identifier: identifier.to_string(),
            })?;
        decode_text(identifier, bytes.clone())
    }

    fn discover(&self) -> Result<Vec<String>> {
        Ok(self.documents.keys().cloned().collect())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
