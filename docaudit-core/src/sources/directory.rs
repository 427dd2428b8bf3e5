use super::source::{decode_text, DocumentSource};
use crate::error::AuditError;
use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const EXTENSION: &str = "md";

/// Markdown documents under one directory; identifiers are paths relative to it.
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, identifier: &str) -> PathBuf {
        self.root.join(identifier)
    }
}

impl DocumentSource for DirectorySource {
    fn read(&self, identifier: &str) -> Result<String, AuditError> {
        let path = self.path_for(identifier);

        // fs::read owns the handle for the duration of the call only
        let bytes = fs::read(&path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => AuditError::NotFound {
                identifier: identifier.to_string(),
            },
            _ => AuditError::Io {
                identifier: identifier.to_string(),
                source,
            },
        })?;

        decode_text(identifier, bytes)
    }

    fn discover(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root)
            .with_context(|| format!("Failed to list {}", self.root.display()))?;

        let mut identifiers = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let matches_extension = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext == EXTENSION);
            if !path.is_file() || !matches_extension {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                identifiers.push(name.to_string());
            }
        }

        identifiers.sort();
        Ok(identifiers)
    }

    fn name(&self) -> &str {
        "directory"
    }
}
