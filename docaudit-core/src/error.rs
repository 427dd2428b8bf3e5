use thiserror::Error;

/// Failures the audit engine can report.
///
/// `NotFound` and `Decode` are per-document: the processor downgrades them into
/// skip entries and keeps going. `SchemaConfig` means the tool itself is
/// misconfigured and aborts the run before any document is evaluated.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("document not found: {identifier}")]
    NotFound { identifier: String },

    #[error("document {identifier} is not valid UTF-8 text: {reason}")]
    Decode { identifier: String, reason: String },

    #[error("invalid checklist schema (rule '{rule}'): {reason}")]
    SchemaConfig { rule: String, reason: String },

    #[error("failed to read {identifier}")]
    Io {
        identifier: String,
        #[source]
        source: std::io::Error,
    },
}

impl AuditError {
    pub fn schema(rule: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SchemaConfig {
            rule: rule.into(),
            reason: reason.into(),
        }
    }
}
