// Docaudit Core Library
//
// Checks Markdown documents against a configurable checklist schema.
// Main interface for turning a document corpus into a compliance report.

pub mod types;
pub mod error;
pub mod sources;
pub mod processor;
pub mod report;
pub mod config;
pub mod rules;
pub mod classifier;

// Re-export main types and functions for easy use
pub use types::*;
pub use error::AuditError;
pub use sources::{DirectorySource, DocumentSource, MemorySource};
pub use processor::{AuditProcessor, StepProfiler};
pub use report::ReportAggregator;
pub use config::{AuditConfig, ChapterConfig, RuleConfig, RuleScope};
pub use rules::RuleEngine;
pub use classifier::{ChapterClassifier, FilenameConvention};
