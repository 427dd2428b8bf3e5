pub mod aggregator;
pub mod serialization;

// Re-export for easy access
pub use aggregator::ReportAggregator;

use crate::types::*;
use chrono::Utc;
use uuid::Uuid;

impl ComplianceReport {
    /// Assemble the report for one run. Records keep their evaluation order.
    pub fn build(
        records: Vec<DocumentRecord>,
        chapters: Vec<ClassifiedChapter>,
        skipped: Vec<SkippedDocument>,
        schema_fingerprint: String,
    ) -> Self {
        let summary = ReportAggregator::build_summary(&records);
        let chapter_summary = ReportAggregator::build_chapter_summary(&chapters);

        Self {
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            schema_fingerprint,
            records,
            summary,
            chapters,
            chapter_summary,
            skipped,
        }
    }
}
