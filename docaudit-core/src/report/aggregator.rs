use crate::types::*;

/// Folds per-document records and chapter verdicts into corpus-level counts.
pub struct ReportAggregator;

impl ReportAggregator {
    /// Partition evaluated documents into fully compliant and non-compliant.
    ///
    /// Skipped documents never reach this point, so they are in neither list.
    pub fn build_summary(records: &[DocumentRecord]) -> ComplianceSummary {
        let mut summary = ComplianceSummary {
            evaluated: records.len(),
            ..Default::default()
        };

        for record in records {
            if record.fully_compliant {
                summary.fully_compliant.push(record.filename.clone());
            } else {
                summary.non_compliant.push(NonCompliantDocument {
                    filename: record.filename.clone(),
                    missing: record.missing.clone(),
                });
            }
        }

        summary
    }

    pub fn build_chapter_summary(chapters: &[ClassifiedChapter]) -> ChapterSummary {
        let mut summary = ChapterSummary {
            total_chapters: chapters.len(),
            ..Default::default()
        };

        for chapter in chapters {
            match &chapter.classification {
                ChapterClassification::PartSplit { .. } => summary.part_split += 1,
                ChapterClassification::Unified { tier, .. } => match tier {
                    CoverageTier::HighCoverage => summary.unified_high_coverage += 1,
                    CoverageTier::LowCoverage => summary.unified_low_coverage += 1,
                },
                ChapterClassification::Ambiguous { .. } => summary.ambiguous += 1,
            }
        }

        summary
    }
}
