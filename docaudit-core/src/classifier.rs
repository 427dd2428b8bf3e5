use crate::config::ChapterConfig;
use crate::error::AuditError;
use crate::types::*;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Chapter numbering and part-indicator conventions embedded in filenames.
#[derive(Debug, Clone)]
pub struct FilenameConvention {
    number: Regex,
    part: Regex,
}

impl FilenameConvention {
    pub fn new(config: &ChapterConfig) -> Result<Self, AuditError> {
        let number = Regex::new(&config.number_pattern)
            .map_err(|e| AuditError::schema("chapter.number_pattern", e.to_string()))?;
        let part = Regex::new(&config.part_pattern)
            .map_err(|e| AuditError::schema("chapter.part_pattern", e.to_string()))?;
        Ok(Self { number, part })
    }

    /// Chapter number from the leading digits of the file name; 0 when absent
    /// or too large to represent.
    pub fn chapter_number(&self, identifier: &str) -> u32 {
        self.number
            .captures(file_name(identifier))
            .and_then(|caps| caps.get(1))
            .and_then(|digits| digits.as_str().parse().ok())
            .unwrap_or(0)
    }

    pub fn is_part(&self, identifier: &str) -> bool {
        self.part.is_match(file_name(identifier))
    }
}

fn file_name(identifier: &str) -> &str {
    Path::new(identifier)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(identifier)
}

/// Records sharing one chapter number, ordered by filename.
#[derive(Debug, Clone)]
pub struct ChapterGroup<'a> {
    pub chapter: u32,
    pub documents: Vec<&'a DocumentRecord>,
}

impl<'a> ChapterGroup<'a> {
    pub fn has_parts(&self) -> bool {
        self.documents.iter().any(|record| record.is_part)
    }
}

pub struct ChapterClassifier {
    high_coverage_threshold: u32,
}

impl Default for ChapterClassifier {
    fn default() -> Self {
        Self::new(&ChapterConfig::default())
    }
}

impl ChapterClassifier {
    pub fn new(config: &ChapterConfig) -> Self {
        Self {
            high_coverage_threshold: config.high_coverage_threshold,
        }
    }

    /// Bucket records by chapter number, ascending. Unnumbered files share chapter 0.
    pub fn group(records: &[DocumentRecord]) -> Vec<ChapterGroup<'_>> {
        let mut buckets: BTreeMap<u32, Vec<&DocumentRecord>> = BTreeMap::new();
        for record in records {
            buckets.entry(record.chapter).or_default().push(record);
        }

        buckets
            .into_iter()
            .map(|(chapter, mut documents)| {
                documents.sort_by(|a, b| a.filename.cmp(&b.filename));
                ChapterGroup { chapter, documents }
            })
            .collect()
    }

    pub fn classify(&self, group: &ChapterGroup<'_>) -> ChapterClassification {
        if group.has_parts() {
            // Split chapters only get per-file counts, never a chapter verdict
            let files = group
                .documents
                .iter()
                .map(|record| PartCoverage {
                    filename: record.filename.clone(),
                    satisfied: record.coverage.satisfied,
                    total: record.coverage.total,
                    missing: record.coverage.missing.clone(),
                })
                .collect();
            return ChapterClassification::PartSplit { files };
        }

        match group.documents.as_slice() {
            [record] => {
                let coverage = record.coverage.satisfied;
                let tier = if coverage >= self.high_coverage_threshold {
                    CoverageTier::HighCoverage
                } else {
                    CoverageTier::LowCoverage
                };
                ChapterClassification::Unified {
                    filename: record.filename.clone(),
                    coverage,
                    total: record.coverage.total,
                    tier,
                    missing: record.coverage.missing.clone(),
                }
            }
            documents => ChapterClassification::Ambiguous {
                filenames: documents.iter().map(|r| r.filename.clone()).collect(),
            },
        }
    }

    pub fn classify_all(&self, records: &[DocumentRecord]) -> Vec<ClassifiedChapter> {
        Self::group(records)
            .iter()
            .map(|group| {
                let classification = self.classify(group);
                debug!(
                    "📋 Chapter {:02}: {} ({} file(s))",
                    group.chapter,
                    classification.tag(),
                    group.documents.len()
                );
                ClassifiedChapter {
                    chapter: group.chapter,
                    classification,
                }
            })
            .collect()
    }
}
