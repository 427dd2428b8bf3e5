use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// The schema version stamped on every report.
/// Bump this when the report shape changes.
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

// ===== PER-DOCUMENT RECORDS =====

/// Compliance record for one document.
///
/// Built once by `RuleEngine::evaluate` as a pure function of the document text
/// and the schema. Maps are ordered so two evaluations of the same input
/// serialize identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub filename: String,
    /// Leading digits of the filename, 0 when there are none
    pub chapter: u32,
    /// Filename carries a part indicator (e.g. `Part1`)
    pub is_part: bool,
    /// SHA-256 of the evaluated text
    pub content_digest: String,
    /// rule id -> marker found
    pub presence: BTreeMap<String, bool>,
    /// rule id -> nested items inside the rule's scope (rules with an item pattern only)
    pub counts: BTreeMap<String, u32>,
    /// "<rule id>.<tally>" -> informational sub-count
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tallies: BTreeMap<String, u32>,
    pub missing: Vec<MissingItem>,
    pub fully_compliant: bool,
    pub coverage: Coverage,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<DataQualityWarning>,
}

impl DocumentRecord {
    pub fn is_present(&self, rule: &str) -> bool {
        self.presence.get(rule).copied().unwrap_or(false)
    }

    pub fn count(&self, rule: &str) -> Option<u32> {
        self.counts.get(rule).copied()
    }

    pub fn missing_descriptions(&self) -> Vec<String> {
        self.missing.iter().map(|item| item.to_string()).collect()
    }
}

/// One unmet checklist requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MissingItem {
    SectionMissing {
        rule: String,
        label: String,
    },
    InsufficientCount {
        rule: String,
        label: String,
        actual: u32,
        required: u32,
    },
}

impl MissingItem {
    pub fn rule(&self) -> &str {
        match self {
            Self::SectionMissing { rule, .. } | Self::InsufficientCount { rule, .. } => rule,
        }
    }
}

impl fmt::Display for MissingItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SectionMissing { label, .. } => write!(f, "{label}: section missing"),
            Self::InsufficientCount {
                label,
                actual,
                required,
                ..
            } => write!(f, "{label}: insufficient count: {actual}/{required}"),
        }
    }
}

/// Satisfied structural categories out of the category set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coverage {
    pub satisfied: u32,
    pub total: u32,
    /// Labels of unsatisfied categories, in schema order
    pub missing: Vec<String>,
}

/// Structural oddities that do not affect compliance but deserve a look.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityWarning {
    /// The marker occurs more than once; only the first occurrence is evaluated
    DuplicateMarker { rule: String, occurrences: usize },
    /// Nested-item lines exist outside the rule's section and were not counted
    ItemsOutsideSection { rule: String, outside: u32 },
}

impl fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateMarker { rule, occurrences } => write!(
                f,
                "{rule}: marker appears {occurrences} times, first occurrence used"
            ),
            Self::ItemsOutsideSection { rule, outside } => write!(
                f,
                "{rule}: {outside} item(s) outside the section were not counted"
            ),
        }
    }
}

// ===== CHAPTER CLASSIFICATION =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChapterTag {
    PartSplit,
    Unified,
    Ambiguous,
}

impl fmt::Display for ChapterTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PartSplit => "PartSplit",
            Self::Unified => "Unified",
            Self::Ambiguous => "Ambiguous",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageTier {
    HighCoverage,
    LowCoverage,
}

/// Per-file category count inside a part-split chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartCoverage {
    pub filename: String,
    pub satisfied: u32,
    pub total: u32,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChapterClassification {
    /// At least one file carries a part indicator; no chapter-level verdict
    PartSplit { files: Vec<PartCoverage> },
    /// Exactly one file and no part indicator
    Unified {
        filename: String,
        coverage: u32,
        total: u32,
        tier: CoverageTier,
        missing: Vec<String>,
    },
    /// Several files with no declared relationship; needs manual review
    Ambiguous { filenames: Vec<String> },
}

impl ChapterClassification {
    pub fn tag(&self) -> ChapterTag {
        match self {
            Self::PartSplit { .. } => ChapterTag::PartSplit,
            Self::Unified { .. } => ChapterTag::Unified,
            Self::Ambiguous { .. } => ChapterTag::Ambiguous,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedChapter {
    pub chapter: u32,
    pub classification: ChapterClassification,
}

// ===== REPORT =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NotFound,
    DecodeError,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("not found"),
            Self::DecodeError => f.write_str("decode error"),
        }
    }
}

/// A requested document the tool could not evaluate. Never counted as
/// compliant or non-compliant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedDocument {
    pub identifier: String,
    pub reason: SkipReason,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonCompliantDocument {
    pub filename: String,
    pub missing: Vec<MissingItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceSummary {
    pub evaluated: usize,
    pub fully_compliant: Vec<String>,
    pub non_compliant: Vec<NonCompliantDocument>,
}

impl ComplianceSummary {
    pub fn fully_compliant_count(&self) -> usize {
        self.fully_compliant.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterSummary {
    pub total_chapters: usize,
    pub part_split: usize,
    pub unified_high_coverage: usize,
    pub unified_low_coverage: usize,
    pub ambiguous: usize,
}

impl ChapterSummary {
    pub fn unified(&self) -> usize {
        self.unified_high_coverage + self.unified_low_coverage
    }
}

/// Output of one audit run. A transient artifact: nothing reads it back into
/// the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub schema_version: String,
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    /// SHA-256 of the checklist schema the run used
    pub schema_fingerprint: String,
    pub records: Vec<DocumentRecord>,
    pub summary: ComplianceSummary,
    pub chapters: Vec<ClassifiedChapter>,
    pub chapter_summary: ChapterSummary,
    pub skipped: Vec<SkippedDocument>,
}

impl ComplianceReport {
    pub fn record(&self, filename: &str) -> Option<&DocumentRecord> {
        self.records.iter().find(|r| r.filename == filename)
    }

    pub fn chapter(&self, chapter: u32) -> Option<&ClassifiedChapter> {
        self.chapters.iter().find(|c| c.chapter == chapter)
    }

    /// Every evaluated document is compliant and nothing was skipped
    pub fn is_clean(&self) -> bool {
        self.summary.non_compliant.is_empty() && self.skipped.is_empty()
    }
}
