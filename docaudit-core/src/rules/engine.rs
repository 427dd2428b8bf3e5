use super::scoped_counter::{count, item_regex};
use super::section_detection::{boundary_regex, marker_regex, SectionDetector};
use super::validation::{quality_warnings, validate_schema};
use crate::classifier::FilenameConvention;
use crate::config::{AuditConfig, RuleConfig, RuleScope};
use crate::error::AuditError;
use crate::types::*;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use tracing::debug;

/// A checklist rule with its patterns compiled.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    id: String,
    label: String,
    marker: Regex,
    items: Option<Regex>,
    min_count: Option<u32>,
    scope: RuleScope,
    tallies: Vec<(String, Regex)>,
}

/// What one rule found in one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub present: bool,
    /// Nested items in scope; `None` for rules without an item pattern
    pub count: Option<u32>,
    pub tallies: Vec<(String, u32)>,
    /// Lines matching the marker anywhere in the document
    pub occurrences: usize,
    /// Item lines that exist outside the counted span
    pub items_outside: u32,
}

impl CompiledRule {
    pub fn compile(rule: &RuleConfig) -> Result<Self, AuditError> {
        let invalid = |what: &str, e: regex::Error| {
            AuditError::schema(&rule.id, format!("invalid {what} pattern: {e}"))
        };

        let marker = marker_regex(rule).map_err(|e| invalid("marker", e))?;
        let items = match &rule.items {
            Some(pattern) => Some(item_regex(pattern).map_err(|e| invalid("items", e))?),
            None => None,
        };
        let min_count = match rule.min_count {
            Some(n) => Some(u32::try_from(n).map_err(|_| {
                AuditError::schema(&rule.id, format!("min_count out of range: {n}"))
            })?),
            None => None,
        };
        let tallies = rule
            .tallies
            .iter()
            .map(|(name, pattern)| {
                item_regex(pattern)
                    .map(|regex| (name.clone(), regex))
                    .map_err(|e| invalid("tally", e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: rule.id.clone(),
            label: rule.display_label().to_string(),
            marker,
            items,
            min_count,
            scope: rule.scope,
            tallies,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn min_count(&self) -> Option<u32> {
        self.min_count
    }

    pub fn scope(&self) -> RuleScope {
        self.scope
    }

    /// Rule counts nested items (with or without a threshold)
    pub fn counts_items(&self) -> bool {
        self.items.is_some()
    }

    /// Detect the marker, then count nested items strictly inside the rule's scope.
    /// When the marker is absent every count is 0, whatever the rest of the text holds.
    pub fn evaluate(&self, text: &str, detector: &SectionDetector) -> RuleOutcome {
        let range = detector.span_range(text, &self.marker);
        let present = range.is_some();
        let span = match (range, self.scope) {
            (Some(range), RuleScope::Section) => &text[range],
            (Some(_), RuleScope::Document) => text,
            (None, _) => "",
        };

        let (item_count, items_outside) = match &self.items {
            Some(items) => {
                let inside = count(span, items);
                let everywhere = count(text, items);
                (Some(inside), everywhere.saturating_sub(inside))
            }
            None => (None, 0),
        };

        let tallies = self
            .tallies
            .iter()
            .map(|(name, pattern)| (name.clone(), count(span, pattern)))
            .collect();

        RuleOutcome {
            present,
            count: item_count,
            tallies,
            occurrences: detector.occurrences(text, &self.marker),
            items_outside,
        }
    }

    /// Present, and at or above the threshold when there is one
    pub fn is_satisfied(&self, outcome: &RuleOutcome) -> bool {
        outcome.present
            && match self.min_count {
                Some(required) => outcome.count.unwrap_or(0) >= required,
                None => true,
            }
    }

    fn missing_item(&self, outcome: &RuleOutcome) -> Option<MissingItem> {
        if !outcome.present {
            return Some(MissingItem::SectionMissing {
                rule: self.id.clone(),
                label: self.label.clone(),
            });
        }

        let required = self.min_count?;
        let actual = outcome.count.unwrap_or(0);
        (actual < required).then(|| MissingItem::InsufficientCount {
            rule: self.id.clone(),
            label: self.label.clone(),
            actual,
            required,
        })
    }
}

/// Applies a checklist schema to documents.
///
/// Construction validates and compiles the schema; after that, evaluation
/// cannot fail and never touches shared mutable state.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    detector: SectionDetector,
    checklist: Vec<CompiledRule>,
    categories: Vec<CompiledRule>,
    naming: FilenameConvention,
}

impl RuleEngine {
    pub fn new(config: &AuditConfig) -> Result<Self, AuditError> {
        validate_schema(config)?;

        let boundary = boundary_regex(&config.section_boundary)
            .map_err(|e| AuditError::schema("section_boundary", e.to_string()))?;

        Ok(Self {
            detector: SectionDetector::new(boundary),
            checklist: Self::compile_rules(&config.checklist)?,
            categories: Self::compile_rules(&config.categories)?,
            naming: FilenameConvention::new(&config.chapter)?,
        })
    }

    fn compile_rules(rules: &[RuleConfig]) -> Result<Vec<CompiledRule>, AuditError> {
        rules.iter().map(CompiledRule::compile).collect()
    }

    pub fn checklist(&self) -> &[CompiledRule] {
        &self.checklist
    }

    pub fn categories(&self) -> &[CompiledRule] {
        &self.categories
    }

    /// Evaluate one document. Deterministic: the same text and schema always
    /// produce an identical record.
    pub fn evaluate(&self, filename: &str, text: &str) -> DocumentRecord {
        let mut presence = BTreeMap::new();
        let mut counts = BTreeMap::new();
        let mut tallies = BTreeMap::new();
        let mut missing = Vec::new();
        let mut warnings = Vec::new();

        for rule in &self.checklist {
            let outcome = rule.evaluate(text, &self.detector);
            debug!(
                "   {} {}: present={} count={:?}",
                filename, rule.id, outcome.present, outcome.count
            );

            presence.insert(rule.id.clone(), outcome.present);
            if let Some(n) = outcome.count {
                counts.insert(rule.id.clone(), n);
            }
            for (name, n) in &outcome.tallies {
                tallies.insert(format!("{}.{}", rule.id, name), *n);
            }
            if let Some(item) = rule.missing_item(&outcome) {
                missing.push(item);
            }
            warnings.extend(quality_warnings(rule, &outcome));
        }

        let coverage = self.coverage(text);
        let fully_compliant = missing.is_empty();

        DocumentRecord {
            filename: filename.to_string(),
            chapter: self.naming.chapter_number(filename),
            is_part: self.naming.is_part(filename),
            content_digest: content_digest(text),
            presence,
            counts,
            tallies,
            missing,
            fully_compliant,
            coverage,
            warnings,
        }
    }

    /// Satisfied structural categories out of the category set
    pub fn coverage(&self, text: &str) -> Coverage {
        let mut satisfied = 0;
        let mut missing = Vec::new();

        for category in &self.categories {
            let outcome = category.evaluate(text, &self.detector);
            if category.is_satisfied(&outcome) {
                satisfied += 1;
            } else {
                missing.push(category.label.clone());
            }
        }

        Coverage {
            satisfied,
            total: self.categories.len() as u32,
            missing,
        }
    }
}

/// SHA-256 of document text
pub fn content_digest(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
