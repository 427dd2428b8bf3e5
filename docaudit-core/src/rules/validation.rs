use super::engine::{CompiledRule, RuleOutcome};
use super::scoped_counter::item_regex;
use super::section_detection::{boundary_regex, marker_regex};
use crate::config::{AuditConfig, RuleConfig, RuleScope};
use crate::error::AuditError;
use crate::types::DataQualityWarning;
use regex::Regex;
use std::collections::HashSet;

// ============================================================================
// SCHEMA CONTRACT - checked before any document is evaluated
// ============================================================================

/// Reject a schema that is internally inconsistent.
///
/// Any violation aborts the whole run: it means the tool is misconfigured, not
/// that a document is deficient.
pub fn validate_schema(config: &AuditConfig) -> Result<(), AuditError> {
    let boundary = boundary_regex(&config.section_boundary)
        .map_err(|e| AuditError::schema("section_boundary", e.to_string()))?;
    if boundary.is_match("") {
        return Err(AuditError::schema(
            "section_boundary",
            "boundary pattern must not match an empty line",
        ));
    }

    validate_rules(&config.checklist)?;
    validate_rules(&config.categories)?;
    validate_chapter(config)?;
    Ok(())
}

fn validate_rules(rules: &[RuleConfig]) -> Result<(), AuditError> {
    let mut seen = HashSet::new();

    for rule in rules {
        if rule.id.trim().is_empty() {
            return Err(AuditError::schema("<unnamed>", "rule id must not be empty"));
        }
        if !seen.insert(rule.id.as_str()) {
            return Err(AuditError::schema(&rule.id, "duplicate rule id"));
        }
        if rule.text.is_empty() {
            return Err(AuditError::schema(&rule.id, "marker text must not be empty"));
        }

        marker_regex(rule)
            .map_err(|e| AuditError::schema(&rule.id, format!("invalid marker pattern: {e}")))?;

        match (&rule.items, rule.min_count) {
            (_, Some(threshold)) if threshold <= 0 => {
                return Err(AuditError::schema(
                    &rule.id,
                    format!("min_count must be positive, got {threshold}"),
                ));
            }
            (None, Some(_)) => {
                return Err(AuditError::schema(
                    &rule.id,
                    "count rule has no nested item pattern",
                ));
            }
            (Some(items), _) => {
                compile_line_pattern(&rule.id, "items", items)?;
            }
            (None, None) => {}
        }

        for (name, pattern) in &rule.tallies {
            compile_line_pattern(&rule.id, &format!("tally '{name}'"), pattern)?;
        }
    }

    Ok(())
}

fn compile_line_pattern(rule: &str, what: &str, pattern: &str) -> Result<Regex, AuditError> {
    let regex = item_regex(pattern)
        .map_err(|e| AuditError::schema(rule, format!("invalid {what} pattern: {e}")))?;
    if regex.is_match("") {
        return Err(AuditError::schema(
            rule,
            format!("{what} pattern must not match an empty line"),
        ));
    }
    Ok(regex)
}

fn validate_chapter(config: &AuditConfig) -> Result<(), AuditError> {
    let chapter = &config.chapter;

    let number = Regex::new(&chapter.number_pattern)
        .map_err(|e| AuditError::schema("chapter.number_pattern", e.to_string()))?;
    if number.captures_len() < 2 {
        return Err(AuditError::schema(
            "chapter.number_pattern",
            "pattern needs a capture group for the chapter number",
        ));
    }

    Regex::new(&chapter.part_pattern)
        .map_err(|e| AuditError::schema("chapter.part_pattern", e.to_string()))?;

    if chapter.high_coverage_threshold == 0 {
        return Err(AuditError::schema(
            "chapter.high_coverage_threshold",
            "threshold must be positive",
        ));
    }
    let categories = config.categories.len() as u32;
    if chapter.high_coverage_threshold > categories {
        return Err(AuditError::schema(
            "chapter.high_coverage_threshold",
            format!(
                "threshold {} exceeds the {} configured categories",
                chapter.high_coverage_threshold, categories
            ),
        ));
    }

    Ok(())
}

// ============================================================================
// DATA QUALITY - per document, never affects compliance
// ============================================================================

pub fn quality_warnings(rule: &CompiledRule, outcome: &RuleOutcome) -> Vec<DataQualityWarning> {
    let mut warnings = Vec::new();

    if outcome.occurrences > 1 {
        warnings.push(DataQualityWarning::DuplicateMarker {
            rule: rule.id().to_string(),
            occurrences: outcome.occurrences,
        });
    }

    if rule.scope() == RuleScope::Section && outcome.items_outside > 0 {
        warnings.push(DataQualityWarning::ItemsOutsideSection {
            rule: rule.id().to_string(),
            outside: outcome.items_outside,
        });
    }

    warnings
}
