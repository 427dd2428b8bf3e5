use crate::config::RuleConfig;
use regex::Regex;
use std::ops::Range;

/// Compile a rule's marker into a line-anchored regex.
///
/// Shape: `^(?:<prefix>)(?:<decoration>\s*)?(?:<text>|<alias>...)`. Decorations are
/// literal and tried longest first, so `⏱️` wins over `⏱`.
pub fn marker_regex(rule: &RuleConfig) -> Result<Regex, regex::Error> {
    let mut decorations: Vec<&String> = rule.decorations.iter().filter(|d| !d.is_empty()).collect();
    decorations.sort_by(|a, b| b.len().cmp(&a.len()));

    let decoration = if decorations.is_empty() {
        String::new()
    } else {
        let alternatives: Vec<String> = decorations.iter().map(|d| regex::escape(d)).collect();
        format!(r"(?:(?:{})\s*)?", alternatives.join("|"))
    };

    let texts: Vec<&str> = std::iter::once(rule.text.as_str())
        .chain(rule.aliases.iter().map(String::as_str))
        .collect();

    Regex::new(&format!(
        "(?m)^(?:{}){}(?:{})",
        rule.prefix,
        decoration,
        texts.join("|")
    ))
}

/// Compile the generic top-level heading pattern that ends a section span.
pub fn boundary_regex(fragment: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("(?m)^(?:{fragment})"))
}

/// Location of the first occurrence of a section marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionMatch {
    /// Byte offset of the line holding the marker
    pub start: usize,
    /// Byte offset just past that line (after its newline, or end of text)
    pub heading_end: usize,
}

/// Finds section markers and the span of text each one governs.
#[derive(Debug, Clone)]
pub struct SectionDetector {
    boundary: Regex,
}

impl SectionDetector {
    pub fn new(boundary: Regex) -> Self {
        Self { boundary }
    }

    /// First line-start match of `marker`. Later duplicates are ignored.
    pub fn detect(&self, text: &str, marker: &Regex) -> Option<SectionMatch> {
        let found = marker.find(text)?;
        let start = found.start();
        let heading_end = text[start..]
            .find('\n')
            .map(|offset| start + offset + 1)
            .unwrap_or(text.len());

        Some(SectionMatch { start, heading_end })
    }

    /// Number of lines matching `marker`
    pub fn occurrences(&self, text: &str, marker: &Regex) -> usize {
        marker.find_iter(text).count()
    }

    /// Byte range from the marker line up to (not including) the next
    /// top-level heading, or to the end of the document.
    pub fn span_range(&self, text: &str, marker: &Regex) -> Option<Range<usize>> {
        let section = self.detect(text, marker)?;
        let end = self
            .boundary
            .find_at(text, section.heading_end)
            .map(|m| m.start())
            .unwrap_or(text.len());

        Some(section.start..end)
    }

    /// Section text governed by `marker`; empty when the marker is absent.
    pub fn extract_span<'t>(&self, text: &'t str, marker: &Regex) -> &'t str {
        match self.span_range(text, marker) {
            Some(range) => &text[range],
            None => "",
        }
    }
}
