use regex::Regex;

/// Compile a nested-item pattern, anchored at line start.
///
/// The pattern is not anchored at line end, so numbered entries such as
/// `### 비유 2: 도서관` match `### 비유 \d+`.
pub fn item_regex(fragment: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("(?m)^(?:{fragment})"))
}

/// Number of lines in `span` that start with a match of `items`.
///
/// Only `span` is searched: identical lines elsewhere in the document are never
/// counted.
pub fn count(span: &str, items: &Regex) -> u32 {
    if span.is_empty() {
        return 0;
    }

    // Each match starts at a line start, so there is at most one per line.
    items.find_iter(span).count() as u32
}
