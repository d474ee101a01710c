//! Normalizing rendered element text.
//!
//! Browsers report an element's text with one line per visual line. Saved
//! markup carries the source indentation instead, so both go through
//! [`rendered_text`] before any field is parsed.

/// Trims each line, collapses runs of whitespace and drops blank lines
pub fn rendered_text(raw: &str) -> String {
    split_into_lines(raw)
        .iter()
        .map(|line| normalize_whitespace_in_segment(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Non-empty trimmed lines of `text`
pub fn split_into_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Normalizes whitespace within a single line or paragraph
pub fn normalize_whitespace_in_segment(segment: &str) -> String {
    segment.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The option name of a filter label such as `Machine Learning (1,234)`
pub fn label_before_count(label: &str) -> String {
    let name = label.split('(').next().unwrap_or_default();
    normalize_whitespace_in_segment(name)
}

/// The last non-empty line, if any
pub fn last_line(text: &str) -> Option<&str> {
    split_into_lines(text).pop()
}
