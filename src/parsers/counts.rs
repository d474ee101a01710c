//! Numbers and labels as the site prints them.

use regex::Regex;
use std::sync::LazyLock;

static LEADING_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d[\d,]*)").expect("valid count regex"));

static PARENTHESIZED_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d[\d,]*)").expect("valid count regex"));

fn strip_thousands(digits: &str) -> Option<u64> {
    digits.replace(',', "").parse().ok()
}

/// `12,345 students` -> 12345
pub fn leading_count(text: &str) -> Option<u64> {
    LEADING_COUNT
        .captures(text)
        .and_then(|caps| strip_thousands(&caps[1]))
}

/// `4.6 (1,234 ratings)` -> 1234
pub fn parenthesized_count(text: &str) -> Option<u64> {
    PARENTHESIZED_COUNT
        .captures(text)
        .and_then(|caps| strip_thousands(&caps[1]))
}

/// Star widgets carry `Rating: 4.5 out of 5` in their aria-label
pub fn rating_label(aria_label: &str) -> String {
    aria_label
        .trim()
        .strip_prefix("Rating:")
        .unwrap_or(aria_label)
        .trim()
        .to_string()
}

/// Splits `23 sections • 120 lectures • 10h 5m total length` into the
/// lecture count and the total duration
pub fn curriculum_stats(text: &str) -> Option<(String, String)> {
    let parts: Vec<&str> = text.split('•').map(str::trim).collect();
    if parts.len() < 3 {
        return None;
    }
    let duration = parts[2]
        .strip_suffix("total length")
        .unwrap_or(parts[2])
        .trim();
    Some((parts[1].to_string(), duration.to_string()))
}
