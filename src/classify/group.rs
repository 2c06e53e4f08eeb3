//! Comparison group identifiers embedded in filenames.

use once_cell::sync::Lazy;
use regex::Regex;

/// `Comparison2`, `comp_3`, `C-7`, `Group4`, `G5`... anywhere in the name.
/// The first match wins, so `log2FC` reads as group 2.
static GROUP_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:comparison|contrast|group|comp|c|g)[-_]?(\d+)").unwrap()
});

/// Extract a normalized group id (`"C" + digits`) from a filename or cell.
pub fn extract_group_id(text: &str) -> Option<String> {
    GROUP_ID_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|digits| format!("C{}", digits.as_str()))
}
