/// Collapse horizontal whitespace within each line and drop blank lines
///
/// Line breaks are kept; leading and trailing whitespace is removed.
pub fn collapse_lines(raw: &str) -> String {
    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Trimmed text, or `None` when nothing visible remains
pub fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
