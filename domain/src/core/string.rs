//! String utilities for the domain layer.

/// Shorten text for log lines and one-line listings (UTF-8 safe)
///
/// `max_chars` counts characters, not bytes. Newlines are collapsed to spaces.
pub fn preview(s: &str, max_chars: usize) -> String {
    let flat: String = s
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let kept: String = flat.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}
