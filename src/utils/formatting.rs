//! Text helpers for embed content.

use thousands::Separable;

/// Joins items into an English list: `a`, `a and b`, `a, b, and c`.
pub fn humanize_list<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [first, second] => format!("{} and {}", first.as_ref(), second.as_ref()),
        [rest @ .., last] => {
            let head: Vec<&str> = rest.iter().map(AsRef::as_ref).collect();
            format!("{}, and {}", head.join(", "), last.as_ref())
        }
    }
}

/// Formats an integer with thousands separators.
pub fn humanize_number(n: i64) -> String {
    n.separate_with_commas()
}

/// Cuts `text` to at most `max` characters, ending in `…` when something was removed.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}
