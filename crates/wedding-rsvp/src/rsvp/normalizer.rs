/// Canonical form for name comparison: lower-cased, punctuation stripped,
/// whitespace collapsed and trimmed. Both sides of every guest-list
/// comparison go through this, or matching drifts apart.
pub fn normalize_name(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
