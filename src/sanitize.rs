//! Derivation of file-system-safe names from entry fields.

use once_cell::sync::Lazy;
use regex::Regex;

/// Fallback token used when an id sanitizes down to nothing
pub const DEFAULT_ID_PART: &str = "word";

static UNSAFE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9._-]+").expect("valid regex"));

/// Lower-case `raw`, collapse every run of characters outside `[a-z0-9._-]`
/// into a single underscore and trim leading/trailing underscores.
pub fn sanitize_part(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    UNSAFE_RUN
        .replace_all(&lowered, "_")
        .trim_matches('_')
        .to_string()
}

/// Like [`sanitize_part`], but never empty: ids that sanitize to nothing
/// fall back to [`DEFAULT_ID_PART`].
pub fn safe_id(raw: &str) -> String {
    let cleaned = sanitize_part(raw);
    if cleaned.is_empty() {
        DEFAULT_ID_PART.to_string()
    } else {
        cleaned
    }
}

const LEVEL_FOLDERS: [&str; 4] = ["A1", "A2", "B1", "B2"];

/// Map a proficiency tag to its storage folder by case-insensitive prefix;
/// anything unrecognized lands in `misc`.
pub fn level_to_folder(level: &str) -> &'static str {
    let upper = level.trim().to_uppercase();
    LEVEL_FOLDERS
        .iter()
        .find(|folder| upper.starts_with(*folder))
        .copied()
        .unwrap_or("misc")
}
