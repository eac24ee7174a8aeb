//! Voice selection per language.

use crate::config::RunConfig;
use crate::models::Language;

/// Pick the synthesis voice for a language: the per-language override wins,
/// then the global fallback; `None` when both are absent or blank.
pub fn resolve_voice(lang: Language, config: &RunConfig) -> Option<&str> {
    if let Some(voice) = config.voice_overrides.get(&lang) {
        let trimmed = voice.trim();
        if !trimmed.is_empty() {
            return Some(trimmed);
        }
    }

    config
        .default_voice
        .as_deref()
        .map(str::trim)
        .filter(|voice| !voice.is_empty())
}
