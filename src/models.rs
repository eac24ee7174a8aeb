//! Data model for the word corpus and the generation run.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, WordAudioError};

/// Languages the corpus schema supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    De,
    En,
    Fa,
    Ps,
    Fr,
    Tr,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::De,
        Language::En,
        Language::Fa,
        Language::Ps,
        Language::Fr,
        Language::Tr,
    ];

    /// The lower-case code used as a key in `words`/`audios`
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::De => "de",
            Language::En => "en",
            Language::Fa => "fa",
            Language::Ps => "ps",
            Language::Fr => "fr",
            Language::Tr => "tr",
        }
    }

    /// Parse a language code, case-insensitively.
    pub fn parse(code: &str) -> Result<Language> {
        let normalized = code.trim().to_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.as_str() == normalized)
            .ok_or_else(|| WordAudioError::Config(format!("Unsupported language code: {}", code)))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One vocabulary item as stored in the corpus files.
///
/// Unknown fields are carried through `extra` so that saving a file never
/// loses data the pipeline does not understand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordEntry {
    /// Stable identifier, also used for asset file names
    #[serde(default)]
    pub id: String,

    /// Proficiency tag (e.g. "A1"); selects the storage sub-folder only
    #[serde(default)]
    pub level: String,

    /// Written form per language code
    #[serde(default)]
    pub words: Map<String, Value>,

    /// Reference (URL or relative path) to generated audio per language code
    #[serde(default)]
    pub audios: Map<String, Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WordEntry {
    /// The written form for a language, or `None` when missing/blank.
    pub fn word_for(&self, lang: Language) -> Option<&str> {
        self.words
            .get(lang.as_str())
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    /// The recorded audio reference for a language, or `None` when missing/blank.
    pub fn audio_for(&self, lang: Language) -> Option<&str> {
        self.audios
            .get(lang.as_str())
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|reference| !reference.is_empty())
    }

    /// A copy of this entry with `audios.<lang>` set to `reference`.
    pub fn with_audio(&self, lang: Language, reference: &str) -> WordEntry {
        let mut next = self.clone();
        next.audios.insert(
            lang.as_str().to_string(),
            Value::String(reference.to_string()),
        );
        next
    }

    /// Normalize `audios` keys to trimmed lower-case codes and drop blank
    /// keys/values. Applied on load; in-memory only.
    pub fn normalize_audios(&mut self) {
        let old = std::mem::take(&mut self.audios);
        for (key, value) in old {
            let code = key.trim().to_lowercase();
            let reference = value.as_str().map(str::trim).unwrap_or("");
            if !code.is_empty() && !reference.is_empty() {
                self.audios.insert(code, Value::String(reference.to_string()));
            }
        }
    }
}

/// One unit of synthesis work, prepared and consumed within a single pass
#[derive(Debug, Clone)]
pub struct Job {
    /// Raw entry id, for logs and failure records
    pub entry_id: String,

    /// Language being generated
    pub lang: Language,

    /// Resolved synthesis voice
    pub voice_id: String,

    /// Text sent to the provider
    pub text: String,

    /// Level sub-folder under the language directory
    pub level_folder: &'static str,

    /// Asset file name (`{safe_id}_{lang}.mp3`)
    pub file_name: String,

    /// Value recorded into `audios.<lang>` on success
    pub reference: String,
}

/// One failed job (or file), kept for end-of-run reporting
#[derive(Debug, Clone)]
pub struct FailureRecord {
    pub file: String,
    pub entry_id: String,
    /// `None` for file-level failures (e.g. a file that does not parse)
    pub lang: Option<Language>,
    pub reason: String,
}

impl fmt::Display for FailureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] id={} lang={} :: {}",
            self.file,
            self.entry_id,
            self.lang.map(|l| l.as_str()).unwrap_or("-"),
            self.reason
        )
    }
}

/// Counters and records accumulated over one pipeline run
#[derive(Debug, Default)]
pub struct RunReport {
    pub generated: u64,
    pub skipped: u64,
    pub failed: u64,
    /// Names of corpus files whose in-memory state was mutated, in
    /// processing order
    pub changed_files: Vec<String>,
    pub failures: Vec<FailureRecord>,
}

impl RunReport {
    /// Cap on failure records shown in the summary
    pub const MAX_REPORTED_FAILURES: usize = 20;

    /// Print the end-of-run summary to stdout.
    pub fn print(&self) {
        println!();
        println!("Done.");
        println!("Generated: {}", self.generated);
        println!("Skipped:   {}", self.skipped);
        println!("Failed:    {}", self.failed);
        println!("Files changed: {}", self.changed_files.len());

        if !self.failures.is_empty() {
            println!();
            println!("Failures (first {}):", Self::MAX_REPORTED_FAILURES);
            for record in self.failures.iter().take(Self::MAX_REPORTED_FAILURES) {
                println!("- {}", record);
            }
        }
    }
}
