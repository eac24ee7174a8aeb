//! CLI and environment resolution.
//!
//! All environment access happens here, once, at startup; the rest of the
//! crate only ever sees the resolved [`RunConfig`].

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::error::{Result, WordAudioError};
use crate::models::Language;

pub const DEFAULT_WORDS_DIR: &str = "assets/words";
pub const DEFAULT_OUT_DIR: &str = "generated_audio/words";
pub const DEFAULT_MODEL_ID: &str = "eleven_multilingual_v2";
pub const DEFAULT_ENDPOINT: &str = "https://api.elevenlabs.io";

pub const ENV_API_KEY: &str = "ELEVENLABS_API_KEY";
pub const ENV_VOICE_ID: &str = "ELEVENLABS_VOICE_ID";
pub const ENV_MODEL_ID: &str = "ELEVENLABS_MODEL_ID";

/// Best-effort numeric flags: anything that does not parse falls back to 0.
fn lenient_u64(raw: &str) -> std::result::Result<u64, Infallible> {
    Ok(raw.trim().parse().unwrap_or(0))
}

/// Generate word audio for selected languages from the corpus JSON files
/// and update `audios.<lang>` in the same files.
#[derive(Debug, Parser)]
#[command(name = "wordaudio", version)]
pub struct Cli {
    /// Comma-separated language codes (de,en,fa,ps,fr,tr)
    #[arg(long, value_name = "LIST")]
    pub langs: Option<String>,

    /// Words JSON directory
    #[arg(long, value_name = "PATH", default_value = DEFAULT_WORDS_DIR)]
    pub dir: PathBuf,

    /// Process only one JSON file (e.g. a1_1.json)
    #[arg(long, value_name = "NAME")]
    pub file: Option<String>,

    /// Output audio directory
    #[arg(long, value_name = "PATH", default_value = DEFAULT_OUT_DIR)]
    pub out: PathBuf,

    /// Public base URL recorded for generated files instead of a local path
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Max number of new audios to generate (0 = unlimited)
    #[arg(long, value_name = "N", default_value = "0", value_parser = lenient_u64)]
    pub limit: u64,

    /// Regenerate even when audios.<lang> already exists
    #[arg(long)]
    pub regenerate: bool,

    /// Delay between requests in milliseconds
    #[arg(long = "delay-ms", value_name = "N", default_value = "0", value_parser = lenient_u64)]
    pub delay_ms: u64,

    /// ElevenLabs model id
    #[arg(long, value_name = "ID")]
    pub model: Option<String>,

    /// Print what would be generated without calling the API
    #[arg(long)]
    pub dry_run: bool,

    /// Do not modify the JSON files
    #[arg(long = "no-json-update")]
    pub no_json_update: bool,
}

/// Snapshot of the provider-related environment, read once at startup
#[derive(Debug, Clone, Default)]
pub struct EnvSettings {
    pub api_key: Option<String>,
    pub default_voice: Option<String>,
    pub voice_overrides: BTreeMap<Language, String>,
    pub model_id: Option<String>,
}

impl EnvSettings {
    pub fn from_env() -> Self {
        let read = |name: &str| {
            std::env::var(name)
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut voice_overrides = BTreeMap::new();
        for lang in Language::ALL {
            let name = format!("{}_{}", ENV_VOICE_ID, lang.as_str().to_uppercase());
            if let Some(voice) = read(&name) {
                voice_overrides.insert(lang, voice);
            }
        }

        EnvSettings {
            api_key: read(ENV_API_KEY),
            default_voice: read(ENV_VOICE_ID),
            voice_overrides,
            model_id: read(ENV_MODEL_ID),
        }
    }
}

/// Immutable configuration for one pipeline run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub langs: Vec<Language>,
    pub words_dir: PathBuf,
    pub file: Option<String>,
    pub out_dir: PathBuf,
    pub base_url: Option<String>,
    pub limit: u64,
    pub regenerate: bool,
    pub dry_run: bool,
    pub delay: Duration,
    pub model_id: String,
    pub update_json: bool,
    pub api_key: String,
    pub default_voice: Option<String>,
    pub voice_overrides: BTreeMap<Language, String>,
    /// Provider base URL; overridable so tests can point at a mock server
    pub endpoint: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            langs: Vec::new(),
            words_dir: PathBuf::from(DEFAULT_WORDS_DIR),
            file: None,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            base_url: None,
            limit: 0,
            regenerate: false,
            dry_run: false,
            delay: Duration::ZERO,
            model_id: DEFAULT_MODEL_ID.to_string(),
            update_json: true,
            api_key: String::new(),
            default_voice: None,
            voice_overrides: BTreeMap::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl RunConfig {
    /// Combine CLI arguments and the environment snapshot, failing fast on
    /// anything that would make the run meaningless.
    pub fn resolve(cli: Cli, env: EnvSettings) -> Result<RunConfig> {
        let langs = cli
            .langs
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(Language::parse)
            .collect::<Result<Vec<Language>>>()?;

        if langs.is_empty() {
            return Err(WordAudioError::Config(
                "Missing --langs. Example: --langs fr".to_string(),
            ));
        }

        let api_key = env.api_key.unwrap_or_default();
        if !cli.dry_run && api_key.is_empty() {
            return Err(WordAudioError::Config(format!(
                "Missing {} in environment",
                ENV_API_KEY
            )));
        }

        if !cli.dir.is_dir() {
            return Err(WordAudioError::Config(format!(
                "Words dir not found: {}",
                cli.dir.display()
            )));
        }

        let base_url = cli
            .base_url
            .as_deref()
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());

        let model_id = cli
            .model
            .map(|model| model.trim().to_string())
            .filter(|model| !model.is_empty())
            .or(env.model_id)
            .unwrap_or_else(|| DEFAULT_MODEL_ID.to_string());

        Ok(RunConfig {
            langs,
            words_dir: cli.dir,
            file: cli.file.map(|name| name.trim().to_string()).filter(|name| !name.is_empty()),
            out_dir: cli.out,
            base_url,
            limit: cli.limit,
            regenerate: cli.regenerate,
            dry_run: cli.dry_run,
            delay: Duration::from_millis(cli.delay_ms),
            model_id,
            update_json: !cli.no_json_update,
            api_key,
            default_voice: env.default_voice,
            voice_overrides: env.voice_overrides,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        })
    }
}
