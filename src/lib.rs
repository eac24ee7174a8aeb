//! Batch generation of word audio for vocabulary corpus files.
//!
//! The pipeline walks a directory of JSON word files, decides which
//! (entry, language) pairs still need a synthesized asset, requests audio
//! from the ElevenLabs API one request at a time, stores the MP3 under
//! `out/{lang}/{level}/` and records the reference back into the corpus so
//! re-runs are idempotent.

pub mod assets;
pub mod config;
pub mod corpus;
pub mod error;
pub mod logger;
pub mod models;
pub mod pipeline;
pub mod sanitize;
pub mod tts;
pub mod voice;

pub use config::{Cli, EnvSettings, RunConfig};
pub use error::{Result, WordAudioError};
pub use models::{FailureRecord, Job, Language, RunReport, WordEntry};
pub use pipeline::run;
