//! The generation pipeline: walks the corpus, decides which (entry,
//! language) pairs need audio, synthesizes and materializes the assets, and
//! writes the updated references back.
//!
//! Execution is strictly sequential: one synthesis request in flight at a
//! time, with an optional fixed delay between requests.

use log::{error, info, warn};

use crate::assets;
use crate::config::{RunConfig, ENV_VOICE_ID};
use crate::corpus::{self, CorpusFile};
use crate::error::Result;
use crate::models::{FailureRecord, Job, RunReport};
use crate::sanitize::{level_to_folder, safe_id};
use crate::tts::{ElevenLabsClient, NullSynthesizer, SpeechSynthesizer};
use crate::voice::resolve_voice;

pub const AUDIO_EXT: &str = "mp3";

/// Counters plus the shared continue/stop decision for one run.
struct RunState {
    report: RunReport,
    limit: u64,
}

impl RunState {
    fn new(limit: u64) -> Self {
        RunState {
            report: RunReport::default(),
            limit,
        }
    }

    /// The single global cut-off, consulted by every loop level after each
    /// success (0 = unbounded).
    fn limit_reached(&self) -> bool {
        self.limit > 0 && self.report.generated >= self.limit
    }

    fn record_failure(&mut self, record: FailureRecord) {
        self.report.failed += 1;
        self.report.failures.push(record);
    }
}

/// Run the whole pipeline. Job-level failures land in the report; only
/// configuration-shaped problems (listing the corpus, a missing `--file`
/// target) propagate as errors.
pub async fn run(config: &RunConfig) -> Result<RunReport> {
    let files = corpus::list_corpus_files(&config.words_dir, config.file.as_deref())?;
    if files.is_empty() {
        info!("No JSON files found.");
        return Ok(RunReport::default());
    }

    log_run_header(config);

    let synthesizer: Box<dyn SpeechSynthesizer> = if config.dry_run {
        Box::new(NullSynthesizer)
    } else {
        Box::new(ElevenLabsClient::from_config(config))
    };

    let mut state = RunState::new(config.limit);

    for name in &files {
        if state.limit_reached() {
            break;
        }

        let mut file = match CorpusFile::load(&config.words_dir, name) {
            Ok(file) => file,
            Err(e) => {
                error!("Skipping {}: {}", name, e);
                state.record_failure(FailureRecord {
                    file: name.clone(),
                    entry_id: String::new(),
                    lang: None,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        process_file(config, synthesizer.as_ref(), &mut state, &mut file).await;

        if file.is_dirty() {
            state.report.changed_files.push(file.name.clone());
            if config.update_json && !config.dry_run {
                if let Err(e) = file.save() {
                    error!("Failed to save {}: {}", name, e);
                    state.record_failure(FailureRecord {
                        file: name.clone(),
                        entry_id: String::new(),
                        lang: None,
                        reason: format!("Failed to save corpus file: {}", e),
                    });
                }
            }
        }
    }

    Ok(state.report)
}

fn log_run_header(config: &RunConfig) {
    let langs: Vec<&str> = config.langs.iter().map(|lang| lang.as_str()).collect();
    info!("Languages: {}", langs.join(", "));
    info!("Input dir: {}", config.words_dir.display());
    info!("Output dir: {}", config.out_dir.display());
    info!(
        "JSON updates: {}",
        if config.update_json { "on" } else { "off" }
    );
    info!("Eleven model: {}", config.model_id);
    if let Some(base_url) = &config.base_url {
        info!("Base URL: {}", base_url);
    }
    if config.dry_run {
        info!("Mode: dry-run");
    }
}

/// Process one corpus file entry by entry. The per-pair decision order is
/// fixed: no text, already present, voice missing, runnable.
async fn process_file(
    config: &RunConfig,
    synthesizer: &dyn SpeechSynthesizer,
    state: &mut RunState,
    file: &mut CorpusFile,
) {
    for index in 0..file.len() {
        if state.limit_reached() {
            return;
        }

        let entry = file.entry(index).clone();
        let display_id = entry.id.trim().to_string();
        let item_id = safe_id(&display_id);
        let level_folder = level_to_folder(&entry.level);

        let mut current = entry;
        let mut entry_changed = false;

        for &lang in &config.langs {
            if state.limit_reached() {
                break;
            }

            let Some(text) = current.word_for(lang).map(str::to_string) else {
                state.report.skipped += 1;
                continue;
            };

            if current.audio_for(lang).is_some() && !config.regenerate {
                state.report.skipped += 1;
                continue;
            }

            let Some(voice_id) = resolve_voice(lang, config).map(str::to_string) else {
                state.record_failure(FailureRecord {
                    file: file.name.clone(),
                    entry_id: display_id.clone(),
                    lang: Some(lang),
                    reason: format!(
                        "Missing {}_{} or {}",
                        ENV_VOICE_ID,
                        lang.as_str().to_uppercase(),
                        ENV_VOICE_ID
                    ),
                });
                continue;
            };

            let file_name = format!("{}_{}.{}", item_id, lang, AUDIO_EXT);
            let job = Job {
                entry_id: display_id.clone(),
                lang,
                voice_id,
                text,
                level_folder,
                file_name: file_name.clone(),
                reference: assets::audio_reference(config, lang, level_folder, &file_name),
            };

            info!(
                "[{}] {} [{}] -> {}/{}/{}/{} (voice={})",
                file.name,
                display_id,
                lang,
                config.out_dir.display(),
                lang,
                level_folder,
                file_name,
                job.voice_id
            );

            match execute_job(config, synthesizer, &job).await {
                Ok(()) => {
                    if config.update_json {
                        current = current.with_audio(lang, &job.reference);
                        entry_changed = true;
                    }
                    state.report.generated += 1;

                    if !state.limit_reached() && !config.delay.is_zero() {
                        tokio::time::sleep(config.delay).await;
                    }
                }
                Err(e) => {
                    warn!("[{}] {} [{}] failed: {}", file.name, display_id, lang, e);
                    state.record_failure(FailureRecord {
                        file: file.name.clone(),
                        entry_id: display_id.clone(),
                        lang: Some(lang),
                        reason: e.to_string(),
                    });
                }
            }
        }

        if entry_changed {
            file.replace_entry(index, current);
        }
    }
}

/// Synthesize one job and materialize the result. In dry-run the
/// synthesizer is the no-op substitute and nothing touches the output tree.
async fn execute_job(
    config: &RunConfig,
    synthesizer: &dyn SpeechSynthesizer,
    job: &Job,
) -> Result<()> {
    let bytes = synthesizer
        .synthesize(&job.voice_id, &config.model_id, &job.text)
        .await?;

    if !config.dry_run {
        assets::write_asset(
            &config.out_dir,
            job.lang,
            job.level_folder,
            &job.file_name,
            &bytes,
        )
        .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    mod test_pipeline;
}
