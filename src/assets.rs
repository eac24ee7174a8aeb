//! Materialization of synthesized audio under the output tree.

use std::path::{Path, PathBuf};

use crate::config::RunConfig;
use crate::error::Result;
use crate::models::Language;

/// Ensure `out_root/{lang}/{level_folder}` exists and write the audio bytes
/// there. Existing files are overwritten; the orchestrator only calls this
/// when the asset is absent or regeneration was requested.
pub async fn write_asset(
    out_root: &Path,
    lang: Language,
    level_folder: &str,
    file_name: &str,
    bytes: &[u8],
) -> Result<PathBuf> {
    let dir = out_root.join(lang.as_str()).join(level_folder);
    tokio::fs::create_dir_all(&dir).await?;

    let path = dir.join(file_name);
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

/// The value recorded into `audios.<lang>`: the public URL when a base URL
/// is configured, otherwise the output path in its configured form.
pub fn audio_reference(
    config: &RunConfig,
    lang: Language,
    level_folder: &str,
    file_name: &str,
) -> String {
    match &config.base_url {
        Some(root) => format!("{}/{}/{}/{}", root, lang, level_folder, file_name),
        None => {
            let out = config.out_dir.display().to_string().replace('\\', "/");
            format!("{}/{}/{}/{}", out, lang, level_folder, file_name)
        }
    }
}
