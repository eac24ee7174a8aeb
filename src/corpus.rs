//! Corpus store: loading, validating and persisting word-entry files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, WordAudioError};
use crate::models::WordEntry;

pub const CORPUS_EXT: &str = ".json";

/// List corpus file names in `dir`, sorted. With a filter, the list narrows
/// to the single matching base name; no match is fatal because the operator
/// named that file explicitly.
pub fn list_corpus_files(dir: &Path, file_filter: Option<&str>) -> Result<Vec<String>> {
    let mut files: Vec<String> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(CORPUS_EXT))
        .collect();
    files.sort();

    if let Some(filter) = file_filter {
        let wanted = Path::new(filter)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(filter)
            .to_string();
        files.retain(|name| *name == wanted);
        if files.is_empty() {
            return Err(WordAudioError::NotFound(format!(
                "Target file not found in dir: {}",
                wanted
            )));
        }
    }

    Ok(files)
}

/// One corpus file held in memory while its entries are processed.
///
/// The store tracks whether the in-memory entries differ from what was
/// loaded; only dirty files are ever written back.
#[derive(Debug)]
pub struct CorpusFile {
    pub name: String,
    path: PathBuf,
    entries: Vec<WordEntry>,
    dirty: bool,
}

impl CorpusFile {
    /// Load and validate one corpus file. Anything that is not a JSON array
    /// of entry records is a parse failure for this file only.
    pub fn load(dir: &Path, name: &str) -> Result<CorpusFile> {
        let path = dir.join(name);
        let raw = fs::read_to_string(&path)?;
        let mut entries: Vec<WordEntry> =
            serde_json::from_str(&raw).map_err(|e| WordAudioError::Parse {
                file: name.to_string(),
                message: e.to_string(),
            })?;

        for entry in &mut entries {
            entry.normalize_audios();
        }

        Ok(CorpusFile {
            name: name.to_string(),
            path,
            entries,
            dirty: false,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, index: usize) -> &WordEntry {
        &self.entries[index]
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Swap in a transformed entry; marks the file as needing a save.
    pub fn replace_entry(&mut self, index: usize, entry: WordEntry) {
        self.entries[index] = entry;
        self.dirty = true;
    }

    /// Overwrite the file with the stable two-space layout used across the
    /// corpus (entry order untouched, trailing newline).
    pub fn save(&mut self) -> Result<()> {
        let mut body = serde_json::to_string_pretty(&self.entries)?;
        body.push('\n');
        fs::write(&self.path, body)?;
        self.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Language;

    fn write_file(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn test_list_is_sorted_and_filtered_to_json() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "b1.json", "[]");
        write_file(dir.path(), "a1.json", "[]");
        write_file(dir.path(), "notes.txt", "x");

        let files = list_corpus_files(dir.path(), None).unwrap();
        assert_eq!(files, vec!["a1.json", "b1.json"]);
    }

    #[test]
    fn test_file_filter_matches_base_name() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "a1.json", "[]");

        let files = list_corpus_files(dir.path(), Some("some/path/a1.json")).unwrap();
        assert_eq!(files, vec!["a1.json"]);

        let err = list_corpus_files(dir.path(), Some("zzz.json")).unwrap_err();
        assert!(matches!(err, WordAudioError::NotFound(_)));
    }

    #[test]
    fn test_load_rejects_non_array_shapes() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "object.json", r#"{"id": "w1"}"#);
        write_file(dir.path(), "garbage.json", "not json");

        for name in ["object.json", "garbage.json"] {
            let err = CorpusFile::load(dir.path(), name).unwrap_err();
            assert!(matches!(err, WordAudioError::Parse { .. }), "{}", name);
        }
    }

    #[test]
    fn test_round_trip_preserves_order_and_unknown_fields() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "a1.json",
            r#"[
  {
    "id": "w2",
    "level": "A1",
    "words": { "de": "Welt" },
    "audios": {},
    "note": "keep me"
  },
  {
    "id": "w1",
    "level": "A1",
    "words": { "de": "Hallo" },
    "audios": {}
  }
]
"#,
        );

        let mut file = CorpusFile::load(dir.path(), "a1.json").unwrap();
        let updated = file.entry(0).with_audio(Language::De, "de/A1/w2_de.mp3");
        file.replace_entry(0, updated);
        file.save().unwrap();

        let raw = fs::read_to_string(dir.path().join("a1.json")).unwrap();
        assert!(raw.ends_with("]\n"));
        assert!(raw.contains("\"note\": \"keep me\""));
        assert!(raw.contains("de/A1/w2_de.mp3"));

        // порядок записей сохраняется
        let reloaded = CorpusFile::load(dir.path(), "a1.json").unwrap();
        assert_eq!(reloaded.entry(0).id, "w2");
        assert_eq!(reloaded.entry(1).id, "w1");
    }

    #[test]
    fn test_dirty_flag_discipline() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "a1.json",
            r#"[{"id": "w1", "level": "A1", "words": {"de": "Hallo"}, "audios": {}}]"#,
        );

        let mut file = CorpusFile::load(dir.path(), "a1.json").unwrap();
        assert!(!file.is_dirty());

        let updated = file.entry(0).with_audio(Language::De, "x.mp3");
        file.replace_entry(0, updated);
        assert!(file.is_dirty());

        file.save().unwrap();
        assert!(!file.is_dirty());
    }
}
