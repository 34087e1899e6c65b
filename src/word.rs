use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::error::{CorpusLoadError, EngineError};

/// Language codes with a registered corpus loader (only `en`'s corpus
/// ships with this engine's fixtures).
pub const AVAILABLE_LANGUAGES: &[&str] = &["en"];

/// Resolve a `language_code` to its corpus path, failing fast with
/// [`EngineError::UnsupportedLanguage`] before ever touching the
/// filesystem if no loader is registered for it.
pub fn dictionary_path_for(language_code: &str) -> Result<String, EngineError> {
    if !AVAILABLE_LANGUAGES.contains(&language_code) {
        return Err(EngineError::UnsupportedLanguage(language_code.to_string()));
    }
    Ok(format!("dictionaries/{}.json", language_code))
}

/// One entry of the hint-enriched corpus.
///
/// Extra fields present in the source JSON (e.g. tokenizer metadata)
/// are tolerated: `serde_json` silently drops keys with no matching
/// field, so nothing extra needs declaring here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: String,
    #[serde(default)]
    pub lemma: Option<String>,
    #[serde(default)]
    pub upos: Option<String>,
    #[serde(default)]
    pub hint: Vec<String>,
}

impl WordEntry {
    /// Lowercase and strip diacritics so surface forms compare equal
    /// regardless of casing or accent marks.
    fn normalised_word(&self) -> String {
        normalise_surface_form(&self.word)
    }
}

/// Lowercase a surface form and strip combining diacritics via NFD
/// decomposition, so "café" and "CAFE" both normalise to "cafe".
pub fn normalise_surface_form(raw: &str) -> String {
    raw.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

fn is_combining_mark(c: char) -> bool {
    matches!(c as u32, 0x0300..=0x036F)
}

/// Read-only corpus store: a mapping from normalised surface form to
/// its [`WordEntry`], plus the deduplicated, order-preserving list of
/// surface forms used to parameterise the visible dictionary slice.
///
/// Built once from a loaded corpus and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct WordPool {
    entries: HashMap<String, WordEntry>,
    unique_words: Vec<String>,
}

impl WordPool {
    /// Build a pool from raw corpus entries, normalising and
    /// deduplicating surface forms in first-seen order.
    pub fn new(raw_entries: Vec<WordEntry>) -> Self {
        let mut entries: HashMap<String, WordEntry> = HashMap::new();
        let mut unique_words: Vec<String> = Vec::new();

        for mut entry in raw_entries {
            let normalised = entry.normalised_word();
            entry.word = normalised.clone();
            if !entries.contains_key(&normalised) {
                unique_words.push(normalised.clone());
            }
            entries.insert(normalised, entry);
        }

        debug!("Built word pool with {} unique surface forms", unique_words.len());
        WordPool { entries, unique_words }
    }

    /// Load a corpus JSON file (array of [`WordEntry`]-shaped objects).
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref).map_err(|e| EngineError::CorpusLoad {
            path: path_ref.display().to_string(),
            source: CorpusLoadError::Io(e),
        })?;
        let raw_entries: Vec<WordEntry> =
            serde_json::from_str(&contents).map_err(|e| EngineError::CorpusLoad {
                path: path_ref.display().to_string(),
                source: CorpusLoadError::Json(e),
            })?;
        info!("Loaded {} corpus entries from {}", raw_entries.len(), path_ref.display());
        Ok(Self::new(raw_entries))
    }

    /// Look up a word's full entry by (normalised) surface form.
    pub fn lookup(&self, surface: &str) -> Option<&WordEntry> {
        self.entries.get(surface)
    }

    /// Ordered, deduplicated surface forms in `offset..most_frequents`
    /// (the "visible dictionary slice"). `offset` skips the most common
    /// words at the front of the list; `most_frequents` is the
    /// absolute index one past the last word still considered common
    /// enough to use, not a count. Both bounds saturate rather than
    /// panic.
    pub fn unique_words(&self, offset: usize, most_frequents: usize) -> &[String] {
        let end = most_frequents.min(self.unique_words.len());
        if offset >= end {
            warn!("unique_words offset {} is past the end of a {}-word visible slice", offset, end);
            return &[];
        }
        &self.unique_words[offset..end]
    }

    pub fn len(&self) -> usize {
        self.unique_words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unique_words.is_empty()
    }
}
