use thiserror::Error;

/// Fatal errors that propagate out of the engine to the caller.
///
/// Recoverable placement failures (`GridConflictingCell`, `InvalidPlan`)
/// live in [`crate::placer::PlacementError`] and are swallowed by the
/// Placer itself; only the kinds below ever reach a caller.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("no loader registered for language code '{0}'")]
    UnsupportedLanguage(String),

    #[error("failed to load corpus from {path}: {source}")]
    CorpusLoad {
        path: String,
        #[source]
        source: CorpusLoadError,
    },

    #[error("could not pick {requested} distinct words of length {min_len}..={max_len} from a slice of {slice_size}")]
    PickerExhausted {
        requested: usize,
        min_len: usize,
        max_len: usize,
        slice_size: usize,
    },

    #[error("no valid layout found after {attempts} attempts")]
    NoLayoutFound { attempts: usize },
}

#[derive(Error, Debug)]
pub enum CorpusLoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
