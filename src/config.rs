//! Engine configuration and the thin CLI surface that builds one.

use clap::Parser;
use serde::{Deserialize, Serialize};

/// Tunables governing a single game assembly run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub language_code: String,
    pub num_words: usize,
    pub max_paths: usize,
    pub workers: usize,
    pub stop_word_offset: usize,
    pub most_frequents: usize,
    #[serde(default = "default_min_len")]
    pub min_len: usize,
    #[serde(default = "default_max_len")]
    pub max_len: usize,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    pub seed: Option<u64>,
}

fn default_min_len() -> usize {
    4
}

fn default_max_len() -> usize {
    8
}

fn default_max_iterations() -> usize {
    100_000
}

impl EngineConfig {
    /// The seed actually used for a run: the configured seed if set,
    /// otherwise derived from the process's thread RNG so repeated
    /// unseeded runs still diverge from each other.
    pub fn resolved_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| rand::random())
    }
}

/// `crossword <language_code>`: loads `dictionaries/<language_code>.json`
/// and prints the assembled game. Everything else is a tuning knob
/// with a sensible default.
#[derive(Debug, Parser)]
#[command(name = "crossword", about = "Assemble a crossword puzzle from a hint-enriched word corpus")]
pub struct Cli {
    /// Corpus identifier; resolves to dictionaries/<language_code>.json
    pub language_code: String,

    #[arg(long, default_value_t = 10)]
    pub num_words: usize,

    #[arg(long, default_value_t = 200)]
    pub max_paths: usize,

    #[arg(long, default_value_t = 4)]
    pub workers: usize,

    #[arg(long, default_value_t = 0)]
    pub stop_word_offset: usize,

    #[arg(long, default_value_t = 2000)]
    pub most_frequents: usize,

    #[arg(long, default_value_t = 4)]
    pub min_len: usize,

    #[arg(long, default_value_t = 8)]
    pub max_len: usize,

    #[arg(long, default_value_t = 100_000)]
    pub max_iterations: usize,

    /// Fixes the RNG seed for a reproducible layout.
    #[arg(long)]
    pub seed: Option<u64>,
}

impl From<Cli> for EngineConfig {
    fn from(cli: Cli) -> Self {
        EngineConfig {
            language_code: cli.language_code,
            num_words: cli.num_words,
            max_paths: cli.max_paths,
            workers: cli.workers,
            stop_word_offset: cli.stop_word_offset,
            most_frequents: cli.most_frequents,
            min_len: cli.min_len,
            max_len: cli.max_len,
            max_iterations: cli.max_iterations,
            seed: cli.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_seed_honours_explicit_value() {
        let config = EngineConfig {
            language_code: "en".into(),
            num_words: 10,
            max_paths: 200,
            workers: 4,
            stop_word_offset: 0,
            most_frequents: 2000,
            min_len: 4,
            max_len: 8,
            max_iterations: 100_000,
            seed: Some(42),
        };
        assert_eq!(config.resolved_seed(), 42);
    }

    #[test]
    fn cli_parses_minimal_arguments() {
        let cli = Cli::parse_from(["crossword", "en"]);
        assert_eq!(cli.language_code, "en");
        assert_eq!(cli.num_words, 10);
        assert_eq!(cli.seed, None);
    }
}
