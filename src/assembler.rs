//! Top-level orchestration: repeatedly pick a word set, sample
//! interconnection plans, place the best one, and retry on failure
//! until a complete [`Game`] is produced or attempts are exhausted.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use log::{info, warn};

use crate::error::EngineError;
use crate::graph::IntersectionGraph;
use crate::picker::WordPicker;
use crate::placer::{self, Grid};
use crate::sampler::sample_plans;
use crate::word::WordPool;

const MAX_RETRIES: usize = 100;

/// A numbered clue: the word's position in the placed grid and one of
/// its hints, chosen uniformly at random.
#[derive(Debug, Clone)]
pub struct Clue {
    pub order_number: usize,
    pub word: String,
    pub hint: String,
}

/// A finished crossword: the compacted, validated answer grid plus its
/// numbered clue list.
#[derive(Debug, Clone)]
pub struct Game {
    grid: Grid,
    clues: Vec<Clue>,
}

impl Game {
    pub fn answer_grid(&self) -> &Grid {
        &self.grid
    }

    pub fn masked_grid(&self) -> String {
        self.grid.render_masked()
    }

    pub fn clues(&self) -> &[Clue] {
        &self.clues
    }

    /// Render the clue list as `{order}. {hint}` lines, ordered by
    /// placement order number.
    pub fn format_clues(&self) -> String {
        self.clues
            .iter()
            .map(|c| format!("{}. {}", c.order_number, c.hint))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Try `max_paths` sampled plans over `graph` and keep the smallest-area
/// grid that places and validates cleanly, breaking ties in favour of
/// the first one found in canonical plan-key order.
fn best_grid_for_plans(graph: &IntersectionGraph, max_paths: usize, workers: usize, max_iterations: usize, seed: u64) -> Option<Grid> {
    let plans = sample_plans(graph, max_paths, workers, max_iterations, seed);
    let mut best: Option<Grid> = None;
    for plan in plans.values() {
        match placer::place_plan(graph, plan) {
            Ok(grid) => {
                let better = match &best {
                    None => true,
                    Some(current) => grid.area() < current.area(),
                };
                if better {
                    best = Some(grid);
                }
            }
            Err(e) => {
                warn!("Discarding plan that failed to place: {}", e);
            }
        }
    }
    best
}

/// Build a complete [`Game`]: pick `num_words` distinct words, attempt
/// to sample and place a spanning plan, and retry with a fresh pick on
/// total failure, up to [`MAX_RETRIES`] times.
#[allow(clippy::too_many_arguments)]
pub fn build_game(
    pool: &WordPool,
    picker: &mut WordPicker,
    num_words: usize,
    min_len: usize,
    max_len: usize,
    max_paths: usize,
    workers: usize,
    max_iterations: usize,
    seed: u64,
) -> Result<Game, EngineError> {
    let mut hint_rng = StdRng::seed_from_u64(seed);

    for attempt in 0..MAX_RETRIES {
        let words = picker.pick(num_words, min_len, max_len)?;
        let graph = IntersectionGraph::new(&words);
        let attempt_seed = seed.wrapping_add(attempt as u64);

        if let Some(grid) = best_grid_for_plans(&graph, max_paths, workers, max_iterations, attempt_seed) {
            let clues = build_clues(pool, &grid, &mut hint_rng);
            info!(
                "Assembled a {}x{} grid with {} words after {} attempt(s)",
                grid.x_size(),
                grid.y_size(),
                grid.placed_words().len(),
                attempt + 1
            );
            return Ok(Game { grid, clues });
        }
        warn!("Attempt {} produced no placeable plan, retrying with a fresh pick", attempt + 1);
    }

    Err(EngineError::NoLayoutFound { attempts: MAX_RETRIES })
}

fn build_clues(pool: &WordPool, grid: &Grid, rng: &mut StdRng) -> Vec<Clue> {
    let mut clues: Vec<Clue> = grid
        .placed_words()
        .iter()
        .map(|word| {
            let hint = pool
                .lookup(&word.word)
                .filter(|entry| !entry.hint.is_empty())
                .map(|entry| entry.hint[rng.gen_range(0..entry.hint.len())].clone())
                .unwrap_or_else(|| word.word.clone());
            Clue {
                order_number: word.order_number.unwrap_or(0),
                word: word.word.clone(),
                hint,
            }
        })
        .collect();
    clues.sort_by_key(|c| c.order_number);
    clues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::WordEntry;

    fn pool() -> WordPool {
        WordPool::new(vec![
            WordEntry { word: "anel".into(), lemma: None, upos: None, hint: vec!["a ring".into()] },
            WordEntry { word: "animal".into(), lemma: None, upos: None, hint: vec!["a beast".into()] },
            WordEntry { word: "ato".into(), lemma: None, upos: None, hint: vec!["a knot".into()] },
            WordEntry { word: "tamale".into(), lemma: None, upos: None, hint: vec!["a wrapped dish".into()] },
        ])
    }

    #[test]
    fn builds_a_game_with_one_clue_per_placed_word() {
        let pool = pool();
        let mut picker = WordPicker::new(&pool, 0, 100, 11);
        let game = build_game(&pool, &mut picker, 4, 3, 8, 50, 2, 50_000, 11).unwrap();

        assert_eq!(game.clues().len(), game.answer_grid().placed_words().len());
        for clue in game.clues() {
            assert!(!clue.hint.is_empty());
        }
        assert!(!game.format_clues().is_empty());
        assert!(!game.masked_grid().is_empty());
    }

    #[test]
    fn fails_gracefully_when_words_cannot_interlock() {
        let pool = WordPool::new(vec![
            WordEntry { word: "xyz".into(), lemma: None, upos: None, hint: vec!["nonsense".into()] },
            WordEntry { word: "qwr".into(), lemma: None, upos: None, hint: vec!["nonsense".into()] },
        ]);
        let mut picker = WordPicker::new(&pool, 0, 100, 3);
        let result = build_game(&pool, &mut picker, 2, 3, 3, 10, 1, 1_000, 3);
        assert!(matches!(result, Err(EngineError::NoLayoutFound { .. })));
    }
}
