use std::collections::HashSet;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::EngineError;
use crate::word::WordPool;

/// Samples random subsets of distinct, length-bounded surface forms
/// out of a [`WordPool`]'s visible slice.
///
/// The visible slice (`stop_word_offset`, `most_frequents`) is fixed
/// at construction; `pick` resets its own working state on every call,
/// so a `WordPicker` can be reused across many `pick` invocations.
pub struct WordPicker<'a> {
    visible: &'a [String],
    rng: StdRng,
}

impl<'a> WordPicker<'a> {
    pub fn new(pool: &'a WordPool, stop_word_offset: usize, most_frequents: usize, seed: u64) -> Self {
        WordPicker {
            visible: pool.unique_words(stop_word_offset, most_frequents),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw `n` distinct surface forms of length in `min_len..=max_len`,
    /// rejection-sampling from the visible slice. Fails with
    /// [`EngineError::PickerExhausted`] if the slice is too small or too
    /// length-homogeneous to satisfy the request within a bounded
    /// number of draws.
    pub fn pick(&mut self, n: usize, min_len: usize, max_len: usize) -> Result<Vec<String>, EngineError> {
        let candidates: Vec<&String> = self
            .visible
            .iter()
            .filter(|w| w.chars().count() >= min_len && w.chars().count() <= max_len)
            .collect();

        if candidates.len() < n {
            return Err(EngineError::PickerExhausted {
                requested: n,
                min_len,
                max_len,
                slice_size: self.visible.len(),
            });
        }

        let mut picked: HashSet<String> = HashSet::new();
        // Bounded: this can only loop forever if `candidates` with
        // length >= n contains fewer than n distinct strings, which
        // the length check above already rules out.
        let max_draws = candidates.len() * 50 + 100;
        let mut draws = 0;
        while picked.len() < n && draws < max_draws {
            draws += 1;
            let idx = self.rng.gen_range(0..candidates.len());
            picked.insert(candidates[idx].clone());
        }

        if picked.len() < n {
            return Err(EngineError::PickerExhausted {
                requested: n,
                min_len,
                max_len,
                slice_size: self.visible.len(),
            });
        }

        debug!("Picked {} words: {:?}", picked.len(), picked);
        Ok(picked.into_iter().collect())
    }

    /// Draw `n` distinct words plus one more guaranteed to contain
    /// `required_char`, for growing an existing grid by a single
    /// letter-constrained word.
    pub fn pick_with_character(
        &mut self,
        n: usize,
        min_len: usize,
        max_len: usize,
        required_char: char,
    ) -> Result<Vec<String>, EngineError> {
        let mut picked = self.pick(n, min_len, max_len)?;

        let candidates: Vec<&String> = self
            .visible
            .iter()
            .filter(|w| {
                let len = w.chars().count();
                len >= min_len && len <= max_len && w.contains(required_char) && !picked.contains(*w)
            })
            .collect();
        if candidates.is_empty() {
            return Err(EngineError::PickerExhausted {
                requested: n + 1,
                min_len,
                max_len,
                slice_size: self.visible.len(),
            });
        }
        let idx = self.rng.gen_range(0..candidates.len());
        picked.push(candidates[idx].clone());
        Ok(picked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::WordEntry;
    use rstest::rstest;

    fn pool_from(words: &[&str]) -> WordPool {
        WordPool::new(
            words
                .iter()
                .map(|w| WordEntry {
                    word: w.to_string(),
                    lemma: None,
                    upos: None,
                    hint: vec!["hint".to_string()],
                })
                .collect(),
        )
    }

    #[test]
    fn picks_requested_count_within_length_bounds() {
        let pool = pool_from(&["anel", "ato", "animal", "pear", "apple", "ox"]);
        let mut picker = WordPicker::new(&pool, 0, 100, 7);
        let picked = picker.pick(3, 4, 6).unwrap();
        assert_eq!(picked.len(), 3);
        for w in &picked {
            assert!(w.len() >= 4 && w.len() <= 6);
        }
    }

    #[test]
    fn resets_between_calls() {
        let pool = pool_from(&["anel", "ato", "animal", "pear"]);
        let mut picker = WordPicker::new(&pool, 0, 100, 7);
        let first = picker.pick(2, 3, 8).unwrap();
        let second = picker.pick(2, 3, 8).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn fails_when_slice_too_small() {
        let pool = pool_from(&["anel", "ato"]);
        let mut picker = WordPicker::new(&pool, 0, 100, 7);
        assert!(matches!(
            picker.pick(5, 3, 8),
            Err(EngineError::PickerExhausted { .. })
        ));
    }

    #[rstest]
    #[case(1, 3, 8)]
    #[case(2, 3, 8)]
    #[case(3, 4, 6)]
    #[case(4, 3, 8)]
    fn picks_exact_count_across_length_windows(#[case] n: usize, #[case] min_len: usize, #[case] max_len: usize) {
        let pool = pool_from(&["anel", "ato", "animal", "pear", "apple", "ox", "tamale", "mesa"]);
        let mut picker = WordPicker::new(&pool, 0, 100, 3);
        let picked = picker.pick(n, min_len, max_len).unwrap();
        assert_eq!(picked.len(), n);
        assert_eq!(picked.iter().collect::<HashSet<_>>().len(), n, "picks must be distinct");
        for w in &picked {
            assert!(w.len() >= min_len && w.len() <= max_len);
        }
    }

    #[test]
    fn respects_visible_slice_offsets() {
        let pool = pool_from(&["anel", "ato", "animal", "pear"]);
        let mut picker = WordPicker::new(&pool, 3, 100, 7);
        // Only "pear" remains visible after skipping the first three.
        assert!(matches!(
            picker.pick(2, 3, 8),
            Err(EngineError::PickerExhausted { .. })
        ));
        assert_eq!(picker.pick(1, 3, 8).unwrap(), vec!["pear".to_string()]);
    }
}
