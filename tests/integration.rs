use crossword::assembler::build_game;
use crossword::error::EngineError;
use crossword::picker::WordPicker;
use crossword::word::{WordEntry, WordPool};

fn corpus() -> WordPool {
    let entries = vec![
        ("anel", vec!["a ring, in Portuguese"]),
        ("animal", vec!["a living creature"]),
        ("ato", vec!["an act, or a knot"]),
        ("tamale", vec!["a wrapped Mexican dish"]),
        ("mesa", vec!["a table"]),
        ("sapo", vec!["a toad"]),
    ];
    WordPool::new(
        entries
            .into_iter()
            .map(|(word, hints)| WordEntry {
                word: word.to_string(),
                lemma: None,
                upos: None,
                hint: hints.into_iter().map(str::to_string).collect(),
            })
            .collect(),
    )
}

#[test]
fn assembles_a_four_word_game_end_to_end() {
    let pool = corpus();
    let mut picker = WordPicker::new(&pool, 0, 100, 42);

    let game = build_game(&pool, &mut picker, 4, 3, 8, 200, 4, 100_000, 42).expect("a valid game should assemble");

    let grid = game.answer_grid();
    assert_eq!(grid.placed_words().len(), 4);
    assert_eq!(game.clues().len(), 4);

    let area = grid.area();
    assert!(area > 0);
    assert!(area <= 8 * 8 * 4, "a 4-word layout should not sprawl arbitrarily");

    assert!(!game.format_clues().is_empty());
    for word in grid.placed_words() {
        assert!(grid.x_size() >= word.word.len() || grid.y_size() >= word.word.len());
    }
}

#[test]
fn reports_no_layout_found_for_non_interlocking_words() {
    let entries = vec![("xyz", vec!["nonsense"]), ("qwr", vec!["nonsense"])];
    let pool = WordPool::new(
        entries
            .into_iter()
            .map(|(word, hints)| WordEntry {
                word: word.to_string(),
                lemma: None,
                upos: None,
                hint: hints.into_iter().map(str::to_string).collect(),
            })
            .collect(),
    );
    let mut picker = WordPicker::new(&pool, 0, 100, 7);

    let result = build_game(&pool, &mut picker, 2, 3, 3, 20, 1, 1_000, 7);
    assert!(matches!(result, Err(EngineError::NoLayoutFound { .. })));
}
