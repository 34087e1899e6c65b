use std::process::ExitCode;

use clap::Parser;
use log::error;

use crossword::assembler::build_game;
use crossword::config::{Cli, EngineConfig};
use crossword::picker::WordPicker;
use crossword::word::WordPool;

fn main() -> ExitCode {
    crossword::logging::init_logger(false);

    let config: EngineConfig = Cli::parse().into();
    let dictionary_path = match crossword::word::dictionary_path_for(&config.language_code) {
        Ok(path) => path,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let pool = match WordPool::load_from_file(&dictionary_path) {
        Ok(pool) => pool,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut picker = WordPicker::new(&pool, config.stop_word_offset, config.most_frequents, config.resolved_seed());

    let game = match build_game(
        &pool,
        &mut picker,
        config.num_words,
        config.min_len,
        config.max_len,
        config.max_paths,
        config.workers,
        config.max_iterations,
        config.resolved_seed(),
    ) {
        Ok(game) => game,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Answer grid:\n{}", game.answer_grid().render());
    println!("Masked grid:\n{}", game.masked_grid());
    println!("Clues:\n{}", game.format_clues());

    ExitCode::SUCCESS
}
