//! Self-play demo: two computer opponents play a full game on the
//! standard board, logging every move with its score breakdown.
//!
//! Uses a local word list when `dict.txt` is present next to the
//! binary, otherwise the online sjp.pl oracle.

use flexi_logger::Logger;
use scrabmania::game::board::Board;
use scrabmania::game::dictionary::{Dictionary, LocalDictionary, SjpDictionary};
use scrabmania::game::engine::{EngineConfig, MoveEngine, Seat};
use std::sync::Arc;

const WORD_LIST: &str = "dict.txt";

/// Safety cap so a degenerate dictionary cannot loop forever.
const MAX_TURNS: usize = 200;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    Logger::try_with_env_or_str("info")?
        .format(flexi_logger::colored_default_format)
        .start()?;

    let dict: Arc<dyn Dictionary> = match LocalDictionary::from_file(WORD_LIST) {
        Ok(local) => {
            log::info!("using {WORD_LIST} ({} words)", local.len());
            Arc::new(local)
        }
        Err(err) => {
            log::info!("no {WORD_LIST} ({err}); using the online dictionary");
            Arc::new(SjpDictionary::new())
        }
    };

    let config = EngineConfig {
        names: ["North".to_string(), "South".to_string()],
        ..EngineConfig::default()
    };
    let mut engine = MoveEngine::new(Board::standard(), dict, config);

    let mut turns = 0;
    while !engine.is_game_over() && turns < MAX_TURNS {
        let seat = engine.turn();
        match engine.ai_move(seat)? {
            Some(outcome) => println!("{}", outcome.log_line()),
            None => println!("{}: pass", engine.name(seat)),
        }
        turns += 1;
    }

    println!(
        "final: {} {} - {} {}",
        engine.name(Seat::Player),
        engine.score(Seat::Player),
        engine.name(Seat::Computer),
        engine.score(Seat::Computer),
    );
    Ok(())
}
