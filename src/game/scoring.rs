//! Move scoring: letter and word multipliers, bingo bonus, and the
//! per-word arithmetic breakdown shown next to the board.

use super::board::{collect_move_words, Board, Pos, Premium, PremiumKind};
use super::RACK_CAPACITY;
use std::collections::HashSet;

/// Bonus for playing the entire rack in one move.
pub const BINGO_BONUS: u32 = 50;

/// One scored word of a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordScore {
    pub text: String,
    pub positions: Vec<Pos>,
    pub points: u32,
    /// Human-readable arithmetic, e.g. `KOT = K2, O1x2L, T2 = 2+2+2 = 6`.
    pub breakdown: String,
}

/// Score of a whole move: every distinct word of two or more letters
/// the pending tiles create or extend, plus the bingo bonus when it
/// applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveScore {
    pub total: u32,
    pub words: Vec<WordScore>,
    pub bingo: bool,
}

impl MoveScore {
    /// All breakdown lines joined for display or logging.
    pub fn breakdown(&self) -> String {
        let mut lines: Vec<String> = self.words.iter().map(|w| w.breakdown.clone()).collect();
        if self.bingo {
            lines.push(format!("BINGO! (+{BINGO_BONUS})"));
        }
        lines.join(" | ")
    }
}

/// Score a single word. A cell's premium counts only when the cell is in
/// the pending set; cells settled in earlier turns contribute their base
/// letter value no matter what modifier they carry.
pub fn score_word(board: &Board, text: &str, positions: &[Pos], pending: &HashSet<Pos>) -> WordScore {
    let mut base = 0u32;
    let mut word_multiplier = 1u32;
    let mut components = Vec::new();
    let mut addends = Vec::new();

    for &pos in positions {
        let tile = match board.tile_at(pos) {
            Some(tile) => tile,
            None => continue,
        };
        let letter_value = tile.points();
        let mut cell_value = letter_value;
        let mut suffix = String::new();
        if pending.contains(&pos) {
            match board.premium_at(pos) {
                Some(Premium {
                    kind: PremiumKind::Letter,
                    factor,
                }) => {
                    cell_value = letter_value * factor;
                    suffix = format!("x{factor}L");
                }
                Some(Premium {
                    kind: PremiumKind::Word,
                    factor,
                }) => {
                    word_multiplier *= factor;
                    suffix = format!("(Wx{factor})");
                }
                None => {}
            }
        }
        base += cell_value;
        components.push(format!("{}{letter_value}{suffix}", tile.face()));
        addends.push(cell_value.to_string());
    }

    let points = base * word_multiplier;
    let mut breakdown = format!(
        "{text} = {} = {}",
        components.join(", "),
        addends.join("+")
    );
    if word_multiplier > 1 {
        breakdown.push_str(&format!(" = ({base}) x {word_multiplier}W = {points}"));
    } else {
        breakdown.push_str(&format!(" = {points}"));
    }

    WordScore {
        text: text.to_string(),
        positions: positions.to_vec(),
        points,
        breakdown,
    }
}

/// Score a move given its pending cells. Words are collected from the
/// board, each scored with multipliers applying to pending cells only;
/// placing the whole rack earns the bingo bonus on top. Only runs of
/// two or more letters score; a lone letter is subject to word
/// validation but is worth nothing by itself.
pub fn score_move(board: &Board, placed: &[Pos]) -> MoveScore {
    let pending: HashSet<Pos> = placed.iter().copied().collect();
    let words: Vec<WordScore> = collect_move_words(board, placed)
        .into_iter()
        .filter(|(_, positions)| positions.len() > 1)
        .map(|(text, positions)| score_word(board, &text, &positions, &pending))
        .collect();
    let bingo = placed.len() == RACK_CAPACITY;
    let total =
        words.iter().map(|w| w.points).sum::<u32>() + if bingo { BINGO_BONUS } else { 0 };
    MoveScore { total, words, bingo }
}
