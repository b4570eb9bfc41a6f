//! Placement rules and word legality.
//!
//! Placement checks are pure reads over the board; word checks consult
//! the dictionary oracle and the configurable single-letter policy.

use super::board::{Board, Pos};
use super::dictionary::Dictionary;
use std::collections::HashSet;
use thiserror::Error;

/// A violated placement rule, in the order the rules are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuleViolation {
    #[error("no tiles placed")]
    NoTiles,
    #[error("the first word must pass through the center cell")]
    MissedCenter,
    #[error("tiles must be collinear")]
    NotCollinear,
    #[error("gap between the outermost placed tiles")]
    GapInLine,
    #[error("not connected to existing words")]
    Disconnected,
}

/// Check the current pending tiles against the placement rules.
pub fn validate_placement(board: &Board, first_move: bool) -> Result<(), RuleViolation> {
    let placed = board.pending_positions();
    if placed.is_empty() {
        return Err(RuleViolation::NoTiles);
    }
    if first_move && !placed.contains(&board.center()) {
        return Err(RuleViolation::MissedCenter);
    }

    let rows: HashSet<usize> = placed.iter().map(|p| p.0).collect();
    let cols: HashSet<usize> = placed.iter().map(|p| p.1).collect();
    if rows.len() > 1 && cols.len() > 1 {
        return Err(RuleViolation::NotCollinear);
    }

    // Every cell between the outermost placed positions must hold a tile,
    // pending or settled.
    if rows.len() == 1 {
        let r = placed[0].0;
        let min = placed.iter().map(|p| p.1).min().unwrap_or(0);
        let max = placed.iter().map(|p| p.1).max().unwrap_or(0);
        if (min..=max).any(|c| board.tile_at((r, c)).is_none()) {
            return Err(RuleViolation::GapInLine);
        }
    } else {
        let c = placed[0].1;
        let min = placed.iter().map(|p| p.0).min().unwrap_or(0);
        let max = placed.iter().map(|p| p.0).max().unwrap_or(0);
        if (min..=max).any(|r| board.tile_at((r, c)).is_none()) {
            return Err(RuleViolation::GapInLine);
        }
    }

    if !first_move {
        let touches_settled = placed.iter().any(|&pos| {
            board
                .neighbors(pos)
                .into_iter()
                .any(|n| board.tile_at(n).is_some_and(|t| !t.is_pending()))
        });
        if !touches_settled {
            return Err(RuleViolation::Disconnected);
        }
    }

    Ok(())
}

/// Which single-letter "words" are accepted. The original was
/// inconsistent about this, so it is policy rather than a fixed rule:
/// an empty allow-list rejects every length-one word.
#[derive(Debug, Clone)]
pub struct WordPolicy {
    pub allowed_singles: HashSet<char>,
}

impl Default for WordPolicy {
    fn default() -> Self {
        Self {
            allowed_singles: ['A', 'I', 'O', 'U', 'W', 'Z', 'S', 'Y'].into_iter().collect(),
        }
    }
}

impl WordPolicy {
    /// A policy that rejects all single-letter words.
    pub fn no_singles() -> Self {
        Self {
            allowed_singles: HashSet::new(),
        }
    }
}

/// A word the move may not play.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordViolation {
    #[error("'{0}' is too short")]
    TooShort(String),
    #[error("'{0}' is not in the dictionary")]
    Unknown(String),
}

/// Check every word a move creates: single letters against the policy
/// allow-list, everything against the dictionary oracle.
pub fn validate_words(
    words: &[(String, Vec<Pos>)],
    dict: &dyn Dictionary,
    policy: &WordPolicy,
) -> Result<(), WordViolation> {
    for (text, _) in words {
        let mut chars = text.chars();
        if let (Some(only), None) = (chars.next(), chars.next()) {
            if !policy.allowed_singles.contains(&only) {
                return Err(WordViolation::TooShort(text.clone()));
            }
        }
        if !dict.is_word(text) {
            return Err(WordViolation::Unknown(text.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::dictionary::LocalDictionary;
    use crate::game::Letter;
    use std::collections::HashMap;

    fn empty_board() -> Board {
        Board::new(15, HashMap::new())
    }

    fn pending(board: &mut Board, cells: &[(Pos, char)]) {
        for &(pos, c) in cells {
            assert!(board.place_pending(pos, Letter::Plain(c)));
        }
    }

    #[test]
    fn rejects_empty_move() {
        assert_eq!(
            validate_placement(&empty_board(), true),
            Err(RuleViolation::NoTiles)
        );
    }

    #[test]
    fn first_move_must_cover_center() {
        let mut board = empty_board();
        pending(&mut board, &[((3, 3), 'K'), ((3, 4), 'O'), ((3, 5), 'T')]);
        assert_eq!(
            validate_placement(&board, true),
            Err(RuleViolation::MissedCenter)
        );
    }

    #[test]
    fn first_move_through_center_is_accepted() {
        let mut board = empty_board();
        pending(&mut board, &[((7, 6), 'K'), ((7, 7), 'O'), ((7, 8), 'T')]);
        assert_eq!(validate_placement(&board, true), Ok(()));
    }

    #[test]
    fn rejects_scattered_tiles() {
        let mut board = empty_board();
        pending(&mut board, &[((7, 7), 'K'), ((8, 8), 'O')]);
        assert_eq!(
            validate_placement(&board, true),
            Err(RuleViolation::NotCollinear)
        );
    }

    #[test]
    fn rejects_gap_in_line() {
        let mut board = empty_board();
        pending(&mut board, &[((7, 6), 'K'), ((7, 7), 'O'), ((7, 9), 'T')]);
        assert_eq!(
            validate_placement(&board, true),
            Err(RuleViolation::GapInLine)
        );
    }

    #[test]
    fn settled_tiles_fill_the_gap() {
        let mut board = empty_board();
        pending(&mut board, &[((7, 7), 'O')]);
        board.settle_pending();
        pending(&mut board, &[((7, 6), 'K'), ((7, 8), 'T')]);
        assert_eq!(validate_placement(&board, false), Ok(()));
    }

    #[test]
    fn later_moves_must_touch_settled_tiles() {
        let mut board = empty_board();
        pending(&mut board, &[((7, 7), 'O')]);
        board.settle_pending();
        pending(&mut board, &[((0, 0), 'K'), ((0, 1), 'O')]);
        assert_eq!(
            validate_placement(&board, false),
            Err(RuleViolation::Disconnected)
        );
    }

    #[test]
    fn single_letter_policy() {
        let dict = LocalDictionary::from_words(["KOT", "A"]);
        let word = |t: &str| (t.to_string(), vec![(0usize, 0usize)]);

        let policy = WordPolicy::default();
        assert_eq!(validate_words(&[word("A")], &dict, &policy), Ok(()));
        assert_eq!(
            validate_words(&[word("B")], &dict, &policy),
            Err(WordViolation::TooShort("B".into()))
        );

        let strict = WordPolicy::no_singles();
        assert_eq!(
            validate_words(&[word("A")], &dict, &strict),
            Err(WordViolation::TooShort("A".into()))
        );
    }

    #[test]
    fn unknown_words_are_rejected() {
        let dict = LocalDictionary::from_words(["KOT"]);
        let policy = WordPolicy::default();
        let words = vec![
            ("KOT".to_string(), vec![(7, 6), (7, 7), (7, 8)]),
            ("XYZ".to_string(), vec![(6, 6), (7, 6), (8, 6)]),
        ];
        assert_eq!(
            validate_words(&words, &dict, &policy),
            Err(WordViolation::Unknown("XYZ".into()))
        );
    }
}
