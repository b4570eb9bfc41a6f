//! Move engine: turn ownership, tentative placement, commit/undo,
//! letter exchange, passing and end-of-game resolution.
//!
//! The engine owns the board, the bag and both racks; they are mutated
//! only between a turn's start and its resolution. Every rejection
//! leaves all of that state unchanged.

use super::ai;
use super::board::{self, Board, Pos};
use super::dictionary::Dictionary;
use super::scoring;
use super::validation::{self, RuleViolation, WordPolicy, WordViolation};
use super::{letter_points, Bag, Letter, RACK_CAPACITY};
use std::sync::Arc;
use thiserror::Error;

/// The two turn owners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seat {
    Player,
    Computer,
}

impl Seat {
    pub fn opponent(self) -> Seat {
        match self {
            Seat::Player => Seat::Computer,
            Seat::Computer => Seat::Player,
        }
    }

    fn index(self) -> usize {
        match self {
            Seat::Player => 0,
            Seat::Computer => 1,
        }
    }
}

/// Everything that can go wrong with a move request. All variants are
/// recoverable; engine state is untouched when one is returned.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid placement: {0}")]
    InvalidPlacement(#[from] RuleViolation),
    #[error("word too short: '{0}'")]
    WordTooShort(String),
    #[error("unknown word: '{0}'")]
    UnknownWord(String),
    #[error("fewer than {RACK_CAPACITY} letters left in the bag")]
    InsufficientBag,
    #[error("no tiles selected")]
    EmptySelection,
    #[error("nothing to undo")]
    NoHistory,
    #[error("not your turn")]
    NotYourTurn,
    #[error("the game is over")]
    GameOver,
    #[error("a blank tile needs an assigned letter")]
    BlankUnassigned,
    #[error("cell is occupied or out of range")]
    IllegalCell,
    #[error("no letter at that rack position")]
    BadRackIndex,
}

/// Engine configuration: word policy, AI search limits, display names.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub policy: WordPolicy,
    pub ai: ai::AiConfig,
    pub names: [String; 2],
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            policy: WordPolicy::default(),
            ai: ai::AiConfig::default(),
            names: ["Player".to_string(), "Computer".to_string()],
        }
    }
}

/// Result of an accepted move, for display and logging by the caller.
#[derive(Debug, Clone)]
pub struct MoveOutcome {
    pub seat: Seat,
    pub player: String,
    /// Every word the move created or extended.
    pub words: Vec<String>,
    pub score: u32,
    /// Per-word arithmetic breakdown.
    pub breakdown: String,
    /// Best-effort definition of the main word, when the oracle has one.
    pub definition: Option<String>,
}

impl MoveOutcome {
    /// Match-log line: `<player>: <word-list> | <score>`.
    pub fn log_line(&self) -> String {
        format!("{}: {} | {}", self.player, self.words.join(", "), self.score)
    }
}

/// State saved on each commit so the move can be taken back. Racks are
/// captured as they were before the mover picked up any tile.
#[derive(Debug, Clone)]
struct Snapshot {
    placed: Vec<Pos>,
    racks: [Vec<Letter>; 2],
    scores: [i32; 2],
    first_move: bool,
    turn: Seat,
    /// Letters drawn from the bag when the mover's rack was refilled.
    drawn: Vec<Letter>,
}

/// The game state machine. See the module docs for the ownership rules.
pub struct MoveEngine {
    board: Board,
    bag: Bag,
    racks: [Vec<Letter>; 2],
    scores: [i32; 2],
    turn: Seat,
    first_move: bool,
    pass_count: u32,
    game_over: bool,
    /// Tentative placements of the open turn, in placement order: the
    /// board position, the rack index the letter came from, and the
    /// letter in its rack form. Reversing these removals restores the
    /// rack's exact order.
    staged: Vec<(Pos, usize, Letter)>,
    history: Vec<Snapshot>,
    dict: Arc<dyn Dictionary>,
    config: EngineConfig,
    /// Fixed letter total for the count invariant.
    expected_total: usize,
}

impl MoveEngine {
    /// Start a fresh game: full shuffled bag, both racks drawn.
    pub fn new(board: Board, dict: Arc<dyn Dictionary>, config: EngineConfig) -> Self {
        Self::with_bag(board, Bag::new(), dict, config)
    }

    /// Fresh game with a deterministic bag order.
    pub fn with_seed(
        board: Board,
        dict: Arc<dyn Dictionary>,
        config: EngineConfig,
        seed: u64,
    ) -> Self {
        Self::with_bag(board, Bag::with_seed(seed), dict, config)
    }

    fn with_bag(board: Board, mut bag: Bag, dict: Arc<dyn Dictionary>, config: EngineConfig) -> Self {
        let racks = [bag.draw(RACK_CAPACITY), bag.draw(RACK_CAPACITY)];
        Self::from_parts(board, bag, racks, dict, config)
    }

    /// Assemble an engine from explicit parts; used for custom setups
    /// (injected board layouts, mid-game positions, deterministic tests).
    pub fn from_parts(
        board: Board,
        bag: Bag,
        racks: [Vec<Letter>; 2],
        dict: Arc<dyn Dictionary>,
        config: EngineConfig,
    ) -> Self {
        let expected_total =
            bag.len() + racks[0].len() + racks[1].len() + board.tile_count();
        let first_move = !board.has_tiles();
        Self {
            board,
            bag,
            racks,
            scores: [0, 0],
            turn: Seat::Player,
            first_move,
            pass_count: 0,
            game_over: false,
            staged: Vec::new(),
            history: Vec::new(),
            dict,
            config,
            expected_total,
        }
    }

    // --- read-only accessors for the (excluded) presentation layer ---

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn rack(&self, seat: Seat) -> &[Letter] {
        &self.racks[seat.index()]
    }

    pub fn score(&self, seat: Seat) -> i32 {
        self.scores[seat.index()]
    }

    pub fn bag_len(&self) -> usize {
        self.bag.len()
    }

    pub fn turn(&self) -> Seat {
        self.turn
    }

    pub fn is_first_move(&self) -> bool {
        self.first_move
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn name(&self, seat: Seat) -> &str {
        &self.config.names[seat.index()]
    }

    fn guard(&self, seat: Seat) -> Result<(), EngineError> {
        if self.game_over {
            return Err(EngineError::GameOver);
        }
        if seat != self.turn {
            return Err(EngineError::NotYourTurn);
        }
        Ok(())
    }

    // --- tentative placement ---

    /// Move a rack letter onto a vacant cell as a pending tile. A blank
    /// must come with the face it will stand for.
    pub fn place_tile(
        &mut self,
        seat: Seat,
        pos: Pos,
        rack_index: usize,
        blank_face: Option<char>,
    ) -> Result<(), EngineError> {
        self.guard(seat)?;
        let letter = *self
            .racks[seat.index()]
            .get(rack_index)
            .ok_or(EngineError::BadRackIndex)?;
        let placed_letter = match (letter, blank_face) {
            (Letter::Blank(_), Some(face)) => {
                if letter_points(face).is_none() {
                    return Err(EngineError::BlankUnassigned);
                }
                Letter::Blank(Some(face))
            }
            (Letter::Blank(_), None) => return Err(EngineError::BlankUnassigned),
            (plain, _) => plain,
        };
        if !self.board.is_vacant(pos) {
            return Err(EngineError::IllegalCell);
        }
        self.racks[seat.index()].remove(rack_index);
        self.staged.push((pos, rack_index, letter));
        let ok = self.board.place_pending(pos, placed_letter);
        debug_assert!(ok);
        Ok(())
    }

    /// Take one pending tile back onto the rack, at the position it
    /// came from where that still exists.
    pub fn recall_tile(&mut self, seat: Seat, pos: Pos) -> Result<(), EngineError> {
        self.guard(seat)?;
        let letter = self
            .board
            .remove_pending(pos)
            .ok_or(EngineError::IllegalCell)?;
        let rack = &mut self.racks[seat.index()];
        match self.staged.iter().position(|&(p, _, _)| p == pos) {
            Some(i) => {
                let (_, index, original) = self.staged.remove(i);
                rack.insert(index.min(rack.len()), original);
            }
            None => rack.push(letter.as_bag_letter()),
        }
        Ok(())
    }

    /// Return every pending tile to the rack (the caller's revert after
    /// a rejected commit). Returns how many tiles came back.
    pub fn recall_all(&mut self, seat: Seat) -> Result<usize, EngineError> {
        self.guard(seat)?;
        Ok(self.recall_pending(seat))
    }

    /// Undo the staged placements in reverse, which restores the rack
    /// to its exact pre-placement order.
    fn recall_pending(&mut self, seat: Seat) -> usize {
        let mut count = 0;
        while let Some((pos, index, letter)) = self.staged.pop() {
            if self.board.remove_pending(pos).is_some() {
                let rack = &mut self.racks[seat.index()];
                rack.insert(index.min(rack.len()), letter);
                count += 1;
            }
        }
        count
    }

    // --- turn resolution ---

    /// Validate, score and commit the pending tiles as this seat's move.
    /// On any rejection nothing changes; the pending tiles stay on the
    /// board for the caller to amend or recall.
    pub fn commit_move(&mut self, seat: Seat) -> Result<MoveOutcome, EngineError> {
        self.guard(seat)?;
        validation::validate_placement(&self.board, self.first_move)?;
        let placed = self.board.pending_positions();
        let words = board::collect_move_words(&self.board, &placed);
        validation::validate_words(&words, self.dict.as_ref(), &self.config.policy).map_err(
            |violation| match violation {
                WordViolation::TooShort(w) => EngineError::WordTooShort(w),
                WordViolation::Unknown(w) => EngineError::UnknownWord(w),
            },
        )?;
        let score = scoring::score_move(&self.board, &placed);

        // Capture the pre-move state for undo before mutating anything.
        // Reversing the staged removals reproduces the mover's rack in
        // its pre-placement order.
        let mut racks_before = self.racks.clone();
        {
            let rack = &mut racks_before[seat.index()];
            for &(_, index, letter) in self.staged.iter().rev() {
                rack.insert(index.min(rack.len()), letter);
            }
        }
        let scores_before = self.scores;
        let first_before = self.first_move;

        self.board.settle_pending();
        self.staged.clear();
        self.scores[seat.index()] += score.total as i32;
        let need = RACK_CAPACITY.saturating_sub(self.racks[seat.index()].len());
        let drawn = self.bag.draw(need);
        self.racks[seat.index()].extend(drawn.iter().copied());
        self.history.push(Snapshot {
            placed,
            racks: racks_before,
            scores: scores_before,
            first_move: first_before,
            turn: seat,
            drawn,
        });
        self.first_move = false;
        self.pass_count = 0;
        self.turn = seat.opponent();

        let word_texts: Vec<String> = score.words.iter().map(|w| w.text.clone()).collect();
        let definition = word_texts.first().and_then(|w| self.dict.definition(w));
        let outcome = MoveOutcome {
            seat,
            player: self.config.names[seat.index()].clone(),
            words: word_texts,
            score: score.total,
            breakdown: score.breakdown(),
            definition,
        };
        log::info!("{}", outcome.log_line());
        self.check_end();
        self.check_invariant();
        Ok(outcome)
    }

    /// Take back the most recent committed move: the board, both racks,
    /// both scores and the first-move flag return to their pre-move
    /// state, the refill letters go back into the bag and it reshuffles.
    pub fn undo_move(&mut self) -> Result<(), EngineError> {
        if self.game_over {
            return Err(EngineError::GameOver);
        }
        let snapshot = self.history.pop().ok_or(EngineError::NoHistory)?;
        // Tentative tiles of the open turn are dropped from the board;
        // their letters are part of the restored rack.
        for pos in self.board.pending_positions() {
            self.board.remove_pending(pos);
        }
        self.staged.clear();
        for &pos in &snapshot.placed {
            self.board.remove_settled(pos);
        }
        self.bag.put_back(snapshot.drawn);
        self.racks = snapshot.racks;
        self.scores = snapshot.scores;
        self.first_move = snapshot.first_move;
        self.turn = snapshot.turn;
        self.pass_count = 0;
        self.check_invariant();
        Ok(())
    }

    /// Swap the selected rack letters for fresh ones. Requires at least
    /// a full rack's worth of letters in the bag, and costs the turn.
    pub fn exchange_letters(&mut self, seat: Seat, indices: &[usize]) -> Result<usize, EngineError> {
        self.guard(seat)?;
        if self.bag.len() < RACK_CAPACITY {
            return Err(EngineError::InsufficientBag);
        }
        if indices.is_empty() {
            return Err(EngineError::EmptySelection);
        }
        let rack_len = self.racks[seat.index()].len();
        let mut selected: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < rack_len)
            .collect();
        selected.sort_unstable();
        selected.dedup();
        if selected.is_empty() {
            return Err(EngineError::EmptySelection);
        }

        // Remove from the highest index down so the rest stay valid;
        // the indices refer to the rack before any tiles come back.
        let mut returned = Vec::with_capacity(selected.len());
        for &i in selected.iter().rev() {
            returned.push(self.racks[seat.index()].remove(i));
        }
        self.recall_pending(seat);
        let count = returned.len();
        self.bag.put_back(returned);
        let drawn = self.bag.draw(count);
        self.racks[seat.index()].extend(drawn);

        self.turn = seat.opponent();
        self.pass_count = 0;
        log::info!("{} exchanged {count} letters", self.name(seat));
        self.check_invariant();
        Ok(count)
    }

    /// Give up the turn. Two consecutive passes by either side end the
    /// game.
    pub fn pass_turn(&mut self, seat: Seat) -> Result<(), EngineError> {
        self.guard(seat)?;
        self.recall_pending(seat);
        self.pass_count += 1;
        self.turn = seat.opponent();
        log::info!("{} passes", self.name(seat));
        self.check_end();
        Ok(())
    }

    // --- AI turn ---

    /// Search for the best placement within the configured time budget
    /// and commit it; passes when nothing legal is found. Returns the
    /// committed outcome, or `None` for a pass.
    pub fn ai_move(&mut self, seat: Seat) -> Result<Option<MoveOutcome>, EngineError> {
        self.guard(seat)?;
        let candidate = ai::find_best_move(
            &self.board,
            &self.racks[seat.index()],
            self.dict.as_ref(),
            &self.config.policy,
            self.first_move,
            &self.config.ai,
        );
        let Some(candidate) = candidate else {
            self.pass_turn(seat)?;
            return Ok(None);
        };
        match self.apply_candidate(seat, &candidate) {
            Ok(outcome) => Ok(Some(outcome)),
            Err(err) => {
                // The search validated the move on a scratch board, so
                // this only fires if the oracle changed its mind.
                log::warn!("search candidate rejected at commit ({err}); passing");
                self.pass_turn(seat)?;
                Ok(None)
            }
        }
    }

    /// Commit a candidate produced by [`ai::find_best_move`] or by the
    /// worker-thread search. The rack must still contain the letters the
    /// candidate uses.
    pub fn apply_candidate(
        &mut self,
        seat: Seat,
        candidate: &ai::Candidate,
    ) -> Result<MoveOutcome, EngineError> {
        self.guard(seat)?;
        let mut placed_count = 0;
        for placement in &candidate.placements {
            let probe = placement.letter.as_bag_letter();
            let found = self.racks[seat.index()].iter().position(|&l| l == probe);
            let ok = match found {
                Some(index) if self.board.is_vacant(placement.pos) => {
                    let letter = self.racks[seat.index()].remove(index);
                    self.staged.push((placement.pos, index, letter));
                    self.board.place_pending(placement.pos, placement.letter)
                }
                _ => false,
            };
            if !ok {
                self.unstage_last(seat, placed_count);
                return Err(EngineError::IllegalCell);
            }
            placed_count += 1;
        }
        match self.commit_move(seat) {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                self.unstage_last(seat, placed_count);
                Err(err)
            }
        }
    }

    /// Revert the most recent `n` staged placements.
    fn unstage_last(&mut self, seat: Seat, n: usize) {
        for _ in 0..n {
            if let Some((pos, index, letter)) = self.staged.pop() {
                self.board.remove_pending(pos);
                let rack = &mut self.racks[seat.index()];
                rack.insert(index.min(rack.len()), letter);
            }
        }
    }

    // --- end of game ---

    fn check_end(&mut self) {
        let any_rack_empty = self.racks.iter().any(Vec::is_empty);
        if (self.bag.is_empty() && any_rack_empty) || self.pass_count >= 2 {
            self.finalize();
        }
    }

    /// Subtract the value of the tiles left on each rack; a player who
    /// went out additionally collects the opponent's leftover value.
    fn finalize(&mut self) {
        let leftover: [i32; 2] = [rack_value(&self.racks[0]), rack_value(&self.racks[1])];
        self.scores[0] -= leftover[0];
        self.scores[1] -= leftover[1];
        match (self.racks[0].is_empty(), self.racks[1].is_empty()) {
            (true, false) => self.scores[0] += leftover[1],
            (false, true) => self.scores[1] += leftover[0],
            _ => {}
        }
        self.game_over = true;
        log::info!(
            "game over: {} {} - {} {}",
            self.name(Seat::Player),
            self.scores[0],
            self.name(Seat::Computer),
            self.scores[1],
        );
    }

    /// The letter count invariant: every tile of the distribution is in
    /// the bag, on a rack or on the board. A mismatch means internal
    /// corruption, which must abort rather than play on silently.
    fn check_invariant(&self) {
        let total = self.bag.len()
            + self.racks[0].len()
            + self.racks[1].len()
            + self.board.tile_count();
        assert_eq!(
            total, self.expected_total,
            "letter count invariant violated: bag {} + racks {}/{} + board {}",
            self.bag.len(),
            self.racks[0].len(),
            self.racks[1].len(),
            self.board.tile_count(),
        );
    }
}

fn rack_value(rack: &[Letter]) -> i32 {
    rack.iter().map(|l| l.points() as i32).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::dictionary::LocalDictionary;

    fn letters(s: &str) -> Vec<Letter> {
        s.chars().map(Letter::Plain).collect()
    }

    fn stub_dict(words: &[&str]) -> Arc<dyn Dictionary> {
        Arc::new(LocalDictionary::from_words(words.iter().copied()))
    }

    fn bag_of(s: &str) -> Bag {
        let mut bag = Bag::empty();
        bag.put_back(letters(s));
        bag
    }

    /// Player rack KOTAABC, computer rack DEGHIJL, ten letters bagged.
    fn engine_with(words: &[&str]) -> MoveEngine {
        MoveEngine::from_parts(
            Board::new(15, Default::default()),
            bag_of("AEIOUNRSWY"),
            [letters("KOTAABC"), letters("DEGHIJL")],
            stub_dict(words),
            EngineConfig::default(),
        )
    }

    fn place_word(engine: &mut MoveEngine, seat: Seat, row: usize, col: usize, word: &str) {
        for (i, c) in word.chars().enumerate() {
            let index = engine
                .rack(seat)
                .iter()
                .position(|&l| l == Letter::Plain(c))
                .expect("letter in rack");
            engine
                .place_tile(seat, (row, col + i), index, None)
                .expect("placement");
        }
    }

    #[test]
    fn commit_scores_refills_and_switches_turn() {
        let mut engine = engine_with(&["KOT"]);
        place_word(&mut engine, Seat::Player, 7, 6, "KOT");
        let outcome = engine.commit_move(Seat::Player).expect("commit");
        assert_eq!(outcome.words, vec!["KOT"]);
        assert_eq!(outcome.score, 5); // K=2, O=1, T=2
        assert_eq!(outcome.log_line(), "Player: KOT | 5");
        assert_eq!(engine.score(Seat::Player), 5);
        assert_eq!(engine.rack(Seat::Player).len(), RACK_CAPACITY);
        assert_eq!(engine.turn(), Seat::Computer);
        assert!(!engine.is_first_move());
    }

    #[test]
    fn first_move_off_center_is_rejected_without_side_effects() {
        let mut engine = engine_with(&["KOT"]);
        place_word(&mut engine, Seat::Player, 3, 3, "KOT");
        let err = engine.commit_move(Seat::Player).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidPlacement(RuleViolation::MissedCenter)
        ));
        assert_eq!(engine.score(Seat::Player), 0);
        assert_eq!(engine.turn(), Seat::Player);
        assert!(engine.is_first_move());
        // The caller reverts the tentative tiles.
        assert_eq!(engine.recall_all(Seat::Player).unwrap(), 3);
        assert_eq!(engine.rack(Seat::Player).len(), RACK_CAPACITY);
    }

    #[test]
    fn unknown_word_is_rejected() {
        let mut engine = engine_with(&["PIES"]);
        place_word(&mut engine, Seat::Player, 7, 6, "KOT");
        let err = engine.commit_move(Seat::Player).unwrap_err();
        assert!(matches!(err, EngineError::UnknownWord(w) if w == "KOT"));
        assert_eq!(engine.score(Seat::Player), 0);
    }

    #[test]
    fn undo_restores_state_exactly() {
        let mut engine = engine_with(&["KOT"]);
        let board_before = engine.board().clone();
        let rack_before = engine.rack(Seat::Player).to_vec();
        let opponent_before = engine.rack(Seat::Computer).to_vec();

        place_word(&mut engine, Seat::Player, 7, 6, "KOT");
        engine.commit_move(Seat::Player).expect("commit");
        engine.undo_move().expect("undo");

        assert_eq!(engine.board().tile_count(), board_before.tile_count());
        assert!(engine.board().tile_at((7, 6)).is_none());
        assert_eq!(engine.rack(Seat::Player), rack_before.as_slice());
        assert_eq!(engine.rack(Seat::Computer), opponent_before.as_slice());
        assert_eq!(engine.score(Seat::Player), 0);
        assert_eq!(engine.score(Seat::Computer), 0);
        assert!(engine.is_first_move());
        assert_eq!(engine.turn(), Seat::Player);
    }

    #[test]
    fn undo_without_history_fails() {
        let mut engine = engine_with(&["KOT"]);
        assert!(matches!(engine.undo_move(), Err(EngineError::NoHistory)));
    }

    #[test]
    fn undo_restores_rack_order_after_scrambled_placement() {
        let mut engine = engine_with(&["KOT"]);
        let rack_before = engine.rack(Seat::Player).to_vec();
        // Place out of rack order: T (index 2), then O, then K.
        engine.place_tile(Seat::Player, (7, 8), 2, None).unwrap();
        engine.place_tile(Seat::Player, (7, 7), 1, None).unwrap();
        engine.place_tile(Seat::Player, (7, 6), 0, None).unwrap();
        engine.commit_move(Seat::Player).expect("commit");
        engine.undo_move().expect("undo");
        assert_eq!(engine.rack(Seat::Player), rack_before.as_slice());
    }

    #[test]
    fn recall_all_restores_rack_order() {
        let mut engine = engine_with(&["KOT"]);
        let rack_before = engine.rack(Seat::Player).to_vec();
        place_word(&mut engine, Seat::Player, 7, 6, "KOT");
        assert_eq!(engine.recall_all(Seat::Player).unwrap(), 3);
        assert_eq!(engine.rack(Seat::Player), rack_before.as_slice());
    }

    #[test]
    fn recall_tile_puts_the_letter_back_in_place() {
        let mut engine = engine_with(&["KOT"]);
        let rack_before = engine.rack(Seat::Player).to_vec();
        engine.place_tile(Seat::Player, (7, 7), 1, None).unwrap(); // O
        engine.recall_tile(Seat::Player, (7, 7)).unwrap();
        assert_eq!(engine.rack(Seat::Player), rack_before.as_slice());
        assert!(matches!(
            engine.recall_tile(Seat::Player, (7, 7)),
            Err(EngineError::IllegalCell)
        ));
    }

    #[test]
    fn out_of_range_rack_index_is_rejected() {
        let mut engine = engine_with(&["KOT"]);
        assert!(matches!(
            engine.place_tile(Seat::Player, (7, 7), 99, None),
            Err(EngineError::BadRackIndex)
        ));
        assert_eq!(engine.rack(Seat::Player).len(), RACK_CAPACITY);
    }

    #[test]
    fn exchange_rejected_when_bag_is_low() {
        let mut engine = MoveEngine::from_parts(
            Board::new(15, Default::default()),
            bag_of("AEIOUN"), // six letters: one short of the limit
            [letters("KOTAABC"), letters("DEGHIJL")],
            stub_dict(&[]),
            EngineConfig::default(),
        );
        let rack_before = engine.rack(Seat::Player).to_vec();
        let err = engine.exchange_letters(Seat::Player, &[0, 1]).unwrap_err();
        assert!(matches!(err, EngineError::InsufficientBag));
        assert_eq!(engine.rack(Seat::Player), rack_before.as_slice());
        assert_eq!(engine.bag_len(), 6);
        assert_eq!(engine.turn(), Seat::Player);
    }

    #[test]
    fn exchange_swaps_letters_and_costs_the_turn() {
        let mut engine = engine_with(&[]);
        let bag_before = engine.bag_len();
        let count = engine
            .exchange_letters(Seat::Player, &[0, 2, 2])
            .expect("exchange");
        assert_eq!(count, 2); // duplicate index collapses
        assert_eq!(engine.rack(Seat::Player).len(), RACK_CAPACITY);
        assert_eq!(engine.bag_len(), bag_before);
        assert_eq!(engine.turn(), Seat::Computer);
    }

    #[test]
    fn exchange_with_no_selection_is_rejected() {
        let mut engine = engine_with(&[]);
        assert!(matches!(
            engine.exchange_letters(Seat::Player, &[]),
            Err(EngineError::EmptySelection)
        ));
        assert!(matches!(
            engine.exchange_letters(Seat::Player, &[99]),
            Err(EngineError::EmptySelection)
        ));
    }

    #[test]
    fn out_of_turn_calls_are_rejected() {
        let mut engine = engine_with(&["KOT"]);
        assert!(matches!(
            engine.pass_turn(Seat::Computer),
            Err(EngineError::NotYourTurn)
        ));
        assert!(matches!(
            engine.commit_move(Seat::Computer),
            Err(EngineError::NotYourTurn)
        ));
    }

    #[test]
    fn two_consecutive_passes_end_the_game_with_rack_penalties() {
        let mut engine = MoveEngine::from_parts(
            Board::new(15, Default::default()),
            bag_of("AEIOUNRSWY"),
            [letters("A"), letters("K")],
            stub_dict(&[]),
            EngineConfig::default(),
        );
        engine.pass_turn(Seat::Player).expect("pass");
        assert!(!engine.is_game_over());
        engine.pass_turn(Seat::Computer).expect("pass");
        assert!(engine.is_game_over());
        assert_eq!(engine.score(Seat::Player), -1); // A = 1
        assert_eq!(engine.score(Seat::Computer), -2); // K = 2
        assert!(matches!(
            engine.pass_turn(Seat::Player),
            Err(EngineError::GameOver)
        ));
    }

    #[test]
    fn going_out_collects_the_opponents_leftover_value() {
        let mut engine = MoveEngine::from_parts(
            Board::new(15, Default::default()),
            Bag::empty(),
            [letters("KOT"), letters("Ź")],
            stub_dict(&["KOT"]),
            EngineConfig::default(),
        );
        place_word(&mut engine, Seat::Player, 7, 6, "KOT");
        engine.commit_move(Seat::Player).expect("commit");
        assert!(engine.is_game_over());
        // 5 for KOT plus the opponent's Ź (9); opponent drops to -9.
        assert_eq!(engine.score(Seat::Player), 14);
        assert_eq!(engine.score(Seat::Computer), -9);
    }

    #[test]
    fn bingo_scores_the_bonus_through_the_engine() {
        let mut engine = engine_with(&["KOTAABC"]);
        place_word(&mut engine, Seat::Player, 7, 4, "KOTAABC");
        let outcome = engine.commit_move(Seat::Player).expect("commit");
        // K2 O1 T2 A1 A1 B3 C2 = 12, plus the bingo bonus.
        assert_eq!(outcome.score, 12 + scoring::BINGO_BONUS);
        assert!(outcome.breakdown.contains("BINGO!"));
    }

    #[test]
    fn blank_placement_needs_a_face_and_scores_zero() {
        let mut engine = MoveEngine::from_parts(
            Board::new(15, Default::default()),
            bag_of("AEIOUNRSWY"),
            [
                vec![Letter::Plain('K'), Letter::Blank(None), Letter::Plain('T')],
                letters("DEGHIJL"),
            ],
            stub_dict(&["KOT"]),
            EngineConfig::default(),
        );
        assert!(matches!(
            engine.place_tile(Seat::Player, (7, 7), 1, None),
            Err(EngineError::BlankUnassigned)
        ));
        engine.place_tile(Seat::Player, (7, 6), 0, None).unwrap();
        engine
            .place_tile(Seat::Player, (7, 7), 0, Some('O'))
            .unwrap();
        engine.place_tile(Seat::Player, (7, 8), 0, None).unwrap();
        let outcome = engine.commit_move(Seat::Player).expect("commit");
        assert_eq!(outcome.words, vec!["KOT"]);
        assert_eq!(outcome.score, 4); // blank O contributes no points
    }

    #[test]
    fn undo_returns_a_blank_to_the_rack_unassigned() {
        let mut engine = MoveEngine::from_parts(
            Board::new(15, Default::default()),
            bag_of("AEIOUNRSWY"),
            [
                vec![Letter::Plain('K'), Letter::Blank(None), Letter::Plain('T')],
                letters("DEGHIJL"),
            ],
            stub_dict(&["KOT"]),
            EngineConfig::default(),
        );
        engine.place_tile(Seat::Player, (7, 6), 0, None).unwrap();
        engine
            .place_tile(Seat::Player, (7, 7), 0, Some('O'))
            .unwrap();
        engine.place_tile(Seat::Player, (7, 8), 0, None).unwrap();
        engine.commit_move(Seat::Player).expect("commit");
        engine.undo_move().expect("undo");
        assert!(engine.rack(Seat::Player).contains(&Letter::Blank(None)));
    }

    #[test]
    fn second_move_must_connect() {
        let mut engine = engine_with(&["KOT", "AB"]);
        place_word(&mut engine, Seat::Player, 7, 6, "KOT");
        engine.commit_move(Seat::Player).expect("commit");
        place_word(&mut engine, Seat::Computer, 0, 0, "DE");
        let err = engine.commit_move(Seat::Computer).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidPlacement(RuleViolation::Disconnected)
        ));
    }
}
