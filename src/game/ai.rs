//! Time-boxed move search for the computer opponent.
//!
//! Anchor-based brute force: every vacant cell adjacent to an existing
//! tile (or the center on an empty board) seeds candidate windows in
//! both orientations, filled with letter subsets and orderings drawn
//! from the rack. Each candidate is simulated on a scratch board and
//! checked with the same validation and scoring the human's moves go
//! through, so the search can never propose an illegal move. The search
//! stops at its deadline and returns the best candidate found so far.

use super::board::{self, Board, Orientation, Pos};
use super::dictionary::Dictionary;
use super::scoring;
use super::validation::{self, WordPolicy};
use super::Letter;
use std::collections::HashSet;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// Search limits. The word-length cap keeps the permutation space small
/// enough to sweep every anchor within the budget.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Longest run of new tiles the search will try to place.
    pub max_word_len: usize,
    /// Wall-clock budget for one search.
    pub time_budget: Duration,
    /// Faces tried for a blank tile, in preference order.
    pub blank_candidates: Vec<char>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            max_word_len: 4,
            time_budget: Duration::from_millis(800),
            blank_candidates: vec!['A', 'E', 'I', 'O', 'U', 'R', 'S', 'T', 'N', 'L'],
        }
    }
}

/// One tile of a candidate move. Blank letters arrive with their face
/// already assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub pos: Pos,
    pub letter: Letter,
}

/// A fully validated move the engine can commit as-is.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub placements: Vec<Placement>,
    pub score: u32,
    pub words: Vec<String>,
    /// Combined length of all words formed; tie-break after score.
    pub text_len: usize,
}

/// Find the best-scoring legal move for `rack` on `board`, or `None`
/// when nothing legal turns up before the deadline.
pub fn find_best_move(
    board: &Board,
    rack: &[Letter],
    dict: &dyn Dictionary,
    policy: &WordPolicy,
    first_move: bool,
    config: &AiConfig,
) -> Option<Candidate> {
    let started = Instant::now();
    let deadline = started + config.time_budget;
    let anchors = anchor_cells(board);
    let mut best: Option<Candidate> = None;
    let mut examined = 0usize;

    'search: for &anchor in &anchors {
        for orientation in [Orientation::Horizontal, Orientation::Vertical] {
            for length in 1..=config.max_word_len {
                if Instant::now() >= deadline {
                    break 'search;
                }
                for window in windows(board, anchor, orientation, length) {
                    // New tiles go on the window's vacant cells; settled
                    // tiles inside the window are played through.
                    let slots: Vec<Pos> = window
                        .iter()
                        .copied()
                        .filter(|&pos| board.is_vacant(pos))
                        .collect();
                    if slots.is_empty() || slots.len() > rack.len() {
                        continue;
                    }
                    for combo in combinations(rack.len(), slots.len()) {
                        if Instant::now() >= deadline {
                            break 'search;
                        }
                        for perm in permutations(&combo) {
                            for placements in
                                assignments(rack, &perm, &slots, &config.blank_candidates)
                            {
                                examined += 1;
                                let Some((score, words, text_len)) =
                                    simulate(board, &placements, first_move, dict, policy)
                                else {
                                    continue;
                                };
                                let better = match &best {
                                    Some(b) => (score, text_len) > (b.score, b.text_len),
                                    None => true,
                                };
                                if better {
                                    best = Some(Candidate {
                                        placements,
                                        score,
                                        words,
                                        text_len,
                                    });
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    log::debug!(
        "search examined {examined} placements in {:?}; best score {:?}",
        started.elapsed(),
        best.as_ref().map(|b| b.score),
    );
    best
}

/// Run [`find_best_move`] on a worker thread; the result arrives on the
/// returned channel so a caller driving a UI loop never blocks on the
/// search (or on the dictionary lookups it makes).
pub fn spawn_search(
    board: Board,
    rack: Vec<Letter>,
    dict: std::sync::Arc<dyn Dictionary>,
    policy: WordPolicy,
    first_move: bool,
    config: AiConfig,
) -> mpsc::Receiver<Option<Candidate>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = find_best_move(&board, &rack, dict.as_ref(), &policy, first_move, &config);
        let _ = tx.send(result);
    });
    rx
}

/// Cells a new word can grow from: every vacant cell orthogonally
/// adjacent to a tile, or just the center when the board is empty.
fn anchor_cells(board: &Board) -> Vec<Pos> {
    if !board.has_tiles() {
        return vec![board.center()];
    }
    let mut set: HashSet<Pos> = HashSet::new();
    for r in 0..board.dim() {
        for c in 0..board.dim() {
            if board.tile_at((r, c)).is_none() {
                continue;
            }
            for n in board.neighbors((r, c)) {
                if board.is_vacant(n) {
                    set.insert(n);
                }
            }
        }
    }
    let mut anchors: Vec<Pos> = set.into_iter().collect();
    anchors.sort_unstable();
    anchors
}

/// All in-bounds runs of `length` cells along `orientation` that contain
/// the anchor.
fn windows(board: &Board, anchor: Pos, orientation: Orientation, length: usize) -> Vec<Vec<Pos>> {
    let (dr, dc) = orientation.delta();
    let dim = board.dim() as isize;
    let (ar, ac) = (anchor.0 as isize, anchor.1 as isize);
    let mut out = Vec::new();
    for offset in 0..length as isize {
        let cells: Option<Vec<Pos>> = (0..length as isize)
            .map(|i| {
                let r = ar + dr * (i - offset);
                let c = ac + dc * (i - offset);
                (r >= 0 && r < dim && c >= 0 && c < dim).then_some((r as usize, c as usize))
            })
            .collect();
        if let Some(cells) = cells {
            out.push(cells);
        }
    }
    out
}

/// All size-`k` index subsets of `0..n`, in lexicographic order.
fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    fn recurse(start: usize, n: usize, k: usize, current: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if current.len() == k {
            out.push(current.clone());
            return;
        }
        for i in start..n {
            current.push(i);
            recurse(i + 1, n, k, current, out);
            current.pop();
        }
    }
    let mut out = Vec::new();
    if k <= n {
        recurse(0, n, k, &mut Vec::with_capacity(k), &mut out);
    }
    out
}

/// All orderings of the given indices.
fn permutations(items: &[usize]) -> Vec<Vec<usize>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut out = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head);
            out.push(tail);
        }
    }
    out
}

/// Map the ordered rack indices onto the vacant slots. A blank fans out
/// into one assignment per candidate face.
fn assignments(
    rack: &[Letter],
    perm: &[usize],
    slots: &[Pos],
    blank_candidates: &[char],
) -> Vec<Vec<Placement>> {
    let mut results: Vec<Vec<Placement>> = vec![Vec::with_capacity(slots.len())];
    for (&index, &pos) in perm.iter().zip(slots) {
        let letter = rack[index];
        if letter.is_blank() {
            let mut expanded = Vec::with_capacity(results.len() * blank_candidates.len());
            for &face in blank_candidates {
                for partial in &results {
                    let mut next = partial.clone();
                    next.push(Placement {
                        pos,
                        letter: Letter::Blank(Some(face)),
                    });
                    expanded.push(next);
                }
            }
            results = expanded;
            if results.is_empty() {
                return results;
            }
        } else {
            for partial in &mut results {
                partial.push(Placement { pos, letter });
            }
        }
    }
    results
}

/// Play the placements on a scratch board and run the full rule set over
/// them. Returns the score, the words formed and their combined length
/// when the move is legal.
fn simulate(
    board: &Board,
    placements: &[Placement],
    first_move: bool,
    dict: &dyn Dictionary,
    policy: &WordPolicy,
) -> Option<(u32, Vec<String>, usize)> {
    let mut scratch = board.clone();
    for p in placements {
        if !scratch.place_pending(p.pos, p.letter) {
            return None;
        }
    }
    validation::validate_placement(&scratch, first_move).ok()?;
    let placed: Vec<Pos> = placements.iter().map(|p| p.pos).collect();
    let words = board::collect_move_words(&scratch, &placed);
    validation::validate_words(&words, dict, policy).ok()?;
    let score = scoring::score_move(&scratch, &placed);
    let text_len = words.iter().map(|(w, _)| w.chars().count()).sum();
    let texts = words.into_iter().map(|(w, _)| w).collect();
    Some((score.total, texts, text_len))
}
