//! Board grid, tile lifecycle and word extraction.
//!
//! A cell holds at most one [`Tile`]; a tile is `Pending` while the
//! current turn is still open and `Settled` once committed. Premium
//! cells are a sparse map fixed at game start.

use super::Letter;
use std::collections::{HashMap, HashSet};

/// Default board edge length.
pub const DEFAULT_DIM: usize = 15;

/// `(row, column)` cell coordinate.
pub type Pos = (usize, usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// `(row, column)` step for walking forward along this orientation.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Orientation::Horizontal => (0, 1),
            Orientation::Vertical => (1, 0),
        }
    }

    pub fn cross(self) -> Orientation {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PremiumKind {
    /// Multiplies the value of the letter landing on the cell.
    Letter,
    /// Multiplies the value of every word crossing the cell.
    Word,
}

/// A score modifier attached to a board cell. Consumed only by a tile
/// newly landing on the cell; settled tiles mask it for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Premium {
    pub kind: PremiumKind,
    pub factor: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileState {
    /// Placed this turn; may still be recalled to the rack.
    Pending,
    /// Committed in a prior turn; immutable for the rest of the game.
    Settled,
}

/// A letter instance occupying a board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub letter: Letter,
    pub state: TileState,
}

impl Tile {
    pub fn is_pending(&self) -> bool {
        self.state == TileState::Pending
    }

    pub fn face(&self) -> char {
        self.letter.face()
    }

    pub fn points(&self) -> u32 {
        self.letter.points()
    }
}

/// N×N grid of optional tiles plus the sparse premium map.
#[derive(Debug, Clone)]
pub struct Board {
    dim: usize,
    cells: Vec<Option<Tile>>,
    premiums: HashMap<Pos, Premium>,
}

impl Board {
    /// A board with an injected premium layout (the layout import is an
    /// external concern; the map is read-only initialization input).
    pub fn new(dim: usize, premiums: HashMap<Pos, Premium>) -> Self {
        Self {
            dim,
            cells: vec![None; dim * dim],
            premiums,
        }
    }

    /// The default 15×15 board with the standard premium layout.
    pub fn standard() -> Self {
        Self::new(DEFAULT_DIM, standard_premiums())
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn center(&self) -> Pos {
        (self.dim / 2, self.dim / 2)
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        let (r, c) = pos;
        if r < self.dim && c < self.dim {
            Some(r * self.dim + c)
        } else {
            None
        }
    }

    pub fn tile_at(&self, pos: Pos) -> Option<&Tile> {
        self.index(pos).and_then(|i| self.cells[i].as_ref())
    }

    pub fn premium_at(&self, pos: Pos) -> Option<Premium> {
        self.premiums.get(&pos).copied()
    }

    pub fn is_vacant(&self, pos: Pos) -> bool {
        matches!(self.index(pos), Some(i) if self.cells[i].is_none())
    }

    /// Whether any tile (pending or settled) is on the board.
    pub fn has_tiles(&self) -> bool {
        self.cells.iter().any(Option::is_some)
    }

    /// Count of all tiles on the board, pending included.
    pub fn tile_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Place a pending tile on a vacant cell. Returns `false` when the
    /// cell is occupied or out of range.
    pub fn place_pending(&mut self, pos: Pos, letter: Letter) -> bool {
        match self.index(pos) {
            Some(i) if self.cells[i].is_none() => {
                self.cells[i] = Some(Tile {
                    letter,
                    state: TileState::Pending,
                });
                true
            }
            _ => false,
        }
    }

    /// Take a pending tile off the board. Settled tiles are immutable
    /// and stay put.
    pub fn remove_pending(&mut self, pos: Pos) -> Option<Letter> {
        let i = self.index(pos)?;
        match self.cells[i] {
            Some(tile) if tile.is_pending() => {
                self.cells[i] = None;
                Some(tile.letter)
            }
            _ => None,
        }
    }

    /// Remove a settled tile; only the move engine's undo path does this.
    pub(crate) fn remove_settled(&mut self, pos: Pos) -> Option<Letter> {
        let i = self.index(pos)?;
        match self.cells[i] {
            Some(tile) if !tile.is_pending() => {
                self.cells[i] = None;
                Some(tile.letter)
            }
            _ => None,
        }
    }

    /// Positions of every tile placed this turn, in row-major order.
    pub fn pending_positions(&self) -> Vec<Pos> {
        let mut out = Vec::new();
        for r in 0..self.dim {
            for c in 0..self.dim {
                if self.tile_at((r, c)).is_some_and(Tile::is_pending) {
                    out.push((r, c));
                }
            }
        }
        out
    }

    /// Commit every pending tile (assigned blank faces are kept).
    pub fn settle_pending(&mut self) {
        for cell in &mut self.cells {
            if let Some(tile) = cell {
                tile.state = TileState::Settled;
            }
        }
    }

    /// Orthogonal neighbours of a cell that are on the board.
    pub fn neighbors(&self, pos: Pos) -> Vec<Pos> {
        let (r, c) = (pos.0 as isize, pos.1 as isize);
        [(r, c + 1), (r, c - 1), (r + 1, c), (r - 1, c)]
            .into_iter()
            .filter(|&(nr, nc)| {
                nr >= 0 && nc >= 0 && (nr as usize) < self.dim && (nc as usize) < self.dim
            })
            .map(|(nr, nc)| (nr as usize, nc as usize))
            .collect()
    }

    /// Maximal contiguous run of letters through `pos` along
    /// `orientation`: walk back to the first occupied cell, then collect
    /// forward. Empty result when `pos` itself is vacant.
    pub fn word_run(&self, pos: Pos, orientation: Orientation) -> (String, Vec<Pos>) {
        if self.tile_at(pos).is_none() {
            return (String::new(), Vec::new());
        }
        let (dr, dc) = orientation.delta();
        let (mut r, mut c) = (pos.0 as isize, pos.1 as isize);
        loop {
            let (pr, pc) = (r - dr, c - dc);
            if pr >= 0 && pc >= 0 && self.tile_at((pr as usize, pc as usize)).is_some() {
                r = pr;
                c = pc;
            } else {
                break;
            }
        }
        let mut text = String::new();
        let mut positions = Vec::new();
        while r >= 0
            && c >= 0
            && (r as usize) < self.dim
            && (c as usize) < self.dim
        {
            match self.tile_at((r as usize, c as usize)) {
                Some(tile) => {
                    text.push(tile.face());
                    positions.push((r as usize, c as usize));
                }
                None => break,
            }
            r += dr;
            c += dc;
        }
        (text, positions)
    }

    /// Words a newly placed tile at `pos` participates in: its run along
    /// the move's main orientation (kept even at length one, so a single
    /// placed tile still yields whatever word it completes) plus the
    /// cross run when that is longer than one letter.
    pub fn words_at(&self, pos: Pos, main: Orientation) -> Vec<(String, Vec<Pos>)> {
        let mut words = Vec::new();
        let run = self.word_run(pos, main);
        if !run.1.is_empty() {
            words.push(run);
        }
        let cross = self.word_run(pos, main.cross());
        if cross.1.len() > 1 {
            words.push(cross);
        }
        words
    }
}

/// Main orientation of a move: horizontal when all placed cells share a
/// row (single tiles included), vertical otherwise.
pub fn main_orientation(placed: &[Pos]) -> Orientation {
    let single_row = placed.iter().all(|p| p.0 == placed[0].0);
    if single_row {
        Orientation::Horizontal
    } else {
        Orientation::Vertical
    }
}

/// Every distinct word created or extended by the placed cells,
/// deduplicated by position set.
pub fn collect_move_words(board: &Board, placed: &[Pos]) -> Vec<(String, Vec<Pos>)> {
    if placed.is_empty() {
        return Vec::new();
    }
    let main = main_orientation(placed);
    let mut seen: HashSet<Vec<Pos>> = HashSet::new();
    let mut words = Vec::new();
    for &pos in placed {
        for (text, positions) in board.words_at(pos, main) {
            if seen.insert(positions.clone()) {
                words.push((text, positions));
            }
        }
    }
    words
}

/// The original board layout: word multipliers up to 5× in the corners,
/// letter multipliers up to 5× along the edges, a 3× word on the center.
pub fn standard_premiums() -> HashMap<Pos, Premium> {
    let mut map = HashMap::new();
    let mut put = |cells: &[Pos], kind: PremiumKind, factor: u32| {
        for &pos in cells {
            map.insert(pos, Premium { kind, factor });
        }
    };

    put(&[(0, 0), (0, 14), (14, 0), (14, 14)], PremiumKind::Word, 5);
    put(&[(0, 7), (7, 0), (7, 14), (14, 7)], PremiumKind::Word, 4);
    put(
        &[(7, 7), (4, 4), (4, 10), (10, 4), (10, 10)],
        PremiumKind::Word,
        3,
    );
    put(
        &[
            (1, 1),
            (2, 2),
            (3, 3),
            (11, 11),
            (12, 12),
            (13, 13),
            (1, 13),
            (13, 1),
        ],
        PremiumKind::Word,
        2,
    );

    put(
        &[
            (1, 5),
            (1, 9),
            (5, 1),
            (5, 13),
            (9, 1),
            (9, 13),
            (13, 5),
            (13, 9),
        ],
        PremiumKind::Letter,
        5,
    );
    put(
        &[
            (2, 6),
            (2, 8),
            (6, 2),
            (6, 12),
            (8, 2),
            (8, 12),
            (12, 6),
            (12, 8),
        ],
        PremiumKind::Letter,
        4,
    );
    put(&[(3, 7), (7, 3), (7, 11), (11, 7)], PremiumKind::Letter, 3);
    put(
        &[
            (4, 1),
            (1, 4),
            (4, 13),
            (13, 4),
            (10, 1),
            (1, 10),
            (10, 13),
            (13, 10),
        ],
        PremiumKind::Letter,
        2,
    );

    map
}
