//! Game core: letter distribution, tile bag, board, placement rules,
//! scoring, dictionary oracle, move engine and AI search.

pub mod ai;
pub mod board;
pub mod dictionary;
pub mod engine;
pub mod scoring;
pub mod validation;

use once_cell::sync::Lazy;
use rand::prelude::*;
use std::collections::HashMap;
use std::fmt;

/// Polish letter distribution: (letter, point value, count in a full bag).
pub const LETTER_DATA: [(char, u32, u32); 32] = [
    ('A', 1, 9),
    ('Ą', 5, 1),
    ('B', 3, 2),
    ('C', 2, 3),
    ('Ć', 6, 1),
    ('D', 2, 3),
    ('E', 1, 7),
    ('Ę', 5, 1),
    ('F', 5, 1),
    ('G', 2, 2),
    ('H', 3, 2),
    ('I', 1, 8),
    ('J', 3, 2),
    ('K', 2, 3),
    ('L', 2, 3),
    ('Ł', 3, 2),
    ('M', 2, 3),
    ('N', 1, 5),
    ('Ń', 7, 1),
    ('O', 1, 6),
    ('Ó', 5, 1),
    ('P', 2, 3),
    ('R', 1, 4),
    ('S', 1, 4),
    ('Ś', 5, 1),
    ('T', 2, 3),
    ('U', 3, 2),
    ('W', 1, 4),
    ('Y', 2, 4),
    ('Z', 1, 5),
    ('Ź', 9, 1),
    ('Ż', 5, 1),
];

/// Number of blank (joker) tiles in a full bag. Blanks score zero.
pub const BLANK_COUNT: u32 = 2;

/// Maximum number of letters a player holds at once.
pub const RACK_CAPACITY: usize = 7;

/// Pre-built point lookup for O(1) letter valuation.
static LETTER_POINTS: Lazy<HashMap<char, u32>> =
    Lazy::new(|| LETTER_DATA.iter().map(|&(c, pts, _)| (c, pts)).collect());

/// Point value of a plain letter, or `None` if the character is not part
/// of the distribution.
pub fn letter_points(letter: char) -> Option<u32> {
    LETTER_POINTS.get(&letter).copied()
}

/// Total number of tiles in a full distribution (letters plus blanks).
pub fn total_tile_count() -> u32 {
    LETTER_DATA.iter().map(|&(_, _, count)| count).sum::<u32>() + BLANK_COUNT
}

/// A single game letter: either a plain letter from the distribution or a
/// blank. A blank carries the face chosen by its placer once it has been
/// assigned; an unassigned blank cannot contribute text to a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Letter {
    Plain(char),
    Blank(Option<char>),
}

impl Letter {
    /// Intrinsic point value. Blanks always score zero, assigned or not.
    pub fn points(self) -> u32 {
        match self {
            Letter::Plain(c) => letter_points(c).unwrap_or(0),
            Letter::Blank(_) => 0,
        }
    }

    /// Character this letter contributes to word text. An unassigned
    /// blank yields the `'_'` placeholder.
    pub fn face(self) -> char {
        match self {
            Letter::Plain(c) => c,
            Letter::Blank(Some(c)) => c,
            Letter::Blank(None) => '_',
        }
    }

    pub fn is_blank(self) -> bool {
        matches!(self, Letter::Blank(_))
    }

    /// The form in which this letter lives in the bag or on a rack: a
    /// blank loses its assigned face when it leaves the board.
    pub fn as_bag_letter(self) -> Letter {
        match self {
            Letter::Blank(_) => Letter::Blank(None),
            plain => plain,
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.face())
    }
}

/// The shuffled multiset of letters not yet drawn.
#[derive(Debug)]
pub struct Bag {
    letters: Vec<Letter>,
    rng: StdRng,
}

impl Bag {
    /// A full, shuffled bag seeded from the OS entropy source.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// A full, shuffled bag with a fixed seed, for deterministic games.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let mut letters: Vec<Letter> = LETTER_DATA
            .iter()
            .flat_map(|&(c, _, count)| (0..count).map(move |_| Letter::Plain(c)))
            .collect();
        letters.extend((0..BLANK_COUNT).map(|_| Letter::Blank(None)));
        let mut bag = Self { letters, rng };
        bag.shuffle();
        bag
    }

    /// An empty bag that letters can be returned to later. Used for
    /// custom game setups.
    pub fn empty() -> Self {
        Self {
            letters: Vec::new(),
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    /// Draw up to `n` letters. Fewer are returned when the bag runs dry.
    pub fn draw(&mut self, n: usize) -> Vec<Letter> {
        let take = n.min(self.letters.len());
        self.letters.split_off(self.letters.len() - take)
    }

    /// Return letters to the bag (assigned blank faces are stripped) and
    /// reshuffle.
    pub fn put_back<I: IntoIterator<Item = Letter>>(&mut self, letters: I) {
        self.letters
            .extend(letters.into_iter().map(Letter::as_bag_letter));
        self.shuffle();
    }

    pub fn shuffle(&mut self) {
        self.letters.shuffle(&mut self.rng);
    }
}

impl Default for Bag {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_distribution_has_100_tiles() {
        assert_eq!(total_tile_count(), 100);
        assert_eq!(Bag::with_seed(1).len(), 100);
    }

    #[test]
    fn letter_points_match_distribution() {
        assert_eq!(letter_points('A'), Some(1));
        assert_eq!(letter_points('K'), Some(2));
        assert_eq!(letter_points('Ź'), Some(9));
        assert_eq!(letter_points('Q'), None);
    }

    #[test]
    fn blanks_score_zero_even_when_assigned() {
        assert_eq!(Letter::Blank(None).points(), 0);
        assert_eq!(Letter::Blank(Some('A')).points(), 0);
        assert_eq!(Letter::Plain('Ź').points(), 9);
    }

    #[test]
    fn blank_face_is_placeholder_until_assigned() {
        assert_eq!(Letter::Blank(None).face(), '_');
        assert_eq!(Letter::Blank(Some('K')).face(), 'K');
    }

    #[test]
    fn draw_and_put_back_preserve_count() {
        let mut bag = Bag::with_seed(7);
        let drawn = bag.draw(7);
        assert_eq!(drawn.len(), 7);
        assert_eq!(bag.len(), 93);
        bag.put_back(drawn);
        assert_eq!(bag.len(), 100);
    }

    #[test]
    fn draw_past_empty_returns_what_is_left() {
        let mut bag = Bag::with_seed(7);
        bag.draw(98);
        assert_eq!(bag.draw(7).len(), 2);
        assert!(bag.is_empty());
        assert!(bag.draw(7).is_empty());
    }

    #[test]
    fn put_back_strips_blank_faces() {
        let mut bag = Bag::empty();
        bag.put_back([Letter::Blank(Some('A'))]);
        assert_eq!(bag.draw(1), vec![Letter::Blank(None)]);
    }

    #[test]
    fn seeded_bags_draw_identically() {
        let mut a = Bag::with_seed(42);
        let mut b = Bag::with_seed(42);
        assert_eq!(a.draw(10), b.draw(10));
    }
}
