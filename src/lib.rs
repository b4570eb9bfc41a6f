//! Word-placement game core: board, placement rules, scoring, a
//! dictionary oracle and a time-boxed computer opponent.
//!
//! The crate is UI-agnostic. [`game::engine::MoveEngine`] is the entry
//! point: it owns the board, the bag and both racks, and exposes the
//! tentative-placement / commit / undo / exchange / pass operations a
//! front end drives.

pub mod game;
