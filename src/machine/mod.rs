//! Core bean counter logic: the per-bean decision model and the board state
//! machine that moves beans from the waiting pool through the lattice into
//! the slots.

mod bean;
mod board;
mod mode;

pub use bean::{shared_rng, Bean, SharedRng};
pub use board::{Board, BoardPhase};
pub use mode::Mode;
