//! # Bean Counter
//!
//! A Galton board (quincunx) simulation. Beans fall one row at a time through
//! a triangular lattice of pegs, deciding left or right at every peg, and pile
//! up in slots at the bottom. Beans decide either by luck (a fair coin per
//! peg) or by skill (a per-bean right-move budget drawn once at creation).
//!
//! ## Modules
//!
//! - [`machine`] — Core logic: bean decision model, board state machine
//! - [`experiment`] — Runs a configured board to completion, with repeats and
//!   half-selection
//! - [`render`] — Text rendering of the lattice and the slot counts
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod config;
pub mod error;
pub mod experiment;
pub mod machine;
pub mod render;
