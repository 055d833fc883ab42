//! Tic-tac-toe with a move history, written against the Eddy component model.
//!
//! The game is split the usual way: a stateless [`square`] button, a
//! [`board`] that turns clicks into new positions, and the stateful [`game`]
//! that owns the history and lets the player jump back to any move.

mod game;

pub use game::{Player, Squares, board, calculate_winner, game, square};
