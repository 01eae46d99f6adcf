//! Bitboard chess engine: hyperbola-quintessence attacks, pseudo-legal move
//! generation, and a multi-worker alpha-beta search over a shared lock-free
//! transposition table.
pub mod board;
pub mod config;
pub mod error;
pub mod perft;
pub mod search;
pub mod selfplay;
pub mod uci;

pub use board::{Move, Position};
pub use error::{FenError, MoveParseError};
