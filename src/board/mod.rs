pub mod attacks;
pub mod bitboard;
mod fen;
pub mod movegen;
pub mod mv;
pub mod position;
pub mod types;
pub mod zobrist;

pub use attacks::is_square_attacked;
pub use movegen::{generate_all, generate_captures, has_legal_move, legal_moves, parse_uci_move, MoveList};
pub use mv::{Move, MoveKind};
pub use position::{Position, START_FEN};
pub use types::{Color, Piece, PieceKind, Square};
