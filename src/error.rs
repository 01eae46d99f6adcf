use thiserror::Error;

/// Malformed position text. Parsing builds a fresh position, so a failure never
/// leaves a half-loaded one behind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("expected 4 to 6 fields, found {0}")]
    FieldCount(usize),
    #[error("piece placement must have 8 ranks, found {0}")]
    RankCount(usize),
    #[error("rank {rank} describes {files} files")]
    RankWidth { rank: usize, files: usize },
    #[error("unknown piece letter '{0}'")]
    PieceLetter(char),
    #[error("side to move must be 'w' or 'b', found '{0}'")]
    SideToMove(String),
    #[error("bad castling field '{0}'")]
    Castling(String),
    #[error("bad en passant square '{0}'")]
    EnPassant(String),
    #[error("bad move counter '{0}'")]
    Counter(String),
    #[error("{color} must have exactly one king, found {count}")]
    KingCount { color: &'static str, count: u32 },
    #[error("the side not to move is in check")]
    OpponentInCheck,
}

/// Text that does not name a legal move of the position it was parsed against.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("'{0}' is not long algebraic notation")]
    Syntax(String),
    #[error("'{0}' is not a legal move here")]
    Illegal(String),
}
