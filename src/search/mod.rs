pub mod alphabeta;
pub mod eval;
pub mod ordering;
pub mod smp;
pub mod time;
pub mod tt;

pub use alphabeta::{SearchParams, SearchResult, Searcher};
pub use eval::{Evaluator, PieceSquareEvaluator};
pub use smp::SearchCoordinator;
pub use tt::TranspositionTable;
