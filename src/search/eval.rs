use crate::board::bitboard::Bits;
use crate::board::{Color, PieceKind, Position};

const PAWN: i32 = 100;
const KNIGHT: i32 = 320;
const BISHOP: i32 = 330;
const ROOK: i32 = 500;
const QUEEN: i32 = 900;

const TEMPO: i32 = 12;
const BISHOP_PAIR: i32 = 25;

// Mate scoring helpers
pub const MATE_SCORE: i32 = 30_000;
pub const DRAW_SCORE: i32 = 0;
pub const INF: i32 = 100_000;
/// Scores at or beyond this magnitude encode a forced mate.
pub const MATE_BOUND: i32 = MATE_SCORE - 128;

/// Static evaluation seen from the side to move (positive favors the mover).
///
/// Implementations must be pure: the same position always gets the same score.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, pos: &Position) -> i32;
}

#[inline]
pub fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => PAWN,
        PieceKind::Knight => KNIGHT,
        PieceKind::Bishop => BISHOP,
        PieceKind::Rook => ROOK,
        PieceKind::Queen => QUEEN,
        PieceKind::King => 0,
    }
}

// Side-agnostic material in centipawns: positive means White has more material.
pub fn material_eval_cp_side_agnostic(pos: &Position) -> i32 {
    PieceKind::ALL
        .iter()
        .map(|&k| {
            let w = pos.pieces_of(Color::White, k).count_ones() as i32;
            let b = pos.pieces_of(Color::Black, k).count_ones() as i32;
            (w - b) * piece_value(k)
        })
        .sum()
}

// Material from side-to-move perspective (negamax-friendly)
pub fn material_eval_cp(pos: &Position) -> i32 {
    let base = material_eval_cp_side_agnostic(pos);
    if pos.side_to_move() == Color::White { base } else { -base }
}

/// Counts material only.
#[derive(Debug, Default, Clone, Copy)]
pub struct MaterialEvaluator;

impl Evaluator for MaterialEvaluator {
    fn evaluate(&self, pos: &Position) -> i32 { material_eval_cp(pos) }
}

// Tables are laid out as printed boards (rank 8 first) from White's side;
// a white piece on `sq` reads index `sq ^ 56`, a black one reads `sq`.
#[rustfmt::skip]
const PST_PAWN: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const PST_KNIGHT: [i32; 64] = [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const PST_BISHOP: [i32; 64] = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5, 10, 10,  5,  0,-10,
    -10,  5,  5, 10, 10,  5,  5,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10, 10, 10, 10, 10, 10, 10,-10,
    -10,  5,  0,  0,  0,  0,  5,-10,
    -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const PST_ROOK: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
const PST_QUEEN: [i32; 64] = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5,  5,  5,  5,  0,-10,
     -5,  0,  5,  5,  5,  5,  0, -5,
      0,  0,  5,  5,  5,  5,  0, -5,
    -10,  5,  5,  5,  5,  5,  0,-10,
    -10,  0,  5,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const PST_KING_MG: [i32; 64] = [
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -20,-30,-30,-40,-40,-30,-30,-20,
    -10,-20,-20,-20,-20,-20,-20,-10,
     20, 20,  0,  0,  0,  0, 20, 20,
     20, 30, 10,  0,  0, 10, 30, 20,
];

#[rustfmt::skip]
const PST_KING_EG: [i32; 64] = [
    -50,-40,-30,-20,-20,-30,-40,-50,
    -30,-20,-10,  0,  0,-10,-20,-30,
    -30,-10, 20, 30, 30, 20,-10,-30,
    -30,-10, 30, 40, 40, 30,-10,-30,
    -30,-10, 30, 40, 40, 30,-10,-30,
    -30,-10, 20, 30, 30, 20,-10,-30,
    -30,-30,  0,  0,  0,  0,-30,-30,
    -50,-30,-30,-30,-30,-30,-30,-50,
];

/// Non-pawn material of both sides with every piece on the board (2 × 31).
const PHASE_MAX: i32 = 62;

/// Material, piece-square tables with a king table tapered by remaining
/// material, a bishop-pair bonus and a tempo bonus.
#[derive(Debug, Default, Clone, Copy)]
pub struct PieceSquareEvaluator;

impl PieceSquareEvaluator {
    fn side_score(pos: &Position, color: Color, phase: i32) -> i32 {
        let flip = if color == Color::White { 56 } else { 0 };
        let mut score = 0;
        for kind in PieceKind::ALL {
            let bb = pos.pieces_of(color, kind);
            for sq in Bits(bb) {
                let i = (sq ^ flip) as usize;
                score += piece_value(kind);
                score += match kind {
                    PieceKind::Pawn => PST_PAWN[i],
                    PieceKind::Knight => PST_KNIGHT[i],
                    PieceKind::Bishop => PST_BISHOP[i],
                    PieceKind::Rook => PST_ROOK[i],
                    PieceKind::Queen => PST_QUEEN[i],
                    PieceKind::King => (PST_KING_MG[i] * phase + PST_KING_EG[i] * (PHASE_MAX - phase)) / PHASE_MAX,
                };
            }
        }
        if pos.pieces_of(color, PieceKind::Bishop).count_ones() >= 2 {
            score += BISHOP_PAIR;
        }
        score
    }
}

impl Evaluator for PieceSquareEvaluator {
    fn evaluate(&self, pos: &Position) -> i32 {
        let phase = (pos.non_pawn_material(Color::White) + pos.non_pawn_material(Color::Black)).min(PHASE_MAX);
        let white = Self::side_score(pos, Color::White, phase);
        let black = Self::side_score(pos, Color::Black, phase);
        let base = white - black;
        let stm = if pos.side_to_move() == Color::White { base } else { -base };
        stm + TEMPO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_is_balanced_up_to_tempo() {
        let pos = Position::startpos();
        assert_eq!(material_eval_cp(&pos), 0);
        assert_eq!(PieceSquareEvaluator.evaluate(&pos), TEMPO);
    }

    #[test]
    fn mirrored_positions_score_the_same_for_the_mover() {
        let w = Position::from_fen("4k3/8/8/8/3N4/8/8/4K3 w - - 0 1").unwrap();
        let b = Position::from_fen("4k3/8/8/3n4/8/8/8/4K3 b - - 0 1").unwrap();
        assert_eq!(PieceSquareEvaluator.evaluate(&w), PieceSquareEvaluator.evaluate(&b));
    }

    #[test]
    fn king_prefers_center_in_endgame() {
        let center = Position::from_fen("7k/8/8/8/3K4/8/8/8 w - - 0 1").unwrap();
        let corner = Position::from_fen("7k/8/8/8/8/8/8/K7 w - - 0 1").unwrap();
        assert!(PieceSquareEvaluator.evaluate(&center) > PieceSquareEvaluator.evaluate(&corner));
    }
}
