//! Per-worker move-ordering scratch: per-ply move and score buffers, killer
//! slots and the from/to history table. Everything is allocated once up front.

use crate::board::movegen::{generate_all, generate_captures, MoveList, MAX_MOVES};
use crate::board::{Move, MoveKind, PieceKind, Position};

pub const MAX_PLY: usize = 128;
/// Extra plies quiescence may descend below the main search horizon.
pub const Q_MAX_PLY: usize = 16;
pub const HISTORY_MAX: i32 = 200_000;

const TT_MOVE: i32 = 1_000_000;
const CAPTURE_BASE: i32 = 100_000;
const KILLER_1: i32 = 90_000;
const KILLER_2: i32 = 80_000;

const BUFFER_PLIES: usize = MAX_PLY + Q_MAX_PLY + 1;

// Ordering weights (distinct from evaluation values): P1 N3 B3 R5 Q9 K0.
#[inline]
fn order_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 1,
        PieceKind::Knight | PieceKind::Bishop => 3,
        PieceKind::Rook => 5,
        PieceKind::Queen => 9,
        PieceKind::King => 0,
    }
}

pub struct SearchContext {
    moves: Vec<MoveList>,
    scores: Vec<[i32; MAX_MOVES]>,
    killers: [[Move; 2]; MAX_PLY],
    history: Box<[[[i32; 64]; 64]; 2]>,
}

impl Default for SearchContext {
    fn default() -> Self { Self::new() }
}

impl SearchContext {
    pub fn new() -> Self {
        Self {
            moves: vec![MoveList::new(); BUFFER_PLIES],
            scores: vec![[0; MAX_MOVES]; BUFFER_PLIES],
            killers: [[Move::NONE; 2]; MAX_PLY],
            history: Box::new([[[0; 64]; 64]; 2]),
        }
    }

    /// Start-of-search aging: killers are forgotten, history is halved.
    pub fn new_search(&mut self) {
        self.killers = [[Move::NONE; 2]; MAX_PLY];
        for side in self.history.iter_mut() {
            for row in side.iter_mut() {
                for h in row.iter_mut() { *h >>= 1; }
            }
        }
    }

    pub fn history(&self, pos: &Position, mv: Move) -> i32 {
        self.history[pos.side_to_move().index()][mv.from() as usize][mv.to() as usize]
    }

    pub fn killers(&self, ply: usize) -> [Move; 2] { self.killers.get(ply).copied().unwrap_or([Move::NONE; 2]) }

    /// Fills the ply's buffer with every pseudo-legal move, scored for ordering.
    pub fn generate(&mut self, pos: &Position, ply: usize, tt_move: Option<Move>, use_killers: bool, use_history: bool) -> usize {
        generate_all(pos, &mut self.moves[ply]);
        self.score(pos, ply, tt_move, use_killers, use_history)
    }

    /// Fills the ply's buffer with captures only, ordered by victim then attacker.
    pub fn generate_captures(&mut self, pos: &Position, ply: usize) -> usize {
        generate_captures(pos, &mut self.moves[ply]);
        self.score(pos, ply, None, false, false)
    }

    fn score(&mut self, pos: &Position, ply: usize, tt_move: Option<Move>, use_killers: bool, use_history: bool) -> usize {
        let killers = if use_killers { self.killers(ply) } else { [Move::NONE; 2] };
        let side = pos.side_to_move().index();
        let n = self.moves[ply].len();
        for i in 0..n {
            let mv = self.moves[ply][i];
            self.scores[ply][i] = if Some(mv) == tt_move {
                TT_MOVE
            } else if mv.is_capture() {
                let victim = if mv.kind() == MoveKind::EnPassant {
                    PieceKind::Pawn
                } else {
                    pos.piece_at(mv.to()).map_or(PieceKind::Pawn, |p| p.kind())
                };
                let attacker = pos.piece_at(mv.from()).map_or(PieceKind::Pawn, |p| p.kind());
                CAPTURE_BASE + order_value(victim) * 10 - order_value(attacker)
            } else if !mv.is_none() && mv == killers[0] {
                KILLER_1
            } else if !mv.is_none() && mv == killers[1] {
                KILLER_2
            } else if use_history {
                self.history[side][mv.from() as usize][mv.to() as usize]
            } else {
                0
            };
        }
        n
    }

    /// Selection step: swaps the best remaining move into slot `i` and returns it.
    pub fn pick(&mut self, ply: usize, i: usize) -> Move {
        let n = self.moves[ply].len();
        let scores = &mut self.scores[ply];
        let mut best = i;
        for j in i + 1..n {
            if scores[j] > scores[best] { best = j; }
        }
        if best != i {
            scores.swap(i, best);
            self.moves[ply].swap(i, best);
        }
        self.moves[ply][i]
    }

    /// Records a quiet move that caused a beta cutoff.
    pub fn record_cutoff(&mut self, pos: &Position, ply: usize, mv: Move, depth: i32, use_killers: bool, use_history: bool) {
        if use_killers && ply < MAX_PLY {
            let slot = &mut self.killers[ply];
            if slot[0] != mv {
                slot[1] = slot[0];
                slot[0] = mv;
            }
        }
        if use_history && ply > 0 {
            let h = &mut self.history[pos.side_to_move().index()][mv.from() as usize][mv.to() as usize];
            *h = (*h + depth * depth).min(HISTORY_MAX);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_order_by_victim_then_cheaper_attacker() {
        // Pawn and queen can both take the rook on d5.
        let pos = Position::from_fen("4k3/8/2n5/3r4/4P3/8/8/3QK3 w - - 0 1").unwrap();
        let mut ctx = SearchContext::new();
        let n = ctx.generate_captures(&pos, 0);
        assert_eq!(n, 2);
        assert_eq!(ctx.pick(0, 0).to_string(), "e4d5");
        assert_eq!(ctx.pick(0, 1).to_string(), "d1d5");
    }

    #[test]
    fn tt_move_then_killers_lead_the_quiet_moves() {
        let pos = Position::startpos();
        let mut ctx = SearchContext::new();
        let killer = Move::simple(6, 21, MoveKind::Quiet); // g1f3
        let tt = Move::simple(12, 28, MoveKind::DoublePawnPush); // e2e4
        ctx.record_cutoff(&pos, 3, killer, 4, true, true);
        let n = ctx.generate(&pos, 3, Some(tt), true, true);
        assert_eq!(n, 20);
        assert_eq!(ctx.pick(3, 0), tt);
        assert_eq!(ctx.pick(3, 1), killer);
    }

    #[test]
    fn history_is_capped_and_halved() {
        let pos = Position::startpos();
        let mut ctx = SearchContext::new();
        let mv = Move::simple(1, 18, MoveKind::Quiet);
        for _ in 0..100 {
            ctx.record_cutoff(&pos, 1, mv, 60, false, true);
        }
        assert_eq!(ctx.history(&pos, mv), HISTORY_MAX);
        ctx.new_search();
        assert_eq!(ctx.history(&pos, mv), HISTORY_MAX / 2);
    }
}
