use std::sync::Arc;
use std::time::{Duration, Instant};

use log::debug;

use crate::board::position::HALFMOVE_LIMIT;
use crate::board::{is_square_attacked, Move, Position};
use crate::search::eval::{Evaluator, PieceSquareEvaluator, DRAW_SCORE, INF, MATE_BOUND, MATE_SCORE};
use crate::search::ordering::{SearchContext, MAX_PLY, Q_MAX_PLY};
use crate::search::tt::{Bound, Probe, TranspositionTable};

/// Depth cut applied to the null-move probe (one ply for the pass, two for the reduction).
const NULL_MOVE_CUT: i32 = 3;
/// Own non-pawn material below which passing is never tried.
const NULL_MOVE_MIN_MATERIAL: i32 = 8;

#[derive(Debug, Clone, Copy)]
pub struct SearchParams {
    /// Iterative-deepening ply limit.
    pub depth: u32,
    /// Workers used by [`SearchCoordinator`](crate::search::smp::SearchCoordinator); 0 means one per core.
    pub threads: usize,
    pub use_aspiration: bool,
    pub aspiration_window_cp: i32,
    pub use_nullmove: bool,
    pub use_lmr: bool,
    pub use_killers: bool,
    pub use_history: bool,
    /// Wall-clock allowance checked between iterations only.
    pub movetime: Option<Duration>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            depth: 6,
            threads: 1,
            use_aspiration: true,
            aspiration_window_cp: 50,
            use_nullmove: true,
            use_lmr: true,
            use_killers: true,
            use_history: true,
            movetime: None,
        }
    }
}

#[derive(Default, Debug, Clone)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub score_cp: i32,
    /// Last completed iteration.
    pub depth: u32,
    pub nodes: u64,
}

pub struct Searcher {
    tt: Arc<TranspositionTable>,
    eval: Arc<dyn Evaluator>,
    ctx: Box<SearchContext>,
    pub(crate) nodes: u64,
    root_best: Option<Move>,
    prev_best: Option<Move>,
    use_nullmove: bool,
    use_lmr: bool,
    use_killers: bool,
    use_history: bool,
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new(Arc::new(TranspositionTable::default()), Arc::new(PieceSquareEvaluator))
    }
}

impl Searcher {
    pub fn new(tt: Arc<TranspositionTable>, eval: Arc<dyn Evaluator>) -> Self {
        Self {
            tt,
            eval,
            ctx: Box::new(SearchContext::new()),
            nodes: 0,
            root_best: None,
            prev_best: None,
            use_nullmove: true,
            use_lmr: true,
            use_killers: true,
            use_history: true,
        }
    }

    pub fn tt(&self) -> &Arc<TranspositionTable> { &self.tt }

    pub fn nodes(&self) -> u64 { self.nodes }

    /// Quiescence value of `pos` from a full window.
    pub fn qsearch_eval_cp(&mut self, pos: &mut Position) -> i32 {
        self.qsearch(pos, -INF, INF, 0, 0)
    }

    /// Iterative deepening on one thread. The table generation is left alone;
    /// callers that want aging bump it once per move.
    pub fn search(&mut self, pos: &mut Position, params: &SearchParams) -> SearchResult {
        self.nodes = 0;
        self.root_best = None;
        self.prev_best = None;
        self.use_nullmove = params.use_nullmove;
        self.use_lmr = params.use_lmr;
        self.use_killers = params.use_killers;
        self.use_history = params.use_history;
        self.ctx.new_search();

        let deadline = params.movetime.map(|d| Instant::now() + d);
        let max_depth = params.depth.clamp(1, (MAX_PLY - 1) as u32);
        let window = params.aspiration_window_cp.max(1);
        let mut result = SearchResult::default();

        for d in 1..=max_depth {
            let depth = d as i32;
            let mut score;
            if params.use_aspiration && d > 1 {
                let alpha = result.score_cp - window;
                let beta = result.score_cp + window;
                score = self.alphabeta(pos, depth, alpha, beta, 0, true);
                if score <= alpha || score >= beta {
                    score = self.alphabeta(pos, depth, -INF, INF, 0, true);
                }
            } else {
                score = self.alphabeta(pos, depth, -INF, INF, 0, true);
            }

            self.prev_best = self.root_best;
            result = SearchResult { best_move: self.root_best, score_cp: score, depth: d, nodes: self.nodes };
            debug!(
                "depth {} score {} nodes {} best {}",
                d,
                score,
                self.nodes,
                self.root_best.map_or_else(|| "(none)".to_string(), |m| m.to_string())
            );

            // No legal move at the root: nothing deeper to find.
            if self.root_best.is_none() { break; }
            if let Some(dl) = deadline { if Instant::now() >= dl { break; } }
        }
        result
    }

    fn static_eval(&self, pos: &Position) -> i32 {
        self.eval.evaluate(pos).clamp(-(MATE_BOUND - 1), MATE_BOUND - 1)
    }

    fn alphabeta(&mut self, pos: &mut Position, depth: i32, mut alpha: i32, beta: i32, ply: usize, allow_null: bool) -> i32 {
        self.nodes += 1;

        if ply > 0 && (pos.is_repetition() || pos.halfmove_clock() >= HALFMOVE_LIMIT) {
            return DRAW_SCORE;
        }
        if depth <= 0 { return self.qsearch(pos, alpha, beta, ply, 0); }
        if ply >= MAX_PLY { return self.static_eval(pos); }

        let key = pos.key();
        let mut tt_move = match self.tt.probe(key, depth, alpha, beta, ply) {
            Probe::Exact { score, .. } | Probe::BetaCutoff { score, .. } | Probe::AlphaCutoff { score, .. } if ply > 0 => {
                return score;
            }
            p => p.best_move(),
        };
        if ply == 0 && tt_move.is_none() { tt_move = self.prev_best; }

        let us = pos.side_to_move();
        let in_check = pos.in_check();

        // Passing is unsound near zugzwang, hence the material floor.
        if self.use_nullmove
            && allow_null
            && ply > 0
            && depth >= NULL_MOVE_CUT
            && !in_check
            && pos.non_pawn_material(us) >= NULL_MOVE_MIN_MATERIAL
        {
            pos.apply_null();
            let score = -self.alphabeta(pos, depth - NULL_MOVE_CUT, -beta, -beta + 1, ply + 1, false);
            pos.undo_null();
            if score >= beta { return score; }
        }

        let count = self.ctx.generate(pos, ply, tt_move, self.use_killers, self.use_history);
        let orig_alpha = alpha;
        let mut best = -INF;
        let mut best_move: Option<Move> = None;
        let mut searched = 0usize;

        for i in 0..count {
            let mv = self.ctx.pick(ply, i);
            pos.apply(mv);
            if is_square_attacked(pos, pos.king_square(us), us.flip()) {
                pos.undo();
                continue;
            }
            searched += 1;

            let score = if searched == 1 {
                -self.alphabeta(pos, depth - 1, -beta, -alpha, ply + 1, true)
            } else {
                let mut reduction = 0;
                if self.use_lmr && !pos.in_check() && !mv.is_capture() && depth >= 3 && i >= 3 {
                    reduction = if i >= 8 && depth >= 5 { 2 } else { 1 };
                }
                let mut s = -self.alphabeta(pos, depth - 1 - reduction, -alpha - 1, -alpha, ply + 1, true);
                if reduction > 0 && s > alpha {
                    s = -self.alphabeta(pos, depth - 1, -alpha - 1, -alpha, ply + 1, true);
                }
                if s > alpha && s < beta {
                    s = -self.alphabeta(pos, depth - 1, -beta, -alpha, ply + 1, true);
                }
                s
            };
            pos.undo();

            if score > best {
                best = score;
                best_move = Some(mv);
                if ply == 0 { self.root_best = Some(mv); }
            }
            if score > alpha { alpha = score; }
            if alpha >= beta {
                if !mv.is_capture() {
                    self.ctx.record_cutoff(pos, ply, mv, depth, self.use_killers, self.use_history);
                }
                break;
            }
        }

        if searched == 0 {
            if ply == 0 { self.root_best = None; }
            return if in_check { -(MATE_SCORE - ply as i32) } else { DRAW_SCORE };
        }

        let bound = if best <= orig_alpha {
            Bound::Upper
        } else if best >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.tt.store(key, depth, best, bound, best_move, ply);
        best
    }

    fn qsearch(&mut self, pos: &mut Position, mut alpha: i32, beta: i32, ply: usize, qply: usize) -> i32 {
        self.nodes += 1;
        if pos.halfmove_clock() >= HALFMOVE_LIMIT { return DRAW_SCORE; }

        // Stand pat
        let stand = self.static_eval(pos);
        if qply >= Q_MAX_PLY { return stand; }
        if stand >= beta { return stand; }
        if stand > alpha { alpha = stand; }

        let us = pos.side_to_move();
        let count = self.ctx.generate_captures(pos, ply);
        for i in 0..count {
            let mv = self.ctx.pick(ply, i);
            pos.apply(mv);
            if is_square_attacked(pos, pos.king_square(us), us.flip()) {
                pos.undo();
                continue;
            }
            let score = -self.qsearch(pos, -beta, -alpha, ply + 1, qply + 1);
            pos.undo();
            if score >= beta { return score; }
            if score > alpha { alpha = score; }
        }
        alpha
    }
}
