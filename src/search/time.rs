//! Per-move time budget from the clock. The recursive search never looks at
//! the clock; callers turn this budget into `SearchParams::movetime`.

use crate::board::movegen::{generate_all, MoveList};
use crate::board::Position;

pub const MIN_TIME_MS: u64 = 5;
const PANIC_TIME_MS: u64 = 5_000;
const PANIC_MOVE_MS: u64 = 80;
const MAX_RATIO: f64 = 0.20;
const INC_USAGE: f64 = 0.80;
/// Milliseconds always left on the clock.
const RESERVE_MS: u64 = 50;

/// Milliseconds to spend on the next move.
///
/// `recent_evals` holds root scores of earlier moves, oldest first; the last
/// two measure how swingy the game is. Missing entries count as 0.
pub fn compute_budget(pos: &Position, remaining_ms: u64, increment_ms: u64, move_number: u32, recent_evals: &[i32]) -> u64 {
    if remaining_ms == 0 { return MIN_TIME_MS; }
    if remaining_ms < PANIC_TIME_MS {
        return (remaining_ms / 10).min(PANIC_MOVE_MS).max(MIN_TIME_MS);
    }

    let endgame = pos.non_pawn_material(pos.side_to_move()) <= 5;
    let moves_remaining = if endgame {
        15
    } else if move_number < 15 {
        40
    } else if move_number < 40 {
        25
    } else {
        20
    };

    let base = remaining_ms as f64 / moves_remaining as f64 + increment_ms as f64 * INC_USAGE;

    let mut complexity = 1.0;
    if pos.in_check() { complexity *= 2.0; }
    let mut moves = MoveList::new();
    generate_all(pos, &mut moves);
    if moves.len() > 35 {
        complexity *= 1.2;
    } else if moves.len() < 8 {
        complexity *= 0.75;
    }
    if move_number < 10 { complexity *= 0.75; }
    if endgame { complexity *= 0.85; }

    let last = |back: usize| recent_evals.len().checked_sub(back).map_or(0, |i| recent_evals[i]);
    let delta = (last(1) - last(2)).abs();
    let volatility = 1.0 + (delta as f64 / 120.0).min(1.0);

    let mut allocated = (base * complexity * volatility) as u64;
    let mut max_allowed = (remaining_ms as f64 * MAX_RATIO) as u64;
    if increment_ms > 0 { max_allowed += increment_ms / 2; }
    allocated = allocated.min(max_allowed).max(MIN_TIME_MS);
    if allocated > remaining_ms.saturating_sub(RESERVE_MS) {
        allocated = remaining_ms.saturating_sub(RESERVE_MS).max(MIN_TIME_MS);
    }
    allocated
}
