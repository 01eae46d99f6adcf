// Leaf counting with apply/undo on one position (no cloning below the root)
use crate::board::movegen::{generate_all, is_legal, MoveList};
use crate::board::{Move, Position};

pub fn perft(pos: &mut Position, depth: u32) -> u64 {
    if depth == 0 { return 1; }
    let mut moves = MoveList::new();
    generate_all(pos, &mut moves);
    let mut nodes = 0u64;
    for &mv in &moves {
        if !is_legal(pos, mv) { continue; }
        if depth == 1 {
            nodes += 1;
            continue;
        }
        pos.apply(mv);
        nodes += perft(pos, depth - 1);
        pos.undo();
    }
    nodes
}

/// Per-root-move leaf counts, in generation order.
pub fn perft_divide(pos: &mut Position, depth: u32) -> Vec<(Move, u64)> {
    let mut out = Vec::new();
    if depth == 0 { return out; }
    let mut moves = MoveList::new();
    generate_all(pos, &mut moves);
    for &mv in &moves {
        if !is_legal(pos, mv) { continue; }
        pos.apply(mv);
        out.push((mv, perft(pos, depth - 1)));
        pos.undo();
    }
    out
}
