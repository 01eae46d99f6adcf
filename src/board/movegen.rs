//! Pseudo-legal move generation into fixed-capacity buffers.
//!
//! Moves that leave the mover's own king attacked are still produced; callers
//! filter them by applying the move and asking `is_square_attacked`.

use std::ops::Index;

use super::attacks::is_square_attacked;
use super::bitboard::*;
use super::mv::{Move, MoveKind};
use super::position::Position;
use super::types::*;
use crate::error::MoveParseError;

/// Upper bound on pseudo-legal moves in any reachable position (the known
/// maximum is 218), not a limit checked at run time.
pub const MAX_MOVES: usize = 256;

#[derive(Clone)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl Default for MoveList {
    fn default() -> Self { Self::new() }
}

impl MoveList {
    pub const fn new() -> Self { Self { moves: [Move::NONE; MAX_MOVES], len: 0 } }

    #[inline]
    pub fn clear(&mut self) { self.len = 0; }

    #[inline]
    pub fn push(&mut self, mv: Move) {
        self.moves[self.len] = mv;
        self.len += 1;
    }

    #[inline]
    pub fn len(&self) -> usize { self.len }

    #[inline]
    pub fn is_empty(&self) -> bool { self.len == 0 }

    #[inline]
    pub fn as_slice(&self) -> &[Move] { &self.moves[..self.len] }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Move] { &mut self.moves[..self.len] }

    #[inline]
    pub fn swap(&mut self, a: usize, b: usize) { self.moves[..self.len].swap(a, b); }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> { self.as_slice().iter() }

    pub fn contains(&self, mv: Move) -> bool { self.as_slice().contains(&mv) }
}

impl Index<usize> for MoveList {
    type Output = Move;

    fn index(&self, i: usize) -> &Move { &self.as_slice()[i] }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter().map(|m| m.to_string())).finish()
    }
}

/// Appends every pseudo-legal move of the side to move, castling and en passant included.
pub fn generate_all(pos: &Position, list: &mut MoveList) {
    list.clear();
    let us = pos.side_to_move();
    let own = pos.color_bb(us);
    let opp = pos.color_bb(us.flip());
    let occ = pos.occupied();

    pawn_pushes(pos, list);
    pawn_captures(pos, list);

    for from in Bits(pos.pieces_of(us, PieceKind::Knight)) {
        push_targets(list, from, knight_attacks(from) & !own, opp);
    }
    for from in Bits(pos.pieces_of(us, PieceKind::Bishop)) {
        push_targets(list, from, bishop_attacks(from, occ) & !own, opp);
    }
    for from in Bits(pos.pieces_of(us, PieceKind::Rook)) {
        push_targets(list, from, rook_attacks(from, occ) & !own, opp);
    }
    for from in Bits(pos.pieces_of(us, PieceKind::Queen)) {
        push_targets(list, from, queen_attacks(from, occ) & !own, opp);
    }
    let king = pos.king_square(us);
    push_targets(list, king, king_attacks(king) & !own, opp);
    castling(pos, list);
}

/// Appends only captures (capture-promotions and en passant included).
pub fn generate_captures(pos: &Position, list: &mut MoveList) {
    list.clear();
    let us = pos.side_to_move();
    let opp = pos.color_bb(us.flip());
    let occ = pos.occupied();

    pawn_captures(pos, list);

    for from in Bits(pos.pieces_of(us, PieceKind::Knight)) {
        push_targets(list, from, knight_attacks(from) & opp, opp);
    }
    for from in Bits(pos.pieces_of(us, PieceKind::Bishop)) {
        push_targets(list, from, bishop_attacks(from, occ) & opp, opp);
    }
    for from in Bits(pos.pieces_of(us, PieceKind::Rook)) {
        push_targets(list, from, rook_attacks(from, occ) & opp, opp);
    }
    for from in Bits(pos.pieces_of(us, PieceKind::Queen)) {
        push_targets(list, from, queen_attacks(from, occ) & opp, opp);
    }
    let king = pos.king_square(us);
    push_targets(list, king, king_attacks(king) & opp, opp);
}

#[inline]
fn push_targets(list: &mut MoveList, from: Square, targets: u64, opp: u64) {
    for to in Bits(targets) {
        let kind = if opp & bit(to) != 0 { MoveKind::Capture } else { MoveKind::Quiet };
        list.push(Move::simple(from, to, kind));
    }
}

fn push_promotions(list: &mut MoveList, us: Color, from: Square, to: Square, capture: bool) {
    for kind in [PieceKind::Queen, PieceKind::Rook, PieceKind::Bishop, PieceKind::Knight] {
        list.push(Move::promote(from, to, Piece::new(us, kind), capture));
    }
}

fn pawn_pushes(pos: &Position, list: &mut MoveList) {
    let us = pos.side_to_move();
    let pawns = pos.pieces_of(us, PieceKind::Pawn);
    let empty = !pos.occupied();
    let (promo_rank, double_rank, back): (u64, u64, i8) = match us {
        Color::White => (RANK_8, RANK_4, -8),
        Color::Black => (RANK_1, RANK_5, 8),
    };

    let single = pawn_push(us, pawns) & empty;
    for to in Bits(single & promo_rank) {
        push_promotions(list, us, offset(to, back), to, false);
    }
    for to in Bits(single & !promo_rank) {
        list.push(Move::simple(offset(to, back), to, MoveKind::Quiet));
    }
    let double = pawn_push(us, single) & empty & double_rank;
    for to in Bits(double) {
        list.push(Move::simple(offset(to, 2 * back), to, MoveKind::DoublePawnPush));
    }
}

fn pawn_captures(pos: &Position, list: &mut MoveList) {
    let us = pos.side_to_move();
    let pawns = pos.pieces_of(us, PieceKind::Pawn);
    let opp = pos.color_bb(us.flip());
    let promo_rank = if us == Color::White { RANK_8 } else { RANK_1 };
    // Offsets from a target square back to the capturing pawn.
    let (west_back, east_back): (i8, i8) = match us {
        Color::White => (-7, -9),
        Color::Black => (9, 7),
    };

    for (targets, back) in [
        (pawn_attacks_west(us, pawns), west_back),
        (pawn_attacks_east(us, pawns), east_back),
    ] {
        let caps = targets & opp;
        for to in Bits(caps & promo_rank) {
            push_promotions(list, us, offset(to, back), to, true);
        }
        for to in Bits(caps & !promo_rank) {
            list.push(Move::simple(offset(to, back), to, MoveKind::Capture));
        }
    }

    if let Some(ep) = pos.en_passant() {
        // Pawns that would attack the target square are exactly the capturers.
        for from in Bits(pawn_attacks(us.flip(), ep) & pawns) {
            list.push(Move::simple(from, ep, MoveKind::EnPassant));
        }
    }
}

fn castling(pos: &Position, list: &mut MoveList) {
    let us = pos.side_to_move();
    let them = us.flip();
    let rights = pos.castling_rights();
    let occ = pos.occupied();
    let (king_flag, queen_flag, e, f, g, d, c, b) = match us {
        Color::White => (WHITE_KINGSIDE, WHITE_QUEENSIDE, E1, F1, G1, D1, C1, B1),
        Color::Black => (BLACK_KINGSIDE, BLACK_QUEENSIDE, E8, F8, G8, D8, C8, B8),
    };
    let safe = |sq| !is_square_attacked(pos, sq, them);

    if rights & king_flag != 0 && occ & (bit(f) | bit(g)) == 0 && safe(e) && safe(f) && safe(g) {
        list.push(Move::simple(e, g, MoveKind::KingCastle));
    }
    if rights & queen_flag != 0 && occ & (bit(b) | bit(c) | bit(d)) == 0 && safe(e) && safe(d) && safe(c) {
        list.push(Move::simple(e, c, MoveKind::QueenCastle));
    }
}

#[inline]
fn offset(sq: Square, delta: i8) -> Square { (sq as i8 + delta) as Square }

/// Applies `mv`, reports whether the mover's king survived, and undoes it.
pub fn is_legal(pos: &mut Position, mv: Move) -> bool {
    let us = pos.side_to_move();
    pos.apply(mv);
    let ok = !is_square_attacked(pos, pos.king_square(us), us.flip());
    pos.undo();
    ok
}

/// Pseudo-legal moves filtered down to those that keep the mover's king safe.
pub fn legal_moves(pos: &mut Position) -> MoveList {
    let mut pseudo = MoveList::new();
    generate_all(pos, &mut pseudo);
    let mut legal = MoveList::new();
    for &mv in &pseudo {
        if is_legal(pos, mv) {
            legal.push(mv);
        }
    }
    legal
}

pub fn has_legal_move(pos: &mut Position) -> bool {
    let mut pseudo = MoveList::new();
    generate_all(pos, &mut pseudo);
    pseudo.iter().any(|&mv| is_legal(pos, mv))
}

/// Resolves long algebraic text (`e2e4`, `a7a8q`) against the legal moves of `pos`.
pub fn parse_uci_move(pos: &mut Position, text: &str) -> Result<Move, MoveParseError> {
    let text = text.trim();
    let syntax = || MoveParseError::Syntax(text.to_string());
    if !(4..=5).contains(&text.len()) || !text.is_ascii() {
        return Err(syntax());
    }
    let from = square_from_str(&text[0..2]).ok_or_else(syntax)?;
    let to = square_from_str(&text[2..4]).ok_or_else(syntax)?;
    let promo = match text.as_bytes().get(4) {
        None => None,
        Some(b'q') => Some(PieceKind::Queen),
        Some(b'r') => Some(PieceKind::Rook),
        Some(b'b') => Some(PieceKind::Bishop),
        Some(b'n') => Some(PieceKind::Knight),
        Some(_) => return Err(syntax()),
    };
    legal_moves(pos)
        .iter()
        .copied()
        .find(|m| m.from() == from && m.to() == to && m.promotion().map(|p| p.kind()) == promo)
        .ok_or_else(|| MoveParseError::Illegal(text.to_string()))
}
