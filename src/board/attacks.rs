use super::bitboard::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};
use super::position::Position;
use super::types::{Color, PieceKind, Square};

/// True when any piece of `by` attacks `sq` under the current occupancy.
///
/// Each piece class is tested by looking outwards from `sq` with that class's
/// own pattern; for pawns that means the defender-colored capture pattern.
pub fn is_square_attacked(pos: &Position, sq: Square, by: Color) -> bool {
    let occ = pos.occupied();

    if pawn_attacks(by.flip(), sq) & pos.pieces_of(by, PieceKind::Pawn) != 0 {
        return true;
    }
    if knight_attacks(sq) & pos.pieces_of(by, PieceKind::Knight) != 0 {
        return true;
    }
    if king_attacks(sq) & pos.pieces_of(by, PieceKind::King) != 0 {
        return true;
    }
    let queens = pos.pieces_of(by, PieceKind::Queen);
    if bishop_attacks(sq, occ) & (pos.pieces_of(by, PieceKind::Bishop) | queens) != 0 {
        return true;
    }
    rook_attacks(sq, occ) & (pos.pieces_of(by, PieceKind::Rook) | queens) != 0
}

/// Every square attacked by `by`.
pub fn attacked_squares(pos: &Position, by: Color) -> u64 {
    let occ = pos.occupied();
    let mut out = 0u64;
    for kind in PieceKind::ALL {
        for from in super::bitboard::Bits(pos.pieces_of(by, kind)) {
            out |= match kind {
                PieceKind::Pawn => pawn_attacks(by, from),
                PieceKind::Knight => knight_attacks(from),
                PieceKind::Bishop => bishop_attacks(from, occ),
                PieceKind::Rook => rook_attacks(from, occ),
                PieceKind::Queen => bishop_attacks(from, occ) | rook_attacks(from, occ),
                PieceKind::King => king_attacks(from),
            };
        }
    }
    out
}
