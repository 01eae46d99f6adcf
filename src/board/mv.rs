use std::fmt;

use super::types::{square_name, Piece, PieceKind, Square};

/// What a move does besides relocating a piece. Bit 3 marks a promotion and
/// bit 2 on top of it marks a capturing promotion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveKind {
    Quiet = 0,
    Capture = 1,
    DoublePawnPush = 2,
    KingCastle = 3,
    QueenCastle = 4,
    EnPassant = 5,
    PromoKnight = 8,
    PromoBishop = 9,
    PromoRook = 10,
    PromoQueen = 11,
    PromoKnightCapture = 12,
    PromoBishopCapture = 13,
    PromoRookCapture = 14,
    PromoQueenCapture = 15,
}

impl MoveKind {
    #[inline]
    pub const fn bits(self) -> u8 { self as u8 }

    /// Decodes a 4-bit kind field. Values 6 and 7 are reserved and never produced.
    #[inline]
    pub const fn from_bits(bits: u8) -> Option<MoveKind> {
        Some(match bits {
            0 => MoveKind::Quiet,
            1 => MoveKind::Capture,
            2 => MoveKind::DoublePawnPush,
            3 => MoveKind::KingCastle,
            4 => MoveKind::QueenCastle,
            5 => MoveKind::EnPassant,
            8 => MoveKind::PromoKnight,
            9 => MoveKind::PromoBishop,
            10 => MoveKind::PromoRook,
            11 => MoveKind::PromoQueen,
            12 => MoveKind::PromoKnightCapture,
            13 => MoveKind::PromoBishopCapture,
            14 => MoveKind::PromoRookCapture,
            15 => MoveKind::PromoQueenCapture,
            _ => return None,
        })
    }

    /// Kind for a promotion to `kind`, capturing or not.
    pub const fn promotion(kind: PieceKind, capture: bool) -> MoveKind {
        match (kind, capture) {
            (PieceKind::Knight, false) => MoveKind::PromoKnight,
            (PieceKind::Bishop, false) => MoveKind::PromoBishop,
            (PieceKind::Rook, false) => MoveKind::PromoRook,
            (PieceKind::Knight, true) => MoveKind::PromoKnightCapture,
            (PieceKind::Bishop, true) => MoveKind::PromoBishopCapture,
            (PieceKind::Rook, true) => MoveKind::PromoRookCapture,
            (_, false) => MoveKind::PromoQueen,
            (_, true) => MoveKind::PromoQueenCapture,
        }
    }

    #[inline]
    pub const fn is_promotion(self) -> bool { self.bits() & 8 != 0 }

    #[inline]
    pub const fn is_capture(self) -> bool {
        matches!(self, MoveKind::Capture | MoveKind::EnPassant) || self.bits() >= 12
    }
}

/// A move packed into 20 bits: from (0..5), to (6..11), promotion piece (12..15)
/// and kind (16..19). The zero value doubles as "no move".
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move(u32);

const SQ_MASK: u32 = 0x3F;
const NIBBLE: u32 = 0xF;

impl Move {
    pub const NONE: Move = Move(0);

    #[inline]
    pub const fn new(from: Square, to: Square, promo: u8, kind: MoveKind) -> Move {
        Move((from as u32 & SQ_MASK)
            | ((to as u32 & SQ_MASK) << 6)
            | ((promo as u32 & NIBBLE) << 12)
            | ((kind as u32 & NIBBLE) << 16))
    }

    #[inline]
    pub const fn simple(from: Square, to: Square, kind: MoveKind) -> Move {
        Move::new(from, to, 0, kind)
    }

    #[inline]
    pub const fn promote(from: Square, to: Square, piece: Piece, capture: bool) -> Move {
        Move::new(from, to, piece.index() as u8, MoveKind::promotion(piece.kind(), capture))
    }

    #[inline]
    pub const fn from_raw(raw: u32) -> Move { Move(raw & 0xF_FFFF) }

    #[inline]
    pub const fn raw(self) -> u32 { self.0 }

    #[inline]
    pub const fn is_none(self) -> bool { self.0 == 0 }

    #[inline]
    pub const fn from(self) -> Square { (self.0 & SQ_MASK) as Square }

    #[inline]
    pub const fn to(self) -> Square { ((self.0 >> 6) & SQ_MASK) as Square }

    /// Raw promotion field: the packed index of the promoted piece.
    #[inline]
    pub const fn promo_bits(self) -> u8 { ((self.0 >> 12) & NIBBLE) as u8 }

    #[inline]
    pub const fn kind_bits(self) -> u8 { ((self.0 >> 16) & NIBBLE) as u8 }

    /// The decoded kind. Moves are only ever built from valid kinds; a reserved
    /// value here means the bits were not produced by this crate.
    #[inline]
    pub fn kind(self) -> MoveKind {
        match MoveKind::from_bits(self.kind_bits()) {
            Some(k) => k,
            None => panic!("reserved move kind {} in {:#07x}", self.kind_bits(), self.0),
        }
    }

    #[inline]
    pub const fn promotion(self) -> Option<Piece> {
        if self.kind_bits() & 8 != 0 { Piece::from_index(self.promo_bits()) } else { None }
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        let k = self.kind_bits();
        k == MoveKind::Capture as u8 || k == MoveKind::EnPassant as u8 || k >= 12
    }

    #[inline]
    pub const fn is_promotion(self) -> bool { self.kind_bits() & 8 != 0 }

    #[inline]
    pub const fn is_quiet(self) -> bool { !self.is_capture() && !self.is_promotion() }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            return f.write_str("0000");
        }
        write!(f, "{}{}", square_name(self.from()), square_name(self.to()))?;
        if let Some(p) = self.promotion() {
            write!(f, "{}", p.to_char().to_ascii_lowercase())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            return f.write_str("Move(none)");
        }
        write!(f, "Move({self} {:?})", MoveKind::from_bits(self.kind_bits()))
    }
}
