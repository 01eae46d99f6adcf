//! Precomputed attack tables and the hyperbola-quintessence ray trick.
//!
//! Every table is built at compile time. Sliding attacks are computed per ray
//! with two wrapping subtractions, one of them on the bit-reversed board, so
//! no per-blocker branching is needed.

use super::types::{Color, Square};

pub const FILE_A: u64 = 0x0101_0101_0101_0101;
pub const FILE_B: u64 = FILE_A << 1;
pub const FILE_G: u64 = FILE_A << 6;
pub const FILE_H: u64 = FILE_A << 7;
pub const NOT_A_FILE: u64 = !FILE_A;
pub const NOT_H_FILE: u64 = !FILE_H;
pub const NOT_AB_FILES: u64 = !(FILE_A | FILE_B);
pub const NOT_GH_FILES: u64 = !(FILE_G | FILE_H);

pub const RANK_1: u64 = 0xFF;
pub const RANK_4: u64 = RANK_1 << 24;
pub const RANK_5: u64 = RANK_1 << 32;
pub const RANK_8: u64 = RANK_1 << 56;

#[inline]
pub const fn bit(sq: Square) -> u64 { 1u64 << sq }

#[inline]
pub const fn lsb(bb: u64) -> Square { bb.trailing_zeros() as Square }

#[inline]
pub const fn popcount(bb: u64) -> u32 { bb.count_ones() }

/// Iterates the set squares of a bitboard from a1 upwards.
#[derive(Clone, Copy, Debug)]
pub struct Bits(pub u64);

impl Iterator for Bits {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }
        let sq = lsb(self.0);
        self.0 &= self.0 - 1;
        Some(sq)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

const fn build_knight_masks() -> [u64; 64] {
    let mut t = [0u64; 64];
    let mut sq = 0;
    while sq < 64 {
        let b = 1u64 << sq;
        t[sq] = ((b << 17) & NOT_A_FILE)
            | ((b << 15) & NOT_H_FILE)
            | ((b << 10) & NOT_AB_FILES)
            | ((b << 6) & NOT_GH_FILES)
            | ((b >> 15) & NOT_A_FILE)
            | ((b >> 17) & NOT_H_FILE)
            | ((b >> 6) & NOT_AB_FILES)
            | ((b >> 10) & NOT_GH_FILES);
        sq += 1;
    }
    t
}

const fn build_king_masks() -> [u64; 64] {
    let mut t = [0u64; 64];
    let mut sq = 0;
    while sq < 64 {
        let b = 1u64 << sq;
        t[sq] = ((b << 1) & NOT_A_FILE)
            | ((b >> 1) & NOT_H_FILE)
            | (b << 8)
            | (b >> 8)
            | ((b << 9) & NOT_A_FILE)
            | ((b << 7) & NOT_H_FILE)
            | ((b >> 9) & NOT_H_FILE)
            | ((b >> 7) & NOT_A_FILE);
        sq += 1;
    }
    t
}

const fn build_pawn_attacks() -> [[u64; 64]; 2] {
    let mut t = [[0u64; 64]; 2];
    let mut sq = 0;
    while sq < 64 {
        let b = 1u64 << sq;
        t[0][sq] = ((b << 7) & NOT_H_FILE) | ((b << 9) & NOT_A_FILE);
        t[1][sq] = ((b >> 9) & NOT_H_FILE) | ((b >> 7) & NOT_A_FILE);
        sq += 1;
    }
    t
}

/// Ray through `sq` in direction (df, dr) and its opposite, excluding `sq`.
const fn line_through(sq: usize, df: i32, dr: i32) -> u64 {
    let mut mask = 0u64;
    let f0 = (sq % 8) as i32;
    let r0 = (sq / 8) as i32;
    let mut sign = -1;
    while sign <= 1 {
        let mut f = f0 + df * sign;
        let mut r = r0 + dr * sign;
        while f >= 0 && f < 8 && r >= 0 && r < 8 {
            mask |= 1u64 << (r * 8 + f);
            f += df * sign;
            r += dr * sign;
        }
        sign += 2;
    }
    mask
}

const fn build_lines(df: i32, dr: i32) -> [u64; 64] {
    let mut t = [0u64; 64];
    let mut sq = 0;
    while sq < 64 {
        t[sq] = line_through(sq, df, dr);
        sq += 1;
    }
    t
}

pub static KNIGHT_MASKS: [u64; 64] = build_knight_masks();
pub static KING_MASKS: [u64; 64] = build_king_masks();
/// Capture pattern of a pawn of the given color standing on the square.
pub static PAWN_ATTACKS: [[u64; 64]; 2] = build_pawn_attacks();
pub static FILE_MASKS: [u64; 64] = build_lines(0, 1);
pub static RANK_MASKS: [u64; 64] = build_lines(1, 0);
pub static DIAG_MASKS: [u64; 64] = build_lines(1, 1);
pub static ANTI_DIAG_MASKS: [u64; 64] = build_lines(-1, 1);

/// Attack set along one line mask through `sq`, stopping at (and including) the
/// first blocker on each side.
///
/// `forward` borrows through the empty squares above `sq` up to the nearest
/// blocker; the same subtraction on the bit-reversed board yields the downward
/// half. XOR cancels the untouched prefix shared by both.
#[inline]
pub fn ray_attacks(occ: u64, line: u64, sq: Square) -> u64 {
    let from = bit(sq);
    let on_ray = occ & line & !from;
    let forward = on_ray.wrapping_sub(from << 1);
    let backward = on_ray
        .reverse_bits()
        .wrapping_sub(from.reverse_bits() << 1)
        .reverse_bits();
    (forward ^ backward) & line
}

#[inline]
pub fn bishop_attacks(sq: Square, occ: u64) -> u64 {
    let s = sq as usize;
    ray_attacks(occ, DIAG_MASKS[s], sq) | ray_attacks(occ, ANTI_DIAG_MASKS[s], sq)
}

#[inline]
pub fn rook_attacks(sq: Square, occ: u64) -> u64 {
    let s = sq as usize;
    ray_attacks(occ, FILE_MASKS[s], sq) | ray_attacks(occ, RANK_MASKS[s], sq)
}

#[inline]
pub fn queen_attacks(sq: Square, occ: u64) -> u64 {
    bishop_attacks(sq, occ) | rook_attacks(sq, occ)
}

#[inline]
pub fn knight_attacks(sq: Square) -> u64 { KNIGHT_MASKS[sq as usize] }

#[inline]
pub fn king_attacks(sq: Square) -> u64 { KING_MASKS[sq as usize] }

#[inline]
pub fn pawn_attacks(color: Color, sq: Square) -> u64 { PAWN_ATTACKS[color.index()][sq as usize] }

/// Squares attacked towards the a-file side by every pawn in `pawns`.
#[inline]
pub fn pawn_attacks_west(color: Color, pawns: u64) -> u64 {
    match color {
        Color::White => (pawns << 7) & NOT_H_FILE,
        Color::Black => (pawns >> 9) & NOT_H_FILE,
    }
}

/// Squares attacked towards the h-file side by every pawn in `pawns`.
#[inline]
pub fn pawn_attacks_east(color: Color, pawns: u64) -> u64 {
    match color {
        Color::White => (pawns << 9) & NOT_A_FILE,
        Color::Black => (pawns >> 7) & NOT_A_FILE,
    }
}

#[inline]
pub fn pawn_push(color: Color, bb: u64) -> u64 {
    match color {
        Color::White => bb << 8,
        Color::Black => bb >> 8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ray walk used only to cross-check the subtraction trick.
    fn slow_slider(sq: Square, occ: u64, dirs: &[(i32, i32)]) -> u64 {
        let mut out = 0u64;
        let f0 = (sq % 8) as i32;
        let r0 = (sq / 8) as i32;
        for &(df, dr) in dirs {
            let (mut f, mut r) = (f0 + df, r0 + dr);
            while (0..8).contains(&f) && (0..8).contains(&r) {
                let b = 1u64 << (r * 8 + f);
                out |= b;
                if occ & b != 0 { break; }
                f += df;
                r += dr;
            }
        }
        out
    }

    #[test]
    fn sliders_match_ray_walk_on_edges_and_corners() {
        let rook_dirs = [(1, 0), (-1, 0), (0, 1), (0, -1)];
        let bishop_dirs = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
        let occupancies = [
            0u64,
            !0u64,
            0x8100_0000_0000_0081,
            0x0042_0024_1800_2400,
            0xFFFF_0000_0000_FFFF,
            0x8040_2010_0804_0201,
            0x0102_0408_1020_4080,
            0xAA55_AA55_AA55_AA55,
        ];
        for sq in 0..64u8 {
            for &occ in &occupancies {
                assert_eq!(rook_attacks(sq, occ), slow_slider(sq, occ, &rook_dirs), "rook sq {sq} occ {occ:#x}");
                assert_eq!(bishop_attacks(sq, occ), slow_slider(sq, occ, &bishop_dirs), "bishop sq {sq} occ {occ:#x}");
            }
        }
    }

    #[test]
    fn leaper_masks_have_expected_sizes() {
        assert_eq!(popcount(knight_attacks(0)), 2);
        assert_eq!(popcount(knight_attacks(27)), 8);
        assert_eq!(popcount(king_attacks(0)), 3);
        assert_eq!(popcount(king_attacks(63)), 3);
        assert_eq!(popcount(king_attacks(36)), 8);
        assert_eq!(pawn_attacks(Color::White, 8), bit(17));
        assert_eq!(pawn_attacks(Color::Black, 55), bit(46));
    }

    #[test]
    fn bits_iterates_in_order() {
        let v: Vec<Square> = Bits(bit(3) | bit(17) | bit(63)).collect();
        assert_eq!(v, vec![3, 17, 63]);
    }
}
