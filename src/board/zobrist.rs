use std::sync::OnceLock;

use super::bitboard::Bits;
use super::position::Position;
use super::types::{Color, Piece, Square};

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

pub struct Keys {
    pub pieces: [[u64; 64]; Piece::COUNT],
    pub castling: [u64; 16],
    pub en_passant: [u64; 64],
    pub side: u64,
}

static KEYS: OnceLock<Keys> = OnceLock::new();

pub fn keys() -> &'static Keys {
    KEYS.get_or_init(|| {
        let mut seed = 0xF00D_F00D_DEAD_BEEF;
        let mut next = || {
            seed = splitmix64(seed);
            seed
        };
        let mut pieces = [[0u64; 64]; Piece::COUNT];
        for table in pieces.iter_mut() {
            for v in table.iter_mut() {
                *v = next();
            }
        }
        let mut castling = [0u64; 16];
        for v in castling.iter_mut() {
            *v = next();
        }
        let mut en_passant = [0u64; 64];
        for v in en_passant.iter_mut() {
            *v = next();
        }
        let side = next();
        Keys { pieces, castling, en_passant, side }
    })
}

#[inline]
pub fn piece_key(piece: Piece, sq: Square) -> u64 { keys().pieces[piece.index()][sq as usize] }

#[inline]
pub fn castling_key(rights: u8) -> u64 { keys().castling[(rights & 0xF) as usize] }

#[inline]
pub fn en_passant_key(sq: Square) -> u64 { keys().en_passant[sq as usize] }

#[inline]
pub fn side_key() -> u64 { keys().side }

/// Fingerprint of `pos` rebuilt from its placement and state, ignoring the
/// incrementally maintained value.
pub fn compute(pos: &Position) -> u64 {
    let mut key = 0u64;
    for idx in 0..Piece::COUNT as u8 {
        if let Some(piece) = Piece::from_index(idx) {
            for sq in Bits(pos.pieces(piece)) {
                key ^= piece_key(piece, sq);
            }
        }
    }
    if pos.side_to_move() == Color::Black { key ^= side_key(); }
    key ^= castling_key(pos.castling_rights());
    if let Some(ep) = pos.en_passant() { key ^= en_passant_key(ep); }
    key
}
