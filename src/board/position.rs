use std::fmt;

use super::attacks::is_square_attacked;
use super::bitboard::{bit, Bits};
use super::mv::{Move, MoveKind};
use super::types::*;
use super::zobrist;

/// Fingerprint and undo slots available to one position: the longest game we
/// accept plus the deepest search line on top of it.
pub const UNDO_CAPACITY: usize = 2048;

/// Halfmove clock value at which the game is drawn by the no-progress rule.
pub const HALFMOVE_LIMIT: u32 = 100;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

const fn build_castle_masks() -> [u8; 64] {
    let mut t = [ALL_CASTLING; 64];
    t[A1 as usize] = ALL_CASTLING & !WHITE_QUEENSIDE;
    t[E1 as usize] = ALL_CASTLING & !(WHITE_KINGSIDE | WHITE_QUEENSIDE);
    t[H1 as usize] = ALL_CASTLING & !WHITE_KINGSIDE;
    t[A8 as usize] = ALL_CASTLING & !BLACK_QUEENSIDE;
    t[E8 as usize] = ALL_CASTLING & !(BLACK_KINGSIDE | BLACK_QUEENSIDE);
    t[H8 as usize] = ALL_CASTLING & !BLACK_KINGSIDE;
    t
}

/// Rights kept when a piece leaves or lands on the square.
static CASTLE_MASKS: [u8; 64] = build_castle_masks();

/// Reversible state saved by `apply`/`apply_null` and restored by the matching undo.
#[derive(Clone, Copy, Debug)]
struct Undo {
    mv: Move,
    /// `None` marks a null move.
    moved: Option<Piece>,
    captured: Option<Piece>,
    castling: u8,
    en_passant: Option<Square>,
    halfmove: u32,
    fullmove: u32,
    key: u64,
    last_irreversible: usize,
}

impl Undo {
    const EMPTY: Undo = Undo {
        mv: Move::NONE,
        moved: None,
        captured: None,
        castling: 0,
        en_passant: None,
        halfmove: 0,
        fullmove: 1,
        key: 0,
        last_irreversible: 0,
    };
}

/// Bitboard position with an incrementally maintained Zobrist fingerprint.
///
/// `apply` and `undo` nest like a stack; every `apply` must be undone in exact
/// reverse order, and likewise for null moves.
#[derive(Clone)]
pub struct Position {
    pub(super) pieces: [u64; Piece::COUNT],
    pub(super) colors: [u64; 2],
    pub(super) occupied: u64,
    pub(super) board: [Option<Piece>; 64],
    pub(super) side: Color,
    pub(super) castling: u8,
    pub(super) en_passant: Option<Square>,
    pub(super) halfmove: u32,
    pub(super) fullmove: u32,
    pub(super) key: u64,
    pub(super) king_sq: [Square; 2],
    pub(super) non_pawn: [i32; 2],
    history: Box<[u64]>,
    history_len: usize,
    last_irreversible: usize,
    undo: Box<[Undo]>,
    undo_len: usize,
}

impl Default for Position {
    fn default() -> Self { Self::startpos() }
}

impl Position {
    pub(super) fn empty() -> Self {
        Self {
            pieces: [0; Piece::COUNT],
            colors: [0; 2],
            occupied: 0,
            board: [None; 64],
            side: Color::White,
            castling: 0,
            en_passant: None,
            halfmove: 0,
            fullmove: 1,
            key: 0,
            king_sq: [E1, E8],
            non_pawn: [0; 2],
            history: vec![0u64; UNDO_CAPACITY].into_boxed_slice(),
            history_len: 0,
            last_irreversible: 0,
            undo: vec![Undo::EMPTY; UNDO_CAPACITY].into_boxed_slice(),
            undo_len: 0,
        }
    }

    pub fn startpos() -> Self {
        match Self::from_fen(START_FEN) {
            Ok(p) => p,
            Err(e) => unreachable!("start position must parse: {e}"),
        }
    }

    #[inline]
    pub fn pieces(&self, piece: Piece) -> u64 { self.pieces[piece.index()] }

    #[inline]
    pub fn pieces_of(&self, color: Color, kind: PieceKind) -> u64 { self.pieces[Piece::new(color, kind).index()] }

    #[inline]
    pub fn color_bb(&self, color: Color) -> u64 { self.colors[color.index()] }

    #[inline]
    pub fn occupied(&self) -> u64 { self.occupied }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> { self.board[sq as usize] }

    #[inline]
    pub fn side_to_move(&self) -> Color { self.side }

    #[inline]
    pub fn castling_rights(&self) -> u8 { self.castling }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> { self.en_passant }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 { self.halfmove }

    #[inline]
    pub fn fullmove_number(&self) -> u32 { self.fullmove }

    /// Incrementally maintained fingerprint.
    #[inline]
    pub fn key(&self) -> u64 { self.key }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square { self.king_sq[color.index()] }

    /// Knight/bishop 3, rook 5, queen 9.
    #[inline]
    pub fn non_pawn_material(&self, color: Color) -> i32 { self.non_pawn[color.index()] }

    /// Number of moves (null moves included) currently applied on top of the loaded position.
    #[inline]
    pub fn ply(&self) -> usize { self.undo_len }

    /// Fingerprint rebuilt from scratch.
    pub fn compute_key(&self) -> u64 { zobrist::compute(self) }

    pub fn in_check(&self) -> bool {
        is_square_attacked(self, self.king_square(self.side), self.side.flip())
    }

    pub(super) fn put(&mut self, piece: Piece, sq: Square) {
        let b = bit(sq);
        let color = piece.color();
        self.pieces[piece.index()] |= b;
        self.colors[color.index()] |= b;
        self.occupied |= b;
        self.board[sq as usize] = Some(piece);
        match piece.kind() {
            PieceKind::King => self.king_sq[color.index()] = sq,
            kind => self.non_pawn[color.index()] += kind.non_pawn_units(),
        }
    }

    fn lift(&mut self, piece: Piece, sq: Square) {
        let b = bit(sq);
        let color = piece.color();
        self.pieces[piece.index()] &= !b;
        self.colors[color.index()] &= !b;
        self.occupied &= !b;
        self.board[sq as usize] = None;
        self.non_pawn[color.index()] -= piece.kind().non_pawn_units();
    }

    #[inline]
    fn add_piece(&mut self, piece: Piece, sq: Square) {
        self.put(piece, sq);
        self.key ^= zobrist::piece_key(piece, sq);
    }

    #[inline]
    fn remove_piece(&mut self, piece: Piece, sq: Square) {
        self.lift(piece, sq);
        self.key ^= zobrist::piece_key(piece, sq);
    }

    fn push_state(&mut self, record: Undo) {
        assert!(
            self.undo_len < UNDO_CAPACITY,
            "undo stack overflow at {} plies; raise UNDO_CAPACITY",
            self.undo_len
        );
        self.undo[self.undo_len] = record;
        self.undo_len += 1;
        self.history[self.history_len] = self.key;
        self.history_len += 1;
    }

    fn pop_state(&mut self) -> Undo {
        assert!(self.undo_len > 0, "undo called with no applied move");
        self.undo_len -= 1;
        self.history_len -= 1;
        self.undo[self.undo_len]
    }

    /// Plays `mv` for the side to move. The move must come from this position's
    /// generator (or `parse_uci_move`); legality of the mover's king is not checked.
    ///
    /// # Panics
    /// When the source square is empty, a capture-flagged move finds no victim
    /// (en passant included), or the undo stack is full.
    pub fn apply(&mut self, mv: Move) {
        let from = mv.from();
        let to = mv.to();
        let kind = mv.kind();
        let us = self.side;

        let moved = match self.board[from as usize] {
            Some(p) => p,
            None => panic!("apply {mv:?}: no piece on {}", square_name(from)),
        };
        debug_assert_eq!(moved.color(), us, "apply {mv:?}: moving an opponent piece");

        let ep_victim_sq = match us {
            Color::White => to.wrapping_sub(8),
            Color::Black => to.wrapping_add(8),
        };
        let captured = match kind {
            MoveKind::EnPassant => {
                let victim = Piece::new(us.flip(), PieceKind::Pawn);
                if self.board[ep_victim_sq as usize] != Some(victim) {
                    panic!("apply {mv:?}: no enemy pawn on {} to take en passant", square_name(ep_victim_sq));
                }
                Some(victim)
            }
            k if k.is_capture() => match self.board[to as usize] {
                Some(p) => Some(p),
                None => panic!("apply {mv:?}: capture flag but {} is empty", square_name(to)),
            },
            _ => None,
        };

        self.push_state(Undo {
            mv,
            moved: Some(moved),
            captured,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove: self.halfmove,
            fullmove: self.fullmove,
            key: self.key,
            last_irreversible: self.last_irreversible,
        });

        let pawn_move = moved.kind() == PieceKind::Pawn;
        if pawn_move || captured.is_some() || kind.is_promotion() {
            self.last_irreversible = self.history_len;
        }

        if let Some(ep) = self.en_passant.take() {
            self.key ^= zobrist::en_passant_key(ep);
        }

        self.remove_piece(moved, from);
        if let Some(victim) = captured {
            let sq = if kind == MoveKind::EnPassant { ep_victim_sq } else { to };
            self.remove_piece(victim, sq);
        }

        let placed = if kind.is_promotion() {
            match mv.promotion() {
                Some(p) => p,
                None => panic!("apply {mv:?}: promotion without a promotion piece"),
            }
        } else {
            moved
        };
        self.add_piece(placed, to);

        match (kind, us) {
            (MoveKind::KingCastle, Color::White) => self.shift_rook(Color::White, H1, F1),
            (MoveKind::KingCastle, Color::Black) => self.shift_rook(Color::Black, H8, F8),
            (MoveKind::QueenCastle, Color::White) => self.shift_rook(Color::White, A1, D1),
            (MoveKind::QueenCastle, Color::Black) => self.shift_rook(Color::Black, A8, D8),
            _ => {}
        }

        if kind == MoveKind::DoublePawnPush {
            let ep = ep_victim_sq;
            self.en_passant = Some(ep);
            self.key ^= zobrist::en_passant_key(ep);
        }

        self.key ^= zobrist::castling_key(self.castling);
        self.castling &= CASTLE_MASKS[from as usize] & CASTLE_MASKS[to as usize];
        self.key ^= zobrist::castling_key(self.castling);

        self.side = us.flip();
        self.key ^= zobrist::side_key();

        if pawn_move || captured.is_some() || kind.is_promotion() {
            self.halfmove = 0;
        } else {
            self.halfmove += 1;
        }
        if us == Color::Black {
            self.fullmove += 1;
        }
    }

    fn shift_rook(&mut self, color: Color, from: Square, to: Square) {
        let rook = Piece::new(color, PieceKind::Rook);
        self.remove_piece(rook, from);
        self.add_piece(rook, to);
    }

    fn shift_rook_back(&mut self, color: Color, from: Square, to: Square) {
        let rook = Piece::new(color, PieceKind::Rook);
        self.lift(rook, to);
        self.put(rook, from);
    }

    /// Reverts the most recent `apply`, restoring the saved fingerprint directly.
    ///
    /// # Panics
    /// When nothing was applied or the top record belongs to a null move.
    pub fn undo(&mut self) {
        let u = self.pop_state();
        let moved = match u.moved {
            Some(p) => p,
            None => panic!("undo called on a null move; use undo_null"),
        };
        let mv = u.mv;
        let (from, to, kind) = (mv.from(), mv.to(), mv.kind());

        self.side = self.side.flip();
        let us = self.side;

        match (kind, us) {
            (MoveKind::KingCastle, Color::White) => self.shift_rook_back(Color::White, H1, F1),
            (MoveKind::KingCastle, Color::Black) => self.shift_rook_back(Color::Black, H8, F8),
            (MoveKind::QueenCastle, Color::White) => self.shift_rook_back(Color::White, A1, D1),
            (MoveKind::QueenCastle, Color::Black) => self.shift_rook_back(Color::Black, A8, D8),
            _ => {}
        }

        let placed = match mv.promotion() {
            Some(p) if kind.is_promotion() => p,
            _ => moved,
        };
        self.lift(placed, to);
        self.put(moved, from);

        if let Some(victim) = u.captured {
            let sq = if kind == MoveKind::EnPassant {
                match us {
                    Color::White => to - 8,
                    Color::Black => to + 8,
                }
            } else {
                to
            };
            self.put(victim, sq);
        }

        self.castling = u.castling;
        self.en_passant = u.en_passant;
        self.halfmove = u.halfmove;
        self.fullmove = u.fullmove;
        self.key = u.key;
        self.last_irreversible = u.last_irreversible;
    }

    /// Passes the turn: flips the side to move and clears en passant.
    pub fn apply_null(&mut self) {
        self.push_state(Undo {
            mv: Move::NONE,
            moved: None,
            captured: None,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove: self.halfmove,
            fullmove: self.fullmove,
            key: self.key,
            last_irreversible: self.last_irreversible,
        });
        if let Some(ep) = self.en_passant.take() {
            self.key ^= zobrist::en_passant_key(ep);
        }
        self.side = self.side.flip();
        self.key ^= zobrist::side_key();
        self.halfmove += 1;
    }

    /// # Panics
    /// When the top record is not a null move.
    pub fn undo_null(&mut self) {
        let u = self.pop_state();
        assert!(u.moved.is_none(), "undo_null called on a real move {:?}", u.mv);
        self.side = self.side.flip();
        self.castling = u.castling;
        self.en_passant = u.en_passant;
        self.halfmove = u.halfmove;
        self.fullmove = u.fullmove;
        self.key = u.key;
        self.last_irreversible = u.last_irreversible;
    }

    /// Earlier positions with the same side to move, newest first, back to the
    /// last irreversible move.
    fn same_side_history(&self) -> impl Iterator<Item = u64> + '_ {
        (self.last_irreversible..self.history_len.saturating_sub(1))
            .rev()
            .step_by(2)
            .map(move |i| self.history[i])
    }

    /// True when the current position occurred before since the last irreversible move.
    pub fn is_repetition(&self) -> bool {
        self.same_side_history().any(|k| k == self.key)
    }

    /// True when the current position occurred at least twice before since the
    /// last irreversible move.
    pub fn is_threefold_repetition(&self) -> bool {
        self.same_side_history().filter(|&k| k == self.key).nth(1).is_some()
    }

    /// Re-derives every cached fact and reports the first mismatch.
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut union = 0u64;
        let mut by_color = [0u64; 2];
        let mut non_pawn = [0i32; 2];
        for idx in 0..Piece::COUNT as u8 {
            let Some(piece) = Piece::from_index(idx) else { continue };
            let bb = self.pieces[piece.index()];
            if union & bb != 0 {
                return Err(format!("{piece:?} overlaps another piece on {:#x}", union & bb));
            }
            union |= bb;
            by_color[piece.color().index()] |= bb;
            non_pawn[piece.color().index()] += bb.count_ones() as i32 * piece.kind().non_pawn_units();
            for sq in Bits(bb) {
                if self.board[sq as usize] != Some(piece) {
                    return Err(format!("mailbox disagrees on {}", square_name(sq)));
                }
            }
            if piece.kind() == PieceKind::King && bb != bit(self.king_sq[piece.color().index()]) {
                return Err(format!("cached {:?} king square is stale", piece.color()));
            }
        }
        if union != self.occupied {
            return Err(format!("occupied {:#x} != union {:#x}", self.occupied, union));
        }
        if by_color != self.colors {
            return Err("color occupancy out of sync".to_string());
        }
        if self.board.iter().filter(|p| p.is_some()).count() != union.count_ones() as usize {
            return Err("mailbox holds pieces missing from the bitboards".to_string());
        }
        if non_pawn != self.non_pawn {
            return Err(format!("non-pawn material {:?} != {:?}", self.non_pawn, non_pawn));
        }
        let fresh = self.compute_key();
        if fresh != self.key {
            return Err(format!("fingerprint {:#x} != recomputed {:#x}", self.key, fresh));
        }
        Ok(())
    }

    /// Human-readable board, rank 8 on top.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(200);
        for rank in (0..8u8).rev() {
            out.push_str(&format!("{}  ", rank + 1));
            for file in 0..8u8 {
                let c = self.board[make_square(file, rank) as usize].map_or('.', Piece::to_char);
                out.push(c);
                out.push(' ');
            }
            out.push('\n');
        }
        out.push_str("\n   a b c d e f g h\n");
        out
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Position")
            .field("fen", &self.to_fen())
            .field("key", &format_args!("{:#018x}", self.key))
            .field("ply", &self.undo_len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn castle_masks_clear_rights_on_home_squares() {
        assert_eq!(CASTLE_MASKS[E1 as usize] & (WHITE_KINGSIDE | WHITE_QUEENSIDE), 0);
        assert_eq!(CASTLE_MASKS[H8 as usize] & BLACK_KINGSIDE, 0);
        assert_eq!(CASTLE_MASKS[H8 as usize] & BLACK_QUEENSIDE, BLACK_QUEENSIDE);
        assert_eq!(CASTLE_MASKS[27], ALL_CASTLING);
    }

    #[test]
    #[should_panic(expected = "no applied move")]
    fn undo_without_apply_panics() {
        let mut pos = Position::startpos();
        pos.undo();
    }

    #[test]
    #[should_panic(expected = "no piece on")]
    fn apply_from_empty_square_panics() {
        let mut pos = Position::startpos();
        pos.apply(Move::simple(28, 36, MoveKind::Quiet));
    }

    #[test]
    #[should_panic(expected = "capture flag")]
    fn capture_without_victim_panics() {
        let mut pos = Position::startpos();
        pos.apply(Move::simple(12, 20, MoveKind::Capture));
    }

    #[test]
    #[should_panic(expected = "null move")]
    fn undo_of_null_move_panics() {
        let mut pos = Position::startpos();
        pos.apply_null();
        pos.undo();
    }
}
