use super::attacks::is_square_attacked;
use super::position::Position;
use super::types::*;
use super::zobrist;
use crate::error::FenError;

impl Position {
    /// Parses standard FEN. Halfmove and fullmove counters may be omitted.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if !(4..=6).contains(&fields.len()) {
            return Err(FenError::FieldCount(fields.len()));
        }

        let mut pos = Position::empty();

        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::RankCount(ranks.len()));
        }
        for (i, row) in ranks.iter().enumerate() {
            let rank = 7 - i as u8;
            let mut file = 0usize;
            for c in row.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as usize;
                } else {
                    let piece = Piece::from_char(c).ok_or(FenError::PieceLetter(c))?;
                    if file >= 8 {
                        return Err(FenError::RankWidth { rank: rank as usize + 1, files: file + 1 });
                    }
                    pos.put(piece, make_square(file as u8, rank));
                    file += 1;
                }
            }
            if file != 8 {
                return Err(FenError::RankWidth { rank: rank as usize + 1, files: file });
            }
        }

        for (color, name) in [(Color::White, "white"), (Color::Black, "black")] {
            let count = pos.pieces_of(color, PieceKind::King).count_ones();
            if count != 1 {
                return Err(FenError::KingCount { color: name, count });
            }
        }

        pos.side = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::SideToMove(other.to_string())),
        };
        if is_square_attacked(&pos, pos.king_square(pos.side.flip()), pos.side) {
            return Err(FenError::OpponentInCheck);
        }

        if fields[2] != "-" {
            for c in fields[2].chars() {
                pos.castling |= match c {
                    'K' => WHITE_KINGSIDE,
                    'Q' => WHITE_QUEENSIDE,
                    'k' => BLACK_KINGSIDE,
                    'q' => BLACK_QUEENSIDE,
                    _ => return Err(FenError::Castling(fields[2].to_string())),
                };
            }
            // Rights whose king or rook has left home cannot be exercised.
            let home = [
                (WHITE_KINGSIDE, Color::White, E1, H1),
                (WHITE_QUEENSIDE, Color::White, E1, A1),
                (BLACK_KINGSIDE, Color::Black, E8, H8),
                (BLACK_QUEENSIDE, Color::Black, E8, A8),
            ];
            for (flag, color, king, rook) in home {
                let king_home = pos.piece_at(king) == Some(Piece::new(color, PieceKind::King));
                let rook_home = pos.piece_at(rook) == Some(Piece::new(color, PieceKind::Rook));
                if !(king_home && rook_home) {
                    pos.castling &= !flag;
                }
            }
        }

        if fields[3] != "-" {
            let sq = square_from_str(fields[3]).ok_or_else(|| FenError::EnPassant(fields[3].to_string()))?;
            let expected_rank = if pos.side == Color::White { 5 } else { 2 };
            // The pawn that just double-pushed must stand behind an empty target.
            let victim_sq = if pos.side == Color::White { sq - 8 } else { sq + 8 };
            let victim = Piece::new(pos.side.flip(), PieceKind::Pawn);
            if rank_of(sq) != expected_rank || pos.piece_at(sq).is_some() || pos.piece_at(victim_sq) != Some(victim) {
                return Err(FenError::EnPassant(fields[3].to_string()));
            }
            pos.en_passant = Some(sq);
        }

        if let Some(h) = fields.get(4) {
            pos.halfmove = h.parse().map_err(|_| FenError::Counter(h.to_string()))?;
        }
        if let Some(f) = fields.get(5) {
            pos.fullmove = f.parse().map_err(|_| FenError::Counter(f.to_string()))?;
            if pos.fullmove == 0 {
                return Err(FenError::Counter(f.to_string()));
            }
        }

        pos.key = zobrist::compute(&pos);
        Ok(pos)
    }

    pub fn to_fen(&self) -> String {
        let mut out = String::with_capacity(90);
        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                match self.piece_at(make_square(file, rank)) {
                    Some(p) => {
                        if empty > 0 {
                            out.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        out.push(p.to_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push(char::from(b'0' + empty));
            }
            if rank > 0 {
                out.push('/');
            }
        }
        out.push(' ');
        out.push(if self.side == Color::White { 'w' } else { 'b' });
        out.push(' ');
        if self.castling == 0 {
            out.push('-');
        } else {
            for (flag, c) in [(WHITE_KINGSIDE, 'K'), (WHITE_QUEENSIDE, 'Q'), (BLACK_KINGSIDE, 'k'), (BLACK_QUEENSIDE, 'q')] {
                if self.castling & flag != 0 {
                    out.push(c);
                }
            }
        }
        out.push(' ');
        match self.en_passant {
            Some(sq) => out.push_str(&square_name(sq)),
            None => out.push('-'),
        }
        out.push_str(&format!(" {} {}", self.halfmove, self.fullmove));
        out
    }
}
