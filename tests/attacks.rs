use hyperbola::board::attacks::attacked_squares;
use hyperbola::board::movegen::{generate_all, MoveList};
use hyperbola::board::{is_square_attacked, Color, MoveKind, PieceKind, Position};

const FENS: &[&str] = &[
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
];

#[test]
fn single_square_query_agrees_with_attack_map() {
    for fen in FENS {
        let pos = Position::from_fen(fen).unwrap();
        for by in [Color::White, Color::Black] {
            let map = attacked_squares(&pos, by);
            for sq in 0..64u8 {
                let bit = map & (1u64 << sq) != 0;
                assert_eq!(is_square_attacked(&pos, sq, by), bit, "square {sq} by {by:?} in {fen}");
            }
        }
    }
}

#[test]
fn pawn_attacks_point_forward() {
    // White pawn on e4 hits d5 and f5, never e5.
    let pos = Position::from_fen("8/8/8/3k4/4P3/8/8/4K3 b - - 0 1").unwrap();
    assert!(is_square_attacked(&pos, 35, Color::White));
    let pos = Position::from_fen("8/8/8/4k3/4P3/8/8/4K3 w - - 0 1").unwrap();
    assert!(!is_square_attacked(&pos, 36, Color::White));
}

#[test]
fn sliders_are_blocked() {
    let pos = Position::from_fen("4k3/8/8/8/4p3/8/8/R3K2R w - - 0 1").unwrap();
    // Rook on a1 sees along the first rank up to the king on e1.
    assert!(is_square_attacked(&pos, 3, Color::White));
    // Rook on h1 up the h-file is open all the way.
    assert!(is_square_attacked(&pos, 63, Color::White));
    // Nothing white reaches e5 through the pawn on e4.
    assert!(!is_square_attacked(&pos, 36, Color::White));
}

/// Every non-pawn, non-castling move lands on a square the mover attacks.
#[test]
fn piece_moves_land_on_attacked_squares() {
    for fen in FENS {
        let pos = Position::from_fen(fen).unwrap();
        let us = pos.side_to_move();
        let map = attacked_squares(&pos, us);
        let mut moves = MoveList::new();
        generate_all(&pos, &mut moves);
        for mv in &moves {
            let piece = pos.piece_at(mv.from()).unwrap();
            if piece.kind() == PieceKind::Pawn || matches!(mv.kind(), MoveKind::KingCastle | MoveKind::QueenCastle) {
                continue;
            }
            assert!(map & (1u64 << mv.to()) != 0, "{mv} in {fen}");
        }
    }
}
