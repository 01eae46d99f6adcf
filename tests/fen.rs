use hyperbola::board::{Color, Piece, PieceKind, Position, START_FEN};
use hyperbola::FenError;
use pretty_assertions::assert_eq;

#[test]
fn round_trips_known_positions() {
    let fens = [
        START_FEN,
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 b - - 12 47",
    ];
    for fen in fens {
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.to_fen(), fen);
        assert_eq!(pos.key(), pos.compute_key());
    }
}

#[test]
fn startpos_matches_start_fen() {
    let pos = Position::startpos();
    assert_eq!(pos.to_fen(), START_FEN);
    assert_eq!(pos.side_to_move(), Color::White);
    assert_eq!(pos.piece_at(4), Some(Piece::new(Color::White, PieceKind::King)));
    assert_eq!(pos.piece_at(59), Some(Piece::new(Color::Black, PieceKind::Queen)));
    assert_eq!(pos.fullmove_number(), 1);
}

#[test]
fn counters_are_optional() {
    let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 b - -").unwrap();
    assert_eq!(pos.halfmove_clock(), 0);
    assert_eq!(pos.fullmove_number(), 1);
    assert_eq!(pos.to_fen(), "4k3/8/8/8/8/8/8/4K3 b - - 0 1");
}

#[test]
fn impossible_castling_rights_are_dropped() {
    // White king has left e1; black rook has left a8.
    let pos = Position::from_fen("1r2k2r/8/8/8/8/8/8/R4K1R w KQkq - 0 1").unwrap();
    assert_eq!(pos.to_fen(), "1r2k2r/8/8/8/8/8/8/R4K1R w k - 0 1");
}

#[test]
fn rejects_malformed_input() {
    let cases: [(&str, FenError); 9] = [
        ("8/8/8 w", FenError::FieldCount(2)),
        ("8/8/8/8/8/8/8 w - - 0 1", FenError::RankCount(7)),
        ("4k3/8/8/8/8/8/8/4K4 w - - 0 1", FenError::RankWidth { rank: 1, files: 9 }),
        ("4k3/8/8/8/8/8/8/4K2 w - - 0 1", FenError::RankWidth { rank: 1, files: 7 }),
        ("4k3/8/8/8/8/8/8/4X3 w - - 0 1", FenError::PieceLetter('X')),
        ("4k3/8/8/8/8/8/8/4K3 x - - 0 1", FenError::SideToMove("x".to_string())),
        ("4k3/8/8/8/8/8/8/4K3 w KX - 0 1", FenError::Castling("KX".to_string())),
        ("4k3/8/8/8/8/8/8/4K3 w - e4 0 1", FenError::EnPassant("e4".to_string())),
        ("4k3/8/8/8/8/8/8/4K3 w - - x 1", FenError::Counter("x".to_string())),
    ];
    for (fen, want) in cases {
        assert_eq!(Position::from_fen(fen).unwrap_err(), want, "{fen}");
    }
}

#[test]
fn requires_one_king_each() {
    assert_eq!(
        Position::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1").unwrap_err(),
        FenError::KingCount { color: "black", count: 0 }
    );
    assert_eq!(
        Position::from_fen("4k3/8/8/8/8/8/8/2K1K3 w - - 0 1").unwrap_err(),
        FenError::KingCount { color: "white", count: 2 }
    );
}

#[test]
fn fullmove_zero_is_rejected() {
    assert!(matches!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 0"), Err(FenError::Counter(_))));
}

#[test]
fn en_passant_target_needs_a_pawn_behind_it() {
    // No black pawn on d5 to have made the double push.
    assert_eq!(
        Position::from_fen("4k3/8/8/4P3/8/8/8/4K3 w - d6 0 1").unwrap_err(),
        FenError::EnPassant("d6".to_string())
    );
    // Target square occupied.
    assert_eq!(
        Position::from_fen("4k3/8/3n4/3pP3/8/8/8/4K3 w - d6 0 1").unwrap_err(),
        FenError::EnPassant("d6".to_string())
    );
    // Pawn of the wrong color behind the target.
    assert_eq!(
        Position::from_fen("4k3/8/8/8/3p4/8/8/4K3 b - d3 0 1").unwrap_err(),
        FenError::EnPassant("d3".to_string())
    );
    let pos = Position::from_fen("4k3/8/8/8/3Pp3/8/8/4K3 b - d3 0 1").unwrap();
    assert_eq!(pos.en_passant(), Some(19));
}

#[test]
fn side_not_to_move_may_not_be_in_check() {
    assert_eq!(
        Position::from_fen("4k3/8/8/8/8/8/4R3/4K3 w - - 0 1").unwrap_err(),
        FenError::OpponentInCheck
    );
    // The same placement is fine with the checked side to move.
    assert!(Position::from_fen("4k3/8/8/8/8/8/4R3/4K3 b - - 0 1").unwrap().in_check());
}
