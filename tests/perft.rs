use cozy_chess::Board;
use hyperbola::board::Position;
use hyperbola::perft::{perft, perft_divide};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const POS3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
const POS4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
const POS5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";
const POS6: &str = "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10";

fn counts(fen: &str, expected: &[u64]) {
    let mut pos = Position::from_fen(fen).expect("valid fen");
    for (i, &want) in expected.iter().enumerate() {
        let depth = i as u32 + 1;
        let got = perft(&mut pos, depth);
        assert_eq!(got, want, "perft({depth}) of {fen}");
    }
    assert_eq!(pos.to_fen(), Position::from_fen(fen).unwrap().to_fen(), "perft left the position modified");
}

#[test]
fn perft_startpos_small_depths() {
    let mut p = Position::startpos();
    assert_eq!(perft(&mut p, 1), 20);
    assert_eq!(perft(&mut p, 2), 400);
    assert_eq!(perft(&mut p, 3), 8902);
    assert_eq!(perft(&mut p, 4), 197281);
}

#[test]
fn perft_kiwipete() {
    counts(KIWIPETE, &[48, 2039, 97862]);
}

#[test]
fn perft_rook_endgame_with_en_passant_pins() {
    counts(POS3, &[14, 191, 2812, 43238]);
}

#[test]
fn perft_promotions_and_castling_rights() {
    counts(POS4, &[6, 264, 9467]);
    counts(POS5, &[44, 1486, 62379]);
    counts(POS6, &[46, 2079, 89890]);
}

#[test]
fn divide_sums_to_perft() {
    let mut p = Position::from_fen(KIWIPETE).unwrap();
    let parts = perft_divide(&mut p, 2);
    assert_eq!(parts.len(), 48);
    assert_eq!(parts.iter().map(|(_, n)| n).sum::<u64>(), 2039);
}

fn cozy_perft(board: &Board, depth: u32) -> u64 {
    if depth == 0 { return 1; }
    let mut nodes = 0u64;
    board.generate_moves(|moves| {
        for m in moves {
            let mut child = board.clone();
            child.play(m);
            nodes += cozy_perft(&child, depth - 1);
        }
        false
    });
    nodes
}

#[test]
fn agrees_with_reference_generator() {
    // Positions reached by odd move orders: en passant into discovered check,
    // promotions with capture, castling through attacked squares.
    let fens = [
        "8/8/8/2k5/3Pp3/8/8/4K2R b K d3 0 1",
        "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1",
        "r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1",
        "8/P1k5/K7/8/8/8/8/8 w - - 0 1",
        "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1",
        "8/8/1k6/2b5/2pP4/8/5K2/8 b - d3 0 1",
        "3k4/3p4/8/K1P4r/8/8/8/8 b - - 0 1",
        "8/8/4k3/8/2p5/8/B2P2K1/8 w - - 0 1",
        POS4,
    ];
    for fen in fens {
        let mut pos = Position::from_fen(fen).expect("valid fen");
        let reference = Board::from_fen(fen, false).expect("cozy parses fen");
        for depth in 1..=3 {
            assert_eq!(perft(&mut pos, depth), cozy_perft(&reference, depth), "depth {depth} of {fen}");
        }
    }
}
