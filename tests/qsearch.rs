use hyperbola::board::Position;
use hyperbola::search::alphabeta::Searcher;
use hyperbola::search::eval::{Evaluator, PieceSquareEvaluator, MATE_BOUND};

fn stand_and_quiet(fen: &str) -> (i32, i32) {
    let mut pos = Position::from_fen(fen).unwrap();
    let stand = PieceSquareEvaluator.evaluate(&pos);
    let mut s = Searcher::default();
    let q = s.qsearch_eval_cp(&mut pos);
    assert_eq!(pos.to_fen(), Position::from_fen(fen).unwrap().to_fen());
    (stand, q)
}

#[test]
fn hanging_queen_is_taken() {
    // Black bishop on c1 takes the undefended queen on f4.
    let (stand, q) = stand_and_quiet("4k3/8/8/8/5Q2/8/8/2b4K b - - 0 1");
    assert!(q > stand + 500, "qsearch {q} did not see the capture (stand pat {stand})");
}

#[test]
fn quiet_position_equals_stand_pat() {
    let (stand, q) = stand_and_quiet("4k3/8/8/8/8/8/8/4K3 w - - 0 1");
    assert_eq!(q, stand);
}

#[test]
fn never_worse_than_stand_pat() {
    let fens = [
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2",
        "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4",
    ];
    for fen in fens {
        let (stand, q) = stand_and_quiet(fen);
        assert!(q >= stand, "{fen}: {q} < {stand}");
        assert!(q.abs() < MATE_BOUND);
    }
}

#[test]
fn fifty_move_limit_is_a_draw() {
    let (_, q) = stand_and_quiet("4k3/8/8/8/8/8/8/Q3K3 w - - 100 80");
    assert_eq!(q, 0);
}
