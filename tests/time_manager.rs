use hyperbola::board::Position;
use hyperbola::search::time::{compute_budget, MIN_TIME_MS};

#[test]
fn panic_mode_uses_a_tenth_capped() {
    let pos = Position::startpos();
    assert_eq!(compute_budget(&pos, 4_000, 0, 30, &[]), 80);
    assert_eq!(compute_budget(&pos, 30, 0, 30, &[]), MIN_TIME_MS);
    assert_eq!(compute_budget(&pos, 0, 1_000, 30, &[]), MIN_TIME_MS);
}

#[test]
fn king_and_pawn_endgame_spends_less() {
    // 60s / 15 moves = 4000, then x0.75 for few moves and x0.85 for the endgame.
    let pos = Position::from_fen("8/8/4k3/8/8/4K3/4P3/8 w - - 0 30").unwrap();
    let ms = compute_budget(&pos, 60_000, 0, 30, &[]);
    assert!((2549..=2550).contains(&ms), "budget {ms}");
}

#[test]
fn increment_is_mostly_spent() {
    let pos = Position::startpos();
    let without = compute_budget(&pos, 60_000, 0, 20, &[]);
    let with = compute_budget(&pos, 60_000, 1_000, 20, &[]);
    assert!(with > without);
}

#[test]
fn check_doubles_the_budget() {
    let quiet = Position::from_fen("4k3/8/8/8/8/8/3PPP2/rn2K3 w - - 0 20").unwrap();
    let checked = Position::from_fen("4k3/8/8/8/8/8/3PPP2/r3K3 w - - 0 20").unwrap();
    assert!(compute_budget(&checked, 60_000, 0, 20, &[]) > compute_budget(&quiet, 60_000, 0, 20, &[]));
}

#[test]
fn never_exceeds_what_is_left() {
    let pos = Position::startpos();
    for remaining in [5_000u64, 5_100, 6_000, 10_000, 100_000, 3_600_000] {
        for inc in [0u64, 1_000, 30_000] {
            let ms = compute_budget(&pos, remaining, inc, 1, &[0, 500]);
            assert!(ms <= remaining - 50, "{ms} ms of {remaining} (+{inc})");
            assert!(ms >= MIN_TIME_MS);
        }
    }
}
