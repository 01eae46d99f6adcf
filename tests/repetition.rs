use hyperbola::board::{parse_uci_move, Position};

fn play(pos: &mut Position, line: &[&str]) {
    for text in line {
        let mv = parse_uci_move(pos, text).unwrap_or_else(|e| panic!("{e}"));
        pos.apply(mv);
    }
}

const SHUFFLE: [&str; 4] = ["g1f3", "g8f6", "f3g1", "f6g8"];

#[test]
fn knight_shuffle_repeats() {
    let mut pos = Position::startpos();
    play(&mut pos, &SHUFFLE[..2]);
    assert!(!pos.is_repetition());
    play(&mut pos, &SHUFFLE[2..]);
    assert!(pos.is_repetition());
    assert!(!pos.is_threefold_repetition());
    play(&mut pos, &SHUFFLE);
    assert!(pos.is_threefold_repetition());
}

#[test]
fn pawn_move_forgets_earlier_positions() {
    let mut pos = Position::startpos();
    play(&mut pos, &SHUFFLE);
    assert!(pos.is_repetition());
    play(&mut pos, &["e2e4", "e7e5"]);
    play(&mut pos, &SHUFFLE);
    assert!(pos.is_repetition());
    assert!(!pos.is_threefold_repetition(), "positions before e4 must not count");
}

#[test]
fn undo_restores_repetition_state() {
    let mut pos = Position::startpos();
    play(&mut pos, &SHUFFLE);
    assert!(pos.is_repetition());
    pos.undo();
    assert!(!pos.is_repetition());
}
