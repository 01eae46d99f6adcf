use std::time::{Duration, Instant};

use hyperbola::board::Position;
use hyperbola::search::alphabeta::{SearchParams, Searcher};

#[test]
fn movetime_stops_deepening() {
    let mut pos = Position::startpos();
    let mut s = Searcher::default();
    let p = SearchParams { depth: 64, movetime: Some(Duration::from_millis(10)), ..SearchParams::default() };
    let t0 = Instant::now();
    let r = s.search(&mut pos, &p);
    assert!(t0.elapsed() < Duration::from_secs(5), "search overran: {:?}", t0.elapsed());
    assert!(r.best_move.is_some());
    assert!(r.depth >= 1 && r.depth < 64);
}

#[test]
fn depth_limit_applies_without_movetime() {
    let mut pos = Position::startpos();
    let mut s = Searcher::default();
    let r = s.search(&mut pos, &SearchParams { depth: 3, ..SearchParams::default() });
    assert_eq!(r.depth, 3);
}
