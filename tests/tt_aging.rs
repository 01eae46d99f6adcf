use hyperbola::search::tt::{Bound, TranspositionTable};

#[test]
fn equal_depth_eviction_prefers_oldest_non_primary() {
    // One bucket of four ways.
    let tt = TranspositionTable::with_buckets(1);
    for key in 1..=4u64 {
        tt.store(key, 5, 0, Bound::Exact, None, 0);
        tt.bump_generation();
    }
    tt.store(99, 5, 0, Bound::Exact, None, 0);
    assert!(tt.get(2).is_none(), "oldest non-primary entry not evicted at equal depth");
    assert!(tt.get(1).is_some(), "primary slot must survive an equal-depth store");
    assert!(tt.get(99).is_some(), "new entry not inserted");
}

#[test]
fn probing_refreshes_an_entry() {
    let tt = TranspositionTable::with_buckets(1);
    for key in 1..=4u64 {
        tt.store(key, 5, 0, Bound::Exact, None, 0);
        tt.bump_generation();
    }
    // Key 2 is the oldest until touched.
    let _ = tt.probe(2, 1, -100, 100, 0);
    assert_eq!(tt.get(2).map(|e| e.gen), Some(tt.generation()));
    tt.store(99, 5, 0, Bound::Exact, None, 0);
    assert!(tt.get(2).is_some(), "a probed entry counts as fresh");
    assert!(tt.get(3).is_none(), "next oldest entry should be the victim");
}

#[test]
fn generation_wraps() {
    let tt = TranspositionTable::with_buckets(1);
    for _ in 0..256 { tt.bump_generation(); }
    assert_eq!(tt.generation(), 0);
}
