use std::sync::Arc;

use hyperbola::board::{Move, MoveKind};
use hyperbola::search::tt::{Bound, Probe, TranspositionTable, BUCKET_WAYS};

#[test]
fn never_holds_more_than_capacity() {
    let tt = TranspositionTable::with_buckets(2);
    assert_eq!(tt.capacity(), 2 * BUCKET_WAYS);
    for key in 0..1000u64 {
        tt.store(key * 7 + 1, (key % 9) as i32, 0, Bound::Exact, None, 0);
    }
    assert_eq!(tt.len(), tt.capacity());
}

#[test]
fn deep_entries_outlive_shallow_ones() {
    let tt = TranspositionTable::with_buckets(1);
    tt.store(100, 12, 0, Bound::Exact, None, 0);
    for key in 1..50u64 {
        tt.store(key, 1, 0, Bound::Exact, None, 0);
    }
    assert_eq!(tt.get(100).map(|e| e.depth), Some(12));
}

#[test]
fn deeper_store_takes_primary_and_keeps_the_old_one() {
    let tt = TranspositionTable::with_buckets(1);
    tt.store(1, 3, 0, Bound::Exact, None, 0);
    tt.store(2, 7, 0, Bound::Exact, None, 0);
    assert_eq!(tt.len(), 2);
    assert!(tt.get(1).is_some(), "old primary should move to a free slot");

    // Full bucket: a store deeper than the primary replaces it outright.
    tt.store(3, 1, 0, Bound::Exact, None, 0);
    tt.store(4, 1, 0, Bound::Exact, None, 0);
    tt.store(5, 9, 0, Bound::Exact, None, 0);
    assert!(tt.get(2).is_none());
    assert_eq!(tt.get(5).map(|e| e.depth), Some(9));
}

#[test]
fn same_key_keeps_the_deeper_result() {
    let tt = TranspositionTable::with_buckets(4);
    let mv = Move::simple(12, 28, MoveKind::DoublePawnPush);
    tt.store(42, 6, 10, Bound::Exact, Some(mv), 0);
    tt.store(42, 4, -50, Bound::Upper, None, 0);
    let e = tt.get(42).unwrap();
    assert_eq!((e.depth, e.score, e.best), (6, 10, Some(mv)));

    tt.store(42, 6, 20, Bound::Lower, None, 0);
    let e = tt.get(42).unwrap();
    assert_eq!((e.score, e.bound), (20, Bound::Lower));
    assert_eq!(tt.len(), 1);
}

#[test]
fn clear_empties_the_table() {
    let tt = TranspositionTable::with_buckets(8);
    for key in 1..20u64 { tt.store(key, 2, 0, Bound::Exact, None, 0); }
    tt.clear();
    assert!(tt.is_empty());
    assert_eq!(tt.probe(3, 0, -1, 1, 0), Probe::Miss);
}

fn score_for(key: u64) -> i32 { (key % 2000) as i32 - 1000 }

#[test]
fn concurrent_writers_never_produce_torn_entries() {
    let tt = Arc::new(TranspositionTable::with_buckets(64));
    let handles: Vec<_> = (0..4u64)
        .map(|t| {
            let tt = tt.clone();
            std::thread::spawn(move || {
                for i in 0..20_000u64 {
                    let key = (i * 2654435761 + t).wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1;
                    tt.store(key, (i % 20) as i32, score_for(key), Bound::Exact, None, 0);
                    if let Some(e) = tt.get(key ^ 0x40) {
                        assert_eq!(e.score, score_for(e.key));
                    }
                }
            })
        })
        .collect();
    for h in handles { h.join().unwrap(); }
    for key in 0..5000u64 {
        if let Some(e) = tt.get(key) {
            assert_eq!(e.score, score_for(key));
        }
    }
}
