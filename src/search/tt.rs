use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use crate::board::Move;
use crate::search::eval::MATE_BOUND;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Bound {
    Exact = 1,
    Lower = 2,
    Upper = 3,
}

impl Bound {
    fn from_bits(bits: u64) -> Option<Bound> {
        match bits {
            1 => Some(Bound::Exact),
            2 => Some(Bound::Lower),
            3 => Some(Bound::Upper),
            _ => None,
        }
    }
}

/// A decoded slot, as returned by [`TranspositionTable::get`]. Scores are the
/// stored (ply-independent) values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry {
    pub key: u64,
    pub depth: u8,
    pub score: i32,
    pub best: Option<Move>,
    pub bound: Bound,
    pub gen: u8,
}

/// Outcome of a probe, already rebased to the probing ply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Probe {
    Miss,
    /// Matching entry searched too shallow (or whose bound does not cut):
    /// only the move hint is usable.
    Shallow { best: Option<Move> },
    Exact { score: i32, best: Option<Move> },
    BetaCutoff { score: i32, best: Option<Move> },
    AlphaCutoff { score: i32, best: Option<Move> },
}

impl Probe {
    pub fn best_move(&self) -> Option<Move> {
        match *self {
            Probe::Miss => None,
            Probe::Shallow { best }
            | Probe::Exact { best, .. }
            | Probe::BetaCutoff { best, .. }
            | Probe::AlphaCutoff { best, .. } => best,
        }
    }
}

pub const ENTRY_BYTES: usize = 16;
pub const BUCKET_WAYS: usize = 4;

// data word layout
const MOVE_BITS: u64 = 0xF_FFFF;
const SCORE_SHIFT: u32 = 20;
const DEPTH_SHIFT: u32 = 36;
const BOUND_SHIFT: u32 = 44;
const GEN_SHIFT: u32 = 46;

#[inline]
fn pack(best: Option<Move>, score: i32, depth: u8, bound: Bound, gen: u8) -> u64 {
    let mv = best.map_or(0, |m| m.raw() as u64) & MOVE_BITS;
    let score = (score as i16 as u16) as u64;
    mv | (score << SCORE_SHIFT)
        | ((depth as u64) << DEPTH_SHIFT)
        | ((bound as u64) << BOUND_SHIFT)
        | ((gen as u64) << GEN_SHIFT)
}

#[inline]
fn data_move(data: u64) -> Option<Move> {
    let m = Move::from_raw((data & MOVE_BITS) as u32);
    if m.is_none() { None } else { Some(m) }
}

#[inline]
fn data_score(data: u64) -> i32 { ((data >> SCORE_SHIFT) as u16) as i16 as i32 }

#[inline]
fn data_depth(data: u64) -> u8 { (data >> DEPTH_SHIFT) as u8 }

#[inline]
fn data_gen(data: u64) -> u8 { (data >> GEN_SHIFT) as u8 }

#[inline]
fn with_gen(data: u64, gen: u8) -> u64 { (data & !(0xFFu64 << GEN_SHIFT)) | ((gen as u64) << GEN_SHIFT) }

/// Folds the distance from the root out of a mate score before storing.
#[inline]
fn score_to_tt(score: i32, ply: usize) -> i32 {
    let ply = ply as i32;
    if score >= MATE_BOUND { score + ply } else if score <= -MATE_BOUND { score - ply } else { score }
}

#[inline]
fn score_from_tt(score: i32, ply: usize) -> i32 {
    let ply = ply as i32;
    if score >= MATE_BOUND { score - ply } else if score <= -MATE_BOUND { score + ply } else { score }
}

/// One slot: `check` holds `key ^ data` so a half-written slot fails the key test.
#[derive(Default)]
struct Slot {
    check: AtomicU64,
    data: AtomicU64,
}

impl Slot {
    /// Returns the data word when the slot holds `key`.
    #[inline]
    fn read(&self, key: u64) -> Option<u64> {
        let data = self.data.load(Ordering::Relaxed);
        let check = self.check.load(Ordering::Relaxed);
        if data != 0 && check ^ data == key { Some(data) } else { None }
    }

    #[inline]
    fn write(&self, key: u64, data: u64) {
        self.data.store(data, Ordering::Relaxed);
        self.check.store(key ^ data, Ordering::Relaxed);
    }

    #[inline]
    fn load(&self) -> (u64, u64) {
        let data = self.data.load(Ordering::Relaxed);
        (self.check.load(Ordering::Relaxed) ^ data, data)
    }

    fn reset(&self) {
        self.data.store(0, Ordering::Relaxed);
        self.check.store(0, Ordering::Relaxed);
    }
}

#[derive(Default)]
struct Bucket {
    slots: [Slot; BUCKET_WAYS],
}

/// Shared, lock-free transposition table.
///
/// Workers read and write concurrently without locks. A racing write can leave
/// a slot inconsistent; such a slot simply fails the key check and reads as a miss.
pub struct TranspositionTable {
    buckets: Box<[Bucket]>,
    mask: u64,
    gen: AtomicU32,
}

impl TranspositionTable {
    /// Table sized to the largest power-of-two bucket count fitting in `mb` megabytes.
    pub fn new(mb: usize) -> Self {
        let bytes = mb.saturating_mul(1024 * 1024);
        Self::with_buckets(bytes / ENTRY_BYTES / BUCKET_WAYS)
    }

    /// `n` is rounded down to a power of two (at least one bucket).
    pub fn with_buckets(n: usize) -> Self {
        let n = if n == 0 { 1 } else { 1usize << (usize::BITS - 1 - n.leading_zeros()) };
        let buckets: Vec<Bucket> = (0..n).map(|_| Bucket::default()).collect();
        Self { buckets: buckets.into_boxed_slice(), mask: (n - 1) as u64, gen: AtomicU32::new(0) }
    }

    #[inline]
    fn bucket(&self, key: u64) -> &Bucket { &self.buckets[(key & self.mask) as usize] }

    pub fn bucket_count(&self) -> usize { self.buckets.len() }

    pub fn capacity(&self) -> usize { self.buckets.len() * BUCKET_WAYS }

    pub fn generation(&self) -> u8 { self.gen.load(Ordering::Relaxed) as u8 }

    pub fn bump_generation(&self) { let _ = self.gen.fetch_add(1, Ordering::Relaxed); }

    pub fn clear(&self) {
        for b in self.buckets.iter() {
            for s in &b.slots { s.reset(); }
        }
    }

    /// Filled slots.
    pub fn len(&self) -> usize {
        self.buckets.iter().flat_map(|b| b.slots.iter()).filter(|s| s.data.load(Ordering::Relaxed) != 0).count()
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Per-mille of sampled slots written or touched in the current generation.
    pub fn hashfull(&self) -> usize {
        let gen = self.generation();
        let sample = self.buckets.iter().take(1000 / BUCKET_WAYS).flat_map(|b| b.slots.iter());
        let (mut seen, mut used) = (0usize, 0usize);
        for s in sample {
            seen += 1;
            let data = s.data.load(Ordering::Relaxed);
            if data != 0 && data_gen(data) == gen { used += 1; }
        }
        if seen == 0 { 0 } else { used * 1000 / seen }
    }

    /// Raw entry lookup without generation stamping or bound classification.
    pub fn get(&self, key: u64) -> Option<Entry> {
        self.bucket(key).slots.iter().find_map(|s| s.read(key)).and_then(|data| {
            Some(Entry {
                key,
                depth: data_depth(data),
                score: data_score(data),
                best: data_move(data),
                bound: Bound::from_bits((data >> BOUND_SHIFT) & 3)?,
                gen: data_gen(data),
            })
        })
    }

    pub fn store(&self, key: u64, depth: i32, score: i32, bound: Bound, best: Option<Move>, ply: usize) {
        let gen = self.generation();
        let depth = depth.clamp(0, u8::MAX as i32) as u8;
        let data = pack(best, score_to_tt(score, ply), depth, bound, gen);
        let slots = &self.bucket(key).slots;

        for s in slots {
            if let Some(cur) = s.read(key) {
                if depth >= data_depth(cur) { s.write(key, data); }
                return;
            }
        }

        let (primary_key, primary) = slots[0].load();
        if let Some(empty) = slots.iter().position(|s| s.data.load(Ordering::Relaxed) == 0) {
            if empty > 0 && primary != 0 && depth > data_depth(primary) {
                slots[empty].write(primary_key, primary);
                slots[0].write(key, data);
            } else {
                slots[empty].write(key, data);
            }
            return;
        }

        if depth > data_depth(primary) {
            slots[0].write(key, data);
            return;
        }

        // Shallowest of the rest; among equals the one idle longest.
        let mut victim = 1usize;
        let mut worst = (u8::MAX, 0u8);
        for (i, s) in slots.iter().enumerate().skip(1) {
            let cur = s.data.load(Ordering::Relaxed);
            let age = gen.wrapping_sub(data_gen(cur));
            let d = data_depth(cur);
            if d < worst.0 || (d == worst.0 && age > worst.1) {
                worst = (d, age);
                victim = i;
            }
        }
        slots[victim].write(key, data);
    }

    /// Looks `key` up, stamping a hit with the current generation, and
    /// classifies it against the requested depth and window.
    pub fn probe(&self, key: u64, depth: i32, alpha: i32, beta: i32, ply: usize) -> Probe {
        let gen = self.generation();
        for s in &self.bucket(key).slots {
            let Some(data) = s.read(key) else { continue };
            if data_gen(data) != gen { s.write(key, with_gen(data, gen)); }

            let best = data_move(data);
            if (data_depth(data) as i32) < depth {
                return Probe::Shallow { best };
            }
            let score = score_from_tt(data_score(data), ply);
            return match Bound::from_bits((data >> BOUND_SHIFT) & 3) {
                Some(Bound::Exact) => Probe::Exact { score, best },
                Some(Bound::Lower) if score >= beta => Probe::BetaCutoff { score, best },
                Some(Bound::Upper) if score <= alpha => Probe::AlphaCutoff { score, best },
                _ => Probe::Shallow { best },
            };
        }
        Probe::Miss
    }
}

impl Default for TranspositionTable {
    fn default() -> Self { Self::new(16) }
}
