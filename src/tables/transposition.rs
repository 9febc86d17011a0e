use crate::types::{Move, Score};

pub const MIN_TT_SIZE: usize = 1;
pub const MAX_TT_SIZE: usize = 512;
pub const DEFAULT_TT_SIZE: usize = 16;

const MEGABYTE: usize = 1024 * 1024;
const ENTRY_SIZE: usize = std::mem::size_of::<Option<Entry>>();

/// The score type stored with a transposition table entry.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

#[derive(Copy, Clone)]
pub struct Entry {
    key: u16,
    pub mv: Move,
    pub score: i16,
    pub depth: u8,
    pub bound: Bound,
    pub age: u8,
}

/// A read result with the score already converted back to the root's frame.
#[derive(Copy, Clone)]
pub struct Hit {
    pub mv: Move,
    pub score: i32,
    pub depth: i32,
    pub bound: Bound,
}

/// The transposition table caches completed search results across searches
/// of the same game. Entries are verified by the bottom 16 bits of the hash;
/// index reduction uses the Lemire multiply-shift.
pub struct TranspositionTable {
    entries: Vec<Option<Entry>>,
    age: u8,
}

impl TranspositionTable {
    /// Creates a table with a total allocation of `megabytes`.
    pub fn new(megabytes: usize) -> Self {
        Self {
            entries: vec![None; megabytes * MEGABYTE / ENTRY_SIZE],
            age: 0,
        }
    }

    /// Drops all stored entries, keeping the allocation.
    pub fn clear(&mut self) {
        self.age = 0;
        self.entries.iter_mut().for_each(|entry| *entry = None);
    }

    /// Advances the generation counter; called once per `go`.
    pub fn new_search(&mut self) {
        self.age = self.age.wrapping_add(1);
    }

    /// An approximate fill factor in permille, for `info hashfull` output.
    pub fn hashfull(&self) -> usize {
        let batch = 1000.min(self.entries.len());
        self.entries[..batch].iter().filter(|slot| slot.is_some()).count() * 1000 / batch.max(1)
    }

    pub fn read(&self, hash: u64, ply: usize) -> Option<Hit> {
        let entry = self.entries[self.index(hash)]?;
        if entry.key != verification_key(hash) {
            return None;
        }

        Some(Hit {
            mv: entry.mv,
            score: adjust_hash_score(i32::from(entry.score), ply),
            depth: i32::from(entry.depth),
            bound: entry.bound,
        })
    }

    pub fn write(&mut self, hash: u64, depth: i32, score: i32, bound: Bound, mut mv: Move, ply: usize) {
        let key = verification_key(hash);
        let index = self.index(hash);

        // An upper bound node rarely has a meaningful best move; keep the
        // previous one rather than overwrite it with garbage
        if let Some(old) = self.entries[index] {
            if bound == Bound::Upper && old.key == key && !old.mv.is_empty() {
                mv = old.mv;
            }
        }

        self.entries[index] = Some(Entry {
            key,
            mv,
            score: to_hash_score(score, ply) as i16,
            depth: depth as u8,
            bound,
            age: self.age,
        });
    }

    /// Hints the cache that the entry for `hash` is about to be read.
    pub fn prefetch(&self, hash: u64) {
        #[cfg(target_arch = "x86_64")]
        unsafe {
            use std::arch::x86_64::{_mm_prefetch, _MM_HINT_T0};

            let ptr = self.entries.as_ptr().add(self.index(hash)).cast();
            _mm_prefetch::<_MM_HINT_T0>(ptr);
        }

        #[cfg(not(target_arch = "x86_64"))]
        let _ = hash;
    }

    fn index(&self, hash: u64) -> usize {
        // For details, see: https://lemire.me/blog/2016/06/27/a-fast-alternative-to-the-modulo-reduction
        ((u128::from(hash) * self.entries.len() as u128) >> 64) as usize
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(DEFAULT_TT_SIZE)
    }
}

const fn verification_key(hash: u64) -> u16 {
    hash as u16
}

/// Converts a mate score from "plies from the root" to "plies from this
/// node" before storing, so the entry stays valid wherever it is probed.
const fn to_hash_score(score: i32, ply: usize) -> i32 {
    if score >= Score::MATE_BOUND {
        score + ply as i32
    } else if score <= -Score::MATE_BOUND {
        score - ply as i32
    } else {
        score
    }
}

/// The inverse of `to_hash_score`, applied on probe.
const fn adjust_hash_score(score: i32, ply: usize) -> i32 {
    if score >= Score::MATE_BOUND {
        score - ply as i32
    } else if score <= -Score::MATE_BOUND {
        score + ply as i32
    } else {
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MoveKind, Square};

    #[test]
    fn mate_scores_are_ply_relative() {
        let mut tt = TranspositionTable::new(1);
        let mv = Move::new(Square::E2, Square::E4, MoveKind::Quiet);

        // Mate in 5 plies from the root, stored at ply 2
        tt.write(0xABCD, 8, Score::MATE - 5, Bound::Exact, mv, 2);

        // Probed at ply 4, the same mate is now 7 plies away from the root
        let hit = tt.read(0xABCD, 4).unwrap();
        assert_eq!(hit.score, Score::MATE - 7);
    }

    #[test]
    fn verification_key_rejects_index_collisions() {
        let mut tt = TranspositionTable::new(1);
        let mv = Move::new(Square::E2, Square::E4, MoveKind::Quiet);

        // Both hashes reduce to slot 0, but their verification keys differ
        tt.write(0xAAAA, 4, 100, Bound::Exact, mv, 0);
        assert!(tt.read(0xBBBB, 0).is_none());
        assert!(tt.read(0xAAAA, 0).is_some());
    }

    #[test]
    fn upper_bound_preserves_previous_move() {
        let mut tt = TranspositionTable::new(1);
        let good = Move::new(Square::E2, Square::E4, MoveKind::Quiet);

        tt.write(0xABCD, 6, 50, Bound::Exact, good, 0);
        tt.write(0xABCD, 7, -20, Bound::Upper, Move::NULL, 0);

        assert_eq!(tt.read(0xABCD, 0).unwrap().mv, good);
    }
}
