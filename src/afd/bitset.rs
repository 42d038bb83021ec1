// # Attribute-Set Bitset Primitives
//
// A table's columns are numbered `0..col_count`. As long as `col_count <= 63`
// every attribute set fits in one machine word, so the lattice the search
// engine walks is just a `u64` with `popcount`/subset/superset arithmetic.
// This module is the fast path the rest of the engine assumes; `MAX_COLUMNS`
// is the hard cutoff `discover()` checks before doing anything else.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Largest column count the 64-bit fast path supports.
pub const MAX_COLUMNS: usize = 63;

/// A subset of `{0..col_count-1}`, encoded as a bit per column.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AttrSet(pub u64);

impl std::fmt::Debug for AttrSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AttrSet({:?})", self.to_sorted_vec())
    }
}

impl AttrSet {
    pub const EMPTY: AttrSet = AttrSet(0);

    #[inline]
    pub fn single(col: usize) -> Self {
        AttrSet(1u64 << col)
    }

    #[inline]
    pub fn from_bits(bits: u64) -> Self {
        AttrSet(bits)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn test_bit(self, col: usize) -> bool {
        (self.0 >> col) & 1 == 1
    }

    #[inline]
    pub fn set_bit(self, col: usize) -> Self {
        AttrSet(self.0 | (1u64 << col))
    }

    #[inline]
    pub fn clear_bit(self, col: usize) -> Self {
        AttrSet(self.0 & !(1u64 << col))
    }

    #[inline]
    pub fn union(self, other: AttrSet) -> Self {
        AttrSet(self.0 | other.0)
    }

    #[inline]
    pub fn intersect(self, other: AttrSet) -> Self {
        AttrSet(self.0 & other.0)
    }

    #[inline]
    pub fn is_subset_of(self, other: AttrSet) -> bool {
        (self.0 & other.0) == self.0
    }

    /// Bits missing from `self`, restricted to the first `k` columns.
    #[inline]
    pub fn complement_within(self, k: usize) -> Self {
        let mask = if k >= 64 { u64::MAX } else { (1u64 << k) - 1 };
        AttrSet((!self.0) & mask)
    }

    /// Smallest set bit at or after `from`, or `None`.
    pub fn next_set_bit(self, from: usize) -> Option<usize> {
        if from >= 64 {
            return None;
        }
        let shifted = self.0 >> from;
        if shifted == 0 {
            None
        } else {
            Some(from + shifted.trailing_zeros() as usize)
        }
    }

    pub fn popcount(self) -> u32 {
        cache_entry(self.0).popcount
    }

    /// Ascending sorted column indices of the set bits.
    pub fn to_sorted_vec(self) -> Vec<usize> {
        (*cache_entry(self.0).sorted).clone()
    }

    fn to_sorted_arc(self) -> Arc<Vec<usize>> {
        cache_entry(self.0).sorted.clone()
    }

    /// All A-sets reachable by clearing exactly one set bit.
    pub fn parents(self) -> Vec<AttrSet> {
        (*cache_entry(self.0).parents).clone()
    }

    /// All A-sets reachable by setting exactly one bit not in `self` or `exclude`.
    pub fn children(self, exclude: AttrSet, col_count: usize) -> Vec<AttrSet> {
        let mut out = Vec::new();
        for col in 0..col_count {
            if !self.test_bit(col) && !exclude.test_bit(col) {
                out.push(self.set_bit(col));
            }
        }
        out
    }
}

struct CacheEntry {
    popcount: u32,
    sorted: Arc<Vec<usize>>,
    parents: Arc<Vec<AttrSet>>,
}

static BITSET_CACHE: Lazy<RwLock<HashMap<u64, Arc<CacheEntry>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

fn cache_entry(word: u64) -> Arc<CacheEntry> {
    if let Some(e) = BITSET_CACHE.read().get(&word) {
        return e.clone();
    }
    let sorted: Vec<usize> = (0..64).filter(|&b| (word >> b) & 1 == 1).collect();
    let parents = sorted
        .iter()
        .map(|&b| AttrSet(word & !(1u64 << b)))
        .collect();
    let entry = Arc::new(CacheEntry {
        popcount: word.count_ones(),
        sorted: Arc::new(sorted),
        parents: Arc::new(parents),
    });
    BITSET_CACHE.write().insert(word, entry.clone());
    entry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subset_and_union() {
        let a = AttrSet::single(0).union(AttrSet::single(1));
        let b = AttrSet::single(0);
        assert!(b.is_subset_of(a));
        assert!(!a.is_subset_of(b));
    }

    #[test]
    fn popcount_and_sorted() {
        let a = AttrSet::single(1).union(AttrSet::single(3));
        assert_eq!(a.popcount(), 2);
        assert_eq!(a.to_sorted_vec(), vec![1, 3]);
    }

    #[test]
    fn parents_clear_one_bit_each() {
        let a = AttrSet::single(0).union(AttrSet::single(2)).union(AttrSet::single(4));
        let mut parents = a.parents();
        parents.sort();
        assert_eq!(parents.len(), 3);
        for p in &parents {
            assert!(p.is_subset_of(a));
            assert_eq!(p.popcount(), 2);
        }
    }

    #[test]
    fn children_respects_exclusion() {
        let a = AttrSet::single(0);
        let exclude = AttrSet::single(2);
        let kids = a.children(exclude, 4);
        assert_eq!(kids.len(), 2); // columns 1 and 3
        for k in &kids {
            assert!(!k.test_bit(2));
        }
    }

    #[test]
    fn complement_within_masks_to_k_bits() {
        let a = AttrSet::single(0);
        let c = a.complement_within(3);
        assert_eq!(c.0, 0b110);
    }

    #[test]
    fn next_set_bit_scans_forward() {
        let a = AttrSet::single(2).union(AttrSet::single(5));
        assert_eq!(a.next_set_bit(0), Some(2));
        assert_eq!(a.next_set_bit(3), Some(5));
        assert_eq!(a.next_set_bit(6), None);
    }
}
