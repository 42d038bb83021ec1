// # Minimal Hitting-Set Engine
//
// Computes every minimal transversal of a family of A-sets: the incremental
// construction from Berge — seed from the smallest set, then for each
// further set `S`, drop transversals that miss `S` and re-extend them by one
// element of `S`, keeping only results no stored transversal already covers.
// The escape step in the search engine is the only caller, but the algorithm
// is independent of it.

use super::bitset::AttrSet;
use super::trie::Trie;

/// All ⊆-minimal A-sets that intersect every member of `family`, given a
/// universe of `k` columns.
pub fn minimal_hitting_sets(family: &[AttrSet], k: usize) -> Vec<AttrSet> {
    let mut sorted: Vec<AttrSet> = family.to_vec();
    sorted.sort_by_key(|s| s.popcount());

    let mut iter = sorted.into_iter();
    let first = match iter.next() {
        Some(s) => s,
        None => return Vec::new(),
    };

    let mut h: Trie<()> = Trie::new();
    for col in first.to_sorted_vec() {
        h.set(AttrSet::single(col), ());
    }

    for s in iter {
        let sc = s.complement_within(k);
        let removed: Vec<AttrSet> = h.subsets_of(sc).into_iter().map(|(k, _)| k).collect();
        for h_set in &removed {
            h.delete(*h_set);
        }
        for h_set in &removed {
            for col in s.to_sorted_vec() {
                let candidate = h_set.union(AttrSet::single(col));
                if !h.contains_subset_of(candidate) {
                    h.set(candidate, ());
                }
            }
        }
    }

    h.enumerate().into_iter().map(|(k, _)| k).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(bits: &[usize]) -> AttrSet {
        bits.iter().fold(AttrSet::EMPTY, |a, &b| a.set_bit(b))
    }

    #[test]
    fn every_result_hits_every_input_set() {
        let family = vec![set(&[1, 2, 3]), set(&[1, 2, 4]), set(&[1, 2, 5])];
        let result = minimal_hitting_sets(&family, 6);
        for t in &result {
            for s in &family {
                assert!(!t.intersect(*s).is_empty(), "{t:?} does not hit {s:?}");
            }
        }
    }

    #[test]
    fn matches_documented_scenario() {
        let family = vec![set(&[1, 2, 3]), set(&[1, 2, 4]), set(&[1, 2, 5])];
        let mut result = minimal_hitting_sets(&family, 6);
        result.sort_by_key(|s| s.0);
        let mut expected = vec![set(&[1]), set(&[2]), set(&[3, 4, 5])];
        expected.sort_by_key(|s| s.0);
        assert_eq!(result, expected);
    }

    #[test]
    fn no_result_has_a_proper_subset_also_in_the_result() {
        let family = vec![set(&[0, 1]), set(&[1, 2]), set(&[2, 3])];
        let result = minimal_hitting_sets(&family, 4);
        for (i, a) in result.iter().enumerate() {
            for (j, b) in result.iter().enumerate() {
                if i != j {
                    assert!(!a.is_subset_of(*b) || a == b);
                }
            }
        }
    }

    #[test]
    fn empty_family_has_no_transversals() {
        assert!(minimal_hitting_sets(&[], 5).is_empty());
    }
}
