// # PLI Cache
//
// Single-column PLIs are cheap to build and looked up constantly, so they are
// pinned in a "hot" tier for the life of a discovery run. Everything else is
// built on demand by a greedy cover over whatever subset PLIs are already
// cached, then folded together with `Pli::intersect`, and may later be
// downgraded to a "cold" best-effort tier (or dropped outright) once the
// cache grows past a high-water mark — the same bounded-LRU shape as any
// other result cache in this codebase, just keyed by attribute set instead
// of by query text.

use super::bitset::AttrSet;
use super::pli::Pli;
use super::table::Table;
use super::trie::Trie;
use crate::error::{DiscoveryError, Result};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Sum of cached (non-pinned) class counts above which a cleanup pass runs.
pub const HIGH_WATER_CLASSES: usize = 50_000;
/// Target sum of cached (non-pinned) class counts after a cleanup pass.
pub const LOW_WATER_CLASSES: usize = 25_000;
/// Minimum time between cleanup passes.
pub const MIN_CLEANUP_INTERVAL: Duration = Duration::from_secs(30);
/// Multi-column results with fewer classes than this are cached unconditionally.
pub const CLASS_COUNT_CACHE_THRESHOLD: usize = 5_000;
/// A-sets at or below this cardinality are always worth caching regardless of size.
pub const SMALL_POPCOUNT_ALWAYS_CACHE: u32 = 3;

struct AccessRecord {
    last_access: Instant,
    count: u64,
}

impl AccessRecord {
    fn touch() -> Self {
        AccessRecord { last_access: Instant::now(), count: 1 }
    }

    fn bump(&mut self) {
        self.last_access = Instant::now();
        self.count += 1;
    }
}

pub struct PliCache {
    row_count: usize,
    root: Arc<Pli>,
    hot: RwLock<HashMap<u64, Arc<Pli>>>,
    cold: RwLock<HashMap<u64, Arc<Pli>>>,
    trie: RwLock<Trie<Arc<Pli>>>,
    access: RwLock<HashMap<u64, AccessRecord>>,
    last_cleanup: Mutex<Instant>,
}

impl PliCache {
    /// Builds the cache and eagerly computes every single-column PLI, which
    /// are pinned and never evicted.
    pub fn new(table: &Table) -> Self {
        let mut hot = HashMap::new();
        let mut trie = Trie::new();
        for col in 0..table.col_count() {
            let key = AttrSet::single(col);
            let pli = Arc::new(Pli::from_column(table, col));
            hot.insert(key.0, pli.clone());
            trie.set(key, pli);
        }
        PliCache {
            row_count: table.row_count(),
            root: Arc::new(Pli::root(table.row_count())),
            hot: RwLock::new(hot),
            cold: RwLock::new(HashMap::new()),
            trie: RwLock::new(trie),
            access: RwLock::new(HashMap::new()),
            last_cleanup: Mutex::new(Instant::now()),
        }
    }

    fn is_pinned(&self, key: u64) -> bool {
        key.count_ones() == 1
    }

    pub fn get_or_compute(&self, c: AttrSet) -> Result<Arc<Pli>> {
        if c.is_empty() {
            return Ok(self.root.clone());
        }
        if let Some(p) = self.lookup_cached(c) {
            return Ok(p);
        }

        let result = self.compute_via_greedy_cover(c)?;
        self.maybe_cache(c, result.clone());
        Ok(result)
    }

    fn lookup_cached(&self, c: AttrSet) -> Option<Arc<Pli>> {
        if let Some(p) = self.hot.read().get(&c.0) {
            self.touch(c.0);
            return Some(p.clone());
        }
        let promoted = self.cold.write().remove(&c.0);
        if let Some(p) = promoted {
            self.hot.write().insert(c.0, p.clone());
            self.touch(c.0);
            return Some(p);
        }
        None
    }

    fn touch(&self, key: u64) {
        self.access
            .write()
            .entry(key)
            .and_modify(AccessRecord::bump)
            .or_insert_with(AccessRecord::touch);
    }

    fn compute_via_greedy_cover(&self, c: AttrSet) -> Result<Arc<Pli>> {
        let mut remaining_candidates: Vec<(AttrSet, Arc<Pli>)> = {
            let trie = self.trie.read();
            trie.subsets_of(c)
                .into_iter()
                .filter(|(k, _)| !k.is_empty())
                .map(|(k, v)| (k, v.clone()))
                .collect()
        };

        let mut covered = AttrSet::EMPTY;
        let mut picked: Vec<Arc<Pli>> = Vec::new();
        while covered != c {
            let remaining_cols = AttrSet(c.0 & !covered.0);
            let mut best_idx: Option<usize> = None;
            let mut best_newly = 0u32;
            let mut best_classes = usize::MAX;
            for (i, (k, v)) in remaining_candidates.iter().enumerate() {
                let newly = AttrSet(k.0 & remaining_cols.0).popcount();
                if newly == 0 {
                    continue;
                }
                if newly > best_newly || (newly == best_newly && v.num_classes() < best_classes) {
                    best_newly = newly;
                    best_classes = v.num_classes();
                    best_idx = Some(i);
                }
            }
            let idx = best_idx.ok_or_else(|| {
                DiscoveryError::PliConstructionFailure(format!(
                    "no cached subset covers the remaining columns of {c:?}"
                ))
            })?;
            let (k, v) = remaining_candidates.remove(idx);
            covered = AttrSet(covered.0 | k.0);
            picked.push(v);
        }

        picked.sort_by_key(|p| p.num_classes());
        let mut iter = picked.into_iter();
        let mut acc = iter.next().expect("c is non-empty so at least one candidate is picked");
        for p in iter {
            acc = Arc::new(acc.intersect(&p));
        }
        Ok(acc)
    }

    fn maybe_cache(&self, c: AttrSet, pli: Arc<Pli>) {
        let worth_caching =
            pli.num_classes() < CLASS_COUNT_CACHE_THRESHOLD || c.popcount() <= SMALL_POPCOUNT_ALWAYS_CACHE;
        if !worth_caching {
            return;
        }
        self.cold.write().insert(c.0, pli.clone());
        self.trie.write().set(c, pli);
        self.touch(c.0);
        self.maybe_evict();
    }

    fn maybe_evict(&self) {
        let total: usize = {
            let hot = self.hot.read();
            let cold = self.cold.read();
            hot.iter()
                .filter(|(k, _)| !self.is_pinned(**k))
                .map(|(_, v)| v.num_classes())
                .sum::<usize>()
                + cold.values().map(|v| v.num_classes()).sum::<usize>()
        };
        if total <= HIGH_WATER_CLASSES {
            return;
        }
        {
            let mut last = self.last_cleanup.lock();
            if last.elapsed() < MIN_CLEANUP_INTERVAL {
                return;
            }
            *last = Instant::now();
        }

        self.demote_cold_hot_entries();
        self.drop_coldest_until_low_water();
    }

    fn demote_cold_hot_entries(&self) {
        let mut hot = self.hot.write();
        let access = self.access.read();
        let mut non_pinned: Vec<u64> =
            hot.keys().copied().filter(|k| !self.is_pinned(*k)).collect();
        non_pinned.sort_by_key(|k| {
            access.get(k).map(|a| (a.count, a.last_access)).unwrap_or((0, Instant::now()))
        });
        let mut cold = self.cold.write();
        for key in non_pinned {
            if let Some(pli) = hot.remove(&key) {
                cold.insert(key, pli);
            }
        }
    }

    fn drop_coldest_until_low_water(&self) {
        let mut cold = self.cold.write();
        let access = self.access.read();
        let mut keys: Vec<u64> = cold.keys().copied().collect();
        keys.sort_by_key(|k| {
            access.get(k).map(|a| (a.count, a.last_access)).unwrap_or((0, Instant::now()))
        });
        let mut total: usize = cold.values().map(|v| v.num_classes()).sum();
        for key in keys {
            if total <= LOW_WATER_CLASSES {
                break;
            }
            if let Some(pli) = cold.remove(&key) {
                total -= pli.num_classes();
            }
        }
    }

    /// Best already-cached PLI whose columns are a subset of `c` — largest
    /// cardinality first, ties broken by fewest classes. Non-null whenever
    /// `c` is non-empty, since single-column PLIs are always pinned.
    pub fn find_best_cached_subset(&self, c: AttrSet) -> Option<Arc<Pli>> {
        if c.is_empty() {
            return Some(self.root.clone());
        }
        let trie = self.trie.read();
        trie.subsets_of(c)
            .into_iter()
            .max_by_key(|(k, v)| (k.popcount(), std::cmp::Reverse(v.num_classes())))
            .map(|(_, v)| v.clone())
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: Vec<Vec<&str>>) -> Table {
        let col_count = rows[0].len();
        let names = (0..col_count).map(|i| format!("c{i}")).collect();
        let rows: Vec<Vec<String>> =
            rows.into_iter().map(|r| r.into_iter().map(String::from).collect()).collect();
        Table::from_rows(names, rows).unwrap()
    }

    #[test]
    fn single_columns_are_pinned_and_precomputed() {
        let t = table(vec![vec!["1", "x"], vec!["1", "y"], vec!["2", "z"]]);
        let cache = PliCache::new(&t);
        let a = cache.get_or_compute(AttrSet::single(0)).unwrap();
        assert_eq!(a.equivalence_classes(), &[vec![0, 1]]);
    }

    #[test]
    fn empty_lhs_returns_root() {
        let t = table(vec![vec!["1"], vec!["2"]]);
        let cache = PliCache::new(&t);
        let root = cache.get_or_compute(AttrSet::EMPTY).unwrap();
        assert_eq!(root.equivalence_classes(), &[vec![0, 1]]);
    }

    #[test]
    fn multi_column_is_computed_via_intersection() {
        let t = table(vec![
            vec!["1", "x"],
            vec!["1", "x"],
            vec!["1", "y"],
            vec!["2", "x"],
        ]);
        let cache = PliCache::new(&t);
        let ab = cache.get_or_compute(AttrSet::single(0).union(AttrSet::single(1))).unwrap();
        assert_eq!(ab.equivalence_classes(), &[vec![0, 1]]);
        // second lookup should hit the cache rather than recompute
        let ab2 = cache.get_or_compute(AttrSet::single(0).union(AttrSet::single(1))).unwrap();
        assert_eq!(ab.equivalence_classes(), ab2.equivalence_classes());
    }

    #[test]
    fn find_best_cached_subset_is_never_none_for_nonempty_query() {
        let t = table(vec![vec!["1", "x"], vec!["2", "y"]]);
        let cache = PliCache::new(&t);
        let best = cache.find_best_cached_subset(AttrSet::single(0).union(AttrSet::single(1)));
        assert!(best.is_some());
    }
}
