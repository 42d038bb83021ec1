// # Search-Space Engine
//
// Per-RHS random-restart hill climbing over the attribute-set lattice.
// `minValidFD`/`maxNonFD` are antichain frontiers used for pruning; `peaks`
// anchors the escape step's hitting-set computation; the launchpad queue
// drives which region of the lattice gets explored next, ordered by
// estimated (not yet validated) error so cheap-looking starts are tried
// first.
//
// The engine owns one discovery run for one RHS and is dropped at the end
// of `run()` — nothing here outlives a single `explore()` call, matching
// the single-threaded, no-shared-state model the rest of the crate assumes
// for the search layer (only the PLI cache is a longer-lived, lock-guarded
// store; see pli_cache.rs).

use super::bitset::AttrSet;
use super::hitting_set::minimal_hitting_sets;
use super::measures::{Measure, MeasureKind};
use super::pli_cache::PliCache;
use super::sampling::{FocusedSampling, NeymanSampling, RandomSampling, SamplingKind, SamplingStrategy};
use super::table::Table;
use super::trie::Trie;
use super::variance_cache::VarianceCache;
use crate::error::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::cmp::{Ordering, Reverse};
use std::time::{SystemTime, UNIX_EPOCH};

/// A discovered approximate functional dependency.
#[derive(Debug, Clone, PartialEq)]
pub struct Fd {
    pub lhs: AttrSet,
    pub rhs: usize,
    pub error: f64,
}

#[derive(Clone, Copy)]
struct SearchNode {
    error: f64,
    validated: bool,
}

#[derive(PartialEq)]
struct OrdF64(f64);
impl Eq for OrdF64 {}
impl PartialOrd for OrdF64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for OrdF64 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal)
    }
}

fn seed_from_time() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_nanos() as u64).unwrap_or(0x9E3779B97F4A7C15)
}

pub struct SearchEngine<'a> {
    table: &'a Table,
    cache: &'a PliCache,
    measure: MeasureKind,
    sampling_kind: SamplingKind,
    sample_param: f64,
    rhs: usize,
    col_count: usize,
    max_error: f64,
    rng: StdRng,
    variance_cache: Option<VarianceCache>,
    min_valid_fd: Trie<f64>,
    max_non_fd: Trie<()>,
    peaks: Vec<AttrSet>,
    nodes: HashMap<u64, SearchNode>,
    seen_launchpads: HashSet<u64>,
    launchpad: BinaryHeap<Reverse<(OrdF64, AttrSet)>>,
    validation_count: u64,
}

impl<'a> SearchEngine<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        table: &'a Table,
        cache: &'a PliCache,
        rhs: usize,
        measure: MeasureKind,
        sampling_kind: SamplingKind,
        sample_param: f64,
        max_error: f64,
        seed: Option<u64>,
    ) -> Self {
        SearchEngine {
            table,
            cache,
            measure,
            sampling_kind,
            sample_param,
            rhs,
            col_count: table.col_count(),
            max_error,
            rng: StdRng::seed_from_u64(seed.unwrap_or_else(seed_from_time)),
            variance_cache: None,
            min_valid_fd: Trie::new(),
            max_non_fd: Trie::new(),
            peaks: Vec::new(),
            nodes: HashMap::new(),
            seen_launchpads: HashSet::new(),
            launchpad: BinaryHeap::new(),
            validation_count: 0,
        }
    }

    pub fn validation_count(&self) -> u64 {
        self.validation_count
    }

    pub fn run(mut self) -> Result<Vec<Fd>> {
        self.explore()?;
        Ok(self
            .min_valid_fd
            .enumerate()
            .into_iter()
            .map(|(lhs, &error)| Fd { lhs, rhs: self.rhs, error })
            .collect())
    }

    fn explore(&mut self) -> Result<()> {
        if self.sampling_kind == SamplingKind::Neyman {
            self.variance_cache = Some(VarianceCache::build(self.table, self.cache, self.rhs, &mut self.rng)?);
        }
        for i in 0..self.col_count {
            if i == self.rhs {
                continue;
            }
            self.push_launchpad(AttrSet::single(i))?;
        }
        while let Some(Reverse((_, l))) = self.launchpad.pop() {
            self.process_launchpad(l)?;
        }
        Ok(())
    }

    fn push_launchpad(&mut self, lhs: AttrSet) -> Result<()> {
        if !self.seen_launchpads.insert(lhs.0) {
            return Ok(());
        }
        let e = self.estimate(lhs)?;
        self.launchpad.push(Reverse((OrdF64(e), lhs)));
        Ok(())
    }

    fn is_valid_error(&self, error: f64) -> bool {
        error <= self.max_error
    }

    /// Estimate (possibly sampled) error for `lhs`; when no sampling strategy
    /// is configured, estimation and exact validation coincide, so this just
    /// delegates to `validate` and the call is counted once.
    fn estimate(&mut self, lhs: AttrSet) -> Result<f64> {
        if let Some(n) = self.nodes.get(&lhs.0) {
            return Ok(n.error);
        }
        match self.build_sampling(lhs)? {
            None => self.validate(lhs),
            Some(sampling) => {
                let e = self.measure.estimate_error(lhs, self.rhs, self.table, self.cache, sampling.as_ref())?;
                self.nodes.insert(lhs.0, SearchNode { error: e, validated: false });
                Ok(e)
            }
        }
    }

    fn validate(&mut self, lhs: AttrSet) -> Result<f64> {
        if let Some(n) = self.nodes.get(&lhs.0) {
            if n.validated {
                return Ok(n.error);
            }
        }
        let e = self.measure.calculate_error(lhs, self.rhs, self.table, self.cache)?;
        self.validation_count += 1;
        self.nodes.insert(lhs.0, SearchNode { error: e, validated: true });
        Ok(e)
    }

    fn build_sampling(&mut self, lhs: AttrSet) -> Result<Option<Box<dyn SamplingStrategy>>> {
        match self.sampling_kind {
            SamplingKind::None => Ok(None),
            SamplingKind::Random => {
                Ok(Some(Box::new(RandomSampling::new(self.table, self.sample_param, &mut self.rng))))
            }
            SamplingKind::Focused => Ok(Some(Box::new(FocusedSampling::new(
                self.table,
                self.cache,
                lhs,
                self.sample_param,
                &mut self.rng,
            )?))),
            SamplingKind::Neyman => Ok(Some(Box::new(NeymanSampling::new(
                self.table,
                self.cache,
                lhs,
                self.rhs,
                self.sample_param,
                self.variance_cache.as_ref(),
                &mut self.rng,
            )?))),
        }
    }

    fn process_launchpad(&mut self, l: AttrSet) -> Result<()> {
        if self.max_non_fd.contains_superset_of(l) {
            return self.escape(l);
        }
        let peak = if self.min_valid_fd.contains_subset_of(l) {
            Some(l)
        } else {
            let e = self.validate(l)?;
            if self.is_valid_error(e) {
                Some(l)
            } else {
                let (peak, non_valid) = self.ascend(None, l)?;
                self.record_max_non_fd(non_valid);
                peak
            }
        };
        if let Some(p) = peak {
            self.peaks.push(p);
            self.trickle_down(p)?;
        }
        self.escape(l)
    }

    /// Children of `lhs` (one bit added, RHS excluded) not already resolved
    /// by either frontier — the "not-valid-pruned" candidates ascend climbs
    /// through.
    fn live_children(&self, lhs: AttrSet) -> Vec<AttrSet> {
        lhs.children(AttrSet::single(self.rhs), self.col_count)
            .into_iter()
            .filter(|c| !self.min_valid_fd.contains_subset_of(*c) && !self.max_non_fd.contains_superset_of(*c))
            .collect()
    }

    fn ascend(&mut self, peak: Option<AttrSet>, non_valid: AttrSet) -> Result<(Option<AttrSet>, AttrSet)> {
        let children = self.live_children(non_valid);
        if children.is_empty() {
            return Ok((peak, non_valid));
        }
        let mut estimated = Vec::with_capacity(children.len());
        for c in children {
            let e = self.estimate(c)?;
            estimated.push((c, e));
        }

        match peak {
            None => {
                let min_child = estimated
                    .iter()
                    .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
                    .unwrap()
                    .0;
                let max_child = estimated
                    .iter()
                    .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
                    .unwrap()
                    .0;
                let e_min = self.validate(min_child)?;
                if self.is_valid_error(e_min) {
                    let e_max = self.validate(max_child)?;
                    if self.is_valid_error(e_max) {
                        Ok((Some(min_child), non_valid))
                    } else {
                        self.ascend(Some(min_child), max_child)
                    }
                } else {
                    self.ascend(None, min_child)
                }
            }
            Some(p) => {
                let max_child = estimated
                    .iter()
                    .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
                    .unwrap()
                    .0;
                let e_max = self.validate(max_child)?;
                if self.is_valid_error(e_max) {
                    Ok((Some(p), non_valid))
                } else {
                    self.ascend(Some(p), max_child)
                }
            }
        }
    }

    fn record_max_non_fd(&mut self, non_valid: AttrSet) {
        if self.max_non_fd.contains_superset_of(non_valid) {
            return;
        }
        let dominated: Vec<AttrSet> = self.max_non_fd.subsets_of(non_valid).into_iter().map(|(k, _)| k).collect();
        for d in dominated {
            self.max_non_fd.delete(d);
        }
        self.max_non_fd.set(non_valid, ());
    }

    fn trickle_down(&mut self, peak: AttrSet) -> Result<()> {
        let mut visited: HashSet<u64> = HashSet::new();
        let mut queue: BinaryHeap<Reverse<(u32, OrdF64, AttrSet)>> = BinaryHeap::new();
        visited.insert(peak.0);
        self.enqueue_parents(peak, &visited, &mut queue)?;

        while let Some(&Reverse((_, _, c))) = queue.peek() {
            if c.is_empty() {
                queue.pop();
                continue;
            }
            if visited.contains(&c.0) {
                queue.pop();
                let is_valid = self.nodes.get(&c.0).map(|n| n.validated && self.is_valid_error(n.error)).unwrap_or(false);
                if is_valid && !self.min_valid_fd.contains_subset_of(c) {
                    self.min_valid_fd.set(c, self.nodes[&c.0].error);
                }
                continue;
            }
            visited.insert(c.0);

            if self.min_valid_fd.contains_subset_of(c) {
                queue.pop();
                self.enqueue_parents(c, &visited, &mut queue)?;
            } else if self.max_non_fd.contains_superset_of(c) {
                queue.pop();
            } else {
                let e = self.validate(c)?;
                if !self.is_valid_error(e) {
                    queue.pop();
                } else {
                    self.enqueue_parents(c, &visited, &mut queue)?;
                }
            }
        }
        Ok(())
    }

    fn enqueue_parents(
        &mut self,
        node: AttrSet,
        visited: &HashSet<u64>,
        queue: &mut BinaryHeap<Reverse<(u32, OrdF64, AttrSet)>>,
    ) -> Result<()> {
        for p in node.parents() {
            if visited.contains(&p.0) {
                continue;
            }
            let e = self.estimate(p)?;
            queue.push(Reverse((p.popcount(), OrdF64(e), p)));
        }
        Ok(())
    }

    fn escape(&mut self, launchpad: AttrSet) -> Result<()> {
        if self.peaks.is_empty() {
            return Ok(());
        }
        let rhs_bit = AttrSet::single(self.rhs);
        let family: Vec<AttrSet> =
            self.peaks.iter().map(|&p| p.union(rhs_bit).complement_within(self.col_count)).collect();
        let transversals = minimal_hitting_sets(&family, self.col_count);
        for t in transversals {
            let candidate = launchpad.union(t);
            if candidate == launchpad {
                continue;
            }
            self.push_launchpad(candidate)?;
        }
        Ok(())
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
    fn perfect_key_scenario_finds_both_directions() {
        let t = table(vec![vec!["1", "x"], vec!["2", "y"], vec!["3", "z"]]);
        let cache = PliCache::new(&t);
        let engine =
            SearchEngine::new(&t, &cache, 1, MeasureKind::G3, SamplingKind::None, 1.0, 0.0, Some(1));
        let fds = engine.run().unwrap();
        assert!(fds.iter().any(|f| f.lhs == AttrSet::single(0) && f.error == 0.0));
    }

    #[test]
    fn one_violation_scenario_respects_max_error_threshold() {
        let t = table(vec![vec!["1", "x"], vec!["1", "y"], vec!["2", "z"]]);
        let cache = PliCache::new(&t);

        let strict =
            SearchEngine::new(&t, &cache, 1, MeasureKind::G3, SamplingKind::None, 1.0, 0.0, Some(1));
        let fds_strict = strict.run().unwrap();
        assert!(!fds_strict.iter().any(|f| f.lhs == AttrSet::single(0)));

        let cache2 = PliCache::new(&t);
        let lenient =
            SearchEngine::new(&t, &cache2, 1, MeasureKind::G3, SamplingKind::None, 1.0, 0.5, Some(1));
        let fds_lenient = lenient.run().unwrap();
        assert!(fds_lenient.iter().any(|f| f.lhs == AttrSet::single(0)));
    }

    #[test]
    fn emitted_fds_are_minimal() {
        let t = table(vec![
            vec!["1", "a", "x"],
            vec!["1", "a", "y"],
            vec!["2", "b", "z"],
        ]);
        let cache = PliCache::new(&t);
        let engine =
            SearchEngine::new(&t, &cache, 2, MeasureKind::G1, SamplingKind::None, 1.0, 1.0 / 3.0, Some(1));
        let fds = engine.run().unwrap();
        for a in &fds {
            for b in &fds {
                if a.lhs != b.lhs {
                    assert!(!a.lhs.is_subset_of(b.lhs));
                }
            }
        }
    }

    #[test]
    fn validation_count_is_positive_after_a_run() {
        let t = table(vec![vec!["1", "x"], vec!["2", "y"], vec!["3", "z"]]);
        let cache = PliCache::new(&t);
        let mut engine =
            SearchEngine::new(&t, &cache, 1, MeasureKind::G3, SamplingKind::None, 1.0, 0.0, Some(1));
        engine.explore().unwrap();
        assert!(engine.validation_count() > 0);
    }
}
