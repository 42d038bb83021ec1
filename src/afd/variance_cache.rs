// # Variance Pre-Cache
//
// Neyman allocation needs a pilot-variance estimate per stratum of the
// reference column before it can compute weights. Pre-computing Stage-1
// variances for every non-RHS column once per RHS, instead of re-sampling a
// pilot on every `NeymanSampling::new` call, is the whole point of this
// module — the search engine calls `estimate_error` on the same RHS many
// thousands of times during a run.

use super::bitset::AttrSet;
use super::pli_cache::PliCache;
use super::table::Table;
use crate::error::Result;
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::HashMap;

/// Stage-1 pilot sample size for a stratum of `size` rows: `min(floor(sqrt(size)), 20)`.
fn pilot_sample_size(size: usize) -> usize {
    ((size as f64).sqrt().floor() as usize).min(20).min(size)
}

/// Draws `k` rows from `rows` without replacement via a partial Fisher-Yates shuffle.
pub(super) fn sample_without_replacement(rows: &[usize], k: usize, rng: &mut StdRng) -> Vec<usize> {
    let mut pool = rows.to_vec();
    let k = k.min(pool.len());
    for i in 0..k {
        let j = i + rng.random_range(0..(pool.len() - i));
        pool.swap(i, j);
    }
    pool.truncate(k);
    pool
}

/// Pilot-sample `class_rows` and compute the indicator variance against the
/// RHS column: indicator is 0 when a row's RHS value equals the pilot
/// sample's majority RHS value, 1 otherwise.
pub(super) fn pilot_variance(table: &Table, rhs: usize, class_rows: &[usize], rng: &mut StdRng) -> f64 {
    let pilot_n = pilot_sample_size(class_rows.len());
    if pilot_n <= 1 {
        return 0.0;
    }
    let sample = sample_without_replacement(class_rows, pilot_n, rng);

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for &r in &sample {
        *counts.entry(table.get(r, rhs)).or_insert(0) += 1;
    }
    let majority = counts.iter().max_by_key(|(_, &c)| c).map(|(v, _)| *v).unwrap_or("");

    let indicators: Vec<f64> =
        sample.iter().map(|&r| if table.get(r, rhs) == majority { 0.0 } else { 1.0 }).collect();
    let mean = indicators.iter().sum::<f64>() / indicators.len() as f64;
    let sum_sq: f64 = indicators.iter().map(|x| (x - mean).powi(2)).sum();
    sum_sq / (indicators.len() - 1) as f64
}

/// Per-column, per-stratum pilot variances for a single RHS. Strata are
/// indexed positionally, matching the order of that column's PLI
/// `equivalence_classes()`.
pub struct VarianceCache {
    by_column: HashMap<usize, Vec<f64>>,
}

impl VarianceCache {
    pub fn build(table: &Table, cache: &PliCache, rhs: usize, rng: &mut StdRng) -> Result<Self> {
        let mut by_column = HashMap::new();
        for col in 0..table.col_count() {
            if col == rhs {
                continue;
            }
            let pli = cache.get_or_compute(AttrSet::single(col))?;
            let variances: Vec<f64> =
                pli.equivalence_classes().iter().map(|cls| pilot_variance(table, rhs, cls, rng)).collect();
            by_column.insert(col, variances);
        }
        Ok(VarianceCache { by_column })
    }

    /// Pilot variances for `col`'s strata, in the same order as its PLI's
    /// equivalence classes. `None` if `col` was never pre-cached (e.g. it is
    /// the active RHS).
    pub fn variances_for(&self, col: usize) -> Option<&[f64]> {
        self.by_column.get(&col).map(|v| v.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn table(rows: Vec<Vec<&str>>) -> Table {
        let col_count = rows[0].len();
        let names = (0..col_count).map(|i| format!("c{i}")).collect();
        let rows: Vec<Vec<String>> =
            rows.into_iter().map(|r| r.into_iter().map(String::from).collect()).collect();
        Table::from_rows(names, rows).unwrap()
    }

    #[test]
    fn uniform_class_has_zero_variance() {
        let t = table(vec![vec!["1", "x"], vec!["1", "x"], vec!["1", "x"], vec!["1", "x"]]);
        let mut rng = StdRng::seed_from_u64(1);
        let v = pilot_variance(&t, 1, &[0, 1, 2, 3], &mut rng);
        assert_eq!(v, 0.0);
    }

    #[test]
    fn cache_skips_the_active_rhs_column() {
        let t = table(vec![vec!["1", "a"], vec!["2", "b"], vec!["1", "a"], vec!["2", "b"]]);
        let cache = PliCache::new(&t);
        let mut rng = StdRng::seed_from_u64(7);
        let vc = VarianceCache::build(&t, &cache, 1, &mut rng).unwrap();
        assert!(vc.variances_for(0).is_some());
        assert!(vc.variances_for(1).is_none());
    }
}
