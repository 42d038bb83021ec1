// # AFD Discovery
//
// Top-level driver (C9): run the search engine once per RHS column over a
// fresh `SearchEngine`, union the minimal LHS sets each run emits. See
// `search.rs` for the per-RHS exploration and `pli_cache.rs` for the shared,
// run-scoped PLI store every RHS's engine draws from.

pub mod bitset;
pub mod config;
pub mod hitting_set;
pub mod measures;
pub mod pli;
pub mod pli_cache;
pub mod sampling;
pub mod search;
pub mod table;
pub mod trie;
pub mod variance_cache;

pub use bitset::{AttrSet, MAX_COLUMNS};
pub use config::DiscoveryConfig;
pub use measures::{Measure, MeasureKind};
pub use pli::Pli;
pub use pli_cache::PliCache;
pub use sampling::SamplingKind;
pub use search::{Fd, SearchEngine};
pub use table::Table;

use crate::error::{DiscoveryError, Result};
use tracing::{debug, info, instrument};

/// Discovers minimal approximate functional dependencies for every RHS
/// column of `table` under `config`.
///
/// `col_count > MAX_COLUMNS` is refused rather than silently falling back to
/// a slower arbitrary-size path (no such path exists in this crate — see
/// DESIGN.md). An empty table yields an empty result set.
#[instrument(skip(table, config), fields(rows = table.row_count(), cols = table.col_count()))]
pub fn discover(table: &Table, config: &DiscoveryConfig) -> Result<Vec<Fd>> {
    if table.col_count() > MAX_COLUMNS {
        return Err(DiscoveryError::InvalidInput(format!(
            "table has {} columns, fast bitset path supports at most {}",
            table.col_count(),
            MAX_COLUMNS
        )));
    }
    if table.row_count() == 0 {
        debug!("empty table, returning no FDs");
        return Ok(Vec::new());
    }

    let cache = PliCache::new(table);
    let mut all_fds = Vec::new();
    for rhs in 0..table.col_count() {
        let engine = SearchEngine::new(
            table,
            &cache,
            rhs,
            config.measure,
            config.sampling,
            config.sample_param,
            config.max_error,
            config.seed,
        );
        let fds = engine.run()?;
        debug!(rhs, found = fds.len(), "completed RHS exploration");
        all_fds.extend(fds);
    }
    info!(total = all_fds.len(), "discovery complete");
    Ok(all_fds)
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
    fn scenario_one_perfect_key() {
        let t = table(vec![vec!["1", "x"], vec!["2", "y"], vec!["3", "z"]]);
        let config = DiscoveryConfig { seed: Some(7), ..Default::default() };
        let fds = discover(&t, &config).unwrap();
        assert!(fds.iter().any(|f| f.lhs == AttrSet::single(0) && f.rhs == 1));
        assert!(fds.iter().any(|f| f.lhs == AttrSet::single(1) && f.rhs == 0));
    }

    #[test]
    fn empty_table_yields_no_fds() {
        let t = Table::new(vec!["a".into()], vec![vec![]]).unwrap();
        let config = DiscoveryConfig::default();
        assert!(discover(&t, &config).unwrap().is_empty());
    }

    #[test]
    fn rejects_tables_wider_than_the_fast_path() {
        let names: Vec<String> = (0..(MAX_COLUMNS + 1)).map(|i| format!("c{i}")).collect();
        let row: Vec<String> = (0..(MAX_COLUMNS + 1)).map(|i| i.to_string()).collect();
        let t = Table::from_rows(names, vec![row]).unwrap();
        let config = DiscoveryConfig::default();
        assert!(matches!(discover(&t, &config), Err(DiscoveryError::InvalidInput(_))));
    }
}
