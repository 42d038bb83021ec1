// # Position List Index
//
// A PLI is the equivalence-class partition of rows under an attribute set:
// rows land in the same class iff they agree on every column of the set.
// Singleton classes (rows that agree with nobody) are dropped — the implicit
// "0" entries of the attribute vector carry that information for free instead
// of wasting a class per unique row.
//
// `intersect` is the one hot loop in the whole engine: every multi-column PLI
// the cache ever builds is a left fold of single-column PLIs through it.

use super::bitset::AttrSet;
use super::table::Table;
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::sync::Arc;

pub struct Pli {
    columns: AttrSet,
    classes: Vec<Vec<usize>>,
    row_count: usize,
    attribute_vector: OnceCell<Arc<Vec<u32>>>,
}

impl Pli {
    fn from_classes(columns: AttrSet, classes: Vec<Vec<usize>>, row_count: usize) -> Self {
        Pli { columns, classes, row_count, attribute_vector: OnceCell::new() }
    }

    /// PLI of a single column: rows grouped by equal cell value, singletons dropped.
    pub fn from_column(table: &Table, col: usize) -> Self {
        let mut groups: HashMap<&str, Vec<usize>> = HashMap::new();
        for row in 0..table.row_count() {
            groups.entry(table.get(row, col)).or_default().push(row);
        }
        let classes = groups.into_values().filter(|g| g.len() >= 2).collect();
        Pli::from_classes(AttrSet::single(col), classes, table.row_count())
    }

    /// Synthetic PLI for the empty attribute set: one class containing every row.
    pub fn root(row_count: usize) -> Self {
        let classes = if row_count >= 2 { vec![(0..row_count).collect()] } else { Vec::new() };
        Pli::from_classes(AttrSet::EMPTY, classes, row_count)
    }

    pub fn columns(&self) -> AttrSet {
        self.columns
    }

    pub fn equivalence_classes(&self) -> &[Vec<usize>] {
        &self.classes
    }

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    /// Sum of class sizes — the rows actually covered by a non-singleton class.
    pub fn covered_rows(&self) -> usize {
        self.classes.iter().map(|c| c.len()).sum()
    }

    /// `v[r]` = 1-based cluster id of row `r`'s class, or 0 if `r` is a singleton.
    pub fn attribute_vector(&self) -> Arc<Vec<u32>> {
        self.attribute_vector
            .get_or_init(|| {
                let mut v = vec![0u32; self.row_count];
                for (id, cls) in self.classes.iter().enumerate() {
                    for &row in cls {
                        v[row] = (id + 1) as u32;
                    }
                }
                Arc::new(v)
            })
            .clone()
    }

    /// `intersect(self, other)` is the PLI of `self.columns ∪ other.columns`.
    pub fn intersect(&self, other: &Pli) -> Pli {
        let (small, big) = if self.covered_rows() <= other.covered_rows() {
            (self, other)
        } else {
            (other, self)
        };
        let big_v = big.attribute_vector();
        let mut classes = Vec::new();
        for cls in &small.classes {
            let mut buckets: HashMap<u32, Vec<usize>> = HashMap::new();
            for &row in cls {
                let id = big_v[row];
                if id != 0 {
                    buckets.entry(id).or_default().push(row);
                }
            }
            for (_, bucket) in buckets {
                if bucket.len() >= 2 {
                    classes.push(bucket);
                }
            }
        }
        Pli::from_classes(self.columns.union(other.columns), classes, self.row_count)
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
    fn single_column_drops_singletons() {
        let t = table(vec![vec!["1"], vec!["1"], vec!["2"]]);
        let pli = Pli::from_column(&t, 0);
        assert_eq!(pli.equivalence_classes(), &[vec![0, 1]]);
        assert_eq!(pli.attribute_vector().as_slice(), &[1, 1, 0]);
    }

    #[test]
    fn intersection_of_disjoint_groupings_is_all_singletons() {
        // A on (1,1,2,2,3): classes {0,1},{2,3}
        // B on (x,y,x,y,x): classes {0,2,4},{1,3}
        let t = table(vec![
            vec!["1", "x"],
            vec!["1", "y"],
            vec!["2", "x"],
            vec!["2", "y"],
            vec!["3", "x"],
        ]);
        let a = Pli::from_column(&t, 0);
        let b = Pli::from_column(&t, 1);
        let ab = a.intersect(&b);
        assert!(ab.equivalence_classes().is_empty());
        assert_eq!(ab.columns(), AttrSet::single(0).union(AttrSet::single(1)));
    }

    #[test]
    fn root_pli_is_one_class_of_all_rows() {
        let root = Pli::root(4);
        assert_eq!(root.equivalence_classes(), &[vec![0, 1, 2, 3]]);
    }

    #[test]
    fn attribute_vector_agrees_with_classes() {
        let t = table(vec![vec!["a"], vec!["a"], vec!["b"], vec!["c"], vec!["c"]]);
        let pli = Pli::from_column(&t, 0);
        let v = pli.attribute_vector();
        for cls in pli.equivalence_classes() {
            let id = v[cls[0]];
            assert_ne!(id, 0);
            for &r in cls {
                assert_eq!(v[r], id);
            }
        }
        let covered: std::collections::HashSet<usize> =
            pli.equivalence_classes().iter().flatten().copied().collect();
        for r in 0..t.row_count() {
            if !covered.contains(&r) {
                assert_eq!(v[r], 0);
            }
        }
    }
}
