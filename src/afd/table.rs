// # Table
//
// In-memory, column-major view over the rows a discovery run works on. CSV
// parsing, delimiter sniffing and quoting belong to an external loader; this
// type only holds already-split cell values.

use crate::error::{DiscoveryError, Result};

#[derive(Debug, Clone)]
pub struct Table {
    column_names: Vec<String>,
    columns: Vec<Vec<String>>,
    row_count: usize,
}

impl Table {
    /// Builds a table from column-major data. Every column must have the same
    /// length; that length becomes `row_count`.
    pub fn new(column_names: Vec<String>, columns: Vec<Vec<String>>) -> Result<Self> {
        if column_names.len() != columns.len() {
            return Err(DiscoveryError::InvalidInput(format!(
                "{} column names but {} columns",
                column_names.len(),
                columns.len()
            )));
        }
        let row_count = columns.first().map(|c| c.len()).unwrap_or(0);
        for (idx, col) in columns.iter().enumerate() {
            if col.len() != row_count {
                return Err(DiscoveryError::InvalidInput(format!(
                    "column {idx} has {} rows, expected {row_count}",
                    col.len()
                )));
            }
        }
        Ok(Table { column_names, columns, row_count })
    }

    /// Builds a table from row-major data (one `Vec<String>` per row).
    pub fn from_rows(column_names: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let col_count = column_names.len();
        let mut columns = vec![Vec::with_capacity(rows.len()); col_count];
        for (r, row) in rows.into_iter().enumerate() {
            if row.len() != col_count {
                return Err(DiscoveryError::InvalidInput(format!(
                    "row {r} has {} cells, expected {col_count}",
                    row.len()
                )));
            }
            for (c, cell) in row.into_iter().enumerate() {
                columns[c].push(cell);
            }
        }
        Table::new(column_names, columns)
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    #[inline]
    pub fn col_count(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> &str {
        &self.columns[col][row]
    }

    #[inline]
    pub fn column(&self, col: usize) -> &[String] {
        &self.columns[col]
    }

    pub fn column_name(&self, col: usize) -> &str {
        &self.column_names[col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_rows() {
        let t = Table::from_rows(
            vec!["A".into(), "B".into()],
            vec![vec!["1".into(), "x".into()], vec!["2".into(), "y".into()]],
        )
        .unwrap();
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.col_count(), 2);
        assert_eq!(t.get(0, 1), "x");
        assert_eq!(t.column_name(0), "A");
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = Table::from_rows(vec!["A".into(), "B".into()], vec![vec!["1".into()]]);
        assert!(err.is_err());
    }
}
