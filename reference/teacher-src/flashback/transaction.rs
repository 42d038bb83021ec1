//! # FLASHBACK TRANSACTION Implementation
//!
//! Oracle-like FLASHBACK TRANSACTION QUERY for analyzing and reversing transactions.
//! Provides transaction-level flashback capabilities with dependency tracking.
//!
//! ## Features
//!
//! - FLASHBACK TRANSACTION QUERY
//! - Transaction analysis and history
//! - Automatic undo SQL generation
//! - Compensating transaction creation
//! - Transaction dependency tracking and analysis
//! - Selective transaction reversal
//! - Cascade undo of dependent transactions
//! - Transaction impact analysis
//!
//! ## Example
//!
//! ```sql
//! SELECT * FROM FLASHBACK_TRANSACTION_QUERY
//! WHERE xid = HEXTORAW('0500120000AB0001');
//!
//! FLASHBACK TRANSACTION 0500120000AB0001 CASCADE;
//! ```

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;
use serde::{Deserialize, Serialize};

use crate::common::{TransactionId, TableId, RowId, Value};
use crate::Result;
use crate::error::DbError;
use super::time_travel::{SCN, Timestamp, current_timestamp};
use super::versions::UndoRecord;

// ============================================================================
// Transaction Flashback Manager
// ============================================================================

/// Manages FLASHBACK TRANSACTION operations
pub struct TransactionFlashbackManager {
    /// Transaction log for history tracking
    transaction_log: Arc<RwLock<TransactionLog>>,

    /// Dependency tracker
    dependency_tracker: Arc<RwLock<DependencyTracker>>,

    /// Undo SQL generator
    undo_generator: Arc<RwLock<UndoSqlGenerator>>,

    /// Statistics
    stats: Arc<RwLock<TransactionFlashbackStats>>,
}

impl TransactionFlashbackManager {
    /// Create a new transaction flashback manager
    pub fn new() -> Self {
        Self {
            transaction_log: Arc::new(RwLock::new(TransactionLog::new())),
            dependency_tracker: Arc::new(RwLock::new(DependencyTracker::new())),
            undo_generator: Arc::new(RwLock::new(UndoSqlGenerator::new())),
            stats: Arc::new(RwLock::new(TransactionFlashbackStats::default())),
        }
    }

    /// Record a transaction operation
    #[inline]
    pub fn record_operation(
        &self,
        txn_id: TransactionId,
        operation: TransactionOperation,
    ) -> Result<()> {
        let mut log = self.transaction_log.write().unwrap();
        log.record(txn_id, operation)?;

        // Track dependencies
        let mut tracker = self.dependency_tracker.write().unwrap();
        tracker.analyze_dependencies(txn_id, &operation);

        Ok(())
    }

    /// Query transaction history
    pub fn query_transaction_history(
        &self,
        txn_id: TransactionId,
    ) -> Result<TransactionHistory> {
        let log = self.transaction_log.read().unwrap();
        log.get_transaction_history(txn_id)
    }

    /// Generate undo SQL for a transaction
    pub fn generate_undo_sql(&self, txn_id: TransactionId) -> Result<Vec<String>> {
        let log = self.transaction_log.read().unwrap();
        let history = log.get_transaction_history(txn_id)?;

        let generator = self.undo_generator.read().unwrap();
        generator.generate_undo_statements(&history)
    }

    /// Analyze transaction dependencies
    pub fn analyze_dependencies(&self, txn_id: TransactionId) -> Result<DependencyGraph> {
        let tracker = self.dependency_tracker.read().unwrap();
        tracker.get_dependency_graph(txn_id)
    }

    /// Flashback a single transaction (without cascade)
    pub fn flashback_transaction(&self, txn_id: TransactionId) -> Result<FlashbackTransactionResult> {
        let start_time = SystemTime::now();

        // 1. Check for dependencies
        let tracker = self.dependency_tracker.read().unwrap();
        let deps = tracker.get_dependencies(txn_id)?;

        if !deps.is_empty() {
            return Err(DbError::Validation(
                format!("Transaction has {} dependent transactions. Use CASCADE option.", deps.len())
            ));
        }

        // 2. Generate and execute undo
        let undo_sql = self.generate_undo_sql(txn_id)?;
        let rows_affected = self.execute_undo_statements(&undo_sql)?;

        // 3. Update statistics
        let mut stats = self.stats.write().unwrap();
        stats.transactions_reversed += 1;
        stats.total_rows_reversed += rows_affected;

        Ok(FlashbackTransactionResult {
            success: true,
            transaction_id: txn_id,
            rows_affected,
            dependent_transactions: 0,
            undo_statements_executed: undo_sql.len(),
            duration_ms: start_time.elapsed().unwrap_or_default().as_millis() as u64,
        })
    }

    /// Flashback transaction with cascade (undo dependent transactions)
    pub fn flashback_transaction_cascade(&self, txn_id: TransactionId) -> Result<FlashbackTransactionResult> {
        let start_time = SystemTime::now();

        // 1. Get dependency tree
        let tracker = self.dependency_tracker.read().unwrap();
        let dep_graph = tracker.get_dependency_graph(txn_id)?;
        let txn_order = dep_graph.get_reverse_topological_order();

        // 2. Flashback in reverse dependency order
        let mut total_rows = 0;
        let mut total_statements = 0;

        for dependent_txn in txn_order {
            let undo_sql = self.generate_undo_sql(dependent_txn)?;
            total_rows += self.execute_undo_statements(&undo_sql)?;
            total_statements += undo_sql.len();
        }

        // 3. Update statistics
        let mut stats = self.stats.write().unwrap();
        stats.transactions_reversed += dep_graph.transaction_count();
        stats.total_rows_reversed += total_rows;

        Ok(FlashbackTransactionResult {
            success: true,
            transaction_id: txn_id,
            rows_affected: total_rows,
            dependent_transactions: dep_graph.transaction_count() - 1,
            undo_statements_executed: total_statements,
            duration_ms: start_time.elapsed().unwrap_or_default().as_millis() as u64,
        })
    }

    /// Perform impact analysis for a transaction
    pub fn analyze_impact(&self, txn_id: TransactionId) -> Result<TransactionImpactAnalysis> {
        let log = self.transaction_log.read().unwrap();
        let history = log.get_transaction_history(txn_id)?;

        let tracker = self.dependency_tracker.read().unwrap();
        let dependencies = tracker.get_dependencies(txn_id)?;

        let mut tables_affected = HashSet::new();
        let mut total_rows = 0;

        for op in &history.operations {
            tables_affected.insert(op.table_id);
            total_rows += 1;
        }

        Ok(TransactionImpactAnalysis {
            transaction_id: txn_id,
            tables_affected: tables_affected.len(),
            rows_affected: total_rows,
            dependent_transactions: dependencies.len(),
            can_flashback_safely: dependencies.is_empty(),
        })
    }

    /// Execute undo statements (placeholder)
    fn execute_undo_statements(&self, statements: &[String]) -> Result<usize> {
        // In a real implementation, this would execute the undo SQL
        // through the query executor
        Ok(statements.len())
    }

    /// Get statistics
    pub fn get_stats(&self) -> TransactionFlashbackStats {
        self.stats.read().unwrap().clone()
    }
}

// ============================================================================
// Transaction Log
// ============================================================================

/// Maintains a log of all transaction operations
struct TransactionLog {
    /// Transaction ID -> Operations
    transactions: HashMap<TransactionId, Vec<TransactionOperation>>,

    /// Operation count
    total_operations: u64,
}

impl TransactionLog {
    fn new() -> Self {
        Self {
            transactions: HashMap::new(),
            total_operations: 0,
        }
    }

    fn record(&mut self, txn_id: TransactionId, operation: TransactionOperation) -> Result<()> {
        self.transactions
            .entry(txn_id)
            .or_insert_with(Vec::new)
            .push(operation);

        self.total_operations += 1;
        Ok(())
    }

    fn get_transaction_history(&self, txn_id: TransactionId) -> Result<TransactionHistory> {
        let operations = self.transactions
            .get(&txn_id)
            .ok_or_else(|| DbError::Validation(
                format!("Transaction {} not found in log", txn_id)
            ))?
            .clone();

        Ok(TransactionHistory {
            transaction_id: txn_id,
            operations,
        })
    }
}

// ============================================================================
// Transaction Operation
// ============================================================================

/// Represents a single operation within a transaction
#[repr(C)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionOperation {
    pub operation_type: OperationType,
    pub table_id: TableId,
    pub row_id: RowId,
    pub old_values: Option<Vec<Value>>,
    pub new_values: Option<Vec<Value>>,
    pub scn: SCN,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationType {
    Insert,
    Update,
    Delete,
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationType::Insert => write!(f, "INSERT"),
            OperationType::Update => write!(f, "UPDATE"),
            OperationType::Delete => write!(f, "DELETE"),
        }
    }
}

// ============================================================================
// Transaction History
// ============================================================================

/// Complete history of a transaction
#[derive(Debug, Clone)]
pub struct TransactionHistory {
    pub transaction_id: TransactionId,
    pub operations: Vec<TransactionOperation>,
}

// ============================================================================
// Dependency Tracker
// ============================================================================

/// Tracks dependencies between transactions
struct DependencyTracker {
    /// Transaction ID -> Dependent transaction IDs
    dependencies: HashMap<TransactionId, HashSet<TransactionId>>,

    /// Row-level dependency tracking
    row_dependencies: HashMap<(TableId, RowId), Vec<TransactionId>>,
}

impl DependencyTracker {
    fn new() -> Self {
        Self {
            dependencies: HashMap::new(),
            row_dependencies: HashMap::new(),
        }
    }

    fn analyze_dependencies(&mut self, txn_id: TransactionId, operation: &TransactionOperation) {
        let key = (operation.table_id, operation.row_id);

        // Check if this row was modified by another transaction
        if let Some(prior_txns) = self.row_dependencies.get(&key) {
            for &prior_txn in prior_txns {
                if prior_txn != txn_id {
                    self.dependencies
                        .entry(prior_txn)
                        .or_insert_with(HashSet::new)
                        .insert(txn_id);
                }
            }
        }

        // Record this transaction modified this row
        self.row_dependencies
            .entry(key)
            .or_insert_with(Vec::new)
            .push(txn_id);
    }

    fn get_dependencies(&self, txn_id: TransactionId) -> Result<Vec<TransactionId>> {
        Ok(self.dependencies
            .get(&txn_id)
            .map(|deps| deps.iter().copied().collect())
            .unwrap_or_default())
    }

    fn get_dependency_graph(&self, txn_id: TransactionId) -> Result<DependencyGraph> {
        let mut graph = DependencyGraph::new(txn_id);
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();

        queue.push_back(txn_id);

        while let Some(current_txn) = queue.pop_front() {
            if visited.contains(&current_txn) {
                continue;
            }
            visited.insert(current_txn);

            if let Some(deps) = self.dependencies.get(&current_txn) {
                for &dep in deps {
                    graph.add_dependency(current_txn, dep);
                    queue.push_back(dep);
                }
            }
        }

        Ok(graph)
    }
}

// ============================================================================
// Dependency Graph
// ============================================================================

/// Directed graph of transaction dependencies
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    root_transaction: TransactionId,
    edges: HashMap<TransactionId, Vec<TransactionId>>,
}

impl DependencyGraph {
    fn new(root: TransactionId) -> Self {
        Self {
            root_transaction: root,
            edges: HashMap::new(),
        }
    }

    fn add_dependency(&mut self, from: TransactionId, to: TransactionId) {
        self.edges
            .entry(from)
            .or_insert_with(Vec::new)
            .push(to);
    }

    fn transaction_count(&self) -> usize {
        let mut all_txns = HashSet::new();
        all_txns.insert(self.root_transaction);

        for deps in self.edges.values() {
            for &dep in deps {
                all_txns.insert(dep);
            }
        }

        all_txns.len()
    }

    /// Get transactions in reverse topological order (for undo)
    fn get_reverse_topological_order(&self) -> Vec<TransactionId> {
        let mut result = Vec::new();
        let mut visited = HashSet::new();

        self.dfs_post_order(self.root_transaction, &mut visited, &mut result);

        result.reverse();
        result
    }

    fn dfs_post_order(
        &self,
        txn: TransactionId,
        visited: &mut HashSet<TransactionId>,
        result: &mut Vec<TransactionId>,
    ) {
        if visited.contains(&txn) {
            return;
        }

        visited.insert(txn);

        if let Some(deps) = self.edges.get(&txn) {
            for &dep in deps {
                self.dfs_post_order(dep, visited, result);
            }
        }

        result.push(txn);
    }
}

// ============================================================================
// Undo SQL Generator
// ============================================================================

/// Generates compensating SQL statements for undo
struct UndoSqlGenerator;

impl UndoSqlGenerator {
    fn new() -> Self {
        Self
    }

    fn generate_undo_statements(&self, history: &TransactionHistory) -> Result<Vec<String>> {
        let mut statements = Vec::new();

        // Process operations in reverse order
        for operation in history.operations.iter().rev() {
            let sql = self.generate_undo_for_operation(operation)?;
            statements.push(sql);
        }

        Ok(statements)
    }

    fn generate_undo_for_operation(&self, operation: &TransactionOperation) -> Result<String> {
        match operation.operation_type {
            OperationType::Insert => {
                // Undo insert with delete
                Ok(format!(
                    "DELETE FROM table_{} WHERE rowid = {}",
                    operation.table_id, operation.row_id
                ))
            }
            OperationType::Update => {
                // Undo update with reverse update
                if let Some(ref old_values) = operation.old_values {
                    let values_str = old_values
                        .iter()
                        .enumerate()
                        .map(|(i, v)| format!("col_{} = {}", i, self.value_to_sql(v)))
                        .collect::<Vec<_>>()
                        .join(", ");

                    Ok(format!(
                        "UPDATE table_{} SET {} WHERE rowid = {}",
                        operation.table_id, values_str, operation.row_id
                    ))
                } else {
                    Err(DbError::Validation("No old values for UPDATE operation".to_string()))
                }
            }
            OperationType::Delete => {
                // Undo delete with insert
                if let Some(ref old_values) = operation.old_values {
                    let values_str = old_values
                        .iter()
                        .map(|v| self.value_to_sql(v))
                        .collect::<Vec<_>>()
                        .join(", ");

                    Ok(format!(
                        "INSERT INTO table_{} VALUES ({})",
                        operation.table_id, values_str
                    ))
                } else {
                    Err(DbError::Validation("No old values for DELETE operation".to_string()))
                }
            }
        }
    }

    fn value_to_sql(&self, value: &Value) -> String {
        match value {
            Value::Null => "NULL".to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::String(s) => format!("'{}'", s.replace('\'', "''")),
            Value::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            _ => "NULL".to_string(), // Simplified
        }
    }
}

// ============================================================================
// Results and Analysis
// ============================================================================

/// Result of FLASHBACK TRANSACTION operation
#[derive(Debug, Clone)]
pub struct FlashbackTransactionResult {
    pub success: bool,
    pub transaction_id: TransactionId,
    pub rows_affected: usize,
    pub dependent_transactions: usize,
    pub undo_statements_executed: usize,
    pub duration_ms: u64,
}

/// Impact analysis for a transaction
#[derive(Debug, Clone)]
pub struct TransactionImpactAnalysis {
    pub transaction_id: TransactionId,
    pub tables_affected: usize,
    pub rows_affected: usize,
    pub dependent_transactions: usize,
    pub can_flashback_safely: bool,
}

// ============================================================================
// Statistics
// ============================================================================

/// Statistics for transaction flashback operations
#[derive(Debug, Clone, Default)]
pub struct TransactionFlashbackStats {
    pub transactions_reversed: u64,
    pub total_rows_reversed: usize,
    pub dependency_violations: u64,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_log() {
        let mut log = TransactionLog::new();

        let operation = TransactionOperation {
            operation_type: OperationType::Insert,
            table_id: 1,
            row_id: 100,
            old_values: None,
            new_values: Some(vec![Value::Integer(42)]),
            scn: 1000,
            timestamp: current_timestamp(),
        };

        log.record(1, operation).unwrap();

        let history = log.get_transaction_history(1).unwrap();
        assert_eq!(history.operations.len(), 1);
        assert_eq!(history.operations[0].operation_type, OperationType::Insert);
    }

    #[test]
    fn test_dependency_tracker() {
        let mut tracker = DependencyTracker::new();

        let op1 = TransactionOperation {
            operation_type: OperationType::Insert,
            table_id: 1,
            row_id: 100,
            old_values: None,
            new_values: Some(vec![Value::Integer(10)]),
            scn: 1000,
            timestamp: current_timestamp(),
        };

        let op2 = TransactionOperation {
            operation_type: OperationType::Update,
            table_id: 1,
            row_id: 100,
            old_values: Some(vec![Value::Integer(10)]),
            new_values: Some(vec![Value::Integer(20)]),
            scn: 1100,
            timestamp: current_timestamp(),
        };

        tracker.analyze_dependencies(1, &op1);
        tracker.analyze_dependencies(2, &op2);

        let deps = tracker.get_dependencies(1).unwrap();
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0], 2);
    }

    #[test]
    fn test_undo_sql_generation() {
        let generator = UndoSqlGenerator::new();

        let insert_op = TransactionOperation {
            operation_type: OperationType::Insert,
            table_id: 1,
            row_id: 100,
            old_values: None,
            new_values: Some(vec![Value::Integer(42)]),
            scn: 1000,
            timestamp: current_timestamp(),
        };

        let sql = generator.generate_undo_for_operation(&insert_op).unwrap();
        assert!(sql.contains("DELETE FROM table_1"));
    }
}
