// GraphQL Helper Functions
//
// Utility functions for GraphQL operations

use async_graphql::{Error, Result as GqlResult};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::error::DbError;
use super::types::*;
use super::models::*;

/// Batch query executor for optimizing multiple queries
pub struct BatchExecutor {
    engine: Arc<GraphQLEngine>,
    max_batch_size: usize,
}

impl BatchExecutor {
    pub fn new(engine: Arc<GraphQLEngine>, max_batch_size: usize) -> Self {
        Self {
            engine,
            max_batch_size,
        }
    }

    /// Execute multiple queries in a batch
    pub async fn execute_batch(&self, queries: Vec<BuiltQuery>) -> GqlResult<Vec<QueryResult>> {
        if queries.len() > self.max_batch_size {
            return Err(Error::new(format!(
                "Batch size {} exceeds maximum {}",
                queries.len(),
                self.max_batch_size
            )));
        }

        let mut results = Vec::new();
        for query in queries {
            match self
                .engine
                .query_table(
                    &query.table,
                    query.where_clause,
                    query.order_by,
                    query.limit,
                    query.offset,
                )
                .await
            {
                Ok((rows, total_count, has_more)) => {
                    results.push(QueryResult::Success(QuerySuccess {
                        rows,
                        total_count: BigInt(total_count),
                        execution_time_ms: 0.0,
                        has_more,
                    }));
                }
                Err(e) => {
                    results.push(QueryResult::Error(QueryError {
                        message: e.to_string(),
                        code: "BATCH_ERROR".to_string(),
                        details: None,
                    }));
                }
            }
        }

        Ok(results)
    }
}

/// Query result formatter for different output formats
pub struct ResultFormatter;

impl ResultFormatter {
    /// Format results as JSON
    pub fn to_json(rows: &[RowType]) -> GqlResult<String> {
        // Convert to simple JSON representation
        let json_rows: Vec<serde_json::Value> = rows
            .iter()
            .map(|row| {
                let map: serde_json::Map<String, serde_json::Value> = row
                    .fields
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::json!(format!("{:?}", v.value))))
                    .collect();
                serde_json::Value::Object(map)
            })
            .collect();
        serde_json::to_string_pretty(&json_rows)
            .map_err(|e| Error::new(format!("JSON serialization error: {}", e)))
    }

    /// Format results as CSV
    pub fn to_csv(rows: &[RowType]) -> GqlResult<String> {
        if rows.is_empty() {
            return Ok(String::new());
        }

        let mut csv = String::new();

        // Header
        if let Some(first_row) = rows.first() {
            let headers: Vec<String> = first_row.fields.keys().cloned().collect();
            csv.push_str(&headers.join(","));
            csv.push('\n');

            // Rows
            for row in rows {
                let values: Vec<String> = headers
                    .iter()
                    .map(|h| {
                        row.fields
                            .get(h)
                            .map(|v| format!("{:?}", v.value))
                            .unwrap_or_default()
                    })
                    .collect();
                csv.push_str(&values.join(","));
                csv.push('\n');
            }
        }

        Ok(csv)
    }

    /// Format results as Markdown table
    pub fn to_markdown(rows: &[RowType]) -> GqlResult<String> {
        if rows.is_empty() {
            return Ok(String::new());
        }

        let mut md = String::new();

        if let Some(first_row) = rows.first() {
            let headers: Vec<String> = first_row.fields.keys().cloned().collect();

            // Header
            md.push_str("| ");
            md.push_str(&headers.join(" | "));
            md.push_str(" |\n");

            // Separator
            md.push_str("|");
            for _ in &headers {
                md.push_str(" --- |");
            }
            md.push('\n');

            // Rows
            for row in rows {
                md.push_str("| ");
                let values: Vec<String> = headers
                    .iter()
                    .map(|h| {
                        row.fields
                            .get(h)
                            .map(|v| format!("{:?}", v.value))
                            .unwrap_or_default()
                    })
                    .collect();
                md.push_str(&values.join(" | "));
                md.push_str(" |\n");
            }
        }

        Ok(md)
    }
}

/// Subscription filter evaluator
pub struct FilterEvaluator;

impl FilterEvaluator {
    /// Evaluate if a row matches a where clause
    pub fn matches(row: &RowType, where_clause: &WhereClause) -> bool {
        // Simplified evaluation - would need full implementation
        if let Some(condition) = &where_clause.condition {
            return Self::evaluate_condition(row, condition);
        }

        if let Some(and_clauses) = &where_clause.and {
            return and_clauses.iter().all(|c| Self::matches(row, c));
        }

        if let Some(or_clauses) = &where_clause.or {
            return or_clauses.iter().any(|c| Self::matches(row, c));
        }

        if let Some(not_clause) = &where_clause.not {
            return !Self::matches(row, not_clause);
        }

        true
    }

    fn evaluate_condition(row: &RowType, condition: &FilterCondition) -> bool {
        let field_value = row.fields.get(&condition.field);

        match condition.op {
            FilterOp::IsNull => field_value.is_none(),
            FilterOp::IsNotNull => field_value.is_some(),
            _ => true, // Simplified - would need full comparison logic
        }
    }
}

/// Metrics collector for GraphQL operations
pub struct MetricsCollector {
    query_count: Arc<RwLock<u64>>,
    mutation_count: Arc<RwLock<u64>>,
    subscription_count: Arc<RwLock<u64>>,
    error_count: Arc<RwLock<u64>>,
    total_execution_time: Arc<RwLock<Duration>>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            query_count: Arc::new(RwLock::new(0)),
            mutation_count: Arc::new(RwLock::new(0)),
            subscription_count: Arc::new(RwLock::new(0)),
            error_count: Arc::new(RwLock::new(0)),
            total_execution_time: Arc::new(RwLock::new(Duration::ZERO)),
        }
    }

    pub async fn record_query(&self, execution_time: Duration) {
        *self.query_count.write().await += 1;
        *self.total_execution_time.write().await += execution_time;
    }

    pub async fn record_mutation(&self, execution_time: Duration) {
        *self.mutation_count.write().await += 1;
        *self.total_execution_time.write().await += execution_time;
    }

    pub async fn record_subscription(&self) {
        *self.subscription_count.write().await += 1;
    }

    pub async fn record_error(&self) {
        *self.error_count.write().await += 1;
    }

    pub async fn get_metrics(&self) -> Metrics {
        Metrics {
            query_count: *self.query_count.read().await,
            mutation_count: *self.mutation_count.read().await,
            subscription_count: *self.subscription_count.read().await,
            error_count: *self.error_count.read().await,
            total_execution_time: *self.total_execution_time.read().await,
            avg_execution_time: if *self.query_count.read().await > 0 {
                *self.total_execution_time.read().await / (*self.query_count.read().await as u32)
            } else {
                Duration::ZERO
            },
        }
    }

    pub async fn reset(&self) {
        *self.query_count.write().await = 0;
        *self.mutation_count.write().await = 0;
        *self.subscription_count.write().await = 0;
        *self.error_count.write().await = 0;
        *self.total_execution_time.write().await = Duration::ZERO;
    }
}

/// Metrics snapshot
#[derive(Clone, Debug)]
pub struct Metrics {
    pub query_count: u64,
    pub mutation_count: u64,
    pub subscription_count: u64,
    pub error_count: u64,
    pub total_execution_time: Duration,
    pub avg_execution_time: Duration,
}

