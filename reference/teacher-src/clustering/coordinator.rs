/// Distributed Query Coordinator
///
/// This module coordinates query execution across multiple nodes in the cluster.
/// Features include:
/// - Query routing to appropriate shards
/// - Scatter-gather execution for parallel processing
/// - Distributed join strategies (broadcast, shuffle, co-located)
/// - Two-phase query execution (map-reduce style)
/// - Query result merging and aggregation
/// - Cross-shard transaction coordination
///
/// Designed for:
/// - High-performance distributed queries
/// - Minimizing data movement
/// - Parallel execution optimization

use crate::error::DbError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap};
use std::sync::{Arc, RwLock};
use std::time::{Duration};
use tokio::sync::mpsc;

/// Query identifier
pub type QueryId = u64;

/// Shard/partition identifier
pub type ShardId = u64;

/// Node identifier
pub type NodeId = String;

/// Query execution strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStrategy {
    /// Send query to single shard (point query)
    SingleShard,
    /// Send query to specific shards
    MultiShard,
    /// Send query to all shards (full table scan)
    ScatterGather,
    /// Route based on partitioning key
    PartitionAware,
}

/// Join strategy for distributed joins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinStrategy {
    /// Broadcast smaller table to all nodes
    Broadcast,
    /// Shuffle both tables by join key
    Shuffle,
    /// Data is already co-located by join key
    CoLocated,
    /// Nested loop join (fallback)
    NestedLoop,
}

/// Aggregation operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregateOp {
    Count,
    Sum,
    Avg,
    Min,
    Max,
    GroupBy,
}

/// Query plan node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum QueryPlanNode {
    /// Scan operation
    Scan {
        table: String,
        shards: Vec<ShardId>,
        filter: Option<String>,
    },
    /// Join operation
    Join {
        strategy: JoinStrategy,
        left: Box<QueryPlanNode>,
        right: Box<QueryPlanNode>,
        join_key: String,
    },
    /// Aggregate operation
    Aggregate {
        operation: AggregateOp,
        input: Box<QueryPlanNode>,
        group_by: Option<Vec<String>>,
    },
    /// Sort operation
    Sort {
        input: Box<QueryPlanNode>,
        keys: Vec<String>,
        ascending: bool,
    },
    /// Limit operation
    Limit {
        input: Box<QueryPlanNode>,
        limit: usize,
        offset: usize,
    },
    /// Projection (select specific columns)
    Project {
        input: Box<QueryPlanNode>,
        columns: Vec<String>,
    },
}

/// Distributed query plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributedQueryPlan {
    /// Query ID
    pub query_id: QueryId,
    /// Execution strategy
    pub strategy: ExecutionStrategy,
    /// Root of the query plan tree
    pub root: QueryPlanNode,
    /// Shards involved in this query
    pub shards: Vec<ShardId>,
    /// Nodes to execute on
    pub nodes: Vec<NodeId>,
    /// Estimated cost
    pub estimated_cost: f64,
    /// Timeout for query execution
    pub timeout: Duration,
}

impl DistributedQueryPlan {
    pub fn new(query_id: QueryId, root: QueryPlanNode) -> Self {
        Self {
            query_id,
            strategy: ExecutionStrategy::ScatterGather,
            root,
            shards: Vec::new(),
            nodes: Vec::new(),
            estimated_cost: 0.0,
            timeout: Duration::from_secs(60),
        }
    }

    /// Extract shards from the query plan
    pub fn extract_shards(&mut self) {
        let mut shards = HashSet::new();
        self.collect_shards(&self.root.clone(), &mut shards);
        self.shards = shards.into_iter().collect();
    }

    fn collect_shards(&self, node: &QueryPlanNode, shards: &mut HashSet<ShardId>) {
        match node {
            QueryPlanNode::Scan { shards: s, .. } => {
                shards.extend(s);
            }
            QueryPlanNode::Join { left, right, .. } => {
                self.collect_shards(left, shards);
                self.collect_shards(right, shards);
            }
            QueryPlanNode::Aggregate { input, .. }
            | QueryPlanNode::Sort { input, .. }
            | QueryPlanNode::Limit { input, .. }
            | QueryPlanNode::Project { input, .. } => {
                self.collect_shards(input, shards);
            }
        }
    }
}

/// Query execution task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryTask {
    /// Task ID
    pub id: String,
    /// Query ID this belongs to
    pub query_id: QueryId,
    /// Shard to execute on
    pub shard_id: ShardId,
    /// Node to execute on
    pub node_id: NodeId,
    /// The query fragment to execute
    pub query_fragment: String,
    /// Parameters
    pub parameters: Vec<Vec<u8>>,
    /// Task dependencies (must complete before this)
    pub dependencies: Vec<String>,
}

/// Query result from a single shard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShardResult {
    /// Shard ID
    pub shard_id: ShardId,
    /// Node that executed
    pub node_id: NodeId,
    /// Result rows
    pub rows: Vec<Vec<u8>>,
    /// Execution time
    pub execution_time: Duration,
    /// Number of rows scanned
    pub rows_scanned: usize,
    /// Error if any
    pub error: Option<String>,
}

/// Complete query result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    /// Query ID
    pub query_id: QueryId,
    /// Merged result rows
    pub rows: Vec<Vec<u8>>,
    /// Total execution time
    pub total_time: Duration,
    /// Shard results
    pub shard_results: Vec<ShardResult>,
    /// Statistics
    pub stats: QueryStats,
}

/// Query execution statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryStats {
    /// Total rows returned
    pub rows_returned: usize,
    /// Total rows scanned across all shards
    pub rows_scanned: usize,
    /// Number of shards accessed
    pub shards_accessed: usize,
    /// Data transferred (bytes)
    pub bytes_transferred: usize,
    /// Network round trips
    pub network_trips: usize,
}

/// Shard mapping (key -> shard)
pub struct ShardMap {
    /// Partition key -> shard ID mapping
    partitions: Arc<RwLock<HashMap<Vec<u8>, ShardId>>>,
    /// Shard ID -> node ID mapping
    shard_to_node: Arc<RwLock<HashMap<ShardId, NodeId>>>,
}

impl ShardMap {
    pub fn new() -> Self {
        Self {
            partitions: Arc::new(RwLock::new(HashMap::new())),
            shard_to_node: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get shard for a partition key
    pub fn get_shard(&self, key: &[u8]) -> Option<ShardId> {
        self.partitions.read().unwrap().get(key).copied()
    }

    /// Get node for a shard
    pub fn get_node(&self, shard_id: ShardId) -> Option<NodeId> {
        self.shard_to_node.read().unwrap().get(&shard_id).cloned()
    }

    /// Add partition mapping
    pub fn add_partition(&self, key: Vec<u8>, shard_id: ShardId) {
        self.partitions.write().unwrap().insert(key, shard_id);
    }

    /// Add shard to node mapping
    pub fn add_shard_mapping(&self, shard_id: ShardId, node_id: NodeId) {
        self.shard_to_node.write().unwrap().insert(shard_id, node_id);
    }

    /// Get all shards for a node
    pub fn get_shards_for_node(&self, node_id: &str) -> Vec<ShardId> {
        self.shard_to_node
            .read()
            .unwrap()
            .iter()
            .filter(|(_, n)| n.as_str() == node_id)
            .map(|(s, _)| *s)
            .collect()
    }
}

impl Default for ShardMap {
    fn default() -> Self {
        Self::new()
    }
}

/// Query coordinator
pub struct QueryCoordinator {
    /// Shard mapping
    shard_map: ShardMap,
    /// Active queries
    active_queries: Arc<RwLock<HashMap<QueryId, DistributedQueryPlan>>>,
    /// Query results cache
    result_cache: Arc<RwLock<HashMap<QueryId, QueryResult>>>,
    /// Next query ID
    next_query_id: Arc<RwLock<QueryId>>,
}

impl QueryCoordinator {
    pub fn new() -> Self {
        Self {
            shard_map: ShardMap::new(),
            active_queries: Arc::new(RwLock::new(HashMap::new())),
            result_cache: Arc::new(RwLock::new(HashMap::new())),
            next_query_id: Arc::new(RwLock::new(0)),
        }
    }

    /// Generate next query ID
    fn next_query_id(&self) -> QueryId {
        let mut id = self.next_query_id.write().unwrap();
        *id += 1;
        *id
    }

    /// Create a distributed query plan
    pub fn plan_query(&self, root: QueryPlanNode) -> DistributedQueryPlan {
        let query_id = self.next_query_id();
        let mut plan = DistributedQueryPlan::new(query_id, root);

        // Extract shards from plan
        plan.extract_shards();

        // Determine execution strategy
        plan.strategy = match plan.shards.len() {
            0 => ExecutionStrategy::SingleShard,
            1 => ExecutionStrategy::SingleShard,
            2..=5 => ExecutionStrategy::MultiShard,
            _ => ExecutionStrategy::ScatterGather,
        };

        // Map shards to nodes
        for shard_id in &plan.shards {
            if let Some(node_id) = self.shard_map.get_node(*shard_id) {
                if !plan.nodes.contains(&node_id) {
                    plan.nodes.push(node_id);
                }
            }
        }

        // Estimate cost (simplified)
        plan.estimated_cost = (plan.shards.len() as f64) * 10.0;

        plan
    }

    /// Execute distributed query
    pub async fn execute_query(&self, plan: DistributedQueryPlan) -> std::result::Result<QueryResult, DbError> {
        let query_id = plan.query_id;

        // Register query
        self.active_queries.write().unwrap().insert(query_id, plan.clone());

        // Create tasks for each shard
        let tasks = self.create_query_tasks(&plan)?;

        // Execute tasks in parallel
        let shard_results = self.execute_tasks(tasks).await?;

        // Merge results
        let _result = self.merge_results(query_id, shard_results, plan.clone())?;

        // Cache result
        self.result_cache.write().unwrap().insert(query_id, result.clone());

        // Cleanup active query
        self.active_queries.write().unwrap().remove(&query_id);

        Ok(result)
    }

    /// Create query tasks from plan
    fn create_query_tasks(&self, plan: &DistributedQueryPlan) -> std::result::Result<Vec<QueryTask>, DbError> {
        let mut tasks = Vec::new();

        for (idx, &shard_id) in plan.shards.iter().enumerate() {
            let node_id = self.shard_map.get_node(shard_id).ok_or_else(|| {
                DbError::Internal(format!("No node found for shard {}", shard_id))
            })?;

            let task = QueryTask {
                id: format!("{}-{}", plan.query_id, idx),
                query_id: plan.query_id,
                shard_id,
                node_id,
                query_fragment: self.serialize_plan_node(&plan.root)?,
                parameters: Vec::new(),
                dependencies: Vec::new(),
            };

            tasks.push(task);
        }

        Ok(tasks)
    }

    /// Serialize plan node to query fragment
    fn serialize_plan_node(&self, node: &QueryPlanNode) -> std::result::Result<String, DbError> {
        serde_json::to_string(node)
            .map_err(|e| DbError::Internal(format!("Failed to serialize plan: {}", e)))
    }

    /// Execute tasks in parallel
    async fn execute_tasks(&self, tasks: Vec<QueryTask>) -> std::result::Result<Vec<ShardResult>, DbError> {
        let mut results = Vec::new();

        // In a real implementation, these would be executed in parallel
        // using async tasks and network communication
        for task in tasks {
            let _result = self.execute_single_task(task).await?;
            results.push(result);
        }

        Ok(results)
    }

    /// Execute a single task
    async fn execute_single_task(&self, task: QueryTask) -> std::result::Result<ShardResult, DbError> {
        let start = SystemTime::now();

        // Simulate query execution
        // In a real implementation, this would send the query to the appropriate node
        let rows = Vec::new();
        let rows_scanned = 0;

        let execution_time = start.elapsed().unwrap_or(Duration::ZERO);

        Ok(ShardResult {
            shard_id: task.shard_id,
            node_id: task.node_id,
            rows,
            execution_time,
            rows_scanned,
            error: None,
        })
    }

    /// Merge results from multiple shards
    fn merge_results(
        &self,
        query_id: QueryId,
        shard_results: Vec<ShardResult>,
        plan: DistributedQueryPlan,
    ) -> std::result::Result<QueryResult, DbError> {
        let start = SystemTime::now();

        // Merge based on query plan
        let rows = self.merge_rows(&plan.root, &shard_results)?;

        let total_time = start.elapsed().unwrap_or(Duration::ZERO);
        let rows_scanned: usize = shard_results.iter().map(|r| r.rows_scanned).sum();
        let bytes_transferred: usize = shard_results
            .iter()
            .flat_map(|r| &r.rows)
            .map(|row| row.len())
            .sum();

        let _stats = QueryStats {
            rows_returned: rows.len(),
            rows_scanned,
            shards_accessed: shard_results.len(),
            bytes_transferred,
            network_trips: shard_results.len(),
        };

        Ok(QueryResult {
            query_id,
            rows,
            total_time,
            shard_results,
            stats,
        })
    }

    /// Merge rows based on plan node type
    fn merge_rows(
        &self,
        node: &QueryPlanNode,
        shard_results: &[ShardResult],
    ) -> std::result::Result<Vec<Vec<u8>>, DbError> {
        let mut all_rows: Vec<Vec<u8>> = shard_results
            .iter()
            .flat_map(|r| r.rows.clone())
            .collect();

        match node {
            QueryPlanNode::Sort { ascending, .. } => {
                // Sort merged results
                if *ascending {
                    all_rows.sort();
                } else {
                    all_rows.sort_by(|a, b| b.cmp(a));
                }
            }
            QueryPlanNode::Limit { limit, offset, .. } => {
                // Apply limit and offset
                let start = *offset;
                let end = (start + limit).min(all_rows.len());
                all_rows = all_rows[start..end].to_vec();
            }
            QueryPlanNode::Aggregate { operation, .. } => {
                // Perform final aggregation
                match operation {
                    AggregateOp::Count => {
                        // Sum counts from all shards
                        let total: usize = all_rows.len();
                        all_rows = vec![total.to_string().into_bytes()];
                    }
                    AggregateOp::Sum => {
                        // Sum values from all shards
                        // Simplified - would need proper data type handling
                    }
                    _ => {}
                }
            }
            _ => {
                // No special merging needed
            }
        }

        Ok(all_rows)
    }

    /// Execute distributed join
    pub async fn execute_join(
        &self,
        left_table: String,
        right_table: String,
        join_key: String,
        strategy: JoinStrategy,
    ) -> std::result::Result<Vec<Vec<u8>>, DbError> {
        match strategy {
            JoinStrategy::Broadcast => {
                self.broadcast_join(left_table, right_table, join_key).await
            }
            JoinStrategy::Shuffle => {
                self.shuffle_join(left_table, right_table, join_key).await
            }
            JoinStrategy::CoLocated => {
                self.colocated_join(left_table, right_table, join_key).await
            }
            JoinStrategy::NestedLoop => {
                self.nested_loop_join(left_table, right_table, join_key).await
            }
        }
    }

    /// Broadcast join (send smaller table to all nodes)
    async fn broadcast_join(
        &self,
        _left_table: String,
        _right_table: String,
        _join_key: String,
    ) -> std::result::Result<Vec<Vec<u8>>, DbError> {
        // Implementation would:
        // 1. Identify smaller table
        // 2. Broadcast to all nodes with larger table
        // 3. Perform local joins
        // 4. Collect results
        Ok(Vec::new())
    }

    /// Shuffle join (repartition both tables by join key)
    async fn shuffle_join(
        &self,
        _left_table: String,
        _right_table: String,
        _join_key: String,
    ) -> std::result::Result<Vec<Vec<u8>>, DbError> {
        // Implementation would:
        // 1. Hash partition both tables by join key
        // 2. Send matching partitions to same nodes
        // 3. Perform local joins
        // 4. Collect results
        Ok(Vec::new())
    }

    /// Co-located join (tables already partitioned by join key)
    async fn colocated_join(
        &self,
        _left_table: String,
        _right_table: String,
        _join_key: String,
    ) -> std::result::Result<Vec<Vec<u8>>, DbError> {
        // Implementation would:
        // 1. Verify co-location
        // 2. Execute local joins on each node
        // 3. Collect results
        Ok(Vec::new())
    }

    /// Nested loop join (fallback)
    async fn nested_loop_join(
        &self,
        _left_table: String,
        _right_table: String,
        _join_key: String,
    ) -> std::result::Result<Vec<Vec<u8>>, DbError> {
        // Implementation would:
        // 1. Fetch all rows from both tables
        // 2. Perform nested loop join
        // 3. Return results
        Ok(Vec::new())
    }

    /// Execute two-phase aggregation (map-reduce style)
    pub async fn execute_two_phase_aggregate(
        &self,
        table: String,
        operation: AggregateOp,
        group_by: Option<Vec<String>>,
    ) -> std::result::Result<Vec<Vec<u8>>, DbError> {
        // Phase 1: Map - Local aggregation on each shard
        let local_results = self.local_aggregate(&table, operation, group_by.clone()).await?;

        // Phase 2: Reduce - Global aggregation
        let final_result = self.global_aggregate(local_results, operation, group_by).await?;

        Ok(final_result)
    }

    /// Local aggregation phase
    async fn local_aggregate(
        &self,
        _table: &str,
        _operation: AggregateOp,
        _group_by: Option<Vec<String>>,
    ) -> std::result::Result<Vec<Vec<u8>>, DbError> {
        // Implementation would execute aggregation on each shard
        Ok(Vec::new())
    }

    /// Global aggregation phase
    async fn global_aggregate(
        &self,
        _local_results: Vec<Vec<u8>>,
        _operation: AggregateOp,
        _group_by: Option<Vec<String>>,
    ) -> std::result::Result<Vec<Vec<u8>>, DbError> {
        // Implementation would merge local aggregation results
        Ok(Vec::new())
    }

    /// Get query status
    pub fn get_query_status(&self, query_id: QueryId) -> Option<String> {
        if self.active_queries.read().unwrap().contains_key(&query_id) {
            Some("running".to_string())
        } else if self.result_cache.read().unwrap().contains_key(&query_id) {
            Some("completed".to_string())
        } else {
            None
        }
    }

    /// Cancel a running query
    pub fn cancel_query(&self, query_id: QueryId) -> std::result::Result<(), DbError> {
        self.active_queries.write().unwrap().remove(&query_id);
        Ok(())
    }

    /// Get shard map reference
    pub fn shard_map(&self) -> &ShardMap {
        &self.shard_map
    }
}

impl Default for QueryCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_plan_creation() {
        let coordinator = QueryCoordinator::new();
        let scan = QueryPlanNode::Scan {
            table: "test".to_string(),
            shards: vec![1, 2, 3],
            filter: None,
        };

        let plan = coordinator.plan_query(scan);
        assert_eq!(plan.shards.len(), 3);
        assert_eq!(plan.strategy, ExecutionStrategy::MultiShard);
    }

    #[test]
    fn test_shard_map() {
        let shard_map = ShardMap::new();
        shard_map.add_partition(b"key1".to_vec(), 1);
        shard_map.add_shard_mapping(1, "node1".to_string());

        assert_eq!(shard_map.get_shard(b"key1"), Some(1));
        assert_eq!(shard_map.get_node(1), Some("node1".to_string()));
    }
}


