// Pool partitioning module
//
// This module provides connection pool partitioning functionality for:
// - User/application/service-based isolation
// - Resource limits per partition
// - Routing strategies
// - Load balancing

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

// Placeholder struct for PoolPartition
pub struct PoolPartition<C> {
    /// Partition name
    pub name: String,
    /// Partition type
    pub partition_type: PartitionType,
    /// Resource limits
    pub limits: RwLock<PartitionLimits>,
    /// Statistics
    pub statistics: PartitionStatistics,
    /// Phantom data for generic type
    _phantom: std::marker::PhantomData<C>,
}

impl<C> PoolPartition<C> {
    /// Create a new pool partition
    pub fn new(name: String, partition_type: PartitionType, limits: PartitionLimits) -> Self {
        Self {
            name,
            partition_type,
            limits: RwLock::new(limits),
            statistics: PartitionStatistics::default(),
            _phantom: std::marker::PhantomData,
        }
    }

    /// Get the partition name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the partition type
    pub fn partition_type(&self) -> &PartitionType {
        &self.partition_type
    }

    /// Get current limits
    pub fn limits(&self) -> PartitionLimits {
        self.limits.read().clone()
    }

    /// Record a connection acquisition
    pub fn record_acquisition(&self) {
        self.statistics
            .connections_acquired
            .fetch_add(1, Ordering::SeqCst);
    }

    /// Record a connection release
    pub fn record_release(&self) {
        self.statistics
            .connections_released
            .fetch_add(1, Ordering::SeqCst);
    }

    /// Record a wait timeout
    pub fn record_wait_timeout(&self) {
        self.statistics.wait_timeouts.fetch_add(1, Ordering::SeqCst);
    }

    /// Record a limit violation
    pub fn record_limit_violation(&self) {
        self.statistics
            .limit_violations
            .fetch_add(1, Ordering::SeqCst);
    }

    /// Get statistics snapshot
    pub fn stats(&self) -> PartitionStats {
        self.statistics.snapshot()
    }
}

// Partition type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartitionType {
    // User-based partitioning
    User(String),
    // Application-based partitioning
    Application(String),
    // Service-based partitioning
    Service(String),
    // Tenant-based partitioning (multi-tenant isolation)
    Tenant(String),
    // Resource group partitioning
    ResourceGroup(String),
    // Custom partitioning
    Custom(String),
}

// Resource limits for a partition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionLimits {
    pub max_connections: usize,
    pub min_connections: usize,
    pub max_wait_queue: usize,
    pub cpu_limit: Option<Duration>,
    pub memory_limit: Option<usize>,
    pub io_limit: Option<u64>,
}

impl Default for PartitionLimits {
    fn default() -> Self {
        Self {
            max_connections: 50,
            min_connections: 2,
            max_wait_queue: 500,
            cpu_limit: None,
            memory_limit: None,
            io_limit: None,
        }
    }
}

// Partition statistics
#[derive(Default)]
pub struct PartitionStatistics {
    connections_acquired: AtomicU64,
    connections_released: AtomicU64,
    wait_timeouts: AtomicU64,
    limit_violations: AtomicU64,
}

impl PartitionStatistics {
    pub fn snapshot(&self) -> PartitionStats {
        PartitionStats {
            connections_acquired: self.connections_acquired.load(Ordering::SeqCst),
            connections_released: self.connections_released.load(Ordering::SeqCst),
            wait_timeouts: self.wait_timeouts.load(Ordering::SeqCst),
            limit_violations: self.limit_violations.load(Ordering::SeqCst),
        }
    }
}

// Partition statistics snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionStats {
    pub connections_acquired: u64,
    pub connections_released: u64,
    pub wait_timeouts: u64,
    pub limit_violations: u64,
}

// Affinity rules for routing connections
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct AffinityRules {
    preferred_partitions: Vec<String>,
    fallback_partition: Option<String>,
    sticky_sessions: bool,
    session_map: Arc<RwLock<HashMap<String, String>>>,
}

impl Default for AffinityRules {
    fn default() -> Self {
        Self {
            preferred_partitions: Vec::new(),
            fallback_partition: None,
            sticky_sessions: false,
            session_map: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl AffinityRules {
    /// Create new affinity rules
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a preferred partition
    pub fn with_preferred_partition(mut self, partition: String) -> Self {
        self.preferred_partitions.push(partition);
        self
    }

    /// Set the fallback partition
    pub fn with_fallback(mut self, partition: String) -> Self {
        self.fallback_partition = Some(partition);
        self
    }

    /// Enable sticky sessions
    pub fn with_sticky_sessions(mut self) -> Self {
        self.sticky_sessions = true;
        self
    }

    /// Get partition for a session, using sticky sessions if enabled
    pub fn get_partition_for_session(&self, session_id: &str) -> Option<String> {
        if self.sticky_sessions {
            self.session_map.read().get(session_id).cloned()
        } else {
            None
        }
    }

    /// Set partition for a session (for sticky sessions)
    pub fn set_session_partition(&self, session_id: String, partition: String) {
        if self.sticky_sessions {
            self.session_map.write().insert(session_id, partition);
        }
    }

    /// Remove session mapping
    pub fn remove_session(&self, session_id: &str) {
        self.session_map.write().remove(session_id);
    }

    /// Get preferred partitions
    pub fn preferred_partitions(&self) -> &[String] {
        &self.preferred_partitions
    }

    /// Get fallback partition
    pub fn fallback_partition(&self) -> Option<&String> {
        self.fallback_partition.as_ref()
    }

    /// Select a partition based on affinity rules
    pub fn select_partition(
        &self,
        available: &[String],
        session_id: Option<&str>,
    ) -> Option<String> {
        // Check sticky session first
        if let Some(sid) = session_id {
            if let Some(partition) = self.get_partition_for_session(sid) {
                if available.contains(&partition) {
                    return Some(partition);
                }
            }
        }

        // Check preferred partitions
        for preferred in &self.preferred_partitions {
            if available.contains(preferred) {
                return Some(preferred.clone());
            }
        }

        // Use fallback
        if let Some(fallback) = &self.fallback_partition {
            if available.contains(fallback) {
                return Some(fallback.clone());
            }
        }

        // Return first available
        available.first().cloned()
    }
}

// Partition manager
#[allow(dead_code)]
pub struct PartitionManager<C> {
    partitions: Arc<RwLock<HashMap<String, Arc<PoolPartition<C>>>>>,
    default_partition: Arc<RwLock<Option<String>>>,
    routing_strategy: RoutingStrategy,
    load_balancer: LoadBalancer,
}

impl<C: Send + Sync + 'static> PartitionManager<C> {
    /// Create a new partition manager with the given routing strategy
    pub fn new(routing_strategy: RoutingStrategy) -> Self {
        Self {
            partitions: Arc::new(RwLock::new(HashMap::new())),
            default_partition: Arc::new(RwLock::new(None)),
            routing_strategy,
            load_balancer: LoadBalancer::new(),
        }
    }

    /// List all partition names
    pub fn list_partitions(&self) -> Vec<String> {
        self.partitions.read().keys().cloned().collect()
    }

    /// Create a new partition with the given name, type, and limits
    pub fn create_partition(
        &self,
        name: String,
        partition_type: PartitionType,
        limits: PartitionLimits,
    ) -> Result<(), PartitionError> {
        let mut partitions = self.partitions.write();
        if partitions.contains_key(&name) {
            return Err(PartitionError::AlreadyExists(name));
        }

        let partition = PoolPartition::new(name.clone(), partition_type, limits);
        partitions.insert(name, Arc::new(partition));
        Ok(())
    }

    /// Remove a partition by name
    pub fn remove_partition(&self, name: &str) -> Result<(), PartitionError> {
        let mut partitions = self.partitions.write();
        if partitions.remove(name).is_none() {
            return Err(PartitionError::NotFound(name.to_string()));
        }
        Ok(())
    }

    /// Get a partition by name
    pub fn get_partition(&self, name: &str) -> Option<Arc<PoolPartition<C>>> {
        self.partitions.read().get(name).cloned()
    }

    /// Route a request to a partition based on the routing strategy
    pub fn route_request(&self, request: &PartitionRequest) -> Option<String> {
        match &self.routing_strategy {
            RoutingStrategy::UserBased => request.user.clone(),
            RoutingStrategy::ApplicationBased => request.application.clone(),
            RoutingStrategy::ServiceBased => request.service.clone(),
            RoutingStrategy::TenantBased => request.tenant.clone(),
            RoutingStrategy::LoadBalanced => {
                let partitions = self.partitions.read();
                self.load_balancer.select_partition(&partitions)
            }
            RoutingStrategy::Custom(router) => router(request),
        }
        .or_else(|| self.default_partition.read().clone())
    }

    /// Set the default partition
    pub fn set_default_partition(&self, name: Option<String>) {
        *self.default_partition.write() = name;
    }

    /// Get the default partition name
    pub fn get_default_partition(&self) -> Option<String> {
        self.default_partition.read().clone()
    }

    /// Get partition statistics
    pub fn get_partition_stats(&self, name: &str) -> Option<PartitionStats> {
        self.partitions
            .read()
            .get(name)
            .map(|p| p.statistics.snapshot())
    }

    /// Get all partition statistics
    pub fn get_all_stats(&self) -> HashMap<String, PartitionStats> {
        self.partitions
            .read()
            .iter()
            .map(|(name, partition)| (name.clone(), partition.statistics.snapshot()))
            .collect()
    }

    /// Update limits for a partition
    pub fn update_limits(&self, name: &str, limits: PartitionLimits) -> Result<(), PartitionError> {
        let partitions = self.partitions.read();
        if let Some(partition) = partitions.get(name) {
            *partition.limits.write() = limits;
            Ok(())
        } else {
            Err(PartitionError::NotFound(name.to_string()))
        }
    }

    /// Get the number of partitions
    pub fn partition_count(&self) -> usize {
        self.partitions.read().len()
    }
}

/// Partition errors
#[derive(Debug, Clone)]
pub enum PartitionError {
    AlreadyExists(String),
    NotFound(String),
    LimitExceeded(String),
    InvalidConfiguration(String),
}

impl std::fmt::Display for PartitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartitionError::AlreadyExists(name) => write!(f, "Partition '{}' already exists", name),
            PartitionError::NotFound(name) => write!(f, "Partition '{}' not found", name),
            PartitionError::LimitExceeded(msg) => write!(f, "Partition limit exceeded: {}", msg),
            PartitionError::InvalidConfiguration(msg) => {
                write!(f, "Invalid partition configuration: {}", msg)
            }
        }
    }
}

impl std::error::Error for PartitionError {}

// Routing strategy for partitions
#[derive(Clone)]
pub enum RoutingStrategy {
    UserBased,
    ApplicationBased,
    ServiceBased,
    TenantBased,
    LoadBalanced,
    Custom(Arc<dyn Fn(&PartitionRequest) -> Option<String> + Send + Sync>),
}

// Partition request information
#[derive(Debug, Clone)]
pub struct PartitionRequest {
    pub user: Option<String>,
    pub application: Option<String>,
    pub service: Option<String>,
    pub tenant: Option<String>,
    pub session_id: Option<String>,
    pub metadata: HashMap<String, String>,
}

impl Default for PartitionRequest {
    fn default() -> Self {
        Self {
            user: None,
            application: None,
            service: None,
            tenant: None,
            session_id: None,
            metadata: HashMap::new(),
        }
    }
}

impl PartitionRequest {
    /// Create a new empty partition request
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the user for this request
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Set the application for this request
    pub fn with_application(mut self, application: impl Into<String>) -> Self {
        self.application = Some(application.into());
        self
    }

    /// Set the service for this request
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Set the tenant for this request
    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }

    /// Set the session ID for this request
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Add metadata to this request
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Get a metadata value
    pub fn get_metadata(&self, key: &str) -> Option<&String> {
        self.metadata.get(key)
    }
}

// Load balancer for partitions
pub struct LoadBalancer {
    algorithm: LoadBalancingAlgorithm,
    round_robin_counter: AtomicU64,
}

impl LoadBalancer {
    pub fn new() -> Self {
        Self {
            algorithm: LoadBalancingAlgorithm::RoundRobin,
            round_robin_counter: AtomicU64::new(0),
        }
    }

    /// Create a load balancer with a specific algorithm
    pub fn with_algorithm(algorithm: LoadBalancingAlgorithm) -> Self {
        Self {
            algorithm,
            round_robin_counter: AtomicU64::new(0),
        }
    }

    /// Get the current algorithm
    pub fn algorithm(&self) -> LoadBalancingAlgorithm {
        self.algorithm
    }

    /// Set the load balancing algorithm
    pub fn set_algorithm(&mut self, algorithm: LoadBalancingAlgorithm) {
        self.algorithm = algorithm;
    }

    pub fn select_partition<C>(
        &self,
        partitions: &HashMap<String, Arc<PoolPartition<C>>>,
    ) -> Option<String> {
        if partitions.is_empty() {
            return None;
        }

        match self.algorithm {
            LoadBalancingAlgorithm::RoundRobin => {
                let keys: Vec<_> = partitions.keys().collect();
                let index =
                    self.round_robin_counter.fetch_add(1, Ordering::SeqCst) as usize % keys.len();
                Some(keys[index].clone())
            }
            LoadBalancingAlgorithm::LeastConnections => {
                // Find partition with least active connections based on stats
                partitions
                    .iter()
                    .min_by_key(|(_, p)| {
                        let stats = p.statistics.snapshot();
                        stats
                            .connections_acquired
                            .saturating_sub(stats.connections_released)
                    })
                    .map(|(k, _)| k.clone())
            }
            LoadBalancingAlgorithm::Random => {
                let keys: Vec<_> = partitions.keys().collect();
                if keys.is_empty() {
                    None
                } else {
                    // Use round robin counter as a simple pseudo-random source
                    let index = (self.round_robin_counter.fetch_add(7, Ordering::SeqCst) as usize)
                        % keys.len();
                    Some(keys[index].clone())
                }
            }
        }
    }

    /// Reset the round robin counter
    pub fn reset(&self) {
        self.round_robin_counter.store(0, Ordering::SeqCst);
    }
}

impl Default for LoadBalancer {
    fn default() -> Self {
        Self::new()
    }
}

// Load balancing algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadBalancingAlgorithm {
    RoundRobin,
    LeastConnections,
    Random,
}

impl std::fmt::Display for LoadBalancingAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadBalancingAlgorithm::RoundRobin => write!(f, "RoundRobin"),
            LoadBalancingAlgorithm::LeastConnections => write!(f, "LeastConnections"),
            LoadBalancingAlgorithm::Random => write!(f, "Random"),
        }
    }
}

impl std::fmt::Display for PartitionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartitionType::User(u) => write!(f, "User({})", u),
            PartitionType::Application(a) => write!(f, "Application({})", a),
            PartitionType::Service(s) => write!(f, "Service({})", s),
            PartitionType::Tenant(t) => write!(f, "Tenant({})", t),
            PartitionType::ResourceGroup(r) => write!(f, "ResourceGroup({})", r),
            PartitionType::Custom(c) => write!(f, "Custom({})", c),
        }
    }
}

impl PartitionType {
    /// Get the identifier from the partition type
    pub fn identifier(&self) -> &str {
        match self {
            PartitionType::User(id) => id,
            PartitionType::Application(id) => id,
            PartitionType::Service(id) => id,
            PartitionType::Tenant(id) => id,
            PartitionType::ResourceGroup(id) => id,
            PartitionType::Custom(id) => id,
        }
    }

    /// Get the type name
    pub fn type_name(&self) -> &'static str {
        match self {
            PartitionType::User(_) => "User",
            PartitionType::Application(_) => "Application",
            PartitionType::Service(_) => "Service",
            PartitionType::Tenant(_) => "Tenant",
            PartitionType::ResourceGroup(_) => "ResourceGroup",
            PartitionType::Custom(_) => "Custom",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_limits_default() {
        let limits = PartitionLimits::default();
        assert_eq!(limits.max_connections, 50);
        assert_eq!(limits.min_connections, 2);
        assert_eq!(limits.max_wait_queue, 500);
    }

    #[test]
    fn test_partition_manager_create_partition() {
        let manager: PartitionManager<()> = PartitionManager::new(RoutingStrategy::UserBased);

        let result = manager.create_partition(
            "test".to_string(),
            PartitionType::User("user1".to_string()),
            PartitionLimits::default(),
        );
        assert!(result.is_ok());

        // Duplicate should fail
        let result = manager.create_partition(
            "test".to_string(),
            PartitionType::User("user1".to_string()),
            PartitionLimits::default(),
        );
        assert!(matches!(result, Err(PartitionError::AlreadyExists(_))));
    }

    #[test]
    fn test_partition_manager_list_partitions() {
        let manager: PartitionManager<()> = PartitionManager::new(RoutingStrategy::UserBased);

        manager
            .create_partition(
                "p1".to_string(),
                PartitionType::User("user1".to_string()),
                PartitionLimits::default(),
            )
            .unwrap();

        manager
            .create_partition(
                "p2".to_string(),
                PartitionType::User("user2".to_string()),
                PartitionLimits::default(),
            )
            .unwrap();

        let partitions = manager.list_partitions();
        assert_eq!(partitions.len(), 2);
        assert!(partitions.contains(&"p1".to_string()));
        assert!(partitions.contains(&"p2".to_string()));
    }

    #[test]
    fn test_partition_request_builder() {
        let request = PartitionRequest::new()
            .with_user("alice")
            .with_application("myapp")
            .with_tenant("tenant1")
            .with_metadata("key", "value");

        assert_eq!(request.user, Some("alice".to_string()));
        assert_eq!(request.application, Some("myapp".to_string()));
        assert_eq!(request.tenant, Some("tenant1".to_string()));
        assert_eq!(request.get_metadata("key"), Some(&"value".to_string()));
    }

    #[test]
    fn test_routing_strategy_user_based() {
        let manager: PartitionManager<()> = PartitionManager::new(RoutingStrategy::UserBased);
        manager.set_default_partition(Some("default".to_string()));

        let request = PartitionRequest::new().with_user("alice");
        let result = manager.route_request(&request);
        assert_eq!(result, Some("alice".to_string()));

        let request_no_user = PartitionRequest::new();
        let result = manager.route_request(&request_no_user);
        assert_eq!(result, Some("default".to_string()));
    }

    #[test]
    fn test_load_balancer_round_robin() {
        let lb = LoadBalancer::new();
        let mut partitions: HashMap<String, Arc<PoolPartition<()>>> = HashMap::new();

        partitions.insert(
            "p1".to_string(),
            Arc::new(PoolPartition::new(
                "p1".to_string(),
                PartitionType::User("u1".to_string()),
                PartitionLimits::default(),
            )),
        );
        partitions.insert(
            "p2".to_string(),
            Arc::new(PoolPartition::new(
                "p2".to_string(),
                PartitionType::User("u2".to_string()),
                PartitionLimits::default(),
            )),
        );

        // Should rotate through partitions
        let first = lb.select_partition(&partitions);
        let second = lb.select_partition(&partitions);

        assert!(first.is_some());
        assert!(second.is_some());
    }

    #[test]
    fn test_affinity_rules() {
        let rules = AffinityRules::new()
            .with_preferred_partition("primary".to_string())
            .with_fallback("fallback".to_string())
            .with_sticky_sessions();

        let available = vec![
            "primary".to_string(),
            "secondary".to_string(),
            "fallback".to_string(),
        ];
        let selected = rules.select_partition(&available, None);
        assert_eq!(selected, Some("primary".to_string()));

        // Without preferred
        let available_no_primary = vec!["secondary".to_string(), "fallback".to_string()];
        let selected = rules.select_partition(&available_no_primary, None);
        assert_eq!(selected, Some("fallback".to_string()));
    }

    #[test]
    fn test_partition_statistics() {
        let partition: PoolPartition<()> = PoolPartition::new(
            "test".to_string(),
            PartitionType::User("user1".to_string()),
            PartitionLimits::default(),
        );

        partition.record_acquisition();
        partition.record_acquisition();
        partition.record_release();
        partition.record_wait_timeout();

        let stats = partition.stats();
        assert_eq!(stats.connections_acquired, 2);
        assert_eq!(stats.connections_released, 1);
        assert_eq!(stats.wait_timeouts, 1);
    }
}
