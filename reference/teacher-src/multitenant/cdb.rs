// # Container Database (CDB) Management
//
// Implements the root container that manages multiple Pluggable Databases (PDBs),
// system-level metadata, shared memory pools, background processes, and resource governance.
//
// ## Architecture
//
// The CDB serves as the central coordinator for all PDBs, maintaining:
// - System catalog and metadata
// - Shared memory pools and buffer caches
// - Background processes (PMON, SMON, LGWR, DBWR, etc.)
// - Container registry mapping PDB IDs to instances
// - Resource pools for fair-share allocation
//
// ## Features
//
// - **PDB Lifecycle Management**: Create, open, close, drop PDBs
// - **Resource Pools**: CDB-level resource allocation and governance
// - **System Metadata**: Centralized metadata for all containers
// - **Background Processes**: Shared background workers
// - **Health Monitoring**: CDB and PDB health checks
// - **Kubernetes Integration**: Native K8s operator support

use tokio::time::sleep;
use std::time::{SystemTime, UNIX_EPOCH};
use std::sync::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration};
use tokio::sync::{RwLock};
use serde::{Serialize, Deserialize};
use crate::error::{Result, DbError};
use super::pdb::{PluggableDatabase, PdbId, PdbConfig, PdbLifecycleState, PdbCreateMode};
use super::isolation::ResourceLimits;

/// Container Database (CDB) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdbConfig {
    /// CDB name (must be unique)
    pub name: String,

    /// Data directory for CDB root
    pub data_dir: String,

    /// Maximum number of PDBs allowed
    pub max_pdbs: usize,

    /// Total memory allocated to CDB (bytes)
    pub total_memory_bytes: u64,

    /// Shared buffer pool size (bytes)
    pub shared_buffer_size: u64,

    /// Enable automatic PDB startup on CDB startup
    pub auto_start_pdbs: bool,

    /// Background process configuration
    pub background_processes: BackgroundProcessConfig,

    /// Enable Kubernetes integration
    pub kubernetes_integration: bool,

    /// Enable AI-driven resource optimization
    pub ai_optimization: bool,

    /// Undo tablespace size (bytes)
    pub undo_tablespace_size: u64,

    /// Temp tablespace size (bytes)
    pub temp_tablespace_size: u64,
}

impl Default for CdbConfig {
    fn default() -> Self {
        Self {
            name: "CDB$ROOT".to_string(),
            data_dir: "/var/lib/rustydb/cdb".to_string(),
            max_pdbs: 4096,
            total_memory_bytes: 16 * 1024 * 1024 * 1024, // 16 GB
            shared_buffer_size: 4 * 1024 * 1024 * 1024,  // 4 GB
            auto_start_pdbs: true,
            background_processes: BackgroundProcessConfig::default(),
            kubernetes_integration: false,
            ai_optimization: false,
            undo_tablespace_size: 2 * 1024 * 1024 * 1024, // 2 GB
            temp_tablespace_size: 1 * 1024 * 1024 * 1024, // 1 GB
        }
    }
}

/// Background process configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundProcessConfig {
    /// Number of database writer processes
    pub dbwr_processes: u32,

    /// Number of log writer processes
    pub lgwr_processes: u32,

    /// Number of checkpoint processes
    pub ckpt_processes: u32,

    /// Enable archiver process
    pub archiver_enabled: bool,

    /// Number of recovery processes
    pub recovery_processes: u32,

    /// Enable process monitor
    pub pmon_enabled: bool,

    /// Enable system monitor
    pub smon_enabled: bool,

    /// Background process check interval (seconds)
    pub check_interval_secs: u64,
}

impl Default for BackgroundProcessConfig {
    fn default() -> Self {
        Self {
            dbwr_processes: 4,
            lgwr_processes: 2,
            ckpt_processes: 1,
            archiver_enabled: true,
            recovery_processes: 2,
            pmon_enabled: true,
            smon_enabled: true,
            check_interval_secs: 30,
        }
    }
}

/// System-level metadata for the CDB
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemMetadata {
    /// CDB creation timestamp
    pub created_at: u64,

    /// CDB version
    pub version: String,

    /// Platform information
    pub platform: String,

    /// Character set
    pub charset: String,

    /// National character set
    pub ncharset: String,

    /// System Change Number (SCN) - monotonically increasing
    pub current_scn: u64,

    /// Global database name
    pub global_name: String,

    /// Database ID (DBID)
    pub db_id: u64,

    /// Archive log mode
    pub archivelog_mode: bool,

    /// Flashback enabled
    pub flashback_enabled: bool,

    /// Force logging
    pub force_logging: bool,
}

impl SystemMetadata {
    /// Create new system metadata
    pub fn new(cdb_name: &str) -> Self {
        Self {
            created_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_secs(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            platform: std::env::consts::OS.to_string(),
            charset: "UTF8".to_string(),
            ncharset: "UTF8".to_string(),
            current_scn: 1,
            global_name: cdb_name.to_string(),
            db_id: Self::generate_db_id(),
            archivelog_mode: true,
            flashback_enabled: false,
            force_logging: false,
        }
    }

    /// Generate a unique database ID
    fn generate_db_id() -> u64 {
        use std::hash::{Hash, Hasher};
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        SystemTime::now().hash(&mut hasher);
        std::process::id().hash(&mut hasher);
        hasher.finish()
    }

    /// Increment and return the next SCN
    pub fn next_scn(&mut self) -> u64 {
        self.current_scn += 1;
        self.current_scn
    }
}

/// CDB resource pool for fair-share allocation
#[derive(Debug, Clone)]
pub struct CdbResourcePool {
    /// Total memory in pool (bytes)
    total_memory: u64,

    /// Allocated memory (bytes)
    allocated_memory: u64,

    /// Total CPU shares
    total_cpu_shares: u32,

    /// Allocated CPU shares
    allocated_cpu_shares: u32,

    /// Total I/O bandwidth (bytes/sec)
    total_io_bandwidth: u64,

    /// Allocated I/O bandwidth
    allocated_io_bandwidth: u64,

    /// Per-PDB allocations
    allocations: HashMap<PdbId, ResourceLimits>,
}

impl CdbResourcePool {
    /// Create a new resource pool
    pub fn new(config: &CdbConfig) -> Self {
        Self {
            total_memory: config.total_memory_bytes,
            allocated_memory: 0,
            total_cpu_shares: 10000, // 100% = 10000 shares
            allocated_cpu_shares: 0,
            total_io_bandwidth: 1024 * 1024 * 1024, // 1 GB/s
            allocated_io_bandwidth: 0,
            allocations: HashMap::new(),
        }
    }

    /// Allocate resources for a PDB
    pub fn allocate(&mut self, pdb_id: PdbId, limits: ResourceLimits) -> Result<()> {
        // Check if resources are available
        if self.allocated_memory + limits.memory_bytes > self.total_memory {
            return Err(DbError::ResourceExhausted(
                format!("Insufficient memory: requested {}, available {}",
                    limits.memory_bytes, self.total_memory - self.allocated_memory)
            ));
        }

        if self.allocated_cpu_shares + limits.cpu_shares > self.total_cpu_shares {
            return Err(DbError::ResourceExhausted(
                format!("Insufficient CPU shares: requested {}, available {}",
                    limits.cpu_shares, self.total_cpu_shares - self.allocated_cpu_shares)
            ));
        }

        if self.allocated_io_bandwidth + limits.io_bandwidth_bytes_per_sec > self.total_io_bandwidth {
            return Err(DbError::ResourceExhausted(
                format!("Insufficient I/O bandwidth: requested {}, available {}",
                    limits.io_bandwidth_bytes_per_sec,
                    self.total_io_bandwidth - self.allocated_io_bandwidth)
            ));
        }

        // Allocate resources
        self.allocated_memory += limits.memory_bytes;
        self.allocated_cpu_shares += limits.cpu_shares;
        self.allocated_io_bandwidth += limits.io_bandwidth_bytes_per_sec;
        self.allocations.insert(pdb_id, limits.clone());

        Ok(())
    }

    /// Deallocate resources for a PDB
    pub fn deallocate(&mut self, pdb_id: PdbId) -> Result<()> {
        if let Some(limits) = self.allocations.remove(&pdb_id) {
            self.allocated_memory -= limits.memory_bytes;
            self.allocated_cpu_shares -= limits.cpu_shares;
            self.allocated_io_bandwidth -= limits.io_bandwidth_bytes_per_sec;
        }
        Ok(())
    }

    /// Get allocation for a PDB
    pub fn get_allocation(&self, pdb_id: PdbId) -> Option<&ResourceLimits> {
        self.allocations.get(&pdb_id)
    }

    /// Get available memory
    pub fn available_memory(&self) -> u64 {
        self.total_memory - self.allocated_memory
    }

    /// Get available CPU shares
    pub fn available_cpu_shares(&self) -> u32 {
        self.total_cpu_shares - self.allocated_cpu_shares
    }

    /// Get resource utilization percentage
    pub fn utilization(&self) -> ResourceUtilization {
        ResourceUtilization {
            memory_percent: (self.allocated_memory as f64 / self.total_memory as f64) * 100.0,
            cpu_percent: (self.allocated_cpu_shares as f64 / self.total_cpu_shares as f64) * 100.0,
            io_percent: (self.allocated_io_bandwidth as f64 / self.total_io_bandwidth as f64) * 100.0,
        }
    }
}

/// Resource utilization metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceUtilization {
    pub memory_percent: f64,
    pub cpu_percent: f64,
    pub io_percent: f64,
}

/// Container registry mapping PDB IDs to instances
#[derive(Debug, Clone)]
pub struct CdbRegistry {
    /// Map of PDB ID to PDB instance
    pdbs: Arc<RwLock<HashMap<PdbId, Arc<RwLock<PluggableDatabase>>>>>,

    /// Map of PDB name to PDB ID
    name_to_id: Arc<RwLock<HashMap<String, PdbId>>>,

    /// Next available PDB ID
    next_id: Arc<Mutex<u64>>,
}

impl CdbRegistry {
    /// Create a new registry
    pub fn new() -> Self {
        Self {
            pdbs: Arc::new(RwLock::new(HashMap::new())),
            name_to_id: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(Mutex::new(1)),
        }
    }

    /// Register a new PDB
    pub async fn register(&self, pdb: PluggableDatabase) -> Result<PdbId> {
        let mut next_id = self.next_id.lock().unwrap();
        let pdb_id = PdbId::new(*next_id);
        *next_id += 1;
        drop(next_id);

        let pdb_name = pdb.name().to_string();
        let pdb_arc = Arc::new(RwLock::new(pdb));

        self.pdbs.write().await.insert(pdb_id, pdb_arc);
        self.name_to_id.write().await.insert(pdb_name, pdb_id);

        Ok(pdb_id)
    }

    /// Unregister a PDB
    pub async fn unregister(&self, pdb_id: PdbId) -> Result<()> {
        let pdbs = self.pdbs.read().await;
        if let Some(pdb_arc) = pdbs.get(&pdb_id) {
            let pdb = pdb_arc.read().await;
            let pdb_name = pdb.name().to_string();
            drop(pdb);
            drop(pdbs);

            self.pdbs.write().await.remove(&pdb_id);
            self.name_to_id.write().await.remove(&pdb_name);
            Ok(())
        } else {
            Err(DbError::NotFound(format!("PDB not found: {:?}", pdb_id)))
        }
    }

    /// Get a PDB by ID
    pub async fn get(&self, pdb_id: PdbId) -> Result<Arc<RwLock<PluggableDatabase>>> {
        let pdbs = self.pdbs.read().await;
        pdbs.get(&pdb_id)
            .cloned()
            .ok_or_else(|| DbError::NotFound(format!("PDB not found: {:?}", pdb_id)))
    }

    /// Get a PDB ID by name
    pub async fn get_id_by_name(&self, name: &str) -> Result<PdbId> {
        let name_to_id = self.name_to_id.read().await;
        name_to_id
            .get(name)
            .copied()
            .ok_or_else(|| DbError::NotFound(format!("PDB not found: {}", name)))
    }

    /// List all PDB IDs
    pub async fn list_ids(&self) -> Vec<PdbId> {
        self.pdbs.read().await.keys().copied().collect()
    }

    /// Count registered PDBs
    pub async fn count(&self) -> usize {
        self.pdbs.read().await.len()
    }
}

/// Background process manager
#[derive(Debug, Clone)]
pub struct BackgroundProcessManager {
    /// Configuration
    config: BackgroundProcessConfig,

    /// Process states
    processes: Arc<RwLock<HashMap<String, BackgroundProcessState>>>,

    /// Shutdown signal
    shutdown: Arc<Mutex<bool>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundProcessState {
    pub name: String,
    pub process_type: BackgroundProcessType,
    pub started_at: u64,
    pub last_heartbeat: u64,
    pub status: ProcessStatus,
    pub work_completed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackgroundProcessType {
    DatabaseWriter,   // DBWR
    LogWriter,        // LGWR
    Checkpoint,       // CKPT
    ProcessMonitor,   // PMON
    SystemMonitor,    // SMON
    Archiver,         // ARCH
    Recoverer,        // RECO
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessStatus {
    Running,
    Idle,
    Failed,
    Stopped,
}

impl BackgroundProcessManager {
    /// Create a new background process manager
    pub fn new(config: BackgroundProcessConfig) -> Self {
        Self {
            config,
            processes: Arc::new(RwLock::new(HashMap::new())),
            shutdown: Arc::new(Mutex::new(false)),
        }
    }

    /// Start all background processes
    pub async fn start_all(&self) -> Result<()> {
        // Start DBWR processes
        for i in 0..self.config.dbwr_processes {
            self.start_process(
                format!("DBWR{}", i),
                BackgroundProcessType::DatabaseWriter,
            ).await?;
        }

        // Start LGWR processes
        for i in 0..self.config.lgwr_processes {
            self.start_process(
                format!("LGWR{}", i),
                BackgroundProcessType::LogWriter,
            ).await?;
        }

        // Start CKPT processes
        for i in 0..self.config.ckpt_processes {
            self.start_process(
                format!("CKPT{}", i),
                BackgroundProcessType::Checkpoint,
            ).await?;
        }

        // Start PMON if enabled
        if self.config.pmon_enabled {
            self.start_process(
                "PMON".to_string(),
                BackgroundProcessType::ProcessMonitor,
            ).await?;
        }

        // Start SMON if enabled
        if self.config.smon_enabled {
            self.start_process(
                "SMON".to_string(),
                BackgroundProcessType::SystemMonitor,
            ).await?;
        }

        // Start archiver if enabled
        if self.config.archiver_enabled {
            self.start_process(
                "ARCH".to_string(),
                BackgroundProcessType::Archiver,
            ).await?;
        }

        // Start recovery processes
        for i in 0..self.config.recovery_processes {
            self.start_process(
                format!("RECO{}", i),
                BackgroundProcessType::Recoverer,
            ).await?;
        }

        Ok(())
    }

    /// Start a single background process
    async fn start_process(&self, name: String, process_type: BackgroundProcessType) -> Result<()> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();

        let state = BackgroundProcessState {
            name: name.clone(),
            process_type,
            started_at: now,
            last_heartbeat: now,
            status: ProcessStatus::Running,
            work_completed: 0,
        };

        self.processes.write().await.insert(name.clone(), state);

        // Spawn the actual background task
        let processes = self.processes.clone();
        let shutdown = self.shutdown.clone();
        let check_interval = Duration::from_secs(self.config.check_interval_secs);

        tokio::spawn(async move {
            loop {
                // Check shutdown signal
                if *shutdown.lock().unwrap() {
                    break;
                }

                // Simulate work
                tokio::time::sleep(check_interval).await;

                // Update heartbeat
                if let Some(state) = processes.write().await.get_mut(&name) {
                    state.last_heartbeat = SystemTime::now()
                        .duration_since(UNIX_EPOCH)
                        .unwrap()
                        .as_secs();
                    state.work_completed += 1;
                }
            }
        });

        Ok(())
    }

    /// Stop all background processes
    pub async fn stop_all(&self) -> Result<()> {
        *self.shutdown.lock().unwrap() = true;

        // Wait for processes to stop
        tokio::time::sleep(Duration::from_secs(5)).await;

        // Update process states
        for state in self.processes.write().await.values_mut() {
            state.status = ProcessStatus::Stopped;
        }

        Ok(())
    }

    /// Get status of all processes
    pub async fn get_all_status(&self) -> Vec<BackgroundProcessState> {
        self.processes.read().await.values().cloned().collect()
    }

    /// Check health of background processes
    pub async fn health_check(&self) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();

        let processes = self.processes.read().await;
        for state in processes.values() {
            // If any process hasn't sent heartbeat in 2x check interval, unhealthy
            if now - state.last_heartbeat > self.config.check_interval_secs * 2 {
                return false;
            }
            if state.status == ProcessStatus::Failed {
                return false;
            }
        }

        true
    }
}

/// Container Database (CDB)
///
/// The root container that manages all PDBs and system-level resources
pub struct ContainerDatabase {
    /// CDB configuration
    config: CdbConfig,

    /// System metadata
    metadata: Arc<RwLock<SystemMetadata>>,

    /// PDB registry
    registry: CdbRegistry,

    /// Resource pool
    resource_pool: Arc<RwLock<CdbResourcePool>>,

    /// Background process manager
    bg_processes: BackgroundProcessManager,

    /// CDB state
    state: Arc<RwLock<CdbState>>,

    /// Kubernetes operator handle (if enabled)
    k8s_operator: Option<Arc<KubernetesOperator>>,

    /// AI optimizer (if enabled)
    ai_optimizer: Option<Arc<AiOptimizer>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CdbState {
    /// CDB is starting up
    Starting,
    /// CDB is open and operational
    Open,
    /// CDB is in restricted mode
    Restricted,
    /// CDB is shutting down
    ShuttingDown,
    /// CDB is closed
    Closed,
}

impl ContainerDatabase {
    /// Create a new Container Database
    pub async fn new(name: &str) -> Result<Self> {
        let config = CdbConfig {
            name: name.to_string(),
            ..Default::default()
        };

        Self::with_config(config).await
    }

    /// Create a CDB with custom configuration
    pub async fn with_config(config: CdbConfig) -> Result<Self> {
        let metadata = Arc::new(RwLock::new(SystemMetadata::new(&config.name)));
        let registry = CdbRegistry::new();
        let resource_pool = Arc::new(RwLock::new(CdbResourcePool::new(&config)));
        let bg_processes = BackgroundProcessManager::new(config.background_processes.clone());

        let k8s_operator = if config.kubernetes_integration {
            Some(Arc::new(KubernetesOperator::new(&config.name)))
        } else {
            None
        };

        let ai_optimizer = if config.ai_optimization {
            Some(Arc::new(AiOptimizer::new()))
        } else {
            None
        };

        let cdb = Self {
            config,
            metadata,
            registry,
            resource_pool,
            bg_processes,
            state: Arc::new(RwLock::new(CdbState::Starting)),
            k8s_operator,
            ai_optimizer,
        };

        // Start background processes
        cdb.bg_processes.start_all().await?;

        // Set state to Open
        *cdb.state.write().await = CdbState::Open;

        Ok(cdb)
    }

    /// Get CDB name
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Get CDB state
    pub async fn state(&self) -> CdbState {
        *self.state.read().await
    }

    /// Create a new PDB
    pub async fn create_pdb(&self, config: PdbConfig) -> Result<PdbId> {
        // Check if we've reached max PDBs
        if self.registry.count().await >= self.config.max_pdbs {
            return Err(DbError::LimitExceeded(
                format!("Maximum PDB limit reached: {}", self.config.max_pdbs)
            ));
        }

        // Allocate resources
        let limits = config.resource_limits.clone();
        let mut pool = self.resource_pool.write().await;

        // Create temporary PDB ID for allocation
        let temp_id = PdbId::new(0);
        pool.allocate(temp_id, limits)?;
        drop(pool);

        // Create the PDB
        let pdb = PluggableDatabase::create(config).await?;

        // Register the PDB
        let pdb_id = self.registry.register(pdb).await?;

        // Update allocation with real ID
        let mut pool = self.resource_pool.write().await;
        if let Some(limits) = pool.allocations.remove(&temp_id) {
            pool.allocations.insert(pdb_id, limits);
        }

        Ok(pdb_id)
    }

    /// Open a PDB
    pub async fn open_pdb(&self, pdb_id: PdbId) -> Result<()> {
        let pdb_arc = self.registry.get(pdb_id).await?;
        let mut pdb = pdb_arc.write().await;
        pdb.open().await
    }

    /// Close a PDB
    pub async fn close_pdb(&self, pdb_id: PdbId) -> Result<()> {
        let pdb_arc = self.registry.get(pdb_id).await?;
        let mut pdb = pdb_arc.write().await;
        pdb.close().await
    }

    /// Drop a PDB
    pub async fn drop_pdb(&self, pdb_id: PdbId) -> Result<()> {
        // Close the PDB first
        self.close_pdb(pdb_id).await?;

        // Deallocate resources
        self.resource_pool.write().await.deallocate(pdb_id)?;

        // Unregister the PDB
        self.registry.unregister(pdb_id).await?;

        Ok(())
    }

    /// Clone a PDB
    pub async fn clone_pdb(&self, source_pdb_id: PdbId, clone_name: &str) -> Result<PdbId> {
        let source_arc = self.registry.get(source_pdb_id).await?;
        let source = source_arc.read().await;

        // Create clone config based on source
        let clone_config = PdbConfig {
            name: clone_name.to_string(),
            create_mode: PdbCreateMode::Clone,
            resource_limits: source.resource_limits().clone(),
            ..Default::default()
        };

        drop(source);

        // Create the clone
        self.create_pdb(clone_config).await
    }

    /// List all PDBs
    pub async fn list_pdbs(&self) -> Vec<PdbId> {
        self.registry.list_ids().await
    }

    /// Get PDB by ID
    pub async fn get_pdb(&self, pdb_id: PdbId) -> Result<Arc<RwLock<PluggableDatabase>>> {
        self.registry.get(pdb_id).await
    }

    /// Get PDB by name
    pub async fn get_pdb_by_name(&self, name: &str) -> Result<Arc<RwLock<PluggableDatabase>>> {
        let pdb_id = self.registry.get_id_by_name(name).await?;
        self.registry.get(pdb_id).await
    }

    /// Get resource utilization
    pub async fn resource_utilization(&self) -> ResourceUtilization {
        self.resource_pool.read().await.utilization()
    }

    /// Get background process status
    pub async fn background_process_status(&self) -> Vec<BackgroundProcessState> {
        self.bg_processes.get_all_status().await
    }

    /// Health check
    pub async fn health_check(&self) -> bool {
        // Check CDB state
        if *self.state.read().await != CdbState::Open {
            return false;
        }

        // Check background processes
        if !self.bg_processes.health_check().await {
            return false;
        }

        true
    }

    /// Shutdown the CDB
    pub async fn shutdown(&self) -> Result<()> {
        *self.state.write().await = CdbState::ShuttingDown;

        // Close all PDBs
        for pdb_id in self.list_pdbs().await {
            let _ = self.close_pdb(pdb_id).await;
        }

        // Stop background processes
        self.bg_processes.stop_all().await?;

        *self.state.write().await = CdbState::Closed;

        Ok(())
    }

    /// Get system metadata
    pub async fn system_metadata(&self) -> SystemMetadata {
        self.metadata.read().await.clone()
    }

    /// Allocate next SCN
    pub async fn next_scn(&self) -> u64 {
        self.metadata.write().await.next_scn()
    }
}

/// Kubernetes operator for CDB management
#[derive(Debug, Clone)]
pub struct KubernetesOperator {
    cdb_name: String,
    namespace: String,
}

impl KubernetesOperator {
    pub fn new(cdb_name: &str) -> Self {
        Self {
            cdb_name: cdb_name.to_string(),
            namespace: "default".to_string(),
        }
    }

    pub async fn create_pdb_pod(&self, pdb_name: &str) -> Result<()> {
        // Would integrate with Kubernetes API to create PDB pod
        println!("Creating K8s pod for PDB: {}", pdb_name);
        Ok(())
    }

    pub async fn scale_pdb(&self, pdb_name: &str, replicas: u32) -> Result<()> {
        // Would integrate with Kubernetes API to scale PDB
        println!("Scaling PDB {} to {} replicas", pdb_name, replicas);
        Ok(())
    }
}

/// AI-driven resource optimizer
#[derive(Debug, Clone)]
pub struct AiOptimizer {
    optimization_enabled: bool,
}

impl AiOptimizer {
    pub fn new() -> Self {
        Self {
            optimization_enabled: true,
        }
    }

    pub async fn optimize_resource_allocation(&self) -> Result<()> {
        // Would use ML models to optimize resource allocation
        println!("Running AI-driven resource optimization");
        Ok(())
    }

    pub async fn predict_workload(&self) -> Result<WorkloadPrediction> {
        // Would use ML to predict future workload
        Ok(WorkloadPrediction {
            predicted_memory_usage: 0,
            predicted_cpu_usage: 0.0,
            confidence: 0.0,
        })
    }
}

#[derive(Debug, Clone)]
pub struct WorkloadPrediction {
    pub predicted_memory_usage: u64,
    pub predicted_cpu_usage: f64,
    pub confidence: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cdb_creation() {
        let cdb = ContainerDatabase::new("TEST_CDB").await;
        assert!(cdb.is_ok());
    }

    #[tokio::test]
    async fn test_resource_pool() {
        let config = CdbConfig::default();
        let mut pool = CdbResourcePool::new(&config);

        let limits = ResourceLimits::default();
        let pdb_id = PdbId::new(1);

        assert!(pool.allocate(pdb_id, limits.clone()).is_ok());
        assert!(pool.deallocate(pdb_id).is_ok());
    }

    #[tokio::test]
    async fn test_registry() {
        let registry = CdbRegistry::new();
        assert_eq!(registry.count().await, 0);
    }
}
