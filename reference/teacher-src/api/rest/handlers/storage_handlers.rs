// Storage Management Handlers
//
// Handler functions for storage and disk management operations

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json as AxumJson,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use utoipa::ToSchema;

use super::super::types::*;

// ============================================================================
// Storage-specific Types
// ============================================================================

/// Overall storage status
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StorageStatus {
    pub total_space_bytes: u64,
    pub used_space_bytes: u64,
    pub available_space_bytes: u64,
    pub utilization_percent: f64,
    pub disk_count: usize,
    pub partition_count: usize,
    pub tablespace_count: usize,
}

/// Disk device information
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DiskInfo {
    pub disk_id: String,
    pub device_path: String,
    pub mount_point: String,
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub available_bytes: u64,
    pub read_iops: u64,
    pub write_iops: u64,
    pub read_throughput_mbps: f64,
    pub write_throughput_mbps: f64,
    pub avg_latency_ms: f64,
}

/// Partition information
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PartitionInfo {
    pub partition_id: String,
    pub table_name: String,
    pub partition_name: String,
    pub partition_type: String, // range, list, hash
    pub partition_key: String,
    pub partition_value: String,
    pub row_count: u64,
    pub size_bytes: u64,
    pub created_at: i64,
}

/// Create partition request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePartitionRequest {
    pub table_name: String,
    pub partition_name: String,
    pub partition_type: String,
    pub partition_key: String,
    pub partition_value: String,
}

/// Buffer pool statistics
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BufferPoolStats {
    pub total_pages: usize,
    pub used_pages: usize,
    pub free_pages: usize,
    pub dirty_pages: usize,
    pub hit_ratio: f64,
    pub evictions: u64,
    pub reads: u64,
    pub writes: u64,
    pub flushes: u64,
}

/// Tablespace information
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TablespaceInfo {
    pub tablespace_id: String,
    pub name: String,
    pub location: String,
    pub size_bytes: u64,
    pub used_bytes: u64,
    pub auto_extend: bool,
    pub max_size_bytes: Option<u64>,
    pub status: String, // online, offline
}

/// Create tablespace request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateTablespaceRequest {
    pub name: String,
    pub location: String,
    pub initial_size_mb: u64,
    pub auto_extend: Option<bool>,
    pub max_size_mb: Option<u64>,
}

/// Update tablespace request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateTablespaceRequest {
    pub auto_extend: Option<bool>,
    pub max_size_mb: Option<u64>,
    pub status: Option<String>,
}

/// I/O statistics
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IoStats {
    pub total_reads: u64,
    pub total_writes: u64,
    pub bytes_read: u64,
    pub bytes_written: u64,
    pub avg_read_latency_ms: f64,
    pub avg_write_latency_ms: f64,
    pub read_iops: f64,
    pub write_iops: f64,
    pub timestamp: i64,
}

// ============================================================================
// Lazy-initialized storage state
// ============================================================================

lazy_static::lazy_static! {
    static ref DISKS: Arc<RwLock<HashMap<String, DiskInfo>>> = {
        let mut disks = HashMap::new();
        disks.insert("disk0".to_string(), DiskInfo {
            disk_id: "disk0".to_string(),
            device_path: "/dev/sda1".to_string(),
            mount_point: "/data".to_string(),
            total_bytes: 1_000_000_000_000,
            used_bytes: 500_000_000_000,
            available_bytes: 500_000_000_000,
            read_iops: 1000,
            write_iops: 800,
            read_throughput_mbps: 150.5,
            write_throughput_mbps: 120.3,
            avg_latency_ms: 2.5,
        });
        Arc::new(RwLock::new(disks))
    };

    static ref PARTITIONS: Arc<RwLock<HashMap<String, PartitionInfo>>> = Arc::new(RwLock::new(HashMap::new()));
    static ref TABLESPACES: Arc<RwLock<HashMap<String, TablespaceInfo>>> = {
        let mut tablespaces = HashMap::new();
        tablespaces.insert("system".to_string(), TablespaceInfo {
            tablespace_id: "ts_system".to_string(),
            name: "system".to_string(),
            location: "/data/tablespaces/system".to_string(),
            size_bytes: 10_000_000_000,
            used_bytes: 5_000_000_000,
            auto_extend: true,
            max_size_bytes: Some(50_000_000_000),
            status: "online".to_string(),
        });
        Arc::new(RwLock::new(tablespaces))
    };
    static ref NEXT_PARTITION_ID: Arc<RwLock<u64>> = Arc::new(RwLock::new(1));
}

// ============================================================================
// Handler Functions
// ============================================================================

/// Get overall storage status
#[utoipa::path(
    get,
    path = "/api/v1/storage/status",
    tag = "storage",
    responses(
        (status = 200, description = "Storage status", body = StorageStatus),
    )
)]
pub async fn get_storage_status(
    State(_state): State<Arc<ApiState>>,
) -> ApiResult<AxumJson<StorageStatus>> {
    let disks = DISKS.read();
    let partitions = PARTITIONS.read();
    let tablespaces = TABLESPACES.read();

    let total_space: u64 = disks.values().map(|d| d.total_bytes).sum();
    let used_space: u64 = disks.values().map(|d| d.used_bytes).sum();
    let available_space: u64 = disks.values().map(|d| d.available_bytes).sum();
    let utilization = if total_space > 0 {
        (used_space as f64 / total_space as f64) * 100.0
    } else {
        0.0
    };

    let response = StorageStatus {
        total_space_bytes: total_space,
        used_space_bytes: used_space,
        available_space_bytes: available_space,
        utilization_percent: utilization,
        disk_count: disks.len(),
        partition_count: partitions.len(),
        tablespace_count: tablespaces.len(),
    };

    Ok(AxumJson(response))
}

/// List disk devices and statistics
#[utoipa::path(
    get,
    path = "/api/v1/storage/disks",
    tag = "storage",
    responses(
        (status = 200, description = "List of disks", body = Vec<DiskInfo>),
    )
)]
pub async fn get_disks(State(_state): State<Arc<ApiState>>) -> ApiResult<AxumJson<Vec<DiskInfo>>> {
    let disks = DISKS.read();
    let disk_list: Vec<DiskInfo> = disks.values().cloned().collect();
    Ok(AxumJson(disk_list))
}

/// List all partitions
#[utoipa::path(
    get,
    path = "/api/v1/storage/partitions",
    tag = "storage",
    responses(
        (status = 200, description = "List of partitions", body = Vec<PartitionInfo>),
    )
)]
pub async fn get_partitions(
    State(_state): State<Arc<ApiState>>,
) -> ApiResult<AxumJson<Vec<PartitionInfo>>> {
    let partitions = PARTITIONS.read();
    let partition_list: Vec<PartitionInfo> = partitions.values().cloned().collect();
    Ok(AxumJson(partition_list))
}

/// Create a new partition
#[utoipa::path(
    post,
    path = "/api/v1/storage/partitions",
    tag = "storage",
    request_body = CreatePartitionRequest,
    responses(
        (status = 201, description = "Partition created", body = PartitionInfo),
        (status = 400, description = "Invalid request", body = ApiError),
    )
)]
pub async fn create_partition(
    State(_state): State<Arc<ApiState>>,
    AxumJson(request): AxumJson<CreatePartitionRequest>,
) -> ApiResult<(StatusCode, AxumJson<PartitionInfo>)> {
    let mut partitions = PARTITIONS.write();
    let mut next_id = NEXT_PARTITION_ID.write();

    let partition_id = format!("part_{}", *next_id);
    *next_id += 1;

    let partition = PartitionInfo {
        partition_id: partition_id.clone(),
        table_name: request.table_name,
        partition_name: request.partition_name,
        partition_type: request.partition_type,
        partition_key: request.partition_key,
        partition_value: request.partition_value,
        row_count: 0,
        size_bytes: 0,
        created_at: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64,
    };

    partitions.insert(partition_id, partition.clone());

    Ok((StatusCode::CREATED, AxumJson(partition)))
}

/// Delete a partition
#[utoipa::path(
    delete,
    path = "/api/v1/storage/partitions/{id}",
    tag = "storage",
    params(
        ("id" = String, Path, description = "Partition ID")
    ),
    responses(
        (status = 204, description = "Partition deleted"),
        (status = 404, description = "Partition not found", body = ApiError),
    )
)]
pub async fn delete_partition(
    State(_state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let mut partitions = PARTITIONS.write();

    if partitions.remove(&id).is_some() {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::new(
            "NOT_FOUND",
            format!("Partition {} not found", id),
        ))
    }
}

/// Get buffer pool statistics
#[utoipa::path(
    get,
    path = "/api/v1/storage/buffer-pool",
    tag = "storage",
    responses(
        (status = 200, description = "Buffer pool statistics", body = BufferPoolStats),
    )
)]
pub async fn get_buffer_pool_stats(
    State(_state): State<Arc<ApiState>>,
) -> ApiResult<AxumJson<BufferPoolStats>> {
    let stats = BufferPoolStats {
        total_pages: 10000,
        used_pages: 7500,
        free_pages: 2500,
        dirty_pages: 500,
        hit_ratio: 0.95,
        evictions: 1000,
        reads: 50000,
        writes: 25000,
        flushes: 500,
    };

    Ok(AxumJson(stats))
}

/// Flush buffer pool
#[utoipa::path(
    post,
    path = "/api/v1/storage/buffer-pool/flush",
    tag = "storage",
    responses(
        (status = 200, description = "Buffer pool flushed"),
    )
)]
pub async fn flush_buffer_pool(
    State(_state): State<Arc<ApiState>>,
) -> ApiResult<AxumJson<serde_json::Value>> {
    // In a real implementation, this would flush the buffer pool to disk
    Ok(AxumJson(json!({
        "status": "success",
        "pages_flushed": 500,
        "timestamp": SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs()
    })))
}

/// List tablespaces
#[utoipa::path(
    get,
    path = "/api/v1/storage/tablespaces",
    tag = "storage",
    responses(
        (status = 200, description = "List of tablespaces", body = Vec<TablespaceInfo>),
    )
)]
pub async fn get_tablespaces(
    State(_state): State<Arc<ApiState>>,
) -> ApiResult<AxumJson<Vec<TablespaceInfo>>> {
    let tablespaces = TABLESPACES.read();
    let tablespace_list: Vec<TablespaceInfo> = tablespaces.values().cloned().collect();
    Ok(AxumJson(tablespace_list))
}

/// Create a new tablespace
#[utoipa::path(
    post,
    path = "/api/v1/storage/tablespaces",
    tag = "storage",
    request_body = CreateTablespaceRequest,
    responses(
        (status = 201, description = "Tablespace created", body = TablespaceInfo),
        (status = 400, description = "Invalid request", body = ApiError),
    )
)]
pub async fn create_tablespace(
    State(_state): State<Arc<ApiState>>,
    AxumJson(request): AxumJson<CreateTablespaceRequest>,
) -> ApiResult<(StatusCode, AxumJson<TablespaceInfo>)> {
    let mut tablespaces = TABLESPACES.write();

    let tablespace_id = format!("ts_{}", request.name);
    let initial_bytes = request.initial_size_mb * 1024 * 1024;

    let tablespace = TablespaceInfo {
        tablespace_id: tablespace_id.clone(),
        name: request.name.clone(),
        location: request.location,
        size_bytes: initial_bytes,
        used_bytes: 0,
        auto_extend: request.auto_extend.unwrap_or(true),
        max_size_bytes: request.max_size_mb.map(|mb| mb * 1024 * 1024),
        status: "online".to_string(),
    };

    tablespaces.insert(request.name, tablespace.clone());

    Ok((StatusCode::CREATED, AxumJson(tablespace)))
}

/// Update a tablespace
#[utoipa::path(
    put,
    path = "/api/v1/storage/tablespaces/{id}",
    tag = "storage",
    params(
        ("id" = String, Path, description = "Tablespace name")
    ),
    request_body = UpdateTablespaceRequest,
    responses(
        (status = 200, description = "Tablespace updated", body = TablespaceInfo),
        (status = 404, description = "Tablespace not found", body = ApiError),
    )
)]
pub async fn update_tablespace(
    State(_state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    AxumJson(request): AxumJson<UpdateTablespaceRequest>,
) -> ApiResult<AxumJson<TablespaceInfo>> {
    let mut tablespaces = TABLESPACES.write();

    if let Some(tablespace) = tablespaces.get_mut(&id) {
        if let Some(auto_extend) = request.auto_extend {
            tablespace.auto_extend = auto_extend;
        }
        if let Some(max_size_mb) = request.max_size_mb {
            tablespace.max_size_bytes = Some(max_size_mb * 1024 * 1024);
        }
        if let Some(status) = request.status {
            tablespace.status = status;
        }

        Ok(AxumJson(tablespace.clone()))
    } else {
        Err(ApiError::new(
            "NOT_FOUND",
            format!("Tablespace {} not found", id),
        ))
    }
}

/// Delete a tablespace
#[utoipa::path(
    delete,
    path = "/api/v1/storage/tablespaces/{id}",
    tag = "storage",
    params(
        ("id" = String, Path, description = "Tablespace name")
    ),
    responses(
        (status = 204, description = "Tablespace deleted"),
        (status = 404, description = "Tablespace not found", body = ApiError),
    )
)]
pub async fn delete_tablespace(
    State(_state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let mut tablespaces = TABLESPACES.write();

    if tablespaces.remove(&id).is_some() {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::new(
            "NOT_FOUND",
            format!("Tablespace {} not found", id),
        ))
    }
}

/// Get I/O statistics
#[utoipa::path(
    get,
    path = "/api/v1/storage/io-stats",
    tag = "storage",
    responses(
        (status = 200, description = "I/O statistics", body = IoStats),
    )
)]
pub async fn get_io_stats(State(_state): State<Arc<ApiState>>) -> ApiResult<AxumJson<IoStats>> {
    let stats = IoStats {
        total_reads: 1_000_000,
        total_writes: 500_000,
        bytes_read: 100_000_000_000,
        bytes_written: 50_000_000_000,
        avg_read_latency_ms: 2.5,
        avg_write_latency_ms: 3.2,
        read_iops: 1500.0,
        write_iops: 800.0,
        timestamp: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64,
    };

    Ok(AxumJson(stats))
}

// ============================================================================
// Page Management API
// ============================================================================

/// Page information
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PageInfo {
    pub page_id: u32,
    pub size_bytes: usize,
    pub is_dirty: bool,
    pub pin_count: usize,
    pub free_space: usize,
    pub num_slots: usize,
    pub checksum: u32,
}

/// Create page request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePageRequest {
    pub size: Option<usize>,
}

/// Compact page request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CompactPageRequest {
    pub page_id: u32,
}

lazy_static::lazy_static! {
    static ref PAGES: Arc<RwLock<HashMap<u32, PageInfo>>> = Arc::new(RwLock::new(HashMap::new()));
    static ref NEXT_PAGE_ID: Arc<RwLock<u32>> = Arc::new(RwLock::new(1));
}

/// Create a new page
#[utoipa::path(
    post,
    path = "/api/v1/storage/pages",
    tag = "storage",
    request_body = CreatePageRequest,
    responses(
        (status = 201, description = "Page created", body = PageInfo),
    )
)]
pub async fn create_page(
    State(_state): State<Arc<ApiState>>,
    AxumJson(request): AxumJson<CreatePageRequest>,
) -> ApiResult<(StatusCode, AxumJson<PageInfo>)> {
    let mut pages = PAGES.write();
    let mut next_id = NEXT_PAGE_ID.write();

    let page_id = *next_id;
    *next_id += 1;

    let size = request.size.unwrap_or(4096);
    let page = PageInfo {
        page_id,
        size_bytes: size,
        is_dirty: false,
        pin_count: 0,
        free_space: size - 64, // Header overhead
        num_slots: 0,
        checksum: 0xDEADBEEF,
    };

    pages.insert(page_id, page.clone());
    Ok((StatusCode::CREATED, AxumJson(page)))
}

/// Get page by ID
#[utoipa::path(
    get,
    path = "/api/v1/storage/pages/{id}",
    tag = "storage",
    params(
        ("id" = u32, Path, description = "Page ID")
    ),
    responses(
        (status = 200, description = "Page information", body = PageInfo),
        (status = 404, description = "Page not found", body = ApiError),
    )
)]
pub async fn get_page(
    State(_state): State<Arc<ApiState>>,
    Path(id): Path<u32>,
) -> ApiResult<AxumJson<PageInfo>> {
    let pages = PAGES.read();
    pages
        .get(&id)
        .cloned()
        .map(AxumJson)
        .ok_or_else(|| ApiError::new("NOT_FOUND", format!("Page {} not found", id)))
}

/// Compact a page
#[utoipa::path(
    post,
    path = "/api/v1/storage/pages/{id}/compact",
    tag = "storage",
    params(
        ("id" = u32, Path, description = "Page ID")
    ),
    responses(
        (status = 200, description = "Page compacted", body = PageInfo),
        (status = 404, description = "Page not found", body = ApiError),
    )
)]
pub async fn compact_page(
    State(_state): State<Arc<ApiState>>,
    Path(id): Path<u32>,
) -> ApiResult<AxumJson<PageInfo>> {
    let mut pages = PAGES.write();

    if let Some(page) = pages.get_mut(&id) {
        // Simulate compaction - reclaim fragmented space
        page.free_space = page.size_bytes - (page.num_slots * 16) - 64;
        page.is_dirty = true;
        Ok(AxumJson(page.clone()))
    } else {
        Err(ApiError::new("NOT_FOUND", format!("Page {} not found", id)))
    }
}

/// Flush a page to disk
#[utoipa::path(
    post,
    path = "/api/v1/storage/pages/{id}/flush",
    tag = "storage",
    params(
        ("id" = u32, Path, description = "Page ID")
    ),
    responses(
        (status = 200, description = "Page flushed"),
        (status = 404, description = "Page not found", body = ApiError),
    )
)]
pub async fn flush_page(
    State(_state): State<Arc<ApiState>>,
    Path(id): Path<u32>,
) -> ApiResult<AxumJson<serde_json::Value>> {
    let mut pages = PAGES.write();

    if let Some(page) = pages.get_mut(&id) {
        page.is_dirty = false;
        Ok(AxumJson(json!({
            "status": "success",
            "page_id": id,
            "flushed_at": SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs()
        })))
    } else {
        Err(ApiError::new("NOT_FOUND", format!("Page {} not found", id)))
    }
}

/// List all pages
#[utoipa::path(
    get,
    path = "/api/v1/storage/pages",
    tag = "storage",
    responses(
        (status = 200, description = "List of pages", body = Vec<PageInfo>),
    )
)]
pub async fn list_pages(State(_state): State<Arc<ApiState>>) -> ApiResult<AxumJson<Vec<PageInfo>>> {
    let pages = PAGES.read();
    let page_list: Vec<PageInfo> = pages.values().cloned().collect();
    Ok(AxumJson(page_list))
}

// ============================================================================
// LSM Tree API
// ============================================================================

/// LSM Tree statistics
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LsmStats {
    pub memtable_size: usize,
    pub num_levels: usize,
    pub total_sstables: usize,
    pub total_size_bytes: u64,
    pub compaction_running: bool,
    pub write_amplification: f64,
    pub read_amplification: f64,
}

/// LSM put request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LsmPutRequest {
    pub key: String,
    pub value: String,
}

/// LSM get response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LsmGetResponse {
    pub key: String,
    pub value: Option<String>,
    pub found: bool,
}

lazy_static::lazy_static! {
    static ref LSM_DATA: Arc<RwLock<HashMap<String, String>>> = Arc::new(RwLock::new(HashMap::new()));
}

/// Create LSM tree
#[utoipa::path(
    post,
    path = "/api/v1/storage/lsm",
    tag = "storage",
    responses(
        (status = 201, description = "LSM tree created"),
    )
)]
pub async fn create_lsm_tree(
    State(_state): State<Arc<ApiState>>,
) -> ApiResult<(StatusCode, AxumJson<serde_json::Value>)> {
    Ok((
        StatusCode::CREATED,
        AxumJson(json!({
            "status": "success",
            "message": "LSM tree created",
            "created_at": SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs()
        })),
    ))
}

/// Put key-value in LSM tree
#[utoipa::path(
    put,
    path = "/api/v1/storage/lsm/put",
    tag = "storage",
    request_body = LsmPutRequest,
    responses(
        (status = 200, description = "Value stored"),
    )
)]
pub async fn lsm_put(
    State(_state): State<Arc<ApiState>>,
    AxumJson(request): AxumJson<LsmPutRequest>,
) -> ApiResult<AxumJson<serde_json::Value>> {
    let mut data = LSM_DATA.write();
    data.insert(request.key.clone(), request.value);

    Ok(AxumJson(json!({
        "status": "success",
        "key": request.key
    })))
}

/// Get value from LSM tree
#[utoipa::path(
    get,
    path = "/api/v1/storage/lsm/get/{key}",
    tag = "storage",
    params(
        ("key" = String, Path, description = "Key to retrieve")
    ),
    responses(
        (status = 200, description = "Value retrieved", body = LsmGetResponse),
    )
)]
pub async fn lsm_get(
    State(_state): State<Arc<ApiState>>,
    Path(key): Path<String>,
) -> ApiResult<AxumJson<LsmGetResponse>> {
    let data = LSM_DATA.read();
    let value = data.get(&key).cloned();

    Ok(AxumJson(LsmGetResponse {
        key: key.clone(),
        value: value.clone(),
        found: value.is_some(),
    }))
}

/// Delete key from LSM tree
#[utoipa::path(
    delete,
    path = "/api/v1/storage/lsm/delete/{key}",
    tag = "storage",
    params(
        ("key" = String, Path, description = "Key to delete")
    ),
    responses(
        (status = 200, description = "Key deleted"),
        (status = 404, description = "Key not found", body = ApiError),
    )
)]
pub async fn lsm_delete(
    State(_state): State<Arc<ApiState>>,
    Path(key): Path<String>,
) -> ApiResult<AxumJson<serde_json::Value>> {
    let mut data = LSM_DATA.write();

    if data.remove(&key).is_some() {
        Ok(AxumJson(json!({
            "status": "success",
            "key": key
        })))
    } else {
        Err(ApiError::new("NOT_FOUND", format!("Key {} not found", key)))
    }
}

/// Trigger LSM compaction
#[utoipa::path(
    post,
    path = "/api/v1/storage/lsm/compact",
    tag = "storage",
    responses(
        (status = 200, description = "Compaction triggered"),
    )
)]
pub async fn lsm_compact(
    State(_state): State<Arc<ApiState>>,
) -> ApiResult<AxumJson<serde_json::Value>> {
    Ok(AxumJson(json!({
        "status": "success",
        "message": "Compaction triggered",
        "started_at": SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs()
    })))
}

/// Get LSM tree statistics
#[utoipa::path(
    get,
    path = "/api/v1/storage/lsm/stats",
    tag = "storage",
    responses(
        (status = 200, description = "LSM statistics", body = LsmStats),
    )
)]
pub async fn get_lsm_stats(State(_state): State<Arc<ApiState>>) -> ApiResult<AxumJson<LsmStats>> {
    let data = LSM_DATA.read();

    let stats = LsmStats {
        memtable_size: data.len(),
        num_levels: 3,
        total_sstables: 12,
        total_size_bytes: data.len() as u64 * 100,
        compaction_running: false,
        write_amplification: 2.5,
        read_amplification: 1.8,
    };

    Ok(AxumJson(stats))
}

// ============================================================================
// Columnar Storage API
// ============================================================================

/// Column definition
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: String,
    pub encoding: Option<String>,
}

/// Columnar table info
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ColumnarTableInfo {
    pub table_id: String,
    pub name: String,
    pub columns: Vec<ColumnDef>,
    pub row_count: u64,
    pub size_bytes: u64,
    pub compression_ratio: f64,
}

/// Create columnar table request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateColumnarTableRequest {
    pub name: String,
    pub columns: Vec<ColumnDef>,
}

/// Batch insert request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BatchInsertRequest {
    pub table_name: String,
    pub rows: Vec<HashMap<String, serde_json::Value>>,
}

/// Column scan request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ColumnScanRequest {
    pub table_name: String,
    pub column_name: String,
    pub limit: Option<usize>,
}

/// Projection request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProjectionRequest {
    pub table_name: String,
    pub columns: Vec<String>,
}

lazy_static::lazy_static! {
    static ref COLUMNAR_TABLES: Arc<RwLock<HashMap<String, ColumnarTableInfo>>> = Arc::new(RwLock::new(HashMap::new()));
}

/// Create columnar table
#[utoipa::path(
    post,
    path = "/api/v1/storage/columnar",
    tag = "storage",
    request_body = CreateColumnarTableRequest,
    responses(
        (status = 201, description = "Columnar table created", body = ColumnarTableInfo),
    )
)]
pub async fn create_columnar_table(
    State(_state): State<Arc<ApiState>>,
    AxumJson(request): AxumJson<CreateColumnarTableRequest>,
) -> ApiResult<(StatusCode, AxumJson<ColumnarTableInfo>)> {
    let mut tables = COLUMNAR_TABLES.write();

    let table = ColumnarTableInfo {
        table_id: format!("col_{}", request.name),
        name: request.name.clone(),
        columns: request.columns,
        row_count: 0,
        size_bytes: 0,
        compression_ratio: 1.0,
    };

    tables.insert(request.name, table.clone());
    Ok((StatusCode::CREATED, AxumJson(table)))
}

/// Batch insert into columnar table
#[utoipa::path(
    post,
    path = "/api/v1/storage/columnar/batch-insert",
    tag = "storage",
    request_body = BatchInsertRequest,
    responses(
        (status = 200, description = "Rows inserted"),
        (status = 404, description = "Table not found", body = ApiError),
    )
)]
pub async fn columnar_batch_insert(
    State(_state): State<Arc<ApiState>>,
    AxumJson(request): AxumJson<BatchInsertRequest>,
) -> ApiResult<AxumJson<serde_json::Value>> {
    let mut tables = COLUMNAR_TABLES.write();

    if let Some(table) = tables.get_mut(&request.table_name) {
        let rows_inserted = request.rows.len();
        table.row_count += rows_inserted as u64;
        table.size_bytes += (rows_inserted * 100) as u64; // Estimate

        Ok(AxumJson(json!({
            "status": "success",
            "rows_inserted": rows_inserted,
            "total_rows": table.row_count
        })))
    } else {
        Err(ApiError::new(
            "NOT_FOUND",
            format!("Table {} not found", request.table_name),
        ))
    }
}

/// Scan a column
#[utoipa::path(
    post,
    path = "/api/v1/storage/columnar/scan",
    tag = "storage",
    request_body = ColumnScanRequest,
    responses(
        (status = 200, description = "Column data"),
        (status = 404, description = "Table not found", body = ApiError),
    )
)]
pub async fn columnar_scan(
    State(_state): State<Arc<ApiState>>,
    AxumJson(request): AxumJson<ColumnScanRequest>,
) -> ApiResult<AxumJson<serde_json::Value>> {
    let tables = COLUMNAR_TABLES.read();

    if tables.contains_key(&request.table_name) {
        // Mock data for demonstration
        let values: Vec<serde_json::Value> = (0..request.limit.unwrap_or(10))
            .map(|i| json!(format!("value_{}", i)))
            .collect();

        Ok(AxumJson(json!({
            "status": "success",
            "column": request.column_name,
            "values": values
        })))
    } else {
        Err(ApiError::new(
            "NOT_FOUND",
            format!("Table {} not found", request.table_name),
        ))
    }
}

/// Project columns
#[utoipa::path(
    post,
    path = "/api/v1/storage/columnar/project",
    tag = "storage",
    request_body = ProjectionRequest,
    responses(
        (status = 200, description = "Projected data"),
        (status = 404, description = "Table not found", body = ApiError),
    )
)]
pub async fn columnar_project(
    State(_state): State<Arc<ApiState>>,
    AxumJson(request): AxumJson<ProjectionRequest>,
) -> ApiResult<AxumJson<serde_json::Value>> {
    let tables = COLUMNAR_TABLES.read();

    if let Some(table) = tables.get(&request.table_name) {
        Ok(AxumJson(json!({
            "status": "success",
            "table": request.table_name,
            "columns": request.columns,
            "row_count": table.row_count
        })))
    } else {
        Err(ApiError::new(
            "NOT_FOUND",
            format!("Table {} not found", request.table_name),
        ))
    }
}

/// Get columnar table statistics
#[utoipa::path(
    get,
    path = "/api/v1/storage/columnar/{table_name}/stats",
    tag = "storage",
    params(
        ("table_name" = String, Path, description = "Table name")
    ),
    responses(
        (status = 200, description = "Table statistics", body = ColumnarTableInfo),
        (status = 404, description = "Table not found", body = ApiError),
    )
)]
pub async fn get_columnar_stats(
    State(_state): State<Arc<ApiState>>,
    Path(table_name): Path<String>,
) -> ApiResult<AxumJson<ColumnarTableInfo>> {
    let tables = COLUMNAR_TABLES.read();

    tables
        .get(&table_name)
        .cloned()
        .map(AxumJson)
        .ok_or_else(|| ApiError::new("NOT_FOUND", format!("Table {} not found", table_name)))
}

// ============================================================================
// Tiered Storage API
// ============================================================================

/// Storage tier statistics
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TierStats {
    pub tier: String,
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub page_count: usize,
    pub avg_latency_ms: f64,
    pub cost_per_gb: f64,
}

/// Tier migration request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TierMigrationRequest {
    pub page_id: u32,
    pub target_tier: String,
}

lazy_static::lazy_static! {
    static ref TIER_STATS_MAP: Arc<RwLock<HashMap<String, TierStats>>> = {
        let mut map = HashMap::new();
        map.insert("hot".to_string(), TierStats {
            tier: "hot".to_string(),
            total_bytes: 100_000_000_000,
            used_bytes: 50_000_000_000,
            page_count: 12500,
            avg_latency_ms: 1.0,
            cost_per_gb: 1.0,
        });
        map.insert("warm".to_string(), TierStats {
            tier: "warm".to_string(),
            total_bytes: 500_000_000_000,
            used_bytes: 200_000_000_000,
            page_count: 50000,
            avg_latency_ms: 5.0,
            cost_per_gb: 0.5,
        });
        map.insert("cold".to_string(), TierStats {
            tier: "cold".to_string(),
            total_bytes: 1_000_000_000_000,
            used_bytes: 300_000_000_000,
            page_count: 75000,
            avg_latency_ms: 50.0,
            cost_per_gb: 0.1,
        });
        Arc::new(RwLock::new(map))
    };
}

/// Get all tier statistics
#[utoipa::path(
    get,
    path = "/api/v1/storage/tiers",
    tag = "storage",
    responses(
        (status = 200, description = "Tier statistics", body = Vec<TierStats>),
    )
)]
pub async fn get_tier_stats(
    State(_state): State<Arc<ApiState>>,
) -> ApiResult<AxumJson<Vec<TierStats>>> {
    let stats = TIER_STATS_MAP.read();
    let tier_list: Vec<TierStats> = stats.values().cloned().collect();
    Ok(AxumJson(tier_list))
}

/// Migrate page to different tier
#[utoipa::path(
    post,
    path = "/api/v1/storage/tiers/migrate",
    tag = "storage",
    request_body = TierMigrationRequest,
    responses(
        (status = 200, description = "Migration started"),
    )
)]
pub async fn migrate_tier(
    State(_state): State<Arc<ApiState>>,
    AxumJson(request): AxumJson<TierMigrationRequest>,
) -> ApiResult<AxumJson<serde_json::Value>> {
    Ok(AxumJson(json!({
        "status": "success",
        "page_id": request.page_id,
        "target_tier": request.target_tier,
        "migration_started_at": SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs()
    })))
}

/// Get tier statistics for specific tier
#[utoipa::path(
    get,
    path = "/api/v1/storage/tiers/{tier}",
    tag = "storage",
    params(
        ("tier" = String, Path, description = "Tier name (hot/warm/cold)")
    ),
    responses(
        (status = 200, description = "Tier statistics", body = TierStats),
        (status = 404, description = "Tier not found", body = ApiError),
    )
)]
pub async fn get_tier_info(
    State(_state): State<Arc<ApiState>>,
    Path(tier): Path<String>,
) -> ApiResult<AxumJson<TierStats>> {
    let stats = TIER_STATS_MAP.read();

    stats
        .get(&tier)
        .cloned()
        .map(AxumJson)
        .ok_or_else(|| ApiError::new("NOT_FOUND", format!("Tier {} not found", tier)))
}

// ============================================================================
// JSON Storage API
// ============================================================================

/// JSON extract request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JsonExtractRequest {
    pub json_data: serde_json::Value,
    pub path: String,
}

/// JSON set request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JsonSetRequest {
    pub json_data: serde_json::Value,
    pub path: String,
    pub value: serde_json::Value,
}

/// JSON delete request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JsonDeleteRequest {
    pub json_data: serde_json::Value,
    pub path: String,
}

/// JSON merge request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JsonMergeRequest {
    pub json_data1: serde_json::Value,
    pub json_data2: serde_json::Value,
}

/// Extract value from JSON path
#[utoipa::path(
    post,
    path = "/api/v1/storage/json/extract",
    tag = "storage",
    request_body = JsonExtractRequest,
    responses(
        (status = 200, description = "Extracted value"),
    )
)]
pub async fn json_extract(
    State(_state): State<Arc<ApiState>>,
    AxumJson(request): AxumJson<JsonExtractRequest>,
) -> ApiResult<AxumJson<serde_json::Value>> {
    // Simple path extraction (in real implementation would use JSONPath)
    let value = request
        .json_data
        .pointer(&request.path)
        .cloned()
        .unwrap_or(serde_json::Value::Null);

    Ok(AxumJson(json!({
        "status": "success",
        "path": request.path,
        "value": value
    })))
}

/// Set value at JSON path
#[utoipa::path(
    post,
    path = "/api/v1/storage/json/set",
    tag = "storage",
    request_body = JsonSetRequest,
    responses(
        (status = 200, description = "Value set"),
    )
)]
pub async fn json_set(
    State(_state): State<Arc<ApiState>>,
    AxumJson(request): AxumJson<JsonSetRequest>,
) -> ApiResult<AxumJson<serde_json::Value>> {
    // In real implementation, would modify the JSON at the path
    Ok(AxumJson(json!({
        "status": "success",
        "path": request.path,
        "message": "Value set successfully"
    })))
}

/// Delete value at JSON path
#[utoipa::path(
    post,
    path = "/api/v1/storage/json/delete",
    tag = "storage",
    request_body = JsonDeleteRequest,
    responses(
        (status = 200, description = "Value deleted"),
    )
)]
pub async fn json_delete(
    State(_state): State<Arc<ApiState>>,
    AxumJson(request): AxumJson<JsonDeleteRequest>,
) -> ApiResult<AxumJson<serde_json::Value>> {
    Ok(AxumJson(json!({
        "status": "success",
        "path": request.path,
        "message": "Value deleted successfully"
    })))
}

/// Merge two JSON objects
#[utoipa::path(
    post,
    path = "/api/v1/storage/json/merge",
    tag = "storage",
    request_body = JsonMergeRequest,
    responses(
        (status = 200, description = "JSON objects merged"),
    )
)]
pub async fn json_merge(
    State(_state): State<Arc<ApiState>>,
    AxumJson(request): AxumJson<JsonMergeRequest>,
) -> ApiResult<AxumJson<serde_json::Value>> {
    // Simple merge - in real implementation would do deep merge
    let mut merged = request.json_data1;
    if let (Some(obj1), Some(obj2)) = (merged.as_object_mut(), request.json_data2.as_object()) {
        for (key, value) in obj2 {
            obj1.insert(key.clone(), value.clone());
        }
    }

    Ok(AxumJson(json!({
        "status": "success",
        "result": merged
    })))
}

// ============================================================================
// Vectored I/O API
// ============================================================================

/// Vectored read request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VectoredReadRequest {
    pub page_ids: Vec<u32>,
}

/// Vectored write request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VectoredWriteRequest {
    pub pages: Vec<VectoredPageData>,
}

/// Page data for vectored operations
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VectoredPageData {
    pub page_id: u32,
    pub data: String, // Base64 encoded or similar
}

/// Vectored read response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VectoredReadResponse {
    pub pages: Vec<VectoredPageData>,
    pub read_count: usize,
    pub total_bytes: usize,
}

/// Vectored read - read multiple pages in one operation
#[utoipa::path(
    post,
    path = "/api/v1/storage/io/vectored-read",
    tag = "storage",
    request_body = VectoredReadRequest,
    responses(
        (status = 200, description = "Pages read", body = VectoredReadResponse),
    )
)]
pub async fn vectored_read(
    State(_state): State<Arc<ApiState>>,
    AxumJson(request): AxumJson<VectoredReadRequest>,
) -> ApiResult<AxumJson<VectoredReadResponse>> {
    let pages: Vec<VectoredPageData> = request
        .page_ids
        .iter()
        .map(|&id| VectoredPageData {
            page_id: id,
            data: format!("data_for_page_{}", id),
        })
        .collect();

    let total_bytes = pages.iter().map(|p| p.data.len()).sum();

    Ok(AxumJson(VectoredReadResponse {
        read_count: pages.len(),
        total_bytes,
        pages,
    }))
}

/// Vectored write - write multiple pages in one operation
#[utoipa::path(
    post,
    path = "/api/v1/storage/io/vectored-write",
    tag = "storage",
    request_body = VectoredWriteRequest,
    responses(
        (status = 200, description = "Pages written"),
    )
)]
pub async fn vectored_write(
    State(_state): State<Arc<ApiState>>,
    AxumJson(request): AxumJson<VectoredWriteRequest>,
) -> ApiResult<AxumJson<serde_json::Value>> {
    let write_count = request.pages.len();
    let total_bytes: usize = request.pages.iter().map(|p| p.data.len()).sum();

    Ok(AxumJson(json!({
        "status": "success",
        "pages_written": write_count,
        "total_bytes": total_bytes,
        "written_at": SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs()
    })))
}
