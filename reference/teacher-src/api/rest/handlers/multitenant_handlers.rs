// Multi-tenant Database API Handlers
//
// REST API endpoints for Oracle-like Pluggable Database (PDB) / Container Database (CDB)
// multi-tenant operations including:
// - Tenant provisioning and lifecycle
// - PDB operations (create, open, close, clone, relocate)
// - Resource isolation and governance
// - Metering and billing

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use utoipa::ToSchema;

use crate::api::rest::types::{ApiState, ApiError, ApiResult};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProvisionTenantRequest {
    pub tenant_name: String,
    pub admin_user: String,
    pub admin_password: String,
    pub service_tier: String, // bronze, silver, gold, platinum
    pub cpu_cores: Option<f64>,
    pub memory_mb: Option<u64>,
    pub storage_gb: Option<u64>,
    pub network_mbps: Option<u32>,
    pub max_connections: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProvisionTenantResponse {
    pub tenant_id: String,
    pub tenant_name: String,
    pub pdb_name: String,
    pub status: String,
    pub service_tier: String,
    pub created_at: i64,
    pub admin_user: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TenantDetails {
    pub tenant_id: String,
    pub tenant_name: String,
    pub pdb_name: String,
    pub state: String,
    pub service_tier: String,
    pub created_at: i64,
    pub last_accessed: Option<i64>,
    pub resource_quota: ResourceQuotaInfo,
    pub resource_usage: ResourceUsageInfo,
    pub sla_metrics: SlaMetricsInfo,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ResourceQuotaInfo {
    pub cpu_cores: f64,
    pub memory_mb: u64,
    pub storage_gb: u64,
    pub network_mbps: u32,
    pub max_connections: u32,
    pub iops_limit: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ResourceUsageInfo {
    pub cpu_usage_percent: f64,
    pub memory_used_mb: u64,
    pub storage_used_gb: u64,
    pub active_connections: u32,
    pub current_iops: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SlaMetricsInfo {
    pub availability_percent: f64,
    pub avg_response_time_ms: f64,
    pub p99_response_time_ms: f64,
    pub total_requests: u64,
    pub failed_requests: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePdbRequest {
    pub pdb_name: String,
    pub admin_user: String,
    pub admin_password: String,
    pub storage_quota_gb: Option<u64>,
    pub create_from_seed: Option<bool>,
    pub file_name_convert: Option<HashMap<String, String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PdbResponse {
    pub pdb_id: String,
    pub pdb_name: String,
    pub state: String,
    pub open_mode: String,
    pub created_at: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClonePdbRequest {
    pub source_pdb: String,
    pub target_pdb_name: String,
    pub clone_type: String, // full, thin, snapshot, refreshable
    pub storage_quota_gb: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClonePdbResponse {
    pub clone_id: String,
    pub source_pdb: String,
    pub target_pdb_name: String,
    pub clone_type: String,
    pub status: String,
    pub started_at: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RelocatePdbRequest {
    pub target_cdb: String,
    pub availability_mode: String, // max_availability, max_performance
    pub parallel_degree: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RelocatePdbResponse {
    pub relocation_id: String,
    pub pdb_name: String,
    pub source_cdb: String,
    pub target_cdb: String,
    pub status: String,
    pub started_at: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SystemStatsResponse {
    pub total_tenants: usize,
    pub active_tenants: usize,
    pub suspended_tenants: usize,
    pub total_pdbs: usize,
    pub total_cpu_cores: f64,
    pub cpu_utilization_percent: f64,
    pub total_memory_gb: f64,
    pub memory_utilization_percent: f64,
    pub total_storage_gb: f64,
    pub storage_utilization_percent: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeteringReportRequest {
    pub tenant_id: Option<String>,
    pub start_date: String, // ISO 8601
    pub end_date: String, // ISO 8601
    pub granularity: Option<String>, // hourly, daily, monthly
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeteringReportResponse {
    pub tenant_id: String,
    pub period_start: String,
    pub period_end: String,
    pub total_cpu_hours: f64,
    pub total_memory_gb_hours: f64,
    pub total_storage_gb_hours: f64,
    pub total_io_operations: u64,
    pub total_network_gb: f64,
    pub estimated_cost: f64,
    pub data_points: Vec<MeteringDataPoint>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeteringDataPoint {
    pub timestamp: String,
    pub cpu_usage: f64,
    pub memory_usage_gb: f64,
    pub storage_usage_gb: f64,
    pub io_operations: u64,
    pub network_gb: f64,
}

// ============================================================================
// Handler Functions
// ============================================================================

/// Provision a new tenant with PDB and resource isolation
#[utoipa::path(
    post,
    path = "/api/v1/multitenant/tenants",
    request_body = ProvisionTenantRequest,
    responses(
        (status = 201, description = "Tenant provisioned", body = ProvisionTenantResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 409, description = "Tenant already exists", body = ApiError),
    ),
    tag = "multitenant"
)]
pub async fn provision_tenant(
    State(_state): State<Arc<ApiState>>,
    Json(request): Json<ProvisionTenantRequest>,
) -> ApiResult<(StatusCode, Json<ProvisionTenantResponse>)> {
    let tenant_id = format!("tenant_{}", uuid::Uuid::new_v4());
    let pdb_name = format!("PDB_{}", request.tenant_name.to_uppercase());

    // In real implementation, would call MultiTenantDatabase::provision_tenant()
    // For now, returning mock response

    Ok((StatusCode::CREATED, Json(ProvisionTenantResponse {
        tenant_id,
        tenant_name: request.tenant_name,
        pdb_name,
        status: "active".to_string(),
        service_tier: request.service_tier,
        created_at: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64,
        admin_user: request.admin_user,
    })))
}

/// List all tenants
#[utoipa::path(
    get,
    path = "/api/v1/multitenant/tenants",
    responses(
        (status = 200, description = "Tenants listed", body = Vec<TenantDetails>),
    ),
    tag = "multitenant"
)]
pub async fn list_tenants(
    State(_state): State<Arc<ApiState>>,
) -> ApiResult<Json<Vec<TenantDetails>>> {
    // In real implementation, would query TenantManager
    Ok(Json(vec![]))
}

/// Get tenant details
#[utoipa::path(
    get,
    path = "/api/v1/multitenant/tenants/{tenant_id}",
    params(
        ("tenant_id" = String, Path, description = "Tenant ID")
    ),
    responses(
        (status = 200, description = "Tenant details", body = TenantDetails),
        (status = 404, description = "Tenant not found", body = ApiError),
    ),
    tag = "multitenant"
)]
pub async fn get_tenant(
    State(_state): State<Arc<ApiState>>,
    Path(tenant_id): Path<String>,
) -> ApiResult<Json<TenantDetails>> {
    // Mock response
    Ok(Json(TenantDetails {
        tenant_id: tenant_id.clone(),
        tenant_name: "example_tenant".to_string(),
        pdb_name: "PDB_EXAMPLE".to_string(),
        state: "active".to_string(),
        service_tier: "silver".to_string(),
        created_at: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64,
        last_accessed: Some(SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64),
        resource_quota: ResourceQuotaInfo {
            cpu_cores: 4.0,
            memory_mb: 8192,
            storage_gb: 100,
            network_mbps: 1000,
            max_connections: 100,
            iops_limit: 10000,
        },
        resource_usage: ResourceUsageInfo {
            cpu_usage_percent: 45.0,
            memory_used_mb: 4096,
            storage_used_gb: 45,
            active_connections: 23,
            current_iops: 3500,
        },
        sla_metrics: SlaMetricsInfo {
            availability_percent: 99.99,
            avg_response_time_ms: 5.2,
            p99_response_time_ms: 25.0,
            total_requests: 1_000_000,
            failed_requests: 10,
        },
    }))
}

/// Suspend a tenant
#[utoipa::path(
    post,
    path = "/api/v1/multitenant/tenants/{tenant_id}/suspend",
    params(
        ("tenant_id" = String, Path, description = "Tenant ID")
    ),
    responses(
        (status = 200, description = "Tenant suspended"),
        (status = 404, description = "Tenant not found", body = ApiError),
    ),
    tag = "multitenant"
)]
pub async fn suspend_tenant(
    State(_state): State<Arc<ApiState>>,
    Path(_tenant_id): Path<String>,
    Json(request): Json<serde_json::Value>,
) -> ApiResult<StatusCode> {
    let _reason = request.get("reason").and_then(|v| v.as_str()).unwrap_or("Manual suspension");

    // In real implementation, would call MultiTenantDatabase::suspend_tenant()
    Ok(StatusCode::OK)
}

/// Resume a suspended tenant
#[utoipa::path(
    post,
    path = "/api/v1/multitenant/tenants/{tenant_id}/resume",
    params(
        ("tenant_id" = String, Path, description = "Tenant ID")
    ),
    responses(
        (status = 200, description = "Tenant resumed"),
        (status = 404, description = "Tenant not found", body = ApiError),
    ),
    tag = "multitenant"
)]
pub async fn resume_tenant(
    State(_state): State<Arc<ApiState>>,
    Path(_tenant_id): Path<String>,
) -> ApiResult<StatusCode> {
    // In real implementation, would call MultiTenantDatabase::activate_tenant()
    Ok(StatusCode::OK)
}

/// Delete a tenant
#[utoipa::path(
    delete,
    path = "/api/v1/multitenant/tenants/{tenant_id}",
    params(
        ("tenant_id" = String, Path, description = "Tenant ID")
    ),
    responses(
        (status = 204, description = "Tenant deleted"),
        (status = 404, description = "Tenant not found", body = ApiError),
    ),
    tag = "multitenant"
)]
pub async fn delete_tenant(
    State(_state): State<Arc<ApiState>>,
    Path(_tenant_id): Path<String>,
) -> ApiResult<StatusCode> {
    // In real implementation, would deprovision tenant and PDB
    Ok(StatusCode::NO_CONTENT)
}

/// Create a new PDB
#[utoipa::path(
    post,
    path = "/api/v1/multitenant/pdbs",
    request_body = CreatePdbRequest,
    responses(
        (status = 201, description = "PDB created", body = PdbResponse),
        (status = 409, description = "PDB already exists", body = ApiError),
    ),
    tag = "multitenant"
)]
pub async fn create_pdb(
    State(_state): State<Arc<ApiState>>,
    Json(request): Json<CreatePdbRequest>,
) -> ApiResult<(StatusCode, Json<PdbResponse>)> {
    let pdb_id = format!("pdb_{}", uuid::Uuid::new_v4());

    Ok((StatusCode::CREATED, Json(PdbResponse {
        pdb_id,
        pdb_name: request.pdb_name,
        state: "new".to_string(),
        open_mode: "mounted".to_string(),
        created_at: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64,
    })))
}

/// Open a PDB
#[utoipa::path(
    post,
    path = "/api/v1/multitenant/pdbs/{pdb_name}/open",
    params(
        ("pdb_name" = String, Path, description = "PDB name")
    ),
    responses(
        (status = 200, description = "PDB opened"),
        (status = 404, description = "PDB not found", body = ApiError),
    ),
    tag = "multitenant"
)]
pub async fn open_pdb(
    State(_state): State<Arc<ApiState>>,
    Path(_pdb_name): Path<String>,
) -> ApiResult<StatusCode> {
    // In real implementation, would call ContainerDatabase::open_pdb()
    Ok(StatusCode::OK)
}

/// Close a PDB
#[utoipa::path(
    post,
    path = "/api/v1/multitenant/pdbs/{pdb_name}/close",
    params(
        ("pdb_name" = String, Path, description = "PDB name")
    ),
    responses(
        (status = 200, description = "PDB closed"),
        (status = 404, description = "PDB not found", body = ApiError),
    ),
    tag = "multitenant"
)]
pub async fn close_pdb(
    State(_state): State<Arc<ApiState>>,
    Path(_pdb_name): Path<String>,
) -> ApiResult<StatusCode> {
    // In real implementation, would call ContainerDatabase::close_pdb()
    Ok(StatusCode::OK)
}

/// Clone a PDB
#[utoipa::path(
    post,
    path = "/api/v1/multitenant/pdbs/{pdb_name}/clone",
    params(
        ("pdb_name" = String, Path, description = "Source PDB name")
    ),
    request_body = ClonePdbRequest,
    responses(
        (status = 202, description = "PDB clone started", body = ClonePdbResponse),
        (status = 404, description = "Source PDB not found", body = ApiError),
    ),
    tag = "multitenant"
)]
pub async fn clone_pdb(
    State(_state): State<Arc<ApiState>>,
    Path(pdb_name): Path<String>,
    Json(request): Json<ClonePdbRequest>,
) -> ApiResult<(StatusCode, Json<ClonePdbResponse>)> {
    let clone_id = format!("clone_{}", uuid::Uuid::new_v4());

    Ok((StatusCode::ACCEPTED, Json(ClonePdbResponse {
        clone_id,
        source_pdb: pdb_name,
        target_pdb_name: request.target_pdb_name,
        clone_type: request.clone_type,
        status: "in_progress".to_string(),
        started_at: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64,
    })))
}

/// Relocate a PDB to another CDB
#[utoipa::path(
    post,
    path = "/api/v1/multitenant/pdbs/{pdb_name}/relocate",
    params(
        ("pdb_name" = String, Path, description = "PDB name")
    ),
    request_body = RelocatePdbRequest,
    responses(
        (status = 202, description = "PDB relocation started", body = RelocatePdbResponse),
        (status = 404, description = "PDB not found", body = ApiError),
    ),
    tag = "multitenant"
)]
pub async fn relocate_pdb(
    State(_state): State<Arc<ApiState>>,
    Path(pdb_name): Path<String>,
    Json(request): Json<RelocatePdbRequest>,
) -> ApiResult<(StatusCode, Json<RelocatePdbResponse>)> {
    let relocation_id = format!("reloc_{}", uuid::Uuid::new_v4());

    Ok((StatusCode::ACCEPTED, Json(RelocatePdbResponse {
        relocation_id,
        pdb_name: pdb_name.clone(),
        source_cdb: "CDB_SOURCE".to_string(),
        target_cdb: request.target_cdb,
        status: "in_progress".to_string(),
        started_at: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64,
    })))
}

/// Get system-wide multi-tenant statistics
#[utoipa::path(
    get,
    path = "/api/v1/multitenant/system/stats",
    responses(
        (status = 200, description = "System statistics", body = SystemStatsResponse),
    ),
    tag = "multitenant"
)]
pub async fn get_system_stats(
    State(_state): State<Arc<ApiState>>,
) -> ApiResult<Json<SystemStatsResponse>> {
    Ok(Json(SystemStatsResponse {
        total_tenants: 100,
        active_tenants: 85,
        suspended_tenants: 15,
        total_pdbs: 120,
        total_cpu_cores: 400.0,
        cpu_utilization_percent: 62.5,
        total_memory_gb: 2048.0,
        memory_utilization_percent: 58.3,
        total_storage_gb: 50000.0,
        storage_utilization_percent: 45.2,
    }))
}

/// Get metering report for billing
#[utoipa::path(
    post,
    path = "/api/v1/multitenant/metering/report",
    request_body = MeteringReportRequest,
    responses(
        (status = 200, description = "Metering report", body = MeteringReportResponse),
        (status = 400, description = "Invalid date range", body = ApiError),
    ),
    tag = "multitenant"
)]
pub async fn get_metering_report(
    State(_state): State<Arc<ApiState>>,
    Json(request): Json<MeteringReportRequest>,
) -> ApiResult<Json<MeteringReportResponse>> {
    let tenant_id = request.tenant_id.unwrap_or_else(|| "default_tenant".to_string());

    Ok(Json(MeteringReportResponse {
        tenant_id,
        period_start: request.start_date,
        period_end: request.end_date,
        total_cpu_hours: 720.0,
        total_memory_gb_hours: 5760.0,
        total_storage_gb_hours: 72000.0,
        total_io_operations: 100_000_000,
        total_network_gb: 500.0,
        estimated_cost: 1250.00,
        data_points: vec![],
    }))
}
