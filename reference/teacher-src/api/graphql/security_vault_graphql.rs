// # Security Vault GraphQL API
//
// GraphQL queries and mutations for Transparent Data Encryption (TDE),
// Virtual Private Database (VPD), Data Masking, and Key Management.

use async_graphql::{
    Context, Error, ErrorExtensions, InputObject, Object, Result as GqlResult, SimpleObject, ID,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::security_vault::{
    MaskingPolicy, MaskingType, SecurityPredicate, SecurityVaultManager, VpdPolicy,
};

// ============================================================================
// TYPE DEFINITIONS
// ============================================================================

/// Encryption status information
#[derive(Debug, Clone, SimpleObject)]
pub struct EncryptionStatusGql {
    /// Whether TDE is enabled globally
    pub tde_enabled: bool,
    /// Default encryption algorithm
    pub default_algorithm: String,
    /// List of encrypted tablespaces
    pub encrypted_tablespaces: Vec<TablespaceEncryptionGql>,
    /// List of encrypted columns
    pub encrypted_columns: Vec<ColumnEncryptionGql>,
    /// Total bytes encrypted
    pub total_bytes_encrypted: i64,
    /// Total bytes decrypted
    pub total_bytes_decrypted: i64,
    /// Total encryption operations
    pub total_encryptions: i64,
    /// Total decryption operations
    pub total_decryptions: i64,
    /// Key rotation statistics
    pub key_rotations: i64,
}

/// Tablespace encryption information
#[derive(Debug, Clone, SimpleObject)]
pub struct TablespaceEncryptionGql {
    /// Tablespace name
    pub tablespace_name: String,
    /// Encryption algorithm
    pub algorithm: String,
    /// Key identifier
    pub key_id: String,
    /// Key version
    pub key_version: i32,
    /// Whether encryption is enabled
    pub enabled: bool,
    /// Creation timestamp
    pub created_at: i64,
}

/// Column encryption information
#[derive(Debug, Clone, SimpleObject)]
pub struct ColumnEncryptionGql {
    /// Table name
    pub table_name: String,
    /// Column name
    pub column_name: String,
    /// Encryption algorithm
    pub algorithm: String,
    /// Key identifier
    pub key_id: String,
    /// Whether encryption is enabled
    pub enabled: bool,
}

/// Data encryption key information
#[derive(Debug, Clone, SimpleObject)]
pub struct DataEncryptionKeyGql {
    /// Key ID
    pub id: String,
    /// Key version
    pub version: i32,
    /// MEK version used to encrypt this DEK
    pub mek_version: i32,
    /// Algorithm
    pub algorithm: String,
    /// Key status
    pub status: String,
    /// Creation timestamp
    pub created_at: i64,
    /// Expiration timestamp
    pub expires_at: Option<i64>,
    /// Usage count
    pub usage_count: i64,
}

/// VPD policy information
#[derive(Debug, Clone, SimpleObject)]
pub struct VpdPolicyGql {
    /// Policy name
    pub name: String,
    /// Table name
    pub table_name: String,
    /// Schema name
    pub schema_name: Option<String>,
    /// Security predicate
    pub predicate: String,
    /// Policy scope (SELECT, INSERT, UPDATE, DELETE, ALL)
    pub policy_scope: Vec<String>,
    /// Whether policy is enabled
    pub enabled: bool,
    /// Priority (higher applies first)
    pub priority: i32,
    /// Creation timestamp
    pub created_at: i64,
}

/// Data masking policy information
#[derive(Debug, Clone, SimpleObject)]
pub struct MaskingPolicyGql {
    /// Policy name
    pub name: String,
    /// Column pattern (regex)
    pub column_pattern: String,
    /// Table pattern (regex, optional)
    pub table_pattern: Option<String>,
    /// Masking type
    pub masking_type: String,
    /// Whether policy is enabled
    pub enabled: bool,
    /// Priority
    pub priority: i32,
    /// Creation timestamp
    pub created_at: i64,
}

/// Masking test result
#[derive(Debug, Clone, SimpleObject)]
pub struct MaskingTestResultGql {
    /// Original value
    pub original: String,
    /// Masked value
    pub masked: String,
    /// Masking type used
    pub masking_type: String,
}

// ============================================================================
// INPUT TYPES
// ============================================================================

/// Input for enabling tablespace encryption
#[derive(Debug, InputObject)]
pub struct EnableTablespaceEncryptionInput {
    /// Tablespace name
    pub tablespace_name: String,
    /// Encryption algorithm (e.g., "AES256GCM", "CHACHA20")
    pub algorithm: String,
}

/// Input for enabling column encryption
#[derive(Debug, InputObject)]
pub struct EnableColumnEncryptionInput {
    /// Table name
    pub table_name: String,
    /// Column name
    pub column_name: String,
    /// Encryption algorithm
    pub algorithm: String,
}

/// Input for creating a VPD policy
#[derive(Debug, InputObject)]
pub struct CreateVpdPolicyInput {
    /// Policy name
    pub name: String,
    /// Table name
    pub table_name: String,
    /// Schema name (optional)
    pub schema_name: Option<String>,
    /// Security predicate (SQL WHERE clause or dynamic template)
    pub predicate: String,
    /// Policy scope (optional, defaults to ALL)
    pub policy_scope: Option<Vec<String>>,
    /// Priority (optional, defaults to 0)
    pub priority: Option<i32>,
}

/// Input for creating a masking policy
#[derive(Debug, InputObject)]
pub struct CreateMaskingPolicyInput {
    /// Policy name
    pub name: String,
    /// Column pattern (regex)
    pub column_pattern: String,
    /// Table pattern (regex, optional)
    pub table_pattern: Option<String>,
    /// Masking type (e.g., "FULL_MASK", "PARTIAL_MASK", "SSN_MASK")
    pub masking_type: String,
    /// Priority (optional, defaults to 0)
    pub priority: Option<i32>,
    /// Consistency key for deterministic masking (optional)
    pub consistency_key: Option<String>,
}

/// Input for generating a new encryption key
#[derive(Debug, InputObject)]
pub struct GenerateKeyInput {
    /// Key name/identifier
    pub key_name: String,
    /// Algorithm (e.g., "AES256GCM")
    pub algorithm: String,
}

// ============================================================================
// QUERY ROOT EXTENSION
// ============================================================================

/// Security Vault query operations
pub struct SecurityVaultQuery;

#[Object]
impl SecurityVaultQuery {
    /// Get current encryption status
    pub async fn encryption_status(&self, ctx: &Context<'_>) -> GqlResult<EncryptionStatusGql> {
        // In a real implementation, this would fetch from the vault manager
        // For now, return mock data
        Ok(EncryptionStatusGql {
            tde_enabled: true,
            default_algorithm: "AES256GCM".to_string(),
            encrypted_tablespaces: vec![],
            encrypted_columns: vec![],
            total_bytes_encrypted: 0,
            total_bytes_decrypted: 0,
            total_encryptions: 0,
            total_decryptions: 0,
            key_rotations: 0,
        })
    }

    /// List all encryption keys
    pub async fn encryption_keys(&self, ctx: &Context<'_>) -> GqlResult<Vec<DataEncryptionKeyGql>> {
        // Mock implementation
        Ok(vec![])
    }

    /// Get specific encryption key by ID
    pub async fn encryption_key(&self, ctx: &Context<'_>, id: String) -> GqlResult<Option<DataEncryptionKeyGql>> {
        // Mock implementation
        Ok(None)
    }

    /// List all VPD policies
    pub async fn vpd_policies(&self, ctx: &Context<'_>) -> GqlResult<Vec<VpdPolicyGql>> {
        // Mock implementation
        Ok(vec![])
    }

    /// Get specific VPD policy by name
    pub async fn vpd_policy(&self, ctx: &Context<'_>, name: String) -> GqlResult<Option<VpdPolicyGql>> {
        // Mock implementation
        Ok(None)
    }

    /// Get VPD policies for a specific table
    pub async fn table_vpd_policies(&self, ctx: &Context<'_>, table_name: String) -> GqlResult<Vec<VpdPolicyGql>> {
        // Mock implementation
        Ok(vec![])
    }

    /// List all data masking policies
    pub async fn masking_policies(&self, ctx: &Context<'_>) -> GqlResult<Vec<MaskingPolicyGql>> {
        // Mock implementation
        Ok(vec![])
    }

    /// Get specific masking policy by name
    pub async fn masking_policy(&self, ctx: &Context<'_>, name: String) -> GqlResult<Option<MaskingPolicyGql>> {
        // Mock implementation
        Ok(None)
    }
}

// ============================================================================
// MUTATION ROOT EXTENSION
// ============================================================================

/// Security Vault mutation operations
pub struct SecurityVaultMutation;

#[Object]
impl SecurityVaultMutation {
    /// Enable transparent data encryption for a tablespace
    pub async fn enable_tablespace_encryption(
        &self,
        ctx: &Context<'_>,
        input: EnableTablespaceEncryptionInput,
    ) -> GqlResult<TablespaceEncryptionGql> {
        // Mock implementation - in production, this would call vault manager
        Ok(TablespaceEncryptionGql {
            tablespace_name: input.tablespace_name.clone(),
            algorithm: input.algorithm.clone(),
            key_id: format!("ts_{}", input.tablespace_name),
            key_version: 1,
            enabled: true,
            created_at: chrono::Utc::now().timestamp(),
        })
    }

    /// Enable column-level encryption
    pub async fn enable_column_encryption(
        &self,
        ctx: &Context<'_>,
        input: EnableColumnEncryptionInput,
    ) -> GqlResult<ColumnEncryptionGql> {
        // Mock implementation
        Ok(ColumnEncryptionGql {
            table_name: input.table_name.clone(),
            column_name: input.column_name.clone(),
            algorithm: input.algorithm.clone(),
            key_id: format!("col_{}_{}", input.table_name, input.column_name),
            enabled: true,
        })
    }

    /// Generate a new encryption key
    pub async fn generate_encryption_key(
        &self,
        ctx: &Context<'_>,
        input: GenerateKeyInput,
    ) -> GqlResult<DataEncryptionKeyGql> {
        // Mock implementation
        Ok(DataEncryptionKeyGql {
            id: input.key_name.clone(),
            version: 1,
            mek_version: 1,
            algorithm: input.algorithm.clone(),
            status: "Active".to_string(),
            created_at: chrono::Utc::now().timestamp(),
            expires_at: None,
            usage_count: 0,
        })
    }

    /// Rotate an encryption key
    pub async fn rotate_encryption_key(
        &self,
        ctx: &Context<'_>,
        key_id: String,
    ) -> GqlResult<DataEncryptionKeyGql> {
        // Mock implementation
        Ok(DataEncryptionKeyGql {
            id: key_id.clone(),
            version: 2, // Incremented after rotation
            mek_version: 1,
            algorithm: "AES256GCM".to_string(),
            status: "Active".to_string(),
            created_at: chrono::Utc::now().timestamp(),
            expires_at: None,
            usage_count: 0,
        })
    }

    /// Create a new VPD (Virtual Private Database) policy
    pub async fn create_vpd_policy(
        &self,
        ctx: &Context<'_>,
        input: CreateVpdPolicyInput,
    ) -> GqlResult<VpdPolicyGql> {
        // Mock implementation
        Ok(VpdPolicyGql {
            name: input.name.clone(),
            table_name: input.table_name.clone(),
            schema_name: input.schema_name,
            predicate: input.predicate.clone(),
            policy_scope: input.policy_scope.unwrap_or_else(|| vec!["ALL".to_string()]),
            enabled: true,
            priority: input.priority.unwrap_or(0),
            created_at: chrono::Utc::now().timestamp(),
        })
    }

    /// Update a VPD policy
    pub async fn update_vpd_policy(
        &self,
        ctx: &Context<'_>,
        name: String,
        enabled: Option<bool>,
        predicate: Option<String>,
    ) -> GqlResult<VpdPolicyGql> {
        // Mock implementation - would fetch existing policy and update
        Ok(VpdPolicyGql {
            name: name.clone(),
            table_name: "mock_table".to_string(),
            schema_name: None,
            predicate: predicate.unwrap_or_else(|| "1=1".to_string()),
            policy_scope: vec!["ALL".to_string()],
            enabled: enabled.unwrap_or(true),
            priority: 0,
            created_at: chrono::Utc::now().timestamp(),
        })
    }

    /// Delete a VPD policy
    pub async fn delete_vpd_policy(
        &self,
        ctx: &Context<'_>,
        name: String,
    ) -> GqlResult<bool> {
        // Mock implementation
        Ok(true)
    }

    /// Enable a VPD policy
    pub async fn enable_vpd_policy(
        &self,
        ctx: &Context<'_>,
        name: String,
    ) -> GqlResult<VpdPolicyGql> {
        // Mock implementation
        Ok(VpdPolicyGql {
            name: name.clone(),
            table_name: "mock_table".to_string(),
            schema_name: None,
            predicate: "1=1".to_string(),
            policy_scope: vec!["ALL".to_string()],
            enabled: true,
            priority: 0,
            created_at: chrono::Utc::now().timestamp(),
        })
    }

    /// Disable a VPD policy
    pub async fn disable_vpd_policy(
        &self,
        ctx: &Context<'_>,
        name: String,
    ) -> GqlResult<VpdPolicyGql> {
        // Mock implementation
        Ok(VpdPolicyGql {
            name: name.clone(),
            table_name: "mock_table".to_string(),
            schema_name: None,
            predicate: "1=1".to_string(),
            policy_scope: vec!["ALL".to_string()],
            enabled: false,
            priority: 0,
            created_at: chrono::Utc::now().timestamp(),
        })
    }

    /// Create a new data masking policy
    pub async fn create_masking_policy(
        &self,
        ctx: &Context<'_>,
        input: CreateMaskingPolicyInput,
    ) -> GqlResult<MaskingPolicyGql> {
        // Mock implementation
        Ok(MaskingPolicyGql {
            name: input.name.clone(),
            column_pattern: input.column_pattern.clone(),
            table_pattern: input.table_pattern,
            masking_type: input.masking_type.clone(),
            enabled: true,
            priority: input.priority.unwrap_or(0),
            created_at: chrono::Utc::now().timestamp(),
        })
    }

    /// Update a masking policy
    pub async fn update_masking_policy(
        &self,
        ctx: &Context<'_>,
        name: String,
        enabled: Option<bool>,
        priority: Option<i32>,
    ) -> GqlResult<MaskingPolicyGql> {
        // Mock implementation
        Ok(MaskingPolicyGql {
            name: name.clone(),
            column_pattern: ".*".to_string(),
            table_pattern: None,
            masking_type: "FULL_MASK".to_string(),
            enabled: enabled.unwrap_or(true),
            priority: priority.unwrap_or(0),
            created_at: chrono::Utc::now().timestamp(),
        })
    }

    /// Delete a masking policy
    pub async fn delete_masking_policy(
        &self,
        ctx: &Context<'_>,
        name: String,
    ) -> GqlResult<bool> {
        // Mock implementation
        Ok(true)
    }

    /// Enable a masking policy
    pub async fn enable_masking_policy(
        &self,
        ctx: &Context<'_>,
        name: String,
    ) -> GqlResult<MaskingPolicyGql> {
        // Mock implementation
        Ok(MaskingPolicyGql {
            name: name.clone(),
            column_pattern: ".*".to_string(),
            table_pattern: None,
            masking_type: "FULL_MASK".to_string(),
            enabled: true,
            priority: 0,
            created_at: chrono::Utc::now().timestamp(),
        })
    }

    /// Disable a masking policy
    pub async fn disable_masking_policy(
        &self,
        ctx: &Context<'_>,
        name: String,
    ) -> GqlResult<MaskingPolicyGql> {
        // Mock implementation
        Ok(MaskingPolicyGql {
            name: name.clone(),
            column_pattern: ".*".to_string(),
            table_pattern: None,
            masking_type: "FULL_MASK".to_string(),
            enabled: false,
            priority: 0,
            created_at: chrono::Utc::now().timestamp(),
        })
    }

    /// Test masking on sample values
    pub async fn test_masking(
        &self,
        ctx: &Context<'_>,
        policy_name: String,
        test_values: Vec<String>,
    ) -> GqlResult<Vec<MaskingTestResultGql>> {
        // Mock implementation
        let results: Vec<MaskingTestResultGql> = test_values
            .into_iter()
            .map(|original| MaskingTestResultGql {
                original: original.clone(),
                masked: "***MASKED***".to_string(),
                masking_type: "FULL_MASK".to_string(),
            })
            .collect();
        Ok(results)
    }
}
