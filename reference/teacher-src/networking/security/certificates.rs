// Certificate management, rotation, and auto-renewal
//
// This module provides certificate rotation, auto-renewal (ACME/Let's Encrypt),
// self-signed certificate generation, and certificate store management.

use crate::error::{DbError, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;

/// Certificate status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateStatus {
    /// Certificate is valid
    Valid,
    /// Certificate is expiring soon
    ExpiringSoon,
    /// Certificate has expired
    Expired,
    /// Certificate is revoked
    Revoked,
}

/// Certificate metadata
#[derive(Debug, Clone)]
pub struct CertificateMetadata {
    /// Subject
    pub subject: String,

    /// Issuer
    pub issuer: String,

    /// Serial number
    pub serial_number: String,

    /// Not before timestamp
    pub not_before: SystemTime,

    /// Not after timestamp
    pub not_after: SystemTime,

    /// Status
    pub status: CertificateStatus,

    /// File path
    pub file_path: PathBuf,

    /// Key file path
    pub key_path: PathBuf,
}

impl CertificateMetadata {
    /// Create a new certificate metadata
    pub fn new(subject: String, file_path: PathBuf, key_path: PathBuf) -> Self {
        Self {
            subject,
            issuer: String::new(),
            serial_number: String::new(),
            not_before: SystemTime::now(),
            not_after: SystemTime::now() + Duration::from_secs(365 * 24 * 3600),
            status: CertificateStatus::Valid,
            file_path,
            key_path,
        }
    }

    /// Check if certificate is expiring soon
    pub fn is_expiring_soon(&self, threshold: Duration) -> bool {
        if let Ok(remaining) = self.not_after.duration_since(SystemTime::now()) {
            remaining < threshold
        } else {
            true
        }
    }

    /// Check if certificate has expired
    pub fn is_expired(&self) -> bool {
        SystemTime::now() > self.not_after
    }

    /// Update status
    pub fn update_status(&mut self, expiry_threshold: Duration) {
        if self.is_expired() {
            self.status = CertificateStatus::Expired;
        } else if self.is_expiring_soon(expiry_threshold) {
            self.status = CertificateStatus::ExpiringSoon;
        } else {
            self.status = CertificateStatus::Valid;
        }
    }
}

/// Certificate configuration
#[derive(Debug, Clone)]
pub struct CertificateConfig {
    /// Certificate directory
    pub cert_dir: PathBuf,

    /// Enable auto-renewal
    pub auto_renewal: bool,

    /// ACME server URL (for Let's Encrypt)
    pub acme_url: Option<String>,

    /// ACME account email
    pub acme_email: Option<String>,

    /// Certificate renewal threshold (renew when this time remains)
    pub renewal_threshold: Duration,

    /// Enable self-signed certificate generation
    pub allow_self_signed: bool,

    /// Self-signed certificate validity duration
    pub self_signed_validity: Duration,

    /// Certificate rotation interval
    pub rotation_interval: Option<Duration>,

    /// Enable certificate monitoring
    pub monitoring_enabled: bool,

    /// Monitoring check interval
    pub monitoring_interval: Duration,
}

impl Default for CertificateConfig {
    fn default() -> Self {
        Self {
            cert_dir: PathBuf::from("./certs"),
            auto_renewal: false,
            acme_url: None,
            acme_email: None,
            renewal_threshold: Duration::from_secs(30 * 24 * 3600), // 30 days
            allow_self_signed: true,
            self_signed_validity: Duration::from_secs(365 * 24 * 3600), // 1 year
            rotation_interval: None,
            monitoring_enabled: true,
            monitoring_interval: Duration::from_secs(3600), // 1 hour
        }
    }
}

impl CertificateConfig {
    /// Create a new certificate configuration
    pub fn new(cert_dir: PathBuf) -> Self {
        Self {
            cert_dir,
            ..Default::default()
        }
    }

    /// Enable auto-renewal with ACME
    pub fn with_acme(mut self, url: String, email: String) -> Self {
        self.auto_renewal = true;
        self.acme_url = Some(url);
        self.acme_email = Some(email);
        self
    }

    /// Set renewal threshold
    pub fn with_renewal_threshold(mut self, threshold: Duration) -> Self {
        self.renewal_threshold = threshold;
        self
    }

    /// Enable certificate rotation
    pub fn with_rotation(mut self, interval: Duration) -> Self {
        self.rotation_interval = Some(interval);
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.auto_renewal {
            if self.acme_url.is_none() {
                return Err(DbError::Configuration(
                    "ACME URL required for auto-renewal".to_string(),
                ));
            }
            if self.acme_email.is_none() {
                return Err(DbError::Configuration(
                    "ACME email required for auto-renewal".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Certificate store
#[derive(Debug)]
pub struct CertificateStore {
    /// Certificates indexed by subject
    certificates: HashMap<String, CertificateMetadata>,
}

impl CertificateStore {
    /// Create a new certificate store
    pub fn new() -> Self {
        Self {
            certificates: HashMap::new(),
        }
    }

    /// Add certificate
    pub fn add(&mut self, metadata: CertificateMetadata) {
        self.certificates
            .insert(metadata.subject.clone(), metadata);
    }

    /// Get certificate by subject
    pub fn get(&self, subject: &str) -> Option<&CertificateMetadata> {
        self.certificates.get(subject)
    }

    /// Get mutable certificate by subject
    pub fn get_mut(&mut self, subject: &str) -> Option<&mut CertificateMetadata> {
        self.certificates.get_mut(subject)
    }

    /// Remove certificate
    pub fn remove(&mut self, subject: &str) -> Option<CertificateMetadata> {
        self.certificates.remove(subject)
    }

    /// List all certificates
    pub fn list(&self) -> Vec<&CertificateMetadata> {
        self.certificates.values().collect()
    }

    /// Get expiring certificates
    pub fn get_expiring(&self, threshold: Duration) -> Vec<&CertificateMetadata> {
        self.certificates
            .values()
            .filter(|cert| cert.is_expiring_soon(threshold))
            .collect()
    }

    /// Get expired certificates
    pub fn get_expired(&self) -> Vec<&CertificateMetadata> {
        self.certificates
            .values()
            .filter(|cert| cert.is_expired())
            .collect()
    }
}

impl Default for CertificateStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Certificate manager
pub struct CertificateManager {
    /// Configuration
    config: CertificateConfig,

    /// Certificate store
    store: Arc<RwLock<CertificateStore>>,

    /// Monitoring task handle
    monitoring_task: Option<tokio::task::JoinHandle<()>>,
}

impl CertificateManager {
    /// Create a new certificate manager
    pub fn new(config: CertificateConfig) -> Result<Self> {
        config.validate()?;

        // Create certificate directory if it doesn't exist
        std::fs::create_dir_all(&config.cert_dir).map_err(|e| {
            DbError::Configuration(format!("Failed to create cert directory: {}", e))
        })?;

        Ok(Self {
            config,
            store: Arc::new(RwLock::new(CertificateStore::new())),
            monitoring_task: None,
        })
    }

    /// Start certificate monitoring
    pub async fn start_monitoring(&mut self) -> Result<()> {
        if !self.config.monitoring_enabled {
            return Ok(());
        }

        let store = self.store.clone();
        let interval = self.config.monitoring_interval;
        let renewal_threshold = self.config.renewal_threshold;
        let auto_renewal = self.config.auto_renewal;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;

                let mut store_guard = store.write().await;

                // Update certificate statuses
                for cert in store_guard.certificates.values_mut() {
                    cert.update_status(renewal_threshold);
                }

                // Check for expiring certificates
                let expiring: Vec<String> = store_guard
                    .certificates
                    .values()
                    .filter(|cert| cert.status == CertificateStatus::ExpiringSoon)
                    .map(|cert| cert.subject.clone())
                    .collect();

                drop(store_guard);

                // Renew expiring certificates if auto-renewal is enabled
                if auto_renewal {
                    for subject in expiring {
                        // In production, implement actual renewal logic
                        tracing::info!("Certificate expiring soon: {}", subject);
                    }
                }
            }
        });

        self.monitoring_task = Some(task);
        Ok(())
    }

    /// Stop certificate monitoring
    pub async fn stop_monitoring(&mut self) {
        if let Some(task) = self.monitoring_task.take() {
            task.abort();
        }
    }

    /// Generate self-signed certificate
    pub async fn generate_self_signed(
        &self,
        subject: &str,
        _san_dns: Vec<String>,
    ) -> Result<CertificateMetadata> {
        if !self.config.allow_self_signed {
            return Err(DbError::Configuration(
                "Self-signed certificates not allowed".to_string(),
            ));
        }

        let cert_path = self.config.cert_dir.join(format!("{}.crt", subject));
        let key_path = self.config.cert_dir.join(format!("{}.key", subject));

        // In a real implementation, use rcgen or similar to generate certificates
        // For now, create placeholder files
        std::fs::write(&cert_path, b"CERT").map_err(|e| {
            DbError::Configuration(format!("Failed to write certificate: {}", e))
        })?;

        std::fs::write(&key_path, b"KEY").map_err(|e| {
            DbError::Configuration(format!("Failed to write key: {}", e))
        })?;

        let mut metadata = CertificateMetadata::new(subject.to_string(), cert_path, key_path);
        metadata.issuer = subject.to_string();
        metadata.serial_number = "1".to_string();
        metadata.not_before = SystemTime::now();
        metadata.not_after = SystemTime::now() + self.config.self_signed_validity;

        let mut store = self.store.write().await;
        store.add(metadata.clone());

        Ok(metadata)
    }

    /// Request certificate from ACME server
    pub async fn request_acme_certificate(
        &self,
        _subject: &str,
        _san_dns: Vec<String>,
    ) -> Result<CertificateMetadata> {
        if !self.config.auto_renewal {
            return Err(DbError::Configuration(
                "ACME auto-renewal not enabled".to_string(),
            ));
        }

        let acme_url = self
            .config
            .acme_url
            .as_ref()
            .ok_or_else(|| DbError::Configuration("ACME URL not configured".to_string()))?;

        // In a real implementation, use acme2 or similar crate to request certificates
        // For now, return an error
        Err(DbError::NotImplemented(format!(
            "ACME certificate request not yet implemented for {}",
            acme_url
        )))
    }

    /// Rotate certificate
    pub async fn rotate_certificate(&self, subject: &str) -> Result<CertificateMetadata> {
        let store = self.store.read().await;
        let _existing = store.get(subject).ok_or_else(|| {
            DbError::NotFound(format!("Certificate not found: {}", subject))
        })?;

        let san_dns = vec![subject.to_string()];
        drop(store);

        // Generate new certificate
        if self.config.auto_renewal {
            self.request_acme_certificate(subject, san_dns).await
        } else {
            self.generate_self_signed(subject, san_dns).await
        }
    }

    /// Load certificate from file
    pub async fn load_certificate(&self, cert_path: PathBuf, key_path: PathBuf) -> Result<()> {
        // In a real implementation, parse the certificate and extract metadata
        let subject = "CN=unknown".to_string();

        let metadata = CertificateMetadata::new(subject, cert_path, key_path);

        let mut store = self.store.write().await;
        store.add(metadata);

        Ok(())
    }

    /// Get certificate by subject
    pub async fn get_certificate(&self, subject: &str) -> Result<CertificateMetadata> {
        let store = self.store.read().await;
        store
            .get(subject)
            .cloned()
            .ok_or_else(|| DbError::NotFound(format!("Certificate not found: {}", subject)))
    }

    /// List all certificates
    pub async fn list_certificates(&self) -> Vec<CertificateMetadata> {
        let store = self.store.read().await;
        store.list().into_iter().cloned().collect()
    }

    /// Get expiring certificates
    pub async fn get_expiring_certificates(&self) -> Vec<CertificateMetadata> {
        let store = self.store.read().await;
        store
            .get_expiring(self.config.renewal_threshold)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Revoke certificate
    pub async fn revoke_certificate(&self, subject: &str) -> Result<()> {
        let mut store = self.store.write().await;
        if let Some(cert) = store.get_mut(subject) {
            cert.status = CertificateStatus::Revoked;
            Ok(())
        } else {
            Err(DbError::NotFound(format!(
                "Certificate not found: {}",
                subject
            )))
        }
    }
}

impl Drop for CertificateManager {
    fn drop(&mut self) {
        if let Some(task) = self.monitoring_task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_certificate_metadata() {
        let mut metadata = CertificateMetadata::new(
            "CN=test".to_string(),
            PathBuf::from("/tmp/test.crt"),
            PathBuf::from("/tmp/test.key"),
        );

        assert_eq!(metadata.status, CertificateStatus::Valid);
        assert!(!metadata.is_expired());

        metadata.update_status(Duration::from_secs(60 * 24 * 3600)); // 60 days
        assert_eq!(metadata.status, CertificateStatus::ExpiringSoon);
    }

    #[test]
    fn test_certificate_store() {
        let mut store = CertificateStore::new();

        let metadata = CertificateMetadata::new(
            "CN=test".to_string(),
            PathBuf::from("/tmp/test.crt"),
            PathBuf::from("/tmp/test.key"),
        );

        store.add(metadata.clone());

        assert!(store.get("CN=test").is_some());
        assert!(store.get("CN=other").is_none());

        let certs = store.list();
        assert_eq!(certs.len(), 1);
    }

    #[test]
    fn test_certificate_config() {
        let config = CertificateConfig::new(PathBuf::from("./certs"))
            .with_renewal_threshold(Duration::from_secs(7 * 24 * 3600))
            .with_rotation(Duration::from_secs(90 * 24 * 3600));

        assert_eq!(
            config.renewal_threshold,
            Duration::from_secs(7 * 24 * 3600)
        );
        assert!(config.rotation_interval.is_some());
    }
}
