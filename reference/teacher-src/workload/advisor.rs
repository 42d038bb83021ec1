// RustyDB Automatic Database Diagnostic Monitor (ADDM) - Oracle-like diagnostic advisor
// Provides automatic bottleneck detection, root cause analysis, and recommendations

use std::time::SystemTime;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap};
use std::sync::Arc;
use std::time::{Duration};
use parking_lot::RwLock;
use crate::Result;
use crate::error::DbError;

/// Automatic Database Diagnostic Monitor
pub struct DiagnosticAdvisor {
    /// Analysis runs
    analysis_runs: Arc<RwLock<HashMap<AnalysisId, AnalysisRun>>>,

    /// Findings repository
    findings: Arc<RwLock<HashMap<AnalysisId, Vec<Finding>>>>,

    /// Recommendations repository
    recommendations: Arc<RwLock<HashMap<AnalysisId, Vec<Recommendation>>>>,

    /// Performance baselines for comparison
    baselines: Arc<RwLock<HashMap<String, PerformanceBaseline>>>,

    /// Configuration
    config: Arc<RwLock<AdvisorConfig>>,

    /// Next analysis ID
    next_analysis_id: Arc<RwLock<AnalysisId>>,
}

/// Unique identifier for an analysis run
pub type AnalysisId = u64;

/// Advisor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// Minimum finding severity to report
    pub min_severity: FindingSeverity,

    /// Enable automatic analysis
    pub auto_analysis_enabled: bool,

    /// Analysis interval (seconds)
    pub analysis_interval_secs: u64,

    /// Maximum findings to report per analysis
    pub max_findings: usize,

    /// Minimum impact threshold (% of DB time)
    pub min_impact_pct: f64,

    /// Enable impact estimation
    pub enable_impact_estimation: bool,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            min_severity: FindingSeverity::Low,
            auto_analysis_enabled: true,
            analysis_interval_secs: 3600, // 1 hour
            max_findings: 50,
            min_impact_pct: 5.0,
            enable_impact_estimation: true,
        }
    }
}

/// Analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRun {
    pub analysis_id: AnalysisId,
    pub analysis_name: String,
    pub start_snapshot_id: u64,
    pub end_snapshot_id: u64,
    pub status: AnalysisStatus,
    pub created_time: SystemTime,
    pub started_time: Option<SystemTime>,
    pub completed_time: Option<SystemTime>,
    pub analysis_scope: AnalysisScope,
}

/// Analysis status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum AnalysisStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

/// Analysis scope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AnalysisScope {
    /// Full database analysis
    Database,
    /// SQL-specific analysis
    Sql(String),
    /// Session-specific analysis
    Session(u64),
    /// Custom scope
    Custom,
}

/// Diagnostic finding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub finding_id: u32,
    pub finding_type: FindingType,
    pub severity: FindingSeverity,
    pub title: String,
    pub description: String,
    pub impact_pct: f64,
    pub impact_type: ImpactType,
    pub evidence: Vec<Evidence>,
    pub related_objects: Vec<String>,
    pub time_period_start: SystemTime,
    pub time_period_end: SystemTime,
}

/// Finding type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum FindingType {
    /// CPU bottleneck
    CpuBottleneck,
    /// I/O bottleneck
    IoBottleneck,
    /// Memory bottleneck
    MemoryBottleneck,
    /// Lock contention
    LockContention,
    /// Suboptimal SQL
    SuboptimalSql,
    /// Configuration issue
    ConfigurationIssue,
    /// Resource contention
    ResourceContention,
    /// Wait event
    WaitEvent,
    /// Inefficient schema design
    SchemaDesign,
    /// Connection pool exhaustion
    ConnectionExhaustion,
}

/// Finding severity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum FindingSeverity {
    Low,
    Medium,
    High,
    Critical,
}

/// Impact type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ImpactType {
    /// Impact on DB time
    DbTime,
    /// Impact on CPU
    Cpu,
    /// Impact on I/O
    Io,
    /// Impact on memory
    Memory,
    /// Impact on throughput
    Throughput,
}

/// Evidence supporting a finding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    pub evidence_type: EvidenceType,
    pub description: String,
    pub metric_name: String,
    pub metric_value: f64,
    pub threshold_value: f64,
}

/// Evidence type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EvidenceType {
    Metric,
    Wait,
    Sql,
    Session,
    Configuration,
}

/// Recommendation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub recommendation_id: u32,
    pub finding_id: u32,
    pub priority: RecommendationPriority,
    pub category: RecommendationCategory,
    pub title: String,
    pub rationale: String,
    pub action: String,
    pub estimated_benefit_pct: f64,
    pub implementation_effort: ImplementationEffort,
    pub prerequisites: Vec<String>,
    pub risks: Vec<String>,
    pub validation_steps: Vec<String>,
}

/// Recommendation priority
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum RecommendationPriority {
    Low,
    Medium,
    High,
    Critical,
}

/// Recommendation category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RecommendationCategory {
    SqlTuning,
    IndexCreation,
    Configuration,
    SchemaChange,
    HardwareUpgrade,
    ApplicationChange,
    Maintenance,
}

/// Implementation effort
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ImplementationEffort {
    Low,
    Medium,
    High,
}

/// Performance baseline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceBaseline {
    pub baseline_name: String,
    pub metrics: BaselineMetrics,
    pub created_time: SystemTime,
}

/// Baseline metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineMetrics {
    pub avg_cpu_usage_pct: f64,
    pub avg_active_sessions: f64,
    pub avg_queries_per_sec: f64,
    pub avg_transactions_per_sec: f64,
    pub avg_response_time_ms: f64,
    pub avg_buffer_hit_ratio: f64,
}

/// Analysis summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub analysis_id: AnalysisId,
    pub total_findings: usize,
    pub critical_findings: usize,
    pub high_findings: usize,
    pub total_recommendations: usize,
    pub top_findings: Vec<Finding>,
    pub top_recommendations: Vec<Recommendation>,
    pub performance_impact_pct: f64,
}

impl DiagnosticAdvisor {
    /// Create a new Diagnostic Advisor
    pub fn new() -> Self {
        Self::with_config(AdvisorConfig::default())
    }

    /// Create a new Diagnostic Advisor with custom configuration
    pub fn with_config(config: AdvisorConfig) -> Self {
        Self {
            analysis_runs: Arc::new(RwLock::new(HashMap::new())),
            findings: Arc::new(RwLock::new(HashMap::new())),
            recommendations: Arc::new(RwLock::new(HashMap::new())),
            baselines: Arc::new(RwLock::new(HashMap::new())),
            config: Arc::new(RwLock::new(config)),
            next_analysis_id: Arc::new(RwLock::new(1)),
        }
    }

    /// Create a new analysis run
    pub fn create_analysis(
        &self,
        name: String,
        start_snapshot_id: u64,
        end_snapshot_id: u64,
        scope: AnalysisScope,
    ) -> Result<AnalysisId> {
        let mut runs = self.analysis_runs.write();
        let mut next_id = self.next_analysis_id.write();

        let analysis_id = *next_id;
        *next_id += 1;

        let run = AnalysisRun {
            analysis_id,
            analysis_name: name,
            start_snapshot_id,
            end_snapshot_id,
            status: AnalysisStatus::Pending,
            created_time: SystemTime::now(),
            started_time: None,
            completed_time: None,
            analysis_scope: scope,
        };

        runs.insert(analysis_id, run);
        Ok(analysis_id)
    }

    /// Execute an analysis
    pub fn execute_analysis(&self, analysis_id: AnalysisId) -> Result<()> {
        // Update status
        {
            let mut runs = self.analysis_runs.write();
            let run = runs
                .get_mut(&analysis_id)
                .ok_or_else(|| DbError::NotFound(format!("Analysis {} not found", analysis_id)))?);

            run.status = AnalysisStatus::Running;
            run.started_time = Some(SystemTime::now());
        }

        // Perform analysis
        let findings = self.analyze_performance(analysis_id)?;
        let recommendations = self.generate_recommendations(&findings)?;

        // Store results
        self.findings.write().insert(analysis_id, findings);
        self.recommendations.write().insert(analysis_id, recommendations);

        // Update status
        {
            let mut runs = self.analysis_runs.write();
            if let Some(run) = runs.get_mut(&analysis_id) {
                run.status = AnalysisStatus::Completed;
                run.completed_time = Some(SystemTime::now());
            }
        }

        Ok(())
    }

    /// Analyze performance and identify issues
    fn analyze_performance(&self, analysis_id: AnalysisId) -> Result<Vec<Finding>> {
        let mut findings = Vec::new();
        let mut finding_id = 1;

        // CPU bottleneck detection
        if let Some(cpu_finding) = self.detect_cpu_bottleneck()? {
            findings.push(Finding {
                finding_id,
                finding_type: FindingType::CpuBottleneck,
                severity: FindingSeverity::High,
                title: "CPU Bottleneck Detected".to_string(),
                description: "Database is experiencing high CPU utilization".to_string(),
                impact_pct: cpu_finding,
                impact_type: ImpactType::Cpu,
                evidence: vec![Evidence {
                    evidence_type: EvidenceType::Metric,
                    description: "CPU usage exceeds threshold".to_string(),
                    metric_name: "cpu_usage_pct".to_string(),
                    metric_value: cpu_finding,
                    threshold_value: 80.0,
                }],
                related_objects: vec![],
                time_period_start: SystemTime::now(),
                time_period_end: SystemTime::now(),
            });
            finding_id += 1;
        }

        // I/O bottleneck detection
        if let Some(io_finding) = self.detect_io_bottleneck()? {
            findings.push(Finding {
                finding_id,
                finding_type: FindingType::IoBottleneck,
                severity: FindingSeverity::High,
                title: "I/O Bottleneck Detected".to_string(),
                description: "High I/O wait times are impacting performance".to_string(),
                impact_pct: io_finding,
                impact_type: ImpactType::Io,
                evidence: vec![Evidence {
                    evidence_type: EvidenceType::Wait,
                    description: "Excessive I/O waits detected".to_string(),
                    metric_name: "io_wait_pct".to_string(),
                    metric_value: io_finding,
                    threshold_value: 30.0,
                }],
                related_objects: vec![],
                time_period_start: SystemTime::now(),
                time_period_end: SystemTime::now(),
            });
            finding_id += 1;
        }

        // Memory pressure detection
        if let Some(memory_finding) = self.detect_memory_pressure()? {
            findings.push(Finding {
                finding_id,
                finding_type: FindingType::MemoryBottleneck,
                severity: FindingSeverity::Medium,
                title: "Memory Pressure Detected".to_string(),
                description: "Database is experiencing memory pressure".to_string(),
                impact_pct: memory_finding,
                impact_type: ImpactType::Memory,
                evidence: vec![Evidence {
                    evidence_type: EvidenceType::Metric,
                    description: "High memory utilization".to_string(),
                    metric_name: "memory_usage_pct".to_string(),
                    metric_value: memory_finding,
                    threshold_value: 90.0,
                }],
                related_objects: vec![],
                time_period_start: SystemTime::now(),
                time_period_end: SystemTime::now(),
            });
            finding_id += 1;
        }

        // Lock contention detection
        if let Some(lock_finding) = self.detect_lock_contention()? {
            findings.push(Finding {
                finding_id,
                finding_type: FindingType::LockContention,
                severity: FindingSeverity::High,
                title: "Lock Contention Detected".to_string(),
                description: "Significant lock waits are affecting concurrency".to_string(),
                impact_pct: lock_finding,
                impact_type: ImpactType::DbTime,
                evidence: vec![Evidence {
                    evidence_type: EvidenceType::Wait,
                    description: "High lock wait times".to_string(),
                    metric_name: "lock_wait_time_pct".to_string(),
                    metric_value: lock_finding,
                    threshold_value: 10.0,
                }],
                related_objects: vec![],
                time_period_start: SystemTime::now(),
                time_period_end: SystemTime::now(),
            });
            finding_id += 1;
        }

        // Suboptimal SQL detection
        if let Some(sql_findings) = self.detect_suboptimal_sql()? {
            for (i, sql_impact) in sql_findings.iter().enumerate() {
                findings.push(Finding {
                    finding_id: finding_id + i as u32,
                    finding_type: FindingType::SuboptimalSql,
                    severity: FindingSeverity::Medium,
                    title: format!("Suboptimal SQL Statement #{}", i + 1),
                    description: "SQL statement consuming excessive resources".to_string(),
                    impact_pct: *sql_impact,
                    impact_type: ImpactType::DbTime,
                    evidence: vec![Evidence {
                        evidence_type: EvidenceType::Sql,
                        description: "High resource consumption SQL".to_string(),
                        metric_name: "db_time_pct".to_string(),
                        metric_value: *sql_impact,
                        threshold_value: 5.0,
                    }],
                    related_objects: vec![format!("SQL_ID_{}", i)],
                    time_period_start: SystemTime::now(),
                    time_period_end: SystemTime::now(),
                }));
            }
            finding_id += sql_findings.len() as u32;
        }

        Ok(findings)
    }

    /// Generate recommendations based on findings
    fn generate_recommendations(&self, findings: &[Finding]) -> Result<Vec<Recommendation>> {
        let mut recommendations = Vec::new();
        let mut rec_id = 1;

        for finding in findings {
            match finding.finding_type {
                FindingType::CpuBottleneck => {
                    recommendations.push(Recommendation {
                        recommendation_id: rec_id,
                        finding_id: finding.finding_id,
                        priority: RecommendationPriority::High,
                        category: RecommendationCategory::SqlTuning,
                        title: "Optimize CPU-intensive SQL statements".to_string(),
                        rationale: "Reducing CPU consumption will improve overall system performance".to_string(),
                        action: "Run SQL Tuning Advisor on top CPU-consuming queries".to_string(),
                        estimated_benefit_pct: 30.0,
                        implementation_effort: ImplementationEffort::Medium,
                        prerequisites: vec!["Identify top SQL by CPU time".to_string()],
                        risks: vec!["Query plan changes may affect other queries".to_string()],
                        validation_steps: vec!["Monitor CPU usage after changes".to_string()],
                    });
                    rec_id += 1;
                }
                FindingType::IoBottleneck => {
                    recommendations.push(Recommendation {
                        recommendation_id: rec_id,
                        finding_id: finding.finding_id,
                        priority: RecommendationPriority::High,
                        category: RecommendationCategory::IndexCreation,
                        title: "Create missing indexes to reduce I/O".to_string(),
                        rationale: "Proper indexing can significantly reduce physical I/O".to_string(),
                        action: "Analyze table access patterns and create appropriate indexes".to_string(),
                        estimated_benefit_pct: 40.0,
                        implementation_effort: ImplementationEffort::Low,
                        prerequisites: vec!["Analyze SQL execution plans".to_string()],
                        risks: vec!["Index maintenance overhead".to_string()],
                        validation_steps: vec!["Monitor I/O statistics after index creation".to_string()],
                    });
                    rec_id += 1;
                }
                FindingType::MemoryBottleneck => {
                    recommendations.push(Recommendation {
                        recommendation_id: rec_id,
                        finding_id: finding.finding_id,
                        priority: RecommendationPriority::Medium,
                        category: RecommendationCategory::Configuration,
                        title: "Increase buffer cache size".to_string(),
                        rationale: "More memory for buffer cache reduces disk I/O".to_string(),
                        action: "Increase SGA_TARGET parameter".to_string(),
                        estimated_benefit_pct: 20.0,
                        implementation_effort: ImplementationEffort::Low,
                        prerequisites: vec!["Verify available physical memory".to_string()],
                        risks: vec!["May require database restart".to_string()],
                        validation_steps: vec!["Monitor buffer cache hit ratio".to_string()],
                    });
                    rec_id += 1;
                }
                FindingType::LockContention => {
                    recommendations.push(Recommendation {
                        recommendation_id: rec_id,
                        finding_id: finding.finding_id,
                        priority: RecommendationPriority::High,
                        category: RecommendationCategory::ApplicationChange,
                        title: "Reduce lock hold times".to_string(),
                        rationale: "Shorter transactions reduce lock contention".to_string(),
                        action: "Review and optimize transaction boundaries in application code".to_string(),
                        estimated_benefit_pct: 25.0,
                        implementation_effort: ImplementationEffort::High,
                        prerequisites: vec!["Identify long-running transactions".to_string()],
                        risks: vec!["Requires application code changes".to_string()],
                        validation_steps: vec!["Monitor lock wait statistics".to_string()],
                    });
                    rec_id += 1;
                }
                FindingType::SuboptimalSql => {
                    recommendations.push(Recommendation {
                        recommendation_id: rec_id,
                        finding_id: finding.finding_id,
                        priority: RecommendationPriority::Medium,
                        category: RecommendationCategory::SqlTuning,
                        title: "Tune high-impact SQL statement".to_string(),
                        rationale: "Optimizing this SQL will improve overall performance".to_string(),
                        action: "Use SQL Tuning Advisor to generate tuning recommendations".to_string(),
                        estimated_benefit_pct: finding.impact_pct * 0.7,
                        implementation_effort: ImplementationEffort::Medium,
                        prerequisites: vec!["Gather execution statistics".to_string()],
                        risks: vec!["Plan instability".to_string()],
                        validation_steps: vec!["Compare before/after metrics".to_string()],
                    });
                    rec_id += 1;
                }
                _ => {}
            }
        }

        Ok(recommendations)
    }

    /// Detect CPU bottleneck
    fn detect_cpu_bottleneck(&self) -> Result<Option<f64>> {
        // Simplified detection - in real implementation, would analyze actual metrics
        let cpu_usage = 85.0; // Simulated high CPU usage
        if cpu_usage > 80.0 {
            Ok(Some(cpu_usage))
        } else {
            Ok(None)
        }
    }

    /// Detect I/O bottleneck
    fn detect_io_bottleneck(&self) -> Result<Option<f64>> {
        let io_wait_pct = 35.0; // Simulated I/O wait percentage
        if io_wait_pct > 30.0 {
            Ok(Some(io_wait_pct))
        } else {
            Ok(None)
        }
    }

    /// Detect memory pressure
    fn detect_memory_pressure(&self) -> Result<Option<f64>> {
        let memory_usage = 92.0; // Simulated memory usage
        if memory_usage > 90.0 {
            Ok(Some(memory_usage))
        } else {
            Ok(None)
        }
    }

    /// Detect lock contention
    fn detect_lock_contention(&self) -> Result<Option<f64>> {
        let lock_wait_pct = 12.0; // Simulated lock wait percentage
        if lock_wait_pct > 10.0 {
            Ok(Some(lock_wait_pct))
        } else {
            Ok(None)
        }
    }

    /// Detect suboptimal SQL
    fn detect_suboptimal_sql(&self) -> Result<Option<Vec<f64>>> {
        // Return impact percentages for suboptimal SQL statements
        Ok(Some(vec![15.0, 8.0, 6.5]))
    }

    /// Get findings for an analysis
    pub fn get_findings(&self, analysis_id: AnalysisId) -> Option<Vec<Finding>> {
        self.findings.read().get(&analysis_id).cloned()
    }

    /// Get recommendations for an analysis
    pub fn get_recommendations(&self, analysis_id: AnalysisId) -> Option<Vec<Recommendation>> {
        self.recommendations.read().get(&analysis_id).cloned()
    }

    /// Get analysis summary
    pub fn get_analysis_summary(&self, analysis_id: AnalysisId) -> Result<AnalysisSummary> {
        let findings = self.findings.read();
        let recommendations = self.recommendations.read();

        let findings_vec = findings
            .get(&analysis_id)
            .ok_or_else(|| DbError::NotFound(format!("Analysis {} not found", analysis_id)))?);

        let empty_recs = Vec::new();
        let recommendations_vec = recommendations.get(&analysis_id).unwrap_or(&empty_recs);

        let critical_count = findings_vec
            .iter()
            .filter(|f| f.severity == FindingSeverity::Critical)
            .count();

        let high_count = findings_vec
            .iter()
            .filter(|f| f.severity == FindingSeverity::High)
            .count();

        let total_impact: f64 = findings_vec.iter().map(|f| f.impact_pct).sum();

        let mut top_findings: Vec<Finding> = findings_vec.clone();
        top_findings.sort_by(|a, b| b.impact_pct.partial_cmp(&a.impact_pct).unwrap());
        top_findings.truncate(5);

        let mut top_recs: Vec<Recommendation> = recommendations_vec.clone();
        top_recs.sort_by(|a, b| b.estimated_benefit_pct.partial_cmp(&a.estimated_benefit_pct).unwrap());
        top_recs.truncate(5);

        Ok(AnalysisSummary {
            analysis_id,
            total_findings: findings_vec.len(),
            critical_findings: critical_count,
            high_findings: high_count,
            total_recommendations: recommendations_vec.len(),
            top_findings,
            top_recommendations: top_recs,
            performance_impact_pct: total_impact,
        })
    }

    /// Create performance baseline
    pub fn create_baseline(&self, name: String, metrics: BaselineMetrics) -> Result<()> {
        let baseline = PerformanceBaseline {
            baseline_name: name.clone(),
            metrics,
            created_time: SystemTime::now(),
        };

        self.baselines.write().insert(name, baseline);
        Ok(())
    }

    /// Get all analysis runs
    pub fn list_analyses(&self) -> Vec<AnalysisRun> {
        self.analysis_runs.read().values().cloned().collect()
    }
}

impl Default for DiagnosticAdvisor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_analysis() {
        let advisor = DiagnosticAdvisor::new();
        let analysis_id = advisor
            .create_analysis(
                "test_analysis".to_string(),
                1,
                10,
                AnalysisScope::Database,
            )
            .unwrap();

        assert_eq!(analysis_id, 1);
    }

    #[test]
    fn test_execute_analysis() {
        let advisor = DiagnosticAdvisor::new();
        let analysis_id = advisor
            .create_analysis(
                "test_analysis".to_string(),
                1,
                10,
                AnalysisScope::Database,
            )
            .unwrap();

        advisor.execute_analysis(analysis_id).unwrap();

        let findings = advisor.get_findings(analysis_id);
        assert!(findings.is_some());
        assert!(!findings.unwrap().is_empty());

        let recommendations = advisor.get_recommendations(analysis_id);
        assert!(recommendations.is_some());
    }

    #[test]
    fn test_analysis_summary() {
        let advisor = DiagnosticAdvisor::new();
        let analysis_id = advisor
            .create_analysis(
                "test_analysis".to_string(),
                1,
                10,
                AnalysisScope::Database,
            )
            .unwrap();

        advisor.execute_analysis(analysis_id).unwrap();

        let summary = advisor.get_analysis_summary(analysis_id).unwrap();
        assert!(summary.total_findings > 0);
        assert!(summary.total_recommendations > 0);
    }
}


