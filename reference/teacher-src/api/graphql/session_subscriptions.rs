// GraphQL Session & Connection Subscriptions
//
// Real-time subscriptions for session and connection pool monitoring:
// - Session lifecycle events
// - Connection pool state changes
// - Session resource usage
// - Connection metrics

use async_graphql::{Context, Enum, Object, SimpleObject, Subscription, ID};
use futures_util::stream::Stream;
use futures_util::StreamExt;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use serde::{Deserialize, Serialize};

use super::types::{DateTime, BigInt};

// ============================================================================
// Session Event Types
// ============================================================================

/// Session lifecycle event
#[derive(Clone, Debug)]
pub struct SessionLifecycleEvent {
    pub session_id: ID,
    pub event_type: SessionEventType,
    pub user_id: String,
    pub database: String,
    pub client_ip: String,
    pub client_port: i32,
    pub client_application: Option<String>,
    pub protocol: String,
    pub encryption_enabled: bool,
    pub authentication_method: String,
    pub session_start_time: Option<DateTime>,
    pub session_end_time: Option<DateTime>,
    pub duration_seconds: Option<i64>,
    pub queries_executed: Option<i64>,
    pub transactions_committed: Option<i64>,
    pub transactions_aborted: Option<i64>,
    pub bytes_sent: Option<BigInt>,
    pub bytes_received: Option<BigInt>,
    pub last_activity: Option<DateTime>,
    pub disconnect_reason: Option<String>,
    pub timestamp: DateTime,
}

#[Object]
impl SessionLifecycleEvent {
    async fn session_id(&self) -> &ID {
        &self.session_id
    }

    async fn event_type(&self) -> SessionEventType {
        self.event_type
    }

    async fn user_id(&self) -> &str {
        &self.user_id
    }

    async fn database(&self) -> &str {
        &self.database
    }

    async fn client_ip(&self) -> &str {
        &self.client_ip
    }

    async fn client_port(&self) -> i32 {
        self.client_port
    }

    async fn client_application(&self) -> &Option<String> {
        &self.client_application
    }

    async fn protocol(&self) -> &str {
        &self.protocol
    }

    async fn encryption_enabled(&self) -> bool {
        self.encryption_enabled
    }

    async fn authentication_method(&self) -> &str {
        &self.authentication_method
    }

    async fn session_start_time(&self) -> &Option<DateTime> {
        &self.session_start_time
    }

    async fn session_end_time(&self) -> &Option<DateTime> {
        &self.session_end_time
    }

    async fn duration_seconds(&self) -> Option<i64> {
        self.duration_seconds
    }

    async fn queries_executed(&self) -> Option<i64> {
        self.queries_executed
    }

    async fn transactions_committed(&self) -> Option<i64> {
        self.transactions_committed
    }

    async fn transactions_aborted(&self) -> Option<i64> {
        self.transactions_aborted
    }

    async fn bytes_sent(&self) -> &Option<BigInt> {
        &self.bytes_sent
    }

    async fn bytes_received(&self) -> &Option<BigInt> {
        &self.bytes_received
    }

    async fn last_activity(&self) -> &Option<DateTime> {
        &self.last_activity
    }

    async fn disconnect_reason(&self) -> &Option<String> {
        &self.disconnect_reason
    }

    async fn timestamp(&self) -> &DateTime {
        &self.timestamp
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum SessionEventType {
    Connected,
    Authenticated,
    Idle,
    Active,
    Disconnected,
    Terminated,
    TimedOut,
}

/// Session resource usage event
#[derive(Clone, Debug, SimpleObject)]
pub struct SessionResourceEvent {
    pub session_id: ID,
    pub user_id: String,
    pub cpu_time_ms: i64,
    pub memory_used_bytes: BigInt,
    pub temp_space_used_bytes: BigInt,
    pub queries_active: i32,
    pub locks_held: i32,
    pub transaction_active: bool,
    pub transaction_age_seconds: Option<i64>,
    pub last_query: Option<String>,
    pub wait_event: Option<String>,
    pub timestamp: DateTime,
}

// ============================================================================
// Connection Pool Event Types
// ============================================================================

/// Connection pool state change event
#[derive(Clone, Debug)]
pub struct ConnectionPoolStateEvent {
    pub pool_id: String,
    pub event_type: PoolEventType,
    pub total_connections: i32,
    pub active_connections: i32,
    pub idle_connections: i32,
    pub waiting_connections: i32,
    pub failed_connections: i32,
    pub max_connections: i32,
    pub min_connections: i32,
    pub avg_wait_time_ms: f64,
    pub max_wait_time_ms: i64,
    pub connection_acquisition_rate: f64,
    pub connection_release_rate: f64,
    pub pool_utilization_percent: f64,
    pub health_check_failures: i32,
    pub last_connection_error: Option<String>,
    pub timestamp: DateTime,
}

#[Object]
impl ConnectionPoolStateEvent {
    async fn pool_id(&self) -> &str {
        &self.pool_id
    }

    async fn event_type(&self) -> PoolEventType {
        self.event_type
    }

    async fn total_connections(&self) -> i32 {
        self.total_connections
    }

    async fn active_connections(&self) -> i32 {
        self.active_connections
    }

    async fn idle_connections(&self) -> i32 {
        self.idle_connections
    }

    async fn waiting_connections(&self) -> i32 {
        self.waiting_connections
    }

    async fn failed_connections(&self) -> i32 {
        self.failed_connections
    }

    async fn max_connections(&self) -> i32 {
        self.max_connections
    }

    async fn min_connections(&self) -> i32 {
        self.min_connections
    }

    async fn avg_wait_time_ms(&self) -> f64 {
        self.avg_wait_time_ms
    }

    async fn max_wait_time_ms(&self) -> i64 {
        self.max_wait_time_ms
    }

    async fn connection_acquisition_rate(&self) -> f64 {
        self.connection_acquisition_rate
    }

    async fn connection_release_rate(&self) -> f64 {
        self.connection_release_rate
    }

    async fn pool_utilization_percent(&self) -> f64 {
        self.pool_utilization_percent
    }

    async fn health_check_failures(&self) -> i32 {
        self.health_check_failures
    }

    async fn last_connection_error(&self) -> &Option<String> {
        &self.last_connection_error
    }

    async fn timestamp(&self) -> &DateTime {
        &self.timestamp
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum PoolEventType {
    ConnectionCreated,
    ConnectionDestroyed,
    ConnectionAcquired,
    ConnectionReleased,
    PoolExpanded,
    PoolShrunk,
    HealthCheckFailed,
    WaitTimeoutExceeded,
    CapacityReached,
}

/// Individual connection event
#[derive(Clone, Debug, SimpleObject)]
pub struct ConnectionEvent {
    pub connection_id: ID,
    pub pool_id: String,
    pub event_type: String,
    pub state: ConnectionState,
    pub session_id: Option<ID>,
    pub created_at: DateTime,
    pub last_used_at: Option<DateTime>,
    pub age_seconds: i64,
    pub idle_seconds: i64,
    pub usage_count: i64,
    pub health_status: ConnectionHealthStatus,
    pub timestamp: DateTime,
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum ConnectionState {
    Idle,
    Active,
    Reserved,
    Failed,
    Closed,
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum ConnectionHealthStatus {
    Healthy,
    Stale,
    Unhealthy,
    Unknown,
}

// ============================================================================
// Session & Connection Subscription Root
// ============================================================================

/// Session and Connection Pool subscription operations
pub struct SessionSubscriptionRoot;

#[Subscription]
impl SessionSubscriptionRoot {
    /// Subscribe to session lifecycle events
    ///
    /// Receives real-time notifications about session connections,
    /// disconnections, and state changes.
    ///
    /// # Arguments
    /// * `user_id` - Optional filter by user
    /// * `event_types` - Optional filter by event types
    async fn session_events<'ctx>(
        &self,
        user_id: Option<String>,
        event_types: Option<Vec<SessionEventType>>,
    ) -> impl Stream<Item = SessionLifecycleEvent> + 'ctx {
        let (tx, rx) = broadcast::channel(1000);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(8));
            let events = vec![
                SessionEventType::Connected,
                SessionEventType::Authenticated,
                SessionEventType::Active,
                SessionEventType::Disconnected,
            ];
            let mut counter = 0;

            loop {
                interval.tick().await;
                counter += 1;

                let event_type = events[counter % events.len()];

                let event = SessionLifecycleEvent {
                    session_id: ID::from(format!("session_{}", uuid::Uuid::new_v4())),
                    event_type,
                    user_id: "user_alice".to_string(),
                    database: "production".to_string(),
                    client_ip: "192.168.1.100".to_string(),
                    client_port: 50000 + (counter % 1000) as i32,
                    client_application: Some("RustyDB Client v1.0".to_string()),
                    protocol: "PostgreSQL".to_string(),
                    encryption_enabled: true,
                    authentication_method: "SCRAM-SHA-256".to_string(),
                    session_start_time: if matches!(event_type, SessionEventType::Connected | SessionEventType::Authenticated) {
                        Some(DateTime::now())
                    } else {
                        None
                    },
                    session_end_time: if matches!(event_type, SessionEventType::Disconnected | SessionEventType::Terminated) {
                        Some(DateTime::now())
                    } else {
                        None
                    },
                    duration_seconds: if matches!(event_type, SessionEventType::Disconnected) {
                        Some(3600 + (counter as i64 * 120))
                    } else {
                        None
                    },
                    queries_executed: if matches!(event_type, SessionEventType::Disconnected) {
                        Some(150 + counter as i64)
                    } else {
                        None
                    },
                    transactions_committed: if matches!(event_type, SessionEventType::Disconnected) {
                        Some(45 + (counter as i64 / 3))
                    } else {
                        None
                    },
                    transactions_aborted: if matches!(event_type, SessionEventType::Disconnected) {
                        Some(2)
                    } else {
                        None
                    },
                    bytes_sent: if matches!(event_type, SessionEventType::Disconnected) {
                        Some(BigInt(5242880 + counter as i64 * 1000))
                    } else {
                        None
                    },
                    bytes_received: if matches!(event_type, SessionEventType::Disconnected) {
                        Some(BigInt(1048576 + counter as i64 * 500))
                    } else {
                        None
                    },
                    last_activity: Some(DateTime::now()),
                    disconnect_reason: if matches!(event_type, SessionEventType::Disconnected) {
                        Some("Client closed connection".to_string())
                    } else {
                        None
                    },
                    timestamp: DateTime::now(),
                };

                let _ = tx.send(event);
            }
        });

        let user_id = user_id.clone();
        let event_types = event_types.clone();

        BroadcastStream::new(rx).filter_map(move |result| {
            let user_id = user_id.clone();
            let event_types = event_types.clone();

            async move {
                result.ok().and_then(|event| {
                    // Filter by user
                    if let Some(ref uid) = user_id {
                        if &event.user_id != uid {
                            return None;
                        }
                    }

                    // Filter by event types
                    if let Some(ref types) = event_types {
                        if !types.contains(&event.event_type) {
                            return None;
                        }
                    }

                    Some(event)
                })
            }
        })
    }

    /// Subscribe to session resource usage
    ///
    /// Receives periodic updates about session resource consumption
    /// including CPU, memory, and lock usage.
    async fn session_resource_usage<'ctx>(
        &self,
        session_id: Option<ID>,
        interval_seconds: Option<i32>,
    ) -> impl Stream<Item = SessionResourceEvent> + 'ctx {
        let interval = Duration::from_secs(interval_seconds.unwrap_or(10) as u64);

        async_stream::stream! {
            let mut interval_timer = tokio::time::interval(interval);
            let mut counter = 0;

            loop {
                interval_timer.tick().await;
                counter += 1;

                yield SessionResourceEvent {
                    session_id: session_id.clone().unwrap_or_else(|| ID::from("session_default")),
                    user_id: "user_bob".to_string(),
                    cpu_time_ms: 12500 + (counter * 500),
                    memory_used_bytes: BigInt(16777216 + (counter as i64 * 1024)),
                    temp_space_used_bytes: BigInt(5242880),
                    queries_active: 2,
                    locks_held: 5,
                    transaction_active: true,
                    transaction_age_seconds: Some(45 + counter as i64),
                    last_query: Some("UPDATE orders SET status = 'processed' WHERE id = ?".to_string()),
                    wait_event: None,
                    timestamp: DateTime::now(),
                };
            }
        }
    }

    /// Subscribe to connection pool events
    ///
    /// Receives real-time updates about connection pool state changes
    /// and connection lifecycle events.
    ///
    /// # Arguments
    /// * `pool_id` - Optional filter by pool identifier
    /// * `event_types` - Optional filter by event types
    async fn connection_pool_events<'ctx>(
        &self,
        pool_id: Option<String>,
        event_types: Option<Vec<PoolEventType>>,
    ) -> impl Stream<Item = ConnectionPoolStateEvent> + 'ctx {
        let (tx, rx) = broadcast::channel(1000);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(5));
            let events = vec![
                PoolEventType::ConnectionCreated,
                PoolEventType::ConnectionAcquired,
                PoolEventType::ConnectionReleased,
                PoolEventType::PoolExpanded,
            ];
            let mut counter = 0;
            let mut active = 25;

            loop {
                interval.tick().await;
                counter += 1;

                let event_type = events[counter % events.len()];

                // Simulate pool dynamics
                match event_type {
                    PoolEventType::ConnectionAcquired => active = (active + 1).min(90),
                    PoolEventType::ConnectionReleased => active = (active - 1).max(10),
                    PoolEventType::PoolExpanded => active += 5,
                    _ => {}
                }

                let total = 100;
                let idle = total - active;
                let utilization = (active as f64 / total as f64) * 100.0;

                let event = ConnectionPoolStateEvent {
                    pool_id: "main_pool".to_string(),
                    event_type,
                    total_connections: total,
                    active_connections: active,
                    idle_connections: idle,
                    waiting_connections: if active > 85 { 3 } else { 0 },
                    failed_connections: 0,
                    max_connections: 100,
                    min_connections: 10,
                    avg_wait_time_ms: if active > 85 { 45.5 } else { 5.2 },
                    max_wait_time_ms: if active > 85 { 250 } else { 15 },
                    connection_acquisition_rate: 15.5,
                    connection_release_rate: 14.8,
                    pool_utilization_percent: utilization,
                    health_check_failures: 0,
                    last_connection_error: None,
                    timestamp: DateTime::now(),
                };

                let _ = tx.send(event);
            }
        });

        let pool_id = pool_id.clone();
        let event_types = event_types.clone();

        BroadcastStream::new(rx).filter_map(move |result| {
            let pool_id = pool_id.clone();
            let event_types = event_types.clone();

            async move {
                result.ok().and_then(|event| {
                    // Filter by pool ID
                    if let Some(ref pid) = pool_id {
                        if &event.pool_id != pid {
                            return None;
                        }
                    }

                    // Filter by event types
                    if let Some(ref types) = event_types {
                        if !types.contains(&event.event_type) {
                            return None;
                        }
                    }

                    Some(event)
                })
            }
        })
    }

    /// Subscribe to individual connection events
    ///
    /// Receives events for individual connections in the pool.
    async fn connection_events<'ctx>(
        &self,
        pool_id: Option<String>,
        interval_seconds: Option<i32>,
    ) -> impl Stream<Item = ConnectionEvent> + 'ctx {
        let interval = Duration::from_secs(interval_seconds.unwrap_or(10) as u64);

        async_stream::stream! {
            let mut interval_timer = tokio::time::interval(interval);
            let mut counter = 0;

            loop {
                interval_timer.tick().await;
                counter += 1;

                yield ConnectionEvent {
                    connection_id: ID::from(format!("conn_{}", uuid::Uuid::new_v4())),
                    pool_id: pool_id.clone().unwrap_or_else(|| "main_pool".to_string()),
                    event_type: "state_change".to_string(),
                    state: if counter % 2 == 0 {
                        ConnectionState::Active
                    } else {
                        ConnectionState::Idle
                    },
                    session_id: Some(ID::from(format!("session_{}", counter % 10))),
                    created_at: DateTime::now(),
                    last_used_at: Some(DateTime::now()),
                    age_seconds: 3600 + (counter as i64 * 60),
                    idle_seconds: if counter % 2 == 0 { 0 } else { 120 },
                    usage_count: 45 + counter as i64,
                    health_status: ConnectionHealthStatus::Healthy,
                    timestamp: DateTime::now(),
                };
            }
        }
    }
}
