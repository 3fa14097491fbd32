//! In-process progress tracking for analysis sessions.
//!
//! Keeps the latest snapshot per session for polling and a broadcast channel
//! per session for SSE subscribers. At most `max_sessions` snapshots are kept,
//! evicting the least recently updated first. Completed snapshots are dropped
//! by [`ProgressHub::cleanup`] once they are an hour old.
//!
//! # Usage
//!
//! Producers (the pipeline, via [`SessionProgress`]):
//!   hub.update("session_1_ab12cd34", 3, 13, "Mapeando drivers mentais").await;
//!
//! Consumers (SSE endpoints):
//!   let rx = hub.subscribe("session_1_ab12cd34").await;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};

use super::ProgressSink;

pub const DEFAULT_MAX_SESSIONS: usize = 1_000;

const COMPLETED_RETENTION_MINUTES: i64 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub session_id: String,
    pub current_step: usize,
    pub total_steps: usize,
    pub message: String,
    pub percentage: f64,
    pub completed: bool,
    pub updated_at: DateTime<Utc>,
}

impl ProgressSnapshot {
    fn new(session_id: &str, step: usize, total: usize, message: &str, completed: bool) -> Self {
        let percentage = if total == 0 {
            0.0
        } else {
            ((step as f64 / total as f64) * 1000.0).round() / 10.0
        };
        Self {
            session_id: session_id.to_string(),
            current_step: step,
            total_steps: total,
            message: message.to_string(),
            percentage,
            completed,
            updated_at: Utc::now(),
        }
    }
}

/// Thread-safe, cloneable. Keyed by session id.
#[derive(Clone)]
pub struct ProgressHub {
    /// Least recently updated session first.
    snapshots: Arc<RwLock<IndexMap<String, ProgressSnapshot>>>,
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<ProgressSnapshot>>>>,
    capacity: usize,
    max_sessions: usize,
}

impl ProgressHub {
    /// Create a hub with default capacity (64 events per session).
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_limits(capacity, DEFAULT_MAX_SESSIONS)
    }

    pub fn with_limits(capacity: usize, max_sessions: usize) -> Self {
        Self {
            snapshots: Arc::new(RwLock::new(IndexMap::new())),
            channels: Arc::new(RwLock::new(HashMap::new())),
            capacity,
            max_sessions: max_sessions.max(1),
        }
    }

    pub async fn update(&self, session_id: &str, step: usize, total: usize, message: &str) {
        self.publish(ProgressSnapshot::new(session_id, step, total, message, false))
            .await;
    }

    pub async fn complete(&self, session_id: &str) {
        let total = self
            .snapshot(session_id)
            .await
            .map(|s| s.total_steps)
            .unwrap_or(0);
        self.publish(ProgressSnapshot::new(
            session_id,
            total,
            total,
            "Análise concluída",
            true,
        ))
        .await;
    }

    async fn publish(&self, snapshot: ProgressSnapshot) {
        {
            let mut snapshots = self.snapshots.write().await;
            snapshots.shift_remove(&snapshot.session_id);
            snapshots.insert(snapshot.session_id.clone(), snapshot.clone());
            while snapshots.len() > self.max_sessions {
                snapshots.shift_remove_index(0);
            }
        }

        let channels = self.channels.read().await;
        if let Some(tx) = channels.get(&snapshot.session_id) {
            // Ignore send errors (no active receivers)
            let _ = tx.send(snapshot);
        }
    }

    pub async fn snapshot(&self, session_id: &str) -> Option<ProgressSnapshot> {
        self.snapshots.read().await.get(session_id).cloned()
    }

    /// Subscribe to a session. Creates the channel if it doesn't exist.
    pub async fn subscribe(&self, session_id: &str) -> broadcast::Receiver<ProgressSnapshot> {
        let mut channels = self.channels.write().await;
        let tx = channels
            .entry(session_id.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0);
        tx.subscribe()
    }

    /// Remove channels with zero subscribers and expired completed snapshots.
    pub async fn cleanup(&self) {
        let mut channels = self.channels.write().await;
        channels.retain(|_, tx| tx.receiver_count() > 0);
        drop(channels);

        let cutoff = Utc::now() - Duration::minutes(COMPLETED_RETENTION_MINUTES);
        self.snapshots
            .write()
            .await
            .retain(|_, s| !s.completed || s.updated_at > cutoff);
    }

    pub fn sink(&self, session_id: impl Into<String>) -> SessionProgress {
        SessionProgress {
            hub: self.clone(),
            session_id: session_id.into(),
        }
    }
}

impl Default for ProgressHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Pipeline progress sink bound to one session.
pub struct SessionProgress {
    hub: ProgressHub,
    session_id: String,
}

#[async_trait]
impl ProgressSink for SessionProgress {
    async fn on_stage(&self, step: usize, total: usize, message: &str) {
        self.hub.update(&self.session_id, step, total, message).await;
    }

    async fn on_complete(&self) {
        self.hub.complete(&self.session_id).await;
        self.hub.cleanup().await;
    }
}
