//! Periodic per-category refresh.
//!
//! Each category gets its own polling task that fetches on an interval and
//! replaces the category's snapshot in the entity store.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::backend::Backend;
use crate::category::CategoryConfig;
use crate::store::EntityStore;


/// Polling cadence configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PollConfig {
    /// Seconds between refresh fetches, applied to every category
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
}

fn default_interval() -> u64 {
    10
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval(),
        }
    }
}

/// Status information for one category's polling loop.
#[derive(Clone, Debug, Default)]
pub struct PollStatus {
    /// Last successful poll timestamp
    pub last_poll: Option<DateTime<Utc>>,
    /// Last error message (if any)
    pub last_error: Option<String>,
    /// Total number of successful polls
    pub poll_count: u64,
    /// Total number of failed polls
    pub error_count: u64,
}

/// Polling loop for a single category.
///
/// Fetches once immediately on start and on every interval tick thereafter,
/// until the returned handle is aborted. A failed fetch leaves the snapshot
/// untouched; the next natural tick is the only retry.
pub struct Poller {
    category: CategoryConfig,
    backend: Arc<dyn Backend>,
    store: Arc<EntityStore>,
    poll_interval: Duration,
    status: Arc<tokio::sync::Mutex<PollStatus>>,
}

impl Poller {
    pub fn new(
        category: CategoryConfig,
        backend: Arc<dyn Backend>,
        store: Arc<EntityStore>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            category,
            backend,
            store,
            poll_interval,
            status: Arc::new(tokio::sync::Mutex::new(PollStatus::default())),
        }
    }

    /// Returns a clone of the status tracker for external monitoring.
    pub fn status(&self) -> Arc<tokio::sync::Mutex<PollStatus>> {
        Arc::clone(&self.status)
    }

    /// Starts the polling loop (non-blocking).
    ///
    /// The first tick fires immediately. Fetches are awaited inline, so at
    /// most one fetch per category is in flight and results are applied in
    /// the order they were issued; a slow fetch delays the next tick rather
    /// than overlapping it. Aborting the returned handle stops the loop and
    /// discards any in-flight fetch at its await point.
    pub fn start(self) -> JoinHandle<()> {
        let name = self.category.name.clone();

        tokio::spawn(async move {
            info!(
                category = %name,
                interval_secs = self.poll_interval.as_secs(),
                "Starting category poller"
            );

            let mut ticker = interval(self.poll_interval);

            loop {
                ticker.tick().await;

                debug!(category = %name, "Refreshing category");

                match self.backend.fetch(&self.category).await {
                    Ok(entities) => {
                        self.store.replace_all(&name, entities);

                        let mut status = self.status.lock().await;
                        status.last_poll = Some(Utc::now());
                        status.last_error = None;
                        status.poll_count += 1;
                    }
                    Err(e) => {
                        warn!(
                            category = %name,
                            error = %e,
                            "Refresh failed, keeping previous snapshot"
                        );

                        let mut status = self.status.lock().await;
                        status.last_error = Some(e.to_string());
                        status.error_count += 1;
                    }
                }
            }
        })
    }
}

/// Tracks one polling task per category and aborts them all on shutdown.
pub struct PollerSet {
    handles: HashMap<String, JoinHandle<()>>,
    statuses: HashMap<String, Arc<tokio::sync::Mutex<PollStatus>>>,
}

impl PollerSet {
    pub fn new() -> Self {
        Self {
            handles: HashMap::new(),
            statuses: HashMap::new(),
        }
    }

    /// Spawns a poller for `category`, aborting any existing poller
    /// registered under the same name first.
    pub fn spawn(
        &mut self,
        category: CategoryConfig,
        backend: Arc<dyn Backend>,
        store: Arc<EntityStore>,
        poll_interval: Duration,
    ) {
        let name = category.name.clone();
        let poller = Poller::new(category, backend, store, poll_interval);

        self.statuses.insert(name.clone(), poller.status());
        if let Some(old) = self.handles.insert(name.clone(), poller.start()) {
            old.abort();
            info!(category = %name, "Aborted existing poller before restart");
        }
    }

    /// Status tracker for a category's poller, if one is running.
    pub fn status(&self, category: &str) -> Option<Arc<tokio::sync::Mutex<PollStatus>>> {
        self.statuses.get(category).map(Arc::clone)
    }

    /// Stops every polling loop.
    ///
    /// In-flight fetches are dropped at their await point; their results are
    /// never applied to the store.
    pub fn shutdown(&mut self) {
        let count = self.handles.len();
        if count > 0 {
            info!(poller_count = count, "Aborting category pollers");
        }
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
    }
}

impl Default for PollerSet {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PollerSet {
    fn drop(&mut self) {
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
    }
}
