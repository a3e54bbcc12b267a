//! Ingress API of the dashboard.
//!
//! The automation server calls `begin` before running a tool and `complete` after it.
//! Every mutation updates the store and publishes its event under one lock, so viewers
//! see events in exactly the order the store changed.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use simdash_core::{
    Arguments, DashboardError, DashboardEvent, EventStore, Outcome, Properties, StateSnapshot,
    StoreConfig,
};
use simdash_logging::ActivityLog;
use tokio::sync::Mutex;
use tracing::error;

use crate::broadcast::BroadcastCoordinator;
use crate::channel::ViewerChannel;
use crate::registry::ViewerId;

/// Reference to a started tool call, used to complete it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordHandle {
    id: u64,
    name: String,
}

impl RecordHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Counters for the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub uptime_seconds: u64,
    pub viewers: usize,
    pub retained: usize,
    pub total_count: u64,
}

struct Inner {
    store: EventStore,
    coordinator: BroadcastCoordinator,
}

/// Cloneable handle to the dashboard state and its viewers.
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<Mutex<Inner>>,
}

impl Dashboard {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                store: EventStore::with_config(config),
                coordinator: BroadcastCoordinator::new(),
            })),
        }
    }

    /// Log the start of a tool call and announce it as `record-created`.
    pub async fn begin(&self, name: impl Into<String>, arguments: Arguments) -> RecordHandle {
        let mut inner = self.inner.lock().await;
        let record = inner.store.begin(name, arguments);
        ActivityLog::begin(&record);
        inner
            .coordinator
            .publish(&DashboardEvent::RecordCreated(record.view()));
        RecordHandle {
            id: record.id,
            name: record.name,
        }
    }

    /// Finish a tool call and announce it as `record-updated`.
    ///
    /// Completing the same handle twice is a caller bug and returns `InvalidState`.
    pub async fn complete(
        &self,
        handle: &RecordHandle,
        outcome: Outcome,
    ) -> Result<(), DashboardError> {
        let mut inner = self.inner.lock().await;
        let record = inner.store.complete(handle.id, outcome).map_err(|e| {
            error!(
                record_id = handle.id,
                tool = %handle.name,
                error = %e,
                "Rejected tool call completion"
            );
            e
        })?;
        ActivityLog::complete(&record);
        inner
            .coordinator
            .publish(&DashboardEvent::RecordUpdated(record.view()));
        Ok(())
    }

    /// `complete` for callers holding a loose result/error pair.
    pub async fn complete_parts(
        &self,
        handle: &RecordHandle,
        result: Option<String>,
        error: Option<String>,
    ) -> Result<(), DashboardError> {
        self.complete(handle, Outcome::from_parts(result, error)).await
    }

    /// Run `call` as a logged tool call and hand back its result untouched.
    pub async fn track<F, E>(
        &self,
        name: impl Into<String>,
        arguments: Arguments,
        call: F,
    ) -> Result<String, E>
    where
        F: Future<Output = Result<String, E>>,
        E: std::fmt::Display,
    {
        let handle = self.begin(name, arguments).await;
        let res = call.await;
        let outcome = match &res {
            Ok(out) => Outcome::Success(out.clone()),
            Err(e) => Outcome::Failure(e.to_string()),
        };
        // a fresh handle cannot be terminal; the error is logged by `complete`
        let _ = self.complete(&handle, outcome).await;
        res
    }

    pub async fn set_device_info(&self, info: Properties) {
        let mut inner = self.inner.lock().await;
        inner.store.set_device_info(info.clone());
        inner.coordinator.publish(&DashboardEvent::DeviceInfo(info));
    }

    pub async fn set_bridge_status(&self, status: Properties) {
        let mut inner = self.inner.lock().await;
        inner.store.set_bridge_status(status.clone());
        inner
            .coordinator
            .publish(&DashboardEvent::BridgeStatus(status));
    }

    /// Pull-style view of the current state; same shape as the `init` event.
    pub async fn snapshot(&self) -> StateSnapshot {
        self.inner.lock().await.store.snapshot()
    }

    /// Register a viewer. It receives `init` before any later delta.
    pub async fn subscribe(&self, channel: impl ViewerChannel + 'static) -> Option<ViewerId> {
        let mut inner = self.inner.lock().await;
        let snapshot = inner.store.snapshot();
        inner.coordinator.register(Box::new(channel), snapshot)
    }

    pub async fn unsubscribe(&self, id: &ViewerId) -> bool {
        self.inner.lock().await.coordinator.unregister(id)
    }

    pub async fn viewer_count(&self) -> usize {
        self.inner.lock().await.coordinator.registry().len()
    }

    pub async fn last_screenshot_path(&self) -> Option<String> {
        self.inner
            .lock()
            .await
            .store
            .last_screenshot_path()
            .map(str::to_string)
    }

    pub async fn stats(&self) -> DashboardStats {
        let inner = self.inner.lock().await;
        DashboardStats {
            uptime_seconds: inner.store.uptime_secs(),
            viewers: inner.coordinator.registry().len(),
            retained: inner.store.len(),
            total_count: inner.store.total_count(),
        }
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}
