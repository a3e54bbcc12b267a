//! Fan-out of dashboard events to every live viewer.

use std::sync::Arc;

use simdash_core::{DashboardError, DashboardEvent, StateSnapshot};
use tracing::{debug, error};

use crate::channel::ViewerChannel;
use crate::registry::{SubscriberRegistry, ViewerId};

/// What happened to one published event.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PublishReport {
    pub delivered: usize,
    pub pruned: usize,
}

/// Serializes each event once and pushes it to every registered viewer.
///
/// Delivery is best-effort per viewer: a failed send drops that viewer and
/// never reaches the publisher.
#[derive(Default)]
pub struct BroadcastCoordinator {
    registry: SubscriberRegistry,
}

impl BroadcastCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&mut self, event: &DashboardEvent) -> PublishReport {
        if self.registry.is_empty() {
            return PublishReport::default();
        }

        let payload: Arc<str> = match serde_json::to_string(event) {
            Ok(json) => json.into(),
            Err(e) => {
                error!(event = %event, error = %e, "Failed to serialize dashboard event");
                return PublishReport::default();
            }
        };

        let mut report = PublishReport::default();
        let mut failed = Vec::new();
        for (id, channel) in self.registry.iter() {
            match channel.send(Arc::clone(&payload)) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    let failure = DashboardError::delivery_failure(*id, e.to_string());
                    debug!(event = %event, error = %failure, "Dropping viewer");
                    failed.push(*id);
                }
            }
        }

        for id in &failed {
            self.registry.unregister(id);
        }
        report.pruned = failed.len();
        report
    }

    /// Register a viewer and send it `snapshot` as its `init` event.
    pub fn register(
        &mut self,
        channel: Box<dyn ViewerChannel>,
        snapshot: StateSnapshot,
    ) -> Option<ViewerId> {
        let init = match serde_json::to_string(&DashboardEvent::Init(snapshot)) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "Failed to serialize initial snapshot");
                return None;
            }
        };
        self.registry.register(channel, init.into())
    }

    pub fn unregister(&mut self, id: &ViewerId) -> bool {
        self.registry.unregister(id)
    }

    pub fn registry(&self) -> &SubscriberRegistry {
        &self.registry
    }
}
