//! Live Viewer Registry.
//!
//! Tracks the channels of connected dashboard viewers.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::channel::ViewerChannel;

pub type ViewerId = Uuid;

/// The set of currently connected viewers.
///
/// Not synchronized on its own; it lives inside the dashboard's single lock.
#[derive(Default)]
pub struct SubscriberRegistry {
    viewers: HashMap<ViewerId, Box<dyn ViewerChannel>>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a viewer, handing it `init` before it can see anything else.
    ///
    /// A channel that cannot take `init` is dropped and `None` is returned.
    pub fn register(
        &mut self,
        channel: Box<dyn ViewerChannel>,
        init: Arc<str>,
    ) -> Option<ViewerId> {
        let id = Uuid::new_v4();
        if let Err(e) = channel.send(init) {
            warn!(viewer = %id, error = %e, "Viewer rejected initial snapshot");
            return None;
        }
        self.viewers.insert(id, channel);
        debug!(viewer = %id, viewers = self.viewers.len(), "Viewer registered");
        Some(id)
    }

    /// Remove a viewer. Removing an unknown viewer is a no-op.
    pub fn unregister(&mut self, id: &ViewerId) -> bool {
        let removed = self.viewers.remove(id).is_some();
        if removed {
            debug!(viewer = %id, viewers = self.viewers.len(), "Viewer unregistered");
        }
        removed
    }

    pub fn contains(&self, id: &ViewerId) -> bool {
        self.viewers.contains_key(id)
    }

    pub fn ids(&self) -> Vec<ViewerId> {
        self.viewers.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.viewers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.viewers.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&ViewerId, &Box<dyn ViewerChannel>)> {
        self.viewers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_register_sends_init_first() {
        let mut registry = SubscriberRegistry::new();
        let (tx, mut rx) = mpsc::channel::<Arc<str>>(4);
        let id = registry.register(Box::new(tx), Arc::from("init")).unwrap();

        assert!(registry.contains(&id));
        assert_eq!(rx.recv().await.as_deref(), Some("init"));
    }

    #[tokio::test]
    async fn test_register_rejects_closed_channel() {
        let mut registry = SubscriberRegistry::new();
        let (tx, rx) = mpsc::channel::<Arc<str>>(4);
        drop(rx);
        assert!(registry.register(Box::new(tx), Arc::from("init")).is_none());
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_unregister_is_idempotent() {
        let mut registry = SubscriberRegistry::new();
        let (tx, _rx) = mpsc::channel::<Arc<str>>(4);
        let id = registry.register(Box::new(tx), Arc::from("init")).unwrap();

        assert!(registry.unregister(&id));
        assert!(!registry.unregister(&id));
        assert!(!registry.unregister(&Uuid::new_v4()));
        assert_eq!(registry.len(), 0);
    }
}
