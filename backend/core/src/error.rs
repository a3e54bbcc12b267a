use thiserror::Error;
use uuid::Uuid;

/// Errors originating in the dashboard core.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// A record was completed twice, or the handle does not name a pending record.
    /// Always a bug in the caller.
    #[error("record {id} cannot be completed: {reason}")]
    InvalidState { id: u64, reason: String },

    /// A single viewer could not take a pushed event. Recovered by dropping the viewer.
    #[error("delivery to viewer {viewer} failed: {reason}")]
    DeliveryFailure { viewer: Uuid, reason: String },
}

impl DashboardError {
    pub fn invalid_state(id: u64, reason: impl Into<String>) -> Self {
        Self::InvalidState {
            id,
            reason: reason.into(),
        }
    }

    pub fn delivery_failure(viewer: Uuid, reason: impl Into<String>) -> Self {
        Self::DeliveryFailure {
            viewer,
            reason: reason.into(),
        }
    }
}
