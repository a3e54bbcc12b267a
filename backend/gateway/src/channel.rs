//! Viewer channels.
//!
//! A channel is the push side of one live viewer connection. Sends never block:
//! a viewer that cannot take a message right now is treated as gone.

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SendError {
    #[error("viewer buffer is full")]
    Full,
    #[error("viewer disconnected")]
    Closed,
}

/// Push side of a live viewer connection.
pub trait ViewerChannel: Send + Sync {
    /// Hand one serialized event to the viewer without waiting.
    fn send(&self, payload: Arc<str>) -> Result<(), SendError>;
}

impl ViewerChannel for mpsc::Sender<Arc<str>> {
    fn send(&self, payload: Arc<str>) -> Result<(), SendError> {
        self.try_send(payload).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SendError::Full,
            mpsc::error::TrySendError::Closed(_) => SendError::Closed,
        })
    }
}

impl ViewerChannel for mpsc::UnboundedSender<Arc<str>> {
    fn send(&self, payload: Arc<str>) -> Result<(), SendError> {
        mpsc::UnboundedSender::send(self, payload).map_err(|_| SendError::Closed)
    }
}
