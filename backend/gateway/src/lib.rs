//! Simulator automation dashboard gateway.
//!
//! Ingress API for the automation server, live fan-out to WebSocket viewers, and the
//! HTTP routes around them.

pub mod broadcast;
pub mod channel;
pub mod control_ui;
pub mod dashboard;
pub mod registry;
pub mod screenshot;
pub mod server;
pub mod state_api;
pub mod ws_server;

pub use broadcast::{BroadcastCoordinator, PublishReport};
pub use channel::{SendError, ViewerChannel};
pub use dashboard::{Dashboard, DashboardStats, RecordHandle};
pub use registry::{SubscriberRegistry, ViewerId};
pub use server::{build_router, start_server, GatewayState};
