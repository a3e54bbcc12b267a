use serde::{Deserialize, Serialize};

use crate::record::{Properties, RecordView};

/// Point-in-time view of the dashboard, sent to new viewers and returned by the state query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    /// Seconds since the store was created.
    pub uptime: f64,
    /// Most recent records, oldest first.
    pub records: Vec<RecordView>,
    pub device_info: Properties,
    pub bridge_status: Properties,
    pub last_screenshot_path: Option<String>,
    pub recording_active: bool,
    /// Records ever created, including those evicted from the window.
    pub total_count: u64,
}

/// Messages pushed to viewers. Serialized as `{"type": ..., "data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum DashboardEvent {
    /// Full resync, always the first message a viewer receives.
    Init(StateSnapshot),
    /// A tool call started.
    RecordCreated(RecordView),
    /// A tool call reached a terminal status.
    RecordUpdated(RecordView),
    DeviceInfo(Properties),
    BridgeStatus(Properties),
}

impl DashboardEvent {
    /// The `type` tag this event carries on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            DashboardEvent::Init(_) => "init",
            DashboardEvent::RecordCreated(_) => "record-created",
            DashboardEvent::RecordUpdated(_) => "record-updated",
            DashboardEvent::DeviceInfo(_) => "device-info",
            DashboardEvent::BridgeStatus(_) => "bridge-status",
        }
    }
}

impl std::fmt::Display for DashboardEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind())
    }
}
