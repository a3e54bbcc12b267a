use std::collections::{BTreeMap, VecDeque};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::DashboardError;
use crate::event::StateSnapshot;
use crate::record::{Arguments, Outcome, Properties, Record, RecordStatus};

/// Default number of records retained in the window.
pub const DEFAULT_CAPACITY: usize = 100;

/// Default number of records included in a snapshot.
pub const DEFAULT_SNAPSHOT_LIMIT: usize = 50;

/// Line prefix the screenshot tool prints before the saved file path.
pub const SCREENSHOT_MARKER: &str = "Screenshot saved:";

pub const SCREENSHOT_TOOL: &str = "get_screenshot";
pub const START_RECORDING_TOOL: &str = "start_recording";
pub const STOP_RECORDING_TOOL: &str = "stop_recording";

/// Sizing of the record window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Records kept before the oldest is evicted. Never less than one.
    pub capacity: usize,
    /// Records included in a snapshot, newest last.
    pub snapshot_limit: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            snapshot_limit: DEFAULT_SNAPSHOT_LIMIT,
        }
    }
}

/// In-memory, capacity-bounded log of tool calls plus the live auxiliary state.
///
/// Not synchronized: the owner is expected to serialize access (the gateway keeps it
/// behind a single lock together with the viewer registry).
pub struct EventStore {
    config: StoreConfig,
    records: VecDeque<Record>,
    /// Pending records pushed out of the window, kept until they complete.
    /// Holds at most `capacity` entries; the oldest is forgotten first.
    parked: BTreeMap<u64, Record>,
    next_id: u64,
    total_count: u64,
    device_info: Properties,
    bridge_status: Properties,
    last_screenshot_path: Option<String>,
    recording_active: bool,
    started_at: Instant,
}

impl EventStore {
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        let config = StoreConfig {
            capacity: config.capacity.max(1),
            ..config
        };
        info!(
            capacity = config.capacity,
            snapshot_limit = config.snapshot_limit,
            "Event store initialized"
        );
        Self {
            config,
            records: VecDeque::new(),
            parked: BTreeMap::new(),
            next_id: 1,
            total_count: 0,
            device_info: Properties::new(),
            bridge_status: Properties::new(),
            last_screenshot_path: None,
            recording_active: false,
            started_at: Instant::now(),
        }
    }

    /// Append a pending record for a tool call that is about to run.
    pub fn begin(&mut self, name: impl Into<String>, arguments: Arguments) -> Record {
        let id = self.next_id;
        self.next_id += 1;
        self.total_count += 1;

        let record = Record::pending(id, name.into(), arguments);
        self.records.push_back(record.clone());
        self.evict();
        record
    }

    fn evict(&mut self) {
        while self.records.len() > self.config.capacity {
            let Some(oldest) = self.records.pop_front() else {
                break;
            };
            debug!(id = oldest.id, status = %oldest.status, "Evicted record from window");
            if oldest.is_pending() {
                self.parked.insert(oldest.id, oldest);
            }
        }
        while self.parked.len() > self.config.capacity {
            let Some((id, forgotten)) = self.parked.pop_first() else {
                break;
            };
            warn!(id, tool = %forgotten.name, "Forgetting pending record that never completed");
        }
    }

    /// Mark a pending record as finished and apply the derived-state rules.
    ///
    /// Returns the updated record. Completing a record twice, or one this store never
    /// issued, is an `InvalidState` error.
    pub fn complete(&mut self, id: u64, outcome: Outcome) -> Result<Record, DashboardError> {
        let record = if let Ok(idx) = self.records.binary_search_by_key(&id, |r| r.id) {
            let record = &mut self.records[idx];
            if record.status.is_terminal() {
                return Err(DashboardError::invalid_state(
                    id,
                    format!("already completed with status {}", record.status),
                ));
            }
            record.finish(outcome);
            record.clone()
        } else if let Some(mut record) = self.parked.remove(&id) {
            record.finish(outcome);
            record
        } else if id == 0 || id >= self.next_id {
            return Err(DashboardError::invalid_state(id, "never issued by this store"));
        } else {
            return Err(DashboardError::invalid_state(
                id,
                "already completed, or evicted and no longer tracked",
            ));
        };

        self.apply_derived(&record);
        Ok(record)
    }

    fn apply_derived(&mut self, record: &Record) {
        if record.status != RecordStatus::Success {
            return;
        }
        match record.name.as_str() {
            SCREENSHOT_TOOL => {
                if let Some(path) = record.result.as_deref().and_then(screenshot_path) {
                    debug!(path = %path, "Tracked screenshot");
                    self.last_screenshot_path = Some(path);
                }
            }
            START_RECORDING_TOOL => self.recording_active = true,
            STOP_RECORDING_TOOL => self.recording_active = false,
            _ => {}
        }
    }

    pub fn set_device_info(&mut self, info: Properties) {
        self.device_info = info;
    }

    pub fn set_bridge_status(&mut self, status: Properties) {
        self.bridge_status = status;
    }

    /// Uptime, the latest records and all auxiliary state.
    pub fn snapshot(&self) -> StateSnapshot {
        let skip = self.records.len().saturating_sub(self.config.snapshot_limit);
        StateSnapshot {
            uptime: self.started_at.elapsed().as_secs_f64(),
            records: self.records.iter().skip(skip).map(Record::view).collect(),
            device_info: self.device_info.clone(),
            bridge_status: self.bridge_status.clone(),
            last_screenshot_path: self.last_screenshot_path.clone(),
            recording_active: self.recording_active,
            total_count: self.total_count,
        }
    }

    pub fn get(&self, id: u64) -> Option<&Record> {
        self.records
            .binary_search_by_key(&id, |r| r.id)
            .ok()
            .map(|idx| &self.records[idx])
    }

    /// Records currently in the window, oldest first.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Pending records evicted from the window that can still be completed.
    pub fn parked_len(&self) -> usize {
        self.parked.len()
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn device_info(&self) -> &Properties {
        &self.device_info
    }

    pub fn bridge_status(&self) -> &Properties {
        &self.bridge_status
    }

    pub fn last_screenshot_path(&self) -> Option<&str> {
        self.last_screenshot_path.as_deref()
    }

    pub fn recording_active(&self) -> bool {
        self.recording_active
    }
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Path printed by the screenshot tool, taken from the first marker line.
pub fn screenshot_path(result: &str) -> Option<String> {
    result
        .lines()
        .find_map(|line| line.strip_prefix(SCREENSHOT_MARKER))
        .map(|rest| rest.trim().to_string())
        .filter(|path| !path.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn props(value: Value) -> Properties {
        match value {
            Value::Object(map) => map,
            _ => Properties::new(),
        }
    }

    fn ok(text: &str) -> Outcome {
        Outcome::Success(text.into())
    }

    #[test]
    fn test_begin_assigns_increasing_ids() {
        let mut store = EventStore::new();
        let a = store.begin("list_devices", Arguments::new());
        let b = store.begin("tap", props(json!({"x": 1})));
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert!(b.is_pending());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_eviction_keeps_latest_and_counts_all() {
        let mut store = EventStore::with_config(StoreConfig {
            capacity: 5,
            snapshot_limit: 3,
        });
        for i in 0..12 {
            store.begin(format!("tool_{i}"), Arguments::new());
        }

        let ids: Vec<u64> = store.records().map(|r| r.id).collect();
        assert_eq!(ids, vec![8, 9, 10, 11, 12]);
        assert_eq!(store.total_count(), 12);
        assert_eq!(store.snapshot().total_count, 12);
    }

    #[test]
    fn test_eviction_is_positional_regardless_of_status() {
        let mut store = EventStore::with_config(StoreConfig {
            capacity: 2,
            snapshot_limit: 2,
        });
        let first = store.begin("a", Arguments::new());
        let second = store.begin("b", Arguments::new());
        store.complete(second.id, ok("done")).unwrap();
        store.begin("c", Arguments::new());

        // the pending first record goes before the completed second one
        let ids: Vec<u64> = store.records().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert!(store.get(first.id).is_none());
    }

    #[test]
    fn test_complete_twice_is_invalid_state() {
        let mut store = EventStore::new();
        let record = store.begin("tap", Arguments::new());
        store.complete(record.id, ok("ok")).unwrap();

        let err = store.complete(record.id, ok("again")).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidState { id, .. } if id == record.id));
        assert_eq!(store.get(record.id).unwrap().result.as_deref(), Some("ok"));
    }

    #[test]
    fn test_complete_unknown_id_is_invalid_state() {
        let mut store = EventStore::new();
        store.begin("tap", Arguments::new());
        assert!(matches!(
            store.complete(42, ok("x")),
            Err(DashboardError::InvalidState { id: 42, .. })
        ));
        assert!(store.complete(0, ok("x")).is_err());
    }

    #[test]
    fn test_pending_record_completes_after_eviction() {
        let mut store = EventStore::with_config(StoreConfig {
            capacity: 1,
            snapshot_limit: 1,
        });
        let shot = store.begin(SCREENSHOT_TOOL, Arguments::new());
        store.begin("tap", Arguments::new());
        assert!(store.get(shot.id).is_none());

        let done = store
            .complete(shot.id, ok("Screenshot saved: /tmp/late.png"))
            .unwrap();
        assert_eq!(done.status, RecordStatus::Success);
        assert_eq!(store.last_screenshot_path(), Some("/tmp/late.png"));

        // evicted and completed: a second completion is rejected
        assert!(store.complete(shot.id, ok("again")).is_err());
    }

    #[test]
    fn test_uncompleted_records_stay_bounded() {
        let mut store = EventStore::with_config(StoreConfig {
            capacity: 10,
            snapshot_limit: 10,
        });
        for i in 0..10_000 {
            store.begin(format!("tool_{i}"), Arguments::new());
        }
        assert_eq!(store.len(), 10);
        assert_eq!(store.parked_len(), 10);
        assert_eq!(store.total_count(), 10_000);

        // newest evicted pending records are still completable
        assert!(store.complete(9_990, ok("late")).is_ok());
        // older ones were forgotten
        let err = store.complete(1, ok("too late")).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidState { id: 1, .. }));
    }

    #[test]
    fn test_completed_record_evicted_then_completed_again() {
        let mut store = EventStore::with_config(StoreConfig {
            capacity: 1,
            snapshot_limit: 1,
        });
        let first = store.begin("tap", Arguments::new());
        store.complete(first.id, ok("ok")).unwrap();
        store.begin("swipe", Arguments::new());

        let err = store.complete(first.id, ok("again")).unwrap_err();
        assert!(err.to_string().contains("evicted"));
    }

    #[test]
    fn test_error_outcome_clears_result() {
        let mut store = EventStore::new();
        let record = store.begin("tap", Arguments::new());
        let done = store
            .complete(record.id, Outcome::Failure("element not found".into()))
            .unwrap();
        assert_eq!(done.status, RecordStatus::Error);
        assert!(done.result.is_none());
        assert_eq!(done.error.as_deref(), Some("element not found"));
        assert!(done.duration_ms.unwrap() >= 0.0);
    }

    #[test]
    fn test_screenshot_path_tracked() {
        let mut store = EventStore::new();
        let record = store.begin(SCREENSHOT_TOOL, Arguments::new());
        store
            .complete(record.id, ok("Screenshot saved: /tmp/a.png\n"))
            .unwrap();
        assert_eq!(store.last_screenshot_path(), Some("/tmp/a.png"));
    }

    #[test]
    fn test_screenshot_without_marker_keeps_previous_path() {
        let mut store = EventStore::new();
        let first = store.begin(SCREENSHOT_TOOL, Arguments::new());
        store
            .complete(first.id, ok("Size: 1170x2532\nScreenshot saved:  /tmp/b.jpg \n"))
            .unwrap();
        assert_eq!(store.last_screenshot_path(), Some("/tmp/b.jpg"));

        let second = store.begin(SCREENSHOT_TOOL, Arguments::new());
        store.complete(second.id, ok("captured in memory")).unwrap();
        assert_eq!(store.last_screenshot_path(), Some("/tmp/b.jpg"));

        let failed = store.begin(SCREENSHOT_TOOL, Arguments::new());
        store
            .complete(failed.id, Outcome::Failure("Screenshot saved: /tmp/no.png".into()))
            .unwrap();
        assert_eq!(store.last_screenshot_path(), Some("/tmp/b.jpg"));
    }

    #[test]
    fn test_marker_on_other_tool_is_ignored() {
        let mut store = EventStore::new();
        let record = store.begin("tap", Arguments::new());
        store
            .complete(record.id, ok("Screenshot saved: /tmp/x.png"))
            .unwrap();
        assert_eq!(store.last_screenshot_path(), None);
    }

    #[test]
    fn test_recording_flag_follows_start_and_stop() {
        let mut store = EventStore::new();
        let start = store.begin(START_RECORDING_TOOL, Arguments::new());
        store.complete(start.id, ok("ok")).unwrap();
        assert!(store.recording_active());

        let failed_stop = store.begin(STOP_RECORDING_TOOL, Arguments::new());
        store
            .complete(failed_stop.id, Outcome::Failure("not recording".into()))
            .unwrap();
        assert!(store.recording_active());

        let stop = store.begin(STOP_RECORDING_TOOL, Arguments::new());
        store.complete(stop.id, ok("ok")).unwrap();
        assert!(!store.recording_active());
    }

    #[test]
    fn test_device_info_is_replaced_not_merged() {
        let mut store = EventStore::new();
        store.set_device_info(props(json!({"name": "iPhone 15", "udid": "ABC"})));
        store.set_device_info(props(json!({"name": "iPad Air"})));
        assert_eq!(store.device_info(), &props(json!({"name": "iPad Air"})));

        store.set_bridge_status(props(json!({"connected": true})));
        assert_eq!(store.snapshot().bridge_status["connected"], true);
    }

    #[test]
    fn test_snapshot_holds_latest_records_oldest_first() {
        let mut store = EventStore::new();
        for i in 0..120 {
            store.begin(format!("tool_{i}"), Arguments::new());
        }
        let snapshot = store.snapshot();
        assert_eq!(snapshot.records.len(), DEFAULT_SNAPSHOT_LIMIT);
        assert_eq!(snapshot.records.first().unwrap().id, 71);
        assert_eq!(snapshot.records.last().unwrap().id, 120);
        assert_eq!(snapshot.total_count, 120);
        assert_eq!(store.len(), DEFAULT_CAPACITY);
    }

    #[test]
    fn test_snapshot_of_small_store() {
        let mut store = EventStore::new();
        store.begin("a", Arguments::new());
        store.begin("b", Arguments::new());
        let snapshot = store.snapshot();
        assert_eq!(snapshot.records.len(), 2);
        assert!(snapshot.uptime >= 0.0);
        assert!(!snapshot.recording_active);
        assert!(snapshot.last_screenshot_path.is_none());
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut store = EventStore::with_config(StoreConfig {
            capacity: 0,
            snapshot_limit: 10,
        });
        store.begin("a", Arguments::new());
        assert_eq!(store.capacity(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_screenshot_path_parser() {
        assert_eq!(
            screenshot_path("Screenshot saved: /tmp/a.png"),
            Some("/tmp/a.png".to_string())
        );
        assert_eq!(screenshot_path("Screenshot saved:   \nnothing"), None);
        assert_eq!(screenshot_path("no marker here"), None);
    }
}
