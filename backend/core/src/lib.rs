//! `simdash-core` — the tool-call log behind the simulator automation dashboard.
//!
//! Holds the bounded, in-memory record of every tool invocation together with the
//! live device, bridge, screenshot and recording state, and the event types pushed
//! to viewers.

pub mod error;
pub mod event;
pub mod record;
pub mod store;

pub use error::DashboardError;
pub use event::{DashboardEvent, StateSnapshot};
pub use record::{Arguments, Outcome, Properties, Record, RecordStatus, RecordView};
pub use store::{EventStore, StoreConfig};
