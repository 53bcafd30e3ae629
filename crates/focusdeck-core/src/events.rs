use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every state change of note produces an Event.
///
/// Frontends display them; the analytics aggregator subscribes to the
/// completion events through [`crate::App`]. Emission is explicit at the
/// mutation site -- nothing is derived by diffing rendered state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    /// Duration changed via preset selection or a custom entry.
    /// `preset` is the preset table index, `None` for custom durations.
    DurationSet {
        duration_secs: u32,
        preset: Option<usize>,
        at: DateTime<Utc>,
    },
    /// A countdown ran to zero. Emitted exactly once per completion.
    PomodoroCompleted {
        duration_min: u32,
        at: DateTime<Utc>,
    },
    /// A task moved into the done column. Re-entering done after leaving
    /// it emits again.
    TaskCompleted {
        task_id: u64,
        at: DateTime<Utc>,
    },
}
