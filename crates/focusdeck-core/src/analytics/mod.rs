//! Daily productivity counters derived from completion events.
//!
//! The ledger maps ISO dates to per-day counters and grows without
//! bound; days are never pruned. Recording happens through
//! [`crate::App`], which applies the login gate -- events arriving while
//! logged out are dropped, not queued.

use std::collections::BTreeMap;
use std::ops::AddAssign;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Counters for one calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStats {
    /// Completed pomodoros.
    #[serde(default)]
    pub pomodoros: u32,
    /// Minutes spent in completed countdowns.
    #[serde(default)]
    pub time: u32,
    /// Tasks moved into the done column.
    #[serde(default)]
    pub tasks: u32,
}

impl AddAssign for DailyStats {
    fn add_assign(&mut self, rhs: Self) {
        self.pomodoros += rhs.pomodoros;
        self.time += rhs.time;
        self.tasks += rhs.tasks;
    }
}

/// The persisted ledger: `"YYYY-MM-DD"` to that day's counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Analytics {
    days: BTreeMap<String, DailyStats>,
}

/// ISO `YYYY-MM-DD` key for a date.
pub fn date_key(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// The current local date.
pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl Analytics {
    pub fn record_pomodoro(&mut self, day: NaiveDate, duration_min: u32) {
        let entry = self.days.entry(date_key(day)).or_default();
        entry.pomodoros += 1;
        entry.time += duration_min;
    }

    pub fn record_task_done(&mut self, day: NaiveDate) {
        self.days.entry(date_key(day)).or_default().tasks += 1;
    }

    /// Counters for one day; missing days are all zeros.
    pub fn day(&self, day: NaiveDate) -> DailyStats {
        self.days.get(&date_key(day)).copied().unwrap_or_default()
    }

    /// Totals over the 7 calendar dates ending at `today` (today plus
    /// the 6 prior days), independent of calendar-week boundaries.
    pub fn weekly_totals(&self, today: NaiveDate) -> DailyStats {
        let mut totals = DailyStats::default();
        for back in 0..7 {
            if let Some(day) = today.checked_sub_days(Days::new(back)) {
                totals += self.day(day);
            }
        }
        totals
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
