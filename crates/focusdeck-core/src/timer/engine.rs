//! Countdown engine.
//!
//! The engine is a caller-driven state machine. It does not own threads
//! or timers -- the frontend fires `tick()` once per second while the
//! countdown runs, and mirrors the phase with at most one recurring tick
//! source. Every transition entry point that changes the duration drops
//! back to `Idle`, so the cancel-before-start rule holds by construction.
//!
//! ## State Transitions
//!
//! ```text
//! Idle <-> Running <-> Paused
//!            |
//!            v (remaining hits 0)
//!        Finished -> Idle (reset / duration change)
//! ```
//!
//! Timer state is deliberately not persisted: every session starts from
//! the first preset.

use std::ops::RangeInclusive;

use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use super::dial::{dash_array, format_mmss, DIAL_RADIUS};
use super::preset::{Preset, DEFAULT_PRESETS};
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
    Finished,
}

/// Full state snapshot for rendering, including the dial geometry.
#[derive(Debug, Clone, Serialize)]
pub struct TimerSnapshot {
    pub phase: TimerPhase,
    pub preset: Option<usize>,
    pub preset_label: Option<&'static str>,
    pub duration_secs: u32,
    pub remaining_secs: u32,
    /// Zero-padded `MM:SS`.
    pub display: String,
    /// 0.0 .. 1.0 progress of the countdown.
    pub progress: f64,
    /// Stroke dash lengths `(filled, gap)` on the radius-65 dial.
    pub dash_array: (f64, f64),
}

/// Core countdown engine.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    presets: Vec<Preset>,
    custom_minutes: RangeInclusive<u32>,
    duration_secs: u32,
    remaining_secs: u32,
    phase: TimerPhase,
    /// Preset table index; `None` after a custom duration was set.
    preset: Option<usize>,
}

impl TimerEngine {
    /// Create an engine over the given preset table and custom-duration
    /// bounds. Starts idle on the first preset.
    pub fn new(presets: Vec<Preset>, custom_minutes: RangeInclusive<u32>) -> Self {
        let duration_secs = presets.first().map(Preset::duration_secs).unwrap_or(0);
        Self {
            presets,
            custom_minutes,
            duration_secs,
            remaining_secs: duration_secs,
            phase: TimerPhase::Idle,
            preset: Some(0),
        }
    }

    /// Engine with the stock Work / Short Break / Long Break table and
    /// custom durations of 1 to 90 minutes.
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_PRESETS.to_vec(), 1..=90)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn preset_index(&self) -> Option<usize> {
        self.preset
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    /// 0.0 .. 1.0 progress of the countdown.
    pub fn progress(&self) -> f64 {
        if self.duration_secs == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs as f64 / self.duration_secs as f64)
    }

    /// Remaining time as zero-padded `MM:SS`.
    pub fn display(&self) -> String {
        format_mmss(self.remaining_secs)
    }

    /// Build a full state snapshot for rendering.
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            preset: self.preset,
            preset_label: self.preset.and_then(|i| self.presets.get(i)).map(|p| p.label),
            duration_secs: self.duration_secs,
            remaining_secs: self.remaining_secs,
            display: self.display(),
            progress: self.progress(),
            dash_array: dash_array(self.progress(), DIAL_RADIUS),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Select a preset: cancels any run and reloads the countdown.
    /// Unknown indices are a no-op.
    pub fn select_preset(&mut self, index: usize) -> Option<Event> {
        let preset = *self.presets.get(index)?;
        self.reload(preset.duration_secs(), Some(index))
    }

    /// Set a custom duration in minutes. Values outside the accepted
    /// bounds are a no-op.
    pub fn set_custom_duration(&mut self, minutes: u32) -> Option<Event> {
        if !self.custom_minutes.contains(&minutes) {
            debug!(minutes, "custom duration out of bounds, ignoring");
            return None;
        }
        self.reload(minutes.saturating_mul(60), None)
    }

    /// Idle/Paused start the countdown, Running pauses it. A finished
    /// countdown stays finished until reset or a duration change.
    pub fn toggle_start_pause(&mut self) -> Option<Event> {
        match self.phase {
            TimerPhase::Idle | TimerPhase::Paused => {
                self.phase = TimerPhase::Running;
                debug!(remaining_secs = self.remaining_secs, "countdown running");
                Some(Event::TimerStarted {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            TimerPhase::Running => {
                self.phase = TimerPhase::Paused;
                Some(Event::TimerPaused {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            TimerPhase::Finished => None,
        }
    }

    /// One second elapsed. Only meaningful while running; on reaching
    /// zero the countdown finishes and emits exactly one completion.
    /// It never restarts on its own.
    pub fn tick(&mut self) -> Option<Event> {
        if self.phase != TimerPhase::Running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }
        self.phase = TimerPhase::Finished;
        debug!(duration_secs = self.duration_secs, "countdown finished");
        Some(Event::PomodoroCompleted {
            duration_min: self.duration_secs / 60,
            at: Utc::now(),
        })
    }

    /// Cancel any run and rewind to the full duration.
    pub fn reset(&mut self) -> Option<Event> {
        self.phase = TimerPhase::Idle;
        self.remaining_secs = self.duration_secs;
        Some(Event::TimerReset { at: Utc::now() })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn reload(&mut self, duration_secs: u32, preset: Option<usize>) -> Option<Event> {
        self.phase = TimerPhase::Idle;
        self.duration_secs = duration_secs;
        self.remaining_secs = duration_secs;
        self.preset = preset;
        Some(Event::DurationSet {
            duration_secs,
            preset,
            at: Utc::now(),
        })
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run_to_completion(engine: &mut TimerEngine) -> Vec<Event> {
        let mut events = Vec::new();
        for _ in 0..engine.duration_secs() + 10 {
            if let Some(e) = engine.tick() {
                events.push(e);
            }
        }
        events
    }

    #[test]
    fn starts_idle_on_first_preset() {
        let engine = TimerEngine::with_defaults();
        assert_eq!(engine.phase(), TimerPhase::Idle);
        assert_eq!(engine.preset_index(), Some(0));
        assert_eq!(engine.duration_secs(), 25 * 60);
        assert_eq!(engine.remaining_secs(), 25 * 60);
    }

    #[test]
    fn toggle_start_pause_resume() {
        let mut engine = TimerEngine::with_defaults();
        assert!(matches!(
            engine.toggle_start_pause(),
            Some(Event::TimerStarted { .. })
        ));
        assert_eq!(engine.phase(), TimerPhase::Running);

        assert!(matches!(
            engine.toggle_start_pause(),
            Some(Event::TimerPaused { .. })
        ));
        assert_eq!(engine.phase(), TimerPhase::Paused);

        assert!(matches!(
            engine.toggle_start_pause(),
            Some(Event::TimerStarted { .. })
        ));
        assert_eq!(engine.phase(), TimerPhase::Running);
    }

    #[test]
    fn tick_is_noop_unless_running() {
        let mut engine = TimerEngine::with_defaults();
        assert!(engine.tick().is_none());
        assert_eq!(engine.remaining_secs(), 25 * 60);

        engine.toggle_start_pause();
        engine.tick();
        assert_eq!(engine.remaining_secs(), 25 * 60 - 1);

        engine.toggle_start_pause(); // paused
        assert!(engine.tick().is_none());
        assert_eq!(engine.remaining_secs(), 25 * 60 - 1);
    }

    #[test]
    fn completion_emits_exactly_once_and_never_restarts() {
        let mut engine = TimerEngine::with_defaults();
        engine.set_custom_duration(1);
        engine.toggle_start_pause();

        let events = run_to_completion(&mut engine);
        let completions = events
            .iter()
            .filter(|e| matches!(e, Event::PomodoroCompleted { .. }))
            .count();
        assert_eq!(completions, 1);
        assert_eq!(engine.phase(), TimerPhase::Finished);
        assert_eq!(engine.remaining_secs(), 0);

        // toggling a finished countdown is a no-op
        assert!(engine.toggle_start_pause().is_none());
        assert_eq!(engine.phase(), TimerPhase::Finished);
    }

    #[test]
    fn completion_reports_duration_minutes() {
        let mut engine = TimerEngine::with_defaults();
        engine.set_custom_duration(2);
        engine.toggle_start_pause();
        let events = run_to_completion(&mut engine);
        assert!(matches!(
            events.last(),
            Some(Event::PomodoroCompleted {
                duration_min: 2,
                ..
            })
        ));
    }

    #[test]
    fn remaining_never_goes_below_zero() {
        let mut engine = TimerEngine::with_defaults();
        engine.set_custom_duration(1);
        engine.toggle_start_pause();
        for _ in 0..200 {
            engine.tick();
            assert!(engine.remaining_secs() <= engine.duration_secs());
        }
        assert_eq!(engine.remaining_secs(), 0);
    }

    #[test]
    fn select_preset_cancels_run_and_reloads() {
        let mut engine = TimerEngine::with_defaults();
        engine.toggle_start_pause();
        engine.tick();

        let event = engine.select_preset(1);
        assert!(matches!(
            event,
            Some(Event::DurationSet {
                duration_secs: 300,
                preset: Some(1),
                ..
            })
        ));
        assert_eq!(engine.phase(), TimerPhase::Idle);
        assert_eq!(engine.remaining_secs(), 5 * 60);
    }

    #[test]
    fn select_preset_out_of_table_is_noop() {
        let mut engine = TimerEngine::with_defaults();
        assert!(engine.select_preset(3).is_none());
        assert_eq!(engine.preset_index(), Some(0));
    }

    #[test]
    fn custom_duration_out_of_bounds_is_noop() {
        let mut engine = TimerEngine::with_defaults();
        assert!(engine.set_custom_duration(0).is_none());
        assert!(engine.set_custom_duration(91).is_none());
        assert_eq!(engine.duration_secs(), 25 * 60);
        assert_eq!(engine.preset_index(), Some(0));
    }

    #[test]
    fn reset_rewinds_and_idles() {
        let mut engine = TimerEngine::with_defaults();
        engine.toggle_start_pause();
        engine.tick();
        engine.tick();

        engine.reset();
        assert_eq!(engine.phase(), TimerPhase::Idle);
        assert_eq!(engine.remaining_secs(), engine.duration_secs());
    }

    #[test]
    fn finished_countdown_restarts_after_reset() {
        let mut engine = TimerEngine::with_defaults();
        engine.set_custom_duration(1);
        engine.toggle_start_pause();
        run_to_completion(&mut engine);

        engine.reset();
        assert!(matches!(
            engine.toggle_start_pause(),
            Some(Event::TimerStarted { .. })
        ));
    }

    #[test]
    fn snapshot_carries_dial_geometry() {
        let mut engine = TimerEngine::with_defaults();
        engine.set_custom_duration(2);
        engine.toggle_start_pause();
        for _ in 0..60 {
            engine.tick();
        }
        let snap = engine.snapshot();
        assert_eq!(snap.display, "01:00");
        assert!((snap.progress - 0.5).abs() < 1e-9);
        let (dash, gap) = snap.dash_array;
        assert!((dash - gap).abs() < 1e-6);
        assert_eq!(snap.preset, None);
        assert_eq!(snap.preset_label, None);
    }

    proptest! {
        #[test]
        fn custom_duration_accepts_full_range(minutes in 1u32..=90) {
            let mut engine = TimerEngine::with_defaults();
            prop_assert!(engine.set_custom_duration(minutes).is_some());
            prop_assert_eq!(engine.duration_secs(), minutes * 60);
            prop_assert_eq!(engine.remaining_secs(), minutes * 60);
            prop_assert_eq!(engine.preset_index(), None);
            prop_assert_eq!(engine.phase(), TimerPhase::Idle);
        }

        #[test]
        fn tick_invariant_holds_under_any_command_sequence(
            commands in proptest::collection::vec(0u8..5, 0..200)
        ) {
            let mut engine = TimerEngine::with_defaults();
            for c in commands {
                match c {
                    0 => { engine.toggle_start_pause(); }
                    1 => { engine.tick(); }
                    2 => { engine.reset(); }
                    3 => { engine.select_preset(1); }
                    _ => { engine.set_custom_duration(1); }
                }
                prop_assert!(engine.remaining_secs() <= engine.duration_secs());
                prop_assert!(engine.duration_secs() > 0);
            }
        }
    }
}
