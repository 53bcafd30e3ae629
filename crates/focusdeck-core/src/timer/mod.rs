pub mod dial;
mod engine;
mod preset;

pub use engine::{TimerEngine, TimerPhase, TimerSnapshot};
pub use preset::{Preset, DEFAULT_PRESETS};
