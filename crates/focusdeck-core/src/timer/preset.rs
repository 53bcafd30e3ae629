use serde::Serialize;

/// A named countdown preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Preset {
    pub label: &'static str,
    /// Duration in minutes.
    pub minutes: u32,
}

impl Preset {
    pub fn duration_secs(&self) -> u32 {
        self.minutes.saturating_mul(60)
    }
}

/// The default preset table: Work / Short Break / Long Break.
pub const DEFAULT_PRESETS: [Preset; 3] = [
    Preset {
        label: "Work",
        minutes: 25,
    },
    Preset {
        label: "Short Break",
        minutes: 5,
    },
    Preset {
        label: "Long Break",
        minutes: 15,
    },
];
