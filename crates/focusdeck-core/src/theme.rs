//! Display theme, persisted across sessions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Sunrise,
    Night,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Sunrise => Theme::Night,
            Theme::Night => Theme::Sunrise,
        }
    }

    /// Default for a local hour of day: night from 18:00.
    pub fn for_hour(hour: u32) -> Self {
        if hour >= 18 {
            Theme::Night
        } else {
            Theme::Sunrise
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Sunrise => "sunrise",
            Theme::Night => "night",
        })
    }
}

impl FromStr for Theme {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sunrise" => Ok(Theme::Sunrise),
            "night" => Ok(Theme::Night),
            other => Err(ValidationError::unknown_variant("theme", other)),
        }
    }
}
