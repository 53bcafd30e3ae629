//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - Preset countdown durations
//! - Custom-duration bounds
//! - Default display theme
//!
//! Configuration is stored at `~/.config/focusdeck/config.toml`.

use std::ops::RangeInclusive;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;
use crate::theme::Theme;
use crate::timer::Preset;

/// Preset duration configuration, in minutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetConfig {
    #[serde(default = "default_work_min")]
    pub work_min: u32,
    #[serde(default = "default_short_break_min")]
    pub short_break_min: u32,
    #[serde(default = "default_long_break_min")]
    pub long_break_min: u32,
}

/// Timer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Smallest accepted custom duration, in minutes.
    #[serde(default = "default_custom_floor_min")]
    pub custom_floor_min: u32,
    /// Largest accepted custom duration, in minutes.
    #[serde(default = "default_custom_ceiling_min")]
    pub custom_ceiling_min: u32,
}

/// UI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    /// Theme applied when no theme record is persisted yet.
    /// Unset means: pick by local hour of day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_theme: Option<Theme>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/focusdeck/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub presets: PresetConfig,
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

// Default functions
fn default_work_min() -> u32 {
    25
}
fn default_short_break_min() -> u32 {
    5
}
fn default_long_break_min() -> u32 {
    15
}
fn default_custom_floor_min() -> u32 {
    1
}
fn default_custom_ceiling_min() -> u32 {
    90
}

impl Default for PresetConfig {
    fn default() -> Self {
        Self {
            work_min: default_work_min(),
            short_break_min: default_short_break_min(),
            long_break_min: default_long_break_min(),
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            custom_floor_min: default_custom_floor_min(),
            custom_ceiling_min: default_custom_ceiling_min(),
        }
    }
}

impl TimerConfig {
    pub fn custom_range(&self) -> RangeInclusive<u32> {
        self.custom_floor_min..=self.custom_ceiling_min
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            presets: PresetConfig::default(),
            timer: TimerConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/focusdeck"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk, writing defaults on first run.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// The preset table built from configured durations. Labels are
    /// fixed; the durations default to 25/5/15 minutes.
    pub fn preset_table(&self) -> [Preset; 3] {
        [
            Preset {
                label: "Work",
                minutes: self.presets.work_min,
            },
            Preset {
                label: "Short Break",
                minutes: self.presets.short_break_min,
            },
            Preset {
                label: "Long Break",
                minutes: self.presets.long_break_min,
            },
        ]
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let value = key
            .split('.')
            .try_fold(&json, |node, part| node.get(part))?;
        match value {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key and persist the result.
    ///
    /// # Errors
    /// Returns an error if the key is unknown, the value cannot be
    /// parsed as the existing value's type, or the save fails.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        set_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.save()
    }
}

fn set_by_path(
    root: &mut serde_json::Value,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    let unknown = || ConfigError::UnknownKey(key.to_string());
    let bad_value = |message: String| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    };

    let (parents, leaf) = match key.rsplit_once('.') {
        Some((parents, leaf)) => (parents.split('.').collect::<Vec<_>>(), leaf),
        None if !key.is_empty() => (Vec::new(), key),
        None => return Err(unknown()),
    };

    let mut node = root;
    for part in parents {
        node = node.get_mut(part).ok_or_else(unknown)?;
    }
    let obj = node.as_object_mut().ok_or_else(unknown)?;
    let existing = obj.get(leaf).ok_or_else(unknown)?;

    let new_value = match existing {
        serde_json::Value::Bool(_) => serde_json::Value::Bool(
            value.parse::<bool>().map_err(|e| bad_value(e.to_string()))?,
        ),
        serde_json::Value::Number(_) => serde_json::Value::Number(
            value
                .parse::<u64>()
                .map(Into::into)
                .map_err(|_| bad_value(format!("cannot parse '{value}' as number")))?,
        ),
        serde_json::Value::Null | serde_json::Value::String(_) => {
            serde_json::Value::String(value.to_string())
        }
        _ => serde_json::from_str(value).map_err(|e| bad_value(e.to_string()))?,
    };
    obj.insert(leaf.to_string(), new_value);
    Ok(())
}
