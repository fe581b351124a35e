//! TOML-based application configuration.
//!
//! Stores the engine timing knobs and the quick-create presets at
//! `<data_dir>/config.toml`. The graveyard retention window is fixed and
//! deliberately not configurable.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;
use crate::lifecycle::EngineSettings;

/// Engine timing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Delay between a deadline lapsing and the authoritative burial.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Length of the hold-to-resurrect confirm gesture.
    #[serde(default = "default_hold_duration_ms")]
    pub hold_duration_ms: u64,
    /// Deadline applied when a task is created without a duration.
    #[serde(default = "default_duration_min")]
    pub default_duration_min: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    /// Quick-create presets: name -> minutes until the deadline.
    #[serde(default = "default_presets")]
    pub presets: HashMap<String, u64>,
}

fn default_settle_delay_ms() -> u64 {
    300
}
fn default_hold_duration_ms() -> u64 {
    3_000
}
fn default_duration_min() -> u64 {
    60
}
fn default_presets() -> HashMap<String, u64> {
    HashMap::from([
        ("sprint".to_string(), 15),
        ("hour".to_string(), 60),
        ("day".to_string(), 24 * 60),
    ])
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
            hold_duration_ms: default_hold_duration_ms(),
            default_duration_min: default_duration_min(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            presets: default_presets(),
        }
    }
}

impl Config {
    /// Path of the config file inside the data directory.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::DataDir(e.to_string()))?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk, writing the default config on first run.
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

    /// Load from disk, returning the default on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to disk.
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

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        match current {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key and persist. The value must parse
    /// as the same JSON type as the existing one.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
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

    /// Engine timing knobs derived from this config.
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            settle_delay_ms: self.engine.settle_delay_ms,
            hold_duration_ms: self.engine.hold_duration_ms,
        }
    }

    /// Duration of a quick preset, when configured.
    pub fn preset_duration(&self, name: &str) -> Option<chrono::Duration> {
        self.presets
            .get(name)
            .map(|minutes| chrono::Duration::minutes(*minutes as i64))
    }

    /// Duration applied when none is given at creation.
    pub fn default_duration(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.engine.default_duration_min as i64)
    }
}

fn set_by_path(
    root: &mut serde_json::Value,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    let unknown = || ConfigError::UnknownKey(key.to_string());
    let invalid = |message: String| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    };

    let mut parts = key.split('.').peekable();
    if parts.peek().is_none() {
        return Err(unknown());
    }
    let mut current = root;
    while let Some(part) = parts.next() {
        if parts.peek().is_none() {
            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => {
                    let n = value
                        .parse::<u64>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                    serde_json::Value::Number(n.into())
                }
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }
        current = current.get_mut(part).ok_or_else(unknown)?;
    }
    Err(unknown())
}
