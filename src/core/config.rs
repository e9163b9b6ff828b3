//=========================================================================
// Configuration
//=========================================================================
//
// Tunable timings and defaults for the orchestration core.
//
// Every field has a default, so a config file only needs to name what it
// overrides:
//
// ```text
// {
//   "transition_duration_ms": 1500,
//   "transition_policy": "supersede",
//   "startup": { "total_ms": 8000 }
// }
// ```
//
// Durations are stored as milliseconds for readable JSON and exposed as
// `Duration` through accessors.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

//=== ConfigError =========================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config source was not valid JSON for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// The config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// A field parsed but holds an unusable value.
    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

//=== TransitionPolicy ====================================================

/// What happens when a scene transition is requested while one is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// Drop the new request; the in-flight transition completes.
    #[default]
    Reject,

    /// Cancel the in-flight transition's pending phases and start the new one.
    Supersede,
}

//=== StartupTimelineConfig ===============================================

/// Boot sequence: camera zoom plus title text and tip overlay windows.
///
/// Ratios are fractions of `total_ms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartupTimelineConfig {
    pub total_ms: u64,
    pub zoom_end: f32,
    pub text_show: f32,
    pub text_hide: f32,
    pub tip_show: f32,
    pub tip_hide: f32,
}

impl StartupTimelineConfig {
    pub fn total(&self) -> Duration {
        Duration::from_millis(self.total_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_ratio("startup.zoom_end", self.zoom_end)?;
        check_ratio("startup.text_show", self.text_show)?;
        check_ratio("startup.text_hide", self.text_hide)?;
        check_ratio("startup.tip_show", self.tip_show)?;
        check_ratio("startup.tip_hide", self.tip_hide)?;
        check_window("startup.text_hide", self.text_show, self.text_hide)?;
        check_window("startup.tip_hide", self.tip_show, self.tip_hide)
    }
}

impl Default for StartupTimelineConfig {
    fn default() -> Self {
        Self {
            total_ms: 6000,
            zoom_end: 0.6,
            text_show: 0.1,
            text_hide: 0.45,
            tip_show: 0.5,
            tip_hide: 0.9,
        }
    }
}

//=== DiveTimelineConfig ==================================================

/// One-shot camera dive played the first time the universe is entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiveTimelineConfig {
    pub total_ms: u64,
    pub awaken_ratio: f32,
}

impl DiveTimelineConfig {
    pub fn total(&self) -> Duration {
        Duration::from_millis(self.total_ms)
    }
}

impl Default for DiveTimelineConfig {
    fn default() -> Self {
        Self {
            total_ms: 2500,
            awaken_ratio: 0.6,
        }
    }
}

//=== KpiaConfig ==========================================================

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KpiaConfig {
    /// Length of a scene transition, start to end.
    pub transition_duration_ms: u64,

    /// Fraction of the transition at which the scene swap happens.
    pub transition_midpoint_ratio: f32,

    pub transition_policy: TransitionPolicy,

    /// Quiet period after the last progress change before auto-saving.
    pub autosave_debounce_ms: u64,

    /// Kardashev scale assigned to fresh or reset progress.
    pub default_kardashev_scale: f64,

    pub startup: StartupTimelineConfig,
    pub dive: DiveTimelineConfig,
}

impl KpiaConfig {
    //--- Loading ----------------------------------------------------------

    /// Parses and validates a JSON config.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json_str(&source)
    }

    /// Checks value ranges that the type system cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.transition_duration_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "transition_duration_ms",
                reason: "must be positive".into(),
            });
        }
        check_ratio("transition_midpoint_ratio", self.transition_midpoint_ratio)?;
        check_ratio("dive.awaken_ratio", self.dive.awaken_ratio)?;
        if !self.default_kardashev_scale.is_finite() {
            return Err(ConfigError::Invalid {
                field: "default_kardashev_scale",
                reason: "must be finite".into(),
            });
        }
        self.startup.validate()
    }

    //--- Accessors --------------------------------------------------------

    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_duration_ms)
    }

    pub fn autosave_debounce(&self) -> Duration {
        Duration::from_millis(self.autosave_debounce_ms)
    }
}

impl Default for KpiaConfig {
    fn default() -> Self {
        Self {
            transition_duration_ms: 2000,
            transition_midpoint_ratio: 0.8,
            transition_policy: TransitionPolicy::Reject,
            autosave_debounce_ms: 3000,
            default_kardashev_scale: 1.24,
            startup: StartupTimelineConfig::default(),
            dive: DiveTimelineConfig::default(),
        }
    }
}

//--- Validation Helpers --------------------------------------------------

fn check_ratio(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("ratio {} outside [0, 1]", value),
        })
    }
}

fn check_window(field: &'static str, show: f32, hide: f32) -> Result<(), ConfigError> {
    if hide >= show {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("hides at {} before showing at {}", hide, show),
        })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
