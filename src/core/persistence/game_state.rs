//=========================================================================
// Game State Blob
//=========================================================================
//
// JSON shape stored on the user's profile record:
//
// ```text
// {
//   "erosionLevel": 0.35,
//   "kardashevScale": 1.5,
//   "lastPosition": { "scene": "UNIVERSE", "galaxyId": "g-order", "viewMode": "DETAIL" },
//   "displayId": "Pilot-7",
//   "updatedAt": "2026-01-01T00:00:00Z"
// }
// ```
//
// Every field is optional on read; whatever is absent falls back to the
// fresh-progress default.
//
//=========================================================================

//=== External Dependencies ===============================================

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use super::PersistenceError;
use crate::core::state::{LastPosition, PersistedProgress};

//=== GameState ===========================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub erosion_level: Option<f64>,
    pub kardashev_scale: Option<f64>,
    pub last_position: Option<LastPosition>,
    pub display_id: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl GameState {
    /// Snapshot of `progress` stamped with `updated_at`.
    ///
    /// JSON has no NaN or infinity, so a non-finite level is left out and
    /// restores to its default.
    pub fn capture(progress: &PersistedProgress, updated_at: DateTime<Utc>) -> Self {
        Self {
            erosion_level: finite_or_none("erosionLevel", progress.erosion_level),
            kardashev_scale: finite_or_none("kardashevScale", progress.kardashev_scale),
            last_position: progress.last_position.clone(),
            display_id: progress.display_id.clone(),
            updated_at: Some(updated_at),
        }
    }

    /// Converts back to progress, defaulting each missing field.
    pub fn into_progress(self, default_kardashev_scale: f64) -> PersistedProgress {
        let defaults = PersistedProgress::new(default_kardashev_scale);
        PersistedProgress {
            erosion_level: self.erosion_level.unwrap_or(defaults.erosion_level),
            kardashev_scale: self.kardashev_scale.unwrap_or(defaults.kardashev_scale),
            last_position: self.last_position,
            display_id: self.display_id,
        }
    }

    pub fn to_json(&self) -> Result<serde_json::Value, PersistenceError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn from_json(value: serde_json::Value) -> Result<Self, PersistenceError> {
        Ok(serde_json::from_value(value)?)
    }
}

fn finite_or_none(field: &str, value: f64) -> Option<f64> {
    if value.is_finite() {
        Some(value)
    } else {
        warn!("Not saving non-finite {} ({})", field, value);
        None
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::{Scene, ViewMode};
    use chrono::TimeZone;
    use serde_json::json;

    fn progress() -> PersistedProgress {
        PersistedProgress {
            erosion_level: 0.35,
            kardashev_scale: 1.5,
            last_position: Some(LastPosition {
                scene: Scene::Universe,
                galaxy_id: Some("g-order".into()),
                view_mode: ViewMode::Detail,
            }),
            display_id: Some("Pilot-7".into()),
        }
    }

    #[test]
    fn json_uses_camel_case_keys() {
        let stamp = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let value = GameState::capture(&progress(), stamp).to_json().unwrap();

        assert_eq!(value["erosionLevel"], json!(0.35));
        assert_eq!(value["kardashevScale"], json!(1.5));
        assert_eq!(value["lastPosition"]["galaxyId"], "g-order");
        assert_eq!(value["displayId"], "Pilot-7");
        assert_eq!(value["updatedAt"], "2026-01-01T00:00:00Z");
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let state = GameState::from_json(json!({ "displayId": "Nomad" })).unwrap();
        let restored = state.into_progress(1.24);

        assert_eq!(restored.erosion_level, 0.0);
        assert_eq!(restored.kardashev_scale, 1.24);
        assert_eq!(restored.last_position, None);
        assert_eq!(restored.display_id.as_deref(), Some("Nomad"));
    }

    #[test]
    fn null_position_is_accepted() {
        let state = GameState::from_json(json!({ "lastPosition": null })).unwrap();
        assert_eq!(state.last_position, None);
    }

    #[test]
    fn capture_then_restore_is_exact() {
        let restored = GameState::capture(&progress(), Utc::now()).into_progress(1.24);
        assert_eq!(restored, progress());
    }

    #[test]
    fn non_finite_levels_restore_to_defaults() {
        let mut broken = progress();
        broken.erosion_level = f64::NAN;
        broken.kardashev_scale = f64::INFINITY;

        let state = GameState::capture(&broken, Utc::now());
        assert_eq!(state.erosion_level, None);
        assert_eq!(state.kardashev_scale, None);

        let value = state.to_json().unwrap();
        let restored = GameState::from_json(value).unwrap().into_progress(1.24);
        assert_eq!(restored.erosion_level, 0.0);
        assert_eq!(restored.kardashev_scale, 1.24);
        assert_eq!(restored.display_id.as_deref(), Some("Pilot-7"));
    }

    #[test]
    fn wrong_types_are_serialization_errors() {
        let err = GameState::from_json(json!({ "erosionLevel": "high" })).unwrap_err();
        assert!(matches!(err, PersistenceError::Serialization(_)));
    }
}
