use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::raw;
use crate::state::PlayerState;

/// Runtime playback controls owned by a single [`PlayerModel`].
///
/// [`PlayerModel`]: crate::PlayerModel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerControls {
    pub enabled: bool,
    pub state: PlayerState,
    /// Linear gain in `[0.0, 1.0]`
    pub volume: f64,
    pub cc_enabled: bool,
    pub fullscreen_enabled: bool,
    pub fullscreen: bool,
    /// Seconds
    pub current_time: f64,
    /// Seconds
    pub total_time: f64,
}

impl Default for PlayerControls {
    fn default() -> Self {
        Self {
            enabled: false,
            state: PlayerState::Uninitialized,
            volume: 1.0,
            cc_enabled: false,
            fullscreen_enabled: true,
            fullscreen: false,
            current_time: 0.0,
            total_time: 0.0,
        }
    }
}

impl PlayerControls {
    /// Build controls from a loosely-typed `controls` object.
    ///
    /// Explicit `false` and `0` are honoured; only absent, `null` or
    /// mistyped fields fall back. Playback times always start at zero.
    pub fn from_raw(raw: Option<&Value>) -> Self {
        let defaults = Self::default();

        let state = raw::string(raw, "state")
            .and_then(|name| {
                let parsed = PlayerState::parse(&name);
                if parsed.is_none() {
                    tracing::warn!(state = %name, "unknown controls state, using default");
                }
                parsed
            })
            .unwrap_or(defaults.state);

        let volume = raw::number(raw, "volume")
            .map(|volume| {
                let clamped = volume.clamp(0.0, 1.0);
                if clamped != volume {
                    tracing::warn!(volume, clamped, "volume out of range, clamping");
                }
                clamped
            })
            .unwrap_or(defaults.volume);

        Self {
            enabled: raw::boolean(raw, "enabled").unwrap_or(defaults.enabled),
            state,
            volume,
            cc_enabled: raw::boolean(raw, "ccEnabled")
                .unwrap_or(defaults.cc_enabled),
            fullscreen_enabled: raw::boolean(raw, "fullscreenEnabled")
                .unwrap_or(defaults.fullscreen_enabled),
            fullscreen: raw::boolean(raw, "fullscreen")
                .unwrap_or(defaults.fullscreen),
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_when_absent() {
        let controls = PlayerControls::from_raw(None);
        assert_eq!(controls, PlayerControls::default());
        assert_eq!(controls.volume, 1.0);
        assert!(controls.fullscreen_enabled);
        assert_eq!(controls.state, PlayerState::Uninitialized);
    }

    #[test]
    fn explicit_falsy_values_are_kept() {
        let raw = json!({ "volume": 0, "fullscreenEnabled": false });
        let controls = PlayerControls::from_raw(Some(&raw));
        assert_eq!(controls.volume, 0.0);
        assert!(!controls.fullscreen_enabled);
    }

    #[test]
    fn volume_is_clamped() {
        let loud = PlayerControls::from_raw(Some(&json!({ "volume": 3.5 })));
        assert_eq!(loud.volume, 1.0);
        let negative = PlayerControls::from_raw(Some(&json!({ "volume": -1 })));
        assert_eq!(negative.volume, 0.0);
    }

    #[test]
    fn times_ignore_input() {
        let raw = json!({ "currentTime": 30, "totalTime": 90, "state": "paused" });
        let controls = PlayerControls::from_raw(Some(&raw));
        assert_eq!(controls.current_time, 0.0);
        assert_eq!(controls.total_time, 0.0);
        assert_eq!(controls.state, PlayerState::Paused);
    }
}
