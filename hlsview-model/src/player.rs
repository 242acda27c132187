use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::controls::PlayerControls;
use crate::raw;
use crate::source::PlayerSource;
use crate::state::PlayerState;

pub const DEFAULT_WIDTH: u32 = 720;
pub const DEFAULT_HEIGHT: u32 = 405;

/// Shown in place of the video when the host cannot play it.
pub const DEFAULT_ERROR_MESSAGE: &str = "To view this video please enable \
JavaScript, and consider upgrading to a web browser that \
<a href='http://videojs.com/html5-video-support/' target='_blank'>supports \
HTML5 video</a>";

/// Typed player configuration plus the lifecycle state it accumulates.
///
/// A model owns exactly one [`PlayerControls`] and one [`PlayerSource`];
/// neither is shared with another model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerModel {
    pub id: String,
    #[serde(rename = "type")]
    pub player_type: Option<String>,
    pub controls: PlayerControls,
    pub autoplay: bool,
    pub width: u32,
    pub height: u32,
    pub error_message: String,
    /// `None` until the first state transition is published
    pub state: Option<PlayerState>,
    pub source: PlayerSource,
}

impl Default for PlayerModel {
    fn default() -> Self {
        Self {
            id: String::new(),
            player_type: None,
            controls: PlayerControls::default(),
            autoplay: false,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            error_message: DEFAULT_ERROR_MESSAGE.to_owned(),
            state: None,
            source: PlayerSource::default(),
        }
    }
}

impl PlayerModel {
    /// Build a model from an optional loosely-typed configuration object.
    ///
    /// Never fails: every field defaults on its own when it is absent,
    /// `null`, mistyped, or (for dimensions) not positive. URLs and MIME
    /// types pass through unchecked.
    pub fn from_raw(raw: Option<&Value>) -> Self {
        let defaults = Self::default();

        Self {
            id: raw::string(raw, "id").unwrap_or(defaults.id),
            player_type: raw::string(raw, "type")
                .filter(|player_type| !player_type.is_empty()),
            controls: PlayerControls::from_raw(raw::field(raw, "controls")),
            autoplay: raw::boolean(raw, "autoplay").unwrap_or(defaults.autoplay),
            width: raw::dimension(raw, "width").unwrap_or(defaults.width),
            height: raw::dimension(raw, "height").unwrap_or(defaults.height),
            error_message: raw::string(raw, "errorMessage")
                .filter(|message| !message.trim().is_empty())
                .unwrap_or(defaults.error_message),
            state: None,
            source: PlayerSource::from_raw(raw::field(raw, "source")),
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
