//! Capability boundary to the external streaming engine.
//!
//! The engine fetches manifests and segments, picks bitrates and feeds the
//! media element. The core never looks inside it: it issues the calls below
//! and reacts to the events the engine reports back.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;

/// Broad class of a playback failure reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackErrorKind {
    Network,
    Media,
    Other,
}

impl fmt::Display for PlaybackErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlaybackErrorKind::Network => "networkError",
            PlaybackErrorKind::Media => "mediaError",
            PlaybackErrorKind::Other => "otherError",
        })
    }
}

/// Error payload carried by [`EngineEvent::Error`].
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {details} (fatal: {fatal})")]
pub struct EngineError {
    pub kind: PlaybackErrorKind,
    pub details: String,
    pub fatal: bool,
}

impl EngineError {
    pub fn new(kind: PlaybackErrorKind, details: impl Into<String>, fatal: bool) -> Self {
        Self {
            kind,
            details: details.into(),
            fatal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    MediaAttached,
    ManifestParsed { levels: usize },
    Error(EngineError),
}

pub type EngineEventSender = mpsc::UnboundedSender<EngineEvent>;
pub type EngineEventReceiver = mpsc::UnboundedReceiver<EngineEvent>;

/// Calls the playback surface makes into the streaming engine.
///
/// Calls are fire-and-forget; outcomes arrive as [`EngineEvent`]s on the
/// receiver handed out by [`StreamingEngine::take_events`].
#[cfg_attr(test, mockall::automock)]
pub trait StreamingEngine: Send {
    /// The event stream. Yields `Some` exactly once.
    fn take_events(&mut self) -> Option<EngineEventReceiver>;

    fn attach_media(&mut self, media_id: &str);

    fn load_source(&mut self, url: &str);

    /// Restart loading after a network failure.
    fn start_load(&mut self);

    fn recover_media_error(&mut self);

    /// Release the engine. No further calls are made afterwards.
    fn destroy(&mut self);

    /// Resume the attached media element.
    fn play(&mut self) {}

    /// Pause the attached media element.
    fn pause(&mut self) {}
}
