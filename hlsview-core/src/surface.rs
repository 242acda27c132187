//! Playback surface: drives the streaming engine from broker state.
//!
//! The surface owns the engine for the whole session. It loads whatever the
//! source channel carries, maps `PLAYING`/`PAUSED` onto the media element,
//! and reports engine milestones and failures back through the broker.
//! Engine recovery (restarting loads, media-error recovery, teardown) lives
//! here and not in the broker.

use std::sync::Arc;

use hlsview_model::{PlayerSource, PlayerState};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::broker::{PlayerBroker, validate_time};
use crate::engine::{EngineError, EngineEvent, PlaybackErrorKind, StreamingEngine};
use crate::error::Result;

/// Media element id used when none is configured.
pub const DEFAULT_MEDIA_ID: &str = "video";

/// Why [`PlaybackSurface::run`] returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceExit {
    Cancelled,
    /// The engine's event stream or a broker channel closed.
    Closed,
    /// A fatal, unrecoverable engine error tore the engine down.
    Destroyed(EngineError),
}

pub struct PlaybackSurface {
    broker: Arc<PlayerBroker>,
    engine: Box<dyn StreamingEngine>,
    media_id: String,
    media_attached: bool,
    pending_url: Option<String>,
    loaded_url: Option<String>,
    destroyed: bool,
}

impl std::fmt::Debug for PlaybackSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackSurface")
            .field("media_id", &self.media_id)
            .field("media_attached", &self.media_attached)
            .field("loaded_url", &self.loaded_url)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

impl PlaybackSurface {
    pub fn new(broker: Arc<PlayerBroker>, engine: Box<dyn StreamingEngine>) -> Self {
        Self {
            broker,
            engine,
            media_id: DEFAULT_MEDIA_ID.to_owned(),
            media_attached: false,
            pending_url: None,
            loaded_url: None,
            destroyed: false,
        }
    }

    pub fn with_media_id(mut self, media_id: impl Into<String>) -> Self {
        self.media_id = media_id.into();
        self
    }

    pub fn on_source_changed(&self, source: PlayerSource) -> Result<()> {
        self.broker.set_current_src(source)
    }

    pub fn on_state_transition_requested(&self, state: PlayerState) -> Result<()> {
        self.broker.set_player_state(state)
    }

    pub fn on_size_observed(&self, width: u32, height: u32) -> Result<()> {
        self.broker.set_player_size(width, height)
    }

    /// Rejects the pair without touching the broker if either value is
    /// invalid.
    pub fn on_time_observed(&self, current: f64, total: f64) -> Result<()> {
        validate_time(total)?;
        validate_time(current)?;
        self.broker.set_total_time(total)?;
        self.broker.set_current_time(current)
    }

    /// Attach the media element and drive the engine until cancelled, until
    /// the engine's events end, or until a fatal error destroys the engine.
    pub async fn run(mut self, cancel: CancellationToken) -> SurfaceExit {
        let Some(mut events) = self.engine.take_events() else {
            error!("streaming engine has no event stream");
            self.teardown();
            return SurfaceExit::Closed;
        };

        let mut sources = self.broker.subscribe_source();
        let mut states = self.broker.subscribe_state();

        debug!(media_id = %self.media_id, "attaching media element");
        self.engine.attach_media(&self.media_id);

        let exit = loop {
            tokio::select! {
                biased;

                event = events.recv() => match event {
                    Some(event) => {
                        if let Some(exit) = self.handle_engine_event(event) {
                            break exit;
                        }
                    }
                    None => break SurfaceExit::Closed,
                },
                source = sources.recv() => match source {
                    Some(source) => self.handle_source(source),
                    None => break SurfaceExit::Closed,
                },
                state = states.recv() => match state {
                    Some(state) => self.handle_state(state),
                    None => break SurfaceExit::Closed,
                },
                _ = cancel.cancelled() => break SurfaceExit::Cancelled,
            }
        };

        self.teardown();
        info!(?exit, "playback surface stopped");
        exit
    }

    fn handle_engine_event(&mut self, event: EngineEvent) -> Option<SurfaceExit> {
        match event {
            EngineEvent::MediaAttached => {
                debug!("media attached");
                self.media_attached = true;
                if let Some(url) = self.pending_url.take() {
                    self.load(url);
                }
                None
            }
            EngineEvent::ManifestParsed { levels } => {
                info!(levels, "manifest parsed");
                self.on_manifest_parsed();
                None
            }
            EngineEvent::Error(err) => self.on_engine_error(err),
        }
    }

    fn on_manifest_parsed(&mut self) {
        let current = self.broker.current_state();
        if matches!(current, None | Some(PlayerState::Uninitialized)) {
            self.request_state(PlayerState::Initialized);
        }

        let autoplay = self
            .broker
            .configuration()
            .map(|model| model.autoplay)
            .unwrap_or(false);
        if autoplay && self.broker.current_state() == Some(PlayerState::Initialized) {
            self.request_state(PlayerState::Playing);
        }
    }

    fn on_engine_error(&mut self, err: EngineError) -> Option<SurfaceExit> {
        warn!(
            kind = %err.kind,
            details = %err.details,
            fatal = err.fatal,
            "streaming engine error"
        );
        if !err.fatal {
            return None;
        }

        match err.kind {
            PlaybackErrorKind::Network => {
                info!("fatal network error, restarting load");
                self.engine.start_load();
                None
            }
            PlaybackErrorKind::Media => {
                info!("fatal media error, attempting recovery");
                self.engine.recover_media_error();
                None
            }
            PlaybackErrorKind::Other => {
                error!(details = %err.details, "unrecoverable engine error, destroying");
                self.teardown();
                self.request_state(PlayerState::Errored);
                Some(SurfaceExit::Destroyed(err))
            }
        }
    }

    fn handle_source(&mut self, source: PlayerSource) {
        if !source.has_url() {
            debug!("source without url, dropping any queued load");
            self.pending_url = None;
            return;
        }
        if self.loaded_url.as_deref() == Some(source.url.as_str()) {
            debug!(url = %source.url, "source already loaded");
            return;
        }
        if self.media_attached {
            self.load(source.url);
        } else {
            debug!(url = %source.url, "media not attached yet, queueing source");
            self.pending_url = Some(source.url);
        }
    }

    fn handle_state(&mut self, state: PlayerState) {
        if self.destroyed {
            return;
        }
        match state {
            PlayerState::Playing => self.engine.play(),
            PlayerState::Paused => self.engine.pause(),
            _ => {}
        }
    }

    fn load(&mut self, url: String) {
        info!(%url, "loading source");
        self.engine.load_source(&url);
        self.loaded_url = Some(url);
    }

    fn request_state(&self, state: PlayerState) {
        if let Err(err) = self.broker.set_player_state(state) {
            warn!(%state, error = %err, "could not publish player state");
        }
    }

    fn teardown(&mut self) {
        if !self.destroyed {
            self.engine.destroy();
            self.destroyed = true;
        }
    }
}
