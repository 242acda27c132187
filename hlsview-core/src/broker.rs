//! Player state broker.
//!
//! The broker owns the session's [`PlayerModel`] and is its only mutator.
//! Collaborators hold an `Arc<PlayerBroker>`, request changes through its
//! methods and observe results through its channels.

use std::fmt;
use std::sync::Arc;

use hlsview_model::{PlayerModel, PlayerSource, PlayerState};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::channel::{DEFAULT_CAPACITY, FireChannel, ReplayChannel, Subscription};
use crate::error::{PlayerError, Result};
use crate::loader::{ConfigFetcher, parse_document};

/// Rendered size of the player surface, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerSize {
    pub width: u32,
    pub height: u32,
}

/// Playback clock change published on the time channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "seconds", rename_all = "snake_case")]
pub enum TimeUpdate {
    Current(f64),
    Total(f64),
}

/// Every broker change, in the order it was applied.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    Configured(PlayerModel),
    State(PlayerState),
    Source(PlayerSource),
    Size(PlayerSize),
    Time(TimeUpdate),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrokerSettings {
    /// Per-subscriber buffer for every channel
    pub channel_capacity: usize,
}

impl Default for BrokerSettings {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CAPACITY,
        }
    }
}

pub struct PlayerBroker {
    fetcher: Arc<dyn ConfigFetcher>,
    model: RwLock<Option<PlayerModel>>,
    config: ReplayChannel<PlayerModel>,
    state: ReplayChannel<PlayerState>,
    source: ReplayChannel<PlayerSource>,
    size: FireChannel<PlayerSize>,
    time: FireChannel<TimeUpdate>,
    activity: FireChannel<PlayerEvent>,
}

impl fmt::Debug for PlayerBroker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let model = self.model.read();
        f.debug_struct("PlayerBroker")
            .field("fetcher", &self.fetcher)
            .field("loaded", &model.is_some())
            .field("state", &model.as_ref().and_then(|m| m.state))
            .finish()
    }
}

impl PlayerBroker {
    pub fn new(fetcher: Arc<dyn ConfigFetcher>, settings: BrokerSettings) -> Self {
        let capacity = settings.channel_capacity;
        Self {
            fetcher,
            model: RwLock::new(None),
            config: ReplayChannel::new("config", capacity),
            state: ReplayChannel::new("state", capacity),
            source: ReplayChannel::new("source", capacity),
            size: FireChannel::new("size", capacity),
            time: FireChannel::new("time", capacity),
            activity: FireChannel::new("activity", capacity),
        }
    }

    /// Fetch, decode and install the configuration at `location`.
    ///
    /// Performs exactly one fetch. On failure the previously installed
    /// configuration, if any, stays in place and nothing is published.
    pub async fn load_configuration(&self, location: &str) -> Result<PlayerModel> {
        info!(location, "loading player configuration");

        let model = self
            .fetcher
            .fetch(location)
            .await
            .and_then(|bytes| parse_document(&bytes))
            .map_err(|source| {
                warn!(location, error = %source, "player configuration load failed");
                PlayerError::ConfigurationLoad {
                    location: location.to_owned(),
                    source,
                }
            })?;

        Ok(self.install_configuration(model))
    }

    /// Replace the current configuration with `model`.
    ///
    /// Publishes the model on the configuration channel and, when it names
    /// a URL, its source on the source channel. Replayed source and state
    /// always describe the installed model, so values left over from a
    /// previous configuration are dropped.
    pub fn install_configuration(&self, model: PlayerModel) -> PlayerModel {
        let mut current = self.model.write();
        *current = Some(model.clone());

        self.config.publish(model.clone());
        self.activity.publish(PlayerEvent::Configured(model.clone()));
        if model.source.has_url() {
            self.publish_source(model.source.clone());
        } else {
            self.source.reset();
        }
        match model.state {
            Some(state) => self.publish_state(state),
            None => self.state.reset(),
        }
        drop(current);

        debug!(
            id = %model.id,
            source = %model.source.url,
            width = model.width,
            height = model.height,
            "player configuration installed"
        );
        model
    }

    pub fn set_player_state(&self, state: PlayerState) -> Result<()> {
        let previous = self.with_model(|model| {
            let previous = model.state.replace(state);
            model.controls.state = state;
            self.publish_state(state);
            previous
        })?;

        let from = previous.unwrap_or(PlayerState::Uninitialized);
        if from.can_transition_to(state) {
            debug!(%from, to = %state, "player state transition");
        } else {
            warn!(%from, to = %state, "undefined player state transition");
        }
        Ok(())
    }

    pub fn set_current_src(&self, source: PlayerSource) -> Result<()> {
        self.with_model(|model| {
            debug!(url = %source.url, "player source changed");
            model.source = source.clone();
            self.publish_source(source);
        })
    }

    pub fn set_player_size(&self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(PlayerError::InvalidDimensions { width, height });
        }
        self.with_model(|model| {
            model.width = width;
            model.height = height;
            let size = PlayerSize { width, height };
            self.size.publish(size);
            self.activity.publish(PlayerEvent::Size(size));
        })
    }

    pub fn set_current_time(&self, seconds: f64) -> Result<()> {
        validate_time(seconds)?;
        self.with_model(|model| {
            model.controls.current_time = seconds;
            self.publish_time(TimeUpdate::Current(seconds));
        })
    }

    pub fn set_total_time(&self, seconds: f64) -> Result<()> {
        validate_time(seconds)?;
        self.with_model(|model| {
            model.controls.total_time = seconds;
            self.publish_time(TimeUpdate::Total(seconds));
        })
    }

    /// Snapshot of the current configuration.
    pub fn configuration(&self) -> Option<PlayerModel> {
        self.model.read().clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.model.read().is_some()
    }

    pub fn current_state(&self) -> Option<PlayerState> {
        self.model.read().as_ref().and_then(|model| model.state)
    }

    pub fn current_source(&self) -> Option<PlayerSource> {
        self.model.read().as_ref().map(|model| model.source.clone())
    }

    pub fn subscribe_config(&self) -> Subscription<PlayerModel> {
        self.config.subscribe()
    }

    /// Replays the latest state, then every transition.
    pub fn subscribe_state(&self) -> Subscription<PlayerState> {
        self.state.subscribe()
    }

    /// Replays the latest source, then every change.
    pub fn subscribe_source(&self) -> Subscription<PlayerSource> {
        self.source.subscribe()
    }

    /// Sizes published after subscribing; nothing is replayed.
    pub fn subscribe_size(&self) -> Subscription<PlayerSize> {
        self.size.subscribe()
    }

    /// Time updates published after subscribing; nothing is replayed.
    pub fn subscribe_time(&self) -> Subscription<TimeUpdate> {
        self.time.subscribe()
    }

    /// Every change on every channel, in the order the broker applied them.
    ///
    /// The subscription starts with the replayed configuration, source and
    /// state (in that order), then continues with live changes.
    pub fn subscribe_activity(&self) -> Subscription<PlayerEvent> {
        // Mutators publish under the write lock, so nothing lands between
        // the snapshot and the subscribe.
        let _model = self.model.read();
        let backlog = [
            self.config.latest().map(PlayerEvent::Configured),
            self.source.latest().map(PlayerEvent::Source),
            self.state.latest().map(PlayerEvent::State),
        ]
        .into_iter()
        .flatten()
        .collect();
        self.activity.subscribe_with_backlog(backlog)
    }

    fn publish_state(&self, state: PlayerState) {
        self.state.publish(state);
        self.activity.publish(PlayerEvent::State(state));
    }

    fn publish_source(&self, source: PlayerSource) {
        self.source.publish(source.clone());
        self.activity.publish(PlayerEvent::Source(source));
    }

    fn publish_time(&self, update: TimeUpdate) {
        self.time.publish(update);
        self.activity.publish(PlayerEvent::Time(update));
    }

    /// Runs `mutate` under the model write lock; publishes made inside it
    /// are ordered with the mutation.
    fn with_model<R>(&self, mutate: impl FnOnce(&mut PlayerModel) -> R) -> Result<R> {
        let mut guard = self.model.write();
        let model = guard.as_mut().ok_or(PlayerError::ConfigurationNotLoaded)?;
        Ok(mutate(model))
    }
}

pub(crate) fn validate_time(seconds: f64) -> Result<()> {
    if seconds.is_finite() && seconds >= 0.0 {
        Ok(())
    } else {
        Err(PlayerError::InvalidTime(seconds))
    }
}
