//! Player state broker and playback coordination for hlsview.
//!
//! [`PlayerBroker`] holds the session's player configuration and publishes
//! changes on typed channels. [`PlaybackSurface`] drives an opaque
//! [`StreamingEngine`] from that state, and [`DiagnosticsSink`] turns every
//! channel into a human-readable log.
#![allow(missing_docs)]

pub mod broker;
pub mod channel;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod loader;
pub mod surface;

pub use broker::{BrokerSettings, PlayerBroker, PlayerEvent, PlayerSize, TimeUpdate};
pub use channel::{FireChannel, ReplayChannel, Subscription};
pub use diagnostics::{DiagnosticsLog, DiagnosticsSink};
pub use engine::{
    EngineError, EngineEvent, EngineEventReceiver, EngineEventSender,
    PlaybackErrorKind, StreamingEngine,
};
pub use error::{ConfigLoadError, PlayerError, Result};
pub use loader::{ConfigFetcher, DEFAULT_FETCH_TIMEOUT, LocationFetcher, parse_document};
pub use surface::{PlaybackSurface, SurfaceExit};

pub use hlsview_model::{PlayerControls, PlayerModel, PlayerSource, PlayerState};
