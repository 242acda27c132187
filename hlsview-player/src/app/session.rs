//! One playback session: broker, playback surface and diagnostics sink.

use std::future::Future;
use std::sync::Arc;

use hlsview_core::{
    BrokerSettings, DiagnosticsLog, DiagnosticsSink, LocationFetcher,
    PlaybackSurface, PlayerBroker, PlayerError, PlayerModel, StreamingEngine,
    SurfaceExit,
};
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::AppConfig;

/// Outcome of a finished session.
#[derive(Debug)]
pub struct SessionReport {
    pub exit: SurfaceExit,
    pub log: DiagnosticsLog,
}

/// Owns every collaborator for the lifetime of a session.
///
/// The broker lives exactly as long as the session: ending the session stops
/// the surface, drops the broker (closing its channels) and waits for the
/// diagnostics sink to drain.
#[derive(Debug)]
pub struct PlayerSession {
    broker: Arc<PlayerBroker>,
    cancel: CancellationToken,
    surface: JoinHandle<SurfaceExit>,
    diagnostics: JoinHandle<DiagnosticsLog>,
    log: DiagnosticsLog,
}

impl PlayerSession {
    /// Must be called from within a tokio runtime.
    pub fn start(config: &AppConfig, engine: Box<dyn StreamingEngine>) -> Self {
        let fetcher = Arc::new(LocationFetcher::new(config.fetch_timeout));
        let broker = Arc::new(PlayerBroker::new(
            fetcher,
            BrokerSettings {
                channel_capacity: config.channel_capacity,
            },
        ));

        let sink = DiagnosticsSink::attach(&broker);
        let log = sink.log();
        let diagnostics = tokio::spawn(sink.run());

        let cancel = CancellationToken::new();
        let surface = PlaybackSurface::new(Arc::clone(&broker), engine)
            .with_media_id(config.media_id.as_ref());
        let surface = tokio::spawn(surface.run(cancel.clone()));

        debug!(capacity = config.channel_capacity, "player session started");
        Self {
            broker,
            cancel,
            surface,
            diagnostics,
            log,
        }
    }

    pub fn broker(&self) -> &Arc<PlayerBroker> {
        &self.broker
    }

    /// Live view of the diagnostics log.
    pub fn log(&self) -> DiagnosticsLog {
        self.log.clone()
    }

    pub async fn load(&self, location: &str) -> Result<PlayerModel, PlayerError> {
        self.broker.load_configuration(location).await
    }

    /// Run until `stop` resolves or the surface exits on its own, then end
    /// the session.
    pub async fn run_until(
        self,
        stop: impl Future<Output = ()>,
    ) -> Result<SessionReport, JoinError> {
        let Self {
            broker,
            cancel,
            mut surface,
            diagnostics,
            ..
        } = self;

        let finished = tokio::select! {
            result = &mut surface => Some(result),
            _ = stop => None,
        };

        cancel.cancel();
        let exit = match finished {
            Some(result) => result?,
            None => surface.await?,
        };

        drop(broker);
        let log = diagnostics.await?;
        info!(?exit, lines = log.len(), "player session ended");
        Ok(SessionReport { exit, log })
    }

    pub async fn end(self) -> Result<SessionReport, JoinError> {
        self.run_until(std::future::ready(())).await
    }
}
