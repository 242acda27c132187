//! Streaming engine adapter that probes HLS manifests over HTTP.
//!
//! There is no media pipeline behind it: attaching media succeeds at once,
//! loading a source fetches and sanity-checks the playlist, and the outcome
//! is reported as an engine event. Enough to exercise a session end to end
//! against a real stream.

use std::time::Duration;

use hlsview_core::{
    EngineError, EngineEvent, EngineEventReceiver, EngineEventSender,
    PlaybackErrorKind, StreamingEngine,
};
use reqwest::Client;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Consecutive failed manifest loads tolerated before giving up.
pub const MAX_LOAD_ATTEMPTS: u32 = 3;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("manifest request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("manifest request returned HTTP {0}")]
    Status(u16),
    #[error("response is not an HLS playlist")]
    NotAPlaylist,
    #[error("playlist has no variants or segments")]
    EmptyPlaylist,
}

impl ProbeError {
    fn is_network(&self) -> bool {
        matches!(self, ProbeError::Request(_) | ProbeError::Status(_))
    }
}

#[derive(Debug)]
pub struct ManifestProbe {
    http_client: Client,
    events_tx: EngineEventSender,
    events_rx: Option<EngineEventReceiver>,
    current_url: Option<String>,
    failed_loads: u32,
    inflight: Option<JoinHandle<()>>,
    destroyed: bool,
}

impl ManifestProbe {
    pub fn new(timeout: Duration) -> Self {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            http_client,
            events_tx,
            events_rx: Some(events_rx),
            current_url: None,
            failed_loads: 0,
            inflight: None,
            destroyed: false,
        }
    }

    fn emit(&self, event: EngineEvent) {
        if self.events_tx.send(event).is_err() {
            debug!("engine event dropped, no listener");
        }
    }

    fn spawn_probe(&mut self) {
        if self.destroyed {
            warn!("load requested after destroy");
            return;
        }
        let Some(url) = self.current_url.clone() else {
            debug!("no source to load");
            return;
        };
        if let Some(previous) = self.inflight.take() {
            previous.abort();
        }

        let attempt = self.failed_loads + 1;
        let client = self.http_client.clone();
        let events = self.events_tx.clone();
        self.inflight = Some(tokio::spawn(async move {
            let event = match probe(&client, &url).await {
                Ok(levels) => {
                    info!(%url, levels, "manifest probed");
                    EngineEvent::ManifestParsed { levels }
                }
                Err(err) => {
                    warn!(%url, attempt, error = %err, "manifest probe failed");
                    EngineEvent::Error(classify(&err, attempt))
                }
            };
            let _ = events.send(event);
        }));
    }
}

impl Drop for ManifestProbe {
    fn drop(&mut self) {
        if let Some(inflight) = self.inflight.take() {
            inflight.abort();
        }
    }
}

impl StreamingEngine for ManifestProbe {
    fn take_events(&mut self) -> Option<EngineEventReceiver> {
        self.events_rx.take()
    }

    fn attach_media(&mut self, media_id: &str) {
        debug!(media_id, "media attached");
        self.emit(EngineEvent::MediaAttached);
    }

    fn load_source(&mut self, url: &str) {
        self.current_url = Some(url.to_owned());
        self.failed_loads = 0;
        self.spawn_probe();
    }

    fn start_load(&mut self) {
        self.failed_loads += 1;
        self.spawn_probe();
    }

    fn recover_media_error(&mut self) {
        self.failed_loads += 1;
        self.spawn_probe();
    }

    fn destroy(&mut self) {
        if let Some(inflight) = self.inflight.take() {
            inflight.abort();
        }
        self.current_url = None;
        self.destroyed = true;
        debug!("manifest probe destroyed");
    }

    fn play(&mut self) {
        debug!(url = ?self.current_url, "play");
    }

    fn pause(&mut self) {
        debug!(url = ?self.current_url, "pause");
    }
}

async fn probe(client: &Client, url: &str) -> Result<usize, ProbeError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ProbeError::Status(status.as_u16()));
    }
    let body = response.text().await?;
    count_levels(&body)
}

fn classify(err: &ProbeError, attempt: u32) -> EngineError {
    let kind = if err.is_network() && attempt < MAX_LOAD_ATTEMPTS {
        PlaybackErrorKind::Network
    } else {
        PlaybackErrorKind::Other
    };
    EngineError::new(kind, err.to_string(), true)
}

/// Number of quality levels a playlist advertises.
///
/// A multivariant playlist has one level per `#EXT-X-STREAM-INF`; a media
/// playlist counts as a single level.
pub fn count_levels(body: &str) -> Result<usize, ProbeError> {
    let mut lines = body
        .trim_start_matches('\u{feff}')
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty());

    if lines.next() != Some("#EXTM3U") {
        return Err(ProbeError::NotAPlaylist);
    }

    let (mut variants, mut segments) = (0, 0);
    for line in lines {
        if line.starts_with("#EXT-X-STREAM-INF") {
            variants += 1;
        } else if line.starts_with("#EXTINF") {
            segments += 1;
        }
    }

    match (variants, segments) {
        (0, 0) => Err(ProbeError::EmptyPlaylist),
        (0, _) => Ok(1),
        (variants, _) => Ok(variants),
    }
}
