//! Human-readable diagnostics log fed from every broker channel.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

use crate::broker::{PlayerBroker, PlayerEvent, TimeUpdate};
use crate::channel::Subscription;

/// Append-only, unbounded list of log lines shared between the sink and
/// its readers.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticsLog {
    lines: Arc<Mutex<Vec<String>>>,
}

impl DiagnosticsLog {
    pub fn push(&self, line: String) {
        info!(target: "hlsview::diagnostics", "{line}");
        self.lines.lock().push(line);
    }

    pub fn messages(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }
}

/// Read-only observer of the broker.
///
/// The activity subscription is taken in [`DiagnosticsSink::attach`], so
/// anything published afterwards is recorded even before
/// [`DiagnosticsSink::run`] is first polled.
#[derive(Debug)]
pub struct DiagnosticsSink {
    log: DiagnosticsLog,
    activity: Subscription<PlayerEvent>,
}

impl DiagnosticsSink {
    pub fn attach(broker: &PlayerBroker) -> Self {
        Self {
            log: DiagnosticsLog::default(),
            activity: broker.subscribe_activity(),
        }
    }

    /// Handle for reading lines while the sink runs.
    pub fn log(&self) -> DiagnosticsLog {
        self.log.clone()
    }

    /// Record events in broker order until the broker is dropped, then
    /// return the log.
    pub async fn run(mut self) -> DiagnosticsLog {
        while let Some(event) = self.activity.recv().await {
            self.log.push(event_line(&event));
        }
        self.log
    }
}

fn event_line(event: &PlayerEvent) -> String {
    match event {
        PlayerEvent::Configured(model) if model.id.is_empty() => {
            "Player Config: <unnamed>".to_owned()
        }
        PlayerEvent::Configured(model) => format!("Player Config: {}", model.id),
        PlayerEvent::State(state) => format!("Player State: {state}"),
        PlayerEvent::Source(source) => format!("Player Source: {}", source.url),
        PlayerEvent::Size(size) => format!("Player Size: {}x{}", size.width, size.height),
        PlayerEvent::Time(TimeUpdate::Current(seconds)) => format!("Player Time: {seconds}"),
        PlayerEvent::Time(TimeUpdate::Total(seconds)) => {
            format!("Player Duration: {seconds}")
        }
    }
}
