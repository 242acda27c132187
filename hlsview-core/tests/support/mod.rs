#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use hlsview_core::{BrokerSettings, ConfigFetcher, ConfigLoadError, PlayerBroker};

/// Fetcher that serves one canned document and counts requests.
#[derive(Debug)]
pub struct StaticFetcher {
    body: Result<Vec<u8>, u16>,
    pub requests: AtomicUsize,
}

impl StaticFetcher {
    pub fn document(body: &str) -> Arc<Self> {
        Arc::new(Self {
            body: Ok(body.as_bytes().to_vec()),
            requests: AtomicUsize::new(0),
        })
    }

    pub fn status(status: u16) -> Arc<Self> {
        Arc::new(Self {
            body: Err(status),
            requests: AtomicUsize::new(0),
        })
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfigFetcher for StaticFetcher {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, ConfigLoadError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        match &self.body {
            Ok(body) => Ok(body.clone()),
            Err(status) => Err(ConfigLoadError::Status {
                url: location.to_owned(),
                status: *status,
            }),
        }
    }
}

pub fn broker_serving(body: &str) -> PlayerBroker {
    PlayerBroker::new(StaticFetcher::document(body), BrokerSettings::default())
}

pub const STREAM_CONFIG: &str = r#"[{ "source": { "url": "http://host/stream.m3u8" } }]"#;
