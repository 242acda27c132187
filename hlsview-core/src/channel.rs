//! Typed notification channels with explicit replay semantics.
//!
//! Both channel kinds fan out over [`tokio::sync::broadcast`], so a publish
//! queues the value on every live subscriber, in subscription order, before
//! it returns. They differ only in what a new subscriber sees first:
//!
//! * [`ReplayChannel`] hands a new subscriber the latest published value,
//!   then every later one.
//! * [`FireChannel`] hands a new subscriber only values published after it
//!   subscribed.

use std::collections::VecDeque;

use parking_lot::Mutex;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::warn;

/// Per-subscriber buffer used when no capacity is configured.
pub const DEFAULT_CAPACITY: usize = 64;

/// Multicast channel that replays its latest value to new subscribers.
#[derive(Debug)]
pub struct ReplayChannel<T> {
    name: &'static str,
    latest: Mutex<Option<T>>,
    sender: broadcast::Sender<T>,
}

impl<T: Clone> ReplayChannel<T> {
    pub fn new(name: &'static str, capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            name,
            latest: Mutex::new(None),
            sender,
        }
    }

    /// Record `value` as the latest and deliver it to current subscribers.
    ///
    /// Returns the number of subscribers the value was queued for.
    pub fn publish(&self, value: T) -> usize {
        // Held across the send so a concurrent subscribe sees either the old
        // latest plus this value, or this value as its replay, never both.
        let mut latest = self.latest.lock();
        *latest = Some(value.clone());
        self.sender.send(value).unwrap_or(0)
    }

    pub fn subscribe(&self) -> Subscription<T> {
        let latest = self.latest.lock();
        Subscription {
            channel: self.name,
            pending: latest.iter().cloned().collect(),
            receiver: self.sender.subscribe(),
        }
    }

    pub fn latest(&self) -> Option<T> {
        self.latest.lock().clone()
    }

    /// Forget the latest value. Later subscribers start empty until the
    /// next publish; current subscribers are unaffected.
    pub fn reset(&self) {
        self.latest.lock().take();
    }
}

/// Multicast channel that only reaches subscribers present at publish time.
#[derive(Debug)]
pub struct FireChannel<T> {
    name: &'static str,
    sender: broadcast::Sender<T>,
}

impl<T: Clone> FireChannel<T> {
    pub fn new(name: &'static str, capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { name, sender }
    }

    /// Returns the number of subscribers the value was queued for; a
    /// publish with no subscribers is dropped.
    pub fn publish(&self, value: T) -> usize {
        self.sender.send(value).unwrap_or(0)
    }

    pub fn subscribe(&self) -> Subscription<T> {
        self.subscribe_with_backlog(Vec::new())
    }

    /// Subscribe with `backlog` delivered ahead of anything published later.
    pub(crate) fn subscribe_with_backlog(&self, backlog: Vec<T>) -> Subscription<T> {
        Subscription {
            channel: self.name,
            pending: backlog.into(),
            receiver: self.sender.subscribe(),
        }
    }
}

/// Receiving end of either channel kind.
///
/// Ends (yields `None`) once the owning channel is dropped and every queued
/// value has been drained.
#[derive(Debug)]
pub struct Subscription<T> {
    channel: &'static str,
    pending: VecDeque<T>,
    receiver: broadcast::Receiver<T>,
}

impl<T: Clone> Subscription<T> {
    pub async fn recv(&mut self) -> Option<T> {
        if let Some(value) = self.pending.pop_front() {
            return Some(value);
        }
        loop {
            match self.receiver.recv().await {
                Ok(value) => return Some(value),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(channel = self.channel, skipped, "subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next value if one is already queued.
    pub fn try_recv(&mut self) -> Option<T> {
        if let Some(value) = self.pending.pop_front() {
            return Some(value);
        }
        loop {
            match self.receiver.try_recv() {
                Ok(value) => return Some(value),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(channel = self.channel, skipped, "subscriber lagged");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// Drain everything currently queued.
    pub fn drain(&mut self) -> Vec<T> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}
