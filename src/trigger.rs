//! Per-entity change notification channels.

use futures::Stream;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::broadcast;

pub const DEFAULT_TRIGGER_CAPACITY: usize = 64;

/// Broadcast channel for one storage table. Delivery is in publish order.
pub struct ChangeTrigger {
    sender: broadcast::Sender<()>,
    published: AtomicBool,
}

impl ChangeTrigger {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        ChangeTrigger {
            sender,
            published: AtomicBool::new(false),
        }
    }

    pub fn publish(&self) {
        self.published.store(true, Ordering::Release);
        // No receivers is fine.
        let _ = self.sender.send(());
    }

    pub fn has_published(&self) -> bool {
        self.published.load(Ordering::Acquire)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.sender.subscribe()
    }

    /// Live subscriptions, i.e. open streams on this table.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// One item per publish observed after this call, including publishes a lagging
    /// receiver overflowed on.
    pub fn updates(&self) -> impl Stream<Item = ()> + Send + 'static {
        let mut rx = self.subscribe();
        async_stream::stream! {
            loop {
                match rx.recv().await {
                    Ok(()) => yield (),
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        tracing::debug!(missed, "trigger receiver lagged");
                        for _ in 0..missed {
                            yield ();
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }
}

/// Channels keyed by storage table name, created on first use.
pub struct TriggerRegistry {
    channels: Mutex<HashMap<String, Arc<ChangeTrigger>>>,
    capacity: usize,
}

impl Default for TriggerRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_TRIGGER_CAPACITY)
    }
}

impl TriggerRegistry {
    pub fn new(capacity: usize) -> Self {
        TriggerRegistry {
            channels: Mutex::new(HashMap::new()),
            capacity,
        }
    }

    pub fn channel(&self, table: &str) -> Arc<ChangeTrigger> {
        let mut channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        channels
            .entry(table.to_string())
            .or_insert_with(|| Arc::new(ChangeTrigger::new(self.capacity)))
            .clone()
    }

    pub fn publish(&self, table: &str) {
        tracing::trace!(table = %table, "publish change");
        self.channel(table).publish();
    }
}
