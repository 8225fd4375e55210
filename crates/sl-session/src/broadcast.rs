//! The broadcast contract.
//!
//! The session publishes committed events; the transport (websockets,
//! server-sent events) is the hosted backend's concern. Events are only
//! published after the store save succeeds, so observers never see an
//! uncommitted mutation.

use std::sync::Mutex;

use sl_core::EncounterId;
use sl_mechanics::EncounterEvent;

/// Receives committed encounter events.
pub trait EventSink {
    /// Publish a batch of events for one committed mutation.
    fn publish(&self, encounter: EncounterId, events: &[EncounterEvent]);
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&self, _encounter: EncounterId, _events: &[EncounterEvent]) {}
}

/// Collects everything; the test double.
#[derive(Debug, Default)]
pub struct CollectingSink {
    published: Mutex<Vec<(EncounterId, EncounterEvent)>>,
}

impl CollectingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain and return everything published so far.
    pub fn take(&self) -> Vec<(EncounterId, EncounterEvent)> {
        match self.published.lock() {
            Ok(mut published) => published.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Number of events published so far.
    pub fn len(&self) -> usize {
        self.published.lock().map(|p| p.len()).unwrap_or(0)
    }

    /// True if nothing has been published.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for CollectingSink {
    fn publish(&self, encounter: EncounterId, events: &[EncounterEvent]) {
        if let Ok(mut published) = self.published.lock() {
            published.extend(events.iter().cloned().map(|e| (encounter, e)));
        }
    }
}
