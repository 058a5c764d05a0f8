//! Runtime event stream payloads.

use tokio::sync::broadcast;

use crate::core::{
    entry::Entry,
    notifier::{
        EntryAddedListener, EntryOnFrequencyListener, EntryRemovedListener,
        EntrySelectedListener, EntryUpdatedListener, Listener,
    },
};

/// Events emitted from the single-writer runtime loop.
#[derive(Debug, Clone, PartialEq)]
pub enum BandmapEvent {
    /// A new entry was created.
    Added {
        /// Entry snapshot.
        entry: Entry,
    },
    /// An entry changed.
    Updated {
        /// Entry snapshot.
        entry: Entry,
    },
    /// An entry was removed.
    Removed {
        /// Last snapshot of the entry.
        entry: Entry,
    },
    /// An entry was selected.
    Selected {
        /// Entry snapshot.
        entry: Entry,
    },
    /// The radio's frequency was checked against the entries.
    OnFrequency {
        /// Entry on the frequency, empty when `available` is false.
        entry: Entry,
        /// Whether an entry was found.
        available: bool,
    },
}

/// Listener that forwards every event onto a broadcast channel.
pub struct BroadcastListener {
    tx: broadcast::Sender<BandmapEvent>,
}

impl BroadcastListener {
    /// Forwards to `tx`; events without receivers are dropped.
    pub fn new(tx: broadcast::Sender<BandmapEvent>) -> Self {
        Self { tx }
    }

    fn send(&self, event: BandmapEvent) {
        let _ = self.tx.send(event);
    }
}

impl EntryAddedListener for BroadcastListener {
    fn entry_added(&mut self, entry: &Entry) {
        self.send(BandmapEvent::Added { entry: entry.clone() });
    }
}

impl EntryUpdatedListener for BroadcastListener {
    fn entry_updated(&mut self, entry: &Entry) {
        self.send(BandmapEvent::Updated { entry: entry.clone() });
    }
}

impl EntryRemovedListener for BroadcastListener {
    fn entry_removed(&mut self, entry: &Entry) {
        self.send(BandmapEvent::Removed { entry: entry.clone() });
    }
}

impl EntrySelectedListener for BroadcastListener {
    fn entry_selected(&mut self, entry: &Entry) {
        self.send(BandmapEvent::Selected { entry: entry.clone() });
    }
}

impl EntryOnFrequencyListener for BroadcastListener {
    fn entry_on_frequency(&mut self, entry: &Entry, available: bool) {
        self.send(BandmapEvent::OnFrequency {
            entry: entry.clone(),
            available,
        });
    }
}

impl Listener for BroadcastListener {
    fn as_added(&mut self) -> Option<&mut dyn EntryAddedListener> {
        Some(self)
    }

    fn as_updated(&mut self) -> Option<&mut dyn EntryUpdatedListener> {
        Some(self)
    }

    fn as_removed(&mut self) -> Option<&mut dyn EntryRemovedListener> {
        Some(self)
    }

    fn as_selected(&mut self) -> Option<&mut dyn EntrySelectedListener> {
        Some(self)
    }

    fn as_on_frequency(&mut self) -> Option<&mut dyn EntryOnFrequencyListener> {
        Some(self)
    }
}
