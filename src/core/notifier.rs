//! Fan-out of bandmap events to heterogeneous listeners.
//!
//! A listener opts into events by exposing the matching capability from
//! [`Listener`]; every capability defaults to absent.

use super::entry::Entry;

/// Receives newly created entries.
pub trait EntryAddedListener {
    /// Called once per created entry.
    fn entry_added(&mut self, entry: &Entry);
}

/// Receives entries whose observable state changed.
pub trait EntryUpdatedListener {
    /// Called once per changed entry.
    fn entry_updated(&mut self, entry: &Entry);
}

/// Receives entries that were removed.
pub trait EntryRemovedListener {
    /// Called once per removed entry.
    fn entry_removed(&mut self, entry: &Entry);
}

/// Receives selection changes.
pub trait EntrySelectedListener {
    /// Called with the newly selected entry.
    fn entry_selected(&mut self, entry: &Entry);
}

/// Receives the entry found on the radio's current frequency.
pub trait EntryOnFrequencyListener {
    /// `available` is false when no entry is on the frequency.
    fn entry_on_frequency(&mut self, entry: &Entry, available: bool);
}

/// A subscriber handle; returns the capabilities it implements.
pub trait Listener: Send {
    /// Added capability.
    fn as_added(&mut self) -> Option<&mut dyn EntryAddedListener> {
        None
    }

    /// Updated capability.
    fn as_updated(&mut self) -> Option<&mut dyn EntryUpdatedListener> {
        None
    }

    /// Removed capability.
    fn as_removed(&mut self) -> Option<&mut dyn EntryRemovedListener> {
        None
    }

    /// Selected capability.
    fn as_selected(&mut self) -> Option<&mut dyn EntrySelectedListener> {
        None
    }

    /// OnFrequency capability.
    fn as_on_frequency(&mut self) -> Option<&mut dyn EntryOnFrequencyListener> {
        None
    }
}

/// Open list of listeners, invoked synchronously in registration order.
#[derive(Default)]
pub struct Notifier {
    listeners: Vec<Box<dyn Listener>>,
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Notifier {
    /// Creates a notifier without listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener.
    pub fn notify(&mut self, listener: Box<dyn Listener>) {
        self.listeners.push(listener);
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// True when nobody listens.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Emits Added.
    pub fn emit_added(&mut self, entry: &Entry) {
        for listener in &mut self.listeners {
            if let Some(l) = listener.as_added() {
                l.entry_added(entry);
            }
        }
    }

    /// Emits Updated.
    pub fn emit_updated(&mut self, entry: &Entry) {
        for listener in &mut self.listeners {
            if let Some(l) = listener.as_updated() {
                l.entry_updated(entry);
            }
        }
    }

    /// Emits Removed.
    pub fn emit_removed(&mut self, entry: &Entry) {
        for listener in &mut self.listeners {
            if let Some(l) = listener.as_removed() {
                l.entry_removed(entry);
            }
        }
    }

    /// Emits Selected.
    pub fn emit_selected(&mut self, entry: &Entry) {
        for listener in &mut self.listeners {
            if let Some(l) = listener.as_selected() {
                l.entry_selected(entry);
            }
        }
    }

    /// Emits OnFrequency.
    pub fn emit_on_frequency(&mut self, entry: &Entry, available: bool) {
        for listener in &mut self.listeners {
            if let Some(l) = listener.as_on_frequency() {
                l.entry_on_frequency(entry, available);
            }
        }
    }
}
