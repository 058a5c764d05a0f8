//! Navigation cursor over the entries.

use std::sync::Arc;

use tracing::debug;

use crate::types::{EntryId, FreqHz};

use super::{
    entries::Entries,
    entry::Entry,
    order::{self, BandmapFilter, BandmapOrder},
};

/// The currently selected entry, kept as a snapshot.
///
/// Selection only reads [`Entries`]; emitting the Selected event is up to the
/// owner of the entries.
pub struct Selection {
    selected: Entry,
    has_selection: bool,
    visible: BandmapFilter,
}

impl Default for Selection {
    fn default() -> Self {
        Self::new(order::all())
    }
}

impl std::fmt::Debug for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selection")
            .field("selected", &self.selected.call)
            .field("has_selection", &self.has_selection)
            .finish()
    }
}

impl Selection {
    /// Creates an empty selection that only considers entries passing `visible`.
    pub fn new(visible: BandmapFilter) -> Self {
        Self {
            selected: Entry::default(),
            has_selection: false,
            visible,
        }
    }

    /// Replaces the visibility filter.
    pub fn set_visible(&mut self, visible: BandmapFilter) {
        self.visible = visible;
    }

    /// Snapshot of the selected entry, if any.
    pub fn selected(&self) -> Option<&Entry> {
        self.has_selection.then_some(&self.selected)
    }

    /// True when an entry is selected.
    pub fn has_selection(&self) -> bool {
        self.has_selection
    }

    /// Selects the visible entry with `id`, clears the selection otherwise.
    pub fn select_entry(&mut self, entries: &Entries, id: EntryId) -> Option<Entry> {
        let found = entries
            .iter()
            .find(|e| (self.visible)(e) && e.id == id)
            .cloned();
        self.apply(found)
    }

    /// Selects the visible entry with callsign `call`, clears the selection otherwise.
    pub fn select_by_callsign(&mut self, entries: &Entries, call: &str) -> Option<Entry> {
        let found = entries
            .iter()
            .find(|e| (self.visible)(e) && e.call == call)
            .cloned();
        self.apply(found)
    }

    /// Selects the visible, not yet worked entry with the highest weighted value.
    pub fn select_highest_value(&mut self, entries: &Entries) -> Option<Entry> {
        let filters = [Arc::clone(&self.visible), order::not_worked()];
        self.select_first(entries, &order::by_descending_value(), &filters)
    }

    /// Selects the visible entry closest to `freq_hz`, skipping entries exactly on it.
    pub fn select_nearest(&mut self, entries: &Entries, freq_hz: FreqHz) -> Option<Entry> {
        let filters = [Arc::clone(&self.visible), order::not_on(freq_hz)];
        self.select_first(entries, &order::by_distance(freq_hz), &filters)
    }

    /// Selects the next visible entry above `freq_hz`.
    ///
    /// Entries sharing the reference frequency are stepped through by
    /// ascending id, starting after the current selection.
    pub fn select_next_up(&mut self, entries: &Entries, freq_hz: FreqHz) -> Option<Entry> {
        let current = self.current_id();
        let up: BandmapFilter = Arc::new(move |e: &Entry| {
            e.frequency > freq_hz
                || (e.frequency == freq_hz && current.is_some_and(|id| e.id > id))
        });
        let filters = [Arc::clone(&self.visible), up];
        self.select_first(entries, &order::by_distance(freq_hz), &filters)
    }

    /// Selects the next visible entry below `freq_hz`.
    ///
    /// Mirror image of [`Selection::select_next_up`]: same-frequency entries
    /// are stepped through by descending id.
    pub fn select_next_down(&mut self, entries: &Entries, freq_hz: FreqHz) -> Option<Entry> {
        let current = self.current_id();
        let down: BandmapFilter = Arc::new(move |e: &Entry| {
            e.frequency < freq_hz
                || (e.frequency == freq_hz && current.is_some_and(|id| e.id < id))
        });
        let filters = [Arc::clone(&self.visible), down];
        let distance_then_descending_id: BandmapOrder = Arc::new(move |a: &Entry, b: &Entry| {
            a.frequency
                .abs_diff(freq_hz)
                .cmp(&b.frequency.abs_diff(freq_hz))
                .then_with(|| b.id.cmp(&a.id))
        });
        self.select_first(entries, &distance_then_descending_id, &filters)
    }

    /// Re-reads the selected entry after the entries changed; clears the
    /// selection if it is gone or no longer visible.
    pub fn refresh(&mut self, entries: &Entries) {
        let Some(id) = self.current_id() else {
            return;
        };
        match entries.by_id(id).filter(|e| (self.visible)(e)) {
            Some(entry) => self.selected = entry.clone(),
            None => self.clear(),
        }
    }

    /// Resets the selection.
    pub fn clear(&mut self) {
        self.selected = Entry::default();
        self.has_selection = false;
    }

    fn current_id(&self) -> Option<EntryId> {
        self.has_selection.then_some(self.selected.id)
    }

    fn select_first(
        &mut self,
        entries: &Entries,
        order: &BandmapOrder,
        filters: &[BandmapFilter],
    ) -> Option<Entry> {
        let found = entries.query(order, filters).into_iter().next();
        self.apply(found)
    }

    fn apply(&mut self, found: Option<Entry>) -> Option<Entry> {
        match found {
            Some(entry) => {
                debug!(call = %entry.call, freq_hz = entry.frequency, "selection changed");
                self.selected = entry.clone();
                self.has_selection = true;
                Some(entry)
            }
            None => {
                self.clear();
                None
            }
        }
    }
}
