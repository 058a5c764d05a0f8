//! Bandmap facade tying entries, selection and configuration together.

use tracing::debug;

use crate::{
    config::BandmapConfig,
    core::{
        entries::{BandSummary, Entries},
        entry::Entry,
        notifier::Listener,
        order,
        selection::Selection,
    },
    engine::traits::Callinfo,
    spot::Spot,
    types::{Band, EntryId, FreqHz, TimestampMs},
};

/// A live bandmap: spots in, ranked entries and navigation out.
///
/// Not synchronized; drive it from a single task, e.g. through
/// [`crate::runtime::handle::spawn_bandmap`].
#[derive(Debug)]
pub struct Bandmap {
    entries: Entries,
    selection: Selection,
    config: BandmapConfig,
    active_band: Band,
    visible_band: Band,
}

impl Bandmap {
    /// Creates an empty bandmap showing the first configured band.
    pub fn new(config: BandmapConfig) -> Self {
        let band = config.bands.first().copied().unwrap_or_default();
        let entries = Entries::new(config.bands.clone(), order::by_frequency(), order::not_worked());
        Self {
            entries,
            selection: Selection::new(order::on_band(band)),
            config,
            active_band: band,
            visible_band: band,
        }
    }

    /// Attaches the scorer.
    pub fn with_callinfo(mut self, callinfo: Box<dyn Callinfo>) -> Self {
        self.entries.set_callinfo(callinfo);
        self
    }

    /// Registers a listener for entry and selection events.
    pub fn notify(&mut self, listener: Box<dyn Listener>) {
        self.entries.notify(listener);
    }

    /// Active configuration.
    pub fn config(&self) -> &BandmapConfig {
        &self.config
    }

    /// All entries.
    pub fn entries(&self) -> &Entries {
        &self.entries
    }

    /// Current selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Band the radio operates on.
    pub fn active_band(&self) -> Band {
        self.active_band
    }

    /// Band shown by the view.
    pub fn visible_band(&self) -> Band {
        self.visible_band
    }

    /// Feeds one spot into the entries.
    pub fn add_spot(&mut self, spot: Spot, now: TimestampMs) {
        self.entries.add(spot, now, &self.config.weights);
        self.selection.refresh(&self.entries);
    }

    /// Ages out stale spots and refreshes scores and summaries.
    pub fn clean_out(&mut self, now: TimestampMs) {
        self.entries
            .clean_out(self.config.max_age(), now, &self.config.weights);
        self.selection.refresh(&self.entries);
    }

    /// Records the band the radio operates on.
    pub fn set_active_band(&mut self, band: Band) {
        self.active_band = band;
    }

    /// Switches the view to `band`; selections are limited to it.
    pub fn set_visible_band(&mut self, band: Band) {
        if band == self.visible_band {
            return;
        }
        debug!(band = band.name(), "visible band changed");
        self.visible_band = band;
        self.selection.set_visible(order::on_band(band));
        self.selection.refresh(&self.entries);
    }

    /// Tracks the radio's frequency and reports the entry found there.
    pub fn update_frequency(&mut self, freq_hz: FreqHz) {
        let band = Band::from_frequency(freq_hz);
        if band != Band::Other {
            self.active_band = band;
        }
        self.entries.emit_on_frequency(self.active_band, freq_hz);
    }

    /// Entries of the visible band, ascending by frequency.
    pub fn visible_entries(&self) -> Vec<Entry> {
        self.entries
            .query(&order::by_frequency(), &[order::on_band(self.visible_band)])
    }

    /// Summary row per configured band.
    pub fn bands(&self) -> Vec<BandSummary> {
        self.entries.bands(self.active_band, self.visible_band)
    }

    /// Selects the entry with `id`.
    pub fn select_entry(&mut self, id: EntryId) -> Option<Entry> {
        let selected = self.selection.select_entry(&self.entries, id);
        self.emit_selected(selected)
    }

    /// Selects the entry with callsign `call`.
    pub fn select_by_callsign(&mut self, call: &str) -> Option<Entry> {
        let selected = self.selection.select_by_callsign(&self.entries, call);
        self.emit_selected(selected)
    }

    /// Selects the most valuable entry not yet worked.
    pub fn select_highest_value(&mut self) -> Option<Entry> {
        let selected = self.selection.select_highest_value(&self.entries);
        self.emit_selected(selected)
    }

    /// Selects the entry nearest to `freq_hz`.
    pub fn select_nearest(&mut self, freq_hz: FreqHz) -> Option<Entry> {
        let selected = self.selection.select_nearest(&self.entries, freq_hz);
        self.emit_selected(selected)
    }

    /// Selects the next entry above `freq_hz`.
    pub fn select_next_up(&mut self, freq_hz: FreqHz) -> Option<Entry> {
        let selected = self.selection.select_next_up(&self.entries, freq_hz);
        self.emit_selected(selected)
    }

    /// Selects the next entry below `freq_hz`.
    pub fn select_next_down(&mut self, freq_hz: FreqHz) -> Option<Entry> {
        let selected = self.selection.select_next_down(&self.entries, freq_hz);
        self.emit_selected(selected)
    }

    /// Drops the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn emit_selected(&mut self, selected: Option<Entry>) -> Option<Entry> {
        if let Some(entry) = &selected {
            self.entries.select(entry.index);
        }
        selected
    }
}
