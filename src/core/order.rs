//! Comparators and predicates over entries.
//!
//! Both are plain shared closures so that callers can compose orders and
//! filters freely and hand them to the engine.

use std::{cmp::Ordering, sync::Arc};

use crate::{
    spot::Source,
    types::{Band, FreqHz},
};

use super::entry::Entry;

/// Total order over entries.
pub type BandmapOrder = Arc<dyn Fn(&Entry, &Entry) -> Ordering + Send + Sync>;
/// Predicate over a single entry.
pub type BandmapFilter = Arc<dyn Fn(&Entry) -> bool + Send + Sync>;

/// Ascending by frequency, then by callsign.
pub fn by_frequency() -> BandmapOrder {
    Arc::new(|a: &Entry, b: &Entry| {
        a.frequency
            .cmp(&b.frequency)
            .then_with(|| a.call.cmp(&b.call))
    })
}

/// Descending by weighted value.
pub fn by_descending_value() -> BandmapOrder {
    Arc::new(|a: &Entry, b: &Entry| {
        b.info
            .weighted_value
            .total_cmp(&a.info.weighted_value)
    })
}

/// Ascending by distance to `freq_hz`, ties broken by ascending id.
pub fn by_distance(freq_hz: FreqHz) -> BandmapOrder {
    Arc::new(move |a: &Entry, b: &Entry| {
        a.frequency
            .abs_diff(freq_hz)
            .cmp(&b.frequency.abs_diff(freq_hz))
            .then_with(|| a.id.cmp(&b.id))
    })
}

/// Reverses `order`.
pub fn descending(order: BandmapOrder) -> BandmapOrder {
    Arc::new(move |a: &Entry, b: &Entry| order(b, a))
}

/// Accepts every entry.
pub fn all() -> BandmapFilter {
    Arc::new(|_: &Entry| true)
}

/// Entries on `band`.
pub fn on_band(band: Band) -> BandmapFilter {
    Arc::new(move |e: &Entry| e.band == band)
}

/// Entries whose most authoritative source is `source`.
pub fn from_source(source: Source) -> BandmapFilter {
    Arc::new(move |e: &Entry| e.source == source)
}

/// Entries that were neither logged nor are duplicates.
pub fn not_worked() -> BandmapFilter {
    Arc::new(|e: &Entry| e.source != Source::Worked && !e.info.worked && !e.info.duplicate)
}

/// Entries not sitting exactly on `freq_hz`.
pub fn not_on(freq_hz: FreqHz) -> BandmapFilter {
    Arc::new(move |e: &Entry| e.frequency != freq_hz)
}

/// Conjunction of `filters`.
pub fn and(filters: Vec<BandmapFilter>) -> BandmapFilter {
    Arc::new(move |e: &Entry| filters.iter().all(|f| f(e)))
}

/// Negation of `filter`.
pub fn not(filter: BandmapFilter) -> BandmapFilter {
    Arc::new(move |e: &Entry| !filter(e))
}
