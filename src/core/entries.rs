//! The ranking engine: an ordered set of entries fed by spots.

use std::time::Duration;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    engine::{
        traits::{Callinfo, NullCallinfo},
        weights::Weights,
    },
    spot::{Source, Spot},
    types::{Band, EntryId, FreqHz, TimestampMs},
};

use super::{
    entry::{Entry, Quality},
    notifier::{Listener, Notifier},
    order::{BandmapFilter, BandmapOrder},
};

/// Aggregated score of the entries on one band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandSummary {
    /// Band this row describes.
    pub band: Band,
    /// Sum of points of all counted entries.
    pub points: i32,
    /// Sum of multipliers of all counted entries.
    pub multis: i32,
    /// The radio currently operates on this band.
    pub active: bool,
    /// The bandmap view currently shows this band.
    pub visible: bool,
    /// This band carries the highest points of all bands.
    pub max_points: bool,
    /// This band carries the most multipliers of all bands.
    pub max_multis: bool,
}

impl BandSummary {
    fn new(band: Band) -> Self {
        Self {
            band,
            points: 0,
            multis: 0,
            active: false,
            visible: false,
            max_points: false,
            max_multis: false,
        }
    }
}

/// Ordered collection of entries.
///
/// The collection is kept sorted by the active order at all times and every
/// entry's `index` equals its position. Each structural change rewrites all
/// indices, which is O(n); a contest band rarely holds more than a few hundred
/// stations.
pub struct Entries {
    entries: Vec<Entry>,
    order: BandmapOrder,
    bands: Vec<Band>,
    summaries: HashMap<Band, BandSummary>,
    callinfo: Box<dyn Callinfo>,
    counts_to_summary: BandmapFilter,
    notifier: Notifier,
    next_id: EntryId,
}

impl std::fmt::Debug for Entries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entries")
            .field("entries", &self.entries.len())
            .field("bands", &self.bands)
            .field("notifier", &self.notifier)
            .finish()
    }
}

impl Entries {
    /// Creates an empty collection for `bands`, scored by [`NullCallinfo`].
    pub fn new(bands: Vec<Band>, order: BandmapOrder, counts_to_summary: BandmapFilter) -> Self {
        let summaries = bands.iter().map(|b| (*b, BandSummary::new(*b))).collect();
        Self {
            entries: Vec::new(),
            order,
            bands,
            summaries,
            callinfo: Box::new(NullCallinfo),
            counts_to_summary,
            notifier: Notifier::new(),
            next_id: 1,
        }
    }

    /// Attaches the scorer.
    pub fn set_callinfo(&mut self, callinfo: Box<dyn Callinfo>) {
        self.callinfo = callinfo;
    }

    /// Registers a listener.
    pub fn notify(&mut self, listener: Box<dyn Listener>) {
        self.notifier.notify(listener);
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in sort order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// Entry at `index`.
    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Entry with the given id.
    pub fn by_id(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Routes `spot` to a matching entry or creates a new one.
    ///
    /// Entries of the same call that end up inside the merged entry's window
    /// are folded into it, each emitting Removed.
    pub fn add(&mut self, spot: Spot, now: TimestampMs, weights: &Weights) {
        let mut best_quality = Quality::Unknown;
        let mut matched_at = None;
        for (i, entry) in self.entries.iter().enumerate() {
            let (quality, matched) = entry.matches(&spot);
            if matched {
                matched_at = Some(i);
                break;
            }
            if quality.rank() > best_quality.rank() {
                best_quality = quality;
            }
        }

        let position = match matched_at {
            Some(i) => {
                self.entries[i].add(spot);
                i
            }
            None => {
                let entry = Entry::new(spot);
                match self.entries.iter().position(|e| e.is_duplicate_of(&entry)) {
                    Some(i) => {
                        self.entries[i].absorb(entry);
                        i
                    }
                    None => {
                        self.add_new(entry, best_quality, now, weights);
                        return;
                    }
                }
            }
        };

        let position = self.fold_duplicates(position);
        let mut entry = self.entries.remove(position);
        update_info(self.callinfo.as_ref(), &mut entry, now, weights);
        trace!(call = %entry.call, freq_hz = entry.frequency, spots = entry.spot_count, "spot merged");
        let index = self.insert(entry);
        self.notifier.emit_updated(&self.entries[index]);
    }

    fn add_new(&mut self, mut entry: Entry, quality: Quality, now: TimestampMs, weights: &Weights) {
        entry.id = self.next_id;
        self.next_id += 1;
        entry.quality = quality;
        if !entry.call.is_empty() {
            update_info(self.callinfo.as_ref(), &mut entry, now, weights);
        }
        debug!(call = %entry.call, freq_hz = entry.frequency, quality = ?entry.quality, "entry added");
        let index = self.insert(entry);
        self.notifier.emit_added(&self.entries[index]);
    }

    fn fold_duplicates(&mut self, mut position: usize) -> usize {
        while let Some(other) = (0..self.entries.len())
            .find(|&j| j != position && self.entries[j].is_duplicate_of(&self.entries[position]))
        {
            let mut absorbed = self.entries.remove(other);
            absorbed.index = other;
            if other < position {
                position -= 1;
            }
            debug!(call = %absorbed.call, freq_hz = absorbed.frequency, "duplicate entry folded");
            self.notifier.emit_removed(&absorbed);
            self.entries[position].absorb(absorbed);
        }
        position
    }

    // Age-out can pull two entries of one call together. The one with fewer
    // spots is dropped; survivors never gain spots here.
    fn drop_duplicates(&mut self) -> usize {
        let mut dropped = 0;
        loop {
            let pair = self.entries.iter().enumerate().find_map(|(i, a)| {
                self.entries[i + 1..]
                    .iter()
                    .position(|b| a.is_duplicate_of(b))
                    .map(|k| (i, i + 1 + k))
            });
            let Some((i, j)) = pair else {
                return dropped;
            };
            let weaker = if outranks(&self.entries[i], &self.entries[j]) { j } else { i };
            let mut entry = self.entries.remove(weaker);
            entry.index = weaker;
            debug!(call = %entry.call, freq_hz = entry.frequency, "duplicate entry dropped");
            self.notifier.emit_removed(&entry);
            dropped += 1;
        }
    }

    // rewrites every index, O(n) per insertion
    fn insert(&mut self, entry: Entry) -> usize {
        let index = self.find_index_for_insert(&entry);
        self.entries.insert(index, entry);
        self.reindex();
        index
    }

    /// Binary search for the first position whose entry does not sort before
    /// `entry`; equal entries are shifted to the right.
    pub fn find_index_for_insert(&self, entry: &Entry) -> usize {
        let order = &self.order;
        self.entries
            .partition_point(|e| order(e, entry) == std::cmp::Ordering::Less)
    }

    fn reindex(&mut self) {
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.index = i;
        }
    }

    fn resort(&mut self) {
        let order = std::sync::Arc::clone(&self.order);
        self.entries.sort_by(|a, b| order(a, b));
        self.reindex();
    }

    /// Ages out spots older than `max_age`, refreshes scores and rebuilds the
    /// band summaries.
    pub fn clean_out(&mut self, max_age: Duration, now: TimestampMs, weights: &Weights) {
        let deadline = now.saturating_sub(u64::try_from(max_age.as_millis()).unwrap_or(u64::MAX));
        let previous: HashMap<EntryId, Entry> =
            self.entries.iter().map(|e| (e.id, e.clone())).collect();

        let mut expired: Vec<(TimestampMs, usize, EntryId)> = Vec::new();
        for entry in &mut self.entries {
            if !entry.remove_spots_before(deadline) {
                expired.push((entry.last_heard, entry.index, entry.id));
            }
        }
        expired.sort_unstable();

        let mut removed = expired.len();
        for (_, _, id) in expired {
            let Some(position) = self.entries.iter().position(|e| e.id == id) else {
                continue;
            };
            let mut entry = self.entries.remove(position);
            entry.index = position;
            debug!(call = %entry.call, freq_hz = entry.frequency, "entry removed");
            self.notifier.emit_removed(&entry);
        }
        removed += self.drop_duplicates();

        for entry in &mut self.entries {
            update_info(self.callinfo.as_ref(), entry, now, weights);
        }
        self.resort();

        let mut updated = 0usize;
        for entry in &self.entries {
            if previous.get(&entry.id) != Some(entry) {
                updated += 1;
                self.notifier.emit_updated(entry);
            }
        }

        self.update_summaries();
        debug!(removed, updated, remaining = self.entries.len(), "clean out");
    }

    fn update_summaries(&mut self) {
        self.summaries = self.bands.iter().map(|b| (*b, BandSummary::new(*b))).collect();

        for entry in &self.entries {
            if !(self.counts_to_summary)(entry) {
                continue;
            }
            let Some(summary) = self.summaries.get_mut(&entry.band) else {
                continue;
            };
            let value = self.callinfo.get_value(&entry.call, entry.band, entry.mode);
            summary.points += value.points;
            summary.multis += value.multis;
        }

        let mut max_points: Option<(Band, i32)> = None;
        let mut max_multis: Option<(Band, i32)> = None;
        for band in &self.bands {
            let Some(summary) = self.summaries.get(band) else {
                continue;
            };
            if summary.points > max_points.map_or(0, |(_, p)| p) {
                max_points = Some((*band, summary.points));
            }
            if summary.multis > max_multis.map_or(0, |(_, m)| m) {
                max_multis = Some((*band, summary.multis));
            }
        }
        if let Some(summary) = max_points.and_then(|(b, _)| self.summaries.get_mut(&b)) {
            summary.max_points = true;
        }
        if let Some(summary) = max_multis.and_then(|(b, _)| self.summaries.get_mut(&b)) {
            summary.max_multis = true;
        }
    }

    /// One summary row per configured band.
    pub fn bands(&self, active: Band, visible: Band) -> Vec<BandSummary> {
        self.bands
            .iter()
            .map(|band| {
                let mut summary = self
                    .summaries
                    .get(band)
                    .cloned()
                    .unwrap_or_else(|| BandSummary::new(*band));
                summary.active = *band == active;
                summary.visible = *band == visible;
                summary
            })
            .collect()
    }

    /// Entries accepted by every filter, sorted by `order`.
    pub fn query(&self, order: &BandmapOrder, filters: &[BandmapFilter]) -> Vec<Entry> {
        let mut result: Vec<Entry> = self
            .entries
            .iter()
            .filter(|e| filters.iter().all(|f| f(e)))
            .cloned()
            .collect();
        result.sort_by(|a, b| order(a, b));
        result
    }

    /// Copy of all entries in sort order.
    pub fn all(&self) -> Vec<Entry> {
        self.entries.clone()
    }

    /// Copy of all entries sorted by `order`.
    pub fn all_by(&self, order: &BandmapOrder) -> Vec<Entry> {
        self.query(order, &[])
    }

    /// Calls `f` for every entry in sort order.
    pub fn for_each(&self, mut f: impl FnMut(&Entry)) {
        for entry in &self.entries {
            f(entry);
        }
    }

    /// Calls `f` with the entry at `index`, or with an empty entry when out of range.
    pub fn do_on_entry(&self, index: usize, f: impl FnOnce(&Entry)) {
        match self.entries.get(index) {
            Some(entry) => f(entry),
            None => f(&Entry::default()),
        }
    }

    /// Emits Selected for the entry at `index`; ignored when out of range.
    pub fn select(&mut self, index: usize) {
        let Some(entry) = self.entries.get(index) else {
            return;
        };
        debug!(call = %entry.call, freq_hz = entry.frequency, "entry selected");
        self.notifier.emit_selected(entry);
    }

    /// The entry nearest to `freq_hz` that is on that frequency.
    pub fn at_frequency(&self, freq_hz: FreqHz) -> Option<&Entry> {
        self.entries
            .iter()
            .filter(|e| e.on_frequency(freq_hz))
            .min_by_key(|e| e.frequency.abs_diff(freq_hz))
    }

    /// Emits OnFrequency for the entry at `freq_hz` on `band`, if any.
    pub fn emit_on_frequency(&mut self, band: Band, freq_hz: FreqHz) {
        let found = self
            .entries
            .iter()
            .filter(|e| e.band == band && e.on_frequency(freq_hz))
            .min_by_key(|e| e.frequency.abs_diff(freq_hz));
        match found {
            Some(entry) => self.notifier.emit_on_frequency(entry, true),
            None => self.notifier.emit_on_frequency(&Entry::default(), false),
        }
    }

    /// Replaces the active order and re-sorts.
    pub fn set_order(&mut self, order: BandmapOrder) {
        self.order = order;
        self.resort();
    }

    /// Removes every entry, emitting Removed for each.
    pub fn clear(&mut self) {
        let entries = std::mem::take(&mut self.entries);
        for entry in &entries {
            self.notifier.emit_removed(entry);
        }
        self.update_summaries();
    }
}

fn update_info(callinfo: &dyn Callinfo, entry: &mut Entry, now: TimestampMs, weights: &Weights) {
    if entry.call.is_empty() {
        return;
    }
    entry.info = callinfo.get_info(&entry.call, entry.band, entry.mode, &[]);
    entry.info.weighted_value = calculate_weighted_value(entry, now, weights);
}

fn outranks(a: &Entry, b: &Entry) -> bool {
    a.spot_count > b.spot_count || (a.spot_count == b.spot_count && a.id < b.id)
}

/// Ranking priority of `entry`: its contest value scaled by freshness,
/// corroboration, source and quality. Worked entries are always 0.
pub fn calculate_weighted_value(entry: &Entry, now: TimestampMs, weights: &Weights) -> f64 {
    if entry.source == Source::Worked {
        return 0.0;
    }

    let value = f64::from(entry.info.value);
    let age_seconds = now.saturating_sub(entry.last_heard) as f64 / 1000.0;
    let quality = if entry.quality.rank() > Quality::Busted.rank() {
        f64::from(entry.quality.rank())
    } else {
        0.0
    };
    let weight = 1.0
        + age_seconds * weights.age_seconds
        + entry.spot_count as f64 * weights.spots
        + f64::from(entry.source.priority()) * weights.source
        + quality * weights.quality;

    value * weight
}
