//! A bandmap entry: the spots believed to belong to one station on the air.

use serde::{Deserialize, Serialize};

use crate::{
    engine::traits::CallInfo,
    spot::{Source, Spot},
    types::{Band, EntryId, FreqHz, Mode, TimestampMs, modes_compatible},
};

use super::callsign::edit_distance;

/// Entry frequencies are quantized to this step.
pub const FREQUENCY_STEP_HZ: FreqHz = 10;
/// Number of spots needed before an entry counts as valid.
pub const VALID_SPOT_THRESHOLD: usize = 3;
/// Largest edit distance at which two callsigns are considered similar.
pub const MAX_CALLSIGN_DISTANCE: usize = 2;
/// A frequency closer than this to an entry is on the entry's frequency.
pub const ON_FREQUENCY_WINDOW_HZ: FreqHz = 25;
/// Neighbourhood within which [`Entry::proximity_factor`] is non-zero.
pub const PROXIMITY_WINDOW_HZ: FreqHz = 500;

/// Confidence classification of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Quality {
    /// Not enough evidence either way.
    #[default]
    Unknown,
    /// Probably a mis-copied call of a valid entry on the same frequency.
    Busted,
    /// Probably a valid station that moved to another frequency.
    QSY,
    /// Corroborated by enough spots.
    Valid,
}

impl Quality {
    /// Numeric rank, higher is more trustworthy.
    pub fn rank(self) -> u8 {
        match self {
            Quality::Unknown => 0,
            Quality::Busted => 1,
            Quality::QSY => 2,
            Quality::Valid => 3,
        }
    }
}

/// Aggregated cluster of spots for one station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Entry {
    /// Stable identifier, assigned by [`super::entries::Entries`].
    pub id: EntryId,
    /// Callsign.
    pub call: String,
    /// Quantized mean frequency of all spots.
    pub frequency: FreqHz,
    /// Band bucket.
    pub band: Band,
    /// Mode, `None` while no spot reported one.
    pub mode: Option<Mode>,
    /// Most recent spot time.
    pub last_heard: TimestampMs,
    /// Most authoritative source seen.
    pub source: Source,
    /// Number of spots currently aggregated.
    pub spot_count: usize,
    /// Confidence classification.
    pub quality: Quality,
    /// Position in the sort order of the owning collection.
    pub index: usize,
    /// Score information from the scorer.
    pub info: CallInfo,
    spots: Vec<Spot>,
}

impl Entry {
    /// Seeds a new entry from its first spot.
    pub fn new(spot: Spot) -> Self {
        Self {
            id: 0,
            call: spot.call.clone(),
            frequency: quantize(spot.freq_hz as f64),
            band: spot.band,
            mode: spot.mode,
            last_heard: spot.ts_ms,
            source: spot.source,
            spot_count: 1,
            quality: Quality::Unknown,
            index: 0,
            info: CallInfo::default(),
            spots: vec![spot],
        }
    }

    /// Spots aggregated in this entry.
    pub fn spots(&self) -> &[Spot] {
        &self.spots
    }

    /// True when `freq_hz` lies within [`ON_FREQUENCY_WINDOW_HZ`] of the
    /// unquantized mean of this entry's spots.
    pub fn on_frequency(&self, freq_hz: FreqHz) -> bool {
        (self.center_hz() - freq_hz as f64).abs() < ON_FREQUENCY_WINDOW_HZ as f64
    }

    /// Same station and frequency cluster as `other`, seen from either side.
    pub fn is_duplicate_of(&self, other: &Entry) -> bool {
        self.call == other.call
            && self.band == other.band
            && modes_compatible(self.mode, other.mode)
            && (self.on_frequency(other.frequency) || other.on_frequency(self.frequency))
    }

    /// Fades from 1.0 on the entry's frequency to 0.0 at [`PROXIMITY_WINDOW_HZ`].
    pub fn proximity_factor(&self, freq_hz: FreqHz) -> f64 {
        let distance = self.frequency.abs_diff(freq_hz);
        if distance >= PROXIMITY_WINDOW_HZ {
            return 0.0;
        }
        1.0 - distance as f64 / PROXIMITY_WINDOW_HZ as f64
    }

    /// Decides whether `spot` belongs to this entry.
    ///
    /// Returns the merge flag together with a quality signal. For a merge the
    /// signal is the quality the entry earns with the extra spot; otherwise it
    /// tells whether the spot looks like a QSY or a busted call of this entry.
    pub fn matches(&self, spot: &Spot) -> (Quality, bool) {
        if spot.band != self.band || !modes_compatible(spot.mode, self.mode) {
            return (Quality::Unknown, false);
        }

        let distance = edit_distance(&self.call, &spot.call);
        let on_frequency = self.on_frequency(spot.freq_hz);
        let quality = if self.spot_count + 1 >= VALID_SPOT_THRESHOLD {
            Quality::Valid
        } else {
            Quality::Unknown
        };

        match (distance, on_frequency) {
            (0, true) => (quality, true),
            (0, false) if self.quality == Quality::Valid => (Quality::QSY, false),
            (d, true) if self.quality == Quality::Valid && d <= MAX_CALLSIGN_DISTANCE => {
                (Quality::Busted, false)
            }
            _ => (Quality::Unknown, false),
        }
    }

    /// Merges `spot` into this entry if it matches.
    pub fn add(&mut self, spot: Spot) -> (Quality, bool) {
        let (quality, matched) = self.matches(&spot);
        if !matched {
            return (quality, matched);
        }

        if spot.source.is_more_authoritative_than(self.source) {
            self.source = spot.source;
        }
        if self.mode.is_none() {
            self.mode = spot.mode;
        }
        self.last_heard = self.last_heard.max(spot.ts_ms);
        self.spots.push(spot);
        self.spot_count = self.spots.len();
        self.frequency = self.mean_frequency();
        if quality == Quality::Valid {
            self.quality = Quality::Valid;
        }

        (quality, matched)
    }

    /// Takes over all spots of `other`, a duplicate of this entry.
    pub fn absorb(&mut self, other: Entry) {
        if other.source.is_more_authoritative_than(self.source) {
            self.source = other.source;
        }
        if self.mode.is_none() {
            self.mode = other.mode;
        }
        if other.quality.rank() > self.quality.rank() {
            self.quality = other.quality;
        }
        self.last_heard = self.last_heard.max(other.last_heard);
        self.spots.extend(other.spots);
        self.spot_count = self.spots.len();
        self.frequency = self.mean_frequency();
        if self.spot_count >= VALID_SPOT_THRESHOLD {
            self.quality = Quality::Valid;
        }
    }

    /// Drops all spots older than `ts_ms`; returns whether any spot is left.
    pub fn remove_spots_before(&mut self, ts_ms: TimestampMs) -> bool {
        let before = self.spots.len();
        self.spots.retain(|spot| spot.ts_ms >= ts_ms);
        if self.spots.is_empty() {
            self.spot_count = 0;
            return false;
        }
        if self.spots.len() == before {
            return true;
        }

        self.spot_count = self.spots.len();
        self.frequency = self.mean_frequency();
        self.last_heard = self.spots.iter().map(|s| s.ts_ms).max().unwrap_or(self.last_heard);
        self.source = self
            .spots
            .iter()
            .map(|s| s.source)
            .reduce(|best, s| if s.is_more_authoritative_than(best) { s } else { best })
            .unwrap_or(self.source);
        if self.spot_count < VALID_SPOT_THRESHOLD {
            self.quality = Quality::Unknown;
        }

        true
    }

    fn center_hz(&self) -> f64 {
        if self.spots.is_empty() {
            return self.frequency as f64;
        }
        let sum: f64 = self.spots.iter().map(|s| s.freq_hz as f64).sum();
        sum / self.spots.len() as f64
    }

    fn mean_frequency(&self) -> FreqHz {
        quantize(self.center_hz())
    }
}

/// Rounds a frequency to the nearest [`FREQUENCY_STEP_HZ`].
pub fn quantize(freq_hz: f64) -> FreqHz {
    let step = FREQUENCY_STEP_HZ as f64;
    ((freq_hz / step).round() * step) as FreqHz
}
