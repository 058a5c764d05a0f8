//! Spot records and spot sources.

use serde::{Deserialize, Serialize};

use crate::types::{Band, FreqHz, Mode, TimestampMs};

/// Where a spot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Source {
    /// Synthetic spot emitted when a QSO with the station was logged.
    Worked,
    /// Entered by the operator.
    #[default]
    Manual,
    /// Local CW/RTTY skimmer decoder.
    Skimmer,
    /// Reverse Beacon Network feed.
    Rbn,
    /// DX cluster feed.
    Cluster,
}

impl Source {
    /// Ranking priority used by the weighted value; higher is more trusted.
    ///
    /// [`Source::Worked`] ranks 0 since worked entries never carry value.
    pub fn priority(self) -> u8 {
        match self {
            Source::Worked => 0,
            Source::Manual => 4,
            Source::Skimmer => 3,
            Source::Rbn => 2,
            Source::Cluster => 1,
        }
    }

    /// Merge precedence: a worked spot beats everything, then by priority.
    pub fn is_more_authoritative_than(self, other: Source) -> bool {
        match (self, other) {
            (Source::Worked, Source::Worked) => false,
            (Source::Worked, _) => true,
            (_, Source::Worked) => false,
            _ => self.priority() > other.priority(),
        }
    }

    /// Sources whose data is verified at this station and never overruled.
    pub fn is_locally_verified(self) -> bool {
        matches!(self, Source::Worked | Source::Manual)
    }
}

/// One sighting of a callsign on a frequency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Spot {
    /// Spotted callsign.
    pub call: String,
    /// Spotted frequency.
    pub freq_hz: FreqHz,
    /// Band bucket.
    pub band: Band,
    /// Mode, `None` when the source did not report one.
    pub mode: Option<Mode>,
    /// Time of the sighting.
    pub ts_ms: TimestampMs,
    /// Origin of the spot.
    pub source: Source,
}

impl Spot {
    /// Builds a spot, deriving the band from the frequency.
    pub fn new(
        call: impl Into<String>,
        freq_hz: FreqHz,
        mode: Option<Mode>,
        ts_ms: TimestampMs,
        source: Source,
    ) -> Self {
        Self {
            call: call.into(),
            freq_hz,
            band: Band::from_frequency(freq_hz),
            mode,
            ts_ms,
            source,
        }
    }
}
