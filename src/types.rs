//! Shared primitive IDs and band/mode enums.

use serde::{Deserialize, Serialize};

/// Stable bandmap entry identifier.
pub type EntryId = u64;
/// Frequency in Hz.
pub type FreqHz = u64;
/// Timestamp in milliseconds since epoch.
pub type TimestampMs = u64;

/// HF contest band bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Band {
    /// 160 meters.
    B160m,
    /// 80 meters.
    B80m,
    /// 40 meters.
    B40m,
    /// 20 meters.
    B20m,
    /// 15 meters.
    B15m,
    /// 10 meters.
    B10m,
    /// Any non-standard band.
    #[default]
    Other,
}

impl Band {
    /// The six HF contest bands, lowest first.
    pub const CONTEST_BANDS: [Band; 6] = [
        Band::B160m,
        Band::B80m,
        Band::B40m,
        Band::B20m,
        Band::B15m,
        Band::B10m,
    ];

    /// Maps a frequency onto its contest band, [`Band::Other`] outside of them.
    pub fn from_frequency(freq_hz: FreqHz) -> Self {
        match freq_hz {
            1_800_000..=2_000_000 => Band::B160m,
            3_500_000..=4_000_000 => Band::B80m,
            7_000_000..=7_300_000 => Band::B40m,
            14_000_000..=14_350_000 => Band::B20m,
            21_000_000..=21_450_000 => Band::B15m,
            28_000_000..=29_700_000 => Band::B10m,
            _ => Band::Other,
        }
    }

    /// Short display name, e.g. `"20m"`.
    pub fn name(self) -> &'static str {
        match self {
            Band::B160m => "160m",
            Band::B80m => "80m",
            Band::B40m => "40m",
            Band::B20m => "20m",
            Band::B15m => "15m",
            Band::B10m => "10m",
            Band::Other => "other",
        }
    }
}

/// Emission mode bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Continuous Wave.
    CW,
    /// Single side-band phone.
    SSB,
    /// Radio teletype.
    RTTY,
    /// Any other digital mode.
    Digital,
}

/// Returns true when both modes are equal or either side is unknown.
pub fn modes_compatible(a: Option<Mode>, b: Option<Mode>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    }
}
