use serde::{Deserialize, Serialize};

/// Tuning factors of the weighted value ranking.
///
/// `weight = 1 + age_s * age_seconds + spots * spots + source * source + quality * quality`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    /// Factor per second since the entry was last heard.
    pub age_seconds: f64,
    /// Factor per corroborating spot.
    pub spots: f64,
    /// Factor per step of source priority.
    pub source: f64,
    /// Factor per step of quality rank, applied above Busted only.
    pub quality: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            age_seconds: -0.001,
            spots: 0.001,
            source: 0.1,
            quality: 0.1,
        }
    }
}

impl Weights {
    /// All factors zero: the weighted value equals the raw value.
    pub fn neutral() -> Self {
        Self {
            age_seconds: 0.0,
            spots: 0.0,
            source: 0.0,
            quality: 0.0,
        }
    }
}
