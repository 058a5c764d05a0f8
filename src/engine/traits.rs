use serde::{Deserialize, Serialize};

use crate::types::{Band, Mode};

/// Contest score information for one callsign on one band/mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CallInfo {
    /// Callsign the information was looked up for.
    pub call: String,
    /// QSO points a contact would earn.
    pub points: i32,
    /// Multipliers a contact would add.
    pub multis: i32,
    /// Raw contest value of a contact.
    pub value: i32,
    /// Value after the bandmap's ranking weights were applied.
    pub weighted_value: f64,
    /// The call was already worked on this band/mode.
    pub duplicate: bool,
    /// The call was already worked at all.
    pub worked: bool,
    /// Exchange fields predicted from earlier contacts or call history.
    pub predicted_exchange: Vec<String>,
}

/// Points and multipliers of a callsign, plus the multiplier values it would add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ScoreValue {
    /// QSO points.
    pub points: i32,
    /// Number of new multipliers.
    pub multis: i32,
    /// Multiplier values, e.g. the DXCC entity or zone.
    pub multi_values: Vec<String>,
}

/// Scorer collaborator consulted by the bandmap.
///
/// Lookups must be fast, synchronous and in memory: they run inside every
/// spot insertion and every clean-out sweep.
pub trait Callinfo: Send {
    /// Full score information for `call`; `exchange` is what the operator has
    /// copied so far, empty when unknown.
    fn get_info(&self, call: &str, band: Band, mode: Option<Mode>, exchange: &[String]) -> CallInfo;

    /// Points and multipliers only.
    fn get_value(&self, call: &str, band: Band, mode: Option<Mode>) -> ScoreValue {
        let info = self.get_info(call, band, mode, &[]);
        ScoreValue {
            points: info.points,
            multis: info.multis,
            multi_values: Vec::new(),
        }
    }
}

/// Scorer used when none is attached; every call scores zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCallinfo;

impl Callinfo for NullCallinfo {
    fn get_info(&self, call: &str, _band: Band, _mode: Option<Mode>, _exchange: &[String]) -> CallInfo {
        CallInfo {
            call: call.to_string(),
            ..CallInfo::default()
        }
    }

    fn get_value(&self, _call: &str, _band: Band, _mode: Option<Mode>) -> ScoreValue {
        ScoreValue::default()
    }
}
