//! Detection of entries fragmented by busted callsigns.

use serde::{Deserialize, Serialize};

use super::{
    callsign::similar,
    entry::{Entry, MAX_CALLSIGN_DISTANCE},
};

/// Outcome of comparing two distinct entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FalseEntryCheckResult {
    /// The entries represent different stations.
    DifferentEntries,
    /// Same callsign on a similar frequency: a duplicate to merge.
    EqualEntries,
    /// The first entry is probably a busted copy of the second.
    FirstIsFalse,
    /// The second entry is probably a busted copy of the first.
    SecondIsFalse,
}

/// Compares two entries and judges whether one of them is a false entry.
///
/// Entries from locally verified sources are never judged false.
pub fn check_false_entry(entry1: &Entry, entry2: &Entry) -> FalseEntryCheckResult {
    if entry1.source.is_locally_verified() || entry2.source.is_locally_verified() {
        return FalseEntryCheckResult::DifferentEntries;
    }

    let callsign_similar = similar(&entry1.call, &entry2.call, MAX_CALLSIGN_DISTANCE);
    let frequency_similar = entry1.on_frequency(entry2.frequency);
    if !callsign_similar || !frequency_similar {
        return FalseEntryCheckResult::DifferentEntries;
    }

    if entry1.call == entry2.call {
        return FalseEntryCheckResult::EqualEntries;
    }

    if outweighed(entry1.spot_count, entry2.spot_count) {
        FalseEntryCheckResult::FirstIsFalse
    } else if outweighed(entry2.spot_count, entry1.spot_count) {
        FalseEntryCheckResult::SecondIsFalse
    } else {
        FalseEntryCheckResult::DifferentEntries
    }
}

// A lone spot against a well corroborated counterpart.
fn outweighed(spot_count: usize, counterpart: usize) -> bool {
    spot_count == 1 && counterpart > 2
}
