//! Bandmap entries, their matching rules, ordering and navigation.

/// Callsign edit distance.
pub mod callsign;
/// The ranking engine.
pub mod entries;
/// A single aggregated entry.
pub mod entry;
/// Busted-call fragmentation check.
pub mod false_entry;
/// Listener fan-out.
pub mod notifier;
/// Orders and filters over entries.
pub mod order;
/// Navigation cursor.
pub mod selection;
