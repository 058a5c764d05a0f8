//! Scorer integration and ranking weights.

/// Scorer collaborator trait and score records.
pub mod traits;
/// Weighted value tuning factors.
pub mod weights;
