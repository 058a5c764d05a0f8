//! Live contest bandmap: spot aggregation, ranking and navigation.
//!
//! # Examples
//!
//! In-memory usage with [`bandmap::Bandmap`]:
//! ```
//! use bandmap::{
//!     bandmap::Bandmap,
//!     config::BandmapConfig,
//!     core::entry::Quality,
//!     spot::{Source, Spot},
//!     types::Mode,
//! };
//!
//! let mut map = Bandmap::new(BandmapConfig::default());
//! for (i, freq_hz) in [7_035_000, 7_035_010, 7_034_995].into_iter().enumerate() {
//!     let ts_ms = 1_000 * i as u64;
//!     map.add_spot(Spot::new("DL1ABC", freq_hz, Some(Mode::CW), ts_ms, Source::Skimmer), ts_ms);
//! }
//!
//! let entry = map.entries().get(0).expect("entry");
//! assert_eq!(map.entries().len(), 1);
//! assert_eq!(entry.quality, Quality::Valid);
//! assert_eq!(entry.frequency, 7_035_000);
//! ```
//!
//! Runtime usage with the single-writer task:
//! ```no_run
//! use bandmap::{
//!     bandmap::Bandmap,
//!     config::BandmapConfig,
//!     runtime::handle::{spawn_bandmap, Navigation, RuntimeConfig},
//!     spot::{Source, Spot},
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let handle = spawn_bandmap(Bandmap::new(BandmapConfig::default()), RuntimeConfig::default());
//! let mut events = handle.subscribe();
//! handle
//!     .add_spot(Spot::new("K1ABC", 14_025_000, None, 0, Source::Cluster))
//!     .await
//!     .expect("add spot");
//! let _event = events.recv().await.expect("event");
//! let _next = handle.select(Navigation::NextUp(14_000_000)).await.expect("select");
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```
#![deny(missing_docs)]

/// Bandmap facade.
pub mod bandmap;
/// Configuration types and loading.
pub mod config;
/// Entries, matching, ordering and navigation.
pub mod core;
/// Scorer collaborator and ranking weights.
pub mod engine;
/// Single-writer runtime handle and events.
pub mod runtime;
/// Spot records and sources.
pub mod spot;
/// Shared primitive types and enums.
pub mod types;
