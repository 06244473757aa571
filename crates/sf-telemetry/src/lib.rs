//! `sf-telemetry`: synthetic traffic telemetry for the SafeFlow simulator.
//!
//! Produces the training corpus of the speed estimator: one
//! [`TelemetrySample`] per (day, window, road segment, sample slot), each
//! labelled with a congestion level and an accident-risk level.
//!
//! # Generation order
//!
//! ```text
//! for window in week (day-major, chronological):
//!   rng  = TaskRng(seed, window.ordinal)
//!   weather drawn once (PerWindow) or per sample (PerSample)
//!   for segment in topology.roads (id order):
//!     for slot in 0..samples_per_segment:
//!       pick neighborhood → noise → speed limit → lanes → crosswalk
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Simulates windows on Rayon's thread pool.               |
//! | `serde`    | Forwards to `sf-core/serde`.                            |

pub mod corpus;
pub mod error;
pub mod sample;
pub mod scoring;
pub mod simulator;


pub use corpus::{CollectObserver, CorpusGenerator, CorpusObserver, CorpusStats, NoopObserver};
pub use error::{TelemetryError, TelemetryResult};
pub use sample::{COLUMNS, TelemetrySample, WindowConditions};
pub use scoring::{ScoringRules, time_multiplier};
pub use simulator::{TelemetrySimulator, draw_weather, pick_weather};
