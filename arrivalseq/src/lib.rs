//! arrivalseq - Arrival sequencing for terminal airspace
//!
//! This library turns a stream of flight position and estimate updates into a
//! conflict-free landing schedule per airport: one landing time and runway
//! per flight, respecting runway rates, manual overrides, runway closures and
//! a stability state machine that limits how far a flight may still move.
//!
//! # High-Level API
//!
//! For most use cases, the [`service`] module wires everything together:
//!
//! ```ignore
//! use arrivalseq::config::{AirportConfiguration, SettingsFile};
//! use arrivalseq::service::{SequencerOptions, SequencerService};
//! use arrivalseq::time::SystemClock;
//!
//! let settings = SettingsFile::load()?;
//! let mut service = SequencerService::new(SequencerOptions::from(&settings), Arc::new(SystemClock));
//! service.add_airport(AirportConfiguration::load_from("YSSY.json".as_ref())?)?;
//!
//! service.apply_update(update)?;
//! let snapshots = service.tick_all();
//! ```
//!
//! The building blocks ([`sequence::Sequence`], [`scheduler::Scheduler`],
//! [`estimation::EstimateProvider`]) can also be used directly.

pub mod config;
pub mod error;
pub mod estimation;
pub mod flight;
pub mod geo;
pub mod logging;
pub mod runway;
pub mod scheduler;
pub mod sequence;
pub mod service;
pub mod time;

/// Version of the arrivalseq library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
