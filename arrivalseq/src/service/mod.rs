//! Service layer: feeding, commanding and ticking airport sequences.
//!
//! Each airport gets an [`AirportSequencer`] that owns its [`Sequence`](crate::sequence::Sequence),
//! [`Scheduler`](crate::scheduler::Scheduler) and estimate provider. The
//! [`SequencerService`] keeps one per airport behind a mutex, and the
//! [`SequencerDaemon`] ticks them all on a timer.
//!
//! # Example
//!
//! ```ignore
//! use arrivalseq::service::{SequencerDaemon, SequencerOptions, SequencerService};
//! use arrivalseq::time::SystemClock;
//!
//! let mut service = SequencerService::new(SequencerOptions::from(&settings), Arc::new(SystemClock));
//! service.add_airport(airport)?;
//! let service = Arc::new(service);
//!
//! service.apply_update(update)?;
//! tokio::spawn(SequencerDaemon::new(Arc::clone(&service)).run(shutdown));
//! ```

mod command;
mod daemon;
mod error;
mod manager;
mod sequencer;

pub use command::{CommandOutcome, SequenceCommand};
pub use daemon::SequencerDaemon;
pub use error::ServiceError;
pub use manager::{SequencerHandle, SequencerService};
pub use sequencer::{AirportSequencer, SequencerOptions, SNAPSHOT_CHANNEL_CAPACITY};
