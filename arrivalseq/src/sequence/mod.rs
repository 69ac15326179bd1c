//! Per-airport sequence aggregate.
//!
//! A [`Sequence`] owns every arrival known for one airport, split across three
//! lists (sequenced, pending, desequenced), plus the runway closures and the
//! runway mode state the scheduler works against.
//!
//! # Example
//!
//! ```ignore
//! use arrivalseq::sequence::{InsertionOptions, Sequence};
//!
//! let mut sequence = Sequence::new(&airport)?;
//! sequence.add(flight, now)?;
//! let dummy = sequence.insert_dummy(None, aircraft, &InsertionOptions::after("QFA1"), now)?;
//! scheduler.schedule(&mut sequence);
//! ```

mod aggregate;
mod cleanup;
mod insertion;
mod snapshot;
mod window;

pub use aggregate::Sequence;
pub use cleanup::CleanupPolicy;
pub use insertion::{InsertionOptions, RelativePosition};
pub use snapshot::{FlightView, SequenceSnapshot};
pub use window::{BlockoutPeriod, Slot, SlotId};
