//! Domain errors raised by sequence and scheduling operations.

use chrono::{DateTime, Utc};

use crate::flight::State;
use crate::sequence::SlotId;

/// Errors returned by sequence operations.
///
/// Rule violations are always returned to the caller. Not-found variants
/// usually represent a benign race with cleanup or removal, and command
/// dispatchers log and ignore them (see [`SequenceError::is_not_found`]).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
    /// No flight with this callsign exists anywhere in the sequence.
    #[error("Flight {0} not found")]
    FlightNotFound(String),

    /// The flight exists but not in the list the operation expects.
    #[error("Flight {callsign} is not {expected}")]
    UnexpectedList {
        callsign: String,
        expected: &'static str,
    },

    /// A flight with this callsign is already tracked.
    #[error("Flight {0} is already in the sequence")]
    DuplicateFlight(String),

    /// The flight has been removed and can no longer change.
    #[error("Flight {0} has been removed")]
    FlightRemoved(String),

    /// The requested state cannot be set manually.
    #[error("Flight {callsign} cannot be set to {state} manually")]
    IllegalStateChange { callsign: String, state: State },

    /// The operation would move a Frozen or Landed flight.
    #[error("Flight {0} is frozen and cannot be moved")]
    FlightFrozen(String),

    /// A flight cannot be placed ahead of one whose landing time is fixed.
    #[error("Cannot insert before {0}: its landing time is fixed")]
    FixedReference(String),

    /// Not enough room between immovable flights for the requested time.
    #[error("Insufficient space for {callsign} at {time} on runway {runway}")]
    InsufficientSpace {
        callsign: String,
        runway: String,
        time: DateTime<Utc>,
    },

    /// The runway is not part of any configured runway mode.
    #[error("Runway {0} is not configured")]
    UnknownRunway(String),

    /// No runway mode with this identifier is configured.
    #[error("Runway mode {0} not found")]
    RunwayModeNotFound(String),

    /// The cutover window of a runway mode change is inverted.
    #[error("First landing time for the new mode ({first}) precedes the last landing time for the current mode ({last})")]
    InvalidRunwayModeChange {
        last: DateTime<Utc>,
        first: DateTime<Utc>,
    },

    /// A blockout or slot window ends before it starts.
    #[error("Invalid time window: {start} to {end}")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// No slot with this id exists.
    #[error("Slot {0} not found")]
    SlotNotFound(SlotId),

    /// No sequence exists for this airport.
    #[error("No sequence for airport {0}")]
    AirportNotFound(String),
}

impl SequenceError {
    /// Returns true for lookup failures that handlers treat as benign.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::FlightNotFound(_)
                | Self::SlotNotFound(_)
                | Self::RunwayModeNotFound(_)
                | Self::AirportNotFound(_)
        )
    }
}
