//! Service error types.

use crate::config::AirportConfigError;
use crate::error::SequenceError;

/// Errors raised while setting up or driving airport sequencers.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A sequence operation failed.
    #[error(transparent)]
    Sequence(#[from] SequenceError),

    /// The airport configuration could not be used.
    #[error(transparent)]
    AirportConfig(#[from] AirportConfigError),

    /// A sequencer already exists for this airport.
    #[error("Airport {0} is already loaded")]
    DuplicateAirport(String),
}
