//! Arrival flight records and their stability state machine.
//!
//! A [`Flight`] is the mutable record of one arrival: its identity, routing,
//! estimates, schedule and current [`State`]. States form a priority chain
//! (`Landed < Frozen < SuperStable < Stable < Unstable`) that decides how much
//! the scheduler may still move a flight; [`next_state`] is the pure function
//! that advances a flight along that chain as time passes.
//!
//! # Components
//!
//! - [`state`] - `State`, the rank table and the time-based transition rules
//! - [`record`] - `Flight` and its delay arithmetic
//! - [`update`] - `FlightUpdate`, the position/estimate feed consumed per tick

mod record;
mod state;
mod update;

use serde::{Deserialize, Serialize};

pub use record::Flight;
pub use state::{next_state, SequenceKey, StabilityThresholds, State};
pub use update::{FixEstimate, FlightPosition, FlightUpdate};

/// Wake turbulence category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WakeCategory {
    Light,
    Medium,
    Heavy,
    SuperHeavy,
}

impl std::fmt::Display for WakeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Light => write!(f, "L"),
            Self::Medium => write!(f, "M"),
            Self::Heavy => write!(f, "H"),
            Self::SuperHeavy => write!(f, "J"),
        }
    }
}

/// Propulsion category used by arrival intervals and runway rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AircraftCategory {
    Jet,
    NonJet,
}

/// Aircraft type information carried by every flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AircraftType {
    /// ICAO type designator (e.g., "B738").
    pub type_code: String,
    /// Wake turbulence category.
    pub wake_category: WakeCategory,
    /// Jet or non-jet.
    pub category: AircraftCategory,
}

impl AircraftType {
    /// Create a new aircraft type.
    pub fn new(type_code: &str, wake_category: WakeCategory, category: AircraftCategory) -> Self {
        Self {
            type_code: type_code.to_uppercase(),
            wake_category,
            category,
        }
    }
}
