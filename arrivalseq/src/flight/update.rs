//! Position and estimate updates delivered by the surveillance/flight-plan feed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AircraftType;
use crate::geo::Coordinate;

/// Last known position of a flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightPosition {
    /// Position.
    pub coordinate: Coordinate,
    /// Altitude in feet.
    #[serde(default)]
    pub altitude_ft: i32,
    /// Ground speed in knots.
    pub ground_speed_kt: f64,
    /// True while the aircraft is on the ground.
    #[serde(default)]
    pub on_ground: bool,
}

impl FlightPosition {
    /// Create an airborne position.
    pub fn airborne(coordinate: Coordinate, altitude_ft: i32, ground_speed_kt: f64) -> Self {
        Self {
            coordinate,
            altitude_ft,
            ground_speed_kt,
            on_ground: false,
        }
    }
}

/// System estimate for one fix along the flight's route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixEstimate {
    /// Fix identifier.
    pub identifier: String,
    /// Estimated time over the fix.
    pub estimate: DateTime<Utc>,
    /// Actual time over the fix, once passed.
    #[serde(default)]
    pub actual: Option<DateTime<Utc>>,
}

/// One update for one flight from the external feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightUpdate {
    pub callsign: String,
    pub aircraft: AircraftType,
    #[serde(default)]
    pub origin: Option<String>,
    pub destination: String,
    /// Assigned arrival (STAR) from the flight plan.
    #[serde(default)]
    pub arrival: Option<String>,
    /// Runway from the flight plan, if any.
    #[serde(default)]
    pub runway: Option<String>,
    #[serde(default)]
    pub approach_type: Option<String>,
    #[serde(default)]
    pub position: Option<FlightPosition>,
    /// System estimates for the fixes along the route, in route order.
    #[serde(default)]
    pub fixes: Vec<FixEstimate>,
    /// System landing estimate.
    pub landing_estimate: DateTime<Utc>,
}

impl FlightUpdate {
    /// Find the system estimate for a fix on the route.
    pub fn fix(&self, identifier: &str) -> Option<&FixEstimate> {
        self.fixes
            .iter()
            .find(|fix| fix.identifier.eq_ignore_ascii_case(identifier))
    }

    /// Returns true if the aircraft is on the ground at its origin.
    pub fn is_on_ground(&self) -> bool {
        self.position.as_ref().is_some_and(|p| p.on_ground)
    }
}
