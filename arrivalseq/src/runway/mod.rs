//! Runway modes and runway selection.
//!
//! A [`RunwayMode`] is the runtime copy of a configured mode: the active
//! runways with their landing rates and the stagger rate between them. The
//! sequence owns its current and pending modes so controllers can adjust
//! rates without touching the airport configuration.
//!
//! Runway choice is split in two:
//!
//! - [`RunwayAssigner`] applies the assignment rules and returns the
//!   preferred runways grouped by priority tier
//! - [`RunwayScoreCalculator`] scores runways against their soft preferences
//!   to break ties between equally good candidates

mod assigner;
mod score;

use chrono::Duration;
use serde::Serialize;

use crate::config::RunwayModeConfiguration;

pub use assigner::RunwayAssigner;
pub use score::{RunwayScore, RunwayScoreCalculator, FEEDER_FIX_WEIGHT, WAKE_CATEGORY_WEIGHT};

/// An active runway and its landing rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Runway {
    pub identifier: String,
    /// Minimum interval between two landings on this runway.
    #[serde(serialize_with = "serialize_seconds")]
    pub landing_rate: Duration,
}

/// A set of active runways.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunwayMode {
    pub identifier: String,
    pub runways: Vec<Runway>,
    /// Minimum interval between landings on different runways.
    #[serde(serialize_with = "serialize_seconds")]
    pub stagger_rate: Duration,
}

impl RunwayMode {
    /// Build the runtime mode from its configuration.
    pub fn from_config(config: &RunwayModeConfiguration) -> Self {
        Self {
            identifier: config.identifier.clone(),
            runways: config
                .runways
                .iter()
                .map(|r| Runway {
                    identifier: r.identifier.clone(),
                    landing_rate: Duration::seconds(i64::from(r.landing_rate_seconds)),
                })
                .collect(),
            stagger_rate: Duration::seconds(i64::from(config.stagger_rate_seconds)),
        }
    }

    pub fn runway(&self, identifier: &str) -> Option<&Runway> {
        self.runways
            .iter()
            .find(|r| r.identifier.eq_ignore_ascii_case(identifier))
    }

    /// Returns true if the runway is active in this mode.
    pub fn contains(&self, identifier: &str) -> bool {
        self.runway(identifier).is_some()
    }

    /// The runway used when no rule applies.
    pub fn default_runway(&self) -> Option<&Runway> {
        self.runways.first()
    }

    /// Landing rate of a runway in this mode.
    pub fn landing_rate(&self, identifier: &str) -> Option<Duration> {
        self.runway(identifier).map(|r| r.landing_rate)
    }

    /// Minimum interval required between a landing on `a` and one on `b`.
    ///
    /// Runways outside the mode use the default runway's rate so a stale
    /// assignment still gets separated.
    pub fn separation(&self, a: &str, b: &str) -> Duration {
        if a.eq_ignore_ascii_case(b) {
            self.landing_rate(a)
                .or_else(|| self.default_runway().map(|r| r.landing_rate))
                .unwrap_or_else(Duration::zero)
        } else {
            self.stagger_rate
        }
    }

    /// Change a runway's landing rate. Returns false if the runway is not in the mode.
    pub fn set_landing_rate(&mut self, identifier: &str, landing_rate: Duration) -> bool {
        match self
            .runways
            .iter_mut()
            .find(|r| r.identifier.eq_ignore_ascii_case(identifier))
        {
            Some(runway) => {
                runway.landing_rate = landing_rate;
                true
            }
            None => false,
        }
    }
}

fn serialize_seconds<S: serde::Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(value.num_seconds())
}
