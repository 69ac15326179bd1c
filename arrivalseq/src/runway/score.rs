//! Soft runway preference scoring.

use crate::config::{contains_ignore_case, RunwayConfiguration};
use crate::flight::AircraftType;

/// Score added when the runway prefers the flight's wake category.
pub const WAKE_CATEGORY_WEIGHT: i32 = 10;

/// Score added when the runway prefers the flight's feeder fix.
pub const FEEDER_FIX_WEIGHT: i32 = 5;

/// Score of one runway for one flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunwayScore {
    pub runway: String,
    pub score: i32,
}

/// Scores runways against their configured preferences.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunwayScoreCalculator;

impl RunwayScoreCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Score each runway, preserving input order.
    pub fn calculate_scores(
        &self,
        runways: &[&RunwayConfiguration],
        aircraft: &AircraftType,
        feeder_fix: Option<&str>,
    ) -> Vec<RunwayScore> {
        runways
            .iter()
            .map(|runway| RunwayScore {
                runway: runway.identifier.clone(),
                score: self.score(runway, aircraft, feeder_fix),
            })
            .collect()
    }

    /// Score a single runway.
    pub fn score(
        &self,
        runway: &RunwayConfiguration,
        aircraft: &AircraftType,
        feeder_fix: Option<&str>,
    ) -> i32 {
        let preferences = &runway.preferences;
        let mut score = 0;
        if preferences.wake_categories.contains(&aircraft.wake_category) {
            score += WAKE_CATEGORY_WEIGHT;
        }
        if feeder_fix.is_some_and(|ff| contains_ignore_case(&preferences.feeder_fixes, ff)) {
            score += FEEDER_FIX_WEIGHT;
        }
        score
    }
}
