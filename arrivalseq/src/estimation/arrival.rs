//! Arrival interval lookup.
//!
//! Each configured arrival row gives a preset feeder-fix-to-landing interval
//! for a feeder fix, optionally restricted by STAR pattern, runway, approach
//! type and aircraft. When several rows match, the most specific one wins:
//!
//! 1. rows listing the exact aircraft type
//! 2. jet rows whose jet-tier allow-list names a non-jet type
//! 3. rows restricted to the aircraft's category
//! 4. unrestricted rows
//!
//! Rows of equal specificity resolve in configuration order.

use chrono::Duration;
use regex::Regex;

use crate::config::{contains_ignore_case, AirportConfigError, AirportConfiguration, ArrivalConfiguration};
use crate::flight::{AircraftCategory, Flight};

struct ArrivalRow {
    config: ArrivalConfiguration,
    pattern: Option<Regex>,
}

/// Precompiled arrival interval table for one airport.
pub struct ArrivalLookup {
    rows: Vec<ArrivalRow>,
}

impl ArrivalLookup {
    /// Compile the arrival rows of an airport.
    pub fn new(airport: &AirportConfiguration) -> Result<Self, AirportConfigError> {
        let rows = airport
            .arrivals
            .iter()
            .map(|arrival| {
                let pattern = arrival
                    .arrival_pattern
                    .as_deref()
                    .map(|pattern| {
                        Regex::new(pattern).map_err(|e| AirportConfigError::Invalid {
                            airport: airport.identifier.clone(),
                            reason: format!("invalid arrival pattern '{}': {}", pattern, e),
                        })
                    })
                    .transpose()?;
                Ok(ArrivalRow {
                    config: arrival.clone(),
                    pattern,
                })
            })
            .collect::<Result<Vec<_>, AirportConfigError>>()?;

        Ok(Self { rows })
    }

    /// Number of configured rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Feeder-fix-to-landing interval for a flight, if any row matches.
    ///
    /// A flight without a runway yet matches rows of any runway.
    pub fn interval(&self, flight: &Flight) -> Option<Duration> {
        let feeder_fix = flight.feeder_fix_identifier()?;

        let mut best: Option<(u8, &ArrivalRow)> = None;
        for row in &self.rows {
            if !row.config.feeder_fix.eq_ignore_ascii_case(feeder_fix) {
                continue;
            }
            if !Self::route_matches(row, flight) {
                continue;
            }
            let Some(specificity) = Self::specificity(&row.config, flight) else {
                continue;
            };
            if best.map_or(true, |(current, _)| specificity > current) {
                best = Some((specificity, row));
            }
        }

        best.map(|(_, row)| Duration::seconds(i64::from(row.config.interval_seconds)))
    }

    fn route_matches(row: &ArrivalRow, flight: &Flight) -> bool {
        if let Some(pattern) = &row.pattern {
            match flight.assigned_arrival_identifier() {
                Some(arrival) if pattern.is_match(arrival) => {}
                _ => return false,
            }
        }

        if !row.config.runways.is_empty() {
            if let Some(runway) = flight.assigned_runway_identifier() {
                if !contains_ignore_case(&row.config.runways, runway) {
                    return false;
                }
            }
        }

        match (&row.config.approach_type, flight.approach_type()) {
            (None, _) => true,
            (Some(required), Some(actual)) => required.eq_ignore_ascii_case(actual),
            (Some(_), None) => false,
        }
    }

    /// Specificity rank of a matching row, or None if the aircraft doesn't match.
    fn specificity(row: &ArrivalConfiguration, flight: &Flight) -> Option<u8> {
        let aircraft = flight.aircraft();

        if !row.aircraft_types.is_empty() {
            return contains_ignore_case(&row.aircraft_types, &aircraft.type_code).then_some(4);
        }

        match row.category {
            Some(category) if category == aircraft.category => Some(2),
            Some(AircraftCategory::Jet)
                if contains_ignore_case(&row.jet_tier_types, &aircraft.type_code) =>
            {
                Some(3)
            }
            Some(_) => None,
            None => Some(1),
        }
    }
}
