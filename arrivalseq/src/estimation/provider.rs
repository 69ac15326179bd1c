//! Feeder-fix and landing estimate refinement.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use super::arrival::ArrivalLookup;
use crate::config::{AirportConfigError, AirportConfiguration};
use crate::flight::Flight;
use crate::geo::Coordinate;

/// Derives the estimates the scheduler works from.
///
/// Three sources are combined, in order of preference:
///
/// 1. manual estimates entered by a controller
/// 2. the live trajectory, once the flight is within range of its feeder fix
/// 3. the system estimate from the flight data feed
///
/// Landing estimates are derived from the feeder-fix time plus a preset
/// arrival interval when one is configured.
pub struct EstimateProvider {
    arrivals: ArrivalLookup,
    feeder_fixes: HashMap<String, Coordinate>,
    trajectory_range_nm: f64,
}

impl EstimateProvider {
    /// Create a provider for an airport.
    ///
    /// # Arguments
    ///
    /// * `airport` - Airport configuration (feeder fixes and arrival intervals)
    /// * `trajectory_range_nm` - Distance from the feeder fix inside which the
    ///   live trajectory replaces the system estimate
    pub fn new(
        airport: &AirportConfiguration,
        trajectory_range_nm: f64,
    ) -> Result<Self, AirportConfigError> {
        Ok(Self {
            arrivals: ArrivalLookup::new(airport)?,
            feeder_fixes: airport
                .feeder_fixes
                .iter()
                .map(|ff| (ff.identifier.to_uppercase(), ff.coordinate))
                .collect(),
            trajectory_range_nm,
        })
    }

    /// Best feeder-fix estimate for a flight.
    ///
    /// Returns `None` only when the flight has no feeder fix and no estimate
    /// is available from any source.
    pub fn feeder_fix_estimate(
        &self,
        flight: &Flight,
        system_estimate: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        if flight.manual_feeder_fix_estimate() {
            return flight.feeder_fix_estimate();
        }

        self.trajectory_estimate(flight, now).or(system_estimate)
    }

    /// Best landing estimate for a flight.
    pub fn landing_estimate(&self, flight: &Flight, system_estimate: DateTime<Utc>) -> DateTime<Utc> {
        let Some(interval) = self.arrivals.interval(flight) else {
            return system_estimate;
        };

        match flight
            .actual_feeder_fix_time()
            .or_else(|| flight.feeder_fix_estimate())
        {
            Some(feeder_fix_time) => feeder_fix_time + interval,
            None => system_estimate,
        }
    }

    /// Great-circle time to go, when in range of the feeder fix.
    fn trajectory_estimate(&self, flight: &Flight, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let feeder_fix = self.feeder_fixes.get(flight.feeder_fix_identifier()?)?;
        let position = flight.position()?;
        if position.on_ground || position.ground_speed_kt <= 0.0 {
            return None;
        }

        let distance_nm = position.coordinate.distance_nm(feeder_fix);
        if distance_nm > self.trajectory_range_nm {
            return None;
        }

        let hours = distance_nm / position.ground_speed_kt;
        let millis = (hours * 3_600_000.0).round() as i64;
        Some(now + Duration::milliseconds(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::fixtures::test_airport;
    use crate::flight::{AircraftCategory, AircraftType, FlightPosition, WakeCategory};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    }

    fn provider() -> EstimateProvider {
        EstimateProvider::new(&test_airport(), 50.0).unwrap()
    }

    fn flight() -> Flight {
        Flight::new(
            "QFA1",
            AircraftType::new("B738", WakeCategory::Medium, AircraftCategory::Jet),
            "YSSY",
            now() + Duration::minutes(40),
        )
        .with_feeder_fix("BOREE", None)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Feeder fix estimates
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_system_estimate_when_out_of_range() {
        let mut f = flight();
        // ~5 degrees away from BOREE
        let far = FlightPosition::airborne(Coordinate::new(-38.0, 150.5), 35000, 450.0);
        f.update_position(Some(far), now());

        let system = now() + Duration::minutes(20);
        assert_eq!(provider().feeder_fix_estimate(&f, Some(system), now()), Some(system));
    }

    #[test]
    fn test_trajectory_estimate_within_range() {
        let mut f = flight();
        // 0.5 degrees of latitude south of BOREE is 30 nm
        let near = FlightPosition::airborne(Coordinate::new(-33.5, 150.5), 15000, 300.0);
        f.update_position(Some(near), now());

        let system = now() + Duration::minutes(20);
        let estimate = provider().feeder_fix_estimate(&f, Some(system), now()).unwrap();
        let minutes = (estimate - now()).num_seconds() as f64 / 60.0;
        // 30 nm at 300 kt is 6 minutes
        assert!((minutes - 6.0).abs() < 0.1, "got {minutes} minutes");
    }

    #[test]
    fn test_zero_ground_speed_uses_system_estimate() {
        let mut f = flight();
        let stopped = FlightPosition::airborne(Coordinate::new(-33.5, 150.5), 15000, 0.0);
        f.update_position(Some(stopped), now());

        let system = now() + Duration::minutes(20);
        assert_eq!(provider().feeder_fix_estimate(&f, Some(system), now()), Some(system));
    }

    #[test]
    fn test_manual_estimate_wins() {
        let mut f = flight();
        let manual = now() + Duration::minutes(33);
        f.set_manual_feeder_fix_estimate(manual);

        let system = now() + Duration::minutes(20);
        assert_eq!(provider().feeder_fix_estimate(&f, Some(system), now()), Some(manual));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Landing estimates
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_landing_from_feeder_fix_estimate() {
        let mut f = flight();
        f.update_feeder_fix_estimate(now() + Duration::minutes(20));

        let system = now() + Duration::minutes(40);
        // BOREE interval is 15 minutes
        assert_eq!(
            provider().landing_estimate(&f, system),
            now() + Duration::minutes(35)
        );
    }

    #[test]
    fn test_landing_from_actual_feeder_fix_time() {
        let mut f = flight();
        f.update_feeder_fix_estimate(now() + Duration::minutes(20));
        f.pass_feeder_fix(now() + Duration::minutes(22));

        let system = now() + Duration::minutes(40);
        assert_eq!(
            provider().landing_estimate(&f, system),
            now() + Duration::minutes(37)
        );
    }

    #[test]
    fn test_landing_falls_back_to_system_estimate() {
        let system = now() + Duration::minutes(40);

        // No feeder fix time yet
        assert_eq!(provider().landing_estimate(&flight(), system), system);

        // No interval configured for the feeder fix
        let mut f = Flight::new(
            "QFA2",
            AircraftType::new("B738", WakeCategory::Medium, AircraftCategory::Jet),
            "YSSY",
            system,
        )
        .with_feeder_fix("MARLN", Some(now() + Duration::minutes(10)));
        f.update_feeder_fix_estimate(now() + Duration::minutes(10));
        assert_eq!(provider().landing_estimate(&f, system), system);
    }
}
