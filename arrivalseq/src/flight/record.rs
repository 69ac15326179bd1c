//! The flight record.

use chrono::{DateTime, Duration, Utc};

use super::state::State;
use super::update::FlightPosition;
use super::AircraftType;
use crate::error::SequenceError;

/// One arrival, with its estimates, schedule, and stability state.
///
/// # Delay
///
/// - `total_delay = scheduled_landing_time - initial_landing_estimate`
/// - `remaining_delay = scheduled_landing_time - landing_estimate`
///
/// Both are signed. `remaining_delay` follows the estimate as it moves while
/// the schedule stays put, so a flight that slows down "absorbs" delay and one
/// that speeds up accumulates it.
#[derive(Debug, Clone)]
pub struct Flight {
    /// Callsign, upper case; unique per airport
    callsign: String,
    /// Type designator and wake/jet categories
    aircraft: AircraftType,
    /// Departure aerodrome, if known
    origin: Option<String>,
    /// Arrival aerodrome (the sequenced airport)
    destination: String,

    /// Feeder fix the flight enters the terminal area through
    feeder_fix_identifier: Option<String>,
    /// Assigned STAR, used to pick the arrival interval
    assigned_arrival_identifier: Option<String>,
    /// Runway chosen by the scheduler or a controller
    assigned_runway_identifier: Option<String>,
    /// True when a controller picked the runway
    runway_manually_assigned: bool,
    /// Approach type, used to pick the arrival interval
    approach_type: Option<String>,

    /// First feeder-fix estimate; never changes once set
    initial_feeder_fix_estimate: Option<DateTime<Utc>>,
    /// Current feeder-fix estimate
    feeder_fix_estimate: Option<DateTime<Utc>>,
    /// True when a controller overrode the feeder-fix estimate
    manual_feeder_fix_estimate: bool,
    /// Time the flight crossed the feeder fix
    actual_feeder_fix_time: Option<DateTime<Utc>>,
    /// Feeder-fix time derived from the scheduled landing time
    scheduled_feeder_fix_time: Option<DateTime<Utc>>,

    /// Landing estimate at creation; the baseline for total delay
    initial_landing_estimate: DateTime<Utc>,
    /// Current landing estimate
    landing_estimate: DateTime<Utc>,
    /// Landing time assigned by the scheduler or a controller
    scheduled_landing_time: DateTime<Utc>,
    /// True when the landing time is pinned and the scheduler must not move it
    manual_landing_time: bool,

    /// Land at the estimate; other flights are delayed around this one
    no_delay: bool,
    /// Cap on total delay before the flight is promoted in its tier
    maximum_delay: Option<Duration>,
    /// Placed first within its stability tier
    high_priority: bool,

    /// Time the flight joined the sequence
    activated_time: Option<DateTime<Utc>>,
    /// Time of the last feed update; `None` for dummy flights
    last_seen: Option<DateTime<Utc>>,
    /// Last reported position
    position: Option<FlightPosition>,
    /// Stability state
    state: State,
}

impl Flight {
    /// Create a new flight in the `New` state.
    ///
    /// The landing estimate seeds the initial estimate and the schedule.
    pub fn new(
        callsign: &str,
        aircraft: AircraftType,
        destination: &str,
        landing_estimate: DateTime<Utc>,
    ) -> Self {
        Self {
            callsign: callsign.to_uppercase(),
            aircraft,
            origin: None,
            destination: destination.to_uppercase(),
            feeder_fix_identifier: None,
            assigned_arrival_identifier: None,
            assigned_runway_identifier: None,
            runway_manually_assigned: false,
            approach_type: None,
            initial_feeder_fix_estimate: None,
            feeder_fix_estimate: None,
            manual_feeder_fix_estimate: false,
            actual_feeder_fix_time: None,
            scheduled_feeder_fix_time: None,
            initial_landing_estimate: landing_estimate,
            landing_estimate,
            scheduled_landing_time: landing_estimate,
            manual_landing_time: false,
            no_delay: false,
            maximum_delay: None,
            high_priority: false,
            activated_time: None,
            last_seen: None,
            position: None,
            state: State::New,
        }
    }

    /// Set the origin aerodrome.
    pub fn with_origin(mut self, origin: &str) -> Self {
        self.origin = Some(origin.to_uppercase());
        self
    }

    /// Route the flight via a feeder fix, optionally with a first estimate.
    pub fn with_feeder_fix(mut self, feeder_fix: &str, estimate: Option<DateTime<Utc>>) -> Self {
        self.feeder_fix_identifier = Some(feeder_fix.to_uppercase());
        if let Some(estimate) = estimate {
            self.update_feeder_fix_estimate(estimate);
            self.scheduled_feeder_fix_time = Some(estimate);
        }
        self
    }

    /// Set the assigned arrival (STAR).
    pub fn with_arrival(mut self, arrival: &str) -> Self {
        self.assigned_arrival_identifier = Some(arrival.to_uppercase());
        self
    }

    /// Set the assigned runway (not manual).
    pub fn with_runway(mut self, runway: &str) -> Self {
        self.assigned_runway_identifier = Some(runway.to_uppercase());
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Identity and routing
    // ─────────────────────────────────────────────────────────────────────────

    /// Callsign, upper case.
    pub fn callsign(&self) -> &str {
        &self.callsign
    }

    /// Aircraft type and categories.
    pub fn aircraft(&self) -> &AircraftType {
        &self.aircraft
    }

    /// Departure aerodrome, if known.
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Feeder fix on the route, if any.
    pub fn feeder_fix_identifier(&self) -> Option<&str> {
        self.feeder_fix_identifier.as_deref()
    }

    /// Assigned STAR.
    pub fn assigned_arrival_identifier(&self) -> Option<&str> {
        self.assigned_arrival_identifier.as_deref()
    }

    /// Runway currently assigned.
    pub fn assigned_runway_identifier(&self) -> Option<&str> {
        self.assigned_runway_identifier.as_deref()
    }

    /// Returns true if a controller chose the runway.
    pub fn runway_manually_assigned(&self) -> bool {
        self.runway_manually_assigned
    }

    pub fn approach_type(&self) -> Option<&str> {
        self.approach_type.as_deref()
    }

    /// Update routing from the system feed. Returns true if the feeder fix changed.
    pub fn update_routing(&mut self, feeder_fix: Option<&str>, arrival: Option<&str>) -> bool {
        let feeder_fix = feeder_fix.map(str::to_uppercase);
        let changed = feeder_fix != self.feeder_fix_identifier;
        if changed {
            self.feeder_fix_identifier = feeder_fix;
            self.initial_feeder_fix_estimate = None;
            self.feeder_fix_estimate = None;
            self.scheduled_feeder_fix_time = None;
            self.manual_feeder_fix_estimate = false;
        }
        self.assigned_arrival_identifier = arrival.map(str::to_uppercase);
        changed
    }

    /// Assign a runway.
    pub fn assign_runway(&mut self, runway: &str, manual: bool) {
        self.assigned_runway_identifier = Some(runway.to_uppercase());
        self.runway_manually_assigned = manual;
    }

    /// Drop the runway assignment so the scheduler selects one again.
    pub fn clear_runway(&mut self) {
        self.assigned_runway_identifier = None;
        self.runway_manually_assigned = false;
    }

    pub fn set_approach_type(&mut self, approach_type: Option<&str>) {
        self.approach_type = approach_type.map(str::to_uppercase);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Feeder fix times
    // ─────────────────────────────────────────────────────────────────────────

    /// First feeder-fix estimate; drives the SuperStable transition.
    pub fn initial_feeder_fix_estimate(&self) -> Option<DateTime<Utc>> {
        self.initial_feeder_fix_estimate
    }

    /// Current feeder-fix estimate.
    pub fn feeder_fix_estimate(&self) -> Option<DateTime<Utc>> {
        self.feeder_fix_estimate
    }

    /// Returns true if the feeder-fix estimate was set by a controller.
    pub fn manual_feeder_fix_estimate(&self) -> bool {
        self.manual_feeder_fix_estimate
    }

    /// Time the flight crossed the feeder fix.
    pub fn actual_feeder_fix_time(&self) -> Option<DateTime<Utc>> {
        self.actual_feeder_fix_time
    }

    /// Feeder-fix time matching the scheduled landing time.
    pub fn scheduled_feeder_fix_time(&self) -> Option<DateTime<Utc>> {
        self.scheduled_feeder_fix_time
    }

    /// Returns true once the flight has passed its feeder fix.
    pub fn has_passed_feeder_fix(&self) -> bool {
        self.actual_feeder_fix_time.is_some()
    }

    /// Update the feeder-fix estimate from the system or trajectory.
    ///
    /// Ignored while a manual estimate is in force. The first estimate ever
    /// received becomes the initial estimate and is never changed.
    pub fn update_feeder_fix_estimate(&mut self, estimate: DateTime<Utc>) {
        if self.manual_feeder_fix_estimate {
            return;
        }
        self.feeder_fix_estimate = Some(estimate);
        if self.initial_feeder_fix_estimate.is_none() {
            self.initial_feeder_fix_estimate = Some(estimate);
        }
    }

    /// Override the feeder-fix estimate manually.
    pub fn set_manual_feeder_fix_estimate(&mut self, estimate: DateTime<Utc>) {
        self.feeder_fix_estimate = Some(estimate);
        if self.initial_feeder_fix_estimate.is_none() {
            self.initial_feeder_fix_estimate = Some(estimate);
        }
        self.manual_feeder_fix_estimate = true;
    }

    pub fn clear_manual_feeder_fix_estimate(&mut self) {
        self.manual_feeder_fix_estimate = false;
    }

    /// Record the time the flight crossed its feeder fix.
    pub fn pass_feeder_fix(&mut self, actual: DateTime<Utc>) {
        if self.actual_feeder_fix_time.is_none() {
            self.actual_feeder_fix_time = Some(actual);
            self.scheduled_feeder_fix_time = Some(actual);
        }
    }

    pub fn set_feeder_fix_time(&mut self, time: DateTime<Utc>) {
        if !self.has_passed_feeder_fix() {
            self.scheduled_feeder_fix_time = Some(time);
        }
    }

    /// Estimated time from feeder fix to landing, if both estimates exist.
    pub fn feeder_fix_to_landing_interval(&self) -> Option<Duration> {
        let feeder_fix = self.actual_feeder_fix_time.or(self.feeder_fix_estimate)?;
        Some(self.landing_estimate - feeder_fix)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Landing times
    // ─────────────────────────────────────────────────────────────────────────

    /// Landing estimate at creation.
    pub fn initial_landing_estimate(&self) -> DateTime<Utc> {
        self.initial_landing_estimate
    }

    /// Current landing estimate.
    pub fn landing_estimate(&self) -> DateTime<Utc> {
        self.landing_estimate
    }

    /// Landing time from the last scheduling pass or manual placement.
    pub fn scheduled_landing_time(&self) -> DateTime<Utc> {
        self.scheduled_landing_time
    }

    /// Returns true if the landing time is pinned.
    pub fn manual_landing_time(&self) -> bool {
        self.manual_landing_time
    }

    /// Update the landing estimate. The schedule is not touched.
    pub fn update_landing_estimate(&mut self, estimate: DateTime<Utc>) {
        self.landing_estimate = estimate;
    }

    /// Set the scheduled landing time.
    pub fn set_landing_time(&mut self, time: DateTime<Utc>, manual: bool) {
        self.scheduled_landing_time = time;
        self.manual_landing_time = manual;
    }

    pub fn clear_manual_landing_time(&mut self) {
        self.manual_landing_time = false;
    }

    /// Restart the delay baseline from the current estimate.
    pub fn reset_initial_estimates(&mut self) {
        self.initial_landing_estimate = self.landing_estimate;
        self.initial_feeder_fix_estimate = self.feeder_fix_estimate;
    }

    /// Delay accumulated against the initial landing estimate.
    pub fn total_delay(&self) -> Duration {
        self.scheduled_landing_time - self.initial_landing_estimate
    }

    /// Delay still to be absorbed against the current landing estimate.
    pub fn remaining_delay(&self) -> Duration {
        self.scheduled_landing_time - self.landing_estimate
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Stability flags
    // ─────────────────────────────────────────────────────────────────────────

    pub fn no_delay(&self) -> bool {
        self.no_delay
    }

    pub fn set_no_delay(&mut self, no_delay: bool) {
        self.no_delay = no_delay;
    }

    /// Delay cap, if set.
    pub fn maximum_delay(&self) -> Option<Duration> {
        self.maximum_delay
    }

    pub fn set_maximum_delay(&mut self, maximum_delay: Option<Duration>) {
        self.maximum_delay = maximum_delay;
    }

    pub fn high_priority(&self) -> bool {
        self.high_priority
    }

    pub fn set_high_priority(&mut self, high_priority: bool) {
        self.high_priority = high_priority;
    }

    /// Returns true if the scheduler must treat this flight as an immovable obstacle.
    pub fn is_pinned(&self) -> bool {
        self.manual_landing_time || self.state.is_fixed()
    }

    /// Returns true if the flight's total delay exceeds its maximum delay.
    pub fn exceeds_maximum_delay(&self) -> bool {
        self.maximum_delay
            .is_some_and(|maximum| self.total_delay() > maximum)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    pub fn state(&self) -> State {
        self.state
    }

    /// Set the flight's state.
    ///
    /// # Errors
    ///
    /// Fails for every target state once the flight has been removed.
    pub fn set_state(&mut self, state: State) -> Result<(), SequenceError> {
        if self.state == State::Removed {
            return Err(SequenceError::FlightRemoved(self.callsign.clone()));
        }
        self.state = state;
        Ok(())
    }

    /// Time the flight joined the sequence.
    pub fn activated_time(&self) -> Option<DateTime<Utc>> {
        self.activated_time
    }

    /// Mark the flight active at `now`; `New` flights become `Unstable`.
    pub fn activate(&mut self, now: DateTime<Utc>) {
        self.activated_time = Some(now);
        if self.state == State::New {
            self.state = State::Unstable;
        }
    }

    /// Time of the last feed update. `None` for dummy flights.
    pub fn last_seen(&self) -> Option<DateTime<Utc>> {
        self.last_seen
    }

    /// Last reported position.
    pub fn position(&self) -> Option<&FlightPosition> {
        self.position.as_ref()
    }

    /// Record a fresh position report.
    pub fn update_position(&mut self, position: Option<FlightPosition>, now: DateTime<Utc>) {
        if position.is_some() {
            self.position = position;
        }
        self.last_seen = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight::{AircraftCategory, WakeCategory};
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    }

    fn flight() -> Flight {
        Flight::new(
            "qfa123",
            AircraftType::new("b738", WakeCategory::Medium, AircraftCategory::Jet),
            "yssy",
            t0(),
        )
    }

    #[test]
    fn test_new_flight_defaults() {
        let f = flight();
        assert_eq!(f.callsign(), "QFA123");
        assert_eq!(f.destination(), "YSSY");
        assert_eq!(f.aircraft().type_code, "B738");
        assert_eq!(f.state(), State::New);
        assert_eq!(f.scheduled_landing_time(), t0());
        assert_eq!(f.total_delay(), Duration::zero());
        assert!(f.feeder_fix_identifier().is_none());
        assert!(!f.is_pinned());
    }

    #[test]
    fn test_delay_follows_estimate_changes() {
        let mut f = flight();
        f.set_state(State::Stable).unwrap();
        f.set_landing_time(t0() + Duration::minutes(5), false);

        assert_eq!(f.total_delay(), Duration::minutes(5));
        assert_eq!(f.remaining_delay(), Duration::minutes(5));

        f.update_landing_estimate(t0() + Duration::minutes(2));
        assert_eq!(f.total_delay(), Duration::minutes(5));
        assert_eq!(f.remaining_delay(), Duration::minutes(3));

        f.update_landing_estimate(t0() + Duration::minutes(8));
        assert_eq!(f.total_delay(), Duration::minutes(5));
        assert_eq!(f.remaining_delay(), Duration::minutes(-3));
    }

    #[test]
    fn test_initial_feeder_fix_estimate_is_frozen() {
        let mut f = flight().with_feeder_fix("RIVET", Some(t0() - Duration::minutes(20)));
        f.update_feeder_fix_estimate(t0() - Duration::minutes(15));

        assert_eq!(f.initial_feeder_fix_estimate(), Some(t0() - Duration::minutes(20)));
        assert_eq!(f.feeder_fix_estimate(), Some(t0() - Duration::minutes(15)));
    }

    #[test]
    fn test_manual_feeder_fix_estimate_wins() {
        let mut f = flight().with_feeder_fix("RIVET", Some(t0() - Duration::minutes(20)));
        f.set_manual_feeder_fix_estimate(t0() - Duration::minutes(18));
        f.update_feeder_fix_estimate(t0() - Duration::minutes(25));

        assert!(f.manual_feeder_fix_estimate());
        assert_eq!(f.feeder_fix_estimate(), Some(t0() - Duration::minutes(18)));

        f.clear_manual_feeder_fix_estimate();
        f.update_feeder_fix_estimate(t0() - Duration::minutes(25));
        assert_eq!(f.feeder_fix_estimate(), Some(t0() - Duration::minutes(25)));
    }

    #[test]
    fn test_passed_feeder_fix_freezes_feeder_fix_time() {
        let mut f = flight().with_feeder_fix("RIVET", Some(t0() - Duration::minutes(20)));
        f.pass_feeder_fix(t0() - Duration::minutes(19));
        f.set_feeder_fix_time(t0() - Duration::minutes(10));

        assert!(f.has_passed_feeder_fix());
        assert_eq!(f.scheduled_feeder_fix_time(), Some(t0() - Duration::minutes(19)));
        assert_eq!(f.feeder_fix_to_landing_interval(), Some(Duration::minutes(19)));
    }

    #[test]
    fn test_set_state_on_removed_flight_always_fails() {
        for target in State::ALL {
            let mut f = flight();
            f.set_state(State::Removed).unwrap();

            let result = f.set_state(target);
            assert!(
                matches!(result, Err(SequenceError::FlightRemoved(ref c)) if c == "QFA123"),
                "set_state({target}) on a removed flight should fail"
            );
            assert_eq!(f.state(), State::Removed);
        }
    }

    #[test]
    fn test_activate_moves_new_to_unstable() {
        let mut f = flight();
        f.activate(t0());
        assert_eq!(f.state(), State::Unstable);
        assert_eq!(f.activated_time(), Some(t0()));

        f.set_state(State::Stable).unwrap();
        f.activate(t0() + Duration::minutes(1));
        assert_eq!(f.state(), State::Stable);
    }

    #[test]
    fn test_pinned_and_maximum_delay() {
        let mut f = flight();
        f.set_landing_time(t0() + Duration::minutes(4), true);
        assert!(f.is_pinned());

        f.set_maximum_delay(Some(Duration::minutes(3)));
        assert!(f.exceeds_maximum_delay());
        f.set_maximum_delay(Some(Duration::minutes(4)));
        assert!(!f.exceeds_maximum_delay());

        f.clear_manual_landing_time();
        f.set_state(State::Frozen).unwrap();
        assert!(f.is_pinned());
    }

    #[test]
    fn test_routing_change_resets_feeder_fix_times() {
        let mut f = flight().with_feeder_fix("RIVET", Some(t0() - Duration::minutes(20)));
        assert!(!f.update_routing(Some("rivet"), Some("rivet3")));
        assert_eq!(f.assigned_arrival_identifier(), Some("RIVET3"));

        assert!(f.update_routing(Some("BOREE"), None));
        assert_eq!(f.feeder_fix_identifier(), Some("BOREE"));
        assert!(f.initial_feeder_fix_estimate().is_none());
        assert!(f.scheduled_feeder_fix_time().is_none());
    }
}
