//! Flight states, their priority ranks, and the time-based transition rules.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::record::Flight;

/// Stability state of a flight.
///
/// The first five variants form the priority chain used for sequencing.
/// The remaining variants are side states outside that chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum State {
    /// Position and times may still change freely.
    Unstable,
    /// Sequence position is committed; times may still be recalculated.
    Stable,
    /// The flight has reached its first feeder-fix estimate.
    SuperStable,
    /// Close to landing; never moved by the scheduler again.
    Frozen,
    /// Scheduled landing time has passed.
    Landed,
    /// Go-around re-inserted into the sequence.
    Overshoot,
    /// Created but not yet part of a sequence.
    New,
    /// Waiting in the pending list (e.g., a departure awaiting a takeoff time).
    Pending,
    /// Pulled out of the sequence by a controller.
    Desequenced,
    /// Terminal: removed from the sequence.
    Removed,
}

/// Rank of each state, indexed by `State as usize`. Lower ranks are higher priority.
const STATE_RANK: [u8; 10] = [
    4, // Unstable
    3, // Stable
    2, // SuperStable
    1, // Frozen
    0, // Landed
    5, // Overshoot
    6, // New
    7, // Pending
    8, // Desequenced
    9, // Removed
];

impl State {
    /// All states, in declaration order.
    pub const ALL: [State; 10] = [
        State::Unstable,
        State::Stable,
        State::SuperStable,
        State::Frozen,
        State::Landed,
        State::Overshoot,
        State::New,
        State::Pending,
        State::Desequenced,
        State::Removed,
    ];

    /// Priority rank (0 = highest priority, least movable).
    #[inline]
    pub fn rank(self) -> u8 {
        STATE_RANK[self as usize]
    }

    /// Returns true if this state is at least as high priority as `other`.
    #[inline]
    pub fn outranks_or_equals(self, other: State) -> bool {
        self.rank() <= other.rank()
    }

    /// Returns true for `Landed` and `Frozen`: the scheduler never moves these.
    pub fn is_fixed(self) -> bool {
        matches!(self, State::Landed | State::Frozen)
    }

    /// Returns true for states a tracked (sequenced) flight may be in.
    pub fn is_sequenced(self) -> bool {
        matches!(
            self,
            State::Unstable
                | State::Stable
                | State::SuperStable
                | State::Frozen
                | State::Landed
                | State::Overshoot
        )
    }

    /// Returns true if ordering uses the committed schedule rather than the estimate.
    pub fn orders_by_schedule(self) -> bool {
        self.rank() <= State::Stable.rank() || self == State::Overshoot
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Unstable => "Unstable",
            Self::Stable => "Stable",
            Self::SuperStable => "SuperStable",
            Self::Frozen => "Frozen",
            Self::Landed => "Landed",
            Self::Overshoot => "Overshoot",
            Self::New => "New",
            Self::Pending => "Pending",
            Self::Desequenced => "Desequenced",
            Self::Removed => "Removed",
        };
        write!(f, "{}", name)
    }
}

/// Total ordering key for sequence position.
///
/// Compares by state rank, then by the time that state orders by, then by callsign.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SequenceKey {
    rank: u8,
    time: DateTime<Utc>,
    callsign: String,
}

impl SequenceKey {
    /// Build the key for a flight.
    pub fn of(flight: &Flight) -> Self {
        let state = flight.state();
        let time = if state.orders_by_schedule() {
            flight.scheduled_landing_time()
        } else {
            flight.landing_estimate()
        };
        Self {
            rank: state.rank(),
            time,
            callsign: flight.callsign().to_string(),
        }
    }
}

/// Compare two flights by sequence position.
pub fn compare(a: &Flight, b: &Flight) -> Ordering {
    SequenceKey::of(a).cmp(&SequenceKey::of(b))
}

/// Thresholds driving the time-based state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StabilityThresholds {
    /// Minimum time a flight stays Unstable after activation.
    pub minimum_unstable_duration: Duration,
    /// Time to feeder fix at which an Unstable flight becomes Stable.
    pub stable_threshold: Duration,
    /// Time to landing at which a flight becomes Frozen.
    pub frozen_threshold: Duration,
}

impl Default for StabilityThresholds {
    fn default() -> Self {
        Self {
            minimum_unstable_duration: Duration::minutes(3),
            stable_threshold: Duration::minutes(25),
            frozen_threshold: Duration::minutes(15),
        }
    }
}

/// Compute the state a flight should be in at `now`.
///
/// Pure: reads the flight and returns the target state without mutating
/// anything. States only move toward higher priority; several promotions may
/// apply in a single evaluation (e.g., Unstable straight to SuperStable).
pub fn next_state(flight: &Flight, now: DateTime<Utc>, thresholds: &StabilityThresholds) -> State {
    let mut state = flight.state();

    match state {
        State::New | State::Pending | State::Desequenced | State::Removed | State::Landed => {
            return state
        }
        _ => {}
    }

    if now >= flight.scheduled_landing_time() {
        return State::Landed;
    }

    if state == State::Frozen || flight.landing_estimate() - now <= thresholds.frozen_threshold {
        return State::Frozen;
    }

    if state == State::Overshoot {
        return state;
    }

    if state == State::Unstable && is_ready_for_stable(flight, now, thresholds) {
        state = State::Stable;
    }

    if state == State::Stable
        && flight
            .initial_feeder_fix_estimate()
            .is_some_and(|initial| now >= initial)
    {
        state = State::SuperStable;
    }

    state
}

fn is_ready_for_stable(flight: &Flight, now: DateTime<Utc>, thresholds: &StabilityThresholds) -> bool {
    let Some(activated) = flight.activated_time() else {
        return false;
    };

    if now - activated < thresholds.minimum_unstable_duration {
        return false;
    }

    // Flights without a feeder fix measure against the landing estimate
    let reference = flight
        .feeder_fix_estimate()
        .unwrap_or_else(|| flight.landing_estimate());

    reference - now <= thresholds.stable_threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight::{AircraftCategory, AircraftType, WakeCategory};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    }

    fn flight(callsign: &str, landing_in: i64) -> Flight {
        Flight::new(
            callsign,
            AircraftType::new("B738", WakeCategory::Medium, AircraftCategory::Jet),
            "YSSY",
            now() + Duration::minutes(landing_in),
        )
    }

    fn active_flight(callsign: &str, ff_in: i64, landing_in: i64) -> Flight {
        let mut f = flight(callsign, landing_in)
            .with_feeder_fix("RIVET", Some(now() + Duration::minutes(ff_in)));
        f.activate(now() - Duration::minutes(10));
        f
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rank table
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_priority_chain_order() {
        assert!(State::Landed.rank() < State::Frozen.rank());
        assert!(State::Frozen.rank() < State::SuperStable.rank());
        assert!(State::SuperStable.rank() < State::Stable.rank());
        assert!(State::Stable.rank() < State::Unstable.rank());
    }

    #[test]
    fn test_ranks_are_unique() {
        let mut ranks: Vec<u8> = State::ALL.iter().map(|s| s.rank()).collect();
        ranks.sort_unstable();
        ranks.dedup();
        assert_eq!(ranks.len(), State::ALL.len());
    }

    #[test]
    fn test_side_states_rank_after_chain() {
        for side in [State::Overshoot, State::New, State::Pending, State::Desequenced, State::Removed] {
            assert!(side.rank() > State::Unstable.rank(), "{side} should rank after Unstable");
            assert!(!side.is_fixed());
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_unstable_waits_for_minimum_duration() {
        let thresholds = StabilityThresholds::default();
        let mut f = flight("QFA1", 40).with_feeder_fix("RIVET", Some(now() + Duration::minutes(20)));
        f.activate(now() - Duration::minutes(1));

        assert_eq!(next_state(&f, now(), &thresholds), State::Unstable);
    }

    #[test]
    fn test_unstable_becomes_stable_inside_threshold() {
        let thresholds = StabilityThresholds::default();
        let f = active_flight("QFA1", 20, 40);

        assert_eq!(next_state(&f, now(), &thresholds), State::Stable);
    }

    #[test]
    fn test_unstable_outside_threshold_stays_unstable() {
        let thresholds = StabilityThresholds::default();
        let f = active_flight("QFA1", 60, 80);

        assert_eq!(next_state(&f, now(), &thresholds), State::Unstable);
    }

    #[test]
    fn test_stable_becomes_superstable_after_initial_feeder_fix_estimate() {
        let thresholds = StabilityThresholds::default();
        let mut f = active_flight("QFA1", 5, 30);
        f.set_state(State::Stable).unwrap();

        // Later estimate does not move the initial one
        f.update_feeder_fix_estimate(now() + Duration::minutes(8));

        assert_eq!(
            next_state(&f, now() + Duration::minutes(6), &thresholds),
            State::SuperStable
        );
    }

    #[test]
    fn test_any_state_freezes_inside_frozen_threshold() {
        let thresholds = StabilityThresholds::default();
        let f = active_flight("QFA1", -5, 10);

        assert_eq!(next_state(&f, now(), &thresholds), State::Frozen);
    }

    #[test]
    fn test_landed_once_scheduled_time_passes() {
        let thresholds = StabilityThresholds::default();
        let mut f = active_flight("QFA1", -20, 10);
        f.set_state(State::Frozen).unwrap();

        assert_eq!(
            next_state(&f, now() + Duration::minutes(10), &thresholds),
            State::Landed
        );
        assert_eq!(
            next_state(&f, now() + Duration::minutes(9), &thresholds),
            State::Frozen
        );
    }

    #[test]
    fn test_frozen_never_demotes() {
        let thresholds = StabilityThresholds::default();
        let mut f = active_flight("QFA1", 40, 60);
        f.set_state(State::Frozen).unwrap();

        assert_eq!(next_state(&f, now(), &thresholds), State::Frozen);
    }

    #[test]
    fn test_side_states_are_untouched() {
        let thresholds = StabilityThresholds::default();
        for side in [State::Pending, State::Desequenced, State::New] {
            let mut f = active_flight("QFA1", -20, 5);
            f.set_state(side).unwrap();
            assert_eq!(next_state(&f, now() + Duration::hours(1), &thresholds), side);
        }
    }

    #[test]
    fn test_overshoot_only_freezes_or_lands() {
        let thresholds = StabilityThresholds::default();
        let mut f = active_flight("QFA1", -20, 30);
        f.set_state(State::Overshoot).unwrap();

        assert_eq!(next_state(&f, now(), &thresholds), State::Overshoot);
        assert_eq!(
            next_state(&f, now() + Duration::minutes(20), &thresholds),
            State::Frozen
        );
    }

    #[test]
    fn test_flight_without_feeder_fix_uses_landing_estimate() {
        let thresholds = StabilityThresholds::default();
        let mut f = flight("QFA1", 20);
        f.activate(now() - Duration::minutes(10));

        assert_eq!(next_state(&f, now(), &thresholds), State::Stable);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Ordering
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_sorted_set_orders_by_state_then_time() {
        use std::collections::BTreeMap;

        let mut flights = Vec::new();
        for (callsign, state, minutes) in [
            ("UNS1", State::Unstable, 5),
            ("STB1", State::Stable, 30),
            ("LND1", State::Landed, 40),
            ("FRZ1", State::Frozen, 20),
            ("SST1", State::SuperStable, 25),
            ("STB2", State::Stable, 10),
            ("UNS2", State::Unstable, 2),
        ] {
            let mut f = flight(callsign, minutes);
            f.set_state(state).unwrap();
            flights.push(f);
        }

        let sorted: BTreeMap<SequenceKey, &str> = flights
            .iter()
            .map(|f| (SequenceKey::of(f), f.callsign()))
            .collect();
        let order: Vec<&str> = sorted.values().copied().collect();

        assert_eq!(order, vec!["LND1", "FRZ1", "SST1", "STB2", "STB1", "UNS2", "UNS1"]);
    }

    #[test]
    fn test_unstable_orders_by_estimate_stable_by_schedule() {
        let mut a = flight("AAA", 10);
        a.set_state(State::Unstable).unwrap();
        a.set_landing_time(now() + Duration::minutes(30), false);

        let mut b = flight("BBB", 20);
        b.set_state(State::Unstable).unwrap();

        // Unstable compares estimates (10 < 20), ignoring A's later schedule
        assert_eq!(compare(&a, &b), Ordering::Less);

        a.set_state(State::Stable).unwrap();
        b.set_state(State::Stable).unwrap();
        // Stable compares schedules (30 > 20)
        assert_eq!(compare(&a, &b), Ordering::Greater);
    }

    #[test]
    fn test_ties_broken_by_callsign() {
        let mut a = flight("ZZZ", 10);
        a.set_state(State::Stable).unwrap();
        let mut b = flight("AAA", 10);
        b.set_state(State::Stable).unwrap();

        assert_eq!(compare(&a, &b), Ordering::Greater);
    }
}
