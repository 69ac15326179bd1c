//! One airport's sequence, its scheduler and the feed that drives them.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::command::{CommandOutcome, SequenceCommand};
use super::error::ServiceError;
use crate::config::{
    AirportConfiguration, DEFAULT_CREATION_THRESHOLD_SECS, DEFAULT_TRAJECTORY_RANGE_NM,
    SettingsFile,
};
use crate::error::SequenceError;
use crate::estimation::EstimateProvider;
use crate::flight::{next_state, FixEstimate, Flight, FlightUpdate, StabilityThresholds};
use crate::scheduler::Scheduler;
use crate::sequence::{CleanupPolicy, Sequence, SequenceSnapshot};
use crate::time::Clock;

/// Capacity of each airport's snapshot channel.
pub const SNAPSHOT_CHANNEL_CAPACITY: usize = 16;

/// Tunables shared by every airport sequencer.
#[derive(Debug, Clone, PartialEq)]
pub struct SequencerOptions {
    /// Timing of the Stable and Frozen transitions
    pub thresholds: StabilityThresholds,
    /// Eviction of landed and lost flights
    pub cleanup: CleanupPolicy,
    /// Flights are created once their feeder-fix (or landing) estimate is this close.
    pub creation_threshold: Duration,
    /// Within this distance of the feeder fix, estimates come from the live trajectory.
    pub trajectory_range_nm: f64,
}

impl Default for SequencerOptions {
    fn default() -> Self {
        Self {
            thresholds: StabilityThresholds::default(),
            cleanup: CleanupPolicy::default(),
            creation_threshold: Duration::seconds(DEFAULT_CREATION_THRESHOLD_SECS as i64),
            trajectory_range_nm: DEFAULT_TRAJECTORY_RANGE_NM,
        }
    }
}

impl From<&SettingsFile> for SequencerOptions {
    fn from(settings: &SettingsFile) -> Self {
        Self {
            thresholds: settings.stability.thresholds(),
            cleanup: settings.cleanup.policy(),
            creation_threshold: settings.estimation.creation_threshold(),
            trajectory_range_nm: settings.estimation.trajectory_range_nm,
        }
    }
}

/// Latest system estimates received for a flight.
#[derive(Debug, Clone, Copy)]
struct SystemEstimates {
    /// System estimate for the feeder fix on the route
    feeder_fix: Option<DateTime<Utc>>,
    /// System landing estimate
    landing: DateTime<Utc>,
}

/// Owns and drives the sequence for one airport.
///
/// All mutation goes through `&mut self`; [`SequencerService`](super::SequencerService)
/// keeps each sequencer behind its own mutex so there is a single writer per
/// airport.
pub struct AirportSequencer {
    /// Static airport configuration
    airport: AirportConfiguration,
    /// The sequence this sequencer owns
    sequence: Sequence,
    /// Delay propagation and runway selection
    scheduler: Scheduler,
    /// Feeder-fix and landing estimate rules
    estimates: EstimateProvider,
    /// Time source (manual in tests and replays)
    clock: Arc<dyn Clock>,
    /// Stability, cleanup and creation tunables
    options: SequencerOptions,
    /// Latest system estimates by callsign, reapplied on every tick
    system: HashMap<String, SystemEstimates>,
    /// Snapshot channel; sends fail silently without subscribers
    publisher: broadcast::Sender<SequenceSnapshot>,
}

impl AirportSequencer {
    /// Create a sequencer with an empty sequence in the airport's default runway mode.
    pub fn new(
        airport: AirportConfiguration,
        options: SequencerOptions,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ServiceError> {
        let sequence = Sequence::new(&airport)?;
        let scheduler = Scheduler::new(&airport);
        let estimates = EstimateProvider::new(&airport, options.trajectory_range_nm)?;
        let (publisher, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);

        info!(
            airport = %airport.identifier,
            runway_mode = %sequence.current_runway_mode().identifier,
            "Airport sequencer created"
        );

        Ok(Self {
            airport,
            sequence,
            scheduler,
            estimates,
            clock,
            options,
            system: HashMap::new(),
            publisher,
        })
    }

    /// ICAO code of the airport.
    pub fn identifier(&self) -> &str {
        &self.airport.identifier
    }

    /// Read access to the sequence.
    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    /// Subscribe to the snapshots published after every tick and command.
    pub fn subscribe(&self) -> broadcast::Receiver<SequenceSnapshot> {
        self.publisher.subscribe()
    }

    /// Capture the sequence as it stands.
    pub fn snapshot(&self) -> SequenceSnapshot {
        SequenceSnapshot::capture(&self.sequence, self.clock.now())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Feed
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply one update from the flight data feed.
    ///
    /// Known flights get a fresh position, routing and estimates. Unknown
    /// flights are created once they come within the creation threshold;
    /// flights still on the ground at a departure airport go to the pending
    /// list instead.
    pub fn apply_update(&mut self, update: FlightUpdate) -> Result<(), SequenceError> {
        if !update.destination.eq_ignore_ascii_case(&self.airport.identifier) {
            debug!(
                callsign = %update.callsign,
                destination = %update.destination,
                airport = %self.airport.identifier,
                "Ignoring update for another destination"
            );
            return Ok(());
        }

        let now = self.clock.now();
        let feeder_fix = self.feeder_fix_of(&update).cloned();
        let system = SystemEstimates {
            feeder_fix: feeder_fix.as_ref().map(|fix| fix.estimate),
            landing: update.landing_estimate,
        };

        if self.sequence.contains(&update.callsign) {
            let estimates = &self.estimates;
            self.sequence.update(&update.callsign, |flight| {
                refresh(flight, &update, feeder_fix.as_ref(), &system, estimates, now);
            })?;
        } else if let Some(flight) = self.create_flight(&update, feeder_fix.as_ref(), &system, now) {
            if update.is_on_ground()
                && update
                    .origin
                    .as_deref()
                    .is_some_and(|origin| self.airport.is_departure_airport(origin))
            {
                self.sequence.add_pending(flight)?;
            } else {
                self.sequence.add(flight, now)?;
            }
        } else {
            return Ok(());
        }

        self.system.insert(update.callsign.to_uppercase(), system);
        self.scheduler.schedule(&mut self.sequence);
        Ok(())
    }

    /// First fix on the route that is one of the airport's feeder fixes.
    fn feeder_fix_of<'a>(&self, update: &'a FlightUpdate) -> Option<&'a FixEstimate> {
        update
            .fixes
            .iter()
            .find(|fix| self.airport.feeder_fix(&fix.identifier).is_some())
    }

    fn create_flight(
        &self,
        update: &FlightUpdate,
        feeder_fix: Option<&FixEstimate>,
        system: &SystemEstimates,
        now: DateTime<Utc>,
    ) -> Option<Flight> {
        let reference = system.feeder_fix.unwrap_or(system.landing);
        let departing = update
            .origin
            .as_deref()
            .is_some_and(|origin| self.airport.is_departure_airport(origin));
        if reference - now > self.options.creation_threshold && !departing {
            debug!(
                callsign = %update.callsign,
                time_to_go_secs = (reference - now).num_seconds(),
                "Flight outside creation threshold"
            );
            return None;
        }

        let mut flight = Flight::new(
            &update.callsign,
            update.aircraft.clone(),
            &update.destination,
            update.landing_estimate,
        );
        if let Some(origin) = &update.origin {
            flight = flight.with_origin(origin);
        }
        if let Some(runway) = &update.runway {
            flight = flight.with_runway(runway);
        }
        flight.set_approach_type(update.approach_type.as_deref());

        refresh(&mut flight, update, feeder_fix, system, &self.estimates, now);
        flight.reset_initial_estimates();
        let estimate = flight.landing_estimate();
        flight.set_landing_time(estimate, false);
        Some(flight)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tick
    // ─────────────────────────────────────────────────────────────────────────

    /// Advance the sequence to the current time and reschedule.
    ///
    /// Runs state transitions, the runway mode swap, cleanup and estimate
    /// refresh, then schedules and publishes a snapshot.
    pub fn tick(&mut self) -> SequenceSnapshot {
        let now = self.clock.now();

        for flight in self.sequence.flights_mut() {
            let target = next_state(flight, now, &self.options.thresholds);
            if target == flight.state() {
                continue;
            }
            debug!(callsign = %flight.callsign(), from = %flight.state(), to = %target, "State changed");
            if let Err(error) = flight.set_state(target) {
                warn!(%error, "State change rejected");
            }
        }

        self.sequence.try_swap_runway_modes(now);

        for callsign in self.sequence.cleanup(&self.options.cleanup, now) {
            self.system.remove(&callsign);
        }

        let estimates = &self.estimates;
        let system = &self.system;
        for flight in self.sequence.flights_mut() {
            if let Some(latest) = system.get(flight.callsign()) {
                apply_estimates(flight, latest, estimates, now);
            }
        }

        self.scheduler.schedule(&mut self.sequence);
        self.publish(now)
    }

    fn publish(&self, now: DateTime<Utc>) -> SequenceSnapshot {
        let snapshot = SequenceSnapshot::capture(&self.sequence, now);
        // Fails only when nobody is subscribed
        let _ = self.publisher.send(snapshot.clone());
        snapshot
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Commands
    // ─────────────────────────────────────────────────────────────────────────

    /// Dispatch a manual command and reschedule.
    ///
    /// Commands that refer to a flight, slot or runway mode that no longer
    /// exists are logged and ignored. Rule violations are returned.
    pub fn execute(&mut self, command: SequenceCommand) -> Result<CommandOutcome, SequenceError> {
        let name = command.name();
        let cascade = !matches!(command, SequenceCommand::SwapFlights { .. });

        let outcome = match self.dispatch(command) {
            Ok(outcome) => outcome,
            Err(error) if error.is_not_found() => {
                warn!(airport = %self.airport.identifier, command = name, %error, "Ignoring command");
                return Ok(CommandOutcome::Ignored);
            }
            Err(error) => return Err(error),
        };

        debug!(airport = %self.airport.identifier, command = name, ?outcome, "Command applied");
        if cascade {
            self.scheduler.schedule(&mut self.sequence);
        }
        self.publish(self.clock.now());
        Ok(outcome)
    }

    fn dispatch(&mut self, command: SequenceCommand) -> Result<CommandOutcome, SequenceError> {
        let now = self.clock.now();
        let sequence = &mut self.sequence;

        match command {
            SequenceCommand::InsertPending { callsign, options } => {
                sequence.insert_pending(&callsign, &options, now)?;
            }
            SequenceCommand::InsertDummy {
                callsign,
                aircraft,
                options,
            } => {
                let callsign = sequence.insert_dummy(callsign.as_deref(), aircraft, &options, now)?;
                return Ok(CommandOutcome::DummyInserted(callsign));
            }
            SequenceCommand::InsertOvershoot { callsign, options } => {
                sequence.insert_overshoot(&callsign, &options)?;
            }
            SequenceCommand::Reposition { callsign, options } => {
                sequence.reposition(&callsign, &options)?;
            }
            SequenceCommand::MoveFlight {
                callsign,
                time,
                runway,
            } => {
                sequence.move_flight(&callsign, time, runway.as_deref())?;
            }
            SequenceCommand::SwapFlights { first, second } => {
                sequence.swap_flights(&first, &second)?;
                for callsign in [&first, &second] {
                    settle_state(sequence, callsign, now, &self.options.thresholds)?;
                }
                sequence.sort();
            }
            SequenceCommand::Remove { callsign } => {
                let flight = sequence.remove(&callsign)?;
                self.system.remove(flight.callsign());
            }
            SequenceCommand::Desequence { callsign } => {
                sequence.desequence(&callsign)?;
            }
            SequenceCommand::Resume { callsign } => {
                sequence.resume(&callsign)?;
                self.refresh_estimates(&callsign, now)?;
            }
            SequenceCommand::MakePending { callsign } => {
                sequence.make_pending(&callsign)?;
            }
            SequenceCommand::Recompute { callsign } => {
                sequence.recompute(&callsign)?;
                self.refresh_estimates(&callsign, now)?;
                self.sequence.update(&callsign, |flight| {
                    flight.reset_initial_estimates();
                    let estimate = flight.landing_estimate();
                    flight.set_landing_time(estimate, false);
                })?;
            }
            SequenceCommand::ChangeState { callsign, state } => {
                sequence.set_flight_state(&callsign, state)?;
            }
            SequenceCommand::ChangeRunway { callsign, runway } => {
                sequence.change_runway(&callsign, &runway)?;
            }
            SequenceCommand::ChangeFeederFixEstimate { callsign, estimate } => {
                sequence.change_feeder_fix_estimate(&callsign, estimate)?;
                self.refresh_estimates(&callsign, now)?;
            }
            SequenceCommand::SetMaximumDelay {
                callsign,
                maximum_delay_secs,
            } => {
                let maximum = maximum_delay_secs.map(|secs| Duration::seconds(i64::from(secs)));
                sequence.set_maximum_delay(&callsign, maximum)?;
            }
            SequenceCommand::SetNoDelay { callsign, value } => {
                sequence.set_no_delay(&callsign, value)?;
            }
            SequenceCommand::SetHighPriority { callsign, value } => {
                sequence.set_high_priority(&callsign, value)?;
            }
            SequenceCommand::ChangeApproachType {
                callsign,
                approach_type,
            } => {
                sequence.change_approach_type(&callsign, approach_type.as_deref())?;
                self.refresh_estimates(&callsign, now)?;
            }
            SequenceCommand::AddBlockout {
                runways,
                start_time,
                end_time,
            } => {
                sequence.add_blockout(&runways, start_time, end_time)?;
            }
            SequenceCommand::CreateSlot {
                runways,
                start_time,
                end_time,
            } => {
                let id = sequence.create_slot(&runways, start_time, end_time)?;
                return Ok(CommandOutcome::SlotCreated(id));
            }
            SequenceCommand::ModifySlot {
                id,
                start_time,
                end_time,
            } => {
                sequence.modify_slot(id, start_time, end_time)?;
            }
            SequenceCommand::DeleteSlot { id } => {
                sequence.delete_slot(id)?;
            }
            SequenceCommand::ChangeRunwayMode {
                mode,
                last_landing_time,
                first_landing_time,
            } => {
                sequence.change_runway_mode(&mode, last_landing_time, first_landing_time, now)?;
            }
            SequenceCommand::SetLandingRate {
                runway,
                landing_rate_secs,
            } => {
                sequence.set_landing_rate(&runway, Duration::seconds(i64::from(landing_rate_secs)))?;
            }
        }

        Ok(CommandOutcome::Applied)
    }

    /// Re-derive one flight's estimates from the latest system data.
    fn refresh_estimates(&mut self, callsign: &str, now: DateTime<Utc>) -> Result<(), SequenceError> {
        let Some(latest) = self.system.get(&callsign.to_uppercase()).copied() else {
            return Ok(());
        };
        let estimates = &self.estimates;
        self.sequence
            .update(callsign, |flight| apply_estimates(flight, &latest, estimates, now))
    }
}

/// Run the time-based state rules for one sequenced flight.
fn settle_state(
    sequence: &mut Sequence,
    callsign: &str,
    now: DateTime<Utc>,
    thresholds: &StabilityThresholds,
) -> Result<(), SequenceError> {
    let flight = sequence
        .flight(callsign)
        .ok_or_else(|| SequenceError::FlightNotFound(callsign.to_string()))?;
    let target = next_state(flight, now, thresholds);
    if target == flight.state() {
        return Ok(());
    }

    debug!(%callsign, from = %flight.state(), to = %target, "State changed");
    let mut result = Ok(());
    sequence.update(callsign, |flight| result = flight.set_state(target))?;
    result
}

/// Fold a feed update into a flight.
fn refresh(
    flight: &mut Flight,
    update: &FlightUpdate,
    feeder_fix: Option<&FixEstimate>,
    system: &SystemEstimates,
    estimates: &EstimateProvider,
    now: DateTime<Utc>,
) {
    flight.update_position(update.position.clone(), now);

    let routing = feeder_fix
        .map(|fix| fix.identifier.clone())
        .or_else(|| flight.feeder_fix_identifier().map(str::to_string));
    if flight.update_routing(routing.as_deref(), update.arrival.as_deref()) {
        debug!(callsign = %flight.callsign(), feeder_fix = ?routing, "Feeder fix changed");
    }

    if let Some(actual) = feeder_fix.and_then(|fix| fix.actual) {
        flight.pass_feeder_fix(actual);
    }

    apply_estimates(flight, system, estimates, now);
}

fn apply_estimates(
    flight: &mut Flight,
    system: &SystemEstimates,
    estimates: &EstimateProvider,
    now: DateTime<Utc>,
) {
    if !flight.has_passed_feeder_fix() {
        if let Some(estimate) = estimates.feeder_fix_estimate(flight, system.feeder_fix, now) {
            flight.update_feeder_fix_estimate(estimate);
        }
    }
    let landing = estimates.landing_estimate(flight, system.landing);
    flight.update_landing_estimate(landing);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::fixtures::test_airport;
    use crate::flight::{AircraftCategory, AircraftType, FlightPosition, State, WakeCategory};
    use crate::geo::Coordinate;
    use crate::sequence::InsertionOptions;
    use crate::time::ManualClock;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    }

    fn minutes(m: i64) -> DateTime<Utc> {
        t0() + Duration::minutes(m)
    }

    fn setup() -> (AirportSequencer, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(t0()));
        let sequencer =
            AirportSequencer::new(test_airport(), SequencerOptions::default(), clock.clone()).unwrap();
        (sequencer, clock)
    }

    fn update(callsign: &str, feeder_fix_in: i64, landing_in: i64) -> FlightUpdate {
        FlightUpdate {
            callsign: callsign.to_string(),
            aircraft: AircraftType::new("B738", WakeCategory::Medium, AircraftCategory::Jet),
            origin: Some("YMML".to_string()),
            destination: "YSSY".to_string(),
            arrival: None,
            runway: None,
            approach_type: None,
            position: Some(FlightPosition::airborne(Coordinate::new(-35.0, 149.0), 35000, 450.0)),
            fixes: vec![FixEstimate {
                identifier: "BOREE".to_string(),
                estimate: minutes(feeder_fix_in),
                actual: None,
            }],
            landing_estimate: minutes(landing_in),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Feed
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_update_creates_flight_with_interval_estimate() {
        let (mut sequencer, _) = setup();
        sequencer.apply_update(update("QFA1", 20, 40)).unwrap();

        let flight = sequencer.sequence().flight("QFA1").unwrap();
        assert_eq!(flight.state(), State::Unstable);
        assert_eq!(flight.feeder_fix_identifier(), Some("BOREE"));
        // BOREE has a 15 minute preset interval
        assert_eq!(flight.landing_estimate(), minutes(35));
        assert_eq!(flight.initial_landing_estimate(), minutes(35));
        assert_eq!(flight.total_delay(), Duration::zero());
        assert_eq!(flight.last_seen(), Some(t0()));
    }

    #[test]
    fn test_update_outside_creation_threshold_is_ignored() {
        let (mut sequencer, _) = setup();
        sequencer.apply_update(update("QFA1", 180, 200)).unwrap();
        assert!(!sequencer.sequence().contains("QFA1"));
    }

    #[test]
    fn test_update_for_other_destination_is_ignored() {
        let (mut sequencer, _) = setup();
        let mut other = update("QFA1", 20, 40);
        other.destination = "YBBN".to_string();
        sequencer.apply_update(other).unwrap();
        assert!(!sequencer.sequence().contains("QFA1"));
    }

    #[test]
    fn test_departure_on_ground_goes_to_pending() {
        let (mut sequencer, _) = setup();
        let mut departure = update("QLK1", 30, 50);
        departure.origin = Some("YSCB".to_string());
        departure.position = Some(FlightPosition {
            on_ground: true,
            ..FlightPosition::airborne(Coordinate::new(-35.3, 149.2), 0, 0.0)
        });
        sequencer.apply_update(departure).unwrap();

        assert!(sequencer.sequence().flight("QLK1").is_none());
        assert_eq!(sequencer.sequence().pending()[0].callsign(), "QLK1");
    }

    #[test]
    fn test_update_refreshes_existing_flight() {
        let (mut sequencer, clock) = setup();
        sequencer.apply_update(update("QFA1", 20, 40)).unwrap();

        clock.advance(Duration::minutes(1));
        sequencer.apply_update(update("QFA1", 22, 42)).unwrap();

        let flight = sequencer.sequence().flight("QFA1").unwrap();
        assert_eq!(flight.feeder_fix_estimate(), Some(minutes(22)));
        assert_eq!(flight.initial_feeder_fix_estimate(), Some(minutes(20)));
        assert_eq!(flight.landing_estimate(), minutes(37));
        assert_eq!(flight.last_seen(), Some(minutes(1)));
    }

    #[test]
    fn test_actual_feeder_fix_time_recorded() {
        let (mut sequencer, clock) = setup();
        sequencer.apply_update(update("QFA1", 20, 40)).unwrap();

        clock.set(minutes(21));
        let mut passed = update("QFA1", 20, 36);
        passed.fixes[0].actual = Some(minutes(21));
        sequencer.apply_update(passed).unwrap();

        let flight = sequencer.sequence().flight("QFA1").unwrap();
        assert!(flight.has_passed_feeder_fix());
        assert_eq!(flight.landing_estimate(), minutes(36));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tick
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_tick_advances_states_and_publishes() {
        let (mut sequencer, clock) = setup();
        let mut receiver = sequencer.subscribe();
        sequencer.apply_update(update("QFA1", 20, 40)).unwrap();

        clock.advance(Duration::minutes(5));
        let snapshot = sequencer.tick();

        // Past the minimum unstable time and inside the stable threshold
        assert_eq!(snapshot.flight("QFA1").unwrap().state, State::Stable);
        assert_eq!(receiver.try_recv().unwrap(), snapshot);
    }

    #[test]
    fn test_tick_lands_and_cleans_up() {
        let (mut sequencer, clock) = setup();
        sequencer.apply_update(update("QFA1", 5, 20)).unwrap();

        clock.set(minutes(21));
        sequencer.tick();
        assert_eq!(sequencer.sequence().flight("QFA1").unwrap().state(), State::Landed);

        // Ten minutes after landing
        clock.set(minutes(40));
        sequencer.tick();
        assert!(!sequencer.sequence().contains("QFA1"));
    }

    #[test]
    fn test_tick_swaps_runway_mode_when_due() {
        let (mut sequencer, clock) = setup();
        sequencer
            .execute(SequenceCommand::ChangeRunwayMode {
                mode: "16SINGLE".to_string(),
                last_landing_time: minutes(10),
                first_landing_time: minutes(15),
            })
            .unwrap();
        assert_eq!(sequencer.sequence().current_runway_mode().identifier, "34IVA");

        clock.set(minutes(15));
        let snapshot = sequencer.tick();
        assert_eq!(snapshot.runway_mode, "16SINGLE");
        assert!(snapshot.next_runway_mode.is_none());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Commands
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_command_for_unknown_flight_is_ignored() {
        let (mut sequencer, _) = setup();
        let outcome = sequencer
            .execute(SequenceCommand::Desequence {
                callsign: "NONE".to_string(),
            })
            .unwrap();
        assert_eq!(outcome, CommandOutcome::Ignored);
    }

    #[test]
    fn test_rule_violation_is_returned() {
        let (mut sequencer, _) = setup();
        let result = sequencer.execute(SequenceCommand::AddBlockout {
            runways: vec!["34L".to_string()],
            start_time: minutes(20),
            end_time: minutes(10),
        });
        assert!(matches!(result, Err(SequenceError::InvalidWindow { .. })));
    }

    #[test]
    fn test_insert_dummy_returns_callsign_and_cascades() {
        let (mut sequencer, _) = setup();
        sequencer.apply_update(update("QFA1", 20, 40)).unwrap();
        let landing = sequencer.sequence().flight("QFA1").unwrap().scheduled_landing_time();
        let runway = sequencer
            .sequence()
            .flight("QFA1")
            .unwrap()
            .assigned_runway_identifier()
            .unwrap()
            .to_string();

        let outcome = sequencer
            .execute(SequenceCommand::InsertDummy {
                callsign: None,
                aircraft: AircraftType::new("A320", WakeCategory::Medium, AircraftCategory::Jet),
                options: InsertionOptions::exact(landing, &runway),
            })
            .unwrap();

        assert_eq!(outcome, CommandOutcome::DummyInserted("****01*".to_string()));
        let qfa1 = sequencer.sequence().flight("QFA1").unwrap();
        assert!(qfa1.scheduled_landing_time() > landing);
    }

    #[test]
    fn test_create_slot_returns_id() {
        let (mut sequencer, _) = setup();
        let outcome = sequencer
            .execute(SequenceCommand::CreateSlot {
                runways: vec!["34L".to_string()],
                start_time: minutes(10),
                end_time: minutes(20),
            })
            .unwrap();
        let CommandOutcome::SlotCreated(id) = outcome else {
            panic!("expected a slot id, got {outcome:?}");
        };

        let deleted = sequencer.execute(SequenceCommand::DeleteSlot { id }).unwrap();
        assert_eq!(deleted, CommandOutcome::Applied);
        assert!(sequencer.sequence().slots().is_empty());
    }

    #[test]
    fn test_remove_forgets_system_estimates() {
        let (mut sequencer, _) = setup();
        sequencer.apply_update(update("QFA1", 20, 40)).unwrap();
        sequencer
            .execute(SequenceCommand::Remove {
                callsign: "QFA1".to_string(),
            })
            .unwrap();

        assert!(!sequencer.sequence().contains("QFA1"));
        assert!(sequencer.system.is_empty());
    }

    #[test]
    fn test_swap_applies_time_rules_to_both_flights() {
        let (mut sequencer, clock) = setup();
        // Landing estimates 10:17 and 10:19 via the BOREE interval
        sequencer.apply_update(update("QFA1", 2, 17)).unwrap();
        sequencer.apply_update(update("QFA2", 4, 19)).unwrap();

        clock.set(minutes(3));
        for callsign in ["QFA1", "QFA2"] {
            sequencer
                .execute(SequenceCommand::ChangeState {
                    callsign: callsign.to_string(),
                    state: State::Stable,
                })
                .unwrap();
        }
        let before = |callsign: &str, sequencer: &AirportSequencer| {
            sequencer.sequence().flight(callsign).unwrap().scheduled_landing_time()
        };
        let (first, second) = (before("QFA1", &sequencer), before("QFA2", &sequencer));

        sequencer
            .execute(SequenceCommand::SwapFlights {
                first: "QFA1".to_string(),
                second: "QFA2".to_string(),
            })
            .unwrap();

        let qfa1 = sequencer.sequence().flight("QFA1").unwrap();
        let qfa2 = sequencer.sequence().flight("QFA2").unwrap();
        assert_eq!(qfa1.scheduled_landing_time(), second);
        assert_eq!(qfa2.scheduled_landing_time(), first);
        // QFA1 is 14 minutes from its estimate, inside the frozen threshold
        assert_eq!(qfa1.state(), State::Frozen);
        assert_eq!(qfa2.state(), State::Stable);

        let result = sequencer.execute(SequenceCommand::MoveFlight {
            callsign: "QFA1".to_string(),
            time: minutes(30),
            runway: None,
        });
        assert_eq!(result, Err(SequenceError::FlightFrozen("QFA1".to_string())));
    }
}
