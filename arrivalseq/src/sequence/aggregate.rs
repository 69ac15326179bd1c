//! The per-airport sequence aggregate and its mutators.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use super::cleanup::CleanupPolicy;
use super::insertion::{InsertionOptions, RelativePosition};
use super::window::{BlockoutPeriod, ClosureWindow, Slot, SlotId};
use crate::config::AirportConfiguration;
use crate::error::SequenceError;
use crate::flight::{AircraftType, Flight, SequenceKey, State};
use crate::runway::RunwayMode;

/// Which list a flight lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum List {
    Sequenced,
    Pending,
    Desequenced,
}

impl List {
    fn name(self) -> &'static str {
        match self {
            List::Sequenced => "sequenced",
            List::Pending => "pending",
            List::Desequenced => "desequenced",
        }
    }
}

/// All arrivals for one airport.
///
/// A flight is in exactly one of three lists: the sequenced flights (kept in
/// sequence order), the pending list, or the desequenced list. Callsigns are
/// unique across all three.
///
/// Mutators only change data; they do not reschedule. Callers run the
/// [`Scheduler`](crate::scheduler::Scheduler) afterwards.
#[derive(Debug, Clone)]
pub struct Sequence {
    /// ICAO code of the airport
    airport_identifier: String,
    /// Every configured runway, for validating manual runway choices
    runway_identifiers: Vec<String>,
    /// Runway modes a controller may switch to
    available_modes: Vec<RunwayMode>,

    /// Sequenced flights, in sequence order
    flights: Vec<Flight>,
    /// Flights waiting to be inserted manually
    pending: Vec<Flight>,
    /// Flights taken out of the sequence by a controller
    desequenced: Vec<Flight>,

    /// Operator-defined runway closures
    blockouts: Vec<BlockoutPeriod>,
    /// User-managed reservations
    slots: Vec<Slot>,

    /// Runway mode in force now
    current_mode: RunwayMode,
    /// Mode scheduled to take over at `first_landing_time_for_new_mode`
    next_mode: Option<RunwayMode>,
    /// Last landing allowed under the current mode during a change
    last_landing_time_for_current_mode: Option<DateTime<Utc>>,
    /// First landing allowed under the next mode
    first_landing_time_for_new_mode: Option<DateTime<Utc>>,

    /// Source of dummy callsigns (`****NN*`)
    dummy_counter: u32,
    /// Next slot id to hand out
    next_slot_id: u64,
}

impl Sequence {
    /// Create an empty sequence in the airport's default runway mode.
    pub fn new(airport: &AirportConfiguration) -> Result<Self, SequenceError> {
        let default_mode = airport
            .default_runway_mode()
            .ok_or_else(|| SequenceError::RunwayModeNotFound("default".to_string()))?;

        Ok(Self {
            airport_identifier: airport.identifier.clone(),
            runway_identifiers: airport.runways.iter().map(|r| r.identifier.clone()).collect(),
            available_modes: airport.runway_modes.iter().map(RunwayMode::from_config).collect(),
            flights: Vec::new(),
            pending: Vec::new(),
            desequenced: Vec::new(),
            blockouts: Vec::new(),
            slots: Vec::new(),
            current_mode: RunwayMode::from_config(default_mode),
            next_mode: None,
            last_landing_time_for_current_mode: None,
            first_landing_time_for_new_mode: None,
            dummy_counter: 0,
            next_slot_id: 1,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    pub fn airport_identifier(&self) -> &str {
        &self.airport_identifier
    }

    /// Sequenced flights in sequence order.
    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    /// Flights waiting for manual insertion.
    pub fn pending(&self) -> &[Flight] {
        &self.pending
    }

    /// Flights taken out of the sequence by a controller.
    pub fn desequenced(&self) -> &[Flight] {
        &self.desequenced
    }

    pub fn blockouts(&self) -> &[BlockoutPeriod] {
        &self.blockouts
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Runway mode in force now.
    pub fn current_runway_mode(&self) -> &RunwayMode {
        &self.current_mode
    }

    /// Mode scheduled to take over, if a change is pending.
    pub fn next_runway_mode(&self) -> Option<&RunwayMode> {
        self.next_mode.as_ref()
    }

    pub fn last_landing_time_for_current_mode(&self) -> Option<DateTime<Utc>> {
        self.last_landing_time_for_current_mode
    }

    pub fn first_landing_time_for_new_mode(&self) -> Option<DateTime<Utc>> {
        self.first_landing_time_for_new_mode
    }

    /// A sequenced flight.
    pub fn flight(&self, callsign: &str) -> Option<&Flight> {
        self.flights.iter().find(|f| f.callsign().eq_ignore_ascii_case(callsign))
    }

    /// A flight in any of the three lists.
    pub fn find(&self, callsign: &str) -> Option<&Flight> {
        self.flight(callsign)
            .or_else(|| find_in(&self.pending, callsign))
            .or_else(|| find_in(&self.desequenced, callsign))
    }

    /// Returns true if the callsign is in any list.
    pub fn contains(&self, callsign: &str) -> bool {
        self.find(callsign).is_some()
    }

    /// One-based position of a sequenced flight.
    pub fn sequence_number(&self, callsign: &str) -> Option<usize> {
        self.flights
            .iter()
            .position(|f| f.callsign().eq_ignore_ascii_case(callsign))
            .map(|index| index + 1)
    }

    /// The runway mode in force for a landing at `time`.
    pub fn runway_mode_at(&self, time: DateTime<Utc>) -> &RunwayMode {
        match (&self.next_mode, self.first_landing_time_for_new_mode) {
            (Some(next), Some(first)) if time >= first => next,
            _ => &self.current_mode,
        }
    }

    /// Landing-free gap between the current and the next runway mode.
    pub fn cutover_gap(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.next_mode.as_ref()?;
        Some((
            self.last_landing_time_for_current_mode?,
            self.first_landing_time_for_new_mode?,
        ))
    }

    /// Returns true if a landing on `runway` at `time` falls in a blockout or slot.
    pub fn is_closed(&self, runway: &str, time: DateTime<Utc>) -> bool {
        self.closure_end(runway, time).is_some()
    }

    /// End of the blockout or slot covering `time` on `runway`, if any.
    pub fn closure_end(&self, runway: &str, time: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.blockouts
            .iter()
            .filter(|b| b.excludes(runway, time))
            .map(|b| b.end_time)
            .chain(
                self.slots
                    .iter()
                    .filter(|s| s.excludes(runway, time))
                    .map(|s| s.end_time),
            )
            .max()
    }

    /// Runway a flight lands on: its assignment, or the applicable mode's default.
    pub fn effective_runway(&self, flight: &Flight) -> String {
        flight
            .assigned_runway_identifier()
            .map(str::to_string)
            .or_else(|| {
                self.runway_mode_at(flight.scheduled_landing_time())
                    .default_runway()
                    .map(|r| r.identifier.clone())
            })
            .unwrap_or_default()
    }

    pub(crate) fn flights_mut(&mut self) -> &mut [Flight] {
        &mut self.flights
    }

    /// Restore sequence order after times or states changed.
    pub(crate) fn sort(&mut self) {
        self.flights.sort_by_cached_key(SequenceKey::of);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Membership
    // ─────────────────────────────────────────────────────────────────────────

    /// Add a flight to the sequence. `New` flights are activated at `now`.
    pub fn add(&mut self, mut flight: Flight, now: DateTime<Utc>) -> Result<(), SequenceError> {
        self.ensure_unique(flight.callsign())?;
        if flight.state() == State::New {
            flight.activate(now);
        }
        info!(
            airport = %self.airport_identifier,
            callsign = %flight.callsign(),
            state = %flight.state(),
            "Flight added to sequence"
        );
        self.flights.push(flight);
        self.sort();
        Ok(())
    }

    /// Add a flight to the pending list.
    pub fn add_pending(&mut self, mut flight: Flight) -> Result<(), SequenceError> {
        self.ensure_unique(flight.callsign())?;
        flight.set_state(State::Pending)?;
        info!(
            airport = %self.airport_identifier,
            callsign = %flight.callsign(),
            "Flight added to pending list"
        );
        self.pending.push(flight);
        Ok(())
    }

    /// Remove a flight from whichever list holds it.
    pub fn remove(&mut self, callsign: &str) -> Result<Flight, SequenceError> {
        let (list, index) = self
            .locate(callsign)
            .ok_or_else(|| SequenceError::FlightNotFound(callsign.to_string()))?;
        let mut flight = self.list_mut(list).remove(index);
        flight.set_state(State::Removed)?;
        info!(
            airport = %self.airport_identifier,
            callsign = %flight.callsign(),
            "Flight removed"
        );
        Ok(flight)
    }

    /// Move a sequenced flight to the desequenced list.
    pub fn desequence(&mut self, callsign: &str) -> Result<(), SequenceError> {
        let index = self.index_in(List::Sequenced, callsign)?;
        let mut flight = self.flights.remove(index);
        flight.set_state(State::Desequenced)?;
        info!(callsign = %flight.callsign(), "Flight desequenced");
        self.desequenced.push(flight);
        Ok(())
    }

    /// Return a desequenced flight to the sequence, seeded from its estimate.
    pub fn resume(&mut self, callsign: &str) -> Result<(), SequenceError> {
        let index = self.index_in(List::Desequenced, callsign)?;
        let mut flight = self.desequenced.remove(index);
        let estimate = flight.landing_estimate();
        flight.set_landing_time(estimate, false);
        flight.set_state(State::Unstable)?;
        info!(callsign = %flight.callsign(), "Flight resumed");
        self.flights.push(flight);
        self.sort();
        Ok(())
    }

    /// Move a sequenced flight back to the pending list.
    pub fn make_pending(&mut self, callsign: &str) -> Result<(), SequenceError> {
        let index = self.index_in(List::Sequenced, callsign)?;
        let mut flight = self.flights.remove(index);
        flight.clear_manual_landing_time();
        flight.set_state(State::Pending)?;
        info!(callsign = %flight.callsign(), "Flight made pending");
        self.pending.push(flight);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Insertion
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a pending flight at the requested position.
    pub fn insert_pending(
        &mut self,
        callsign: &str,
        options: &InsertionOptions,
        now: DateTime<Utc>,
    ) -> Result<(), SequenceError> {
        let index = self.index_in(List::Pending, callsign)?;
        let (time, runway) = self.resolve_target(callsign, options)?;

        let mut flight = self.pending.remove(index);
        flight.activate(now);
        flight.set_state(State::Stable)?;
        flight.assign_runway(&runway, true);
        flight.set_landing_time(time, true);
        info!(callsign = %flight.callsign(), %runway, %time, "Pending flight inserted");
        self.flights.push(flight);
        self.sort();
        Ok(())
    }

    /// Insert a dummy flight. Returns its callsign.
    ///
    /// Without a callsign one is generated from the dummy counter (`****01*`).
    pub fn insert_dummy(
        &mut self,
        callsign: Option<&str>,
        aircraft: AircraftType,
        options: &InsertionOptions,
        now: DateTime<Utc>,
    ) -> Result<String, SequenceError> {
        let callsign = match callsign {
            Some(callsign) => callsign.to_uppercase(),
            None => self.next_dummy_callsign(),
        };
        self.ensure_unique(&callsign)?;
        let (time, runway) = self.resolve_target(&callsign, options)?;

        let mut flight = Flight::new(&callsign, aircraft, &self.airport_identifier, time);
        flight.activate(now);
        flight.set_state(State::Stable)?;
        flight.assign_runway(&runway, true);
        flight.set_landing_time(time, true);
        info!(%callsign, %runway, %time, "Dummy flight inserted");
        self.flights.push(flight);
        self.sort();
        Ok(callsign)
    }

    /// Re-insert a flight that went around.
    pub fn insert_overshoot(
        &mut self,
        callsign: &str,
        options: &InsertionOptions,
    ) -> Result<(), SequenceError> {
        let index = self.index_in(List::Sequenced, callsign)?;
        let (time, runway) = self.resolve_target(callsign, options)?;

        let flight = &mut self.flights[index];
        flight.set_state(State::Overshoot)?;
        flight.assign_runway(&runway, true);
        flight.set_landing_time(time, true);
        info!(%callsign, %runway, %time, "Overshoot inserted");
        self.sort();
        Ok(())
    }

    /// Move a sequenced flight to a new position.
    pub fn reposition(
        &mut self,
        callsign: &str,
        options: &InsertionOptions,
    ) -> Result<(), SequenceError> {
        let index = self.index_in(List::Sequenced, callsign)?;
        self.ensure_movable(index)?;
        let (time, runway) = self.resolve_target(callsign, options)?;
        self.pin(index, time, Some(&runway))
    }

    /// Pin a flight at a manual landing time, optionally on a new runway.
    pub fn move_flight(
        &mut self,
        callsign: &str,
        time: DateTime<Utc>,
        runway: Option<&str>,
    ) -> Result<(), SequenceError> {
        let index = self.index_in(List::Sequenced, callsign)?;
        self.ensure_movable(index)?;
        let runway = match runway {
            Some(runway) => self.known_runway(runway)?,
            None => self.effective_runway(&self.flights[index]),
        };
        self.check_space(callsign, &runway, time)?;
        self.pin(index, time, Some(&runway))
    }

    fn pin(&mut self, index: usize, time: DateTime<Utc>, runway: Option<&str>) -> Result<(), SequenceError> {
        let flight = &mut self.flights[index];
        if let Some(runway) = runway {
            flight.assign_runway(runway, true);
        }
        flight.set_landing_time(time, true);
        if flight.state() == State::Unstable {
            flight.set_state(State::Stable)?;
        }
        info!(callsign = %flight.callsign(), %time, "Flight moved");
        self.sort();
        Ok(())
    }

    /// Resolve insertion options to a validated landing time and runway.
    fn resolve_target(
        &self,
        callsign: &str,
        options: &InsertionOptions,
    ) -> Result<(DateTime<Utc>, String), SequenceError> {
        let (time, runway) = match options {
            InsertionOptions::Exact { time, runway } => (*time, self.known_runway(runway)?),
            InsertionOptions::Relative {
                position,
                reference,
            } => {
                let reference = self
                    .flight(reference)
                    .ok_or_else(|| SequenceError::FlightNotFound(reference.clone()))?;
                let runway = self.effective_runway(reference);
                let time = match position {
                    RelativePosition::Before => {
                        if reference.is_pinned() {
                            return Err(SequenceError::FixedReference(
                                reference.callsign().to_string(),
                            ));
                        }
                        reference.scheduled_landing_time()
                    }
                    RelativePosition::After => {
                        let mode = self.runway_mode_at(reference.scheduled_landing_time());
                        reference.scheduled_landing_time() + mode.separation(&runway, &runway)
                    }
                };
                (time, runway)
            }
        };

        self.check_space(callsign, &runway, time)?;
        Ok((time, runway))
    }

    /// Fails if a landing at `time` on `runway` conflicts with an immovable flight or closure.
    fn check_space(&self, callsign: &str, runway: &str, time: DateTime<Utc>) -> Result<(), SequenceError> {
        let insufficient = || SequenceError::InsufficientSpace {
            callsign: callsign.to_uppercase(),
            runway: runway.to_string(),
            time,
        };

        if self.is_closed(runway, time) {
            return Err(insufficient());
        }

        let mode = self.runway_mode_at(time);
        let conflict = self
            .flights
            .iter()
            .filter(|f| f.is_pinned() && !f.callsign().eq_ignore_ascii_case(callsign))
            .any(|f| {
                let separation = mode.separation(runway, &self.effective_runway(f));
                (time - f.scheduled_landing_time()).abs() < separation
            });
        if conflict {
            return Err(insufficient());
        }
        Ok(())
    }

    fn next_dummy_callsign(&mut self) -> String {
        loop {
            self.dummy_counter += 1;
            let callsign = format!("****{:02}*", self.dummy_counter);
            if !self.contains(&callsign) {
                return callsign;
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Flight edits
    // ─────────────────────────────────────────────────────────────────────────

    /// Exchange the landing slots of two flights.
    ///
    /// Scheduled landing times and runways are swapped; each flight keeps its
    /// own feeder-fix-to-landing interval. Unstable flights become Stable.
    pub fn swap_flights(&mut self, first: &str, second: &str) -> Result<(), SequenceError> {
        let a = self.index_in(List::Sequenced, first)?;
        let b = self.index_in(List::Sequenced, second)?;
        self.ensure_movable(a)?;
        self.ensure_movable(b)?;
        if a == b {
            return Ok(());
        }

        let slot_a = Self::landing_slot(&self.flights[a]);
        let slot_b = Self::landing_slot(&self.flights[b]);
        Self::take_landing_slot(&mut self.flights[a], &slot_b)?;
        Self::take_landing_slot(&mut self.flights[b], &slot_a)?;

        info!(first = %first, second = %second, "Flights swapped");
        self.sort();
        Ok(())
    }

    fn landing_slot(flight: &Flight) -> (DateTime<Utc>, Option<String>, bool, bool) {
        (
            flight.scheduled_landing_time(),
            flight.assigned_runway_identifier().map(str::to_string),
            flight.runway_manually_assigned(),
            flight.manual_landing_time(),
        )
    }

    fn take_landing_slot(
        flight: &mut Flight,
        slot: &(DateTime<Utc>, Option<String>, bool, bool),
    ) -> Result<(), SequenceError> {
        let (time, runway, manual_runway, manual_time) = slot;
        flight.set_landing_time(*time, *manual_time);
        match runway {
            Some(runway) => flight.assign_runway(runway, *manual_runway),
            None => flight.clear_runway(),
        }
        if let Some(interval) = flight.feeder_fix_to_landing_interval() {
            flight.set_feeder_fix_time(*time - interval);
        }
        if flight.state() == State::Unstable {
            flight.set_state(State::Stable)?;
        }
        Ok(())
    }

    /// Clear manual overrides and return the flight to Unstable.
    pub fn recompute(&mut self, callsign: &str) -> Result<(), SequenceError> {
        let index = self.index_in(List::Sequenced, callsign)?;
        let flight = &mut self.flights[index];
        flight.clear_manual_landing_time();
        flight.clear_manual_feeder_fix_estimate();
        flight.clear_runway();
        flight.reset_initial_estimates();
        let estimate = flight.landing_estimate();
        flight.set_landing_time(estimate, false);
        flight.set_state(State::Unstable)?;
        info!(%callsign, "Flight recomputed");
        self.sort();
        Ok(())
    }

    /// Manually set a flight's state. Only Stable and Unstable may be forced.
    pub fn set_flight_state(&mut self, callsign: &str, state: State) -> Result<(), SequenceError> {
        let index = self.index_in(List::Sequenced, callsign)?;
        let flight = &mut self.flights[index];
        if !matches!(state, State::Stable | State::Unstable) {
            return Err(SequenceError::IllegalStateChange {
                callsign: flight.callsign().to_string(),
                state,
            });
        }
        flight.set_state(state)?;
        self.sort();
        Ok(())
    }

    /// Assign a runway manually.
    pub fn change_runway(&mut self, callsign: &str, runway: &str) -> Result<(), SequenceError> {
        let index = self.index_in(List::Sequenced, callsign)?;
        self.ensure_movable(index)?;
        let runway = self.known_runway(runway)?;
        self.flights[index].assign_runway(&runway, true);
        info!(%callsign, %runway, "Runway changed");
        Ok(())
    }

    /// Override the feeder-fix estimate. Unstable flights become Stable.
    pub fn change_feeder_fix_estimate(
        &mut self,
        callsign: &str,
        estimate: DateTime<Utc>,
    ) -> Result<(), SequenceError> {
        let index = self.index_in(List::Sequenced, callsign)?;
        let flight = &mut self.flights[index];
        flight.set_manual_feeder_fix_estimate(estimate);
        if flight.state() == State::Unstable {
            flight.set_state(State::Stable)?;
        }
        debug!(%callsign, %estimate, "Feeder fix estimate changed");
        self.sort();
        Ok(())
    }

    /// Cap a flight's total delay, or clear the cap with `None`.
    pub fn set_maximum_delay(
        &mut self,
        callsign: &str,
        maximum_delay: Option<Duration>,
    ) -> Result<(), SequenceError> {
        self.sequenced_mut(callsign)?.set_maximum_delay(maximum_delay);
        Ok(())
    }

    /// Land the flight at its estimate and delay others around it.
    pub fn set_no_delay(&mut self, callsign: &str, no_delay: bool) -> Result<(), SequenceError> {
        self.sequenced_mut(callsign)?.set_no_delay(no_delay);
        Ok(())
    }

    /// Place the flight first within its stability tier.
    pub fn set_high_priority(&mut self, callsign: &str, high_priority: bool) -> Result<(), SequenceError> {
        self.sequenced_mut(callsign)?.set_high_priority(high_priority);
        Ok(())
    }

    pub fn change_approach_type(
        &mut self,
        callsign: &str,
        approach_type: Option<&str>,
    ) -> Result<(), SequenceError> {
        self.sequenced_mut(callsign)?.set_approach_type(approach_type);
        Ok(())
    }

    /// Update a flight in any list through a closure.
    pub(crate) fn update<F>(&mut self, callsign: &str, f: F) -> Result<(), SequenceError>
    where
        F: FnOnce(&mut Flight),
    {
        let (list, index) = self
            .locate(callsign)
            .ok_or_else(|| SequenceError::FlightNotFound(callsign.to_string()))?;
        f(&mut self.list_mut(list)[index]);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Blockouts and slots
    // ─────────────────────────────────────────────────────────────────────────

    /// Close runways for `[start_time, end_time)`.
    pub fn add_blockout(
        &mut self,
        runways: &[String],
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<(), SequenceError> {
        let runway_identifiers = self.validate_window(runways, start_time, end_time)?;
        info!(runways = ?runway_identifiers, %start_time, %end_time, "Blockout added");
        self.blockouts.push(BlockoutPeriod {
            runway_identifiers,
            start_time,
            end_time,
        });
        Ok(())
    }

    /// Reserve runways for `[start_time, end_time)`. Returns the new slot id.
    pub fn create_slot(
        &mut self,
        runways: &[String],
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<SlotId, SequenceError> {
        let runway_identifiers = self.validate_window(runways, start_time, end_time)?;
        let id = SlotId(self.next_slot_id);
        self.next_slot_id += 1;
        info!(slot = %id, runways = ?runway_identifiers, %start_time, %end_time, "Slot created");
        self.slots.push(Slot {
            id,
            runway_identifiers,
            start_time,
            end_time,
        });
        Ok(id)
    }

    /// Move an existing slot.
    pub fn modify_slot(
        &mut self,
        id: SlotId,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<(), SequenceError> {
        if start_time >= end_time {
            return Err(SequenceError::InvalidWindow {
                start: start_time,
                end: end_time,
            });
        }
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(SequenceError::SlotNotFound(id))?;
        slot.start_time = start_time;
        slot.end_time = end_time;
        info!(slot = %id, %start_time, %end_time, "Slot modified");
        Ok(())
    }

    /// Remove a slot.
    pub fn delete_slot(&mut self, id: SlotId) -> Result<(), SequenceError> {
        let index = self
            .slots
            .iter()
            .position(|s| s.id == id)
            .ok_or(SequenceError::SlotNotFound(id))?;
        self.slots.remove(index);
        info!(slot = %id, "Slot deleted");
        Ok(())
    }

    fn validate_window(
        &self,
        runways: &[String],
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Vec<String>, SequenceError> {
        if start_time >= end_time {
            return Err(SequenceError::InvalidWindow {
                start: start_time,
                end: end_time,
            });
        }
        runways.iter().map(|r| self.known_runway(r)).collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Runway modes
    // ─────────────────────────────────────────────────────────────────────────

    /// Schedule a change of runway mode.
    ///
    /// Landings in the current mode end at `last_landing_time`; the new mode
    /// takes effect from `first_landing_time`. No landings are scheduled in
    /// between. When `first_landing_time` is not in the future the new mode
    /// takes effect immediately.
    pub fn change_runway_mode(
        &mut self,
        mode_identifier: &str,
        last_landing_time: DateTime<Utc>,
        first_landing_time: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), SequenceError> {
        if first_landing_time < last_landing_time {
            return Err(SequenceError::InvalidRunwayModeChange {
                last: last_landing_time,
                first: first_landing_time,
            });
        }
        let mode = self
            .available_modes
            .iter()
            .find(|m| m.identifier.eq_ignore_ascii_case(mode_identifier))
            .cloned()
            .ok_or_else(|| SequenceError::RunwayModeNotFound(mode_identifier.to_string()))?;

        info!(
            airport = %self.airport_identifier,
            current = %self.current_mode.identifier,
            next = %mode.identifier,
            %last_landing_time,
            %first_landing_time,
            "Runway mode change scheduled"
        );
        self.next_mode = Some(mode);
        self.last_landing_time_for_current_mode = Some(last_landing_time);
        self.first_landing_time_for_new_mode = Some(first_landing_time);
        self.try_swap_runway_modes(now);
        Ok(())
    }

    /// Promote the next runway mode once its first landing time is reached.
    ///
    /// Returns true if the mode changed.
    pub fn try_swap_runway_modes(&mut self, now: DateTime<Utc>) -> bool {
        let due = self
            .first_landing_time_for_new_mode
            .is_some_and(|first| now >= first);
        if !due {
            return false;
        }
        let Some(next) = self.next_mode.take() else {
            return false;
        };

        info!(
            airport = %self.airport_identifier,
            previous = %self.current_mode.identifier,
            current = %next.identifier,
            "Runway mode changed"
        );
        self.current_mode = next;
        self.last_landing_time_for_current_mode = None;
        self.first_landing_time_for_new_mode = None;
        true
    }

    /// Change a runway's landing rate in the current mode.
    pub fn set_landing_rate(&mut self, runway: &str, landing_rate: Duration) -> Result<(), SequenceError> {
        if !self.current_mode.set_landing_rate(runway, landing_rate) {
            return Err(SequenceError::UnknownRunway(runway.to_uppercase()));
        }
        info!(%runway, rate_secs = landing_rate.num_seconds(), "Landing rate changed");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cleanup
    // ─────────────────────────────────────────────────────────────────────────

    /// Evict old Landed flights and lost flights. Returns the evicted callsigns.
    ///
    /// Pending and desequenced flights are never evicted here, and flights
    /// that have never reported a position (dummies) are never lost.
    pub fn cleanup(&mut self, policy: &CleanupPolicy, now: DateTime<Utc>) -> Vec<String> {
        let mut landed: Vec<(DateTime<Utc>, String)> = self
            .flights
            .iter()
            .filter(|f| f.state() == State::Landed)
            .map(|f| (f.scheduled_landing_time(), f.callsign().to_string()))
            .collect();
        landed.sort();

        let excess = landed.len().saturating_sub(policy.max_landed_flights);
        let mut evict: Vec<String> = landed
            .iter()
            .enumerate()
            .filter(|(index, (landed_at, _))| {
                *index < excess || now - *landed_at > policy.landed_timeout
            })
            .map(|(_, (_, callsign))| callsign.clone())
            .collect();

        let lost: Vec<String> = self
            .flights
            .iter()
            .filter(|f| f.last_seen().is_some_and(|seen| now - seen > policy.lost_timeout))
            .map(|f| f.callsign().to_string())
            .filter(|callsign| !evict.contains(callsign))
            .collect();
        evict.extend(lost);

        for callsign in &evict {
            if let Some(index) = self.flights.iter().position(|f| f.callsign() == callsign.as_str()) {
                let mut flight = self.flights.remove(index);
                // Sequenced flights are never Removed, so this cannot fail
                let _ = flight.set_state(State::Removed);
                info!(
                    airport = %self.airport_identifier,
                    %callsign,
                    "Flight evicted by cleanup"
                );
            }
        }
        evict
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn ensure_unique(&self, callsign: &str) -> Result<(), SequenceError> {
        if self.contains(callsign) {
            return Err(SequenceError::DuplicateFlight(callsign.to_uppercase()));
        }
        Ok(())
    }

    fn ensure_movable(&self, index: usize) -> Result<(), SequenceError> {
        let flight = &self.flights[index];
        if flight.state().is_fixed() {
            return Err(SequenceError::FlightFrozen(flight.callsign().to_string()));
        }
        Ok(())
    }

    fn known_runway(&self, runway: &str) -> Result<String, SequenceError> {
        self.runway_identifiers
            .iter()
            .find(|r| r.eq_ignore_ascii_case(runway))
            .cloned()
            .ok_or_else(|| SequenceError::UnknownRunway(runway.to_uppercase()))
    }

    fn locate(&self, callsign: &str) -> Option<(List, usize)> {
        [List::Sequenced, List::Pending, List::Desequenced]
            .into_iter()
            .find_map(|list| {
                self.list(list)
                    .iter()
                    .position(|f| f.callsign().eq_ignore_ascii_case(callsign))
                    .map(|index| (list, index))
            })
    }

    /// Index of a flight in `expected`, or the right error if it is elsewhere.
    fn index_in(&self, expected: List, callsign: &str) -> Result<usize, SequenceError> {
        match self.locate(callsign) {
            Some((list, index)) if list == expected => Ok(index),
            Some(_) => Err(SequenceError::UnexpectedList {
                callsign: callsign.to_uppercase(),
                expected: expected.name(),
            }),
            None => Err(SequenceError::FlightNotFound(callsign.to_uppercase())),
        }
    }

    fn sequenced_mut(&mut self, callsign: &str) -> Result<&mut Flight, SequenceError> {
        let index = self.index_in(List::Sequenced, callsign)?;
        Ok(&mut self.flights[index])
    }

    fn list(&self, list: List) -> &Vec<Flight> {
        match list {
            List::Sequenced => &self.flights,
            List::Pending => &self.pending,
            List::Desequenced => &self.desequenced,
        }
    }

    fn list_mut(&mut self, list: List) -> &mut Vec<Flight> {
        match list {
            List::Sequenced => &mut self.flights,
            List::Pending => &mut self.pending,
            List::Desequenced => &mut self.desequenced,
        }
    }
}

fn find_in<'a>(flights: &'a [Flight], callsign: &str) -> Option<&'a Flight> {
    flights.iter().find(|f| f.callsign().eq_ignore_ascii_case(callsign))
}
