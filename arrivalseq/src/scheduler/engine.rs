//! The scheduling pass.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::debug;

use super::placement::{earliest_time, Placement};
use crate::config::{AirportConfiguration, RunwayAssignmentRule, RunwayConfiguration};
use crate::error::SequenceError;
use crate::flight::{Flight, SequenceKey, State};
use crate::runway::{RunwayAssigner, RunwayScoreCalculator};
use crate::sequence::Sequence;

/// Placement group of a movable flight. Groups are placed in ascending order.
fn group(flight: &Flight) -> u8 {
    if flight.no_delay() {
        return 0;
    }
    match flight.state() {
        State::SuperStable => 1,
        State::Stable => 2,
        _ => 3,
    }
}

/// Stable and SuperStable flights may not overtake each other.
fn keeps_order(flight: &Flight) -> bool {
    !flight.no_delay() && matches!(flight.state(), State::Stable | State::SuperStable)
}

/// Assigns landing times and runways to every sequenced flight.
///
/// A pass leaves pinned flights (Landed, Frozen, manual landing time) where
/// they are and places everything else in priority order, each flight at the
/// earliest time clear of all flights placed before it. Delay therefore
/// cascades down the sequence.
///
/// Scheduling never changes flight states and only reads estimates, flags,
/// states and pinned times, so scheduling twice without an intervening
/// change produces the same result.
pub struct Scheduler {
    assigner: RunwayAssigner,
    scorer: RunwayScoreCalculator,
    runways: Vec<RunwayConfiguration>,
    rules: Vec<RunwayAssignmentRule>,
}

impl Scheduler {
    /// Create a scheduler for an airport.
    pub fn new(airport: &AirportConfiguration) -> Self {
        Self {
            assigner: RunwayAssigner::new(),
            scorer: RunwayScoreCalculator::new(),
            runways: airport.runways.clone(),
            rules: airport.runway_assignment_rules.clone(),
        }
    }

    /// Reschedule the whole sequence.
    pub fn schedule(&self, sequence: &mut Sequence) {
        let mut promoted: HashSet<String> = HashSet::new();

        let placements = loop {
            let placements = self.plan(sequence, &promoted);

            let newly_promoted: Vec<String> = sequence
                .flights()
                .iter()
                .filter(|f| !f.is_pinned() && !promoted.contains(f.callsign()))
                .filter(|f| {
                    let Some(maximum) = f.maximum_delay() else {
                        return false;
                    };
                    placements
                        .get(f.callsign())
                        .is_some_and(|p| p.time - f.initial_landing_estimate() > maximum)
                })
                .map(|f| f.callsign().to_string())
                .collect();

            if newly_promoted.is_empty() {
                break placements;
            }
            for callsign in newly_promoted {
                debug!(%callsign, "Maximum delay exceeded, promoting to front of tier");
                promoted.insert(callsign);
            }
        };

        Self::apply(sequence, &placements);
        sequence.sort();

        debug!(
            airport = %sequence.airport_identifier(),
            flights = sequence.flights().len(),
            promoted = promoted.len(),
            "Sequence scheduled"
        );
    }

    /// Reschedule after a change to one flight.
    ///
    /// A single flight's move can ripple through everything behind it, so
    /// this runs a full pass once the flight is confirmed to be sequenced.
    pub fn schedule_flight(&self, sequence: &mut Sequence, callsign: &str) -> Result<(), SequenceError> {
        if sequence.flight(callsign).is_none() {
            return Err(match sequence.find(callsign) {
                Some(_) => SequenceError::UnexpectedList {
                    callsign: callsign.to_uppercase(),
                    expected: "sequenced",
                },
                None => SequenceError::FlightNotFound(callsign.to_uppercase()),
            });
        }
        self.schedule(sequence);
        Ok(())
    }

    /// Compute a placement for every sequenced flight without mutating anything.
    fn plan(&self, sequence: &Sequence, promoted: &HashSet<String>) -> HashMap<String, Placement> {
        let flights = sequence.flights();

        let mut placed: Vec<Placement> = flights
            .iter()
            .filter(|f| f.is_pinned())
            .map(|f| Placement {
                callsign: f.callsign().to_string(),
                runway: sequence.effective_runway(f),
                time: f.scheduled_landing_time(),
            })
            .collect();

        let mut movable: Vec<&Flight> = flights.iter().filter(|f| !f.is_pinned()).collect();
        movable.sort_by_cached_key(|f| {
            (
                group(f),
                Reverse(f.high_priority()),
                Reverse(promoted.contains(f.callsign())),
                SequenceKey::of(f),
            )
        });

        let mut floor: Option<(u8, DateTime<Utc>)> = None;
        for flight in movable {
            let mut seed = flight.landing_estimate();
            if keeps_order(flight) {
                if let Some((floor_group, floor_time)) = floor {
                    if floor_group == group(flight) {
                        seed = seed.max(floor_time);
                    }
                }
            }

            let (runway, time) = self.place(sequence, flight, seed, &placed);
            if keeps_order(flight) {
                floor = Some((group(flight), time));
            }

            debug!(
                callsign = %flight.callsign(),
                state = %flight.state(),
                %runway,
                %time,
                delay_secs = (time - flight.landing_estimate()).num_seconds(),
                "Flight placed"
            );
            placed.push(Placement {
                callsign: flight.callsign().to_string(),
                runway,
                time,
            });
        }

        placed
            .into_iter()
            .map(|p| (p.callsign.clone(), p))
            .collect()
    }

    /// Choose a runway and the earliest clear time on it.
    fn place(
        &self,
        sequence: &Sequence,
        flight: &Flight,
        seed: DateTime<Utc>,
        obstacles: &[Placement],
    ) -> (String, DateTime<Utc>) {
        let (runway, time) = self.best_candidate(sequence, flight, seed, obstacles);

        // Pushed across a mode change onto a runway the new mode doesn't use
        if !flight.runway_manually_assigned() && !sequence.runway_mode_at(time).contains(&runway) {
            return self.best_candidate(sequence, flight, time, obstacles);
        }
        (runway, time)
    }

    fn best_candidate(
        &self,
        sequence: &Sequence,
        flight: &Flight,
        seed: DateTime<Utc>,
        obstacles: &[Placement],
    ) -> (String, DateTime<Utc>) {
        let mut best: Option<(DateTime<Utc>, Reverse<i32>, usize, String)> = None;

        for (order, (runway, score)) in self.runway_candidates(sequence, flight, seed).into_iter().enumerate() {
            let time = earliest_time(sequence, &runway, seed, obstacles);
            let candidate = (time, Reverse(score), order, runway);
            if best.as_ref().map_or(true, |current| candidate < *current) {
                best = Some(candidate);
            }
        }

        match best {
            Some((time, _, _, runway)) => (runway, time),
            None => {
                let runway = sequence.effective_runway(flight);
                let time = earliest_time(sequence, &runway, seed, obstacles);
                (runway, time)
            }
        }
    }

    /// Candidate runways with their preference scores, in rule order.
    fn runway_candidates(
        &self,
        sequence: &Sequence,
        flight: &Flight,
        seed: DateTime<Utc>,
    ) -> Vec<(String, i32)> {
        let mode = sequence.runway_mode_at(seed);

        if let Some(assigned) = flight.assigned_runway_identifier() {
            let committed = flight.state().outranks_or_equals(State::Stable) && mode.contains(assigned);
            if flight.runway_manually_assigned() || committed {
                return vec![(assigned.to_string(), 0)];
            }
        }

        let feeder_fix = flight.feeder_fix_identifier();
        let tiers = self
            .assigner
            .runway_tiers(flight.aircraft(), feeder_fix, &self.rules);

        for tier in tiers {
            let eligible: Vec<&RunwayConfiguration> = tier
                .iter()
                .filter(|id| mode.contains(id))
                .filter_map(|id| self.runway(id))
                .filter(|runway| runway.requirements.allows(feeder_fix))
                .collect();

            if !eligible.is_empty() {
                return self
                    .scorer
                    .calculate_scores(&eligible, flight.aircraft(), feeder_fix)
                    .into_iter()
                    .map(|s| (s.runway, s.score))
                    .collect();
            }
        }

        mode.default_runway()
            .map(|r| vec![(r.identifier.clone(), 0)])
            .unwrap_or_default()
    }

    fn runway(&self, identifier: &str) -> Option<&RunwayConfiguration> {
        self.runways
            .iter()
            .find(|r| r.identifier.eq_ignore_ascii_case(identifier))
    }

    /// Write placements back to the flights.
    fn apply(sequence: &mut Sequence, placements: &HashMap<String, Placement>) {
        for flight in sequence.flights_mut() {
            let Some(placement) = placements.get(flight.callsign()) else {
                continue;
            };

            if flight.is_pinned() {
                if flight.assigned_runway_identifier().is_none() {
                    flight.assign_runway(&placement.runway, false);
                }
            } else {
                let manual = flight.runway_manually_assigned();
                flight.set_landing_time(placement.time, false);
                flight.assign_runway(&placement.runway, manual);
            }

            if let Some(interval) = flight.feeder_fix_to_landing_interval() {
                let feeder_fix_time = flight.scheduled_landing_time() - interval;
                flight.set_feeder_fix_time(feeder_fix_time);
            }
        }
    }
}
