//! Registry of airport sequencers.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use super::command::{CommandOutcome, SequenceCommand};
use super::error::ServiceError;
use super::sequencer::{AirportSequencer, SequencerOptions};
use crate::config::AirportConfiguration;
use crate::error::SequenceError;
use crate::flight::FlightUpdate;
use crate::sequence::SequenceSnapshot;
use crate::time::Clock;

/// Shared handle to one airport's sequencer.
pub type SequencerHandle = Arc<Mutex<AirportSequencer>>;

/// Every airport this instance sequences, keyed by ICAO identifier.
///
/// Airports are registered up front; afterwards the service is shared
/// (typically in an `Arc`) and each airport is locked independently.
pub struct SequencerService {
    airports: HashMap<String, SequencerHandle>,
    options: SequencerOptions,
    clock: Arc<dyn Clock>,
}

impl SequencerService {
    /// Create a service with no airports.
    pub fn new(options: SequencerOptions, clock: Arc<dyn Clock>) -> Self {
        Self {
            airports: HashMap::new(),
            options,
            clock,
        }
    }

    /// Register an airport and return its sequencer.
    pub fn add_airport(&mut self, airport: AirportConfiguration) -> Result<SequencerHandle, ServiceError> {
        let identifier = airport.identifier.to_uppercase();
        if self.airports.contains_key(&identifier) {
            return Err(ServiceError::DuplicateAirport(identifier));
        }

        let sequencer = AirportSequencer::new(airport, self.options.clone(), Arc::clone(&self.clock))?;
        let handle = Arc::new(Mutex::new(sequencer));
        self.airports.insert(identifier, Arc::clone(&handle));
        Ok(handle)
    }

    /// Look up an airport's sequencer.
    pub fn airport(&self, identifier: &str) -> Result<SequencerHandle, SequenceError> {
        self.airports
            .get(&identifier.to_uppercase())
            .cloned()
            .ok_or_else(|| SequenceError::AirportNotFound(identifier.to_uppercase()))
    }

    /// Identifiers of all registered airports, sorted.
    pub fn airports(&self) -> Vec<String> {
        let mut identifiers: Vec<String> = self.airports.keys().cloned().collect();
        identifiers.sort();
        identifiers
    }

    /// Route a feed update to its destination airport.
    ///
    /// Updates for airports this instance does not sequence are dropped.
    pub fn apply_update(&self, update: FlightUpdate) -> Result<(), SequenceError> {
        match self.airport(&update.destination) {
            Ok(sequencer) => sequencer.lock().apply_update(update),
            Err(_) => {
                debug!(
                    callsign = %update.callsign,
                    destination = %update.destination,
                    "No sequence for destination"
                );
                Ok(())
            }
        }
    }

    /// Run a command against an airport's sequence.
    pub fn execute(&self, airport: &str, command: SequenceCommand) -> Result<CommandOutcome, SequenceError> {
        match self.airport(airport) {
            Ok(sequencer) => sequencer.lock().execute(command),
            Err(error) => {
                warn!(%error, command = command.name(), "Ignoring command");
                Ok(CommandOutcome::Ignored)
            }
        }
    }

    /// Tick every airport, in identifier order.
    pub fn tick_all(&self) -> Vec<SequenceSnapshot> {
        self.airports()
            .iter()
            .filter_map(|identifier| self.airports.get(identifier))
            .map(|sequencer| sequencer.lock().tick())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::fixtures::test_airport;
    use crate::time::ManualClock;
    use chrono::{TimeZone, Utc};

    fn service() -> SequencerService {
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()));
        let mut service = SequencerService::new(SequencerOptions::default(), clock);
        service.add_airport(test_airport()).unwrap();
        service
    }

    #[test]
    fn test_airport_lookup_is_case_insensitive() {
        let service = service();
        assert!(service.airport("yssy").is_ok());
        assert_eq!(service.airports(), vec!["YSSY".to_string()]);
        assert_eq!(
            service.airport("YMML").err(),
            Some(SequenceError::AirportNotFound("YMML".to_string()))
        );
    }

    #[test]
    fn test_duplicate_airport_rejected() {
        let mut service = service();
        let result = service.add_airport(test_airport());
        assert!(matches!(result, Err(ServiceError::DuplicateAirport(ref id)) if id == "YSSY"));
    }

    #[test]
    fn test_command_for_unknown_airport_is_ignored() {
        let service = service();
        let outcome = service
            .execute(
                "YMML",
                SequenceCommand::Remove {
                    callsign: "QFA1".to_string(),
                },
            )
            .unwrap();
        assert_eq!(outcome, CommandOutcome::Ignored);
    }

    #[test]
    fn test_tick_all_returns_snapshot_per_airport() {
        let service = service();
        let snapshots = service.tick_all();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].airport, "YSSY");
        assert_eq!(snapshots[0].runway_mode, "34IVA");
    }
}
