//! Read-only views of a sequence for publishing.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::aggregate::Sequence;
use super::window::{BlockoutPeriod, Slot};
use crate::flight::{Flight, State, WakeCategory};

/// One sequenced flight as published to consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlightView {
    pub sequence_number: usize,
    pub callsign: String,
    pub aircraft_type: String,
    pub wake_category: WakeCategory,
    pub feeder_fix: Option<String>,
    pub runway: Option<String>,
    pub state: State,
    pub feeder_fix_estimate: Option<DateTime<Utc>>,
    pub scheduled_feeder_fix_time: Option<DateTime<Utc>>,
    pub landing_estimate: DateTime<Utc>,
    pub scheduled_landing_time: DateTime<Utc>,
    pub total_delay_secs: i64,
    pub remaining_delay_secs: i64,
    pub manual_landing_time: bool,
    pub high_priority: bool,
    pub no_delay: bool,
}

impl FlightView {
    fn from_flight(sequence_number: usize, flight: &Flight) -> Self {
        Self {
            sequence_number,
            callsign: flight.callsign().to_string(),
            aircraft_type: flight.aircraft().type_code.clone(),
            wake_category: flight.aircraft().wake_category,
            feeder_fix: flight.feeder_fix_identifier().map(str::to_string),
            runway: flight.assigned_runway_identifier().map(str::to_string),
            state: flight.state(),
            feeder_fix_estimate: flight.feeder_fix_estimate(),
            scheduled_feeder_fix_time: flight.scheduled_feeder_fix_time(),
            landing_estimate: flight.landing_estimate(),
            scheduled_landing_time: flight.scheduled_landing_time(),
            total_delay_secs: flight.total_delay().num_seconds(),
            remaining_delay_secs: flight.remaining_delay().num_seconds(),
            manual_landing_time: flight.manual_landing_time(),
            high_priority: flight.high_priority(),
            no_delay: flight.no_delay(),
        }
    }
}

/// Complete state of one airport's sequence at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceSnapshot {
    pub airport: String,
    pub generated_at: DateTime<Utc>,
    pub runway_mode: String,
    pub next_runway_mode: Option<String>,
    pub last_landing_time_for_current_mode: Option<DateTime<Utc>>,
    pub first_landing_time_for_new_mode: Option<DateTime<Utc>>,
    pub flights: Vec<FlightView>,
    pub pending: Vec<String>,
    pub desequenced: Vec<String>,
    pub blockouts: Vec<BlockoutPeriod>,
    pub slots: Vec<Slot>,
}

impl SequenceSnapshot {
    /// Capture the sequence. Flights are listed in sequence order.
    pub fn capture(sequence: &Sequence, generated_at: DateTime<Utc>) -> Self {
        Self {
            airport: sequence.airport_identifier().to_string(),
            generated_at,
            runway_mode: sequence.current_runway_mode().identifier.clone(),
            next_runway_mode: sequence.next_runway_mode().map(|m| m.identifier.clone()),
            last_landing_time_for_current_mode: sequence.last_landing_time_for_current_mode(),
            first_landing_time_for_new_mode: sequence.first_landing_time_for_new_mode(),
            flights: sequence
                .flights()
                .iter()
                .enumerate()
                .map(|(index, flight)| FlightView::from_flight(index + 1, flight))
                .collect(),
            pending: sequence.pending().iter().map(|f| f.callsign().to_string()).collect(),
            desequenced: sequence
                .desequenced()
                .iter()
                .map(|f| f.callsign().to_string())
                .collect(),
            blockouts: sequence.blockouts().to_vec(),
            slots: sequence.slots().to_vec(),
        }
    }

    /// Find a flight by callsign.
    pub fn flight(&self, callsign: &str) -> Option<&FlightView> {
        self.flights
            .iter()
            .find(|f| f.callsign.eq_ignore_ascii_case(callsign))
    }
}
