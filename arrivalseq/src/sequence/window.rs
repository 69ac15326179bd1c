//! Runway closure windows: operator blockouts and user slots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a slot within one sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId(pub u64);

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Operator-defined runway closure. No landings in `[start_time, end_time)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockoutPeriod {
    pub runway_identifiers: Vec<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// User-managed reservation. No landings in `[start_time, end_time)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub id: SlotId,
    pub runway_identifiers: Vec<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// A closed interval on a set of runways.
pub(crate) trait ClosureWindow {
    fn runway_identifiers(&self) -> &[String];
    fn start_time(&self) -> DateTime<Utc>;
    fn end_time(&self) -> DateTime<Utc>;

    /// Returns true if a landing on `runway` at `time` falls inside the window.
    fn excludes(&self, runway: &str, time: DateTime<Utc>) -> bool {
        self.runway_identifiers()
            .iter()
            .any(|r| r.eq_ignore_ascii_case(runway))
            && self.start_time() <= time
            && time < self.end_time()
    }
}

impl ClosureWindow for BlockoutPeriod {
    fn runway_identifiers(&self) -> &[String] {
        &self.runway_identifiers
    }
    fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }
    fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }
}

impl ClosureWindow for Slot {
    fn runway_identifiers(&self) -> &[String] {
        &self.runway_identifiers
    }
    fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }
    fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }
}
