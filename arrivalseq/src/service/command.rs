//! Manual commands issued by controllers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::flight::{AircraftType, State};
use crate::sequence::{InsertionOptions, SlotId};

/// A manual change to one airport's sequence.
///
/// Serialized with a `command` tag, e.g.
/// `{"command": "swap_flights", "first": "QFA1", "second": "VOZ2"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum SequenceCommand {
    InsertPending {
        callsign: String,
        options: InsertionOptions,
    },
    InsertDummy {
        #[serde(default)]
        callsign: Option<String>,
        aircraft: AircraftType,
        options: InsertionOptions,
    },
    InsertOvershoot {
        callsign: String,
        options: InsertionOptions,
    },
    Reposition {
        callsign: String,
        options: InsertionOptions,
    },
    MoveFlight {
        callsign: String,
        time: DateTime<Utc>,
        #[serde(default)]
        runway: Option<String>,
    },
    SwapFlights {
        first: String,
        second: String,
    },
    Remove {
        callsign: String,
    },
    Desequence {
        callsign: String,
    },
    Resume {
        callsign: String,
    },
    MakePending {
        callsign: String,
    },
    Recompute {
        callsign: String,
    },
    ChangeState {
        callsign: String,
        state: State,
    },
    ChangeRunway {
        callsign: String,
        runway: String,
    },
    ChangeFeederFixEstimate {
        callsign: String,
        estimate: DateTime<Utc>,
    },
    SetMaximumDelay {
        callsign: String,
        /// `None` clears the limit.
        #[serde(default)]
        maximum_delay_secs: Option<u32>,
    },
    SetNoDelay {
        callsign: String,
        value: bool,
    },
    SetHighPriority {
        callsign: String,
        value: bool,
    },
    ChangeApproachType {
        callsign: String,
        #[serde(default)]
        approach_type: Option<String>,
    },
    AddBlockout {
        runways: Vec<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    },
    CreateSlot {
        runways: Vec<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    },
    ModifySlot {
        id: SlotId,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    },
    DeleteSlot {
        id: SlotId,
    },
    ChangeRunwayMode {
        mode: String,
        last_landing_time: DateTime<Utc>,
        first_landing_time: DateTime<Utc>,
    },
    SetLandingRate {
        runway: String,
        landing_rate_secs: u32,
    },
}

impl SequenceCommand {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::InsertPending { .. } => "insert_pending",
            Self::InsertDummy { .. } => "insert_dummy",
            Self::InsertOvershoot { .. } => "insert_overshoot",
            Self::Reposition { .. } => "reposition",
            Self::MoveFlight { .. } => "move_flight",
            Self::SwapFlights { .. } => "swap_flights",
            Self::Remove { .. } => "remove",
            Self::Desequence { .. } => "desequence",
            Self::Resume { .. } => "resume",
            Self::MakePending { .. } => "make_pending",
            Self::Recompute { .. } => "recompute",
            Self::ChangeState { .. } => "change_state",
            Self::ChangeRunway { .. } => "change_runway",
            Self::ChangeFeederFixEstimate { .. } => "change_feeder_fix_estimate",
            Self::SetMaximumDelay { .. } => "set_maximum_delay",
            Self::SetNoDelay { .. } => "set_no_delay",
            Self::SetHighPriority { .. } => "set_high_priority",
            Self::ChangeApproachType { .. } => "change_approach_type",
            Self::AddBlockout { .. } => "add_blockout",
            Self::CreateSlot { .. } => "create_slot",
            Self::ModifySlot { .. } => "modify_slot",
            Self::DeleteSlot { .. } => "delete_slot",
            Self::ChangeRunwayMode { .. } => "change_runway_mode",
            Self::SetLandingRate { .. } => "set_landing_rate",
        }
    }
}

/// Result of a successfully dispatched command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command changed the sequence.
    Applied,
    /// A dummy flight was inserted with this callsign.
    DummyInserted(String),
    /// A slot was created with this id.
    SlotCreated(SlotId),
    /// The command referred to something that no longer exists.
    Ignored,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::RelativePosition;

    #[test]
    fn test_deserialize_tagged_command() {
        let json = r#"{"command": "swap_flights", "first": "QFA1", "second": "VOZ2"}"#;
        let command: SequenceCommand = serde_json::from_str(json).unwrap();
        assert_eq!(
            command,
            SequenceCommand::SwapFlights {
                first: "QFA1".to_string(),
                second: "VOZ2".to_string()
            }
        );
        assert_eq!(command.name(), "swap_flights");
    }

    #[test]
    fn test_deserialize_nested_insertion_options() {
        let json = r#"{
            "command": "insert_pending",
            "callsign": "JST501",
            "options": { "kind": "Relative", "position": "After", "reference": "QFA1" }
        }"#;
        let command: SequenceCommand = serde_json::from_str(json).unwrap();
        match command {
            SequenceCommand::InsertPending { callsign, options } => {
                assert_eq!(callsign, "JST501");
                assert_eq!(
                    options,
                    InsertionOptions::Relative {
                        position: RelativePosition::After,
                        reference: "QFA1".to_string()
                    }
                );
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"{"command": "set_maximum_delay", "callsign": "QFA1"}"#;
        let command: SequenceCommand = serde_json::from_str(json).unwrap();
        assert_eq!(
            command,
            SequenceCommand::SetMaximumDelay {
                callsign: "QFA1".to_string(),
                maximum_delay_secs: None
            }
        );
    }
}
