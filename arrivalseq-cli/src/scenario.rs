//! Scenario files for offline replay.
//!
//! A scenario is a JSON document with a start time and a list of steps. Each
//! step moves the clock to `start + at_secs`, feeds its flight updates,
//! issues its commands and then ticks the sequence.
//!
//! ```json
//! {
//!   "start": "2024-05-01T10:00:00Z",
//!   "steps": [
//!     { "at_secs": 0, "label": "first arrivals", "updates": [ ... ] },
//!     { "at_secs": 300, "commands": [ { "command": "set_high_priority", "callsign": "QFA1", "value": true } ] }
//!   ]
//! }
//! ```

use std::path::Path;

use arrivalseq::flight::FlightUpdate;
use arrivalseq::service::SequenceCommand;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::error::CliError;

/// A timed series of feed updates and commands.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub start: DateTime<Utc>,
    pub steps: Vec<ScenarioStep>,
}

/// One point in the scenario timeline.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioStep {
    /// Seconds after the scenario start.
    #[serde(default)]
    pub at_secs: i64,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub updates: Vec<FlightUpdate>,
    #[serde(default)]
    pub commands: Vec<SequenceCommand>,
}

impl Scenario {
    /// Load and check a scenario file.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let invalid = |reason: String| CliError::Scenario {
            path: path.to_path_buf(),
            reason,
        };

        let content = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        let scenario = Self::from_json(&content).map_err(invalid)?;
        Ok(scenario)
    }

    /// Parse a scenario and check its timeline.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let scenario: Self = serde_json::from_str(json).map_err(|e| e.to_string())?;

        if scenario.steps.is_empty() {
            return Err("scenario has no steps".to_string());
        }
        if let Some(index) = scenario
            .steps
            .windows(2)
            .position(|pair| pair[1].at_secs < pair[0].at_secs)
        {
            return Err(format!("step {} goes back in time", index + 2));
        }
        Ok(scenario)
    }

    /// Clock time of a step.
    pub fn time_of(&self, step: &ScenarioStep) -> DateTime<Utc> {
        self.start + Duration::seconds(step.at_secs)
    }
}
