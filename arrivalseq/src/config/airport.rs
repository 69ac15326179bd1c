//! Static per-airport configuration: runways, runway modes, assignment rules,
//! and arrival intervals.
//!
//! Loaded from JSON. The configuration is read-only once loaded; the sequence
//! copies the runway mode it needs so controllers can adjust rates at runtime
//! without touching the configuration.
//!
//! # Example
//!
//! ```ignore
//! use arrivalseq::config::AirportConfiguration;
//!
//! let airport = AirportConfiguration::load_from("YSSY.json".as_ref())?;
//! println!("{} runway modes", airport.runway_modes.len());
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::flight::{AircraftCategory, WakeCategory};
use crate::geo::Coordinate;

/// Error loading or validating an airport configuration.
#[derive(Debug, thiserror::Error)]
pub enum AirportConfigError {
    #[error("Airport configuration not found at: {0}")]
    NotFound(PathBuf),
    #[error("Failed to read airport configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse airport configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid airport configuration for {airport}: {reason}")]
    Invalid { airport: String, reason: String },
}

/// Complete configuration for one airport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirportConfiguration {
    /// ICAO code (e.g., "YSSY").
    pub identifier: String,
    /// Nearby aerodromes whose departures enter the pending list.
    #[serde(default)]
    pub departure_airports: Vec<String>,
    pub feeder_fixes: Vec<FeederFixConfiguration>,
    pub runways: Vec<RunwayConfiguration>,
    pub runway_modes: Vec<RunwayModeConfiguration>,
    #[serde(default)]
    pub runway_assignment_rules: Vec<RunwayAssignmentRule>,
    #[serde(default)]
    pub arrivals: Vec<ArrivalConfiguration>,
}

/// A feeder fix and its location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeederFixConfiguration {
    pub identifier: String,
    pub coordinate: Coordinate,
}

/// Hard eligibility filter for a runway.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunwayRequirements {
    /// Feeder fixes allowed to use this runway (empty = any).
    #[serde(default)]
    pub feeder_fixes: Vec<String>,
}

impl RunwayRequirements {
    /// Returns true if a flight via `feeder_fix` may use the runway.
    pub fn allows(&self, feeder_fix: Option<&str>) -> bool {
        if self.feeder_fixes.is_empty() {
            return true;
        }
        feeder_fix.is_some_and(|ff| contains_ignore_case(&self.feeder_fixes, ff))
    }
}

/// Soft preferences used to score eligible runways.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunwayPreferences {
    #[serde(default)]
    pub wake_categories: Vec<WakeCategory>,
    #[serde(default)]
    pub feeder_fixes: Vec<String>,
}

/// One physical runway direction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunwayConfiguration {
    pub identifier: String,
    #[serde(default)]
    pub requirements: RunwayRequirements,
    #[serde(default)]
    pub preferences: RunwayPreferences,
}

/// A runway within a runway mode, with its landing rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunwayRateConfiguration {
    pub identifier: String,
    /// Minimum time between landings on this runway.
    pub landing_rate_seconds: u32,
}

/// Named set of active runways.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunwayModeConfiguration {
    pub identifier: String,
    pub runways: Vec<RunwayRateConfiguration>,
    /// Minimum time between landings on different runways.
    #[serde(default)]
    pub stagger_rate_seconds: u32,
    /// The mode a new sequence starts in.
    #[serde(default)]
    pub default: bool,
}

/// Rule mapping feeder fixes and aircraft categories to runways.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunwayAssignmentRule {
    /// Priority tier; lower is better.
    #[serde(default)]
    pub priority: u8,
    /// Feeder fixes the rule applies to (empty = any).
    #[serde(default)]
    pub feeder_fixes: Vec<String>,
    /// Eligible wake categories (empty = any).
    #[serde(default)]
    pub wake_categories: Vec<WakeCategory>,
    /// Eligible aircraft categories (empty = any).
    #[serde(default)]
    pub aircraft_categories: Vec<AircraftCategory>,
    pub runways: Vec<String>,
}

/// Preset feeder-fix-to-landing interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrivalConfiguration {
    pub feeder_fix: String,
    /// Regular expression matched against the assigned arrival (absent = any).
    #[serde(default)]
    pub arrival_pattern: Option<String>,
    /// Runways this interval applies to (empty = any).
    #[serde(default)]
    pub runways: Vec<String>,
    #[serde(default)]
    pub approach_type: Option<String>,
    /// Exact aircraft types this row applies to.
    #[serde(default)]
    pub aircraft_types: Vec<String>,
    /// Category restriction.
    #[serde(default)]
    pub category: Option<AircraftCategory>,
    /// Non-jet types treated as jets for a jet-restricted row.
    #[serde(default)]
    pub jet_tier_types: Vec<String>,
    pub interval_seconds: u32,
}

impl AirportConfiguration {
    /// Load and validate an airport configuration file.
    pub fn load_from(path: &Path) -> Result<Self, AirportConfigError> {
        if !path.exists() {
            return Err(AirportConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json(&content)?;
        tracing::info!(
            airport = %config.identifier,
            path = %path.display(),
            modes = config.runway_modes.len(),
            "Loaded airport configuration"
        );
        Ok(config)
    }

    /// Parse and validate an airport configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, AirportConfigError> {
        let mut config: Self = serde_json::from_str(json)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Look up a feeder fix.
    pub fn feeder_fix(&self, identifier: &str) -> Option<&FeederFixConfiguration> {
        self.feeder_fixes
            .iter()
            .find(|ff| ff.identifier.eq_ignore_ascii_case(identifier))
    }

    /// Look up a runway.
    pub fn runway(&self, identifier: &str) -> Option<&RunwayConfiguration> {
        self.runways
            .iter()
            .find(|r| r.identifier.eq_ignore_ascii_case(identifier))
    }

    /// Look up a runway mode.
    pub fn runway_mode(&self, identifier: &str) -> Option<&RunwayModeConfiguration> {
        self.runway_modes
            .iter()
            .find(|m| m.identifier.eq_ignore_ascii_case(identifier))
    }

    /// The mode flagged as default, or the first mode.
    pub fn default_runway_mode(&self) -> Option<&RunwayModeConfiguration> {
        self.runway_modes
            .iter()
            .find(|m| m.default)
            .or_else(|| self.runway_modes.first())
    }

    /// Returns true if `origin` is a configured departure airport.
    pub fn is_departure_airport(&self, origin: &str) -> bool {
        contains_ignore_case(&self.departure_airports, origin)
    }

    fn normalize(&mut self) {
        self.identifier = self.identifier.to_uppercase();
        for ff in &mut self.feeder_fixes {
            ff.identifier = ff.identifier.to_uppercase();
        }
        for runway in &mut self.runways {
            runway.identifier = runway.identifier.to_uppercase();
        }
        for mode in &mut self.runway_modes {
            for runway in &mut mode.runways {
                runway.identifier = runway.identifier.to_uppercase();
            }
        }
        for rule in &mut self.runway_assignment_rules {
            rule.runways.iter_mut().for_each(|r| *r = r.to_uppercase());
        }
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), AirportConfigError> {
        let invalid = |reason: String| AirportConfigError::Invalid {
            airport: self.identifier.clone(),
            reason,
        };

        if self.runway_modes.is_empty() {
            return Err(invalid("at least one runway mode is required".to_string()));
        }

        let mut runway_ids = HashSet::new();
        for runway in &self.runways {
            if !runway_ids.insert(runway.identifier.as_str()) {
                return Err(invalid(format!("duplicate runway {}", runway.identifier)));
            }
        }

        let mut feeder_fix_ids = HashSet::new();
        for ff in &self.feeder_fixes {
            if !feeder_fix_ids.insert(ff.identifier.as_str()) {
                return Err(invalid(format!("duplicate feeder fix {}", ff.identifier)));
            }
        }

        let mut mode_ids = HashSet::new();
        for mode in &self.runway_modes {
            if !mode_ids.insert(mode.identifier.as_str()) {
                return Err(invalid(format!("duplicate runway mode {}", mode.identifier)));
            }
            if mode.runways.is_empty() {
                return Err(invalid(format!("runway mode {} has no runways", mode.identifier)));
            }
            for runway in &mode.runways {
                if !runway_ids.contains(runway.identifier.as_str()) {
                    return Err(invalid(format!(
                        "runway mode {} references unknown runway {}",
                        mode.identifier, runway.identifier
                    )));
                }
                if runway.landing_rate_seconds == 0 {
                    return Err(invalid(format!(
                        "runway {} in mode {} has a zero landing rate",
                        runway.identifier, mode.identifier
                    )));
                }
            }
        }

        if self.runway_modes.iter().filter(|m| m.default).count() > 1 {
            return Err(invalid("more than one default runway mode".to_string()));
        }

        for rule in &self.runway_assignment_rules {
            if let Some(unknown) = rule
                .runways
                .iter()
                .find(|r| !runway_ids.contains(r.as_str()))
            {
                return Err(invalid(format!("assignment rule references unknown runway {}", unknown)));
            }
        }

        for arrival in &self.arrivals {
            if self.feeder_fix(&arrival.feeder_fix).is_none() {
                return Err(invalid(format!(
                    "arrival interval references unknown feeder fix {}",
                    arrival.feeder_fix
                )));
            }
            if let Some(pattern) = &arrival.arrival_pattern {
                regex::Regex::new(pattern).map_err(|e| {
                    invalid(format!("invalid arrival pattern '{}': {}", pattern, e))
                })?;
            }
        }

        Ok(())
    }
}

pub(crate) fn contains_ignore_case(haystack: &[String], needle: &str) -> bool {
    haystack.iter().any(|item| item.eq_ignore_ascii_case(needle))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Two-runway test airport with two modes.
    pub const TEST_AIRPORT_JSON: &str = r#"{
        "identifier": "yssy",
        "departure_airports": ["YSCB"],
        "feeder_fixes": [
            { "identifier": "RIVET", "coordinate": { "latitude": -34.0, "longitude": 150.0 } },
            { "identifier": "BOREE", "coordinate": { "latitude": -33.0, "longitude": 150.5 } },
            { "identifier": "MARLN", "coordinate": { "latitude": -33.5, "longitude": 152.0 } }
        ],
        "runways": [
            { "identifier": "34L", "preferences": { "wake_categories": ["Heavy", "SuperHeavy"] } },
            { "identifier": "34R", "preferences": { "feeder_fixes": ["BOREE"] } },
            { "identifier": "16R" },
            { "identifier": "16L", "requirements": { "feeder_fixes": ["MARLN"] } }
        ],
        "runway_modes": [
            {
                "identifier": "34IVA",
                "default": true,
                "stagger_rate_seconds": 60,
                "runways": [
                    { "identifier": "34L", "landing_rate_seconds": 180 },
                    { "identifier": "34R", "landing_rate_seconds": 180 }
                ]
            },
            {
                "identifier": "16SINGLE",
                "runways": [ { "identifier": "16R", "landing_rate_seconds": 120 } ]
            }
        ],
        "runway_assignment_rules": [
            { "priority": 0, "feeder_fixes": ["RIVET"], "runways": ["34L", "16R"] },
            { "priority": 0, "feeder_fixes": ["BOREE", "MARLN"], "runways": ["34R", "16R"] },
            { "priority": 1, "runways": ["34R", "34L", "16R"] }
        ],
        "arrivals": [
            { "feeder_fix": "RIVET", "arrival_pattern": "^RIVET\\d$", "runways": ["34L"], "interval_seconds": 1200 },
            { "feeder_fix": "RIVET", "arrival_pattern": "^RIVET\\d$", "runways": ["34L"], "category": "NonJet", "interval_seconds": 1500 },
            { "feeder_fix": "RIVET", "arrival_pattern": "^RIVET\\d$", "runways": ["34L"], "category": "Jet", "jet_tier_types": ["DH8D"], "interval_seconds": 1140 },
            { "feeder_fix": "RIVET", "arrival_pattern": "^RIVET\\d$", "runways": ["34L"], "aircraft_types": ["A388"], "interval_seconds": 1080 },
            { "feeder_fix": "BOREE", "interval_seconds": 900 }
        ]
    }"#;

    pub fn test_airport() -> AirportConfiguration {
        AirportConfiguration::from_json(TEST_AIRPORT_JSON).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_parse_and_normalize() {
        let airport = test_airport();
        assert_eq!(airport.identifier, "YSSY");
        assert_eq!(airport.runways.len(), 4);
        assert_eq!(airport.default_runway_mode().unwrap().identifier, "34IVA");
        assert!(airport.feeder_fix("rivet").is_some());
        assert!(airport.runway("34l").is_some());
        assert!(airport.is_departure_airport("yscb"));
        assert!(!airport.is_departure_airport("YMML"));
    }

    #[test]
    fn test_runway_requirements() {
        let airport = test_airport();
        let runway = airport.runway("16L").unwrap();
        assert!(runway.requirements.allows(Some("MARLN")));
        assert!(!runway.requirements.allows(Some("RIVET")));
        assert!(!runway.requirements.allows(None));
        assert!(airport.runway("34L").unwrap().requirements.allows(None));
    }

    #[test]
    fn test_mode_with_unknown_runway_is_rejected() {
        let json = TEST_AIRPORT_JSON.replace(r#""identifier": "16R", "landing_rate_seconds""#, r#""identifier": "07", "landing_rate_seconds""#);
        let result = AirportConfiguration::from_json(&json);
        assert!(matches!(result, Err(AirportConfigError::Invalid { ref reason, .. }) if reason.contains("unknown runway 07")));
    }

    #[test]
    fn test_invalid_arrival_pattern_is_rejected() {
        let json = TEST_AIRPORT_JSON.replace(r#""^RIVET\\d$""#, r#""RIVET(""#);
        let result = AirportConfiguration::from_json(&json);
        assert!(matches!(result, Err(AirportConfigError::Invalid { ref reason, .. }) if reason.contains("invalid arrival pattern")));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let result = AirportConfiguration::from_json("{ not json");
        assert!(matches!(result, Err(AirportConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = AirportConfiguration::load_from(Path::new("/nonexistent/YSSY.json"));
        assert!(matches!(result, Err(AirportConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("YSSY.json");
        std::fs::write(&path, TEST_AIRPORT_JSON).unwrap();

        let airport = AirportConfiguration::load_from(&path).unwrap();
        assert_eq!(airport.arrivals.len(), 5);
    }
}
