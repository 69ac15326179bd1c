//! Rule-based runway preference.

use crate::config::{contains_ignore_case, RunwayAssignmentRule};
use crate::flight::AircraftType;

/// Applies runway assignment rules to a flight.
///
/// Rules are matched on feeder fix, wake category and aircraft category. An
/// empty criterion matches anything. Matching rules are grouped by priority
/// (lower is better) and each group's runways are merged in rule order.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunwayAssigner;

impl RunwayAssigner {
    pub fn new() -> Self {
        Self
    }

    /// Preferred runways grouped by priority tier, best tier first.
    ///
    /// Runways appear once per tier, in the order the rules list them.
    pub fn runway_tiers(
        &self,
        aircraft: &AircraftType,
        feeder_fix: Option<&str>,
        rules: &[RunwayAssignmentRule],
    ) -> Vec<Vec<String>> {
        let mut matching: Vec<&RunwayAssignmentRule> = rules
            .iter()
            .filter(|rule| Self::matches(rule, aircraft, feeder_fix))
            .collect();
        // Stable sort keeps rule order within a priority
        matching.sort_by_key(|rule| rule.priority);

        let mut tiers: Vec<(u8, Vec<String>)> = Vec::new();
        for rule in matching {
            if tiers.last().map(|(priority, _)| *priority) != Some(rule.priority) {
                tiers.push((rule.priority, Vec::new()));
            }
            if let Some((_, runways)) = tiers.last_mut() {
                for runway in &rule.runways {
                    if !contains_ignore_case(runways, runway) {
                        runways.push(runway.clone());
                    }
                }
            }
        }

        tiers.into_iter().map(|(_, runways)| runways).collect()
    }

    /// All preferred runways, best tier first.
    ///
    /// An empty result means no rule applies; callers fall back to the
    /// runway mode's default runway.
    pub fn find_best_runways(
        &self,
        aircraft: &AircraftType,
        feeder_fix: Option<&str>,
        rules: &[RunwayAssignmentRule],
    ) -> Vec<String> {
        let mut result: Vec<String> = Vec::new();
        for runway in self.runway_tiers(aircraft, feeder_fix, rules).into_iter().flatten() {
            if !contains_ignore_case(&result, &runway) {
                result.push(runway);
            }
        }
        result
    }

    fn matches(rule: &RunwayAssignmentRule, aircraft: &AircraftType, feeder_fix: Option<&str>) -> bool {
        let feeder_fix_matches = rule.feeder_fixes.is_empty()
            || feeder_fix.is_some_and(|ff| contains_ignore_case(&rule.feeder_fixes, ff));
        let wake_matches =
            rule.wake_categories.is_empty() || rule.wake_categories.contains(&aircraft.wake_category);
        let category_matches = rule.aircraft_categories.is_empty()
            || rule.aircraft_categories.contains(&aircraft.category);

        feeder_fix_matches && wake_matches && category_matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::fixtures::test_airport;
    use crate::flight::{AircraftCategory, WakeCategory};

    fn b738() -> AircraftType {
        AircraftType::new("B738", WakeCategory::Medium, AircraftCategory::Jet)
    }

    fn rule(priority: u8, feeder_fixes: &[&str], runways: &[&str]) -> RunwayAssignmentRule {
        RunwayAssignmentRule {
            priority,
            feeder_fixes: feeder_fixes.iter().map(|s| s.to_string()).collect(),
            wake_categories: vec![],
            aircraft_categories: vec![],
            runways: runways.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_tiers_from_airport_rules() {
        let airport = test_airport();
        let tiers = RunwayAssigner::new().runway_tiers(
            &b738(),
            Some("RIVET"),
            &airport.runway_assignment_rules,
        );
        assert_eq!(tiers, vec![vec!["34L", "16R"], vec!["34R", "34L", "16R"]]);
    }

    #[test]
    fn test_find_best_runways_flattens_without_duplicates() {
        let airport = test_airport();
        let runways = RunwayAssigner::new().find_best_runways(
            &b738(),
            Some("BOREE"),
            &airport.runway_assignment_rules,
        );
        assert_eq!(runways, vec!["34R", "16R", "34L"]);
    }

    #[test]
    fn test_empty_feeder_fix_set_matches_any() {
        let rules = vec![rule(0, &["RIVET"], &["34L"]), rule(2, &[], &["16R"])];
        let runways = RunwayAssigner::new().find_best_runways(&b738(), None, &rules);
        assert_eq!(runways, vec!["16R"]);
    }

    #[test]
    fn test_same_priority_rules_merge_in_rule_order() {
        let rules = vec![rule(1, &[], &["34R"]), rule(1, &[], &["34L", "34R"])];
        let tiers = RunwayAssigner::new().runway_tiers(&b738(), Some("RIVET"), &rules);
        assert_eq!(tiers, vec![vec!["34R", "34L"]]);
    }

    #[test]
    fn test_wake_and_category_eligibility() {
        let mut heavy_only = rule(0, &[], &["34L"]);
        heavy_only.wake_categories = vec![WakeCategory::Heavy, WakeCategory::SuperHeavy];
        let mut props = rule(0, &[], &["34R"]);
        props.aircraft_categories = vec![AircraftCategory::NonJet];
        let rules = vec![heavy_only, props];

        let assigner = RunwayAssigner::new();
        assert!(assigner.find_best_runways(&b738(), None, &rules).is_empty());

        let a388 = AircraftType::new("A388", WakeCategory::SuperHeavy, AircraftCategory::Jet);
        assert_eq!(assigner.find_best_runways(&a388, None, &rules), vec!["34L"]);

        let dh8d = AircraftType::new("DH8D", WakeCategory::Medium, AircraftCategory::NonJet);
        assert_eq!(assigner.find_best_runways(&dh8d, None, &rules), vec!["34R"]);
    }

    #[test]
    fn test_no_rules_gives_empty() {
        assert!(RunwayAssigner::new()
            .find_best_runways(&b738(), Some("RIVET"), &[])
            .is_empty());
    }
}
