//! `validate` command: load an airport configuration and summarize it.

use std::path::Path;

use arrivalseq::config::AirportConfiguration;

use crate::error::CliError;

/// Load and validate an airport configuration.
pub fn run(airport_path: &Path) -> Result<(), CliError> {
    let airport = AirportConfiguration::load_from(airport_path)?;

    println!("✓ {} is valid", airport.identifier);
    println!();
    println!("  Feeder fixes:  {}", join(airport.feeder_fixes.iter().map(|ff| &ff.identifier)));
    println!("  Runways:       {}", join(airport.runways.iter().map(|r| &r.identifier)));
    println!("  Runway modes:");
    for mode in &airport.runway_modes {
        let rates = mode
            .runways
            .iter()
            .map(|r| format!("{} every {}s", r.identifier, r.landing_rate_seconds))
            .collect::<Vec<_>>()
            .join(", ");
        let marker = if mode.default { " (default)" } else { "" };
        println!(
            "    {}{}: {}; stagger {}s",
            mode.identifier, marker, rates, mode.stagger_rate_seconds
        );
    }
    println!("  Assignment rules: {}", airport.runway_assignment_rules.len());
    println!("  Arrival intervals: {}", airport.arrivals.len());
    if !airport.departure_airports.is_empty() {
        println!("  Departure airports: {}", airport.departure_airports.join(", "));
    }

    Ok(())
}

fn join<'a>(items: impl Iterator<Item = &'a String>) -> String {
    items.map(String::as_str).collect::<Vec<_>>().join(", ")
}
