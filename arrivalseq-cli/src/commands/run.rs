//! `run` command: replay a scenario against a manual clock.

use std::path::PathBuf;
use std::sync::Arc;

use arrivalseq::config::AirportConfiguration;
use arrivalseq::service::{CommandOutcome, SequencerOptions, SequencerService};
use arrivalseq::time::ManualClock;
use tracing::{debug, info};

use crate::error::CliError;
use crate::output::render_snapshot;
use crate::runner::CliRunner;
use crate::scenario::Scenario;

/// Arguments for the run command.
#[derive(Debug)]
pub struct RunArgs {
    pub airport: PathBuf,
    pub scenario: PathBuf,
    pub settings: Option<PathBuf>,
    pub debug: bool,
    pub json: bool,
}

/// Replay the scenario and print the sequence after every step.
pub fn run(args: RunArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.settings.as_deref(), args.debug)?;
    runner.log_startup("run");

    let airport = AirportConfiguration::load_from(&args.airport)?;
    let scenario = Scenario::load(&args.scenario)?;

    let clock = Arc::new(ManualClock::new(scenario.start));
    let mut service = SequencerService::new(SequencerOptions::from(runner.settings()), clock.clone());
    let handle = service.add_airport(airport)?;
    let airport_id = handle.lock().identifier().to_string();

    info!(
        airport = %airport_id,
        steps = scenario.steps.len(),
        start = %scenario.start,
        "Replaying scenario"
    );

    for (index, step) in scenario.steps.iter().enumerate() {
        let number = index + 1;
        let now = scenario.time_of(step);
        clock.set(now);
        debug!(step = number, time = %now, "Scenario step");

        for update in &step.updates {
            service
                .apply_update(update.clone())
                .map_err(|error| CliError::Step { step: number, error })?;
        }

        let mut notes = Vec::new();
        for command in &step.commands {
            let outcome = service
                .execute(&airport_id, command.clone())
                .map_err(|error| CliError::Step { step: number, error })?;
            match outcome {
                CommandOutcome::Applied => {}
                CommandOutcome::DummyInserted(callsign) => {
                    notes.push(format!("inserted dummy {}", callsign))
                }
                CommandOutcome::SlotCreated(id) => notes.push(format!("created slot {}", id)),
                CommandOutcome::Ignored => notes.push(format!("{} ignored", command.name())),
            }
        }

        let snapshot = handle.lock().tick();

        if args.json {
            let line = serde_json::to_string(&snapshot).map_err(|e| CliError::Output(e.to_string()))?;
            println!("{}", line);
            continue;
        }

        print!("Step {} at {}", number, now.format("%H:%M:%S"));
        if let Some(label) = &step.label {
            print!(": {}", label);
        }
        println!();
        for note in &notes {
            println!("  note: {}", note);
        }
        print!("{}", render_snapshot(&snapshot));
        println!();
    }

    Ok(())
}
