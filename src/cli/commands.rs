//! CLI command handlers.
//!
//! Execution logic for each command, kept apart from argument parsing and
//! output formatting so every handler can be exercised in tests.

use std::path::Path;
use std::process::ExitCode;

use crate::config::RunConfig;
use crate::engine::{AnimationDriver, DriverState, ManualScheduler};
use crate::error::SimResult;
use crate::scenarios::ScenarioParams;

use super::output::{print_help, print_scenario_list, print_snapshot_line, print_version};
use super::{Args, Command};

/// Main CLI entry point.
///
/// Dispatches to the appropriate command handler based on parsed arguments.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    match args.command {
        Command::Run {
            config_path,
            duration_override,
            json,
        } => run_simulation(&config_path, duration_override, json),
        Command::Validate { config_path } => validate_config(&config_path),
        Command::List => {
            print_scenario_list();
            ExitCode::SUCCESS
        }
        Command::Help => {
            print_help();
            ExitCode::SUCCESS
        }
        Command::Version => {
            print_version();
            ExitCode::SUCCESS
        }
    }
}

/// Run a configured scenario headlessly, emitting periodic snapshots.
#[must_use]
pub fn run_simulation(path: &Path, duration_override: Option<f64>, json: bool) -> ExitCode {
    let config = match RunConfig::load(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(1);
        }
    };

    match drive(&config, duration_override, json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Drive the configured scenario at synthetic frame timestamps.
fn drive(config: &RunConfig, duration_override: Option<f64>, json: bool) -> SimResult<()> {
    let duration_secs = duration_override.unwrap_or(config.run.duration_secs);
    let interval_ms = config.run.frame_interval_ms;
    let report_every = config.run.report_every.max(1);

    let mut driver = AnimationDriver::new(config.scenario, ManualScheduler::new());

    if !json {
        print_run_banner(config, duration_secs);
        print_snapshot_line(0.0, &driver.initialize());
    }

    driver.start();

    let mut now_ms = 0.0;
    let mut frame: u64 = 0;
    while driver.state() == DriverState::Running && now_ms <= duration_secs * 1000.0 {
        driver.tick(now_ms);
        frame += 1;
        if frame % u64::from(report_every) == 0 || driver.state() != DriverState::Running {
            let snapshot = driver.snapshot();
            if json {
                println!("{}", serde_json::to_string(&snapshot).map_err(|e| {
                    crate::error::SimError::serialization(e.to_string())
                })?);
            } else {
                print_snapshot_line(now_ms / 1000.0, &snapshot);
            }
        }
        now_ms += interval_ms;
    }

    if !json {
        let snapshot = driver.snapshot();
        let outcome = match driver.state() {
            DriverState::Complete => "completed",
            _ => "stopped at the duration ceiling",
        };
        println!(
            "\nRun {outcome} in phase '{}' after {:.2} simulated seconds.",
            snapshot.phase,
            now_ms / 1000.0
        );
        println!(
            "Energy: {:.2} J potential, {:.2} J kinetic, {:.2} J lost of {:.2} J total.",
            snapshot.energy.potential,
            snapshot.energy.kinetic,
            snapshot.energy.lost,
            snapshot.energy.total
        );
    }

    Ok(())
}

fn print_run_banner(config: &RunConfig, duration_secs: f64) {
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    let name = if config.simulation.name.is_empty() {
        config.scenario.name()
    } else {
        config.simulation.name.as_str()
    };
    println!("Scenario: {name} ({})", config.scenario.tag());
    println!(
        "Budget: {:.2} J   Frame interval: {:.1} ms   Duration: {duration_secs:.1} s",
        config.scenario.initial_energy(),
        config.run.frame_interval_ms
    );
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
}

/// Validate a configuration file against schema and semantic constraints.
#[must_use]
pub fn validate_config(path: &Path) -> ExitCode {
    println!("Validating: {}\n", path.display());

    match RunConfig::load(path) {
        Ok(config) => {
            println!("✓ Configuration is valid");
            println!("  Scenario: {} ({})", config.scenario.name(), config.scenario.tag());
            report_clamp_repairs(&config.scenario);
            println!(
                "  Starting energy: {:.2} J",
                config.scenario.initial_energy()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Configuration invalid: {e}");
            ExitCode::from(1)
        }
    }
}

/// Show what interactive clamping would change, if anything.
///
/// A file that passes hard validation can still carry values the live
/// engine would nudge (a rebound height equal to the drop height, say);
/// surfacing the difference helps config authors.
fn report_clamp_repairs(scenario: &ScenarioParams) {
    let clamped = scenario.clamped();
    if clamped != *scenario {
        println!("  Note: some values would be clamped into range at run time");
    }
}
