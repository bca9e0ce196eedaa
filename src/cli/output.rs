//! CLI output formatting.
//!
//! All printing lives here so command handlers stay logic-only and the
//! format functions can be tested on plain strings.

use crate::engine::SimulationSnapshot;
use crate::scenarios::ScenarioParams;

/// Width of the text energy bars, in character cells.
const BAR_WIDTH: usize = 30;

/// Print version information.
pub fn print_version() {
    println!("kinergy {}", env!("CARGO_PKG_VERSION"));
}

/// Print help message.
pub fn print_help() {
    println!(
        r"kinergy - Energy-accounting physics scenario runner

USAGE:
    kinergy <COMMAND> [OPTIONS]

COMMANDS:
    run <config.yaml>           Run a configured scenario headlessly
        --duration <SECS>       Override the configured run duration
        --json                  Emit snapshots as JSON lines

    validate <config.yaml>      Validate a configuration without running it

    list                        List built-in scenario presets

    help                        Show this help message
    version                     Show version information

EXAMPLES:
    kinergy run configs/high_diver.yaml
    kinergy run configs/pendulum.yaml --duration 30 --json
    kinergy validate configs/coaster.yaml

Every snapshot keeps potential + kinetic + lost equal to the starting
total, so the reported percentages always sum to 100.
"
    );
}

/// Print the built-in scenario presets as a reference for config authors.
pub fn print_scenario_list() {
    println!("Built-in scenarios (use as `type:` in the scenario block):\n");
    for params in ScenarioParams::presets() {
        let energy = params.initial_energy();
        println!(
            "  {:<14} {:<22} starting energy {:>9.2} J",
            params.tag(),
            params.name(),
            energy
        );
    }
    println!("\nRun `kinergy run <config.yaml>` with a scenario block to simulate one.");
}

/// Print one snapshot as a human-readable report line with energy bars.
pub fn print_snapshot_line(elapsed_secs: f64, snapshot: &SimulationSnapshot) {
    println!(
        "t={elapsed_secs:6.2}s  phase={:<12} h={:7.3} m  v={:8.3} m/s",
        snapshot.phase.label(),
        snapshot.position.height,
        snapshot.velocity
    );
    println!(
        "    PE {} {:6.1}%   KE {} {:6.1}%   lost {} {:6.1}%",
        energy_bar(snapshot.energy.potential_percent),
        snapshot.energy.potential_percent,
        energy_bar(snapshot.energy.kinetic_percent),
        snapshot.energy.kinetic_percent,
        energy_bar(snapshot.energy.lost_percent),
        snapshot.energy.lost_percent
    );
}

/// Render a percentage as a fixed-width bar.
fn energy_bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    let mut bar = String::with_capacity(BAR_WIDTH + 2);
    bar.push('[');
    for _ in 0..filled {
        bar.push('#');
    }
    for _ in filled..BAR_WIDTH {
        bar.push('.');
    }
    bar.push(']');
    bar
}
