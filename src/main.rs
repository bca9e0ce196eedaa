//! kinergy CLI - energy-accounting scenario runner.
//!
//! Thin entry point; all logic lives in the `cli` module for testability.

use std::process::ExitCode;

use kinergy::cli::{run_cli, Args};

fn main() -> ExitCode {
    run_cli(Args::parse())
}
