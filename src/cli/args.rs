//! CLI argument parsing.
//!
//! Hand-rolled parser over an iterator of strings so every path is testable
//! without touching `std::env::args()`.

use std::path::PathBuf;

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    /// The command to execute.
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Run a configured simulation headlessly
    Run {
        /// Path to the run configuration YAML file.
        config_path: PathBuf,
        /// Optional duration override in seconds.
        duration_override: Option<f64>,
        /// Emit snapshots as JSON lines instead of the text report.
        json: bool,
    },
    /// Validate a configuration file without running it
    Validate {
        /// Path to the run configuration YAML file.
        config_path: PathBuf,
    },
    /// List built-in scenario presets
    List,
    /// Show help
    Help,
    /// Show version
    Version,
}

impl Args {
    /// Parse command-line arguments from an iterator.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    fn parse_from_vec(args: &[String]) -> Self {
        if args.len() < 2 {
            return Self {
                command: Command::Help,
            };
        }

        let command = match args[1].as_str() {
            "run" => Self::parse_run_command(args),
            "validate" => Self::parse_validate_command(args),
            "list" => Command::List,
            "-h" | "--help" | "help" => Command::Help,
            "-V" | "--version" | "version" => Command::Version,
            unknown => {
                eprintln!("Unknown command: {unknown}");
                Command::Help
            }
        };

        Self { command }
    }

    /// Parse the 'run' command arguments.
    fn parse_run_command(args: &[String]) -> Command {
        if args.len() < 3 {
            eprintln!("Error: 'run' command requires a config path");
            return Command::Help;
        }

        let mut duration_override = None;
        let mut json = false;

        let mut i = 3;
        while i < args.len() {
            match args[i].as_str() {
                "--duration" => {
                    if i + 1 < args.len() {
                        if let Ok(secs) = args[i + 1].parse() {
                            duration_override = Some(secs);
                        }
                        i += 2;
                    } else {
                        i += 1;
                    }
                }
                "--json" => {
                    json = true;
                    i += 1;
                }
                _ => i += 1,
            }
        }

        Command::Run {
            config_path: PathBuf::from(&args[2]),
            duration_override,
            json,
        }
    }

    /// Parse the 'validate' command arguments.
    fn parse_validate_command(args: &[String]) -> Command {
        if args.len() < 3 {
            eprintln!("Error: 'validate' command requires a config path");
            return Command::Help;
        }

        Command::Validate {
            config_path: PathBuf::from(&args[2]),
        }
    }
}
