//! Run configuration with YAML schema and validation.
//!
//! Configuration files carry the scenario selection as a tagged block plus
//! run settings for the headless driver. Schema constraints are enforced by
//! `validator` derive attributes; cross-field constraints live in
//! `validate_semantic`. Note the contrast with interactive parameter
//! updates: a config FILE that violates constraints is rejected with an
//! error, while live patches are clamped into range.

use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::error::{SimError, SimResult};
use crate::scenarios::ScenarioParams;

/// Top-level run configuration.
///
/// Loaded from YAML files with full schema validation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Schema version for forward compatibility.
    #[validate(length(min = 1))]
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Run metadata.
    #[validate(nested)]
    #[serde(default)]
    pub simulation: SimulationMeta,

    /// Scenario selection and physical parameters (tagged by `type`).
    #[validate(nested)]
    pub scenario: ScenarioParams,

    /// Headless-run settings.
    #[validate(nested)]
    #[serde(default)]
    pub run: RunSettings,
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

impl RunConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> SimResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> SimResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;

        config.validate()?;
        config.validate_semantic()?;

        Ok(config)
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::default()
    }

    /// Validate semantic constraints beyond schema.
    fn validate_semantic(&self) -> SimResult<()> {
        if self.run.frame_interval_ms <= 0.0 {
            return Err(SimError::config("Frame interval must be positive"));
        }
        if self.run.frame_interval_ms > 1000.0 {
            return Err(SimError::config(
                "Frame interval should not exceed 1000 ms",
            ));
        }
        if self.run.duration_secs <= 0.0 {
            return Err(SimError::config("Run duration must be positive"));
        }

        // Cross-field checks the per-field ranges cannot express
        match &self.scenario {
            ScenarioParams::BouncingBall(ball) => {
                if ball.rebound_height > ball.initial_height {
                    return Err(SimError::config(format!(
                        "Rebound height {} exceeds drop height {}",
                        ball.rebound_height, ball.initial_height
                    )));
                }
            }
            ScenarioParams::Coaster(coaster) => {
                if coaster.final_speed > coaster.speed_ceiling() {
                    return Err(SimError::config(format!(
                        "Final speed {} exceeds the energy ceiling {:.2}",
                        coaster.final_speed,
                        coaster.speed_ceiling()
                    )));
                }
            }
            _ => {}
        }

        Ok(())
    }

    /// YAML rendition of the configuration.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_yaml(&self) -> SimResult<String> {
        serde_yaml::to_string(self).map_err(SimError::from)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            simulation: SimulationMeta::default(),
            scenario: ScenarioParams::default(),
            run: RunSettings::default(),
        }
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct RunConfigBuilder {
    name: Option<String>,
    scenario: Option<ScenarioParams>,
    frame_interval_ms: Option<f64>,
    duration_secs: Option<f64>,
}

impl RunConfigBuilder {
    /// Set the run name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the scenario block.
    #[must_use]
    pub fn scenario(mut self, scenario: ScenarioParams) -> Self {
        self.scenario = Some(scenario);
        self
    }

    /// Set the synthetic frame interval in milliseconds.
    #[must_use]
    pub const fn frame_interval_ms(mut self, interval: f64) -> Self {
        self.frame_interval_ms = Some(interval);
        self
    }

    /// Set the maximum run duration in seconds.
    #[must_use]
    pub const fn duration_secs(mut self, duration: f64) -> Self {
        self.duration_secs = Some(duration);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> RunConfig {
        let mut config = RunConfig::default();

        if let Some(name) = self.name {
            config.simulation.name = name;
        }

        if let Some(scenario) = self.scenario {
            config.scenario = scenario;
        }

        if let Some(interval) = self.frame_interval_ms {
            config.run.frame_interval_ms = interval;
        }

        if let Some(duration) = self.duration_secs {
            config.run.duration_secs = duration;
        }

        config
    }
}

/// Run metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SimulationMeta {
    /// Run name.
    #[serde(default)]
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
}

/// Settings for driving a headless run.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RunSettings {
    /// Synthetic interval between frames (ms).
    #[validate(range(min = 0.1, max = 1000.0))]
    #[serde(default = "default_frame_interval")]
    pub frame_interval_ms: f64,

    /// Wall-clock ceiling on the run (simulated seconds of frames).
    #[validate(range(min = 0.001))]
    #[serde(default = "default_duration")]
    pub duration_secs: f64,

    /// Emit a snapshot line every N frames (1 = every frame).
    #[validate(range(min = 1))]
    #[serde(default = "default_report_every")]
    pub report_every: u32,
}

const fn default_frame_interval() -> f64 {
    16.0
}

const fn default_duration() -> f64 {
    10.0
}

const fn default_report_every() -> u32 {
    6
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            frame_interval_ms: default_frame_interval(),
            duration_secs: default_duration(),
            report_every: default_report_every(),
        }
    }
}
