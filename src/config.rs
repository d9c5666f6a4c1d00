//! Scenario-level configuration: the calibration parameter, the process-wide
//! mask compliance rate, the run start date and the static per-activity
//! infection parameters. Loaded from a JSON file and validated before any
//! simulation day is evaluated.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::ContagionError;

fn default_contact_intensity() -> f64 {
    1.0
}

fn default_mask_compliance() -> f64 {
    1.0
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 2, 17).unwrap()
}

/// Static infection parameters of one activity container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfectionParams {
    /// Human-readable container name, also the restriction lookup key.
    container_name: String,
    /// How intimate contacts in this container are, relative to home.
    #[serde(default = "default_contact_intensity")]
    contact_intensity: f64,
}

impl InfectionParams {
    pub fn new(container_name: impl Into<String>, contact_intensity: f64) -> InfectionParams {
        InfectionParams {
            container_name: container_name.into(),
            contact_intensity,
        }
    }

    pub fn container_name(&self) -> &str {
        &self.container_name
    }

    pub fn contact_intensity(&self) -> f64 {
        self.contact_intensity
    }
}

/// Scenario-wide constants for the infection and mask models.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationConfig {
    /// Scalar tuning overall transmission intensity to match observed growth.
    calibration_parameter: f64,
    /// Default probability that a person wears a mandated mask.
    #[serde(default = "default_mask_compliance")]
    mask_compliance: f64,
    /// Calendar date of simulation day 0.
    #[serde(default = "default_start_date")]
    start_date: NaiveDate,
    #[serde(default)]
    activities: Vec<InfectionParams>,
}

impl SimulationConfig {
    pub fn new(calibration_parameter: f64) -> SimulationConfig {
        SimulationConfig {
            calibration_parameter,
            mask_compliance: default_mask_compliance(),
            start_date: default_start_date(),
            activities: Vec::new(),
        }
    }

    /// Loads and validates a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns a `ContagionError` if the file cannot be read or parsed, or if
    /// any field fails validation.
    pub fn from_file(path: &Path) -> Result<SimulationConfig, ContagionError> {
        let file = File::open(path)?;
        let config: SimulationConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks all fields are within their domain.
    ///
    /// # Errors
    ///
    /// Returns a `ContagionError::ConfigError` naming the offending field.
    pub fn validate(&self) -> Result<(), ContagionError> {
        if self.calibration_parameter <= 0.0 {
            return Err(ContagionError::ConfigError(format!(
                "calibration parameter must be positive, was {}",
                self.calibration_parameter
            )));
        }
        if !(0.0..=1.0).contains(&self.mask_compliance) {
            return Err(ContagionError::ConfigError(format!(
                "mask compliance must be within [0, 1], was {}",
                self.mask_compliance
            )));
        }
        let mut names = HashSet::new();
        for activity in &self.activities {
            if activity.container_name.is_empty() {
                return Err("activity container name must not be empty".into());
            }
            if activity.contact_intensity <= 0.0 {
                return Err(ContagionError::ConfigError(format!(
                    "contact intensity of '{}' must be positive, was {}",
                    activity.container_name, activity.contact_intensity
                )));
            }
            if !names.insert(activity.container_name.as_str()) {
                return Err(ContagionError::ConfigError(format!(
                    "duplicate activity '{}'",
                    activity.container_name
                )));
            }
        }
        Ok(())
    }

    pub fn with_mask_compliance(mut self, mask_compliance: f64) -> SimulationConfig {
        self.mask_compliance = mask_compliance;
        self
    }

    pub fn with_start_date(mut self, start_date: NaiveDate) -> SimulationConfig {
        self.start_date = start_date;
        self
    }

    pub fn with_activity(mut self, params: InfectionParams) -> SimulationConfig {
        self.activities.push(params);
        self
    }

    pub fn calibration_parameter(&self) -> f64 {
        self.calibration_parameter
    }

    pub fn mask_compliance(&self) -> f64 {
        self.mask_compliance
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn activities(&self) -> &[InfectionParams] {
        &self.activities
    }

    /// Looks up the infection parameters registered for a container name.
    pub fn infection_params(&self, container_name: &str) -> Option<&InfectionParams> {
        self.activities
            .iter()
            .find(|a| a.container_name == container_name)
    }
}
