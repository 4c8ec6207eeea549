use std::fs::File;
use std::io::BufReader;

use serde::Deserialize;
use thiserror::Error;

use crate::math::integration::aprioristepsizer::{
    self,
    APrioriStepSizer
};
use crate::math::integration::integrationerror::IntegrationError;
use crate::math::integration::rungeintegrator::{
    self,
    RungeIntegrator,
    RungeSettings
};

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    #[error(transparent)]
    JsonParseError(#[from] serde_json::Error),

    #[error(transparent)]
    IntegrationError(#[from] IntegrationError)
}

// ─────────────────────────────────────────────────────────────────────────────
// JSON 格式（所有欄位皆可省略，省略者採預設值）：
//
//   {
//     "runge": {
//       "initial_subdivisions": 2,
//       "max_iterations": 2000,
//       "max_subdivisions": 4000000,
//       "reliable_order": 4,
//       "min_reliable_subdivisions": 8
//     },
//     "sizer": { "max_subdivisions": 4000000 }
//   }
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RungeSettingsJsonProp {
    initial_subdivisions: usize,
    max_iterations: usize,
    max_subdivisions: usize,
    reliable_order: u32,
    min_reliable_subdivisions: usize
}

impl Default for RungeSettingsJsonProp {
    fn default() -> Self {
        RungeSettingsJsonProp {
            initial_subdivisions: rungeintegrator::DEFAULT_INITIAL_SUBDIVISIONS,
            max_iterations: rungeintegrator::DEFAULT_MAX_ITERATIONS,
            max_subdivisions: rungeintegrator::DEFAULT_MAX_SUBDIVISIONS,
            reliable_order: rungeintegrator::DEFAULT_RELIABLE_ORDER,
            min_reliable_subdivisions: rungeintegrator::DEFAULT_MIN_RELIABLE_SUBDIVISIONS
        }
    }
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SizerSettingsJsonProp {
    max_subdivisions: usize
}

impl Default for SizerSettingsJsonProp {
    fn default() -> Self {
        SizerSettingsJsonProp { max_subdivisions: aprioristepsizer::DEFAULT_MAX_SUBDIVISIONS }
    }
}

#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct ConfigurationJsonProp {
    runge: RungeSettingsJsonProp,
    sizer: SizerSettingsJsonProp
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Configuration {
    runge_settings: RungeSettings,
    step_sizer: APrioriStepSizer
}

impl Configuration {
    pub fn new(runge_settings: RungeSettings, step_sizer: APrioriStepSizer) -> Configuration {
        Configuration { runge_settings, step_sizer }
    }

    pub fn runge_settings(&self) -> &RungeSettings {
        &self.runge_settings
    }

    pub fn step_sizer(&self) -> APrioriStepSizer {
        self.step_sizer
    }

    pub fn runge_integrator(&self) -> RungeIntegrator {
        RungeIntegrator::new(self.runge_settings)
    }

    pub fn from_reader(file_path: &str) -> Result<Configuration, ConfigurationError> {
        let file = File::open(file_path)?;
        let reader = BufReader::new(file);
        let json_prop: ConfigurationJsonProp = serde_json::from_reader(reader)?;
        Self::from_json_prop(json_prop)
    }

    pub fn from_json_str(json: &str) -> Result<Configuration, ConfigurationError> {
        let json_prop: ConfigurationJsonProp = serde_json::from_str(json)?;
        Self::from_json_prop(json_prop)
    }

    fn from_json_prop(json_prop: ConfigurationJsonProp) -> Result<Configuration, ConfigurationError> {
        let runge = json_prop.runge;
        let runge_settings = RungeSettings::new(
            runge.initial_subdivisions,
            runge.max_iterations,
            runge.max_subdivisions,
            runge.reliable_order,
            runge.min_reliable_subdivisions
        )?;
        if json_prop.sizer.max_subdivisions == 0 {
            return Err(IntegrationError::invalid_setting("sizer.max_subdivisions", "must be at least 1").into());
        }
        let step_sizer = APrioriStepSizer::new(json_prop.sizer.max_subdivisions);
        Ok(Configuration { runge_settings, step_sizer })
    }
}
