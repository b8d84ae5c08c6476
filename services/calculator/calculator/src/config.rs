use serde::Deserialize;

use crate::evaluator::EvaluatorConfig;

/// Port the service listens on unless `ROCKET_PORT` says otherwise
pub const DEFAULT_PORT: u16 = 8081;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub evaluator: EvaluatorConfig,
}
