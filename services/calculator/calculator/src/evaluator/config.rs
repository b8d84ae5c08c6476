use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Deepest nesting of operations accepted before evaluation is refused
    pub max_depth: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> EvaluatorConfig {
        EvaluatorConfig { max_depth: 512 }
    }
}
