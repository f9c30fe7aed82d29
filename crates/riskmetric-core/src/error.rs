use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiskMetricError {
    #[error("Insufficient data: need {required} points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for RiskMetricError {
    fn from(err: serde_json::Error) -> Self {
        RiskMetricError::Parse(err.to_string())
    }
}
