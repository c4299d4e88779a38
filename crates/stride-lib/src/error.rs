use std::path::PathBuf;
use thiserror::Error;

/// Problems with analysis settings or input data. The engine itself never fails.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid value for `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("failed to read config {}", path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config")]
    ParseConfig(#[from] toml::de::Error),
    #[error("cumulative distance decreases from {from} m to {to} m at {time} s")]
    DecreasingDistance { time: f64, from: f64, to: f64 },
}

impl AnalysisError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        AnalysisError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
