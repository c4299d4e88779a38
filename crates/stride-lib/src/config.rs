use crate::{
    activity::ProcessingOptions, detectors::steps::IntervalDetectionParams, error::AnalysisError,
    metrics::best_split::EngineKind,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Window lengths (seconds) shown on a best-split curve by default.
pub const DEFAULT_SPLIT_WINDOWS: &[usize] = &[1, 5, 10, 30, 60, 120, 240, 360, 600, 900];

/// Distances (metres) for the fastest-time table by default.
pub const DEFAULT_SPLIT_DISTANCES: &[f64] =
    &[100.0, 200.0, 400.0, 800.0, 1000.0, 1600.0, 5000.0, 10000.0];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub processing: ProcessingOptions,
    pub detection: DetectionConfig,
    pub best_splits: BestSplitConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    #[serde(flatten)]
    pub params: IntervalDetectionParams,
    /// Functional threshold power used to express intervals as a percentage.
    pub ftp: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            params: IntervalDetectionParams::default(),
            ftp: 200.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BestSplitConfig {
    pub engine: EngineKind,
    pub windows: Vec<usize>,
    pub distances: Vec<f64>,
}

impl Default for BestSplitConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::default(),
            windows: DEFAULT_SPLIT_WINDOWS.to_vec(),
            distances: DEFAULT_SPLIT_DISTANCES.to_vec(),
        }
    }
}

impl AnalysisConfig {
    /// Read and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, AnalysisError> {
        let text = std::fs::read_to_string(path).map_err(|source| AnalysisError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, AnalysisError> {
        let config: AnalysisConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.processing.resolution == 0 {
            return Err(AnalysisError::invalid("resolution", "must be at least 1"));
        }
        self.detection.params.validate()?;
        if !(self.detection.ftp.is_finite() && self.detection.ftp > 0.0) {
            return Err(AnalysisError::invalid(
                "ftp",
                format!("must be positive, got {}", self.detection.ftp),
            ));
        }
        if let Some(d) = self
            .best_splits
            .distances
            .iter()
            .find(|d| !d.is_finite() || **d < 0.0)
        {
            return Err(AnalysisError::invalid(
                "distances",
                format!("must be finite and non-negative, got {}", d),
            ));
        }
        Ok(())
    }
}
