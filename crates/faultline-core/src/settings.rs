//! Analysis settings
//!
//! Settings are plain data with serde support so that callers can keep them in
//! a TOML document next to their models:
//!
//! ```toml
//! limit-order = 8
//! num-sums = 3
//! cut-off = 1e-9
//! num-trials = 5000
//! seed = 42
//! approximation = "rare-event"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};

/// Quantitative approximation applied to the union of cut sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Approximation {
    /// Truncated inclusion-exclusion expansion
    #[default]
    None,
    /// Sum of cut set probabilities
    RareEvent,
    /// Min-cut upper bound: 1 - prod(1 - p)
    Mcub,
}

/// Parameters shared by the qualitative and quantitative analyses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    /// Maximum number of literals in a generated cut set
    pub limit_order: usize,
    /// Number of sums kept from the inclusion-exclusion series
    pub num_sums: usize,
    /// Cut sets at or below this probability are ignored by quantification
    pub cut_off: f64,
    /// Number of Monte Carlo trials
    pub num_trials: usize,
    /// Random seed for reproducible sampling
    pub seed: Option<u64>,
    /// Approximation for point-estimate probability
    pub approximation: Approximation,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            limit_order: 20,
            num_sums: 7,
            cut_off: 1e-8,
            num_trials: 1000,
            seed: None,
            approximation: Approximation::None,
        }
    }
}

impl Settings {
    /// Set the limit on cut set size
    pub fn with_limit_order(mut self, limit_order: usize) -> Self {
        self.limit_order = limit_order;
        self
    }

    /// Set the number of series terms
    pub fn with_num_sums(mut self, num_sums: usize) -> Self {
        self.num_sums = num_sums;
        self
    }

    /// Set the cut-off probability
    pub fn with_cut_off(mut self, cut_off: f64) -> Self {
        self.cut_off = cut_off;
        self
    }

    /// Set the number of Monte Carlo trials
    pub fn with_num_trials(mut self, num_trials: usize) -> Self {
        self.num_trials = num_trials;
        self
    }

    /// Set seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the point-estimate approximation
    pub fn with_approximation(mut self, approximation: Approximation) -> Self {
        self.approximation = approximation;
        self
    }

    /// Validate every parameter against its domain
    pub fn validate(&self) -> AnalysisResult<()> {
        if self.limit_order < 1 {
            return Err(AnalysisError::InvalidArgument(
                "The limit on the order of minimal cut sets cannot be less than one".to_string(),
            ));
        }
        validate_quantitative(self.num_sums, self.cut_off, self.num_trials)
    }

    /// Parse and validate settings from a TOML string
    pub fn from_toml_str(s: &str) -> AnalysisResult<Self> {
        let settings: Settings = toml::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse and validate settings from a TOML file
    pub fn from_path(path: impl AsRef<Path>) -> AnalysisResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    /// Serialize settings to TOML
    pub fn to_toml_string(&self) -> AnalysisResult<String> {
        toml::to_string_pretty(self).map_err(|e| AnalysisError::Settings(e.to_string()))
    }
}

/// Check the construction contract of the quantitative analyses
pub(crate) fn validate_quantitative(
    num_sums: usize,
    cut_off: f64,
    num_trials: usize,
) -> AnalysisResult<()> {
    if num_sums < 1 {
        return Err(AnalysisError::InvalidArgument(
            "The number of sums in the probability calculation cannot be less than one"
                .to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&cut_off) {
        return Err(AnalysisError::InvalidArgument(
            "The cut-off probability cannot be negative or more than 1".to_string(),
        ));
    }
    if num_trials < 1 {
        return Err(AnalysisError::InvalidArgument(
            "The number of trials for uncertainty analysis cannot be fewer than 1".to_string(),
        ));
    }
    Ok(())
}
