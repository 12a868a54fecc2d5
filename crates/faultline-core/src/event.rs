//! Basic events and their probability distributions
//!
//! A basic event carries a point probability (the mean of its distribution)
//! and a resampling operation used by Monte Carlo trials. Draws are cached
//! until [`BasicEvent::reset`] so that one trial sees one value per event.

use rand::Rng;
use rand_distr::{Beta, Distribution, Gamma, LogNormal, Normal, Triangular};
use serde::{Deserialize, Serialize};
use statrs::distribution::ContinuousCDF;

use crate::error::{AnalysisError, AnalysisResult};

/// Distribution of a basic event probability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProbabilityDistribution {
    /// Fixed value (no uncertainty)
    Constant(f64),
    /// Uniform distribution on `[min, max)`
    Uniform { min: f64, max: f64 },
    /// Normal distribution
    Normal { mean: f64, std_dev: f64 },
    /// Log-normal distribution given by its mean and error factor
    ///
    /// The error factor is the ratio of the upper bound of the two-sided
    /// `level` interval to the median.
    LogNormal {
        mean: f64,
        error_factor: f64,
        level: f64,
    },
    /// Beta distribution
    Beta { alpha: f64, beta: f64 },
    /// Gamma distribution
    Gamma { shape: f64, scale: f64 },
    /// Triangular distribution
    Triangular { min: f64, mode: f64, max: f64 },
}

impl ProbabilityDistribution {
    /// Create a log-normal distribution at the conventional 95% level
    pub fn log_normal(mean: f64, error_factor: f64) -> Self {
        ProbabilityDistribution::LogNormal {
            mean,
            error_factor,
            level: 0.95,
        }
    }

    /// Get the expected (mean) value
    pub fn mean(&self) -> f64 {
        match self {
            ProbabilityDistribution::Constant(v) => *v,
            ProbabilityDistribution::Uniform { min, max } => (min + max) / 2.0,
            ProbabilityDistribution::Normal { mean, .. } => *mean,
            ProbabilityDistribution::LogNormal { mean, .. } => *mean,
            ProbabilityDistribution::Beta { alpha, beta } => alpha / (alpha + beta),
            ProbabilityDistribution::Gamma { shape, scale } => shape * scale,
            ProbabilityDistribution::Triangular { min, mode, max } => (min + mode + max) / 3.0,
        }
    }

    /// Check the distribution parameters
    pub fn validate(&self) -> Result<(), String> {
        match self {
            ProbabilityDistribution::Constant(v) => {
                if !v.is_finite() {
                    return Err(format!("constant value {} is not finite", v));
                }
            }
            ProbabilityDistribution::Uniform { min, max } => {
                if !(min < max) {
                    return Err(format!("uniform bounds [{}, {}) are empty", min, max));
                }
            }
            ProbabilityDistribution::Normal { mean, std_dev } => {
                Normal::new(*mean, *std_dev).map_err(|e| e.to_string())?;
            }
            ProbabilityDistribution::LogNormal { .. } => {
                let (mu, sigma) = self.log_normal_parameters()?;
                LogNormal::new(mu, sigma).map_err(|e| e.to_string())?;
            }
            ProbabilityDistribution::Beta { alpha, beta } => {
                Beta::new(*alpha, *beta).map_err(|e| e.to_string())?;
            }
            ProbabilityDistribution::Gamma { shape, scale } => {
                Gamma::new(*shape, *scale).map_err(|e| e.to_string())?;
            }
            ProbabilityDistribution::Triangular { min, mode, max } => {
                Triangular::new(*min, *max, *mode).map_err(|e| e.to_string())?;
            }
        }
        Ok(())
    }

    /// Sample a value from the distribution
    ///
    /// Invalid parameters fall back to the mean; call
    /// [`ProbabilityDistribution::validate`] beforehand to reject them.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            ProbabilityDistribution::Constant(v) => *v,
            ProbabilityDistribution::Uniform { min, max } => {
                if min < max {
                    rng.gen_range(*min..*max)
                } else {
                    *min
                }
            }
            ProbabilityDistribution::Normal { mean, std_dev } => match Normal::new(*mean, *std_dev)
            {
                Ok(dist) => dist.sample(rng),
                Err(_) => *mean,
            },
            ProbabilityDistribution::LogNormal { mean, .. } => {
                match self
                    .log_normal_parameters()
                    .and_then(|(mu, sigma)| LogNormal::new(mu, sigma).map_err(|e| e.to_string()))
                {
                    Ok(dist) => dist.sample(rng),
                    Err(_) => *mean,
                }
            }
            ProbabilityDistribution::Beta { alpha, beta } => match Beta::new(*alpha, *beta) {
                Ok(dist) => dist.sample(rng),
                Err(_) => self.mean(),
            },
            ProbabilityDistribution::Gamma { shape, scale } => match Gamma::new(*shape, *scale) {
                Ok(dist) => dist.sample(rng),
                Err(_) => self.mean(),
            },
            ProbabilityDistribution::Triangular { min, mode, max } => {
                match Triangular::new(*min, *max, *mode) {
                    Ok(dist) => dist.sample(rng),
                    Err(_) => self.mean(),
                }
            }
        }
    }

    /// Location and scale of the underlying normal distribution
    fn log_normal_parameters(&self) -> Result<(f64, f64), String> {
        let ProbabilityDistribution::LogNormal {
            mean,
            error_factor,
            level,
        } = self
        else {
            return Err("not a log-normal distribution".to_string());
        };
        if !(*mean > 0.0) {
            return Err(format!("log-normal mean {} must be positive", mean));
        }
        if !(*error_factor > 1.0) {
            return Err(format!("error factor {} must be greater than 1", error_factor));
        }
        if !(*level > 0.0 && *level < 1.0) {
            return Err(format!("confidence level {} must be in (0, 1)", level));
        }
        let z = standard_normal_quantile((1.0 + level) / 2.0)?;
        let sigma = error_factor.ln() / z;
        let mu = mean.ln() - sigma * sigma / 2.0;
        Ok((mu, sigma))
    }
}

/// A basic event of the fault tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicEvent {
    /// Unique identifier
    id: String,
    /// Probability distribution
    distribution: ProbabilityDistribution,
    /// Value drawn in the current trial
    #[serde(skip)]
    sampled: Option<f64>,
}

impl BasicEvent {
    /// Create a basic event
    pub fn new(id: &str, distribution: ProbabilityDistribution) -> Self {
        Self {
            id: id.to_string(),
            distribution,
            sampled: None,
        }
    }

    /// Create a basic event with a fixed probability
    pub fn constant(id: &str, probability: f64) -> Self {
        Self::new(id, ProbabilityDistribution::Constant(probability))
    }

    /// Unique identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Probability distribution
    pub fn distribution(&self) -> &ProbabilityDistribution {
        &self.distribution
    }

    /// Point estimate of the probability
    pub fn p(&self) -> f64 {
        self.distribution.mean()
    }

    /// Draw a probability for the current trial
    ///
    /// The value may fall outside `[0, 1]`; callers clamp it.
    pub fn sample_probability<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        match self.sampled {
            Some(value) => value,
            None => {
                let value = self.distribution.sample(rng);
                self.sampled = Some(value);
                value
            }
        }
    }

    /// Forget the value drawn in the previous trial
    pub fn reset(&mut self) {
        self.sampled = None;
    }

    /// Check the distribution and the point probability
    pub fn validate(&self) -> AnalysisResult<()> {
        self.distribution
            .validate()
            .map_err(|reason| AnalysisError::InvalidDistribution {
                event: self.id.clone(),
                reason,
            })?;
        let p = self.p();
        if !(0.0..=1.0).contains(&p) {
            return Err(AnalysisError::InvalidDistribution {
                event: self.id.clone(),
                reason: format!("probability {} is outside [0, 1]", p),
            });
        }
        Ok(())
    }
}

/// Inverse CDF of the standard normal distribution
fn standard_normal_quantile(p: f64) -> Result<f64, String> {
    let standard = statrs::distribution::Normal::new(0.0, 1.0).map_err(|e| e.to_string())?;
    Ok(standard.inverse_cdf(p))
}
