//! Summary statistics of Monte Carlo draws

use serde::{Deserialize, Serialize};

/// Number of bins in the sampled density
pub const NUM_BINS: usize = 20;

/// Two-sided 95% quantile of the standard normal distribution
const Z_95: f64 = 1.96;

/// Moments, confidence interval, and binned density of a sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleStatistics {
    /// Mean value
    pub mean: f64,
    /// Standard deviation
    pub sigma: f64,
    /// 95% confidence interval of the mean
    pub confidence_interval: (f64, f64),
    /// Pairs of (bin lower bound, fraction of draws in the bin)
    pub distribution: Vec<(f64, f64)>,
    /// Number of draws
    pub samples: usize,
}

impl SampleStatistics {
    /// Create from samples
    pub fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self {
                mean: 0.0,
                sigma: 0.0,
                confidence_interval: (0.0, 0.0),
                distribution: Vec::new(),
                samples: 0,
            };
        }

        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        let sigma = variance.sqrt();
        let half_width = Z_95 * sigma / (n as f64).sqrt();

        Self {
            mean,
            sigma,
            confidence_interval: (mean - half_width, mean + half_width),
            distribution: density(samples, NUM_BINS),
            samples: n,
        }
    }
}

/// Equal-width histogram normalized by the number of draws
fn density(samples: &[f64], num_bins: usize) -> Vec<(f64, f64)> {
    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / num_bins as f64;

    let mut counts = vec![0usize; num_bins];
    for &x in samples {
        let bin = if width > 0.0 {
            (((x - min) / width).floor() as usize).min(num_bins - 1)
        } else {
            0
        };
        counts[bin] += 1;
    }

    let n = samples.len() as f64;
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| (min + i as f64 * width, count as f64 / n))
        .collect()
}
