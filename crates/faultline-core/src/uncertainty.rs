//! Monte Carlo uncertainty analysis
//!
//! The inclusion-exclusion expansion of the minimal cut sets is built once.
//! Each trial redraws every basic event probability from its distribution and
//! re-evaluates the expansion; the draws are summarized by
//! [`SampleStatistics`].

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{thread_rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::cut_set::NamedCutSet;
use crate::error::AnalysisResult;
use crate::event::BasicEvent;
use crate::expansion::Expansion;
use crate::indexing::EventIndex;
use crate::probability::prune_cut_sets;
use crate::settings::{validate_quantitative, Settings};
use crate::statistics::SampleStatistics;

/// Warning recorded the first time a draw is clamped into `[0, 1]`
pub const CLAMP_WARNING: &str =
    "Invalid probability was sampled but adjusted to proper boundaries of 0 and 1.";

/// Snapshot of an uncertainty analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyResults {
    /// Mean of the sampled top event probability
    pub mean: f64,
    /// Standard deviation of the draws
    pub sigma: f64,
    /// 95% confidence interval of the mean
    pub confidence_interval: (f64, f64),
    /// Pairs of (bin lower bound, fraction of draws)
    pub distribution: Vec<(f64, f64)>,
    /// Number of trials
    pub num_trials: usize,
    /// Warnings, empty if none
    pub warnings: String,
    /// Wall time of the last analysis in seconds
    pub analysis_time: f64,
}

/// Monte Carlo estimate of the top event probability distribution
#[derive(Debug, Clone)]
pub struct UncertaintyAnalysis {
    num_sums: usize,
    cut_off: f64,
    num_trials: usize,
    seed: Option<u64>,
    index: EventIndex,
    expansion: Expansion,
    sampled_results: Vec<f64>,
    statistics: SampleStatistics,
    warnings: String,
    analysis_time: Duration,
}

impl UncertaintyAnalysis {
    /// Create an analysis
    ///
    /// Fails if `num_sums < 1`, `cut_off` is outside `[0, 1]`, or
    /// `num_trials < 1`.
    pub fn new(num_sums: usize, cut_off: f64, num_trials: usize) -> AnalysisResult<Self> {
        validate_quantitative(num_sums, cut_off, num_trials)?;
        Ok(Self {
            num_sums,
            cut_off,
            num_trials,
            seed: None,
            index: EventIndex::default(),
            expansion: Expansion::default(),
            sampled_results: Vec::new(),
            statistics: SampleStatistics::from_samples(&[]),
            warnings: String::new(),
            analysis_time: Duration::ZERO,
        })
    }

    /// Create an analysis from settings, seeded if the settings carry a seed
    pub fn from_settings(settings: &Settings) -> AnalysisResult<Self> {
        let analysis = Self::new(settings.num_sums, settings.cut_off, settings.num_trials)?;
        Ok(match settings.seed {
            Some(seed) => analysis.with_seed(seed),
            None => analysis,
        })
    }

    /// Set seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replace the basic event table
    pub fn update_database(
        &mut self,
        events: impl IntoIterator<Item = BasicEvent>,
    ) -> AnalysisResult<()> {
        self.index = EventIndex::assign_indices(events)?;
        Ok(())
    }

    /// Run the analysis over a collection of minimal cut sets
    pub fn analyze<'c>(
        &mut self,
        min_cut_sets: impl IntoIterator<Item = &'c NamedCutSet>,
    ) -> AnalysisResult<()> {
        let start = Instant::now();
        self.warnings.clear();

        let indexed = self.index.index_mcs(min_cut_sets)?;
        let survivors = prune_cut_sets(&self.index, indexed, self.cut_off);
        let nsums = self.num_sums.min(survivors.len());

        self.expansion = Expansion::build(survivors, nsums);
        log::debug!(
            "Uncertainty analysis over {} expansion terms, {} trials",
            self.expansion.len(),
            self.num_trials
        );

        self.sample();
        self.statistics = SampleStatistics::from_samples(&self.sampled_results);

        self.analysis_time = start.elapsed();
        log::info!(
            "Uncertainty analysis: mean {:.6e}, sigma {:.6e} in {:?}",
            self.statistics.mean,
            self.statistics.sigma,
            self.analysis_time
        );
        Ok(())
    }

    fn sample(&mut self) {
        let mut rng: Box<dyn RngCore> = if let Some(seed) = self.seed {
            Box::new(StdRng::seed_from_u64(seed))
        } else {
            Box::new(thread_rng())
        };

        self.sampled_results.clear();
        self.sampled_results.reserve(self.num_trials);
        let mut warned = false;

        for _ in 0..self.num_trials {
            let clamped = self.index.resample(rng.as_mut());
            if clamped && !warned {
                warned = true;
                log::warn!("{}", CLAMP_WARNING);
                self.warnings.push_str(CLAMP_WARNING);
            }
            self.sampled_results.push(self.expansion.evaluate(&self.index));
        }

        self.index.reset_probabilities();
    }

    /// Mean of the draws
    pub fn mean(&self) -> f64 {
        self.statistics.mean
    }

    /// Standard deviation of the draws
    pub fn sigma(&self) -> f64 {
        self.statistics.sigma
    }

    /// 95% confidence interval of the mean
    pub fn confidence_interval(&self) -> (f64, f64) {
        self.statistics.confidence_interval
    }

    /// Binned density of the draws
    pub fn distribution(&self) -> &[(f64, f64)] {
        &self.statistics.distribution
    }

    /// Warnings of the last analysis
    pub fn warnings(&self) -> &str {
        &self.warnings
    }

    /// Wall time of the last analysis
    pub fn analysis_time(&self) -> Duration {
        self.analysis_time
    }

    /// Raw draws of the last analysis
    pub fn sampled_results(&self) -> &[f64] {
        &self.sampled_results
    }

    /// Serializable snapshot of the last analysis
    pub fn results(&self) -> UncertaintyResults {
        UncertaintyResults {
            mean: self.statistics.mean,
            sigma: self.statistics.sigma,
            confidence_interval: self.statistics.confidence_interval,
            distribution: self.statistics.distribution.clone(),
            num_trials: self.num_trials,
            warnings: self.warnings.clone(),
            analysis_time: self.analysis_time.as_secs_f64(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::event::ProbabilityDistribution;

    fn named(literals: &[&str]) -> NamedCutSet {
        literals.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(matches!(
            UncertaintyAnalysis::new(0, 0.1, 10),
            Err(AnalysisError::InvalidArgument(_))
        ));
        assert!(matches!(
            UncertaintyAnalysis::new(1, -0.1, 10),
            Err(AnalysisError::InvalidArgument(_))
        ));
        assert!(matches!(
            UncertaintyAnalysis::new(1, 1.1, 10),
            Err(AnalysisError::InvalidArgument(_))
        ));
        assert!(matches!(
            UncertaintyAnalysis::new(1, 0.1, 0),
            Err(AnalysisError::InvalidArgument(_))
        ));
        assert!(UncertaintyAnalysis::new(1, 0.0, 1).is_ok());
    }

    #[test]
    fn test_constant_events() {
        let mut analysis = UncertaintyAnalysis::new(7, 0.0, 100).unwrap().with_seed(7);
        analysis
            .update_database([BasicEvent::constant("A", 0.5), BasicEvent::constant("B", 0.5)])
            .unwrap();
        analysis.analyze(&[named(&["A"]), named(&["B"])]).unwrap();

        assert!((analysis.mean() - 0.75).abs() < 1e-12);
        assert!(analysis.sigma().abs() < 1e-12);
        assert_eq!(analysis.sampled_results().len(), 100);
        assert_eq!(analysis.distribution().len(), 20);
        assert!(analysis.warnings().is_empty());
    }

    #[test]
    fn test_converges_to_point_value() {
        let mut analysis = UncertaintyAnalysis::new(7, 0.0, 20_000).unwrap().with_seed(42);
        analysis
            .update_database([
                BasicEvent::new("A", ProbabilityDistribution::Uniform { min: 0.2, max: 0.4 }),
                BasicEvent::new("B", ProbabilityDistribution::Uniform { min: 0.4, max: 0.6 }),
            ])
            .unwrap();
        analysis.analyze(&[named(&["A", "B"])]).unwrap();

        // Independent draws: E[AB] = E[A] E[B]
        assert!((analysis.mean() - 0.15).abs() < 0.003);
        let (low, high) = analysis.confidence_interval();
        assert!(low < analysis.mean() && analysis.mean() < high);
    }

    #[test]
    fn test_clamp_warning_once() {
        let mut analysis = UncertaintyAnalysis::new(1, 0.0, 500).unwrap().with_seed(3);
        analysis
            .update_database([BasicEvent::new(
                "A",
                ProbabilityDistribution::Normal {
                    mean: 0.5,
                    std_dev: 1.0,
                },
            )])
            .unwrap();
        analysis.analyze(&[named(&["A"])]).unwrap();

        assert_eq!(analysis.warnings(), CLAMP_WARNING);
        assert!(analysis
            .sampled_results()
            .iter()
            .all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let events = [
            BasicEvent::new("A", ProbabilityDistribution::log_normal(0.01, 3.0)),
            BasicEvent::new("B", ProbabilityDistribution::Beta { alpha: 2.0, beta: 5.0 }),
        ];
        let mcs = [named(&["A"]), named(&["B"])];

        let run = || {
            let settings = Settings::default().with_num_trials(200).with_seed(11);
            let mut analysis = UncertaintyAnalysis::from_settings(&settings).unwrap();
            analysis.update_database(events.clone()).unwrap();
            analysis.analyze(&mcs).unwrap();
            analysis.sampled_results().to_vec()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_results_snapshot() {
        let mut analysis = UncertaintyAnalysis::new(3, 0.0, 10).unwrap().with_seed(1);
        analysis
            .update_database([BasicEvent::constant("A", 0.25)])
            .unwrap();
        analysis.analyze(&[named(&["A"])]).unwrap();

        let results = analysis.results();
        assert_eq!(results.num_trials, 10);
        assert!((results.mean - 0.25).abs() < 1e-12);
        assert!(results.warnings.is_empty());
        assert!(results.analysis_time >= 0.0);
    }
}
