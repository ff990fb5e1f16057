use crate::DEFAULT_CONFIDENCE_LEVEL;
use crate::distribution::MetricDistribution;
use crate::error::AnalyticsError;
use crate::metrics::{self, MetricKind};
use crate::report::{PairedValues, StatisticsReport};
use core_types::{Series, SeriesSide};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;

/// Bootstrap calculator for computed-vs-experimental agreement metrics.
///
/// The engine only holds configuration. Every run returns its own
/// `StatisticsReport`, so one engine can be reused across comparisons.
#[derive(Debug, Clone)]
pub struct StatisticsEngine {
    confidence_level: f64,
    seed: Option<u64>,
    parallel: bool,
}

impl Default for StatisticsEngine {
    fn default() -> Self {
        Self {
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
            seed: None,
            parallel: false,
        }
    }
}

/// How one computed value is produced on each draw.
#[derive(Debug, Clone)]
enum Sampler {
    Fixed(f64),
    Gaussian(Normal<f64>),
}

impl Sampler {
    fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        match self {
            Sampler::Fixed(value) => *value,
            Sampler::Gaussian(normal) => normal.sample(rng),
        }
    }
}

impl StatisticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds every run from `seed`, making reports reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Evaluates draws on the rayon thread pool. Results are identical to a
    /// serial run with the same seed.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_confidence_level(mut self, confidence_level: f64) -> Self {
        self.set_confidence_level(confidence_level);
        self
    }

    /// Sets the confidence level used by the reports' interval accessors.
    ///
    /// Values outside `[0, 1]` are kept as given after logging a warning.
    pub fn set_confidence_level(&mut self, confidence_level: f64) {
        if !(0.0..=1.0).contains(&confidence_level) {
            tracing::warn!(
                confidence_level,
                "Confidence level needs to be between 0 and 1, try something like 0.68 for one sigma confidence."
            );
        }
        self.confidence_level = confidence_level;
    }

    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// The main entry point for resampling and evaluating agreement metrics.
    ///
    /// # Arguments
    ///
    /// * `computed` - The computed free energies; their uncertainties drive the resampling.
    /// * `experimental` - The reference free energies, used unperturbed.
    /// * `compound_list` - Compounds to compare, in order. `None` compares every compound
    ///   present in both series, sorted by identifier.
    /// * `repeats` - Number of resample draws.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `StatisticsReport` or an `AnalyticsError`. On error no
    /// partial results are produced.
    pub fn generate_statistics(
        &self,
        computed: &Series,
        experimental: &Series,
        compound_list: Option<&[String]>,
        repeats: usize,
    ) -> Result<StatisticsReport, AnalyticsError> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        self.generate_statistics_with_rng(computed, experimental, compound_list, repeats, &mut rng)
    }

    /// Same as `generate_statistics`, drawing randomness from the caller's generator
    /// instead of the configured seed.
    #[tracing::instrument(name = "generate_statistics", skip_all, fields(repeats = repeats))]
    pub fn generate_statistics_with_rng<R: Rng>(
        &self,
        computed: &Series,
        experimental: &Series,
        compound_list: Option<&[String]>,
        repeats: usize,
        rng: &mut R,
    ) -> Result<StatisticsReport, AnalyticsError> {
        if repeats == 0 {
            return Err(AnalyticsError::InvalidRepeats(repeats));
        }

        let compounds = resolve_compounds(computed, experimental, compound_list)?;
        let paired = extract_paired_values(&compounds, computed, experimental)?;
        let samplers = build_samplers(&compounds, &paired)?;
        tracing::debug!(compounds = ?compounds, "Resolved comparison domain.");

        // Sub-seeds are drawn up front so the draw order does not depend on scheduling.
        let seeds: Vec<u64> = (0..repeats).map(|_| rng.random()).collect();
        let draws: Vec<[f64; 4]> = if self.parallel {
            seeds
                .par_iter()
                .map(|seed| evaluate_draw(&samplers, &paired.experimental, *seed))
                .collect()
        } else {
            seeds
                .iter()
                .map(|seed| evaluate_draw(&samplers, &paired.experimental, *seed))
                .collect()
        };

        let mut r = MetricDistribution::with_capacity(MetricKind::PearsonR, repeats);
        let mut r2 = MetricDistribution::with_capacity(MetricKind::RSquared, repeats);
        let mut tau = MetricDistribution::with_capacity(MetricKind::KendallTau, repeats);
        let mut mue = MetricDistribution::with_capacity(MetricKind::Mue, repeats);
        for [draw_r, draw_r2, draw_tau, draw_mue] in draws {
            r.push(draw_r);
            r2.push(draw_r2);
            tau.push(draw_tau);
            mue.push(draw_mue);
        }

        let report = StatisticsReport {
            compounds,
            paired,
            confidence_level: self.confidence_level,
            r,
            r2,
            tau,
            mue,
        };
        tracing::debug!(
            r_mean = report.r_mean(),
            tau_mean = report.tau_mean(),
            mue_mean = report.mue_mean(),
            "Resampling complete."
        );
        Ok(report)
    }
}

/// Picks the compounds to compare: the caller's list verbatim, or the sorted
/// intersection of both series.
fn resolve_compounds(
    computed: &Series,
    experimental: &Series,
    compound_list: Option<&[String]>,
) -> Result<Vec<String>, AnalyticsError> {
    let compounds = match compound_list {
        Some(list) => list.to_vec(),
        None => {
            let mut common: Vec<String> = computed
                .ids()
                .filter(|id| experimental.contains(id))
                .map(String::from)
                .collect();
            common.sort();
            common
        }
    };

    if compounds.is_empty() {
        return Err(AnalyticsError::EmptyCompoundSet);
    }
    Ok(compounds)
}

fn extract_paired_values(
    compounds: &[String],
    computed: &Series,
    experimental: &Series,
) -> Result<PairedValues, AnalyticsError> {
    let mut paired = PairedValues {
        computed: Vec::with_capacity(compounds.len()),
        computed_uncertainty: Vec::with_capacity(compounds.len()),
        experimental: Vec::with_capacity(compounds.len()),
    };

    for id in compounds {
        let comp = computed
            .get(id)
            .ok_or_else(|| AnalyticsError::EntityNotFound {
                id: id.clone(),
                side: SeriesSide::Computed,
            })?;
        let exp = experimental
            .get(id)
            .ok_or_else(|| AnalyticsError::EntityNotFound {
                id: id.clone(),
                side: SeriesSide::Experimental,
            })?;

        paired.computed.push(comp.value);
        paired.computed_uncertainty.push(comp.uncertainty_or_zero());
        paired.experimental.push(exp.value);
    }

    Ok(paired)
}

fn build_samplers(compounds: &[String], paired: &PairedValues) -> Result<Vec<Sampler>, AnalyticsError> {
    compounds
        .iter()
        .zip(paired.computed.iter().zip(&paired.computed_uncertainty))
        .map(|(id, (&value, &uncertainty))| {
            if uncertainty == 0.0 {
                return Ok(Sampler::Fixed(value));
            }
            if !uncertainty.is_finite() || uncertainty < 0.0 {
                return Err(AnalyticsError::InvalidUncertainty {
                    id: id.clone(),
                    value: uncertainty,
                });
            }
            Normal::new(value, uncertainty)
                .map(Sampler::Gaussian)
                .map_err(|_| AnalyticsError::InvalidUncertainty {
                    id: id.clone(),
                    value: uncertainty,
                })
        })
        .collect()
}

/// Draws one resample of the computed series and returns `[r, r², tau, mue]`.
fn evaluate_draw(samplers: &[Sampler], experimental: &[f64], seed: u64) -> [f64; 4] {
    let mut rng = StdRng::seed_from_u64(seed);
    let draw: Vec<f64> = samplers.iter().map(|s| s.sample(&mut rng)).collect();

    let (r2, r) = metrics::r_squared(&draw, experimental);
    let tau = metrics::kendall_tau(&draw, experimental);
    let mue = metrics::mean_unsigned_error(&draw, experimental);
    [r, r2, tau, mue]
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::MeasurementRecord;

    fn series(records: &[(&str, f64, Option<f64>)]) -> Series {
        Series::new(
            records
                .iter()
                .map(|(id, value, err)| MeasurementRecord {
                    id: id.to_string(),
                    value: *value,
                    uncertainty: *err,
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_default_domain_is_sorted_intersection() {
        let comp = series(&[("c", 1.0, None), ("a", 2.0, None), ("x", 3.0, None)]);
        let exp = series(&[("a", 1.0, None), ("b", 2.0, None), ("c", 3.0, None)]);
        let compounds = resolve_compounds(&comp, &exp, None).unwrap();
        assert_eq!(compounds, vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_explicit_domain_order_is_kept() {
        let comp = series(&[("a", 1.0, None), ("b", 2.0, None)]);
        let list = vec!["b".to_string(), "a".to_string()];
        let compounds = resolve_compounds(&comp, &comp, Some(list.as_slice())).unwrap();
        assert_eq!(compounds, list);
    }

    #[test]
    fn test_empty_domain() {
        let comp = series(&[("a", 1.0, None)]);
        let exp = series(&[("b", 1.0, None)]);
        assert_eq!(
            resolve_compounds(&comp, &exp, None),
            Err(AnalyticsError::EmptyCompoundSet)
        );
        assert_eq!(
            resolve_compounds(&comp, &exp, Some(&[][..])),
            Err(AnalyticsError::EmptyCompoundSet)
        );
    }

    #[test]
    fn test_extraction_aligns_pairs() {
        let comp = series(&[("a", 1.0, Some(0.2)), ("b", 2.0, None)]);
        let exp = series(&[("b", 2.5, Some(9.0)), ("a", 0.5, None)]);
        let compounds = vec!["b".to_string(), "a".to_string()];
        let paired = extract_paired_values(&compounds, &comp, &exp).unwrap();
        assert_eq!(paired.computed, vec![2.0, 1.0]);
        assert_eq!(paired.computed_uncertainty, vec![0.0, 0.2]);
        assert_eq!(paired.experimental, vec![2.5, 0.5]);
    }

    #[test]
    fn test_negative_uncertainty_rejected() {
        let comp = series(&[("a", 1.0, Some(-0.5)), ("b", 2.0, None)]);
        let compounds = vec!["a".to_string(), "b".to_string()];
        let paired = extract_paired_values(&compounds, &comp, &comp).unwrap();
        assert!(matches!(
            build_samplers(&compounds, &paired),
            Err(AnalyticsError::InvalidUncertainty { .. })
        ));
    }

    #[test]
    fn test_confidence_level_is_not_clamped() {
        let mut engine = StatisticsEngine::new();
        engine.set_confidence_level(1.5);
        assert_eq!(engine.confidence_level(), 1.5);
        assert_eq!(StatisticsEngine::new().confidence_level(), 0.68);
    }
}
