//! Full rejection-region analysis for a pair of discrete distributions.
//!
//! [`analyze`] enumerates every region of the outcome space, computes its size
//! and power, flags the regions that are Pareto-dominated in
//! `(1 - size, power)`, and flags the regions that are likelihood-ratio-test
//! regions. Records keep the enumeration order (by region size, then
//! lexicographic).
//!
//! # Example
//!
//! ```
//! use np_math::{analyze, Region};
//!
//! let analysis = analyze(&[0.5, 0.5], &[0.9, 0.1]).unwrap();
//! assert_eq!(analysis.records.len(), 4);
//!
//! let only_one = analysis.record(Region::from_indices([1])).unwrap();
//! assert!(only_one.dominated);
//! assert!(!only_one.is_lrt);
//! ```

use serde::Serialize;
use thiserror::Error;

use super::dominance::{dominated_flags, DominanceStrategy};
use super::likelihood::{lrt_chain, LrtChain, DEFAULT_TIE_TOLERANCE};
use super::metrics::{region_metrics, RegionMetrics};
use super::region::{enumerate_regions, Region, MAX_REGION_OUTCOMES};

/// Default cap on the number of outcomes (`2^24` regions).
pub const DEFAULT_MAX_OUTCOMES: usize = 24;

/// Precondition failures, reported before any enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("inputs have to be the same length: null has {null} outcomes, alt has {alt}")]
    LengthMismatch { null: usize, alt: usize },
    #[error("too many outcomes: {outcomes} exceeds the limit of {max}")]
    TooManyOutcomes { outcomes: usize, max: usize },
}

/// Tuning knobs for [`analyze_with`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisOptions {
    pub dominance: DominanceStrategy,
    /// Relative tolerance under which likelihood ratios tie.
    pub tie_tolerance: f64,
    /// Refuse inputs with more outcomes than this (never above 63).
    pub max_outcomes: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            dominance: DominanceStrategy::default(),
            tie_tolerance: DEFAULT_TIE_TOLERANCE,
            max_outcomes: DEFAULT_MAX_OUTCOMES,
        }
    }
}

impl AnalysisOptions {
    pub fn with_dominance(mut self, dominance: DominanceStrategy) -> Self {
        self.dominance = dominance;
        self
    }

    pub fn with_tie_tolerance(mut self, tolerance: f64) -> Self {
        self.tie_tolerance = tolerance;
        self
    }

    pub fn with_max_outcomes(mut self, max_outcomes: usize) -> Self {
        self.max_outcomes = max_outcomes;
        self
    }

    fn outcome_limit(&self) -> usize {
        self.max_outcomes.min(MAX_REGION_OUTCOMES)
    }
}

/// Everything known about one rejection region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegionRecord {
    pub region: Region,
    pub size: f64,
    pub power: f64,
    /// Some other region has no larger size and no smaller power, one strictly.
    pub dominated: bool,
    /// The region is a likelihood-ratio threshold region.
    #[serde(rename = "lrt")]
    pub is_lrt: bool,
}

impl RegionRecord {
    pub fn metrics(&self) -> RegionMetrics {
        RegionMetrics {
            size: self.size,
            power: self.power,
        }
    }

    /// Not dominated by any other region.
    pub fn is_admissible(&self) -> bool {
        !self.dominated
    }
}

/// Counts over a [`RegionAnalysis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AnalysisSummary {
    pub regions: usize,
    pub dominated: usize,
    pub admissible: usize,
    pub lrt: usize,
    /// Admissible regions that no likelihood-ratio threshold produces
    /// (they split a tie between equal-ratio outcomes).
    pub admissible_non_lrt: usize,
}

/// Result of analyzing every rejection region.
#[derive(Debug, Clone, Serialize)]
pub struct RegionAnalysis {
    /// Number of outcomes in the sample space.
    pub outcomes: usize,
    pub dominance: DominanceStrategy,
    /// One record per region, in enumeration order.
    pub records: Vec<RegionRecord>,
    pub lrt_chain: LrtChain,
}

impl RegionAnalysis {
    /// The record for `region`, if it belongs to this outcome space.
    pub fn record(&self, region: Region) -> Option<&RegionRecord> {
        self.records.iter().find(|r| r.region == region)
    }

    /// Non-dominated records sorted by size, then power.
    pub fn frontier(&self) -> Vec<&RegionRecord> {
        let mut frontier: Vec<&RegionRecord> =
            self.records.iter().filter(|r| r.is_admissible()).collect();
        frontier.sort_by(|a, b| {
            a.size
                .total_cmp(&b.size)
                .then_with(|| a.power.total_cmp(&b.power))
        });
        frontier
    }

    /// Records of the likelihood-ratio-test regions, in enumeration order.
    pub fn lrt_records(&self) -> Vec<&RegionRecord> {
        self.records.iter().filter(|r| r.is_lrt).collect()
    }

    pub fn dominated_records(&self) -> Vec<&RegionRecord> {
        self.records.iter().filter(|r| r.dominated).collect()
    }

    pub fn summary(&self) -> AnalysisSummary {
        let mut summary = AnalysisSummary {
            regions: self.records.len(),
            ..Default::default()
        };
        for record in &self.records {
            if record.dominated {
                summary.dominated += 1;
            } else {
                summary.admissible += 1;
                if !record.is_lrt {
                    summary.admissible_non_lrt += 1;
                }
            }
            if record.is_lrt {
                summary.lrt += 1;
            }
        }
        summary
    }
}

/// Analyze all rejection regions with default options.
pub fn analyze(null: &[f64], alt: &[f64]) -> Result<RegionAnalysis, AnalysisError> {
    analyze_with(null, alt, &AnalysisOptions::default())
}

/// Analyze all rejection regions.
///
/// Fails before any enumeration if the distributions differ in length or
/// exceed the outcome limit. Distribution values are not otherwise checked.
pub fn analyze_with(
    null: &[f64],
    alt: &[f64],
    options: &AnalysisOptions,
) -> Result<RegionAnalysis, AnalysisError> {
    check_inputs(null, alt, options)?;

    let universe = enumerate_regions(null.len());
    let metrics: Vec<RegionMetrics> = universe
        .iter()
        .map(|&region| region_metrics(region, null, alt))
        .collect();

    let points: Vec<[f64; 2]> = metrics.iter().map(RegionMetrics::dominance_point).collect();
    let dominated = dominated_flags(&points, options.dominance);

    let chain = lrt_chain(null, alt, options.tie_tolerance);
    let lrt = chain.flags(&universe);

    let records = universe
        .iter()
        .zip(&metrics)
        .zip(dominated.iter().zip(&lrt))
        .map(|((&region, m), (&dominated, &is_lrt))| RegionRecord {
            region,
            size: m.size,
            power: m.power,
            dominated,
            is_lrt,
        })
        .collect();

    Ok(RegionAnalysis {
        outcomes: null.len(),
        dominance: options.dominance,
        records,
        lrt_chain: chain,
    })
}

/// Size and power of every region, without classification.
pub fn discrete_regions(
    null: &[f64],
    alt: &[f64],
    options: &AnalysisOptions,
) -> Result<Vec<(Region, RegionMetrics)>, AnalysisError> {
    check_inputs(null, alt, options)?;
    Ok(enumerate_regions(null.len())
        .into_iter()
        .map(|region| (region, region_metrics(region, null, alt)))
        .collect())
}

fn check_inputs(null: &[f64], alt: &[f64], options: &AnalysisOptions) -> Result<(), AnalysisError> {
    if null.len() != alt.len() {
        return Err(AnalysisError::LengthMismatch {
            null: null.len(),
            alt: alt.len(),
        });
    }
    let max = options.outcome_limit();
    if null.len() > max {
        return Err(AnalysisError::TooManyOutcomes {
            outcomes: null.len(),
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    fn r(indices: &[usize]) -> Region {
        Region::from_indices(indices.iter().copied())
    }

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn test_two_outcome_scenario() {
        let analysis = analyze(&[0.5, 0.5], &[0.9, 0.1]).unwrap();
        let regions: Vec<Region> = analysis.records.iter().map(|r| r.region).collect();
        assert_eq!(regions, vec![r(&[]), r(&[0]), r(&[1]), r(&[0, 1])]);

        let sizes: Vec<f64> = analysis.records.iter().map(|r| r.size).collect();
        let powers: Vec<f64> = analysis.records.iter().map(|r| r.power).collect();
        for (got, want) in sizes.iter().zip([0.0, 0.5, 0.5, 1.0]) {
            assert!(approx_eq(*got, want, TOL));
        }
        for (got, want) in powers.iter().zip([0.0, 0.9, 0.1, 1.0]) {
            assert!(approx_eq(*got, want, TOL));
        }

        let dominated: Vec<bool> = analysis.records.iter().map(|r| r.dominated).collect();
        assert_eq!(dominated, vec![false, false, true, false]);
        let lrt: Vec<bool> = analysis.records.iter().map(|r| r.is_lrt).collect();
        assert_eq!(lrt, vec![true, true, false, true]);
    }

    #[test]
    fn test_three_outcome_scenario() {
        let analysis = analyze(&[0.1, 0.7, 0.2], &[0.2, 0.3, 0.5]).unwrap();
        assert_eq!(analysis.records.len(), 8);
        assert_eq!(analysis.outcomes, 3);
        let empty = analysis.record(Region::empty()).unwrap();
        let full = analysis.record(Region::full(3)).unwrap();
        assert!(!empty.dominated);
        assert!(!full.dominated);
        assert!(empty.is_lrt);
        assert!(full.is_lrt);
    }

    #[test]
    fn test_length_mismatch_fails() {
        let err = analyze(&[0.5, 0.5], &[1.0]).unwrap_err();
        assert_eq!(err, AnalysisError::LengthMismatch { null: 2, alt: 1 });
        assert!(err.to_string().contains("same length"));
    }

    #[test]
    fn test_outcome_limit() {
        let null = vec![0.25; 4];
        let options = AnalysisOptions::default().with_max_outcomes(3);
        let err = analyze_with(&null, &null, &options).unwrap_err();
        assert_eq!(err, AnalysisError::TooManyOutcomes { outcomes: 4, max: 3 });

        // The representation limit caps whatever was configured.
        let options = AnalysisOptions::default().with_max_outcomes(1000);
        let null = vec![0.0; 64];
        let err = analyze_with(&null, &null, &options).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::TooManyOutcomes {
                outcomes: 64,
                max: MAX_REGION_OUTCOMES
            }
        );
    }

    #[test]
    fn test_no_outcomes() {
        let analysis = analyze(&[], &[]).unwrap();
        assert_eq!(analysis.records.len(), 1);
        let only = analysis.records[0];
        assert_eq!(only.region, Region::empty());
        assert_eq!(only.size, 0.0);
        assert!(!only.dominated);
        assert!(only.is_lrt);
    }

    #[test]
    fn test_strategies_agree() {
        let null = [0.1, 0.05, 0.7, 0.15];
        let alt = [0.3, 0.15, 0.4, 0.15];
        let sweep = analyze_with(&null, &alt, &AnalysisOptions::default()).unwrap();
        let pairwise = analyze_with(
            &null,
            &alt,
            &AnalysisOptions::default().with_dominance(DominanceStrategy::Pairwise),
        )
        .unwrap();
        assert_eq!(sweep.records, pairwise.records);
        assert_eq!(pairwise.dominance, DominanceStrategy::Pairwise);
    }

    #[test]
    fn test_tied_ratios_leave_admissible_gaps() {
        let null = [0.1, 0.05, 0.7, 0.15];
        let alt = [0.3, 0.15, 0.4, 0.15];
        let analysis = analyze(&null, &alt).unwrap();

        // {0} splits the tie between outcomes 0 and 1: admissible, not LRT.
        let split = analysis.record(r(&[0])).unwrap();
        assert!(split.is_admissible());
        assert!(!split.is_lrt);

        for record in analysis.lrt_records() {
            assert!(record.is_admissible(), "LRT region {} dominated", record.region);
        }

        let summary = analysis.summary();
        assert_eq!(summary.regions, 16);
        assert_eq!(summary.lrt, 4);
        assert_eq!(summary.dominated + summary.admissible, 16);
        assert!(summary.admissible_non_lrt >= 2);
    }

    #[test]
    fn test_frontier_sorted() {
        let analysis = analyze(&[0.5, 0.5], &[0.9, 0.1]).unwrap();
        let frontier: Vec<Region> = analysis.frontier().iter().map(|r| r.region).collect();
        assert_eq!(frontier, vec![r(&[]), r(&[0]), r(&[0, 1])]);
        assert_eq!(analysis.dominated_records().len(), 1);
    }

    #[test]
    fn test_summary_two_outcomes() {
        let analysis = analyze(&[0.5, 0.5], &[0.9, 0.1]).unwrap();
        assert_eq!(
            analysis.summary(),
            AnalysisSummary {
                regions: 4,
                dominated: 1,
                admissible: 3,
                lrt: 3,
                admissible_non_lrt: 0,
            }
        );
    }

    #[test]
    fn test_discrete_regions_matches_analysis() {
        let null = [0.1, 0.7, 0.2];
        let alt = [0.2, 0.3, 0.5];
        let plain = discrete_regions(&null, &alt, &AnalysisOptions::default()).unwrap();
        let full = analyze(&null, &alt).unwrap();
        assert_eq!(plain.len(), full.records.len());
        for ((region, metrics), record) in plain.iter().zip(&full.records) {
            assert_eq!(*region, record.region);
            assert_eq!(*metrics, record.metrics());
        }
        assert!(discrete_regions(&null, &alt[..2], &AnalysisOptions::default()).is_err());
    }

    #[test]
    fn test_serialized_record_shape() {
        let analysis = analyze(&[0.5, 0.5], &[0.9, 0.1]).unwrap();
        let json = serde_json::to_value(&analysis).unwrap();
        let rec = &json["records"][2];
        assert_eq!(rec["region"], serde_json::json!([1]));
        assert_eq!(rec["dominated"], true);
        assert_eq!(rec["lrt"], false);
        assert_eq!(json["dominance"], "frontier_sweep");
    }
}
