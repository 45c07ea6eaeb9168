//! Property-based tests for np-math region analysis.
//!
//! Uses proptest to check the structural invariants of the region universe,
//! the dominance relation and the likelihood-ratio chain on random
//! distributions.

use np_math::{
    analyze, analyze_with, dominated_flags, enumerate_regions, lrt_chain, region_metrics,
    weakly_dominates, AnalysisOptions, DominanceStrategy, Region, DEFAULT_TIE_TOLERANCE,
};
use proptest::prelude::*;
use std::collections::HashSet;

/// Tolerance for floating point comparisons of summed probabilities.
const TOL: f64 = 1e-9;

/// Strategy for a probability vector of the given length (strictly positive
/// weights, normalized).
fn distribution(n: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.01f64..1.0, n).prop_map(|w| {
        let total: f64 = w.iter().sum();
        w.into_iter().map(|x| x / total).collect()
    })
}

/// A null/alternative pair over the same outcome space.
fn distribution_pair(max_n: usize) -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (1..=max_n).prop_flat_map(|n| (distribution(n), distribution(n)))
}

/// A null/alternative pair whose ratios come from a small palette, so ties
/// are frequent and exact.
fn tied_pair(max_n: usize) -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (1..=max_n).prop_flat_map(|n| {
        (
            prop::collection::vec(1u32..4, n),
            prop::collection::vec(prop::sample::select(vec![0.5f64, 1.0, 2.0]), n),
        )
            .prop_map(|(weights, ratios)| {
                let null: Vec<f64> = weights.iter().map(|&w| w as f64).collect();
                let alt: Vec<f64> = null.iter().zip(&ratios).map(|(p, l)| p * l).collect();
                (null, alt)
            })
    })
}

// ============================================================================
// Region universe
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// 2^n distinct regions, empty first and full last.
    #[test]
    fn universe_is_powerset(n in 0usize..=10) {
        let regions = enumerate_regions(n);
        prop_assert_eq!(regions.len(), 1usize << n);
        let unique: HashSet<Region> = regions.iter().copied().collect();
        prop_assert_eq!(unique.len(), regions.len());
        prop_assert_eq!(regions[0], Region::empty());
        prop_assert_eq!(*regions.last().unwrap(), Region::full(n));
    }
}

// ============================================================================
// Size and power
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// size(R) + size(R^c) = 1 and power(R) + power(R^c) = 1.
    #[test]
    fn complement_sums_to_one((null, alt) in distribution_pair(8)) {
        let n = null.len();
        for region in enumerate_regions(n) {
            let m = region_metrics(region, &null, &alt);
            let c = region_metrics(region.complement(n), &null, &alt);
            prop_assert!((m.size + c.size - 1.0).abs() < TOL,
                "size {} + {} for {}", m.size, c.size, region);
            prop_assert!((m.power + c.power - 1.0).abs() < TOL,
                "power {} + {} for {}", m.power, c.power, region);
        }
    }

    /// Empty region is (0, 0); full region is (1, 1).
    #[test]
    fn endpoints((null, alt) in distribution_pair(8)) {
        let n = null.len();
        let empty = region_metrics(Region::empty(), &null, &alt);
        let full = region_metrics(Region::full(n), &null, &alt);
        prop_assert_eq!(empty.size, 0.0);
        prop_assert_eq!(empty.power, 0.0);
        prop_assert!((full.size - 1.0).abs() < TOL);
        prop_assert!((full.power - 1.0).abs() < TOL);
    }

    /// A ⊆ B implies size(A) <= size(B) and power(A) <= power(B).
    #[test]
    fn monotone_under_inclusion((null, alt) in distribution_pair(6)) {
        let regions = enumerate_regions(null.len());
        for &a in &regions {
            for &b in &regions {
                if a.is_subset_of(b) {
                    let ma = region_metrics(a, &null, &alt);
                    let mb = region_metrics(b, &null, &alt);
                    prop_assert!(ma.size <= mb.size + TOL);
                    prop_assert!(ma.power <= mb.power + TOL);
                }
            }
        }
    }
}

// ============================================================================
// Dominance
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Dominance is irreflexive and antisymmetric.
    #[test]
    fn dominance_irreflexive_antisymmetric(
        a in prop::collection::vec(-1.0f64..1.0, 1..4),
        b in prop::collection::vec(-1.0f64..1.0, 1..4),
    ) {
        prop_assert!(!weakly_dominates(&a, &a));
        if weakly_dominates(&a, &b) {
            prop_assert!(!weakly_dominates(&b, &a));
        }
    }

    /// The sweep and the pairwise loop agree, including on exact duplicates.
    #[test]
    fn strategies_agree(
        coords in prop::collection::vec((0u8..6, 0u8..6), 0..40),
    ) {
        let points: Vec<[f64; 2]> = coords
            .iter()
            .map(|&(x, y)| [x as f64 / 5.0, y as f64 / 5.0])
            .collect();
        prop_assert_eq!(
            dominated_flags(&points, DominanceStrategy::FrontierSweep),
            dominated_flags(&points, DominanceStrategy::Pairwise)
        );
    }

    /// Empty and full regions are never dominated for positive distributions.
    #[test]
    fn endpoints_never_dominated((null, alt) in distribution_pair(7)) {
        let analysis = analyze(&null, &alt).unwrap();
        prop_assert!(!analysis.records.first().unwrap().dominated);
        prop_assert!(!analysis.records.last().unwrap().dominated);
    }

    /// Both strategies give the same analysis on real region sets.
    #[test]
    fn analysis_strategy_independent((null, alt) in distribution_pair(6)) {
        let sweep = analyze(&null, &alt).unwrap();
        let pairwise = analyze_with(
            &null,
            &alt,
            &AnalysisOptions::default().with_dominance(DominanceStrategy::Pairwise),
        ).unwrap();
        prop_assert_eq!(sweep.records, pairwise.records);
    }
}

// ============================================================================
// Likelihood-ratio chain
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Chain runs from empty to full, strictly nested, one tier per step.
    #[test]
    fn chain_is_strictly_nested((null, alt) in distribution_pair(10)) {
        let chain = lrt_chain(&null, &alt, DEFAULT_TIE_TOLERANCE);
        let n = null.len();
        prop_assert_eq!(chain.regions.first().unwrap().region, Region::empty());
        prop_assert_eq!(chain.regions.last().unwrap().region, Region::full(n));
        prop_assert_eq!(chain.regions.len(), chain.tiers.len() + 1);
        for (step, pair) in chain.regions.windows(2).enumerate() {
            let (lo, hi) = (pair[0].region, pair[1].region);
            prop_assert!(lo.is_subset_of(hi) && lo != hi);
            prop_assert_eq!(lo.union(chain.tiers[step].outcomes), hi);
        }
    }

    /// Outcomes with equal ratios are never separated by a chain region.
    #[test]
    fn ties_never_split((null, alt) in tied_pair(9)) {
        let chain = lrt_chain(&null, &alt, 0.0);
        let n = null.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let li = alt[i] / null[i];
                let lj = alt[j] / null[j];
                if li == lj {
                    for entry in &chain.regions {
                        prop_assert_eq!(entry.region.contains(i), entry.region.contains(j),
                            "outcomes {} and {} split by {}", i, j, entry.region);
                    }
                }
            }
        }
    }

    /// Every chain region rejects exactly the outcomes at or above its threshold.
    #[test]
    fn chain_regions_are_thresholds((null, alt) in tied_pair(9)) {
        let chain = lrt_chain(&null, &alt, 0.0);
        for entry in chain.regions.iter().skip(1) {
            let threshold = entry.threshold.unwrap().value();
            for i in 0..null.len() {
                let ratio = alt[i] / null[i];
                prop_assert_eq!(entry.region.contains(i), ratio >= threshold);
            }
        }
    }

    /// Exactly the chain regions are flagged as LRT regions.
    #[test]
    fn lrt_flags_match_chain((null, alt) in distribution_pair(7)) {
        let analysis = analyze(&null, &alt).unwrap();
        let flagged: Vec<Region> = analysis
            .records
            .iter()
            .filter(|r| r.is_lrt)
            .map(|r| r.region)
            .collect();
        prop_assert_eq!(flagged.len(), analysis.lrt_chain.regions.len());
        for region in flagged {
            prop_assert!(analysis.lrt_chain.contains(region));
        }
    }
}
