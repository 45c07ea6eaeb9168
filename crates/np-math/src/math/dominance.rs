//! Weak Pareto dominance over operating points.
//!
//! A point `a` weakly dominates `b` when it is no worse in every coordinate and
//! strictly better in at least one. For rejection regions the points are
//! `(1 - size, power)`, so a region is dominated when another region has no
//! larger size and no smaller power, with at least one strict improvement.
//!
//! Two strategies are provided and always agree:
//! - [`DominanceStrategy::Pairwise`]: every point against every point, `O(R^2)`.
//! - [`DominanceStrategy::FrontierSweep`]: sort once and sweep, `O(R log R)`.
//!
//! Points with a NaN coordinate are incomparable: they neither dominate nor
//! are dominated.

use serde::{Deserialize, Serialize};

/// How to compute dominance flags for a point set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DominanceStrategy {
    /// Sort by the first coordinate and sweep the second.
    #[default]
    FrontierSweep,
    /// Compare every pair of points.
    Pairwise,
}

impl std::fmt::Display for DominanceStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DominanceStrategy::FrontierSweep => write!(f, "frontier_sweep"),
            DominanceStrategy::Pairwise => write!(f, "pairwise"),
        }
    }
}

/// Returns true if `a[j] >= b[j]` for every `j` and `a[j] > b[j]` for some `j`.
///
/// Tuples of different (or zero) length never dominate. A NaN coordinate on
/// either side makes the pair incomparable.
#[allow(clippy::neg_cmp_op_on_partial_ord)]
pub fn weakly_dominates(a: &[f64], b: &[f64]) -> bool {
    if a.len() != b.len() || a.is_empty() {
        return false;
    }
    let mut any_strict = false;
    for (x, y) in a.iter().zip(b) {
        // Written as a negated >= so NaN short-circuits to "not dominating".
        if !(x >= y) {
            return false;
        }
        if x > y {
            any_strict = true;
        }
    }
    any_strict
}

/// One flag per point: true iff some point in the set weakly dominates it.
pub fn dominated_flags(points: &[[f64; 2]], strategy: DominanceStrategy) -> Vec<bool> {
    match strategy {
        DominanceStrategy::Pairwise => dominated_flags_pairwise(points),
        DominanceStrategy::FrontierSweep => dominated_flags_sweep(points),
    }
}

/// Pairwise dominance flags for points of any fixed dimension.
///
/// The candidate is included in its own comparison set; self-comparison never
/// registers because it cannot produce a strict inequality.
pub fn dominated_flags_pairwise<P: AsRef<[f64]>>(points: &[P]) -> Vec<bool> {
    points
        .iter()
        .map(|candidate| {
            points
                .iter()
                .any(|other| weakly_dominates(other.as_ref(), candidate.as_ref()))
        })
        .collect()
}

fn dominated_flags_sweep(points: &[[f64; 2]]) -> Vec<bool> {
    let mut flags = vec![false; points.len()];

    let mut order: Vec<usize> = (0..points.len())
        .filter(|&i| !points[i][0].is_nan() && !points[i][1].is_nan())
        .collect();
    order.sort_by(|&i, &j| points[j][0].total_cmp(&points[i][0]));

    // Largest second coordinate among points with a strictly larger first one.
    let mut best_above: Option<f64> = None;
    let mut start = 0;
    while start < order.len() {
        let x = points[order[start]][0];
        let mut end = start + 1;
        while end < order.len() && points[order[end]][0] == x {
            end += 1;
        }
        let group = &order[start..end];

        let group_max = group
            .iter()
            .map(|&i| points[i][1])
            .fold(f64::NEG_INFINITY, f64::max);

        for &i in group {
            let y = points[i][1];
            let beaten_from_above = best_above.is_some_and(|best| best >= y);
            let beaten_alongside = group_max > y;
            flags[i] = beaten_from_above || beaten_alongside;
        }

        best_above = Some(best_above.map_or(group_max, |best| best.max(group_max)));
        start = end;
    }

    flags
}
