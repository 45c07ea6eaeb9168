//! Likelihood ratios and the nested family of likelihood-ratio-test regions.
//!
//! By the Neyman-Pearson lemma the most powerful rejection region of a given
//! size rejects exactly the outcomes whose likelihood ratio
//! `l_i = alt[i] / null[i]` exceeds a threshold. Sweeping the threshold from
//! `+inf` down to `0` yields a chain of regions
//!
//! ```text
//! {} = R_0 ⊂ R_1 ⊂ ... ⊂ R_k = full
//! ```
//!
//! where each step adds one *tier*: all outcomes sharing the next-lower ratio.
//! Tied outcomes enter together; a (non-randomized) threshold cannot split them.
//!
//! Outcomes with `null[i] == 0` are impossible under H0, so rejecting on them
//! costs no size. They get the [`LikelihoodRatio::Unbounded`] sentinel, which
//! ranks above every finite ratio and ties with other unbounded ratios.

use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use super::region::Region;

/// Default relative tolerance under which two finite ratios count as tied.
///
/// Ratios such as `0.3 / 0.1` and `0.15 / 0.05` differ in the last bits even
/// though they are mathematically equal.
pub const DEFAULT_TIE_TOLERANCE: f64 = 1e-12;

/// Per-outcome likelihood ratio `alt / null`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LikelihoodRatio {
    /// `alt / null` for `null != 0`.
    Finite(f64),
    /// `null == 0`: the outcome is impossible under H0.
    Unbounded,
}

impl LikelihoodRatio {
    /// Ratio for a single outcome.
    pub fn new(null_p: f64, alt_p: f64) -> Self {
        if null_p == 0.0 {
            LikelihoodRatio::Unbounded
        } else {
            LikelihoodRatio::Finite(alt_p / null_p)
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, LikelihoodRatio::Unbounded)
    }

    /// Numeric value, with `Unbounded` mapped to `+inf`.
    pub fn value(&self) -> f64 {
        match self {
            LikelihoodRatio::Finite(v) => *v,
            LikelihoodRatio::Unbounded => f64::INFINITY,
        }
    }

    /// Total order: `Unbounded` above everything, finite values by `f64::total_cmp`.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (LikelihoodRatio::Unbounded, LikelihoodRatio::Unbounded) => Ordering::Equal,
            (LikelihoodRatio::Unbounded, LikelihoodRatio::Finite(_)) => Ordering::Greater,
            (LikelihoodRatio::Finite(_), LikelihoodRatio::Unbounded) => Ordering::Less,
            (LikelihoodRatio::Finite(a), LikelihoodRatio::Finite(b)) => a.total_cmp(b),
        }
    }

    /// Whether `self` is strictly below `other` by more than `tolerance`
    /// (relative to the larger magnitude).
    pub fn is_strictly_below(&self, other: &Self, tolerance: f64) -> bool {
        match (self, other) {
            (LikelihoodRatio::Unbounded, _) => false,
            (LikelihoodRatio::Finite(_), LikelihoodRatio::Unbounded) => true,
            (LikelihoodRatio::Finite(a), LikelihoodRatio::Finite(b)) => {
                if !(a.is_finite() && b.is_finite()) {
                    return a < b;
                }
                a < b && (b - a) > tolerance * a.abs().max(b.abs())
            }
        }
    }
}

impl fmt::Display for LikelihoodRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LikelihoodRatio::Finite(v) => fmt::Display::fmt(v, f),
            LikelihoodRatio::Unbounded => write!(f, "inf"),
        }
    }
}

impl Serialize for LikelihoodRatio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LikelihoodRatio::Finite(v) => serializer.serialize_f64(*v),
            LikelihoodRatio::Unbounded => serializer.serialize_str("unbounded"),
        }
    }
}

/// Likelihood ratio for every outcome (pairs beyond the shorter slice are ignored).
pub fn likelihood_ratios(null: &[f64], alt: &[f64]) -> Vec<LikelihoodRatio> {
    null.iter()
        .zip(alt)
        .map(|(&p, &q)| LikelihoodRatio::new(p, q))
        .collect()
}

/// Outcomes sharing one likelihood ratio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatioTier {
    /// Smallest ratio within the tier (all members are equal up to tolerance).
    pub ratio: LikelihoodRatio,
    pub outcomes: Region,
}

/// One region of the LRT chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LrtRegion {
    pub region: Region,
    /// Smallest ratio in the region: the region is `{i : l_i >= threshold}`.
    /// `None` for the empty region.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<LikelihoodRatio>,
}

/// The nested family of likelihood-ratio-test regions.
#[derive(Debug, Clone, Serialize)]
pub struct LrtChain {
    pub tiers: Vec<RatioTier>,
    pub regions: Vec<LrtRegion>,
    #[serde(skip)]
    members: HashSet<Region>,
}

impl LrtChain {
    /// Whether `region` is one of the chain's regions.
    pub fn contains(&self, region: Region) -> bool {
        self.members.contains(&region)
    }

    /// LRT flag for each region in `universe`.
    pub fn flags(&self, universe: &[Region]) -> Vec<bool> {
        universe.iter().map(|r| self.contains(*r)).collect()
    }

    /// The chain entry for `region`, if it is an LRT region.
    pub fn find(&self, region: Region) -> Option<&LrtRegion> {
        if !self.contains(region) {
            return None;
        }
        self.regions.iter().find(|r| r.region == region)
    }

    /// Number of regions in the chain (tiers + 1).
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Always false: the chain holds at least the empty region.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Build the LRT chain for `null` vs `alt`.
///
/// Outcomes are sorted by ratio, descending (stable, so ties keep ascending
/// index order), and added one at a time to a working region. A region is
/// emitted only when the next outcome's ratio is strictly lower than the
/// current one by more than `tie_tolerance`, or when the outcomes run out.
///
/// # Panics
/// Panics if there are more than `MAX_REGION_OUTCOMES` outcomes.
pub fn lrt_chain(null: &[f64], alt: &[f64], tie_tolerance: f64) -> LrtChain {
    let ratios = likelihood_ratios(null, alt);

    let mut order: Vec<usize> = (0..ratios.len()).collect();
    order.sort_by(|&i, &j| ratios[j].total_cmp(&ratios[i]));

    let mut tiers = Vec::new();
    let mut regions = vec![LrtRegion {
        region: Region::empty(),
        threshold: None,
    }];

    let mut working = Region::empty();
    let mut tier = Region::empty();
    for (pos, &idx) in order.iter().enumerate() {
        working = working.with(idx);
        tier = tier.with(idx);

        let closes_tier = match order.get(pos + 1) {
            Some(&next) => ratios[next].is_strictly_below(&ratios[idx], tie_tolerance),
            None => true,
        };
        if closes_tier {
            tiers.push(RatioTier {
                ratio: ratios[idx],
                outcomes: tier,
            });
            regions.push(LrtRegion {
                region: working,
                threshold: Some(ratios[idx]),
            });
            tier = Region::empty();
        }
    }

    let members = regions.iter().map(|r| r.region).collect();
    LrtChain {
        tiers,
        regions,
        members,
    }
}
