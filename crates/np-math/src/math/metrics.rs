//! Size and power of a rejection region.

use serde::Serialize;

use super::region::Region;

/// Operating characteristics of one rejection region.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RegionMetrics {
    /// P(reject | H0): the type I error rate.
    pub size: f64,
    /// P(reject | H1): one minus the type II error rate.
    pub power: f64,
}

impl RegionMetrics {
    /// The point used for dominance: `(1 - size, power)`, both "larger is better".
    pub fn dominance_point(&self) -> [f64; 2] {
        [1.0 - self.size, self.power]
    }
}

/// Sum `null` and `alt` over the outcomes of `region`.
///
/// Outcomes are summed in ascending index order with no rounding, so callers
/// comparing against exact values need a small tolerance. Indices outside the
/// distributions contribute nothing.
pub fn region_metrics(region: Region, null: &[f64], alt: &[f64]) -> RegionMetrics {
    let mut size = 0.0;
    let mut power = 0.0;
    for idx in region.indices() {
        if let Some(p) = null.get(idx) {
            size += p;
        }
        if let Some(q) = alt.get(idx) {
            power += q;
        }
    }
    RegionMetrics { size, power }
}
