//! Rejection-region analysis for simple-vs-simple discrete tests.

pub mod math;

pub use math::analysis::{
    analyze, analyze_with, discrete_regions, AnalysisError, AnalysisOptions, AnalysisSummary,
    RegionAnalysis, RegionRecord, DEFAULT_MAX_OUTCOMES,
};
pub use math::dominance::{
    dominated_flags, dominated_flags_pairwise, weakly_dominates, DominanceStrategy,
};
pub use math::likelihood::{
    likelihood_ratios, lrt_chain, LikelihoodRatio, LrtChain, LrtRegion, RatioTier,
    DEFAULT_TIE_TOLERANCE,
};
pub use math::metrics::{region_metrics, RegionMetrics};
pub use math::region::{enumerate_regions, Region, Regions, MAX_REGION_OUTCOMES};
