//! Fuzz target for region analysis on arbitrary (possibly invalid) vectors.
//!
//! The analysis accepts unnormalized, negative and non-finite values; it must
//! either return an error or a consistent report.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use np_math::{analyze_with, AnalysisOptions, DominanceStrategy};

#[derive(Debug, Arbitrary)]
struct Input {
    null: Vec<f64>,
    alt: Vec<f64>,
    pairwise: bool,
}

fuzz_target!(|input: Input| {
    let strategy = if input.pairwise {
        DominanceStrategy::Pairwise
    } else {
        DominanceStrategy::FrontierSweep
    };
    let options = AnalysisOptions::default()
        .with_dominance(strategy)
        .with_max_outcomes(10);

    if let Ok(analysis) = analyze_with(&input.null, &input.alt, &options) {
        assert_eq!(analysis.records.len(), 1usize << input.null.len());
        // The empty and full regions always belong to the LRT chain.
        assert!(analysis.records[0].is_lrt);
        assert!(analysis.records[analysis.records.len() - 1].is_lrt);
    }
});
