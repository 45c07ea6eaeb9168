//! Payload renderers for the non-JSON output formats.
//!
//! JSON output serializes the report structs directly; everything here is
//! for humans (`md`, `summary`) or line-oriented tooling (`jsonl`).

use std::fmt::Write;

use np_math::{LikelihoodRatio, RegionRecord};
use serde::Serialize;

use crate::pipeline::{AnalysisReport, CheckReport, ProblemSummary, RecordFilter, RegionsReport};

/// Probabilities are printed with a fixed precision so tables line up.
fn prob(value: f64) -> String {
    format!("{:.6}", value)
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn threshold(ratio: Option<&LikelihoodRatio>) -> String {
    match ratio {
        Some(r) if r.is_unbounded() => "inf".to_string(),
        Some(r) => format!("{:.6}", r.value()),
        None => "-".to_string(),
    }
}

fn problem_header(out: &mut String, title: &str, problem: &ProblemSummary) {
    match &problem.label {
        Some(label) => {
            let _ = writeln!(out, "# {}: {}", title, label);
        }
        None => {
            let _ = writeln!(out, "# {}", title);
        }
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "- outcomes: {}", problem.outcomes);
    let _ = writeln!(out, "- null: {}", vector(&problem.null));
    let _ = writeln!(out, "- alt: {}", vector(&problem.alt));
}

fn vector(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

fn warnings_section<W: std::fmt::Display>(out: &mut String, warnings: &[W]) {
    if warnings.is_empty() {
        return;
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "## Warnings");
    let _ = writeln!(out);
    for warning in warnings {
        let _ = writeln!(out, "- {}", warning);
    }
}

/// One JSON object per line.
fn json_lines<T: Serialize>(items: impl IntoIterator<Item = T>) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    for item in items {
        out.push_str(&serde_json::to_string(&item)?);
        out.push('\n');
    }
    Ok(out)
}

/// The region table: region, size, power, dominated, lrt.
pub fn records_table(records: &[RegionRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "| region | size | power | dominated | lrt |");
    let _ = writeln!(out, "|---|---:|---:|:---:|:---:|");
    for r in records {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} |",
            r.region,
            prob(r.size),
            prob(r.power),
            yes_no(r.dominated),
            yes_no(r.is_lrt)
        );
    }
    out
}

pub fn analysis_markdown(report: &AnalysisReport) -> String {
    let mut out = String::new();
    problem_header(&mut out, "Region analysis", &report.problem);
    let _ = writeln!(out, "- dominance: {}", report.analysis.dominance);
    if report.filter != RecordFilter::All {
        let _ = writeln!(out, "- showing: {}", report.filter);
    }
    let _ = writeln!(out);
    out.push_str(&records_table(&report.analysis.records));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", analysis_summary(report));
    warnings_section(&mut out, &report.warnings);
    out
}

/// One-line counts over every region.
pub fn analysis_summary(report: &AnalysisReport) -> String {
    let s = &report.summary;
    format!(
        "{} regions over {} outcomes: {} dominated, {} admissible ({} not LRT), {} LRT",
        s.regions, report.analysis.outcomes, s.dominated, s.admissible, s.admissible_non_lrt, s.lrt
    )
}

#[derive(Serialize)]
struct RecordLine<'a> {
    run_id: &'a str,
    #[serde(flatten)]
    record: &'a RegionRecord,
}

/// One region record per line, tagged with the run id.
pub fn analysis_jsonl(report: &AnalysisReport) -> Result<String, serde_json::Error> {
    json_lines(report.analysis.records.iter().map(|record| RecordLine {
        run_id: &report.run_id,
        record,
    }))
}

pub fn regions_markdown(report: &RegionsReport) -> String {
    let mut out = String::new();
    problem_header(&mut out, "Regions", &report.problem);
    let _ = writeln!(out);
    let _ = writeln!(out, "| region | size | power |");
    let _ = writeln!(out, "|---|---:|---:|");
    for row in &report.regions {
        let _ = writeln!(
            out,
            "| {} | {} | {} |",
            row.region,
            prob(row.size),
            prob(row.power)
        );
    }
    warnings_section(&mut out, &report.warnings);
    out
}

pub fn regions_summary(report: &RegionsReport) -> String {
    format!(
        "{} regions over {} outcomes",
        report.regions.len(),
        report.problem.outcomes
    )
}

pub fn regions_jsonl(report: &RegionsReport) -> Result<String, serde_json::Error> {
    json_lines(&report.regions)
}

/// Ratio tiers followed by the nested chain of LRT regions.
pub fn lrt_markdown(report: &AnalysisReport) -> String {
    let chain = &report.analysis.lrt_chain;
    let mut out = String::new();
    problem_header(&mut out, "Likelihood-ratio regions", &report.problem);

    let _ = writeln!(out);
    let _ = writeln!(out, "## Tiers");
    let _ = writeln!(out);
    let _ = writeln!(out, "| tier | ratio | outcomes |");
    let _ = writeln!(out, "|---:|---:|---|");
    for (i, tier) in chain.tiers.iter().enumerate() {
        let _ = writeln!(
            out,
            "| {} | {} | {} |",
            i + 1,
            threshold(Some(&tier.ratio)),
            tier.outcomes
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "## Chain");
    let _ = writeln!(out);
    let _ = writeln!(out, "| region | threshold | size | power |");
    let _ = writeln!(out, "|---|---:|---:|---:|");
    for lrt in &chain.regions {
        let (size, power) = report
            .analysis
            .record(lrt.region)
            .map(|r| (prob(r.size), prob(r.power)))
            .unwrap_or_else(|| ("-".to_string(), "-".to_string()));
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} |",
            lrt.region,
            threshold(lrt.threshold.as_ref()),
            size,
            power
        );
    }
    warnings_section(&mut out, &report.warnings);
    out
}

pub fn lrt_summary(report: &AnalysisReport) -> String {
    let chain = &report.analysis.lrt_chain;
    format!(
        "{} ratio tiers, {} LRT regions over {} outcomes",
        chain.tiers.len(),
        chain.len(),
        report.analysis.outcomes
    )
}

pub fn lrt_jsonl(report: &AnalysisReport) -> Result<String, serde_json::Error> {
    json_lines(&report.analysis.lrt_chain.regions)
}

pub fn check_markdown(report: &CheckReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Check: {}", report.status());
    let _ = writeln!(out);
    match &report.settings_path {
        Some(path) => {
            let _ = writeln!(out, "- settings: {} ({})", path, report.settings_source);
        }
        None => {
            let _ = writeln!(out, "- settings: {}", report.settings_source);
        }
    }
    if let Some(problem) = &report.problem {
        let _ = writeln!(out, "- outcomes: {}", problem.outcomes);
    }
    warnings_section(&mut out, &report.warnings);
    out
}

pub fn check_summary(report: &CheckReport) -> String {
    if report.warnings.is_empty() {
        "check ok".to_string()
    } else {
        format!("check passed with {} warning(s)", report.warnings.len())
    }
}
