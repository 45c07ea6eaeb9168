//! Analysis pipeline: validate → enumerate → classify → report.
//!
//! Every command that produces a payload goes through here so that logging,
//! validation policy and snapshots behave the same way everywhere.

use chrono::{DateTime, Utc};
use np_common::{Error, SCHEMA_VERSION};
use np_config::validate::{validate_problem, validate_settings};
use np_config::{ConfigSnapshot, DominanceMethod, Problem, Settings, ValidationWarning};
use np_math::{
    analyze_with, discrete_regions, AnalysisSummary, Region, RegionAnalysis, RegionRecord,
};
use serde::Serialize;

use crate::config::{LoadedProblem, ResolvedSettings};
use crate::log_event;
use crate::logging::{event_names, LogContext, Stage};

/// Which records a command reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordFilter {
    #[default]
    All,
    /// Regions some other region weakly dominates.
    Dominated,
    /// Regions nothing dominates.
    Admissible,
    /// Likelihood-ratio threshold regions.
    Lrt,
}

impl RecordFilter {
    pub fn keeps(self, record: &RegionRecord) -> bool {
        match self {
            RecordFilter::All => true,
            RecordFilter::Dominated => record.dominated,
            RecordFilter::Admissible => record.is_admissible(),
            RecordFilter::Lrt => record.is_lrt,
        }
    }
}

impl std::fmt::Display for RecordFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordFilter::All => write!(f, "all"),
            RecordFilter::Dominated => write!(f, "dominated"),
            RecordFilter::Admissible => write!(f, "admissible"),
            RecordFilter::Lrt => write!(f, "lrt"),
        }
    }
}

/// The problem as echoed in reports.
#[derive(Debug, Clone, Serialize)]
pub struct ProblemSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub outcomes: usize,
    pub null: Vec<f64>,
    pub alt: Vec<f64>,
}

impl From<&Problem> for ProblemSummary {
    fn from(problem: &Problem) -> Self {
        ProblemSummary {
            label: problem.label.clone(),
            outcomes: problem.outcomes(),
            null: problem.null.clone(),
            alt: problem.alt.clone(),
        }
    }
}

/// Full analysis payload.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub schema_version: String,
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub problem: ProblemSummary,
    pub config: ConfigSnapshot,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ValidationWarning>,
    /// Counts over every region, independent of any record filter.
    pub summary: AnalysisSummary,
    /// Filter applied to `records`.
    pub filter: RecordFilter,
    #[serde(flatten)]
    pub analysis: RegionAnalysis,
}

impl AnalysisReport {
    /// Drop records the filter rejects. The summary keeps the full counts.
    pub fn retain(&mut self, filter: RecordFilter) {
        self.analysis.records.retain(|r| filter.keeps(r));
        self.filter = filter;
    }

    /// Replace the records with the frontier, sorted by size then power.
    pub fn into_frontier(mut self) -> Self {
        let frontier: Vec<RegionRecord> = self.analysis.frontier().into_iter().copied().collect();
        self.analysis.records = frontier;
        self.filter = RecordFilter::Admissible;
        self
    }
}

/// One row of the size/power table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegionRow {
    pub region: Region,
    pub size: f64,
    pub power: f64,
}

/// Size/power payload without classification.
#[derive(Debug, Clone, Serialize)]
pub struct RegionsReport {
    pub schema_version: String,
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub problem: ProblemSummary,
    pub config: ConfigSnapshot,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ValidationWarning>,
    pub regions: Vec<RegionRow>,
}

/// Outcome of validating settings and, optionally, a problem.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub schema_version: String,
    pub run_id: String,
    pub settings_source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<ProblemSummary>,
    pub warnings: Vec<ValidationWarning>,
}

impl CheckReport {
    pub fn status(&self) -> &'static str {
        if self.warnings.is_empty() {
            "ok"
        } else {
            "warnings"
        }
    }
}

/// Validated inputs ready for analysis.
struct Prepared {
    settings: Settings,
    warnings: Vec<ValidationWarning>,
}

fn prepare(
    ctx: &LogContext,
    resolved: &ResolvedSettings,
    loaded: &LoadedProblem,
    dominance: Option<DominanceMethod>,
) -> Result<Prepared, Error> {
    let mut settings = resolved.settings.clone();
    if let Some(method) = dominance {
        settings.dominance = method;
    }

    if let Err(err) = validate_settings(&settings) {
        log_event!(
            ctx,
            ERROR,
            event_names::VALIDATE_FAILED,
            Stage::Validate,
            "Settings rejected",
            reason = err.to_string()
        );
        return Err(err.into());
    }

    let warnings = match validate_problem(&loaded.problem, &settings.validation) {
        Ok(warnings) => warnings,
        Err(err) => {
            log_event!(
                ctx,
                ERROR,
                event_names::VALIDATE_FAILED,
                Stage::Validate,
                "Problem rejected",
                reason = err.to_string()
            );
            return Err(err.into());
        }
    };

    for warning in &warnings {
        log_event!(
            ctx,
            WARN,
            event_names::VALIDATE_WARNING,
            Stage::Validate,
            "Distribution check failed",
            field = warning.field.to_string(),
            detail = warning.message.to_string()
        );
    }

    Ok(Prepared { settings, warnings })
}

fn snapshot(resolved: &ResolvedSettings, settings: &Settings, loaded: &LoadedProblem) -> ConfigSnapshot {
    ConfigSnapshot::new(
        settings,
        &resolved.path,
        resolved.raw.as_deref(),
        &loaded.problem,
        &loaded.origin,
        loaded.raw.as_deref(),
    )
}

/// Run the full analysis: every region with size, power, dominance and LRT
/// flags, plus the LRT chain.
pub fn run_analysis(
    ctx: &LogContext,
    resolved: &ResolvedSettings,
    loaded: &LoadedProblem,
    dominance: Option<DominanceMethod>,
) -> Result<AnalysisReport, Error> {
    let Prepared { settings, warnings } = prepare(ctx, resolved, loaded, dominance)?;
    let options = settings.analysis_options();
    let problem = &loaded.problem;

    let analysis = analyze_with(&problem.null, &problem.alt, &options)?;
    log_event!(
        ctx,
        DEBUG,
        event_names::ENUMERATE_FINISHED,
        Stage::Enumerate,
        "Regions enumerated",
        outcomes = problem.outcomes() as u64,
        regions = analysis.records.len() as u64
    );

    let summary = analysis.summary();
    log_event!(
        ctx,
        INFO,
        event_names::CLASSIFY_FINISHED,
        Stage::Classify,
        "Regions classified",
        dominance = options.dominance.to_string(),
        dominated = summary.dominated as u64,
        admissible = summary.admissible as u64,
        lrt = summary.lrt as u64,
        admissible_non_lrt = summary.admissible_non_lrt as u64
    );

    Ok(AnalysisReport {
        schema_version: SCHEMA_VERSION.to_string(),
        run_id: ctx.run_id.clone(),
        generated_at: Utc::now(),
        problem: ProblemSummary::from(problem),
        config: snapshot(resolved, &settings, loaded),
        warnings,
        summary,
        filter: RecordFilter::All,
        analysis,
    })
}

/// Size and power of every region, without dominance or LRT flags.
pub fn run_regions(
    ctx: &LogContext,
    resolved: &ResolvedSettings,
    loaded: &LoadedProblem,
) -> Result<RegionsReport, Error> {
    let Prepared { settings, warnings } = prepare(ctx, resolved, loaded, None)?;
    let problem = &loaded.problem;

    let regions: Vec<RegionRow> =
        discrete_regions(&problem.null, &problem.alt, &settings.analysis_options())?
            .into_iter()
            .map(|(region, m)| RegionRow {
                region,
                size: m.size,
                power: m.power,
            })
            .collect();
    log_event!(
        ctx,
        DEBUG,
        event_names::ENUMERATE_FINISHED,
        Stage::Enumerate,
        "Regions enumerated",
        outcomes = problem.outcomes() as u64,
        regions = regions.len() as u64
    );

    Ok(RegionsReport {
        schema_version: SCHEMA_VERSION.to_string(),
        run_id: ctx.run_id.clone(),
        generated_at: Utc::now(),
        problem: ProblemSummary::from(problem),
        config: snapshot(resolved, &settings, loaded),
        warnings,
        regions,
    })
}

/// Validate settings and, if given, a problem. Strict-mode distribution
/// failures and length mismatches are errors; everything else is a warning.
pub fn run_check(
    ctx: &LogContext,
    resolved: &ResolvedSettings,
    loaded: Option<&LoadedProblem>,
) -> Result<CheckReport, Error> {
    let warnings = match loaded {
        Some(loaded) => prepare(ctx, resolved, loaded, None)?.warnings,
        None => {
            validate_settings(&resolved.settings)?;
            Vec::new()
        }
    };

    Ok(CheckReport {
        schema_version: SCHEMA_VERSION.to_string(),
        run_id: ctx.run_id.clone(),
        settings_source: resolved.path.source.to_string(),
        settings_path: resolved
            .path
            .path
            .as_ref()
            .map(|p| p.display().to_string()),
        problem: loaded.map(|l| ProblemSummary::from(&l.problem)),
        warnings,
    })
}
