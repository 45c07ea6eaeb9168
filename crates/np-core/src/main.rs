//! Region Explorer Core
//!
//! The main entry point for np-core, handling:
//! - Settings and problem loading
//! - Enumeration of every rejection region with its size and power
//! - Dominance and likelihood-ratio classification
//! - Report rendering (JSON, Markdown, JSONL, summary)

use clap::{Args, Parser, Subcommand};
use np_common::{format_error_human, Error, OutputFormat, StructuredError, SCHEMA_VERSION};
use np_config::snapshot::hash_content;
use np_config::validate::validate_settings;
use np_core::config::{
    load_problem, load_settings, ConfigOptions, DominanceMethod, LoadedProblem, ProblemInput,
    ResolvedSettings,
};
use np_core::exit_codes::ExitCode;
use np_core::pipeline::{self, CheckReport, RecordFilter};
use np_core::{render, schema};
use serde::Serialize;
use std::io::IsTerminal;
use std::path::PathBuf;

/// Neyman-Pearson region explorer: size, power, dominance and LRT regions
/// for simple-vs-simple discrete tests
#[derive(Parser)]
#[command(name = "np-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Override config directory
    #[arg(long, global = true, env = "NP_CONFIG_DIR")]
    config: Option<PathBuf>,

    /// Explicit settings file
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

impl GlobalOpts {
    fn config_options(&self) -> ConfigOptions {
        ConfigOptions {
            config_dir: self.config.clone(),
            settings_path: self.settings.clone(),
        }
    }

    fn use_color(&self) -> bool {
        !self.no_color && std::io::stderr().is_terminal()
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Every region with size, power, dominance and LRT flags
    Analyze(AnalyzeArgs),

    /// Size and power of every region, unclassified
    Regions(ProblemArgs),

    /// Non-dominated regions sorted by size
    Frontier(FrontierArgs),

    /// Likelihood-ratio tiers and the chain of LRT regions
    Lrt(ProblemArgs),

    /// Validate settings and, optionally, a problem
    Check(ProblemArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Print version information
    Version,
}

// ============================================================================
// Command argument structs
// ============================================================================

/// Where the null and alternative distributions come from.
#[derive(Args, Debug, Clone)]
struct ProblemArgs {
    /// Null distribution as a comma-separated list
    #[arg(long, requires = "alt", allow_hyphen_values = true)]
    null: Option<String>,

    /// Alternative distribution as a comma-separated list
    #[arg(long, requires = "null", allow_hyphen_values = true)]
    alt: Option<String>,

    /// Problem file (JSON)
    #[arg(long, conflicts_with_all = ["null", "alt", "demo"])]
    problem: Option<PathBuf>,

    /// Use the built-in four-outcome example
    #[arg(long, conflicts_with_all = ["null", "alt"])]
    demo: bool,
}

impl ProblemArgs {
    fn input(&self) -> Option<ProblemInput> {
        if let Some(path) = &self.problem {
            return Some(ProblemInput::File(path.clone()));
        }
        if self.demo {
            return Some(ProblemInput::Demo);
        }
        match (&self.null, &self.alt) {
            (Some(null), Some(alt)) => Some(ProblemInput::Inline {
                null: null.clone(),
                alt: alt.clone(),
            }),
            _ => None,
        }
    }
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    #[command(flatten)]
    problem: ProblemArgs,

    /// Which regions to report
    #[arg(long, default_value = "all")]
    only: RecordFilter,

    /// Override the dominance method from settings
    #[arg(long)]
    dominance: Option<DominanceMethod>,
}

#[derive(Args, Debug)]
struct FrontierArgs {
    #[command(flatten)]
    problem: ProblemArgs,

    /// Override the dominance method from settings
    #[arg(long)]
    dominance: Option<DominanceMethod>,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show the effective settings and where they came from
    Show,
    /// Validate a settings file (default: the resolved one)
    Validate {
        /// Settings file to validate
        path: Option<PathBuf>,
    },
    /// Print JSON schema for input files (lists types without a name)
    Schema {
        /// Type to print (Problem, Settings, ConfigSnapshot, ...)
        name: Option<String>,
    },
}

use np_core::log_event;
use np_core::logging::{
    event_names, generate_run_id, init_logging, LogConfig, LogContext, LogFormat, LogLevel, Stage,
};

// ============================================================================
// Main entry point
// ============================================================================

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            let code = if err.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            std::process::exit(code.as_i32());
        }
    };

    let log_level = LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet);
    // Machine-readable stdout gets machine-readable stderr
    let log_format = cli.global.format.is_machine().then_some(LogFormat::Jsonl);
    let log_config = LogConfig::from_env(log_level, log_format).with_color(!cli.global.no_color);
    init_logging(&log_config);

    let ctx = LogContext::new(generate_run_id());
    log_event!(
        ctx,
        DEBUG,
        event_names::RUN_STARTED,
        Stage::Init,
        "np-core starting",
        format = cli.global.format.to_string()
    );

    let exit_code = match &cli.command {
        Commands::Analyze(args) => run_analyze(&cli.global, &ctx, args),
        Commands::Regions(args) => run_regions(&cli.global, &ctx, args),
        Commands::Frontier(args) => run_frontier(&cli.global, &ctx, args),
        Commands::Lrt(args) => run_lrt(&cli.global, &ctx, args),
        Commands::Check(args) => run_check(&cli.global, &ctx, args),
        Commands::Config(args) => run_config(&cli.global, &ctx, args),
        Commands::Version => {
            print_version(&cli.global);
            ExitCode::Clean
        }
    };

    log_event!(
        ctx,
        DEBUG,
        event_names::RUN_FINISHED,
        Stage::Render,
        "np-core finished",
        exit_code = exit_code.as_i32() as i64,
        elapsed_ms = ctx.elapsed_ms()
    );
    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Input loading
// ============================================================================

fn resolve_settings(global: &GlobalOpts, ctx: &LogContext) -> Result<ResolvedSettings, Error> {
    match load_settings(&global.config_options()) {
        Ok(resolved) => {
            match &resolved.path.path {
                Some(path) => log_event!(
                    ctx,
                    DEBUG,
                    event_names::CONFIG_LOADED,
                    Stage::Load,
                    "Settings loaded",
                    path = path.display().to_string(),
                    source = resolved.path.source.to_string()
                ),
                None => log_event!(
                    ctx,
                    DEBUG,
                    event_names::CONFIG_DEFAULT_USED,
                    Stage::Load,
                    "Using built-in settings"
                ),
            }
            Ok(resolved)
        }
        Err(err) => {
            log_event!(
                ctx,
                ERROR,
                event_names::CONFIG_ERROR,
                Stage::Load,
                "Settings could not be loaded",
                reason = err.to_string()
            );
            Err(err.into())
        }
    }
}

fn resolve_problem(ctx: &LogContext, input: &ProblemInput) -> Result<LoadedProblem, Error> {
    let loaded = load_problem(input)?;
    log_event!(
        ctx,
        DEBUG,
        event_names::PROBLEM_LOADED,
        Stage::Load,
        "Problem loaded",
        origin = loaded.origin.to_string(),
        outcomes = loaded.problem.outcomes() as u64
    );
    Ok(loaded)
}

fn load_inputs(
    global: &GlobalOpts,
    ctx: &LogContext,
    args: &ProblemArgs,
) -> Result<(ResolvedSettings, LoadedProblem), Error> {
    let input = args.input().ok_or_else(|| {
        Error::MissingInput("give --null and --alt, --problem <file>, or --demo".to_string())
    })?;
    let resolved = resolve_settings(global, ctx)?;
    let loaded = resolve_problem(ctx, &input)?;
    Ok((resolved, loaded))
}

// ============================================================================
// Output helpers
// ============================================================================

/// Renderers for one payload type.
struct Renderers<T> {
    markdown: fn(&T) -> String,
    summary: fn(&T) -> String,
    jsonl: fn(&T) -> Result<String, serde_json::Error>,
}

fn emit<T: Serialize>(
    global: &GlobalOpts,
    ctx: &LogContext,
    payload: &T,
    renderers: Renderers<T>,
) -> ExitCode {
    let written = match global.format {
        OutputFormat::Json => serde_json::to_string_pretty(payload).map(|s| println!("{}", s)),
        OutputFormat::Jsonl => (renderers.jsonl)(payload).map(|s| print!("{}", s)),
        OutputFormat::Md => {
            print!("{}", (renderers.markdown)(payload));
            Ok(())
        }
        OutputFormat::Summary => {
            println!("{}", (renderers.summary)(payload));
            Ok(())
        }
        OutputFormat::Exitcode => Ok(()),
    };

    if let Err(err) = written {
        return output_error(global, ctx, &Error::Json(err));
    }
    log_event!(
        ctx,
        DEBUG,
        event_names::RENDER_FINISHED,
        Stage::Render,
        "Payload written",
        format = global.format.to_string()
    );
    ExitCode::Clean
}

/// Write an error to stderr in the requested format and map it to an exit code.
fn output_error(global: &GlobalOpts, ctx: &LogContext, err: &Error) -> ExitCode {
    let exit_code = ExitCode::from(err);
    if exit_code.is_internal_error() {
        log_event!(
            ctx,
            ERROR,
            event_names::INTERNAL_ERROR,
            Stage::Render,
            "Command failed",
            code = err.code() as u64,
            reason = err.to_string()
        );
    }

    match global.format {
        OutputFormat::Json => {
            let structured = StructuredError::from(err).with_context("run_id", &ctx.run_id);
            eprintln!("{}", structured.to_json_pretty());
        }
        OutputFormat::Jsonl => {
            let structured = StructuredError::from(err).with_context("run_id", &ctx.run_id);
            eprintln!("{}", structured.to_json());
        }
        OutputFormat::Exitcode => {}
        OutputFormat::Md | OutputFormat::Summary => {
            eprintln!("{}", format_error_human(err, global.use_color()));
        }
    }

    exit_code
}

// ============================================================================
// Command implementations
// ============================================================================

fn run_analyze(global: &GlobalOpts, ctx: &LogContext, args: &AnalyzeArgs) -> ExitCode {
    let result = load_inputs(global, ctx, &args.problem).and_then(|(resolved, loaded)| {
        pipeline::run_analysis(ctx, &resolved, &loaded, args.dominance)
    });

    match result {
        Ok(mut report) => {
            report.retain(args.only);
            emit(
                global,
                ctx,
                &report,
                Renderers {
                    markdown: render::analysis_markdown,
                    summary: render::analysis_summary,
                    jsonl: render::analysis_jsonl,
                },
            )
        }
        Err(err) => output_error(global, ctx, &err),
    }
}

fn run_regions(global: &GlobalOpts, ctx: &LogContext, args: &ProblemArgs) -> ExitCode {
    let result = load_inputs(global, ctx, args)
        .and_then(|(resolved, loaded)| pipeline::run_regions(ctx, &resolved, &loaded));

    match result {
        Ok(report) => emit(
            global,
            ctx,
            &report,
            Renderers {
                markdown: render::regions_markdown,
                summary: render::regions_summary,
                jsonl: render::regions_jsonl,
            },
        ),
        Err(err) => output_error(global, ctx, &err),
    }
}

fn run_frontier(global: &GlobalOpts, ctx: &LogContext, args: &FrontierArgs) -> ExitCode {
    let result = load_inputs(global, ctx, &args.problem).and_then(|(resolved, loaded)| {
        pipeline::run_analysis(ctx, &resolved, &loaded, args.dominance)
    });

    match result {
        Ok(report) => emit(
            global,
            ctx,
            &report.into_frontier(),
            Renderers {
                markdown: render::analysis_markdown,
                summary: render::analysis_summary,
                jsonl: render::analysis_jsonl,
            },
        ),
        Err(err) => output_error(global, ctx, &err),
    }
}

fn run_lrt(global: &GlobalOpts, ctx: &LogContext, args: &ProblemArgs) -> ExitCode {
    let result = load_inputs(global, ctx, args)
        .and_then(|(resolved, loaded)| pipeline::run_analysis(ctx, &resolved, &loaded, None));

    match result {
        Ok(mut report) => {
            report.retain(RecordFilter::Lrt);
            emit(
                global,
                ctx,
                &report,
                Renderers {
                    markdown: render::lrt_markdown,
                    summary: render::lrt_summary,
                    jsonl: render::lrt_jsonl,
                },
            )
        }
        Err(err) => output_error(global, ctx, &err),
    }
}

fn run_check(global: &GlobalOpts, ctx: &LogContext, args: &ProblemArgs) -> ExitCode {
    let result = resolve_settings(global, ctx).and_then(|resolved| {
        let loaded = args
            .input()
            .map(|input| resolve_problem(ctx, &input))
            .transpose()?;
        pipeline::run_check(ctx, &resolved, loaded.as_ref())
    });

    let report = match result {
        Ok(report) => report,
        Err(err) => return output_error(global, ctx, &err),
    };

    let code = emit(
        global,
        ctx,
        &report,
        Renderers {
            markdown: render::check_markdown,
            summary: render::check_summary,
            jsonl: check_jsonl,
        },
    );
    if code.is_success() && !report.warnings.is_empty() {
        ExitCode::CheckWarnings
    } else {
        code
    }
}

/// One validate-stage log event per warning.
fn check_jsonl(report: &CheckReport) -> Result<String, serde_json::Error> {
    let ctx = LogContext::new(report.run_id.clone());
    let mut out = String::new();
    for warning in &report.warnings {
        let event = ctx
            .warn(
                event_names::VALIDATE_WARNING,
                Stage::Validate,
                warning.message.clone(),
            )
            .with_field("field", &warning.field);
        out.push_str(&serde_json::to_string(&event)?);
        out.push('\n');
    }
    Ok(out)
}

fn run_config(global: &GlobalOpts, ctx: &LogContext, args: &ConfigArgs) -> ExitCode {
    match &args.command {
        ConfigCommands::Show => run_config_show(global, ctx),
        ConfigCommands::Validate { path } => run_config_validate(global, ctx, path.as_ref()),
        ConfigCommands::Schema { name } => run_config_schema(global, name.as_deref()),
    }
}

/// Display the effective settings (built-in defaults if no file is found).
fn run_config_show(global: &GlobalOpts, ctx: &LogContext) -> ExitCode {
    let resolved = match resolve_settings(global, ctx) {
        Ok(r) => r,
        Err(err) => return output_error(global, ctx, &err),
    };

    let path = resolved.path.path.as_ref().map(|p| p.display().to_string());
    let s = &resolved.settings;
    match global.format {
        OutputFormat::Json | OutputFormat::Jsonl => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "run_id": ctx.run_id,
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "source": {
                    "path": path,
                    "kind": resolved.path.source.to_string(),
                    "hash": resolved.raw.as_deref().map(hash_content),
                    "using_defaults": resolved.path.path.is_none(),
                },
                "settings": s,
            });
            let rendered = if global.format == OutputFormat::Json {
                serde_json::to_string_pretty(&response)
            } else {
                serde_json::to_string(&response)
            };
            match rendered {
                Ok(text) => println!("{}", text),
                Err(err) => return output_error(global, ctx, &Error::Json(err)),
            }
        }
        OutputFormat::Summary => {
            println!(
                "settings from {}: max_outcomes={} dominance={} validation={}",
                resolved.path.source, s.max_outcomes, s.dominance, s.validation.mode
            );
        }
        OutputFormat::Exitcode => {}
        OutputFormat::Md => {
            println!("# Settings");
            println!();
            match &path {
                Some(p) => println!("- source: {} ({})", p, resolved.path.source),
                None => println!("- source: {}", resolved.path.source),
            }
            println!("- max_outcomes: {}", s.max_outcomes);
            println!("- tie_tolerance: {:e}", s.tie_tolerance);
            println!("- dominance: {}", s.dominance);
            println!("- validation.mode: {}", s.validation.mode);
            println!("- validation.sum_tolerance: {:e}", s.validation.sum_tolerance);
        }
    }

    ExitCode::Clean
}

/// Parse and semantically validate a settings file.
fn run_config_validate(global: &GlobalOpts, ctx: &LogContext, path: Option<&PathBuf>) -> ExitCode {
    let options = match path {
        Some(p) => ConfigOptions {
            config_dir: global.config.clone(),
            settings_path: Some(p.clone()),
        },
        None => global.config_options(),
    };

    let result = load_settings(&options)
        .map_err(Error::from)
        .and_then(|resolved| {
            validate_settings(&resolved.settings)?;
            Ok(resolved)
        });

    let resolved = match result {
        Ok(r) => r,
        Err(err) => {
            log_event!(
                ctx,
                WARN,
                event_names::VALIDATE_FAILED,
                Stage::Validate,
                "Settings invalid",
                reason = err.to_string()
            );
            return output_error(global, ctx, &err);
        }
    };

    let shown = resolved
        .path
        .path
        .as_ref()
        .map(|p| p.display().to_string());
    match global.format {
        OutputFormat::Json | OutputFormat::Jsonl => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "run_id": ctx.run_id,
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "status": "valid",
                "path": shown,
                "source": resolved.path.source.to_string(),
                "using_defaults": resolved.path.path.is_none(),
            });
            match serde_json::to_string_pretty(&response) {
                Ok(text) => println!("{}", text),
                Err(err) => return output_error(global, ctx, &Error::Json(err)),
            }
        }
        OutputFormat::Summary => println!("[{}] config validate: OK", ctx.run_id),
        OutputFormat::Exitcode => {}
        OutputFormat::Md => {
            println!("# Settings Validation");
            println!();
            println!("Status: valid");
            match shown {
                Some(p) => println!("Settings: {}", p),
                None => println!("Settings: using built-in defaults"),
            }
        }
    }

    ExitCode::Clean
}

fn run_config_schema(global: &GlobalOpts, name: Option<&str>) -> ExitCode {
    let Some(name) = name else {
        let available = schema::available_schemas();
        match global.format {
            OutputFormat::Json | OutputFormat::Jsonl => {
                let list: Vec<serde_json::Value> = available
                    .iter()
                    .map(|(n, d)| serde_json::json!({ "name": n, "description": d }))
                    .collect();
                let response = serde_json::json!({
                    "schema_version": SCHEMA_VERSION,
                    "schemas": list,
                });
                if let Ok(text) = serde_json::to_string_pretty(&response) {
                    println!("{}", text);
                }
            }
            OutputFormat::Exitcode => {}
            OutputFormat::Md | OutputFormat::Summary => {
                for (n, d) in available {
                    println!("- {}: {}", n, d);
                }
            }
        }
        return ExitCode::Clean;
    };

    match schema::generate_schema(name) {
        Some(value) => {
            if global.format != OutputFormat::Exitcode {
                if let Ok(text) = serde_json::to_string_pretty(&value) {
                    println!("{}", text);
                }
            }
            ExitCode::Clean
        }
        None => {
            if global.format != OutputFormat::Exitcode {
                eprintln!(
                    "unknown schema '{}'; run `np-core config schema` for the list",
                    name
                );
            }
            ExitCode::ArgsError
        }
    }
}

fn print_version(global: &GlobalOpts) {
    let version_info = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "np_core_version": env!("CARGO_PKG_VERSION"),
        "rust_version": env!("CARGO_PKG_RUST_VERSION"),
    });

    match global.format {
        OutputFormat::Json | OutputFormat::Jsonl => {
            if let Ok(text) = serde_json::to_string_pretty(&version_info) {
                println!("{}", text);
            }
        }
        OutputFormat::Exitcode => {}
        _ => {
            println!("np-core {}", env!("CARGO_PKG_VERSION"));
            println!("schema version: {}", SCHEMA_VERSION);
        }
    }
}
