//! L-PBVI command line interface.
//!
//! - `solve`: load a model, solve it, print the policy document
//! - `check`: run every precondition and report the calibrated sweep count
//! - `config`: inspect, validate and list solver configurations
//! - `schema`: JSON Schemas for model and policy documents

use clap::{Args, Parser, Subcommand};
use lp_common::{OutputFormat, RunId, StructuredError, SCHEMA_VERSION};
use lp_core::config::{
    get_preset, load_config, ConfigOptions, PresetName, ResolvedConfig, SolverConfig,
};
use lp_core::exit_codes::ExitCode;
use lp_core::log_event;
use lp_core::logging::{
    event_names, init_logging, LogConfig, LogContext, LogFormat, LogLevel, Stage,
};
use lp_core::output::PolicyDocument;
use lp_core::schema::{
    available_schemas, format_schema, generate_all_schemas, generate_schema, SchemaFormat,
};
use lp_core::{load_model, LoadedModel, LpbviSolver};
use std::path::PathBuf;

/// Lexicographic point-based value iteration for multi-objective POMDPs
#[derive(Parser)]
#[command(name = "lp-core")]
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
    /// Solver config file (overrides LPBVI_CONFIG and config directories)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr (human, jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a model and print the policy document
    Solve(SolveArgs),

    /// Check a model and configuration without solving
    Check(CheckArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Print JSON Schema for model and policy documents
    Schema(SchemaArgs),

    /// Print version information
    Version,
}

// ============================================================================
// Command argument structs
// ============================================================================

/// Solver settings shared by `solve` and `check`.
#[derive(Args, Debug, Default)]
struct SolverArgs {
    /// Named preset (quick, balanced, thorough)
    #[arg(long)]
    preset: Option<String>,

    /// Target approximation error ε
    #[arg(long)]
    tolerance: Option<f64>,

    /// Per-objective slack, comma separated
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    slack: Option<Vec<f64>>,

    /// Maximum number of expansion rounds
    #[arg(long)]
    expansions: Option<u32>,

    /// Belief expansion rule (none, random, ssra, ssea, ger)
    #[arg(long)]
    expansion_rule: Option<String>,

    /// Seed for randomized expansion rules
    #[arg(long)]
    seed: Option<u64>,

    /// Stop expanding once this many belief points exist
    #[arg(long)]
    max_belief_points: Option<usize>,
}

impl SolverArgs {
    fn options(&self, global: &GlobalOpts) -> ConfigOptions {
        ConfigOptions {
            config_path: global.config.clone(),
            preset: self.preset.clone(),
            tolerance: self.tolerance,
            slack: self.slack.clone(),
            max_expansions: self.expansions,
            expansion_rule: self.expansion_rule.clone(),
            seed: self.seed,
            max_belief_points: self.max_belief_points,
        }
    }
}

#[derive(Args, Debug)]
struct SolveArgs {
    /// Model document (JSON)
    #[arg(long, short = 'm')]
    model: PathBuf,

    #[command(flatten)]
    solver: SolverArgs,

    /// Write the policy document here instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Model document (JSON)
    #[arg(long, short = 'm')]
    model: PathBuf,

    #[command(flatten)]
    solver: SolverArgs,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show the effective solver configuration
    Show,
    /// Validate a solver config file
    Validate {
        /// Config file (defaults to the resolved one)
        path: Option<PathBuf>,
    },
    /// List built-in presets
    Presets,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Type name to print
    type_name: Option<String>,

    /// List available types
    #[arg(long)]
    list: bool,

    /// Print every schema
    #[arg(long)]
    all: bool,

    /// Single-line JSON
    #[arg(long)]
    compact: bool,
}

// ============================================================================
// Main entry point
// ============================================================================

fn main() {
    let cli = Cli::parse();

    let cli_level = LogLevel::from_flags(cli.global.quiet, cli.global.verbose);
    init_logging(&LogConfig::from_env(cli_level, cli.global.log_format));

    let exit_code = match &cli.command {
        Commands::Solve(args) => run_solve(&cli.global, args),
        Commands::Check(args) => run_check(&cli.global, args),
        Commands::Config(args) => run_config(&cli.global, args),
        Commands::Schema(args) => run_schema(&cli.global, args),
        Commands::Version => {
            print_version(&cli.global);
            ExitCode::Clean
        }
    };

    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Command implementations
// ============================================================================

fn run_solve(global: &GlobalOpts, args: &SolveArgs) -> ExitCode {
    let ctx = LogContext::new(RunId::new().0);
    match solve(global, args, &ctx) {
        Ok(()) => {
            log_event!(ctx, INFO, event_names::RUN_FINISHED, Stage::Output, "Run finished");
            ExitCode::Clean
        }
        Err(err) => output_error(global, &ctx, &err),
    }
}

fn solve(global: &GlobalOpts, args: &SolveArgs, ctx: &LogContext) -> lp_common::Result<()> {
    log_event!(ctx, INFO, event_names::RUN_STARTED, Stage::Init, "Starting solve run");

    let resolved = load_solver_config(&args.solver.options(global), ctx)?;
    let LoadedModel { model, fingerprint } = load_model(&args.model)?;
    let ctx = &ctx
        .clone()
        .with_model(model.name().unwrap_or("unnamed").to_string());
    log_event!(
        ctx,
        INFO,
        event_names::MODEL_LOADED,
        Stage::Load,
        "Model loaded",
        states = model.num_states(),
        actions = model.num_actions(),
        observations = model.num_observations(),
        objectives = model.num_objectives()
    );

    let policy = LpbviSolver::new(resolved.config.clone()).solve(&model)?;
    let document =
        PolicyDocument::build(&ctx.run_id, &model, fingerprint, resolved.snapshot(), &policy);
    let rendered = document.render(global.format)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, format!("{rendered}\n"))?;
            let shown = path.display().to_string();
            log_event!(
                ctx,
                INFO,
                event_names::OUTPUT_WRITTEN,
                Stage::Output,
                "Policy written",
                path = shown.as_str()
            );
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn run_check(global: &GlobalOpts, args: &CheckArgs) -> ExitCode {
    let ctx = LogContext::new(RunId::new().0);
    match check(global, args, &ctx) {
        Ok(()) => ExitCode::Clean,
        Err(err) => output_error(global, &ctx, &err),
    }
}

fn check(global: &GlobalOpts, args: &CheckArgs, ctx: &LogContext) -> lp_common::Result<()> {
    let resolved = load_solver_config(&args.solver.options(global), ctx)?;
    let LoadedModel { model, fingerprint } = load_model(&args.model)?;
    let calibration = LpbviSolver::new(resolved.config.clone()).check(&model)?;
    log_event!(
        ctx,
        INFO,
        event_names::CALIBRATE_FINISHED,
        Stage::Calibrate,
        "Calibration finished",
        sweeps = calibration.sweeps
    );

    let objectives: Vec<serde_json::Value> = model
        .objectives()
        .iter()
        .zip(&calibration.per_objective)
        .zip(&calibration.error_bounds)
        .map(|((objective, sweeps), bound)| {
            serde_json::json!({
                "name": objective.name(),
                "reward_min": objective.range().min,
                "reward_max": objective.range().max,
                "sweeps_required": sweeps,
                "error_bound": bound,
            })
        })
        .collect();

    let response = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "run_id": ctx.run_id,
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "status": "ok",
        "model": {
            "name": model.name(),
            "fingerprint": fingerprint,
            "states": model.num_states(),
            "actions": model.num_actions(),
            "observations": model.num_observations(),
            "discount": model.discount(),
            "initial_beliefs": model.initial_beliefs().len(),
        },
        "config": resolved.snapshot().summary,
        "sweeps": calibration.sweeps,
        "objectives": objectives,
    });

    match global.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
        OutputFormat::Summary => println!(
            "[{}] check: OK ({} objectives, {} sweeps)",
            ctx.run_id,
            model.num_objectives(),
            calibration.sweeps
        ),
        OutputFormat::Md => {
            println!("# lp-core check\n");
            println!("✓ model: {} states, {} actions", model.num_states(), model.num_actions());
            println!("✓ sweeps per objective: {}", calibration.sweeps);
            for objective in &objectives {
                println!("  {}", objective);
            }
            println!("\nRun: {}", ctx.run_id);
        }
    }
    Ok(())
}

fn load_solver_config(
    options: &ConfigOptions,
    ctx: &LogContext,
) -> lp_common::Result<ResolvedConfig> {
    let resolved = load_config(options)?;
    let source = resolved.source.to_string();
    match &resolved.path {
        Some(path) => {
            let shown = path.display().to_string();
            log_event!(
                ctx,
                INFO,
                event_names::CONFIG_LOADED,
                Stage::Validate,
                "Solver config loaded",
                path = shown.as_str(),
                source = source.as_str()
            )
        }
        None => log_event!(
            ctx,
            DEBUG,
            event_names::CONFIG_DEFAULT_USED,
            Stage::Validate,
            "Solver config not found on disk",
            source = source.as_str()
        ),
    }
    Ok(resolved)
}

fn run_config(global: &GlobalOpts, args: &ConfigArgs) -> ExitCode {
    let ctx = LogContext::new(RunId::new().0);
    let result = match &args.command {
        ConfigCommands::Show => run_config_show(global, &ctx),
        ConfigCommands::Validate { path } => run_config_validate(global, &ctx, path.as_ref()),
        ConfigCommands::Presets => run_config_presets(global),
    };
    match result {
        Ok(code) => code,
        Err(err) => output_error(global, &ctx, &err),
    }
}

/// Display the effective configuration (including defaults if no file is present).
fn run_config_show(global: &GlobalOpts, ctx: &LogContext) -> lp_common::Result<ExitCode> {
    let options = ConfigOptions {
        config_path: global.config.clone(),
        ..Default::default()
    };
    let resolved = load_solver_config(&options, ctx)?;
    let snapshot = resolved.snapshot();

    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "run_id": ctx.run_id,
                "source": resolved.source.to_string(),
                "path": resolved.path.as_ref().map(|p| p.display().to_string()),
                "config_hash": snapshot.config_hash,
                "config": resolved.config,
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Summary => println!(
            "[{}] config {} from {}",
            ctx.run_id,
            snapshot.short_id(),
            resolved.source
        ),
        OutputFormat::Md => {
            println!("# Solver configuration\n");
            println!("- source: {}", resolved.source);
            if let Some(path) = &resolved.path {
                println!("- path: {}", path.display());
            }
            println!("- tolerance: {}", resolved.config.tolerance);
            println!("- max expansions: {}", resolved.config.max_expansions);
            println!("- expansion rule: {}", resolved.config.expansion_rule);
            println!("- seed: {}", resolved.config.seed);
            println!("- hash: `{}`", snapshot.short_id());
        }
    }
    Ok(ExitCode::Clean)
}

fn run_config_validate(
    global: &GlobalOpts,
    ctx: &LogContext,
    path: Option<&PathBuf>,
) -> lp_common::Result<ExitCode> {
    let options = ConfigOptions {
        config_path: path.cloned().or_else(|| global.config.clone()),
        ..Default::default()
    };
    let (ok, error, source) = match load_config(&options) {
        Ok(resolved) => (true, None, Some(resolved.source.to_string())),
        Err(e) => {
            log_event!(
                ctx,
                WARN,
                event_names::CONFIG_ERROR,
                Stage::Validate,
                "Solver config rejected",
                code = e.code()
            );
            (false, Some(e.to_string()), None)
        }
    };

    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "run_id": ctx.run_id,
                "status": if ok { "ok" } else { "error" },
                "source": source,
                "error": error,
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Summary => {
            let status = if ok { "OK" } else { "FAILED" };
            println!("[{}] config validate: {}", ctx.run_id, status);
        }
        OutputFormat::Md => {
            if ok {
                println!("✓ configuration is valid");
            } else {
                println!("✗ configuration is invalid");
            }
            if let Some(error) = &error {
                println!("  Error: {}", error);
            }
        }
    }

    Ok(if ok {
        ExitCode::Clean
    } else {
        ExitCode::ConfigError
    })
}

fn run_config_presets(global: &GlobalOpts) -> lp_common::Result<ExitCode> {
    let presets: Vec<(PresetName, SolverConfig)> = PresetName::ALL
        .iter()
        .map(|name| (*name, get_preset(*name)))
        .collect();

    match global.format {
        OutputFormat::Json => {
            let list: Vec<serde_json::Value> = presets
                .iter()
                .map(|(name, config)| {
                    serde_json::json!({
                        "name": name.as_str(),
                        "description": name.description(),
                        "config": config,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&list)?);
        }
        OutputFormat::Summary | OutputFormat::Md => {
            for (name, config) in &presets {
                println!(
                    "{:<10} ε={} rounds={} rule={}  {}",
                    name.as_str(),
                    config.tolerance,
                    config.max_expansions,
                    config.expansion_rule,
                    name.description()
                );
            }
        }
    }
    Ok(ExitCode::Clean)
}

fn run_schema(global: &GlobalOpts, args: &SchemaArgs) -> ExitCode {
    let ctx = LogContext::new(RunId::new().0);
    let format = if args.compact {
        SchemaFormat::JsonCompact
    } else {
        SchemaFormat::Json
    };

    if args.list || (args.type_name.is_none() && !args.all) {
        for (name, description) in available_schemas() {
            println!("{:<18} {}", name, description);
        }
        return ExitCode::Clean;
    }

    let value = if args.all {
        serde_json::to_value(generate_all_schemas()).ok()
    } else {
        args.type_name.as_deref().and_then(generate_schema)
    };

    let Some(value) = value else {
        eprintln!(
            "unknown schema type '{}'; run `lp-core schema --list`",
            args.type_name.as_deref().unwrap_or("")
        );
        return ExitCode::ArgsError;
    };

    match format_schema(&value, format) {
        Ok(text) => {
            println!("{text}");
            ExitCode::Clean
        }
        Err(e) => output_error(global, &ctx, &e.into()),
    }
}

fn print_version(global: &GlobalOpts) {
    let version_info = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "lp_core_version": env!("CARGO_PKG_VERSION"),
        "rust_version": env!("CARGO_PKG_RUST_VERSION"),
    });

    match global.format {
        OutputFormat::Json => match serde_json::to_string_pretty(&version_info) {
            Ok(text) => println!("{text}"),
            Err(_) => println!("lp-core {}", env!("CARGO_PKG_VERSION")),
        },
        _ => {
            println!("lp-core {}", env!("CARGO_PKG_VERSION"));
            println!("schema version: {}", SCHEMA_VERSION);
        }
    }
}

/// Report an error on stderr in the requested format and pick the exit code.
fn output_error(global: &GlobalOpts, ctx: &LogContext, err: &lp_common::Error) -> ExitCode {
    let exit_code = ExitCode::for_error(err);
    let message = err.to_string();
    match err.category() {
        lp_common::ErrorCategory::Model => log_event!(
            ctx,
            ERROR,
            event_names::MODEL_REJECTED,
            Stage::Load,
            message.as_str(),
            code = err.code()
        ),
        lp_common::ErrorCategory::Config => log_event!(
            ctx,
            ERROR,
            event_names::CONFIG_ERROR,
            Stage::Validate,
            message.as_str(),
            code = err.code()
        ),
        _ => log_event!(
            ctx,
            ERROR,
            event_names::INTERNAL_ERROR,
            Stage::Solve,
            message.as_str(),
            code = err.code()
        ),
    }

    let structured = StructuredError::from(err)
        .with_context("run_id", &ctx.run_id)
        .with_context("exit_code", exit_code.code_name());
    match global.format {
        OutputFormat::Json => eprintln!("{}", structured.to_json_pretty()),
        OutputFormat::Summary => {
            eprintln!("[{}] error {}: {}", ctx.run_id, err.code(), message)
        }
        OutputFormat::Md => {
            eprintln!("# {}", err.headline());
            eprintln!();
            eprintln!("Error: {}", message);
            eprintln!("Fix: {}", err.remediation());
        }
    }
    exit_code
}
