//! Predictive-maintenance dashboard CLI.
//!
//! Runs analyses through the same import controller the dashboard uses,
//! renders the HTML dashboard, and exposes the reference data, the what-if
//! recalculation and the output schemas.

use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use pdm_common::{
    AnalysisResult, AssetId, DashboardState, Error, ImportMode, ModelTab, OutputFormat, Result,
    SCHEMA_VERSION,
};
use pdm_config::{
    resolve_reference_path, validate_reference_data, ReferenceData, ReferencePath,
    ReferenceSnapshot,
};
use pdm_core::analysis::resolve_tag_coverage;
use pdm_core::dashboard::{ImportController, SimulatedSource};
use pdm_core::exit_codes::ExitCode;
use pdm_core::logging::{
    event_names, generate_run_id, init_logging, LogConfig, LogContext, LogFormat, LogLevel, Stage,
};
use pdm_core::output::{render, render_error, RegistryListing};
use pdm_core::schema::{
    available_schemas, format_schema, generate_all_schemas, generate_schema, SchemaFormat,
};
use pdm_core::what_if::WhatIf;
use pdm_core::log_event;

/// Predictive Maintenance AI - asset health analysis and dashboard
#[derive(Parser)]
#[command(name = "pdm-core")]
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

    /// Reference-data file (tag registry, units, manual tags, overrides)
    #[arg(long, global = true)]
    reference_data: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Import one asset and print its analysis
    Analyze(ImportArgs),

    /// Render the HTML dashboard for one asset
    Report(ReportArgs),

    /// Show the vibration/temperature tag coverage of an asset
    Tags(TagsArgs),

    /// Search the sensor tag registry
    Registry(RegistryArgs),

    /// List refinery units and their assets
    Units,

    /// Recalculate RUL and RF class under overridden parameters
    WhatIf(WhatIfArgs),

    /// Print JSON Schemas for output types
    Schema(SchemaArgs),

    /// Reference-data management
    Config(ConfigArgs),

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
struct ImportArgs {
    /// Asset to analyze, e.g. "99 P-02"
    #[arg(long)]
    asset: String,

    /// Data source
    #[arg(long, value_enum, default_value = "phd")]
    mode: ImportMode,

    /// Sleep through the historian/upload progress phases
    #[arg(long)]
    simulate_latency: bool,
}

#[derive(Args, Debug)]
struct ReportArgs {
    #[command(flatten)]
    import: ImportArgs,

    /// Turn on explain mode (step traces and override panels)
    #[arg(long)]
    explain: bool,

    /// Model-internals tab
    #[arg(long, value_enum, default_value = "rf")]
    tab: ModelTab,

    /// Open the asset tag summary modal
    #[arg(long)]
    show_tags: bool,

    /// Vibration limit shown in explain mode (mm/s)
    #[arg(long)]
    limit: Option<f64>,

    /// Renderer settings (JSON)
    #[arg(long)]
    report_config: Option<PathBuf>,

    /// Write the page here instead of stdout
    #[arg(long, short = 'o')]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct TagsArgs {
    #[arg(long)]
    asset: String,

    #[arg(long, value_enum, default_value = "phd")]
    mode: ImportMode,
}

#[derive(Args, Debug)]
struct RegistryArgs {
    /// Case-insensitive match on tag, parameter, description or asset
    #[arg(long)]
    filter: Option<String>,
}

#[derive(Args, Debug)]
struct WhatIfArgs {
    #[command(flatten)]
    import: ImportArgs,

    /// Vibration limit L (mm/s)
    #[arg(long)]
    limit: Option<f64>,

    /// Trend window (h); display-only, always rejected
    #[arg(long)]
    trend_window: Option<f64>,

    /// RF probability threshold for Degrading
    #[arg(long)]
    rf_degrading: Option<f64>,

    /// RF probability threshold for Failure
    #[arg(long)]
    rf_failure: Option<f64>,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Type name to print
    name: Option<String>,

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

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show the active reference data and where it came from
    Show,
    /// Validate a reference-data file (or the resolved one)
    Validate {
        path: Option<PathBuf>,
    },
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let log_config = LogConfig::from_env(
        LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet),
        cli.global.log_format,
    );
    init_logging(&log_config);

    let ctx = LogContext::new(generate_run_id());
    log_event!(ctx, DEBUG, event_names::RUN_STARTED, Stage::Init, "run started");

    let result = match &cli.command {
        Commands::Analyze(args) => run_analyze(&cli.global, &ctx, args),
        Commands::Report(args) => run_report(&cli.global, &ctx, args),
        Commands::Tags(args) => run_tags(&cli.global, args),
        Commands::Registry(args) => run_registry(&cli.global, args),
        Commands::Units => run_units(&cli.global),
        Commands::WhatIf(args) => run_what_if(&cli.global, &ctx, args),
        Commands::Schema(args) => run_schema(args),
        Commands::Config(args) => run_config(&cli.global, args),
        Commands::Version => print_version(&cli.global),
    };

    let exit_code = match result {
        Ok(()) => ExitCode::Ok,
        Err(err) => {
            eprintln!("{}", render_error(&err, cli.global.format));
            ExitCode::for_error(&err)
        }
    };
    log_event!(
        ctx,
        DEBUG,
        event_names::RUN_FINISHED,
        Stage::Init,
        "run finished",
        exit_code = exit_code.as_i32()
    );
    exit_code.into()
}

// ============================================================================
// Shared helpers
// ============================================================================

fn load_reference(global: &GlobalOpts) -> Result<(Cow<'static, ReferenceData>, ReferencePath)> {
    let resolved = resolve_reference_path(global.reference_data.as_deref());
    match ReferenceData::load(&resolved) {
        Ok(data) => {
            tracing::debug!(
                target: event_names::CONFIG_LOADED,
                stage = "config",
                source = %resolved.source,
                "reference data loaded"
            );
            Ok((data, resolved))
        }
        Err(err) => {
            tracing::error!(
                target: event_names::CONFIG_ERROR,
                stage = "config",
                source = %resolved.source,
                error = %err,
                "reference data rejected"
            );
            Err(err.into())
        }
    }
}

/// Controller over the simulated historian for one CLI run.
fn controller(
    reference: Arc<ReferenceData>,
    ctx: &LogContext,
    args: &ImportArgs,
) -> ImportController<SimulatedSource> {
    let source = if args.simulate_latency {
        SimulatedSource::new(reference)
    } else {
        SimulatedSource::instant(reference)
    };
    ImportController::new(source).with_context(ctx.clone().with_asset(args.asset.trim()))
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?)
}

/// Import `args.asset` and return the analysis now on screen.
fn import(
    controller: &ImportController<SimulatedSource>,
    args: &ImportArgs,
) -> Result<Arc<AnalysisResult>> {
    runtime()?.block_on(controller.import(&args.asset, args.mode))?;
    match controller.state() {
        DashboardState::Ready(result) => Ok(result),
        DashboardState::Failed { message } => Err(Error::AnalysisFailed(message)),
        other => Err(Error::AnalysisFailed(format!(
            "import ended in state '{}'",
            other.phase()
        ))),
    }
}

fn print_payload<T: serde::Serialize + pdm_core::output::Render>(
    global: &GlobalOpts,
    value: &T,
) -> Result<()> {
    println!("{}", render(value, global.format)?);
    Ok(())
}

// ============================================================================
// Commands
// ============================================================================

fn run_analyze(global: &GlobalOpts, ctx: &LogContext, args: &ImportArgs) -> Result<()> {
    let (reference, _) = load_reference(global)?;
    let controller = controller(Arc::new(reference.into_owned()), ctx, args);
    let result = import(&controller, args)?;
    print_payload(global, result.as_ref())
}

#[cfg(feature = "report")]
fn run_report(global: &GlobalOpts, ctx: &LogContext, args: &ReportArgs) -> Result<()> {
    use pdm_core::report::{override_readout, render_dashboard};
    use pdm_report::{DashboardRenderer, DashboardView, ReportConfig};

    let config = match &args.report_config {
        Some(path) => ReportConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => ReportConfig::default(),
    };

    let (reference, _) = load_reference(global)?;
    let reference = Arc::new(reference.into_owned());
    let controller = controller(Arc::clone(&reference), ctx, &args.import);
    let result = import(&controller, &args.import)?;

    controller.update_view(|view| {
        view.select_tab(args.tab);
        if args.explain {
            view.toggle_explain();
        }
    });
    if args.show_tags {
        controller.open_tag_summary()?;
    }

    let state = controller.state();
    let mut view = DashboardView::new(&state, controller.view(), &reference);
    if args.explain {
        let mut what_if = WhatIf::from_result(&result, &reference.overrides)?;
        if let Some(limit) = args.limit {
            what_if.set_limit(limit)?;
        }
        view = view.with_overrides(override_readout(&what_if));
    }

    let html = render_dashboard(&DashboardRenderer::new(config), &view, args.out.as_deref())?;
    match &args.out {
        Some(path) => {
            let written = serde_json::json!({
                "asset_id": result.asset_id,
                "path": path.display().to_string(),
                "bytes": html.len(),
            });
            println!("{}", serde_json::to_string_pretty(&written)?);
        }
        None => println!("{html}"),
    }
    Ok(())
}

#[cfg(not(feature = "report"))]
fn run_report(_global: &GlobalOpts, _ctx: &LogContext, _args: &ReportArgs) -> Result<()> {
    Err(Error::InvalidInput(
        "built without the 'report' feature".to_string(),
    ))
}

fn run_tags(global: &GlobalOpts, args: &TagsArgs) -> Result<()> {
    let asset = AssetId::parse(&args.asset)?;
    let (reference, _) = load_reference(global)?;
    let coverage = resolve_tag_coverage(&asset, args.mode, &reference);
    print_payload(global, &coverage)
}

fn run_registry(global: &GlobalOpts, args: &RegistryArgs) -> Result<()> {
    let (reference, _) = load_reference(global)?;
    let filter = args.filter.as_deref().unwrap_or("");
    let listing = RegistryListing {
        filter: args.filter.clone(),
        tags: reference
            .tag_registry
            .search(filter)
            .into_iter()
            .cloned()
            .collect(),
    };
    print_payload(global, &listing)
}

fn run_units(global: &GlobalOpts) -> Result<()> {
    let (reference, _) = load_reference(global)?;
    print_payload(global, &reference.refinery_units)
}

fn run_what_if(global: &GlobalOpts, ctx: &LogContext, args: &WhatIfArgs) -> Result<()> {
    let (reference, _) = load_reference(global)?;
    let reference = Arc::new(reference.into_owned());
    let controller = controller(Arc::clone(&reference), ctx, &args.import);
    let result = import(&controller, &args.import)?;

    let mut what_if = WhatIf::from_result(&result, &reference.overrides)?;
    if let Some(hours) = args.trend_window {
        what_if.set_trend_window(hours)?;
    }
    if let Some(limit) = args.limit {
        what_if.set_limit(limit)?;
    }
    if args.rf_degrading.is_some() || args.rf_failure.is_some() {
        let current = *what_if.values();
        what_if.set_rf_thresholds(
            args.rf_degrading.unwrap_or(current.rf_degrading_threshold),
            args.rf_failure.unwrap_or(current.rf_failure_threshold),
        )?;
    }
    print_payload(global, &what_if.outcome())
}

fn run_schema(args: &SchemaArgs) -> Result<()> {
    let format = if args.compact {
        SchemaFormat::JsonCompact
    } else {
        SchemaFormat::Json
    };

    if args.all {
        let all = serde_json::to_value(generate_all_schemas())?;
        println!("{}", format_schema(&all, format)?);
        return Ok(());
    }

    match (&args.name, args.list) {
        (Some(name), false) => {
            let schema = generate_schema(name).ok_or_else(|| {
                Error::InvalidInput(format!(
                    "unknown schema type '{name}' (see `pdm-core schema --list`)"
                ))
            })?;
            println!("{}", format_schema(&schema, format)?);
        }
        _ => {
            for (name, description) in available_schemas() {
                println!("{name:<20} {description}");
            }
        }
    }
    Ok(())
}

fn run_config(global: &GlobalOpts, args: &ConfigArgs) -> Result<()> {
    match &args.command {
        ConfigCommands::Show => {
            let (reference, resolved) = load_reference(global)?;
            let snapshot = ReferenceSnapshot::new(&reference, &resolved)?;
            print_payload(global, &snapshot)
        }
        ConfigCommands::Validate { path } => {
            let resolved = match path {
                Some(path) => resolve_reference_path(Some(path)),
                None => resolve_reference_path(global.reference_data.as_deref()),
            };
            let data = ReferenceData::load(&resolved)?;
            validate_reference_data(&data)?;
            let snapshot = ReferenceSnapshot::new(&data, &resolved)?;

            match global.format {
                OutputFormat::Json => {
                    let response = serde_json::json!({
                        "schema_version": SCHEMA_VERSION,
                        "status": "valid",
                        "source": snapshot.source,
                        "path": snapshot.path,
                        "content_hash": snapshot.content_hash,
                    });
                    println!("{}", serde_json::to_string_pretty(&response)?);
                }
                OutputFormat::Summary => println!("config validate: OK ({})", snapshot.source),
                OutputFormat::Md => {
                    println!("# Reference data validation\n");
                    println!("Status: valid");
                    match &snapshot.path {
                        Some(path) => println!("File: {path}"),
                        None => println!("File: using built-in defaults"),
                    }
                }
            }
            Ok(())
        }
    }
}

fn print_version(global: &GlobalOpts) -> Result<()> {
    match global.format {
        OutputFormat::Json => {
            let info = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "pdm_core_version": env!("CARGO_PKG_VERSION"),
                "rust_version": env!("CARGO_PKG_RUST_VERSION"),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        _ => {
            println!("pdm-core {}", env!("CARGO_PKG_VERSION"));
            println!("schema version: {SCHEMA_VERSION}");
        }
    }
    Ok(())
}
