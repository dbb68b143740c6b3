//! Command implementations for the facility sync CLI
//!
//! This module wires configuration, the selected transport and the upload
//! orchestrator together, and renders the final summary.

use crate::app::services::record_parser::RecordSource;
use crate::app::services::remote_transport::{
    ApiToken, DryRunTransport, ProcessTransport, SqliteTransport, Transport,
};
use crate::app::services::upload::{
    FixedDelay, NoDelay, Pacer, UploadOrchestrator, UploadReport,
};
use crate::cli::args::{Commands, OutputFormat, UploadArgs};
use crate::config::Config;
use crate::{Error, Result};
use colored::Colorize;
use indicatif::{HumanCount, HumanDuration};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Failed batches listed individually in the human summary
const MAX_LISTED_FAILURES: usize = 10;

/// Main command runner
///
/// 1. Set up logging and configuration
/// 2. Pick the transport: dry run, local SQLite target or remote CLI
/// 3. Run the upload with progress reporting
/// 4. Print the summary
pub async fn run(command: Commands) -> Result<UploadReport> {
    let upload = command.upload_args().clone();

    command.validate()?;

    let config_file = resolve_config_file(&upload);
    let config = load_configuration(&upload, config_file.as_deref())?;

    setup_logging(&config.logging.level, upload.quiet);
    info!("Starting facility sync");
    debug!("Command line arguments: {:?}", command);
    match &config_file {
        Some(path) => info!("Using config file: {}", path.display()),
        None => info!("No config file found, using defaults and environment variables"),
    }
    debug!("Loaded configuration: {:?}", config);

    let source = command.source();
    let show_progress = upload.show_progress();

    let report = if upload.dry_run {
        info!("Dry run: statements will be encoded but not sent");
        let mut orchestrator = UploadOrchestrator::new(config, DryRunTransport::new(), NoDelay)
            .with_progress_bar(show_progress);
        let report = orchestrator.run(&source).await?;
        info!(
            "Dry run encoded {} statements ({} bytes)",
            orchestrator.transport().statements(),
            HumanCount(orchestrator.transport().bytes() as u64)
        );
        report
    } else if let Some(target) = &upload.local_target {
        let transport = SqliteTransport::open(target)?;
        upload_with(config, transport, NoDelay, &source, show_progress).await?
    } else {
        let transport = remote_transport(&config)?;
        let pacer = FixedDelay::new(config.upload.inter_batch_delay());
        upload_with(config, transport, pacer, &source, show_progress).await?
    };

    print_report(&report, upload.output_format)?;
    Ok(report)
}

async fn upload_with<T, P>(
    config: Config,
    transport: T,
    pacer: P,
    source: &RecordSource,
    show_progress: bool,
) -> Result<UploadReport>
where
    T: Transport,
    P: Pacer,
{
    UploadOrchestrator::new(config, transport, pacer)
        .with_progress_bar(show_progress)
        .run(source)
        .await
}

/// Build the wrangler transport, reading the API token from the environment
fn remote_transport(config: &Config) -> Result<ProcessTransport> {
    let token = ApiToken::from_env(&config.remote.token_env)?;
    let transport = ProcessTransport::from_config(&config.remote, token)?;
    info!("Uploading to remote database '{}'", transport.database());
    Ok(transport)
}

/// Set up structured logging at the configured level
fn setup_logging(log_level: &str, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("facility_sync={}", log_level)));

    let result = if quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("Logging already initialized: {}", e);
    }
    debug!("Logging initialized at level: {}", log_level);
}

/// Explicit `--config`, else the default path when that file exists
fn resolve_config_file(args: &UploadArgs) -> Option<PathBuf> {
    match &args.config_file {
        Some(path) => Some(path.clone()),
        None => Config::default_config_path()
            .ok()
            .filter(|path| path.exists()),
    }
}

/// Load configuration using layered approach (file -> env -> args)
fn load_configuration(args: &UploadArgs, config_file: Option<&Path>) -> Result<Config> {
    let mut config = Config::load_layered(config_file)?;
    apply_cli_overrides(&mut config, args);
    config.validate()?;

    Ok(config)
}

/// Apply CLI argument overrides to configuration
fn apply_cli_overrides(config: &mut Config, args: &UploadArgs) {
    if let Some(database) = &args.database {
        config.remote.database = Some(database.clone());
    }
    if let Some(batch_size) = args.batch_size {
        config.upload.batch_size = batch_size;
    }
    if let Some(delay_ms) = args.delay_ms {
        config.upload.inter_batch_delay_ms = delay_ms;
    }
    if args.replace {
        config.upload.replace = true;
    }
    if let Some(level) = args.log_level_override() {
        config.logging.level = level.to_string();
    }
}

/// Print the final report in the requested format
fn print_report(report: &UploadReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => {
            print_human_report(report);
            Ok(())
        }
        OutputFormat::Json => print_json_report(report),
    }
}

fn print_human_report(report: &UploadReport) {
    let rule = "=".repeat(70);
    let heading = if report.is_complete_success() {
        "Upload complete".green().bold()
    } else {
        "Upload finished with failed batches".yellow().bold()
    };
    let failed = HumanCount(report.failure_count as u64).to_string();

    println!();
    println!("{}", rule);
    println!("{}", heading);
    println!("{}", rule);
    println!("   Source:       {}", report.source);
    if let Some(encoding) = &report.encoding {
        println!("   Encoding:     {}", encoding);
    }
    println!("   Parsed:       {}", report.parse_stats.summary());
    if report.replaced {
        println!("   Replaced:     all rows of '{}' deleted first", report.table);
    }
    println!(
        "   Succeeded:    {}",
        HumanCount(report.success_count as u64).to_string().green()
    );
    println!(
        "   Failed:       {}",
        if report.failure_count > 0 {
            failed.red()
        } else {
            failed.normal()
        }
    );
    println!("   Total:        {}", HumanCount(report.total as u64));
    println!("   Success rate: {:.1}%", report.success_rate);
    println!(
        "   Batches:      {} ({} failed)",
        report.batches_total, report.batches_failed
    );
    println!("   Duration:     {}", HumanDuration(report.duration()));

    if !report.failed_batches.is_empty() {
        println!();
        println!("{}", "Failed batches:".red());
        for outcome in report.failed_batches.iter().take(MAX_LISTED_FAILURES) {
            println!(
                "   #{}: {}",
                outcome.batch_number,
                outcome.diagnostic.as_deref().unwrap_or("no diagnostic")
            );
        }
        if report.failed_batches.len() > MAX_LISTED_FAILURES {
            warn!(
                "{} more failed batches not listed",
                report.failed_batches.len() - MAX_LISTED_FAILURES
            );
        }
    }

    println!();
}

/// Print the report as pretty JSON for machine consumption
fn print_json_report(report: &UploadReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| Error::serialization("Failed to encode upload report", e))?;
    println!("{}", json);
    Ok(())
}
