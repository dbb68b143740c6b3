use anyhow::Context;
use clap::Parser;
use facility_sync::cli::{args::Args, commands};
use std::process;

fn main() {
    let args = Args::parse();

    // No subcommand: show usage and exit
    let Some(command) = args.command else {
        show_help_and_commands();
        process::exit(0);
    };

    let source = command.source();

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime
        .block_on(commands::run(command))
        .with_context(|| format!("Sync from {} failed", source));

    match result {
        Ok(_report) => {
            // The summary has already been printed by the command
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Facility Sync - facility records to D1 uploader");
    println!("===============================================");
    println!();
    println!("Reads facility records from a CSV export, workbook or local SQLite");
    println!("database and uploads them to a remote D1 database in batches.");
    println!();
    println!("USAGE:");
    println!("    facility_sync <COMMAND> <FILE> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    csv         Upload a comma-delimited export (UTF-8, CP949 or EUC-KR)");
    println!("    workbook    Upload the first sheet of an Excel workbook");
    println!("    local-db    Upload the facilities table of a local SQLite database");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Upload a CSV export to production (token from CLOUDFLARE_API_TOKEN):");
    println!("    facility_sync csv facilities.csv --database my-production-db");
    println!();
    println!("    # Replace all rows with the contents of a workbook:");
    println!("    facility_sync workbook facilities.xlsx --database my-production-db --replace");
    println!();
    println!("    # Import a CSV into a local SQLite file instead:");
    println!("    facility_sync csv facilities.csv --local-target local.sqlite");
    println!();
    println!("    # Preview batching without sending anything:");
    println!("    facility_sync csv facilities.csv --dry-run --output-format json");
    println!();
    println!("For detailed help on any command, use:");
    println!("    facility_sync <COMMAND> --help");
}
