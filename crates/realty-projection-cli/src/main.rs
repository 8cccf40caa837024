mod commands;
mod input;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use log::LevelFilter;
use std::process;

use commands::compare::CompareArgs;
use commands::listing::ListingArgs;
use commands::mortgage::MortgageArgs;
use commands::project::ProjectArgs;

/// Real-estate versus index-fund investment projections
#[derive(Parser)]
#[command(
    name = "rpe",
    version,
    about = "Real-estate versus index-fund investment projections",
    long_about = "A CLI for projecting the value of property and index-fund investments \
                  year by year with decimal precision. Supports single projections, \
                  multi-investment comparisons, mortgage amortization and listing \
                  yield analysis."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Project one investment's value series and summary
    Project(ProjectArgs),
    /// Compare several investments on a shared horizon
    Compare(CompareArgs),
    /// Level-payment mortgage figures and amortization schedule
    Mortgage(MortgageArgs),
    /// Rent, yield and payback figures for a property listing
    Listing(ListingArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // RUST_LOG, when set, refines the flag-derived level
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Project(args) => commands::project::run_project(args),
        Commands::Compare(args) => commands::compare::run_compare(args),
        Commands::Mortgage(args) => commands::mortgage::run_mortgage(args),
        Commands::Listing(args) => commands::listing::run_listing(args),
        Commands::Version => {
            println!("rpe {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {e:?}");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
