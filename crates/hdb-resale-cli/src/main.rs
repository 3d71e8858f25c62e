mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::loan::AmortizeArgs;
use commands::purchase::{AnalyzeArgs, DownpaymentArgs, StampDutyArgs};
use commands::scenarios::SensitivityArgs;

/// Resale flat purchase, financing and exit-return calculator
#[derive(Parser)]
#[command(
    name = "hdbcalc",
    version,
    about = "Resale flat purchase, financing and exit-return calculator",
    long_about = "Computes the full breakdown of buying and later reselling a flat with \
                  decimal precision: grants, downpayment split, loan amortization, \
                  buyer's stamp duty, upfront cash outlay, resale proceeds and return \
                  on capital."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full purchase-to-resale analysis
    Analyze(AnalyzeArgs),
    /// Build a loan amortization schedule
    Amortize(AmortizeArgs),
    /// Calculate buyer's stamp duty
    StampDuty(StampDutyArgs),
    /// Split a valuation into cash, fund and loan portions
    Downpayment(DownpaymentArgs),
    /// Selling price x holding period sensitivity grid
    Sensitivity(SensitivityArgs),
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

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyze(args) => commands::purchase::run_analyze(args),
        Commands::Amortize(args) => commands::loan::run_amortize(args),
        Commands::StampDuty(args) => commands::purchase::run_stamp_duty(args),
        Commands::Downpayment(args) => commands::purchase::run_downpayment(args),
        Commands::Sensitivity(args) => commands::scenarios::run_sensitivity(args),
        Commands::Version => {
            println!("hdbcalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
