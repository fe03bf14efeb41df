mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::project::ProjectArgs;
use commands::validate::ValidateArgs;

/// Monthly three-statement financial projections
#[derive(Parser)]
#[command(
    name = "finmodel",
    version,
    about = "Monthly three-statement financial projections",
    long_about = "Projects a monthly income statement, balance sheet and cash flow \
                  statement from a YAML or JSON assumption file, with exact decimal \
                  arithmetic and a per-period balance check."
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
    /// Project the three linked statements
    Project(ProjectArgs),
    /// Load and validate an assumption file without projecting
    Validate(ValidateArgs),
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
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Project(args) => commands::project::run_project(args),
        Commands::Validate(args) => commands::validate::run_validate(args),
        Commands::Version => {
            println!("finmodel {}", env!("CARGO_PKG_VERSION"));
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
