pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::commands::estimate::EstimateArgs;

#[derive(Debug, Parser)]
#[command(
    name = "contech",
    about = "Contech operator CLI",
    long_about = "Inspect configuration, check readiness, price jobs offline, and talk to the construction assistant.",
    after_help = "Examples:\n  contech doctor --json\n  contech estimate --material pipe:1000:4 --labor operator:40\n  contech ask \"What does an excavator cost for 5 days?\""
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, pricing tables, and LLM credential readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Print the registered tools and the plain-language tool catalog")]
    Tools,
    #[command(about = "Price a project offline from material, labor, and equipment lines")]
    Estimate {
        #[arg(long = "material", value_name = "TYPE:QTY[:SIZE]")]
        materials: Vec<String>,
        #[arg(long = "labor", value_name = "TYPE:HOURS")]
        labor: Vec<String>,
        #[arg(long = "equipment", value_name = "TYPE:DAYS")]
        equipment: Vec<String>,
        #[arg(long, help = "Overhead and profit as a fraction (default 0.15)")]
        markup: Option<String>,
        #[arg(long = "pricing", value_name = "PATH", help = "Pricing table TOML file")]
        pricing_path: Option<PathBuf>,
    },
    #[command(about = "Send one message through the assistant and print its answer")]
    Ask { message: String },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => commands::config::run(),
        Command::Doctor { json } => commands::doctor::run(json),
        Command::Tools => commands::tools::run(),
        Command::Estimate { materials, labor, equipment, markup, pricing_path } => {
            let args = EstimateArgs { materials, labor, equipment, markup, pricing_path };
            commands::estimate::run(&args)
        }
        Command::Ask { message } => commands::ask::run(&message),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
