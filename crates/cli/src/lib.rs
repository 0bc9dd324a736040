pub mod bootstrap;
pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "crmpilot",
    about = "Chat-style CRM automation CLI",
    long_about = "Interpret natural-language CRM requests with deterministic pattern rules, execute them against HubSpot, and send completion emails.",
    after_help = "Examples:\n  crmpilot chat\n  crmpilot ask \"Create contact for jane@example.com first name is Jane\"\n  crmpilot doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Start an interactive request session")]
    Chat,
    #[command(about = "Process a single request and print the result")]
    Ask {
        #[arg(required = true, help = "The request text; multiple words are joined with spaces")]
        request: Vec<String>,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config and report CRM/SMTP/LLM readiness without network calls")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Chat => commands::chat::run(),
        Command::Ask { request } => commands::ask::run(&request.join(" ")),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    if !result.output.is_empty() {
        println!("{}", result.output);
    }
    ExitCode::from(result.exit_code)
}
