pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use commands::catalog::CatalogSection;
use commands::recommend::RecommendArgs;

#[derive(Debug, Parser)]
#[command(
    name = "microhabit",
    about = "Micro-habit recommender CLI",
    long_about = "Get a habit suggestion, browse the catalog, inspect stored history, and check runtime readiness.",
    after_help = "Examples:\n  microhabit recommend --mood stressed --screen-time 310 --preference relaxation\n  microhabit catalog moods\n  microhabit history --user u-42 --limit 5\n  microhabit doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Suggest a micro-habit for a mood, screen time and preferences")]
    Recommend(RecommendArgs),
    #[command(about = "List valid moods, preference categories or habits per category")]
    Catalog {
        #[arg(value_enum)]
        section: Option<CatalogSection>,
    },
    #[command(about = "Show a user's most recent stored suggestions")]
    History {
        #[arg(long)]
        user: String,
        #[arg(long, help = "Maximum entries to return (clamped to the configured bounds)")]
        limit: Option<u32>,
    },
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config, the habit catalog, and database readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Recommend(args) => commands::recommend::run(&args),
        Command::Catalog { section } => commands::catalog::run(section),
        Command::History { user, limit } => commands::history::run(&user, limit),
        Command::Migrate => commands::migrate::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
