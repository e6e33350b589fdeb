pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "formctl")]
#[command(about = "Operator tooling for the form builder API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run a form file through the Pro feature cleaner")]
    Clean(commands::clean::CleanArgs),

    #[command(about = "List the features a workspace tier is entitled to")]
    Features(commands::features::FeaturesArgs),

    #[command(about = "Issue a bearer token for a user")]
    Token(commands::token::TokenArgs),

    #[command(about = "Apply database migrations (requires DATABASE_URL)")]
    Migrate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Clean(args) => commands::clean::handle(args, output_format),
        Commands::Features(args) => commands::features::handle(args, output_format),
        Commands::Token(args) => commands::token::handle(args, output_format),
        Commands::Migrate => commands::migrate::handle(output_format).await,
    }
}
