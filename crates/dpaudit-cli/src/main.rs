mod cmd;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "dpaudit",
    about = "Inspect the policy actions configured inside DataPower backup archives",
    version,
    propagate_version = true
)]
struct Cli {
    /// Output as JSON instead of YAML
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a backup archive and print every policy action per domain
    Analyze {
        /// Path to the backup archive (.zip)
        #[arg(short = 'b', long = "backup-file", env = "DPAUDIT_BACKUP_FILE")]
        backup_file: PathBuf,

        /// Write the report to a file instead of stdout
        #[arg(short = 'o', long = "output-file")]
        output_file: Option<PathBuf>,

        /// Skip the per-category summary table
        #[arg(long)]
        no_summary: bool,
    },

    /// List the action kinds the analyzer recognizes
    Kinds,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Analyze {
            backup_file,
            output_file,
            no_summary,
        } => cmd::analyze::run(
            &backup_file,
            output_file.as_deref(),
            cli.json,
            no_summary,
        ),
        Commands::Kinds => cmd::kinds::run(cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
