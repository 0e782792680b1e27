use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use repo_walker_cli::commands::{self, WalkCommands};
use repo_walker_cli::config::{AppConfig, LoggingConfig};
use repo_walker_cli::errors::Error;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

/// Environment variable holding the log filter
const LOG_ENV: &str = "REPO_WALKER_LOG";

/// repo-walker CLI: Walk GitHub users, repositories and branches
#[derive(Parser, Debug)]
#[command(name = "repo-walker")]
#[command(about = "Walk GitHub users, repositories and branches", long_about = None)]
struct Cli {
    /// Path to the configuration file [default: ./repo-walker.toml]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    #[command(flatten)]
    Walk(WalkCommands),

    /// Show the CLI version
    Version,
}

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().with_writer(io::stderr))
        .with(filter)
        .init();
}

async fn run(cli: &Cli, config: &AppConfig) -> Result<(), Error> {
    match &cli.command {
        Commands::Walk(command) => {
            let walker = commands::connect(config)?;
            let value = commands::execute(command, &walker, config).await?;

            let output = serde_json::to_string_pretty(&value)
                .map_err(|e| Error::Output(e.to_string()))?;
            write_output(&mut io::stdout(), &output)
        }
        Commands::Version => write_output(&mut io::stdout(), &version_line()),
    }
}

fn version_line() -> String {
    format!(
        "repo-walker version {}",
        option_env!("REPO_WALKER_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
    )
}

/// Writes one line of command output.
fn write_output(out: &mut impl Write, text: &str) -> Result<(), Error> {
    writeln!(out, "{text}").map_err(|e| Error::Output(e.to_string()))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            init_logging(&LoggingConfig::default());
            error!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    };
    init_logging(&config.logging);

    if let Err(e) = run(&cli, &config).await {
        error!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}
