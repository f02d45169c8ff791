//! Concierge CLI - resident login, registration and callback URLs

mod commands;
mod config;
mod logging;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use commands::{AppContext, Commands};
use std::path::PathBuf;
use tracing::{Level, debug, error};

#[derive(Parser)]
#[command(name = "concierge")]
#[command(about = "Log in to Concierge and hand the result back to an application")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Directory holding the cached login
    #[arg(short = 'd', long, global = true)]
    state_dir: Option<PathBuf>,

    /// Settings file (TOML, YAML or JSON)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Auth API base URL, overriding the settings
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_level.into())?;

    let settings = config::load_settings(cli.config.as_deref(), cli.api_url.as_deref())?;
    let ctx = AppContext {
        settings,
        state_dir: config::state_dir(cli.state_dir),
    };
    debug!(
        api = %ctx.settings.api_base_url,
        state_dir = %ctx.state_dir.display(),
        "Starting Concierge CLI"
    );

    if let Err(e) = cli.command.execute(&ctx).await {
        error!("Command failed: {e:#}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}
