//! mevreg CLI
//!
//! Registers a validator with the MEV smoothing proxy contract.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use mevreg::commands::{self, Command};
use mevreg::{DEFAULT_HOME_DIR, MEVREG_HOME_ENV};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Validator registration for MEV smoothing
#[derive(Parser)]
#[command(name = "mevreg")]
#[command(author = "mevreg contributors")]
#[command(version)]
#[command(about = "Register a validator with the MEV smoothing proxy contract", long_about = None)]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Directory for config
    #[arg(long, global = true, default_value_os_t = default_home_dir())]
    home: PathBuf,

    /// The logging level (trace|debug|info|warn|error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// The logging format (json|plain)
    #[arg(long, global = true, default_value = "plain")]
    log_format: String,

    /// Disable colored logs
    #[arg(long, global = true, default_value = "false")]
    log_no_color: bool,

    /// Print out full error chain on errors
    #[arg(long, global = true, default_value = "false")]
    trace: bool,

    #[command(subcommand)]
    command: Command,
}

fn default_home_dir() -> PathBuf {
    if let Ok(home) = std::env::var(MEVREG_HOME_ENV) {
        return PathBuf::from(home);
    }

    // Fall back to default: ~/.mevreg
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_HOME_DIR)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, &cli.log_format, cli.log_no_color);

    let result = commands::execute(&cli.home, cli.command).await;

    if let Err(e) = &result {
        if cli.trace {
            eprintln!("Error: {:?}", e);
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }

    Ok(())
}

/// Initialize tracing subscriber
///
/// Logs go to stderr so command output on stdout stays machine-readable.
fn init_tracing(log_level: &str, log_format: &str, no_color: bool) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(true)
        .with_ansi(!no_color);

    match log_format {
        "json" => subscriber.json().init(),
        _ => subscriber.init(),
    }
}
