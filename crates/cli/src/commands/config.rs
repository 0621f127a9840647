//! Config command implementation

use std::path::Path;

use anyhow::{anyhow, Result};
use clap::Subcommand;

use crate::client_config::ClientConfig;

/// Client configuration subcommands
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective client configuration
    Show,

    /// Write the default client configuration to {home}/config/client.toml
    Init {
        /// Overwrite an existing configuration file
        #[arg(long, default_value = "false")]
        overwrite: bool,
    },
}

/// Execute a config subcommand
pub fn execute(home: &Path, config: &ClientConfig, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            println!("# {}", ClientConfig::config_path(home).display());
            print!("{}", toml::to_string_pretty(config)?);
        }

        ConfigCommand::Init { overwrite } => {
            let path = ClientConfig::config_path(home);
            if path.exists() && !overwrite {
                return Err(anyhow!(
                    "Configuration already exists at {}. Use --overwrite to replace it.",
                    path.display()
                ));
            }
            ClientConfig::default().save(home)?;
            println!("Wrote default configuration to {}", path.display());
        }
    }

    Ok(())
}
