//! Config Commands

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Subcommand;
use grafsync_common::ConnectionConfig;
use serde::Serialize;

use crate::output::{print_item, print_success, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write the effective connection settings to a config file
    Init {
        /// Where to write (defaults to the active config path)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective connection settings
    Show,
}

#[derive(Serialize)]
pub struct ConfigDisplay {
    pub path: String,
    pub url: String,
    pub user: String,
    pub password: String,
    pub timeout_secs: u64,
}

impl TableDisplay for ConfigDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Path", "URL", "User", "Password", "Timeout (s)"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.path.clone(),
            self.url.clone(),
            self.user.clone(),
            self.password.clone(),
            self.timeout_secs.to_string(),
        ]
    }
}

pub fn execute(
    cmd: ConfigCommands,
    config: &ConnectionConfig,
    config_path: PathBuf,
    format: OutputFormat,
) -> Result<()> {
    match cmd {
        ConfigCommands::Init { path, force } => {
            let path = path.unwrap_or(config_path);
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            config.validate()?;
            config.save(&path)?;
            print_success(&format!("Config written to {}", path.display()));
        }

        ConfigCommands::Show => {
            let display = ConfigDisplay {
                path: config_path.display().to_string(),
                url: config.url.clone(),
                user: config.user.clone(),
                password: "********".to_string(),
                timeout_secs: config.timeout_secs,
            };
            print_item(&display, format);
        }
    }

    Ok(())
}
