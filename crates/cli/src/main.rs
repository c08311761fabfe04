//! grafsync CLI - Main Entry Point
//!
//! Converges Grafana datasources to declared specs and inspects the
//! organizations and datasources of a Grafana server.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use grafsync_common::config::default_config_path;
use grafsync_common::ConnectionConfig;
use grafsync_provider::HttpTransport;
use tracing::debug;

mod commands;
mod output;

use commands::{apply, config, datasource, org};

/// grafsync CLI - Declarative Grafana datasources
#[derive(Parser)]
#[command(name = "grafsync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Grafana base URL
    #[arg(long, env = "GRAFANA_URL", global = true)]
    url: Option<String>,

    /// Grafana user
    #[arg(long, env = "GRAFANA_USER", global = true)]
    user: Option<String>,

    /// Grafana password
    #[arg(long, env = "GRAFANA_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,

    /// Connection config file
    #[arg(long = "config", env = "GRAFSYNC_CONFIG", global = true)]
    config_file: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Converge a datasource to its spec file
    Apply(apply::ApplyArgs),

    /// Show what apply would change (switches the session's current organization)
    Plan(apply::PlanArgs),

    /// Show one datasource
    Get {
        /// Datasource name
        name: String,

        /// Organization name
        #[arg(long)]
        org: Option<String>,
    },

    /// List datasources
    List {
        /// Organization name
        #[arg(long)]
        org: Option<String>,
    },

    /// Delete a datasource by name
    Delete {
        /// Datasource name
        name: String,

        /// Organization name
        #[arg(long)]
        org: Option<String>,
    },

    /// List organizations
    Orgs,

    /// Manage connection settings
    #[command(subcommand)]
    Config(config::ConfigCommands),

    /// Show version information
    Version,
}

impl Cli {
    /// Config file merged with flags and environment
    fn connection(&self, path: &std::path::Path) -> anyhow::Result<ConnectionConfig> {
        let mut config = ConnectionConfig::load(path)?;
        if let Some(url) = &self.url {
            config.url = url.clone();
        }
        if let Some(user) = &self.user {
            config.user = user.clone();
        }
        if let Some(password) = &self.password {
            config.password = password.clone();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    let config_path = cli.config_file.clone().unwrap_or_else(default_config_path);
    let connection = cli.connection(&config_path)?;
    debug!("Using Grafana at {} as {}", connection.url, connection.user);

    let format = cli.format;
    match cli.command {
        Commands::Config(cmd) => config::execute(cmd, &connection, config_path, format)?,
        Commands::Version => {
            println!("grafsync v{}", grafsync_common::VERSION);
        }
        Commands::Apply(args) => {
            let transport = HttpTransport::new(&connection)?;
            apply::execute_apply(args, &transport, format).await?
        }
        Commands::Plan(args) => {
            let transport = HttpTransport::new(&connection)?;
            let pending = apply::execute_plan(&args, &transport, format).await?;
            if pending && args.detailed_exitcode {
                return Ok(2);
            }
        }
        Commands::Get { name, org } => {
            let transport = HttpTransport::new(&connection)?;
            datasource::execute_get(name, org, &transport, format).await?
        }
        Commands::List { org } => {
            let transport = HttpTransport::new(&connection)?;
            datasource::execute_list(org, &transport, format).await?
        }
        Commands::Delete { name, org } => {
            let transport = HttpTransport::new(&connection)?;
            datasource::execute_delete(name, org, &transport).await?
        }
        Commands::Orgs => {
            let transport = HttpTransport::new(&connection)?;
            org::execute(&transport, format).await?
        }
    }

    Ok(0)
}
