//! Apply and Plan Commands

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use grafsync_common::spec_file::load_desired_spec;
use grafsync_common::Transport;
use grafsync_provider::{switch_organization, Action, DatasourceReconciler, Outcome};
use serde::Serialize;

use crate::output::{print_item, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct ApplyArgs {
    /// Desired datasource spec (.toml, .yaml or .yml)
    #[arg(short, long)]
    pub file: PathBuf,
}

#[derive(Args)]
pub struct PlanArgs {
    /// Desired datasource spec (.toml, .yaml or .yml)
    #[arg(short, long)]
    pub file: PathBuf,

    /// Exit with status 2 when changes are pending
    #[arg(long)]
    pub detailed_exitcode: bool,
}

/// Outcome display wrapper for serialization
#[derive(Serialize)]
pub struct OutcomeDisplay {
    pub name: String,
    pub organization_id: i64,
    pub action: String,
    pub changes: Vec<String>,
}

impl From<&Outcome> for OutcomeDisplay {
    fn from(outcome: &Outcome) -> Self {
        let changes = match &outcome.action {
            Action::Replace { drift, .. } => drift.iter().map(|d| d.to_string()).collect(),
            _ => Vec::new(),
        };
        Self {
            name: outcome.name.clone(),
            organization_id: outcome.organization_id,
            action: outcome.action.to_string(),
            changes,
        }
    }
}

impl TableDisplay for OutcomeDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Name", "Org", "Action", "Changes"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.organization_id.to_string(),
            self.action.clone(),
            self.changes.join("\n"),
        ]
    }
}

pub async fn execute_apply<T: Transport + ?Sized>(
    args: ApplyArgs,
    transport: &T,
    format: OutputFormat,
) -> Result<()> {
    let desired = load_desired_spec(&args.file)?;
    let mut reconciler = DatasourceReconciler::new(transport, desired);
    let outcome = reconciler.converge().await?;
    print_item(&OutcomeDisplay::from(&outcome), format);
    Ok(())
}

/// Print the planned action; returns whether anything would change
pub async fn execute_plan<T: Transport + ?Sized>(
    args: &PlanArgs,
    transport: &T,
    format: OutputFormat,
) -> Result<bool> {
    let desired = load_desired_spec(&args.file)?;
    let mut reconciler = DatasourceReconciler::new(transport, desired);
    let org_id = reconciler.organization_id().await?;
    switch_organization(transport, org_id).await?;
    let action = reconciler.plan().await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&action)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&action)?),
        OutputFormat::Table | OutputFormat::Plain => {
            print_plan(&reconciler.desired().name, org_id, &action)
        }
    }

    Ok(!action.is_noop())
}

fn print_plan(name: &str, org_id: i64, action: &Action) {
    match action {
        Action::Create => println!("{} datasource {} in organization {}", "+ create".green(), name.bold(), org_id),
        Action::Replace { id, drift } => {
            println!(
                "{} datasource {} (id {}) in organization {}",
                "~ replace".yellow(),
                name.bold(),
                id,
                org_id
            );
            for d in drift {
                println!("    {}", d);
            }
        }
        Action::Delete { id } => {
            println!("{} datasource {} (id {}) in organization {}", "- delete".red(), name.bold(), id, org_id)
        }
        Action::NoOp => println!("{} datasource {} is up to date", "=".dimmed(), name.bold()),
    }
}
