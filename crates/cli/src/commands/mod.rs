//! CLI Commands

pub mod apply;
pub mod config;
pub mod datasource;
pub mod org;

use anyhow::Result;
use grafsync_common::Transport;
use grafsync_provider::{switch_organization, OrganizationResolver};
use tracing::debug;

/// Point the session at the named organization, or leave it alone when unset
///
/// An unknown name falls back to the default organization, the same way a
/// desired spec's `org_name` does.
pub async fn use_organization<T: Transport + ?Sized>(transport: &T, org: Option<&str>) -> Result<()> {
    if org.is_none() {
        debug!("No organization requested, keeping session organization");
        return Ok(());
    }
    let org_id = OrganizationResolver::new(transport)
        .resolve(org)
        .await?
        .map_or(grafsync_common::DEFAULT_ORG_ID, |o| o.id);
    switch_organization(transport, org_id).await?;
    Ok(())
}
