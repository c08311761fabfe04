//! Organization Commands

use anyhow::Result;
use grafsync_common::{Organization, Transport};
use grafsync_provider::OrganizationResolver;
use serde::Serialize;

use crate::output::{print_list, OutputFormat, TableDisplay};

#[derive(Serialize)]
pub struct OrganizationDisplay {
    pub id: i64,
    pub name: String,
}

impl From<Organization> for OrganizationDisplay {
    fn from(org: Organization) -> Self {
        Self {
            id: org.id,
            name: org.name,
        }
    }
}

impl TableDisplay for OrganizationDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.id.to_string(), self.name.clone()]
    }
}

pub async fn execute<T: Transport + ?Sized>(transport: &T, format: OutputFormat) -> Result<()> {
    let orgs: Vec<OrganizationDisplay> = OrganizationResolver::new(transport)
        .list()
        .await?
        .into_iter()
        .map(OrganizationDisplay::from)
        .collect();
    print_list(&orgs, format);
    Ok(())
}
