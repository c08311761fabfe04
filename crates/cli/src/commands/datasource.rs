//! Datasource Commands

use anyhow::{anyhow, Result};
use grafsync_common::{Datasource, DesiredSpec, Transport};
use grafsync_provider::{list_datasources, switch_organization, DatasourceReconciler};
use serde::Serialize;

use super::use_organization;
use crate::output::{print_item, print_list, print_success, OutputFormat, TableDisplay};

/// Datasource display wrapper for serialization; secrets are masked
#[derive(Serialize)]
pub struct DatasourceDisplay {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    pub access: String,
    pub database: String,
    pub user: String,
    pub password: String,
    pub is_default: bool,
    pub with_credentials: bool,
    pub basic_auth: bool,
    pub basic_auth_user: String,
    pub basic_auth_password: String,
    pub json_data: serde_json::Value,
}

fn mask(secret: Option<String>) -> String {
    match secret {
        Some(s) if !s.is_empty() => "********".to_string(),
        _ => String::new(),
    }
}

impl From<Datasource> for DatasourceDisplay {
    fn from(ds: Datasource) -> Self {
        Self {
            id: ds.id,
            name: ds.name,
            kind: ds.kind.unwrap_or_default(),
            url: ds.url.unwrap_or_default(),
            access: ds.access_mode.unwrap_or_default(),
            database: ds.database.unwrap_or_default(),
            user: ds.user.unwrap_or_default(),
            password: mask(ds.password),
            is_default: ds.is_default,
            with_credentials: ds.with_credentials,
            basic_auth: ds.basic_auth,
            basic_auth_user: ds.basic_auth_user.unwrap_or_default(),
            basic_auth_password: mask(ds.basic_auth_password),
            json_data: ds
                .json_data
                .map(serde_json::Value::Object)
                .unwrap_or(serde_json::Value::Null),
        }
    }
}

impl TableDisplay for DatasourceDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Type", "URL", "Access", "Default", "Basic Auth", "Credentials"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.kind.clone(),
            self.url.clone(),
            self.access.clone(),
            self.is_default.to_string(),
            self.basic_auth.to_string(),
            self.with_credentials.to_string(),
        ]
    }
}

pub async fn execute_list<T: Transport + ?Sized>(
    org: Option<String>,
    transport: &T,
    format: OutputFormat,
) -> Result<()> {
    use_organization(transport, org.as_deref()).await?;
    let displays: Vec<DatasourceDisplay> = list_datasources(transport)
        .await?
        .into_iter()
        .map(DatasourceDisplay::from)
        .collect();
    print_list(&displays, format);
    Ok(())
}

pub async fn execute_get<T: Transport + ?Sized>(
    name: String,
    org: Option<String>,
    transport: &T,
    format: OutputFormat,
) -> Result<()> {
    use_organization(transport, org.as_deref()).await?;
    let mut reconciler = DatasourceReconciler::new(transport, DesiredSpec::new(name.as_str()));
    let ds = reconciler
        .current_datasource()
        .await?
        .cloned()
        .ok_or_else(|| anyhow!("Datasource '{}' not found", name))?;
    print_item(&DatasourceDisplay::from(ds), format);
    Ok(())
}

pub async fn execute_delete<T: Transport + ?Sized>(
    name: String,
    org: Option<String>,
    transport: &T,
) -> Result<()> {
    let mut spec = DesiredSpec::new(name.as_str());
    spec.org_name = org;
    let mut reconciler = DatasourceReconciler::new(transport, spec);
    let org_id = reconciler.organization_id().await?;
    switch_organization(transport, org_id).await?;
    reconciler.destroy().await?;
    print_success(&format!("Datasource '{}' deleted", name));
    Ok(())
}
