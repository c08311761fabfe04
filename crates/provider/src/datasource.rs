//! Datasource reconciliation
//!
//! A [`DatasourceReconciler`] is one reconciliation session for one named
//! datasource. It memoizes the resolved organization and the matching remote
//! datasource, and drops the datasource cache after every mutating call so
//! the next read reflects the server.

use grafsync_common::{
    Datasource, DesiredSpec, Error, Method, Operation, Organization, Property, PropertyChange,
    ResourceRef, Result, Transport, DEFAULT_ORG_ID,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::organization::OrganizationResolver;
use crate::plan::{self, Action};

/// Every datasource in the organization the session currently uses
pub async fn list_datasources<T: Transport + ?Sized>(transport: &T) -> Result<Vec<Datasource>> {
    let refs: Vec<ResourceRef> = transport
        .send(Method::Get, "/api/datasources", None)
        .await?
        .ensure_ok(Operation::ListDatasources)?
        .json()?;

    let mut datasources = Vec::with_capacity(refs.len());
    for r in refs {
        let ds: Datasource = transport
            .send(Method::Get, &format!("/api/datasources/{}", r.id), None)
            .await?
            .ensure_ok(Operation::GetDatasource(r.id))?
            .json()?;
        datasources.push(ds);
    }

    debug!("Found {} datasources", datasources.len());
    Ok(datasources)
}

/// Point the authenticated session at `org_id`
///
/// The API scopes datasource calls to the session's current organization,
/// which is server-side state other clients can change at any time.
pub async fn switch_organization<T: Transport + ?Sized>(transport: &T, org_id: i64) -> Result<()> {
    debug!("Switching session to organization {}", org_id);
    transport
        .send(Method::Post, &format!("/api/user/using/{}", org_id), None)
        .await?
        .ensure_ok(Operation::SwitchOrganization(org_id))?;
    Ok(())
}

/// Result of one convergence run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub name: String,
    pub organization_id: i64,
    #[serde(flatten)]
    pub action: Action,
}

impl Outcome {
    pub fn changed(&self) -> bool {
        !self.action.is_noop()
    }
}

/// Reconciliation session for one named datasource
pub struct DatasourceReconciler<'a, T: Transport + ?Sized> {
    transport: &'a T,
    desired: DesiredSpec,
    organization: Option<Option<Organization>>,
    datasource: Option<Option<Datasource>>,
}

impl<'a, T: Transport + ?Sized> DatasourceReconciler<'a, T> {
    pub fn new(transport: &'a T, desired: DesiredSpec) -> Self {
        Self {
            transport,
            desired,
            organization: None,
            datasource: None,
        }
    }

    pub fn desired(&self) -> &DesiredSpec {
        &self.desired
    }

    /// Organization named by the desired spec, resolved once per session
    pub async fn organization(&mut self) -> Result<Option<&Organization>> {
        if self.organization.is_none() {
            let resolved = OrganizationResolver::new(self.transport)
                .resolve(self.desired.org_name.as_deref())
                .await?;
            self.organization = Some(resolved);
        }
        Ok(self.organization.as_ref().and_then(Option::as_ref))
    }

    /// Id of the resolved organization, or the default one
    pub async fn organization_id(&mut self) -> Result<i64> {
        Ok(self.organization().await?.map_or(DEFAULT_ORG_ID, |o| o.id))
    }

    /// Remote datasource with the desired name, fetched once until invalidated
    pub async fn current_datasource(&mut self) -> Result<Option<&Datasource>> {
        if self.datasource.is_none() {
            let name = &self.desired.name;
            let found = list_datasources(self.transport)
                .await?
                .into_iter()
                .find(|ds| &ds.name == name);
            match &found {
                Some(ds) => debug!("Datasource {} has id {}", name, ds.id),
                None => debug!("Datasource {} does not exist", name),
            }
            self.datasource = Some(found);
        }
        Ok(self.datasource.as_ref().and_then(Option::as_ref))
    }

    /// Drop the cached datasource so the next read re-queries the server
    pub fn invalidate(&mut self) {
        self.datasource = None;
    }

    /// Live value of one property, `None` when unset or the datasource is missing
    pub async fn current_value(&mut self, property: Property) -> Result<Option<Value>> {
        Ok(self
            .current_datasource()
            .await?
            .and_then(|ds| ds.value_of(property)))
    }

    pub async fn exists(&mut self) -> Result<bool> {
        Ok(self.current_datasource().await?.is_some())
    }

    /// Create or fully replace the datasource from the desired spec
    ///
    /// Always re-asserts the organization context first. The payload carries
    /// every field; the API has no partial update.
    pub async fn save(&mut self) -> Result<()> {
        let org_id = self.organization_id().await?;
        switch_organization(self.transport, org_id).await?;

        let id = self.current_datasource().await?.map(|ds| ds.id);
        let payload = serde_json::to_value(self.desired.payload(id))?;
        let name = self.desired.name.clone();

        let result = match id {
            None => {
                info!("Creating datasource {} in organization {}", name, org_id);
                self.transport
                    .send(Method::Post, "/api/datasources", Some(&payload))
                    .await
            }
            Some(id) => {
                info!("Replacing datasource {} (id {}) in organization {}", name, id, org_id);
                self.transport
                    .send(Method::Put, &format!("/api/datasources/{}", id), Some(&payload))
                    .await
            }
        };
        self.invalidate();

        result?.ensure_ok(Operation::SaveDatasource(name))?;
        Ok(())
    }

    /// Delete the current datasource
    pub async fn delete(&mut self) -> Result<()> {
        let name = self.desired.name.clone();
        let id = match self.current_datasource().await? {
            Some(ds) => ds.id,
            None => {
                warn!("Datasource {} does not exist, nothing to delete", name);
                return Err(Error::NotFound {
                    kind: "datasource".to_string(),
                    name,
                });
            }
        };

        info!("Deleting datasource {} (id {})", name, id);
        let result = self
            .transport
            .send(Method::Delete, &format!("/api/datasources/{}", id), None)
            .await;
        self.invalidate();

        result?.ensure_ok(Operation::DeleteDatasource(name))?;
        Ok(())
    }

    pub async fn create(&mut self) -> Result<()> {
        self.save().await
    }

    /// Change one desired property and save; the whole spec is resent
    pub async fn update(&mut self, change: PropertyChange) -> Result<()> {
        debug!("Updating {} of datasource {}", change.property(), self.desired.name);
        change.apply_to(&mut self.desired);
        self.save().await
    }

    pub async fn destroy(&mut self) -> Result<()> {
        self.delete().await
    }

    /// Planned action against the session's current organization
    ///
    /// Writes no datasource. Callers that want a specific organization switch
    /// to it first, as `converge` does.
    pub async fn plan(&mut self) -> Result<Action> {
        let current = self.current_datasource().await?.cloned();
        Ok(plan::plan(&self.desired, current.as_ref()))
    }

    /// Bring the datasource to the desired state
    ///
    /// Switches to the target organization before reading so the plan is
    /// made against that organization's datasources.
    pub async fn converge(&mut self) -> Result<Outcome> {
        let org_id = self.organization_id().await?;
        switch_organization(self.transport, org_id).await?;
        self.invalidate();

        let action = self.plan().await?;
        match &action {
            Action::Create => self.create().await?,
            Action::Replace { drift, .. } => {
                for d in drift {
                    info!("Datasource {} drifted: {}", self.desired.name, d);
                }
                self.save().await?
            }
            Action::Delete { .. } => self.destroy().await?,
            Action::NoOp => info!("Datasource {} is up to date", self.desired.name),
        }

        Ok(Outcome {
            name: self.desired.name.clone(),
            organization_id: org_id,
            action,
        })
    }
}
