//! Organization resolution
//!
//! The API has no lookup by name, so resolution lists every organization,
//! fetches each one's detail and filters by name.

use grafsync_common::{Method, Operation, Organization, ResourceRef, Result, Transport};
use tracing::{debug, info};

/// Finds organizations by name
pub struct OrganizationResolver<'a, T: Transport + ?Sized> {
    transport: &'a T,
}

impl<'a, T: Transport + ?Sized> OrganizationResolver<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// All organizations visible to the authenticated user
    pub async fn list(&self) -> Result<Vec<Organization>> {
        let refs: Vec<ResourceRef> = self
            .transport
            .send(Method::Get, "/api/orgs", None)
            .await?
            .ensure_ok(Operation::ListOrganizations)?
            .json()?;

        let mut organizations = Vec::with_capacity(refs.len());
        for r in refs {
            let org: Organization = self
                .transport
                .send(Method::Get, &format!("/api/orgs/{}", r.id), None)
                .await?
                .ensure_ok(Operation::GetOrganization(r.id))?
                .json()?;
            organizations.push(org);
        }

        debug!("Found {} organizations", organizations.len());
        Ok(organizations)
    }

    /// First organization named `name`; `None` when unset or unmatched
    ///
    /// `None` means the caller falls back to the default organization.
    pub async fn resolve(&self, name: Option<&str>) -> Result<Option<Organization>> {
        let Some(name) = name else {
            debug!("No organization requested");
            return Ok(None);
        };

        let found = self.list().await?.into_iter().find(|o| o.name == name);
        match &found {
            Some(org) => info!("Resolved organization {} to id {}", name, org.id),
            None => info!("Organization {} not found, using default", name),
        }
        Ok(found)
    }
}
