//! grafsync Provider
//!
//! Converges a single Grafana datasource to a declared spec: resolves the
//! organization by name, finds the datasource by name, plans create, replace,
//! delete or no-op, and performs it as one full-resource API call.

pub mod client;
pub mod datasource;
pub mod organization;
pub mod plan;

pub use client::HttpTransport;
pub use datasource::{list_datasources, switch_organization, DatasourceReconciler, Outcome};
pub use organization::OrganizationResolver;
pub use plan::{Action, PropertyDrift};
