//! Error types for grafsync

use std::fmt;

use thiserror::Error;

/// Result type alias using grafsync Error
pub type Result<T> = std::result::Result<T, Error>;

/// The remote call an error is attributed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    ListOrganizations,
    GetOrganization(i64),
    ListDatasources,
    GetDatasource(i64),
    SwitchOrganization(i64),
    SaveDatasource(String),
    DeleteDatasource(String),
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::ListOrganizations => write!(f, "list organizations"),
            Operation::GetOrganization(id) => write!(f, "get organization {}", id),
            Operation::ListDatasources => write!(f, "list datasources"),
            Operation::GetDatasource(id) => write!(f, "get datasource {}", id),
            Operation::SwitchOrganization(id) => write!(f, "switch organization {}", id),
            Operation::SaveDatasource(name) => write!(f, "save datasource {}", name),
            Operation::DeleteDatasource(name) => write!(f, "delete datasource {}", name),
        }
    }
}

/// grafsync error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to {operation} (HTTP response: {status}/{body})")]
    RemoteApi {
        operation: Operation,
        status: u16,
        body: String,
    },

    #[error("Failed to parse response: {body}")]
    MalformedResponse {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Resource not found: {kind} {name}")]
    NotFound { kind: String, name: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// HTTP status of a failed remote call, if this error came from one
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::RemoteApi { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Operation a remote failure is attributed to
    pub fn operation(&self) -> Option<&Operation> {
        match self {
            Error::RemoteApi { operation, .. } => Some(operation),
            _ => None,
        }
    }
}
