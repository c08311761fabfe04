//! Transport seam between the reconciler and the HTTP layer

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Operation, Result};

/// HTTP methods used against the Grafana API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// Raw response of one API call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Turn anything but 200 into a `RemoteApi` error for `operation`
    pub fn ensure_ok(self, operation: Operation) -> Result<Self> {
        if self.is_ok() {
            Ok(self)
        } else {
            Err(Error::RemoteApi {
                operation,
                status: self.status,
                body: self.body,
            })
        }
    }

    /// Parse the body as JSON, keeping the raw body on failure
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|source| Error::MalformedResponse {
            body: self.body.clone(),
            source,
        })
    }
}

/// Authenticated request function against a Grafana server
///
/// Implementations only move bytes; status interpretation is left to callers.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<ApiResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResourceRef;

    #[test]
    fn test_ensure_ok_only_accepts_200() {
        assert!(ApiResponse::new(200, "[]").ensure_ok(Operation::ListDatasources).is_ok());

        let err = ApiResponse::new(201, "created")
            .ensure_ok(Operation::ListDatasources)
            .unwrap_err();
        assert_eq!(err.status(), Some(201));
        match err {
            Error::RemoteApi { body, .. } => assert_eq!(body, "created"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_json_failure_is_malformed() {
        let resp = ApiResponse::new(200, "<html>oops</html>");
        match resp.json::<Vec<ResourceRef>>() {
            Err(Error::MalformedResponse { body, .. }) => assert_eq!(body, "<html>oops</html>"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
