//! Shared test utilities for grafsync-provider integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use grafsync_common::{ApiResponse, Method, Result, Transport};
use parking_lot::Mutex;
use serde_json::{json, Value};

/// One request seen by the mock
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

/// In-memory Grafana stand-in with scripted responses and a request log
///
/// A route answers with its queued responses in order; the last one repeats.
/// Unscripted routes answer 404.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<ApiResponse>>>,
    requests: Mutex<Vec<Recorded>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, method: Method, path: &str, status: u16, body: Value) -> &Self {
        self.routes
            .lock()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(ApiResponse::new(status, body.to_string()));
        self
    }

    pub fn on_raw(&self, method: Method, path: &str, status: u16, body: &str) -> &Self {
        self.routes
            .lock()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(ApiResponse::new(status, body));
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().clone()
    }

    /// `"METHOD path"` for every request, in order
    pub fn calls(&self) -> Vec<String> {
        self.requests
            .lock()
            .iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn last_body(&self, method: Method, path: &str) -> Option<Value> {
        self.requests
            .lock()
            .iter()
            .rev()
            .find(|r| r.method == method && r.path == path)
            .and_then(|r| r.body.clone())
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<ApiResponse> {
        self.requests.lock().push(Recorded {
            method,
            path: path.to_string(),
            body: body.cloned(),
        });

        let mut routes = self.routes.lock();
        let response = match routes.get_mut(&(method, path.to_string())) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        Ok(response.unwrap_or_else(|| ApiResponse::new(404, r#"{"message":"Not found"}"#)))
    }
}

/// Server with organizations "Main Org." (1) and "Main" (3)
pub fn with_orgs(mock: &MockTransport) {
    mock.on(Method::Get, "/api/orgs", 200, json!([{"id": 1}, {"id": 3}]));
    mock.on(Method::Get, "/api/orgs/1", 200, json!({"id": 1, "name": "Main Org."}));
    mock.on(Method::Get, "/api/orgs/3", 200, json!({"id": 3, "name": "Main"}));
    mock.on(Method::Post, "/api/user/using/1", 200, json!({"message": "Active organization changed"}));
    mock.on(Method::Post, "/api/user/using/3", 200, json!({"message": "Active organization changed"}));
}

/// Datasource "ds1" with id 7
pub fn with_ds1(mock: &MockTransport) {
    mock.on(Method::Get, "/api/datasources", 200, json!([{"id": 7, "name": "ds1"}]));
    mock.on(Method::Get, "/api/datasources/7", 200, ds1_detail());
}

pub fn without_datasources(mock: &MockTransport) {
    mock.on(Method::Get, "/api/datasources", 200, json!([]));
}

pub fn ds1_detail() -> Value {
    json!({
        "id": 7,
        "orgId": 3,
        "name": "ds1",
        "type": "influxdb",
        "access": "proxy",
        "url": "http://db:8086",
        "password": "",
        "user": "",
        "database": "",
        "basicAuth": false,
        "basicAuthUser": "",
        "basicAuthPassword": "",
        "withCredentials": false,
        "isDefault": false,
        "jsonData": {},
        "readOnly": false
    })
}
