//! Core types for grafsync

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Organization used when no organization name is declared or matched
pub const DEFAULT_ORG_ID: i64 = 1;

/// Opaque datasource settings blob (`jsonData` on the wire)
pub type JsonData = Map<String, Value>;

/// Entry of a list endpoint; only the id is used, details are fetched per id
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ResourceRef {
    pub id: i64,
}

/// Organization as returned by `GET /api/orgs/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: i64,
    pub name: String,
}

/// How the server reaches the datasource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    Proxy,
    Direct,
}

impl std::fmt::Display for AccessMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessMode::Proxy => write!(f, "proxy"),
            AccessMode::Direct => write!(f, "direct"),
        }
    }
}

/// Whether the datasource should exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ensure {
    Present,
    Absent,
}

impl Default for Ensure {
    fn default() -> Self {
        Self::Present
    }
}

impl std::fmt::Display for Ensure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ensure::Present => write!(f, "present"),
            Ensure::Absent => write!(f, "absent"),
        }
    }
}

/// Grafana reports some flags as `null` on older datasources
fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// Datasource as returned by `GET /api/datasources/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datasource {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub database: Option<String>,
    /// Kept verbatim; servers report modes beyond proxy and direct
    #[serde(rename = "access", default)]
    pub access_mode: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_default: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub with_credentials: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub basic_auth: bool,
    #[serde(default)]
    pub basic_auth_user: Option<String>,
    #[serde(default)]
    pub basic_auth_password: Option<String>,
    #[serde(default)]
    pub json_data: Option<JsonData>,
}

impl Datasource {
    /// Current value of a property, `None` when the server left it unset
    pub fn value_of(&self, property: Property) -> Option<Value> {
        match property {
            Property::Type => self.kind.clone().map(Value::String),
            Property::Url => self.url.clone().map(Value::String),
            Property::AccessMode => self.access_mode.clone().map(Value::String),
            Property::Database => self.database.clone().map(Value::String),
            Property::User => self.user.clone().map(Value::String),
            Property::Password => self.password.clone().map(Value::String),
            Property::IsDefault => Some(Value::Bool(self.is_default)),
            Property::WithCredentials => Some(Value::Bool(self.with_credentials)),
            Property::BasicAuth => Some(Value::Bool(self.basic_auth)),
            Property::BasicAuthUser => self.basic_auth_user.clone().map(Value::String),
            Property::BasicAuthPassword => self.basic_auth_password.clone().map(Value::String),
            Property::JsonData => self.json_data.clone().map(Value::Object),
        }
    }
}

/// Declared target state of one datasource
///
/// `None` fields are unmanaged: they never cause drift, but a save still
/// sends them (as `null`, or `false` for flags) because every save is a full
/// replace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DesiredSpec {
    pub name: String,
    #[serde(default)]
    pub ensure: Ensure,
    /// Only used to pick the organization, never sent to the datasource API
    #[serde(default)]
    pub org_name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub access_mode: Option<AccessMode>,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub is_default: Option<bool>,
    #[serde(default)]
    pub with_credentials: Option<bool>,
    #[serde(default)]
    pub basic_auth: Option<bool>,
    #[serde(default)]
    pub basic_auth_user: Option<String>,
    #[serde(default)]
    pub basic_auth_password: Option<String>,
    #[serde(default)]
    pub json_data: Option<JsonData>,
}

impl DesiredSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Declared value of a property, `None` when unmanaged
    pub fn value_of(&self, property: Property) -> Option<Value> {
        match property {
            Property::Type => self.kind.clone().map(Value::String),
            Property::Url => self.url.clone().map(Value::String),
            Property::AccessMode => self.access_mode.map(|m| Value::String(m.to_string())),
            Property::Database => self.database.clone().map(Value::String),
            Property::User => self.user.clone().map(Value::String),
            Property::Password => self.password.clone().map(Value::String),
            Property::IsDefault => self.is_default.map(Value::Bool),
            Property::WithCredentials => self.with_credentials.map(Value::Bool),
            Property::BasicAuth => self.basic_auth.map(Value::Bool),
            Property::BasicAuthUser => self.basic_auth_user.clone().map(Value::String),
            Property::BasicAuthPassword => self.basic_auth_password.clone().map(Value::String),
            Property::JsonData => self.json_data.clone().map(Value::Object),
        }
    }

    /// Full create/replace body; `id` is only present on replace
    pub fn payload(&self, id: Option<i64>) -> DatasourcePayload<'_> {
        DatasourcePayload {
            id,
            name: &self.name,
            kind: self.kind.as_deref(),
            url: self.url.as_deref(),
            access: self.access_mode,
            database: self.database.as_deref(),
            user: self.user.as_deref(),
            password: self.password.as_deref(),
            is_default: self.is_default.unwrap_or(false),
            basic_auth: self.basic_auth.unwrap_or(false),
            basic_auth_user: self.basic_auth_user.as_deref(),
            basic_auth_password: self.basic_auth_password.as_deref(),
            with_credentials: self.with_credentials.unwrap_or(false),
            json_data: self.json_data.as_ref(),
        }
    }
}

/// Body of `POST /api/datasources` and `PUT /api/datasources/{id}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasourcePayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: &'a str,
    #[serde(rename = "type")]
    pub kind: Option<&'a str>,
    pub url: Option<&'a str>,
    pub access: Option<AccessMode>,
    pub database: Option<&'a str>,
    pub user: Option<&'a str>,
    pub password: Option<&'a str>,
    pub is_default: bool,
    pub basic_auth: bool,
    pub basic_auth_user: Option<&'a str>,
    pub basic_auth_password: Option<&'a str>,
    pub with_credentials: bool,
    pub json_data: Option<&'a JsonData>,
}

/// Managed datasource properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    Type,
    Url,
    AccessMode,
    Database,
    User,
    Password,
    IsDefault,
    WithCredentials,
    BasicAuth,
    BasicAuthUser,
    BasicAuthPassword,
    JsonData,
}

impl Property {
    pub const ALL: [Property; 12] = [
        Property::Type,
        Property::Url,
        Property::AccessMode,
        Property::Database,
        Property::User,
        Property::Password,
        Property::IsDefault,
        Property::WithCredentials,
        Property::BasicAuth,
        Property::BasicAuthUser,
        Property::BasicAuthPassword,
        Property::JsonData,
    ];

    /// Values of secret properties are masked in logs and output
    pub fn is_secret(self) -> bool {
        matches!(self, Property::Password | Property::BasicAuthPassword)
    }
}

impl std::fmt::Display for Property {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Property::Type => "type",
            Property::Url => "url",
            Property::AccessMode => "access_mode",
            Property::Database => "database",
            Property::User => "user",
            Property::Password => "password",
            Property::IsDefault => "is_default",
            Property::WithCredentials => "with_credentials",
            Property::BasicAuth => "basic_auth",
            Property::BasicAuthUser => "basic_auth_user",
            Property::BasicAuthPassword => "basic_auth_password",
            Property::JsonData => "json_data",
        };
        write!(f, "{}", name)
    }
}

/// A single-property update pushed into a desired spec
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyChange {
    Type(String),
    Url(String),
    AccessMode(AccessMode),
    Database(Option<String>),
    User(Option<String>),
    Password(Option<String>),
    IsDefault(bool),
    WithCredentials(bool),
    BasicAuth(bool),
    BasicAuthUser(Option<String>),
    BasicAuthPassword(Option<String>),
    JsonData(Option<JsonData>),
}

impl PropertyChange {
    pub fn property(&self) -> Property {
        match self {
            PropertyChange::Type(_) => Property::Type,
            PropertyChange::Url(_) => Property::Url,
            PropertyChange::AccessMode(_) => Property::AccessMode,
            PropertyChange::Database(_) => Property::Database,
            PropertyChange::User(_) => Property::User,
            PropertyChange::Password(_) => Property::Password,
            PropertyChange::IsDefault(_) => Property::IsDefault,
            PropertyChange::WithCredentials(_) => Property::WithCredentials,
            PropertyChange::BasicAuth(_) => Property::BasicAuth,
            PropertyChange::BasicAuthUser(_) => Property::BasicAuthUser,
            PropertyChange::BasicAuthPassword(_) => Property::BasicAuthPassword,
            PropertyChange::JsonData(_) => Property::JsonData,
        }
    }

    /// Write the new value into the desired spec
    pub fn apply_to(self, spec: &mut DesiredSpec) {
        match self {
            PropertyChange::Type(v) => spec.kind = Some(v),
            PropertyChange::Url(v) => spec.url = Some(v),
            PropertyChange::AccessMode(v) => spec.access_mode = Some(v),
            PropertyChange::Database(v) => spec.database = v,
            PropertyChange::User(v) => spec.user = v,
            PropertyChange::Password(v) => spec.password = v,
            PropertyChange::IsDefault(v) => spec.is_default = Some(v),
            PropertyChange::WithCredentials(v) => spec.with_credentials = Some(v),
            PropertyChange::BasicAuth(v) => spec.basic_auth = Some(v),
            PropertyChange::BasicAuthUser(v) => spec.basic_auth_user = v,
            PropertyChange::BasicAuthPassword(v) => spec.basic_auth_password = v,
            PropertyChange::JsonData(v) => spec.json_data = v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_datasource_detail_normalizes_flags() {
        let body = json!({
            "id": 7,
            "orgId": 3,
            "name": "ds1",
            "type": "influxdb",
            "url": "http://db:8086",
            "access": "proxy",
            "isDefault": true,
            "withCredentials": null,
            "jsonData": {"httpMode": "GET"}
        });
        let ds: Datasource = serde_json::from_value(body).unwrap();
        assert_eq!(ds.id, 7);
        assert_eq!(ds.kind.as_deref(), Some("influxdb"));
        assert_eq!(ds.access_mode.as_deref(), Some("proxy"));
        assert!(ds.is_default);
        assert!(!ds.with_credentials);
        assert!(!ds.basic_auth);
        assert_eq!(ds.value_of(Property::JsonData), Some(json!({"httpMode": "GET"})));
    }

    #[test]
    fn test_unknown_access_mode_is_kept() {
        let ds: Datasource = serde_json::from_value(json!({
            "id": 2,
            "name": "other",
            "access": "server"
        }))
        .unwrap();
        assert_eq!(ds.value_of(Property::AccessMode), Some(json!("server")));

        let mut spec = DesiredSpec::new("other");
        spec.access_mode = Some(AccessMode::Proxy);
        assert_ne!(spec.value_of(Property::AccessMode), ds.value_of(Property::AccessMode));
    }

    #[test]
    fn test_with_credentials_reads_its_own_flag() {
        let ds: Datasource = serde_json::from_value(json!({
            "id": 1,
            "name": "ds",
            "isDefault": false,
            "withCredentials": true
        }))
        .unwrap();
        assert_eq!(ds.value_of(Property::WithCredentials), Some(Value::Bool(true)));
        assert_eq!(ds.value_of(Property::IsDefault), Some(Value::Bool(false)));
    }

    #[test]
    fn test_payload_carries_every_field() {
        let mut spec = DesiredSpec::new("ds1");
        spec.org_name = Some("Main".to_string());
        spec.kind = Some("influxdb".to_string());
        spec.url = Some("http://db:8086".to_string());
        spec.access_mode = Some(AccessMode::Proxy);

        let body = serde_json::to_value(spec.payload(None)).unwrap();
        let obj = body.as_object().unwrap();
        assert!(!obj.contains_key("id"));
        assert!(!obj.contains_key("orgName"));
        for key in [
            "name", "type", "url", "access", "database", "user", "password",
            "isDefault", "basicAuth", "basicAuthUser", "basicAuthPassword",
            "withCredentials", "jsonData",
        ] {
            assert!(obj.contains_key(key), "missing {key}");
        }
        assert_eq!(body["access"], "proxy");
        assert_eq!(body["isDefault"], false);
        assert_eq!(body["user"], Value::Null);

        let body = serde_json::to_value(spec.payload(Some(7))).unwrap();
        assert_eq!(body["id"], 7);
    }

    #[test]
    fn test_desired_spec_rejects_unknown_fields() {
        let err = serde_json::from_value::<DesiredSpec>(json!({"name": "ds", "colour": "red"}));
        assert!(err.is_err());
    }

    #[test]
    fn test_property_change_applies() {
        let mut spec = DesiredSpec::new("ds1");
        let change = PropertyChange::Url("http://new:8086".to_string());
        assert_eq!(change.property(), Property::Url);
        change.apply_to(&mut spec);
        assert_eq!(spec.url.as_deref(), Some("http://new:8086"));
        assert_eq!(spec.ensure, Ensure::Present);
    }
}
