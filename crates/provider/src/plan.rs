//! Planning: what has to happen to make the server match a desired spec

use grafsync_common::{Datasource, DesiredSpec, Ensure, Property};
use serde::Serialize;
use serde_json::Value;

/// One managed property whose live value differs from the declared one
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyDrift {
    pub property: Property,
    pub current: Option<Value>,
    pub desired: Option<Value>,
}

impl std::fmt::Display for PropertyDrift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.property.is_secret() {
            return write!(f, "{}: (secret changed)", self.property);
        }
        write!(
            f,
            "{}: {} -> {}",
            self.property,
            show(self.current.as_ref()),
            show(self.desired.as_ref())
        )
    }
}

fn show(value: Option<&Value>) -> String {
    value.map_or_else(|| "(unset)".to_string(), |v| v.to_string())
}

/// Planned change for one datasource
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Nothing with this name exists yet
    Create,
    /// Exists with drift; resend the whole spec under the existing id
    Replace { id: i64, drift: Vec<PropertyDrift> },
    /// Exists but is declared absent
    Delete { id: i64 },
    /// Already converged
    NoOp,
}

impl Action {
    pub fn is_noop(&self) -> bool {
        matches!(self, Action::NoOp)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Create => write!(f, "create"),
            Action::Replace { id, .. } => write!(f, "replace {}", id),
            Action::Delete { id } => write!(f, "delete {}", id),
            Action::NoOp => write!(f, "no-op"),
        }
    }
}

/// Decide between create, replace, delete and no-op
pub fn plan(desired: &DesiredSpec, current: Option<&Datasource>) -> Action {
    match (desired.ensure, current) {
        (Ensure::Present, None) => Action::Create,
        (Ensure::Present, Some(ds)) => {
            let drift = drift(desired, ds);
            if drift.is_empty() {
                Action::NoOp
            } else {
                Action::Replace { id: ds.id, drift }
            }
        }
        (Ensure::Absent, Some(ds)) => Action::Delete { id: ds.id },
        (Ensure::Absent, None) => Action::NoOp,
    }
}

/// Managed properties that differ between `desired` and `current`
///
/// Unmanaged properties never drift. Secrets only drift when the server
/// returned a non-empty value to compare against.
pub fn drift(desired: &DesiredSpec, current: &Datasource) -> Vec<PropertyDrift> {
    Property::ALL
        .iter()
        .filter_map(|&property| {
            let want = desired.value_of(property)?;
            let have = current.value_of(property);
            if property.is_secret() && have.as_ref().map_or(true, |v| v.as_str() == Some("")) {
                return None;
            }
            (have.as_ref() != Some(&want)).then(|| PropertyDrift {
                property,
                current: have,
                desired: Some(want),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use grafsync_common::AccessMode;
    use serde_json::json;

    fn remote(id: i64) -> Datasource {
        serde_json::from_value(json!({
            "id": id,
            "name": "ds1",
            "type": "influxdb",
            "url": "http://db:8086",
            "access": "proxy",
            "isDefault": false,
            "withCredentials": false,
            "basicAuth": false
        }))
        .unwrap()
    }

    fn desired() -> DesiredSpec {
        let mut spec = DesiredSpec::new("ds1");
        spec.kind = Some("influxdb".to_string());
        spec.url = Some("http://db:8086".to_string());
        spec.access_mode = Some(AccessMode::Proxy);
        spec
    }

    #[test]
    fn test_missing_is_create() {
        assert_eq!(plan(&desired(), None), Action::Create);
    }

    #[test]
    fn test_converged_is_noop() {
        assert!(plan(&desired(), Some(&remote(7))).is_noop());
    }

    #[test]
    fn test_single_drift_is_replace() {
        let mut spec = desired();
        spec.url = Some("http://db2:8086".to_string());
        match plan(&spec, Some(&remote(7))) {
            Action::Replace { id, drift } => {
                assert_eq!(id, 7);
                assert_eq!(drift.len(), 1);
                assert_eq!(drift[0].property, Property::Url);
                assert_eq!(drift[0].current, Some(json!("http://db:8086")));
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn test_absent() {
        let mut spec = desired();
        spec.ensure = Ensure::Absent;
        assert_eq!(plan(&spec, Some(&remote(7))), Action::Delete { id: 7 });
        assert_eq!(plan(&spec, None), Action::NoOp);
    }

    #[test]
    fn test_with_credentials_drift_uses_its_own_flag() {
        let mut spec = desired();
        spec.with_credentials = Some(true);
        let mut ds = remote(7);
        ds.is_default = true;
        let drift = drift(&spec, &ds);
        assert_eq!(drift.len(), 1);
        assert_eq!(drift[0].property, Property::WithCredentials);
    }

    #[test]
    fn test_unreturned_secret_does_not_drift() {
        let mut spec = desired();
        spec.password = Some("hunter2".to_string());
        assert!(drift(&spec, &remote(7)).is_empty());

        let mut blank = remote(7);
        blank.password = Some(String::new());
        blank.basic_auth_password = Some(String::new());
        spec.basic_auth_password = Some("s3cret".to_string());
        assert!(drift(&spec, &blank).is_empty());

        let mut ds = remote(7);
        ds.password = Some("old".to_string());
        let drift = drift(&spec, &ds);
        assert_eq!(drift.len(), 1);
        assert_eq!(drift[0].to_string(), "password: (secret changed)");
    }
}
