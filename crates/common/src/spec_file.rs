//! Loading desired datasource specs from disk

use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::types::DesiredSpec;

/// Load a desired spec from a `.toml`, `.yaml` or `.yml` file
pub fn load_desired_spec(path: &Path) -> Result<DesiredSpec> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
    })?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let spec = match extension.as_str() {
        "toml" => parse_toml(&content)?,
        "yaml" | "yml" => parse_yaml(&content)?,
        other => {
            return Err(Error::InvalidConfig(format!(
                "unsupported spec file extension '{}' (expected toml, yaml or yml)",
                other
            )))
        }
    };

    debug!("Loaded desired spec for datasource {} from {}", spec.name, path.display());
    validate(spec)
}

pub fn parse_toml(content: &str) -> Result<DesiredSpec> {
    toml::from_str(content).map_err(|e| Error::InvalidConfig(e.to_string()))
}

pub fn parse_yaml(content: &str) -> Result<DesiredSpec> {
    serde_yaml::from_str(content).map_err(|e| Error::InvalidConfig(e.to_string()))
}

fn validate(spec: DesiredSpec) -> Result<DesiredSpec> {
    if spec.name.trim().is_empty() {
        return Err(Error::InvalidConfig("datasource name must not be empty".to_string()));
    }
    Ok(spec)
}
