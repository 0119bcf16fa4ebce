//! Simulated package metadata.

use serde::{Deserialize, Serialize};

/// A package present in the session's virtual environment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledPackage {
    pub name: String,
    pub version: String,
    pub description: String,
    /// Always `true` once the package is in the registry.
    pub installed: bool,
}

impl InstalledPackage {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: description.into(),
            installed: true,
        }
    }

    /// Requirement specifier as printed by `pip freeze`.
    pub fn requirement(&self) -> String {
        format!("{}=={}", self.name, self.version)
    }
}

/// Characters and operators that end the name part of a requirement.
const NAME_TERMINATORS: &[&str] = &["[", ";", "==", ">=", "<=", "~=", "!=", "<", ">"];

/// Split a requirement such as `Flask==2.3.2`, `requests>=2.0` or
/// `requests[security]; python_version>"3.8"` into a name and a pinned
/// version.
///
/// Names are lowercased the way pip normalizes them. Only an exact `==`
/// pin yields a version; ranges resolve like a bare name.
pub fn parse_requirement(spec: &str) -> (String, Option<String>) {
    let spec = spec.trim();
    let name_end = NAME_TERMINATORS
        .iter()
        .filter_map(|t| spec.find(t))
        .min()
        .unwrap_or(spec.len());
    let name = spec[..name_end].trim().to_lowercase();

    let rest = &spec[name_end..];
    let rest = match rest.strip_prefix('[') {
        Some(extras) => extras.split_once(']').map_or("", |(_, after)| after),
        None => rest,
    };
    let constraint = rest.split(';').next().unwrap_or_default().trim();
    let version = constraint
        .strip_prefix("==")
        .map(|v| v.trim_start_matches('=').trim())
        .filter(|v| !v.is_empty() && !v.contains(','))
        .map(str::to_string);

    (name, version)
}
