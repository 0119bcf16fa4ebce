//! Simulated package set of the virtual environment.

use crate::config::{KNOWN_PACKAGES, STARTER_PACKAGES};
use crate::core::error::{Result, SessionError};
use crate::models::InstalledPackage;

/// Installed packages in insertion order. Installing an existing name
/// replaces the entry in place.
#[derive(Clone, Debug, Default)]
pub struct PackageRegistry {
    packages: Vec<InstalledPackage>,
}

impl PackageRegistry {
    /// Create the starter set every session begins with.
    pub fn seeded() -> Self {
        Self {
            packages: STARTER_PACKAGES
                .iter()
                .map(|(name, version, desc)| InstalledPackage::new(*name, *version, *desc))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&InstalledPackage> {
        self.packages.iter().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn list(&self) -> &[InstalledPackage] {
        &self.packages
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Insert a package, replacing any entry with the same name.
    pub fn install(&mut self, package: InstalledPackage) {
        match self.packages.iter_mut().find(|p| p.name == package.name) {
            Some(existing) => *existing = package,
            None => self.packages.push(package),
        }
    }

    pub fn uninstall(&mut self, name: &str) -> Result<InstalledPackage> {
        let idx = self
            .packages
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| SessionError::package_not_found(name))?;
        Ok(self.packages.remove(idx))
    }
}

/// Build the package a `pip install` would produce.
///
/// A version is fabricated from the name when none is pinned.
pub fn resolve_package(name: &str, version: Option<&str>) -> InstalledPackage {
    let version = version
        .map(str::to_string)
        .unwrap_or_else(|| fabricate_version(name));
    let description = KNOWN_PACKAGES
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, desc)| desc.to_string())
        .unwrap_or_else(|| format!("The {} package", name));
    InstalledPackage::new(name, version, description)
}

/// Deterministic version string derived from the package name.
fn fabricate_version(name: &str) -> String {
    let sum: u32 = name.bytes().map(u32::from).sum();
    format!("{}.{}.{}", 1 + sum % 3, sum % 10, name.len() % 5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_registry() {
        let registry = PackageRegistry::seeded();
        assert_eq!(registry.len(), STARTER_PACKAGES.len());
        assert!(registry.contains("numpy"));
        assert!(registry.list().iter().all(|p| p.installed));
    }

    #[test]
    fn test_install_last_write_wins() {
        let mut registry = PackageRegistry::seeded();
        let before = registry.len();
        registry.install(InstalledPackage::new("numpy", "2.0.0", "arrays"));
        assert_eq!(registry.len(), before);
        assert_eq!(registry.get("numpy").unwrap().version, "2.0.0");
    }

    #[test]
    fn test_uninstall() {
        let mut registry = PackageRegistry::seeded();
        let removed = registry.uninstall("pandas").unwrap();
        assert_eq!(removed.name, "pandas");
        assert!(!registry.contains("pandas"));
        assert_eq!(
            registry.uninstall("pandas").unwrap_err(),
            SessionError::package_not_found("pandas")
        );
    }

    #[test]
    fn test_resolve_package_fabricates_version() {
        let pkg = resolve_package("requests", None);
        assert_eq!(pkg.description, "HTTP library for humans");
        assert_eq!(pkg.version, resolve_package("requests", None).version);
        assert_eq!(pkg.version.split('.').count(), 3);

        let pinned = resolve_package("leftpad", Some("0.0.1"));
        assert_eq!(pinned.version, "0.0.1");
        assert_eq!(pinned.description, "The leftpad package");
    }
}
