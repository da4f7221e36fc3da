//! Module registry: the ordered list of hardening scripts offered in the menu.
//!
//! Order matters. Menu rendering, `run_all` and report sections all follow
//! the order descriptors were registered in.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{HardenError, RegistryError, Result};

/// Menu inputs handled by the shell itself; no module may use them as its id.
pub const RESERVED_IDS: &[&str] = &["A", "S", "Q"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    pub id: String,
    pub name: String,
    /// Path to the executable, relative to the configured script directory.
    pub script: String,
}

impl ModuleDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, script: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), script: script.into() }
    }
}

#[derive(Debug, Clone)]
pub struct Registry {
    modules: Vec<ModuleDescriptor>,
}

impl Registry {
    /// Build a registry, rejecting empty, duplicate and reserved ids.
    /// Ids are compared ASCII case-insensitively since the shell upper-cases input.
    pub fn new(modules: Vec<ModuleDescriptor>) -> std::result::Result<Self, RegistryError> {
        for (i, m) in modules.iter().enumerate() {
            let id = m.id.trim();
            if id.is_empty() {
                return Err(RegistryError::EmptyId);
            }
            if RESERVED_IDS.iter().any(|r| r.eq_ignore_ascii_case(id)) {
                return Err(RegistryError::ReservedId(m.id.clone()));
            }
            if modules[..i].iter().any(|prev| prev.id.eq_ignore_ascii_case(&m.id)) {
                return Err(RegistryError::DuplicateId(m.id.clone()));
            }
        }
        Ok(Self { modules })
    }

    /// The nine Annexure B hardening modules.
    pub fn builtin() -> Self {
        let modules = vec![
            ModuleDescriptor::new("1", "Filesystem Configuration", "1_filesystem.sh"),
            ModuleDescriptor::new("2", "Package Management", "2_package_mgmt.sh"),
            ModuleDescriptor::new("3", "Services Configuration", "3_services.sh"),
            ModuleDescriptor::new("4", "Network Configuration", "4_network.sh"),
            ModuleDescriptor::new("5", "Host Based Firewall", "5_firewall.sh"),
            ModuleDescriptor::new("6", "Access Control", "6_access_control.sh"),
            ModuleDescriptor::new("7", "User Accounts", "7_user_accounts.sh"),
            ModuleDescriptor::new("8", "Logging and Auditing", "8_logging_audit.sh"),
            ModuleDescriptor::new("9", "System Maintenance", "9_system_maintenance.sh"),
        ];
        Self { modules }
    }

    /// Load an ordered JSON array of `{"id", "name", "script"}` objects.
    pub fn from_manifest(path: &Path) -> Result<Self> {
        let manifest_err = |message: String| HardenError::Manifest {
            path: path.to_path_buf(),
            message,
        };
        let text = fs::read_to_string(path).map_err(|e| manifest_err(e.to_string()))?;
        let modules: Vec<ModuleDescriptor> =
            serde_json::from_str(&text).map_err(|e| manifest_err(e.to_string()))?;
        Ok(Self::new(modules)?)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleDescriptor> {
        self.modules.iter()
    }

    pub fn get(&self, id: &str) -> Option<&ModuleDescriptor> {
        self.modules.iter().find(|m| m.id.eq_ignore_ascii_case(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Position of `id` in registration order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.modules.iter().position(|m| m.id.eq_ignore_ascii_case(id))
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn builtin_registry_is_ordered() {
        let reg = Registry::builtin();
        let ids: Vec<&str> = reg.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3", "4", "5", "6", "7", "8", "9"]);
        assert_eq!(reg.get("5").map(|m| m.script.as_str()), Some("5_firewall.sh"));
        assert!(reg.get("0").is_none());
    }

    #[test]
    fn builtin_passes_validation() {
        let modules: Vec<_> = Registry::builtin().iter().cloned().collect();
        assert!(Registry::new(modules).is_ok());
    }

    #[test]
    fn rejects_reserved_ids_in_any_case() {
        for id in ["A", "s", "q"] {
            let err = Registry::new(vec![ModuleDescriptor::new(id, "x", "x.sh")]).unwrap_err();
            assert_eq!(err, RegistryError::ReservedId(id.to_string()));
        }
    }

    #[test]
    fn rejects_duplicates_and_empty_ids() {
        let dup = Registry::new(vec![
            ModuleDescriptor::new("1", "one", "1.sh"),
            ModuleDescriptor::new("1", "again", "1b.sh"),
        ]);
        assert_eq!(dup.unwrap_err(), RegistryError::DuplicateId("1".into()));

        let empty = Registry::new(vec![ModuleDescriptor::new(" ", "blank", "b.sh")]);
        assert_eq!(empty.unwrap_err(), RegistryError::EmptyId);
    }

    #[test]
    fn manifest_keeps_file_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("modules.json");
        fs::write(
            &path,
            r#"[{"id":"2","name":"Second","script":"b.sh"},{"id":"1","name":"First","script":"a.sh"}]"#,
        )
        .unwrap();

        let reg = Registry::from_manifest(&path).unwrap();
        let ids: Vec<&str> = reg.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["2", "1"]);
        assert_eq!(reg.position("1"), Some(1));
    }

    #[test]
    fn manifest_with_reserved_id_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("modules.json");
        fs::write(&path, r#"[{"id":"Q","name":"Quit?","script":"q.sh"}]"#).unwrap();

        let err = Registry::from_manifest(&path).unwrap_err();
        assert!(matches!(err, HardenError::Registry(RegistryError::ReservedId(_))));
    }

    #[test]
    fn malformed_manifest_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();

        let err = Registry::from_manifest(&path).unwrap_err();
        assert!(matches!(err, HardenError::Manifest { .. }));
        assert!(err.to_string().contains("broken.json"));
    }
}
