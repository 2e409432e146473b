//! Purpose: Explicit injected cache of valid material names per platform version.
//! Exports: `MaterialCatalog`.
//! Role: Lookup contract for callers that want material validation; the
//! transcoder itself never consults it.
//! Invariants: No I/O and no global state; callers load and inject the data.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

use crate::core::error::{Error, ErrorKind};

#[derive(Clone, Debug, Default)]
pub struct MaterialCatalog {
    versions: BTreeMap<String, BTreeSet<String>>,
}

#[derive(Deserialize)]
struct CatalogFile(BTreeMap<String, Vec<String>>);

impl MaterialCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a YAML document of `version: [material, ...]` entries.
    pub fn from_yaml(text: &str) -> Result<Self, Error> {
        let CatalogFile(entries) = serde_yaml::from_str(text).map_err(|err| {
            Error::new(ErrorKind::Parse)
                .with_message("cannot parse material catalog")
                .with_source(err)
        })?;
        let mut catalog = Self::new();
        for (version, names) in entries {
            catalog.insert_version(version, names);
        }
        Ok(catalog)
    }

    pub fn insert_version(&mut self, version: impl Into<String>, names: Vec<String>) {
        let normalized = names
            .into_iter()
            .map(|name| name.trim().to_ascii_uppercase())
            .filter(|name| !name.is_empty())
            .collect();
        self.versions.insert(version.into(), normalized);
    }

    pub fn lookup(&self, version: &str) -> Option<&BTreeSet<String>> {
        self.versions.get(version)
    }

    pub fn contains(&self, version: &str, name: &str) -> bool {
        self.lookup(version)
            .map(|names| names.contains(&name.trim().to_ascii_uppercase()))
            .unwrap_or(false)
    }

    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.versions.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::MaterialCatalog;

    #[test]
    fn lookup_is_case_insensitive_on_names() {
        let mut catalog = MaterialCatalog::new();
        catalog.insert_version("1.21", vec!["stone".to_string(), "DIAMOND".to_string()]);
        assert!(catalog.contains("1.21", "STONE"));
        assert!(catalog.contains("1.21", "diamond"));
        assert!(!catalog.contains("1.21", "RUBY"));
        assert!(!catalog.contains("1.20", "STONE"));
    }

    #[test]
    fn from_yaml_reads_version_lists() {
        let catalog = MaterialCatalog::from_yaml("'1.21':\n  - STONE\n  - DIRT\n").expect("catalog");
        assert_eq!(catalog.versions().collect::<Vec<_>>(), vec!["1.21"]);
        assert!(catalog.contains("1.21", "DIRT"));
    }

    #[test]
    fn malformed_catalog_is_a_parse_error() {
        let err = MaterialCatalog::from_yaml("'1.21': [unclosed").unwrap_err();
        assert_eq!(err.kind(), crate::core::error::ErrorKind::Parse);
    }
}
