//! Table registry
//!
//! Maps entity-type identifiers to their declared [`TableSpec`]. The mapping
//! is constructed explicitly by the caller (or loaded from a TOML file);
//! there is no attribute scanning or runtime reflection here.

use std::fs;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::schema::spec::TableSpec;

/// Insertion-ordered registry of declared tables, keyed by entity type.
///
/// Registration order is reconciliation order, so entities should be
/// registered with foreign-key targets ahead of their dependents.
#[derive(Debug, Clone, Default)]
pub struct TableRegistry {
    tables: IndexMap<String, TableSpec>,
}

#[derive(Deserialize)]
struct RegistryFile {
    tables: IndexMap<String, TableSpec>,
}

impl TableRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a registry from a TOML file with a `[tables.<entity>]` section
    /// per declared entity.
    pub fn load_from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::ConfigError(format!("Failed to read tables file: {}", e)))?;

        let file: RegistryFile = toml::from_str(&contents)
            .map_err(|e| Error::ConfigError(format!("Failed to parse tables file: {}", e)))?;

        let mut registry = Self::new();
        for (entity, spec) in file.tables {
            registry.register(&entity, spec)?;
        }

        Ok(registry)
    }

    /// Register a declared table for an entity type.
    ///
    /// Empty table names and duplicate entity registrations are
    /// configuration errors.
    pub fn register(&mut self, entity: &str, spec: TableSpec) -> Result<()> {
        if spec.name.is_empty() {
            return Err(Error::ConfigError(format!(
                "Declared table for entity '{}' has an empty name",
                entity
            )));
        }

        if self.tables.contains_key(entity) {
            return Err(Error::ConfigError(format!(
                "Entity '{}' is already registered",
                entity
            )));
        }

        self.tables.insert(entity.to_string(), spec);
        Ok(())
    }

    /// Look up the declared table for an entity type.
    ///
    /// An entity without a declared schema is a fatal configuration error.
    pub fn get(&self, entity: &str) -> Result<&TableSpec> {
        self.tables
            .get(entity)
            .ok_or_else(|| Error::SchemaNotDeclared(entity.to_string()))
    }

    /// Iterate entities and specs in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TableSpec)> {
        self.tables.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of registered entities
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_entity_is_a_fatal_configuration_error() {
        let registry = TableRegistry::new();

        match registry.get("user") {
            Err(Error::SchemaNotDeclared(entity)) => assert_eq!(entity, "user"),
            other => panic!("expected SchemaNotDeclared, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = TableRegistry::new();
        registry
            .register("user", TableSpec::new("users", "id INT"))
            .unwrap();

        let result = registry.register("user", TableSpec::new("users", "id INT"));
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn empty_table_name_is_rejected() {
        let mut registry = TableRegistry::new();

        let result = registry.register("user", TableSpec::new("", "id INT"));
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn iteration_follows_registration_order() {
        let mut registry = TableRegistry::new();
        registry
            .register("user", TableSpec::new("users", "id INT"))
            .unwrap();
        registry
            .register("post", TableSpec::new("posts", "id INT"))
            .unwrap();

        let entities: Vec<&str> = registry.iter().map(|(entity, _)| entity).collect();
        assert_eq!(entities, vec!["user", "post"]);
    }
}
