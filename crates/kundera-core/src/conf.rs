//! Persistence unit configuration
//!
//! A persistence unit groups a set of mapped entity types with the datastore
//! that backs them. Units are usually described in TOML:
//!
//! ```toml
//! name = "imdb"
//! datastore = "graph"
//! entities = ["Actor", "Movie"]
//!
//! [properties]
//! "kundera.nodes" = "localhost"
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Family of the datastore backing a persistence unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatastoreKind {
	/// Wide column stores
	Column,
	/// Graph databases
	Graph,
	/// Document stores
	Document,
}

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("failed to read `{path}`: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to parse persistence unit configuration: {0}")]
	Parse(#[from] toml::de::Error),

	#[error("invalid persistence unit configuration: {0}")]
	Invalid(String),
}

/// Configuration of one persistence unit
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistenceUnitConfig {
	/// Unit name, used as the registry key
	pub name: String,

	pub datastore: DatastoreKind,

	/// Names of the entity classes mapped by this unit
	#[serde(default)]
	pub entities: Vec<String>,

	/// Reject entities that resolve no identifier when the metamodel is built
	#[serde(default = "default_validate_identifiers")]
	pub validate_identifiers: bool,

	/// Datastore specific settings, passed through untouched
	#[serde(default)]
	pub properties: IndexMap<String, String>,
}

fn default_validate_identifiers() -> bool {
	true
}

impl PersistenceUnitConfig {
	/// Create a configuration with default settings
	///
	/// # Examples
	///
	/// ```
	/// use kundera_core::conf::{DatastoreKind, PersistenceUnitConfig};
	///
	/// let config = PersistenceUnitConfig::new("imdb", DatastoreKind::Graph)
	///     .with_entity("Actor")
	///     .with_property("kundera.nodes", "localhost");
	///
	/// assert!(config.validate_identifiers);
	/// assert_eq!(config.property("kundera.nodes"), Some("localhost"));
	/// ```
	pub fn new(name: impl Into<String>, datastore: DatastoreKind) -> Self {
		Self {
			name: name.into(),
			datastore,
			entities: Vec::new(),
			validate_identifiers: true,
			properties: IndexMap::new(),
		}
	}

	pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
		self.entities.push(entity.into());
		self
	}

	pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.properties.insert(key.into(), value.into());
		self
	}

	pub fn with_identifier_validation(mut self, enabled: bool) -> Self {
		self.validate_identifiers = enabled;
		self
	}

	pub fn property(&self, key: &str) -> Option<&str> {
		self.properties.get(key).map(String::as_str)
	}

	/// Parse and validate a TOML document
	///
	/// # Examples
	///
	/// ```
	/// use kundera_core::conf::{DatastoreKind, PersistenceUnitConfig};
	///
	/// let config = PersistenceUnitConfig::from_toml_str(
	///     r#"
	///     name = "patest"
	///     datastore = "column"
	///     "#,
	/// )
	/// .unwrap();
	///
	/// assert_eq!(config.datastore, DatastoreKind::Column);
	/// assert!(config.entities.is_empty());
	/// ```
	pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(source)?;
		config.validate()?;
		Ok(config)
	}

	/// Read, parse and validate a TOML file
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		tracing::debug!(path = %path.display(), "Loading persistence unit configuration");
		Self::from_toml_str(&source)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.name.trim().is_empty() {
			return Err(ConfigError::Invalid(
				"persistence unit name must not be empty".to_string(),
			));
		}
		if let Some(entity) = self.entities.iter().find(|entity| entity.trim().is_empty()) {
			return Err(ConfigError::Invalid(format!(
				"unit `{}` lists an empty entity name ({:?})",
				self.name, entity
			)));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::io::Write;
	use tempfile::NamedTempFile;

	#[rstest]
	fn test_parse_full_document() {
		// Arrange
		let source = r#"
			name = "imdb"
			datastore = "graph"
			entities = ["Actor", "Movie"]
			validate_identifiers = false

			[properties]
			"kundera.nodes" = "localhost"
			"kundera.port" = "7474"
		"#;

		// Act
		let config = PersistenceUnitConfig::from_toml_str(source).unwrap();

		// Assert
		assert_eq!(config.name, "imdb");
		assert_eq!(config.datastore, DatastoreKind::Graph);
		assert_eq!(config.entities, vec!["Actor", "Movie"]);
		assert!(!config.validate_identifiers);
		let keys: Vec<_> = config.properties.keys().map(String::as_str).collect();
		assert_eq!(keys, vec!["kundera.nodes", "kundera.port"]);
	}

	#[rstest]
	#[case("column", DatastoreKind::Column)]
	#[case("graph", DatastoreKind::Graph)]
	#[case("document", DatastoreKind::Document)]
	fn test_datastore_kinds(#[case] label: &str, #[case] expected: DatastoreKind) {
		let source = format!("name = \"unit\"\ndatastore = \"{label}\"\n");

		let config = PersistenceUnitConfig::from_toml_str(&source).unwrap();

		assert_eq!(config.datastore, expected);
	}

	#[rstest]
	#[case("name = \"unit\"\ndatastore = \"relational\"\n")]
	#[case("datastore = \"graph\"\n")]
	#[case("name = \"unit\"\ndatastore = \"graph\"\nentities = \"Actor\"\n")]
	fn test_parse_errors(#[case] source: &str) {
		let err = PersistenceUnitConfig::from_toml_str(source).unwrap_err();

		assert!(matches!(err, ConfigError::Parse(_)));
	}

	#[rstest]
	#[case("name = \"  \"\ndatastore = \"graph\"\n")]
	#[case("name = \"unit\"\ndatastore = \"graph\"\nentities = [\"Actor\", \"\"]\n")]
	fn test_validation_errors(#[case] source: &str) {
		let err = PersistenceUnitConfig::from_toml_str(source).unwrap_err();

		assert!(matches!(err, ConfigError::Invalid(_)));
	}

	#[rstest]
	fn test_from_file() {
		let mut file = NamedTempFile::new().unwrap();
		writeln!(file, "name = \"patest\"").unwrap();
		writeln!(file, "datastore = \"document\"").unwrap();

		let config = PersistenceUnitConfig::from_file(file.path()).unwrap();

		assert_eq!(
			config,
			PersistenceUnitConfig::new("patest", DatastoreKind::Document)
		);
	}

	#[rstest]
	fn test_from_missing_file() {
		let dir = tempfile::tempdir().unwrap();

		let err = PersistenceUnitConfig::from_file(dir.path().join("missing.toml")).unwrap_err();

		assert!(matches!(err, ConfigError::Io { .. }));
		assert!(err.to_string().contains("missing.toml"));
	}

	#[rstest]
	fn test_round_trip_through_toml() {
		let config = PersistenceUnitConfig::new("imdb", DatastoreKind::Graph)
			.with_entity("Actor")
			.with_property("kundera.nodes", "localhost")
			.with_identifier_validation(false);

		let source = toml::to_string(&config).unwrap();

		assert_eq!(PersistenceUnitConfig::from_toml_str(&source).unwrap(), config);
	}
}
