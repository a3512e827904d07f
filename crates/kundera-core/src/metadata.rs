//! Application wide metadata
//!
//! [`ApplicationMetadata`] indexes the metamodels of all loaded persistence
//! units. A unit is added once its bootstrap has finished and is discarded
//! again when it is unloaded. Readers only ever see fully built, immutable
//! metamodels.

use crate::conf::PersistenceUnitConfig;
use crate::metamodel::{
	IdentifiableTypeModel, Metamodel, MetamodelBuilder, MetamodelError, Result, TypeToken,
};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;

static GLOBAL: Lazy<ApplicationMetadata> = Lazy::new(ApplicationMetadata::new);

/// Registry of loaded persistence units
///
/// # Examples
///
/// ```
/// use kundera_core::metadata::ApplicationMetadata;
/// use kundera_core::metamodel::MetamodelBuilder;
///
/// let metadata = ApplicationMetadata::new();
/// metadata.add_metamodel(MetamodelBuilder::new("patest").build().unwrap());
///
/// assert!(metadata.is_loaded("patest"));
/// assert!(metadata.unload_persistence_unit("patest"));
/// assert!(metadata.metamodel("patest").is_err());
/// ```
#[derive(Debug, Default)]
pub struct ApplicationMetadata {
	units: RwLock<IndexMap<String, Arc<Metamodel>>>,
}

impl ApplicationMetadata {
	pub fn new() -> Self {
		Self::default()
	}

	/// Process wide instance
	pub fn global() -> &'static ApplicationMetadata {
		&GLOBAL
	}

	/// Register the metamodel of a persistence unit
	///
	/// A unit with the same name is replaced.
	pub fn add_metamodel(&self, metamodel: Metamodel) -> Arc<Metamodel> {
		let name = metamodel.persistence_unit().to_string();
		let metamodel = Arc::new(metamodel);
		let previous = self.units.write().insert(name.clone(), metamodel.clone());

		if previous.is_some() {
			tracing::warn!(persistence_unit = name.as_str(), "Replaced loaded persistence unit");
		} else {
			tracing::info!(
				persistence_unit = name.as_str(),
				entities = metamodel.entity_count(),
				"Loaded persistence unit"
			);
		}
		metamodel
	}

	/// Build the metamodel described by `config` and register it
	///
	/// `register` receives a builder preconfigured from `config` and adds the
	/// unit's types to it.
	pub fn load_persistence_unit<F>(
		&self,
		config: &PersistenceUnitConfig,
		register: F,
	) -> Result<Arc<Metamodel>>
	where
		F: FnOnce(&mut MetamodelBuilder) -> Result<()>,
	{
		let mut builder = MetamodelBuilder::from_config(config);
		register(&mut builder)?;
		let metamodel = builder.build()?;
		Ok(self.add_metamodel(metamodel))
	}

	pub fn metamodel(&self, persistence_unit: &str) -> Result<Arc<Metamodel>> {
		self.units
			.read()
			.get(persistence_unit)
			.cloned()
			.ok_or_else(|| MetamodelError::UnknownPersistenceUnit(persistence_unit.to_string()))
	}

	/// Entity model of `token`, searched across all loaded units
	///
	/// Units are searched in load order and the first match wins.
	pub fn entity_metadata(&self, token: TypeToken) -> Result<Arc<IdentifiableTypeModel>> {
		self.units
			.read()
			.values()
			.find_map(|metamodel| metamodel.entity(token).ok().cloned())
			.ok_or_else(|| MetamodelError::UnknownType {
				entity: token.simple_name().to_string(),
			})
	}

	pub fn entity_metadata_of<X: 'static>(&self) -> Result<Arc<IdentifiableTypeModel>> {
		self.entity_metadata(TypeToken::of::<X>())
	}

	/// Name of the first loaded unit that maps `token`
	pub fn persistence_unit_of(&self, token: TypeToken) -> Option<String> {
		self.units
			.read()
			.iter()
			.find(|(_, metamodel)| metamodel.contains(token))
			.map(|(name, _)| name.clone())
	}

	/// Discard a unit, returning whether it was loaded
	pub fn unload_persistence_unit(&self, persistence_unit: &str) -> bool {
		let removed = self.units.write().shift_remove(persistence_unit).is_some();
		if removed {
			tracing::info!(persistence_unit, "Unloaded persistence unit");
		}
		removed
	}

	pub fn is_loaded(&self, persistence_unit: &str) -> bool {
		self.units.read().contains_key(persistence_unit)
	}

	/// Names of the loaded units in load order
	pub fn persistence_units(&self) -> Vec<String> {
		self.units.read().keys().cloned().collect()
	}

	/// Discard every loaded unit
	pub fn clear(&self) {
		self.units.write().clear();
	}
}
