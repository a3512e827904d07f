//! Per persistence unit metamodel
//!
//! [`MetamodelBuilder`] collects the type builders produced while scanning a
//! persistence unit. It links every type to its supertype and freezes the whole
//! set in one step. The resulting [`Metamodel`] owns all type models of the
//! unit. Supertype links between models are shared handles into the same set.

use super::builder::IdentifiableTypeBuilder;
use super::error::{MetamodelError, Result};
use super::identifiable::IdentifiableTypeModel;
use super::managed::ManagedTypeModel;
use super::types::{PersistenceType, TypeToken};
use crate::conf::PersistenceUnitConfig;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;

/// Immutable type registry of one persistence unit
#[derive(Debug, Clone)]
pub struct Metamodel {
	persistence_unit: String,
	entities: IndexMap<TypeToken, Arc<IdentifiableTypeModel>>,
	embeddables: IndexMap<TypeToken, ManagedTypeModel>,
}

impl Metamodel {
	pub fn persistence_unit(&self) -> &str {
		&self.persistence_unit
	}

	/// Identifiable type model of `token`
	pub fn entity(&self, token: TypeToken) -> Result<&Arc<IdentifiableTypeModel>> {
		self.entities
			.get(&token)
			.ok_or_else(|| MetamodelError::UnknownType {
				entity: token.simple_name().to_string(),
			})
	}

	pub fn entity_of<X: 'static>(&self) -> Result<&Arc<IdentifiableTypeModel>> {
		self.entity(TypeToken::of::<X>())
	}

	pub fn embeddable(&self, token: TypeToken) -> Result<&ManagedTypeModel> {
		self.embeddables
			.get(&token)
			.ok_or_else(|| MetamodelError::UnknownType {
				entity: token.simple_name().to_string(),
			})
	}

	pub fn contains(&self, token: TypeToken) -> bool {
		self.entities.contains_key(&token) || self.embeddables.contains_key(&token)
	}

	/// Identifiable types in registration order
	pub fn entities(&self) -> impl Iterator<Item = &Arc<IdentifiableTypeModel>> {
		self.entities.values()
	}

	pub fn embeddables(&self) -> impl Iterator<Item = &ManagedTypeModel> {
		self.embeddables.values()
	}

	/// Number of entities and mapped superclasses
	pub fn entity_count(&self) -> usize {
		self.entities.len()
	}
}

/// Collects type builders of a persistence unit and freezes them together
///
/// Builders may be added in any order. [`build`](Self::build) freezes
/// supertypes before their subtypes.
///
/// # Examples
///
/// ```
/// use kundera_core::metamodel::{IdentifiableType, IdentifiableTypeBuilder, MetamodelBuilder, SingularAttribute};
///
/// struct Employee;
/// struct Manager;
///
/// let mut employee = IdentifiableTypeBuilder::entity::<Employee>();
/// employee
///     .add_id_attribute(Some(SingularAttribute::new::<Employee, i32>("id").id()), false, [])
///     .unwrap();
///
/// let mut builder = MetamodelBuilder::new("hr");
/// builder
///     .add_entity(IdentifiableTypeBuilder::entity::<Manager>().extends::<Employee>())
///     .unwrap()
///     .add_entity(employee)
///     .unwrap();
///
/// let metamodel = builder.build().unwrap();
/// let manager = metamodel.entity_of::<Manager>().unwrap();
/// assert_eq!(manager.id_of::<i32>().unwrap().name(), "id");
/// ```
#[derive(Debug)]
pub struct MetamodelBuilder {
	persistence_unit: String,
	validate_identifiers: bool,
	entities: IndexMap<TypeToken, IdentifiableTypeBuilder>,
	embeddables: IndexMap<TypeToken, ManagedTypeModel>,
}

impl MetamodelBuilder {
	pub fn new(persistence_unit: impl Into<String>) -> Self {
		Self {
			persistence_unit: persistence_unit.into(),
			validate_identifiers: true,
			entities: IndexMap::new(),
			embeddables: IndexMap::new(),
		}
	}

	/// Builder for the unit described by `config`
	pub fn from_config(config: &PersistenceUnitConfig) -> Self {
		Self::new(config.name.clone()).validate_identifiers(config.validate_identifiers)
	}

	/// Require every entity to resolve an identifier (enabled by default)
	pub fn validate_identifiers(mut self, enabled: bool) -> Self {
		self.validate_identifiers = enabled;
		self
	}

	pub fn add_entity(&mut self, builder: IdentifiableTypeBuilder) -> Result<&mut Self> {
		let token = builder.java_type();
		self.ensure_new(token)?;
		self.entities.insert(token, builder);
		Ok(self)
	}

	pub fn add_embeddable(&mut self, model: ManagedTypeModel) -> Result<&mut Self> {
		if model.persistence_type() != PersistenceType::Embeddable {
			return Err(MetamodelError::InvalidPersistenceType {
				entity: model.name().to_string(),
				persistence_type: model.persistence_type().to_string(),
			});
		}
		let token = model.java_type();
		self.ensure_new(token)?;
		self.embeddables.insert(token, model);
		Ok(self)
	}

	fn ensure_new(&self, token: TypeToken) -> Result<()> {
		if self.entities.contains_key(&token) || self.embeddables.contains_key(&token) {
			return Err(MetamodelError::DuplicateType {
				entity: token.simple_name().to_string(),
			});
		}
		Ok(())
	}

	/// Freeze all registered types
	pub fn build(self) -> Result<Metamodel> {
		let Self {
			persistence_unit,
			validate_identifiers,
			entities: mut pending,
			embeddables,
		} = self;

		for builder in pending.values() {
			let Some(supertype) = builder.supertype() else {
				continue;
			};
			if !pending.contains_key(&supertype) {
				return Err(MetamodelError::UnknownSupertype {
					entity: builder.name().to_string(),
					supertype: supertype.simple_name().to_string(),
				});
			}
		}

		let order: Vec<TypeToken> = pending.keys().copied().collect();
		let mut frozen: HashMap<TypeToken, Arc<IdentifiableTypeModel>> = HashMap::new();

		for token in &order {
			if frozen.contains_key(token) {
				continue;
			}
			for link in unfrozen_lineage(*token, &pending, &frozen)?.into_iter().rev() {
				let builder = pending
					.shift_remove(&link)
					.ok_or_else(|| MetamodelError::UnknownType {
						entity: link.simple_name().to_string(),
					})?;
				let supertype = builder
					.supertype()
					.and_then(|supertype| frozen.get(&supertype).cloned());
				let model = builder.freeze(supertype)?;
				frozen.insert(link, Arc::new(model));
			}
		}

		let mut entities = IndexMap::with_capacity(order.len());
		for token in order {
			if let Some(model) = frozen.remove(&token) {
				entities.insert(token, model);
			}
		}

		if validate_identifiers {
			let unidentified = entities.values().find(|model| {
				model.persistence_type() == PersistenceType::Entity && !model.resolves_identifier()
			});
			if let Some(model) = unidentified {
				return Err(MetamodelError::MissingIdentifier {
					entity: model.name().to_string(),
				});
			}
		}

		tracing::debug!(
			persistence_unit = persistence_unit.as_str(),
			entities = entities.len(),
			embeddables = embeddables.len(),
			"Built metamodel"
		);

		Ok(Metamodel {
			persistence_unit,
			entities,
			embeddables,
		})
	}
}

/// `start` followed by its supertypes that are not frozen yet
fn unfrozen_lineage(
	start: TypeToken,
	pending: &IndexMap<TypeToken, IdentifiableTypeBuilder>,
	frozen: &HashMap<TypeToken, Arc<IdentifiableTypeModel>>,
) -> Result<Vec<TypeToken>> {
	let mut lineage = vec![start];
	let mut current = start;

	while let Some(supertype) = pending.get(&current).and_then(|builder| builder.supertype()) {
		if frozen.contains_key(&supertype) {
			break;
		}
		if lineage.contains(&supertype) {
			let mut cycle: Vec<_> = lineage.iter().map(|token| token.simple_name()).collect();
			cycle.push(supertype.simple_name());
			return Err(MetamodelError::CyclicInheritance {
				cycle: cycle.join(" -> "),
			});
		}
		lineage.push(supertype);
		current = supertype;
	}

	Ok(lineage)
}
