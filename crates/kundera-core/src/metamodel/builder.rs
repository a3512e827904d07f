//! Bootstrap-time construction of identifiable types
//!
//! Identifier metadata is written once while the persistence unit is loaded and
//! read many times afterwards. [`IdentifiableTypeBuilder`] is the only writable
//! form. [`IdentifiableTypeBuilder::freeze`] turns it into an immutable
//! [`IdentifiableTypeModel`].

use super::attribute::SingularAttribute;
use super::error::{MetamodelError, Result};
use super::identifiable::IdentifiableTypeModel;
use super::managed::ManagedTypeModel;
use super::types::{PersistenceType, TypeToken};
use std::collections::HashSet;
use std::sync::Arc;

/// Identifier triple set by [`IdentifiableTypeBuilder::add_id_attribute`]
#[derive(Debug, Clone)]
struct IdentifierMetadata {
	attribute: Option<SingularAttribute>,
	is_composite_key: bool,
	composite_key_attributes: HashSet<SingularAttribute>,
}

/// Writable form of an [`IdentifiableTypeModel`]
///
/// # Examples
///
/// ```
/// use kundera_core::metamodel::{IdentifiableType, IdentifiableTypeBuilder, SingularAttribute};
///
/// struct Employee;
///
/// let mut builder = IdentifiableTypeBuilder::entity::<Employee>();
/// builder
///     .add_id_attribute(Some(SingularAttribute::new::<Employee, i32>("id").id()), false, [])
///     .unwrap();
///
/// let employee = builder.freeze(None).unwrap();
/// assert_eq!(employee.id_of::<i32>().unwrap().name(), "id");
/// assert!(employee.id_of::<String>().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct IdentifiableTypeBuilder {
	managed: ManagedTypeModel,
	supertype: Option<TypeToken>,
	identifier: Option<IdentifierMetadata>,
}

impl IdentifiableTypeBuilder {
	/// Start a builder for an entity or mapped superclass
	pub fn new(java_type: TypeToken, persistence_type: PersistenceType) -> Result<Self> {
		if !persistence_type.is_identifiable() {
			return Err(MetamodelError::InvalidPersistenceType {
				entity: java_type.simple_name().to_string(),
				persistence_type: persistence_type.to_string(),
			});
		}

		Ok(Self {
			managed: ManagedTypeModel::new(java_type, persistence_type),
			supertype: None,
			identifier: None,
		})
	}

	pub fn entity<X: 'static>() -> Self {
		Self::unchecked(TypeToken::of::<X>(), PersistenceType::Entity)
	}

	pub fn mapped_superclass<X: 'static>() -> Self {
		Self::unchecked(TypeToken::of::<X>(), PersistenceType::MappedSuperclass)
	}

	fn unchecked(java_type: TypeToken, persistence_type: PersistenceType) -> Self {
		Self {
			managed: ManagedTypeModel::new(java_type, persistence_type),
			supertype: None,
			identifier: None,
		}
	}

	/// Record the direct supertype by its token
	pub fn with_supertype(mut self, supertype: TypeToken) -> Self {
		self.supertype = Some(supertype);
		self
	}

	/// Record `S` as the direct supertype
	pub fn extends<S: 'static>(self) -> Self {
		self.with_supertype(TypeToken::of::<S>())
	}

	pub fn java_type(&self) -> TypeToken {
		self.managed.java_type()
	}

	pub fn supertype(&self) -> Option<TypeToken> {
		self.supertype
	}

	/// Whether the identifier has been registered
	pub fn is_populated(&self) -> bool {
		self.identifier.is_some()
	}

	pub fn name(&self) -> &'static str {
		self.managed.name()
	}

	/// Register a non-identifier attribute declared by this type
	pub fn add_attribute(&mut self, attribute: SingularAttribute) -> Result<&mut Self> {
		self.managed.add_attribute(attribute)?;
		Ok(self)
	}

	/// Register the identifier of this type
	///
	/// For a single identifier pass the attribute and `is_composite_key = false`;
	/// `composite_attributes` is ignored in that case. For a composite key pass
	/// `is_composite_key = true` together with the key parts. The attribute is
	/// optional then and usually names the embedded id value.
	///
	/// The identifier can be registered only once. Attributes declared by this
	/// type are also added to its attribute registry. Identifiers declared on a
	/// supertype are accepted as they are.
	pub fn add_id_attribute(
		&mut self,
		attribute: Option<SingularAttribute>,
		is_composite_key: bool,
		composite_attributes: impl IntoIterator<Item = SingularAttribute>,
	) -> Result<&mut Self> {
		if self.identifier.is_some() {
			return Err(MetamodelError::IdentifierAlreadyRegistered {
				entity: self.name().to_string(),
			});
		}

		let composite_key_attributes = if is_composite_key {
			self.collect_key_parts(composite_attributes)?
		} else if attribute.is_none() {
			return Err(MetamodelError::MissingIdentifier {
				entity: self.name().to_string(),
			});
		} else {
			HashSet::new()
		};

		let mut managed = self.managed.clone();
		for part in attribute.iter().chain(composite_key_attributes.iter()) {
			if part.declaring_type() == self.java_type() {
				managed.ensure_attribute(part)?;
			}
		}
		self.managed = managed;

		tracing::debug!(
			entity = self.name(),
			id = attribute.as_ref().map(SingularAttribute::name),
			composite = is_composite_key,
			parts = composite_key_attributes.len(),
			"Registered identifier"
		);

		self.identifier = Some(IdentifierMetadata {
			attribute,
			is_composite_key,
			composite_key_attributes,
		});
		Ok(self)
	}

	fn collect_key_parts(
		&self,
		parts: impl IntoIterator<Item = SingularAttribute>,
	) -> Result<HashSet<SingularAttribute>> {
		let mut names = HashSet::new();
		let mut collected = HashSet::new();
		for part in parts {
			if !names.insert(part.name().to_string()) {
				return Err(MetamodelError::InvalidCompositeKey {
					entity: self.name().to_string(),
					reason: format!("key attribute `{}` is listed twice", part.name()),
				});
			}
			collected.insert(part);
		}

		if collected.is_empty() {
			return Err(MetamodelError::InvalidCompositeKey {
				entity: self.name().to_string(),
				reason: "composite key has no attributes".to_string(),
			});
		}
		Ok(collected)
	}

	/// Turn the builder into an immutable model
	///
	/// `supertype` must be the frozen model of the type recorded with
	/// [`with_supertype`](Self::with_supertype), or `None` for a root type.
	pub fn freeze(
		self,
		supertype: Option<Arc<IdentifiableTypeModel>>,
	) -> Result<IdentifiableTypeModel> {
		let given = supertype.as_ref().map(|model| model.managed().java_type());
		if given != self.supertype {
			return Err(MetamodelError::SupertypeMismatch {
				entity: self.name().to_string(),
				expected: describe(self.supertype),
				actual: describe(given),
			});
		}

		tracing::debug!(
			entity = self.name(),
			supertype = given.map(|token| token.simple_name()),
			populated = self.identifier.is_some(),
			"Froze identifiable type"
		);

		let IdentifierMetadata {
			attribute,
			is_composite_key,
			composite_key_attributes,
		} = self.identifier.unwrap_or(IdentifierMetadata {
			attribute: None,
			is_composite_key: false,
			composite_key_attributes: HashSet::new(),
		});

		Ok(IdentifiableTypeModel::from_parts(
			self.managed,
			supertype,
			attribute,
			is_composite_key,
			composite_key_attributes,
		))
	}
}

fn describe(token: Option<TypeToken>) -> String {
	token
		.map(|token| token.simple_name().to_string())
		.unwrap_or_else(|| "<none>".to_string())
}
