//! Managed type attribute registry
//!
//! [`ManagedTypeModel`] is the part shared by every mapped type: entities,
//! mapped superclasses and embeddables. It only knows the attributes declared
//! on the type itself. Inherited lookups are handled by
//! [`IdentifiableTypeModel`](super::IdentifiableTypeModel).

use super::attribute::SingularAttribute;
use super::error::{MetamodelError, Result};
use super::types::{PersistenceType, TypeToken};
use indexmap::IndexMap;

/// Declared attributes of a mapped type, in declaration order
#[derive(Debug, Clone)]
pub struct ManagedTypeModel {
	java_type: TypeToken,
	persistence_type: PersistenceType,
	attributes: IndexMap<String, SingularAttribute>,
}

impl ManagedTypeModel {
	/// Create an empty model for the type `token`
	///
	/// # Examples
	///
	/// ```
	/// use kundera_core::metamodel::{ManagedTypeModel, PersistenceType, SingularAttribute, TypeToken};
	///
	/// struct Address;
	///
	/// let mut address = ManagedTypeModel::new(TypeToken::of::<Address>(), PersistenceType::Embeddable);
	/// address.add_attribute(SingularAttribute::new::<Address, String>("city")).unwrap();
	/// assert!(address.declared_attribute("city").is_ok());
	/// ```
	pub fn new(java_type: TypeToken, persistence_type: PersistenceType) -> Self {
		Self {
			java_type,
			persistence_type,
			attributes: IndexMap::new(),
		}
	}

	/// Shorthand for an embeddable model of `T`
	pub fn embeddable<T: 'static>() -> Self {
		Self::new(TypeToken::of::<T>(), PersistenceType::Embeddable)
	}

	pub fn java_type(&self) -> TypeToken {
		self.java_type
	}

	pub fn persistence_type(&self) -> PersistenceType {
		self.persistence_type
	}

	/// Short type name used in diagnostics
	pub fn name(&self) -> &'static str {
		self.java_type.simple_name()
	}

	/// Register an attribute declared by this type
	pub fn add_attribute(&mut self, attribute: SingularAttribute) -> Result<()> {
		if attribute.declaring_type() != self.java_type {
			return Err(MetamodelError::ForeignAttribute {
				entity: self.name().to_string(),
				attribute: attribute.name().to_string(),
				declared_by: attribute.declaring_type().simple_name().to_string(),
			});
		}
		if self.attributes.contains_key(attribute.name()) {
			return Err(MetamodelError::DuplicateAttribute {
				entity: self.name().to_string(),
				attribute: attribute.name().to_string(),
			});
		}

		self.attributes
			.insert(attribute.name().to_string(), attribute);
		Ok(())
	}

	/// Register an identifier attribute, merging it with a same-named declaration
	///
	/// An existing entry of the same value type is replaced in place, so its
	/// declaration position is kept and the id flag wins.
	pub(crate) fn ensure_attribute(&mut self, attribute: &SingularAttribute) -> Result<()> {
		let Some(existing) = self.attributes.get(attribute.name()) else {
			return self.add_attribute(attribute.clone());
		};
		if existing.attribute_type() != attribute.attribute_type() {
			return Err(MetamodelError::IdentifierTypeConflict {
				entity: self.name().to_string(),
				attribute: attribute.name().to_string(),
				id_type: attribute.java_type().simple_name().to_string(),
				declared_type: existing.java_type().simple_name().to_string(),
			});
		}

		self.attributes
			.insert(attribute.name().to_string(), attribute.clone());
		Ok(())
	}

	pub fn declared_attribute(&self, name: &str) -> Result<&SingularAttribute> {
		self.attributes
			.get(name)
			.ok_or_else(|| MetamodelError::AttributeNotFound {
				entity: self.name().to_string(),
				attribute: name.to_string(),
			})
	}

	pub fn has_declared_attribute(&self, name: &str) -> bool {
		self.attributes.contains_key(name)
	}

	pub fn declared_attributes(&self) -> impl Iterator<Item = &SingularAttribute> {
		self.attributes.values()
	}

	pub fn attribute_count(&self) -> usize {
		self.attributes.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	struct Address;
	struct Employee;

	#[fixture]
	fn address() -> ManagedTypeModel {
		let mut model = ManagedTypeModel::embeddable::<Address>();
		model
			.add_attribute(SingularAttribute::new::<Address, String>("street"))
			.unwrap();
		model
			.add_attribute(SingularAttribute::new::<Address, String>("city"))
			.unwrap();
		model
	}

	#[rstest]
	fn test_declaration_order_is_kept(address: ManagedTypeModel) {
		let names: Vec<_> = address.declared_attributes().map(|a| a.name()).collect();

		assert_eq!(names, vec!["street", "city"]);
		assert_eq!(address.attribute_count(), 2);
		assert_eq!(address.persistence_type(), PersistenceType::Embeddable);
	}

	#[rstest]
	fn test_duplicate_attribute_rejected(mut address: ManagedTypeModel) {
		let result = address.add_attribute(SingularAttribute::new::<Address, i32>("city"));

		assert_eq!(
			result,
			Err(MetamodelError::DuplicateAttribute {
				entity: "Address".to_string(),
				attribute: "city".to_string(),
			})
		);
	}

	#[rstest]
	fn test_foreign_attribute_rejected(mut address: ManagedTypeModel) {
		let result = address.add_attribute(SingularAttribute::new::<Employee, i32>("id"));

		assert!(matches!(
			result,
			Err(MetamodelError::ForeignAttribute { declared_by, .. }) if declared_by == "Employee"
		));
	}

	#[rstest]
	fn test_ensure_attribute_is_idempotent(mut address: ManagedTypeModel) {
		let city = SingularAttribute::new::<Address, String>("city");

		address.ensure_attribute(&city).unwrap();
		address
			.ensure_attribute(&SingularAttribute::new::<Address, String>("zip"))
			.unwrap();

		assert_eq!(address.attribute_count(), 3);
	}

	#[rstest]
	fn test_ensure_attribute_upgrades_existing_entry(mut address: ManagedTypeModel) {
		// Arrange
		let street = SingularAttribute::new::<Address, String>("street").id();

		// Act
		address.ensure_attribute(&street).unwrap();

		// Assert
		let names: Vec<_> = address.declared_attributes().map(|a| a.name()).collect();
		assert_eq!(names, vec!["street", "city"]);
		assert!(address.declared_attribute("street").unwrap().is_id());
	}

	#[rstest]
	fn test_ensure_attribute_rejects_type_conflict(mut address: ManagedTypeModel) {
		let result = address.ensure_attribute(&SingularAttribute::new::<Address, i32>("city").id());

		assert_eq!(
			result,
			Err(MetamodelError::IdentifierTypeConflict {
				entity: "Address".to_string(),
				attribute: "city".to_string(),
				id_type: "i32".to_string(),
				declared_type: "String".to_string(),
			})
		);
		assert!(!address.declared_attribute("city").unwrap().is_id());
	}

	#[rstest]
	fn test_missing_declared_attribute(address: ManagedTypeModel) {
		let err = address.declared_attribute("country").unwrap_err();

		assert_eq!(
			err.to_string(),
			"attribute `country` not found in `Address`"
		);
	}
}
