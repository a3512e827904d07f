//! Identifiable types
//!
//! An identifiable type is an entity or mapped superclass. It can answer the
//! question "what identifies an instance of this type", either through a single
//! id attribute or through a composite key (id class). When a type declares no
//! identifier of its own, the answer is resolved through its supertype chain.
//!
//! Models are created by [`IdentifiableTypeBuilder`](super::IdentifiableTypeBuilder)
//! during bootstrap and are immutable afterwards, so they can be shared between
//! threads without locking.

use super::attribute::SingularAttribute;
use super::error::{MetamodelError, Result};
use super::managed::ManagedTypeModel;
use super::types::{PersistenceType, TypeDescriptor, TypeToken};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::sync::Arc;

/// Identifier capabilities of a mapped type
///
/// Requested identifier types are passed as [`TypeToken`]s and compared by
/// exact equality. The `*_of` helpers build the token from a type parameter.
pub trait IdentifiableType {
	type Supertype: IdentifiableType + ?Sized;

	/// Runtime type of the mapped class
	fn java_type(&self) -> TypeToken;

	/// Id attribute of the requested type, declared here or inherited
	fn id(&self, expected: TypeToken) -> Result<&SingularAttribute>;

	/// Id attribute of the requested type declared on this very type
	fn declared_id(&self, expected: TypeToken) -> Result<&SingularAttribute>;

	fn supertype(&self) -> Option<&Self::Supertype>;

	/// Whether this type declares a single, non-composite id attribute
	fn has_single_id_attribute(&self) -> bool;

	/// Attributes forming the composite key
	fn id_class_attributes(&self) -> Result<&HashSet<SingularAttribute>>;

	/// Type of the identifier, declared here or inherited
	fn id_type(&self) -> Result<&TypeDescriptor>;

	fn version(&self, expected: TypeToken) -> Result<&SingularAttribute>;

	fn declared_version(&self, expected: TypeToken) -> Result<&SingularAttribute>;

	fn has_version_attribute(&self) -> bool;

	fn id_of<Y: 'static>(&self) -> Result<&SingularAttribute>
	where
		Self: Sized,
	{
		self.id(TypeToken::of::<Y>())
	}

	fn declared_id_of<Y: 'static>(&self) -> Result<&SingularAttribute>
	where
		Self: Sized,
	{
		self.declared_id(TypeToken::of::<Y>())
	}

	fn version_of<Y: 'static>(&self) -> Result<&SingularAttribute>
	where
		Self: Sized,
	{
		self.version(TypeToken::of::<Y>())
	}

	fn declared_version_of<Y: 'static>(&self) -> Result<&SingularAttribute>
	where
		Self: Sized,
	{
		self.declared_version(TypeToken::of::<Y>())
	}
}

/// Outcome of matching a requested id type against one type's own declaration
enum LocalId<'a> {
	Declared(&'a SingularAttribute),
	/// No identifier here, keep looking on the supertype
	Absent,
	/// Wrong type, or a composite key is in use
	Mismatch,
}

/// Frozen identifier metadata of one entity or mapped superclass
#[derive(Debug, Clone)]
pub struct IdentifiableTypeModel {
	managed: ManagedTypeModel,
	supertype: Option<Arc<IdentifiableTypeModel>>,
	id_attribute: Option<SingularAttribute>,
	is_composite_key: bool,
	composite_key_attributes: HashSet<SingularAttribute>,
}

impl IdentifiableTypeModel {
	pub(crate) fn from_parts(
		managed: ManagedTypeModel,
		supertype: Option<Arc<IdentifiableTypeModel>>,
		id_attribute: Option<SingularAttribute>,
		is_composite_key: bool,
		composite_key_attributes: HashSet<SingularAttribute>,
	) -> Self {
		Self {
			managed,
			supertype,
			id_attribute,
			is_composite_key,
			composite_key_attributes,
		}
	}

	/// Attribute registry of this type
	pub fn managed(&self) -> &ManagedTypeModel {
		&self.managed
	}

	pub fn persistence_type(&self) -> PersistenceType {
		self.managed.persistence_type()
	}

	/// Short type name used in diagnostics
	pub fn name(&self) -> &'static str {
		self.managed.name()
	}

	pub fn is_composite_key(&self) -> bool {
		self.is_composite_key
	}

	/// Shared handle of the direct supertype
	pub fn supertype_arc(&self) -> Option<&Arc<IdentifiableTypeModel>> {
		self.supertype.as_ref()
	}

	/// Whether this type is the root of its inheritance chain
	pub fn is_root(&self) -> bool {
		self.supertype.is_none()
	}

	/// Supertypes from the direct parent up to the root
	pub fn ancestors(&self) -> impl Iterator<Item = &IdentifiableTypeModel> {
		std::iter::successors(self.supertype.as_deref(), |model| {
			model.supertype.as_deref()
		})
	}

	/// This type followed by all of its supertypes
	fn chain(&self) -> impl Iterator<Item = &IdentifiableTypeModel> {
		std::iter::once(self).chain(self.ancestors())
	}

	/// Whether this type or a supertype declares identifier metadata
	pub fn resolves_identifier(&self) -> bool {
		self.chain()
			.any(|model| model.id_attribute.is_some() || model.is_composite_key)
	}

	/// Attribute by name, declared here or inherited
	pub fn attribute(&self, name: &str) -> Result<&SingularAttribute> {
		self.chain()
			.find_map(|model| model.managed.declared_attribute(name).ok())
			.ok_or_else(|| MetamodelError::AttributeNotFound {
				entity: self.name().to_string(),
				attribute: name.to_string(),
			})
	}

	/// All attributes visible on this type, inherited ones first
	///
	/// A redeclaration on a subtype replaces the inherited attribute in place.
	pub fn attributes(&self) -> Vec<&SingularAttribute> {
		let lineage: Vec<_> = self.chain().collect();
		let mut visible: IndexMap<&str, &SingularAttribute> = IndexMap::new();
		for model in lineage.into_iter().rev() {
			for attribute in model.managed.declared_attributes() {
				visible.insert(attribute.name(), attribute);
			}
		}
		visible.into_values().collect()
	}

	pub fn declared_attribute(&self, name: &str) -> Result<&SingularAttribute> {
		self.managed.declared_attribute(name)
	}

	fn mismatch(&self, expected: TypeToken) -> MetamodelError {
		MetamodelError::IdentifierMismatch {
			entity: self.name().to_string(),
			requested: expected.name().to_string(),
		}
	}

	/// Classify the locally declared identifier against `expected`
	fn local_id(&self, expected: TypeToken) -> LocalId<'_> {
		if self.is_composite_key {
			return LocalId::Mismatch;
		}
		match &self.id_attribute {
			Some(attribute) if attribute.java_type() == expected => LocalId::Declared(attribute),
			Some(_) => LocalId::Mismatch,
			None => LocalId::Absent,
		}
	}

	fn unsupported_versioning(&self) -> MetamodelError {
		MetamodelError::UnsupportedFeature(format!(
			"versioning is not supported (requested on `{}`)",
			self.name()
		))
	}
}

impl IdentifiableType for IdentifiableTypeModel {
	type Supertype = IdentifiableTypeModel;

	fn java_type(&self) -> TypeToken {
		self.managed.java_type()
	}

	fn id(&self, expected: TypeToken) -> Result<&SingularAttribute> {
		for model in self.chain() {
			match model.local_id(expected) {
				LocalId::Declared(attribute) => return Ok(attribute),
				LocalId::Absent => continue,
				LocalId::Mismatch => break,
			}
		}
		Err(self.mismatch(expected))
	}

	fn declared_id(&self, expected: TypeToken) -> Result<&SingularAttribute> {
		match self.local_id(expected) {
			LocalId::Declared(attribute) => Ok(attribute),
			LocalId::Absent | LocalId::Mismatch => Err(self.mismatch(expected)),
		}
	}

	fn supertype(&self) -> Option<&IdentifiableTypeModel> {
		self.supertype.as_deref()
	}

	fn has_single_id_attribute(&self) -> bool {
		!self.is_composite_key && self.id_attribute.is_some()
	}

	fn id_class_attributes(&self) -> Result<&HashSet<SingularAttribute>> {
		if self.is_composite_key {
			Ok(&self.composite_key_attributes)
		} else {
			Err(MetamodelError::NotACompositeKey {
				entity: self.name().to_string(),
			})
		}
	}

	fn id_type(&self) -> Result<&TypeDescriptor> {
		self.chain()
			.find_map(|model| match &model.id_attribute {
				Some(attribute) if !model.is_composite_key => Some(attribute.attribute_type()),
				_ => None,
			})
			.ok_or_else(|| {
				let entity = self.name().to_string();
				if self.chain().any(|model| model.is_composite_key) {
					MetamodelError::CompositeIdType { entity }
				} else {
					MetamodelError::MissingIdentifier { entity }
				}
			})
	}

	fn version(&self, _expected: TypeToken) -> Result<&SingularAttribute> {
		Err(self.unsupported_versioning())
	}

	fn declared_version(&self, _expected: TypeToken) -> Result<&SingularAttribute> {
		Err(self.unsupported_versioning())
	}

	fn has_version_attribute(&self) -> bool {
		tracing::warn!(
			entity = self.name(),
			"Versioning not yet supported, returning false by default"
		);
		false
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::metamodel::IdentifiableTypeBuilder;
	use rstest::{fixture, rstest};

	struct Employee;
	struct Manager;
	struct Director;
	struct OrderLine;

	#[fixture]
	fn employee() -> Arc<IdentifiableTypeModel> {
		let mut builder = IdentifiableTypeBuilder::entity::<Employee>();
		builder
			.add_attribute(SingularAttribute::new::<Employee, String>("name"))
			.unwrap()
			.add_id_attribute(
				Some(SingularAttribute::new::<Employee, i32>("id").id()),
				false,
				[],
			)
			.unwrap();
		Arc::new(builder.freeze(None).unwrap())
	}

	#[fixture]
	fn manager(employee: Arc<IdentifiableTypeModel>) -> IdentifiableTypeModel {
		let mut builder = IdentifiableTypeBuilder::entity::<Manager>().extends::<Employee>();
		builder
			.add_attribute(SingularAttribute::new::<Manager, String>("department"))
			.unwrap();
		builder.freeze(Some(employee)).unwrap()
	}

	#[fixture]
	fn order_line() -> IdentifiableTypeModel {
		let mut builder = IdentifiableTypeBuilder::entity::<OrderLine>();
		builder
			.add_id_attribute(
				None,
				true,
				[
					SingularAttribute::new::<OrderLine, i64>("order_id").id(),
					SingularAttribute::new::<OrderLine, i32>("line_no").id(),
				],
			)
			.unwrap();
		builder.freeze(None).unwrap()
	}

	#[rstest]
	fn test_id_with_matching_type(employee: Arc<IdentifiableTypeModel>) {
		let id = employee.id_of::<i32>().unwrap();

		assert_eq!(id.name(), "id");
		assert!(employee.has_single_id_attribute());
		assert!(employee.supertype().is_none());
	}

	#[rstest]
	fn test_id_with_other_type_fails(employee: Arc<IdentifiableTypeModel>) {
		let err = employee.id_of::<String>().unwrap_err();

		assert!(matches!(err, MetamodelError::IdentifierMismatch { ref entity, .. } if entity == "Employee"));
		assert!(employee.declared_id_of::<i64>().is_err());
	}

	#[rstest]
	fn test_id_is_inherited(manager: IdentifiableTypeModel) {
		// Act
		let id = manager.id_of::<i32>().unwrap();
		let declared = manager.declared_id_of::<i32>();

		// Assert
		assert_eq!(id.declaring_type(), TypeToken::of::<Employee>());
		assert!(matches!(
			declared,
			Err(MetamodelError::IdentifierMismatch { .. })
		));
		assert!(!manager.has_single_id_attribute());
		assert!(manager.id_type().unwrap().is::<i32>());
	}

	#[rstest]
	fn test_mismatch_on_supertype_reports_queried_type(manager: IdentifiableTypeModel) {
		let err = manager.id_of::<u64>().unwrap_err();

		assert_eq!(
			err,
			MetamodelError::IdentifierMismatch {
				entity: "Manager".to_string(),
				requested: "u64".to_string(),
			}
		);
	}

	#[rstest]
	fn test_delegation_through_several_levels(manager: IdentifiableTypeModel) {
		let director = IdentifiableTypeBuilder::entity::<Director>()
			.extends::<Manager>()
			.freeze(Some(Arc::new(manager)))
			.unwrap();

		assert_eq!(director.id_of::<i32>().unwrap().name(), "id");
		assert_eq!(director.ancestors().count(), 2);
		assert_eq!(director.attribute("name").unwrap().name(), "name");
	}

	#[rstest]
	#[case(TypeToken::of::<i64>())]
	#[case(TypeToken::of::<i32>())]
	#[case(TypeToken::of::<String>())]
	fn test_composite_key_never_has_single_id(
		order_line: IdentifiableTypeModel,
		#[case] requested: TypeToken,
	) {
		assert!(order_line.id(requested).is_err());
		assert!(order_line.declared_id(requested).is_err());
		assert!(!order_line.has_single_id_attribute());
	}

	#[rstest]
	fn test_id_class_attributes(order_line: IdentifiableTypeModel) {
		let expected: HashSet<_> = [
			SingularAttribute::new::<OrderLine, i32>("line_no"),
			SingularAttribute::new::<OrderLine, i64>("order_id"),
		]
		.into_iter()
		.collect();

		assert_eq!(order_line.id_class_attributes().unwrap(), &expected);
		assert!(order_line.is_composite_key());
	}

	#[rstest]
	fn test_id_class_attributes_without_composite_key(employee: Arc<IdentifiableTypeModel>) {
		let err = employee.id_class_attributes().unwrap_err();

		assert_eq!(
			err.to_string(),
			"identifiable type `Employee` does not have an id class"
		);
	}

	#[rstest]
	fn test_id_type_at_root_without_identifier() {
		let root = IdentifiableTypeBuilder::entity::<Employee>()
			.freeze(None)
			.unwrap();

		assert_eq!(
			root.id_type(),
			Err(MetamodelError::MissingIdentifier {
				entity: "Employee".to_string(),
			})
		);
		assert!(root.id_of::<i32>().is_err());
		assert!(!root.resolves_identifier());
	}

	#[rstest]
	fn test_id_type_of_composite_key(order_line: IdentifiableTypeModel) {
		let err = order_line.id_type().unwrap_err();

		assert_eq!(
			err,
			MetamodelError::CompositeIdType {
				entity: "OrderLine".to_string(),
			}
		);
		assert_eq!(
			err.to_string(),
			"`OrderLine` uses a composite key and has no single id type"
		);
	}

	#[rstest]
	fn test_versioning_is_unsupported(
		employee: Arc<IdentifiableTypeModel>,
		manager: IdentifiableTypeModel,
		order_line: IdentifiableTypeModel,
	) {
		let unpopulated = Arc::new(
			IdentifiableTypeBuilder::entity::<Employee>()
				.freeze(None)
				.unwrap(),
		);
		let unpopulated_subtype = IdentifiableTypeBuilder::entity::<Manager>()
			.extends::<Employee>()
			.freeze(Some(unpopulated.clone()))
			.unwrap();

		for model in [
			employee.as_ref(),
			&manager,
			&order_line,
			unpopulated.as_ref(),
			&unpopulated_subtype,
		] {
			assert!(matches!(
				model.version_of::<i64>(),
				Err(MetamodelError::UnsupportedFeature(_))
			));
			assert!(matches!(
				model.declared_version_of::<i64>(),
				Err(MetamodelError::UnsupportedFeature(_))
			));
			assert!(!model.has_version_attribute());
		}
	}

	#[rstest]
	fn test_attributes_inherited_first(manager: IdentifiableTypeModel) {
		let names: Vec<_> = manager.attributes().iter().map(|a| a.name()).collect();

		assert_eq!(names, vec!["name", "id", "department"]);
		assert!(manager.declared_attribute("name").is_err());
		assert!(matches!(
			manager.attribute("salary"),
			Err(MetamodelError::AttributeNotFound { .. })
		));
	}

	#[rstest]
	fn test_models_are_shareable_between_threads() {
		fn assert_send_sync<T: Send + Sync>() {}
		assert_send_sync::<IdentifiableTypeModel>();
		assert_send_sync::<Arc<IdentifiableTypeModel>>();
	}
}
