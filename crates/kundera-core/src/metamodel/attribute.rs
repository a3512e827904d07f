//! Singular attribute descriptors

use super::types::{PersistenceType, TypeDescriptor, TypeToken};
use std::hash::{Hash, Hasher};

/// Descriptor of a single-valued attribute of a managed type
///
/// Attributes are identified by their declaring type and name. Two descriptors
/// with the same declaring type and name compare equal even if their flags
/// differ, which keeps names unique inside attribute sets.
///
/// # Examples
///
/// ```
/// use kundera_core::metamodel::SingularAttribute;
///
/// struct Employee;
///
/// let id = SingularAttribute::new::<Employee, i32>("id").id();
/// assert_eq!(id.name(), "id");
/// assert!(id.is_id());
/// assert!(id.java_type_is::<i32>());
/// ```
#[derive(Debug, Clone)]
pub struct SingularAttribute {
	name: String,
	declaring_type: TypeToken,
	attribute_type: TypeDescriptor,
	id: bool,
	version: bool,
	optional: bool,
}

impl SingularAttribute {
	/// Create a basic attribute of value type `Y` declared by `X`
	pub fn new<X: 'static, Y: 'static>(name: impl Into<String>) -> Self {
		Self::with_type(name, TypeToken::of::<X>(), TypeDescriptor::basic::<Y>())
	}

	/// Create an attribute whose value type is the embeddable `Y`
	pub fn embedded<X: 'static, Y: 'static>(name: impl Into<String>) -> Self {
		Self::with_type(
			name,
			TypeToken::of::<X>(),
			TypeDescriptor::embeddable::<Y>(),
		)
	}

	pub fn with_type(
		name: impl Into<String>,
		declaring_type: TypeToken,
		attribute_type: TypeDescriptor,
	) -> Self {
		Self {
			name: name.into(),
			declaring_type,
			attribute_type,
			id: false,
			version: false,
			optional: true,
		}
	}

	/// Mark the attribute as (part of) the identifier
	///
	/// Identifier attributes are never optional.
	pub fn id(mut self) -> Self {
		self.id = true;
		self.optional = false;
		self
	}

	pub fn version(mut self) -> Self {
		self.version = true;
		self
	}

	pub fn optional(mut self, optional: bool) -> Self {
		self.optional = optional && !self.id;
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Type that declares this attribute
	pub fn declaring_type(&self) -> TypeToken {
		self.declaring_type
	}

	/// Full value type descriptor
	pub fn attribute_type(&self) -> &TypeDescriptor {
		&self.attribute_type
	}

	/// Runtime type of the attribute value
	pub fn java_type(&self) -> TypeToken {
		self.attribute_type.java_type()
	}

	pub fn java_type_is<Y: 'static>(&self) -> bool {
		self.attribute_type.is::<Y>()
	}

	pub fn is_id(&self) -> bool {
		self.id
	}

	pub fn is_version(&self) -> bool {
		self.version
	}

	pub fn is_optional(&self) -> bool {
		self.optional
	}

	/// Whether the value is an embedded (composite) value
	pub fn is_embedded(&self) -> bool {
		self.attribute_type.persistence_type() == PersistenceType::Embeddable
	}
}

impl PartialEq for SingularAttribute {
	fn eq(&self, other: &Self) -> bool {
		self.declaring_type == other.declaring_type && self.name == other.name
	}
}

impl Eq for SingularAttribute {}

impl Hash for SingularAttribute {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.declaring_type.hash(state);
		self.name.hash(state);
	}
}
