//! Runtime type tokens and type descriptors
//!
//! The persistence metamodel compares identifier types by exact equality. A
//! [`TypeToken`] carries the [`TypeId`] used for that comparison together with
//! the type name used in diagnostics, so no reflection is needed.

use serde::{Deserialize, Serialize};
use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Runtime token identifying a Rust type
///
/// Two tokens are equal only when they were created for the very same type.
/// There is no covariance: `TypeToken::of::<i32>()` never equals
/// `TypeToken::of::<i64>()`.
///
/// # Examples
///
/// ```
/// use kundera_core::metamodel::TypeToken;
///
/// let token = TypeToken::of::<i32>();
/// assert_eq!(token, TypeToken::of::<i32>());
/// assert_ne!(token, TypeToken::of::<String>());
/// assert_eq!(token.name(), "i32");
/// ```
#[derive(Clone, Copy)]
pub struct TypeToken {
	id: TypeId,
	name: &'static str,
}

impl TypeToken {
	/// Create the token for `T`
	pub fn of<T: ?Sized + 'static>() -> Self {
		Self {
			id: TypeId::of::<T>(),
			name: type_name::<T>(),
		}
	}

	/// Fully qualified type name
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Type name without its module path
	///
	/// # Examples
	///
	/// ```
	/// use kundera_core::metamodel::TypeToken;
	///
	/// let token = TypeToken::of::<String>();
	/// assert_eq!(token.simple_name(), "String");
	/// ```
	pub fn simple_name(&self) -> &'static str {
		// References, slices, arrays, tuples and pointers are shown in full.
		if !self
			.name
			.starts_with(|c: char| c.is_alphabetic() || c == '_')
			|| self.name.starts_with("dyn ")
		{
			return self.name;
		}
		// Generic arguments may contain `::` as well, so only split the head.
		let head_end = self.name.find('<').unwrap_or(self.name.len());
		match self.name[..head_end].rfind("::") {
			Some(idx) => &self.name[idx + 2..],
			None => self.name,
		}
	}

	pub fn type_id(&self) -> TypeId {
		self.id
	}
}

impl PartialEq for TypeToken {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for TypeToken {}

impl Hash for TypeToken {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id.hash(state);
	}
}

impl fmt::Debug for TypeToken {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TypeToken({})", self.name)
	}
}

impl fmt::Display for TypeToken {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}

/// Discriminator for the kind of a mapped type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistenceType {
	/// A top-level entity with its own identity
	Entity,
	/// A superclass whose mapping is inherited by entities
	MappedSuperclass,
	/// A value type embedded in its owning entity
	Embeddable,
	/// A scalar value type (numbers, strings, ...)
	Basic,
}

impl PersistenceType {
	/// Whether types of this kind carry identifier metadata
	pub fn is_identifiable(self) -> bool {
		matches!(self, Self::Entity | Self::MappedSuperclass)
	}
}

impl fmt::Display for PersistenceType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let label = match self {
			Self::Entity => "entity",
			Self::MappedSuperclass => "mapped superclass",
			Self::Embeddable => "embeddable",
			Self::Basic => "basic",
		};
		f.write_str(label)
	}
}

/// Type of an attribute value or an identifier
///
/// # Examples
///
/// ```
/// use kundera_core::metamodel::{PersistenceType, TypeDescriptor};
///
/// let ty = TypeDescriptor::basic::<i64>();
/// assert_eq!(ty.persistence_type(), PersistenceType::Basic);
/// assert!(ty.is::<i64>());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
	java_type: TypeToken,
	persistence_type: PersistenceType,
}

impl TypeDescriptor {
	pub fn new(java_type: TypeToken, persistence_type: PersistenceType) -> Self {
		Self {
			java_type,
			persistence_type,
		}
	}

	/// Descriptor for a scalar value type
	pub fn basic<T: 'static>() -> Self {
		Self::new(TypeToken::of::<T>(), PersistenceType::Basic)
	}

	/// Descriptor for an embeddable value type
	pub fn embeddable<T: 'static>() -> Self {
		Self::new(TypeToken::of::<T>(), PersistenceType::Embeddable)
	}

	/// Runtime type token of the described type
	pub fn java_type(&self) -> TypeToken {
		self.java_type
	}

	pub fn persistence_type(&self) -> PersistenceType {
		self.persistence_type
	}

	/// Exact type check against `T`
	pub fn is<T: 'static>(&self) -> bool {
		self.java_type == TypeToken::of::<T>()
	}
}
