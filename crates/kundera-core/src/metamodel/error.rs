//! Metamodel error types

use thiserror::Error;

/// Errors raised while building or reading the persistence metamodel
///
/// All variants describe static mapping problems. None of them is transient,
/// so callers should never retry an operation that returned one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetamodelError {
	/// The requested identifier type does not match the declared identifier,
	/// or the type uses a composite key
	#[error(
		"id attribute of type `{requested}` is not declared in identifiable type `{entity}`, or `{entity}` uses a composite key"
	)]
	IdentifierMismatch { entity: String, requested: String },

	#[error("identifiable type `{entity}` does not have an id class")]
	NotACompositeKey { entity: String },

	#[error("unsupported feature: {0}")]
	UnsupportedFeature(String),

	/// Neither the type nor any of its supertypes declares an identifier
	#[error("no identifier is declared in `{entity}` or any of its supertypes")]
	MissingIdentifier { entity: String },

	/// The identifier chain ends in composite keys, which have no single id type
	#[error("`{entity}` uses a composite key and has no single id type")]
	CompositeIdType { entity: String },

	#[error("identifier of `{entity}` is already registered")]
	IdentifierAlreadyRegistered { entity: String },

	#[error("invalid composite key on `{entity}`: {reason}")]
	InvalidCompositeKey { entity: String, reason: String },

	#[error("`{persistence_type}` type `{entity}` cannot carry identifier metadata")]
	InvalidPersistenceType {
		entity: String,
		persistence_type: String,
	},

	#[error("attribute `{attribute}` not found in `{entity}`")]
	AttributeNotFound { entity: String, attribute: String },

	#[error("attribute `{attribute}` is already declared in `{entity}`")]
	DuplicateAttribute { entity: String, attribute: String },

	/// The attribute names another type as its declaring type
	#[error("attribute `{attribute}` is declared by `{declared_by}`, not by `{entity}`")]
	ForeignAttribute {
		entity: String,
		attribute: String,
		declared_by: String,
	},

	/// The identifier redeclares an attribute with a different value type
	#[error(
		"id attribute `{attribute}` of `{entity}` has type `{id_type}`, but the declared attribute has type `{declared_type}`"
	)]
	IdentifierTypeConflict {
		entity: String,
		attribute: String,
		id_type: String,
		declared_type: String,
	},

	#[error("type `{entity}` is registered more than once")]
	DuplicateType { entity: String },

	#[error("type `{entity}` is not part of the metamodel")]
	UnknownType { entity: String },

	#[error("supertype `{supertype}` of `{entity}` is not part of the metamodel")]
	UnknownSupertype { entity: String, supertype: String },

	/// The supertype handed over while freezing is not the one the builder recorded
	#[error("supertype mismatch for `{entity}`: expected `{expected}`, got `{actual}`")]
	SupertypeMismatch {
		entity: String,
		expected: String,
		actual: String,
	},

	#[error("cyclic inheritance detected: {cycle}")]
	CyclicInheritance { cycle: String },

	#[error("persistence unit `{0}` is not loaded")]
	UnknownPersistenceUnit(String),
}

pub type Result<T> = std::result::Result<T, MetamodelError>;
