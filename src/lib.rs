//! # Kundera
//!
//! Object-datastore mapping for NoSQL backends.
//!
//! Kundera exposes the standard persistence metamodel (entity types, identifier
//! attributes, inheritance hierarchies and id-class composite keys) on top of
//! column, graph and document stores. This facade crate re-exports the
//! metamodel core.
//!
//! ## Quick Example
//!
//! ```rust
//! use kundera::prelude::*;
//!
//! struct Employee;
//!
//! let mut employee = IdentifiableTypeBuilder::entity::<Employee>();
//! employee
//!     .add_id_attribute(Some(SingularAttribute::new::<Employee, i32>("id").id()), false, [])
//!     .unwrap();
//!
//! let mut builder = MetamodelBuilder::new("hr");
//! builder.add_entity(employee).unwrap();
//! let metamodel = builder.build().unwrap();
//!
//! let employee = metamodel.entity_of::<Employee>().unwrap();
//! assert!(employee.has_single_id_attribute());
//! assert!(employee.id_of::<String>().is_err());
//! ```

pub use kundera_core::conf;
pub use kundera_core::metadata;
pub use kundera_core::metamodel;

pub use kundera_core::conf::{DatastoreKind, PersistenceUnitConfig};
pub use kundera_core::metadata::ApplicationMetadata;
pub use kundera_core::metamodel::{
	IdentifiableType, IdentifiableTypeModel, Metamodel, MetamodelError,
};

/// Re-export commonly used types
pub mod prelude {
	pub use kundera_core::prelude::*;
}
