//! # Kundera Core
//!
//! Persistence metamodel for Kundera, the object-datastore mapping layer for
//! column, graph and document stores.
//!
//! This crate provides:
//! - **Metamodel** (`metamodel` module): type tokens, attributes, managed and
//!   identifiable types, and the per persistence unit [`Metamodel`](metamodel::Metamodel)
//! - **Application metadata** (`metadata` module): the registry of loaded
//!   persistence units
//! - **Configuration** (`conf` module): persistence unit settings loaded from TOML
//!
//! Storage clients use the read side of the metamodel. They take the identifier
//! of an entity before a write, check a lookup key's type before a read, and
//! resolve the id column when translating query predicates.
//!
//! ## Quick Start
//!
//! ```rust
//! use kundera_core::prelude::*;
//!
//! struct Employee;
//! struct Manager;
//!
//! let config = PersistenceUnitConfig::new("hr", DatastoreKind::Column);
//! let metadata = ApplicationMetadata::new();
//!
//! let metamodel = metadata
//!     .load_persistence_unit(&config, |builder| {
//!         let mut employee = IdentifiableTypeBuilder::entity::<Employee>();
//!         employee.add_id_attribute(
//!             Some(SingularAttribute::new::<Employee, i32>("id").id()),
//!             false,
//!             [],
//!         )?;
//!         builder
//!             .add_entity(employee)?
//!             .add_entity(IdentifiableTypeBuilder::entity::<Manager>().extends::<Employee>())?;
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! let manager = metamodel.entity_of::<Manager>().unwrap();
//! assert_eq!(manager.id_of::<i32>().unwrap().name(), "id");
//! assert!(manager.declared_id_of::<i32>().is_err());
//! ```

pub mod conf;
pub mod metadata;
pub mod metamodel;

/// Re-export commonly used types
pub mod prelude {
	pub use crate::conf::{ConfigError, DatastoreKind, PersistenceUnitConfig};
	pub use crate::metadata::ApplicationMetadata;
	pub use crate::metamodel::{
		IdentifiableType, IdentifiableTypeBuilder, IdentifiableTypeModel, ManagedTypeModel,
		Metamodel, MetamodelBuilder, MetamodelError, PersistenceType, SingularAttribute,
		TypeDescriptor, TypeToken,
	};
}
