//! Persistence metamodel
//!
//! Runtime descriptions of mapped types, modelled on the standard persistence
//! metamodel API:
//!
//! - [`TypeToken`], [`TypeDescriptor`] and [`PersistenceType`] describe types
//! - [`SingularAttribute`] describes a single-valued attribute
//! - [`ManagedTypeModel`] holds the attributes declared on one type
//! - [`IdentifiableTypeModel`] adds identifier metadata and supertype delegation
//! - [`Metamodel`] owns every type model of one persistence unit
//!
//! Models are written only through builders ([`IdentifiableTypeBuilder`],
//! [`MetamodelBuilder`]) and are immutable once frozen.
//!
//! ## Example
//!
//! ```
//! use kundera_core::metamodel::{IdentifiableType, IdentifiableTypeBuilder, SingularAttribute};
//!
//! struct OrderLine;
//!
//! let mut builder = IdentifiableTypeBuilder::entity::<OrderLine>();
//! builder
//!     .add_id_attribute(
//!         None,
//!         true,
//!         [
//!             SingularAttribute::new::<OrderLine, i64>("order_id").id(),
//!             SingularAttribute::new::<OrderLine, i32>("line_no").id(),
//!         ],
//!     )
//!     .unwrap();
//!
//! let order_line = builder.freeze(None).unwrap();
//! assert!(!order_line.has_single_id_attribute());
//! assert_eq!(order_line.id_class_attributes().unwrap().len(), 2);
//! ```

pub mod attribute;
pub mod builder;
pub mod error;
pub mod identifiable;
pub mod managed;
pub mod registry;
pub mod types;

pub use attribute::SingularAttribute;
pub use builder::IdentifiableTypeBuilder;
pub use error::{MetamodelError, Result};
pub use identifiable::{IdentifiableType, IdentifiableTypeModel};
pub use managed::ManagedTypeModel;
pub use registry::{Metamodel, MetamodelBuilder};
pub use types::{PersistenceType, TypeDescriptor, TypeToken};
