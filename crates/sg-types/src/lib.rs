//! # sg-types
//!
//! Host type model for Stencil Guard.
//!
//! Templates reach host objects through reflection. This crate names those
//! host types ([`TypeName`]), describes how they relate ([`TypeDescriptor`],
//! [`HierarchyResolver`]) and defines the reflective surface a live object
//! exposes to the template engine ([`HostObject`]).
//!
//! ## Key invariants
//!
//! - **Exact identity**: type names compare as raw strings. No case folding,
//!   no trimming, no namespace normalization.
//! - **Finite chains**: [`HierarchyResolver::ancestor_chain`] always
//!   terminates and is never empty.
//! - **Read-only view**: nothing in this crate decides access; it only
//!   answers questions about types.

pub mod error;
pub mod hierarchy;
pub mod name;
pub mod object;
pub mod table;

pub use error::TypeError;
pub use hierarchy::{FlatHierarchy, HierarchyResolver};
pub use name::{TypeDescriptor, TypeName};
pub use object::{HostObject, RecordObject, Value};
pub use table::{Constructor, TypeTable, TypeTableFile};
