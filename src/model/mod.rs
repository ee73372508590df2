//! Model and field metadata
//!
//! Models are declared in YAML (or built in code) and registered once in a
//! [`ModelRegistry`], which normalizes their table names.

pub mod field;
pub mod registry;
pub mod table;

pub use field::{Field, FieldType, Relation};
pub use registry::ModelRegistry;
pub use table::{IndexDef, Model};
