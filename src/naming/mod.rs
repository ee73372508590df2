//! Table identifier parsing, table normalization and object naming
//!
//! Names are derived deterministically from the model's table and the
//! configured patterns; see [`builder::PatternNameBuilder`].

pub mod builder;
pub mod identifier;
pub mod normalize;
pub mod pattern;
pub mod registry;

pub use builder::{NameBuilder, NamePatterns, ObjectType, PatternNameBuilder};
pub use identifier::{TableIdentifier, compose_identifier, split_identifier};
pub use normalize::normalize_table;
pub use pattern::{Template, TemplateValues};
pub use registry::{NameBuilderFactory, NameBuilderRef, NameBuilderRegistry};
