//! Schema editing: DDL emission and deferred statement bookkeeping

pub mod deferred;
pub mod editor;

pub use deferred::{DeferredCategory, DeferredStatements};
pub use editor::{EditorState, SchemaEditor};
