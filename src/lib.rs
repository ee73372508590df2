//! Configurable object naming and ordered DDL generation for Oracle-like backends

pub mod backend;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod migration;
pub mod model;
pub mod naming;
pub mod progress;
pub mod render;
pub mod schema;

pub use error::{AdapterError, Result};
