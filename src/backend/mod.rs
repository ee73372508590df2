//! The backend collaborator: connection, profile and operations

pub mod connection;
pub mod operations;
pub mod profile;
pub mod recording;

pub use connection::{Connection, SqlParam};
pub use operations::DatabaseOperations;
pub use profile::{BackendProfile, SqlTemplates};
pub use recording::RecordingConnection;
