//! Vitrine Core Library
//!
//! Domain models, form validation, configuration and error types shared by the
//! API client, the submission workflow and the command-line console.

pub mod access;
pub mod config;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use access::AccessGate;
pub use config::ConsoleConfig;
pub use error::{CoreError, ErrorMetadata, LogLevel};
pub use models::{
    AssetReference, FieldDescriptor, FieldKind, Item, MediaCategory, MediaEntry, MediaKind,
    Resource, ResourceKind,
};
pub use validation::{validate, FieldErrors, NormalizedFields, RawInput};
