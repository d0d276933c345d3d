//! Error taxonomy for the component CRUD surface.
//!
//! The variants map one-to-one onto the HTTP statuses the service's
//! transport-exposed form uses: `Validation` → 400, `NotFound` → 404,
//! `NameConflict` → 409, `UnsupportedMedia` → 415, everything else → 500.
//! `Transport` covers faults reaching a remote store (timeouts, DNS,
//! unexpected statuses, malformed payloads); those are never retried.

use confstore_core::StoreError;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The request itself is unacceptable: a malformed component name, or a
    /// create that collides with an existing name.
    #[error("Bad request: {message}")]
    Validation { message: String },

    #[error("Component '{name}' not found")]
    NotFound { name: String },

    /// A rename would overwrite a different component.
    #[error("Conflict: {message}")]
    NameConflict { message: String },

    #[error("Unsupported media type: {message}")]
    UnsupportedMedia { message: String },

    /// A fault in the transport to a remote store.
    #[error("Transport failure: {message}")]
    Transport { message: String },

    /// An unexpected fault, surfaced as-is.
    #[error("{message}")]
    Internal { message: String },

    #[error("Store failure: {0}")]
    Store(#[from] StoreError),
}
