//! # confstore-data
//!
//! The component-level CRUD surface of confstore.
//!
//! [`ConfigStore`] is the capability every consumer programs against: five
//! operations over named configuration documents. [`ConfigHandler`]
//! implements it directly on top of a [`confstore_core::DurableMemoryStore`];
//! the `confstore-http` crate implements the same trait over an HTTP
//! boundary. Whether a store is local or remote is invisible to callers.

pub mod error;
pub mod handler;
pub mod settings;

pub use error::ConfigError;
pub use handler::ConfigHandler;
pub use settings::Settings;

use confstore_core::ConfigRoot;

/// Capability for reading and writing named configuration documents.
///
/// Component names compare case-insensitively throughout this layer.
pub trait ConfigStore {
    /// The names of every stored component, alphabetically.
    fn list(&self) -> Result<Vec<String>, ConfigError>;

    /// The document whose component name matches `component_name`.
    fn get(&self, component_name: &str) -> Result<ConfigRoot, ConfigError>;

    /// Store a new document under its own component name.
    fn create(&self, config: ConfigRoot) -> Result<ConfigRoot, ConfigError>;

    /// Overwrite the document currently stored under `component_name` with
    /// `config`. The document keeps its identity even when `config` carries
    /// a new name - this is a rename, not a recreate.
    fn update(&self, component_name: &str, config: ConfigRoot) -> Result<ConfigRoot, ConfigError>;

    /// Remove the document stored under `component_name`.
    fn delete(&self, component_name: &str) -> Result<(), ConfigError>;
}
