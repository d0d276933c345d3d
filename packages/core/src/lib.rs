//! # confstore-core
//!
//! Document model and durable entity storage for the confstore
//! configuration service.
//!
//! A *component* is a named configuration document: a tree of name/value
//! nodes under a [`ConfigRoot`]. Documents are wrapped in a [`JsonEntity`]
//! envelope and kept in a [`DurableMemoryStore`], an in-memory table that
//! persists each entity as its own JSON file and rebuilds itself from those
//! files on startup.
//!
//! ## Layering
//!
//! ```text
//! tree    - ConfigNode / ConfigRoot and the flattening invariant
//! entity  - JsonEntity: lazy two-way binding between a value and its JSON
//! store   - DurableMemoryStore: lock-guarded index + file persistence
//! fs      - FileSystem facade so the store can be tested without a disk
//! ```
//!
//! Higher layers (the CRUD handler and the admin workflows) live in their
//! own crates and only see this one through the store's public surface.

pub mod entity;
pub mod error;
pub mod fs;
pub mod store;
pub mod tree;

pub use entity::{EntityError, JsonEntity};
pub use error::StoreError;
pub use fs::{FileSystem, StdFileSystem};
pub use store::DurableMemoryStore;
pub use tree::{ConfigNode, ConfigRoot, TreeError};

#[cfg(any(test, feature = "test-utils"))]
pub use fs::MemoryFileSystem;
