//! # confstore-http
//!
//! Blocking HTTP client for a remote confstore config service.
//!
//! [`RemoteConfigStore`] implements the [`confstore_data::ConfigStore`]
//! capability over the service's REST surface, so workflow code written
//! against the trait runs unchanged whether the store is in-process or on
//! the other side of a network.
//!
//! ## Protocol
//!
//! - `list()`                → `GET Config`           → 200, JSON array of names
//! - `get(name)`             → `GET Config/{name}`    → 200, JSON document
//! - `create(config)`        → `POST Config`          → 201, JSON document
//! - `update(name, config)`  → `PUT Config/{name}`    → 200, JSON document
//! - `delete(name)`          → `DELETE Config/{name}` → 204
//!
//! Failure statuses map onto the shared error taxonomy (400 → validation,
//! 404 → not found, 409 → name conflict, 415 → unsupported media type);
//! anything else - connection faults included - surfaces as a transport
//! error and is never retried.

pub mod error;
pub mod remote;

pub use error::Error;
pub use remote::RemoteConfigStore;
