//! # confstore-admin
//!
//! Administrative workflows over a [`confstore_data::ConfigStore`].
//!
//! [`AdminConsole`] composes the store's five single-document operations
//! into multi-step workflows: copying a component, swapping two components'
//! contents, and bulk import/export. The console never touches storage or
//! the network itself - it only issues store calls, so it runs unchanged
//! against an in-process handler or a remote client, and tests drive it
//! with a fake.
//!
//! Every workflow is stateless per invocation: no persisted progress, no
//! retry queue. A failure partway through returns an error and leaves the
//! store in whatever state the completed steps produced.

pub mod clock;
pub mod console;

pub use clock::{Clock, SystemClock};
pub use console::{AdminConsole, ImportOutcome};
