//! Worker lifecycle and event tools.
//!
//! These stand in for the platform: each tool dispatches one event to the
//! controller and reports what it did.

pub mod fetch;
pub mod lifecycle;
pub mod message;

pub use fetch::{WorkerFetchParams, fetch_impl};
pub use lifecycle::{activate_impl, install_impl};
pub use message::{WorkerMessageParams, message_impl};
