//! Interaction core for the product catalog page.
//!
//! The display surface drives an [`InteractionController`] with filter and
//! sort intents and re-renders from the [`InteractionState`] snapshots it
//! publishes. Loading goes through a [`DataLoader`], intents through a
//! [`CatalogBackend`], and every component reports through an injected
//! [`Logger`].

pub mod backend;
pub mod controller;
pub mod endpoints;
pub mod format;
pub mod latency;
pub mod loader;
pub mod logger;

pub use backend::{CatalogBackend, SimulatedBackend};
pub use controller::{InteractionController, InteractionState, PendingOperation, Phase};
pub use endpoints::Endpoints;
pub use latency::LatencySimulator;
pub use loader::{DataLoader, FileProductSource, HttpProductSource, ProductSource};
pub use logger::{HttpLogSink, LogSink, Logger, NoopLogSink};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
