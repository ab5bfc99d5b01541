//! The seam between the controller and whatever answers filter/sort intents.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use shared::protocol::Intent;

use crate::latency::LatencySimulator;

#[async_trait]
pub trait CatalogBackend: Send + Sync {
    /// Completes once the backend has answered `intent`.
    async fn execute(&self, intent: &Intent) -> Result<()>;
}

/// Answers every intent after a simulated network delay.
///
/// Filtering and sorting happen on the display surface; this only stands in
/// for the round trip a real server would cost.
pub struct SimulatedBackend {
    latency: LatencySimulator,
}

impl SimulatedBackend {
    pub fn new(latency: LatencySimulator) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl CatalogBackend for SimulatedBackend {
    async fn execute(&self, intent: &Intent) -> Result<()> {
        let delay_ms = self.latency.next_delay();
        tracing::debug!(intent = intent.label(), delay_ms, "simulating backend latency");
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        Ok(())
    }
}
