use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use shared::{domain::LogRecord, error::LoadError};
use tokio::sync::mpsc;

use crate::{loader::ProductSource, logger::LogSink, Logger};

pub(crate) struct RecordingSink {
    tx: mpsc::UnboundedSender<LogRecord>,
}

#[async_trait]
impl LogSink for RecordingSink {
    async fn forward(&self, record: &LogRecord) -> Result<()> {
        self.tx
            .send(record.clone())
            .map_err(|_| anyhow!("recording receiver dropped"))
    }
}

pub(crate) fn recording_logger() -> (Logger, mpsc::UnboundedReceiver<LogRecord>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Logger::new(Arc::new(RecordingSink { tx })), rx)
}

/// Lets pending forwarding tasks run, then returns everything they delivered.
pub(crate) async fn forwarded(rx: &mut mpsc::UnboundedReceiver<LogRecord>) -> Vec<LogRecord> {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
    let mut records = Vec::new();
    while let Ok(record) = rx.try_recv() {
        records.push(record);
    }
    records
}

pub(crate) struct StaticSource(pub Value);

#[async_trait]
impl ProductSource for StaticSource {
    fn location(&self) -> String {
        "static fixture".to_string()
    }

    async fn fetch(&self) -> Result<Value, LoadError> {
        Ok(self.0.clone())
    }
}

pub(crate) fn sample_product() -> Value {
    json!({
        "id": 1100,
        "categories": ["Category 1", "Category 2"],
        "name": "Product 100",
        "image": "https://picsum.photos/400?image=530",
        "inStock": true,
        "price": 381
    })
}
