//! Leveled log emission with fire-and-forget forwarding to a remote sink.

use std::{error::Error as StdError, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use shared::domain::{ErrorDetail, LogLevel, LogRecord};
use tokio::runtime::Handle;
use url::Url;

/// Destination for forwarded log records.
#[async_trait]
pub trait LogSink: Send + Sync {
    async fn forward(&self, record: &LogRecord) -> Result<()>;
}

/// Posts each record as JSON to the log collection endpoint.
pub struct HttpLogSink {
    http: Client,
    endpoint: Url,
}

impl HttpLogSink {
    pub fn new(endpoint: Url) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(http: Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }
}

#[async_trait]
impl LogSink for HttpLogSink {
    async fn forward(&self, record: &LogRecord) -> Result<()> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(record)
            .send()
            .await?;
        // The collector's answer carries nothing we act on.
        tracing::trace!(status = response.status().as_u16(), "log record forwarded");
        Ok(())
    }
}

/// Sink for offline runs: records only reach the console.
pub struct NoopLogSink;

#[async_trait]
impl LogSink for NoopLogSink {
    async fn forward(&self, _record: &LogRecord) -> Result<()> {
        Ok(())
    }
}

/// Cloneable logging handle injected into every component that reports.
///
/// Each call writes a console line through `tracing` before returning, then
/// hands a [`LogRecord`] to the sink on a detached task. Forwarding failures
/// never reach the caller.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn LogSink>,
}

impl Logger {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    pub fn console_only() -> Self {
        Self::new(Arc::new(NoopLogSink))
    }

    pub fn info(&self, message: impl Into<String>) {
        self.emit(LogLevel::Info, message.into(), None);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.emit(LogLevel::Warn, message.into(), None);
    }

    pub fn error(&self, message: impl Into<String>, cause: &(dyn StdError + 'static)) {
        self.emit(
            LogLevel::Error,
            message.into(),
            Some(ErrorDetail::from_error(cause)),
        );
    }

    fn emit(&self, level: LogLevel, message: String, error: Option<ErrorDetail>) {
        let record = LogRecord::now(level, message, error);
        write_console(&record);
        self.forward(record);
    }

    fn forward(&self, record: LogRecord) {
        let Ok(runtime) = Handle::try_current() else {
            tracing::warn!(
                target: "catalog::log",
                level = record.level.as_str(),
                "no async runtime available; log record not forwarded"
            );
            return;
        };

        let sink = Arc::clone(&self.sink);
        runtime.spawn(async move {
            if let Err(err) = sink.forward(&record).await {
                tracing::error!(
                    target: "catalog::log",
                    error = %err,
                    "Failed to write to log sink"
                );
            }
        });
    }
}

fn write_console(record: &LogRecord) {
    let timestamp = record.timestamp.as_str();
    match (record.level, &record.error) {
        (LogLevel::Info, _) => {
            tracing::info!(target: "catalog::log", timestamp, "{}", record.message)
        }
        (LogLevel::Warn, _) => {
            tracing::warn!(target: "catalog::log", timestamp, "{}", record.message)
        }
        (LogLevel::Error, Some(detail)) => tracing::error!(
            target: "catalog::log",
            timestamp,
            error.name = detail.name.as_str(),
            error.message = detail.message.as_str(),
            "{}",
            record.message
        ),
        (LogLevel::Error, None) => {
            tracing::error!(target: "catalog::log", timestamp, "{}", record.message)
        }
    }
}

#[cfg(test)]
#[path = "tests/logger_tests.rs"]
mod tests;
