//! One-shot retrieval and advisory validation of the product list.

use std::{collections::HashSet, fmt, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use shared::{
    domain::{Product, ProductId},
    error::{json_kind, LoadError},
};
use url::Url;

use crate::logger::Logger;

#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Human-readable location, used in log lines.
    fn location(&self) -> String;

    async fn fetch(&self) -> Result<Value, LoadError>;
}

pub struct HttpProductSource {
    http: Client,
    endpoint: Url,
}

impl HttpProductSource {
    pub fn new(endpoint: Url) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(http: Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }
}

#[async_trait]
impl ProductSource for HttpProductSource {
    fn location(&self) -> String {
        self.endpoint.to_string()
    }

    async fn fetch(&self) -> Result<Value, LoadError> {
        let transport = |err: reqwest::Error| LoadError::Transport {
            location: self.location(),
            source: err.into(),
        };

        let response = self
            .http
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                location: self.location(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Reads the product list from a JSON file on disk.
pub struct FileProductSource {
    path: PathBuf,
}

impl FileProductSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ProductSource for FileProductSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Value, LoadError> {
        let raw = tokio::fs::read(&self.path)
            .await
            .map_err(|err| LoadError::Transport {
                location: self.location(),
                source: err.into(),
            })?;
        Ok(serde_json::from_slice(&raw)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordIssue {
    NotAnObject,
    MissingId,
    MissingName,
    MissingCategories,
    EmptyCategories,
    NegativePrice,
    DuplicateId(ProductId),
    MistypedField(&'static str),
}

impl fmt::Display for RecordIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => f.write_str("record is not an object"),
            Self::MissingId => f.write_str("missing id"),
            Self::MissingName => f.write_str("missing name"),
            Self::MissingCategories => f.write_str("missing categories"),
            Self::EmptyCategories => f.write_str("belongs to no category"),
            Self::NegativePrice => f.write_str("negative price"),
            Self::DuplicateId(id) => write!(f, "duplicate id {}", id.0),
            Self::MistypedField(field) => write!(f, "field '{field}' has an unexpected type"),
        }
    }
}

pub struct DataLoader {
    source: Arc<dyn ProductSource>,
    logger: Logger,
}

impl DataLoader {
    pub fn new(source: Arc<dyn ProductSource>, logger: Logger) -> Self {
        Self { source, logger }
    }

    /// Fetches the whole list once.
    ///
    /// Only a payload that is not a JSON array fails the load. Rows with
    /// structural problems are reported as warnings and kept.
    pub async fn load(&self) -> Result<Vec<Product>, LoadError> {
        self.logger.info("Loading products...");
        tracing::debug!(source = %self.source.location(), "fetching product list");

        let rows = match self.source.fetch().await? {
            Value::Array(rows) => rows,
            other => {
                return Err(LoadError::InvalidFormat {
                    found: json_kind(&other),
                })
            }
        };

        let mut seen = HashSet::with_capacity(rows.len());
        let products: Vec<Product> = rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let (product, issues) = inspect_row(row, &mut seen);
                if !issues.is_empty() {
                    let listed: Vec<String> = issues.iter().map(ToString::to_string).collect();
                    self.logger.warn(format!(
                        "Invalid product data at index {index}: {}",
                        listed.join(", ")
                    ));
                }
                product
            })
            .collect();

        self.logger
            .info(format!("Successfully loaded {} products", products.len()));
        Ok(products)
    }
}

fn inspect_row(row: &Value, seen: &mut HashSet<ProductId>) -> (Product, Vec<RecordIssue>) {
    if !row.is_object() {
        return (Product::default(), vec![RecordIssue::NotAnObject]);
    }

    let (product, mistyped) = Product::from_json_lossy(row);
    let mut issues: Vec<RecordIssue> = mistyped
        .into_iter()
        .map(RecordIssue::MistypedField)
        .collect();

    match product.id {
        None | Some(ProductId(0)) => issues.push(RecordIssue::MissingId),
        Some(id) if !seen.insert(id) => issues.push(RecordIssue::DuplicateId(id)),
        Some(_) => {}
    }
    if product.name.as_deref().map_or(true, str::is_empty) {
        issues.push(RecordIssue::MissingName);
    }
    match product.categories.as_deref() {
        None => issues.push(RecordIssue::MissingCategories),
        Some([]) => issues.push(RecordIssue::EmptyCategories),
        Some(_) => {}
    }
    if product.price.is_some_and(|price| price < 0.0) {
        issues.push(RecordIssue::NegativePrice);
    }

    (product, issues)
}

#[cfg(test)]
#[path = "tests/loader_tests.rs"]
mod tests;
