use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to fetch products from {location}: {source}")]
    Transport {
        location: String,
        source: anyhow::Error,
    },
    #[error("products endpoint {location} responded with status {status}")]
    Status { location: String, status: u16 },
    #[error("products payload is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid data format received: expected a JSON array, found {found}")]
    InvalidFormat { found: &'static str },
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("cannot format non-finite price {0}")]
    NonFinitePrice(f64),
    #[error("price {0} is too large to format")]
    PriceOutOfRange(f64),
}

/// Failures the interaction controller catches at its boundary.
///
/// The display text carries the internal detail and is only ever logged;
/// [`CatalogError::user_message`] is what reaches the display surface.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to load products: {0}")]
    Load(#[from] LoadError),
    #[error("filter operation failed: {source}")]
    Filter { source: anyhow::Error },
    #[error("sort operation failed: {source}")]
    Sort { source: anyhow::Error },
    #[error("failed to format display value: {0}")]
    Format(#[from] FormatError),
}

impl CatalogError {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Load(_) => "LoadError",
            Self::Filter { .. } => "FilterError",
            Self::Sort { .. } => "SortError",
            Self::Format(_) => "FormatError",
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Load(_) => "Failed to load products",
            Self::Filter { .. } => "Failed to filter products",
            Self::Sort { .. } => "Failed to sort products",
            Self::Format(_) => "N/A",
        }
    }
}

/// Kind of a JSON value, for error messages.
pub fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
