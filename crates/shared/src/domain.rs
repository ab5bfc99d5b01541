use std::error::Error as StdError;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CatalogError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

/// One catalog row as served by the products endpoint.
///
/// Every field is optional so that a structurally invalid row can still be
/// carried through to the display surface instead of being dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default)]
    pub id: Option<ProductId>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub in_stock: Option<bool>,
    #[serde(default)]
    pub price: Option<f64>,
}

impl Product {
    /// Decodes a row field by field, keeping whatever has the expected type.
    ///
    /// Returns the product together with the names of fields that were
    /// present but had the wrong JSON type.
    pub fn from_json_lossy(value: &Value) -> (Self, Vec<&'static str>) {
        fn present<'a>(value: &'a Value, name: &str) -> Option<&'a Value> {
            value.get(name).filter(|v| !v.is_null())
        }

        let mut mistyped = Vec::new();
        let id = present(value, "id");
        let categories = present(value, "categories");
        let name = present(value, "name");
        let image = present(value, "image");
        let in_stock = present(value, "inStock");
        let price = present(value, "price");

        let mut check = |name: &'static str, raw: Option<&Value>, ok: bool| {
            if raw.is_some() && !ok {
                mistyped.push(name);
            }
        };

        let id_value = id.and_then(Value::as_i64).map(ProductId);
        check("id", id, id_value.is_some());

        let categories_value = categories.and_then(Value::as_array).and_then(|items| {
            items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
        });
        check("categories", categories, categories_value.is_some());

        let name_value = name.and_then(Value::as_str).map(str::to_string);
        check("name", name, name_value.is_some());

        let image_value = image.and_then(Value::as_str).map(str::to_string);
        check("image", image, image_value.is_some());

        let in_stock_value = in_stock.and_then(Value::as_bool);
        check("inStock", in_stock, in_stock_value.is_some());

        let price_value = price.and_then(Value::as_f64);
        check("price", price, price_value.is_some());

        let product = Self {
            id: id_value,
            categories: categories_value,
            name: name_value,
            image: image_value,
            in_stock: in_stock_value,
            price: price_value,
        };
        (product, mistyped)
    }

    pub fn in_category(&self, category: &str) -> bool {
        self.categories
            .as_deref()
            .is_some_and(|categories| categories.iter().any(|c| c == category))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub name: String,
    pub message: String,
    pub stack: Option<String>,
}

impl ErrorDetail {
    pub fn from_error(err: &(dyn StdError + 'static)) -> Self {
        let name = err
            .downcast_ref::<CatalogError>()
            .map(CatalogError::name)
            .unwrap_or("Error")
            .to_string();

        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(format!("caused by: {cause}"));
            source = cause.source();
        }

        Self {
            name,
            message: err.to_string(),
            stack: (!causes.is_empty()).then(|| causes.join("\n")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
    pub error: Option<ErrorDetail>,
}

impl LogRecord {
    pub fn now(level: LogLevel, message: impl Into<String>, error: Option<ErrorDetail>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            level,
            message: message.into(),
            error,
        }
    }
}
