//! Filter and sort models raised by the display surface.
//!
//! The shapes follow the data grid's JSON models so that they can be logged
//! verbatim when an intent starts.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterItem {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub operator: String,
    #[serde(default)]
    pub value: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterModel {
    #[serde(default)]
    pub items: Vec<FilterItem>,
}

impl FilterModel {
    /// A single "categories contains `value`" item, as the grid emits when a
    /// category is picked from the column menu.
    pub fn category(value: impl Into<String>) -> Self {
        Self {
            items: vec![FilterItem {
                field: "categories".into(),
                operator: "contains".into(),
                value: Some(Value::String(value.into())),
            }],
        }
    }

    pub fn cleared() -> Self {
        Self::default()
    }

    /// The filter term carried by the first item; empty means "clear".
    /// Numeric and boolean values are rendered as their JSON text.
    pub fn term(&self) -> String {
        match self.items.first().and_then(|item| item.value.as_ref()) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortItem {
    pub field: String,
    pub sort: SortDirection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortModel(pub Vec<SortItem>);

impl SortModel {
    pub fn by(field: impl Into<String>, sort: SortDirection) -> Self {
        Self(vec![SortItem {
            field: field.into(),
            sort,
        }])
    }

    pub fn items(&self) -> &[SortItem] {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Intent {
    Filter(FilterModel),
    Sort(SortModel),
}

impl Intent {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Filter(_) => "filter",
            Self::Sort(_) => "sort",
        }
    }
}
