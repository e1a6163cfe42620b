//! The page tree: pages own rows, rows own columns, columns own fields.
//!
//! The same shape describes both a form definition's top-level layout and the
//! settings context every field carries for its own configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::field::Field;
use crate::locale::LocaleId;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Page {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<Row>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Row {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<Column>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Column {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A field's own configuration: a nested page tree with one meta-field per
/// configurable property (`name`, `label`, `dataType`, `validation`, ...).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsContext {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pages: Vec<Page>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A complete form-definition document as exchanged with the hosting editor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormDefinition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_language_id: Option<LocaleId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub available_language_ids: Vec<LocaleId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pages: Vec<Page>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl FormDefinition {
    /// Single-column convenience constructor used by tests and tools.
    pub fn from_fields(fields: Vec<Field>) -> Self {
        Self {
            pages: vec![Page {
                rows: vec![Row {
                    columns: vec![Column {
                        size: Some(12),
                        fields,
                        ..Column::default()
                    }],
                    ..Row::default()
                }],
                ..Page::default()
            }],
            ..Self::default()
        }
    }
}
