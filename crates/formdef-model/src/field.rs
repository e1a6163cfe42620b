//! Field records and the partial-field patch type used by tree transforms.
//!
//! A field is a single form-input definition node. Its typed attributes cover
//! the properties the update engine manipulates directly; every other wire
//! property round-trips through the flattened `extra` map, so documents with
//! editor-specific keys survive a transform untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::locale::LocaleId;
use crate::page::SettingsContext;

/// Descriptor of an available field type; the label seeds default field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldType {
    pub name: String,
    pub label: String,
}

impl FieldType {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
        }
    }
}

/// The validation mirror carried by a settings-context sub-field named
/// `validation`. `fieldName` and `dataType` track the owning field; any other
/// key written by a mirroring pass lands in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Validation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Validation {
    /// Write a dynamic key the way the mirroring pass addresses it.
    pub fn set(&mut self, key: &str, value: Value) {
        match (key, value.as_str()) {
            ("fieldName", Some(name)) => self.field_name = Some(name.to_string()),
            ("dataType", Some(data_type)) => self.data_type = Some(data_type.to_string()),
            _ => {
                self.extra.insert(key.to_string(), value);
            }
        }
    }
}

/// A single form-input definition node.
///
/// `value`, `label`, `options` and `predefined_value` are dynamic: strings,
/// locale-keyed objects or arrays depending on the field type, with JSON
/// `null` modelling an absent property.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Field {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub field_name: String,
    /// Wire alias of `field_name`; a rename keeps both in sync.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub label: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub value: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub predefined_value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub options: Value,
    #[serde(skip_serializing_if = "is_false")]
    pub localizable: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub localized_value: BTreeMap<LocaleId, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<Validation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings_context: Option<SettingsContext>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nested_fields: Vec<Field>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Field {
    /// Read a property by its wire name. Typed attributes are projected to
    /// JSON; everything else is looked up in `extra`. Absent properties are
    /// `None`.
    pub fn property(&self, property_name: &str) -> Option<Value> {
        match property_name {
            "fieldName" => Some(Value::String(self.field_name.clone())),
            "name" => Some(Value::String(self.name.clone())),
            "label" => non_null(self.label.clone()),
            "value" => non_null(self.value.clone()),
            "predefinedValue" => non_null(self.predefined_value.clone()),
            "dataType" => self.data_type.clone().map(Value::String),
            "options" => non_null(self.options.clone()),
            "localizable" => Some(Value::Bool(self.localizable)),
            "localizedValue" => {
                if self.localized_value.is_empty() {
                    None
                } else {
                    serde_json::to_value(&self.localized_value).ok()
                }
            }
            "validation" => self
                .validation
                .as_ref()
                .and_then(|validation| serde_json::to_value(validation).ok()),
            "settingsContext" => self
                .settings_context
                .as_ref()
                .and_then(|settings| serde_json::to_value(settings).ok()),
            "nestedFields" => {
                if self.nested_fields.is_empty() {
                    None
                } else {
                    serde_json::to_value(&self.nested_fields).ok()
                }
            }
            other => self.extra.get(other).cloned(),
        }
    }

    /// Assign a property by its wire name. Values that do not fit the typed
    /// attribute shape land in `extra` instead of failing.
    pub fn set_property(&mut self, property_name: &str, value: Value) {
        FieldPatch::from_property(property_name, value).write_into(self);
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn non_null(value: Value) -> Option<Value> {
    if value.is_null() { None } else { Some(value) }
}

/// Partial field: the return type of tree transforms.
///
/// An unset attribute leaves the target untouched under merge semantics and
/// defaults under replace semantics; `extra` entries always overlay.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldPatch {
    pub field_name: Option<String>,
    pub name: Option<String>,
    pub label: Option<Value>,
    pub value: Option<Value>,
    pub predefined_value: Option<Value>,
    pub data_type: Option<String>,
    pub options: Option<Value>,
    pub localizable: Option<bool>,
    pub localized_value: Option<BTreeMap<LocaleId, Value>>,
    pub validation: Option<Validation>,
    pub settings_context: Option<SettingsContext>,
    pub nested_fields: Option<Vec<Field>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl FieldPatch {
    /// Patch holding a single dynamic property. Unknown names and values that
    /// do not deserialize into the typed attribute end up in `extra`.
    pub fn from_property(property_name: &str, value: Value) -> Self {
        let mut object = serde_json::Map::new();
        object.insert(property_name.to_string(), value.clone());
        match serde_json::from_value(Value::Object(object)) {
            Ok(patch) => patch,
            Err(_) => {
                let mut patch = Self::default();
                patch.extra.insert(property_name.to_string(), value);
                patch
            }
        }
    }

    /// Merge semantics: patch keys win, every other key of `base` survives.
    pub fn apply_to(&self, base: &Field) -> Field {
        let mut next = base.clone();
        self.write_into(&mut next);
        next
    }

    /// Replace semantics: the patch becomes the entire field; unset
    /// attributes default.
    pub fn into_field(self) -> Field {
        Field {
            field_name: self.field_name.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            label: self.label.unwrap_or(Value::Null),
            value: self.value.unwrap_or(Value::Null),
            predefined_value: self.predefined_value.unwrap_or(Value::Null),
            data_type: self.data_type,
            options: self.options.unwrap_or(Value::Null),
            localizable: self.localizable.unwrap_or(false),
            localized_value: self.localized_value.unwrap_or_default(),
            validation: self.validation,
            settings_context: self.settings_context,
            nested_fields: self.nested_fields.unwrap_or_default(),
            extra: self.extra,
        }
    }

    fn write_into(&self, target: &mut Field) {
        if let Some(field_name) = &self.field_name {
            target.field_name = field_name.clone();
        }
        if let Some(name) = &self.name {
            target.name = name.clone();
        }
        if let Some(label) = &self.label {
            target.label = label.clone();
        }
        if let Some(value) = &self.value {
            target.value = value.clone();
        }
        if let Some(predefined_value) = &self.predefined_value {
            target.predefined_value = predefined_value.clone();
        }
        if let Some(data_type) = &self.data_type {
            target.data_type = Some(data_type.clone());
        }
        if let Some(options) = &self.options {
            target.options = options.clone();
        }
        if let Some(localizable) = self.localizable {
            target.localizable = localizable;
        }
        if let Some(localized_value) = &self.localized_value {
            target.localized_value = localized_value.clone();
        }
        if let Some(validation) = &self.validation {
            target.validation = Some(validation.clone());
        }
        if let Some(settings_context) = &self.settings_context {
            target.settings_context = Some(settings_context.clone());
        }
        if let Some(nested_fields) = &self.nested_fields {
            target.nested_fields = nested_fields.clone();
        }
        for (key, value) in &self.extra {
            target.extra.insert(key.clone(), value.clone());
        }
    }
}

impl From<Field> for FieldPatch {
    fn from(field: Field) -> Self {
        Self {
            field_name: Some(field.field_name),
            name: Some(field.name),
            label: Some(field.label),
            value: Some(field.value),
            predefined_value: Some(field.predefined_value),
            data_type: field.data_type,
            options: Some(field.options),
            localizable: Some(field.localizable),
            localized_value: Some(field.localized_value),
            validation: field.validation,
            settings_context: field.settings_context,
            nested_fields: Some(field.nested_fields),
            extra: field.extra,
        }
    }
}
