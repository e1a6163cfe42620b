//! Settings-context mirroring.
//!
//! Every field carries its own configuration as a nested page tree of
//! meta-fields. A property update walks that tree once: the meta-field whose
//! name matches the property takes the new value, and the `validation`
//! meta-field is refreshed in the same pass whether or not it matches, so a
//! stale owner name or data type never survives an edit.

use formdef_model::{Field, FieldPatch, LocaleId, SettingsContext};
use formdef_visitor::PagesVisitor;
use serde_json::Value;
use tracing::trace;

use crate::update::js_truthy;

/// Read one projection (`value`, `validation`, ...) of the meta-field named
/// `property_name`, or `None` when the meta-field or projection is absent.
pub fn get_settings_context_property(
    settings_context: &SettingsContext,
    property_name: &str,
    property_type: &str,
) -> Option<Value> {
    let mut property_value = None;
    PagesVisitor::new(&settings_context.pages).visit(|field| {
        if field.field_name == property_name {
            property_value = field.property(property_type);
        }
        false
    });
    property_value
}

/// Rewrite the settings-context tree for one property change.
///
/// The meta-field matching `property_name` takes `property_value` (and, when
/// it is localizable, its `localized_value` entry for the editing locale).
/// Every meta-field named `validation` is additionally run through the
/// validation patch, which only acts when `parent_field_name` is supplied:
/// a `name` change rewrites the owner name inside the expression string and
/// the `fieldName` mirror, any other property updates its key of the
/// validation object.
pub fn update_settings_context_property(
    editing_language_id: &LocaleId,
    settings_context: &SettingsContext,
    property_name: &str,
    property_value: &Value,
    parent_field_name: Option<&str>,
) -> SettingsContext {
    trace!(property = property_name, "rewriting settings context");
    let pages = PagesVisitor::new(&settings_context.pages).map_fields(
        |field, _| {
            if field.field_name == "validation" {
                return FieldPatch::from(update_field_validation_property(
                    field,
                    property_name,
                    property_value,
                    parent_field_name,
                ));
            }

            if field.field_name != property_name {
                return FieldPatch::default();
            }

            let mut patch = FieldPatch {
                value: Some(property_value.clone()),
                ..FieldPatch::default()
            };
            if field.localizable {
                let mut localized_value = field.localized_value.clone();
                localized_value.insert(editing_language_id.clone(), property_value.clone());
                patch.localized_value = Some(localized_value);
            }
            patch
        },
        true,
        false,
    );

    SettingsContext {
        pages,
        extra: settings_context.extra.clone(),
    }
}

fn update_field_validation_property(
    field: &Field,
    property_name: &str,
    property_value: &Value,
    parent_field_name: Option<&str>,
) -> Field {
    let Some(parent_field_name) = parent_field_name.filter(|name| !name.is_empty()) else {
        return field.clone();
    };
    if !js_truthy(&field.value) {
        return field.clone();
    }

    let mut next = field.clone();

    if property_name == "name" {
        if let Some(replacement) = property_value.as_str() {
            if let Some(expression) = next.value.pointer_mut("/expression/value") {
                if let Some(text) = expression.as_str() {
                    *expression = Value::String(text.replace(parent_field_name, replacement));
                }
            }
        }
    }

    let validation_key = if property_name == "name" {
        "fieldName"
    } else {
        property_name
    };
    let mut validation = next.validation.take().unwrap_or_default();
    validation.set(validation_key, property_value.clone());
    next.validation = Some(validation);

    next
}
