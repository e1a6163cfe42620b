//! The field update protocol.
//!
//! One call applies one property change to a field and returns a new field
//! with the settings-context mirror kept consistent: the meta-field matching
//! the property picks up the new value, and the validation meta-field is
//! refreshed on every mirroring pass. Inputs are never mutated; the caller
//! re-renders from the returned value.

use formdef_model::{Field, FieldPatch, LocaleId};
use serde_json::Value;

use crate::names::normalize_field_name;
use crate::settings::update_settings_context_property;

/// Caller-supplied naming policy for renames.
///
/// The interactive editor wires this to the collision loop over the whole
/// document (see [`crate::names::TreeNameSource`]); tests substitute
/// deterministic implementations.
pub trait NameSource {
    /// Propose a unique name for `candidate`; `current` is the name the
    /// field holds right now. Returning `None` (or an empty name) rejects
    /// the rename and leaves the field unchanged.
    fn generate(&mut self, candidate: &str, current: &str) -> Option<String>;

    /// A fresh generated default, used when a candidate normalizes to
    /// nothing.
    fn default_name(&mut self) -> String;
}

/// Ambient parameters of one update pass.
pub struct UpdateContext<'a> {
    pub default_language_id: LocaleId,
    pub editing_language_id: LocaleId,
    /// When set, editing the label in the default language renames the field
    /// from the label text.
    pub generate_field_name_using_field_label: bool,
    pub name_source: &'a mut dyn NameSource,
}

/// The closed vocabulary of field updates.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    /// `name`: rename the field, patching every mirror of the old name.
    Rename(String),
    /// `label`: set the label, optionally auto-renaming from its text.
    Relabel(Value),
    /// `dataType`: set the data type and refresh the validation mirror.
    SetDataType(String),
    /// `options`: locale-scoped option list.
    SetOptions(Value),
    /// `numericInputMask`: transient UI bundle merged directly onto the
    /// field, bypassing the settings-context mirror.
    SetNumericMask(Value),
    /// Any other property, assigned dynamically and mirrored by name.
    SetProperty { name: String, value: Value },
}

impl FieldUpdate {
    /// Map the wire property vocabulary onto the update variants.
    pub fn from_property(property_name: &str, property_value: Value) -> Self {
        match property_name {
            "name" => Self::Rename(string_value(property_value)),
            "label" => Self::Relabel(property_value),
            "dataType" => Self::SetDataType(string_value(property_value)),
            "options" => Self::SetOptions(property_value),
            "numericInputMask" => Self::SetNumericMask(property_value),
            other => Self::SetProperty {
                name: other.to_string(),
                value: property_value,
            },
        }
    }
}

fn string_value(value: Value) -> String {
    match value {
        Value::String(text) => text,
        _ => String::new(),
    }
}

/// Apply one update to a field, returning the new field. The input field and
/// its settings context are left untouched.
pub fn update_field(ctx: &mut UpdateContext<'_>, field: &Field, update: FieldUpdate) -> Field {
    match update {
        FieldUpdate::Rename(raw_name) => update_field_name(ctx, field, &raw_name),
        FieldUpdate::Relabel(value) => update_field_label(ctx, field, &value),
        FieldUpdate::SetDataType(data_type) => {
            let mut next = field.clone();
            next.data_type = Some(data_type.clone());
            next.settings_context = field.settings_context.as_ref().map(|settings| {
                update_settings_context_property(
                    &ctx.editing_language_id,
                    settings,
                    "dataType",
                    &Value::String(data_type.clone()),
                    Some(&field.field_name),
                )
            });
            next
        }
        FieldUpdate::SetOptions(value) => {
            let mut next = field.clone();
            next.options = value
                .get(ctx.editing_language_id.as_str())
                .cloned()
                .unwrap_or(Value::Null);
            next.settings_context = field.settings_context.as_ref().map(|settings| {
                update_settings_context_property(
                    &ctx.editing_language_id,
                    settings,
                    "options",
                    &value,
                    None,
                )
            });
            next
        }
        FieldUpdate::SetNumericMask(value) => {
            match serde_json::from_value::<FieldPatch>(value) {
                Ok(patch) => patch.apply_to(field),
                Err(_) => field.clone(),
            }
        }
        FieldUpdate::SetProperty { name, value } => {
            let resolved = resolve_localized_value(
                field.localizable,
                &value,
                &ctx.default_language_id,
                &ctx.editing_language_id,
            );
            let mut next = field.clone();
            next.set_property(&name, resolved);
            next.settings_context = field.settings_context.as_ref().map(|settings| {
                update_settings_context_property(
                    &ctx.editing_language_id,
                    settings,
                    &name,
                    &value,
                    None,
                )
            });
            next
        }
    }
}

fn update_field_name(ctx: &mut UpdateContext<'_>, field: &Field, raw_name: &str) -> Field {
    let candidate = if normalize_field_name(raw_name).is_empty() {
        ctx.name_source.default_name()
    } else {
        raw_name.to_string()
    };

    let Some(new_field_name) = ctx.name_source.generate(&candidate, &field.field_name) else {
        return field.clone();
    };
    if new_field_name.is_empty() {
        return field.clone();
    }

    let mut next = field.clone();
    next.field_name = new_field_name.clone();
    next.name = new_field_name.clone();
    next.settings_context = field.settings_context.as_ref().map(|settings| {
        update_settings_context_property(
            &ctx.editing_language_id,
            settings,
            "name",
            &Value::String(new_field_name.clone()),
            Some(&field.field_name),
        )
    });
    next
}

fn update_field_label(ctx: &mut UpdateContext<'_>, field: &Field, value: &Value) -> Field {
    let mut field_name = field.field_name.clone();
    let mut settings_context = field.settings_context.clone();

    if ctx.generate_field_name_using_field_label
        && ctx.default_language_id == ctx.editing_language_id
    {
        let updates = update_field_name(ctx, field, value.as_str().unwrap_or_default());
        field_name = updates.field_name;
        settings_context = updates.settings_context;
    }

    let label = match value {
        Value::Object(map) => map
            .get(ctx.editing_language_id.as_str())
            .filter(|editing_value| js_truthy(editing_value))
            .or_else(|| map.get(ctx.default_language_id.as_str()))
            .cloned()
            .unwrap_or(Value::Null),
        other => other.clone(),
    };

    let mut next = field.clone();
    next.field_name = field_name;
    next.label = label;
    next.settings_context = settings_context.as_ref().map(|settings| {
        update_settings_context_property(&ctx.editing_language_id, settings, "label", value, None)
    });
    next
}

/// Resolve a locale-keyed value for assignment: the editing locale's entry
/// when present (even if null), else a truthy default-locale entry, else the
/// value as given. Non-localizable fields always take the value as given.
fn resolve_localized_value(
    localizable: bool,
    value: &Value,
    default_language_id: &LocaleId,
    editing_language_id: &LocaleId,
) -> Value {
    if localizable {
        if let Value::Object(map) = value {
            if let Some(editing_value) = map.get(editing_language_id.as_str()) {
                return editing_value.clone();
            }
            if let Some(default_value) = map.get(default_language_id.as_str()) {
                if js_truthy(default_value) {
                    return default_value.clone();
                }
            }
        }
    }
    value.clone()
}

/// Truthiness the way the hosting editor's scripts evaluate it: null, false,
/// zero and the empty string are falsy, everything else is truthy.
pub(crate) fn js_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|float| float != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
