//! Field-reference conflict handling.
//!
//! A field's reference is the external key other systems use to address its
//! stored values; two fields sharing one reference would corrupt exports.
//! The check scans every other field's `fieldReference` mirror, and the
//! error-message stamp marks the mirror meta-field so the editor can render
//! the conflict inline.

use formdef_model::{Field, FieldPatch, Page, SettingsContext};
use formdef_visitor::PagesVisitor;
use serde_json::Value;

use crate::language::Translator;
use crate::settings::get_settings_context_property;

/// True when any field other than `focused_field` already mirrors `value` as
/// its reference (case-insensitive).
pub fn find_invalid_field_reference(focused_field: &Field, pages: &[Page], value: &str) -> bool {
    let mut has_invalid_field_reference = false;

    PagesVisitor::new(pages).visit(|field| {
        let field_reference = field
            .settings_context
            .as_ref()
            .and_then(|settings| get_settings_context_property(settings, "fieldReference", "value"))
            .and_then(|reference| reference.as_str().map(str::to_owned));

        if field.field_name != focused_field.field_name
            && field_reference.is_some_and(|reference| reference.eq_ignore_ascii_case(value))
        {
            has_invalid_field_reference = true;
        }
        false
    });

    has_invalid_field_reference
}

/// Stamp (or clear) the duplicate-reference error on a field's
/// `fieldReference` meta-field.
pub fn update_field_reference(
    field: &Field,
    translator: &dyn Translator,
    invalid: bool,
    should_update_value: bool,
) -> Field {
    let mut next = field.clone();
    next.settings_context = field.settings_context.as_ref().map(|settings| {
        set_field_reference_error_message(
            settings,
            "fieldReference",
            translator,
            invalid,
            should_update_value,
        )
    });
    next
}

fn set_field_reference_error_message(
    settings_context: &SettingsContext,
    property_name: &str,
    translator: &dyn Translator,
    display_errors: bool,
    should_update_value: bool,
) -> SettingsContext {
    let pages = PagesVisitor::new(&settings_context.pages).map_fields(
        |field, _| {
            if field.field_name != property_name {
                return FieldPatch::default();
            }
            let mut patch = FieldPatch::default();
            patch
                .extra
                .insert("displayErrors".to_string(), Value::Bool(display_errors));
            patch.extra.insert(
                "errorMessage".to_string(),
                Value::String(translator.translate("this-reference-is-already-being-used")),
            );
            patch.extra.insert(
                "shouldUpdateValue".to_string(),
                Value::Bool(should_update_value),
            );
            patch
                .extra
                .insert("valid".to_string(), Value::Bool(!display_errors));
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
