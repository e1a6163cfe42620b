//! Tests for the field update protocol: property dispatch, settings-context
//! mirroring and validation patching.

use formdef_engine::language::EnglishTranslator;
use formdef_engine::names::TreeNameSource;
use formdef_engine::settings::get_settings_context_property;
use formdef_engine::update::{FieldUpdate, NameSource, UpdateContext, update_field};
use formdef_model::{Field, LocaleId, Page};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;

/// Name source mimicking the editor's simplest generator: strip spaces,
/// accept everything.
struct SpaceStrippingNameSource;

impl NameSource for SpaceStrippingNameSource {
    fn generate(&mut self, candidate: &str, _current: &str) -> Option<String> {
        Some(candidate.replace(' ', ""))
    }

    fn default_name(&mut self) -> String {
        "field12345678".to_string()
    }
}

/// Name source rejecting every candidate.
struct RejectingNameSource;

impl NameSource for RejectingNameSource {
    fn generate(&mut self, _candidate: &str, _current: &str) -> Option<String> {
        None
    }

    fn default_name(&mut self) -> String {
        "field12345678".to_string()
    }
}

fn locale(tag: &str) -> LocaleId {
    LocaleId::new(tag).expect("valid locale")
}

fn fixture_field() -> Field {
    serde_json::from_value(json!({
        "fieldName": "oldFieldName",
        "label": "Old Field Label",
        "settingsContext": {
            "pages": [{"rows": [{"columns": [{"fields": [
                {"fieldName": "name", "value": "oldFieldName"},
                {"fieldName": "label", "value": "Old Field Label"},
                {"fieldName": "readOnly", "value": false},
                {"fieldName": "dataType", "value": "oldDataType"},
                {"fieldName": "options", "value": []},
                {
                    "fieldName": "predefinedValue",
                    "value": [{"label": "Predefined", "value": "Predefined"}],
                },
                {
                    "fieldName": "validation",
                    "validation": {"dataType": "oldDataType", "fieldName": "oldFieldName"},
                    "value": {"expression": {"value": "isEmailAddress(oldFieldName)"}},
                },
            ]}]}]}],
        },
    }))
    .expect("deserialize fixture field")
}

fn mirror(field: &Field, property_name: &str, property_type: &str) -> Option<serde_json::Value> {
    let settings = field.settings_context.as_ref().expect("settings context");
    get_settings_context_property(settings, property_name, property_type)
}

#[test]
fn generic_properties_update_the_field_and_its_mirror() {
    let mut source = SpaceStrippingNameSource;
    let mut ctx = UpdateContext {
        default_language_id: locale("en_US"),
        editing_language_id: locale("en_US"),
        generate_field_name_using_field_label: false,
        name_source: &mut source,
    };
    let field = fixture_field();

    let updated = update_field(
        &mut ctx,
        &field,
        FieldUpdate::from_property("readOnly", json!(true)),
    );

    assert_eq!(updated.extra.get("readOnly"), Some(&json!(true)));
    assert_eq!(mirror(&updated, "readOnly", "value"), Some(json!(true)));
}

#[test]
fn updates_never_mutate_the_input_field() {
    let mut source = SpaceStrippingNameSource;
    let mut ctx = UpdateContext {
        default_language_id: locale("en_US"),
        editing_language_id: locale("en_US"),
        generate_field_name_using_field_label: false,
        name_source: &mut source,
    };
    let field = fixture_field();
    let before = field.clone();

    let _updated = update_field(&mut ctx, &field, FieldUpdate::Rename("newName".to_string()));

    assert_eq!(field, before);
}

#[test]
fn data_type_updates_mirror_and_sync_the_validation_object() {
    let mut source = SpaceStrippingNameSource;
    let mut ctx = UpdateContext {
        default_language_id: locale("en_US"),
        editing_language_id: locale("en_US"),
        generate_field_name_using_field_label: false,
        name_source: &mut source,
    };
    let field = fixture_field();

    let updated = update_field(
        &mut ctx,
        &field,
        FieldUpdate::SetDataType("newDataType".to_string()),
    );

    assert_eq!(updated.data_type.as_deref(), Some("newDataType"));
    assert_eq!(mirror(&updated, "dataType", "value"), Some(json!("newDataType")));
    assert_eq!(
        mirror(&updated, "validation", "validation"),
        Some(json!({"dataType": "newDataType", "fieldName": "oldFieldName"}))
    );
    // Only a rename rewrites the expression string.
    assert_eq!(
        mirror(&updated, "validation", "value"),
        Some(json!({"expression": {"value": "isEmailAddress(oldFieldName)"}}))
    );
}

#[test]
fn rename_updates_the_field_its_mirror_and_the_validation_expression() {
    let mut source = SpaceStrippingNameSource;
    let mut ctx = UpdateContext {
        default_language_id: locale("en_US"),
        editing_language_id: locale("en_US"),
        generate_field_name_using_field_label: false,
        name_source: &mut source,
    };
    let field = fixture_field();

    let updated = update_field(&mut ctx, &field, FieldUpdate::Rename("newName".to_string()));

    assert_eq!(updated.field_name, "newName");
    assert_eq!(updated.name, "newName");
    assert_eq!(mirror(&updated, "name", "value"), Some(json!("newName")));
    assert_eq!(
        mirror(&updated, "validation", "value"),
        Some(json!({"expression": {"value": "isEmailAddress(newName)"}}))
    );
    assert_eq!(
        mirror(&updated, "validation", "validation"),
        Some(json!({"dataType": "oldDataType", "fieldName": "newName"}))
    );
}

#[test]
fn rename_rewrites_the_whole_settings_context_consistently() {
    let mut source = SpaceStrippingNameSource;
    let mut ctx = UpdateContext {
        default_language_id: locale("en_US"),
        editing_language_id: locale("en_US"),
        generate_field_name_using_field_label: false,
        name_source: &mut source,
    };
    let field = fixture_field();

    let updated = update_field(&mut ctx, &field, FieldUpdate::Rename("newName".to_string()));

    let settings = updated.settings_context.expect("settings context");
    assert_eq!(
        serde_json::to_value(&settings).expect("serialize settings context"),
        json!({
            "pages": [{"rows": [{"columns": [{"fields": [
                {"fieldName": "name", "value": "newName"},
                {"fieldName": "label", "value": "Old Field Label"},
                {"fieldName": "readOnly", "value": false},
                {"fieldName": "dataType", "value": "oldDataType"},
                {"fieldName": "options", "value": []},
                {
                    "fieldName": "predefinedValue",
                    "value": [{"label": "Predefined", "value": "Predefined"}],
                },
                {
                    "fieldName": "validation",
                    "validation": {"dataType": "oldDataType", "fieldName": "newName"},
                    "value": {"expression": {"value": "isEmailAddress(newName)"}},
                },
            ]}]}]}],
        })
    );
}

#[test]
fn rejected_rename_returns_the_field_unchanged() {
    let mut source = RejectingNameSource;
    let mut ctx = UpdateContext {
        default_language_id: locale("en_US"),
        editing_language_id: locale("en_US"),
        generate_field_name_using_field_label: false,
        name_source: &mut source,
    };
    let field = fixture_field();

    let updated = update_field(&mut ctx, &field, FieldUpdate::Rename("anything".to_string()));

    assert_eq!(updated, field);
}

#[test]
fn unusable_names_fall_back_to_a_generated_default() {
    let mut source = SpaceStrippingNameSource;
    let mut ctx = UpdateContext {
        default_language_id: locale("en_US"),
        editing_language_id: locale("en_US"),
        generate_field_name_using_field_label: false,
        name_source: &mut source,
    };
    let field = fixture_field();

    let updated = update_field(&mut ctx, &field, FieldUpdate::Rename("!!!".to_string()));

    assert_eq!(updated.field_name, "field12345678");
    assert_eq!(mirror(&updated, "name", "value"), Some(json!("field12345678")));
}

#[test]
fn label_edits_update_the_label_and_its_mirror() {
    let mut source = SpaceStrippingNameSource;
    let mut ctx = UpdateContext {
        default_language_id: locale("en_US"),
        editing_language_id: locale("en_US"),
        generate_field_name_using_field_label: false,
        name_source: &mut source,
    };
    let field = fixture_field();

    let updated = update_field(&mut ctx, &field, FieldUpdate::Relabel(json!("New Label")));

    assert_eq!(updated.label, json!("New Label"));
    assert_eq!(updated.field_name, "oldFieldName");
    assert_eq!(mirror(&updated, "label", "value"), Some(json!("New Label")));
    assert_eq!(mirror(&updated, "name", "value"), Some(json!("oldFieldName")));
}

#[test]
fn label_edits_in_the_default_language_can_rename_the_field() {
    let mut source = SpaceStrippingNameSource;
    let mut ctx = UpdateContext {
        default_language_id: locale("en_US"),
        editing_language_id: locale("en_US"),
        generate_field_name_using_field_label: true,
        name_source: &mut source,
    };
    let field = fixture_field();

    let updated = update_field(&mut ctx, &field, FieldUpdate::Relabel(json!("New Label")));

    assert_eq!(updated.label, json!("New Label"));
    assert_eq!(updated.field_name, "NewLabel");
    assert_eq!(mirror(&updated, "name", "value"), Some(json!("NewLabel")));
    assert_eq!(
        mirror(&updated, "validation", "value"),
        Some(json!({"expression": {"value": "isEmailAddress(NewLabel)"}}))
    );
}

#[test]
fn label_edits_in_another_language_never_rename() {
    let mut source = SpaceStrippingNameSource;
    let mut ctx = UpdateContext {
        default_language_id: locale("en_US"),
        editing_language_id: locale("pt_BR"),
        generate_field_name_using_field_label: true,
        name_source: &mut source,
    };
    let field = fixture_field();

    let updated = update_field(
        &mut ctx,
        &field,
        FieldUpdate::Relabel(json!({"en_US": "New Label", "pt_BR": "Novo Rótulo"})),
    );

    assert_eq!(updated.label, json!("Novo Rótulo"));
    assert_eq!(updated.field_name, "oldFieldName");
}

#[test]
fn localized_labels_fall_back_to_the_default_language_value() {
    let mut source = SpaceStrippingNameSource;
    let mut ctx = UpdateContext {
        default_language_id: locale("en_US"),
        editing_language_id: locale("pt_BR"),
        generate_field_name_using_field_label: false,
        name_source: &mut source,
    };
    let field = fixture_field();

    let updated = update_field(
        &mut ctx,
        &field,
        FieldUpdate::Relabel(json!({"en_US": "New Label"})),
    );

    assert_eq!(updated.label, json!("New Label"));
}

#[test]
fn options_are_locale_scoped_on_the_field_but_mirrored_whole() {
    let mut source = SpaceStrippingNameSource;
    let mut ctx = UpdateContext {
        default_language_id: locale("en_US"),
        editing_language_id: locale("en_US"),
        generate_field_name_using_field_label: false,
        name_source: &mut source,
    };
    let field = fixture_field();
    let value = json!({"en_US": [{"label": "New Label", "value": "NewLabel"}]});

    let updated = update_field(&mut ctx, &field, FieldUpdate::SetOptions(value.clone()));

    assert_eq!(updated.options, value["en_US"]);
    assert_eq!(mirror(&updated, "options", "value"), Some(value));
}

#[test]
fn numeric_input_mask_merges_onto_the_field_without_mirroring() {
    let mut source = SpaceStrippingNameSource;
    let mut ctx = UpdateContext {
        default_language_id: locale("en_US"),
        editing_language_id: locale("en_US"),
        generate_field_name_using_field_label: false,
        name_source: &mut source,
    };
    let field = fixture_field();

    let updated = update_field(
        &mut ctx,
        &field,
        FieldUpdate::SetNumericMask(json!({
            "appendType": "prefix",
            "symbols": {"decimalSymbol": "."},
        })),
    );

    assert_eq!(updated.extra.get("appendType"), Some(&json!("prefix")));
    assert_eq!(
        updated.extra.get("symbols"),
        Some(&json!({"decimalSymbol": "."}))
    );
    assert_eq!(updated.settings_context, field.settings_context);
}

#[test]
fn localizable_fields_resolve_generic_values_through_the_editing_locale() {
    let mut source = SpaceStrippingNameSource;
    let mut ctx = UpdateContext {
        default_language_id: locale("en_US"),
        editing_language_id: locale("pt_BR"),
        generate_field_name_using_field_label: false,
        name_source: &mut source,
    };
    let mut field = fixture_field();
    field.localizable = true;

    let updated = update_field(
        &mut ctx,
        &field,
        FieldUpdate::SetProperty {
            name: "predefinedValue".to_string(),
            value: json!({"en_US": "Yes", "pt_BR": "Sim"}),
        },
    );

    assert_eq!(updated.predefined_value, json!("Sim"));
    assert_eq!(
        mirror(&updated, "predefinedValue", "value"),
        Some(json!({"en_US": "Yes", "pt_BR": "Sim"}))
    );
}

#[test]
fn tree_name_source_runs_the_collision_loop_over_the_document() {
    let pages: Vec<Page> = serde_json::from_value(json!([
        {"rows": [{"columns": [{"fields": [
            {"fieldName": "radio"},
            {"fieldName": "other"},
        ]}]}]},
    ]))
    .expect("deserialize pages");

    let translator = EnglishTranslator;
    let mut source = TreeNameSource::new(&pages, StdRng::seed_from_u64(1), &translator);
    let mut ctx = UpdateContext {
        default_language_id: locale("en_US"),
        editing_language_id: locale("en_US"),
        generate_field_name_using_field_label: false,
        name_source: &mut source,
    };

    let mut field = fixture_field();
    field.field_name = "other".to_string();

    let updated = update_field(&mut ctx, &field, FieldUpdate::Rename("radio".to_string()));
    assert_eq!(updated.field_name, "radio1");
}

#[test]
fn tree_name_source_lets_a_field_keep_its_own_name() {
    let pages: Vec<Page> = serde_json::from_value(json!([
        {"rows": [{"columns": [{"fields": [{"fieldName": "radio"}]}]}]},
    ]))
    .expect("deserialize pages");

    let translator = EnglishTranslator;
    let mut source = TreeNameSource::new(&pages, StdRng::seed_from_u64(1), &translator);
    let mut ctx = UpdateContext {
        default_language_id: locale("en_US"),
        editing_language_id: locale("en_US"),
        generate_field_name_using_field_label: false,
        name_source: &mut source,
    };

    let mut field = fixture_field();
    field.field_name = "radio".to_string();

    let updated = update_field(&mut ctx, &field, FieldUpdate::Rename("radio!".to_string()));
    assert_eq!(updated.field_name, "radio");
}
