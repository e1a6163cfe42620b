use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};
use serde_json::Value;
use tracing::{debug, info};

use formdef_engine::language::EnglishTranslator;
use formdef_engine::names::{TreeNameSource, get_fields, normalize_field_name};
use formdef_engine::update::{FieldUpdate, UpdateContext, update_field};
use formdef_model::{FieldPatch, FormDefinition, LocaleId};
use formdef_visitor::PagesVisitor;

use crate::cli::{EditArgs, FieldsArgs, NormalizeArgs};

pub fn run_edit(args: &EditArgs) -> Result<()> {
    let document = load_document(&args.form)?;

    let default_language_id = match document.default_language_id.clone() {
        Some(locale) => locale,
        None => LocaleId::new("en_US")?,
    };
    let editing_language_id = match &args.editing_language {
        Some(tag) => LocaleId::new(tag.as_str())?,
        None => default_language_id.clone(),
    };

    let field = get_fields(&document.pages)
        .into_iter()
        .find(|field| field.field_name == args.field)
        .ok_or_else(|| {
            anyhow!(
                "no field named {:?} in {}",
                args.field,
                args.form.display()
            )
        })?;

    let translator = EnglishTranslator;
    let mut name_source = TreeNameSource::new(&document.pages, rand::thread_rng(), &translator)
        .with_blacklist(args.reserve.clone());
    let mut ctx = UpdateContext {
        default_language_id,
        editing_language_id,
        generate_field_name_using_field_label: args.name_from_label,
        name_source: &mut name_source,
    };

    let update = FieldUpdate::from_property(&args.property, parse_value(&args.value));
    let updated = update_field(&mut ctx, &field, update);
    info!(
        field = %field.field_name,
        property = %args.property,
        new_name = %updated.field_name,
        "applied field update"
    );

    let old_name = field.field_name.clone();
    let pages = PagesVisitor::new(&document.pages).map_fields(
        |candidate, _| {
            if candidate.field_name == old_name {
                FieldPatch::from(updated.clone())
            } else {
                FieldPatch::default()
            }
        },
        true,
        true,
    );
    let next = FormDefinition { pages, ..document };

    let json = serde_json::to_string_pretty(&next).context("serialize updated document")?;
    match &args.output {
        Some(path) => {
            fs::write(path, json + "\n")
                .with_context(|| format!("write {}", path.display()))?;
            info!(path = %path.display(), "wrote updated document");
        }
        None => println!("{json}"),
    }
    Ok(())
}

pub fn run_fields(args: &FieldsArgs) -> Result<()> {
    let document = load_document(&args.form)?;
    let default_language_id = document.default_language_id.clone();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Field", "Data Type", "Label"]);
    for field in get_fields(&document.pages) {
        table.add_row(vec![
            field.field_name.clone(),
            field.data_type.clone().unwrap_or_default(),
            display_label(&field.label, default_language_id.as_ref()),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_normalize(args: &NormalizeArgs) -> Result<()> {
    for name in &args.names {
        println!("{}", normalize_field_name(name));
    }
    Ok(())
}

fn load_document(path: &Path) -> Result<FormDefinition> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let document: FormDefinition =
        serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))?;
    debug!(path = %path.display(), pages = document.pages.len(), "loaded form definition");
    Ok(document)
}

/// `--value` accepts JSON; anything that does not parse is taken as a plain
/// string, so `--value Email` and `--value '"Email"'` mean the same thing.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn display_label(label: &Value, default_language_id: Option<&LocaleId>) -> String {
    match label {
        Value::String(text) => text.clone(),
        Value::Object(map) => default_language_id
            .and_then(|locale| map.get(locale.as_str()))
            .or_else(|| map.values().next())
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    }
}
