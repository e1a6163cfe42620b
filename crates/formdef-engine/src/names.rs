//! Field-name normalization and collision-free name generation.
//!
//! Field names double as data keys in stored form records, so they are
//! restricted to `[A-Za-z0-9_]` and must be unique across a document. New
//! names come from two sources: the field label typed by a form author
//! (normalized, then disambiguated with an integer suffix) or a generated
//! default (base word plus a random numeric instance id, regenerated until
//! free).

use formdef_model::{Field, FieldType, Page};
use formdef_visitor::PagesVisitor;
use rand::Rng;
use serde_json::Value;
use tracing::debug;

use crate::language::Translator;
use crate::update::NameSource;

const INSTANCE_ID_LENGTH: usize = 8;
const BASE36_DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Characters allowed in a field name.
pub fn is_valid_field_name_char(character: char) -> bool {
    character.is_ascii_alphanumeric() || character == '_'
}

/// Normalize a raw name: trim, drop invalid characters, camel-case the
/// character following a space, and prefix `_` when the result would start
/// with a digit. Idempotent; empty input stays empty.
///
/// `"New  Name!"` becomes `"NewName"`, `"radio!!"` becomes `"radio"`.
pub fn normalize_field_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut normalized = String::with_capacity(trimmed.len());
    let mut next_upper_case = false;

    for character in trimmed.chars() {
        if character == ' ' {
            next_upper_case = true;
            continue;
        }
        if !is_valid_field_name_char(character) {
            continue;
        }
        if next_upper_case {
            normalized.push(character.to_ascii_uppercase());
            next_upper_case = false;
        } else {
            normalized.push(character);
        }
    }

    if normalized.starts_with(|character: char| character.is_ascii_digit()) {
        normalized.insert(0, '_');
    }

    normalized
}

/// An 8-character pseudo-random suffix, base-36 lowercase alphanumeric or
/// base-10 digits only. Uniqueness is the caller's concern; the collision
/// loop in [`generate_field_name`] retries until a free name is found.
pub fn generate_instance_id<R: Rng>(rng: &mut R, numbers_only: bool) -> String {
    let radix = if numbers_only { 10 } else { 36 };
    (0..INSTANCE_ID_LENGTH)
        .map(|_| BASE36_DIGITS[rng.gen_range(0..radix)] as char)
        .collect()
}

/// A fresh default name: the field type's normalized label when one is
/// supplied, otherwise the translated base word, suffixed with a numeric
/// instance id.
pub fn get_default_field_name<R: Rng>(
    rng: &mut R,
    translator: &dyn Translator,
    is_option_field: bool,
    field_type: Option<&FieldType>,
) -> String {
    let base = match field_type.filter(|field_type| !field_type.label.is_empty()) {
        Some(field_type) => normalize_field_name(&field_type.label),
        None if is_option_field => translator.translate("option"),
        None => translator.translate("field"),
    };
    format!("{base}{}", generate_instance_id(rng, true))
}

/// Generate a collision-free name for a field.
///
/// With `use_label_as_source` the desired name is normalized and, while taken
/// by another field or blacklisted, retried with an incrementing integer
/// suffix (first retry appends `1`). Without it the desired name is used
/// verbatim and every collision is answered with a brand-new generated
/// default name.
///
/// A field that already carries the candidate name (`current_name`) does not
/// count as a collision, so renaming a field onto itself is stable.
///
/// The retry loop is unbounded: when the blacklist and the existing names
/// cover every candidate the call does not terminate. Callers own the input
/// that makes termination possible.
pub fn generate_field_name<R: Rng>(
    pages: &[Page],
    desired_name: &str,
    current_name: Option<&str>,
    blacklist: &[String],
    use_label_as_source: bool,
    rng: &mut R,
    translator: &dyn Translator,
) -> String {
    let taken = |candidate: &str, existing: Option<&str>| {
        existing.is_some_and(|found| Some(found) != current_name)
            || blacklist.iter().any(|entry| entry == candidate)
    };

    if use_label_as_source {
        let mut counter: u32 = 0;
        let mut field_name = normalize_field_name(desired_name);
        let mut existing = find_field_by_name(pages, &field_name);

        while taken(&field_name, existing.as_deref()) {
            if counter > 0 {
                field_name = format!("{}{counter}", normalize_field_name(desired_name));
            }
            debug!(candidate = %field_name, "field name taken, retrying with suffix");
            existing = find_field_by_name(pages, &field_name);
            counter += 1;
        }

        normalize_field_name(&field_name)
    } else {
        let mut field_name = desired_name.to_string();
        let mut existing = find_field_by_name(pages, &field_name);

        while taken(&field_name, existing.as_deref()) {
            field_name = get_default_field_name(rng, translator, false, None);
            debug!(candidate = %field_name, "field name taken, regenerating default");
            existing = find_field_by_name(pages, &field_name);
        }

        field_name
    }
}

/// Document-order lookup of a field name anywhere in the tree, nested fields
/// included.
pub fn find_field_by_name(pages: &[Page], field_name: &str) -> Option<String> {
    let mut found = None;
    PagesVisitor::new(pages).visit(|field| {
        if field.field_name == field_name {
            found = Some(field.field_name.clone());
            return true;
        }
        false
    });
    found
}

/// Every field of the tree in document order.
pub fn get_fields(pages: &[Page]) -> Vec<Field> {
    let mut fields = Vec::new();
    PagesVisitor::new(pages).visit(|field| {
        fields.push(field.clone());
        false
    });
    fields
}

/// A dynamic property of the named field, or `None` when the field or the
/// property is absent.
pub fn get_field_property(pages: &[Page], field_name: &str, property_name: &str) -> Option<Value> {
    let mut property_value = None;
    PagesVisitor::new(pages).visit(|field| {
        if field.field_name == field_name {
            property_value = field.property(property_name);
        }
        false
    });
    property_value
}

/// Ready-made [`NameSource`] running the collision loop over a page tree.
///
/// This is what interactive callers wire into the update protocol: candidate
/// names are checked against every field of the supplied document, and
/// fallback defaults come from the same generator.
pub struct TreeNameSource<'a, R: Rng> {
    pages: &'a [Page],
    blacklist: Vec<String>,
    use_label_as_source: bool,
    rng: R,
    translator: &'a dyn Translator,
}

impl<'a, R: Rng> TreeNameSource<'a, R> {
    pub fn new(pages: &'a [Page], rng: R, translator: &'a dyn Translator) -> Self {
        Self {
            pages,
            blacklist: Vec::new(),
            use_label_as_source: true,
            rng,
            translator,
        }
    }

    /// Names the generated name may never take, e.g. reserved data keys.
    #[must_use]
    pub fn with_blacklist(mut self, blacklist: Vec<String>) -> Self {
        self.blacklist = blacklist;
        self
    }

    /// Switch to generated-default mode: collisions regenerate a random
    /// default instead of appending an integer suffix.
    #[must_use]
    pub fn with_generated_defaults(mut self) -> Self {
        self.use_label_as_source = false;
        self
    }
}

impl<R: Rng> NameSource for TreeNameSource<'_, R> {
    fn generate(&mut self, candidate: &str, current: &str) -> Option<String> {
        Some(generate_field_name(
            self.pages,
            candidate,
            Some(current),
            &self.blacklist,
            self.use_label_as_source,
            &mut self.rng,
            self.translator,
        ))
    }

    fn default_name(&mut self) -> String {
        get_default_field_name(&mut self.rng, self.translator, false, None)
    }
}
