//! Field-name generation and the field update protocol.
//!
//! This crate is the algorithmic core of the form editor:
//!
//! - **names**: identifier normalization and collision-free name generation
//! - **update**: the single-property update protocol over fields
//! - **settings**: settings-context mirroring and validation patching
//! - **reference**: duplicate field-reference detection and stamping
//! - **language**: the translation seam for generated base words and messages

pub mod language;
pub mod names;
pub mod reference;
pub mod settings;
pub mod update;

pub use language::{EnglishTranslator, Translator};
pub use names::{
    TreeNameSource, find_field_by_name, generate_field_name, generate_instance_id,
    get_default_field_name, get_field_property, get_fields, is_valid_field_name_char,
    normalize_field_name,
};
pub use reference::{find_invalid_field_reference, update_field_reference};
pub use settings::{get_settings_context_property, update_settings_context_property};
pub use update::{FieldUpdate, NameSource, UpdateContext, update_field};
