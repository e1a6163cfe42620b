//! Message translation capability.
//!
//! The hosting platform resolves user-facing strings through its own language
//! registry; the engine only needs a small lookup seam so default base words
//! and error messages stay overridable.

/// Resolves a message key to a user-facing string.
pub trait Translator {
    fn translate(&self, key: &str) -> String;
}

/// Built-in English messages. Unknown keys fall back to the key itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishTranslator;

impl Translator for EnglishTranslator {
    fn translate(&self, key: &str) -> String {
        match key {
            "field" => "field".to_string(),
            "option" => "option".to_string(),
            "this-reference-is-already-being-used" => {
                "This reference is already being used.".to_string()
            }
            other => other.to_string(),
        }
    }
}
