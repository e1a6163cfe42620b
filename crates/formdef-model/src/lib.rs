pub mod error;
pub mod field;
pub mod locale;
pub mod page;

pub use error::ModelError;
pub use field::{Field, FieldPatch, FieldType, Validation};
pub use locale::LocaleId;
pub use page::{Column, FormDefinition, Page, Row, SettingsContext};
