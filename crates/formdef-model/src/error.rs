use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid locale id: {0:?}")]
    InvalidLocaleId(String),
}
