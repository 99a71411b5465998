use thiserror::Error;

#[derive(Error, Debug)]
pub enum I18nError {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// The preference could not be persisted; in-memory state is unchanged.
    #[error("Failed to save language preference: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, I18nError>;
