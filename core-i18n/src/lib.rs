//! # Localization
//!
//! English/Arabic string tables and the process-wide language preference.
//!
//! - [`Language`] - supported languages and their layout direction
//! - [`translations`] - static bilingual tables; [`translate`] never fails
//! - [`LanguageManager`] - persisted preference, RTL flag and platform
//!   layout toggle

pub mod error;
pub mod language;
pub mod manager;
pub mod translations;

pub use error::{I18nError, Result};
pub use language::Language;
pub use manager::{LanguageChange, LanguageManager, LanguagePreference, Translator};
pub use translations::translate;
