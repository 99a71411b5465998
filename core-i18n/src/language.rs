use bridge_traits::layout::LayoutDirection;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::I18nError;

/// Languages the client ships string tables for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Ar];

    /// Code persisted in secure storage
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }

    /// Exact match on a stored code; anything else is `None`.
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Language::En),
            "ar" => Some(Language::Ar),
            _ => None,
        }
    }

    pub fn is_rtl(&self) -> bool {
        matches!(self, Language::Ar)
    }

    pub fn direction(&self) -> LayoutDirection {
        LayoutDirection::from_rtl(self.is_rtl())
    }

    /// Name of the language written in that language
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ar => "العربية",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::parse(s).ok_or_else(|| I18nError::UnsupportedLanguage(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for language in Language::ALL {
            assert_eq!(Language::parse(language.code()), Some(language));
        }
        assert_eq!(Language::default(), Language::En);
    }

    #[test]
    fn test_parse_is_strict() {
        assert_eq!(Language::parse("AR"), None);
        assert_eq!(Language::parse("fr"), None);
        assert!(matches!(
            "de".parse::<Language>(),
            Err(I18nError::UnsupportedLanguage(code)) if code == "de"
        ));
    }

    #[test]
    fn test_direction() {
        assert!(Language::Ar.is_rtl());
        assert!(!Language::En.is_rtl());
        assert_eq!(Language::Ar.direction(), LayoutDirection::Rtl);
        assert_eq!(Language::En.direction(), LayoutDirection::Ltr);
    }

    #[test]
    fn test_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Language::Ar).unwrap(), "\"ar\"");
        assert_eq!(Language::Ar.native_name(), "العربية");
    }
}
