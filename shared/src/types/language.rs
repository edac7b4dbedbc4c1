//! Language and internationalization types

use serde::{Deserialize, Serialize};

/// Language preference for user-facing messages
///
/// Persian is the product's primary language and the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "fa")]
    Persian,
    #[serde(rename = "en")]
    English,
}

impl Default for Language {
    fn default() -> Self {
        Language::Persian
    }
}

impl Language {
    /// Extract language from an Accept-Language header
    ///
    /// Only an explicit English preference switches away from Persian.
    pub fn from_accept_language(header: &str) -> Self {
        let primary = header
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        if primary.starts_with("en") {
            Language::English
        } else {
            Language::Persian
        }
    }

    /// Get language code (ISO 639-1)
    pub fn code(&self) -> &'static str {
        match self {
            Language::Persian => "fa",
            Language::English => "en",
        }
    }

    /// Get native language name
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::Persian => "فارسی",
            Language::English => "English",
        }
    }

    /// Check if language uses right-to-left script
    pub fn is_rtl(&self) -> bool {
        matches!(self, Language::Persian)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fa" | "per" | "fas" | "persian" | "فارسی" => Ok(Language::Persian),
            "en" | "eng" | "english" => Ok(Language::English),
            _ => Err(format!("Unsupported language: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_header() {
        assert_eq!(Language::from_accept_language("en-US,en;q=0.9"), Language::English);
        assert_eq!(Language::from_accept_language("fa-IR,fa;q=0.9"), Language::Persian);
        assert_eq!(Language::from_accept_language("fr-FR"), Language::Persian);
        assert_eq!(Language::from_accept_language("fa,en;q=0.5"), Language::Persian);
        assert_eq!(Language::from_accept_language(""), Language::Persian);
    }

    #[test]
    fn test_language_properties() {
        assert_eq!(Language::Persian.code(), "fa");
        assert!(Language::Persian.is_rtl());
        assert!(!Language::English.is_rtl());
        assert_eq!(Language::English.native_name(), "English");
    }

    #[test]
    fn test_language_from_str() {
        assert_eq!("fa".parse::<Language>().unwrap(), Language::Persian);
        assert_eq!("English".parse::<Language>().unwrap(), Language::English);
        assert!("zh".parse::<Language>().is_err());
    }
}
