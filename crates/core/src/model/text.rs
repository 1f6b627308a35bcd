use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Display language of the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    He,
}

impl Lang {
    /// Language used when a text has no variant for the requested one.
    pub const DEFAULT: Lang = Lang::En;

    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::He => "he",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::En => Self::He,
            Self::He => Self::En,
        }
    }

    pub fn is_rtl(&self) -> bool {
        matches!(self, Self::He)
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown language code: {0}")]
pub struct UnknownLang(pub String);

impl FromStr for Lang {
    type Err = UnknownLang;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "he" => Ok(Self::He),
            other => Err(UnknownLang(other.to_string())),
        }
    }
}

/// Text with per-language variants.
///
/// Content authors write either a plain string, used for every language,
/// or an object keyed by language code: `{ "en": "David", "he": "דוד" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalizedText {
    Plain(String),
    ByLang(BTreeMap<String, String>),
}

impl LocalizedText {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain(text.into())
    }

    pub fn bilingual(en: impl Into<String>, he: impl Into<String>) -> Self {
        let mut variants = BTreeMap::new();
        variants.insert(Lang::En.code().to_string(), en.into());
        variants.insert(Lang::He.code().to_string(), he.into());
        Self::ByLang(variants)
    }

    /// Resolve the text for `lang`.
    ///
    /// Falls back to the default language, then to the empty string. Empty
    /// variants count as missing.
    pub fn get(&self, lang: Lang) -> &str {
        match self {
            Self::Plain(text) => text,
            Self::ByLang(variants) => [lang, Lang::DEFAULT]
                .iter()
                .filter_map(|l| variants.get(l.code()))
                .find(|text| !text.is_empty())
                .map_or("", String::as_str),
        }
    }

    /// Every authored variant, in no particular language order.
    pub fn variants(&self) -> impl Iterator<Item = &str> {
        let (plain, by_lang) = match self {
            Self::Plain(text) => (Some(text.as_str()), None),
            Self::ByLang(variants) => (None, Some(variants.values().map(String::as_str))),
        };
        plain.into_iter().chain(by_lang.into_iter().flatten())
    }

    /// Whether any variant contains `needle_lower` ignoring case.
    ///
    /// `needle_lower` must already be lower-cased. Variants are tested
    /// independently; one hit is enough.
    pub fn contains_ci(&self, needle_lower: &str) -> bool {
        self.variants()
            .any(|text| text.to_lowercase().contains(needle_lower))
    }
}

impl Default for LocalizedText {
    fn default() -> Self {
        Self::Plain(String::new())
    }
}

impl From<&str> for LocalizedText {
    fn from(text: &str) -> Self {
        Self::plain(text)
    }
}
