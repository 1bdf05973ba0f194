//! Language codes used by the text payloads

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One of the eleven language codes the games ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Language {
    Br,
    Cn,
    De,
    Es,
    Fr,
    It,
    Jp,
    Kr,
    Mx,
    Tw,
    #[default]
    Us,
}

impl Language {
    pub const ALL: [Language; 11] = [
        Self::Br,
        Self::Cn,
        Self::De,
        Self::Es,
        Self::Fr,
        Self::It,
        Self::Jp,
        Self::Kr,
        Self::Mx,
        Self::Tw,
        Self::Us,
    ];

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Br => "BR",
            Self::Cn => "CN",
            Self::De => "DE",
            Self::Es => "ES",
            Self::Fr => "FR",
            Self::It => "IT",
            Self::Jp => "JP",
            Self::Kr => "KR",
            Self::Mx => "MX",
            Self::Tw => "TW",
            Self::Us => "US",
        }
    }

    /// Languages rendered with full width characters.
    #[must_use]
    pub fn is_full_width(self) -> bool {
        matches!(self, Self::Cn | Self::Jp | Self::Kr | Self::Tw)
    }

    /// Display width of one character: 2 for full width languages.
    #[must_use]
    pub fn char_width(self) -> usize {
        if self.is_full_width() { 2 } else { 1 }
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.code() == s)
            .ok_or_else(|| Error::UnknownLanguage(s.to_string()))
    }
}

impl TryFrom<String> for Language {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Language> for String {
    fn from(lang: Language) -> Self {
        lang.code().to_string()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
