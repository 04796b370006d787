use std::{fmt::Display, str::FromStr};

use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::ValueError;

/// Synthesis voice identifier, as understood by the audio backend
#[derive(Debug, Clone, PartialEq, Eq, Validate, Hash, Serialize, Deserialize)]
#[garde(transparent)]
pub struct Voice(#[garde(ascii, length(min = 1, max = 64))] String);

impl Voice {
    pub(crate) fn from_static(name: &'static str) -> Self {
        Voice(name.to_string())
    }
}

impl FromStr for Voice {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let voice = Voice(s.trim().to_string());
        voice
            .validate()
            .map_err(|_| ValueError::InvalidVoice(s.to_string()))?;
        Ok(voice)
    }
}

impl AsRef<str> for Voice {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Voice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parent resource types that carry language content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Institution,
    Exhibition,
    Exhibit,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Institution => "institution",
            ResourceKind::Exhibition => "exhibition",
            ResourceKind::Exhibit => "exhibit",
        }
    }

    /// Relative REST path of the resource collection
    pub fn api_path(&self) -> &'static str {
        match self {
            ResourceKind::Institution => "api/institution",
            ResourceKind::Exhibition => "api/exhibition",
            ResourceKind::Exhibit => "api/exhibit",
        }
    }

    /// Kind of the resource this one belongs to, exhibitions live in institutions
    /// and exhibits in exhibitions
    pub fn parent_kind(&self) -> Option<ResourceKind> {
        match self {
            ResourceKind::Institution => None,
            ResourceKind::Exhibition => Some(ResourceKind::Institution),
            ResourceKind::Exhibit => Some(ResourceKind::Exhibition),
        }
    }

    /// Advisory article length, exceeding it only raises a counter warning
    pub fn article_limit(&self) -> usize {
        match self {
            ResourceKind::Institution => 5000,
            ResourceKind::Exhibition => 3000,
            ResourceKind::Exhibit => 2000,
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "institution" => Ok(ResourceKind::Institution),
            "exhibition" => Ok(ResourceKind::Exhibition),
            "exhibit" => Ok(ResourceKind::Exhibit),
            _ => Err(ValueError::UnknownResourceKind(s.to_string())),
        }
    }
}

/// Language of the console itself (messages, notifications)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UiLocale {
    #[default]
    En,
    Pl,
}

impl UiLocale {
    pub fn as_str(&self) -> &'static str {
        match self {
            UiLocale::En => "en",
            UiLocale::Pl => "pl",
        }
    }
}

impl FromStr for UiLocale {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "en-gb" | "en-us" => Ok(UiLocale::En),
            "pl" | "pl-pl" => Ok(UiLocale::Pl),
            _ => Err(ValueError::UnsupportedLocale(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::Arbitrary;
    use quickcheck_macros::quickcheck;

    use super::*;

    impl Arbitrary for Voice {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            let len = usize::arbitrary(g) % 63 + 1;
            let alphabet: Vec<char> = ('a'..='z').chain('0'..='9').chain(['-']).collect();
            let name = (0..len)
                .map(|_| *g.choose(&alphabet).unwrap())
                .collect::<String>();
            Voice(name)
        }
    }

    #[quickcheck]
    fn test_arbitrary_voice_is_valid(voice: Voice) {
        assert!(voice.validate().is_ok());
    }

    #[test]
    fn test_invalid_voice() {
        assert!("".parse::<Voice>().is_err());
        assert!("głos".parse::<Voice>().is_err());
        assert!(Voice("x".repeat(65)).validate().is_err());
        assert_eq!("en-GB-Wavenet-B".parse::<Voice>().unwrap().as_ref(), "en-GB-Wavenet-B");
    }

    #[test]
    fn test_resource_kind() {
        assert_eq!("Exhibit".parse::<ResourceKind>().unwrap(), ResourceKind::Exhibit);
        assert_eq!(ResourceKind::Exhibit.parent_kind(), Some(ResourceKind::Exhibition));
        assert_eq!(ResourceKind::Institution.parent_kind(), None);
        assert!(ResourceKind::Institution.article_limit() > ResourceKind::Exhibit.article_limit());
    }

    #[test]
    fn test_locale() {
        assert_eq!("pl-PL".parse::<UiLocale>().unwrap(), UiLocale::Pl);
        assert!("de".parse::<UiLocale>().is_err());
    }
}
