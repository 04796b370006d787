use std::{fmt::Display, str::FromStr};

use phf::phf_map;
use serde::{Deserialize, Serialize};

use crate::{ValueError, Voice};

/// Content languages supported by the platform, serialized as BCP 47 tags (`pl-PL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LanguageCode {
    #[serde(rename = "pl-PL")]
    PlPl,
    #[serde(rename = "en-GB")]
    EnGb,
    #[serde(rename = "es-ES")]
    EsEs,
    #[serde(rename = "de-DE")]
    DeDe,
    #[serde(rename = "fr-FR")]
    FrFr,
    #[serde(rename = "it-IT")]
    ItIt,
    #[serde(rename = "uk-UA")]
    UkUa,
}

static DEFAULT_VOICES: phf::Map<&'static str, &'static str> = phf_map! {
    "pl-PL" => "pl-PL-Wavenet-A",
    "en-GB" => "en-GB-Wavenet-B",
    "es-ES" => "es-ES-Wavenet-C",
    "de-DE" => "de-DE-Wavenet-B",
    "fr-FR" => "fr-FR-Wavenet-A",
    "it-IT" => "it-IT-Wavenet-A",
    "uk-UA" => "uk-UA-Wavenet-A",
};

impl LanguageCode {
    pub const ALL: [LanguageCode; 7] = [
        LanguageCode::PlPl,
        LanguageCode::EnGb,
        LanguageCode::EsEs,
        LanguageCode::DeDe,
        LanguageCode::FrFr,
        LanguageCode::ItIt,
        LanguageCode::UkUa,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageCode::PlPl => "pl-PL",
            LanguageCode::EnGb => "en-GB",
            LanguageCode::EsEs => "es-ES",
            LanguageCode::DeDe => "de-DE",
            LanguageCode::FrFr => "fr-FR",
            LanguageCode::ItIt => "it-IT",
            LanguageCode::UkUa => "uk-UA",
        }
    }

    pub fn default_voice(&self) -> Voice {
        let name = DEFAULT_VOICES
            .get(self.as_str())
            .copied()
            .unwrap_or("standard");
        Voice::from_static(name)
    }
}

impl Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageCode {
    type Err = ValueError;

    /// Accepts the canonical tag case-insensitively, with either `-` or `_` separator
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('_', "-");
        LanguageCode::ALL
            .into_iter()
            .find(|code| code.as_str().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| ValueError::UnsupportedLanguage(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language() {
        assert_eq!("pl-PL".parse::<LanguageCode>().unwrap(), LanguageCode::PlPl);
        assert_eq!("en_gb".parse::<LanguageCode>().unwrap(), LanguageCode::EnGb);
        assert!("cs-CZ".parse::<LanguageCode>().is_err());
        assert!("".parse::<LanguageCode>().is_err());
    }

    #[test]
    fn test_serde_uses_tag() {
        let json = serde_json::to_string(&LanguageCode::EsEs).unwrap();
        assert_eq!(json, "\"es-ES\"");
        let code: LanguageCode = serde_json::from_str("\"uk-UA\"").unwrap();
        assert_eq!(code, LanguageCode::UkUa);
    }

    #[test]
    fn test_every_language_has_voice() {
        for code in LanguageCode::ALL {
            assert!(DEFAULT_VOICES.contains_key(code.as_str()), "{code}");
            assert!(code.default_voice().as_ref().starts_with(code.as_str()));
        }
    }
}
