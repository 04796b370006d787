use std::fmt::Display;

use garde::Validate;
use muse_types::{LanguageCode, Voice};
use serde::{Deserialize, Serialize};

use crate::{asset::AssetKey, markup};

/// Synthetic identity of a language entry, independent of its language code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(uuid::Uuid);

impl EntryId {
    pub(crate) fn generate() -> Self {
        EntryId(uuid::Uuid::new_v4())
    }
}

impl Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Audio script of an entry. `asset_key` points to the render produced from exactly
/// this `markup` and `voice`, it is assigned by the backend when the resource is saved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AudioContent {
    #[garde(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_key: Option<AssetKey>,
    #[garde(custom(well_formed_markup))]
    pub markup: String,
    #[garde(dive)]
    pub voice: Voice,
}

fn well_formed_markup(value: &str, _ctx: &()) -> garde::Result {
    markup::check_markup(value).map_err(|e| garde::Error::new(e.to_string()))
}

impl AudioContent {
    pub fn new(markup: impl Into<String>, voice: Voice) -> Self {
        AudioContent {
            asset_key: None,
            markup: markup.into(),
            voice,
        }
    }

    /// Stored render can be played without new synthesis
    pub fn reusable_for(&self, markup: &str, voice: &Voice) -> Option<&AssetKey> {
        self.asset_key
            .as_ref()
            .filter(|_| self.markup == markup && &self.voice == voice)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageEntry {
    id: EntryId,
    language: LanguageCode,
    pub title: String,
    pub subtitle: String,
    pub article: Option<String>,
    pub audio: Option<AudioContent>,
}

impl LanguageEntry {
    pub(crate) fn new(language: LanguageCode) -> Self {
        LanguageEntry {
            id: EntryId::generate(),
            language,
            title: String::new(),
            subtitle: String::new(),
            article: None,
            audio: None,
        }
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn language(&self) -> LanguageCode {
        self.language
    }
}
