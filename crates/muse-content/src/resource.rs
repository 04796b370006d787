use std::{collections::HashMap, fmt::Display};

use garde::Validate;
use muse_types::{LanguageCode, ResourceKind};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    asset::AssetKey,
    collection::LanguageEntries,
    entry::{AudioContent, LanguageEntry},
    validation::{FieldPath, FormErrors},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        ResourceId(id.into())
    }
}

impl AsRef<str> for ResourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        ResourceId(value.to_string())
    }
}

/// Language content block as exchanged with the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LanguageContent {
    #[garde(skip)]
    pub language_code: LanguageCode,
    #[garde(custom(not_blank), length(chars, max = 100))]
    pub title: String,
    #[garde(custom(not_blank), length(chars, max = 200))]
    pub subtitle: String,
    #[garde(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article: Option<String>,
    #[garde(dive)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioContent>,
}

fn not_blank(value: &str, _ctx: &()) -> garde::Result {
    if value.trim().is_empty() {
        Err(garde::Error::new("value is required"))
    } else {
        Ok(())
    }
}

impl From<&LanguageEntry> for LanguageContent {
    fn from(entry: &LanguageEntry) -> Self {
        LanguageContent {
            language_code: entry.language(),
            title: entry.title.clone(),
            subtitle: entry.subtitle.clone(),
            article: entry.article.clone(),
            audio: entry.audio.clone(),
        }
    }
}

/// Institution, exhibition or exhibit as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: ResourceId,
    pub version: i64,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<ResourceId>,
    #[serde(default)]
    pub images: Vec<AssetKey>,
    #[serde(default)]
    pub languages: Vec<LanguageContent>,
}

impl Resource {
    pub fn language_entries(&self) -> LanguageEntries {
        hydrate_entries(&self.languages)
    }
}

/// Short listing row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceShort {
    pub id: ResourceId,
    pub name: String,
    #[serde(default)]
    pub languages: Vec<LanguageCode>,
}

/// Create/update payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDraft {
    #[garde(length(chars, min = 1, max = 255))]
    pub name: String,
    #[garde(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ResourceId>,
    #[garde(skip)]
    #[serde(default)]
    pub images: Vec<AssetKey>,
    #[garde(range(min = 0))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[garde(dive)]
    #[serde(default)]
    pub languages: Vec<LanguageContent>,
}

impl ResourceDraft {
    pub fn from_entries(
        name: impl Into<String>,
        parent_id: Option<ResourceId>,
        images: Vec<AssetKey>,
        version: Option<i64>,
        entries: &LanguageEntries,
    ) -> Self {
        ResourceDraft {
            name: name.into(),
            parent_id,
            images,
            version,
            languages: entries.iter().map(LanguageContent::from).collect(),
        }
    }

    /// Field validation plus rules spanning the whole form
    pub fn check(&self, kind: ResourceKind) -> Result<(), FormErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FormErrors::new(),
            Err(report) => FormErrors::from_report(&report),
        };

        if let Some(parent) = kind.parent_kind() {
            if self.parent_id.is_none() {
                errors.push(
                    FieldPath::root().field("parent_id"),
                    format!("{kind} must belong to a {parent}"),
                );
            }
        }

        let mut seen: HashMap<LanguageCode, usize> = HashMap::new();
        for (index, content) in self.languages.iter().enumerate() {
            if let Some(first) = seen.insert(content.language_code, index) {
                errors.push(
                    FieldPath::language(index).field("language_code"),
                    format!(
                        "language {} already used at position {}",
                        content.language_code,
                        first + 1
                    ),
                );
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Builds entries with fresh identities, later duplicates of a language are dropped
pub fn hydrate_entries(contents: &[LanguageContent]) -> LanguageEntries {
    let mut entries = LanguageEntries::new();
    for content in contents {
        let mut entry = LanguageEntry::new(content.language_code);
        entry.title = content.title.clone();
        entry.subtitle = content.subtitle.clone();
        entry.article = content.article.clone();
        entry.audio = content.audio.clone();
        if let Err(e) = entries.push(entry) {
            warn!("Skipping loaded language content: {e}");
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::validation::tab_has_error;

    fn content(code: LanguageCode, title: &str) -> LanguageContent {
        LanguageContent {
            language_code: code,
            title: title.to_string(),
            subtitle: "Subtitle".to_string(),
            article: None,
            audio: None,
        }
    }

    #[test]
    fn test_wire_format() {
        let value = json!({
            "id": "ex-1",
            "version": 3,
            "name": "Mona Lisa",
            "parentId": "exh-9",
            "images": ["images/mona.jpg"],
            "languages": [{
                "languageCode": "en-GB",
                "title": "Mona Lisa",
                "subtitle": "Leonardo",
                "audio": {"assetKey": "audio/1.mp3", "markup": "Hello", "voice": "en-GB-Wavenet-B"}
            }]
        });
        let resource: Resource = serde_json::from_value(value).unwrap();
        assert_eq!(resource.parent_id, Some(ResourceId::new("exh-9")));
        let entries = resource.language_entries();
        assert_eq!(entries.len(), 1);
        let entry = entries.at(0).unwrap();
        assert_eq!(entry.language(), LanguageCode::EnGb);
        assert_eq!(
            entry.audio.as_ref().unwrap().asset_key.as_ref().unwrap().as_ref(),
            "audio/1.mp3"
        );

        let draft = ResourceDraft::from_entries("Mona Lisa", None, vec![], Some(3), &entries);
        let out = serde_json::to_value(&draft).unwrap();
        assert_eq!(out["languages"][0]["languageCode"], "en-GB");
        assert!(out["languages"][0].get("article").is_none());
        assert!(out.get("parentId").is_none());
    }

    #[test]
    fn test_hydrate_skips_duplicates() {
        let entries = hydrate_entries(&[
            content(LanguageCode::PlPl, "A"),
            content(LanguageCode::PlPl, "B"),
            content(LanguageCode::EsEs, "C"),
        ]);
        assert_eq!(entries.languages(), vec![LanguageCode::PlPl, LanguageCode::EsEs]);
        assert_eq!(entries.at(0).unwrap().title, "A");
    }

    #[test]
    fn test_check_marks_offending_entry() {
        let draft = ResourceDraft {
            name: "Muzeum".into(),
            parent_id: None,
            images: vec![],
            version: None,
            languages: vec![content(LanguageCode::PlPl, "Tytuł"), content(LanguageCode::EnGb, "")],
        };
        let errors = draft.check(ResourceKind::Institution).unwrap_err();
        assert!(!tab_has_error(&errors, 0));
        assert!(tab_has_error(&errors, 1));
    }

    #[test]
    fn test_blank_title_is_missing() {
        let mut blank = content(LanguageCode::EnGb, "   ");
        blank.subtitle = "\t".into();
        let draft = ResourceDraft {
            name: "Muzeum".into(),
            parent_id: None,
            images: vec![],
            version: None,
            languages: vec![blank],
        };
        let errors = draft.check(ResourceKind::Institution).unwrap_err();
        assert!(tab_has_error(&errors, 0));
        assert_eq!(
            errors.messages_at(&FieldPath::language(0).field("title")),
            vec!["value is required"]
        );
        assert!(errors.has_errors_under(&FieldPath::language(0).field("subtitle")));
    }

    #[test]
    fn test_check_requires_parent() {
        let draft = ResourceDraft {
            name: "Hall".into(),
            parent_id: None,
            images: vec![],
            version: None,
            languages: vec![],
        };
        let errors = draft.check(ResourceKind::Exhibition).unwrap_err();
        assert!(errors.has_errors_under(&FieldPath::root().field("parent_id")));
        assert!(draft.check(ResourceKind::Institution).is_ok());
    }

    #[test]
    fn test_check_duplicate_and_markup() {
        let mut broken = content(LanguageCode::EnGb, "Title");
        broken.audio = Some(AudioContent::new(
            "<lang xml:lang=\"pl-PL\">unclosed",
            LanguageCode::EnGb.default_voice(),
        ));
        let draft = ResourceDraft {
            name: "Hall".into(),
            parent_id: Some("inst-1".into()),
            images: vec![],
            version: Some(1),
            languages: vec![content(LanguageCode::EnGb, "Title"), broken],
        };
        let errors = draft.check(ResourceKind::Exhibition).unwrap_err();
        assert!(!tab_has_error(&errors, 0));
        assert!(errors.has_errors_under(&FieldPath::language(1).field("language_code")));
        assert!(errors.has_errors_under(&FieldPath::language(1).field("audio")));
    }
}
