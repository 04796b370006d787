use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::debug;
use url::Url;

use crate::error::{ContentError, Result};

const TEMPORARY_NAMESPACE: &str = "temporary";
const PERMANENT_NAMESPACE: &str = "permanent";

const MAX_KEY_LEN: usize = 1023;
const MAX_SEGMENT_LEN: usize = 255;
const MAX_KEY_DEPTH: usize = 8;
const KEY_INVALID_CHARS: &str = r#"\:?#"#;

/// Asset store namespaces: fresh uploads and previews land in the public temporary
/// space, the backend moves them to the private permanent space on resource save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreNamespace {
    Temporary,
    Permanent,
}

impl StoreNamespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreNamespace::Temporary => TEMPORARY_NAMESPACE,
            StoreNamespace::Permanent => PERMANENT_NAMESPACE,
        }
    }
}

fn is_segment_invalid(s: &str) -> bool {
    s.is_empty()
        || s.starts_with('.')
        || s.len() > MAX_SEGMENT_LEN
        || s.chars()
            .any(|c| KEY_INVALID_CHARS.contains(c) || c.is_ascii_control())
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() || key.len() > MAX_KEY_LEN {
        return Err(ContentError::InvalidAssetKey);
    }
    if key.starts_with('/') || key.ends_with('/') {
        return Err(ContentError::InvalidAssetKey);
    }
    let segments = key.split('/').collect::<Vec<_>>();
    if segments.len() > MAX_KEY_DEPTH || segments.into_iter().any(is_segment_invalid) {
        Err(ContentError::InvalidAssetKey)
    } else {
        Ok(())
    }
}

/// Opaque key of a stored file (image or rendered audio).
/// Relative, utf8, cannot escape its namespace through `.` segments
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetKey(String);

impl AssetKey {
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        validate_key(&key).inspect_err(|_| debug!("Invalid asset key: {key}"))?;
        Ok(AssetKey(key))
    }

    /// Last segment of the key, usable as a file name
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl FromStr for AssetKey {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self> {
        AssetKey::new(s)
    }
}

impl TryFrom<String> for AssetKey {
    type Error = ContentError;

    fn try_from(value: String) -> Result<Self> {
        AssetKey::new(value)
    }
}

impl From<AssetKey> for String {
    fn from(value: AssetKey) -> Self {
        value.0
    }
}

impl AsRef<str> for AssetKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for AssetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Time limited signed URL of an asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetUrl {
    pub url: Url,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub expires_at: Option<OffsetDateTime>,
}

impl AssetUrl {
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at.is_some_and(|expires| expires <= now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_key() {
        assert!(AssetKey::new("audio/abcd.mp3").is_ok());
        assert!(AssetKey::new("abcd.jpg").is_ok());
        assert!(AssetKey::new("").is_err());
        assert!(AssetKey::new("/abcd.jpg").is_err());
        assert!(AssetKey::new("a/../b.jpg").is_err());
        assert!(AssetKey::new("a/b/").is_err());
        assert!(AssetKey::new("a\\b").is_err());
    }

    #[test]
    fn test_file_name() {
        let key = AssetKey::new("images/2024/cover.png").unwrap();
        assert_eq!(key.file_name(), "cover.png");
    }

    #[test]
    fn test_deserialize_rejects_invalid() {
        let res: std::result::Result<AssetKey, _> = serde_json::from_str("\"../x\"");
        assert!(res.is_err());
    }

    #[test]
    fn test_expiry() {
        let now = OffsetDateTime::now_utc();
        let url = AssetUrl {
            url: "https://cdn.muse.cloud/a.mp3".parse().unwrap(),
            expires_at: Some(now - time::Duration::seconds(1)),
        };
        assert!(url.is_expired(now));
        let url = AssetUrl {
            expires_at: None,
            ..url
        };
        assert!(!url.is_expired(now));
    }
}
