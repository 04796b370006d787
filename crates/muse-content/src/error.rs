use muse_types::LanguageCode;

use crate::entry::EntryId;

pub type Result<T, E = ContentError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    #[error("Language {0} is already present")]
    DuplicateLanguage(LanguageCode),

    #[error("Language entry not found: {0}")]
    EntryNotFound(EntryId),

    #[error("Removal was not confirmed for the current entry: {0}")]
    StaleRemoval(EntryId),

    #[error("Invalid asset key")]
    InvalidAssetKey,

    #[error("Audio script is empty")]
    EmptyMarkup,

    #[error("Audio is not ready for playback")]
    NotReady,
}
