use muse_client::ClientError;
use muse_content::{ContentError, validation::FormErrors};

use crate::messages;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Form has {} validation error(s)", .0.len())]
    Validation(FormErrors),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Another editor is already open")]
    EditorOpen,

    #[error("No editor is open")]
    NoEditor,

    #[error("Not signed in")]
    NotSignedIn,
}

impl AppError {
    /// Key of the user facing message
    pub fn message_key(&self) -> &str {
        match self {
            AppError::Validation(_) => "errors.validation",
            AppError::Content(e) => match e {
                ContentError::DuplicateLanguage(_) => "errors.language.duplicate",
                ContentError::EntryNotFound(_) => "errors.entry.not_found",
                ContentError::StaleRemoval(_) => "errors.entry.stale_removal",
                ContentError::InvalidAssetKey => "errors.asset.invalid_key",
                ContentError::EmptyMarkup => "errors.audio.empty",
                ContentError::NotReady => "errors.audio.not_ready",
            },
            AppError::Client(e) => match e {
                ClientError::Api { message, .. } if messages::is_known(message) => message,
                ClientError::Api { status: 401, .. } => "errors.api.unauthorized",
                ClientError::Api { status: 403, .. } => "errors.api.forbidden",
                ClientError::Api { status: 404, .. } => "errors.api.not_found",
                ClientError::Api { status: 409, .. } => "errors.api.conflict",
                ClientError::Api { status, .. } if *status >= 500 => "errors.api.server",
                ClientError::Api { .. } => "errors.api.rejected",
                ClientError::Network(_) => "errors.network",
                ClientError::HashMismatch { .. } => "errors.asset.corrupted",
                _ => "errors.unexpected",
            },
            AppError::EditorOpen => "errors.editor.open",
            AppError::NoEditor => "errors.editor.none",
            AppError::NotSignedIn => "errors.session.missing",
        }
    }

    /// Operation can be repeated without changing the form
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Client(e) => e.is_retryable(),
            _ => false,
        }
    }
}
