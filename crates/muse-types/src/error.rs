#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("Unsupported language code: {0}")]
    UnsupportedLanguage(String),
    #[error("Unknown resource kind: {0}")]
    UnknownResourceKind(String),
    #[error("Unsupported UI locale: {0}")]
    UnsupportedLocale(String),
    #[error("Invalid voice: {0}")]
    InvalidVoice(String),
}
