pub mod config;
pub mod error;
pub mod general;
pub mod language;

pub use error::ValueError;
pub use general::{ResourceKind, UiLocale, Voice};
pub use language::LanguageCode;
