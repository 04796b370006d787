#![allow(async_fn_in_trait)]

pub mod article;
pub mod asset;
pub mod audio;
pub mod collection;
pub mod entry;
pub mod error;
pub mod markup;
pub mod resource;
pub mod store;
pub mod tabs;
pub mod validation;

pub use collection::LanguageEntries;
pub use entry::{AudioContent, EntryId, LanguageEntry};
pub use error::{ContentError, Result};
pub use store::{LanguageContentStore, PendingRemoval};
pub use tabs::TabSelection;
