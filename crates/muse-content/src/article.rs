use muse_types::{LanguageCode, ResourceKind};
use tracing::debug;

use crate::{
    entry::{EntryId, LanguageEntry},
    error::Result,
    store::LanguageContentStore,
};

/// Character counter state shown next to a text field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharCount {
    pub count: usize,
    pub limit: usize,
}

impl CharCount {
    /// Over the advisory limit, a warning only
    pub fn is_over(&self) -> bool {
        self.count > self.limit
    }

    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.count)
    }
}

/// Modal editor of one entry's article
#[derive(Debug, Clone)]
pub struct ArticleEditor {
    entry: EntryId,
    language: LanguageCode,
    original: Option<String>,
    text: String,
    limit: usize,
}

impl ArticleEditor {
    pub fn open(entry: &LanguageEntry, kind: ResourceKind) -> Self {
        ArticleEditor {
            entry: entry.id(),
            language: entry.language(),
            original: entry.article.clone(),
            text: entry.article.clone().unwrap_or_default(),
            limit: kind.article_limit(),
        }
    }

    pub fn entry(&self) -> EntryId {
        self.entry
    }

    pub fn language(&self) -> LanguageCode {
        self.language
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn counter(&self) -> CharCount {
        CharCount {
            count: self.text.chars().count(),
            limit: self.limit,
        }
    }

    /// Value that a save would commit, blank text means no article
    pub fn value(&self) -> Option<String> {
        if self.text.trim().is_empty() {
            None
        } else {
            Some(self.text.clone())
        }
    }

    pub fn is_modified(&self) -> bool {
        self.value() != self.original
    }

    /// Writes the article back to its entry
    pub fn save(self, store: &mut LanguageContentStore<'_>) -> Result<()> {
        let value = self.value();
        let counter = self.counter();
        if counter.is_over() {
            debug!(
                "Article for {} exceeds advisory limit {} > {}",
                self.language, counter.count, counter.limit
            );
        }
        let entry = store.entry_mut(self.entry)?;
        entry.article = value;
        Ok(())
    }
}
