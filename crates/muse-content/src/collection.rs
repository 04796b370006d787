use std::collections::HashMap;

use muse_types::LanguageCode;

use crate::{
    entry::{EntryId, LanguageEntry},
    error::{ContentError, Result},
};

/// Ordered map of language entries keyed by [`EntryId`].
///
/// Iteration order is insertion order, which is also the tab order. Entries are only
/// appended or removed, remaining entries keep their identities and relative order.
/// No two entries share a language code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageEntries {
    order: Vec<EntryId>,
    entries: HashMap<EntryId, LanguageEntry>,
}

impl LanguageEntries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LanguageEntry> + '_ {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }

    pub fn ids(&self) -> &[EntryId] {
        &self.order
    }

    pub fn get(&self, id: EntryId) -> Option<&LanguageEntry> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: EntryId) -> Option<&mut LanguageEntry> {
        self.entries.get_mut(&id)
    }

    pub fn entry(&self, id: EntryId) -> Result<&LanguageEntry> {
        self.get(id).ok_or(ContentError::EntryNotFound(id))
    }

    pub fn entry_mut(&mut self, id: EntryId) -> Result<&mut LanguageEntry> {
        self.get_mut(id).ok_or(ContentError::EntryNotFound(id))
    }

    pub fn at(&self, index: usize) -> Option<&LanguageEntry> {
        self.order.get(index).and_then(|id| self.entries.get(id))
    }

    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.order.iter().position(|i| *i == id)
    }

    pub fn last_id(&self) -> Option<EntryId> {
        self.order.last().copied()
    }

    pub fn find_language(&self, language: LanguageCode) -> Option<&LanguageEntry> {
        self.iter().find(|e| e.language() == language)
    }

    pub fn contains_language(&self, language: LanguageCode) -> bool {
        self.find_language(language).is_some()
    }

    pub fn languages(&self) -> Vec<LanguageCode> {
        self.iter().map(|e| e.language()).collect()
    }

    /// Offered languages that have no entry yet, in offered order
    pub fn addable_languages(&self, offered: &[LanguageCode]) -> Vec<LanguageCode> {
        offered
            .iter()
            .copied()
            .filter(|l| !self.contains_language(*l))
            .collect()
    }

    /// Appends a blank entry for `language`
    pub(crate) fn append(&mut self, language: LanguageCode) -> Result<EntryId> {
        self.push(LanguageEntry::new(language))
    }

    pub(crate) fn push(&mut self, entry: LanguageEntry) -> Result<EntryId> {
        if self.contains_language(entry.language()) {
            return Err(ContentError::DuplicateLanguage(entry.language()));
        }
        let id = entry.id();
        self.order.push(id);
        self.entries.insert(id, entry);
        Ok(id)
    }

    pub(crate) fn remove(&mut self, id: EntryId) -> Option<LanguageEntry> {
        let entry = self.entries.remove(&id)?;
        self.order.retain(|i| *i != id);
        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order() {
        let mut entries = LanguageEntries::new();
        let pl = entries.append(LanguageCode::PlPl).unwrap();
        let en = entries.append(LanguageCode::EnGb).unwrap();
        let es = entries.append(LanguageCode::EsEs).unwrap();
        assert_eq!(entries.ids(), &[pl, en, es]);
        assert_eq!(
            entries.languages(),
            vec![LanguageCode::PlPl, LanguageCode::EnGb, LanguageCode::EsEs]
        );

        entries.remove(en).unwrap();
        assert_eq!(entries.ids(), &[pl, es]);
        assert_eq!(entries.position(es), Some(1));
        assert!(entries.get(en).is_none());
        assert_eq!(entries.at(0).unwrap().id(), pl);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut entries = LanguageEntries::new();
        entries.append(LanguageCode::PlPl).unwrap();
        let err = entries.append(LanguageCode::PlPl).unwrap_err();
        assert_eq!(err, ContentError::DuplicateLanguage(LanguageCode::PlPl));
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_readd_after_remove_gets_new_identity() {
        let mut entries = LanguageEntries::new();
        let first = entries.append(LanguageCode::DeDe).unwrap();
        entries.remove(first);
        let second = entries.append(LanguageCode::DeDe).unwrap();
        assert_ne!(first, second);
        assert!(entries.entry(first).is_err());
    }
}
