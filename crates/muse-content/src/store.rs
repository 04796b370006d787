use muse_types::LanguageCode;
use tracing::{debug, warn};

use crate::{
    collection::LanguageEntries,
    entry::{EntryId, LanguageEntry},
    error::{ContentError, Result},
    tabs::TabSelection,
};

/// Handle over the language entries owned by a form session.
///
/// All structural edits go through here so the tab selection follows them.
pub struct LanguageContentStore<'a> {
    entries: &'a mut LanguageEntries,
    tabs: &'a mut TabSelection,
}

/// Removal waiting for user confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRemoval {
    id: EntryId,
    language: LanguageCode,
}

impl PendingRemoval {
    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn language(&self) -> LanguageCode {
        self.language
    }
}

impl<'a> LanguageContentStore<'a> {
    pub fn new(entries: &'a mut LanguageEntries, tabs: &'a mut TabSelection) -> Self {
        LanguageContentStore { entries, tabs }
    }

    pub fn entries(&self) -> &LanguageEntries {
        &*self.entries
    }

    pub fn selection(&self) -> TabSelection {
        *self.tabs
    }

    pub fn select(&mut self, id: EntryId) -> bool {
        self.tabs.select(&*self.entries, id)
    }

    /// Languages from `offered` that can still be added
    pub fn addable_languages(&self, offered: &[LanguageCode]) -> Vec<LanguageCode> {
        self.entries.addable_languages(offered)
    }

    pub fn add_entry(&mut self, language: LanguageCode) -> Result<EntryId> {
        let id = self
            .entries
            .append(language)
            .inspect_err(|e| debug!("Cannot add language: {e}"))?;
        self.tabs.on_structure_changed(&*self.entries);
        Ok(id)
    }

    /// Removes entry at any position, unknown identities are a no-op
    pub fn remove_entry(&mut self, id: EntryId) -> Option<LanguageEntry> {
        let removed = self.entries.remove(id);
        match removed {
            Some(ref entry) => {
                debug!("Removed {} entry {id}", entry.language());
                self.tabs.on_structure_changed(&*self.entries);
            }
            None => warn!("Removal of unknown entry {id}"),
        }
        removed
    }

    pub fn request_removal(&self, id: EntryId) -> Result<PendingRemoval> {
        let entry = self.entries.entry(id)?;
        Ok(PendingRemoval {
            id,
            language: entry.language(),
        })
    }

    pub fn confirm_removal(&mut self, pending: PendingRemoval) -> Result<LanguageEntry> {
        match self.entries.get(pending.id) {
            Some(entry) if entry.language() == pending.language => {}
            _ => return Err(ContentError::StaleRemoval(pending.id)),
        }
        self.remove_entry(pending.id)
            .ok_or(ContentError::EntryNotFound(pending.id))
    }

    pub fn update_text(
        &mut self,
        id: EntryId,
        title: impl Into<String>,
        subtitle: impl Into<String>,
    ) -> Result<()> {
        let entry = self.entries.entry_mut(id)?;
        entry.title = title.into();
        entry.subtitle = subtitle.into();
        Ok(())
    }

    pub(crate) fn entry_mut(&mut self, id: EntryId) -> Result<&mut LanguageEntry> {
        self.entries.entry_mut(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_blank_entry() {
        let mut entries = LanguageEntries::new();
        let mut tabs = TabSelection::default();
        let mut store = LanguageContentStore::new(&mut entries, &mut tabs);
        let id = store.add_entry(LanguageCode::EnGb).unwrap();
        let entry = store.entries().entry(id).unwrap();
        assert_eq!(entry.language(), LanguageCode::EnGb);
        assert!(entry.title.is_empty() && entry.article.is_none() && entry.audio.is_none());
        assert_eq!(store.selection(), TabSelection::Selected(id));
    }

    #[test]
    fn test_confirmed_removal() {
        let mut entries = LanguageEntries::new();
        let mut tabs = TabSelection::default();
        let mut store = LanguageContentStore::new(&mut entries, &mut tabs);
        let pl = store.add_entry(LanguageCode::PlPl).unwrap();
        let en = store.add_entry(LanguageCode::EnGb).unwrap();

        let pending = store.request_removal(pl).unwrap();
        assert_eq!(pending.language(), LanguageCode::PlPl);
        let removed = store.confirm_removal(pending.clone()).unwrap();
        assert_eq!(removed.id(), pl);
        assert_eq!(store.selection(), TabSelection::Selected(en));

        assert_eq!(
            store.confirm_removal(pending),
            Err(ContentError::StaleRemoval(pl))
        );
        assert_eq!(store.entries().len(), 1);
    }

    #[test]
    fn test_addable_languages() {
        let mut entries = LanguageEntries::new();
        let mut tabs = TabSelection::default();
        let mut store = LanguageContentStore::new(&mut entries, &mut tabs);
        store.add_entry(LanguageCode::PlPl).unwrap();
        let offered = [LanguageCode::PlPl, LanguageCode::EnGb, LanguageCode::EsEs];
        assert_eq!(
            store.addable_languages(&offered),
            vec![LanguageCode::EnGb, LanguageCode::EsEs]
        );
    }

    #[test]
    fn test_update_text_unknown_entry() {
        let mut entries = LanguageEntries::new();
        let mut tabs = TabSelection::default();
        let mut store = LanguageContentStore::new(&mut entries, &mut tabs);
        let id = store.add_entry(LanguageCode::FrFr).unwrap();
        store.update_text(id, "Musée", "Collection").unwrap();
        assert_eq!(store.entries().entry(id).unwrap().title, "Musée");
        store.remove_entry(id);
        assert!(store.update_text(id, "x", "y").is_err());
    }
}
