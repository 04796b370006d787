use tracing::debug;

use crate::{collection::LanguageEntries, entry::EntryId};

/// Which language tab is visible.
///
/// After any structural change of the collection the selection jumps to the last
/// (newest) entry instead of keeping the previously focused one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TabSelection {
    #[default]
    NoEntries,
    Selected(EntryId),
}

impl TabSelection {
    pub fn initial(entries: &LanguageEntries) -> Self {
        Self::last_of(entries)
    }

    fn last_of(entries: &LanguageEntries) -> Self {
        match entries.last_id() {
            Some(id) => TabSelection::Selected(id),
            None => TabSelection::NoEntries,
        }
    }

    /// Entry was added or removed
    pub fn on_structure_changed(&mut self, entries: &LanguageEntries) {
        let next = Self::last_of(entries);
        debug!("Tab selection {:?} -> {:?}", self, next);
        *self = next;
    }

    /// Explicit tab click, unknown identities are ignored
    pub fn select(&mut self, entries: &LanguageEntries, id: EntryId) -> bool {
        if entries.get(id).is_some() {
            *self = TabSelection::Selected(id);
            true
        } else {
            debug!("Ignoring selection of unknown entry {id}");
            false
        }
    }

    pub fn selected(&self) -> Option<EntryId> {
        match self {
            TabSelection::NoEntries => None,
            TabSelection::Selected(id) => Some(*id),
        }
    }

    pub fn selected_index(&self, entries: &LanguageEntries) -> Option<usize> {
        self.selected().and_then(|id| entries.position(id))
    }
}

#[cfg(test)]
mod tests {
    use muse_types::LanguageCode;

    use super::*;

    #[test]
    fn test_initial_state() {
        let mut entries = LanguageEntries::new();
        assert_eq!(TabSelection::initial(&entries), TabSelection::NoEntries);

        entries.append(LanguageCode::PlPl).unwrap();
        let last = entries.append(LanguageCode::EnGb).unwrap();
        assert_eq!(TabSelection::initial(&entries), TabSelection::Selected(last));
    }

    #[test]
    fn test_click_and_structural_change() {
        let mut entries = LanguageEntries::new();
        let pl = entries.append(LanguageCode::PlPl).unwrap();
        let en = entries.append(LanguageCode::EnGb).unwrap();
        let mut tabs = TabSelection::initial(&entries);

        assert!(tabs.select(&entries, pl));
        assert_eq!(tabs.selected_index(&entries), Some(0));

        let es = entries.append(LanguageCode::EsEs).unwrap();
        tabs.on_structure_changed(&entries);
        assert_eq!(tabs.selected(), Some(es));

        entries.remove(en);
        tabs.on_structure_changed(&entries);
        assert_eq!(tabs.selected(), Some(es));
        assert!(!tabs.select(&entries, en));
        assert_eq!(tabs.selected(), Some(es));
    }
}
