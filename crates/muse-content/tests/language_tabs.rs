use muse_content::{
    ContentError, LanguageContentStore, LanguageEntries, TabSelection,
    validation::{FieldPath, FormErrors, TabIndicator, tab_indicators},
};
use muse_types::LanguageCode;
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use tracing_test::traced_test;

#[test]
#[traced_test]
fn test_tab_scenario() {
    let mut entries = LanguageEntries::new();
    let mut tabs = TabSelection::initial(&entries);
    assert_eq!(tabs, TabSelection::NoEntries);
    let mut store = LanguageContentStore::new(&mut entries, &mut tabs);

    let en = store.add_entry(LanguageCode::EnGb).unwrap();
    assert_eq!(store.selection(), TabSelection::Selected(en));

    let pl = store.add_entry(LanguageCode::PlPl).unwrap();
    assert_eq!(store.selection(), TabSelection::Selected(pl));

    store.remove_entry(en).unwrap();
    assert_eq!(store.selection(), TabSelection::Selected(pl));

    store.remove_entry(pl).unwrap();
    assert_eq!(store.selection(), TabSelection::NoEntries);
    assert!(store.entries().is_empty());
}

#[test]
#[traced_test]
fn test_duplicate_language() {
    let mut entries = LanguageEntries::new();
    let mut tabs = TabSelection::default();
    let mut store = LanguageContentStore::new(&mut entries, &mut tabs);

    let pl = store.add_entry(LanguageCode::PlPl).unwrap();
    let err = store.add_entry(LanguageCode::PlPl).unwrap_err();
    assert_eq!(err, ContentError::DuplicateLanguage(LanguageCode::PlPl));
    assert_eq!(store.entries().len(), 1);
    assert_eq!(store.selection(), TabSelection::Selected(pl));
    assert!(logs_contain("Cannot add language"));
}

#[test]
fn test_remove_middle_keeps_identities() {
    let mut entries = LanguageEntries::new();
    let mut tabs = TabSelection::default();
    let mut store = LanguageContentStore::new(&mut entries, &mut tabs);
    let de = store.add_entry(LanguageCode::DeDe).unwrap();
    let fr = store.add_entry(LanguageCode::FrFr).unwrap();
    let it = store.add_entry(LanguageCode::ItIt).unwrap();
    store.update_text(it, "Museo", "Collezione").unwrap();
    assert!(store.select(de));

    store.remove_entry(fr).unwrap();
    assert_eq!(store.entries().ids(), &[de, it]);
    assert_eq!(store.entries().entry(it).unwrap().title, "Museo");
    assert_eq!(store.selection(), TabSelection::Selected(it));
}

#[test]
fn test_error_tabs_follow_positions() {
    let mut entries = LanguageEntries::new();
    let mut tabs = TabSelection::default();
    let mut store = LanguageContentStore::new(&mut entries, &mut tabs);
    store.add_entry(LanguageCode::PlPl).unwrap();
    store.add_entry(LanguageCode::UkUa).unwrap();

    let mut errors = FormErrors::new();
    errors.push(FieldPath::language(1).field("title"), "required");
    let strip = tab_indicators(store.entries(), &store.selection(), &errors);
    assert_eq!(strip.len(), 2);
    assert_eq!(strip[0].indicator, TabIndicator::Flag(LanguageCode::PlPl));
    assert_eq!(strip[1].indicator, TabIndicator::Error);
    assert!(strip[1].selected && !strip[0].selected);
}

#[derive(Debug, Clone)]
enum Op {
    Add(LanguageCode),
    RemoveAt(usize),
}

impl Arbitrary for Op {
    fn arbitrary(g: &mut Gen) -> Self {
        if bool::arbitrary(g) {
            Op::Add(*g.choose(&LanguageCode::ALL).unwrap())
        } else {
            Op::RemoveAt(usize::arbitrary(g) % 8)
        }
    }
}

#[quickcheck]
fn languages_stay_unique(ops: Vec<Op>) -> bool {
    let mut entries = LanguageEntries::new();
    let mut tabs = TabSelection::default();
    let mut store = LanguageContentStore::new(&mut entries, &mut tabs);
    for op in ops {
        match op {
            Op::Add(language) => {
                let before = store.entries().len();
                let present = store.entries().contains_language(language);
                match store.add_entry(language) {
                    Ok(_) if present => return false,
                    Err(_) if !present || store.entries().len() != before => return false,
                    _ => {}
                }
            }
            Op::RemoveAt(index) => {
                if let Some(id) = store.entries().ids().get(index).copied() {
                    store.remove_entry(id);
                }
            }
        }
        let mut languages = store.entries().languages();
        let len = languages.len();
        languages.sort_by_key(|l| l.as_str());
        languages.dedup();
        if languages.len() != len {
            return false;
        }
        if store.selection().selected() != store.entries().last_id() {
            return false;
        }
    }
    true
}
