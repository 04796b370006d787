use muse_content::resource::ResourceId;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ClientError, Result};

/// One page of a listing, `next_page_key` is absent on the last page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ResourceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ListQuery {
    pub fn with_page_size(page_size: u32) -> Self {
        ListQuery {
            page_size: Some(page_size),
            ..Default::default()
        }
    }

    pub fn parent(mut self, parent_id: ResourceId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
}

/// Cursors of visited pages.
///
/// Index `n` holds the key that loads page `n`, page 0 needs no key. Cursors are only
/// appended, so any page already reached can be loaded again directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursors {
    keys: Vec<Option<String>>,
    complete: bool,
}

impl Default for PageCursors {
    fn default() -> Self {
        PageCursors {
            keys: vec![None],
            complete: false,
        }
    }
}

impl PageCursors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pages that can be loaded directly
    pub fn known_pages(&self) -> usize {
        self.keys.len()
    }

    /// Last page was seen, no more cursors will come
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn key_for(&self, page: usize) -> Option<Option<&str>> {
        self.keys.get(page).map(|k| k.as_deref())
    }

    /// Records `next_page_key` received with page `page`
    pub fn record(&mut self, page: usize, next_page_key: Option<&str>) {
        if page + 1 < self.keys.len() {
            return;
        }
        match next_page_key {
            Some(key) if page + 1 == self.keys.len() => self.keys.push(Some(key.to_string())),
            Some(_) => debug!("Ignoring cursor for page {page}, not reached sequentially"),
            None => self.complete = true,
        }
    }

    pub fn has_next(&self, page: usize) -> bool {
        page + 1 < self.keys.len()
    }
}

/// Source of pages, implemented by listing services
pub trait PageSource {
    type Item;

    async fn fetch_page(&self, query: &ListQuery) -> Result<Page<Self::Item>>;
}

/// Browses a listing page by page
pub struct Paginator<'a, S: PageSource> {
    source: &'a S,
    query: ListQuery,
    cursors: PageCursors,
    current: Option<usize>,
}

impl<'a, S: PageSource> Paginator<'a, S> {
    pub fn new(source: &'a S, query: ListQuery) -> Self {
        Paginator {
            source,
            query,
            cursors: PageCursors::new(),
            current: None,
        }
    }

    /// Zero based index of the page loaded last
    pub fn current_page(&self) -> Option<usize> {
        self.current
    }

    pub fn cursors(&self) -> &PageCursors {
        &self.cursors
    }

    pub fn has_next(&self) -> bool {
        self.current.is_some_and(|page| self.cursors.has_next(page))
    }

    pub fn has_previous(&self) -> bool {
        self.current.is_some_and(|page| page > 0)
    }

    pub async fn first(&mut self) -> Result<Page<S::Item>> {
        self.goto(0).await
    }

    pub async fn next(&mut self) -> Result<Page<S::Item>> {
        let page = self.current.map(|p| p + 1).unwrap_or(0);
        self.goto(page).await
    }

    pub async fn previous(&mut self) -> Result<Page<S::Item>> {
        let page = self.current.unwrap_or(0).saturating_sub(1);
        self.goto(page).await
    }

    pub async fn goto(&mut self, page: usize) -> Result<Page<S::Item>> {
        let key = self
            .cursors
            .key_for(page)
            .ok_or(ClientError::PageOutOfRange(page))?;
        let query = ListQuery {
            page_key: key.map(|k| k.to_string()),
            ..self.query.clone()
        };
        let result = self.source.fetch_page(&query).await?;
        self.cursors.record(page, result.next_page_key.as_deref());
        self.current = Some(page);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[test]
    fn test_cursors_append_only() {
        let mut cursors = PageCursors::new();
        assert_eq!(cursors.key_for(0), Some(None));
        assert_eq!(cursors.key_for(1), None);

        cursors.record(0, Some("k1"));
        cursors.record(1, Some("k2"));
        assert_eq!(cursors.known_pages(), 3);
        cursors.record(0, Some("other"));
        assert_eq!(cursors.key_for(1), Some(Some("k1")));

        cursors.record(2, None);
        assert!(cursors.is_complete());
        assert!(!cursors.has_next(2));
        assert!(cursors.has_next(1));
    }

    struct Numbers {
        total: usize,
        page_size: usize,
        requested: RefCell<Vec<Option<String>>>,
    }

    impl PageSource for Numbers {
        type Item = usize;

        async fn fetch_page(&self, query: &ListQuery) -> Result<Page<usize>> {
            self.requested.borrow_mut().push(query.page_key.clone());
            let start: usize = query
                .page_key
                .as_deref()
                .map(|k| k.parse().unwrap())
                .unwrap_or(0);
            let end = (start + self.page_size).min(self.total);
            Ok(Page {
                items: (start..end).collect(),
                next_page_key: (end < self.total).then(|| end.to_string()),
            })
        }
    }

    #[tokio::test]
    async fn test_paginator_walk() {
        let source = Numbers {
            total: 7,
            page_size: 3,
            requested: RefCell::new(vec![]),
        };
        let mut paginator = Paginator::new(&source, ListQuery::with_page_size(3));
        assert!(!paginator.has_previous());

        assert_eq!(paginator.first().await.unwrap().items, vec![0, 1, 2]);
        assert!(paginator.has_next());
        assert_eq!(paginator.next().await.unwrap().items, vec![3, 4, 5]);
        assert_eq!(paginator.next().await.unwrap().items, vec![6]);
        assert!(!paginator.has_next());
        assert!(paginator.cursors().is_complete());

        assert_eq!(paginator.previous().await.unwrap().items, vec![3, 4, 5]);
        assert_eq!(paginator.current_page(), Some(1));
        assert_eq!(paginator.goto(2).await.unwrap().items, vec![6]);
        assert!(matches!(
            paginator.goto(5).await,
            Err(ClientError::PageOutOfRange(5))
        ));
        assert_eq!(paginator.current_page(), Some(2));
        assert_eq!(
            source.requested.borrow().as_slice(),
            &[
                None,
                Some("3".to_string()),
                Some("6".to_string()),
                Some("3".to_string()),
                Some("6".to_string())
            ]
        );
    }
}
