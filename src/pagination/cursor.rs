//! Cursor paginator
//!
//! Walks one source page by page, following the id of the last item of
//! each full page, until a short page marks the source as exhausted.

use super::types::{Cursor, Identified, PageFetcher, PAGE_SIZE};
use crate::error::{Error, Result};
use crate::types::ItemId;
use futures::stream::{self, Stream, TryStreamExt};
use std::collections::VecDeque;
use tracing::debug;

/// Paginator over a single `end_id`-paginated source.
///
/// Iteration is forward-only. The limit caps the items yielded over the
/// paginator's whole life, across every `stream()` and `flatten()` call.
/// Items of a fetched page that a dropped stream did not yield are kept
/// and come first in the next stream. Once the source is exhausted the
/// paginator stays exhausted and further streams are empty; use
/// [`restart`] to walk the source again from its starting cursor.
///
/// [`restart`]: CursorPaginator::restart
pub struct CursorPaginator<F: PageFetcher> {
    fetcher: F,
    limit: Option<usize>,
    start: Cursor,
    cursor: Cursor,
    page_size: usize,
    pages_fetched: usize,
    pending: VecDeque<F::Item>,
    yielded: usize,
}

impl<F: PageFetcher> CursorPaginator<F> {
    /// Create an unlimited paginator starting at the newest page
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            limit: None,
            start: Cursor::Start,
            cursor: Cursor::Start,
            page_size: PAGE_SIZE,
            pages_fetched: 0,
            pending: VecDeque::new(),
            yielded: 0,
        }
    }

    /// Cap the number of items ever yielded
    #[must_use]
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Start after the given id (`0` starts from the newest page)
    #[must_use]
    pub fn with_end_id(mut self, end_id: ItemId) -> Self {
        self.start = Cursor::from_end_id(end_id);
        self.cursor = self.start;
        self
    }

    /// Override the full-page size (clamped to at least 1)
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Configured item limit
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Current cursor state
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Full-page size used for exhaustion detection
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Items yielded by the streams so far
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    /// Items the limit still allows, `None` when unlimited
    pub fn remaining(&self) -> Option<usize> {
        self.limit.map(|limit| limit.saturating_sub(self.yielded))
    }

    /// Number of fetch calls made so far
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// The wrapped fetch contract
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// True once no further fetch will be attempted
    pub fn is_exhausted(&self) -> bool {
        self.cursor.is_exhausted()
    }

    /// Fetch the next page.
    ///
    /// A page shorter than the page size is returned as-is and exhausts the
    /// paginator. On a fetch error the cursor is left untouched. Raw pages
    /// bypass the limit and the items held back for the next stream.
    pub async fn next_page(&mut self) -> Result<Vec<F::Item>> {
        let Some(end_id) = self.cursor.end_id() else {
            return Err(Error::Exhausted);
        };

        let page = self.fetcher.fetch(end_id, self.page_size).await?;
        self.pages_fetched += 1;

        match page.last() {
            Some(last) if page.len() >= self.page_size => {
                self.cursor = Cursor::After(last.id());
            }
            _ => {
                debug!(
                    end_id,
                    items = page.len(),
                    pages = self.pages_fetched,
                    "Short page, source exhausted"
                );
                self.cursor = Cursor::Exhausted;
            }
        }

        Ok(page)
    }

    /// Lazily yield items page by page, capped at what the limit has left.
    ///
    /// Pages are only fetched as items are pulled. The stream ends after the
    /// first error.
    pub fn stream(&mut self) -> impl Stream<Item = Result<F::Item>> + Send + '_ {
        stream::try_unfold(self, |paginator| async move {
            let item = paginator.next_item().await?;
            Ok::<_, Error>(item.map(|item| (item, paginator)))
        })
    }

    async fn next_item(&mut self) -> Result<Option<F::Item>> {
        if self.remaining() == Some(0) {
            return Ok(None);
        }
        if self.pending.is_empty() && !self.is_exhausted() {
            let page = self.next_page().await?;
            self.pending.extend(page);
        }

        let item = self.pending.pop_front();
        if item.is_some() {
            self.yielded += 1;
        }
        Ok(item)
    }

    /// Drain the lazy stream into a list
    pub async fn flatten(&mut self) -> Result<Vec<F::Item>> {
        self.stream().try_collect().await
    }

    /// A fresh paginator over the same source, limit and starting cursor
    #[must_use]
    pub fn restart(&self) -> Self
    where
        F: Clone,
    {
        Self {
            fetcher: self.fetcher.clone(),
            limit: self.limit,
            start: self.start,
            cursor: self.start,
            page_size: self.page_size,
            pages_fetched: 0,
            pending: VecDeque::new(),
            yielded: 0,
        }
    }
}

impl<F: PageFetcher + std::fmt::Debug> std::fmt::Debug for CursorPaginator<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CursorPaginator")
            .field("fetcher", &self.fetcher)
            .field("limit", &self.limit)
            .field("cursor", &self.cursor)
            .field("page_size", &self.page_size)
            .field("pages_fetched", &self.pages_fetched)
            .field("pending", &self.pending.len())
            .field("yielded", &self.yielded)
            .finish()
    }
}
