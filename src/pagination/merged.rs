//! Merged paginator
//!
//! Presents several cursor paginators, one per sub-history, as one history
//! ordered by a caller-supplied key.

use super::cursor::CursorPaginator;
use super::itertools::limited;
use super::merge::{merge_sorted, ordered_merge};
use super::prime::Primer;
use super::types::{FlattenMode, PageFetcher};
use crate::error::Result;
use futures::future::try_join_all;
use futures::stream::{Stream, StreamExt, TryStreamExt};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Paginator merging several sorted sub-histories by `key`.
///
/// Each child must already yield items in ascending key order. For a
/// most-recent-first history the key is typically `Reverse(time)`. The
/// overall limit counts every item the instance yields, whichever stream
/// or flatten call produced it.
pub struct MergedPaginator<F: PageFetcher, K> {
    paginators: Vec<CursorPaginator<F>>,
    key: K,
    limit: Option<usize>,
    yielded: usize,
    primer: Option<Arc<dyn Primer>>,
}

impl<F, K, O> MergedPaginator<F, K>
where
    F: PageFetcher,
    K: Fn(&F::Item) -> O + Send + Sync,
    O: Ord + Send,
{
    /// Create an unlimited merged paginator over `paginators`
    pub fn new(paginators: Vec<CursorPaginator<F>>, key: K) -> Self {
        Self {
            paginators,
            key,
            limit: None,
            yielded: 0,
            primer: None,
        }
    }

    /// Cap the number of items yielded overall
    #[must_use]
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Warm a shared lookup in the background at the start of every flatten
    #[must_use]
    pub fn with_primer(mut self, primer: Arc<dyn Primer>) -> Self {
        self.primer = Some(primer);
        self
    }

    /// Overall item limit
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Items yielded so far across every stream and flatten
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    /// Items the overall limit still allows, `None` when unlimited
    pub fn remaining(&self) -> Option<usize> {
        self.limit.map(|limit| limit.saturating_sub(self.yielded))
    }

    /// Child paginators in registration order
    pub fn paginators(&self) -> &[CursorPaginator<F>] {
        &self.paginators
    }

    /// True once every child is exhausted
    pub fn is_exhausted(&self) -> bool {
        self.paginators.iter().all(CursorPaginator::is_exhausted)
    }

    /// Lazily merge all children, capped at the overall limit.
    ///
    /// Each child is only advanced when its pending item has been yielded.
    /// Heads already pulled from the children are lost if the stream is
    /// dropped before the limit or the end of every child is reached.
    pub fn stream<'a>(&'a mut self) -> impl Stream<Item = Result<F::Item>> + Send + 'a
    where
        O: 'a,
    {
        let remaining = self.remaining();
        let Self {
            paginators,
            key,
            yielded,
            ..
        } = self;

        let sources = paginators
            .iter_mut()
            .map(|paginator| paginator.stream().boxed())
            .collect();
        limited(ordered_merge(sources, &*key), remaining).inspect_ok(move |_| *yielded += 1)
    }

    /// Spawn the lookup warm-up, if any.
    ///
    /// The returned handle is never awaited by the paginator; a failed
    /// warm-up is logged and the fetchers compute the lookup themselves.
    ///
    /// # Panics
    ///
    /// Panics when a primer is set and this is called outside a Tokio
    /// runtime.
    pub fn prime(&self) -> Option<JoinHandle<()>> {
        let primer = Arc::clone(self.primer.as_ref()?);
        Some(tokio::spawn(async move {
            if let Err(e) = primer.prime().await {
                warn!(error = %e, "Lookup warm-up failed, fetchers will retry");
            }
        }))
    }

    /// Collect the merged history; `lazy` selects [`FlattenMode::Lazy`]
    ///
    /// # Panics
    ///
    /// Panics when a primer is set and this is called outside a Tokio
    /// runtime, see [`prime`](Self::prime).
    pub async fn flatten(&mut self, lazy: bool) -> Result<Vec<F::Item>> {
        self.flatten_with(FlattenMode::from_lazy(lazy)).await
    }

    /// Collect the merged history in the given mode.
    ///
    /// Eager mode drains every child concurrently and fails as soon as any
    /// child fails; no partial merge is returned. Its merged output is
    /// truncated to what the overall limit has left.
    ///
    /// # Panics
    ///
    /// Panics when a primer is set and this is called outside a Tokio
    /// runtime, see [`prime`](Self::prime).
    pub async fn flatten_with(&mut self, mode: FlattenMode) -> Result<Vec<F::Item>> {
        let remaining = self.remaining();
        if remaining == Some(0) {
            debug!(yielded = self.yielded, "Merged history limit already reached");
            return Ok(Vec::new());
        }

        let _warm_up = self.prime();
        debug!(
            sources = self.paginators.len(),
            ?remaining,
            ?mode,
            "Flattening merged history"
        );

        match mode {
            FlattenMode::Lazy => self.stream().try_collect().await,
            FlattenMode::Eager => {
                let drains = self.paginators.iter_mut().map(|p| p.flatten());
                let lists = try_join_all(drains).await?;

                let mut merged = merge_sorted(lists, &self.key);
                if let Some(remaining) = remaining {
                    merged.truncate(remaining);
                }
                self.yielded += merged.len();
                Ok(merged)
            }
        }
    }
}

impl<F: PageFetcher, K> std::fmt::Debug for MergedPaginator<F, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MergedPaginator")
            .field("sources", &self.paginators.len())
            .field("limit", &self.limit)
            .field("yielded", &self.yielded)
            .field("has_primer", &self.primer.is_some())
            .finish_non_exhaustive()
    }
}
