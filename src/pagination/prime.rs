//! Lookup priming
//!
//! Some sources enrich every item with data from a lookup table (banner
//! names, transaction reasons). A merged paginator can warm that table in
//! the background while its first pages are being fetched; the fetchers then
//! await the same shared cell instead of issuing their own request.

use crate::error::Result;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Background warm-up run before a merged flatten
#[async_trait]
pub trait Primer: Send + Sync {
    /// Compute and cache the lookup. Safe to call any number of times.
    async fn prime(&self) -> Result<()>;
}

/// A lazily computed value shared between concurrent awaiters.
///
/// Concurrent callers share one in-flight computation. A failed computation
/// leaves the cell empty so the next caller tries again.
#[derive(Debug)]
pub struct SharedLookup<V> {
    cell: Arc<OnceCell<V>>,
}

impl<V> Clone for SharedLookup<V> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<V> Default for SharedLookup<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> SharedLookup<V> {
    /// Create an empty lookup
    pub fn new() -> Self {
        Self {
            cell: Arc::new(OnceCell::new()),
        }
    }

    /// The cached value, if already computed
    pub fn get(&self) -> Option<&V> {
        self.cell.get()
    }

    /// Check if the value has been computed
    pub fn is_ready(&self) -> bool {
        self.cell.initialized()
    }

    /// Return the cached value or compute it with `init`
    pub async fn get_or_try_init<F, Fut>(&self, init: F) -> Result<&V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        self.cell.get_or_try_init(init).await
    }
}
