//! Pagination types and traits
//!
//! Defines the cursor state, the fetch contract and the item contract shared
//! by every paginator.

use crate::error::Result;
use crate::types::ItemId;
use async_trait::async_trait;

/// Number of items the history service returns for a full page.
///
/// A page shorter than this is the final page of its source.
pub const PAGE_SIZE: usize = 20;

/// Position of a paginator within its source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    /// Nothing fetched yet; the service is asked for its newest page
    #[default]
    Start,
    /// Fetch the page that comes after this id
    After(ItemId),
    /// Terminal state, no further fetch will be made
    Exhausted,
}

impl Cursor {
    /// Build a cursor from a raw `end_id`, where `0` means "from the start"
    pub fn from_end_id(end_id: ItemId) -> Self {
        if end_id == 0 {
            Self::Start
        } else {
            Self::After(end_id)
        }
    }

    /// The raw `end_id` to send to the service, `None` once exhausted
    pub fn end_id(&self) -> Option<ItemId> {
        match self {
            Self::Start => Some(0),
            Self::After(id) => Some(*id),
            Self::Exhausted => None,
        }
    }

    /// Check if this is the terminal state
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }
}

/// A record that carries the identifier used as the next cursor
pub trait Identified {
    /// Unique id of the record
    fn id(&self) -> ItemId;
}

/// Fetch contract for one cursor-paginated source.
///
/// Implementations return the page that comes after `end_id` (`0` for the
/// newest page), already parsed into typed items. Returning fewer than
/// `page_size` items signals the end of the source. Errors are propagated
/// to the paginator's caller untouched.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Typed record produced by this source
    type Item: Identified + Send;

    /// Fetch one page
    async fn fetch(&self, end_id: ItemId, page_size: usize) -> Result<Vec<Self::Item>>;
}

/// How a merged paginator materializes its output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlattenMode {
    /// Merge as items are pulled; only fetches the pages the limit needs
    Lazy,
    /// Drain every source concurrently, then merge offline
    #[default]
    Eager,
}

impl FlattenMode {
    /// Map the `lazy` flag onto a mode
    pub fn from_lazy(lazy: bool) -> Self {
        if lazy {
            Self::Lazy
        } else {
            Self::Eager
        }
    }

    /// Check if this is lazy mode
    pub fn is_lazy(&self) -> bool {
        matches!(self, Self::Lazy)
    }
}
