//! Pagination module
//!
//! Cursor pagination over `end_id` histories and ordered merging of several
//! such histories.
//!
//! # Overview
//!
//! - [`CursorPaginator`] walks one source page by page and detects the end
//!   of the source from a short page.
//! - [`ordered_merge`] lazily merges sorted streams by a key, pulling from
//!   each source only as far as needed.
//! - [`MergedPaginator`] combines several cursor paginators, either merging
//!   lazily as items are pulled or draining every source concurrently and
//!   merging offline.

mod cursor;
mod itertools;
mod merge;
mod merged;
mod prime;
mod types;

pub use cursor::CursorPaginator;
pub use itertools::{enumerate_from, limited};
pub use merge::{merge_sorted, ordered_merge, OrderedMerge};
pub use merged::MergedPaginator;
pub use prime::{Primer, SharedLookup};
pub use types::{Cursor, FlattenMode, Identified, PageFetcher, PAGE_SIZE};
