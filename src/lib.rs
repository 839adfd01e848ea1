// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # hoyo-history
//!
//! Cursor-paginated access to wish and transaction histories, with ordered
//! merging of several histories into one.
//!
//! ## Features
//!
//! - **Cursor Pagination**: Follows `end_id` cursors and detects the last page
//! - **Ordered Merge**: Lazily merges sorted histories, fetching only what is pulled
//! - **Eager Flatten**: Drains every history concurrently and merges offline
//! - **Lookup Priming**: Warms banner names and reason texts in the background
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hoyo_history::config::ClientConfig;
//! use hoyo_history::history::{merged_wish_history, HistoryClient};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> hoyo_history::Result<()> {
//!     let config = ClientConfig::default().apply_env();
//!     let client = Arc::new(HistoryClient::new(config)?);
//!
//!     let mut history = merged_wish_history(client, Some(50), 0);
//!     for wish in history.flatten(true).await? {
//!         println!("{} {}", wish.time, wish.name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  MergedPaginator                         │
//! │   stream() → ordered merge    flatten(lazy) → Vec<Item>  │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//! ┌────────────────┬───────────┴──────────┬──────────────────┐
//! │ CursorPaginator│    PageFetcher       │   HistoryClient  │
//! ├────────────────┼──────────────────────┼──────────────────┤
//! │ end_id cursor  │ WishFetcher          │ Envelope         │
//! │ Short page end │ TransactionFetcher   │ Retry/Rate Limit │
//! │ Limit          │                      │ Shared lookups   │
//! └────────────────┴──────────────────────┴──────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// HTTP client with retry and rate limiting
pub mod http;

/// Cursor pagination and ordered merging
pub mod pagination;

/// History record models
pub mod models;

/// Client configuration
pub mod config;

/// Wish and transaction history sources
pub mod history;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use pagination::{CursorPaginator, FlattenMode, MergedPaginator, PageFetcher};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
