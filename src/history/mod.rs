//! History sources
//!
//! Concrete fetchers for the wish and transaction history endpoints, and
//! builders wiring them into cursor and merged paginators.
//!
//! ```rust,ignore
//! use hoyo_history::history::{merged_wish_history, HistoryClient};
//!
//! let client = Arc::new(HistoryClient::new(config)?);
//! let mut history = merged_wish_history(client, Some(100), 0);
//! let wishes = history.flatten(true).await?;
//! ```

mod client;
mod primer;
mod transactions;
mod wishes;

pub use client::{BannerNames, HistoryClient, ReasonTexts};
pub use primer::{Lookup, LookupPrimer};
pub use transactions::{
    merged_transactions, transactions, MergedTransactions, TransactionFetcher, Transactions,
};
pub use wishes::{merged_wish_history, wish_history, MergedWishHistory, WishFetcher, WishHistory};

use chrono::NaiveDateTime;
use std::cmp::Reverse;

/// Merge key ordering records most recent first
pub type NewestFirst<T> = fn(&T) -> Reverse<NaiveDateTime>;
