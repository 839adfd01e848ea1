//! Transaction log sources

use super::client::HistoryClient;
use super::primer::{Lookup, LookupPrimer};
use super::NewestFirst;
use crate::error::Result;
use crate::http::RequestConfig;
use crate::models::{AnyTransaction, Page, RawTransaction, TransactionKind};
use crate::pagination::{CursorPaginator, MergedPaginator, PageFetcher};
use crate::types::ItemId;
use async_trait::async_trait;
use std::cmp::Reverse;
use std::sync::Arc;

/// Transactions of a single log
pub type Transactions = CursorPaginator<TransactionFetcher>;

/// Transactions of every log, most recent first
pub type MergedTransactions = MergedPaginator<TransactionFetcher, NewestFirst<AnyTransaction>>;

/// Fetches pages of `get<Kind>Log`
#[derive(Debug, Clone)]
pub struct TransactionFetcher {
    client: Arc<HistoryClient>,
    kind: TransactionKind,
}

impl TransactionFetcher {
    /// Create a fetcher for the `kind` log
    pub fn new(client: Arc<HistoryClient>, kind: TransactionKind) -> Self {
        Self { client, kind }
    }

    /// Log this fetcher reads
    pub fn kind(&self) -> TransactionKind {
        self.kind
    }
}

#[async_trait]
impl PageFetcher for TransactionFetcher {
    type Item = AnyTransaction;

    async fn fetch(&self, end_id: ItemId, page_size: usize) -> Result<Vec<AnyTransaction>> {
        let request = RequestConfig::new()
            .query("end_id", end_id)
            .query("size", page_size);

        let (page, reasons) = tokio::try_join!(
            self.client
                .request_transaction::<Page<RawTransaction>>(self.kind.endpoint(), request),
            self.client.transaction_reasons(),
        )?;

        page.list
            .into_iter()
            .map(|raw| {
                let reason = reasons.get(&raw.reason).map_or("", String::as_str);
                raw.into_transaction(self.kind, reason)
            })
            .collect()
    }
}

fn transaction_time(transaction: &AnyTransaction) -> Reverse<chrono::NaiveDateTime> {
    Reverse(transaction.time())
}

/// Transactions of one log, starting after `end_id` (`0` for the newest)
pub fn transactions(
    client: Arc<HistoryClient>,
    kind: TransactionKind,
    limit: Option<usize>,
    end_id: ItemId,
) -> Transactions {
    let page_size = client.page_size();
    CursorPaginator::new(TransactionFetcher::new(client, kind))
        .with_limit(limit)
        .with_end_id(end_id)
        .with_page_size(page_size)
}

/// Transactions of the primogem, crystal, resin, artifact and weapon logs.
///
/// Flattening warms the reason texts in the background.
pub fn merged_transactions(
    client: Arc<HistoryClient>,
    limit: Option<usize>,
    end_id: ItemId,
) -> MergedTransactions {
    let paginators = TransactionKind::ALL
        .into_iter()
        .map(|kind| transactions(Arc::clone(&client), kind, limit, end_id))
        .collect();
    let primer = LookupPrimer::new(client, Lookup::TransactionReasons);

    MergedPaginator::new(paginators, transaction_time as NewestFirst<AnyTransaction>)
        .with_limit(limit)
        .with_primer(Arc::new(primer))
}
