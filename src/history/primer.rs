//! Lookup warm-up for merged histories

use super::client::HistoryClient;
use crate::error::Result;
use crate::pagination::Primer;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Lookup table a merged history depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Banner names used by wish records
    BannerTypes,
    /// Reason texts used by transaction records
    TransactionReasons,
}

/// Warms one of the client's shared lookups
#[derive(Debug, Clone)]
pub struct LookupPrimer {
    client: Arc<HistoryClient>,
    lookup: Lookup,
}

impl LookupPrimer {
    /// Create a primer for `lookup`
    pub fn new(client: Arc<HistoryClient>, lookup: Lookup) -> Self {
        Self { client, lookup }
    }

    /// Which lookup this primer warms
    pub fn lookup(&self) -> Lookup {
        self.lookup
    }
}

#[async_trait]
impl Primer for LookupPrimer {
    async fn prime(&self) -> Result<()> {
        debug!(lookup = ?self.lookup, "Priming lookup");
        match self.lookup {
            Lookup::BannerTypes => self.client.banner_types().await.map(|_| ()),
            Lookup::TransactionReasons => self.client.transaction_reasons().await.map(|_| ()),
        }
    }
}
