//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::history::{
    merged_transactions, merged_wish_history, transactions, wish_history, HistoryClient,
};
use crate::models::{AnyTransaction, BannerType, TransactionKind, Wish};
use crate::pagination::{enumerate_from, FlattenMode, MergedPaginator, PageFetcher};
use crate::types::ItemId;
use futures::{Stream, StreamExt};
use serde::Serialize;
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info};

/// Records the runner knows how to print in pretty mode
trait PrettyLine {
    fn pretty_line(&self) -> String;
}

impl PrettyLine for Wish {
    fn pretty_line(&self) -> String {
        format!(
            "{}  {}*  {:<10} {:<32} {}",
            self.time, self.rarity, self.kind, self.name, self.banner_name
        )
    }
}

impl PrettyLine for AnyTransaction {
    fn pretty_line(&self) -> String {
        let t = self.transaction();
        let subject = match self {
            AnyTransaction::Currency(_) => String::new(),
            AnyTransaction::Item(item) => format!("{} ({}*)", item.name, item.rarity),
        };
        format!(
            "{}  {:<9} {:>+6}  {:<32} {}",
            t.time,
            t.kind.as_str(),
            t.amount,
            subject,
            t.reason
        )
    }
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Wishes {
                banner,
                limit,
                lazy,
                end_id,
            } => self.wishes(*banner, *limit, *lazy, *end_id).await,
            Commands::Transactions {
                kind,
                limit,
                lazy,
                end_id,
            } => self.transactions(*kind, *limit, *lazy, *end_id).await,
        }
    }

    /// Load configuration: file (or defaults), then environment, then flags
    fn load_config(&self) -> Result<ClientConfig> {
        let config = match &self.cli.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::default(),
        };
        Ok(config
            .apply_env()
            .apply_overrides(self.cli.authkey.clone(), self.cli.lang.clone()))
    }

    fn client(&self) -> Result<Arc<HistoryClient>> {
        let config = self.load_config()?;
        info!(lang = %config.lang, "Connecting to history service");
        Ok(Arc::new(HistoryClient::new(config)?))
    }

    /// Print wish history
    async fn wishes(
        &self,
        banner: Option<BannerType>,
        limit: Option<usize>,
        lazy: bool,
        end_id: ItemId,
    ) -> Result<()> {
        let client = self.client()?;
        match banner {
            Some(banner) => {
                let mut history = wish_history(client, banner, limit, end_id);
                self.output_stream(history.stream()).await
            }
            None => {
                let mut history = merged_wish_history(client, limit, end_id);
                self.output_merged(&mut history, FlattenMode::from_lazy(lazy))
                    .await
            }
        }
    }

    /// Print transactions
    async fn transactions(
        &self,
        kind: Option<TransactionKind>,
        limit: Option<usize>,
        lazy: bool,
        end_id: ItemId,
    ) -> Result<()> {
        let client = self.client()?;
        match kind {
            Some(kind) => {
                let mut log = transactions(client, kind, limit, end_id);
                self.output_stream(log.stream()).await
            }
            None => {
                let mut log = merged_transactions(client, limit, end_id);
                self.output_merged(&mut log, FlattenMode::from_lazy(lazy))
                    .await
            }
        }
    }

    /// Print a merged history; lazy mode prints records as they are merged
    async fn output_merged<F, K, O>(
        &self,
        history: &mut MergedPaginator<F, K>,
        mode: FlattenMode,
    ) -> Result<()>
    where
        F: PageFetcher,
        F::Item: Serialize + PrettyLine,
        K: Fn(&F::Item) -> O + Send + Sync,
        O: Ord + Send + 'static,
    {
        if mode.is_lazy() {
            let _warm_up = history.prime();
            return self.output_stream(history.stream()).await;
        }

        let records = history.flatten_with(mode).await?;
        debug!(records = records.len(), "Merged history collected");
        let mut stdout = std::io::stdout().lock();
        for (index, record) in records.iter().enumerate() {
            self.output_record(&mut stdout, index + 1, record)?;
        }
        Ok(())
    }

    /// Print records as the stream yields them
    async fn output_stream<T, S>(&self, records: S) -> Result<()>
    where
        T: Serialize + PrettyLine,
        S: Stream<Item = Result<T>>,
    {
        let mut records = std::pin::pin!(enumerate_from(records, 1));
        let mut printed = 0;
        while let Some((index, record)) = records.next().await {
            let record = record?;
            self.output_record(&mut std::io::stdout().lock(), index, &record)?;
            printed = index;
        }
        debug!(records = printed, "History printed");
        Ok(())
    }

    /// Output a record
    fn output_record<T: Serialize + PrettyLine>(
        &self,
        out: &mut impl Write,
        index: usize,
        record: &T,
    ) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(record)?)?,
            OutputFormat::Pretty => writeln!(out, "{index:>5}  {}", record.pretty_line())?,
        }
        Ok(())
    }
}
