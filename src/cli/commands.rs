//! CLI commands and argument parsing

use crate::models::{BannerType, TransactionKind};
use crate::types::ItemId;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Wish and transaction history CLI
#[derive(Parser, Debug)]
#[command(name = "hoyo-history")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Authkey from the in-game history page (overrides config and HOYO_AUTHKEY)
    #[arg(long, global = true)]
    pub authkey: Option<String>,

    /// Language for names and reasons (overrides config and HOYO_LANG)
    #[arg(long, global = true)]
    pub lang: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print wish history, merged over every banner unless one is given
    Wishes {
        /// Banner name or gacha type (novice, permanent, character, weapon)
        #[arg(short, long)]
        banner: Option<BannerType>,

        /// Maximum number of wishes
        #[arg(short, long)]
        limit: Option<usize>,

        /// Merge lazily, fetching only the pages the limit needs
        #[arg(long)]
        lazy: bool,

        /// Start after this wish id
        #[arg(long, default_value = "0")]
        end_id: ItemId,
    },

    /// Print currency and item transactions, merged over every log unless one is given
    Transactions {
        /// Log to read (primogem, crystal, resin, artifact, weapon)
        #[arg(short, long)]
        kind: Option<TransactionKind>,

        /// Maximum number of transactions
        #[arg(short, long)]
        limit: Option<usize>,

        /// Merge lazily, fetching only the pages the limit needs
        #[arg(long)]
        lazy: bool,

        /// Start after this transaction id
        #[arg(long, default_value = "0")]
        end_id: ItemId,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one record per line)
    Json,
    /// Human-readable output
    Pretty,
}
