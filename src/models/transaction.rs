//! Currency and item transaction records

use super::{int_or_string, service_time};
use crate::error::{Error, Result};
use crate::pagination::Identified;
use crate::types::ItemId;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Transaction log a record comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Primogem,
    Crystal,
    Resin,
    Artifact,
    Weapon,
}

impl TransactionKind {
    /// Every log, in the order merged histories register them
    pub const ALL: [TransactionKind; 5] = [
        TransactionKind::Primogem,
        TransactionKind::Crystal,
        TransactionKind::Resin,
        TransactionKind::Artifact,
        TransactionKind::Weapon,
    ];

    /// Lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primogem => "primogem",
            Self::Crystal => "crystal",
            Self::Resin => "resin",
            Self::Artifact => "artifact",
            Self::Weapon => "weapon",
        }
    }

    /// Endpoint serving this log, e.g. `getPrimogemLog`
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Primogem => "getPrimogemLog",
            Self::Crystal => "getCrystalLog",
            Self::Resin => "getResinLog",
            Self::Artifact => "getArtifactLog",
            Self::Weapon => "getWeaponLog",
        }
    }

    /// Whether records of this log describe an item rather than currency
    pub fn has_items(self) -> bool {
        matches!(self, Self::Artifact | Self::Weapon)
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown transaction kind: {s}"))
    }
}

/// Transaction record as sent by the service
#[derive(Debug, Clone, Deserialize)]
pub struct RawTransaction {
    #[serde(deserialize_with = "int_or_string")]
    pub id: ItemId,
    #[serde(deserialize_with = "int_or_string")]
    pub uid: i64,
    #[serde(deserialize_with = "service_time")]
    pub time: NaiveDateTime,
    #[serde(deserialize_with = "int_or_string")]
    pub add_num: i64,
    #[serde(deserialize_with = "int_or_string")]
    pub reason: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "optional_rank")]
    pub rank: Option<u8>,
}

fn optional_rank<'de, D>(deserializer: D) -> std::result::Result<Option<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Rank(#[serde(deserialize_with = "int_or_string")] u8);

    Option::<Rank>::deserialize(deserializer).map(|rank| rank.map(|Rank(rank)| rank))
}

impl RawTransaction {
    /// Build the typed record for `kind`, attaching the reason text.
    ///
    /// Item logs must carry a name and rank; a missing or null one is a
    /// decode error.
    pub fn into_transaction(self, kind: TransactionKind, reason: &str) -> Result<AnyTransaction> {
        let base = Transaction {
            kind,
            id: self.id,
            uid: self.uid,
            time: self.time,
            amount: self.add_num,
            reason_id: self.reason,
            reason: reason.to_string(),
        };

        if !kind.has_items() {
            return Ok(AnyTransaction::Currency(base));
        }

        let name = self
            .name
            .ok_or_else(|| Error::decode(format!("{kind} transaction {} has no name", self.id)))?;
        let rarity = self
            .rank
            .ok_or_else(|| Error::decode(format!("{kind} transaction {} has no rank", self.id)))?;
        Ok(AnyTransaction::Item(ItemTransaction {
            transaction: base,
            name,
            rarity,
        }))
    }
}

/// A currency transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub kind: TransactionKind,
    pub id: ItemId,
    pub uid: i64,
    pub time: NaiveDateTime,
    /// Signed change in the balance
    pub amount: i64,
    pub reason_id: i64,
    /// Reason text, empty when unknown
    pub reason: String,
}

/// A transaction that gained or consumed an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub name: String,
    pub rarity: u8,
}

/// Either kind of transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnyTransaction {
    Currency(Transaction),
    Item(ItemTransaction),
}

impl AnyTransaction {
    /// Common transaction fields
    pub fn transaction(&self) -> &Transaction {
        match self {
            Self::Currency(t) => t,
            Self::Item(t) => &t.transaction,
        }
    }

    /// Time the transaction happened
    pub fn time(&self) -> NaiveDateTime {
        self.transaction().time
    }

    /// Log the transaction comes from
    pub fn kind(&self) -> TransactionKind {
        self.transaction().kind
    }
}

impl Identified for AnyTransaction {
    fn id(&self) -> ItemId {
        self.transaction().id
    }
}
