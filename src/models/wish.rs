//! Wish (gacha pull) records

use super::{int_or_string, service_time};
use crate::pagination::Identified;
use crate::types::ItemId;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Banner a wish was made on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerType {
    /// Beginner banner
    Novice,
    /// Standard banner
    Permanent,
    /// Character event banner
    Character,
    /// Weapon event banner
    Weapon,
}

impl BannerType {
    /// Every banner, in the order merged histories register them
    pub const ALL: [BannerType; 4] = [
        BannerType::Novice,
        BannerType::Permanent,
        BannerType::Character,
        BannerType::Weapon,
    ];

    /// Numeric `gacha_type` used by the service
    pub fn gacha_type(self) -> i32 {
        match self {
            Self::Novice => 100,
            Self::Permanent => 200,
            Self::Character => 301,
            Self::Weapon => 302,
        }
    }

    /// Look up a banner from its `gacha_type`
    pub fn from_gacha_type(gacha_type: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.gacha_type() == gacha_type)
    }
}

impl std::str::FromStr for BannerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "novice" | "100" => Ok(Self::Novice),
            "permanent" | "standard" | "200" => Ok(Self::Permanent),
            "character" | "301" => Ok(Self::Character),
            "weapon" | "302" => Ok(Self::Weapon),
            other => Err(format!("unknown banner: {other}")),
        }
    }
}

/// Wish record as sent by the service
#[derive(Debug, Clone, Deserialize)]
pub struct RawWish {
    #[serde(deserialize_with = "int_or_string")]
    pub uid: i64,
    #[serde(deserialize_with = "int_or_string")]
    pub id: ItemId,
    #[serde(deserialize_with = "int_or_string")]
    pub gacha_type: i32,
    pub item_type: String,
    pub name: String,
    #[serde(deserialize_with = "int_or_string")]
    pub rank_type: u8,
    #[serde(deserialize_with = "service_time")]
    pub time: NaiveDateTime,
}

impl RawWish {
    /// Attach the banner name resolved from the banner lookup
    pub fn into_wish(self, banner_name: impl Into<String>) -> Wish {
        Wish {
            uid: self.uid,
            id: self.id,
            kind: self.item_type,
            name: self.name,
            rarity: self.rank_type,
            time: self.time,
            banner_type: self.gacha_type,
            banner_name: banner_name.into(),
        }
    }
}

/// A single wish
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Wish {
    pub uid: i64,
    pub id: ItemId,
    /// Character or Weapon
    pub kind: String,
    pub name: String,
    pub rarity: u8,
    pub time: NaiveDateTime,
    pub banner_type: i32,
    pub banner_name: String,
}

impl Identified for Wish {
    fn id(&self) -> ItemId {
        self.id
    }
}

/// Payload of the banner configuration endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct BannerTypeList {
    pub gacha_type_list: Vec<BannerTypeEntry>,
}

/// One configured banner
#[derive(Debug, Clone, Deserialize)]
pub struct BannerTypeEntry {
    #[serde(deserialize_with = "int_or_string")]
    pub key: i32,
    pub name: String,
}
