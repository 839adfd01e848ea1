//! History record models
//!
//! Typed records parsed from the history service. The service encodes most
//! numbers as strings and times as `YYYY-MM-DD HH:MM:SS`; the helpers here
//! accept both spellings.

mod transaction;
mod wish;

pub use transaction::{AnyTransaction, ItemTransaction, RawTransaction, Transaction, TransactionKind};
pub use wish::{BannerType, BannerTypeEntry, BannerTypeList, RawWish, Wish};

use crate::error::{Error, Result};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::fmt::Display;
use std::str::FromStr;

/// Wire format of record times
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Envelope wrapping every history service response
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    /// `0` on success
    pub retcode: i64,
    /// Human readable status
    #[serde(default)]
    pub message: String,
    /// Payload, absent on failure
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Unwrap the payload, turning a non-zero retcode into [`Error::Api`]
    pub fn into_result(self) -> Result<T> {
        if self.retcode != 0 {
            return Err(Error::api(self.retcode, self.message));
        }
        self.data
            .ok_or_else(|| Error::decode("response has retcode 0 but no data"))
    }
}

/// One page of raw records
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    /// Records, newest first
    #[serde(default = "Vec::new")]
    pub list: Vec<T>,
}

/// Deserialize an integer sent either as a number or as a string
pub(crate) fn int_or_string<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Deserialize<'de>,
    T::Err: Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString<T> {
        Int(T),
        String(String),
    }

    match IntOrString::<T>::deserialize(deserializer)? {
        IntOrString::Int(value) => Ok(value),
        IntOrString::String(s) => s.trim().parse().map_err(de::Error::custom),
    }
}

/// Deserialize a `YYYY-MM-DD HH:MM:SS` time
pub(crate) fn service_time<'de, D>(deserializer: D) -> std::result::Result<chrono::NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    chrono::NaiveDateTime::parse_from_str(&s, TIME_FORMAT).map_err(de::Error::custom)
}
