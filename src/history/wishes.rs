//! Wish history sources

use super::client::HistoryClient;
use super::primer::{Lookup, LookupPrimer};
use super::NewestFirst;
use crate::error::Result;
use crate::http::RequestConfig;
use crate::models::{BannerType, Page, RawWish, Wish};
use crate::pagination::{CursorPaginator, MergedPaginator, PageFetcher};
use crate::types::ItemId;
use async_trait::async_trait;
use std::cmp::Reverse;
use std::sync::Arc;
use tracing::debug;

/// Wish history of a single banner
pub type WishHistory = CursorPaginator<WishFetcher>;

/// Wish history of every banner, most recent first
pub type MergedWishHistory = MergedPaginator<WishFetcher, NewestFirst<Wish>>;

/// Fetches pages of `getGachaLog` for one banner
#[derive(Debug, Clone)]
pub struct WishFetcher {
    client: Arc<HistoryClient>,
    banner: BannerType,
}

impl WishFetcher {
    /// Create a fetcher for `banner`
    pub fn new(client: Arc<HistoryClient>, banner: BannerType) -> Self {
        Self { client, banner }
    }

    /// Banner this fetcher reads
    pub fn banner(&self) -> BannerType {
        self.banner
    }
}

#[async_trait]
impl PageFetcher for WishFetcher {
    type Item = Wish;

    async fn fetch(&self, end_id: ItemId, page_size: usize) -> Result<Vec<Wish>> {
        let request = RequestConfig::new()
            .query("gacha_type", self.banner.gacha_type())
            .query("size", page_size)
            .query("end_id", end_id);

        let (page, names) = tokio::try_join!(
            self.client
                .request_gacha_info::<Page<RawWish>>("getGachaLog", request),
            self.client.banner_types(),
        )?;

        let banner_name = names
            .get(&self.banner.gacha_type())
            .cloned()
            .unwrap_or_default();
        if banner_name.is_empty() {
            debug!(banner = ?self.banner, "No configured name for banner");
        }

        Ok(page
            .list
            .into_iter()
            .map(|raw| raw.into_wish(banner_name.clone()))
            .collect())
    }
}

fn wish_time(wish: &Wish) -> Reverse<chrono::NaiveDateTime> {
    Reverse(wish.time)
}

/// Wish history of one banner, starting after `end_id` (`0` for the newest)
pub fn wish_history(
    client: Arc<HistoryClient>,
    banner: BannerType,
    limit: Option<usize>,
    end_id: ItemId,
) -> WishHistory {
    let page_size = client.page_size();
    CursorPaginator::new(WishFetcher::new(client, banner))
        .with_limit(limit)
        .with_end_id(end_id)
        .with_page_size(page_size)
}

/// Wish history of the novice, permanent, character and weapon banners.
///
/// Flattening warms the banner names in the background.
pub fn merged_wish_history(
    client: Arc<HistoryClient>,
    limit: Option<usize>,
    end_id: ItemId,
) -> MergedWishHistory {
    let paginators = BannerType::ALL
        .into_iter()
        .map(|banner| wish_history(Arc::clone(&client), banner, limit, end_id))
        .collect();
    let primer = LookupPrimer::new(client, Lookup::BannerTypes);

    MergedPaginator::new(paginators, wish_time as NewestFirst<Wish>)
        .with_limit(limit)
        .with_primer(Arc::new(primer))
}
