//! History service client
//!
//! Speaks the `{retcode, message, data}` envelope on top of [`HttpClient`]
//! and owns the lookup tables shared by every fetcher built from it.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::models::{ApiResponse, BannerTypeList};
use crate::pagination::{SharedLookup, PAGE_SIZE};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::{debug, warn};
use url::Url;

/// Banner `gacha_type` to display name
pub type BannerNames = HashMap<i32, String>;

/// Transaction reason id to display text
pub type ReasonTexts = HashMap<i64, String>;

/// Authenticated client for the wish and transaction history APIs
pub struct HistoryClient {
    http: HttpClient,
    config: ClientConfig,
    authkey: String,
    gacha_base: Url,
    transaction_base: Url,
    banner_names: SharedLookup<BannerNames>,
    reason_texts: SharedLookup<ReasonTexts>,
}

impl HistoryClient {
    /// Create a client, building the HTTP layer from `config.http`
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = HttpClient::with_config(config.http.to_client_config())?;
        Self::with_http(config, http)
    }

    /// Create a client on top of an existing HTTP client
    pub fn with_http(config: ClientConfig, http: HttpClient) -> Result<Self> {
        config.validate()?;
        let authkey = config.require_authkey()?.to_string();
        let gacha_base = Url::parse(&config.gacha_base_url)?;
        let transaction_base = Url::parse(&config.transaction_base_url)?;

        Ok(Self {
            http,
            config,
            authkey,
            gacha_base,
            transaction_base,
            banner_names: SharedLookup::new(),
            reason_texts: SharedLookup::new(),
        })
    }

    /// The active configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Language requested for names and reasons
    pub fn lang(&self) -> &str {
        &self.config.lang
    }

    /// Full-page size of the history endpoints
    pub fn page_size(&self) -> usize {
        self.config.http.page_size.unwrap_or(PAGE_SIZE)
    }

    /// Call a wish history endpoint and unwrap its payload
    pub async fn request_gacha_info<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestConfig,
    ) -> Result<T> {
        let url = self.gacha_base.join(endpoint)?;
        self.request(url, request).await
    }

    /// Call a transaction log endpoint and unwrap its payload
    pub async fn request_transaction<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestConfig,
    ) -> Result<T> {
        let url = self.transaction_base.join(endpoint)?;
        self.request(url, request).await
    }

    async fn request<T: DeserializeOwned>(&self, url: Url, request: RequestConfig) -> Result<T> {
        let request = request
            .query("authkey", &self.authkey)
            .query("authkey_ver", 1)
            .query("lang", &self.config.lang);

        debug!(url = %url, "History request");
        let response: ApiResponse<T> = self.http.get_json(url.as_str(), &request).await?;
        response.into_result().inspect_err(|e| {
            if e.is_auth_error() {
                warn!(url = %url, "Authkey rejected by the history service");
            }
        })
    }

    /// Banner names, fetched once and shared
    pub async fn banner_types(&self) -> Result<&BannerNames> {
        self.banner_names
            .get_or_try_init(|| async {
                let list: BannerTypeList = self
                    .request_gacha_info("getConfigList", RequestConfig::new())
                    .await?;
                debug!(banners = list.gacha_type_list.len(), "Loaded banner names");
                let names: BannerNames = list
                    .gacha_type_list
                    .into_iter()
                    .map(|entry| (entry.key, entry.name))
                    .collect();
                Ok::<_, Error>(names)
            })
            .await
    }

    /// Transaction reason texts, fetched once and shared.
    ///
    /// Without a configured reasons URL the table is empty and reasons are
    /// left blank.
    pub async fn transaction_reasons(&self) -> Result<&ReasonTexts> {
        self.reason_texts
            .get_or_try_init(|| async {
                let Some(url) = &self.config.transaction_reasons_url else {
                    return Ok::<_, Error>(ReasonTexts::new());
                };

                let request = RequestConfig::new().query("lang", &self.config.lang);
                let raw: HashMap<String, String> = self.http.get_json(url, &request).await?;

                let mut reasons = ReasonTexts::with_capacity(raw.len());
                for (id, text) in raw {
                    let id = id
                        .trim()
                        .parse()
                        .map_err(|_| Error::decode(format!("invalid reason id: {id}")))?;
                    reasons.insert(id, text);
                }
                debug!(reasons = reasons.len(), "Loaded transaction reasons");
                Ok(reasons)
            })
            .await
    }

    /// Check if the banner names are cached
    pub fn has_banner_types(&self) -> bool {
        self.banner_names.is_ready()
    }

    /// Check if the transaction reasons are cached
    pub fn has_transaction_reasons(&self) -> bool {
        self.reason_texts.is_ready()
    }
}

impl std::fmt::Debug for HistoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryClient")
            .field("lang", &self.config.lang)
            .field("gacha_base", &self.gacha_base.as_str())
            .field("transaction_base", &self.transaction_base.as_str())
            .field("has_banner_types", &self.has_banner_types())
            .field("has_transaction_reasons", &self.has_transaction_reasons())
            .finish_non_exhaustive()
    }
}
