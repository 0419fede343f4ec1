use crate::limit::{self, RateLimiter};
use bravepipe_core::{
    DescriptionsData, Error, PoisData, Result, SearchApi, WebSearchData,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use url::Url;

/// Docs: https://api.search.brave.com/app/documentation/web-search
pub const DEFAULT_ENDPOINT: &str = "https://api.search.brave.com/res/v1/";

/// Hard upper bound the API accepts for `count`.
const MAX_COUNT: i64 = 20;
/// Inclusive `offset` range accepted by the API.
const MAX_OFFSET: i64 = 9;
/// Error-detail strings are cut at this many chars before the ellipsis.
const DETAIL_MAX_CHARS: usize = 200;

pub fn api_key_from_env() -> Option<String> {
    std::env::var("BRAVEPIPE_API_KEY")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| {
            std::env::var("BRAVE_API_KEY")
                .ok()
                .filter(|v| !v.trim().is_empty())
        })
}

fn endpoint_from_env() -> Option<String> {
    std::env::var("BRAVEPIPE_API_ENDPOINT")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Truncate an upstream error detail to a bounded prefix.
///
/// The ellipsis is appended unconditionally, even when nothing was cut;
/// callers and tests depend on the exact rendered text.
fn truncate_detail(s: &str) -> String {
    let cut: String = s.chars().take(DETAIL_MAX_CHARS).collect();
    format!("{cut}...")
}

/// Client for the Brave Search REST API.
///
/// Every request is admitted by the injected [`RateLimiter`] first, keyed by
/// the last two path segments of the target URL; a rejection never reaches
/// the network.
#[derive(Debug, Clone)]
pub struct BraveClient {
    http: reqwest::Client,
    base: Url,
    api_key: String,
    limiter: Arc<RateLimiter>,
}

impl BraveClient {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        api_key: String,
        limiter: Arc<RateLimiter>,
    ) -> Result<Self> {
        // Url::join drops the last segment unless the base ends with '/'.
        let mut base = base_url.trim().trim_end_matches('/').to_string();
        base.push('/');
        let base = Url::parse(&base)
            .map_err(|e| Error::NotConfigured(format!("invalid API endpoint {base:?}: {e}")))?;
        Ok(Self {
            http,
            base,
            api_key,
            limiter,
        })
    }

    /// Build a client from the environment: `BRAVEPIPE_API_KEY` (or
    /// `BRAVE_API_KEY`), with `BRAVEPIPE_API_ENDPOINT` overriding the base
    /// URL for fixtures.
    pub fn from_env(http: reqwest::Client, limiter: Arc<RateLimiter>) -> Result<Self> {
        let api_key = api_key_from_env().ok_or_else(|| {
            Error::NotConfigured("missing BRAVEPIPE_API_KEY (or BRAVE_API_KEY)".to_string())
        })?;
        let base = endpoint_from_env().unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        Self::new(http, &base, api_key, limiter)
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        pairs: &[(&str, String)],
    ) -> Result<T> {
        let url = self
            .base
            .join(path)
            .map_err(|e| Error::Internal(format!("invalid endpoint path {path:?}: {e}")))?;
        self.limiter.check(&limit::endpoint_id(&url), now_ms())?;

        // Accept-Encoding: gzip is supplied by reqwest's gzip feature, which
        // also owns the transparent decompression; setting the header by hand
        // would disable that.
        let resp = self
            .http
            .get(url)
            .query(pairs)
            .header(reqwest::header::ACCEPT, "application/json")
            .header("X-Subscription-Token", &self.api_key)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let reason = status.canonical_reason().unwrap_or("Unknown");
            return Err(Error::Api {
                status: status.as_u16(),
                detail: truncate_detail(&format!("{reason}: {body}")),
            });
        }

        resp.json::<T>().await.map_err(|e| Error::Network(e.to_string()))
    }

    fn ids_pairs(ids: &[String]) -> Vec<(&'static str, String)> {
        ids.iter()
            .filter(|id| !id.trim().is_empty())
            .map(|id| ("ids", id.clone()))
            .collect()
    }
}

#[async_trait::async_trait]
impl SearchApi for BraveClient {
    async fn web_search(
        &self,
        query: &str,
        count: Option<i64>,
        offset: Option<i64>,
    ) -> Result<WebSearchData> {
        let mut pairs: Vec<(&str, String)> = vec![("q", query.to_string())];
        if let Some(n) = count {
            // Upper clamp only; the API rejects counts above 20.
            pairs.push(("count", n.min(MAX_COUNT).to_string()));
        }
        if let Some(n) = offset {
            pairs.push(("offset", n.clamp(0, MAX_OFFSET).to_string()));
        }
        pairs.push(("result_filter", "web".to_string()));
        self.get_json("web/search", &pairs).await
    }

    async fn location_search(&self, query: &str, count: i64) -> Result<WebSearchData> {
        let pairs: Vec<(&str, String)> = vec![
            ("q", query.to_string()),
            ("search_lang", "en".to_string()),
            ("result_filter", "locations".to_string()),
            ("count", count.min(MAX_COUNT).to_string()),
        ];
        self.get_json("web/search", &pairs).await
    }

    async fn poi_details(&self, ids: &[String]) -> Result<PoisData> {
        if ids.is_empty() {
            // Nothing to look up: no network call, no rate-limit charge.
            return Ok(PoisData::default());
        }
        self.get_json("local/pois", &Self::ids_pairs(ids)).await
    }

    async fn poi_descriptions(&self, ids: &[String]) -> Result<DescriptionsData> {
        if ids.is_empty() {
            return Ok(DescriptionsData::default());
        }
        self.get_json("local/descriptions", &Self::ids_pairs(ids))
            .await
    }
}
