//! Scripted [`SearchApi`] double for handler and dispatch tests.

use bravepipe_core::{
    DescriptionsData, Error, LocationRef, LocationSection, PoiRecord, PoisData, Result, SearchApi,
    WebResult, WebSearchData, WebSection,
};
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Default)]
pub(crate) struct MockApi {
    pub calls: Mutex<Vec<String>>,
    pub web_results: Vec<WebResult>,
    /// When set, `web_search` fails with this Api error (status, detail).
    pub web_error: Option<(u16, String)>,
    /// When set, `web_search` fails with a rate-limit rejection for this endpoint.
    pub web_rate_limited: Option<String>,
    pub location_ids: Vec<Option<String>>,
    pub fail_location_search: bool,
    pub pois: Vec<PoiRecord>,
    pub descriptions: BTreeMap<String, String>,
    pub fail_details: bool,
    pub fail_descriptions: bool,
}

impl MockApi {
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn upstream_boom() -> Error {
        Error::Api {
            status: 500,
            detail: "Internal Server Error: boom...".to_string(),
        }
    }
}

#[async_trait::async_trait]
impl SearchApi for MockApi {
    async fn web_search(
        &self,
        query: &str,
        count: Option<i64>,
        offset: Option<i64>,
    ) -> Result<WebSearchData> {
        self.record(format!("web_search q={query} count={count:?} offset={offset:?}"));
        if let Some((status, detail)) = &self.web_error {
            return Err(Error::Api {
                status: *status,
                detail: detail.clone(),
            });
        }
        if let Some(endpoint) = &self.web_rate_limited {
            return Err(Error::RateLimited {
                endpoint: endpoint.clone(),
            });
        }
        Ok(WebSearchData {
            web: Some(WebSection {
                results: Some(self.web_results.clone()),
            }),
            locations: None,
        })
    }

    async fn location_search(&self, query: &str, count: i64) -> Result<WebSearchData> {
        self.record(format!("location_search q={query} count={count}"));
        if self.fail_location_search {
            return Err(Self::upstream_boom());
        }
        let results = self
            .location_ids
            .iter()
            .map(|id| LocationRef {
                id: id.clone(),
                title: None,
            })
            .collect();
        Ok(WebSearchData {
            web: None,
            locations: Some(LocationSection {
                results: Some(results),
            }),
        })
    }

    async fn poi_details(&self, ids: &[String]) -> Result<PoisData> {
        self.record(format!("poi_details ids={ids:?}"));
        if self.fail_details {
            return Err(Self::upstream_boom());
        }
        Ok(PoisData {
            results: self.pois.clone(),
        })
    }

    async fn poi_descriptions(&self, ids: &[String]) -> Result<DescriptionsData> {
        self.record(format!("poi_descriptions ids={ids:?}"));
        if self.fail_descriptions {
            return Err(Self::upstream_boom());
        }
        Ok(DescriptionsData {
            descriptions: self.descriptions.clone(),
        })
    }
}
