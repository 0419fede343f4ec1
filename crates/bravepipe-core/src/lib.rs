use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("rate limit exceeded for {endpoint}")]
    RateLimited { endpoint: String },
    #[error("API request failed (HTTP {status}): {detail}")]
    Api { status: u16, detail: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("not configured: {0}")]
    NotConfigured(String),
    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Top-level shape of the Brave `web/search` response.
///
/// The same endpoint serves both plain web results (`result_filter=web`) and
/// location-filtered results (`result_filter=locations`); either section may
/// be absent. Parsing is intentionally lenient: shape only, no semantic
/// validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebSearchData {
    pub web: Option<WebSection>,
    pub locations: Option<LocationSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebSection {
    pub results: Option<Vec<WebResult>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    pub language: Option<String>,
    pub published: Option<String>,
    pub rank: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationSection {
    pub results: Option<Vec<LocationRef>>,
}

/// A location hit embedded in a web-search response. Only the opaque id is
/// load-bearing: it is the join key for the POI detail/description lookups.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationRef {
    pub id: Option<String>,
    pub title: Option<String>,
}

/// Shape of the `local/pois` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoisData {
    #[serde(default)]
    pub results: Vec<PoiRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoiRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: PoiAddress,
    pub coordinates: Option<Coordinates>,
    pub phone: Option<String>,
    pub rating: Option<PoiRating>,
    #[serde(rename = "openingHours", default)]
    pub opening_hours: Vec<String>,
    #[serde(rename = "priceRange")]
    pub price_range: Option<String>,
}

// Brave uses schema.org-style field names for postal addresses and ratings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoiAddress {
    #[serde(rename = "streetAddress")]
    pub street_address: Option<String>,
    #[serde(rename = "addressLocality")]
    pub locality: Option<String>,
    #[serde(rename = "addressRegion")]
    pub region: Option<String>,
    #[serde(rename = "postalCode")]
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoiRating {
    #[serde(rename = "ratingValue")]
    pub value: Option<f64>,
    #[serde(rename = "ratingCount")]
    pub count: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Shape of the `local/descriptions` response: POI id -> descriptive text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DescriptionsData {
    #[serde(default)]
    pub descriptions: BTreeMap<String, String>,
}

/// The seam between the orchestration layer and the upstream HTTP client.
///
/// `count`/`offset` are passed through unclamped; the implementation owns the
/// parameter rules (upper clamp 20 for `count`, 0..=9 for `offset`). An empty
/// id list must short-circuit to the empty-shaped result without touching the
/// network or the rate-limit budget.
#[async_trait::async_trait]
pub trait SearchApi: Send + Sync {
    async fn web_search(
        &self,
        query: &str,
        count: Option<i64>,
        offset: Option<i64>,
    ) -> Result<WebSearchData>;

    async fn location_search(&self, query: &str, count: i64) -> Result<WebSearchData>;

    async fn poi_details(&self, ids: &[String]) -> Result<PoisData>;

    async fn poi_descriptions(&self, ids: &[String]) -> Result<DescriptionsData>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_web_shape() {
        let js = r#"
        {
          "web": {
            "results": [
              {"url":"https://example.com","title":"Example","description":"Hello"}
            ]
          }
        }
        "#;
        let parsed: WebSearchData = serde_json::from_str(js).unwrap();
        let rs = parsed.web.unwrap().results.unwrap();
        assert_eq!(rs.len(), 1);
        assert_eq!(rs[0].url, "https://example.com");
        assert_eq!(rs[0].title, "Example");
        assert_eq!(rs[0].description, "Hello");
        assert!(parsed.locations.is_none());
    }

    #[test]
    fn parses_locations_section_with_null_ids() {
        let js = r#"
        {
          "locations": {
            "results": [
              {"id":"poi1","title":"First"},
              {"id":null},
              {"title":"no id at all"}
            ]
          }
        }
        "#;
        let parsed: WebSearchData = serde_json::from_str(js).unwrap();
        let rs = parsed.locations.unwrap().results.unwrap();
        assert_eq!(rs.len(), 3);
        assert_eq!(rs[0].id.as_deref(), Some("poi1"));
        assert!(rs[1].id.is_none());
        assert!(rs[2].id.is_none());
    }

    #[test]
    fn parses_poi_record_with_schema_org_names() {
        let js = r#"
        {
          "results": [
            {
              "id": "poi1",
              "name": "Blue Bottle",
              "address": {
                "streetAddress": "66 Mint St",
                "addressLocality": "San Francisco",
                "addressRegion": "CA",
                "postalCode": "94103"
              },
              "phone": "+1 555 0100",
              "rating": {"ratingValue": 4.5, "ratingCount": 128},
              "openingHours": ["Mon-Fri 7am-5pm", "Sat 8am-4pm"],
              "priceRange": "$$"
            }
          ]
        }
        "#;
        let parsed: PoisData = serde_json::from_str(js).unwrap();
        assert_eq!(parsed.results.len(), 1);
        let poi = &parsed.results[0];
        assert_eq!(poi.address.street_address.as_deref(), Some("66 Mint St"));
        assert_eq!(poi.rating.as_ref().unwrap().value, Some(4.5));
        assert_eq!(poi.rating.as_ref().unwrap().count, Some(128));
        assert_eq!(poi.opening_hours.len(), 2);
        assert_eq!(poi.price_range.as_deref(), Some("$$"));
    }

    #[test]
    fn missing_sections_parse_to_empty_defaults() {
        let parsed: PoisData = serde_json::from_str("{}").unwrap();
        assert!(parsed.results.is_empty());
        let parsed: DescriptionsData = serde_json::from_str("{}").unwrap();
        assert!(parsed.descriptions.is_empty());
    }
}
