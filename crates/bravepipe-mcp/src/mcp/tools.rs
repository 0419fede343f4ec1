use bravepipe_core::Error;
use serde::Deserialize;
use serde_json::{Map, Value};

pub(crate) const WEB_SEARCH: &str = "brave_web_search";
pub(crate) const LOCAL_SEARCH: &str = "brave_local_search";
pub(crate) const POI_DETAILS: &str = "brave_poi_details";
pub(crate) const POI_DESCRIPTIONS: &str = "brave_poi_descriptions";

pub(crate) struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
}

// Ordered by "what users reach for first"; some clients render tools in
// declaration order.
pub(crate) const TOOLS: [ToolSpec; 4] = [
    ToolSpec {
        name: WEB_SEARCH,
        description: "Performs a web search using the Brave Search API, ideal for general queries, news, articles, and online content. \
            Supports pagination and result-count control; maximum 20 results per request, with offset for pagination. \
            Queries should stay under 400 characters and 50 words.",
    },
    ToolSpec {
        name: LOCAL_SEARCH,
        description: "Searches for local businesses and places using Brave's Local Search API. \
            Best for queries with a physical location (restaurants, services, 'near me'). \
            Returns names, addresses, phone numbers, ratings, price ranges, opening hours, and descriptions. \
            Automatically falls back to web search when no local results are found.",
    },
    ToolSpec {
        name: POI_DETAILS,
        description: "Fetches detail records (name, address, phone, rating, price range, opening hours) \
            for points of interest by id, as returned by brave_local_search.",
    },
    ToolSpec {
        name: POI_DESCRIPTIONS,
        description: "Fetches AI-generated descriptive text for points of interest by id, \
            as returned by brave_local_search.",
    },
];

pub(crate) fn is_known(name: &str) -> bool {
    TOOLS.iter().any(|t| t.name == name)
}

/// JSON schema for a tool's arguments. The count/offset bounds and the query
/// length limits are declared here for clients; runtime validation checks
/// presence and primitive types only.
pub(crate) fn input_schema(name: &str) -> Value {
    match name {
        WEB_SEARCH => serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query (max 400 chars, 50 words)"
                },
                "count": {
                    "type": "number",
                    "description": "Number of results (1-20, default 10)",
                    "minimum": 1,
                    "maximum": 20,
                    "default": 10
                },
                "offset": {
                    "type": "number",
                    "description": "Pagination offset (0-9, default 0)",
                    "minimum": 0,
                    "maximum": 9,
                    "default": 0
                }
            },
            "required": ["query"]
        }),
        LOCAL_SEARCH => serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Local search query (e.g. 'pizza near Central Park')"
                },
                "count": {
                    "type": "number",
                    "description": "Number of results (1-20, default 5)",
                    "minimum": 1,
                    "maximum": 20,
                    "default": 5
                }
            },
            "required": ["query"]
        }),
        POI_DETAILS | POI_DESCRIPTIONS => serde_json::json!({
            "type": "object",
            "properties": {
                "ids": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "POI ids from brave_local_search"
                }
            },
            "required": ["ids"]
        }),
        _ => serde_json::json!({"type": "object"}),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WebSearchArgs {
    pub query: String,
    #[serde(default = "default_web_count")]
    pub count: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_web_count() -> i64 {
    10
}

#[derive(Debug, Deserialize)]
pub(crate) struct LocalSearchArgs {
    pub query: String,
    #[serde(default = "default_local_count")]
    pub count: i64,
}

fn default_local_count() -> i64 {
    5
}

#[derive(Debug, Deserialize)]
pub(crate) struct PoiIdsArgs {
    pub ids: Vec<String>,
}

/// Deserialize the untyped argument object into a tool's typed arguments.
///
/// Unknown extra keys pass; missing required keys and wrong primitive types
/// fail. This runs before any network activity.
pub(crate) fn parse_args<T: serde::de::DeserializeOwned>(
    args: &Map<String, Value>,
) -> Result<T, Error> {
    serde_json::from_value(Value::Object(args.clone()))
        .map_err(|e| Error::InvalidArguments(e.to_string()))
}
