use super::{handlers, tools};
use bravepipe_core::{Error, SearchApi};
use serde_json::{Map, Value};

/// What a tool call produces, before the transport wraps it:
/// one text payload plus the error flag.
#[derive(Debug, Clone)]
pub(crate) struct ToolResponse {
    pub text: String,
    pub is_error: bool,
}

impl ToolResponse {
    fn ok(text: String) -> Self {
        Self {
            text,
            is_error: false,
        }
    }

    fn error(text: String) -> Self {
        Self {
            text,
            is_error: true,
        }
    }
}

/// The single entry point for tool execution.
///
/// Routes the name to its handler and normalizes every outcome into a
/// [`ToolResponse`]; nothing escapes unformatted. Unknown names and missing
/// argument objects are rejected before validation, validation before any
/// network activity.
pub(crate) async fn call_tool(
    api: &dyn SearchApi,
    name: &str,
    arguments: Option<&Map<String, Value>>,
) -> ToolResponse {
    if !tools::is_known(name) {
        return ToolResponse::error(format!("Unknown tool requested: {name}"));
    }
    let Some(args) = arguments else {
        return ToolResponse::error("Tool arguments are required".to_string());
    };
    tracing::debug!(tool = name, "dispatching tool call");
    match execute(api, name, args).await {
        Ok(text) => ToolResponse::ok(text),
        Err(e) => ToolResponse::error(error_text(name, &e)),
    }
}

async fn execute(
    api: &dyn SearchApi,
    name: &str,
    args: &Map<String, Value>,
) -> Result<String, Error> {
    match name {
        tools::WEB_SEARCH => {
            let a: tools::WebSearchArgs = tools::parse_args(args)?;
            handlers::web_search(api, &a.query, a.count, a.offset).await
        }
        tools::LOCAL_SEARCH => {
            let a: tools::LocalSearchArgs = tools::parse_args(args)?;
            handlers::local_search(api, &a.query, a.count).await
        }
        tools::POI_DETAILS => {
            let a: tools::PoiIdsArgs = tools::parse_args(args)?;
            handlers::poi_details(api, &a.ids).await
        }
        tools::POI_DESCRIPTIONS => {
            let a: tools::PoiIdsArgs = tools::parse_args(args)?;
            handlers::poi_descriptions(api, &a.ids).await
        }
        // is_known() filtered everything else before we got here.
        other => Err(Error::Internal(format!("unrouted tool: {other}"))),
    }
}

/// The one place failures become user-visible text.
fn error_text(name: &str, e: &Error) -> String {
    match e {
        Error::InvalidArguments(detail) => {
            format!("Invalid arguments for tool {name}: {detail}")
        }
        Error::Api { status, detail } => {
            format!("Brave API Error ({status}): API request failed - {detail}")
        }
        Error::Network(cause) => format!("Brave API Error (N/A): API request failed: {cause}"),
        Error::RateLimited { endpoint } => {
            format!("Brave API Error (N/A): Rate limit exceeded - {endpoint}")
        }
        other => format!("Internal Server Error: {other}"),
    }
}
