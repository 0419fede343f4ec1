use super::{dispatch, tools};
use bravepipe_core::SearchApi;
use bravepipe_local::{BraveClient, RateLimiter};
use rmcp::{
    model::{
        CallToolRequestParam, CallToolResult, Content, ListToolsResult, PaginatedRequestParam,
        ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
    transport::stdio,
    ErrorData as McpError, RoleServer, ServerHandler, ServiceExt,
};
use std::sync::Arc;

/// The stdio transport adapter. All tool semantics live in [`dispatch`];
/// this type only translates between rmcp's model and the tool surface.
#[derive(Clone)]
pub(crate) struct BravepipeServer {
    api: Arc<dyn SearchApi>,
}

impl BravepipeServer {
    /// Fails fast when no API key is configured: a server with no usable
    /// upstream should not come up at all.
    pub(crate) fn new() -> Result<Self, McpError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("bravepipe/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        let client = BraveClient::from_env(http, Arc::new(RateLimiter::new()))
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(Self {
            api: Arc::new(client),
        })
    }

    fn tool_declarations() -> Vec<Tool> {
        tools::TOOLS
            .iter()
            .map(|spec| {
                let schema = match tools::input_schema(spec.name) {
                    serde_json::Value::Object(map) => map,
                    _ => serde_json::Map::new(),
                };
                Tool::new(spec.name, spec.description, Arc::new(schema))
            })
            .collect()
    }
}

impl ServerHandler for BravepipeServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Brave Search tools: web search plus local business (POI) lookup with automatic web-search fallback."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: Self::tool_declarations(),
            ..Default::default()
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let response =
            dispatch::call_tool(self.api.as_ref(), &request.name, request.arguments.as_ref())
                .await;
        let content = vec![Content::text(response.text)];
        Ok(if response.is_error {
            CallToolResult::error(content)
        } else {
            CallToolResult::success(content)
        })
    }
}

pub(crate) async fn serve_stdio() -> Result<(), McpError> {
    let svc = BravepipeServer::new()?;
    let running = svc
        .serve(stdio())
        .await
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    // Keep the stdio server alive until the client closes.
    running
        .waiting()
        .await
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(())
}
