//! Knowledge base lookup exposed as a tool for agent frameworks.
//!
//! The tool takes one `query` string, runs it against a collection and
//! returns the matching snippets as a single `context` string.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::client::{Body, RagulaClient};
use crate::error::RagulaError;
use crate::models::{QueryResponse, QueryResultItem, SimpleQueryPayload};

pub const TOOL_NAME: &str = "knowledgebase";

pub const TOOL_DESCRIPTION: &str =
    "Fetch additional context from the knowledgebase for the provided search query.";

/// Failures reported by the tool.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    #[error("Query parameter is required")]
    MissingQuery,

    #[error("Error fetching context: {0}")]
    Failed(String),
}

/// Every client error is reported the same way; the status code is dropped.
impl From<RagulaError> for ToolError {
    fn from(err: RagulaError) -> Self {
        let message = match &err {
            RagulaError::ApiError { .. }
            | RagulaError::TransportError(_)
            | RagulaError::InvalidUpload(_)
            | RagulaError::IoError(_)
            | RagulaError::DecodeError(_)
            | RagulaError::UnexpectedBody(_) => err.to_string(),
        };
        ToolError::Failed(message)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParams {
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub context: String,
}

/// Name, description and parameter schema handed to the agent framework.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

/// Queries one collection on behalf of an agent.
#[derive(Clone)]
pub struct KnowledgebaseTool {
    client: RagulaClient,
    collection_id: String,
}

impl KnowledgebaseTool {
    pub fn new(client: RagulaClient, collection_id: impl Into<String>) -> Self {
        Self {
            client,
            collection_id: collection_id.into(),
        }
    }

    /// Tool backed by the hosted instance.
    pub fn from_api_key(api_key: impl Into<String>, collection_id: impl Into<String>) -> Self {
        Self::new(RagulaClient::with_token(api_key), collection_id)
    }

    pub fn collection_id(&self) -> &str {
        &self.collection_id
    }

    /// JSON schema of the tool's arguments.
    pub fn parameters() -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "A string to find more information in the knowledgebase"
                }
            },
            "required": ["query"]
        })
    }

    pub fn definition() -> ToolDefinition {
        ToolDefinition {
            name: TOOL_NAME,
            description: TOOL_DESCRIPTION,
            parameters: Self::parameters(),
        }
    }

    /// Run the query and join the snippets of every result.
    pub async fn execute(&self, params: &ToolParams) -> Result<ToolOutput, ToolError> {
        if params.query.is_empty() {
            return Err(ToolError::MissingQuery);
        }

        let payload = SimpleQueryPayload {
            query: params.query.clone(),
        };
        let body = self
            .client
            .request(
                Method::POST,
                &format!("/collections/{}/query", self.collection_id),
                &[],
                Body::Json(serde_json::to_value(&payload).map_err(RagulaError::from)?),
            )
            .await?;

        // No response at all means no context.
        if body.is_empty() {
            return Ok(ToolOutput {
                context: String::new(),
            });
        }

        let response: QueryResponse = body.into_json()?;
        Ok(ToolOutput {
            context: build_context(&response.results),
        })
    }

    /// Same as [`execute`](Self::execute) for raw JSON arguments.
    pub async fn execute_json(&self, params: Value) -> Result<ToolOutput, ToolError> {
        let query = params
            .get("query")
            .and_then(Value::as_str)
            .ok_or(ToolError::MissingQuery)?;

        self.execute(&ToolParams {
            query: query.to_string(),
        })
        .await
    }
}

/// Non-empty snippets separated by a blank line, trimmed.
pub fn build_context(results: &[QueryResultItem]) -> String {
    results
        .iter()
        .filter_map(|item| item.content_snippet.as_deref())
        .filter(|snippet| !snippet.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
        .trim()
        .to_string()
}
