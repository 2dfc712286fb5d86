//! Query and question endpoints.

use reqwest::Method;

use crate::client::{Body, RagulaClient};
use crate::error::Result;
use crate::models::{AskQuestionResponse, QueryPayload, QueryResponse, SimpleQueryPayload};

/// Service for semantic queries against a collection.
pub struct QueryService<'a> {
    client: &'a RagulaClient,
}

impl<'a> QueryService<'a> {
    pub(crate) fn new(client: &'a RagulaClient) -> Self {
        Self { client }
    }

    /// Query a collection. The body is exactly `{"query": ...}`.
    pub async fn query_collection(&self, collection_id: &str, query: &str) -> Result<QueryResponse> {
        let payload = SimpleQueryPayload {
            query: query.to_string(),
        };
        self.post(&format!("/collections/{}/query", collection_id), &payload)
            .await
    }

    /// Query a collection with a result limit and filters.
    ///
    /// `topK` is only sent when set and `filter` only when one of its lists
    /// is non-empty.
    pub async fn query_collection_with(
        &self,
        collection_id: &str,
        payload: &QueryPayload,
    ) -> Result<QueryResponse> {
        self.post(&format!("/collections/{}/query", collection_id), payload)
            .await
    }

    /// Ask a natural-language question and get a generated answer.
    pub async fn ask_question(
        &self,
        collection_id: &str,
        question: &str,
    ) -> Result<AskQuestionResponse> {
        let payload = SimpleQueryPayload {
            query: question.to_string(),
        };
        self.post(&format!("/collections/{}/question", collection_id), &payload)
            .await
    }

    async fn post<B, T>(&self, path: &str, payload: &B) -> Result<T>
    where
        B: serde::Serialize,
        T: serde::de::DeserializeOwned,
    {
        self.client
            .request_json(Method::POST, path, &[], Body::Json(serde_json::to_value(payload)?))
            .await
    }
}
