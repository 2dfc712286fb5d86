//! Collection endpoints.

use reqwest::Method;

use crate::client::{Body, RagulaClient};
use crate::error::Result;
use crate::models::{Collection, CollectionStatus, CreateCollectionPayload, UpdateCollectionPayload};

/// Service for `/collections`.
pub struct CollectionsService<'a> {
    client: &'a RagulaClient,
}

impl<'a> CollectionsService<'a> {
    pub(crate) fn new(client: &'a RagulaClient) -> Self {
        Self { client }
    }

    /// List all collections visible to the token.
    pub async fn list(&self) -> Result<Vec<Collection>> {
        self.client
            .request_json(Method::GET, "/collections", &[], Body::Empty)
            .await
    }

    /// Create a collection. `description` is omitted from the body when `None`.
    pub async fn create(&self, name: &str, description: Option<&str>) -> Result<Collection> {
        let payload = CreateCollectionPayload {
            name: name.to_string(),
            description: description.map(str::to_string),
        };
        self.client
            .request_json(
                Method::POST,
                "/collections",
                &[],
                Body::Json(serde_json::to_value(&payload)?),
            )
            .await
    }

    pub async fn get(&self, collection_id: &str) -> Result<Collection> {
        self.client
            .request_json(
                Method::GET,
                &format!("/collections/{}", collection_id),
                &[],
                Body::Empty,
            )
            .await
    }

    /// Partially update a collection.
    ///
    /// Only fields set on `payload` are sent. With nothing set no update is
    /// issued and the current collection is fetched instead.
    pub async fn update(
        &self,
        collection_id: &str,
        payload: &UpdateCollectionPayload,
    ) -> Result<Collection> {
        if payload.is_empty() {
            return self.get(collection_id).await;
        }

        self.client
            .request_json(
                Method::PUT,
                &format!("/collections/{}", collection_id),
                &[],
                Body::Json(serde_json::to_value(payload)?),
            )
            .await
    }

    pub async fn delete(&self, collection_id: &str) -> Result<()> {
        self.client
            .request(
                Method::DELETE,
                &format!("/collections/{}", collection_id),
                &[],
                Body::Empty,
            )
            .await?;
        Ok(())
    }

    /// Processing status, file count and total size of a collection.
    pub async fn status(&self, collection_id: &str) -> Result<CollectionStatus> {
        self.client
            .request_json(
                Method::GET,
                &format!("/collections/{}/status", collection_id),
                &[],
                Body::Empty,
            )
            .await
    }
}
