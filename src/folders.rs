//! Folder endpoints.

use reqwest::Method;

use crate::client::{Body, RagulaClient};
use crate::error::Result;
use crate::models::{CreateFolderPayload, Folder};

/// Service for `/collections/{id}/folders`.
pub struct FoldersService<'a> {
    client: &'a RagulaClient,
}

impl<'a> FoldersService<'a> {
    pub(crate) fn new(client: &'a RagulaClient) -> Self {
        Self { client }
    }

    /// List folders of a collection, optionally only those under `parent_id`.
    pub async fn list(&self, collection_id: &str, parent_id: Option<&str>) -> Result<Vec<Folder>> {
        let query: Vec<(&str, &str)> = parent_id
            .filter(|id| !id.is_empty())
            .map(|id| vec![("parentId", id)])
            .unwrap_or_default();

        self.client
            .request_json(
                Method::GET,
                &format!("/collections/{}/folders", collection_id),
                &query,
                Body::Empty,
            )
            .await
    }

    /// Create a folder. `None` creates it at the collection root.
    pub async fn create(
        &self,
        collection_id: &str,
        name: &str,
        parent_id: Option<&str>,
    ) -> Result<Folder> {
        let payload = CreateFolderPayload::new(name, parent_id.map(str::to_string));
        self.client
            .request_json(
                Method::POST,
                &format!("/collections/{}/folders", collection_id),
                &[],
                Body::Json(serde_json::to_value(&payload)?),
            )
            .await
    }

    pub async fn delete(&self, collection_id: &str, folder_id: &str) -> Result<()> {
        self.client
            .request(
                Method::DELETE,
                &format!("/collections/{}/folders/{}", collection_id, folder_id),
                &[],
                Body::Empty,
            )
            .await?;
        Ok(())
    }
}
