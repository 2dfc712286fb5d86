//! Link endpoints.

use reqwest::Method;

use crate::client::{Body, RagulaClient};
use crate::error::Result;
use crate::models::{CreateLinkPayload, Link};

/// Service for `/collections/{id}/links`.
pub struct LinksService<'a> {
    client: &'a RagulaClient,
}

impl<'a> LinksService<'a> {
    pub(crate) fn new(client: &'a RagulaClient) -> Self {
        Self { client }
    }

    /// Store a web link in a collection.
    pub async fn create(&self, collection_id: &str, payload: &CreateLinkPayload) -> Result<Link> {
        self.client
            .request_json(
                Method::POST,
                &format!("/collections/{}/links", collection_id),
                &[],
                Body::Json(serde_json::to_value(payload)?),
            )
            .await
    }

    pub async fn delete(&self, collection_id: &str, link_id: &str) -> Result<()> {
        self.client
            .request(
                Method::DELETE,
                &format!("/collections/{}/links/{}", collection_id, link_id),
                &[],
                Body::Empty,
            )
            .await?;
        Ok(())
    }
}
