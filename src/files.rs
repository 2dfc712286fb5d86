//! File endpoints.

use std::path::{Path, PathBuf};

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use tracing::debug;

use crate::client::{Body, RagulaClient};
use crate::error::{RagulaError, Result};
use crate::models::{File, ListFilesResponse, ListingItem};

/// What to upload and where to put it.
///
/// Give either a local `path`, or `content` together with a `file_name`.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub path: Option<PathBuf>,
    pub content: Option<Vec<u8>>,
    pub file_name: Option<String>,
    pub folder_id: Option<String>,
}

impl UploadRequest {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
            ..Self::default()
        }
    }

    pub fn from_bytes(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            content: Some(content.into()),
            file_name: Some(file_name.into()),
            ..Self::default()
        }
    }

    /// Place the uploaded file in a folder.
    pub fn folder(mut self, folder_id: impl Into<String>) -> Self {
        self.folder_id = Some(folder_id.into());
        self
    }

    /// Check that exactly one source was given.
    pub fn source(&self) -> Result<UploadSource<'_>> {
        match (&self.path, &self.content, self.file_name.as_deref()) {
            (Some(_), Some(_), _) => Err(RagulaError::InvalidUpload(
                "provide either a file path or file content, not both".to_string(),
            )),
            (Some(path), None, _) => Ok(UploadSource::Path(path)),
            (None, Some(content), Some(name)) if !content.is_empty() && !name.is_empty() => {
                Ok(UploadSource::Content { name, content })
            }
            _ => Err(RagulaError::InvalidUpload(
                "either a file path or both file content and a file name must be provided"
                    .to_string(),
            )),
        }
    }
}

/// A validated upload source.
#[derive(Debug, Clone, Copy)]
pub enum UploadSource<'a> {
    Path(&'a Path),
    Content { name: &'a str, content: &'a [u8] },
}

impl UploadSource<'_> {
    /// Build the multipart `file` part, reading the file from disk if needed.
    async fn into_part(self) -> Result<Part> {
        let (name, content) = match self {
            UploadSource::Path(path) => {
                let name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .ok_or_else(|| {
                        RagulaError::InvalidUpload(format!("not a file path: {}", path.display()))
                    })?
                    .to_string();
                (name, tokio::fs::read(path).await?)
            }
            UploadSource::Content { name, content } => (name.to_string(), content.to_vec()),
        };

        let mime_type = mime_guess::from_path(&name)
            .first_or_octet_stream()
            .to_string();
        debug!(file = %name, size = content.len(), %mime_type, "prepared upload part");

        Ok(Part::bytes(content).file_name(name).mime_str(&mime_type)?)
    }
}

/// Service for `/collections/{id}/files`.
pub struct FilesService<'a> {
    client: &'a RagulaClient,
}

impl<'a> FilesService<'a> {
    pub(crate) fn new(client: &'a RagulaClient) -> Self {
        Self { client }
    }

    /// List files of a collection, optionally only those in `folder_id`.
    ///
    /// Folders and links in the listing are skipped; see
    /// [`list_items`](Self::list_items) to get them too.
    pub async fn list(&self, collection_id: &str, folder_id: Option<&str>) -> Result<Vec<File>> {
        Ok(self.listing(collection_id, folder_id).await?.into_files())
    }

    /// Every entry of the listing: files, folders and links.
    pub async fn list_items(
        &self,
        collection_id: &str,
        folder_id: Option<&str>,
    ) -> Result<Vec<ListingItem>> {
        Ok(self.listing(collection_id, folder_id).await?.into_items())
    }

    async fn listing(&self, collection_id: &str, folder_id: Option<&str>) -> Result<ListFilesResponse> {
        let query: Vec<(&str, &str)> = folder_id
            .filter(|id| !id.is_empty())
            .map(|id| vec![("folderId", id)])
            .unwrap_or_default();

        self.client
            .request_json(
                Method::GET,
                &format!("/collections/{}/files", collection_id),
                &query,
                Body::Empty,
            )
            .await
    }

    /// Upload a file as `multipart/form-data`.
    ///
    /// The request is validated before anything is read or sent.
    pub async fn upload(&self, collection_id: &str, request: &UploadRequest) -> Result<File> {
        let source = request.source()?;

        let mut form = Form::new().part("file", source.into_part().await?);
        if let Some(folder_id) = request.folder_id.as_deref().filter(|id| !id.is_empty()) {
            form = form.text("folderId", folder_id.to_string());
        }

        self.client
            .request_json(
                Method::POST,
                &format!("/collections/{}/files", collection_id),
                &[],
                Body::Multipart(form),
            )
            .await
    }

    pub async fn delete(&self, collection_id: &str, file_id: &str) -> Result<()> {
        self.client
            .request(
                Method::DELETE,
                &format!("/collections/{}/files/{}", collection_id, file_id),
                &[],
                Body::Empty,
            )
            .await?;
        Ok(())
    }
}
