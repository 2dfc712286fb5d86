//! Ragula API client and the request layer shared by every service.

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::collections::CollectionsService;
use crate::error::{RagulaError, Result};
use crate::files::FilesService;
use crate::folders::FoldersService;
use crate::links::LinksService;
use crate::query::QueryService;

/// Hosted Ragula instance.
pub const DEFAULT_BASE_URL: &str = "https://www.ragula.io";

/// Path segment every endpoint lives under.
const API_PATH: &str = "/api";

const JSON_MEDIA_TYPE: &str = "application/json";

/// Request body accepted by [`RagulaClient::request`].
pub enum Body {
    Empty,
    Json(Value),
    /// File parts plus any plain form fields.
    Multipart(Form),
}

/// A successful response, parsed as far as it could be.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// `204 No Content`.
    Empty,
    Json(Value),
    /// The body was not valid JSON.
    Text(String),
}

impl ResponseBody {
    pub fn is_empty(&self) -> bool {
        matches!(self, ResponseBody::Empty)
    }

    /// Decode a structured body into `T`.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T> {
        match self {
            ResponseBody::Json(value) => Ok(serde_json::from_value(value)?),
            ResponseBody::Text(text) => Err(RagulaError::UnexpectedBody(text)),
            ResponseBody::Empty => Err(RagulaError::UnexpectedBody(
                "empty response".to_string(),
            )),
        }
    }
}

/// Client for the Ragula REST API.
///
/// Clones share the underlying connection pool.
#[derive(Clone)]
pub struct RagulaClient {
    base_url: String,
    token: Option<String>,
    http: Client,
}

impl RagulaClient {
    /// Create a new RagulaClient.
    ///
    /// # Arguments
    /// * `base_url` - Host of the Ragula instance; `/api` is appended if missing
    /// * `token` - API token sent as a bearer credential, if any
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            token,
            http: Client::new(),
        }
    }

    /// Client for the hosted instance, authenticated with `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self::new(DEFAULT_BASE_URL, Some(token.into()))
    }

    /// Effective base URL, always ending in `/api`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn collections(&self) -> CollectionsService<'_> {
        CollectionsService::new(self)
    }

    pub fn folders(&self) -> FoldersService<'_> {
        FoldersService::new(self)
    }

    pub fn files(&self) -> FilesService<'_> {
        FilesService::new(self)
    }

    pub fn links(&self) -> LinksService<'_> {
        LinksService::new(self)
    }

    pub fn query(&self) -> QueryService<'_> {
        QueryService::new(self)
    }

    /// Send one request to `path` (relative to the base URL).
    ///
    /// Non-2xx statuses become [`RagulaError::ApiError`]; failures below HTTP
    /// become [`RagulaError::TransportError`].
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Body,
    ) -> Result<ResponseBody> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "sending request");

        let mut request = self.http.request(method.clone(), &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        request = match body {
            Body::Multipart(form) => request.multipart(form),
            Body::Json(value) => request
                .header(CONTENT_TYPE, JSON_MEDIA_TYPE)
                .header(ACCEPT, JSON_MEDIA_TYPE)
                .json(&value),
            Body::Empty => request
                .header(CONTENT_TYPE, JSON_MEDIA_TYPE)
                .header(ACCEPT, JSON_MEDIA_TYPE),
        };

        let response = request.send().await.map_err(|err| {
            warn!(%method, %url, error = %err, "request failed before a response");
            RagulaError::from(err)
        })?;

        let status = response.status();
        debug!(%method, %url, status = status.as_u16(), "received response");

        if !status.is_success() {
            return Err(api_error(response).await);
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(ResponseBody::Empty);
        }

        let bytes = response.bytes().await?;
        Ok(parse_body(&bytes))
    }

    /// Send a request and decode the JSON response into `T`.
    pub(crate) async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Body,
    ) -> Result<T> {
        self.request(method, path, query, body).await?.into_json()
    }
}

impl Default for RagulaClient {
    /// Unauthenticated client for the hosted instance.
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, None)
    }
}

/// Strip a trailing slash and make sure the URL ends in `/api`.
pub fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.strip_suffix('/').unwrap_or(base_url);
    if trimmed.ends_with(API_PATH) {
        trimmed.to_string()
    } else {
        format!("{}{}", trimmed, API_PATH)
    }
}

/// JSON first, raw text otherwise.
fn parse_body(bytes: &[u8]) -> ResponseBody {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(value) => ResponseBody::Json(value),
        Err(_) => ResponseBody::Text(String::from_utf8_lossy(bytes).into_owned()),
    }
}

async fn api_error(response: Response) -> RagulaError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body);
    warn!(status, %message, "API returned an error");
    RagulaError::ApiError { status, message }
}

/// The `message` field of a JSON error body, or the body itself.
fn error_message(body: &str) -> String {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("message").cloned());

    match message {
        Some(Value::String(message)) => message,
        Some(Value::Null) | None => body.to_string(),
        Some(other) => other.to_string(),
    }
}
