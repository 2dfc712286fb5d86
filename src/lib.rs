//! ragula - Client library for the Ragula document retrieval API.
//!
//! This library provides:
//! - Collection, folder, file and link management
//! - Semantic queries and questions against a collection
//! - A `knowledgebase` tool wrapping queries for agent frameworks
//!
//! # Example
//!
//! ```no_run
//! use ragula::RagulaClient;
//!
//! #[tokio::main]
//! async fn main() -> ragula::Result<()> {
//!     let client = RagulaClient::new("http://localhost:8000", Some("token".to_string()));
//!
//!     let response = client.query().query_collection("collection-id", "What is X?").await?;
//!     for result in response.results {
//!         println!("{}\t{}", result.file_id, result.score);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod collections;
pub mod error;
pub mod files;
pub mod folders;
pub mod links;
pub mod models;
pub mod query;
pub mod tool;

// Re-exports for convenience
pub use client::{normalize_base_url, Body, RagulaClient, ResponseBody, DEFAULT_BASE_URL};
pub use error::{RagulaError, Result, TRANSPORT_FAILURE_STATUS};
pub use files::UploadRequest;
pub use models::{
    Collection, CollectionStatus, File, Folder, Link, Patch, QueryPayload, QueryResponse,
    UpdateCollectionPayload,
};
pub use tool::{KnowledgebaseTool, ToolError, ToolOutput, ToolParams};
