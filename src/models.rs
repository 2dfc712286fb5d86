//! Data models for Ragula API requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An optional, nullable field that remembers whether it was sent at all.
///
/// `Absent` means the key is missing, `Null` means the key is present with a
/// JSON `null`, `Value` carries the value. Whether `Absent` is skipped or
/// written as `null` is decided per field: pair it with
/// `#[serde(default, skip_serializing_if = "Patch::is_absent")]` to omit it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Patch::Null)
    }

    /// Borrow the value, treating absent and null alike.
    pub fn as_option(&self) -> Option<&T> {
        match self {
            Patch::Value(v) => Some(v),
            Patch::Absent | Patch::Null => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Patch::Value(v) => Some(v),
            Patch::Absent | Patch::Null => None,
        }
    }
}

impl Patch<String> {
    pub fn as_deref(&self) -> Option<&str> {
        self.as_option().map(String::as_str)
    }
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

/// `None` becomes an explicit `Null`, never `Absent`.
impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        }
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Patch::Value(v) => serializer.serialize_some(v),
            Patch::Absent | Patch::Null => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    // Only called when the key is present; a missing key falls back to
    // `Default`, which is `Absent`.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

/// A named container of files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub description: Patch<String>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub datastore_id: Patch<String>,
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let description = self.description.as_deref().unwrap_or("-");
        write!(f, "{}\t{}\t{}", self.id, self.name, description)
    }
}

/// Processing status of a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStatus {
    pub status: String,
    pub file_count: u64,
    pub total_size: u64,
}

/// A folder inside a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub parent_id: Patch<String>,
    pub collection_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Display for Folder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parent = self.parent_id.as_deref().unwrap_or("-");
        write!(f, "{}\t{}\t{}", self.id, parent, self.name)
    }
}

/// A file stored in a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub file_type: String,
    pub size: u64,
    pub collection_id: String,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub folder_id: Patch<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub storage_path: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_link: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl std::fmt::Display for File {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.id,
            format_size(self.size),
            self.file_type,
            self.name
        )
    }
}

/// A web link stored in a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: String,
    pub name: String,
    pub url: String,
    pub collection_id: String,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub folder_id: Patch<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub is_link: bool,
}

/// Format bytes into human-readable size.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    match bytes {
        b if b >= GB => format!("{:.2} GB", b as f64 / GB as f64),
        b if b >= MB => format!("{:.2} MB", b as f64 / MB as f64),
        b if b >= KB => format!("{:.2} KB", b as f64 / KB as f64),
        b => format!("{} B", b),
    }
}

/// One entry of a collection listing.
///
/// Variants are tried in order: files carry `type`, `size` and
/// `storagePath`, links carry `url`, anything else is a folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListingItem {
    File(File),
    Link(Link),
    Folder(Folder),
}

/// Response from the file listing endpoint.
///
/// Older deployments return a bare array of files, newer ones wrap files,
/// folders and links in `items`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListFilesResponse {
    Items { items: Vec<ListingItem> },
    Bare(Vec<File>),
}

impl ListFilesResponse {
    pub fn into_items(self) -> Vec<ListingItem> {
        match self {
            ListFilesResponse::Items { items } => items,
            ListFilesResponse::Bare(files) => files.into_iter().map(ListingItem::File).collect(),
        }
    }

    /// Only the file entries.
    pub fn into_files(self) -> Vec<File> {
        self.into_items()
            .into_iter()
            .filter_map(|item| match item {
                ListingItem::File(file) => Some(file),
                ListingItem::Link(_) | ListingItem::Folder(_) => None,
            })
            .collect()
    }
}

/// Narrows a query to some folders and file types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryFilter {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub folder_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_types: Vec<String>,
}

impl QueryFilter {
    pub fn is_empty(&self) -> bool {
        self.folder_ids.is_empty() && self.file_types.is_empty()
    }
}

/// A single ranked match from a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResultItem {
    pub file_id: String,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_snippet: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<QueryResultItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskQuestionResponse {
    pub answer: String,
}

/// Body of `POST /collections`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateCollectionPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of `PUT /collections/{id}`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateCollectionPayload {
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub name: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub description: Patch<String>,
}

impl UpdateCollectionPayload {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Patch::Value(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Patch::Value(description.into());
        self
    }

    /// Send `"description": null` to clear it server side.
    pub fn clear_description(mut self) -> Self {
        self.description = Patch::Null;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_absent() && self.description.is_absent()
    }
}

/// Body of `POST /collections/{id}/folders`.
///
/// `parentId` is always written; a root folder sends an explicit `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderPayload {
    pub name: String,
    pub parent_id: Patch<String>,
}

impl CreateFolderPayload {
    pub fn new(name: impl Into<String>, parent_id: Option<String>) -> Self {
        Self {
            name: name.into(),
            parent_id: Patch::from(parent_id),
        }
    }
}

/// Body of `POST /collections/{id}/links`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkPayload {
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
}

/// The minimal `{query}` body shared by query and question calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimpleQueryPayload {
    pub query: String,
}

/// Full query body with optional result count and filters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPayload {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "QueryFilter::is_empty")]
    pub filter: QueryFilter,
}

impl QueryPayload {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_k: None,
            filter: QueryFilter::default(),
        }
    }

    pub fn top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn folder_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter.folder_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn file_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter.file_types = types.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(1048576), "1.00 MB");
        assert_eq!(format_size(1073741824), "1.00 GB");
    }

    #[test]
    fn test_folder_parent_absent_vs_null() {
        let base = json!({
            "id": "f1",
            "name": "Docs",
            "collectionId": "c1",
            "createdAt": "2024-05-01T10:00:00Z",
            "updatedAt": "2024-05-01T10:00:00Z"
        });

        let folder: Folder = serde_json::from_value(base.clone()).unwrap();
        assert_eq!(folder.parent_id, Patch::Absent);

        let mut with_null = base.clone();
        with_null["parentId"] = serde_json::Value::Null;
        let folder: Folder = serde_json::from_value(with_null).unwrap();
        assert_eq!(folder.parent_id, Patch::Null);

        let mut with_parent = base;
        with_parent["parentId"] = json!("root");
        let folder: Folder = serde_json::from_value(with_parent).unwrap();
        assert_eq!(folder.parent_id.as_deref(), Some("root"));
    }

    #[test]
    fn test_folder_reserializes_null_parent() {
        let folder: Folder = serde_json::from_value(json!({
            "id": "f1",
            "name": "Docs",
            "parentId": null,
            "collectionId": "c1",
            "createdAt": "2024-05-01T10:00:00Z",
            "updatedAt": "2024-05-01T10:00:00Z"
        }))
        .unwrap();

        let value = serde_json::to_value(&folder).unwrap();
        assert!(value.as_object().unwrap().contains_key("parentId"));
        assert!(value["parentId"].is_null());
    }

    #[test]
    fn test_update_payload_omits_absent_fields() {
        let payload = UpdateCollectionPayload::default().name("Renamed");
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"name": "Renamed"})
        );

        let payload = UpdateCollectionPayload::default().clear_description();
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"description": null})
        );

        assert!(UpdateCollectionPayload::default().is_empty());
        assert_eq!(
            serde_json::to_value(UpdateCollectionPayload::default()).unwrap(),
            json!({})
        );
    }

    #[test]
    fn test_create_folder_payload_always_has_parent() {
        let payload = CreateFolderPayload::new("Docs", None);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"name": "Docs", "parentId": null})
        );

        let payload = CreateFolderPayload::new("Docs", Some("p1".to_string()));
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"name": "Docs", "parentId": "p1"})
        );
    }

    #[test]
    fn test_query_payload_shapes() {
        let payload = QueryPayload::new("What is X?");
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"query": "What is X?"})
        );

        let payload = QueryPayload::new("q").top_k(3).file_types(["pdf"]);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"query": "q", "topK": 3, "filter": {"fileTypes": ["pdf"]}})
        );
    }

    #[test]
    fn test_file_deserialize() {
        let file: File = serde_json::from_value(json!({
            "id": "file1",
            "name": "report.pdf",
            "type": "application/pdf",
            "size": 2048,
            "collectionId": "c1",
            "folderId": null,
            "createdAt": "2024-05-01T10:00:00.000Z",
            "updatedAt": "2024-05-01T10:00:00.000Z",
            "storagePath": "c1/file1"
        }))
        .unwrap();

        assert_eq!(file.file_type, "application/pdf");
        assert_eq!(file.size, 2048);
        assert!(file.folder_id.is_null());
        assert!(!file.is_link);

        let display = format!("{}", file);
        assert!(display.contains("2.00 KB"));
        assert!(display.contains("report.pdf"));
    }

    #[test]
    fn test_listing_items_decode_by_shape() {
        let response: ListFilesResponse = serde_json::from_value(json!({
            "items": [
                {
                    "id": "file1",
                    "name": "a.txt",
                    "type": "text/plain",
                    "size": 5,
                    "collectionId": "c1",
                    "createdAt": "2024-05-01T10:00:00Z",
                    "updatedAt": "2024-05-01T10:00:00Z",
                    "storagePath": "c1/file1"
                },
                {
                    "id": "f1",
                    "name": "Docs",
                    "parentId": null,
                    "collectionId": "c1",
                    "createdAt": "2024-05-01T10:00:00Z",
                    "updatedAt": "2024-05-01T10:00:00Z"
                },
                {
                    "id": "l1",
                    "name": "Site",
                    "url": "https://example.com",
                    "collectionId": "c1",
                    "folderId": null,
                    "createdAt": "2024-05-01T10:00:00Z",
                    "updatedAt": "2024-05-01T10:00:00Z",
                    "isLink": true
                }
            ]
        }))
        .unwrap();

        let items = response.into_items();
        assert!(matches!(items[0], ListingItem::File(_)));
        assert!(matches!(items[1], ListingItem::Folder(_)));
        assert!(matches!(items[2], ListingItem::Link(ref link) if link.is_link));
    }

    #[test]
    fn test_collection_display_without_description() {
        let collection: Collection = serde_json::from_value(json!({
            "id": "c1",
            "name": "Handbook",
            "userId": "u1",
            "createdAt": "2024-05-01T10:00:00Z",
            "updatedAt": "2024-05-01T10:00:00Z"
        }))
        .unwrap();

        assert!(collection.description.is_absent());
        assert_eq!(format!("{}", collection), "c1\tHandbook\t-");
    }
}
