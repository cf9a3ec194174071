use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::utils::time::format_timestamp;

/// An item inside a bucketlist (stored in MongoDB).
///
/// Items carry no owner field of their own: `bucketlist_id` is set once at
/// creation and authorization always resolves through the parent bucketlist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketlistItem {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// ID of the parent bucketlist
    pub bucketlist_id: String,

    pub name: String,

    #[serde(default)]
    pub done: bool,

    /// Unix timestamp of creation
    pub date_created: i64,

    /// Unix timestamp of last field write
    pub date_modified: i64,
}

impl BucketlistItem {
    pub fn to_response(&self) -> BucketlistItemResponse {
        BucketlistItemResponse {
            id: self.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: self.name.clone(),
            done: self.done,
            date_created: format_timestamp(self.date_created),
            date_modified: format_timestamp(self.date_modified),
        }
    }
}

/// Request to create an item. `name` is validated as required non-empty;
/// `done` defaults to false.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateItemRequest {
    pub name: Option<String>,
    pub done: Option<bool>,
}

/// Allow-listed item update.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub done: Option<bool>,
}

/// Client-facing view of an item.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct BucketlistItemResponse {
    pub id: String,
    pub name: String,
    pub done: bool,
    pub date_created: String,
    pub date_modified: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_done_defaults_to_false_on_stored_documents() {
        // documents written before the field existed deserialize cleanly
        let item: BucketlistItem = serde_json::from_str(
            r#"{"bucketlist_id": "b1", "name": "Kayak across the Atlantic",
                "date_created": 0, "date_modified": 0}"#,
        )
        .unwrap();
        assert!(!item.done);
    }

    #[test]
    fn test_parent_reference_is_not_client_assignable() {
        let request: CreateItemRequest =
            serde_json::from_str(r#"{"name": "x", "bucketlist_id": "evil"}"#).unwrap();
        assert_eq!(request.name.as_deref(), Some("x"));
    }
}
