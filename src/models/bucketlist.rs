use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::utils::time::format_timestamp;

/// A user's bucketlist (stored in MongoDB).
///
/// `user_id` is set once at creation from the authenticated caller and is
/// never read from client input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bucketlist {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// ID of the owning user
    pub user_id: String,

    pub name: String,

    /// Unix timestamp of creation
    pub date_created: i64,

    /// Unix timestamp of last field write
    pub date_modified: i64,
}

impl Bucketlist {
    pub fn to_response(&self, item_count: u64, created_by: &str) -> BucketlistResponse {
        let id = self.id.map(|id| id.to_hex()).unwrap_or_default();
        BucketlistResponse {
            url: format!("/api/v1/bucketlists/{}", id),
            id,
            name: self.name.clone(),
            item_count,
            date_created: format_timestamp(self.date_created),
            date_modified: format_timestamp(self.date_modified),
            created_by: created_by.to_string(),
        }
    }
}

/// Request to create a bucketlist. `name` is validated as required non-empty.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateBucketlistRequest {
    pub name: Option<String>,
}

/// Allow-listed bucketlist update.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateBucketlistRequest {
    pub name: Option<String>,
}

/// Client-facing view of a bucketlist.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct BucketlistResponse {
    pub id: String,
    pub name: String,
    pub item_count: u64,
    pub date_created: String,
    pub date_modified: String,
    pub created_by: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_carries_resource_url() {
        let oid = ObjectId::parse_str("64f0aa0d3bde9a0001abcdef").unwrap();
        let bucketlist = Bucketlist {
            id: Some(oid),
            user_id: "owner".to_string(),
            name: "The Choleric's Wishlist".to_string(),
            date_created: 1_700_000_000,
            date_modified: 1_700_000_000,
        };

        let response = bucketlist.to_response(3, "Somebody");
        assert_eq!(response.id, "64f0aa0d3bde9a0001abcdef");
        assert_eq!(response.url, "/api/v1/bucketlists/64f0aa0d3bde9a0001abcdef");
        assert_eq!(response.item_count, 3);
        assert_eq!(response.created_by, "Somebody");
    }

    #[test]
    fn test_owner_is_not_serialized_from_request() {
        // client payloads only carry the name; the owner field cannot be
        // injected through deserialization
        let request: CreateBucketlistRequest =
            serde_json::from_str(r#"{"name": "x", "user_id": "evil"}"#).unwrap();
        assert_eq!(request.name.as_deref(), Some("x"));
    }
}
