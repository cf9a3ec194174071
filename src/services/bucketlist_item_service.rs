// ==================== BUCKETLIST ITEM MANAGEMENT ====================
// Items are only reachable through their parent bucketlist: every operation
// resolves the parent under the caller's identity first, so items inherit
// the bucketlist's ownership without carrying an owner field of their own.

use crate::{
    database::MongoDB,
    models::{BucketlistItem, CreateItemRequest, UpdateItemRequest},
    services::{
        bucketlist_service,
        scoped_query::{paged_find, scoped_filter},
    },
    utils::{error::AppError, pagination::PageWindow},
};
use chrono::Utc;
use mongodb::bson::{doc, oid::ObjectId};

const COLLECTION: &str = "bucketlist_items";

fn parse_item_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::BadRequest("Invalid item ID".to_string()))
}

/// Resolves the parent bucketlist under the caller and returns its id hex.
async fn resolve_parent(db: &MongoDB, user_id: &str, bucketlist_id: &str) -> Result<String, AppError> {
    let bucketlist = bucketlist_service::get_bucketlist(db, user_id, bucketlist_id).await?;
    bucketlist
        .id
        .map(|id| id.to_hex())
        .ok_or_else(|| AppError::Internal("Stored bucketlist has no ObjectId".to_string()))
}

/// Lists [or searches] the items of one of the caller's bucketlists.
pub async fn list_items(
    db: &MongoDB,
    user_id: &str,
    bucketlist_id: &str,
    q: Option<&str>,
    window: &PageWindow,
) -> Result<(Vec<BucketlistItem>, u64), AppError> {
    let parent_id = resolve_parent(db, user_id, bucketlist_id).await?;

    let collection = db.collection::<BucketlistItem>(COLLECTION);
    paged_find(
        &collection,
        scoped_filter("bucketlist_id", &parent_id, q),
        window,
    )
    .await
}

/// Fetches a single item through the ownership chain.
pub async fn get_item(
    db: &MongoDB,
    user_id: &str,
    bucketlist_id: &str,
    item_id: &str,
) -> Result<BucketlistItem, AppError> {
    let parent_id = resolve_parent(db, user_id, bucketlist_id).await?;
    let object_id = parse_item_id(item_id)?;

    let collection = db.collection::<BucketlistItem>(COLLECTION);
    collection
        .find_one(doc! { "_id": object_id, "bucketlist_id": &parent_id })
        .await?
        .ok_or_else(|| AppError::NotFound("Item does not exist".to_string()))
}

/// Creates a new item in one of the caller's bucketlists.
pub async fn create_item(
    db: &MongoDB,
    user_id: &str,
    bucketlist_id: &str,
    request: &CreateItemRequest,
) -> Result<BucketlistItem, AppError> {
    let parent_id = resolve_parent(db, user_id, bucketlist_id).await?;

    let name = match request.name.as_deref() {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => return Err(AppError::BadRequest("missing required name field".to_string())),
    };

    let now = Utc::now().timestamp();
    let item = BucketlistItem {
        id: None,
        bucketlist_id: parent_id,
        name,
        done: request.done.unwrap_or(false),
        date_created: now,
        date_modified: now,
    };

    let collection = db.collection::<BucketlistItem>(COLLECTION);
    let result = collection.insert_one(&item).await?;

    let mut created = item;
    created.id = result.inserted_id.as_object_id();

    Ok(created)
}

/// Applies an allow-listed update (`name`, `done`) to an item and returns
/// the updated document.
pub async fn update_item(
    db: &MongoDB,
    user_id: &str,
    bucketlist_id: &str,
    item_id: &str,
    request: &UpdateItemRequest,
) -> Result<BucketlistItem, AppError> {
    let parent_id = resolve_parent(db, user_id, bucketlist_id).await?;
    let object_id = parse_item_id(item_id)?;

    let collection = db.collection::<BucketlistItem>(COLLECTION);

    let mut update_doc = doc! {
        "date_modified": Utc::now().timestamp()
    };

    if let Some(name) = request.name.as_deref() {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest("missing required name field".to_string()));
        }
        update_doc.insert("name", name.trim());
    }
    if let Some(done) = request.done {
        update_doc.insert("done", done);
    }

    let result = collection
        .update_one(
            doc! { "_id": object_id, "bucketlist_id": &parent_id },
            doc! { "$set": update_doc },
        )
        .await?;

    if result.matched_count == 0 {
        return Err(AppError::NotFound("Item does not exist".to_string()));
    }

    collection
        .find_one(doc! { "_id": object_id, "bucketlist_id": &parent_id })
        .await?
        .ok_or_else(|| AppError::NotFound("Item does not exist".to_string()))
}

/// Deletes an item from one of the caller's bucketlists.
pub async fn delete_item(
    db: &MongoDB,
    user_id: &str,
    bucketlist_id: &str,
    item_id: &str,
) -> Result<(), AppError> {
    let parent_id = resolve_parent(db, user_id, bucketlist_id).await?;
    let object_id = parse_item_id(item_id)?;

    let collection = db.collection::<BucketlistItem>(COLLECTION);
    let result = collection
        .delete_one(doc! { "_id": object_id, "bucketlist_id": &parent_id })
        .await?;

    if result.deleted_count == 0 {
        return Err(AppError::NotFound("Item does not exist".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateBucketlistRequest;

    #[test]
    fn test_malformed_item_id_is_a_bad_request() {
        assert_eq!(
            parse_item_id("xyz"),
            Err(AppError::BadRequest("Invalid item ID".to_string()))
        );
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_items_are_unreachable_through_a_foreign_bucketlist() {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/bucketlist-test".to_string());
        let db = MongoDB::new(&uri).await.unwrap();

        let bucketlist = bucketlist_service::create_bucketlist(
            &db,
            "owner-a",
            &CreateBucketlistRequest {
                name: Some("The Phlegmatic's Wishlist".to_string()),
            },
        )
        .await
        .unwrap();
        let bucketlist_id = bucketlist.id.unwrap().to_hex();

        let item = create_item(
            &db,
            "owner-a",
            &bucketlist_id,
            &CreateItemRequest {
                name: Some("Bungee off the Brooklyn Bridge".to_string()),
                done: None,
            },
        )
        .await
        .unwrap();
        let item_id = item.id.unwrap().to_hex();

        // the parent lookup fails for the other owner before any item read
        let result = get_item(&db, "owner-b", &bucketlist_id, &item_id).await;
        assert_eq!(
            result.unwrap_err(),
            AppError::NotFound("Item does not exist".to_string())
        );

        bucketlist_service::delete_bucketlist(&db, "owner-a", &bucketlist_id)
            .await
            .unwrap();
    }
}
