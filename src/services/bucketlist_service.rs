// ==================== BUCKETLIST MANAGEMENT ====================
// Every operation is scoped to the authenticated owner. A bucketlist that
// exists under a different owner is indistinguishable from one that does
// not exist at all.

use crate::{
    database::MongoDB,
    models::{Bucketlist, BucketlistItem, CreateBucketlistRequest, UpdateBucketlistRequest},
    services::scoped_query::{paged_find, scoped_filter},
    utils::{error::AppError, pagination::PageWindow},
};
use chrono::Utc;
use mongodb::bson::{doc, oid::ObjectId};

const COLLECTION: &str = "bucketlists";
const ITEMS_COLLECTION: &str = "bucketlist_items";

fn parse_object_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::BadRequest("Invalid bucketlist ID".to_string()))
}

/// Lists [or searches] the caller's bucketlists, one page at a time.
pub async fn list_bucketlists(
    db: &MongoDB,
    user_id: &str,
    q: Option<&str>,
    window: &PageWindow,
) -> Result<(Vec<Bucketlist>, u64), AppError> {
    let collection = db.collection::<Bucketlist>(COLLECTION);
    paged_find(&collection, scoped_filter("user_id", user_id, q), window).await
}

/// Fetches one of the caller's bucketlists by id.
pub async fn get_bucketlist(db: &MongoDB, user_id: &str, id: &str) -> Result<Bucketlist, AppError> {
    let object_id = parse_object_id(id)?;

    let collection = db.collection::<Bucketlist>(COLLECTION);
    collection
        .find_one(doc! { "_id": object_id, "user_id": user_id })
        .await?
        .ok_or_else(|| AppError::NotFound("Item does not exist".to_string()))
}

/// Creates a bucketlist owned by the caller. The owner comes from the
/// resolved identity, never from the request body.
pub async fn create_bucketlist(
    db: &MongoDB,
    user_id: &str,
    request: &CreateBucketlistRequest,
) -> Result<Bucketlist, AppError> {
    let name = match request.name.as_deref() {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => return Err(AppError::BadRequest("missing required name field".to_string())),
    };

    let now = Utc::now().timestamp();
    let bucketlist = Bucketlist {
        id: None,
        user_id: user_id.to_string(),
        name,
        date_created: now,
        date_modified: now,
    };

    let collection = db.collection::<Bucketlist>(COLLECTION);
    let result = collection.insert_one(&bucketlist).await?;

    let mut created = bucketlist;
    created.id = result.inserted_id.as_object_id();

    log::info!("📝 Bucketlist created for user {}", user_id);

    Ok(created)
}

/// Applies an allow-listed update to one of the caller's bucketlists and
/// returns the updated document.
pub async fn update_bucketlist(
    db: &MongoDB,
    user_id: &str,
    id: &str,
    request: &UpdateBucketlistRequest,
) -> Result<Bucketlist, AppError> {
    // ownership check first; also covers the id parse
    let existing = get_bucketlist(db, user_id, id).await?;
    let object_id = existing.id.ok_or_else(|| {
        AppError::Internal("Stored bucketlist has no ObjectId".to_string())
    })?;

    let mut update_doc = doc! {
        "date_modified": Utc::now().timestamp()
    };

    if let Some(name) = request.name.as_deref() {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest("missing required name field".to_string()));
        }
        update_doc.insert("name", name.trim());
    }

    let collection = db.collection::<Bucketlist>(COLLECTION);
    collection
        .update_one(
            doc! { "_id": object_id, "user_id": user_id },
            doc! { "$set": update_doc },
        )
        .await?;

    get_bucketlist(db, user_id, id).await
}

/// Deletes one of the caller's bucketlists and all of its items.
pub async fn delete_bucketlist(db: &MongoDB, user_id: &str, id: &str) -> Result<(), AppError> {
    let existing = get_bucketlist(db, user_id, id).await?;
    let object_id = existing.id.ok_or_else(|| {
        AppError::Internal("Stored bucketlist has no ObjectId".to_string())
    })?;

    // cascade: items first, so an interrupted delete never strands
    // reachable orphans
    let items = db.collection::<BucketlistItem>(ITEMS_COLLECTION);
    let removed = items
        .delete_many(doc! { "bucketlist_id": object_id.to_hex() })
        .await?;

    let collection = db.collection::<Bucketlist>(COLLECTION);
    collection
        .delete_one(doc! { "_id": object_id, "user_id": user_id })
        .await?;

    log::info!(
        "🗑️  Bucketlist {} deleted for user {} ({} items)",
        object_id.to_hex(),
        user_id,
        removed.deleted_count
    );

    Ok(())
}

/// Number of items currently in a bucketlist.
pub async fn count_items(db: &MongoDB, bucketlist_id: &str) -> Result<u64, AppError> {
    let items = db.collection::<BucketlistItem>(ITEMS_COLLECTION);
    Ok(items
        .count_documents(doc! { "bucketlist_id": bucketlist_id })
        .await?)
}
