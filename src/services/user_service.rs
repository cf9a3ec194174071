// ==================== USER PROFILE MANAGEMENT ====================

use crate::{
    database::MongoDB,
    models::{Bucketlist, BucketlistItem, UpdateUserRequest, User},
    utils::error::AppError,
};
use futures::stream::TryStreamExt;
use mongodb::bson::doc;

/// Applies an allow-listed profile update (`username` only) and returns the
/// updated record.
pub async fn update_user(
    db: &MongoDB,
    user_id: &str,
    request: &UpdateUserRequest,
) -> Result<User, AppError> {
    let collection = db.collection::<User>("users");

    if let Some(username) = request.username.as_deref() {
        if !username.trim().is_empty() {
            collection
                .update_one(
                    doc! { "user_id": user_id },
                    doc! { "$set": { "username": username.trim() } },
                )
                .await?;
        }
    }

    collection
        .find_one(doc! { "user_id": user_id })
        .await?
        .ok_or_else(|| AppError::NotFound("Item does not exist".to_string()))
}

/// Deletes the user account and everything it owns. The cascade runs
/// children-first (items, then bucketlists, then the user) so an
/// interrupted run never leaves reachable orphans.
pub async fn deregister(db: &MongoDB, user_id: &str) -> Result<(), AppError> {
    log::info!("🗑️  Deregistering account for user {}", user_id);

    // 1. Collect the user's bucketlist ids
    let bucketlists = db.collection::<Bucketlist>("bucketlists");
    let mut cursor = bucketlists.find(doc! { "user_id": user_id }).await?;

    let mut bucketlist_ids = Vec::new();
    while let Some(bucketlist) = cursor.try_next().await? {
        if let Some(id) = bucketlist.id {
            bucketlist_ids.push(id.to_hex());
        }
    }

    // 2. Delete all items in those bucketlists
    if !bucketlist_ids.is_empty() {
        let items = db.collection::<BucketlistItem>("bucketlist_items");
        let removed = items
            .delete_many(doc! { "bucketlist_id": { "$in": bucketlist_ids } })
            .await?;
        log::info!("   ✅ Deleted {} items for user {}", removed.deleted_count, user_id);
    }

    // 3. Delete the bucketlists themselves
    let removed = bucketlists.delete_many(doc! { "user_id": user_id }).await?;
    log::info!(
        "   ✅ Deleted {} bucketlists for user {}",
        removed.deleted_count,
        user_id
    );

    // 4. Delete the user record
    let users = db.collection::<User>("users");
    let result = users.delete_one(doc! { "user_id": user_id }).await?;

    if result.deleted_count == 0 {
        return Err(AppError::NotFound("Item does not exist".to_string()));
    }

    log::info!("✅ Account deregistered: {}", user_id);
    Ok(())
}
