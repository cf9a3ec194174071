use actix_web::{web, HttpResponse};

use crate::database::MongoDB;
use crate::models::{UpdateUserRequest, User};
use crate::services::{auth_service, user_service};

/// GET /api/v1/user/ - profile of the current user
pub async fn get_profile(user: web::ReqData<User>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "profile": user.to_profile(),
        "bucketlists_url": auth_service::BUCKETLISTS_URL,
    }))
}

/// PUT /api/v1/user/ - allow-listed profile update (username only)
pub async fn update_profile(
    user: web::ReqData<User>,
    body: web::Json<UpdateUserRequest>,
    db: web::Data<MongoDB>,
) -> HttpResponse {
    match user_service::update_user(&db, &user.user_id, &body).await {
        Ok(updated) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "profile": updated.to_profile(),
            "bucketlists_url": auth_service::BUCKETLISTS_URL,
        })),
        Err(e) => e.to_response(),
    }
}

/// DELETE /api/v1/user/ - deregister the current user; cascades to all
/// owned bucketlists and their items
pub async fn deregister(user: web::ReqData<User>, db: web::Data<MongoDB>) -> HttpResponse {
    match user_service::deregister(&db, &user.user_id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "status": "deregistered",
            "registration_url": auth_service::REGISTER_URL,
        })),
        Err(e) => e.to_response(),
    }
}
