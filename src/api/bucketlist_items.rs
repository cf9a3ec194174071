use actix_web::{delete, get, post, put, web, HttpResponse, Responder};

use crate::database::MongoDB;
use crate::models::{CreateItemRequest, UpdateItemRequest, User};
use crate::services::auth_service::BUCKETLISTS_URL;
use crate::services::bucketlist_item_service;
use crate::utils::pagination::{page_links, PageQuery, PageWindow};

fn bucketlist_url(bucketlist_id: &str) -> String {
    format!("{}{}", BUCKETLISTS_URL, bucketlist_id)
}

/// GET /api/v1/bucketlists/{id}/items/ - lists [or searches] the items of
/// one of the caller's bucketlists
#[get("/{id}/items/")]
pub async fn get_items(
    user: web::ReqData<User>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let bucketlist_id = path.into_inner();
    let window = PageWindow::from_query(&query);
    let q = query.search_term();

    let (items, total) = match bucketlist_item_service::list_items(
        &db,
        &user.user_id,
        &bucketlist_id,
        q,
        &window,
    )
    .await
    {
        Ok(page) => page,
        Err(e) => return e.to_response(),
    };

    let responses: Vec<_> = items.iter().map(|item| item.to_response()).collect();

    let base_path = format!("{}/items/", bucketlist_url(&bucketlist_id));
    let links = page_links(&base_path, q, &window, total);

    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "items": responses,
        "current_page": window.page,
        "total": total,
        "next_url": links.next_url,
        "prev_url": links.prev_url,
        "bucketlist_url": bucketlist_url(&bucketlist_id),
    }))
}

/// GET /api/v1/bucketlists/{id}/items/{item_id} - one item through the
/// ownership chain
#[get("/{id}/items/{item_id}")]
pub async fn get_item(
    user: web::ReqData<User>,
    path: web::Path<(String, String)>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let (bucketlist_id, item_id) = path.into_inner();

    match bucketlist_item_service::get_item(&db, &user.user_id, &bucketlist_id, &item_id).await {
        Ok(item) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "bucketlist_item": item.to_response(),
            "bucketlist_url": bucketlist_url(&bucketlist_id),
        })),
        Err(e) => e.to_response(),
    }
}

/// POST /api/v1/bucketlists/{id}/items/ - creates an item in one of the
/// caller's bucketlists
#[post("/{id}/items/")]
pub async fn create_item(
    user: web::ReqData<User>,
    path: web::Path<String>,
    body: web::Json<CreateItemRequest>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let bucketlist_id = path.into_inner();

    match bucketlist_item_service::create_item(&db, &user.user_id, &bucketlist_id, &body).await {
        Ok(item) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "bucketlist_item": item.to_response(),
            "bucketlist_url": bucketlist_url(&bucketlist_id),
        })),
        Err(e) => e.to_response(),
    }
}

/// PUT /api/v1/bucketlists/{id}/items/{item_id} - allow-listed update
/// (name, done)
#[put("/{id}/items/{item_id}")]
pub async fn update_item(
    user: web::ReqData<User>,
    path: web::Path<(String, String)>,
    body: web::Json<UpdateItemRequest>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let (bucketlist_id, item_id) = path.into_inner();

    match bucketlist_item_service::update_item(&db, &user.user_id, &bucketlist_id, &item_id, &body)
        .await
    {
        Ok(item) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "bucketlist_item": item.to_response(),
            "bucketlist_url": bucketlist_url(&bucketlist_id),
        })),
        Err(e) => e.to_response(),
    }
}

/// DELETE /api/v1/bucketlists/{id}/items/{item_id} - deletes an item
#[delete("/{id}/items/{item_id}")]
pub async fn delete_item(
    user: web::ReqData<User>,
    path: web::Path<(String, String)>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let (bucketlist_id, item_id) = path.into_inner();

    match bucketlist_item_service::delete_item(&db, &user.user_id, &bucketlist_id, &item_id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "status": "deleted",
            "bucketlist_url": bucketlist_url(&bucketlist_id),
        })),
        Err(e) => e.to_response(),
    }
}
