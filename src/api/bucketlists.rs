use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde::Serialize;

use crate::database::MongoDB;
use crate::models::{
    BucketlistItemResponse, BucketlistResponse, CreateBucketlistRequest, UpdateBucketlistRequest,
    User,
};
use crate::services::auth_service::BUCKETLISTS_URL;
use crate::services::{bucketlist_item_service, bucketlist_service};
use crate::utils::pagination::{page_links, PageQuery, PageWindow};

/// A bucketlist with an embedded page of its items.
#[derive(Debug, Serialize)]
struct BucketlistDetail {
    #[serde(flatten)]
    bucketlist: BucketlistResponse,
    items: Vec<BucketlistItemResponse>,
}

/// GET /api/v1/bucketlists/ - lists [or searches] the caller's bucketlists
#[get("/")]
pub async fn get_bucketlists(
    user: web::ReqData<User>,
    query: web::Query<PageQuery>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let window = PageWindow::from_query(&query);
    let q = query.search_term();

    let (bucketlists, total) =
        match bucketlist_service::list_bucketlists(&db, &user.user_id, q, &window).await {
            Ok(page) => page,
            Err(e) => return e.to_response(),
        };

    let mut responses = Vec::with_capacity(bucketlists.len());
    for bucketlist in &bucketlists {
        let id_hex = bucketlist.id.map(|id| id.to_hex()).unwrap_or_default();
        let item_count = match bucketlist_service::count_items(&db, &id_hex).await {
            Ok(count) => count,
            Err(e) => return e.to_response(),
        };
        responses.push(bucketlist.to_response(item_count, user.display_name()));
    }

    let links = page_links(BUCKETLISTS_URL, q, &window, total);

    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "bucketlists": responses,
        "current_page": window.page,
        "total": total,
        "next_url": links.next_url,
        "prev_url": links.prev_url,
    }))
}

/// GET /api/v1/bucketlists/{id} - one bucketlist with a page of its items
#[get("/{id}")]
pub async fn get_bucketlist(
    user: web::ReqData<User>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let bucketlist_id = path.into_inner();
    let window = PageWindow::from_query(&query);
    let q = query.search_term();

    let bucketlist =
        match bucketlist_service::get_bucketlist(&db, &user.user_id, &bucketlist_id).await {
            Ok(bucketlist) => bucketlist,
            Err(e) => return e.to_response(),
        };

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

    // item_count is the full count; total reflects the [searched] page set
    let stored_id = bucketlist.id.map(|id| id.to_hex()).unwrap_or_default();
    let item_count = match bucketlist_service::count_items(&db, &stored_id).await {
        Ok(count) => count,
        Err(e) => return e.to_response(),
    };

    let detail = BucketlistDetail {
        bucketlist: bucketlist.to_response(item_count, user.display_name()),
        items: items.iter().map(|item| item.to_response()).collect(),
    };

    let base_path = format!("{}{}", BUCKETLISTS_URL, bucketlist_id);
    let links = page_links(&base_path, q, &window, total);

    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "bucketlist": detail,
        "current_page": window.page,
        "total": total,
        "next_url": links.next_url,
        "prev_url": links.prev_url,
        "bucketlists_url": BUCKETLISTS_URL,
    }))
}

/// POST /api/v1/bucketlists/ - creates a bucketlist owned by the caller
#[post("/")]
pub async fn create_bucketlist(
    user: web::ReqData<User>,
    body: web::Json<CreateBucketlistRequest>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    match bucketlist_service::create_bucketlist(&db, &user.user_id, &body).await {
        Ok(bucketlist) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "bucketlist": bucketlist.to_response(0, user.display_name()),
            "bucketlists_url": BUCKETLISTS_URL,
        })),
        Err(e) => e.to_response(),
    }
}

/// PUT /api/v1/bucketlists/{id} - allow-listed update (name)
#[put("/{id}")]
pub async fn update_bucketlist(
    user: web::ReqData<User>,
    path: web::Path<String>,
    body: web::Json<UpdateBucketlistRequest>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let bucketlist_id = path.into_inner();

    let updated =
        match bucketlist_service::update_bucketlist(&db, &user.user_id, &bucketlist_id, &body).await
        {
            Ok(bucketlist) => bucketlist,
            Err(e) => return e.to_response(),
        };

    let stored_id = updated.id.map(|id| id.to_hex()).unwrap_or_default();
    let item_count = match bucketlist_service::count_items(&db, &stored_id).await {
        Ok(count) => count,
        Err(e) => return e.to_response(),
    };

    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "bucketlist": updated.to_response(item_count, user.display_name()),
        "bucketlists_url": BUCKETLISTS_URL,
    }))
}

/// DELETE /api/v1/bucketlists/{id} - deletes the bucketlist and its items
#[delete("/{id}")]
pub async fn delete_bucketlist(
    user: web::ReqData<User>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let bucketlist_id = path.into_inner();

    match bucketlist_service::delete_bucketlist(&db, &user.user_id, &bucketlist_id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "status": "deleted",
            "bucketlists_url": BUCKETLISTS_URL,
        })),
        Err(e) => e.to_response(),
    }
}
