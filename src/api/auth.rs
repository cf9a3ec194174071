use actix_web::{web, HttpResponse};

use crate::database::MongoDB;
use crate::models::User;
use crate::services::auth_service;
use crate::services::auth_service::{AuthResponse, LoginRequest, RegisterRequest, RegisterResponse};

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(db: web::Data<MongoDB>, request: web::Json<LoginRequest>) -> HttpResponse {
    log::info!("🔐 POST /auth/login - email: {}", request.email);

    match auth_service::login(&db, &request).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            log::warn!("❌ Login failed: {}", request.email);
            e.to_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = RegisterResponse),
        (status = 400, description = "Missing email or password"),
        (status = 403, description = "Email already registered")
    )
)]
pub async fn register(db: web::Data<MongoDB>, request: web::Json<RegisterRequest>) -> HttpResponse {
    let email_str = request.email.as_deref().unwrap_or("N/A");
    log::info!("📝 POST /auth/register - email: {}", email_str);

    match auth_service::register(&db, &request).await {
        Ok(response) => HttpResponse::Created().json(response),
        Err(e) => {
            log::warn!("❌ Registration failed: {} - {}", email_str, e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Logged out; the presented token is no longer honored"),
        (status = 401, description = "Missing, invalid, expired or revoked token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn logout(db: web::Data<MongoDB>, user: web::ReqData<User>) -> HttpResponse {
    log::info!("👋 /auth/logout - user: {}", user.user_id);

    match auth_service::logout(&db, &user.user_id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "status": "logged out",
            "login_url": auth_service::LOGIN_URL,
        })),
        Err(e) => e.to_response(),
    }
}
