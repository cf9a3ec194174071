mod api;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3002".to_string());
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    log::info!("🚀 Starting Bucketlist Service...");
    log::info!("📊 Database: {}", database_url);

    // Initialize MongoDB connection
    let db = database::MongoDB::new(&database_url)
        .await
        .expect("Failed to connect to MongoDB");

    let db_data = web::Data::new(db.clone());

    log::info!("✅ MongoDB connected successfully");
    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://127.0.0.1:3000")
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .wrap(cors)
            .wrap(Logger::default())
            // Swagger UI
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Auth endpoints; logout is the one protected route in the scope
            .service(
                web::scope("/api/v1/auth")
                    .route("/register", web::post().to(api::auth::register))
                    .route("/login", web::post().to(api::auth::login))
                    .service(
                        web::resource("/logout")
                            .wrap(middleware::auth::AuthMiddleware)
                            .route(web::get().to(api::auth::logout))
                            .route(web::post().to(api::auth::logout)),
                    ),
            )
            // Current user profile management
            .service(
                web::scope("/api/v1/user")
                    .wrap(middleware::auth::AuthMiddleware)
                    .route("/", web::get().to(api::users::get_profile))
                    .route("/", web::put().to(api::users::update_profile))
                    .route("/", web::delete().to(api::users::deregister)),
            )
            // Bucketlists and their items (owner-scoped, JWT required)
            .service(
                web::scope("/api/v1/bucketlists")
                    .wrap(middleware::auth::AuthMiddleware)
                    .service(api::bucketlists::get_bucketlists)
                    .service(api::bucketlists::create_bucketlist)
                    .service(api::bucketlist_items::get_items)
                    .service(api::bucketlist_items::create_item)
                    .service(api::bucketlist_items::get_item)
                    .service(api::bucketlist_items::update_item)
                    .service(api::bucketlist_items::delete_item)
                    .service(api::bucketlists::get_bucketlist)
                    .service(api::bucketlists::update_bucketlist)
                    .service(api::bucketlists::delete_bucketlist),
            )
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
