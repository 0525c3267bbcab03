pub mod auth;
pub mod blogs;
pub mod config;
pub mod core;
pub mod list_helper;
pub mod models;
pub mod token;
pub mod users;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::{web, App, HttpResponse, HttpServer};

use crate::config::Config;
use crate::core::errors::ApiError;
use crate::core::store::Store;
use crate::token::TokenService;

/// Shared state handed to every handler.
pub struct AppState {
    pub store: Store,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(config: &Config, store: Store) -> Self {
        Self {
            store,
            tokens: TokenService::new(&config.secret, config.token_expiration_hours),
        }
    }
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into())
}

/// Route table for the API.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).service(
        web::scope("/api")
            .route("/login", web::post().to(auth::login_user))
            .route("/users", web::post().to(users::create_user))
            .route("/users", web::get().to(users::list_users))
            .route("/blogs", web::get().to(blogs::list_blogs))
            .route("/blogs", web::post().to(blogs::create_blog))
            .route("/blogs/summary", web::get().to(blogs::blog_summary))
            .route("/blogs/{id}", web::get().to(blogs::get_blog))
            .route("/blogs/{id}", web::put().to(blogs::update_blog))
            .route("/blogs/{id}", web::delete().to(blogs::delete_blog))
            .route("/blogs/{id}/comments", web::post().to(blogs::add_comment)),
    );
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({"error": "No route found"}))
}

/// Start serving on an already bound listener. The returned server must be
/// awaited or spawned to make progress.
pub fn run(listener: TcpListener, state: web::Data<AppState>) -> std::io::Result<Server> {
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(configure)
            .default_service(web::route().to(not_found))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
