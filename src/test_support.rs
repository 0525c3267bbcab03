//! Helpers for in-process handler tests.

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::Value;

use crate::config::Config;
use crate::core::db::insert_user;
use crate::core::helpers::{hash_password, now_iso};
use crate::core::store::Store;
use crate::models::User;
use crate::{configure, not_found, AppState};

pub const TEST_SECRET: &str = "test-secret";

pub fn state_with(store: Store) -> web::Data<AppState> {
    web::Data::new(AppState::new(&Config::with_secret(TEST_SECRET), store))
}

pub fn test_state() -> web::Data<AppState> {
    state_with(Store::open_in_memory())
}

/// Run one request through a fresh app sharing `state`.
pub async fn send(state: &web::Data<AppState>, req: test::TestRequest) -> (StatusCode, Value) {
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(configure)
            .default_service(web::route().to(not_found)),
    )
    .await;
    let resp = test::call_service(&app, req.to_request()).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, value)
}

/// Store a user directly and return it with a freshly issued token.
pub fn register(state: &web::Data<AppState>, username: &str, password: &str) -> (User, String) {
    let user = User {
        key: state.store.assign_key(),
        username: username.to_string(),
        name: username.to_string(),
        password_hash: hash_password(password).unwrap(),
        blogs: vec![],
        created_at: now_iso(),
    };
    insert_user(&state.store, &user).unwrap();
    let token = state.tokens.issue(&user).unwrap();
    (user, token)
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}
