use actix_web::{web, HttpResponse};
use tracing::info;

use crate::core::db::{insert_user, load_blog, load_users};
use crate::core::errors::ApiError;
use crate::core::helpers::{hash_password, now_iso};
use crate::models::User;
use crate::validation::{check_username_unique, validate_new_user, CreateUserRequest};
use crate::AppState;

fn ensure_username_free(state: &AppState, username: &str) -> Result<(), ApiError> {
    let users = load_users(&state.store)?;
    check_username_unique(username, users.iter().map(|u| u.username.as_str()))
}

pub async fn create_user(
    state: web::Data<AppState>,
    body: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let new_user = validate_new_user(body.into_inner())?;
    ensure_username_free(&state, &new_user.username)?;

    let password = new_user.password;
    let password_hash = web::block(move || hash_password(&password)).await??;

    // Hashing yields to other requests; re-check before the write.
    ensure_username_free(&state, &new_user.username)?;

    let user = User {
        key: state.store.assign_key(),
        username: new_user.username,
        name: new_user.name,
        password_hash,
        blogs: Vec::new(),
        created_at: now_iso(),
    };
    insert_user(&state.store, &user)?;

    info!(user_id = %user.key, username = %user.username, "user registered");
    Ok(HttpResponse::Ok().json(user.to_json(Vec::new())))
}

pub async fn list_users(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let users = load_users(&state.store)?;

    let mut out = Vec::with_capacity(users.len());
    for user in &users {
        let mut blogs = Vec::with_capacity(user.blogs.len());
        for key in &user.blogs {
            if let Some(blog) = load_blog(&state.store, key)? {
                blogs.push(blog.summary());
            }
        }
        out.push(user.to_json(blogs));
    }

    Ok(HttpResponse::Ok().json(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::helpers::verify_password;
    use crate::test_support::{register, send, test_state};
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;
    use serde_json::json;

    fn post_user(body: serde_json::Value) -> TestRequest {
        TestRequest::post().uri("/api/users").set_json(body)
    }

    #[actix_web::test]
    async fn registers_user_without_exposing_hash() {
        let state = test_state();

        let (status, body) = send(
            &state,
            post_user(json!({"username": "Batman", "name": "Bruce Wayne", "password": "Selina"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "Batman");
        assert!(body["id"].is_string());
        assert!(body.get("passwordHash").is_none());
        assert!(body.get("_id").is_none());

        let stored = load_users(&state.store).unwrap();
        assert_eq!(stored.len(), 1);
        assert!(verify_password("Selina", &stored[0].password_hash));
    }

    #[actix_web::test]
    async fn second_registration_with_same_username_fails() {
        let state = test_state();

        let (first, _) = send(
            &state,
            post_user(json!({"username": "root", "name": "root", "password": "sekrit"})),
        )
        .await;
        let (second, body) = send(
            &state,
            post_user(json!({"username": "root", "name": "root", "password": "rudebwoy"})),
        )
        .await;

        assert_eq!(first, StatusCode::OK);
        assert_eq!(second, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("`username` to be unique"));
        assert_eq!(load_users(&state.store).unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn unknown_fields_are_rejected() {
        let state = test_state();

        let (status, body) = send(
            &state,
            post_user(json!({"username": "Batman", "password": "Selina", "admin": true})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
        assert!(load_users(&state.store).unwrap().is_empty());
    }

    #[actix_web::test]
    async fn listing_joins_blogs() {
        let state = test_state();
        let (_, token) = register(&state, "root", "sekrit");

        let (created, _) = send(
            &state,
            TestRequest::post()
                .uri("/api/blogs")
                .insert_header(("Authorization", format!("Bearer {}", token)))
                .set_json(json!({"title": "T", "url": "u"})),
        )
        .await;
        assert_eq!(created, StatusCode::CREATED);

        let (status, body) = send(&state, TestRequest::get().uri("/api/users")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["username"], "root");
        assert_eq!(body[0]["blogs"][0]["title"], "T");
        assert!(!body.to_string().contains("passwordHash"));
    }
}
