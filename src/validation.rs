//! Request bodies and the checks that run before anything is written.
//!
//! Bodies deserialize into `*Request` structs that reject unknown fields;
//! the `validate_*` functions turn them into the typed values handlers work
//! with. None of this touches the store.

use serde::Deserialize;

use crate::config::{MAX_COMMENT_LENGTH, MIN_PASSWORD_LENGTH, MIN_USERNAME_LENGTH};
use crate::core::errors::ApiError;
use crate::core::helpers::sanitize_text;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub name: String,
    pub password: String,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct CreateBlogRequest {
    pub title: Option<String>,
    pub url: Option<String>,
    pub author: Option<String>,
    pub likes: Option<u64>,
}

#[derive(Debug, PartialEq)]
pub struct NewBlog {
    pub title: String,
    pub url: String,
    pub author: Option<String>,
    pub likes: u64,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub url: Option<String>,
    pub author: Option<String>,
    pub likes: Option<u64>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct CommentRequest {
    pub comment: Option<String>,
}

fn user_validation_failed(detail: String) -> ApiError {
    ApiError::BadRequest(format!("User validation failed: username: {}", detail))
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn validate_new_user(req: CreateUserRequest) -> Result<NewUser, ApiError> {
    let password = match req.password {
        Some(p) if !p.is_empty() => p,
        _ => return Err(ApiError::BadRequest("password is required".to_string())),
    };
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }

    let username = match present(req.username) {
        Some(u) => sanitize_text(&u),
        None => {
            return Err(user_validation_failed(
                "Path `username` is required.".to_string(),
            ))
        }
    };
    if username.chars().count() < MIN_USERNAME_LENGTH {
        return Err(user_validation_failed(format!(
            "Path `username` (`{}`) is shorter than the minimum allowed length ({}).",
            username, MIN_USERNAME_LENGTH
        )));
    }

    Ok(NewUser {
        username,
        name: req.name.map(|n| sanitize_text(&n)).unwrap_or_default(),
        password,
    })
}

pub fn check_username_unique<'a>(
    username: &str,
    mut existing: impl Iterator<Item = &'a str>,
) -> Result<(), ApiError> {
    if existing.any(|u| u == username) {
        return Err(ApiError::Conflict(format!(
            "User validation failed: username: Error, expected `username` to be unique. Value: `{}`",
            username
        )));
    }
    Ok(())
}

pub fn validate_new_blog(req: CreateBlogRequest) -> Result<NewBlog, ApiError> {
    match (present(req.title), present(req.url)) {
        (Some(title), Some(url)) => Ok(NewBlog {
            title,
            url,
            author: present(req.author),
            likes: req.likes.unwrap_or(0),
        }),
        _ => Err(ApiError::BadRequest("title and url are required".to_string())),
    }
}

/// Fields given in an update must still satisfy the creation rules.
pub fn validate_blog_update(req: &UpdateBlogRequest) -> Result<(), ApiError> {
    let blank = |field: &Option<String>| matches!(field, Some(v) if v.trim().is_empty());
    if blank(&req.title) || blank(&req.url) {
        return Err(ApiError::BadRequest("title and url must not be empty".to_string()));
    }
    Ok(())
}

pub fn validate_comment(req: CommentRequest) -> Result<String, ApiError> {
    let comment = present(req.comment)
        .map(|c| sanitize_text(c.trim()))
        .ok_or_else(|| ApiError::BadRequest("comment is required".to_string()))?;
    if comment.is_empty() || comment.chars().count() > MAX_COMMENT_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "comment must be 1-{} characters",
            MAX_COMMENT_LENGTH
        )));
    }
    Ok(comment)
}
