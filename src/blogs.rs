use std::collections::HashMap;

use actix_web::{web, HttpRequest, HttpResponse};
use tracing::{error, info, warn};

use crate::auth::validate_token;
use crate::core::db::{
    insert_blog, load_blog, load_blogs, load_user, remove_blog, save_blog, save_user,
};
use crate::core::errors::ApiError;
use crate::core::helpers::{normalize_key, now_iso, same_key};
use crate::core::store::Store;
use crate::list_helper;
use crate::models::{Blog, BlogJson, User};
use crate::token::TokenClaims;
use crate::validation::{
    validate_blog_update, validate_comment, validate_new_blog, CommentRequest, CreateBlogRequest,
    UpdateBlogRequest,
};
use crate::AppState;

fn parse_blog_id(raw: &str) -> Result<String, ApiError> {
    normalize_key(raw).ok_or_else(|| ApiError::BadRequest("malformatted id".to_string()))
}

fn blog_not_found() -> ApiError {
    ApiError::NotFound("blog not found".to_string())
}

fn blog_with_owner(store: &Store, blog: &Blog) -> anyhow::Result<BlogJson> {
    let owner = match blog.user.as_deref() {
        Some(key) => load_user(store, key)?,
        None => None,
    };
    Ok(blog.to_json(owner.as_ref()))
}

/// Succeeds only when the token's subject is the blog's recorded owner.
/// A blog without an owner belongs to nobody.
pub fn ensure_owner(blog: &Blog, claims: &TokenClaims) -> Result<(), ApiError> {
    match blog.user.as_deref() {
        Some(owner) if same_key(owner, &claims.sub) => Ok(()),
        _ => Err(ApiError::Forbidden(
            "only the creator can delete blogs".to_string(),
        )),
    }
}

pub async fn list_blogs(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let store = &state.store;
    let blogs = load_blogs(store)?;

    let mut owners: HashMap<String, Option<User>> = HashMap::new();
    let mut out = Vec::with_capacity(blogs.len());
    for blog in &blogs {
        let owner = match blog.user.as_deref() {
            Some(key) => {
                if !owners.contains_key(key) {
                    owners.insert(key.to_string(), load_user(store, key)?);
                }
                owners[key].as_ref()
            }
            None => None,
        };
        out.push(blog.to_json(owner));
    }

    Ok(HttpResponse::Ok().json(out))
}

pub async fn get_blog(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_blog_id(&path)?;
    let blog = load_blog(&state.store, &id)?.ok_or_else(blog_not_found)?;

    Ok(HttpResponse::Ok().json(blog_with_owner(&state.store, &blog)?))
}

pub async fn blog_summary(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let blogs = load_blogs(&state.store)?;
    Ok(HttpResponse::Ok().json(list_helper::stats(&blogs)))
}

pub async fn create_blog(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<CreateBlogRequest>,
) -> Result<HttpResponse, ApiError> {
    let claims = validate_token(&req, &state.tokens)?;
    let new_blog = validate_new_blog(body.into_inner())?;
    let store = &state.store;

    let owner = match normalize_key(&claims.sub) {
        Some(key) => load_user(store, &key)?,
        None => None,
    };
    let Some(mut owner) = owner else {
        warn!(user_id = %claims.sub, "token subject has no user record");
        return Err(ApiError::Unauthorized("token invalid".to_string()));
    };

    let blog = Blog {
        key: store.assign_key(),
        title: new_blog.title,
        author: new_blog.author,
        url: new_blog.url,
        likes: new_blog.likes,
        comments: Vec::new(),
        user: Some(owner.key.clone()),
        created_at: now_iso(),
        updated_at: None,
    };
    insert_blog(store, &blog)?;

    owner.blogs.push(blog.key.clone());
    if let Err(err) = save_user(store, &owner) {
        discard_unowned_blog(store, &blog.key);
        return Err(ApiError::InternalError(err));
    }

    info!(blog_id = %blog.key, user_id = %owner.key, "blog created");
    Ok(HttpResponse::Created().json(blog.to_json(Some(&owner))))
}

/// Undo a blog insert whose owner could not be updated.
fn discard_unowned_blog(store: &Store, key: &str) {
    match remove_blog(store, key) {
        Ok(_) => warn!(blog_id = %key, "rolled back blog after owner update failed"),
        Err(err) => error!(
            blog_id = %key,
            error = ?err,
            "rollback failed; blog is stored but missing from its owner's list"
        ),
    }
}

pub async fn update_blog(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateBlogRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_blog_id(&path)?;
    let changes = body.into_inner();
    validate_blog_update(&changes)?;

    let store = &state.store;
    let mut blog = load_blog(store, &id)?.ok_or_else(blog_not_found)?;

    if let Some(title) = changes.title {
        blog.title = title;
    }
    if let Some(url) = changes.url {
        blog.url = url;
    }
    if let Some(author) = changes.author {
        blog.author = Some(author).filter(|a| !a.trim().is_empty());
    }
    if let Some(likes) = changes.likes {
        blog.likes = likes;
    }
    blog.updated_at = Some(now_iso());

    save_blog(store, &blog)?;

    Ok(HttpResponse::Ok().json(blog_with_owner(store, &blog)?))
}

pub async fn delete_blog(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let claims = validate_token(&req, &state.tokens)?;
    let id = parse_blog_id(&path)?;
    let store = &state.store;

    let blog = load_blog(store, &id)?.ok_or_else(blog_not_found)?;
    if let Err(err) = ensure_owner(&blog, &claims) {
        info!(blog_id = %blog.key, user_id = %claims.sub, "delete refused: not owner");
        return Err(err);
    }

    if !remove_blog(store, &blog.key)? {
        return Err(blog_not_found());
    }

    if let Some(owner_key) = blog.user.as_deref() {
        if let Err(err) = detach_from_owner(store, owner_key, &blog.key) {
            warn!(
                blog_id = %blog.key,
                user_id = %owner_key,
                error = ?err,
                "blog deleted but still listed under its owner"
            );
        }
    }

    info!(blog_id = %blog.key, user_id = %claims.sub, "blog deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// Drop `blog` from its owner's list. A stale entry left behind on failure
/// is skipped by the users listing, so the delete itself still stands.
fn detach_from_owner(store: &Store, owner_key: &str, blog: &str) -> anyhow::Result<()> {
    if let Some(mut owner) = load_user(store, owner_key)? {
        owner.blogs.retain(|k| !same_key(k, blog));
        save_user(store, &owner)?;
    }
    Ok(())
}

pub async fn add_comment(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<CommentRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_blog_id(&path)?;
    let comment = validate_comment(body.into_inner())?;

    let store = &state.store;
    let mut blog = load_blog(store, &id)?.ok_or_else(blog_not_found)?;
    blog.comments.push(comment);
    save_blog(store, &blog)?;

    Ok(HttpResponse::Ok().json(blog_with_owner(store, &blog)?))
}
