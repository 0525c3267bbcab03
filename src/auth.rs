use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use tracing::{debug, info};

use crate::core::db::find_user_by_username;
use crate::core::errors::ApiError;
use crate::core::helpers::{sanitize_text, verify_password};
use crate::models::LoginJson;
use crate::token::{TokenClaims, TokenService};
use crate::validation::LoginRequest;
use crate::AppState;

/// The token from an `Authorization: Bearer <token>` header, if any.
pub fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

pub fn validate_token(req: &HttpRequest, tokens: &TokenService) -> Result<TokenClaims, ApiError> {
    tokens.verify(bearer_token(req)).map_err(|err| {
        debug!(error = %err, path = %req.path(), "rejected bearer token");
        ApiError::Unauthorized(err.to_string())
    })
}

pub async fn login_user(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let LoginRequest { username, password } = body.into_inner();
    let username = sanitize_text(&username);

    let verified = match find_user_by_username(&state.store, &username)? {
        Some(user) => {
            let hash = user.password_hash.clone();
            let ok = web::block(move || verify_password(&password, &hash)).await?;
            ok.then_some(user)
        }
        None => None,
    };

    let Some(user) = verified else {
        info!(%username, "login rejected");
        return Err(ApiError::Unauthorized(
            "invalid username or password".to_string(),
        ));
    };

    let token = state
        .tokens
        .issue(&user)
        .map_err(|e| ApiError::InternalError(e.into()))?;

    info!(user_id = %user.key, "user logged in");
    Ok(HttpResponse::Ok().json(LoginJson {
        token,
        username: user.username,
        name: user.name,
    }))
}
