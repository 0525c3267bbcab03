use std::collections::HashSet;

use ammonia::Builder;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use html_escape::decode_html_entities;
use rand::rngs::OsRng;
use uuid::Uuid;

pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Canonical form of a document key: the simple (unhyphenated, lowercase)
/// UUID rendering. `None` when the input is not a UUID at all.
pub fn normalize_key(id: &str) -> Option<String> {
    Uuid::parse_str(id.trim())
        .ok()
        .map(|uuid| uuid.simple().to_string())
}

/// Compare two identifiers that may be rendered differently, e.g. a stored
/// key against the subject of a token.
pub fn same_key(a: &str, b: &str) -> bool {
    match (normalize_key(a), normalize_key(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Strip all markup, leaving plain text. Entities written by ammonia are
/// decoded again, so `&` and `<` stay literal.
pub fn sanitize_text(text: &str) -> String {
    let cleaned = Builder::default().tags(HashSet::new()).clean(text).to_string();
    decode_html_entities(&cleaned).into_owned()
}
