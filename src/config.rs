use std::net::SocketAddr;

use clap::Parser;

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MIN_PASSWORD_LENGTH: usize = 3;
pub const MAX_COMMENT_LENGTH: usize = 1000;
/// Ten years.
pub const MAX_TOKEN_EXPIRATION_HOURS: i64 = 87_600;

pub const USERS_LIST_KEY: &str = "users_list";
pub const BLOGS_LIST_KEY: &str = "blogs_list";

pub fn user_key(id: &str) -> String {
    format!("user:{}", id)
}

pub fn blog_key(id: &str) -> String {
    format!("blog:{}", id)
}

/// Runtime settings for the server, read from the command line or the
/// environment and handed to [`crate::AppState::new`] at startup.
#[derive(Debug, Clone, Parser)]
#[command(name = "bloglist", version, about = "Blog list REST API")]
pub struct Config {
    /// Address the HTTP server binds to.
    #[arg(long, env = "BLOGLIST_BIND", default_value = "127.0.0.1:3003")]
    pub bind: SocketAddr,

    /// Secret used to sign and verify bearer tokens.
    #[arg(long, env = "BLOGLIST_SECRET", hide_env_values = true)]
    pub secret: String,

    /// Lifetime of issued tokens. Tokens never expire when unset.
    #[arg(
        long,
        env = "BLOGLIST_TOKEN_EXPIRATION_HOURS",
        value_parser = clap::value_parser!(i64).range(1..=MAX_TOKEN_EXPIRATION_HOURS)
    )]
    pub token_expiration_hours: Option<i64>,

    /// Populate the store with a demo user and blogs on startup.
    #[arg(long, env = "BLOGLIST_SEED", default_value_t = false)]
    pub seed: bool,
}

impl Config {
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3003)),
            secret: secret.into(),
            token_expiration_hours: None,
            seed: false,
        }
    }
}
