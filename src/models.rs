//! Stored documents and the JSON shapes the API returns for them.
//!
//! Documents keep their store key under `_id`. Only the `*Json` views are
//! ever serialized into responses, and those expose the key as `id`.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct User {
    #[serde(rename = "_id")]
    pub key: String,
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "passwordHash")]
    pub password_hash: String,
    #[serde(default)]
    pub blogs: Vec<String>,
    pub created_at: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Blog {
    #[serde(rename = "_id")]
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    pub url: String,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: Vec<String>,
    /// Key of the owning user; `None` until assigned.
    #[serde(default)]
    pub user: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct OwnerSummary {
    pub id: String,
    pub username: String,
    pub name: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BlogJson {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: u64,
    pub comments: Vec<String>,
    pub user: Option<OwnerSummary>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BlogSummary {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: u64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct UserJson {
    pub id: String,
    pub username: String,
    pub name: String,
    pub blogs: Vec<BlogSummary>,
}

#[derive(Serialize, Debug)]
pub struct LoginJson {
    pub token: String,
    pub username: String,
    pub name: String,
}

impl User {
    pub fn owner_summary(&self) -> OwnerSummary {
        OwnerSummary {
            id: self.key.clone(),
            username: self.username.clone(),
            name: self.name.clone(),
        }
    }

    pub fn to_json(&self, blogs: Vec<BlogSummary>) -> UserJson {
        UserJson {
            id: self.key.clone(),
            username: self.username.clone(),
            name: self.name.clone(),
            blogs,
        }
    }
}

impl Blog {
    pub fn to_json(&self, owner: Option<&User>) -> BlogJson {
        BlogJson {
            id: self.key.clone(),
            title: self.title.clone(),
            author: self.author.clone(),
            url: self.url.clone(),
            likes: self.likes,
            comments: self.comments.clone(),
            user: owner.map(User::owner_summary),
        }
    }

    pub fn summary(&self) -> BlogSummary {
        BlogSummary {
            id: self.key.clone(),
            title: self.title.clone(),
            author: self.author.clone(),
            url: self.url.clone(),
            likes: self.likes,
        }
    }
}
