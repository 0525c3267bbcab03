use tracing::info;

use crate::config::{blog_key, user_key, BLOGS_LIST_KEY, USERS_LIST_KEY};
use crate::core::helpers::{hash_password, now_iso};
use crate::core::store::Store;
use crate::models::{Blog, User};

pub const DEMO_USERNAME: &str = "root";
pub const DEMO_PASSWORD: &str = "sekrit";

const DEMO_BLOGS: [(&str, &str, &str, u64); 6] = [
    ("React patterns", "Michael Chan", "https://reactpatterns.com/", 7),
    (
        "Go To Statement Considered Harmful",
        "Edsger W. Dijkstra",
        "http://www.u.arizona.edu/~rubinson/copyright_violations/Go_To_Considered_Harmful.html",
        5,
    ),
    (
        "Canonical string reduction",
        "Edsger W. Dijkstra",
        "http://www.cs.utexas.edu/~EWD/transcriptions/EWD08xx/EWD808.html",
        12,
    ),
    (
        "First class tests",
        "Robert C. Martin",
        "http://blog.cleancoder.com/uncle-bob/2017/05/05/TestDefinitions.htmll",
        10,
    ),
    (
        "TDD harms architecture",
        "Robert C. Martin",
        "http://blog.cleancoder.com/uncle-bob/2017/03/03/TDD-Harms-Architecture.html",
        0,
    ),
    (
        "Type wars",
        "Robert C. Martin",
        "http://blog.cleancoder.com/uncle-bob/2016/05/01/TypeWars.html",
        2,
    ),
];

pub fn load_user(store: &Store, key: &str) -> anyhow::Result<Option<User>> {
    store.get_json(&user_key(key))
}

pub fn load_blog(store: &Store, key: &str) -> anyhow::Result<Option<Blog>> {
    store.get_json(&blog_key(key))
}

/// All users in registration order. Index entries whose document has gone
/// missing are skipped.
pub fn load_users(store: &Store) -> anyhow::Result<Vec<User>> {
    let ids: Vec<String> = store.get_json(USERS_LIST_KEY)?.unwrap_or_default();
    let mut users = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(u) = load_user(store, &id)? {
            users.push(u);
        }
    }
    Ok(users)
}

/// All blogs in creation order.
pub fn load_blogs(store: &Store) -> anyhow::Result<Vec<Blog>> {
    let ids: Vec<String> = store.get_json(BLOGS_LIST_KEY)?.unwrap_or_default();
    let mut blogs = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(b) = load_blog(store, &id)? {
            blogs.push(b);
        }
    }
    Ok(blogs)
}

pub fn find_user_by_username(store: &Store, username: &str) -> anyhow::Result<Option<User>> {
    Ok(load_users(store)?.into_iter().find(|u| u.username == username))
}

pub fn save_user(store: &Store, user: &User) -> anyhow::Result<()> {
    store.set_json(&user_key(&user.key), user)
}

pub fn save_blog(store: &Store, blog: &Blog) -> anyhow::Result<()> {
    store.set_json(&blog_key(&blog.key), blog)
}

/// Store a new user document and add it to the users index.
pub fn insert_user(store: &Store, user: &User) -> anyhow::Result<()> {
    save_user(store, user)?;
    let mut users: Vec<String> = store.get_json(USERS_LIST_KEY)?.unwrap_or_default();
    users.push(user.key.clone());
    store.set_json(USERS_LIST_KEY, &users)
}

/// Store a new blog document and add it to the blogs index.
pub fn insert_blog(store: &Store, blog: &Blog) -> anyhow::Result<()> {
    save_blog(store, blog)?;
    let mut blogs: Vec<String> = store.get_json(BLOGS_LIST_KEY)?.unwrap_or_default();
    blogs.push(blog.key.clone());
    store.set_json(BLOGS_LIST_KEY, &blogs)
}

/// Remove a blog document and its index entry. Returns `false` when the
/// document was already gone; the index is cleaned either way.
pub fn remove_blog(store: &Store, key: &str) -> anyhow::Result<bool> {
    let removed = store.delete(&blog_key(key))?;
    let mut blogs: Vec<String> = store.get_json(BLOGS_LIST_KEY)?.unwrap_or_default();
    blogs.retain(|id| id != key);
    store.set_json(BLOGS_LIST_KEY, &blogs)?;
    Ok(removed)
}

pub fn seed_demo_data(store: &Store) -> anyhow::Result<()> {
    if find_user_by_username(store, DEMO_USERNAME)?.is_some() {
        return Ok(()); // Already initialized
    }

    let mut root = User {
        key: store.assign_key(),
        username: DEMO_USERNAME.to_string(),
        name: "Superuser".to_string(),
        password_hash: hash_password(DEMO_PASSWORD)?,
        blogs: Vec::new(),
        created_at: now_iso(),
    };

    for (title, author, url, likes) in DEMO_BLOGS {
        let blog = Blog {
            key: store.assign_key(),
            title: title.to_string(),
            author: Some(author.to_string()),
            url: url.to_string(),
            likes,
            comments: Vec::new(),
            user: Some(root.key.clone()),
            created_at: now_iso(),
            updated_at: None,
        };
        insert_blog(store, &blog)?;
        root.blogs.push(blog.key);
    }

    insert_user(store, &root)?;
    info!(blogs = root.blogs.len(), "seeded demo data");
    Ok(())
}

pub fn reset(store: &Store) -> anyhow::Result<()> {
    let users: Vec<String> = store.get_json(USERS_LIST_KEY)?.unwrap_or_default();
    for id in &users {
        store.delete(&user_key(id))?;
    }

    let blogs: Vec<String> = store.get_json(BLOGS_LIST_KEY)?.unwrap_or_default();
    for id in &blogs {
        store.delete(&blog_key(id))?;
    }

    store.delete(USERS_LIST_KEY)?;
    store.delete(BLOGS_LIST_KEY)?;

    Ok(())
}
