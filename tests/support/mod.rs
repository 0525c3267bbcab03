#![allow(dead_code)]

use std::net::TcpListener;

use actix_web::web;
use bloglist::config::Config;
use bloglist::core::db::{load_blogs, load_users, reset, seed_demo_data};
use bloglist::core::store::Store;
use bloglist::models::{Blog, User};
use bloglist::AppState;
use serde_json::json;

pub struct TestApp {
    pub address: String,
    pub store: Store,
    pub client: reqwest::Client,
}

pub async fn spawn_app() -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let store = Store::open_in_memory();
    let config = Config::with_secret("integration-secret");
    let state = web::Data::new(AppState::new(&config, store.clone()));

    let server = bloglist::run(listener, state).expect("Failed to start server");
    tokio::spawn(server);

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        store,
        client: reqwest::Client::new(),
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.address, path)
    }

    pub fn blogs_in_db(&self) -> Vec<Blog> {
        load_blogs(&self.store).unwrap()
    }

    pub fn users_in_db(&self) -> Vec<User> {
        load_users(&self.store).unwrap()
    }

    /// Empty the store and load the demo user and blogs again.
    pub fn reset_to_demo_data(&self) {
        reset(&self.store).unwrap();
        seed_demo_data(&self.store).unwrap();
    }

    pub async fn create_user(&self, username: &str, name: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/users"))
            .json(&json!({
                "username": username,
                "name": name,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to create user")
    }

    /// Register `username` and return a token for it.
    pub async fn signed_in(&self, username: &str, password: &str) -> String {
        let resp = self.create_user(username, username, password).await;
        assert_eq!(resp.status(), 200);

        let login_resp = self
            .client
            .post(self.url("/login"))
            .json(&json!({
                "username": username,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to login");

        assert_eq!(login_resp.status(), 200);
        let token_data = login_resp.json::<serde_json::Value>().await.unwrap();
        token_data["token"].as_str().expect("token in login response").to_string()
    }

    pub async fn create_blog(&self, token: Option<&str>, body: serde_json::Value) -> reqwest::Response {
        let mut req = self.client.post(self.url("/blogs")).json(&body);
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }
        req.send().await.expect("Failed to create blog")
    }

    pub async fn delete_blog(&self, token: Option<&str>, id: &str) -> reqwest::Response {
        let mut req = self.client.delete(self.url(&format!("/blogs/{}", id)));
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }
        req.send().await.expect("Failed to delete blog")
    }
}
