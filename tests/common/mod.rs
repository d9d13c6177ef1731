#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use mygram::auth::{PasswordHasher, TokenService};
use mygram::database::MemoryStore;
use mygram::{app, AppState};

pub const PASSWORD: &str = "pw123456";

/// Router over a fresh in-memory store. Each test builds its own.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState::new(
            Arc::new(MemoryStore::new()),
            TokenService::new("integration-secret", 24),
            // Minimum bcrypt cost keeps the suite fast
            PasswordHasher::new(4),
        );
        let router = app(state.clone());
        Self { router, state }
    }

    pub async fn send(&self, request: Request<Body>) -> Result<(StatusCode, Value)> {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .context("router failed")?;

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        Ok((status, body))
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.request(Method::DELETE, uri, token, None).await
    }

    pub async fn register(&self, username: &str, email: &str) -> Result<Value> {
        let (status, body) = self
            .post(
                "/users/register",
                None,
                json!({
                    "username": username,
                    "email": email,
                    "password": PASSWORD,
                    "age": 25,
                }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "register returned {}: {}", status, body);
        Ok(body)
    }

    pub async fn login(&self, email: &str) -> Result<String> {
        let (status, body) = self
            .post("/users/login", None, json!({ "email": email, "password": PASSWORD }))
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "login returned {}: {}", status, body);
        body["token"]
            .as_str()
            .map(str::to_string)
            .context("login response has no token")
    }

    /// Register then log in; returns (user id, token).
    pub async fn signup(&self, username: &str) -> Result<(i64, String)> {
        let email = format!("{}@example.com", username);
        let user = self.register(username, &email).await?;
        let token = self.login(&email).await?;
        let id = user["id"].as_i64().context("user has no id")?;
        Ok((id, token))
    }

    pub async fn create_photo(&self, token: &str, title: &str) -> Result<Value> {
        let (status, body) = self
            .post(
                "/photos",
                Some(token),
                json!({
                    "title": title,
                    "caption": "caption",
                    "photo_url": format!("https://img.example.com/{}.jpg", title),
                }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create photo returned {}: {}", status, body);
        Ok(body)
    }
}
