//! Test helpers for integration tests
//!
//! Spawns the API on an ephemeral port over the in-memory store and wraps
//! `reqwest` calls that carry the gateway identity headers.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use gamehub_api::{create_app, create_app_state, AppState};
use gamehub_common::AppConfig;
use gamehub_core::traits::{DocumentStore, WriteBatch};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    state: AppState,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server over a fresh in-memory store
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()?).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_app_state(config).await?;
        let app = create_app(state.clone());

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            gamehub_api::serve(app, listener).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            state,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Document store behind the server
    pub fn store(&self) -> &dyn DocumentStore {
        self.state.service_context().store()
    }

    /// Write a document directly, bypassing the API
    pub async fn seed(&self, path: &str, data: serde_json::Value) -> Result<()> {
        let mut batch = WriteBatch::new();
        batch.set(path, data);
        self.store().commit(batch).await?;
        Ok(())
    }

    /// Create an admin profile for `user_id`
    pub async fn seed_admin(&self, user_id: &str) -> Result<()> {
        self.seed(
            &format!("users/{user_id}"),
            serde_json::json!({
                "uid": user_id,
                "name": "Admin",
                "email": "admin@example.com",
                "role": "admin",
                "reviewsCount": 0,
            }),
        )
        .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url(), path)
    }

    fn as_user(builder: RequestBuilder, user_id: &str) -> RequestBuilder {
        builder.header("x-user-id", user_id)
    }

    /// GET a root-level path without identity
    pub async fn get_raw(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// GET an API path without identity
    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    /// GET as `user_id`
    pub async fn get_as(&self, path: &str, user_id: &str) -> Result<Response> {
        Ok(Self::as_user(self.client.get(self.url(path)), user_id)
            .send()
            .await?)
    }

    /// POST a JSON body as `user_id`
    pub async fn post_as<T: Serialize>(
        &self,
        path: &str,
        user_id: &str,
        body: &T,
    ) -> Result<Response> {
        Ok(Self::as_user(self.client.post(self.url(path)), user_id)
            .json(body)
            .send()
            .await?)
    }

    /// POST without a body as `user_id`
    pub async fn post_empty_as(&self, path: &str, user_id: &str) -> Result<Response> {
        Ok(Self::as_user(self.client.post(self.url(path)), user_id)
            .send()
            .await?)
    }

    /// PATCH a JSON body as `user_id`
    pub async fn patch_as<T: Serialize>(
        &self,
        path: &str,
        user_id: &str,
        body: &T,
    ) -> Result<Response> {
        Ok(Self::as_user(self.client.patch(self.url(path)), user_id)
            .json(body)
            .send()
            .await?)
    }

    /// PUT a JSON body as `user_id`
    pub async fn put_as<T: Serialize>(
        &self,
        path: &str,
        user_id: &str,
        body: &T,
    ) -> Result<Response> {
        Ok(Self::as_user(self.client.put(self.url(path)), user_id)
            .json(body)
            .send()
            .await?)
    }

    /// PUT without a body as `user_id`
    pub async fn put_empty_as(&self, path: &str, user_id: &str) -> Result<Response> {
        Ok(Self::as_user(self.client.put(self.url(path)), user_id)
            .send()
            .await?)
    }

    /// DELETE as `user_id`
    pub async fn delete_as(&self, path: &str, user_id: &str) -> Result<Response> {
        Ok(Self::as_user(self.client.delete(self.url(path)), user_id)
            .send()
            .await?)
    }
}

/// Test configuration: in-memory store, generous rate limit, fast retries
pub fn test_config() -> Result<AppConfig> {
    let config = AppConfig::from_lookup(|key| {
        let value = match key {
            "API_PORT" => "0",
            "STORE_BACKEND" => "memory",
            "RATE_LIMIT_REQUESTS_PER_SECOND" => "10000",
            "RATE_LIMIT_BURST" => "10000",
            "TX_MAX_ATTEMPTS" => "100",
            "TX_BASE_BACKOFF_MS" => "1",
            "TX_MAX_BACKOFF_MS" => "10",
            _ => return None,
        };
        Some(value.to_string())
    })
    .map_err(|e| anyhow::anyhow!("Config error: {e}"))?;

    Ok(config)
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}

/// Assert an error response and return its `error.code`
pub async fn assert_error(response: Response, expected_status: StatusCode) -> Result<String> {
    let body: serde_json::Value = assert_json(response, expected_status).await?;
    Ok(body["error"]["code"].as_str().unwrap_or_default().to_string())
}
