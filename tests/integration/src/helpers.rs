//! Test helpers for integration tests
//!
//! Provides a TCP test server, one-shot requests against a router, and
//! status/body assertions.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::ServiceExt;
use user_api::{create_app, create_app_state};
use user_common::{try_init_tracing, AppConfig};
use user_db::{create_pool, run_migrations, DatabaseConfig};

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server backed by the database and cache named in the environment
    pub async fn start() -> Result<Self> {
        let _ = try_init_tracing();
        let config = test_config()?;
        migrate(&config).await?;
        Self::start_with_config(config).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_app_state(config).await?;
        Self::serve(create_app(state)).await
    }

    /// Serve an already built router on an ephemeral port
    pub async fn serve(app: Router) -> Result<Self> {
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            addr,
            client,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).json(body).send().await?)
    }
}

/// Create a test configuration
pub fn test_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();
    AppConfig::from_env().map_err(|e| anyhow::anyhow!("Config error: {}", e))
}

/// Apply the schema migrations to the configured database
pub async fn migrate(config: &AppConfig) -> Result<()> {
    let pool = create_pool(&DatabaseConfig::from(&config.database)).await?;
    run_migrations(&pool).await?;
    pool.close().await;
    Ok(())
}

/// Helper to check if test environment is available
pub async fn check_test_env() -> bool {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return false;
    }

    if std::env::var("REDIS_URL").is_err() {
        eprintln!("Skipping test: REDIS_URL not set");
        return false;
    }

    true
}

/// Response captured from a one-shot router call
#[derive(Debug)]
pub struct OneshotResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl OneshotResponse {
    /// Header value as text, if present
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Parse the body, failing with the raw text when the status is unexpected
    pub fn json<T: DeserializeOwned>(&self, expected_status: StatusCode) -> Result<T> {
        if self.status != expected_status {
            anyhow::bail!(
                "Expected status {}, got {}. Body: {}",
                expected_status,
                self.status,
                String::from_utf8_lossy(&self.body)
            );
        }
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Send one request through a clone of `app` without binding a socket
pub async fn oneshot(app: &Router, request: Request<Body>) -> Result<OneshotResponse> {
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;

    Ok(OneshotResponse {
        status,
        headers,
        body: body.to_vec(),
    })
}

/// One-shot GET
pub async fn oneshot_get(app: &Router, uri: &str) -> Result<OneshotResponse> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())?;
    oneshot(app, request).await
}

/// One-shot POST with a raw JSON body
pub async fn oneshot_post_raw(app: &Router, uri: &str, body: impl Into<Body>) -> Result<OneshotResponse> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())?;
    oneshot(app, request).await
}

/// One-shot POST serializing `body` as JSON
pub async fn oneshot_post<T: Serialize>(app: &Router, uri: &str, body: &T) -> Result<OneshotResponse> {
    oneshot_post_raw(app, uri, serde_json::to_vec(body)?).await
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(())
}
