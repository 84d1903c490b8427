#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use user_api_rust::app::{app, AppState};
use user_api_rust::cache::{MokaSessionCache, SessionCache};
use user_api_rust::config::{AppConfig, Environment};
use user_api_rust::database::MemoryUserDirectory;

pub const TEST_SECRET: &str = "integration-secret";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub directory: Arc<MemoryUserDirectory>,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url("/v1/user/create"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url("/v1/user/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?)
    }

    /// Log in and pull the token out of the success envelope
    pub async fn token_for(&self, email: &str, password: &str) -> Result<String> {
        let res = self.login(email, password).await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
        let body: Value = res.json().await?;
        body["data"]["token"]
            .as_str()
            .map(str::to_string)
            .context("login response carried no token")
    }

    pub async fn whoami(&self, token: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .get(self.url("/v1/user/whoami"))
            .bearer_auth(token)
            .send()
            .await?)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

/// Development profile with a fixed secret and the cheapest bcrypt cost
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::for_environment(Environment::Development);
    config.security.jwt_secret = TEST_SECRET.to_string();
    config.security.bcrypt_cost = 4;
    config.session.ttl_ms = 200;
    config.session.timeout_ms = 100;
    config.api.enable_request_logging = false;
    config
}

pub async fn spawn_server() -> Result<TestServer> {
    spawn_server_with(test_config(), Arc::new(MokaSessionCache::new(1_000))).await
}

/// Serve the app on an unused port with an in-memory directory
pub async fn spawn_server_with(config: AppConfig, cache: Arc<dyn SessionCache>) -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let directory = Arc::new(MemoryUserDirectory::new());
    let state = AppState::new(config, directory.clone(), cache);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind port {}", port))?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app(state)).await;
    });

    let server = TestServer {
        port,
        base_url,
        directory,
        client: reqwest::Client::new(),
    };
    server.wait_ready(Duration::from_secs(5)).await?;
    Ok(server)
}
