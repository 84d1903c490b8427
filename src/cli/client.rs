use reqwest::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;
use url::Url;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with an error envelope
    #[error("{message} ({status}, {code})")]
    Api {
        status: StatusCode,
        code: String,
        message: String,
    },

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

/// Thin HTTP client for the account endpoints
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: Url,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(server: &str) -> Result<Self, ClientError> {
        Ok(Self {
            base: Url::parse(server)?,
            http: reqwest::Client::new(),
        })
    }

    /// POST /v1/user/create, returning the new account id
    pub async fn register(&self, email: &str, password: &str) -> Result<Uuid, ClientError> {
        let response = self
            .http
            .post(self.base.join("/v1/user/create")?)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let data = Self::unwrap_envelope(response).await?;
        data["id"]
            .as_str()
            .and_then(|id| Uuid::parse_str(id).ok())
            .ok_or_else(|| ClientError::InvalidResponse(format!("missing account id in {data}")))
    }

    /// POST /v1/user/login, returning the bearer token
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ClientError> {
        let response = self
            .http
            .post(self.base.join("/v1/user/login")?)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let data = Self::unwrap_envelope(response).await?;
        data["token"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ClientError::InvalidResponse("missing token".to_string()))
    }

    /// GET /v1/user/whoami with the given bearer token
    pub async fn whoami(&self, token: &str) -> Result<String, ClientError> {
        let response = self
            .http
            .get(self.base.join("/v1/user/whoami")?)
            .bearer_auth(token)
            .send()
            .await?;

        let data = Self::unwrap_envelope(response).await?;
        data.as_str()
            .map(str::to_string)
            .ok_or_else(|| ClientError::InvalidResponse(format!("expected email string, got {data}")))
    }

    pub async fn health(&self) -> Result<Value, ClientError> {
        let response = self.http.get(self.base.join("/health")?).send().await?;
        Self::unwrap_envelope(response).await
    }

    async fn unwrap_envelope(response: reqwest::Response) -> Result<Value, ClientError> {
        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|_| ClientError::InvalidResponse(format!("server returned {status} with a non-JSON body")))?;

        if status.is_success() && body["success"] == true {
            return Ok(body["data"].clone());
        }

        let message = body["message"]
            .as_str()
            .or_else(|| body["error"].as_str())
            .unwrap_or("request failed")
            .to_string();
        let code = body["code"].as_str().unwrap_or("UNKNOWN").to_string();

        Err(ClientError::Api { status, code, message })
    }
}
