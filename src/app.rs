use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::auth::AuthService;
use crate::cache::{MokaSessionCache, SessionCache};
use crate::config::{AppConfig, Environment, SecurityConfig};
use crate::database::{DatabaseManager, MemoryUserDirectory, PgUserDirectory, UserDirectory};
use crate::error::ApiError;
use crate::handlers;
use crate::middleware::jwt_auth_middleware;

/// Shared handler state, wired explicitly at startup
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub directory: Arc<dyn UserDirectory>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig, directory: Arc<dyn UserDirectory>, cache: Arc<dyn SessionCache>) -> Self {
        let auth = AuthService::new(directory.clone(), cache, &config);

        Self {
            auth: Arc::new(auth),
            directory,
            config: Arc::new(config),
        }
    }

    /// Postgres directory when `DATABASE_URL` is configured, in-memory otherwise
    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let directory: Arc<dyn UserDirectory> = if config.database.url.is_some() {
            let pool = DatabaseManager::connect(&config.database).await?;
            Arc::new(PgUserDirectory::new(pool))
        } else {
            tracing::warn!("DATABASE_URL not set; accounts are kept in memory and lost on restart");
            Arc::new(MemoryUserDirectory::new())
        };

        let cache = Arc::new(MokaSessionCache::new(config.session.max_capacity));

        Ok(Self::new(config, directory, cache))
    }
}

pub fn app(state: AppState) -> Router {
    let api = &state.config.api;
    let request_timeout = Duration::from_secs(api.request_timeout_secs);
    let body_limit = api.max_request_size_bytes;
    let cors = cors_layer(&state.config.environment, &state.config.security);
    let request_logging = api.enable_request_logging;

    let router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Public account routes
        .merge(user_public_routes())
        // Protected account routes
        .merge(user_routes(state.clone()))
        .fallback(not_found)
        // Global middleware
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::map_response(json_timeout))
        .layer(cors);

    let router = if request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

fn user_public_routes() -> Router<AppState> {
    use handlers::public::auth;

    Router::new()
        .route("/v1/user/create", post(auth::user_register))
        .route("/v1/user/login", post(auth::session_login))
}

fn user_routes(state: AppState) -> Router<AppState> {
    use handlers::protected::auth;

    Router::new()
        .route("/v1/user/whoami", get(auth::session_whoami))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(environment: &Environment, security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if *environment == Environment::Development {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "User API (Rust)",
            "version": version,
            "description": "Account registration, login and identity check",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "create": "POST /v1/user/create (public)",
                "login": "POST /v1/user/login (public - token acquisition)",
                "whoami": "GET /v1/user/whoami (protected - Authorization: Bearer <token>)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.directory.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "directory": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "directory unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}

/// `TimeoutLayer` answers with a bare 408; give it the standard error body
async fn json_timeout(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        return ApiError::request_timeout("Request timed out").into_response();
    }
    response
}

async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
