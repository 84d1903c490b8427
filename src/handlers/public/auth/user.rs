use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::app::AppState;
use crate::auth::{CreatedUser, LoginRequest};
use crate::middleware::{ApiResponse, ApiResult};

/// POST /v1/user/create - Register new user account
///
/// Expected Input:
/// ```json
/// {
///   "email": "user@test.com",
///   "password": "string"
/// }
/// ```
///
/// Expected Output (Success):
/// ```json
/// {
///   "success": true,
///   "data": { "id": "user_uuid" }
/// }
/// ```
///
/// Errors:
/// - 400 Bad Request: malformed JSON, invalid email or empty password
/// - 409 Conflict: an account with that email already exists
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<CreatedUser> {
    let Json(request) = payload?;
    let created = state.auth.register(&request).await?;
    Ok(ApiResponse::success(created))
}
