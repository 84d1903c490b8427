use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::app::AppState;
use crate::auth::{LoginRequest, LoginResponse};
use crate::middleware::{ApiResponse, ApiResult};

/// POST /v1/user/login - Authenticate user and receive JWT token
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
///   "data": {
///     "token": "eyJhbGciOiJIUzI1NiI..."
///   }
/// }
/// ```
///
/// Unknown email, wrong password and ambiguous accounts all answer
/// `401 UNAUTHORIZED` with the same message.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let Json(request) = payload?;
    let response = state.auth.login(&request).await?;
    Ok(ApiResponse::success(response))
}
