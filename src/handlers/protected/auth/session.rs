use axum::extract::{Extension, State};

use crate::app::AppState;
use crate::auth::AuthUser;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /v1/user/whoami - Email of the authenticated user
///
/// Requires `Authorization: Bearer <token>`; the header is consumed by the
/// auth middleware, not by this handler.
///
/// Expected Output:
/// ```json
/// {
///   "success": true,
///   "data": "user@test.com"
/// }
/// ```
pub async fn whoami(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<String> {
    Ok(ApiResponse::success(state.auth.whoami(&user)))
}
