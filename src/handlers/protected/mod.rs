// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every route here sits behind middleware::auth::jwt_auth_middleware, which
// injects the resolved AuthUser into request extensions.
pub mod auth;
