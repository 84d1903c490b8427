// handlers/mod.rs - Handlers grouped by security tier
//
// Public (no auth) → Protected (bearer JWT resolved by middleware::auth)
pub mod protected; // Requires an authenticated identity
pub mod public;    // Token acquisition and account creation
