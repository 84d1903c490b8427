// handlers/public/auth/mod.rs - Public account handlers
//
// Account creation and token acquisition. Neither requires a token.

pub mod session; // POST /v1/user/login - authenticate and get JWT
pub mod user;    // POST /v1/user/create - create new account

pub use session::login as session_login;
pub use user::register as user_register;
