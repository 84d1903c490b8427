pub mod error;
pub mod models;
pub mod password;
pub mod service;
pub mod token;
pub mod validation;

pub use error::{AuthError, AuthResult};
pub use models::{AuthUser, CreatedUser, LoginRequest, LoginResponse};
pub use password::PasswordHasher;
pub use service::AuthService;
pub use token::{Claims, TokenIssuer};
