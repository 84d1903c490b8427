pub mod directory;
pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;

pub use directory::{DirectoryError, UserDirectory};
pub use manager::DatabaseManager;
pub use memory::MemoryUserDirectory;
pub use models::{normalize_email, NewUser, User};
pub use postgres::PgUserDirectory;
