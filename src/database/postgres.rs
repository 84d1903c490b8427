use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::directory::{DirectoryError, UserDirectory};
use super::models::{NewUser, User};

/// Postgres-backed directory. Uniqueness comes from the `users_email_key` constraint.
#[derive(Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Vec<User>, DirectoryError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn create(&self, user: NewUser) -> Result<User, DirectoryError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, password)
            VALUES ($1, $2, $3)
            RETURNING id, email, password, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.email)
        .bind(&user.password)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)
    }

    async fn health_check(&self) -> Result<(), DirectoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn map_insert_error(err: sqlx::Error) -> DirectoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return DirectoryError::Conflict;
        }
    }
    DirectoryError::Sqlx(err)
}
