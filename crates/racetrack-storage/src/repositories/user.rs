use crate::error::{StorageError, StorageResult};
use crate::models::{NewUser, User};
use sqlx::SqlitePool;

/// Repository trait for user accounts
///
/// Usernames are unique; inserting a taken one fails with
/// [`StorageError::Duplicate`].
pub trait UserRepository: Send + Sync {
    /// Find a user by username (exact, case-sensitive match)
    fn find_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = StorageResult<Option<User>>> + Send;

    /// Find a user by ID
    fn find_by_id(&self, id: i64) -> impl Future<Output = StorageResult<Option<User>>> + Send;

    /// Check if a username is already taken
    fn exists_by_username(&self, username: &str)
    -> impl Future<Output = StorageResult<bool>> + Send;

    /// Number of accounts holding the admin role
    fn count_admins(&self) -> impl Future<Output = StorageResult<u64>> + Send;

    /// Insert a user and return its new ID
    fn create(&self, user: &NewUser) -> impl Future<Output = StorageResult<i64>> + Send;
}

/// SQLite implementation of UserRepository
#[derive(Debug, Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    /// Create a new SQLite user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl UserRepository for SqliteUserRepository {
    async fn find_by_username(&self, username: &str) -> StorageResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, role, created_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> StorageResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, role, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn exists_by_username(&self, username: &str) -> StorageResult<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    async fn count_admins(&self) -> StorageResult<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE role = 'admin'")
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }

    async fn create(&self, user: &NewUser) -> StorageResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, role)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::from_write(e, format!("username {}", user.username)))?;

        Ok(result.last_insert_rowid())
    }
}
