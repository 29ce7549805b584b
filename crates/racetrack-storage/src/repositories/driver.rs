use crate::error::{StorageError, StorageResult};
use crate::models::{Driver, DriverSummary};
use racetrack_core::PageRequest;
use racetrack_core::validation::DriverInput;
use sqlx::SqlitePool;

/// Repository trait for Driver entity operations
///
/// Mutations report the number of affected rows so callers can tell a
/// missing id (zero rows) from success.
///
/// # Implementation Note
///
/// Methods return `Send` futures so they can be awaited from axum handlers;
/// implementations are free to use plain `async fn`.
pub trait DriverRepository: Send + Sync {
    /// All drivers as `{id, full_name}`, ordered by name
    fn find_all(&self) -> impl Future<Output = StorageResult<Vec<DriverSummary>>> + Send;

    /// One page of full driver rows, ordered by name
    fn find_page(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = StorageResult<Vec<Driver>>> + Send;

    /// Total number of drivers
    fn count(&self) -> impl Future<Output = StorageResult<u64>> + Send;

    /// Find a driver by ID
    fn find_by_id(&self, id: i64) -> impl Future<Output = StorageResult<Option<Driver>>> + Send;

    /// Check if a driver exists
    fn exists_by_id(&self, id: i64) -> impl Future<Output = StorageResult<bool>> + Send;

    /// Insert a driver and return its new ID
    fn create(&self, driver: &DriverInput) -> impl Future<Output = StorageResult<i64>> + Send;

    /// Replace every field of a driver
    fn update(
        &self,
        id: i64,
        driver: &DriverInput,
    ) -> impl Future<Output = StorageResult<u64>> + Send;

    /// Delete a driver by ID
    fn delete(&self, id: i64) -> impl Future<Output = StorageResult<u64>> + Send;
}

/// SQLite implementation of DriverRepository
#[derive(Debug, Clone)]
pub struct SqliteDriverRepository {
    pool: SqlitePool,
}

impl SqliteDriverRepository {
    /// Create a new SQLite driver repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl DriverRepository for SqliteDriverRepository {
    async fn find_all(&self) -> StorageResult<Vec<DriverSummary>> {
        let drivers = sqlx::query_as::<_, DriverSummary>(
            "SELECT id, full_name FROM drivers ORDER BY full_name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(drivers)
    }

    async fn find_page(&self, page: PageRequest) -> StorageResult<Vec<Driver>> {
        let drivers = sqlx::query_as::<_, Driver>(
            r#"
            SELECT id, full_name, nationality, license_number, is_active
            FROM drivers
            ORDER BY full_name ASC, id ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(i64::from(page.limit()))
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(drivers)
    }

    async fn count(&self) -> StorageResult<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM drivers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }

    async fn find_by_id(&self, id: i64) -> StorageResult<Option<Driver>> {
        let driver = sqlx::query_as::<_, Driver>(
            r#"
            SELECT id, full_name, nationality, license_number, is_active
            FROM drivers
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(driver)
    }

    async fn exists_by_id(&self, id: i64) -> StorageResult<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM drivers WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    async fn create(&self, driver: &DriverInput) -> StorageResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO drivers (full_name, nationality, license_number, is_active)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&driver.full_name)
        .bind(&driver.nationality)
        .bind(&driver.license_number)
        .bind(driver.is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::from_write(e, "driver"))?;

        Ok(result.last_insert_rowid())
    }

    async fn update(&self, id: i64, driver: &DriverInput) -> StorageResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE drivers
            SET full_name = ?, nationality = ?, license_number = ?, is_active = ?
            WHERE id = ?
            "#,
        )
        .bind(&driver.full_name)
        .bind(&driver.nationality)
        .bind(&driver.license_number)
        .bind(driver.is_active)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::from_write(e, format!("driver {id}")))?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: i64) -> StorageResult<u64> {
        let result = sqlx::query("DELETE FROM drivers WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::from_write(e, format!("driver {id} has results")))?;

        Ok(result.rows_affected())
    }
}
