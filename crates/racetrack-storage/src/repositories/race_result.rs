use crate::error::{StorageError, StorageResult};
use crate::models::{RaceResult, ResultRow};
use racetrack_core::PageRequest;
use racetrack_core::validation::ResultInput;
use sqlx::SqlitePool;

/// Repository trait for race results, keyed by `(race_id, driver_id)`.
///
/// Nothing here checks that the race or driver exists; callers do that
/// first. The schema's foreign keys and composite primary key are the
/// backstop, surfacing as [`StorageError::Constraint`] and
/// [`StorageError::Duplicate`].
pub trait ResultRepository: Send + Sync {
    /// One page of results joined with race and driver, newest race first,
    /// then by finish position with DNFs last
    fn find_page(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = StorageResult<Vec<ResultRow>>> + Send;

    /// Total number of results
    fn count(&self) -> impl Future<Output = StorageResult<u64>> + Send;

    /// Find one result by its composite key
    fn find(
        &self,
        race_id: i64,
        driver_id: i64,
    ) -> impl Future<Output = StorageResult<Option<RaceResult>>> + Send;

    /// Check whether a result is already recorded for the pair
    fn exists(
        &self,
        race_id: i64,
        driver_id: i64,
    ) -> impl Future<Output = StorageResult<bool>> + Send;

    /// Insert a result and return its row ID
    fn create(&self, result: &ResultInput) -> impl Future<Output = StorageResult<i64>> + Send;

    /// Replace finish position and car model of an existing result
    fn update(
        &self,
        race_id: i64,
        driver_id: i64,
        finish_position: Option<i64>,
        car_model: &str,
    ) -> impl Future<Output = StorageResult<u64>> + Send;

    /// Delete a result by its composite key
    fn delete(
        &self,
        race_id: i64,
        driver_id: i64,
    ) -> impl Future<Output = StorageResult<u64>> + Send;

    /// Number of results recorded for a race
    fn count_for_race(&self, race_id: i64) -> impl Future<Output = StorageResult<u64>> + Send;

    /// Number of results recorded for a driver
    fn count_for_driver(&self, driver_id: i64)
    -> impl Future<Output = StorageResult<u64>> + Send;
}

/// SQLite implementation of ResultRepository
#[derive(Debug, Clone)]
pub struct SqliteResultRepository {
    pool: SqlitePool,
}

impl SqliteResultRepository {
    /// Create a new SQLite result repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ResultRepository for SqliteResultRepository {
    async fn find_page(&self, page: PageRequest) -> StorageResult<Vec<ResultRow>> {
        let rows = sqlx::query_as::<_, ResultRow>(
            r#"
            SELECT rr.race_id, rr.driver_id, rr.finish_position, rr.car_model,
                   r.track_name, r.race_date, d.full_name
            FROM race_results rr
            JOIN races r ON rr.race_id = r.id
            JOIN drivers d ON rr.driver_id = d.id
            ORDER BY r.race_date DESC,
                     rr.finish_position IS NULL,
                     rr.finish_position ASC,
                     d.full_name ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(i64::from(page.limit()))
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn count(&self) -> StorageResult<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM race_results")
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }

    async fn find(&self, race_id: i64, driver_id: i64) -> StorageResult<Option<RaceResult>> {
        let result = sqlx::query_as::<_, RaceResult>(
            r#"
            SELECT race_id, driver_id, finish_position, car_model
            FROM race_results
            WHERE race_id = ? AND driver_id = ?
            "#,
        )
        .bind(race_id)
        .bind(driver_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    async fn exists(&self, race_id: i64, driver_id: i64) -> StorageResult<bool> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT 1 FROM race_results WHERE race_id = ? AND driver_id = ?")
                .bind(race_id)
                .bind(driver_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.is_some())
    }

    async fn create(&self, result: &ResultInput) -> StorageResult<i64> {
        let context = format!(
            "result for race {} and driver {}",
            result.race_id, result.driver_id
        );
        let outcome = sqlx::query(
            r#"
            INSERT INTO race_results (race_id, driver_id, finish_position, car_model)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(result.race_id)
        .bind(result.driver_id)
        .bind(result.finish_position)
        .bind(&result.car_model)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::from_write(e, context))?;

        Ok(outcome.last_insert_rowid())
    }

    async fn update(
        &self,
        race_id: i64,
        driver_id: i64,
        finish_position: Option<i64>,
        car_model: &str,
    ) -> StorageResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE race_results
            SET finish_position = ?, car_model = ?
            WHERE race_id = ? AND driver_id = ?
            "#,
        )
        .bind(finish_position)
        .bind(car_model)
        .bind(race_id)
        .bind(driver_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, race_id: i64, driver_id: i64) -> StorageResult<u64> {
        let result = sqlx::query("DELETE FROM race_results WHERE race_id = ? AND driver_id = ?")
            .bind(race_id)
            .bind(driver_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn count_for_race(&self, race_id: i64) -> StorageResult<u64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM race_results WHERE race_id = ?")
                .bind(race_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count as u64)
    }

    async fn count_for_driver(&self, driver_id: i64) -> StorageResult<u64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM race_results WHERE driver_id = ?")
                .bind(driver_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count as u64)
    }
}
