use crate::error::{StorageError, StorageResult};
use crate::models::{Race, RaceSummary};
use racetrack_core::PageRequest;
use racetrack_core::validation::RaceInput;
use sqlx::SqlitePool;

/// Repository trait for Race entity operations
///
/// Listings are ordered newest race first.
pub trait RaceRepository: Send + Sync {
    /// All races as `{id, track_name, race_date}`
    fn find_all(&self) -> impl Future<Output = StorageResult<Vec<RaceSummary>>> + Send;

    /// One page of full race rows
    fn find_page(&self, page: PageRequest)
    -> impl Future<Output = StorageResult<Vec<Race>>> + Send;

    /// Total number of races
    fn count(&self) -> impl Future<Output = StorageResult<u64>> + Send;

    /// Find a race by ID
    fn find_by_id(&self, id: i64) -> impl Future<Output = StorageResult<Option<Race>>> + Send;

    /// Check if a race exists
    fn exists_by_id(&self, id: i64) -> impl Future<Output = StorageResult<bool>> + Send;

    /// Insert a race and return its new ID
    fn create(&self, race: &RaceInput) -> impl Future<Output = StorageResult<i64>> + Send;

    /// Replace every field of a race
    fn update(&self, id: i64, race: &RaceInput)
    -> impl Future<Output = StorageResult<u64>> + Send;

    /// Delete a race by ID
    fn delete(&self, id: i64) -> impl Future<Output = StorageResult<u64>> + Send;
}

/// SQLite implementation of RaceRepository
#[derive(Debug, Clone)]
pub struct SqliteRaceRepository {
    pool: SqlitePool,
}

impl SqliteRaceRepository {
    /// Create a new SQLite race repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl RaceRepository for SqliteRaceRepository {
    async fn find_all(&self) -> StorageResult<Vec<RaceSummary>> {
        let races = sqlx::query_as::<_, RaceSummary>(
            "SELECT id, track_name, race_date FROM races ORDER BY race_date DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(races)
    }

    async fn find_page(&self, page: PageRequest) -> StorageResult<Vec<Race>> {
        let races = sqlx::query_as::<_, Race>(
            r#"
            SELECT id, track_name, race_date, distance_km, weather_forecast
            FROM races
            ORDER BY race_date DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(i64::from(page.limit()))
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(races)
    }

    async fn count(&self) -> StorageResult<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM races")
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }

    async fn find_by_id(&self, id: i64) -> StorageResult<Option<Race>> {
        let race = sqlx::query_as::<_, Race>(
            r#"
            SELECT id, track_name, race_date, distance_km, weather_forecast
            FROM races
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(race)
    }

    async fn exists_by_id(&self, id: i64) -> StorageResult<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM races WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    async fn create(&self, race: &RaceInput) -> StorageResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO races (track_name, race_date, distance_km, weather_forecast)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&race.track_name)
        .bind(race.race_date)
        .bind(race.distance_km)
        .bind(&race.weather_forecast)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::from_write(e, "race"))?;

        Ok(result.last_insert_rowid())
    }

    async fn update(&self, id: i64, race: &RaceInput) -> StorageResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE races
            SET track_name = ?, race_date = ?, distance_km = ?, weather_forecast = ?
            WHERE id = ?
            "#,
        )
        .bind(&race.track_name)
        .bind(race.race_date)
        .bind(race.distance_km)
        .bind(&race.weather_forecast)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::from_write(e, format!("race {id}")))?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: i64) -> StorageResult<u64> {
        let result = sqlx::query("DELETE FROM races WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::from_write(e, format!("race {id} has results")))?;

        Ok(result.rows_affected())
    }
}
