//! Transaction-aware inserts for loading several records atomically.
//!
//! These mirror the `create` methods of the repositories but run against
//! an open SQLite transaction, so a batch either commits whole or not at
//! all.
//!
//! ```no_run
//! use racetrack_storage::{Database, transaction};
//! use racetrack_core::validation::DriverInput;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::in_memory().await?;
//! let mut tx = db.pool().begin().await?;
//!
//! transaction::create_driver(&mut tx, &DriverInput {
//!     full_name: "Nico Hulkenberg".to_string(),
//!     nationality: "German".to_string(),
//!     license_number: "DE-0027".to_string(),
//!     is_active: true,
//! }).await?;
//!
//! tx.commit().await?;
//! # Ok(())
//! # }
//! ```
//!
//! Dropping the transaction without committing rolls it back.

use crate::error::{StorageError, StorageResult};
use racetrack_core::validation::{DriverInput, RaceInput, ResultInput};
use sqlx::{Sqlite, Transaction};

/// Insert a driver within a transaction and return its ID
pub async fn create_driver(
    tx: &mut Transaction<'_, Sqlite>,
    driver: &DriverInput,
) -> StorageResult<i64> {
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
    .execute(&mut **tx)
    .await
    .map_err(|e| StorageError::from_write(e, "driver"))?;

    Ok(result.last_insert_rowid())
}

/// Insert a race within a transaction and return its ID
pub async fn create_race(
    tx: &mut Transaction<'_, Sqlite>,
    race: &RaceInput,
) -> StorageResult<i64> {
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
    .execute(&mut **tx)
    .await
    .map_err(|e| StorageError::from_write(e, "race"))?;

    Ok(result.last_insert_rowid())
}

/// Insert a race result within a transaction
///
/// # Errors
///
/// - [`StorageError::Duplicate`] if the pair already has a result
/// - [`StorageError::Constraint`] if the race or driver does not exist
pub async fn create_result(
    tx: &mut Transaction<'_, Sqlite>,
    result: &ResultInput,
) -> StorageResult<i64> {
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
    .execute(&mut **tx)
    .await
    .map_err(|e| StorageError::from_write(e, context))?;

    Ok(outcome.last_insert_rowid())
}
