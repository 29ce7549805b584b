//! Sample data for demos and local development.

use crate::error::StorageResult;
use crate::transaction;
use chrono::NaiveDate;
use racetrack_core::validation::{DriverInput, RaceInput, ResultInput};
use sqlx::SqlitePool;
use tracing::info;

const DRIVERS: &[(&str, &str, &str, bool)] = &[
    ("Ayrton Senna", "Brazilian", "BR-0012", false),
    ("Alain Prost", "French", "FR-0001", false),
    ("Nigel Mansell", "British", "GB-0005", false),
    ("Michele Alboreto", "Italian", "IT-0027", false),
    ("Mika Salo", "Finnish", "FI-0017", true),
];

const RACES: &[(&str, (i32, u32, u32), f64, &str)] = &[
    ("Monza", (1988, 9, 11), 295.8, "Sunny"),
    ("Suzuka", (1988, 10, 30), 298.9, "Light rain"),
    ("Adelaide", (1988, 11, 13), 308.7, "Hot"),
];

// (race index, driver index, finish position)
const RESULTS: &[(usize, usize, Option<i64>, &str)] = &[
    (0, 3, Some(2), "F1/87/88C"),
    (0, 1, None, "MP4/4"),
    (0, 0, None, "MP4/4"),
    (1, 0, Some(1), "MP4/4"),
    (1, 1, Some(2), "MP4/4"),
    (1, 2, None, "FW12"),
    (2, 1, Some(1), "MP4/4"),
    (2, 0, Some(2), "MP4/4"),
];

/// Load the sample drivers, races and results when the database has no
/// drivers yet. Returns whether anything was inserted.
pub async fn seed_sample_data(pool: &SqlitePool) -> StorageResult<bool> {
    let (drivers,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM drivers")
        .fetch_one(pool)
        .await?;
    if drivers > 0 {
        return Ok(false);
    }

    let mut tx = pool.begin().await?;

    let mut driver_ids = Vec::with_capacity(DRIVERS.len());
    for &(full_name, nationality, license_number, is_active) in DRIVERS {
        let input = DriverInput {
            full_name: full_name.to_string(),
            nationality: nationality.to_string(),
            license_number: license_number.to_string(),
            is_active,
        };
        driver_ids.push(transaction::create_driver(&mut tx, &input).await?);
    }

    let mut race_ids = Vec::with_capacity(RACES.len());
    for &(track_name, (y, m, d), distance_km, weather) in RACES {
        let Some(race_date) = NaiveDate::from_ymd_opt(y, m, d) else {
            continue;
        };
        let input = RaceInput {
            track_name: track_name.to_string(),
            race_date,
            distance_km,
            weather_forecast: weather.to_string(),
        };
        race_ids.push(transaction::create_race(&mut tx, &input).await?);
    }

    for &(race, driver, finish_position, car_model) in RESULTS {
        let (Some(&race_id), Some(&driver_id)) = (race_ids.get(race), driver_ids.get(driver))
        else {
            continue;
        };
        let input = ResultInput {
            race_id,
            driver_id,
            finish_position,
            car_model: car_model.to_string(),
        };
        transaction::create_result(&mut tx, &input).await?;
    }

    tx.commit().await?;

    info!(
        drivers = driver_ids.len(),
        races = race_ids.len(),
        "Seeded sample data"
    );
    Ok(true)
}
