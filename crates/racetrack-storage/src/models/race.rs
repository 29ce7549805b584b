use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A race row from the `races` table.
///
/// `race_date` is stored as `YYYY-MM-DD` text, so ordering by the column
/// orders chronologically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Race {
    pub id: i64,
    pub track_name: String,
    pub race_date: NaiveDate,
    pub distance_km: f64,
    pub weather_forecast: String,
}

/// The `{id, track_name, race_date}` projection used to fill race pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RaceSummary {
    pub id: i64,
    pub track_name: String,
    pub race_date: NaiveDate,
}
