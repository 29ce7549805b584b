use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A row from `race_results`, keyed by `(race_id, driver_id)`.
///
/// A `None` finish position records a DNF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RaceResult {
    pub race_id: i64,
    pub driver_id: i64,
    pub finish_position: Option<i64>,
    pub car_model: String,
}

impl RaceResult {
    pub fn is_dnf(&self) -> bool {
        self.finish_position.is_none()
    }
}

/// A result joined with its race and driver for the results listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ResultRow {
    pub race_id: i64,
    pub driver_id: i64,
    pub finish_position: Option<i64>,
    pub car_model: String,
    pub track_name: String,
    pub race_date: NaiveDate,
    pub full_name: String,
}
