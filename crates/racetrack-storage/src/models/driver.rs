use serde::{Deserialize, Serialize};

/// A driver row from the `drivers` table.
///
/// `license_number` is expected to be unique by convention; the schema does
/// not enforce it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Driver {
    pub id: i64,
    pub full_name: String,
    pub nationality: String,
    /// `XX-0000`
    pub license_number: String,
    pub is_active: bool,
}

/// The `{id, full_name}` projection used to fill driver pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DriverSummary {
    pub id: i64,
    pub full_name: String,
}
