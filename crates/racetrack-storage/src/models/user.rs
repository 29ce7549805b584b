use chrono::{DateTime, Utc};
use racetrack_core::{Role, SessionUser};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

/// A user account from the `users` table.
///
/// Deliberately not `Serialize`: the password hash never leaves the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Opaque digest produced by the password hasher
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The identity stored in a session after a successful login.
    pub fn session_user(&self) -> SessionUser {
        SessionUser {
            id: self.id,
            username: self.username.clone(),
            role: self.role,
        }
    }
}

// Role is stored as text; decode it through `Role::from_str` so an
// unexpected value surfaces as a decode error instead of a silent default.
impl<'r> sqlx::FromRow<'r, SqliteRow> for User {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let role: String = row.try_get("role")?;
        let role = role.parse::<Role>().map_err(|e| sqlx::Error::ColumnDecode {
            index: "role".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            password_hash: row.try_get("password_hash")?,
            role,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Fields needed to insert a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}
