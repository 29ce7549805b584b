use chrono::{DateTime, Utc};
use racetrack_core::SessionUser;
use serde::{Deserialize, Serialize};

/// The payload serialized into a session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub user: SessionUser,
    pub issued_at: DateTime<Utc>,
}

impl SessionData {
    pub fn new(user: SessionUser) -> Self {
        Self {
            user,
            issued_at: Utc::now(),
        }
    }
}
