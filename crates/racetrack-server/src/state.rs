use crate::config::ServerConfig;
use racetrack_auth::{Argon2Hasher, AuthService};
use racetrack_core::validation::DatePolicy;
use racetrack_storage::{
    Database, SqliteDriverRepository, SqliteRaceRepository, SqliteResultRepository,
    SqliteSessionStore, SqliteUserRepository,
};
use std::sync::Arc;

/// The auth service as wired in production
pub type Auth = AuthService<SqliteUserRepository, SqliteSessionStore, Argon2Hasher>;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub drivers: SqliteDriverRepository,
    pub races: SqliteRaceRepository,
    pub results: SqliteResultRepository,
    pub auth: Arc<Auth>,
    pub secure_cookies: bool,
    reject_past_race_dates: bool,
}

impl AppState {
    pub fn new(db: Database, config: &ServerConfig, hasher: Argon2Hasher) -> Self {
        let pool = db.pool().clone();
        let auth = AuthService::new(
            SqliteUserRepository::new(pool.clone()),
            SqliteSessionStore::new(pool.clone(), config.session_ttl),
            hasher,
        );

        Self {
            drivers: SqliteDriverRepository::new(pool.clone()),
            races: SqliteRaceRepository::new(pool.clone()),
            results: SqliteResultRepository::new(pool),
            auth: Arc::new(auth),
            secure_cookies: config.secure_cookies,
            reject_past_race_dates: config.reject_past_race_dates,
            db,
        }
    }

    /// Race-date rule for a race created now
    pub fn date_policy(&self) -> DatePolicy {
        if self.reject_past_race_dates {
            DatePolicy::NotBefore(chrono::Utc::now().date_naive())
        } else {
            DatePolicy::AnyDate
        }
    }
}
