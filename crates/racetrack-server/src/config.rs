//! Server configuration from `RACETRACK_*` environment variables.

use racetrack_core::constants::DEFAULT_SESSION_TTL_HOURS;
use std::net::SocketAddr;
use thiserror::Error;

pub const BIND_ADDR: &str = "RACETRACK_BIND_ADDR";
pub const DATABASE_PATH: &str = "RACETRACK_DATABASE_PATH";
pub const DB_MAX_CONNECTIONS: &str = "RACETRACK_DB_MAX_CONNECTIONS";
pub const SESSION_TTL_HOURS: &str = "RACETRACK_SESSION_TTL_HOURS";
pub const SECURE_COOKIES: &str = "RACETRACK_SECURE_COOKIES";
pub const REJECT_PAST_RACE_DATES: &str = "RACETRACK_REJECT_PAST_RACE_DATES";
pub const SEED_SAMPLE_DATA: &str = "RACETRACK_SEED_SAMPLE_DATA";
pub const ADMIN_USERNAME: &str = "RACETRACK_ADMIN_USERNAME";
pub const ADMIN_PASSWORD: &str = "RACETRACK_ADMIN_PASSWORD";

/// A variable was set to something unusable
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("{set} is set but {missing} is not")]
    Incomplete {
        set: &'static str,
        missing: &'static str,
    },
}

/// Account created at startup when it does not exist yet
#[derive(Clone, PartialEq, Eq)]
pub struct AdminBootstrap {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AdminBootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminBootstrap")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database_path: String,
    /// SQLite pool size
    pub db_max_connections: u32,
    /// Sliding lifetime of a session
    pub session_ttl: chrono::Duration,
    /// Mark the session cookie `Secure` (HTTPS deployments)
    pub secure_cookies: bool,
    /// Refuse races dated before today
    pub reject_past_race_dates: bool,
    pub seed_sample_data: bool,
    pub admin: Option<AdminBootstrap>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            database_path: "racetrack.db".to_string(),
            db_max_connections: 10,
            session_ttl: chrono::Duration::hours(DEFAULT_SESSION_TTL_HOURS),
            secure_cookies: false,
            reject_past_race_dates: false,
            seed_sample_data: false,
            admin: None,
        }
    }
}

impl ServerConfig {
    /// Read the process environment. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(addr) = get(BIND_ADDR) {
            config.bind_addr = addr.trim().parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::Invalid {
                    var: BIND_ADDR,
                    reason: e.to_string(),
                }
            })?;
        }

        if let Some(path) = get(DATABASE_PATH) {
            config.database_path = path.trim().to_string();
        }

        if let Some(size) = get(DB_MAX_CONNECTIONS) {
            config.db_max_connections = match size.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                Ok(_) => {
                    return Err(ConfigError::Invalid {
                        var: DB_MAX_CONNECTIONS,
                        reason: "must be at least 1".to_string(),
                    });
                }
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        var: DB_MAX_CONNECTIONS,
                        reason: e.to_string(),
                    });
                }
            };
        }

        if let Some(hours) = get(SESSION_TTL_HOURS) {
            let hours: i64 = hours.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    var: SESSION_TTL_HOURS,
                    reason: e.to_string(),
                }
            })?;
            if hours <= 0 {
                return Err(ConfigError::Invalid {
                    var: SESSION_TTL_HOURS,
                    reason: "must be a positive number of hours".to_string(),
                });
            }
            config.session_ttl = chrono::Duration::hours(hours);
        }

        if let Some(v) = get(SECURE_COOKIES) {
            config.secure_cookies = parse_flag(SECURE_COOKIES, &v)?;
        }
        if let Some(v) = get(REJECT_PAST_RACE_DATES) {
            config.reject_past_race_dates = parse_flag(REJECT_PAST_RACE_DATES, &v)?;
        }
        if let Some(v) = get(SEED_SAMPLE_DATA) {
            config.seed_sample_data = parse_flag(SEED_SAMPLE_DATA, &v)?;
        }

        config.admin = match (get(ADMIN_USERNAME), lookup(ADMIN_PASSWORD)) {
            (Some(username), Some(password)) if !password.is_empty() => Some(AdminBootstrap {
                username: username.trim().to_string(),
                password,
            }),
            (Some(_), _) => {
                return Err(ConfigError::Incomplete {
                    set: ADMIN_USERNAME,
                    missing: ADMIN_PASSWORD,
                });
            }
            (None, Some(password)) if !password.is_empty() => {
                return Err(ConfigError::Incomplete {
                    set: ADMIN_PASSWORD,
                    missing: ADMIN_USERNAME,
                });
            }
            (None, _) => None,
        };

        Ok(config)
    }
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Invalid {
            var,
            reason: format!("expected a boolean, got {other:?}"),
        }),
    }
}
