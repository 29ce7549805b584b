//! Storage layer for the racetrack records service.
//!
//! This crate provides SQLite-backed persistence for drivers, races, race
//! results, user accounts and sessions.
//!
//! # Architecture
//!
//! - [`Database`] - Connection pool manager with embedded migrations
//! - [`DriverRepository`], [`RaceRepository`], [`ResultRepository`],
//!   [`UserRepository`] - Data access traits with SQLite implementations
//! - [`SessionStore`] - Server-side sessions, persisted ([`SqliteSessionStore`])
//!   or process-local ([`MemorySessionStore`])
//! - [`transaction`] - Inserts that run inside an open transaction
//! - [`seed`] - Optional sample data
//!
//! # Referential Integrity
//!
//! Every connection enables `PRAGMA foreign_keys`. A race or driver that is
//! referenced by a result cannot be deleted, and a result cannot point at a
//! missing race or driver. Such writes fail with
//! [`StorageError::Constraint`]; a second result for the same
//! `(race_id, driver_id)` pair fails with [`StorageError::Duplicate`].
//!
//! # Example
//!
//! ```no_run
//! use racetrack_storage::{Database, DatabaseConfig};
//! use racetrack_storage::repositories::{DriverRepository, SqliteDriverRepository};
//! use racetrack_core::PageRequest;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new(DatabaseConfig::new("racetrack.db")).await?;
//! let drivers = SqliteDriverRepository::new(db.pool().clone());
//!
//! let page = PageRequest::default();
//! for driver in drivers.find_page(page).await? {
//!     println!("{} ({})", driver.full_name, driver.license_number);
//! }
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod error;
pub mod models;
pub mod repositories;
pub mod seed;
pub mod transaction;

pub use connection::{Database, DatabaseConfig};
pub use error::{StorageError, StorageResult};
pub use models::{
    Driver, DriverSummary, NewUser, Race, RaceResult, RaceSummary, ResultRow, SessionData, User,
};
pub use repositories::{
    DriverRepository, MemorySessionStore, RaceRepository, ResultRepository, SessionStore,
    SqliteDriverRepository, SqliteRaceRepository, SqliteResultRepository, SqliteSessionStore,
    SqliteUserRepository, UserRepository,
};
