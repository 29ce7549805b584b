pub mod driver;
pub mod race;
pub mod race_result;
pub mod session;
pub mod user;

pub use driver::{DriverRepository, SqliteDriverRepository};
pub use race::{RaceRepository, SqliteRaceRepository};
pub use race_result::{ResultRepository, SqliteResultRepository};
pub use session::{MemorySessionStore, SessionStore, SqliteSessionStore};
pub use user::{SqliteUserRepository, UserRepository};
