pub mod driver;
pub mod race;
pub mod race_result;
pub mod session;
pub mod user;

pub use driver::{Driver, DriverSummary};
pub use race::{Race, RaceSummary};
pub use race_result::{RaceResult, ResultRow};
pub use session::SessionData;
pub use user::{NewUser, User};
