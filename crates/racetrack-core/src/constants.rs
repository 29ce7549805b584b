//! Field limits, pagination defaults and session constants.
//!
//! Every rule enforced by [`crate::validation`] reads its bounds from here so
//! the HTTP layer, the validators and the tests agree on a single value.

// Race rules
pub const MIN_TRACK_NAME_LEN: usize = 3;

// Driver rules
pub const MIN_DRIVER_NAME_LEN: usize = 3;
pub const MIN_NATIONALITY_LEN: usize = 2;

/// License numbers look like `PL-1234`: two uppercase letters, a dash, four digits.
pub const LICENSE_LETTERS: usize = 2;
pub const LICENSE_DIGITS: usize = 4;

// Result rules
pub const MIN_CAR_MODEL_LEN: usize = 2;

// User rules
pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

// Pagination
pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_LIMIT: u32 = 10;
pub const MAX_PAGE_LIMIT: u32 = 100;

// Sessions
/// Sliding session lifetime, reset on every write.
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

/// Name of the cookie that carries the opaque session id.
pub const SESSION_COOKIE_NAME: &str = "racetrack.sid";
