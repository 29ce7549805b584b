//! Shared domain types and pure validation for the racetrack record keeper.
//!
//! This crate has no I/O. It is depended on by the storage, auth and server
//! crates and holds the pieces all of them agree on:
//!
//! - [`Role`] and [`SessionUser`], the identity attached to a session
//! - [`PageRequest`], [`PaginationMeta`] and [`Page`], the pagination contract
//! - [`validation`], the field rules for races, drivers, results and users
//! - [`Error`], the error type for parsing and validation failures

pub mod constants;
pub mod error;
pub mod types;
pub mod validation;

pub use error::{Error, Result};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
