//! HTTP API integration tests.
//!
//! Each test starts the router on an ephemeral port backed by an in-memory
//! database and drives it with reqwest.

mod support;

mod auth;
mod drivers;
mod health;
mod races;
mod results;
