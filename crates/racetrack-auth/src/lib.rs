//! Accounts and sessions for the racetrack service.
//!
//! A client moves from anonymous to authenticated by logging in, and back
//! by logging out or letting the session expire. [`AuthService`] drives
//! those transitions on top of a [`UserRepository`](racetrack_storage::UserRepository),
//! a [`SessionStore`](racetrack_storage::SessionStore) and a
//! [`PasswordHasher`].
//!
//! ```no_run
//! use racetrack_auth::{Argon2Hasher, AuthService};
//! use racetrack_core::validation::CredentialsForm;
//! use racetrack_storage::{Database, SqliteSessionStore, SqliteUserRepository};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::in_memory().await?;
//! let auth = AuthService::new(
//!     SqliteUserRepository::new(db.pool().clone()),
//!     SqliteSessionStore::new(db.pool().clone(), chrono::Duration::hours(24)),
//!     Argon2Hasher::default(),
//! );
//!
//! let form = CredentialsForm { username: json!("bob"), password: json!("Secret1") };
//! auth.register(&form).await?;
//! let login = auth.login(&form, None).await?;
//! assert_eq!(auth.whoami(Some(&login.sid)).await?, Some(login.user));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod password;
pub mod service;

pub use error::{AuthError, AuthResult};
pub use password::{Argon2Hasher, PasswordHasher};
pub use service::{AuthService, Login};
