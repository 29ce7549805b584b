use crate::error::{AuthError, AuthResult};
use crate::password::PasswordHasher;
use racetrack_core::validation::{CredentialsForm, validate_user};
use racetrack_core::{Role, SessionUser};
use racetrack_storage::{NewUser, SessionData, SessionStore, StorageError, UserRepository};
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// A freshly established session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Login {
    /// New opaque session id for the client cookie
    pub sid: String,
    pub user: SessionUser,
}

/// Account registration and the session lifecycle.
///
/// Generic over its collaborators so tests can run it against an
/// in-memory database, a [`MemorySessionStore`](racetrack_storage::MemorySessionStore)
/// and a cheap hasher.
#[derive(Debug, Clone)]
pub struct AuthService<U, S, H> {
    users: U,
    sessions: S,
    hasher: H,
    /// Digest of a throwaway secret, checked when the username is unknown
    placeholder: OnceCell<String>,
}

impl<U, S, H> AuthService<U, S, H>
where
    U: UserRepository,
    S: SessionStore,
    H: PasswordHasher,
{
    pub fn new(users: U, sessions: S, hasher: H) -> Self {
        Self {
            users,
            sessions,
            hasher,
            placeholder: OnceCell::new(),
        }
    }

    /// Lifetime a session gets on login and on every authorised request
    pub fn session_ttl(&self) -> chrono::Duration {
        self.sessions.ttl()
    }

    /// Create an account with the `user` role and return its id.
    ///
    /// # Errors
    ///
    /// - [`AuthError::ValidationFailed`] when the credentials break the rules
    /// - [`AuthError::DuplicateUsername`] when the name is taken, including
    ///   when a concurrent registration wins the insert
    pub async fn register(&self, form: &CredentialsForm) -> AuthResult<i64> {
        let credentials = form.validate()?;
        self.create_account(&credentials.username, &credentials.password, Role::User)
            .await
    }

    /// Verify credentials and open a new session.
    ///
    /// `previous_sid` is the session the client presented, if any. It is
    /// destroyed so a session id is never carried across a login.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidCredentials`] for an unknown user or a wrong
    /// password alike.
    pub async fn login(
        &self,
        form: &CredentialsForm,
        previous_sid: Option<&str>,
    ) -> AuthResult<Login> {
        let credentials = form.credentials();

        let Some(user) = self.users.find_by_username(&credentials.username).await? else {
            self.verify_placeholder(&credentials.password).await?;
            warn!(username = %credentials.username, "Login rejected: unknown user");
            return Err(AuthError::InvalidCredentials);
        };

        if !self
            .hasher
            .verify(&credentials.password, &user.password_hash)
            .await?
        {
            warn!(username = %credentials.username, "Login rejected: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        if let Some(old) = previous_sid {
            self.sessions.destroy(old).await?;
        }

        let sid = Uuid::new_v4().to_string();
        let session_user = user.session_user();
        self.sessions
            .save(&sid, &SessionData::new(session_user.clone()))
            .await?;

        info!(user_id = user.id, username = %user.username, role = %user.role, "User logged in");
        Ok(Login {
            sid,
            user: session_user,
        })
    }

    /// Destroy the session if there is one. Calling it without a session,
    /// or twice, is fine.
    pub async fn logout(&self, sid: Option<&str>) -> AuthResult<()> {
        if let Some(sid) = sid {
            self.sessions.destroy(sid).await?;
            debug!("Session destroyed");
        }
        Ok(())
    }

    /// The user behind a session, without touching the session.
    pub async fn whoami(&self, sid: Option<&str>) -> AuthResult<Option<SessionUser>> {
        let Some(sid) = sid else {
            return Ok(None);
        };
        Ok(self.sessions.get(sid).await?.map(|data| data.user))
    }

    /// Resolve a session for an authorised request and slide its expiry.
    pub async fn authenticate(&self, sid: &str) -> AuthResult<Option<SessionUser>> {
        let Some(data) = self.sessions.get(sid).await? else {
            return Ok(None);
        };
        self.sessions.touch(sid).await?;
        Ok(Some(data.user))
    }

    /// Create an admin account unless the username already exists.
    /// Returns whether an account was created.
    ///
    /// # Errors
    ///
    /// [`AuthError::ValidationFailed`] when the credentials break the
    /// registration rules.
    pub async fn ensure_admin(&self, username: &str, password: &str) -> AuthResult<bool> {
        let errors = validate_user(
            &Value::String(username.to_string()),
            &Value::String(password.to_string()),
        );
        if !errors.is_empty() {
            return Err(racetrack_core::Error::Validation(errors).into());
        }

        let username = username.trim();
        if self.users.exists_by_username(username).await? {
            debug!(username, "Admin bootstrap skipped: username exists");
            return Ok(false);
        }

        match self.create_account(username, password, Role::Admin).await {
            Ok(_) => Ok(true),
            Err(AuthError::DuplicateUsername) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Drop expired sessions from the store
    pub async fn purge_expired_sessions(&self) -> AuthResult<u64> {
        Ok(self.sessions.purge_expired().await?)
    }

    /// Spend one verification on a miss so an unknown username takes as
    /// long to reject as a wrong password.
    async fn verify_placeholder(&self, password: &str) -> AuthResult<()> {
        let digest = self
            .placeholder
            .get_or_try_init(|| async {
                let secret = Uuid::new_v4().to_string();
                self.hasher.hash(&secret).await
            })
            .await?;
        self.hasher.verify(password, digest).await?;
        Ok(())
    }

    async fn create_account(&self, username: &str, password: &str, role: Role) -> AuthResult<i64> {
        if self.users.exists_by_username(username).await? {
            return Err(AuthError::DuplicateUsername);
        }

        let password_hash = self.hasher.hash(password).await?;
        let new_user = NewUser {
            username: username.to_string(),
            password_hash,
            role,
        };

        let id = self
            .users
            .create(&new_user)
            .await
            .map_err(|e| match e {
                StorageError::Duplicate(_) => AuthError::DuplicateUsername,
                other => AuthError::Storage(other),
            })?;

        info!(user_id = id, username, role = %role, "Account created");
        Ok(id)
    }
}
