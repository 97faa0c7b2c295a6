//! Driving port for signup and login.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, SessionToken, SignupRequest, User};

/// A successful login: the user and their freshly issued session token.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Authenticated user.
    pub user: User,
    /// Token to hand back in the session cookie.
    pub token: SessionToken,
}

/// Account use-cases called by inbound adapters.
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Register a new user.
    ///
    /// Fails with `conflict` and `details.field` naming the taken field.
    async fn signup(&self, request: SignupRequest) -> Result<User, Error>;

    /// Check credentials and issue a session token.
    ///
    /// Unknown identifiers and wrong passwords fail identically.
    async fn login(&self, credentials: LoginCredentials) -> Result<LoginOutcome, Error>;
}
