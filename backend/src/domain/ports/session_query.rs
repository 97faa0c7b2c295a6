//! Driving port resolving the caller's session.

use async_trait::async_trait;

use crate::domain::{Error, User};

/// Resolves a presented session token to the current user.
#[async_trait]
pub trait SessionQuery: Send + Sync {
    /// `None` for anonymous callers, including every kind of bad token.
    async fn current_user(&self, token: Option<&str>) -> Result<Option<User>, Error>;
}
