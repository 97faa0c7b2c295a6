//! Session resolver: turns a presented token into the current user, if any.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info};

use super::ports::{SessionQuery, UserRepository};
use super::{Error, SessionTokenCodec, User};

/// Resolves session tokens against live user records.
///
/// The token subject is only a hint: the user is re-read on every call so
/// deleted accounts and renamed users are reflected immediately. Nothing is
/// cached between calls.
#[derive(Clone)]
pub struct SessionResolver {
    codec: SessionTokenCodec,
    users: Arc<dyn UserRepository>,
}

impl SessionResolver {
    /// Build a resolver over `codec` and `users`.
    pub fn new(codec: SessionTokenCodec, users: Arc<dyn UserRepository>) -> Self {
        Self { codec, users }
    }

    /// Resolve `token` to the current user.
    ///
    /// Absent, malformed, forged and expired tokens, and tokens whose
    /// subject no longer exists, all resolve to `None`.
    ///
    /// # Errors
    ///
    /// Only a failing user store surfaces, as an internal error.
    pub async fn resolve_current_user(&self, token: Option<&str>) -> Result<Option<User>, Error> {
        let Some(raw) = token.filter(|raw| !raw.is_empty()) else {
            return Ok(None);
        };
        let claims = match self.codec.verify(raw) {
            Ok(claims) => claims,
            Err(reason) => {
                info!(%reason, "session token rejected");
                return Ok(None);
            }
        };
        let user = self.users.find_by_id(&claims.subject).await.map_err(|err| {
            error!(error = %err, "user lookup failed while resolving session");
            Error::internal("failed to resolve session")
        })?;
        if user.is_none() {
            debug!(user_id = %claims.subject, "session subject no longer exists");
        }
        Ok(user)
    }
}

#[async_trait]
impl SessionQuery for SessionResolver {
    async fn current_user(&self, token: Option<&str>) -> Result<Option<User>, Error> {
        self.resolve_current_user(token).await
    }
}
