//! Account service: signup and login over the user repository.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::SubsecRound;
use mockable::Clock;
use serde_json::json;
use tracing::{error, info};

use crate::domain::ports::{
    AccountCommand, LoginOutcome, UniqueField, UserPersistenceError, UserRepository,
};
use crate::domain::{
    CredentialStore, Error, LoginCredentials, SessionTokenCodec, SignupRequest, User, UserId,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";

fn map_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Duplicate { field } => duplicate(field),
        other => {
            error!(error = %other, "user repository failure");
            Error::internal("user repository unavailable")
        }
    }
}

fn duplicate(field: UniqueField) -> Error {
    Error::conflict(format!("{field} already in use"))
        .with_details(json!({ "field": field.as_str(), "code": "duplicate" }))
}

/// Implements [`AccountCommand`] over a [`UserRepository`].
#[derive(Clone)]
pub struct AccountService<U> {
    users: Arc<U>,
    credentials: CredentialStore,
    codec: SessionTokenCodec,
    clock: Arc<dyn Clock>,
}

impl<U> AccountService<U> {
    /// Create a service hashing with `credentials` and signing with `codec`.
    pub fn new(
        users: Arc<U>,
        credentials: CredentialStore,
        codec: SessionTokenCodec,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            credentials,
            codec,
            clock,
        }
    }
}

#[async_trait]
impl<U> AccountCommand for AccountService<U>
where
    U: UserRepository,
{
    async fn signup(&self, request: SignupRequest) -> Result<User, Error> {
        if let Some(field) = self
            .users
            .find_conflict(request.email(), request.username())
            .await
            .map_err(map_repository_error)?
        {
            info!(field = field.as_str(), "signup rejected: field taken");
            return Err(duplicate(field));
        }

        let hash = self
            .credentials
            .hash_blocking(request.password().clone())
            .await
            .map_err(|err| {
                error!(error = %err, "password hashing failed");
                Error::internal("failed to hash password")
            })?;

        let user = User::new(
            UserId::random(),
            request.email().clone(),
            request.username().clone(),
            self.clock.utc().trunc_subsecs(6),
        );
        self.users
            .insert(&user, &hash)
            .await
            .map_err(map_repository_error)?;
        info!(user_id = %user.id(), "user signed up");
        Ok(user)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<LoginOutcome, Error> {
        let stored = self
            .users
            .find_for_login(credentials.identifier())
            .await
            .map_err(map_repository_error)?;
        let Some(stored) = stored else {
            self.credentials
                .reject_blocking(credentials.password().clone())
                .await;
            info!("login rejected: unknown identifier");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let verified = self
            .credentials
            .verify_blocking(credentials.password().clone(), stored.password_hash)
            .await;
        if !verified {
            info!(user_id = %stored.user.id(), "login rejected: wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        let token = self.codec.issue(&stored.user).map_err(|err| {
            error!(error = %err, "session token issuance failed");
            Error::internal("failed to issue session")
        })?;
        info!(user_id = %stored.user.id(), "user logged in");
        Ok(LoginOutcome {
            user: stored.user,
            token,
        })
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
