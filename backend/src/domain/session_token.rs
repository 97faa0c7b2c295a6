//! Session token codec: compact HS256-signed tokens carrying user identity.
//!
//! Tokens are self-contained; nothing is stored server-side and there is no
//! revocation list. A token is accepted only with a valid signature under
//! the process secret and an expiry in the future.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::{User, UserId};

/// Lifetime of an issued session token, in seconds (seven days).
pub const SESSION_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Symmetric signing secret held only by the server process.
#[derive(Clone)]
pub struct SessionSecret(Zeroizing<Vec<u8>>);

impl SessionSecret {
    /// Wrap raw key material.
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Raw key material.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl fmt::Debug for SessionSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionSecret(<redacted>)")
    }
}

/// Reasons a presented token is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidToken {
    /// The token is not a well-formed signed token.
    #[error("session token is malformed")]
    Malformed,
    /// The signature does not match the server secret.
    #[error("session token signature mismatch")]
    BadSignature,
    /// The expiry has passed.
    #[error("session token expired")]
    Expired,
    /// The subject is not a user identifier.
    #[error("session token subject is invalid")]
    InvalidSubject,
}

/// Failure to produce a token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to sign session token: {message}")]
pub struct TokenIssueError {
    message: String,
}

/// Claims recovered from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    /// User the token was issued to.
    pub subject: UserId,
    /// Email at issuance.
    pub email: String,
    /// Username at issuance.
    pub username: String,
    /// Issuance time.
    pub issued_at: DateTime<Utc>,
    /// Expiry time.
    pub expires_at: DateTime<Utc>,
}

/// A freshly issued token and its expiry.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl SessionToken {
    /// URL-safe token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.value.as_str()
    }

    /// Instant after which the token is rejected.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    sub: String,
    email: String,
    username: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies session tokens.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use chrono::Utc;
/// use forum_backend::domain::{Email, SessionSecret, SessionTokenCodec, User, UserId, Username};
/// use mockable::DefaultClock;
///
/// let codec = SessionTokenCodec::new(
///     &SessionSecret::new(vec![7; 32]),
///     Arc::new(DefaultClock),
/// );
/// let user = User::new(
///     UserId::random(),
///     Email::new("ada@example.com").expect("email"),
///     Username::new("ada_l").expect("username"),
///     Utc::now(),
/// );
/// let token = codec.issue(&user).expect("issue");
/// let claims = codec.verify(token.as_str()).expect("verify");
/// assert_eq!(&claims.subject, user.id());
/// ```
#[derive(Clone)]
pub struct SessionTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl SessionTokenCodec {
    /// Build a codec for `secret`, reading time from `clock`.
    #[must_use]
    pub fn new(secret: &SessionSecret, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the injected clock instead.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub", "exp", "iat"]);
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            clock,
        }
    }

    /// Issue a token for `user`, expiring [`SESSION_TTL_SECONDS`] from now.
    ///
    /// # Errors
    ///
    /// Returns [`TokenIssueError`] if signing fails.
    pub fn issue(&self, user: &User) -> Result<SessionToken, TokenIssueError> {
        let issued_at = self.clock.utc();
        let expires_at = issued_at + TimeDelta::seconds(SESSION_TTL_SECONDS);
        let claims = WireClaims {
            sub: user.id().to_string(),
            email: user.email().to_string(),
            username: user.username().to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        let value = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenIssueError {
                message: err.to_string(),
            })?;
        Ok(SessionToken { value, expires_at })
    }

    /// Verify signature and expiry, returning the embedded claims.
    ///
    /// # Errors
    ///
    /// Returns the [`InvalidToken`] reason; verification never partially
    /// succeeds.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, InvalidToken> {
        let data = jsonwebtoken::decode::<WireClaims>(token, &self.decoding, &self.validation)
            .map_err(|err| match err.kind() {
                ErrorKind::InvalidSignature => InvalidToken::BadSignature,
                ErrorKind::ExpiredSignature => InvalidToken::Expired,
                _ => InvalidToken::Malformed,
            })?;
        let WireClaims {
            sub,
            email,
            username,
            iat,
            exp,
        } = data.claims;

        if self.clock.utc().timestamp() >= exp {
            return Err(InvalidToken::Expired);
        }
        let subject = UserId::new(&sub).map_err(|_| InvalidToken::InvalidSubject)?;
        let issued_at = DateTime::from_timestamp(iat, 0).ok_or(InvalidToken::Malformed)?;
        let expires_at = DateTime::from_timestamp(exp, 0).ok_or(InvalidToken::Malformed)?;
        Ok(SessionClaims {
            subject,
            email,
            username,
            issued_at,
            expires_at,
        })
    }
}

impl fmt::Debug for SessionTokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokenCodec").finish_non_exhaustive()
    }
}
