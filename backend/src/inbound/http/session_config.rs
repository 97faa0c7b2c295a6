//! Session configuration parsing and validation.
//!
//! Reads the session signing secret and cookie toggles through
//! [`mockable::Env`] so every rule can be tested without touching the real
//! process environment. Release builds demand explicit, safe settings;
//! debug builds fall back to defaults with a warning.

use std::path::PathBuf;

use actix_web::cookie::SameSite;
use mockable::Env;
use rand::RngCore;
use tracing::{info, warn};
use zeroize::Zeroize;

use crate::domain::SessionSecret;

pub mod fingerprint;
mod parsing;

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
/// Minimum signing secret length accepted in release builds, in bytes.
pub const SESSION_KEY_MIN_LEN: usize = 32;
const EPHEMERAL_KEY_LEN: usize = 64;
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const HASH_COST_ENV: &str = "PASSWORD_HASH_COST";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for missing toggles.
    Debug,
    /// Release builds require explicit, valid session toggles.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use forum_backend::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    const fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Session settings resolved once at startup.
#[derive(Debug)]
pub struct SessionSettings {
    /// Token signing secret.
    pub secret: SessionSecret,
    /// Whether the session cookie is marked `Secure`.
    pub cookie_secure: bool,
    /// `SameSite` policy for the session cookie.
    pub same_site: SameSite,
    /// Password hashing work factor.
    pub hash_cost: u32,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv {
        /// Variable name.
        name: &'static str,
    },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Rejected value.
        value: String,
        /// Accepted values.
        expected: &'static str,
    },
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        /// Key file path.
        path: PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// The session key file is too short for release builds.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        /// Key file path.
        path: PathBuf,
        /// Bytes read.
        length: usize,
        /// Bytes required.
        min_len: usize,
    },
    /// `SameSite=None` requires a secure cookie in release builds.
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    /// Release builds must not allow ephemeral session keys.
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Build session settings from environment variables and build mode.
///
/// # Examples
///
/// ```rust
/// use forum_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
/// use mockable::MockEnv;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let key_path = std::env::temp_dir().join("forum_session_key_example");
/// std::fs::write(&key_path, vec![b'a'; 32])?;
///
/// let key_path = key_path.to_str().expect("valid path").to_string();
/// let mut env = MockEnv::new();
/// env.expect_string().returning(move |name| match name {
///     "SESSION_KEY_FILE" => Some(key_path.clone()),
///     "SESSION_COOKIE_SECURE" => Some("1".to_string()),
///     _ => None,
/// });
///
/// let settings = session_settings_from_env(&env, BuildMode::Release)?;
/// assert!(settings.cookie_secure);
/// assert_eq!(settings.hash_cost, 12);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns a [`SessionConfigError`] for any setting a release build may not
/// default, or when no signing secret can be obtained.
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = parsing::cookie_secure(env, mode)?;
    let same_site = parsing::same_site(env, mode, cookie_secure)?;
    let hash_cost = parsing::hash_cost(env, mode)?;
    let allow_ephemeral = parsing::allow_ephemeral(env, mode)?;
    let key_path = env
        .string(KEY_FILE_ENV)
        .map_or_else(|| PathBuf::from(SESSION_KEY_DEFAULT_PATH), PathBuf::from);
    let secret = load_secret(key_path, mode, allow_ephemeral)?;
    info!(
        key_fingerprint = %fingerprint::secret_fingerprint(&secret),
        cookie_secure,
        hash_cost,
        "session settings loaded"
    );

    Ok(SessionSettings {
        secret,
        cookie_secure,
        same_site,
        hash_cost,
    })
}

/// Read the signing key, or mint a throwaway one when a debug build allows it.
fn load_secret(
    path: PathBuf,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<SessionSecret, SessionConfigError> {
    let mut bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(source) if !(allow_ephemeral && mode.is_debug()) => {
            return Err(SessionConfigError::KeyRead { path, source });
        }
        Err(error) => {
            warn!(
                path = %path.display(),
                %error,
                "session key unreadable; minting a throwaway key"
            );
            let mut fresh = vec![0_u8; EPHEMERAL_KEY_LEN];
            rand::thread_rng().fill_bytes(&mut fresh);
            return Ok(SessionSecret::new(fresh));
        }
    };
    let length = bytes.len();
    if !mode.is_debug() && length < SESSION_KEY_MIN_LEN {
        bytes.zeroize();
        return Err(SessionConfigError::KeyTooShort {
            path,
            length,
            min_len: SESSION_KEY_MIN_LEN,
        });
    }
    Ok(SessionSecret::new(bytes))
}

#[cfg(test)]
mod tests;
