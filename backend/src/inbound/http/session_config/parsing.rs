//! Per-variable readers for the session toggles.
//!
//! Each reader returns the parsed value, a default (debug builds, with a
//! warning) or a [`SessionConfigError`] (release builds).

use actix_web::cookie::SameSite;
use mockable::Env;
use tracing::warn;

use super::{
    ALLOW_EPHEMERAL_ENV, BuildMode, COOKIE_SECURE_ENV, HASH_COST_ENV, SAMESITE_ENV,
    SessionConfigError,
};
use crate::domain::{DEFAULT_HASH_COST, MAX_HASH_COST, MIN_HASH_COST};

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";
const HASH_COST_EXPECTED: &str = "an integer in 4..=31";

/// Use `fallback` in debug builds, fail with `error` in release builds.
fn fallback_or_fail<T>(
    mode: BuildMode,
    fallback: T,
    error: SessionConfigError,
) -> Result<T, SessionConfigError> {
    if mode.is_debug() {
        warn!(%error, "using development default");
        Ok(fallback)
    } else {
        Err(error)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn invalid(name: &'static str, value: String, expected: &'static str) -> SessionConfigError {
    SessionConfigError::InvalidEnv {
        name,
        value,
        expected,
    }
}

/// `SESSION_COOKIE_SECURE`: mandatory in release builds, secure by default.
pub(super) fn cookie_secure<E: Env>(env: &E, mode: BuildMode) -> Result<bool, SessionConfigError> {
    match env.string(COOKIE_SECURE_ENV) {
        None => fallback_or_fail(
            mode,
            true,
            SessionConfigError::MissingEnv {
                name: COOKIE_SECURE_ENV,
            },
        ),
        Some(value) => match parse_bool(&value) {
            Some(flag) => Ok(flag),
            None => fallback_or_fail(mode, true, invalid(COOKIE_SECURE_ENV, value, BOOL_EXPECTED)),
        },
    }
}

/// `SESSION_ALLOW_EPHEMERAL`: off unless set, and never on in release builds.
pub(super) fn allow_ephemeral<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<bool, SessionConfigError> {
    let Some(value) = env.string(ALLOW_EPHEMERAL_ENV) else {
        return Ok(false);
    };
    match parse_bool(&value) {
        Some(true) if !mode.is_debug() => Err(SessionConfigError::EphemeralNotAllowed),
        Some(flag) => Ok(flag),
        None => fallback_or_fail(
            mode,
            false,
            invalid(ALLOW_EPHEMERAL_ENV, value, BOOL_EXPECTED),
        ),
    }
}

/// `SESSION_SAMESITE`: `Lax` by default; `None` needs a secure cookie.
pub(super) fn same_site<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let Some(value) = env.string(SAMESITE_ENV) else {
        return Ok(SameSite::Lax);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" => fallback_or_fail(mode, SameSite::None, SessionConfigError::InsecureSameSiteNone),
        _ => fallback_or_fail(
            mode,
            SameSite::Lax,
            invalid(SAMESITE_ENV, value, SAMESITE_EXPECTED),
        ),
    }
}

/// `PASSWORD_HASH_COST`: bcrypt work factor, [`DEFAULT_HASH_COST`] if unset.
pub(super) fn hash_cost<E: Env>(env: &E, mode: BuildMode) -> Result<u32, SessionConfigError> {
    let Some(value) = env.string(HASH_COST_ENV) else {
        return Ok(DEFAULT_HASH_COST);
    };
    match value.trim().parse::<u32>() {
        Ok(cost) if (MIN_HASH_COST..=MAX_HASH_COST).contains(&cost) => Ok(cost),
        _ => fallback_or_fail(
            mode,
            DEFAULT_HASH_COST,
            invalid(HASH_COST_ENV, value, HASH_COST_EXPECTED),
        ),
    }
}
