//! Authentication inputs: passwords, login credentials and signup requests.
//!
//! Inbound adapters hand raw strings to these constructors so every rule is
//! enforced before a service touches the credential store or a repository.

use std::fmt;

use zeroize::Zeroizing;

use super::{Email, UserValidationError, Username};

/// Minimum password length at signup, in bytes.
pub const PASSWORD_MIN_BYTES: usize = 8;
/// Largest password the hash algorithm accepts without truncation, in bytes.
pub const PASSWORD_MAX_BYTES: usize = 72;
/// Maximum length of a login identifier, in characters.
pub const IDENTIFIER_MAX: usize = 255;

/// Validation errors for login and signup payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthValidationError {
    /// Email or username failed its own rules.
    #[error(transparent)]
    User(#[from] UserValidationError),
    /// Login identifier was blank once trimmed.
    #[error("email or username must not be empty")]
    EmptyIdentifier,
    /// Login identifier exceeds [`IDENTIFIER_MAX`].
    #[error("email or username must be at most {max} characters")]
    IdentifierTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Password was empty.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Password is shorter than [`PASSWORD_MIN_BYTES`].
    #[error("password must be at least {min} bytes")]
    PasswordTooShort {
        /// Minimum accepted length.
        min: usize,
    },
    /// Password is longer than [`PASSWORD_MAX_BYTES`].
    #[error("password must be at most {max} bytes")]
    PasswordTooLong {
        /// Maximum accepted length.
        max: usize,
    },
}

impl AuthValidationError {
    /// Request field the failure refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::User(inner) => inner.field(),
            Self::EmptyIdentifier | Self::IdentifierTooLong { .. } => "identifier",
            Self::EmptyPassword | Self::PasswordTooShort { .. } | Self::PasswordTooLong { .. } => {
                "password"
            }
        }
    }

    /// Stable machine-readable failure code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::User(inner) => inner.code(),
            Self::EmptyIdentifier | Self::EmptyPassword => "empty",
            Self::PasswordTooShort { .. } => "too_short",
            Self::IdentifierTooLong { .. } | Self::PasswordTooLong { .. } => "too_long",
        }
    }
}

/// Plain-text password, wiped from memory on drop.
///
/// ## Invariants
/// - Never longer than [`PASSWORD_MAX_BYTES`], so hashing never truncates.
/// - Caller whitespace is preserved.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Accept a password chosen at signup.
    ///
    /// # Errors
    ///
    /// Rejects passwords outside [`PASSWORD_MIN_BYTES`]..=[`PASSWORD_MAX_BYTES`].
    pub fn for_signup(raw: &str) -> Result<Self, AuthValidationError> {
        if raw.len() < PASSWORD_MIN_BYTES {
            return Err(AuthValidationError::PasswordTooShort {
                min: PASSWORD_MIN_BYTES,
            });
        }
        Self::bounded(raw)
    }

    /// Accept a password presented at login.
    ///
    /// # Errors
    ///
    /// Rejects empty passwords and ones over [`PASSWORD_MAX_BYTES`].
    pub fn for_login(raw: &str) -> Result<Self, AuthValidationError> {
        if raw.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        Self::bounded(raw)
    }

    fn bounded(raw: &str) -> Result<Self, AuthValidationError> {
        if raw.len() > PASSWORD_MAX_BYTES {
            return Err(AuthValidationError::PasswordTooLong {
                max: PASSWORD_MAX_BYTES,
            });
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Expose the secret for hashing or verification.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Validated login credentials used by the account service.
///
/// ## Invariants
/// - `identifier` is trimmed, non-empty and at most [`IDENTIFIER_MAX`]
///   characters; it may be an email or a username.
///
/// # Examples
/// ```
/// use forum_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ada_l ", "hunter22").expect("valid");
/// assert_eq!(creds.identifier(), "ada_l");
/// assert_eq!(creds.password().expose(), "hunter22");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    identifier: String,
    password: Password,
}

impl LoginCredentials {
    /// Construct credentials from raw identifier/password inputs.
    ///
    /// # Errors
    ///
    /// Returns the first [`AuthValidationError`] found.
    pub fn try_from_parts(identifier: &str, password: &str) -> Result<Self, AuthValidationError> {
        let normalized = identifier.trim();
        if normalized.is_empty() {
            return Err(AuthValidationError::EmptyIdentifier);
        }
        if normalized.chars().count() > IDENTIFIER_MAX {
            return Err(AuthValidationError::IdentifierTooLong {
                max: IDENTIFIER_MAX,
            });
        }
        Ok(Self {
            identifier: normalized.to_owned(),
            password: Password::for_login(password)?,
        })
    }

    /// Email or username used for the lookup.
    #[must_use]
    pub fn identifier(&self) -> &str {
        self.identifier.as_str()
    }

    /// Password presented by the caller.
    #[must_use]
    pub const fn password(&self) -> &Password {
        &self.password
    }
}

/// Validated signup payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupRequest {
    email: Email,
    username: Username,
    password: Password,
}

impl SignupRequest {
    /// Validate raw signup fields in form order: email, username, password.
    ///
    /// # Errors
    ///
    /// Returns the first [`AuthValidationError`] found.
    pub fn try_from_parts(
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<Self, AuthValidationError> {
        Ok(Self {
            email: Email::new(email)?,
            username: Username::new(username)?,
            password: Password::for_signup(password)?,
        })
    }

    /// Requested email.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    /// Requested username.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Chosen password.
    #[must_use]
    pub const fn password(&self) -> &Password {
        &self.password
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", AuthValidationError::EmptyIdentifier)]
    #[case("   ", "pw", AuthValidationError::EmptyIdentifier)]
    #[case("ada", "", AuthValidationError::EmptyPassword)]
    #[case(
        "ada",
        &"p".repeat(PASSWORD_MAX_BYTES + 1),
        AuthValidationError::PasswordTooLong { max: PASSWORD_MAX_BYTES }
    )]
    #[case(
        &"a".repeat(IDENTIFIER_MAX + 1),
        "pw",
        AuthValidationError::IdentifierTooLong { max: IDENTIFIER_MAX }
    )]
    fn invalid_login_credentials(
        #[case] identifier: &str,
        #[case] password: &str,
        #[case] expected: AuthValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(identifier, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn login_password_keeps_whitespace() {
        let creds = LoginCredentials::try_from_parts("ada", " pass ").expect("valid");
        assert_eq!(creds.password().expose(), " pass ");
    }

    #[rstest]
    fn password_limit_counts_bytes_not_characters() {
        // 36 two-byte characters sit exactly on the limit; one more exceeds it.
        let at_limit = "é".repeat(36);
        assert!(Password::for_signup(&at_limit).is_ok());
        let over = "é".repeat(37);
        assert_eq!(
            Password::for_signup(&over),
            Err(AuthValidationError::PasswordTooLong {
                max: PASSWORD_MAX_BYTES
            })
        );
    }

    #[rstest]
    #[case("bad", "ada_l", "longenough", "email", "invalid_format")]
    #[case("ada@example.com", "a!", "longenough", "username", "too_short")]
    #[case("ada@example.com", "ada_l", "short", "password", "too_short")]
    fn signup_reports_first_failing_field(
        #[case] email: &str,
        #[case] username: &str,
        #[case] password: &str,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let err = SignupRequest::try_from_parts(email, username, password)
            .expect_err("invalid signup must fail");
        assert_eq!(err.field(), field);
        assert_eq!(err.code(), code);
    }

    #[rstest]
    fn debug_output_redacts_passwords() {
        let password = Password::for_login("hunter22").expect("valid");
        assert!(!format!("{password:?}").contains("hunter22"));
    }
}
