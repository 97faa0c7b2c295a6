//! User identity: identifiers, contact and handle value types.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::identifier::define_identifier;

define_identifier! {
    /// Stable user identifier stored as a UUID.
    UserId
}

/// Maximum length of an email address, in characters.
pub const EMAIL_MAX: usize = 255;
/// Minimum length of a username, in characters.
pub const USERNAME_MIN: usize = 3;
/// Maximum length of a username, in characters.
pub const USERNAME_MAX: usize = 30;

/// Validation errors for user-supplied identity fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Email was blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email exceeds [`EMAIL_MAX`].
    #[error("email must be at most {max} characters")]
    EmailTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Email is not of the form `local@domain.tld`.
    #[error("email must be a valid address")]
    InvalidEmail,
    /// Username is shorter than [`USERNAME_MIN`].
    #[error("username must be at least {min} characters")]
    UsernameTooShort {
        /// Minimum accepted length.
        min: usize,
    },
    /// Username is longer than [`USERNAME_MAX`].
    #[error("username must be at most {max} characters")]
    UsernameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Username contains characters outside `[A-Za-z0-9_]`.
    #[error("username may only contain letters, numbers, or underscores")]
    UsernameInvalidCharacters,
}

impl UserValidationError {
    /// Request field the failure refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyEmail | Self::EmailTooLong { .. } | Self::InvalidEmail => "email",
            Self::UsernameTooShort { .. }
            | Self::UsernameTooLong { .. }
            | Self::UsernameInvalidCharacters => "username",
        }
    }

    /// Stable machine-readable failure code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyEmail => "empty",
            Self::EmailTooLong { .. } | Self::UsernameTooLong { .. } => "too_long",
            Self::InvalidEmail => "invalid_format",
            Self::UsernameTooShort { .. } => "too_short",
            Self::UsernameInvalidCharacters => "invalid_chars",
        }
    }
}

/// Email address, trimmed and structurally checked.
///
/// ## Invariants
/// - At most [`EMAIL_MAX`] characters, no whitespace.
/// - Exactly one `@` with a non-empty local part and a dotted domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "ada@example.com")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`].
    ///
    /// # Errors
    ///
    /// Returns a [`UserValidationError`] describing the first violated rule.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let email = raw.as_ref().trim();
        if email.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if email.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if email.chars().any(char::is_whitespace) {
            return Err(UserValidationError::InvalidEmail);
        }
        let Some((local, domain)) = email.split_once('@') else {
            return Err(UserValidationError::InvalidEmail);
        };
        let dotted = domain
            .split('.')
            .all(|label| !label.is_empty())
            && domain.contains('.');
        if local.is_empty() || domain.contains('@') || !dotted {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(email.to_owned()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

static USERNAME_RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

fn username_has_valid_characters(candidate: &str) -> bool {
    // Length is enforced separately; the pattern constrains the alphabet.
    let compiled = USERNAME_RE.get_or_init(|| Regex::new("^[A-Za-z0-9_]+$"));
    match compiled {
        Ok(re) => re.is_match(candidate),
        Err(_) => candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_'),
    }
}

/// Public handle shown next to posts and comments.
///
/// ## Invariants
/// - Between [`USERNAME_MIN`] and [`USERNAME_MAX`] characters.
/// - Only ASCII letters, digits and underscores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "ada_l")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    ///
    /// # Errors
    ///
    /// Returns a [`UserValidationError`] describing the first violated rule.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let username = raw.as_ref().trim();
        let length = username.chars().count();
        if length < USERNAME_MIN {
            return Err(UserValidationError::UsernameTooShort { min: USERNAME_MIN });
        }
        if length > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if !username_has_valid_characters(username) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(username.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

/// Application user as exposed to clients.
///
/// The password credential never appears here; it stays with the
/// credential store and the user repository.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use forum_backend::domain::{Email, User, UserId, Username};
///
/// let user = User::new(
///     UserId::random(),
///     Email::new("ada@example.com").expect("email"),
///     Username::new("ada_l").expect("username"),
///     Utc::now(),
/// );
/// assert_eq!(user.username().as_ref(), "ada_l");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    email: Email,
    username: Username,
    created_at: DateTime<Utc>,
}

impl User {
    /// Build a user from validated parts.
    #[must_use]
    pub const fn new(
        id: UserId,
        email: Email,
        username: Username,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            username,
            created_at,
        }
    }

    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Contact address.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    /// Public handle.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Signup timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
