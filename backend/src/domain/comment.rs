//! Comments attached to posts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::identifier::define_identifier;
use super::{Author, ListingKey, PostId};

define_identifier! {
    /// Stable comment identifier stored as a UUID.
    CommentId
}

/// Maximum length of a comment, in characters.
pub const COMMENT_MAX: usize = 1_000;

/// Validation errors for comment bodies.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommentValidationError {
    /// Body was blank once trimmed.
    #[error("comment must not be empty")]
    Empty,
    /// Body exceeds [`COMMENT_MAX`].
    #[error("comment must be at most {max} characters")]
    TooLong {
        /// Maximum accepted length.
        max: usize,
    },
}

impl CommentValidationError {
    /// Request field the failure refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        "content"
    }

    /// Stable machine-readable failure code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::TooLong { .. } => "too_long",
        }
    }
}

/// Comment text, trimmed.
///
/// # Examples
/// ```
/// use forum_backend::domain::CommentBody;
///
/// let body = CommentBody::new("  nice post  ").expect("valid");
/// assert_eq!(body.as_ref(), "nice post");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "Nice post!")]
pub struct CommentBody(String);

impl CommentBody {
    /// Validate and construct a [`CommentBody`].
    ///
    /// # Errors
    ///
    /// Returns [`CommentValidationError`] for blank or overlong input.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, CommentValidationError> {
        let body = raw.as_ref().trim();
        if body.is_empty() {
            return Err(CommentValidationError::Empty);
        }
        if body.chars().count() > COMMENT_MAX {
            return Err(CommentValidationError::TooLong { max: COMMENT_MAX });
        }
        Ok(Self(body.to_owned()))
    }
}

impl AsRef<str> for CommentBody {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for CommentBody {
    type Error = CommentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CommentBody> for String {
    fn from(value: CommentBody) -> Self {
        value.0
    }
}

/// A comment with its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    id: CommentId,
    post_id: PostId,
    content: CommentBody,
    author: Author,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Comment {
    /// Assemble a comment from stored parts.
    #[must_use]
    pub const fn new(
        id: CommentId,
        post_id: PostId,
        content: CommentBody,
        author: Author,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            post_id,
            content,
            author,
            created_at,
            updated_at,
        }
    }

    /// Comment identifier.
    #[must_use]
    pub const fn id(&self) -> &CommentId {
        &self.id
    }

    /// Parent post; fixed at creation.
    #[must_use]
    pub const fn post_id(&self) -> &PostId {
        &self.post_id
    }

    /// Body.
    #[must_use]
    pub const fn content(&self) -> &CommentBody {
        &self.content
    }

    /// Owning author; fixed at creation.
    #[must_use]
    pub const fn author(&self) -> &Author {
        &self.author
    }

    /// Creation time.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last edit time.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Sort key used by comment listings.
    #[must_use]
    pub fn listing_key(&self) -> ListingKey {
        ListingKey::new(self.created_at, *self.id.as_uuid())
    }
}
