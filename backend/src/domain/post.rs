//! Posts: validated drafts, full posts and listing summaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::identifier::define_identifier;
use super::{ListingKey, User, UserId, Username};

define_identifier! {
    /// Stable post identifier stored as a UUID.
    PostId
}

/// Maximum length of a post title, in characters.
pub const TITLE_MAX: usize = 200;
/// Maximum length of a post body, in characters.
pub const CONTENT_MAX: usize = 20_000;

/// Validation errors for post drafts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostValidationError {
    /// Title was blank once trimmed.
    #[error("title must not be empty")]
    EmptyTitle,
    /// Title exceeds [`TITLE_MAX`].
    #[error("title must be at most {max} characters")]
    TitleTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Content was blank once trimmed.
    #[error("content must not be empty")]
    EmptyContent,
    /// Content exceeds [`CONTENT_MAX`].
    #[error("content must be at most {max} characters")]
    ContentTooLong {
        /// Maximum accepted length.
        max: usize,
    },
}

impl PostValidationError {
    /// Request field the failure refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::EmptyContent | Self::ContentTooLong { .. } => "content",
        }
    }

    /// Stable machine-readable failure code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::EmptyContent => "empty",
            Self::TitleTooLong { .. } | Self::ContentTooLong { .. } => "too_long",
        }
    }
}

/// Post title, trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "Hello, forum")]
pub struct PostTitle(String);

impl PostTitle {
    /// Validate and construct a [`PostTitle`].
    ///
    /// # Errors
    ///
    /// Returns [`PostValidationError::EmptyTitle`] or
    /// [`PostValidationError::TitleTooLong`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, PostValidationError> {
        let title = raw.as_ref().trim();
        if title.is_empty() {
            return Err(PostValidationError::EmptyTitle);
        }
        if title.chars().count() > TITLE_MAX {
            return Err(PostValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(title.to_owned()))
    }
}

impl AsRef<str> for PostTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for PostTitle {
    type Error = PostValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PostTitle> for String {
    fn from(value: PostTitle) -> Self {
        value.0
    }
}

/// Post body; stored exactly as submitted once it passes validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "First post body.")]
pub struct PostContent(String);

impl PostContent {
    /// Validate and construct a [`PostContent`].
    ///
    /// # Errors
    ///
    /// Returns [`PostValidationError::EmptyContent`] for whitespace-only
    /// input or [`PostValidationError::ContentTooLong`].
    pub fn new(raw: impl Into<String>) -> Result<Self, PostValidationError> {
        let content = raw.into();
        if content.trim().is_empty() {
            return Err(PostValidationError::EmptyContent);
        }
        if content.chars().count() > CONTENT_MAX {
            return Err(PostValidationError::ContentTooLong { max: CONTENT_MAX });
        }
        Ok(Self(content))
    }
}

impl AsRef<str> for PostContent {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for PostContent {
    type Error = PostValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PostContent> for String {
    fn from(value: PostContent) -> Self {
        value.0
    }
}

/// Unvalidated post fields as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostInput {
    /// Raw title.
    pub title: String,
    /// Raw body.
    pub content: String,
}

/// Validated title and body for a new or edited post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    title: PostTitle,
    content: PostContent,
}

impl PostDraft {
    /// Pair an already validated title and body.
    #[must_use]
    pub const fn new(title: PostTitle, content: PostContent) -> Self {
        Self { title, content }
    }

    /// Validate raw input, title first.
    ///
    /// # Errors
    ///
    /// Returns the first [`PostValidationError`] encountered.
    pub fn try_from_input(input: PostInput) -> Result<Self, PostValidationError> {
        Ok(Self {
            title: PostTitle::new(&input.title)?,
            content: PostContent::new(input.content)?,
        })
    }

    /// Validated title.
    #[must_use]
    pub const fn title(&self) -> &PostTitle {
        &self.title
    }

    /// Validated body.
    #[must_use]
    pub const fn content(&self) -> &PostContent {
        &self.content
    }
}

/// Public author summary embedded in posts and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    id: UserId,
    username: Username,
}

impl Author {
    /// Build an author summary.
    #[must_use]
    pub const fn new(id: UserId, username: Username) -> Self {
        Self { id, username }
    }

    /// Author's user identifier.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Author's handle.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }
}

impl From<&User> for Author {
    fn from(user: &User) -> Self {
        Self::new(*user.id(), user.username().clone())
    }
}

/// A post with its author and derived comment count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    id: PostId,
    title: PostTitle,
    content: PostContent,
    author: Author,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    comment_count: u64,
}

impl Post {
    /// Assemble a post from stored parts.
    #[must_use]
    pub fn new(
        id: PostId,
        draft: PostDraft,
        author: Author,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        comment_count: u64,
    ) -> Self {
        Self {
            id,
            title: draft.title,
            content: draft.content,
            author,
            created_at,
            updated_at,
            comment_count,
        }
    }

    /// Post identifier.
    #[must_use]
    pub const fn id(&self) -> &PostId {
        &self.id
    }

    /// Title.
    #[must_use]
    pub const fn title(&self) -> &PostTitle {
        &self.title
    }

    /// Body.
    #[must_use]
    pub const fn content(&self) -> &PostContent {
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

    /// Number of comments on the post.
    #[must_use]
    pub const fn comment_count(&self) -> u64 {
        self.comment_count
    }
}

/// Listing row for a post; omits the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    id: PostId,
    title: PostTitle,
    author: Author,
    created_at: DateTime<Utc>,
    comment_count: u64,
}

impl PostSummary {
    /// Post identifier.
    #[must_use]
    pub const fn id(&self) -> &PostId {
        &self.id
    }

    /// Title.
    #[must_use]
    pub const fn title(&self) -> &PostTitle {
        &self.title
    }

    /// Owning author.
    #[must_use]
    pub const fn author(&self) -> &Author {
        &self.author
    }

    /// Creation time.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Number of comments on the post.
    #[must_use]
    pub const fn comment_count(&self) -> u64 {
        self.comment_count
    }

    /// Sort key used by post listings.
    #[must_use]
    pub fn listing_key(&self) -> ListingKey {
        ListingKey::new(self.created_at, *self.id.as_uuid())
    }
}

impl From<&Post> for PostSummary {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            author: post.author.clone(),
            created_at: post.created_at,
            comment_count: post.comment_count,
        }
    }
}

impl From<Post> for PostSummary {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            author: post.author,
            created_at: post.created_at,
            comment_count: post.comment_count,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::test_support::fixture_timestamp;
    use rstest::{fixture, rstest};
    use serde_json::json;

    fn input(title: &str, content: &str) -> PostInput {
        PostInput {
            title: title.to_owned(),
            content: content.to_owned(),
        }
    }

    #[fixture]
    fn author() -> Author {
        Author::new(
            UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("fixture id"),
            Username::new("ada_l").expect("fixture username"),
        )
    }

    #[rstest]
    fn draft_trims_title_but_keeps_content_verbatim() {
        let draft = PostDraft::try_from_input(input("  Hello  ", "  body\n")).expect("valid");
        assert_eq!(draft.title().as_ref(), "Hello");
        assert_eq!(draft.content().as_ref(), "  body\n");
    }

    #[rstest]
    #[case("", "body", PostValidationError::EmptyTitle)]
    #[case("   ", "body", PostValidationError::EmptyTitle)]
    #[case("title", "", PostValidationError::EmptyContent)]
    #[case("title", " \n\t", PostValidationError::EmptyContent)]
    #[case("", "", PostValidationError::EmptyTitle)]
    fn draft_rejects_blank_fields(
        #[case] title: &str,
        #[case] content: &str,
        #[case] expected: PostValidationError,
    ) {
        assert_eq!(PostDraft::try_from_input(input(title, content)), Err(expected));
    }

    #[rstest]
    fn length_limits_count_characters() {
        let title = "é".repeat(TITLE_MAX);
        let content = "ü".repeat(CONTENT_MAX);
        assert!(PostDraft::try_from_input(input(&title, &content)).is_ok());

        assert_eq!(
            PostTitle::new(format!("{title}x")),
            Err(PostValidationError::TitleTooLong { max: TITLE_MAX })
        );
        assert_eq!(
            PostContent::new(format!("{content}x")),
            Err(PostValidationError::ContentTooLong { max: CONTENT_MAX })
        );
    }

    #[rstest]
    fn errors_name_their_field() {
        assert_eq!(PostValidationError::EmptyTitle.field(), "title");
        assert_eq!(
            PostValidationError::ContentTooLong { max: 1 }.code(),
            "too_long"
        );
    }

    #[rstest]
    fn post_serialises_in_camel_case(author: Author) {
        let draft = PostDraft::try_from_input(input("Hello", "Body")).expect("valid");
        let id = PostId::new("11111111-1111-4111-8111-111111111111").expect("fixture id");
        let post = Post::new(id, draft, author, fixture_timestamp(), fixture_timestamp(), 2);

        let value = serde_json::to_value(&post).expect("serialise");
        assert_eq!(
            value,
            json!({
                "id": "11111111-1111-4111-8111-111111111111",
                "title": "Hello",
                "content": "Body",
                "author": {
                    "id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
                    "username": "ada_l"
                },
                "createdAt": "2026-01-01T12:00:00Z",
                "updatedAt": "2026-01-01T12:00:00Z",
                "commentCount": 2
            })
        );
    }

    #[rstest]
    fn summary_key_follows_creation_time_and_id(author: Author) {
        let draft = PostDraft::try_from_input(input("Hello", "Body")).expect("valid");
        let at = fixture_timestamp();
        let post = Post::new(PostId::random(), draft, author, at, at, 0);
        let summary = PostSummary::from(&post);

        assert_eq!(
            summary.listing_key(),
            ListingKey::new(fixture_timestamp(), *post.id().as_uuid())
        );
    }
}
