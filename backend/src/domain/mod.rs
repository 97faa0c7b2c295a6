//! Domain primitives, services and ports.
//!
//! Purpose: define the forum's strongly typed entities and the use-cases
//! that act on them, independent of HTTP and storage. Types validate on
//! construction and stay immutable; services reach storage only through the
//! traits in [`ports`].
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failure payload.
//! - Users and authentication: [`User`], [`Password`], [`CredentialStore`],
//!   [`SessionTokenCodec`], [`SessionResolver`].
//! - Authorization: [`authorize_mutation`] and its [`Decision`].
//! - Content: [`Post`], [`PostSummary`], [`Comment`] and their validated
//!   fields.
//! - Listings: [`ListingKey`], [`ListingRequest`], [`SearchTerm`].
//! - Services: [`AccountService`], [`PostService`], [`CommentService`].

mod account_service;
pub mod auth;
pub mod authorization;
pub mod comment;
mod comment_service;
pub mod credentials;
pub mod error;
mod identifier;
pub mod listing;
pub mod ports;
pub mod post;
mod post_service;
pub mod session;
pub mod session_token;
mod trace_id;
pub mod user;
mod validation;

pub use self::account_service::AccountService;
pub use self::auth::{
    AuthValidationError, IDENTIFIER_MAX, LoginCredentials, PASSWORD_MAX_BYTES, PASSWORD_MIN_BYTES,
    Password, SignupRequest,
};
pub use self::authorization::{
    Decision, DenyReason, authorize_mutation, ensure_owner, require_actor,
};
pub use self::comment::{COMMENT_MAX, Comment, CommentBody, CommentId, CommentValidationError};
pub use self::comment_service::CommentService;
pub use self::credentials::{
    CredentialError, CredentialStore, DEFAULT_HASH_COST, MAX_HASH_COST, MIN_HASH_COST, PasswordHash,
};
pub use self::error::{Error, ErrorCode};
pub use self::identifier::InvalidIdentifier;
pub use self::listing::{
    COMMENT_ORDER, COMMENT_PAGE_DEFAULT, ListingCursor, ListingKey, ListingRequest, POST_ORDER,
    POST_PAGE_DEFAULT, PostFilter, SearchTerm, listing_request,
};
pub use self::post::{
    Author, CONTENT_MAX, Post, PostContent, PostDraft, PostId, PostInput, PostSummary, PostTitle,
    PostValidationError, TITLE_MAX,
};
pub use self::post_service::PostService;
pub use self::session::SessionResolver;
pub use self::session_token::{
    InvalidToken, SESSION_TTL_SECONDS, SessionClaims, SessionSecret, SessionToken,
    SessionTokenCodec, TokenIssueError,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId, spawn_blocking_traced};
pub use self::user::{Email, User, UserId, UserValidationError, Username};

