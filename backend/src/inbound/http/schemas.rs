//! OpenAPI schemas for response envelopes.
//!
//! The pagination crate is framework-agnostic and does not derive
//! `ToSchema`, so concrete page shapes are described here for the document.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Comment, PostSummary, User};

/// OpenAPI schema for a page of post summaries.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostPageSchema {
    /// Summaries on this page, newest first.
    items: Vec<PostSummary>,
    /// Cursor for the next page, `null` at the end.
    #[schema(example = "eyJjcmVhdGVkQXQiOiIyMDI2LTAxLTAxVDEyOjAwOjAwWiIsImlkIjoiLi4uIn0")]
    next_cursor: Option<String>,
    /// Whether another page exists.
    has_more: bool,
}

/// OpenAPI schema for a page of comments.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentPageSchema {
    /// Comments on this page, oldest first.
    items: Vec<Comment>,
    /// Cursor for the next page, `null` at the end.
    next_cursor: Option<String>,
    /// Whether another page exists.
    has_more: bool,
}

/// Body wrapping a single user.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserEnvelope {
    /// The user, or `null` for anonymous callers of `/me`.
    pub user: Option<User>,
}

/// Acknowledgement returned by deletes and logout.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct Ack {
    /// Always `true`.
    pub ok: bool,
}

impl Ack {
    /// The only acknowledgement value.
    pub const OK: Self = Self { ok: true };
}
