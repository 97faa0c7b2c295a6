//! Listing vocabulary shared by post and comment queries.
//!
//! Every listing is keyset-paginated over `(created_at, id)`. Posts are
//! newest first; comments within a post are oldest first.

use chrono::{DateTime, Utc};
use pagination::{Cursor, Direction, PageRequest, PageSize};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Default page size for post listings.
pub const POST_PAGE_DEFAULT: usize = 10;
/// Default page size for comment listings.
pub const COMMENT_PAGE_DEFAULT: usize = 20;
/// Order of post listings.
pub const POST_ORDER: Direction = Direction::Descending;
/// Order of comment listings.
pub const COMMENT_ORDER: Direction = Direction::Ascending;

/// Compound sort key: creation time, then identifier as a tiebreak.
///
/// Field order matters: the derived [`Ord`] compares `created_at` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingKey {
    created_at: DateTime<Utc>,
    id: Uuid,
}

impl ListingKey {
    /// Build a key.
    #[must_use]
    pub const fn new(created_at: DateTime<Utc>, id: Uuid) -> Self {
        Self { created_at, id }
    }

    /// Creation time component.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Identifier component.
    #[must_use]
    pub const fn id(&self) -> &Uuid {
        &self.id
    }
}

/// Page request anchored on a [`ListingKey`].
pub type ListingRequest = PageRequest<ListingKey>;
/// Opaque continuation token for listings.
pub type ListingCursor = Cursor<ListingKey>;

/// Build a listing request from raw query parameters.
///
/// `take` never fails: it is clamped or replaced by `default_take`.
///
/// # Errors
///
/// Returns [`pagination::CursorError`] when `cursor` is present but does not
/// decode to a listing key.
pub fn listing_request(
    take: Option<&str>,
    cursor: Option<&str>,
    default_take: usize,
) -> Result<ListingRequest, pagination::CursorError> {
    let size = PageSize::parse_or(take, default_take);
    let after = cursor
        .filter(|raw| !raw.is_empty())
        .map(ListingCursor::decode)
        .transpose()?;
    Ok(PageRequest::new(size, after))
}

/// Case-insensitive substring filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    raw: String,
    folded: String,
}

impl SearchTerm {
    /// Parse a query parameter; blank input disables filtering.
    ///
    /// The whole trimmed term is kept so a long query never matches on a
    /// prefix alone.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let trimmed = raw?.trim();
        if trimmed.is_empty() {
            return None;
        }
        let raw = trimmed.to_owned();
        let folded = raw.to_lowercase();
        Some(Self { raw, folded })
    }

    /// Term as entered, trimmed.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.raw.as_str()
    }

    /// Whether `haystack` contains the term, ignoring case.
    #[must_use]
    pub fn matches(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.folded)
    }

    /// SQL `ILIKE` pattern with wildcards in the term escaped.
    #[must_use]
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.raw.len() + 2);
        pattern.push('%');
        for ch in self.raw.chars() {
            if matches!(ch, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(ch);
        }
        pattern.push('%');
        pattern
    }
}

/// Restrictions applied to a post listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    /// Match title, content or author username.
    pub search: Option<SearchTerm>,
    /// Only posts by this author.
    pub author: Option<UserId>,
}

impl PostFilter {
    /// Filter by search term only.
    #[must_use]
    pub const fn search(search: Option<SearchTerm>) -> Self {
        Self {
            search,
            author: None,
        }
    }

    /// Posts by `author` only.
    #[must_use]
    pub const fn by_author(author: UserId) -> Self {
        Self {
            search: None,
            author: Some(author),
        }
    }
}
