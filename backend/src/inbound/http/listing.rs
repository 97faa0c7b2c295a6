//! Query-string parameters shared by the paginated endpoints.
//!
//! `take` is deliberately a string: anything non-numeric falls back to the
//! listing default instead of failing extraction.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{Error, ListingRequest, SearchTerm, listing_request};
use crate::inbound::http::validation::Field;

/// `take` and `cursor` for forward-only keyset pages.
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Page size, clamped to 1..=50.
    #[param(example = "20")]
    pub take: Option<String>,
    /// `nextCursor` from the previous page.
    pub cursor: Option<String>,
}

impl PageParams {
    /// Resolve into a listing request, using `default_take` when needed.
    ///
    /// # Errors
    ///
    /// `invalid_request` with `code: invalid_cursor` for undecodable cursors.
    pub fn to_request(&self, default_take: usize) -> Result<ListingRequest, Error> {
        listing_request(self.take.as_deref(), self.cursor.as_deref(), default_take)
            .map_err(|_| Field::CURSOR.bad_cursor())
    }
}

/// Post listing parameters: paging plus an optional search term.
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PostListParams {
    /// Page size, clamped to 1..=50.
    pub take: Option<String>,
    /// `nextCursor` from the previous page.
    pub cursor: Option<String>,
    /// Case-insensitive substring matched against title, content and author.
    pub q: Option<String>,
}

impl PostListParams {
    /// Split into the paging half and the parsed search term.
    #[must_use]
    pub fn split(self) -> (PageParams, Option<SearchTerm>) {
        let search = SearchTerm::parse(self.q.as_deref());
        (
            PageParams {
                take: self.take,
                cursor: self.cursor,
            },
            search,
        )
    }
}
