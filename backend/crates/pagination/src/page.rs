//! Page requests and the response envelope.

use serde::{Deserialize, Serialize};

use crate::{Cursor, CursorError, PageSize};

/// A request for one page of a keyset-ordered listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest<K> {
    size: PageSize,
    after: Option<Cursor<K>>,
}

impl<K> PageRequest<K> {
    /// Request the first page.
    #[must_use]
    pub const fn first(size: PageSize) -> Self {
        Self { size, after: None }
    }

    /// Request the page following `cursor`.
    #[must_use]
    pub const fn after(size: PageSize, cursor: Cursor<K>) -> Self {
        Self {
            size,
            after: Some(cursor),
        }
    }

    /// Build a request from an optional cursor.
    #[must_use]
    pub const fn new(size: PageSize, after: Option<Cursor<K>>) -> Self {
        Self { size, after }
    }

    /// Requested page size.
    #[must_use]
    pub const fn size(&self) -> PageSize {
        self.size
    }

    /// Sort key the page resumes after, if any.
    #[must_use]
    pub fn anchor(&self) -> Option<&K> {
        self.after.as_ref().map(Cursor::key)
    }
}

/// One page of results.
///
/// Serialises as `{"items": [...], "nextCursor": "..." | null, "hasMore": bool}`.
/// `next_cursor` is present exactly when `has_more` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    items: Vec<T>,
    next_cursor: Option<String>,
    has_more: bool,
}

impl<T> Page<T> {
    /// Build a page from up to `size + 1` rows fetched after the anchor.
    ///
    /// The extra row, when present, only signals that more data exists and
    /// is dropped. The next cursor encodes the key of the last kept row.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Payload`] if the sort key cannot be encoded.
    pub fn from_lookahead<K, F>(
        mut rows: Vec<T>,
        size: PageSize,
        key_of: F,
    ) -> Result<Self, CursorError>
    where
        K: Serialize,
        F: Fn(&T) -> K,
    {
        let has_more = rows.len() > size.get();
        rows.truncate(size.get());
        let next_cursor = match rows.last() {
            Some(last) if has_more => Some(Cursor::new(key_of(last)).encode()?),
            _ => None,
        };
        Ok(Self {
            items: rows,
            next_cursor,
            has_more,
        })
    }

    /// A page with no items and no continuation.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: None,
            has_more: false,
        }
    }

    /// Items on this page, in listing order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Cursor for the following page.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref()
    }

    /// Whether another page exists.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    /// Transform each item while keeping the continuation state.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
            has_more: self.has_more,
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    //! Envelope construction coverage.
    use super::*;
    use crate::{Direction, keyset_window};
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn short_result_has_no_continuation() {
        let page = Page::from_lookahead(vec![1_u32, 2], PageSize::new(5), |n| *n).expect("page");
        assert_eq!(page.items(), &[1, 2]);
        assert!(!page.has_more());
        assert!(page.next_cursor().is_none());
    }

    #[rstest]
    fn exact_fit_has_no_continuation() {
        let page = Page::from_lookahead(vec![1_u32, 2], PageSize::new(2), |n| *n).expect("page");
        assert!(!page.has_more());
        assert!(page.next_cursor().is_none());
    }

    #[rstest]
    fn lookahead_row_is_trimmed_and_cursor_points_at_last_item() {
        let page =
            Page::from_lookahead(vec![1_u32, 2, 3], PageSize::new(2), |n| *n).expect("page");
        assert_eq!(page.items(), &[1, 2]);
        assert!(page.has_more());
        let raw = page.next_cursor().expect("cursor");
        let cursor = Cursor::<u32>::decode(raw).expect("decode");
        assert_eq!(*cursor.key(), 2);
    }

    #[rstest]
    fn serialises_with_camel_case_fields() {
        let page = Page::<u32>::empty();
        let value = serde_json::to_value(&page).expect("serialise");
        assert_eq!(
            value,
            json!({ "items": [], "nextCursor": null, "hasMore": false })
        );
    }

    #[rstest]
    fn map_keeps_continuation() {
        let page =
            Page::from_lookahead(vec![1_u32, 2, 3], PageSize::new(1), |n| *n).expect("page");
        let cursor = page.next_cursor().map(str::to_owned);
        let mapped = page.map(|n| n.to_string());
        assert_eq!(mapped.items(), &["1".to_owned()]);
        assert_eq!(mapped.next_cursor().map(str::to_owned), cursor);
        assert!(mapped.has_more());
    }

    #[rstest]
    fn walking_every_page_visits_each_item_once() {
        let ids: Vec<u32> = (1..=7).collect();
        let mut request = PageRequest::<u32>::first(PageSize::new(3));
        let mut seen = Vec::new();
        loop {
            let rows = keyset_window(ids.clone(), Direction::Descending, &request, |n| *n);
            let page = Page::from_lookahead(rows, request.size(), |n| *n).expect("page");
            let next = page.next_cursor().map(str::to_owned);
            seen.extend(page.into_items());
            let Some(raw) = next else { break };
            let cursor = Cursor::decode(&raw).expect("decode");
            request = PageRequest::after(request.size(), cursor);
        }
        assert_eq!(seen, vec![7, 6, 5, 4, 3, 2, 1]);
    }
}
