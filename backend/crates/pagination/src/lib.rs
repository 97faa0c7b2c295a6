//! Opaque cursor and pagination envelope primitives for listing endpoints.
//!
//! Listings page forward over a collection ordered by a compound sort key
//! that always ends with the item identifier, so the order is total even when
//! timestamps collide. A page request carries a clamped [`PageSize`] and an
//! optional [`Cursor`] holding the sort key of the last item already seen.
//! Adapters fetch `size + 1` rows strictly after that key and hand them to
//! [`Page::from_lookahead`], which trims the extra row and derives the next
//! cursor.
//!
//! Anchoring on the sort key rather than on a row offset keeps page
//! boundaries stable while rows are inserted ahead of the cursor or deleted
//! behind it, including deletion of the anchor row itself.
//!
//! # Examples
//!
//! ```
//! use pagination::{Direction, Page, PageRequest, PageSize, keyset_window};
//!
//! let ids: Vec<u32> = (1..=5).collect();
//! let request = PageRequest::<u32>::first(PageSize::new(2));
//! let rows = keyset_window(ids.clone(), Direction::Ascending, &request, |id| *id);
//! let page = Page::from_lookahead(rows, request.size(), |id| *id).expect("encode cursor");
//! assert_eq!(page.items(), &[1, 2]);
//! assert!(page.has_more());
//! ```

mod cursor;
mod order;
mod page;
mod size;

pub use cursor::{Cursor, CursorError};
pub use order::{Direction, keyset_window};
pub use page::{Page, PageRequest};
pub use size::{MAX_PAGE_SIZE, MIN_PAGE_SIZE, PageSize};
