//! Request-shape failures that `invalid_request` bodies explain in `details`.
//!
//! Every rejection names the offending field and a stable detail code, so a
//! client can react to `invalid_cursor` without parsing the message.

use std::str::FromStr;

use serde_json::json;

use crate::domain::{Error, InvalidIdentifier};

/// A path or query parameter that can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Field(&'static str);

impl Field {
    /// The `{id}` path segment.
    pub(crate) const ID: Self = Self("id");
    /// The `cursor` query parameter.
    pub(crate) const CURSOR: Self = Self("cursor");

    /// Parse an identifier, rejecting anything but a canonical UUID.
    pub(crate) fn parse_id<T>(self, raw: &str) -> Result<T, Error>
    where
        T: FromStr<Err = InvalidIdentifier>,
    {
        raw.parse().map_err(|_| {
            Error::invalid_request(format!("{} must be a valid UUID", self.0)).with_details(
                json!({ "field": self.0, "code": "invalid_uuid", "value": raw }),
            )
        })
    }

    /// A cursor that does not decode to a listing position.
    pub(crate) fn bad_cursor(self) -> Error {
        Error::invalid_request(format!("{} must come from a previous page", self.0))
            .with_details(json!({ "field": self.0, "code": "invalid_cursor" }))
    }
}
