//! Mapping from field validation failures to `invalid_request` errors.
//!
//! Each failure carries `details: {field, code}` so clients can attach the
//! message to the offending input.

use serde_json::json;

use super::{
    AuthValidationError, CommentValidationError, Error, PostValidationError, UserValidationError,
};

/// Build an `invalid_request` error pointing at `field`.
pub(crate) fn field_error(message: impl Into<String>, field: &str, code: &str) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field, "code": code }))
}

macro_rules! impl_field_error {
    ($($source:ty),* $(,)?) => {
        $(
            impl From<$source> for Error {
                fn from(err: $source) -> Self {
                    field_error(err.to_string(), err.field(), err.code())
                }
            }
        )*
    };
}

impl_field_error!(
    UserValidationError,
    AuthValidationError,
    PostValidationError,
    CommentValidationError,
);

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    fn validation_failures_name_field_and_code() {
        let err = Error::from(PostValidationError::TitleTooLong { max: 200 });
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "title must be at most 200 characters");
        assert_eq!(
            err.details(),
            Some(&json!({ "field": "title", "code": "too_long" }))
        );
    }

    #[rstest]
    fn nested_user_failures_keep_their_field() {
        let err = Error::from(AuthValidationError::from(UserValidationError::InvalidEmail));
        assert_eq!(
            err.details(),
            Some(&json!({ "field": "email", "code": "invalid_format" }))
        );
    }
}
