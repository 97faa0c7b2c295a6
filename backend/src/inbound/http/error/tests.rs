//! Tests for rendering domain errors over HTTP.

use super::*;
use actix_web::body::to_bytes;
use rstest::rstest;
use rstest_bdd_macros::{given, then, when};
use serde_json::json;

const TRACE_ID: &str = "6f1c2a9e-4d7b-4c1e-9a57-0d3b8e2f1a44";

async fn render(error: &Error) -> (StatusCode, Option<String>, Error) {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .map(|value| value.to_str().expect("ascii header").to_owned());
    let bytes = to_bytes(response.into_body())
        .await
        .expect("response body");
    let body = serde_json::from_slice(&bytes).expect("error JSON");
    (status, header, body)
}

#[rstest]
#[case::validation(Error::invalid_request("title must not be empty"), StatusCode::BAD_REQUEST)]
#[case::anonymous(Error::unauthorized("login required"), StatusCode::UNAUTHORIZED)]
#[case::stranger(Error::forbidden("post belongs to another user"), StatusCode::FORBIDDEN)]
#[case::missing(Error::not_found("post not found"), StatusCode::NOT_FOUND)]
#[case::duplicate(Error::conflict("email already registered"), StatusCode::CONFLICT)]
#[case::storage(Error::internal("pool timed out"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_follows_the_error_code(#[case] error: Error, #[case] expected: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), expected);
}

#[rstest]
#[actix_web::test]
async fn storage_failures_reach_clients_as_a_generic_message() {
    let error = Error::internal("duplicate key value violates users_email_key")
        .with_trace_id(TRACE_ID)
        .with_details(json!({ "constraint": "users_email_key" }));

    let (status, header, body) = render(&error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header.as_deref(), Some(TRACE_ID));
    assert_eq!(body.message(), "Internal server error");
    assert_eq!(body.trace_id(), Some(TRACE_ID));
    assert!(body.details().is_none());
}

#[rstest]
#[actix_web::test]
async fn signup_conflicts_keep_the_offending_field() {
    let error = Error::conflict("email already registered")
        .with_details(json!({ "field": "email" }));

    let (status, header, body) = render(&error).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(header, None);
    assert_eq!(body.code(), ErrorCode::Conflict);
    assert_eq!(body.details(), Some(&json!({ "field": "email" })));
}

#[given("an anonymous and a foreign mutation attempt")]
fn anonymous_and_foreign_attempts() -> (Error, Error) {
    (
        Error::unauthorized("login required"),
        Error::forbidden("comment belongs to another user"),
    )
}

#[when("both are rendered")]
fn both_are_rendered(errors: (Error, Error)) -> (StatusCode, StatusCode) {
    (errors.0.status_code(), errors.1.status_code())
}

#[then("the client can tell login-required from not-yours")]
fn login_required_differs_from_not_yours(statuses: (StatusCode, StatusCode)) {
    assert_eq!(statuses, (StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN));
}

#[rstest]
fn mutation_denials_stay_distinguishable() {
    let statuses = both_are_rendered(anonymous_and_foreign_attempts());
    login_required_differs_from_not_yours(statuses);
}

#[rstest]
fn framework_errors_become_redacted_internal_errors() {
    let err: Error = actix_web::error::ErrorBadRequest("payload too large").into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert!(err.details().is_none());
}
