//! Test helpers for inbound HTTP components.

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::{App, web};
use serde_json::Value;

use crate::Trace;
use crate::inbound::http::session::SESSION_COOKIE;
use crate::inbound::http::state::HttpState;

/// Build the versioned API over `state`, wrapped in the trace middleware.
pub fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .service(web::scope("/api/v1").configure(super::configure_api))
}

/// The session cookie set on `response`, if any.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
}

/// `details.field` and `code` of a JSON error body.
pub fn error_field(body: &Value) -> (Option<&str>, Option<&str>) {
    (
        body.pointer("/details/field").and_then(Value::as_str),
        body.get("code").and_then(Value::as_str),
    )
}

/// Seed a user named `username` and return them with a valid session cookie.
pub fn logged_in(
    harness: &crate::test_support::TestHarness,
    username: &str,
) -> (crate::domain::User, Cookie<'static>) {
    use crate::domain::{Email, User, UserId, Username};

    let user = User::new(
        UserId::random(),
        Email::new(format!("{username}@example.com")).expect("fixture email"),
        Username::new(username).expect("fixture username"),
        crate::test_support::fixture_timestamp(),
    );
    harness.store.seed_user(user.clone());
    let token = harness.codec.issue(&user).expect("fixture token");
    let cookie = harness.state.cookies.issue(&token);
    (user, cookie)
}
