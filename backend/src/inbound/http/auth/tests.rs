//! Handler tests for the account endpoints.

use super::*;
use crate::inbound::http::test_utils::{error_field, session_cookie, test_app};
use crate::test_support::TestHarness;
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[fixture]
fn harness() -> TestHarness {
    TestHarness::new()
}

fn signup_body(email: &str, username: &str) -> Value {
    json!({ "email": email, "username": username, "password": "correct horse" })
}

macro_rules! app {
    ($harness:expr) => {
        actix_test::init_service(test_app($harness.state.clone())).await
    };
}

#[rstest]
#[actix_web::test]
async fn signup_returns_the_created_user(harness: TestHarness) {
    let app = app!(harness);
    let req = actix_test::TestRequest::post()
        .uri("/api/v1/auth/signup")
        .set_json(signup_body("ada@example.com", "ada_l"))
        .to_request();

    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert!(session_cookie(&res).is_none(), "signup does not log in");
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body.pointer("/user/username"), Some(&json!("ada_l")));
    assert!(body.pointer("/user/passwordHash").is_none());
}

#[rstest]
#[actix_web::test]
async fn duplicate_email_is_a_conflict_naming_email(harness: TestHarness) {
    let app = app!(harness);
    for (username, expected) in [("first", StatusCode::CREATED), ("second", StatusCode::CONFLICT)] {
        let req = actix_test::TestRequest::post()
            .uri("/api/v1/auth/signup")
            .set_json(signup_body("a@x.com", username))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), expected);
        if expected == StatusCode::CONFLICT {
            let body: Value = actix_test::read_body_json(res).await;
            assert_eq!(error_field(&body), (Some("email"), Some("conflict")));
        }
    }
}

#[rstest]
#[case::bad_email("nope", "ada_l", "correct horse", "email")]
#[case::short_username("ada@example.com", "ad", "correct horse", "username")]
#[case::short_password("ada@example.com", "ada_l", "short", "password")]
#[actix_web::test]
async fn signup_validation_names_the_field(
    harness: TestHarness,
    #[case] email: &str,
    #[case] username: &str,
    #[case] password: &str,
    #[case] field: &str,
) {
    let app = app!(harness);
    let req = actix_test::TestRequest::post()
        .uri("/api/v1/auth/signup")
        .set_json(json!({ "email": email, "username": username, "password": password }))
        .to_request();

    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(error_field(&body), (Some(field), Some("invalid_request")));
}

#[rstest]
#[actix_web::test]
async fn login_sets_a_cookie_that_me_resolves(harness: TestHarness) {
    let app = app!(harness);
    let signup_req = actix_test::TestRequest::post()
        .uri("/api/v1/auth/signup")
        .set_json(signup_body("ada@example.com", "ada_l"))
        .to_request();
    actix_test::call_service(&app, signup_req).await;

    let login_req = actix_test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": "ada@example.com", "password": "correct horse" }))
        .to_request();
    let res = actix_test::call_service(&app, login_req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = session_cookie(&res).expect("session cookie");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.path(), Some("/"));

    let me = actix_test::TestRequest::get()
        .uri("/api/v1/me")
        .cookie(cookie)
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, me).await;
    assert_eq!(body.pointer("/user/email"), Some(&json!("ada@example.com")));
}

#[rstest]
#[case::unknown_user("ghost", "correct horse")]
#[case::wrong_password("ada_l", "wrong horse")]
#[actix_web::test]
async fn bad_credentials_are_unauthorized(
    harness: TestHarness,
    #[case] identifier: &str,
    #[case] password: &str,
) {
    let app = app!(harness);
    let signup_req = actix_test::TestRequest::post()
        .uri("/api/v1/auth/signup")
        .set_json(signup_body("ada@example.com", "ada_l"))
        .to_request();
    actix_test::call_service(&app, signup_req).await;

    let login_req = actix_test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "identifier": identifier, "password": password }))
        .to_request();
    let res = actix_test::call_service(&app, login_req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(session_cookie(&res).is_none());
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body.get("message"), Some(&json!("invalid credentials")));
}

#[rstest]
#[actix_web::test]
async fn anonymous_me_is_null(harness: TestHarness) {
    let app = app!(harness);
    let req = actix_test::TestRequest::get().uri("/api/v1/me").to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "user": null }));
}

#[rstest]
#[actix_web::test]
async fn logout_expires_the_cookie(harness: TestHarness) {
    let app = app!(harness);
    let req = actix_test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = session_cookie(&res).expect("removal cookie");
    assert_eq!(cookie.value(), "");
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body, json!({ "ok": true }));
}
