//! Tests for the account service.

use std::sync::Arc;

use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, then, when};
use serde_json::json;

use super::*;
use crate::domain::ports::{MockUserRepository, StoredUser};
use crate::domain::{ErrorCode, MIN_HASH_COST};
use crate::outbound::memory::MemoryStore;
use crate::test_support::{MutableClock, fixture_secret, fixture_timestamp};

struct Harness {
    service: AccountService<MemoryStore>,
    store: Arc<MemoryStore>,
    codec: SessionTokenCodec,
}

fn codec() -> SessionTokenCodec {
    SessionTokenCodec::new(
        &fixture_secret(),
        Arc::new(MutableClock::new(fixture_timestamp())),
    )
}

fn credentials() -> CredentialStore {
    CredentialStore::new(MIN_HASH_COST).expect("minimum cost is valid")
}

fn service_over<U>(users: U) -> AccountService<U> {
    AccountService::new(
        Arc::new(users),
        credentials(),
        codec(),
        Arc::new(MutableClock::new(fixture_timestamp())),
    )
}

#[fixture]
fn harness() -> Harness {
    let store = Arc::new(MemoryStore::default());
    let codec = codec();
    let service = AccountService::new(
        store.clone(),
        credentials(),
        codec.clone(),
        Arc::new(MutableClock::new(fixture_timestamp())),
    );
    Harness {
        service,
        store,
        codec,
    }
}

fn signup(email: &str, username: &str) -> SignupRequest {
    SignupRequest::try_from_parts(email, username, "correct horse").expect("valid signup")
}

fn login(identifier: &str, password: &str) -> LoginCredentials {
    LoginCredentials::try_from_parts(identifier, password).expect("valid login")
}

#[given("an account registered as a@x.com")]
fn an_account_registered() -> SignupRequest {
    signup("a@x.com", "first_user")
}

#[when("a second signup reuses the email with a new username")]
fn a_second_signup_reuses_the_email() -> SignupRequest {
    signup("a@x.com", "second_user")
}

#[then("the signup fails naming the email field")]
fn the_signup_fails_naming_email(result: Result<User, Error>) {
    let err = result.expect_err("duplicate email must fail");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(
        err.details(),
        Some(&json!({ "field": "email", "code": "duplicate" }))
    );
}

#[rstest]
#[tokio::test]
async fn signup_persists_a_new_user(harness: Harness) {
    let user = harness
        .service
        .signup(signup("ada@example.com", "ada_l"))
        .await
        .expect("signup succeeds");

    assert_eq!(user.email().as_ref(), "ada@example.com");
    assert_eq!(user.created_at(), fixture_timestamp());
    assert_eq!(
        harness.store.user(user.id()).as_ref(),
        Some(&user),
        "stored record matches"
    );
}

#[rstest]
#[tokio::test]
async fn duplicate_email_is_reported_as_email(harness: Harness) {
    harness
        .service
        .signup(an_account_registered())
        .await
        .expect("first signup");

    let result = harness
        .service
        .signup(a_second_signup_reuses_the_email())
        .await;
    the_signup_fails_naming_email(result);
}

#[rstest]
#[case("other@x.com", "first_user", "username")]
#[case("a@x.com", "first_user", "email")]
#[tokio::test]
async fn email_is_checked_before_username(
    harness: Harness,
    #[case] email: &str,
    #[case] username: &str,
    #[case] field: &str,
) {
    harness
        .service
        .signup(an_account_registered())
        .await
        .expect("first signup");

    let err = harness
        .service
        .signup(signup(email, username))
        .await
        .expect_err("duplicate rejected");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(
        err.details().and_then(|d| d.get("field")),
        Some(&json!(field))
    );
}

#[rstest]
#[tokio::test]
async fn insert_race_maps_to_conflict() {
    let mut users = MockUserRepository::new();
    users.expect_find_conflict().returning(|_, _| Ok(None));
    users
        .expect_insert()
        .times(1)
        .returning(|_, _| Err(UserPersistenceError::duplicate(UniqueField::Username)));

    let err = service_over(users)
        .signup(signup("ada@example.com", "ada_l"))
        .await
        .expect_err("race surfaces as conflict");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(
        err.details().and_then(|d| d.get("field")),
        Some(&json!("username"))
    );
}

#[rstest]
#[tokio::test]
async fn store_failures_are_internal_and_redactable() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_conflict()
        .returning(|_, _| Err(UserPersistenceError::connection("refused")));

    let err = service_over(users)
        .signup(signup("ada@example.com", "ada_l"))
        .await
        .expect_err("store failure");
    assert_eq!(err.code(), ErrorCode::InternalError);
    assert!(!err.message().contains("refused"));
}

#[rstest]
#[case("ada@example.com")]
#[case("ada_l")]
#[tokio::test]
async fn login_accepts_email_or_username(harness: Harness, #[case] identifier: &str) {
    let user = harness
        .service
        .signup(signup("ada@example.com", "ada_l"))
        .await
        .expect("signup");

    let outcome = harness
        .service
        .login(login(identifier, "correct horse"))
        .await
        .expect("login succeeds");
    assert_eq!(outcome.user, user);

    let claims = harness
        .codec
        .verify(outcome.token.as_str())
        .expect("issued token verifies");
    assert_eq!(&claims.subject, user.id());
}

#[rstest]
#[tokio::test]
async fn unknown_user_and_wrong_password_look_identical(harness: Harness) {
    harness
        .service
        .signup(signup("ada@example.com", "ada_l"))
        .await
        .expect("signup");

    let wrong_password = harness
        .service
        .login(login("ada_l", "battery staple"))
        .await
        .expect_err("wrong password");
    let unknown = harness
        .service
        .login(login("nobody", "correct horse"))
        .await
        .expect_err("unknown user");

    assert_eq!(wrong_password.code(), ErrorCode::Unauthorized);
    assert_eq!(wrong_password.code(), unknown.code());
    assert_eq!(wrong_password.message(), unknown.message());
}

#[rstest]
#[tokio::test]
async fn unknown_identifier_still_spends_a_hash() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_for_login()
        .times(1)
        .returning(|_| Ok(None));
    let slow = CredentialStore::new(8).expect("valid cost");
    let service = AccountService::new(
        Arc::new(users),
        slow,
        codec(),
        Arc::new(MutableClock::new(fixture_timestamp())),
    );

    let started = std::time::Instant::now();
    let err = service
        .login(login("nobody", "correct horse"))
        .await
        .expect_err("no such account");
    let elapsed = started.elapsed();

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), INVALID_CREDENTIALS);
    assert!(elapsed >= std::time::Duration::from_millis(1), "took {elapsed:?}");
}

#[rstest]
#[tokio::test]
async fn corrupt_stored_hash_fails_closed() {
    let user = User::new(
        UserId::random(),
        crate::domain::Email::new("ada@example.com").expect("email"),
        crate::domain::Username::new("ada_l").expect("username"),
        fixture_timestamp(),
    );
    let mut users = MockUserRepository::new();
    users.expect_find_for_login().returning(move |_| {
        Ok(Some(StoredUser {
            user: user.clone(),
            password_hash: crate::domain::PasswordHash::from_stored("garbage"),
        }))
    });

    let err = service_over(users)
        .login(login("ada_l", "correct horse"))
        .await
        .expect_err("malformed hash never verifies");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}
