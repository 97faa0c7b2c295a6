//! Session cookie handling kept out of the handlers.
//!
//! The `session` cookie carries a signed token issued at login. Every request
//! resolves it afresh through [`SessionQuery`](crate::domain::ports::SessionQuery)
//! so a deleted account stops authenticating immediately.

use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, SESSION_TTL_SECONDS, SessionToken, User};
use crate::inbound::http::session_config::SessionSettings;
use crate::inbound::http::state::HttpState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

/// Attributes applied to every session cookie the server sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCookieSettings {
    secure: bool,
    same_site: SameSite,
}

impl SessionCookieSettings {
    /// Cookie attributes with explicit `Secure` and `SameSite` values.
    #[must_use]
    pub const fn new(secure: bool, same_site: SameSite) -> Self {
        Self { secure, same_site }
    }

    /// Plain-HTTP settings for in-process tests.
    #[must_use]
    pub const fn insecure_for_tests() -> Self {
        Self::new(false, SameSite::Lax)
    }

    /// Cookie carrying `token` for the full session lifetime.
    ///
    /// # Examples
    /// ```
    /// use forum_backend::inbound::http::session::SessionCookieSettings;
    ///
    /// let settings = SessionCookieSettings::insecure_for_tests();
    /// let cookie = settings.expired();
    /// assert_eq!(cookie.name(), "session");
    /// assert_eq!(cookie.http_only(), Some(true));
    /// ```
    #[must_use]
    pub fn issue(&self, token: &SessionToken) -> Cookie<'static> {
        self.build(token.as_str().to_owned(), Duration::seconds(SESSION_TTL_SECONDS))
    }

    /// Cookie instructing the browser to drop the session.
    #[must_use]
    pub fn expired(&self) -> Cookie<'static> {
        let mut cookie = self.build(String::new(), Duration::ZERO);
        cookie.make_removal();
        cookie
    }

    fn build(&self, value: String, max_age: Duration) -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE, value)
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .max_age(max_age)
            .finish()
    }
}

impl From<&SessionSettings> for SessionCookieSettings {
    fn from(settings: &SessionSettings) -> Self {
        Self::new(settings.cookie_secure, settings.same_site)
    }
}

/// Extractor yielding the caller's resolved session.
///
/// Anonymous callers extract successfully with no user; only a failing user
/// store rejects the request.
#[derive(Debug, Clone, Default)]
pub struct SessionContext(Option<User>);

impl SessionContext {
    /// Wrap an already resolved user.
    #[must_use]
    pub const fn new(user: Option<User>) -> Self {
        Self(user)
    }

    /// The authenticated user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }

    /// Consume the context, returning the user.
    #[must_use]
    pub fn into_user(self) -> Option<User> {
        self.0
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req
            .cookie(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_owned());
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let state =
                state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let user = state.sessions.current_user(token.as_deref()).await?;
            Ok(Self(user))
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{Email, UserId, Username};
    use crate::inbound::http::ApiResult;
    use crate::test_support::{TestHarness, fixture_timestamp};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test as actix_test};
    use rstest::{fixture, rstest};

    #[fixture]
    fn harness() -> TestHarness {
        TestHarness::new()
    }

    fn seeded(harness: &TestHarness) -> User {
        let user = User::new(
            UserId::random(),
            Email::new("ada@example.com").expect("email"),
            Username::new("ada_l").expect("username"),
            fixture_timestamp(),
        );
        harness.store.seed_user(user.clone());
        user
    }

    async fn whoami(session: SessionContext) -> ApiResult<HttpResponse> {
        Ok(match session.user() {
            Some(user) => HttpResponse::Ok().body(user.username().as_ref().to_owned()),
            None => HttpResponse::NoContent().finish(),
        })
    }

    async fn call(harness: &TestHarness, cookie: Option<Cookie<'static>>) -> (StatusCode, String) {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(harness.state.clone()))
                .route("/", web::get().to(whoami)),
        )
        .await;
        let mut req = actix_test::TestRequest::get().uri("/");
        if let Some(cookie) = cookie {
            req = req.cookie(cookie);
        }
        let res = actix_test::call_service(&app, req.to_request()).await;
        let status = res.status();
        let body = actix_test::read_body(res).await;
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    #[rstest]
    #[actix_web::test]
    async fn valid_cookie_resolves_the_user(harness: TestHarness) {
        let user = seeded(&harness);
        let token = harness.codec.issue(&user).expect("token");
        let cookie = harness.state.cookies.issue(&token);

        let (status, body) = call(&harness, Some(cookie)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ada_l");
    }

    #[rstest]
    #[case::absent(None)]
    #[case::garbage(Some("not-a-token"))]
    #[case::empty(Some(""))]
    #[actix_web::test]
    async fn missing_or_bad_cookie_is_anonymous(harness: TestHarness, #[case] raw: Option<&str>) {
        let cookie = raw.map(|value| Cookie::new(SESSION_COOKIE, value.to_owned()));
        let (status, _) = call(&harness, cookie).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[rstest]
    #[actix_web::test]
    async fn deleted_user_is_anonymous(harness: TestHarness) {
        let user = seeded(&harness);
        let token = harness.codec.issue(&user).expect("token");
        harness.store.remove_user(user.id());

        let (status, _) = call(&harness, Some(harness.state.cookies.issue(&token))).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[rstest]
    fn issued_cookie_carries_session_attributes(harness: TestHarness) {
        let user = seeded(&harness);
        let token = harness.codec.issue(&user).expect("token");
        let cookie = SessionCookieSettings::new(true, SameSite::Strict).issue(&token);

        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), token.as_str());
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.max_age(), Some(Duration::days(7)));
    }

    #[rstest]
    fn expired_cookie_clears_the_value() {
        let cookie = SessionCookieSettings::insecure_for_tests().expired();
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }
}
