//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api/v1` handler and the health checks,
//! the domain response types, and the session cookie security scheme. The
//! document backs Swagger UI in debug builds and is exported with
//! `cargo run --bin openapi-dump` for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Author, Comment, Error, ErrorCode, Post, PostSummary, User};
use crate::inbound::http::auth::{LoginBody, SignupBody};
use crate::inbound::http::comments::CommentBodyRequest;
use crate::inbound::http::health::HealthStatus;
use crate::inbound::http::posts::PostBody;
use crate::inbound::http::schemas::{Ack, CommentPageSchema, PostPageSchema, UserEnvelope};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Signed session token issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Forum backend API",
        description = "Accounts, posts and comments behind a signed session cookie."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::signup,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::current_user,
        crate::inbound::http::posts::list_posts,
        crate::inbound::http::posts::list_my_posts,
        crate::inbound::http::posts::get_post,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::update_post,
        crate::inbound::http::posts::delete_post,
        crate::inbound::http::comments::list_comments,
        crate::inbound::http::comments::create_comment,
        crate::inbound::http::comments::update_comment,
        crate::inbound::http::comments::delete_comment,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        UserEnvelope,
        Author,
        Post,
        PostSummary,
        PostPageSchema,
        Comment,
        CommentPageSchema,
        Ack,
        SignupBody,
        LoginBody,
        PostBody,
        CommentBodyRequest,
        HealthStatus,
    )),
    tags(
        (name = "auth", description = "Signup, login and the current session"),
        (name = "posts", description = "Posts and post listings"),
        (name = "comments", description = "Comments on posts"),
        (name = "health", description = "Liveness and readiness checks")
    )
)]
pub struct ApiDoc;
