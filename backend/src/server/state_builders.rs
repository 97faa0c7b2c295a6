//! Builders wiring repository adapters into the HTTP state.

use std::sync::Arc;

use mockable::Clock;
use tracing::{info, warn};

use forum_backend::domain::ports::{CommentRepository, PostRepository, UserRepository};
use forum_backend::domain::{
    AccountService, CommentService, CredentialError, CredentialStore, PostService,
    SessionResolver, SessionTokenCodec,
};
use forum_backend::inbound::http::session::SessionCookieSettings;
use forum_backend::inbound::http::state::{HttpState, HttpStatePorts};
use forum_backend::outbound::memory::MemoryStore;
use forum_backend::outbound::persistence::{
    DieselCommentRepository, DieselPostRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Session primitives shared by the account service and resolver.
struct SessionServices {
    credentials: CredentialStore,
    codec: SessionTokenCodec,
    clock: Arc<dyn Clock>,
}

/// Build driving ports over one set of repositories.
fn build_ports<U, P, C>(
    users: Arc<U>,
    posts: Arc<P>,
    comments: Arc<C>,
    session: SessionServices,
) -> HttpStatePorts
where
    U: UserRepository + 'static,
    P: PostRepository + 'static,
    C: CommentRepository + 'static,
{
    let SessionServices {
        credentials,
        codec,
        clock,
    } = session;
    let accounts = AccountService::new(users.clone(), credentials, codec.clone(), clock.clone());
    let sessions = SessionResolver::new(codec, users);
    let post_service = Arc::new(PostService::new(posts.clone(), clock.clone()));
    let comment_service = Arc::new(CommentService::new(comments, posts, clock));

    HttpStatePorts {
        accounts: Arc::new(accounts),
        sessions: Arc::new(sessions),
        posts: post_service.clone(),
        posts_query: post_service,
        comments: comment_service.clone(),
        comments_query: comment_service,
    }
}

/// Build the HTTP state, backed by PostgreSQL when a pool is configured and
/// by an in-memory store otherwise.
///
/// # Errors
///
/// Returns [`CredentialError`] when the configured hash cost is rejected.
pub(super) fn build_http_state(
    config: &ServerConfig,
    clock: Arc<dyn Clock>,
) -> Result<HttpState, CredentialError> {
    let settings = &config.session;
    let session = SessionServices {
        credentials: CredentialStore::new(settings.hash_cost)?,
        codec: SessionTokenCodec::new(&settings.secret, clock.clone()),
        clock,
    };

    let ports = match &config.db_pool {
        Some(pool) => {
            info!("serving from PostgreSQL");
            build_ports(
                Arc::new(DieselUserRepository::new(pool.clone())),
                Arc::new(DieselPostRepository::new(pool.clone())),
                Arc::new(DieselCommentRepository::new(pool.clone())),
                session,
            )
        }
        None => {
            warn!("no database configured; data is kept in memory and lost on restart");
            let store = Arc::new(MemoryStore::default());
            build_ports(store.clone(), store.clone(), store, session)
        }
    };
    Ok(HttpState::new(ports, SessionCookieSettings::from(settings)))
}
