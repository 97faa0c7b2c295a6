//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, CommentCommand, CommentQuery, PostCommand, PostQuery, SessionQuery,
};
use crate::inbound::http::session::SessionCookieSettings;

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// Signup and login.
    pub accounts: Arc<dyn AccountCommand>,
    /// Session cookie resolution.
    pub sessions: Arc<dyn SessionQuery>,
    /// Post mutations.
    pub posts: Arc<dyn PostCommand>,
    /// Post reads.
    pub posts_query: Arc<dyn PostQuery>,
    /// Comment mutations.
    pub comments: Arc<dyn CommentCommand>,
    /// Comment reads.
    pub comments_query: Arc<dyn CommentQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Signup and login.
    pub accounts: Arc<dyn AccountCommand>,
    /// Session token resolution.
    pub sessions: Arc<dyn SessionQuery>,
    /// Post mutations.
    pub posts: Arc<dyn PostCommand>,
    /// Post reads and listings.
    pub posts_query: Arc<dyn PostQuery>,
    /// Comment mutations.
    pub comments: Arc<dyn CommentCommand>,
    /// Comment listings.
    pub comments_query: Arc<dyn CommentQuery>,
    /// Attributes for session cookies set by the auth handlers.
    pub cookies: SessionCookieSettings,
}

impl HttpState {
    /// Construct state from a ports bundle and cookie settings.
    ///
    /// # Examples
    /// ```no_run
    /// use forum_backend::inbound::http::session::SessionCookieSettings;
    /// use forum_backend::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// fn wire(ports: HttpStatePorts) -> HttpState {
    ///     HttpState::new(ports, SessionCookieSettings::insecure_for_tests())
    /// }
    /// ```
    pub fn new(ports: HttpStatePorts, cookies: SessionCookieSettings) -> Self {
        let HttpStatePorts {
            accounts,
            sessions,
            posts,
            posts_query,
            comments,
            comments_query,
        } = ports;
        Self {
            accounts,
            sessions,
            posts,
            posts_query,
            comments,
            comments_query,
            cookies,
        }
    }
}
