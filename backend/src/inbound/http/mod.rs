//! HTTP inbound adapter exposing the REST API.

pub mod auth;
pub mod comments;
pub mod error;
pub mod health;
pub mod listing;
pub mod posts;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub(crate) mod validation;

use actix_web::web;

use crate::domain::Error;

pub use error::ApiResult;

/// Register every `/api/v1` route on `cfg`.
///
/// Mount inside `web::scope("/api/v1")`. Malformed JSON bodies are reported
/// with the standard error payload.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use forum_backend::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("malformed JSON body: {err}")).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("malformed query string: {err}")).into()
    }))
    .service(auth::signup)
    .service(auth::login)
    .service(auth::logout)
    .service(auth::current_user)
    .service(posts::list_my_posts)
    .service(posts::list_posts)
    .service(posts::create_post)
    .service(posts::get_post)
    .service(posts::update_post)
    .service(posts::delete_post)
    .service(comments::list_comments)
    .service(comments::create_comment)
    .service(comments::update_comment)
    .service(comments::delete_comment);
}
