//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters and
//! report typed persistence errors. Driving ports (`*Command`, `*Query`) are
//! implemented by domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod comment_command;
mod comment_query;
mod comment_repository;
mod post_command;
mod post_query;
mod post_repository;
mod session_query;
mod user_repository;

pub use account_command::{AccountCommand, LoginOutcome};
pub use comment_command::CommentCommand;
pub use comment_query::CommentQuery;
#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::{CommentPersistenceError, CommentRepository};
pub use post_command::PostCommand;
pub use post_query::PostQuery;
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{PostPersistenceError, PostRepository};
pub use session_query::SessionQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{StoredUser, UniqueField, UserPersistenceError, UserRepository};
