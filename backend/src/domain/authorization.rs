//! Ownership guard for mutating operations.
//!
//! The decision is a pure function of the actor and the resource's author.
//! Callers must keep the two deny reasons apart: an anonymous actor is asked
//! to log in, a foreign actor is told the resource is not theirs.

use tracing::warn;

use super::{Error, User, UserId};

/// Why a mutation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No authenticated actor.
    Unauthenticated,
    /// Actor is authenticated but does not own the resource.
    Forbidden,
}

/// Outcome of [`authorize_mutation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The actor owns the resource.
    Allow,
    /// The actor may not mutate the resource.
    Deny(DenyReason),
}

/// Decide whether `actor` may mutate a resource written by `author`.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use forum_backend::domain::{
///     Decision, DenyReason, Email, User, UserId, Username, authorize_mutation,
/// };
///
/// let ada = User::new(
///     UserId::random(),
///     Email::new("ada@example.com").expect("email"),
///     Username::new("ada_l").expect("username"),
///     Utc::now(),
/// );
/// assert_eq!(authorize_mutation(Some(&ada), ada.id()), Decision::Allow);
/// assert_eq!(
///     authorize_mutation(None, ada.id()),
///     Decision::Deny(DenyReason::Unauthenticated)
/// );
/// ```
#[must_use]
pub fn authorize_mutation(actor: Option<&User>, author: &UserId) -> Decision {
    match actor {
        None => Decision::Deny(DenyReason::Unauthenticated),
        Some(user) if user.id() == author => Decision::Allow,
        Some(_) => Decision::Deny(DenyReason::Forbidden),
    }
}

/// Require an authenticated actor.
///
/// # Errors
///
/// Returns an `unauthorized` error when `actor` is `None`.
pub fn require_actor(actor: Option<&User>) -> Result<&User, Error> {
    actor.ok_or_else(|| Error::unauthorized("login required"))
}

/// Enforce ownership of `resource`, logging and translating any denial.
///
/// `resource` names the target for logs and messages, e.g. `"post"`.
///
/// # Errors
///
/// `unauthorized` for anonymous actors, `forbidden` for non-owners.
pub fn ensure_owner(
    actor: Option<&User>,
    author: &UserId,
    resource: &str,
    resource_id: &dyn std::fmt::Display,
) -> Result<(), Error> {
    match authorize_mutation(actor, author) {
        Decision::Allow => Ok(()),
        Decision::Deny(DenyReason::Unauthenticated) => {
            warn!(resource, %resource_id, reason = "unauthenticated", "mutation denied");
            Err(Error::unauthorized("login required"))
        }
        Decision::Deny(DenyReason::Forbidden) => {
            let actor_id = actor.map(|user| user.id().to_string()).unwrap_or_default();
            warn!(
                resource,
                %resource_id,
                actor_id = %actor_id,
                reason = "forbidden",
                "mutation denied"
            );
            Err(Error::forbidden(format!("you can only modify your own {resource}s")))
        }
    }
}
