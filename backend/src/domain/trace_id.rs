//! Correlation identifier for one request.
//!
//! The middleware installs a [`TraceId`] in task-local storage for the
//! lifetime of the request future. [`crate::domain::Error`] constructors
//! stamp it onto error bodies and the request span records it for logs.
//! Task-locals do not follow work onto other threads: hop onto the blocking
//! pool through [`spawn_blocking_traced`].

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task::JoinError;
use uuid::Uuid;

/// Header that carries the identifier in both directions.
pub const TRACE_ID_HEADER: &str = "trace-id";

tokio::task_local! {
    static CURRENT: TraceId;
}

/// Request correlation identifier, a v4 UUID.
///
/// ```
/// use forum_backend::TraceId;
///
/// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
/// let id: TraceId = "0f8e3c2a-5b14-4d6e-9a71-2c3b4d5e6f70".parse().expect("uuid");
/// assert_eq!(TraceId::scope(id, async { TraceId::current() }).await, Some(id));
/// assert_eq!(TraceId::current(), None);
/// # });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The identifier of the request being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Drive `fut` with `trace_id` as the current identifier.
    pub async fn scope<Fut: Future>(trace_id: Self, fut: Fut) -> Fut::Output {
        CURRENT.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Run `work` on the blocking pool, carrying the current trace identifier.
///
/// Password hashing and migrations go through here.
///
/// # Errors
///
/// Returns the [`JoinError`] when `work` panics.
pub async fn spawn_blocking_traced<F, R>(work: F) -> Result<R, JoinError>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let inherited = TraceId::current();
    tokio::task::spawn_blocking(move || match inherited {
        Some(id) => CURRENT.sync_scope(id, work),
        None => work(),
    })
    .await
}
