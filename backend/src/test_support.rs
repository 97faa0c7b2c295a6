//! Shared test doubles for unit and integration tests.
//!
//! Compiled for this crate's own tests and, through the `test-support`
//! feature, for the integration suites under `tests/`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    AccountService, CommentService, CredentialStore, MIN_HASH_COST, PostService, SessionResolver,
    SessionSecret, SessionTokenCodec,
};
use crate::inbound::http::session::SessionCookieSettings;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::MemoryStore;

/// Controllable clock; optionally advances by a fixed step on every read.
#[derive(Debug)]
pub struct MutableClock {
    now: Mutex<DateTime<Utc>>,
    step: TimeDelta,
}

impl MutableClock {
    /// A clock frozen at `now` until advanced explicitly.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::ticking(now, TimeDelta::zero())
    }

    /// A clock that moves forward by `step` after every read.
    #[must_use]
    pub fn ticking(start: DateTime<Utc>, step: TimeDelta) -> Self {
        Self {
            now: Mutex::new(start),
            step,
        }
    }

    /// Move the clock forward.
    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let mut guard = self.lock_clock();
        let current = *guard;
        *guard += self.step;
        current
    }
}

/// Fixed instant used as the epoch of test fixtures.
#[must_use]
pub fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Secret used by fixture codecs.
#[must_use]
pub fn fixture_secret() -> SessionSecret {
    SessionSecret::new(b"fixture-session-secret-0123456789abcdef".to_vec())
}

/// Fully wired in-memory application for handler and end-to-end tests.
#[derive(Clone)]
pub struct TestHarness {
    /// State to register with `web::Data`.
    pub state: HttpState,
    /// Backing store, for seeding and inspection.
    pub store: Arc<MemoryStore>,
    /// Clock shared by every service.
    pub clock: Arc<MutableClock>,
    /// Codec sharing the harness secret, for minting tokens directly.
    pub codec: SessionTokenCodec,
}

impl TestHarness {
    /// Harness whose clock advances one second per read.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(MutableClock::ticking(
            fixture_timestamp(),
            TimeDelta::seconds(1),
        )))
    }

    /// Harness driven by `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<MutableClock>) -> Self {
        let store = Arc::new(MemoryStore::default());
        let shared_clock: Arc<dyn Clock> = clock.clone();
        let codec = SessionTokenCodec::new(&fixture_secret(), shared_clock.clone());
        let credentials = CredentialStore::new(MIN_HASH_COST).unwrap_or_default();

        let accounts = AccountService::new(
            store.clone(),
            credentials,
            codec.clone(),
            shared_clock.clone(),
        );
        let sessions = SessionResolver::new(codec.clone(), store.clone());
        let posts = PostService::new(store.clone(), shared_clock.clone());
        let comments = CommentService::new(store.clone(), store.clone(), shared_clock);
        let posts = Arc::new(posts);
        let comments = Arc::new(comments);

        let state = HttpState::new(
            HttpStatePorts {
                accounts: Arc::new(accounts),
                sessions: Arc::new(sessions),
                posts: posts.clone(),
                posts_query: posts,
                comments: comments.clone(),
                comments_query: comments,
            },
            SessionCookieSettings::insecure_for_tests(),
        );

        Self {
            state,
            store,
            clock,
            codec,
        }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
