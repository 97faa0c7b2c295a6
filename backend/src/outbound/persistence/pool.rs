//! Shared PostgreSQL connection pool.
//!
//! Every Diesel repository checks connections out of one `bb8` pool of
//! `diesel-async` connections. Checkout waits at most the configured timeout
//! and failures surface as [`PoolError`], which each repository maps onto
//! the connection variant of its port error.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use tracing::debug;

const DEFAULT_MAX_SIZE: u32 = 10;
const DEFAULT_MIN_IDLE: u32 = 2;
const DEFAULT_CHECKOUT_TIMEOUT: Duration = Duration::from_secs(30);

/// Pool construction or checkout failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// No connection became available in time, or opening one failed.
    #[error("database connection unavailable: {message}")]
    Checkout {
        /// Driver or pool message.
        message: String,
    },
    /// The pool itself could not be created.
    #[error("could not create database pool: {message}")]
    Build {
        /// Driver or pool message.
        message: String,
    },
}

impl PoolError {
    /// Checkout failure carrying `message`.
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    /// Construction failure carrying `message`.
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }
}

/// Sizing and timeout settings for [`DbPool`].
///
/// The idle floor never exceeds the pool size, whichever order the builder
/// methods are called in.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use forum_backend::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("postgres://forum@localhost/forum")
///     .with_max_size(1)
///     .with_checkout_timeout(Duration::from_secs(5));
/// assert_eq!(config.max_size(), 1);
/// assert_eq!(config.min_idle(), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    min_idle: Option<u32>,
    checkout_timeout: Duration,
}

impl PoolConfig {
    /// Settings for `database_url` with ten connections, two kept warm and a
    /// thirty second checkout timeout.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: DEFAULT_MAX_SIZE,
            min_idle: Some(DEFAULT_MIN_IDLE),
            checkout_timeout: DEFAULT_CHECKOUT_TIMEOUT,
        }
    }

    /// Cap the pool at `max_size` connections (at least one).
    #[must_use]
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size.max(1);
        self.min_idle = self.min_idle.map(|idle| idle.min(self.max_size));
        self
    }

    /// Keep `min_idle` connections open, or none when `None`.
    #[must_use]
    pub fn with_min_idle(mut self, min_idle: Option<u32>) -> Self {
        self.min_idle = min_idle.map(|idle| idle.min(self.max_size));
        self
    }

    /// Give up on checkout after `timeout`.
    #[must_use]
    pub const fn with_checkout_timeout(mut self, timeout: Duration) -> Self {
        self.checkout_timeout = timeout;
        self
    }

    /// Connection string.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Maximum open connections.
    #[must_use]
    pub const fn max_size(&self) -> u32 {
        self.max_size
    }

    /// Idle connections kept open.
    #[must_use]
    pub const fn min_idle(&self) -> Option<u32> {
        self.min_idle
    }
}

/// Cloneable handle to the shared pool.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build the pool described by `config`.
    ///
    /// # Errors
    ///
    /// [`PoolError::Build`] when the warm connections cannot be opened.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.database_url());
        let inner = Pool::builder()
            .max_size(config.max_size)
            .min_idle(config.min_idle)
            .connection_timeout(config.checkout_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;
        debug!(
            max_size = config.max_size,
            min_idle = config.min_idle.unwrap_or(0),
            "database pool ready"
        );
        Ok(Self { inner })
    }

    /// Check out a connection.
    ///
    /// # Errors
    ///
    /// [`PoolError::Checkout`] when none is available within the timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    //! Pool sizing rules.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_suit_a_small_deployment() {
        let config = PoolConfig::new("postgres://localhost/forum");

        assert_eq!(config.database_url(), "postgres://localhost/forum");
        assert_eq!(config.max_size(), DEFAULT_MAX_SIZE);
        assert_eq!(config.min_idle(), Some(DEFAULT_MIN_IDLE));
        assert_eq!(config.checkout_timeout, DEFAULT_CHECKOUT_TIMEOUT);
    }

    #[rstest]
    #[case::shrinking_max_lowers_idle(1, Some(2), Some(1))]
    #[case::zero_max_is_raised(0, None, None)]
    #[case::idle_within_max_is_kept(20, Some(5), Some(5))]
    fn idle_floor_never_exceeds_pool_size(
        #[case] max_size: u32,
        #[case] min_idle: Option<u32>,
        #[case] expected_idle: Option<u32>,
    ) {
        let config = PoolConfig::new("postgres://localhost/forum")
            .with_min_idle(min_idle)
            .with_max_size(max_size);

        assert!(config.max_size() >= 1);
        assert_eq!(config.min_idle(), expected_idle);
    }

    #[rstest]
    #[case(PoolError::checkout("connection refused"), "unavailable")]
    #[case(PoolError::build("invalid URL"), "could not create")]
    fn errors_name_the_failing_stage(#[case] error: PoolError, #[case] stage: &str) {
        assert!(error.to_string().contains(stage));
    }
}
