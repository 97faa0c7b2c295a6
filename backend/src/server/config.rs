//! Server settings loaded via OrthoConfig and the assembled runtime config.

use std::net::{AddrParseError, SocketAddr};

use forum_backend::inbound::http::session_config::SessionSettings;
use forum_backend::outbound::persistence::DbPool;
use ortho_config::OrthoConfig;
use serde::Deserialize;

/// Listen address used when none is configured.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Listener and storage settings (`FORUM_*` variables or CLI flags).
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FORUM")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = DEFAULT_DB_MAX_CONNECTIONS)]
    pub db_max_connections: u32,
}

impl ServerSettings {
    /// Configured listen address, falling back to [`DEFAULT_BIND_ADDR`].
    ///
    /// # Errors
    ///
    /// Returns [`AddrParseError`] when the configured value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .trim()
            .parse()
    }

    /// Database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Pool size, at least one connection.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.max(1)
    }
}

/// Everything [`super::create_server`] needs, resolved at startup.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Configuration serving from memory until a pool is attached.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self {
            session,
            bind_addr,
            db_pool: None,
        }
    }

    /// Attach a database connection pool; repositories become Diesel-backed.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    const VARS: [&str; 3] = [
        "FORUM_BIND_ADDR",
        "FORUM_DATABASE_URL",
        "FORUM_DB_MAX_CONNECTIONS",
    ];

    fn load(args: &[&str]) -> ServerSettings {
        let argv = std::iter::once("forum-backend")
            .chain(args.iter().copied())
            .map(OsString::from);
        ServerSettings::load_from_iter(argv).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load(&[]);
        assert_eq!(
            settings.bind_addr().expect("default parses"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("constant")
        );
        assert_eq!(settings.database_url(), None);
        assert_eq!(settings.db_max_connections(), DEFAULT_DB_MAX_CONNECTIONS);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("FORUM_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "FORUM_DATABASE_URL",
                Some("postgres://forum@localhost/forum".to_owned()),
            ),
            ("FORUM_DB_MAX_CONNECTIONS", Some("0".to_owned())),
        ]);

        let settings = load(&[]);
        assert_eq!(
            settings.bind_addr().expect("parses").port(),
            9000
        );
        assert_eq!(
            settings.database_url(),
            Some("postgres://forum@localhost/forum")
        );
        assert_eq!(settings.db_max_connections(), 1);
    }

    #[rstest]
    fn cli_flags_override_environment() {
        let _guard = lock_env([
            ("FORUM_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            ("FORUM_DATABASE_URL", Some("   ".to_owned())),
            ("FORUM_DB_MAX_CONNECTIONS", None),
        ]);

        let settings = load(&["--bind-addr", "127.0.0.1:9100"]);
        assert_eq!(settings.bind_addr().expect("parses").port(), 9100);
        assert_eq!(settings.database_url(), None, "blank URL means memory");
    }

    #[rstest]
    fn malformed_bind_addr_is_an_error() {
        let settings = ServerSettings {
            bind_addr: Some("localhost".to_owned()),
            database_url: None,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
        };
        assert!(settings.bind_addr().is_err());
    }
}
