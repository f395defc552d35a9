//! Runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the stores and the
//! router. Request handling never reads process environment variables.
//!
//! Every value is parsed from an `Option<String>` so the parsing rules can be exercised in tests
//! without mutating the process environment.

use crate::constants::{
    DEFAULT_MONGODB_DATABASE, DEFAULT_MONGODB_HOST, DEFAULT_MONGODB_PORT,
    DEFAULT_MONGODB_TIMEOUT_SECONDS, DEFAULT_PORT, ENVIRONMENT_ENV, MONGODB_DATABASE_ENV,
    MONGODB_HOST_ENV, MONGODB_PASSWORD_ENV, MONGODB_PORT_ENV, MONGODB_TIMEOUT_ENV,
    MONGODB_USERNAME_ENV, PORT_ENV, PRODUCTION_ENVIRONMENT,
};
use crate::{ConfigError, ConfigResult};
use std::time::Duration;

/// HTTP service configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceConfig {
    port: u16,
    production: bool,
}

impl ServiceConfig {
    pub fn new(port: u16, production: bool) -> Self {
        Self { port, production }
    }

    /// Resolve the service configuration through `lookup`, usually `std::env::var`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the port is not a valid `u16`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        Ok(Self {
            port: port_from_env_value(PORT_ENV, lookup(PORT_ENV), DEFAULT_PORT)?,
            production: is_production_from_env_value(lookup(ENVIRONMENT_ENV)),
        })
    }

    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Whether the stricter production mode is selected.
    pub fn is_production(&self) -> bool {
        self.production
    }

    /// Listen address for all interfaces on the configured port.
    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

/// Connection settings for the MongoDB backend.
#[derive(Clone, PartialEq, Eq)]
pub struct MongoConfig {
    host: String,
    port: u16,
    username: Option<String>,
    password: Option<String>,
    database: String,
    timeout: Duration,
}

impl std::fmt::Debug for MongoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("database", &self.database)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl MongoConfig {
    /// Resolve MongoDB settings through `lookup`, falling back to local defaults.
    ///
    /// Username and password are only kept when non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if:
    /// - the port is not a valid `u16`,
    /// - the timeout is not a positive number of seconds, or
    /// - the database name is blank.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let host = non_empty(lookup(MONGODB_HOST_ENV))
            .unwrap_or_else(|| DEFAULT_MONGODB_HOST.to_string());
        let port = port_from_env_value(
            MONGODB_PORT_ENV,
            lookup(MONGODB_PORT_ENV),
            DEFAULT_MONGODB_PORT,
        )?;
        let database = match lookup(MONGODB_DATABASE_ENV) {
            None => DEFAULT_MONGODB_DATABASE.to_string(),
            Some(value) if value.trim().is_empty() => {
                return Err(ConfigError::InvalidValue {
                    name: MONGODB_DATABASE_ENV,
                    reason: "database name cannot be empty".into(),
                })
            }
            Some(value) => value.trim().to_string(),
        };
        let timeout = timeout_from_env_value(lookup(MONGODB_TIMEOUT_ENV))?;

        Ok(Self {
            host,
            port,
            username: non_empty(lookup(MONGODB_USERNAME_ENV)),
            password: non_empty(lookup(MONGODB_PASSWORD_ENV)),
            database,
            timeout,
        })
    }

    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Connection string without credentials; those are attached separately.
    pub fn connection_uri(&self) -> String {
        format!("mongodb://{}:{}", self.host, self.port)
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a port from an optional value, using `default` when unset or blank.
pub fn port_from_env_value(
    name: &'static str,
    value: Option<String>,
    default: u16,
) -> ConfigResult<u16> {
    match non_empty(value) {
        None => Ok(default),
        Some(v) => v.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
            name,
            reason: format!("'{v}' is not a valid port: {e}"),
        }),
    }
}

/// Production mode is selected only by the exact word `production`, in any letter case.
pub fn is_production_from_env_value(value: Option<String>) -> bool {
    value
        .map(|v| v.trim().eq_ignore_ascii_case(PRODUCTION_ENVIRONMENT))
        .unwrap_or(false)
}

fn timeout_from_env_value(value: Option<String>) -> ConfigResult<Duration> {
    let Some(v) = non_empty(value) else {
        return Ok(Duration::from_secs(DEFAULT_MONGODB_TIMEOUT_SECONDS));
    };
    match v.parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidValue {
            name: MONGODB_TIMEOUT_ENV,
            reason: "timeout must be at least one second".into(),
        }),
        Ok(seconds) => Ok(Duration::from_secs(seconds)),
        Err(e) => Err(ConfigError::InvalidValue {
            name: MONGODB_TIMEOUT_ENV,
            reason: format!("'{v}' is not a number of seconds: {e}"),
        }),
    }
}
