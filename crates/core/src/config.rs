//! Process configuration.
//!
//! Built once at startup and passed by reference into provisioning. Values
//! come from `DB_*` and `LOG_*` keys read through a lookup closure, which lets
//! the cli put its flag overrides in front of the process environment.

use std::fmt;
use std::str::FromStr;

use crate::constants::{DEFAULT_DB_HOST, DEFAULT_DB_PORT, DEFAULT_LOG_LEVEL, MASKED_PASSWORD};
use crate::env_config::{optional, parse_or_default, required};
use crate::error::ConfigError;

/// Connection parameters for the target database.
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    /// Schema to provision into, applied as the session `search_path`.
    /// `None` leaves the server default (normally `public`).
    pub schema: Option<String>,
}

impl DbConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            host: optional(&lookup, "DB_HOST").unwrap_or_else(|| DEFAULT_DB_HOST.to_owned()),
            port: parse_or_default(&lookup, "DB_PORT", DEFAULT_DB_PORT)?,
            name: required(&lookup, "DB_NAME")?,
            user: required(&lookup, "DB_USER")?,
            password: lookup("DB_PASSWORD").unwrap_or_default(),
            schema: optional(&lookup, "DB_SCHEMA"),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Missing("DB_HOST"));
        }
        if self.name.trim().is_empty() {
            return Err(ConfigError::Missing("DB_NAME"));
        }
        if self.user.trim().is_empty() {
            return Err(ConfigError::Missing("DB_USER"));
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid { var: "DB_PORT", reason: "port must be non-zero".into() });
        }
        if let Some(schema) = &self.schema {
            if !is_plain_identifier(schema) {
                return Err(ConfigError::Invalid {
                    var: "DB_SCHEMA",
                    reason: format!("{schema:?} is not a plain identifier"),
                });
            }
        }
        Ok(())
    }

    /// Connection descriptor in `key=value` form.
    ///
    /// With `mask_password` set the password is replaced, which is the form
    /// used by `Display` and `Debug`.
    pub fn descriptor(&self, mask_password: bool) -> String {
        let password = if mask_password { MASKED_PASSWORD } else { self.password.as_str() };
        format!(
            "host={} port={} dbname={} user={} password={}",
            self.host, self.port, self.name, self.user, password
        )
    }
}

impl fmt::Display for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.descriptor(true))?;
        if let Some(schema) = &self.schema {
            write!(f, " search_path={schema}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &MASKED_PASSWORD)
            .field("schema", &self.schema)
            .finish()
    }
}

fn is_plain_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Output layout of the log subscriber.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            other => Err(format!("unknown log format {other:?} (expected full, compact or pretty)")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Full => "full",
            Self::Compact => "compact",
            Self::Pretty => "pretty",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogConfig {
    /// Filter directive, e.g. `info` or `bot_schema_storage=debug`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: DEFAULT_LOG_LEVEL.to_owned(), format: LogFormat::default() }
    }
}

impl LogConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            level: optional(&lookup, "LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_owned()),
            format: parse_or_default(&lookup, "LOG_FORMAT", LogFormat::default())?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub db: DbConfig,
    pub log: LogConfig,
}

impl Config {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self { log: LogConfig::from_lookup(&lookup)?, db: DbConfig::from_lookup(&lookup)? })
    }
}
