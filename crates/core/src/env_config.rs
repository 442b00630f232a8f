//! Environment lookups with typed parsing.
//!
//! Every helper takes a lookup closure instead of reading `std::env` directly,
//! so configuration can be assembled from any key/value source.

use std::str::FromStr;

use crate::error::ConfigError;

/// Fetch a variable, treating unset and blank values the same way.
pub(crate) fn optional<F>(lookup: &F, var: &'static str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

/// Fetch a variable that has no sensible default.
pub(crate) fn required<F>(lookup: &F, var: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, var).ok_or(ConfigError::Missing(var))
}

/// Parse a variable, falling back to `default` only when it is unset.
///
/// Unlike a lenient `parse().ok().unwrap_or(default)`, a value that is set but
/// does not parse is an error: a typo in `DB_PORT` must not silently connect
/// to the default port.
pub(crate) fn parse_or_default<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional(lookup, var) {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: format!("{raw:?}: {e}"),
        }),
        None => Ok(default),
    }
}
