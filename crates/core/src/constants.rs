//! Shared constants for bot-schema.

/// Upper bound on the single connection attempt, for peers that never answer.
/// Refusals and auth failures return as soon as the server reports them.
pub const PG_CONNECT_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL port used when `DB_PORT` is not set.
pub const DEFAULT_DB_PORT: u16 = 5432;

/// Host used when `DB_HOST` is not set.
pub const DEFAULT_DB_HOST: &str = "localhost";

/// Log level used when `LOG_LEVEL` is not set.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Replacement text for the password when a descriptor is rendered for logs.
pub const MASKED_PASSWORD: &str = "***";
