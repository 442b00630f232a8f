//! Default command: apply the schema and exit.

use anyhow::{Context, Result};
use bot_schema_core::Config;
use bot_schema_storage::provision_schema;

pub(crate) async fn run(config: &Config) -> Result<()> {
    tracing::info!(database = %config.db, "provisioning schema");

    // The storage crate has already logged the failure with its database detail.
    match provision_schema(&config.db).await {
        Ok(()) => Ok(()),
        Err(err) if err.is_connection() => {
            Err(err).context("database unreachable; check DB_HOST, DB_PORT and credentials")
        },
        Err(err) => Err(err.into()),
    }
}
