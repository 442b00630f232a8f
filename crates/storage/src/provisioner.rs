//! One-shot schema provisioning over a single, exclusively owned connection.

use std::time::Duration;

use bot_schema_core::{DbConfig, PG_CONNECT_TIMEOUT_SECS};
use sqlx::postgres::PgConnectOptions;
use sqlx::{ConnectOptions, Connection, PgConnection};

use crate::error::StorageError;
use crate::pg_migrations::run_pg_migrations;

/// Owns the connection for the lifetime of one provisioning run.
///
/// Always finish with [`SchemaProvisioner::close`]; [`provision_schema`] does
/// that on every exit path.
#[derive(Debug)]
pub struct SchemaProvisioner {
    conn: PgConnection,
}

impl SchemaProvisioner {
    /// Make exactly one connection attempt. A refused, unresolvable or
    /// unauthenticated connection comes back as-is; a silent peer is cut off
    /// after `PG_CONNECT_TIMEOUT_SECS`.
    pub async fn connect(config: &DbConfig) -> Result<Self, StorageError> {
        let options = connect_options(config);
        let timeout = Duration::from_secs(PG_CONNECT_TIMEOUT_SECS);
        let conn = match tokio::time::timeout(timeout, options.connect()).await {
            Ok(Ok(conn)) => conn,
            Ok(Err(source)) => {
                return Err(StorageError::Connect { target: config.to_string(), source });
            },
            Err(_) => {
                return Err(StorageError::ConnectTimeout {
                    target: config.to_string(),
                    secs: PG_CONNECT_TIMEOUT_SECS,
                });
            },
        };
        tracing::debug!(database = %config, "connected");
        Ok(Self { conn })
    }

    /// Create the tables and index in one transaction.
    ///
    /// Either all statements commit or none do. A failed rollback is only
    /// logged; the statement error is what gets returned.
    pub async fn provision(&mut self) -> Result<(), StorageError> {
        let mut tx = self.conn.begin().await.map_err(StorageError::Transaction)?;

        if let Err(err) = run_pg_migrations(&mut *tx).await {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(error = %rollback_err, "rollback after failed schema statement failed");
            }
            return Err(err);
        }

        tx.commit().await.map_err(StorageError::Transaction)
    }

    /// Send Terminate and drop the socket. Best-effort: a failure here is
    /// logged and never replaces the provisioning outcome.
    pub async fn close(self) {
        match self.conn.close().await {
            Ok(()) => tracing::debug!("connection closed"),
            Err(err) => tracing::warn!(error = %err, "failed to close connection cleanly"),
        }
    }
}

/// Connect, provision, and close the connection whatever the outcome.
pub async fn provision_schema(config: &DbConfig) -> Result<(), StorageError> {
    let result = match SchemaProvisioner::connect(config).await {
        Ok(mut provisioner) => {
            let result = provisioner.provision().await;
            provisioner.close().await;
            result
        },
        Err(err) => Err(err),
    };

    match &result {
        Ok(()) => tracing::info!("tables `users` and `activity` created"),
        Err(err) => tracing::error!(error = %err, sqlstate = ?err.sqlstate(), "failed to create tables"),
    }
    result
}

fn connect_options(config: &DbConfig) -> PgConnectOptions {
    let mut options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .database(&config.name)
        .username(&config.user);
    if !config.password.is_empty() {
        options = options.password(&config.password);
    }
    if let Some(schema) = &config.schema {
        options = options.options([("search_path", schema.as_str())]);
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn config(schema: Option<&str>) -> DbConfig {
        DbConfig {
            host: "db.internal".to_owned(),
            port: 6432,
            name: "bot".to_owned(),
            user: "bot_owner".to_owned(),
            password: "s3cret".to_owned(),
            schema: schema.map(str::to_owned),
        }
    }

    #[test]
    fn test_connect_options_follow_config() {
        let options = connect_options(&config(None));
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6432);
        assert_eq!(options.get_database(), Some("bot"));
        assert_eq!(options.get_username(), "bot_owner");
    }

    #[test]
    fn test_schema_becomes_search_path() {
        let options = connect_options(&config(Some("tenant_42")));
        let startup = options.get_options().unwrap_or_default();
        assert!(startup.contains("search_path=tenant_42"), "got {startup:?}");
    }

    #[tokio::test]
    async fn test_refused_connection_fails_fast_with_os_error() {
        let mut config = config(None);
        config.host = "127.0.0.1".to_owned();
        // Nothing listens on port 1.
        config.port = 1;

        let started = Instant::now();
        let err = provision_schema(&config).await.unwrap_err();
        let elapsed = started.elapsed();

        assert!(elapsed < Duration::from_millis(1000), "took {elapsed:?}: {err}");
        assert!(matches!(err, StorageError::Connect { .. }), "unexpected error: {err}");
        assert!(err.is_connection());
        let message = err.to_string();
        assert!(message.to_lowercase().contains("refused"), "cause lost: {message}");
        assert!(!message.contains("s3cret"));
    }
}
