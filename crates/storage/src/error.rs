//! Typed error enum for schema provisioning.
//!
//! Each variant marks the phase that failed, so the caller can tell a
//! misconfigured connection from a rejected DDL statement without
//! inspecting message text.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// Could not reach or authenticate to the database. Never retried.
    #[error("failed to connect to {target}: {source}")]
    Connect {
        /// Connection descriptor with the password masked.
        target: String,
        #[source]
        source: sqlx::Error,
    },

    /// The server accepted no connection within the connect timeout.
    #[error("timed out after {secs}s connecting to {target}")]
    ConnectTimeout { target: String, secs: u64 },

    /// A DDL statement was rejected; the transaction has been aborted.
    #[error("schema statement `{statement}` failed: {source}")]
    Statement {
        statement: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// BEGIN or COMMIT failed.
    #[error("transaction error: {0}")]
    Transaction(#[source] sqlx::Error),
}

impl StorageError {
    fn sqlx_source(&self) -> Option<&sqlx::Error> {
        match self {
            Self::Connect { source, .. } | Self::Statement { source, .. } => Some(source),
            Self::Transaction(source) => Some(source),
            Self::ConnectTimeout { .. } => None,
        }
    }

    /// SQLSTATE reported by the server, if the failure came from the database itself.
    pub fn sqlstate(&self) -> Option<String> {
        self.sqlx_source()?
            .as_database_error()
            .and_then(|db_err| db_err.code())
            .map(|code| code.into_owned())
    }

    /// Whether the database was never reached, as opposed to rejecting the schema.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connect { .. } | Self::ConnectTimeout { .. })
    }
}
