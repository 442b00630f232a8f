//! PostgreSQL schema for the bot: users, their daily activity, and the
//! one-row-per-user-per-day index.

use sqlx::PgConnection;

use crate::error::StorageError;

pub const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id SERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL UNIQUE,
    username VARCHAR(50),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    language VARCHAR(10) NOT NULL DEFAULT 'ru',
    role VARCHAR(30) NOT NULL DEFAULT 'user',
    is_alive BOOLEAN NOT NULL DEFAULT TRUE,
    banned BOOLEAN NOT NULL DEFAULT FALSE
)
"#;

pub const CREATE_ACTIVITY_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS activity (
    id SERIAL PRIMARY KEY,
    user_id BIGINT REFERENCES users(user_id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    activity_date DATE NOT NULL DEFAULT CURRENT_DATE,
    actions INT NOT NULL DEFAULT 1
)
"#;

pub const ACTIVITY_USER_DAY_INDEX: &str = "idx_activity_user_day";

// `actions` is bumped by upserts targeting this index (ON CONFLICT (user_id, activity_date)).
pub const CREATE_ACTIVITY_USER_DAY_INDEX: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_activity_user_day ON activity (user_id, activity_date)";

/// One DDL statement plus the name it is reported under in logs and errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchemaStatement {
    pub name: &'static str,
    pub sql: &'static str,
}

/// Statements in execution order. `activity` references `users`, and the
/// index is built on `activity`.
pub const SCHEMA_STATEMENTS: [SchemaStatement; 3] = [
    SchemaStatement { name: "create_users_table", sql: CREATE_USERS_TABLE },
    SchemaStatement { name: "create_activity_table", sql: CREATE_ACTIVITY_TABLE },
    SchemaStatement { name: "create_activity_user_day_index", sql: CREATE_ACTIVITY_USER_DAY_INDEX },
];

/// Apply every schema statement on `conn`, stopping at the first failure.
///
/// The caller owns the transaction; this never commits or rolls back.
pub(crate) async fn run_pg_migrations(conn: &mut PgConnection) -> Result<(), StorageError> {
    for statement in &SCHEMA_STATEMENTS {
        tracing::debug!(statement = statement.name, "executing schema statement");
        sqlx::query(statement.sql)
            .execute(&mut *conn)
            .await
            .map_err(|source| StorageError::Statement { statement: statement.name, source })?;
    }
    Ok(())
}
