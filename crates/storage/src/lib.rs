//! Storage layer for bot-schema
//!
//! Creates the `users` and `activity` tables and the per-day activity index
//! inside one PostgreSQL transaction.

mod error;
mod pg_migrations;
mod provisioner;

pub use error::StorageError;
pub use pg_migrations::{
    SchemaStatement, ACTIVITY_USER_DAY_INDEX, CREATE_ACTIVITY_TABLE, CREATE_ACTIVITY_USER_DAY_INDEX,
    CREATE_USERS_TABLE, SCHEMA_STATEMENTS,
};
pub use provisioner::{provision_schema, SchemaProvisioner};
