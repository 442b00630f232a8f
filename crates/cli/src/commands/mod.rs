pub(crate) mod print_sql;
pub(crate) mod provision;
