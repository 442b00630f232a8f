use bot_schema_storage::SCHEMA_STATEMENTS;

pub(crate) fn run() {
    for statement in &SCHEMA_STATEMENTS {
        println!("-- {}", statement.name);
        println!("{};", statement.sql.trim());
        println!();
    }
}
