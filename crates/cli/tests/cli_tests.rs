use assert_cmd::Command;
use predicates::prelude::*;

fn bot_schema() -> Command {
    let mut cmd = Command::cargo_bin("bot-schema").unwrap();
    cmd.env_clear();
    cmd
}

#[test]
fn test_cli_help() {
    bot_schema()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("users and activity tables"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_dry_run_prints_statements_in_order() {
    let output = bot_schema().arg("--dry-run").assert().success().get_output().stdout.clone();
    let stdout = String::from_utf8(output).unwrap();

    let users = stdout.find("CREATE TABLE IF NOT EXISTS users").unwrap();
    let activity = stdout.find("CREATE TABLE IF NOT EXISTS activity").unwrap();
    let index = stdout.find("CREATE UNIQUE INDEX IF NOT EXISTS idx_activity_user_day").unwrap();
    assert!(users < activity && activity < index, "unexpected order:\n{stdout}");
}

#[test]
fn test_dry_run_needs_no_database_settings() {
    bot_schema().arg("--dry-run").assert().success().stderr(predicate::str::contains("DB_NAME").not());
}

#[test]
fn test_missing_dbname_fails() {
    bot_schema()
        .args(["--user", "bot"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("DB_NAME"));
}

#[test]
fn test_bad_log_format_fails() {
    bot_schema()
        .env("LOG_FORMAT", "%(asctime)s %(message)s")
        .arg("--dry-run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("LOG_FORMAT"));
}

#[test]
fn test_log_format_flag_overrides_env() {
    bot_schema()
        .env("LOG_FORMAT", "xml")
        .args(["--dry-run", "--log-format", "compact"])
        .assert()
        .success();
}

#[test]
fn test_unreachable_database_fails_without_leaking_password() {
    bot_schema()
        .env("DB_PASSWORD", "hunter2")
        .args(["--host", "127.0.0.1", "--port", "1", "--dbname", "bot", "--user", "bot"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to create tables"))
        .stderr(predicate::str::contains("failed to connect to host=127.0.0.1 port=1"))
        .stderr(predicate::str::contains("database unreachable"))
        .stderr(predicate::str::contains("hunter2").not());
}

#[test]
fn test_unreachable_database_exits_promptly() {
    let started = std::time::Instant::now();
    bot_schema()
        .args(["--host", "127.0.0.1", "--port", "1", "--dbname", "bot", "--user", "bot"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("refused"));
    assert!(started.elapsed() < std::time::Duration::from_secs(3));
}

/// Needs a reachable database configured through `DB_*` variables.
/// Run with: cargo test -p bot-schema-cli -- --ignored pg_
#[test]
#[ignore]
fn pg_cli_reports_success_on_every_run() {
    for _ in 0..2 {
        Command::cargo_bin("bot-schema")
            .unwrap()
            .env("LOG_LEVEL", "info")
            .assert()
            .success()
            .stderr(predicate::str::contains("tables `users` and `activity` created"))
            .stderr(predicate::str::contains("failed to create tables").not());
    }
}
