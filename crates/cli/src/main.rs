use anyhow::{Context, Result};
use bot_schema_core::{Config, LogConfig, LogFormat};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "bot-schema", version)]
#[command(about = "Create the bot's users and activity tables in PostgreSQL", long_about = None)]
struct Cli {
    /// Database host [env: DB_HOST]
    #[arg(long)]
    host: Option<String>,
    /// Database port [env: DB_PORT]
    #[arg(short, long)]
    port: Option<u16>,
    /// Database name [env: DB_NAME]
    #[arg(short, long)]
    dbname: Option<String>,
    /// Database user [env: DB_USER]
    #[arg(short = 'U', long)]
    user: Option<String>,
    /// Schema to create the tables in [env: DB_SCHEMA]
    #[arg(long)]
    schema: Option<String>,
    /// Log filter, e.g. `info` or `bot_schema_storage=debug` [env: LOG_LEVEL]
    #[arg(long)]
    log_level: Option<String>,
    /// Log layout: full, compact or pretty [env: LOG_FORMAT]
    #[arg(long)]
    log_format: Option<String>,
    /// Print the DDL statements in execution order and exit without connecting
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Flag values keyed by the environment variable they override.
    /// The password is deliberately env-only.
    fn overrides(&self) -> Vec<(&'static str, String)> {
        [
            ("DB_HOST", self.host.clone()),
            ("DB_PORT", self.port.map(|p| p.to_string())),
            ("DB_NAME", self.dbname.clone()),
            ("DB_USER", self.user.clone()),
            ("DB_SCHEMA", self.schema.clone()),
            ("LOG_LEVEL", self.log_level.clone()),
            ("LOG_FORMAT", self.log_format.clone()),
        ]
        .into_iter()
        .filter_map(|(var, value)| value.map(|v| (var, v)))
        .collect()
    }
}

/// Settings lookup: command-line flags first, then the process environment.
fn settings_lookup(
    overrides: Vec<(&'static str, String)>,
) -> impl Fn(&str) -> Option<String> {
    move |key| {
        overrides
            .iter()
            .find(|(var, _)| *var == key)
            .map(|(_, value)| value.clone())
            .or_else(|| std::env::var(key).ok())
    }
}

fn init_tracing(log: &LogConfig) -> Result<()> {
    // RUST_LOG wins when present, matching the usual tracing setup.
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&log.level)
            .with_context(|| format!("invalid log level {:?}", log.level))?,
    };
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    match log.format {
        LogFormat::Full => builder.init(),
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            return Err(err).context("failed to load .env");
        }
    }

    let lookup = settings_lookup(cli.overrides());

    // Printing the DDL needs no database settings.
    if cli.dry_run {
        init_tracing(&LogConfig::from_lookup(&lookup)?)?;
        commands::print_sql::run();
        return Ok(());
    }

    let config = Config::from_lookup(&lookup)?;
    init_tracing(&config.log)?;
    commands::provision::run(&config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_environment() {
        let cli = Cli::parse_from([
            "bot-schema",
            "--dbname",
            "from_flag",
            "--port",
            "6543",
            "--log-format",
            "pretty",
        ]);
        let lookup = settings_lookup(cli.overrides());
        assert_eq!(lookup("DB_NAME").as_deref(), Some("from_flag"));
        assert_eq!(lookup("DB_PORT").as_deref(), Some("6543"));
        assert_eq!(lookup("LOG_FORMAT").as_deref(), Some("pretty"));
    }

    #[test]
    fn test_unset_flags_produce_no_overrides() {
        let cli = Cli::parse_from(["bot-schema", "--dry-run"]);
        assert!(cli.dry_run);
        assert!(cli.overrides().is_empty());
    }

    #[test]
    fn test_non_numeric_port_rejected_by_parser() {
        assert!(Cli::try_parse_from(["bot-schema", "--port", "banana"]).is_err());
    }
}
