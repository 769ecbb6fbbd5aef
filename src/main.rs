//! emptrack CLI Entry Point
//!
//! Resolves settings, opens the single database connection, and runs the
//! interactive menu until the user quits. Tables and confirmations go to
//! stdout; prompts, logs and the final error report go to stderr.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use emptrack::config::resolve_settings;
use emptrack::engine::ConnectionConfig;
use emptrack::{DatabaseType, OnError, SettingsLayer, TerminalPrompter};

/// emptrack - interactive department, role and employee tracker
#[derive(Parser)]
#[command(name = "emptrack")]
#[command(about = "Interactive department, role and employee tracker")]
#[command(version)]
struct Cli {
    /// Database engine
    #[arg(long, value_enum, env = "DB_ENGINE")]
    engine: Option<DatabaseType>,

    /// Database host (default 127.0.0.1)
    #[arg(long, env = "DB_HOST")]
    host: Option<String>,

    /// Database port (default 5432)
    #[arg(long, env = "DB_PORT")]
    port: Option<u16>,

    /// Database user (default postgres)
    #[arg(long, env = "DB_USER")]
    user: Option<String>,

    /// Database name (default employees_db)
    #[arg(long, env = "DB_NAME")]
    database: Option<String>,

    /// SQLite database file (with --engine sqlite)
    #[arg(long, env = "DB_FILE")]
    file: Option<PathBuf>,

    /// Report failed actions and return to the menu instead of exiting
    #[arg(long, overrides_with = "no_keep_going")]
    keep_going: bool,

    /// Exit on the first failed action, even if a config file sets keep_going
    #[arg(long, overrides_with = "keep_going")]
    no_keep_going: bool,

    /// Log every statement to stderr
    #[arg(long)]
    debug: bool,
}

impl Cli {
    fn settings_layer(&self) -> SettingsLayer {
        SettingsLayer {
            engine: self.engine,
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            database: self.database.clone(),
            file: self.file.clone(),
            // Only an explicit flag overrides the config files
            keep_going: match (self.keep_going, self.no_keep_going) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            },
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be loaded before clap reads env-backed flags
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    emptrack::logging::init_tracing(cli.debug)?;

    if let Ok(path) = dotenv {
        debug!(path = %path.display(), "loaded .env");
    }

    let settings =
        resolve_settings(cli.settings_layer()).context("Could not resolve connection settings")?;
    let on_error = OnError::from_keep_going(settings.keep_going);

    match settings.connection.engine {
        DatabaseType::Postgres => run_postgres(&settings.connection, on_error).await,
        DatabaseType::SQLite => run_sqlite(&settings.connection, on_error).await,
    }
}

#[cfg(feature = "postgres")]
async fn run_postgres(config: &ConnectionConfig, on_error: OnError) -> Result<()> {
    use emptrack::engine::postgres::PostgresStore;

    let store = PostgresStore::connect(config)
        .await
        .with_context(|| format!("Could not connect to {}", config.describe()))?;
    let mut prompter = TerminalPrompter::new();
    let mut out = std::io::stdout();

    emptrack::run(&store, &mut prompter, &mut out, on_error).await?;
    Ok(())
}

#[cfg(not(feature = "postgres"))]
async fn run_postgres(_config: &ConnectionConfig, _on_error: OnError) -> Result<()> {
    anyhow::bail!("emptrack was built without the 'postgres' feature")
}

#[cfg(feature = "sqlite")]
async fn run_sqlite(config: &ConnectionConfig, on_error: OnError) -> Result<()> {
    use emptrack::engine::sqlite::SqliteStore;

    let store = SqliteStore::connect(config)
        .with_context(|| format!("Could not open {}", config.describe()))?;
    let mut prompter = TerminalPrompter::new();
    let mut out = std::io::stdout();

    emptrack::run(&store, &mut prompter, &mut out, on_error).await?;
    Ok(())
}

#[cfg(not(feature = "sqlite"))]
async fn run_sqlite(_config: &ConnectionConfig, _on_error: OnError) -> Result<()> {
    anyhow::bail!("emptrack was built without the 'sqlite' feature")
}
