//! Ironbank server entry point
//!
//! Startup order: config -> logging -> database -> migrations -> gateway.

use std::sync::Arc;

use anyhow::Context;

use ironbank::config::AppConfig;
use ironbank::gateway;
use ironbank::ledger::Database;
use ironbank::logging::init_logging;

/// Get config environment from command line (--env/-e argument)
fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let config = AppConfig::load(&env);
    let _log_guard = init_logging(&config);

    tracing::info!("ironbank starting (env: {env}, build: {})", env!("GIT_HASH"));

    let db = Database::connect(&config.postgres_url)
        .await
        .context("cannot connect to database")?;
    db.migrate().await.context("cannot run migrations")?;

    gateway::run_server(&config, Arc::new(db)).await
}
