//! Balance Ledger service
//!
//! ```text
//! ┌──────────┐    ┌──────────────┐    ┌──────────────┐
//! │  Config  │───▶│ AccountStore │◀───│ Transfer /   │◀── Gateway (axum)
//! │  (YAML)  │    │ (PG | memory)│    │ Reset engine │◀── Reset job (timer)
//! └──────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! Usage: `balance_ledger [--env dev] [--port 8080]`

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use balance_ledger::account::{AccountStore, MemoryAccountStore, PgAccountStore};
use balance_ledger::auth::JwtService;
use balance_ledger::balance_reset::{BalanceResetJob, ResetEngine, ResetJobConfig};
use balance_ledger::cache::{CacheInvalidator, ProfileCache};
use balance_ledger::config::AppConfig;
use balance_ledger::db::Database;
use balance_ledger::gateway::{self, state::AppState};
use balance_ledger::transfer::TransferEngine;

fn arg_value(names: &[&str]) -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    args.iter()
        .position(|a| names.contains(&a.as_str()))
        .and_then(|i| args.get(i + 1).cloned())
}

fn get_env() -> String {
    arg_value(&["--env", "-e"]).unwrap_or_else(|| "dev".to_string())
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    arg_value(&["--port"]).and_then(|p| p.parse().ok())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let mut app_config = AppConfig::load(&env)?;
    if let Some(port) = get_port_override() {
        app_config.gateway.port = port;
    }
    let _log_guard = balance_ledger::logging::init_logging(&app_config);

    info!(env = %env, git_hash = env!("GIT_HASH"), "Starting Balance Ledger");

    let (store, pg_db): (Arc<dyn AccountStore>, Option<Arc<Database>>) =
        match app_config.postgres_url.as_deref() {
            Some(url) => {
                let db = Database::connect_with(url, app_config.postgres_pool_size)
                    .await
                    .context("Failed to connect to PostgreSQL")?;
                db.migrate().await.context("Failed to apply migrations")?;
                let store = PgAccountStore::new(db.pool().clone());
                (Arc::new(store), Some(Arc::new(db)))
            }
            None => {
                warn!("postgres_url not set, using the in-memory account store");
                (Arc::new(MemoryAccountStore::new()), None)
            }
        };

    let profiles = Arc::new(ProfileCache::new(
        app_config.profile_cache.capacity,
        app_config.profile_cache.ttl_secs,
    ));
    let invalidator: Arc<dyn CacheInvalidator> = profiles.clone();

    let transfers = Arc::new(TransferEngine::new(store.clone(), invalidator.clone()));
    let reset_engine = Arc::new(ResetEngine::new(store.clone(), invalidator));
    let reset_job = Arc::new(
        BalanceResetJob::new(
            reset_engine,
            ResetJobConfig {
                interval: app_config.balance_reset.interval(),
                scheduled: app_config.balance_reset.enabled,
            },
        )
        .spawn(),
    );

    let jwt = Arc::new(JwtService::new(
        &app_config.jwt.secret,
        app_config.jwt.token_ttl_secs,
    ));

    let mut state = AppState::new(store, transfers, profiles, jwt, reset_job.clone());
    if let Some(db) = pg_db {
        state = state.with_database(db);
    }

    let served =
        gateway::run_server(&app_config.listen_addr(), Arc::new(state), shutdown_signal()).await;

    reset_job.shutdown().await;
    info!(
        completed = reset_job.completed_runs(),
        failed = reset_job.failed_runs(),
        "Balance Ledger stopped"
    );
    served
}
