use std::sync::Arc;

use crate::account::AccountStore;
use crate::auth::JwtService;
use crate::balance_reset::ResetJobHandle;
use crate::cache::ProfileCache;
use crate::db::Database;
use crate::transfer::TransferEngine;

/// Gateway application state (shared)
#[derive(Clone)]
pub struct AppState {
    /// Account store for profile reads
    pub store: Arc<dyn AccountStore>,
    pub transfers: Arc<TransferEngine>,
    /// Profile read cache (cleared by the engines after every commit)
    pub profiles: Arc<ProfileCache>,
    pub jwt: Arc<JwtService>,
    /// Trigger for the background balance reset worker
    pub reset_job: Arc<ResetJobHandle>,
    /// PostgreSQL pool, pinged by the health check when present
    pub pg_db: Option<Arc<Database>>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn AccountStore>,
        transfers: Arc<TransferEngine>,
        profiles: Arc<ProfileCache>,
        jwt: Arc<JwtService>,
        reset_job: Arc<ResetJobHandle>,
    ) -> Self {
        Self {
            store,
            transfers,
            profiles,
            jwt,
            reset_job,
            pg_db: None,
        }
    }

    pub fn with_database(mut self, db: Arc<Database>) -> Self {
        self.pg_db = Some(db);
        self
    }
}
