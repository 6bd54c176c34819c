use std::sync::Arc;

use crate::db::Database;
use crate::transfer::TransferEngine;

/// Shared gateway state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<TransferEngine>,
    /// Present only when backed by PostgreSQL; used by health checks
    pub db: Option<Arc<Database>>,
}

impl AppState {
    pub fn new(engine: Arc<TransferEngine>, db: Option<Arc<Database>>) -> Self {
        Self { engine, db }
    }
}
