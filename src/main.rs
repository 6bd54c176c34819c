//! FundFlow service entry point
//!
//! Loads config for the selected environment, wires the account, payee,
//! and ledger stores (PostgreSQL when `postgres_url` is set, in-memory
//! otherwise), and serves the HTTP gateway.

use std::sync::Arc;

use tokio::net::TcpListener;

use fundflow::account::{AccountStore, MemoryAccountStore, PgAccountStore};
use fundflow::config::AppConfig;
use fundflow::db::Database;
use fundflow::gateway::{build_router, state::AppState};
use fundflow::ledger::{MemoryLedger, PgTransactionLedger, TransactionLedger};
use fundflow::payee::{MemoryPayeeRegistry, PayeeRegistry, PgPayeeRegistry};
use fundflow::seed;
use fundflow::transfer::{LoggingSettlementGateway, TransferEngine};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

struct Stores {
    accounts: Arc<dyn AccountStore>,
    payees: Arc<dyn PayeeRegistry>,
    ledger: Arc<dyn TransactionLedger>,
    db: Option<Arc<Database>>,
}

async fn build_stores(config: &AppConfig) -> anyhow::Result<Stores> {
    if let Some(ref url) = config.postgres_url {
        let db = Arc::new(Database::connect(url).await?);
        db.init_schema().await?;
        tracing::info!("using PostgreSQL-backed stores");
        return Ok(Stores {
            accounts: Arc::new(PgAccountStore::new(db.pool().clone())),
            payees: Arc::new(PgPayeeRegistry::new(db.pool().clone())),
            ledger: Arc::new(PgTransactionLedger::new(db.pool().clone())),
            db: Some(db),
        });
    }

    let accounts = Arc::new(MemoryAccountStore::new());
    let payees = Arc::new(MemoryPayeeRegistry::new());
    if config.seed_demo_data {
        seed::seed_demo_data(&accounts, &payees);
    }
    tracing::info!("using in-memory stores");
    Ok(Stores {
        accounts,
        payees,
        ledger: Arc::new(MemoryLedger::new()),
        db: None,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let config = AppConfig::load(&env)?;
    let _log_guard = fundflow::logging::init_logging(&config);

    tracing::info!(
        bank = %config.bank.name,
        bank_code = %config.bank.code,
        "starting FundFlow in {} mode",
        env
    );

    let stores = build_stores(&config).await?;

    let engine = Arc::new(TransferEngine::new(
        stores.accounts,
        stores.payees,
        stores.ledger,
        Arc::new(LoggingSettlementGateway::new()),
        config.bank.code.clone(),
    ));

    let state = Arc::new(AppState::new(engine, stores.db));
    let router = build_router(state);

    let port = get_port_override().unwrap_or(config.gateway.port);
    let addr = format!("{}:{}", config.gateway.host, port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("gateway listening on {}", addr);

    axum::serve(listener, router).await?;
    Ok(())
}
