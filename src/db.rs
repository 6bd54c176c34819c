//! Database connection management

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Tables backing the account, payee, and ledger stores.
///
/// The unique index on `transactions_tb.request_id` is what closes the
/// idempotency race: concurrent attempts under one request id collide on
/// insert and all but one are rejected.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS accounts_tb (
    acc_num     VARCHAR(8)     PRIMARY KEY,
    holder      VARCHAR(64)    NOT NULL,
    bank_code   CHAR(6)        NOT NULL,
    balance     NUMERIC(18, 2) NOT NULL,
    currency    CHAR(3)        NOT NULL,
    updated_at  TIMESTAMPTZ    NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS payees_tb (
    id            BIGSERIAL   PRIMARY KEY,
    nickname      VARCHAR(64) NOT NULL,
    acc_num       VARCHAR(8)  NOT NULL,
    bank_code     CHAR(6)     NOT NULL,
    payer_acc_num VARCHAR(8)  NOT NULL,
    UNIQUE (payer_acc_num, acc_num)
);

CREATE TABLE IF NOT EXISTS transactions_tb (
    transaction_id CHAR(26)       PRIMARY KEY,
    request_id     UUID           NOT NULL UNIQUE,
    payer_acc_num  VARCHAR(8)     NOT NULL,
    payee_id       BIGINT         NOT NULL,
    amount         NUMERIC(18, 2) NOT NULL,
    currency       CHAR(3)        NOT NULL,
    status         SMALLINT       NOT NULL,
    transfer_type  SMALLINT       NOT NULL,
    error_message  TEXT,
    created_at     TIMESTAMPTZ    NOT NULL DEFAULT NOW(),
    updated_at     TIMESTAMPTZ    NOT NULL DEFAULT NOW()
);
"#;

/// PostgreSQL database connection pool
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        tracing::info!("PostgreSQL connection pool established");
        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the store tables if they do not exist yet
    pub async fn init_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        tracing::info!("database schema ready");
        Ok(())
    }

    /// Check database health
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
