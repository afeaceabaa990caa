//! Statement execution against the embedded store. Every call returns an [`ExecutionStatus`];
//! failures are logged and converted, never raised.

use crate::error::StoreError;
use crate::record::Row;
use crate::settings::Settings;
use crate::status::ExecutionStatus;
use crate::trigger::TriggerRegistry;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnection, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Executor;
use std::sync::Arc;
use std::time::Duration;

#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run a mutating statement. With `notify`, a successful call publishes the table's
    /// change trigger before returning.
    async fn execute_for_status(
        &self,
        table: &str,
        statement: &str,
        error_code: i32,
        op_name: &str,
        notify: bool,
    ) -> ExecutionStatus;

    async fn execute_for_rows(&self, table: &str, statement: &str, error_code: i32) -> ExecutionStatus;

    /// All-or-nothing variant of [`QueryExecutor::execute_for_status`] for multi-statement payloads.
    async fn execute_transaction_for_status(
        &self,
        table: &str,
        statement: &str,
        error_code: i32,
        op_name: &str,
        notify: bool,
    ) -> ExecutionStatus;

    async fn execute_transaction_for_rows(&self, table: &str, statement: &str, error_code: i32) -> ExecutionStatus;

    fn triggers(&self) -> &TriggerRegistry;
}

/// SQLite-backed executor over a sqlx pool.
pub struct SqliteExecutor {
    pool: SqlitePool,
    triggers: Arc<TriggerRegistry>,
}

impl SqliteExecutor {
    pub fn new(pool: SqlitePool, triggers: Arc<TriggerRegistry>) -> Self {
        SqliteExecutor { pool, triggers }
    }

    /// Open a pool from settings. In-memory databases are pinned to one long-lived
    /// connection, since each SQLite connection would otherwise see its own empty store.
    pub async fn connect(settings: &Settings) -> Result<Self, StoreError> {
        let in_memory = settings.database_url.contains(":memory:");
        let max = if in_memory { 1 } else { settings.max_connections.max(1) };
        let mut options = SqlitePoolOptions::new().max_connections(max);
        if in_memory {
            options = options
                .min_connections(1)
                .idle_timeout(Option::<Duration>::None)
                .max_lifetime(Option::<Duration>::None);
        }
        let pool = options.connect(&settings.database_url).await?;
        tracing::debug!(url = %settings.database_url, max_connections = max, "store opened");
        Ok(Self::new(pool, Arc::new(TriggerRegistry::new(settings.trigger_capacity))))
    }

    async fn run(&self, statement: &str) -> Result<(), StoreError> {
        tracing::debug!(sql = %statement, "query");
        sqlx::raw_sql(statement).execute(&self.pool).await?;
        Ok(())
    }

    async fn run_in_transaction(&self, statement: &str) -> Result<(), StoreError> {
        tracing::debug!(sql = %statement, "transaction");
        let mut tx = self.pool.begin().await?;
        let conn: &mut SqliteConnection = &mut tx;
        conn.execute(sqlx::raw_sql(statement)).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn fetch(&self, statement: &str) -> Result<Vec<Row>, StoreError> {
        tracing::debug!(sql = %statement, "query");
        let rows = sqlx::raw_sql(statement).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    async fn fetch_in_transaction(&self, statement: &str) -> Result<Vec<Row>, StoreError> {
        tracing::debug!(sql = %statement, "transaction");
        let mut tx = self.pool.begin().await?;
        let conn: &mut SqliteConnection = &mut tx;
        let rows = conn.fetch_all(sqlx::raw_sql(statement)).await?;
        tx.commit().await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    fn finish(
        &self,
        table: &str,
        result: Result<(), StoreError>,
        error_code: i32,
        op_name: &str,
        notify: bool,
    ) -> ExecutionStatus {
        match result {
            Ok(()) => {
                if notify {
                    self.triggers.publish(table);
                }
                ExecutionStatus::success(Vec::new())
            }
            Err(e) => {
                tracing::warn!(table = %table, op = %op_name, error_code, error = %e, "statement failed");
                e.into_status(error_code)
            }
        }
    }
}

#[async_trait]
impl QueryExecutor for SqliteExecutor {
    async fn execute_for_status(
        &self,
        table: &str,
        statement: &str,
        error_code: i32,
        op_name: &str,
        notify: bool,
    ) -> ExecutionStatus {
        let result = self.run(statement).await;
        self.finish(table, result, error_code, op_name, notify)
    }

    async fn execute_for_rows(&self, table: &str, statement: &str, error_code: i32) -> ExecutionStatus {
        match self.fetch(statement).await {
            Ok(rows) => ExecutionStatus::success(rows),
            Err(e) => {
                tracing::warn!(table = %table, error_code, error = %e, "select failed");
                e.into_status(error_code)
            }
        }
    }

    async fn execute_transaction_for_status(
        &self,
        table: &str,
        statement: &str,
        error_code: i32,
        op_name: &str,
        notify: bool,
    ) -> ExecutionStatus {
        let result = self.run_in_transaction(statement).await;
        self.finish(table, result, error_code, op_name, notify)
    }

    async fn execute_transaction_for_rows(&self, table: &str, statement: &str, error_code: i32) -> ExecutionStatus {
        match self.fetch_in_transaction(statement).await {
            Ok(rows) => ExecutionStatus::success(rows),
            Err(e) => {
                tracing::warn!(table = %table, error_code, error = %e, "select failed");
                e.into_status(error_code)
            }
        }
    }

    fn triggers(&self) -> &TriggerRegistry {
        &self.triggers
    }
}

fn row_to_json(row: &SqliteRow) -> Row {
    use sqlx::Column;
    use sqlx::Row as _;
    let mut map = Row::new();
    for col in row.columns() {
        let name = col.name();
        map.insert(name.to_string(), cell_to_value(row, name));
    }
    map
}

fn cell_to_value(row: &SqliteRow, name: &str) -> Value {
    use sqlx::Row as _;
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    Value::Null
}
