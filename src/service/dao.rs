//! DaoService: entity operations used by generated accessors.

use crate::accessor::{EntityAccessor, LocalAccessor, RemoteAccessor};
use crate::error::{QueryError, StoreError};
use crate::record::{record_to_row, row_to_record, LocalFieldsMetadata, Row};
use crate::sql::{
    create_table, delete_batch, delete_by_key, delete_where, insert_or_replace, insert_or_replace_batch, select,
    update, SelectOptions,
};
use crate::status::{
    ExecutionStatus, ERROR_CODE_CREATE, ERROR_CODE_DELETE, ERROR_CODE_INSERT, ERROR_CODE_REMOVE_WHERE,
    ERROR_CODE_REQUEST, ERROR_CODE_SELECT_WHERE, ERROR_CODE_UPDATE,
};
use crate::transport::ParamMap;
use serde_json::Value;

pub struct DaoService;

/// How a mutating statement is sent to the executor.
#[derive(Clone, Copy)]
struct Write<'a> {
    op: &'a str,
    error_code: i32,
    transactional: bool,
    notify: bool,
}

impl DaoService {
    pub async fn select<D: EntityAccessor>(dao: &D, options: &SelectOptions) -> Vec<D::Record> {
        Self::select_result(dao, options).await.into_rows()
    }

    pub async fn select_result<D: EntityAccessor>(dao: &D, options: &SelectOptions) -> ExecutionStatus<D::Record> {
        let sql = select(&dao.storage_table(), options);
        Self::query_status(dao, &sql).await
    }

    /// Run a finished SELECT and decode its rows.
    pub async fn query_status<D: EntityAccessor>(dao: &D, statement: &str) -> ExecutionStatus<D::Record> {
        let table = dao.storage_table();
        dao.provider()
            .executor()
            .execute_for_rows(&table, statement, ERROR_CODE_SELECT_WHERE)
            .await
            .try_map_rows(row_to_record::<D::Record>)
    }

    pub async fn query_list<D: EntityAccessor>(dao: &D, statement: &str) -> Vec<D::Record> {
        Self::query_status(dao, statement).await.into_rows()
    }

    pub async fn query_one<D: EntityAccessor>(dao: &D, statement: &str) -> Option<D::Record> {
        Self::query_list(dao, statement).await.into_iter().next()
    }

    /// Ensure the entity's table exists. Safe to repeat.
    pub async fn create_table<D: EntityAccessor>(dao: &D) -> ExecutionStatus<D::Record> {
        let table = dao.storage_table();
        let sql = match dao.fields_metadata().and_then(|meta| create_table(&table, &meta)) {
            Ok(sql) => sql,
            Err(e) => return Self::rejected(&table, "create", ERROR_CODE_CREATE, e),
        };
        dao.provider()
            .executor()
            .execute_for_status(&table, &sql, ERROR_CODE_CREATE, "create", false)
            .await
            .cast()
    }

    pub async fn insert_or_replace<D: LocalAccessor>(dao: &D, item: &D::Record, notify: bool) -> ExecutionStatus<D::Record> {
        let write = Write {
            op: "insert",
            error_code: ERROR_CODE_INSERT,
            transactional: false,
            notify,
        };
        Self::write_records(dao, std::slice::from_ref(item), write, insert_or_replace).await
    }

    /// Insert or replace every item in one transaction.
    pub async fn insert_or_replace_all<D: LocalAccessor>(
        dao: &D,
        items: &[D::Record],
        notify: bool,
    ) -> ExecutionStatus<D::Record> {
        if items.is_empty() {
            return ExecutionStatus::success(Vec::new());
        }
        let write = Write {
            op: "insert",
            error_code: ERROR_CODE_INSERT,
            transactional: true,
            notify,
        };
        Self::write_batch(dao, items, write, insert_or_replace_batch).await
    }

    pub async fn delete<D: LocalAccessor>(dao: &D, item: &D::Record, notify: bool) -> ExecutionStatus<D::Record> {
        let write = Write {
            op: "delete",
            error_code: ERROR_CODE_DELETE,
            transactional: false,
            notify,
        };
        Self::write_records(dao, std::slice::from_ref(item), write, delete_by_key).await
    }

    /// Delete every item by primary key in one transaction.
    pub async fn delete_all<D: LocalAccessor>(dao: &D, items: &[D::Record], notify: bool) -> ExecutionStatus<D::Record> {
        if items.is_empty() {
            return ExecutionStatus::success(Vec::new());
        }
        let write = Write {
            op: "delete",
            error_code: ERROR_CODE_DELETE,
            transactional: true,
            notify,
        };
        Self::write_batch(dao, items, write, delete_batch).await
    }

    /// Delete rows matching `where_clause`; an empty clause deletes everything.
    pub async fn delete_where<D: LocalAccessor>(dao: &D, where_clause: &str, notify: bool) -> ExecutionStatus<D::Record> {
        let sql = delete_where(&dao.storage_table(), where_clause);
        let write = Write {
            op: "remove_where",
            error_code: ERROR_CODE_REMOVE_WHERE,
            transactional: false,
            notify,
        };
        Self::execute_with_retry(dao, &sql, write).await
    }

    pub async fn update<D: LocalAccessor>(
        dao: &D,
        set_clause: &str,
        from: &str,
        where_clause: &str,
        notify: bool,
    ) -> ExecutionStatus<D::Record> {
        let sql = update(&dao.storage_table(), set_clause, from, where_clause);
        let write = Write {
            op: "update",
            error_code: ERROR_CODE_UPDATE,
            transactional: false,
            notify,
        };
        Self::execute_with_retry(dao, &sql, write).await
    }

    /// Fetch the remote resource, store it in the cache table and publish the change.
    /// Without the delta flag the fetched rows replace the table contents.
    pub async fn request<D: RemoteAccessor>(dao: &D, params: &ParamMap) -> ExecutionStatus<D::Record> {
        let table = dao.storage_table();
        let Some(transport) = dao.provider().transport() else {
            tracing::warn!(table = %table, "request without a remote transport");
            return ExecutionStatus::failure(ERROR_CODE_REQUEST, "no remote transport configured");
        };
        let fetched = transport
            .fetch_resource(dao.resource_name(), dao.is_delta(), params)
            .await;
        if !fetched.ok {
            return fetched.cast();
        }
        let decoded = fetched.try_map_rows(|value| match value {
            Value::Object(row) => row_to_record::<D::Record>(row).map_err(StoreError::from),
            _ => Err(StoreError::Query(QueryError::NotAnObject)),
        });
        if !decoded.ok {
            return decoded;
        }
        let created = Self::create_table(dao).await;
        if !created.ok {
            return created;
        }
        let statement = match Self::refresh_statement(dao, &table, &decoded.rows) {
            Ok(sql) if sql.is_empty() => return decoded,
            Ok(sql) => sql,
            Err(e) => return Self::rejected(&table, "request", ERROR_CODE_REQUEST, e),
        };
        let status = dao
            .provider()
            .executor()
            .execute_transaction_for_status(&table, &statement, ERROR_CODE_INSERT, "request", true)
            .await;
        if status.ok {
            decoded
        } else {
            status.cast()
        }
    }

    fn refresh_statement<D: EntityAccessor>(dao: &D, table: &str, records: &[D::Record]) -> Result<String, QueryError> {
        let meta = dao.fields_metadata()?;
        let rows = Self::rows_of(records)?;
        let mut sql = String::new();
        if !dao.is_delta() {
            sql.push_str(&delete_where(table, ""));
            sql.push(';');
        }
        if !rows.is_empty() {
            if !sql.is_empty() {
                sql.push(' ');
            }
            sql.push_str(&insert_or_replace_batch(table, &meta, &rows)?);
        }
        Ok(sql)
    }

    async fn write_records<D, F>(dao: &D, items: &[D::Record], write: Write<'_>, build: F) -> ExecutionStatus<D::Record>
    where
        D: LocalAccessor,
        F: Fn(&str, &LocalFieldsMetadata, &Row) -> Result<String, QueryError>,
    {
        let table = dao.storage_table();
        let built = dao.fields_metadata().and_then(|meta| {
            let rows = Self::rows_of(items)?;
            rows.iter()
                .map(|row| build(table.as_str(), meta.as_ref(), row))
                .collect::<Result<Vec<_>, _>>()
        });
        match built {
            Ok(statements) => Self::execute_with_retry(dao, &statements.join("; "), write).await,
            Err(e) => Self::rejected(&table, write.op, write.error_code, e),
        }
    }

    async fn write_batch<D, F>(dao: &D, items: &[D::Record], write: Write<'_>, build: F) -> ExecutionStatus<D::Record>
    where
        D: LocalAccessor,
        F: Fn(&str, &LocalFieldsMetadata, &[Row]) -> Result<String, QueryError>,
    {
        let table = dao.storage_table();
        let built = dao
            .fields_metadata()
            .and_then(|meta| build(table.as_str(), meta.as_ref(), Self::rows_of(items)?.as_slice()));
        match built {
            Ok(sql) => Self::execute_with_retry(dao, &sql, write).await,
            Err(e) => Self::rejected(&table, write.op, write.error_code, e),
        }
    }

    /// Execute once; on a missing table create it and retry exactly once.
    async fn execute_with_retry<D: LocalAccessor>(dao: &D, sql: &str, write: Write<'_>) -> ExecutionStatus<D::Record> {
        let status = Self::execute(dao, sql, write).await;
        if !status.is_missing_table() {
            return status.cast();
        }
        tracing::debug!(table = %dao.storage_table(), op = %write.op, "table missing, creating before retry");
        let created = Self::create_table(dao).await;
        if !created.ok {
            return created;
        }
        Self::execute(dao, sql, write).await.cast()
    }

    async fn execute<D: EntityAccessor>(dao: &D, sql: &str, write: Write<'_>) -> ExecutionStatus {
        let table = dao.storage_table();
        let executor = dao.provider().executor();
        if write.transactional {
            executor
                .execute_transaction_for_status(&table, sql, write.error_code, write.op, write.notify)
                .await
        } else {
            executor
                .execute_for_status(&table, sql, write.error_code, write.op, write.notify)
                .await
        }
    }

    fn rows_of<R: crate::record::Record>(records: &[R]) -> Result<Vec<Row>, QueryError> {
        records.iter().map(record_to_row).collect()
    }

    fn rejected<T>(table: &str, op: &str, error_code: i32, e: QueryError) -> ExecutionStatus<T> {
        tracing::warn!(table = %table, op = %op, error_code, error = %e, "statement rejected");
        StoreError::from(e).into_status(error_code)
    }
}
