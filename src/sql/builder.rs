//! Builds CREATE, INSERT OR REPLACE, DELETE, UPDATE and SELECT text from column metadata.
//! Nothing here touches the store.

use crate::error::QueryError;
use crate::record::{LocalFieldsMetadata, Row};
use crate::sql::params::{quote_text, stored_literal};
use serde_json::Value;

/// Caller-supplied SELECT fragments. Zero `limit`/`offset` means absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectOptions {
    pub where_clause: String,
    pub limit: u32,
    pub offset: u32,
    pub order_by: String,
}

impl SelectOptions {
    pub fn filter(where_clause: impl Into<String>) -> Self {
        SelectOptions {
            where_clause: where_clause.into(),
            ..Default::default()
        }
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = order_by.into();
        self
    }
}

/// `CREATE TABLE IF NOT EXISTS t (PK TEXT PRIMARY KEY NOT NULL, A TEXT, ...)`
pub fn create_table(table: &str, meta: &LocalFieldsMetadata) -> Result<String, QueryError> {
    if meta.ordered_columns.is_empty() {
        return Err(QueryError::NoColumns {
            operation: "create",
            table: table.to_string(),
        });
    }
    let pk = meta.primary_key_column.as_deref();
    let columns: Vec<String> = meta
        .ordered_columns
        .iter()
        .map(|c| {
            if Some(c.as_str()) == pk {
                format!("{} TEXT PRIMARY KEY NOT NULL", c)
            } else {
                format!("{} TEXT", c)
            }
        })
        .collect();
    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        table,
        columns.join(", ")
    ))
}

/// `INSERT OR REPLACE INTO t (A, B) VALUES ('1', 'x')`
pub fn insert_or_replace(table: &str, meta: &LocalFieldsMetadata, row: &Row) -> Result<String, QueryError> {
    if meta.ordered_columns.is_empty() {
        return Err(QueryError::NoColumns {
            operation: "insert",
            table: table.to_string(),
        });
    }
    let values: Vec<String> = meta
        .ordered_columns
        .iter()
        .map(|c| stored_literal(row.get(c)))
        .collect();
    Ok(format!(
        "INSERT OR REPLACE INTO {} {} VALUES ({})",
        table,
        meta.insert_column_list,
        values.join(", ")
    ))
}

pub fn insert_or_replace_batch(
    table: &str,
    meta: &LocalFieldsMetadata,
    rows: &[Row],
) -> Result<String, QueryError> {
    let statements = rows
        .iter()
        .map(|row| insert_or_replace(table, meta, row))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(join_statements(&statements))
}

/// `DELETE FROM t` with an optional predicate.
pub fn delete_where(table: &str, where_clause: &str) -> String {
    let mut sql = format!("DELETE FROM {}", table);
    if !where_clause.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(where_clause);
    }
    sql
}

/// `DELETE FROM t WHERE PK = 'v'`
pub fn delete_by_key(table: &str, meta: &LocalFieldsMetadata, row: &Row) -> Result<String, QueryError> {
    let pk = meta
        .primary_key_column
        .as_deref()
        .ok_or_else(|| QueryError::MissingPrimaryKey {
            operation: "delete",
            table: table.to_string(),
        })?;
    let key = match row.get(pk) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => {
            return Err(QueryError::EmptyPrimaryKey {
                operation: "delete",
                table: table.to_string(),
                column: pk.to_string(),
            })
        }
    };
    Ok(format!("DELETE FROM {} WHERE {} = {}", table, pk, quote_text(&key)))
}

pub fn delete_batch(table: &str, meta: &LocalFieldsMetadata, rows: &[Row]) -> Result<String, QueryError> {
    let statements = rows
        .iter()
        .map(|row| delete_by_key(table, meta, row))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(join_statements(&statements))
}

/// `UPDATE t SET .. [FROM ..] [WHERE ..]`
pub fn update(table: &str, set_clause: &str, from: &str, where_clause: &str) -> String {
    let mut sql = format!("UPDATE {} SET {}", table, set_clause);
    if !from.is_empty() {
        sql.push_str(" FROM ");
        sql.push_str(from);
    }
    if !where_clause.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(where_clause);
    }
    sql
}

/// `SELECT * FROM t [WHERE ..] [ORDER BY ..] [LIMIT n] [OFFSET n]`
pub fn select(table: &str, options: &SelectOptions) -> String {
    let mut sql = format!("SELECT * FROM {}", table);
    if !options.where_clause.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&options.where_clause);
    }
    if !options.order_by.is_empty() {
        sql.push_str(" ORDER BY ");
        sql.push_str(&options.order_by);
    }
    if options.limit > 0 {
        sql.push_str(&format!(" LIMIT {}", options.limit));
    } else if options.offset > 0 {
        sql.push_str(" LIMIT -1");
    }
    if options.offset > 0 {
        sql.push_str(&format!(" OFFSET {}", options.offset));
    }
    sql
}

/// One round trip: `s1; s2;`
fn join_statements(statements: &[String]) -> String {
    statements
        .iter()
        .map(|s| format!("{};", s))
        .collect::<Vec<_>>()
        .join(" ")
}
