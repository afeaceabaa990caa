//! Uniform result of every runtime operation.

use crate::record::Row;
use serde::Serialize;
use std::fmt::Display;

pub const ERROR_CODE_SELECT_WHERE: i32 = 10001;
pub const ERROR_CODE_REMOVE_WHERE: i32 = 10002;
pub const ERROR_CODE_UPDATE: i32 = 10003;
pub const ERROR_CODE_CREATE: i32 = 10004;
pub const ERROR_CODE_INSERT: i32 = 10005;
pub const ERROR_CODE_DELETE: i32 = 10006;
pub const ERROR_CODE_REQUEST: i32 = 10007;
pub const ERROR_CODE_DECODE: i32 = 10008;

/// Message prefix the embedded store uses for an absent table.
pub const MISSING_TABLE_PREFIX: &str = "no such table";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExecutionStatus<T = Row> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub rows: Vec<T>,
}

impl<T> Default for ExecutionStatus<T> {
    fn default() -> Self {
        Self::success(Vec::new())
    }
}

impl<T> ExecutionStatus<T> {
    pub fn success(rows: Vec<T>) -> Self {
        ExecutionStatus {
            ok: true,
            error_code: None,
            message: None,
            rows,
        }
    }

    pub fn failure(error_code: i32, message: impl Into<String>) -> Self {
        ExecutionStatus {
            ok: false,
            error_code: Some(error_code),
            message: Some(message.into()),
            rows: Vec::new(),
        }
    }

    /// True when the store rejected the statement because its table does not exist yet.
    pub fn is_missing_table(&self) -> bool {
        !self.ok
            && self
                .message
                .as_deref()
                .is_some_and(|m| m.starts_with(MISSING_TABLE_PREFIX))
    }

    /// Same status with rows dropped, retyped for another record.
    pub fn cast<U>(self) -> ExecutionStatus<U> {
        ExecutionStatus {
            ok: self.ok,
            error_code: self.error_code,
            message: self.message,
            rows: Vec::new(),
        }
    }

    /// Convert every row; the first failure turns the whole status into a decode failure.
    pub fn try_map_rows<U, E, F>(self, mut f: F) -> ExecutionStatus<U>
    where
        E: Display,
        F: FnMut(T) -> Result<U, E>,
    {
        let ExecutionStatus {
            ok,
            error_code,
            message,
            rows,
        } = self;
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            match f(row) {
                Ok(v) => out.push(v),
                Err(e) => return ExecutionStatus::failure(ERROR_CODE_DECODE, e.to_string()),
            }
        }
        ExecutionStatus {
            ok,
            error_code,
            message,
            rows: out,
        }
    }

    pub fn into_rows(self) -> Vec<T> {
        self.rows
    }
}
