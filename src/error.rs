//! Typed errors: generation-time (fatal) and runtime (mapped into statuses).

use crate::status::ExecutionStatus;
use thiserror::Error;

/// Build-halting failure raised while compiling declarations or synthesizing code.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("{declaration}: {descriptor} descriptor must be declared on {required} type, found {found}")]
    InvalidKind {
        declaration: String,
        descriptor: &'static str,
        required: &'static str,
        found: &'static str,
    },
    #[error("{declaration}: must extend one of [{markers}] (searched {depth} levels of super-types)")]
    MissingCapability {
        declaration: String,
        markers: String,
        depth: usize,
    },
    #[error("{declaration}: '{attribute}' can not be empty")]
    EmptyIdentity {
        declaration: String,
        attribute: &'static str,
    },
    #[error("{declaration}: cannot declare field group '{group}' with zero fields")]
    EmptyFieldGroup { declaration: String, group: String },
    #[error("{declaration}: group '{group}' marks more than one primary key ({first}, {second})")]
    DuplicatePrimaryKey {
        declaration: String,
        group: String,
        first: String,
        second: String,
    },
    #[error("{declaration}: invalid field spec '{spec}': {reason}")]
    InvalidFieldSpec {
        declaration: String,
        spec: String,
        reason: String,
    },
    #[error("{declaration}.{method}: query references unknown parameter ':{parameter}'")]
    UnknownQueryParameter {
        declaration: String,
        method: String,
        parameter: String,
    },
    #[error("{declaration}.{method}: invalid query: {reason}")]
    InvalidQuery {
        declaration: String,
        method: String,
        reason: String,
    },
    #[error("{declaration}: duplicate parameter '{parameter}'")]
    DuplicateParameter {
        declaration: String,
        parameter: String,
    },
    #[error("{declaration}: unsupported type '{type_name}'")]
    UnsupportedType {
        declaration: String,
        type_name: String,
    },
    #[error("{declaration}: entity without inline fields must name its record type")]
    MissingRecordType { declaration: String },
    #[error("{declaration}.{method}: '{returns}' is not a generated accessor")]
    UnknownAccessor {
        declaration: String,
        method: String,
        returns: String,
    },
    #[error("{declaration}: '{name}' is not a valid Rust name")]
    InvalidIdentifier { declaration: String, name: String },
    #[error("duplicate declaration: {0}")]
    DuplicateDeclaration(String),
    #[error("declarations load: {0}")]
    Load(String),
    #[error("write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Precondition failure while building a statement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("{operation} on {table}: no columns declared")]
    NoColumns { operation: &'static str, table: String },
    #[error("{operation} on {table}: no primary key declared")]
    MissingPrimaryKey { operation: &'static str, table: String },
    #[error("{operation} on {table}: primary key '{column}' has no value")]
    EmptyPrimaryKey {
        operation: &'static str,
        table: String,
        column: String,
    },
    #[error("more than one primary key declared ({first}, {second})")]
    DuplicatePrimaryKey { first: String, second: String },
    #[error("record does not serialize to an object")]
    NotAnObject,
}

/// Internal executor failure. Never leaves the runtime: see [`StoreError::into_status`].
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error("{0}")]
    Db(#[from] sqlx::Error),
    #[error("decode: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("transport: {0}")]
    Transport(String),
}

impl StoreError {
    /// Convert into a failed status tagged with the operation's error code.
    pub fn into_status<T>(self, error_code: i32) -> ExecutionStatus<T> {
        let message = match &self {
            StoreError::Db(sqlx::Error::Database(db)) => db.message().to_string(),
            other => other.to_string(),
        };
        ExecutionStatus::failure(error_code, message)
    }
}
