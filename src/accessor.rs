//! Contracts implemented by generated accessors. The trait an accessor implements is its
//! capability: only [`LocalAccessor`]s write directly, only [`RemoteAccessor`]s fetch.

use crate::error::QueryError;
use crate::record::{cached_metadata, FieldsSlot, LocalFieldsMetadata, Record};
use crate::state::Provider;
use crate::transport::Headers;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// `<resource>_<table>`, or the resource alone when no table is named.
pub fn storage_table_name(resource_name: &str, table_name: &str) -> String {
    if table_name.is_empty() {
        resource_name.to_string()
    } else {
        format!("{}_{}", resource_name, table_name)
    }
}

pub trait Accessor: Send + Sync + 'static {
    fn provider(&self) -> &Provider;
    fn resource_name(&self) -> &str;
    fn table_name(&self) -> &str;
    fn is_delta(&self) -> bool;

    fn storage_table(&self) -> String {
        storage_table_name(self.resource_name(), self.table_name())
    }
}

/// An accessor backed by a stored table of `Record`s.
pub trait EntityAccessor: Accessor {
    type Record: Record;

    fn fields_slot(&self) -> &FieldsSlot;

    fn fields_metadata(&self) -> Result<Arc<LocalFieldsMetadata>, QueryError> {
        cached_metadata::<Self::Record>(self.fields_slot())
    }
}

/// Entity stored only in the local store.
pub trait LocalAccessor: EntityAccessor {}

/// Entity cached locally and refreshed from a remote resource.
pub trait RemoteAccessor: EntityAccessor {}

/// Request-style endpoint with a typed response.
pub trait RequestAccessor: Send + Sync + 'static {
    type Response: DeserializeOwned + Send;

    fn provider(&self) -> &Provider;
    fn resource_name(&self) -> &str;

    /// Falls back to the headers of the facade's provider.
    fn default_headers(&self) -> Option<&Headers> {
        self.provider().default_headers()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_table_joins_names() {
        assert_eq!(storage_table_name("zs_mp_04", "output_table"), "zs_mp_04_output_table");
        assert_eq!(storage_table_name("settings", ""), "settings");
    }
}
