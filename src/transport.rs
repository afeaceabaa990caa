//! Remote endpoint boundary. The transport itself lives outside this crate; accessors only
//! hand it a resource name and an ordered parameter map.

use crate::status::ExecutionStatus;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Request parameters in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ParamMap(Vec<(String, Value)>);

impl ParamMap {
    pub fn new() -> Self {
        ParamMap(Vec::new())
    }

    /// Set a parameter; an existing name keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub type Headers = BTreeMap<String, String>;

#[async_trait]
pub trait RemoteTransport: Send + Sync {
    /// Fetch the rows of a remote resource, one JSON object per row.
    async fn fetch_resource(&self, resource_name: &str, is_delta: bool, params: &ParamMap) -> ExecutionStatus<Value>;

    /// Send a request-style call; rows carry the decoded response body.
    async fn send_request(&self, resource_name: &str, params: &ParamMap, headers: &Headers) -> ExecutionStatus<Value>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_declaration_order() {
        let params = ParamMap::new().with("IV_WERKS", "1000").with("IV_LGORT", "01").with("IV_WERKS", "2000");
        assert_eq!(params.names().collect::<Vec<_>>(), vec!["IV_WERKS", "IV_LGORT"]);
        assert_eq!(params.get("IV_WERKS"), Some(&json!("2000")));
        assert_eq!(params.len(), 2);
    }
}
