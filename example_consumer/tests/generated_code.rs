//! Exercises the accessors and facades the build script generated from `declarations.json`.

use async_trait::async_trait;
use dao_synth::status::ERROR_CODE_CREATE;
use dao_synth::store::QueryExecutor;
use dao_synth::transport::Headers;
use dao_synth::trigger::TriggerRegistry;
use dao_synth::{Accessor, DaoService, DatabaseFacade, ExecutionStatus, ParamMap, Provider, RemoteTransport, Settings};
use example_consumer::generated::*;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

async fn provider() -> Provider {
    Provider::connect(&Settings::default()).await.expect("in-memory store")
}

fn task(tid: &str, code: &str, sorder: i32) -> ZsMp04DaoModel {
    ZsMp04DaoModel {
        tid: Some(tid.into()),
        code: Some(code.into()),
        sorder: Some(sorder),
        ..Default::default()
    }
}

#[tokio::test]
async fn constructor_creates_the_table() {
    let dao = ZsMp04DaoImpl::new(provider().await).await;
    assert_eq!(dao.storage_table(), "zs_mp_04_output_table");
    let status = DaoService::insert_or_replace(&dao, &task("1", "PICK", 10), false).await;
    assert!(status.ok, "{:?}", status.message);
}

#[tokio::test]
async fn text_parameters_are_quoted() {
    let dao = ZsMp04DaoImpl::new(provider().await).await;
    let rows = vec![task("1", "it's", 20), task("2", "PICK", 10), task("3", "PICK", 5)];
    DaoService::insert_or_replace_all(&dao, &rows, false).await;

    assert_eq!(dao.by_code("it's").await, vec![task("1", "it's", 20)]);
    let picks: Vec<_> = dao.by_code("PICK").await.into_iter().filter_map(|t| t.tid).collect();
    assert_eq!(picks, vec!["3", "2"]);
    assert_eq!(dao.by_tid("2").await, Some(task("2", "PICK", 10)));
    assert_eq!(dao.by_tid("9").await, None);
}

#[tokio::test]
async fn numeric_parameters_are_inlined() {
    let dao = ZsMp04DaoImpl::new(provider().await).await;
    let rows = vec![task("1", "A", 5), task("2", "B", 7), task("3", "C", 5)];
    DaoService::insert_or_replace_all(&dao, &rows, false).await;

    let matches: Vec<_> = dao.by_sorder(5).await.into_iter().filter_map(|t| t.tid).collect();
    assert_eq!(matches, vec!["1", "3"]);
}

#[tokio::test]
async fn singleton_facade_memoizes_until_cleared() {
    let db = AppDatabaseImpl::instance(provider().await);
    assert!(Arc::ptr_eq(&db, &AppDatabaseImpl::instance(provider().await)));

    let first = db.zs_mp04_dao().await;
    assert!(Arc::ptr_eq(&first, &db.zs_mp04_dao().await));
    let request = db.zt_mp01_request().await;
    db.clear_providers();
    assert!(!Arc::ptr_eq(&first, &db.zs_mp04_dao().await));
    assert!(!Arc::ptr_eq(&request, &db.zt_mp01_request().await));
}

#[tokio::test]
async fn provider_facade_builds_fresh_accessors() {
    let db = ReportingDatabaseImpl::new(provider().await);
    let a = db.zs_mp04_dao().await;
    let b = db.zs_mp04_dao().await;
    assert!(!Arc::ptr_eq(&a, &b));

    DaoService::insert_or_replace(a.as_ref(), &task("1", "PICK", 1), false).await;
    assert_eq!(DaoService::select(b.as_ref(), &Default::default()).await.len(), 1);
}

#[tokio::test]
async fn remote_entity_requests_with_positional_params() {
    let params = MaterialDaoImpl::create_params_map("1000");
    assert_eq!(params.names().collect::<Vec<_>>(), vec!["IV_WERKS"]);
    let status = MaterialDaoImpl::new(provider().await).request_with_params("1000").await;
    assert!(!status.ok, "no transport is configured");
}

#[derive(Default)]
struct RecordingTransport {
    headers: Mutex<Vec<Headers>>,
    params: Mutex<Vec<ParamMap>>,
}

#[async_trait]
impl RemoteTransport for RecordingTransport {
    async fn fetch_resource(&self, _resource_name: &str, _is_delta: bool, _params: &ParamMap) -> ExecutionStatus<Value> {
        ExecutionStatus::success(Vec::new())
    }

    async fn send_request(&self, _resource_name: &str, params: &ParamMap, headers: &Headers) -> ExecutionStatus<Value> {
        self.headers.lock().unwrap().push(headers.clone());
        self.params.lock().unwrap().push(params.clone());
        ExecutionStatus::success(vec![json!({
            "ET_DATA": [{"MATNR": "M-1", "MENGE": 2.0, "MEINS": "PC"}],
            "ES_RETURN": {"TYPE": "S", "MESSAGE": "ok"}
        })])
    }
}

#[tokio::test]
async fn facade_default_headers_reach_generated_requests() {
    let transport = Arc::new(RecordingTransport::default());
    let headers = Headers::from([("sap-client".to_string(), "100".to_string())]);
    let db = ReportingDatabaseImpl::new(
        provider()
            .await
            .with_transport(transport.clone())
            .with_default_headers(headers.clone()),
    );
    assert_eq!(db.default_headers(), Some(&headers));

    let params = ZtMp01RequestParams {
        iv_werks: Some("1000".into()),
        it_items: Some(vec![ZtMp01RequestItItemsParams {
            pos: Some(1),
            matnr: Some("M-1".into()),
            qty: Some(2.0),
        }]),
        ..Default::default()
    };
    let status = db.zt_mp01_request().await.request_params(&params).await;
    assert!(status.ok, "{:?}", status.message);
    let response = &status.rows[0];
    assert_eq!(response.es_return.as_ref().and_then(|r| r.r#type.as_deref()), Some("S"));
    assert_eq!(response.et_data.as_ref().map(Vec::len), Some(1));

    assert_eq!(transport.headers.lock().unwrap()[0], headers);
    let sent = transport.params.lock().unwrap()[0].clone();
    assert_eq!(sent.names().collect::<Vec<_>>(), vec!["IV_WERKS", "IT_ITEMS"]);
    assert_eq!(sent.get("IT_ITEMS"), Some(&json!([{"POS": 1, "MATNR": "M-1", "QTY": 2.0}])));
}

/// Executor whose every statement fails, to drive the create-table-on-init failure path.
#[derive(Default)]
struct FailingExecutor {
    statements: Mutex<Vec<String>>,
    triggers: TriggerRegistry,
}

impl FailingExecutor {
    fn fail(&self, statement: &str, error_code: i32) -> ExecutionStatus {
        self.statements.lock().unwrap().push(statement.to_string());
        ExecutionStatus::failure(error_code, "disk I/O error")
    }
}

#[async_trait]
impl QueryExecutor for FailingExecutor {
    async fn execute_for_status(&self, _table: &str, statement: &str, error_code: i32, _op: &str, _notify: bool) -> ExecutionStatus {
        self.fail(statement, error_code)
    }

    async fn execute_for_rows(&self, _table: &str, statement: &str, error_code: i32) -> ExecutionStatus {
        self.fail(statement, error_code)
    }

    async fn execute_transaction_for_status(
        &self,
        _table: &str,
        statement: &str,
        error_code: i32,
        _op: &str,
        _notify: bool,
    ) -> ExecutionStatus {
        self.fail(statement, error_code)
    }

    async fn execute_transaction_for_rows(&self, _table: &str, statement: &str, error_code: i32) -> ExecutionStatus {
        self.fail(statement, error_code)
    }

    fn triggers(&self) -> &TriggerRegistry {
        &self.triggers
    }
}

#[tokio::test]
async fn failed_create_on_init_still_returns_the_accessor() {
    let executor = Arc::new(FailingExecutor::default());
    let dao = ZsMp04DaoImpl::new(Provider::new(executor.clone())).await;
    assert_eq!(dao.resource_name(), ZsMp04DaoImpl::RESOURCE_NAME);

    let statements = executor.statements.lock().unwrap().clone();
    assert_eq!(statements.len(), 1);
    assert!(statements[0].starts_with("CREATE TABLE IF NOT EXISTS zs_mp_04_output_table"));

    let status = DaoService::create_table(&dao).await;
    assert_eq!(status.error_code, Some(ERROR_CODE_CREATE));
}
