mod support;

use dao_synth::accessor::Accessor;
use dao_synth::service::DaoService;
use dao_synth::sql::SelectOptions;
use dao_synth::status::ERROR_CODE_REQUEST;
use dao_synth::transport::{Headers, ParamMap};
use serde_json::json;
use dao_synth::facade::DatabaseFacade;
use support::{provider, AppDatabaseImpl, CatalogImpl, CatalogModel, FakeTransport, StockRequestImpl};

fn entry(code: &str, title: &str) -> CatalogModel {
    CatalogModel {
        code: Some(code.into()),
        title: Some(title.into()),
    }
}

fn by_code() -> SelectOptions {
    SelectOptions::default().order_by("CODE")
}

#[tokio::test]
async fn request_replaces_cache_table_and_publishes() {
    let transport = FakeTransport::serving(vec![
        json!({"CODE": "A", "TITLE": "anchor"}),
        json!({"CODE": "B", "TITLE": "bracket"}),
    ]);
    let dao = CatalogImpl::new(provider().await.with_transport(transport.clone())).await;
    let trigger = dao.provider().triggers().channel(&dao.storage_table());

    let status = dao.request_with_params("EN").await;
    assert!(status.ok, "{:?}", status.message);
    assert_eq!(status.rows.len(), 2);
    assert!(trigger.has_published());
    assert_eq!(
        DaoService::select(&dao, &by_code()).await,
        vec![entry("A", "anchor"), entry("B", "bracket")]
    );

    let calls = transport.calls.lock().unwrap().clone();
    assert_eq!(calls[0].0, "catalog");
    assert_eq!(calls[0].1, ParamMap::new().with("IV_LANG", "EN"));

    transport.set_rows(vec![json!({"CODE": "C", "TITLE": "clamp"})]);
    assert!(dao.request(&ParamMap::new()).await.ok);
    assert_eq!(DaoService::select(&dao, &by_code()).await, vec![entry("C", "clamp")]);
}

#[tokio::test]
async fn delta_request_merges_into_cache_table() {
    let transport = FakeTransport::serving(vec![json!({"CODE": "A", "TITLE": "anchor"})]);
    let provider = provider().await.with_transport(transport.clone());
    let dao = CatalogImpl::with_names(provider, "catalog", "cache", true);
    assert!(DaoService::create_table(&dao).await.ok);

    assert!(dao.request(&ParamMap::new()).await.ok);
    transport.set_rows(vec![json!({"CODE": "A", "TITLE": "arbor"}), json!({"CODE": "B", "TITLE": "bracket"})]);
    assert!(dao.request(&ParamMap::new()).await.ok);
    assert_eq!(
        DaoService::select(&dao, &by_code()).await,
        vec![entry("A", "arbor"), entry("B", "bracket")]
    );
}

#[tokio::test]
async fn request_without_transport_is_a_failed_status() {
    let dao = CatalogImpl::new(provider().await).await;
    let status = dao.request(&ParamMap::new()).await;
    assert!(!status.ok);
    assert_eq!(status.error_code, Some(ERROR_CODE_REQUEST));
}

#[tokio::test]
async fn request_descriptor_decodes_typed_response() {
    let transport = FakeTransport::serving(Vec::new());
    transport.set_response(vec![json!({
        "ET_DATA": [{"MATNR": "M-1", "MENGE": 2.5}, {"MATNR": "M-2"}]
    })]);
    let headers = Headers::from([("x-client".to_string(), "100".to_string())]);
    let request = StockRequestImpl::new(provider().await.with_transport(transport.clone())).with_headers(headers.clone());

    let params = StockRequestImpl::create_params_map("1000", "01");
    assert_eq!(params.names().collect::<Vec<_>>(), vec!["IV_WERKS", "IV_LGORT"]);
    let status = request.request(&params).await;
    assert!(status.ok, "{:?}", status.message);
    let data = status.rows[0].et_data.clone().unwrap();
    assert_eq!(data[0].matnr.as_deref(), Some("M-1"));
    assert_eq!(data[0].menge, Some(2.5));
    assert_eq!(data[1].menge, None);

    let calls = transport.calls.lock().unwrap().clone();
    assert_eq!(calls[0].0, "ZT_STOCK");
    assert_eq!(calls[0].2, headers);
}

#[tokio::test]
async fn undecodable_response_is_a_failed_status() {
    let transport = FakeTransport::serving(Vec::new());
    transport.set_response(vec![json!({"ET_DATA": "not a list"})]);
    let request = StockRequestImpl::new(provider().await.with_transport(transport));
    let status = request.request(&ParamMap::new()).await;
    assert!(!status.ok);
    assert!(status.rows.is_empty());
}

#[tokio::test]
async fn facade_default_headers_reach_the_transport() {
    let transport = FakeTransport::serving(Vec::new());
    transport.set_response(vec![json!({"ET_DATA": []})]);
    let headers = Headers::from([("sap-client".to_string(), "200".to_string())]);
    let db = AppDatabaseImpl::new(
        provider()
            .await
            .with_transport(transport.clone())
            .with_default_headers(headers.clone()),
    );
    assert_eq!(db.default_headers(), Some(&headers));

    let status = db.stock_request().await.request(&ParamMap::new()).await;
    assert!(status.ok, "{:?}", status.message);
    let calls = transport.calls.lock().unwrap().clone();
    assert_eq!(calls[0].2, headers);
}

#[tokio::test]
async fn accessor_headers_override_facade_defaults() {
    let transport = FakeTransport::serving(Vec::new());
    transport.set_response(vec![json!({"ET_DATA": []})]);
    let facade_headers = Headers::from([("sap-client".to_string(), "200".to_string())]);
    let own = Headers::from([("x-client".to_string(), "100".to_string())]);
    let request = StockRequestImpl::new(
        provider()
            .await
            .with_transport(transport.clone())
            .with_default_headers(facade_headers),
    )
    .with_headers(own.clone());
    request.request(&ParamMap::new()).await;
    assert_eq!(transport.calls.lock().unwrap()[0].2, own);
}
