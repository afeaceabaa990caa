//! Accessors, facades and a fake transport shaped like `dao-synth` output, shared by the
//! integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use dao_synth::accessor::{Accessor, EntityAccessor, LocalAccessor, RemoteAccessor, RequestAccessor};
use dao_synth::facade::{DatabaseFacade, ProviderRegistry};
use dao_synth::record::{FieldDef, FieldType, FieldsSlot, Record};
use dao_synth::service::{DaoService, RequestService};
use dao_synth::settings::Settings;
use dao_synth::sql::quote_text;
use dao_synth::state::Provider;
use dao_synth::status::ExecutionStatus;
use dao_synth::transport::{Headers, ParamMap, RemoteTransport};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, Mutex};

pub async fn provider() -> Provider {
    Provider::connect(&Settings::default()).await.expect("in-memory store")
}

// Local entity

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemsModel {
    #[serde(rename = "ID", default)]
    pub id: Option<String>,
    #[serde(rename = "NAME", default)]
    pub name: Option<String>,
    #[serde(rename = "QTY", default)]
    pub qty: Option<i32>,
}

impl Record for ItemsModel {
    const FIELDS: &'static [FieldDef] = &[
        FieldDef::primary("ID", FieldType::String),
        FieldDef::new("NAME", FieldType::String),
        FieldDef::new("QTY", FieldType::Int),
    ];
}

pub fn item(id: &str, name: &str, qty: i32) -> ItemsModel {
    ItemsModel {
        id: Some(id.to_string()),
        name: Some(name.to_string()),
        qty: Some(qty),
    }
}

pub struct ItemsImpl {
    provider: Provider,
    resource_name: String,
    table_name: String,
    is_delta: bool,
    fields_data: FieldsSlot,
}

impl ItemsImpl {
    pub const RESOURCE_NAME: &'static str = "res";
    pub const TABLE_NAME: &'static str = "items";
    pub const IS_DELTA: bool = false;

    pub fn new(provider: Provider) -> Self {
        Self::with_names(provider, Self::RESOURCE_NAME, Self::TABLE_NAME, Self::IS_DELTA)
    }

    pub fn with_names(
        provider: Provider,
        resource_name: impl Into<String>,
        table_name: impl Into<String>,
        is_delta: bool,
    ) -> Self {
        ItemsImpl {
            provider,
            resource_name: resource_name.into(),
            table_name: table_name.into(),
            is_delta,
            fields_data: FieldsSlot::default(),
        }
    }

    pub async fn by_name(&self, name: &str) -> Vec<ItemsModel> {
        let sql = format!("SELECT * FROM res_items WHERE NAME = {} ORDER BY ID", quote_text(name));
        DaoService::query_list(self, &sql).await
    }
}

impl Accessor for ItemsImpl {
    fn provider(&self) -> &Provider {
        &self.provider
    }

    fn resource_name(&self) -> &str {
        &self.resource_name
    }

    fn table_name(&self) -> &str {
        &self.table_name
    }

    fn is_delta(&self) -> bool {
        self.is_delta
    }
}

impl EntityAccessor for ItemsImpl {
    type Record = ItemsModel;

    fn fields_slot(&self) -> &FieldsSlot {
        &self.fields_data
    }
}

impl LocalAccessor for ItemsImpl {}

// Remote entity

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogModel {
    #[serde(rename = "CODE", default)]
    pub code: Option<String>,
    #[serde(rename = "TITLE", default)]
    pub title: Option<String>,
}

impl Record for CatalogModel {
    const FIELDS: &'static [FieldDef] = &[
        FieldDef::primary("CODE", FieldType::String),
        FieldDef::new("TITLE", FieldType::String),
    ];
}

pub struct CatalogImpl {
    provider: Provider,
    resource_name: String,
    table_name: String,
    is_delta: bool,
    fields_data: FieldsSlot,
}

impl CatalogImpl {
    pub async fn new(provider: Provider) -> Self {
        let dao = Self::with_names(provider, "catalog", "cache", false);
        let _ = DaoService::create_table(&dao).await;
        dao
    }

    pub fn with_names(
        provider: Provider,
        resource_name: impl Into<String>,
        table_name: impl Into<String>,
        is_delta: bool,
    ) -> Self {
        CatalogImpl {
            provider,
            resource_name: resource_name.into(),
            table_name: table_name.into(),
            is_delta,
            fields_data: FieldsSlot::default(),
        }
    }

    pub fn create_params_map(iv_lang: impl Into<Value>) -> ParamMap {
        ParamMap::new().with("IV_LANG", iv_lang)
    }

    pub async fn request(&self, params: &ParamMap) -> ExecutionStatus<CatalogModel> {
        DaoService::request(self, params).await
    }

    pub async fn request_with_params(&self, iv_lang: impl Into<Value>) -> ExecutionStatus<CatalogModel> {
        let params = Self::create_params_map(iv_lang);
        self.request(&params).await
    }
}

impl Accessor for CatalogImpl {
    fn provider(&self) -> &Provider {
        &self.provider
    }

    fn resource_name(&self) -> &str {
        &self.resource_name
    }

    fn table_name(&self) -> &str {
        &self.table_name
    }

    fn is_delta(&self) -> bool {
        self.is_delta
    }
}

impl EntityAccessor for CatalogImpl {
    type Record = CatalogModel;

    fn fields_slot(&self) -> &FieldsSlot {
        &self.fields_data
    }
}

impl RemoteAccessor for CatalogImpl {}

// Request

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StockRequestEtDataModel {
    #[serde(rename = "MATNR", default)]
    pub matnr: Option<String>,
    #[serde(rename = "MENGE", default)]
    pub menge: Option<f64>,
}

impl Record for StockRequestEtDataModel {
    const FIELDS: &'static [FieldDef] = &[
        FieldDef::new("MATNR", FieldType::String),
        FieldDef::new("MENGE", FieldType::Double),
    ];
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StockRequestResultModel {
    #[serde(rename = "ET_DATA", default)]
    pub et_data: Option<Vec<StockRequestEtDataModel>>,
}

pub struct StockRequestImpl {
    provider: Provider,
    resource_name: String,
    default_headers: Option<Headers>,
}

impl StockRequestImpl {
    pub fn new(provider: Provider) -> Self {
        StockRequestImpl {
            provider,
            resource_name: "ZT_STOCK".to_string(),
            default_headers: None,
        }
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn create_params_map(iv_werks: impl Into<Value>, iv_lgort: impl Into<Value>) -> ParamMap {
        ParamMap::new().with("IV_WERKS", iv_werks).with("IV_LGORT", iv_lgort)
    }

    pub async fn request(&self, params: &ParamMap) -> ExecutionStatus<StockRequestResultModel> {
        RequestService::send(self, params).await
    }
}

impl RequestAccessor for StockRequestImpl {
    type Response = StockRequestResultModel;

    fn provider(&self) -> &Provider {
        &self.provider
    }

    fn resource_name(&self) -> &str {
        &self.resource_name
    }

    fn default_headers(&self) -> Option<&Headers> {
        self.default_headers.as_ref().or_else(|| self.provider.default_headers())
    }
}

// Transport

#[derive(Default)]
pub struct FakeTransport {
    pub rows: Mutex<Vec<Value>>,
    pub response: Mutex<Vec<Value>>,
    pub calls: Mutex<Vec<(String, ParamMap, Headers)>>,
}

impl FakeTransport {
    pub fn serving(rows: Vec<Value>) -> Arc<Self> {
        let transport = FakeTransport::default();
        *transport.rows.lock().unwrap() = rows;
        Arc::new(transport)
    }

    pub fn set_rows(&self, rows: Vec<Value>) {
        *self.rows.lock().unwrap() = rows;
    }

    pub fn set_response(&self, response: Vec<Value>) {
        *self.response.lock().unwrap() = response;
    }
}

#[async_trait]
impl RemoteTransport for FakeTransport {
    async fn fetch_resource(&self, resource_name: &str, _is_delta: bool, params: &ParamMap) -> ExecutionStatus<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((resource_name.to_string(), params.clone(), Headers::new()));
        ExecutionStatus::success(self.rows.lock().unwrap().clone())
    }

    async fn send_request(&self, resource_name: &str, params: &ParamMap, headers: &Headers) -> ExecutionStatus<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((resource_name.to_string(), params.clone(), headers.clone()));
        ExecutionStatus::success(self.response.lock().unwrap().clone())
    }
}

// Facades

pub struct AppDatabaseImpl {
    provider: Provider,
    app_database_slots: Arc<ProviderRegistry>,
    base_database_slots: Arc<ProviderRegistry>,
}

impl AppDatabaseImpl {
    pub fn new(provider: Provider) -> Self {
        let base_database_slots = ProviderRegistry::root("IBaseDatabase");
        let app_database_slots = ProviderRegistry::with_parent("IAppDatabase", base_database_slots.clone());
        AppDatabaseImpl {
            provider,
            app_database_slots,
            base_database_slots,
        }
    }

    pub async fn catalog_dao(&self) -> Arc<CatalogImpl> {
        let provider = self.provider.clone();
        self.app_database_slots
            .get_or_init("catalogDao", || async move { CatalogImpl::new(provider).await })
            .await
    }

    pub async fn stock_request(&self) -> Arc<StockRequestImpl> {
        let provider = self.provider.clone();
        self.app_database_slots
            .get_or_init("stockRequest", || async move { StockRequestImpl::new(provider) })
            .await
    }

    pub async fn items_dao(&self) -> Arc<ItemsImpl> {
        let provider = self.provider.clone();
        self.base_database_slots
            .get_or_init("itemsDao", || async move { ItemsImpl::new(provider) })
            .await
    }
}

impl DatabaseFacade for AppDatabaseImpl {
    fn provider(&self) -> &Provider {
        &self.provider
    }

    fn clear_providers(&self) {
        self.app_database_slots.reset();
    }
}

pub struct ProviderDatabaseImpl {
    provider: Provider,
}

impl ProviderDatabaseImpl {
    pub fn new(provider: Provider) -> Self {
        ProviderDatabaseImpl { provider }
    }

    pub async fn items_dao(&self) -> Arc<ItemsImpl> {
        Arc::new(ItemsImpl::new(self.provider.clone()))
    }
}

impl DatabaseFacade for ProviderDatabaseImpl {
    fn provider(&self) -> &Provider {
        &self.provider
    }
}
