//! Raw declaration types as read from JSON.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Interface,
    #[serde(alias = "abstract_class")]
    Abstract,
    Class,
}

impl TypeKind {
    pub fn label(self) -> &'static str {
        match self {
            TypeKind::Interface => "interface",
            TypeKind::Abstract => "abstract",
            TypeKind::Class => "class",
        }
    }

    pub fn is_instantiable(self) -> bool {
        matches!(self, TypeKind::Class)
    }
}

fn default_kind() -> TypeKind {
    TypeKind::Interface
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptorKind {
    Entity,
    LocalEntity,
    WebRequest,
    RestRequest,
    Facade,
}

impl DescriptorKind {
    pub fn label(self) -> &'static str {
        match self {
            DescriptorKind::Entity => "entity",
            DescriptorKind::LocalEntity => "local entity",
            DescriptorKind::WebRequest => "web request",
            DescriptorKind::RestRequest => "rest request",
            DescriptorKind::Facade => "facade",
        }
    }

    pub fn is_request(self) -> bool {
        matches!(self, DescriptorKind::WebRequest | DescriptorKind::RestRequest)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupRole {
    Table,
    Param,
}

/// `"NAME"`, `"NAME:Int"`, `"NAME:String:pk"`, `"NAME:pk"` or the object form.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldSpec {
    Short(String),
    Full {
        name: String,
        #[serde(rename = "type", default)]
        type_name: Option<String>,
        #[serde(default)]
        primary_key: bool,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldGroupConfig {
    /// Nested member the group is declared on, e.g. `EtData`.
    pub member: String,
    #[serde(default = "default_role")]
    pub role: GroupRole,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub is_list: bool,
    #[serde(default)]
    pub is_numeric: bool,
}

fn default_role() -> GroupRole {
    GroupRole::Table
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DescriptorConfig {
    pub kind: DescriptorKind,
    #[serde(default)]
    pub resource_name: String,
    #[serde(default)]
    pub table_name: String,
    #[serde(default)]
    pub is_delta: bool,
    #[serde(default)]
    pub create_table_on_init: bool,
    #[serde(default)]
    pub parameters: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub groups: Vec<FieldGroupConfig>,
    /// Externally declared record type, for entities without inline fields.
    #[serde(default)]
    pub record: Option<String>,
    #[serde(default)]
    pub as_singleton: bool,
    #[serde(default)]
    pub as_dao_provider: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccessorMethodConfig {
    pub name: String,
    pub returns: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QueryParamConfig {
    pub name: String,
    #[serde(rename = "type", default = "default_param_type")]
    pub type_name: String,
}

fn default_param_type() -> String {
    "String".into()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QueryMethodConfig {
    pub name: String,
    pub query: String,
    #[serde(default)]
    pub params: Vec<QueryParamConfig>,
    #[serde(default)]
    pub returns_list: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TypeDeclaration {
    pub name: String,
    #[serde(default = "default_kind")]
    pub kind: TypeKind,
    #[serde(default)]
    pub extends: Vec<String>,
    #[serde(default)]
    pub accessors: Vec<AccessorMethodConfig>,
    #[serde(default)]
    pub queries: Vec<QueryMethodConfig>,
    #[serde(default)]
    pub descriptor: Option<DescriptorConfig>,
}

/// Every declaration handed over by the discovery step.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DeclarationSet {
    #[serde(default)]
    pub types: Vec<TypeDeclaration>,
}

impl DeclarationSet {
    pub fn extend(&mut self, other: DeclarationSet) {
        self.types.extend(other.types);
    }
}
