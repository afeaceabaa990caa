//! Resolved descriptor model: validated declarations ready for code synthesis.

use crate::accessor::storage_table_name;
use crate::case::{self, rust_ident};
use crate::config::types::{DescriptorKind, FieldSpec, GroupRole};
use crate::record::FieldType;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

#[derive(Clone, Debug, PartialEq)]
pub struct FieldDescriptor {
    /// Rust field name.
    pub raw_name: String,
    /// Column / wire name.
    pub serialized_name: String,
    pub inferred_type: FieldType,
    pub is_primary_key: bool,
    pub is_list_cardinality: bool,
    pub ordinal_index: usize,
}

impl FieldDescriptor {
    /// Parse a declared field. The error is a human-readable reason.
    pub fn parse(spec: &FieldSpec, ordinal_index: usize) -> Result<Self, String> {
        let (name, type_name, primary) = match spec {
            FieldSpec::Short(s) => {
                let mut parts = s.split(':').map(str::trim);
                let name = parts.next().unwrap_or_default().to_string();
                let mut type_name = None;
                let mut primary = false;
                for part in parts {
                    if part.eq_ignore_ascii_case("pk") {
                        primary = true;
                    } else if type_name.is_none() {
                        type_name = Some(part.to_string());
                    } else {
                        return Err(format!("unexpected segment '{}'", part));
                    }
                }
                (name, type_name, primary)
            }
            FieldSpec::Full {
                name,
                type_name,
                primary_key,
            } => (name.trim().to_string(), type_name.clone(), *primary_key),
        };
        if name.is_empty() {
            return Err("field name is empty".into());
        }
        let inferred_type = match type_name.as_deref() {
            None => FieldType::String,
            Some(t) => FieldType::parse(t).ok_or_else(|| format!("unsupported type '{}'", t))?,
        };
        Ok(FieldDescriptor {
            raw_name: rust_ident(&name),
            serialized_name: name,
            inferred_type,
            is_primary_key: primary,
            is_list_cardinality: false,
            ordinal_index,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldGroup {
    pub member: String,
    pub role: GroupRole,
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
    pub is_list: bool,
    pub is_numeric_indexed: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TemplateSegment {
    Text(String),
    Param(String),
}

/// Query text split into literal text and `:name` parameter references.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryTemplate {
    pub segments: Vec<TemplateSegment>,
}

fn placeholder_pattern() -> Result<&'static Regex, regex::Error> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    if let Some(re) = PATTERN.get() {
        return Ok(re);
    }
    let re = Regex::new(r":([A-Za-z_][A-Za-z0-9_]*)")?;
    Ok(PATTERN.get_or_init(|| re))
}

impl QueryTemplate {
    /// Split `query`, replacing `:<table_placeholder>` with `table`. References inside
    /// single-quoted literals are left as text.
    pub fn parse(query: &str, table_placeholder: &str, table: &str) -> Result<Self, regex::Error> {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut last = 0;
        for caps in placeholder_pattern()?.captures_iter(query) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let before = &query[last..whole.start()];
            text.push_str(before);
            last = whole.end();
            let quotes = query[..whole.start()].matches('\'').count();
            if quotes % 2 == 1 {
                text.push_str(whole.as_str());
            } else if name.as_str() == table_placeholder {
                text.push_str(table);
            } else {
                if !text.is_empty() {
                    segments.push(TemplateSegment::Text(std::mem::take(&mut text)));
                }
                segments.push(TemplateSegment::Param(name.as_str().to_string()));
            }
        }
        text.push_str(&query[last..]);
        if !text.is_empty() {
            segments.push(TemplateSegment::Text(text));
        }
        Ok(QueryTemplate { segments })
    }

    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            TemplateSegment::Param(p) => Some(p.as_str()),
            TemplateSegment::Text(_) => None,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct QueryParam {
    pub name: String,
    pub field_type: FieldType,
}

#[derive(Clone, Debug, PartialEq)]
pub struct QueryMethod {
    pub name: String,
    pub params: Vec<QueryParam>,
    pub template: QueryTemplate,
    pub returns_list: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResourceDescriptor {
    pub declared_type: String,
    pub kind: DescriptorKind,
    pub resource_name: String,
    pub table_name: String,
    pub is_delta: bool,
    pub is_local: bool,
    pub is_request: bool,
    pub create_table_on_init: bool,
    pub parameter_names: Vec<String>,
    /// Inline record fields; empty when the record type is declared elsewhere.
    pub fields: Vec<FieldDescriptor>,
    pub groups: Vec<FieldGroup>,
    pub queries: Vec<QueryMethod>,
    pub external_record: Option<String>,
}

impl ResourceDescriptor {
    pub fn storage_table(&self) -> String {
        storage_table_name(&self.resource_name, &self.table_name)
    }

    pub fn impl_name(&self) -> String {
        case::impl_name(&self.declared_type)
    }

    /// Record type the accessor reads and writes.
    pub fn record_name(&self) -> String {
        match &self.external_record {
            Some(r) if self.fields.is_empty() => r.clone(),
            _ => case::suffixed(&self.declared_type, case::MODEL_SUFFIX),
        }
    }

    pub fn status_name(&self) -> String {
        case::suffixed(&self.declared_type, case::STATUS_SUFFIX)
    }

    /// Placeholder queries use for the storage table: the record's simple name.
    pub fn table_placeholder(&self) -> String {
        let record = self.record_name();
        record.rsplit("::").next().unwrap_or(&record).to_string()
    }

    pub fn owns_fields(&self) -> bool {
        !self.fields.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AccessorMethod {
    pub name: String,
    pub returns: String,
}

/// One interface in a facade's extension chain.
#[derive(Clone, Debug, PartialEq)]
pub struct FacadeLevel {
    pub declared_type: String,
    pub accessors: Vec<AccessorMethod>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FacadeDescriptor {
    pub declared_type: String,
    pub as_singleton: bool,
    pub as_dao_provider: bool,
    /// Most-derived first; each level's parent is the next one.
    pub levels: Vec<FacadeLevel>,
}

impl FacadeDescriptor {
    pub fn impl_name(&self) -> String {
        case::impl_name(&self.declared_type)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ResolvedSchema {
    pub resources: Vec<ResourceDescriptor>,
    pub facades: Vec<FacadeDescriptor>,
    pub resource_by_type: HashMap<String, usize>,
}

impl ResolvedSchema {
    pub fn resource(&self, declared_type: &str) -> Option<&ResourceDescriptor> {
        self.resource_by_type
            .get(declared_type)
            .and_then(|&i| self.resources.get(i))
    }
}
