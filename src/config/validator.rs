//! Declaration validation: kind, capability, identity, primary keys, query templates and
//! facade accessor references. The first failure aborts generation.

use crate::config::graph::{TypeGraph, MAX_SUPERTYPE_DEPTH};
use crate::config::resolved::{FieldDescriptor, QueryTemplate};
use crate::config::types::{DeclarationSet, DescriptorConfig, DescriptorKind, FieldSpec, TypeDeclaration};
use crate::error::SchemaError;
use crate::record::FieldType;
use std::collections::HashSet;

pub const MARKER_REMOTE_DAO: &str = "Dao";
pub const MARKER_LOCAL_DAO: &str = "LocalDao";
pub const MARKER_FIELDS_DAO: &str = "FieldsDao";
pub const MARKER_WEB_REQUEST: &str = "WebRequest";
pub const MARKER_REST_REQUEST: &str = "RestRequest";
pub const MARKER_BASE_REQUEST: &str = "BaseRequest";
pub const MARKER_DATABASE: &str = "Database";

/// Marker types a descriptor's declared type must reach.
pub fn capability_markers(descriptor: &DescriptorConfig) -> &'static [&'static str] {
    match descriptor.kind {
        DescriptorKind::Entity | DescriptorKind::LocalEntity if !descriptor.fields.is_empty() => &[MARKER_FIELDS_DAO],
        DescriptorKind::Entity => &[MARKER_REMOTE_DAO],
        DescriptorKind::LocalEntity => &[MARKER_LOCAL_DAO],
        DescriptorKind::WebRequest => &[MARKER_WEB_REQUEST, MARKER_BASE_REQUEST],
        DescriptorKind::RestRequest => &[MARKER_REST_REQUEST, MARKER_BASE_REQUEST],
        DescriptorKind::Facade => &[MARKER_DATABASE],
    }
}

/// Every marker name; facade ancestor walks stop at these.
pub const ALL_MARKERS: &[&str] = &[
    MARKER_REMOTE_DAO,
    MARKER_LOCAL_DAO,
    MARKER_FIELDS_DAO,
    MARKER_WEB_REQUEST,
    MARKER_REST_REQUEST,
    MARKER_BASE_REQUEST,
    MARKER_DATABASE,
];

pub fn validate(set: &DeclarationSet) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();
    for t in &set.types {
        if !seen.insert(t.name.as_str()) {
            return Err(SchemaError::DuplicateDeclaration(t.name.clone()));
        }
    }
    let graph = TypeGraph::new(set);
    for decl in &set.types {
        let Some(descriptor) = &decl.descriptor else {
            continue;
        };
        check_kind(decl, descriptor)?;
        check_capability(&graph, decl, descriptor)?;
        check_identity(decl, descriptor)?;
        check_fields(decl, descriptor)?;
        if matches!(descriptor.kind, DescriptorKind::Entity | DescriptorKind::LocalEntity) {
            check_queries(decl, descriptor)?;
        }
        if descriptor.kind == DescriptorKind::Facade {
            check_facade(&graph, decl)?;
        }
    }
    Ok(())
}

fn check_kind(decl: &TypeDeclaration, descriptor: &DescriptorConfig) -> Result<(), SchemaError> {
    if !decl.kind.is_instantiable() {
        return Ok(());
    }
    let required = if descriptor.kind == DescriptorKind::Facade {
        "an interface-like"
    } else {
        "an abstract"
    };
    Err(SchemaError::InvalidKind {
        declaration: decl.name.clone(),
        descriptor: descriptor.kind.label(),
        required,
        found: decl.kind.label(),
    })
}

fn check_capability(graph: &TypeGraph<'_>, decl: &TypeDeclaration, descriptor: &DescriptorConfig) -> Result<(), SchemaError> {
    let markers = capability_markers(descriptor);
    if graph.reaches(&decl.name, markers) {
        return Ok(());
    }
    Err(SchemaError::MissingCapability {
        declaration: decl.name.clone(),
        markers: markers.join(", "),
        depth: MAX_SUPERTYPE_DEPTH,
    })
}

fn check_identity(decl: &TypeDeclaration, descriptor: &DescriptorConfig) -> Result<(), SchemaError> {
    let empty = |attribute| SchemaError::EmptyIdentity {
        declaration: decl.name.clone(),
        attribute,
    };
    match descriptor.kind {
        DescriptorKind::Facade => return Ok(()),
        DescriptorKind::Entity | DescriptorKind::LocalEntity => {
            if descriptor.resource_name.trim().is_empty() {
                return Err(empty("resource_name"));
            }
            if descriptor.table_name.trim().is_empty() {
                return Err(empty("table_name"));
            }
            if descriptor.fields.is_empty() && descriptor.record.as_deref().map_or(true, |r| r.trim().is_empty()) {
                return Err(SchemaError::MissingRecordType {
                    declaration: decl.name.clone(),
                });
            }
        }
        DescriptorKind::WebRequest | DescriptorKind::RestRequest => {
            if descriptor.resource_name.trim().is_empty() {
                return Err(empty("resource_name"));
            }
        }
    }
    let mut params = HashSet::new();
    for p in &descriptor.parameters {
        if p.trim().is_empty() {
            return Err(empty("parameters"));
        }
        if !params.insert(p.as_str()) {
            return Err(SchemaError::DuplicateParameter {
                declaration: decl.name.clone(),
                parameter: p.clone(),
            });
        }
    }
    for g in &descriptor.groups {
        if g.member.trim().is_empty() {
            return Err(empty("groups.member"));
        }
        if g.name.trim().is_empty() {
            return Err(empty("groups.name"));
        }
        if g.fields.is_empty() {
            return Err(SchemaError::EmptyFieldGroup {
                declaration: decl.name.clone(),
                group: g.name.clone(),
            });
        }
    }
    Ok(())
}

fn check_fields(decl: &TypeDeclaration, descriptor: &DescriptorConfig) -> Result<(), SchemaError> {
    if descriptor.kind.is_request() && !descriptor.fields.is_empty() {
        return Err(SchemaError::InvalidFieldSpec {
            declaration: decl.name.clone(),
            spec: "fields".into(),
            reason: "request descriptors declare fields inside groups".into(),
        });
    }
    parse_group(&decl.name, "fields", &descriptor.fields)?;
    for g in &descriptor.groups {
        parse_group(&decl.name, &g.name, &g.fields)?;
    }
    Ok(())
}

/// Parse one field list, rejecting malformed specs and a second primary key.
pub fn parse_group(declaration: &str, group: &str, specs: &[FieldSpec]) -> Result<Vec<FieldDescriptor>, SchemaError> {
    let mut fields: Vec<FieldDescriptor> = Vec::with_capacity(specs.len());
    for (i, spec) in specs.iter().enumerate() {
        let field = FieldDescriptor::parse(spec, i).map_err(|reason| SchemaError::InvalidFieldSpec {
            declaration: declaration.to_string(),
            spec: spec_text(spec),
            reason,
        })?;
        if fields.iter().any(|f| f.raw_name == field.raw_name) {
            return Err(SchemaError::InvalidFieldSpec {
                declaration: declaration.to_string(),
                spec: spec_text(spec),
                reason: format!("field '{}' is declared twice in '{}'", field.raw_name, group),
            });
        }
        if field.is_primary_key {
            if let Some(first) = fields.iter().find(|f| f.is_primary_key) {
                return Err(SchemaError::DuplicatePrimaryKey {
                    declaration: declaration.to_string(),
                    group: group.to_string(),
                    first: first.serialized_name.clone(),
                    second: field.serialized_name,
                });
            }
        }
        fields.push(field);
    }
    Ok(fields)
}

fn spec_text(spec: &FieldSpec) -> String {
    match spec {
        FieldSpec::Short(s) => s.clone(),
        FieldSpec::Full { name, .. } => name.clone(),
    }
}

fn check_queries(decl: &TypeDeclaration, descriptor: &DescriptorConfig) -> Result<(), SchemaError> {
    for q in &decl.queries {
        let mut declared = HashSet::new();
        for p in &q.params {
            if FieldType::parse(&p.type_name).is_none() {
                return Err(SchemaError::UnsupportedType {
                    declaration: format!("{}.{}", decl.name, q.name),
                    type_name: p.type_name.clone(),
                });
            }
            if !declared.insert(p.name.as_str()) {
                return Err(SchemaError::DuplicateParameter {
                    declaration: format!("{}.{}", decl.name, q.name),
                    parameter: p.name.clone(),
                });
            }
        }
        let placeholder = table_placeholder(decl, descriptor);
        let template = QueryTemplate::parse(&q.query, &placeholder, "").map_err(|e| SchemaError::InvalidQuery {
            declaration: decl.name.clone(),
            method: q.name.clone(),
            reason: e.to_string(),
        })?;
        let unknown = template
            .param_names()
            .find(|p| !declared.contains(*p))
            .map(str::to_string);
        if let Some(parameter) = unknown {
            return Err(SchemaError::UnknownQueryParameter {
                declaration: decl.name.clone(),
                method: q.name.clone(),
                parameter,
            });
        }
    }
    Ok(())
}

/// Simple name of the record type, used as the `:<Record>` table placeholder.
pub fn table_placeholder(decl: &TypeDeclaration, descriptor: &DescriptorConfig) -> String {
    match descriptor.record.as_deref() {
        Some(r) if descriptor.fields.is_empty() => r.rsplit("::").next().unwrap_or(r).to_string(),
        _ => crate::case::suffixed(&decl.name, crate::case::MODEL_SUFFIX),
    }
}

fn check_facade(graph: &TypeGraph<'_>, decl: &TypeDeclaration) -> Result<(), SchemaError> {
    let mut names = HashSet::new();
    let levels = std::iter::once(decl).chain(graph.interface_ancestors(&decl.name, ALL_MARKERS));
    for level in levels {
        for m in &level.accessors {
            if !names.insert(m.name.as_str()) {
                return Err(SchemaError::DuplicateDeclaration(format!("{}.{}", decl.name, m.name)));
            }
            let target = graph.get(&m.returns).and_then(|t| t.descriptor.as_ref());
            let is_accessor = target.is_some_and(|d| d.kind != DescriptorKind::Facade);
            if !is_accessor {
                return Err(SchemaError::UnknownAccessor {
                    declaration: level.name.clone(),
                    method: m.name.clone(),
                    returns: m.returns.clone(),
                });
            }
        }
    }
    Ok(())
}
