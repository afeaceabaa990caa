//! Load declarations from JSON and resolve them into descriptors.

use crate::config::graph::TypeGraph;
use crate::config::resolved::{
    AccessorMethod, FacadeDescriptor, FacadeLevel, FieldGroup, QueryMethod, QueryParam, QueryTemplate, ResolvedSchema,
    ResourceDescriptor,
};
use crate::config::types::{DeclarationSet, DescriptorConfig, DescriptorKind, TypeDeclaration};
use crate::config::validator::{parse_group, table_placeholder, validate, ALL_MARKERS};
use crate::error::SchemaError;
use crate::record::FieldType;
use std::path::Path;

/// Build the resolved schema (validates first). Resources keep declaration order.
pub fn resolve(set: &DeclarationSet) -> Result<ResolvedSchema, SchemaError> {
    validate(set)?;
    let graph = TypeGraph::new(set);
    let mut schema = ResolvedSchema::default();

    for decl in &set.types {
        let Some(descriptor) = &decl.descriptor else {
            continue;
        };
        if descriptor.kind == DescriptorKind::Facade {
            schema.facades.push(resolve_facade(&graph, decl, descriptor));
        } else {
            let resource = resolve_resource(decl, descriptor)?;
            schema
                .resource_by_type
                .insert(resource.declared_type.clone(), schema.resources.len());
            schema.resources.push(resource);
        }
    }
    tracing::debug!(
        resources = schema.resources.len(),
        facades = schema.facades.len(),
        "declarations resolved"
    );
    Ok(schema)
}

fn resolve_resource(decl: &TypeDeclaration, descriptor: &DescriptorConfig) -> Result<ResourceDescriptor, SchemaError> {
    let fields = parse_group(&decl.name, "fields", &descriptor.fields)?;
    let groups = descriptor
        .groups
        .iter()
        .map(|g| {
            let mut fields = parse_group(&decl.name, &g.name, &g.fields)?;
            for f in &mut fields {
                f.is_list_cardinality = g.is_list;
            }
            Ok(FieldGroup {
                member: g.member.clone(),
                role: g.role,
                name: g.name.clone(),
                fields,
                is_list: g.is_list,
                is_numeric_indexed: g.is_numeric,
            })
        })
        .collect::<Result<Vec<_>, SchemaError>>()?;

    let mut resource = ResourceDescriptor {
        declared_type: decl.name.clone(),
        kind: descriptor.kind,
        resource_name: descriptor.resource_name.trim().to_string(),
        table_name: descriptor.table_name.trim().to_string(),
        is_delta: descriptor.is_delta,
        is_local: descriptor.kind == DescriptorKind::LocalEntity,
        is_request: descriptor.kind.is_request(),
        create_table_on_init: descriptor.create_table_on_init,
        parameter_names: descriptor.parameters.clone(),
        fields,
        groups,
        queries: Vec::new(),
        external_record: descriptor.record.clone(),
    };

    if !resource.is_request {
        let placeholder = table_placeholder(decl, descriptor);
        let table = resource.storage_table();
        resource.queries = decl
            .queries
            .iter()
            .map(|q| {
                let template = QueryTemplate::parse(&q.query, &placeholder, &table).map_err(|e| SchemaError::InvalidQuery {
                    declaration: decl.name.clone(),
                    method: q.name.clone(),
                    reason: e.to_string(),
                })?;
                let params = q
                    .params
                    .iter()
                    .map(|p| QueryParam {
                        name: p.name.clone(),
                        field_type: FieldType::parse(&p.type_name).unwrap_or(FieldType::String),
                    })
                    .collect();
                Ok(QueryMethod {
                    name: q.name.clone(),
                    params,
                    template,
                    returns_list: q.returns_list,
                })
            })
            .collect::<Result<Vec<_>, SchemaError>>()?;
    }
    Ok(resource)
}

fn resolve_facade(graph: &TypeGraph<'_>, decl: &TypeDeclaration, descriptor: &DescriptorConfig) -> FacadeDescriptor {
    let level = |t: &TypeDeclaration| FacadeLevel {
        declared_type: t.name.clone(),
        accessors: t
            .accessors
            .iter()
            .map(|m| AccessorMethod {
                name: m.name.clone(),
                returns: m.returns.clone(),
            })
            .collect(),
    };
    let levels = std::iter::once(decl)
        .chain(graph.interface_ancestors(&decl.name, ALL_MARKERS))
        .map(level)
        .collect();
    FacadeDescriptor {
        declared_type: decl.name.clone(),
        as_singleton: descriptor.as_singleton,
        as_dao_provider: descriptor.as_dao_provider,
        levels,
    }
}

pub fn load_from_str(json: &str) -> Result<DeclarationSet, SchemaError> {
    serde_json::from_str(json).map_err(|e| SchemaError::Load(e.to_string()))
}

/// Load one declarations file, or every `*.json` file of a directory in name order.
pub fn load_from_path(path: &Path) -> Result<DeclarationSet, SchemaError> {
    let read = |p: &Path| {
        std::fs::read_to_string(p).map_err(|e| SchemaError::Load(format!("{}: {}", p.display(), e)))
    };
    if !path.is_dir() {
        return load_from_str(&read(path)?);
    }
    let mut files: Vec<_> = std::fs::read_dir(path)
        .map_err(|e| SchemaError::Load(format!("{}: {}", path.display(), e)))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    let mut set = DeclarationSet::default();
    for file in files {
        let part = load_from_str(&read(&file)?).map_err(|e| match e {
            SchemaError::Load(m) => SchemaError::Load(format!("{}: {}", file.display(), m)),
            other => other,
        })?;
        set.extend(part);
    }
    Ok(set)
}
