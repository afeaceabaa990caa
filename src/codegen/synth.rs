//! Descriptor to token trees: one unit per accessor or facade.

use crate::case::{self, rust_ident, strip_interface_prefix, to_pascal_case, to_snake_case};
use crate::codegen::ir::{ident, type_tokens, Unit};
use crate::config::resolved::{
    AccessorMethod, FacadeDescriptor, FieldDescriptor, FieldGroup, QueryMethod, ResolvedSchema, ResourceDescriptor,
    TemplateSegment,
};
use crate::config::types::GroupRole;
use crate::error::SchemaError;
use crate::record::FieldType;
use proc_macro2::{Ident, Literal, TokenStream};
use quote::quote;

pub(crate) struct Synth<'a> {
    schema: &'a ResolvedSchema,
    runtime: &'a str,
}

impl<'a> Synth<'a> {
    pub fn new(schema: &'a ResolvedSchema, runtime: &'a str) -> Self {
        Synth { schema, runtime }
    }

    pub fn units(&self) -> Result<Vec<Unit>, SchemaError> {
        let mut units = Vec::with_capacity(self.schema.resources.len() + self.schema.facades.len());
        for resource in &self.schema.resources {
            if resource.is_request {
                units.push(self.request_unit(resource)?);
            } else {
                units.push(self.entity_unit(resource)?);
            }
        }
        for facade in &self.schema.facades {
            units.push(self.facade_unit(facade)?);
        }
        Ok(units)
    }

    fn rt(&self, path: &str) -> String {
        format!("{}::{}", self.runtime, path)
    }

    fn import_record_support(&self, unit: &mut Unit) {
        unit.import("serde::Deserialize");
        unit.import("serde::Serialize");
        for name in ["FieldDef", "FieldType", "Record"] {
            unit.import(self.rt(&format!("record::{}", name)));
        }
    }

    // Entities

    fn entity_unit(&self, r: &ResourceDescriptor) -> Result<Unit, SchemaError> {
        let decl = r.declared_type.as_str();
        let impl_name = ident(decl, &r.impl_name())?;
        let record = type_tokens(decl, &r.record_name())?;
        let status = ident(decl, &r.status_name())?;
        let table = r.storage_table();
        let (capability, role) = if r.is_local {
            ("LocalAccessor", "Local")
        } else {
            ("RemoteAccessor", "Remote")
        };

        let mut unit = Unit::from_source(case::module_name(&r.impl_name()), decl);
        for name in ["Accessor", "EntityAccessor", capability] {
            unit.import(self.rt(&format!("accessor::{}", name)));
        }
        unit.import(self.rt("record::FieldsSlot"));
        unit.import(self.rt("state::Provider"));
        unit.import(self.rt("status::ExecutionStatus"));

        if r.owns_fields() {
            self.import_record_support(&mut unit);
            let record_name = ident(decl, &r.record_name())?;
            let doc = format!(" Row of `{}`.", table);
            unit.items.push(record_struct(decl, &record_name, &doc, &r.fields)?);
            unit.items.push(record_impl(&record_name, &r.fields));
        }
        unit.items.push(quote! { pub type #status = ExecutionStatus<#record>; });

        let doc = format!(" {} accessor for `{}`.", role, table);
        unit.items.push(quote! {
            #[doc = #doc]
            pub struct #impl_name {
                provider: Provider,
                resource_name: String,
                table_name: String,
                is_delta: bool,
                fields_data: FieldsSlot,
            }
        });

        let resource_name = &r.resource_name;
        let table_name = &r.table_name;
        let is_delta = r.is_delta;
        let constructor = self.entity_constructor(r, &mut unit);
        let mut queries = Vec::with_capacity(r.queries.len());
        for q in &r.queries {
            queries.push(self.query_method(decl, q, &record, &mut unit)?);
        }
        let remote = if r.is_local {
            TokenStream::new()
        } else {
            self.remote_methods(r, &status, &mut unit)?
        };
        unit.items.push(quote! {
            impl #impl_name {
                pub const RESOURCE_NAME: &'static str = #resource_name;
                pub const TABLE_NAME: &'static str = #table_name;
                pub const IS_DELTA: bool = #is_delta;

                #constructor

                /// Accessor over a differently named resource or table.
                pub fn with_names(
                    provider: Provider,
                    resource_name: impl Into<String>,
                    table_name: impl Into<String>,
                    is_delta: bool,
                ) -> Self {
                    #impl_name {
                        provider,
                        resource_name: resource_name.into(),
                        table_name: table_name.into(),
                        is_delta,
                        fields_data: FieldsSlot::default(),
                    }
                }

                #(#queries)*
                #remote
            }
        });

        unit.items.push(quote! {
            impl Accessor for #impl_name {
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
        });
        unit.items.push(quote! {
            impl EntityAccessor for #impl_name {
                type Record = #record;

                fn fields_slot(&self) -> &FieldsSlot {
                    &self.fields_data
                }
            }
        });
        let capability = ident(decl, capability)?;
        unit.items.push(quote! { impl #capability for #impl_name {} });
        Ok(unit)
    }

    fn entity_constructor(&self, r: &ResourceDescriptor, unit: &mut Unit) -> TokenStream {
        let build = quote! { Self::with_names(provider, Self::RESOURCE_NAME, Self::TABLE_NAME, Self::IS_DELTA) };
        if !r.create_table_on_init {
            return quote! {
                pub fn new(provider: Provider) -> Self {
                    #build
                }
            };
        }
        unit.import(self.rt("service::DaoService"));
        let doc = format!(
            " Creates `{}` if it does not exist yet. A failure is logged; the accessor is returned either way.",
            r.storage_table()
        );
        quote! {
            #[doc = #doc]
            pub async fn new(provider: Provider) -> Self {
                let dao = #build;
                let status = DaoService::create_table(&dao).await;
                if !status.ok {
                    tracing::warn!(
                        table = %dao.storage_table(),
                        error_code = ?status.error_code,
                        message = ?status.message,
                        "create table on init failed"
                    );
                }
                dao
            }
        }
    }

    /// Statement text is assembled at call time from literal pieces and rendered arguments:
    /// text parameters quoted, numeric ones inlined.
    fn query_method(
        &self,
        decl: &str,
        q: &QueryMethod,
        record: &TokenStream,
        unit: &mut Unit,
    ) -> Result<TokenStream, SchemaError> {
        unit.import(self.rt("service::DaoService"));
        let name = ident(decl, &rust_ident(&q.name))?;
        let mut params = Vec::with_capacity(q.params.len());
        for p in &q.params {
            let param = ident(decl, &rust_ident(&p.name))?;
            let ty = param_type(p.field_type);
            params.push(quote! { #param: #ty });
        }

        let mut plain = String::new();
        let mut pieces = Vec::with_capacity(q.template.segments.len());
        let mut has_args = false;
        for segment in &q.template.segments {
            match segment {
                TemplateSegment::Text(text) => {
                    plain.push_str(text);
                    pieces.push(quote! { sql.push_str(#text); });
                }
                TemplateSegment::Param(param) => {
                    has_args = true;
                    let field_type = q
                        .params
                        .iter()
                        .find(|p| &p.name == param)
                        .map_or(FieldType::String, |p| p.field_type);
                    let arg = ident(decl, &rust_ident(param))?;
                    let render = if field_type.is_textual() { "quote_text" } else { "render_number" };
                    unit.import(self.rt(&format!("sql::{}", render)));
                    let render = ident(decl, render)?;
                    pieces.push(quote! { sql.push_str(&#render(#arg)); });
                }
            }
        }

        let (call, ret) = if q.returns_list {
            (quote!(query_list), quote! { Vec<#record> })
        } else {
            (quote!(query_one), quote! { Option<#record> })
        };
        if !has_args {
            return Ok(quote! {
                pub async fn #name(&self, #(#params),*) -> #ret {
                    DaoService::#call(self, #plain).await
                }
            });
        }
        Ok(quote! {
            pub async fn #name(&self, #(#params),*) -> #ret {
                let mut sql = String::new();
                #(#pieces)*
                DaoService::#call(self, &sql).await
            }
        })
    }

    fn remote_methods(&self, r: &ResourceDescriptor, status: &Ident, unit: &mut Unit) -> Result<TokenStream, SchemaError> {
        unit.import(self.rt("service::DaoService"));
        unit.import(self.rt("transport::ParamMap"));
        let doc = format!(" Fetch `{}` into the local cache table.", r.resource_name);
        let request = quote! {
            #[doc = #doc]
            pub async fn request(&self, params: &ParamMap) -> #status {
                DaoService::request(self, params).await
            }
        };
        if r.parameter_names.is_empty() {
            return Ok(request);
        }
        let builder = params_map_fn(&r.declared_type, &r.parameter_names)?;
        let idents = param_idents(&r.declared_type, &r.parameter_names)?;
        Ok(quote! {
            #request

            #builder

            pub async fn request_with_params(&self, #(#idents: impl Into<serde_json::Value>),*) -> #status {
                let params = Self::create_params_map(#(#idents),*);
                self.request(&params).await
            }
        })
    }

    // Requests

    fn request_unit(&self, r: &ResourceDescriptor) -> Result<Unit, SchemaError> {
        let decl = r.declared_type.as_str();
        let impl_name = ident(decl, &r.impl_name())?;
        let base = strip_interface_prefix(decl).to_string();
        let result = ident(decl, &case::suffixed(decl, case::RESULT_SUFFIX))?;
        let status = ident(decl, &case::suffixed(decl, case::RESPOND_STATUS_SUFFIX))?;

        let mut unit = Unit::from_source(case::module_name(&r.impl_name()), decl);
        unit.import("serde::Deserialize");
        unit.import("serde::Serialize");
        unit.import(self.rt("accessor::RequestAccessor"));
        unit.import(self.rt("service::RequestService"));
        unit.import(self.rt("state::Provider"));
        unit.import(self.rt("status::ExecutionStatus"));
        unit.import(self.rt("transport::Headers"));
        unit.import(self.rt("transport::ParamMap"));

        if !r.groups.is_empty() {
            self.import_record_support(&mut unit);
        }
        for group in &r.groups {
            self.group_items(decl, &base, group, &mut unit)?;
        }

        let derives = record_derives();
        let mut result_fields = Vec::new();
        for g in r.groups.iter().filter(|g| g.role == GroupRole::Table) {
            let wire = &g.name;
            let member = ident(decl, &rust_ident(&g.member))?;
            let ty = group_value_type(decl, &base, g)?;
            result_fields.push(quote! {
                #[serde(rename = #wire, default)]
                pub #member: Option<#ty>
            });
        }
        let doc = format!(" Decoded response of `{}`.", r.resource_name);
        unit.items.push(quote! {
            #[doc = #doc]
            #derives
            pub struct #result {
                #(#result_fields),*
            }
        });

        let params_struct = ident(decl, &case::suffixed(decl, case::PARAMS_SUFFIX))?;
        let params_fields = params_fields(decl, &base, r)?;
        let has_params_struct = !params_fields.is_empty();
        if has_params_struct {
            let fields = params_fields.iter().map(|(wire, member, ty)| {
                quote! {
                    #[serde(rename = #wire, default, skip_serializing_if = "Option::is_none")]
                    pub #member: Option<#ty>
                }
            });
            let inserts = params_fields.iter().map(|(wire, member, _)| {
                quote! {
                    if let Some(value) = &self.#member {
                        match serde_json::to_value(value) {
                            Ok(value) => params.insert(#wire, value),
                            Err(error) => tracing::warn!(parameter = #wire, %error, "parameter not encodable"),
                        }
                    }
                }
            });
            let doc = format!(" Parameters of `{}`.", r.resource_name);
            unit.items.push(quote! {
                #[doc = #doc]
                #derives
                pub struct #params_struct {
                    #(#fields),*
                }
            });
            unit.items.push(quote! {
                impl #params_struct {
                    /// Present values as request parameters, in declaration order. A value that
                    /// does not encode is logged and left out.
                    pub fn to_param_map(&self) -> ParamMap {
                        let mut params = ParamMap::new();
                        #(#inserts)*
                        params
                    }
                }
            });
        }

        unit.items.push(quote! { pub type #status = ExecutionStatus<#result>; });

        let doc = format!(" Request accessor for `{}`.", r.resource_name);
        unit.items.push(quote! {
            #[doc = #doc]
            pub struct #impl_name {
                provider: Provider,
                resource_name: String,
                default_headers: Option<Headers>,
            }
        });

        let resource_name = &r.resource_name;
        let builder = params_map_fn(decl, &r.parameter_names)?;
        let request_params = if has_params_struct {
            quote! {
                pub async fn request_params(&self, params: &#params_struct) -> #status {
                    self.request(&params.to_param_map()).await
                }
            }
        } else {
            TokenStream::new()
        };
        unit.items.push(quote! {
            impl #impl_name {
                pub const RESOURCE_NAME: &'static str = #resource_name;

                pub fn new(provider: Provider) -> Self {
                    #impl_name {
                        provider,
                        resource_name: Self::RESOURCE_NAME.to_string(),
                        default_headers: None,
                    }
                }

                /// Headers sent with every request, in place of the facade's defaults.
                pub fn with_headers(mut self, headers: Headers) -> Self {
                    self.default_headers = Some(headers);
                    self
                }

                #builder

                pub async fn request(&self, params: &ParamMap) -> #status {
                    RequestService::send(self, params).await
                }

                #request_params
            }
        });

        unit.items.push(quote! {
            impl RequestAccessor for #impl_name {
                type Response = #result;

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
        });
        Ok(unit)
    }

    fn group_items(&self, decl: &str, base: &str, group: &FieldGroup, unit: &mut Unit) -> Result<(), SchemaError> {
        let name = ident(decl, &group_type_name(base, group))?;
        let what = match group.role {
            GroupRole::Table => "rows",
            GroupRole::Param => "parameter",
        };
        let doc = format!(" `{}` {}.", group.name, what);
        unit.items.push(record_struct(decl, &name, &doc, &group.fields)?);
        unit.items.push(record_impl(&name, &group.fields));
        if !group.is_numeric_indexed {
            return Ok(());
        }
        unit.import(self.rt("record::NumberedFields"));
        let count = Literal::usize_unsuffixed(group.fields.len());
        unit.items.push(quote! {
            impl NumberedFields for #name {
                const FIELD_COUNT: usize = #count;
            }
        });
        if group.role == GroupRole::Param {
            unit.import(self.rt("record::CustomParameter"));
            let wire = &group.name;
            unit.items.push(quote! {
                impl CustomParameter for #name {
                    fn parameter_name(&self) -> &'static str {
                        #wire
                    }
                }
            });
        }
        Ok(())
    }

    // Facades

    fn facade_unit(&self, f: &FacadeDescriptor) -> Result<Unit, SchemaError> {
        let decl = f.declared_type.as_str();
        let impl_name = ident(decl, &f.impl_name())?;
        let memoized = !f.as_dao_provider;
        let mut unit = Unit::from_source(case::module_name(&f.impl_name()), decl);
        unit.import("std::sync::Arc");
        unit.import(self.rt("facade::DatabaseFacade"));
        unit.import(self.rt("state::Provider"));

        let mut slots = Vec::with_capacity(f.levels.len());
        for level in &f.levels {
            slots.push(ident(decl, &slots_field(&level.declared_type))?);
        }
        let slot_fields = if memoized {
            unit.import(self.rt("facade::ProviderRegistry"));
            quote! { #(#slots: Arc<ProviderRegistry>,)* }
        } else {
            TokenStream::new()
        };
        let doc = format!(" Database facade `{}`.", decl);
        let lifecycle = if memoized {
            " Accessors are built on first use and kept until `clear_providers`."
        } else {
            " Every accessor call builds a fresh instance."
        };
        unit.items.push(quote! {
            #[doc = #doc]
            #[doc = ""]
            #[doc = #lifecycle]
            pub struct #impl_name {
                provider: Provider,
                #slot_fields
            }
        });

        let instance_fn = if f.as_singleton {
            unit.import("std::sync::OnceLock");
            let instance = ident(decl, &instance_static(&f.impl_name()))?;
            unit.items.push(quote! {
                static #instance: OnceLock<Arc<#impl_name>> = OnceLock::new();
            });
            quote! {
                /// Process-wide facade. The provider of the first call is kept.
                pub fn instance(provider: Provider) -> Arc<Self> {
                    #instance.get_or_init(|| Arc::new(Self::new(provider))).clone()
                }
            }
        } else {
            TokenStream::new()
        };

        // Parents are built before the levels that point at them.
        let mut registries = Vec::new();
        if memoized {
            let mut parent: Option<&Ident> = None;
            for (level, slot) in f.levels.iter().zip(&slots).rev() {
                let level_name = &level.declared_type;
                registries.push(match parent {
                    None => quote! { let #slot = ProviderRegistry::root(#level_name); },
                    Some(p) => quote! { let #slot = ProviderRegistry::with_parent(#level_name, #p.clone()); },
                });
                parent = Some(slot);
            }
        }
        let slot_inits = if memoized {
            quote! { #(#slots,)* }
        } else {
            TokenStream::new()
        };

        let mut wrappers = Vec::new();
        for (level, slot) in f.levels.iter().zip(&slots) {
            for method in &level.accessors {
                wrappers.push(self.wrapper(&level.declared_type, method, memoized.then_some(slot), &mut unit)?);
            }
        }
        unit.items.push(quote! {
            impl #impl_name {
                pub fn new(provider: Provider) -> Self {
                    #(#registries)*
                    #impl_name {
                        provider,
                        #slot_inits
                    }
                }

                #instance_fn

                #(#wrappers)*
            }
        });

        let clear = match (memoized, slots.first()) {
            (true, Some(most_derived)) => quote! {
                fn clear_providers(&self) {
                    self.#most_derived.reset();
                }
            },
            _ => TokenStream::new(),
        };
        unit.items.push(quote! {
            impl DatabaseFacade for #impl_name {
                fn provider(&self) -> &Provider {
                    &self.provider
                }

                #clear
            }
        });
        Ok(unit)
    }

    fn wrapper(
        &self,
        level: &str,
        method: &AccessorMethod,
        slot: Option<&Ident>,
        unit: &mut Unit,
    ) -> Result<TokenStream, SchemaError> {
        let target = self
            .schema
            .resource(&method.returns)
            .ok_or_else(|| SchemaError::UnknownAccessor {
                declaration: level.to_string(),
                method: method.name.clone(),
                returns: method.returns.clone(),
            })?;
        let target_impl = ident(level, &target.impl_name())?;
        unit.import(format!("super::{}", target_impl));
        let name = ident(level, &rust_ident(&method.name))?;
        let awaits = !target.is_request && target.create_table_on_init;
        let build = |provider: TokenStream| {
            if awaits {
                quote! { #target_impl::new(#provider).await }
            } else {
                quote! { #target_impl::new(#provider) }
            }
        };
        Ok(match slot {
            Some(slot) => {
                let key = &method.name;
                let init = build(quote!(provider));
                quote! {
                    pub async fn #name(&self) -> Arc<#target_impl> {
                        let provider = self.provider.clone();
                        self.#slot.get_or_init(#key, || async move { #init }).await
                    }
                }
            }
            None => {
                let init = build(quote!(self.provider.clone()));
                quote! {
                    pub async fn #name(&self) -> Arc<#target_impl> {
                        Arc::new(#init)
                    }
                }
            }
        })
    }
}

fn record_derives() -> TokenStream {
    quote! { #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)] }
}

/// Owned type of a record field.
fn value_type(t: FieldType) -> TokenStream {
    match t {
        FieldType::String => quote!(String),
        FieldType::Int => quote!(i32),
        FieldType::Long => quote!(i64),
        FieldType::Double => quote!(f64),
        FieldType::Bool => quote!(bool),
    }
}

/// Borrowed type of a query method parameter.
fn param_type(t: FieldType) -> TokenStream {
    match t {
        FieldType::String => quote!(&str),
        other => value_type(other),
    }
}

fn variant(t: FieldType) -> TokenStream {
    match t {
        FieldType::String => quote!(FieldType::String),
        FieldType::Int => quote!(FieldType::Int),
        FieldType::Long => quote!(FieldType::Long),
        FieldType::Double => quote!(FieldType::Double),
        FieldType::Bool => quote!(FieldType::Bool),
    }
}

fn record_struct(decl: &str, name: &Ident, doc: &str, fields: &[FieldDescriptor]) -> Result<TokenStream, SchemaError> {
    let mut members = Vec::with_capacity(fields.len());
    for f in fields {
        let wire = &f.serialized_name;
        let member = ident(decl, &f.raw_name)?;
        let ty = value_type(f.inferred_type);
        members.push(quote! {
            #[serde(rename = #wire, default)]
            pub #member: Option<#ty>
        });
    }
    let derives = record_derives();
    Ok(quote! {
        #[doc = #doc]
        #derives
        pub struct #name {
            #(#members),*
        }
    })
}

fn record_impl(name: &Ident, fields: &[FieldDescriptor]) -> TokenStream {
    let defs = fields.iter().map(|f| {
        let wire = &f.serialized_name;
        let ty = variant(f.inferred_type);
        if f.is_primary_key {
            quote! { FieldDef::primary(#wire, #ty) }
        } else {
            quote! { FieldDef::new(#wire, #ty) }
        }
    });
    quote! {
        impl Record for #name {
            const FIELDS: &'static [FieldDef] = &[#(#defs),*];
        }
    }
}

fn group_type_name(base: &str, group: &FieldGroup) -> String {
    let suffix = match group.role {
        GroupRole::Table => case::MODEL_SUFFIX,
        GroupRole::Param => case::PARAMS_SUFFIX,
    };
    format!("{}{}{}", base, to_pascal_case(&group.member), suffix)
}

fn group_value_type(decl: &str, base: &str, group: &FieldGroup) -> Result<TokenStream, SchemaError> {
    let name = ident(decl, &group_type_name(base, group))?;
    Ok(if group.is_list {
        quote! { Vec<#name> }
    } else {
        quote! { #name }
    })
}

/// `(wire name, field, value type)` for every declared parameter, typed by the param group
/// of the same name, then any param group not listed among the parameters.
fn params_fields(decl: &str, base: &str, r: &ResourceDescriptor) -> Result<Vec<(String, Ident, TokenStream)>, SchemaError> {
    let param_groups: Vec<&FieldGroup> = r.groups.iter().filter(|g| g.role == GroupRole::Param).collect();
    let mut out = Vec::new();
    for p in &r.parameter_names {
        let ty = match param_groups.iter().find(|g| &g.name == p) {
            Some(g) => group_value_type(decl, base, g)?,
            None => quote!(String),
        };
        out.push((p.clone(), ident(decl, &rust_ident(p))?, ty));
    }
    for g in param_groups {
        if !r.parameter_names.contains(&g.name) {
            out.push((g.name.clone(), ident(decl, &rust_ident(&g.member))?, group_value_type(decl, base, g)?));
        }
    }
    Ok(out)
}

fn param_idents(decl: &str, names: &[String]) -> Result<Vec<Ident>, SchemaError> {
    names.iter().map(|n| ident(decl, &rust_ident(n))).collect()
}

/// Positional parameter-map builder taking exactly one argument per declared name.
fn params_map_fn(decl: &str, names: &[String]) -> Result<TokenStream, SchemaError> {
    if names.is_empty() {
        return Ok(quote! {
            /// Takes no parameters.
            pub fn create_params_map() -> ParamMap {
                ParamMap::new()
            }
        });
    }
    let expected: Vec<String> = names.iter().map(|n| format!("`{}`", n)).collect();
    let doc = format!(" Expected parameters, in order: {}.", expected.join(", "));
    let idents = param_idents(decl, names)?;
    Ok(quote! {
        #[doc = #doc]
        pub fn create_params_map(#(#idents: impl Into<serde_json::Value>),*) -> ParamMap {
            ParamMap::new()
                #(.with(#names, #idents))*
        }
    })
}

fn slots_field(declared: &str) -> String {
    format!("{}_slots", to_snake_case(strip_interface_prefix(declared)))
}

fn instance_static(impl_name: &str) -> String {
    format!("{}_INSTANCE", to_snake_case(impl_name).to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_takes_one_argument_per_name() {
        let names = ["IV_WERKS".to_string(), "IV_LGORT".to_string()];
        let src = params_map_fn("IStockRequest", &names).unwrap().to_string();
        let signature = quote! {
            pub fn create_params_map(iv_werks: impl Into<serde_json::Value>, iv_lgort: impl Into<serde_json::Value>) -> ParamMap
        };
        assert!(src.contains(&signature.to_string()), "{src}");
        assert!(src.contains(&quote! { ParamMap::new().with("IV_WERKS", iv_werks).with("IV_LGORT", iv_lgort) }.to_string()));
        assert!(src.contains("Expected parameters, in order: `IV_WERKS`, `IV_LGORT`."));

        let empty = params_map_fn("IStockRequest", &[]).unwrap().to_string();
        assert!(empty.contains(&quote! { pub fn create_params_map() -> ParamMap }.to_string()));
    }

    #[test]
    fn names() {
        assert_eq!(slots_field("IBaseDatabase"), "base_database_slots");
        assert_eq!(instance_static("AppDatabaseImpl"), "APP_DATABASE_IMPL_INSTANCE");
    }

    #[test]
    fn field_types_map_to_rust_types() {
        assert_eq!(param_type(FieldType::String).to_string(), quote!(&str).to_string());
        assert_eq!(param_type(FieldType::Int).to_string(), "i32");
        assert_eq!(value_type(FieldType::Double).to_string(), "f64");
    }
}
