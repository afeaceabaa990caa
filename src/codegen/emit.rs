//! Renders [`Unit`]s as Rust source: header comments, grouped `use` lines, then one
//! item per line.

use crate::codegen::ir::{ident, path_tokens, Unit};
use crate::error::SchemaError;
use proc_macro2::TokenStream;
use quote::quote;
use std::collections::{BTreeMap, BTreeSet};

fn header_lines(header: &[String]) -> String {
    header.iter().map(|h| format!("// {}\n", h)).collect()
}

fn push_items(out: &mut String, items: &[TokenStream]) {
    for item in items {
        out.push('\n');
        out.push_str(&item.to_string());
        out.push('\n');
    }
}

/// `a::b::C` and `a::b::D` share one `use a::b::{C, D};`.
fn use_items(source: &str, uses: &BTreeSet<String>) -> Result<Vec<TokenStream>, SchemaError> {
    let mut groups: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for path in uses {
        let (prefix, name) = path.rsplit_once("::").unwrap_or(("", path.as_str()));
        groups.entry(prefix).or_default().push(name);
    }
    let mut items = Vec::with_capacity(groups.len());
    for (prefix, names) in groups {
        let names = names
            .iter()
            .map(|n| ident(source, n))
            .collect::<Result<Vec<_>, _>>()?;
        if prefix.is_empty() {
            items.extend(names.iter().map(|n| quote! { use #n; }));
            continue;
        }
        let prefix = path_tokens(source, prefix)?;
        items.push(match names.as_slice() {
            [one] => quote! { use #prefix::#one; },
            _ => quote! { use #prefix::{#(#names),*}; },
        });
    }
    Ok(items)
}

/// A module file, starting with `header` comment lines.
pub fn render_unit(unit: &Unit, header: &[String]) -> Result<String, SchemaError> {
    let mut out = header_lines(header);
    let uses = use_items(&unit.source, &unit.uses)?;
    if !uses.is_empty() {
        out.push('\n');
        for u in &uses {
            out.push_str(&u.to_string());
            out.push('\n');
        }
    }
    push_items(&mut out, &unit.items);
    Ok(out)
}

/// `mod.rs` declaring and re-exporting every generated module.
pub fn render_mod_file(modules: &[String], header: &[String]) -> Result<String, SchemaError> {
    let modules = modules
        .iter()
        .map(|m| ident(m, m))
        .collect::<Result<Vec<_>, _>>()?;
    let mut out = header_lines(header);
    push_items(&mut out, &[quote! { #(pub mod #modules;)* }, quote! { #(pub use #modules::*;)* }]);
    Ok(out)
}

/// Every unit as an inline module in one file, followed by the re-exports. Suited to
/// `include!` from a build script's output directory.
pub fn render_inline(units: &[Unit], header: &[String]) -> Result<String, SchemaError> {
    let mut out = header_lines(header);
    let mut modules = Vec::with_capacity(units.len());
    for unit in units {
        let module = ident(&unit.source, &unit.module)?;
        let uses = use_items(&unit.source, &unit.uses)?;
        let items = &unit.items;
        push_items(&mut out, &[quote! { pub mod #module { #(#uses)* #(#items)* } }]);
        modules.push(module);
    }
    push_items(&mut out, &[quote! { #(pub use #modules::*;)* }]);
    Ok(out)
}
