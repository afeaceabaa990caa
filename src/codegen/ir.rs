//! Generated units as token trees, plus checked conversion of declared names into Rust
//! syntax. A name that does not parse fails generation instead of producing broken source.

use crate::error::SchemaError;
use proc_macro2::{Ident, TokenStream};
use quote::ToTokens;
use std::collections::BTreeSet;

/// One generated module.
#[derive(Debug, Clone, Default)]
pub struct Unit {
    /// Module name; the file is `<module>.rs`.
    pub module: String,
    /// Declaration the unit was synthesized from.
    pub source: String,
    /// Full paths of imported items, grouped per module when rendered.
    pub uses: BTreeSet<String>,
    pub items: Vec<TokenStream>,
}

impl Unit {
    pub fn from_source(module: impl Into<String>, source: impl Into<String>) -> Self {
        Unit {
            module: module.into(),
            source: source.into(),
            ..Default::default()
        }
    }

    pub fn import(&mut self, path: impl Into<String>) {
        self.uses.insert(path.into());
    }
}

/// `name` as an identifier. Raw identifiers such as `r#type` are accepted.
pub fn ident(declaration: &str, name: &str) -> Result<Ident, SchemaError> {
    syn::parse_str::<Ident>(name).map_err(|_| invalid(declaration, name))
}

/// A type as written in a declaration, e.g. `crate::model::CatalogModel`.
pub fn type_tokens(declaration: &str, text: &str) -> Result<TokenStream, SchemaError> {
    syn::parse_str::<syn::Type>(text)
        .map(ToTokens::into_token_stream)
        .map_err(|_| invalid(declaration, text))
}

pub fn path_tokens(declaration: &str, text: &str) -> Result<TokenStream, SchemaError> {
    syn::parse_str::<syn::Path>(text)
        .map(ToTokens::into_token_stream)
        .map_err(|_| invalid(declaration, text))
}

fn invalid(declaration: &str, name: &str) -> SchemaError {
    SchemaError::InvalidIdentifier {
        declaration: declaration.to_string(),
        name: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_identifiers_parse() {
        assert_eq!(ident("IItemsDao", "r#type").unwrap().to_string(), "r#type");
        assert_eq!(ident("IItemsDao", "ItemsDaoImpl").unwrap().to_string(), "ItemsDaoImpl");
    }

    #[test]
    fn malformed_names_are_schema_errors() {
        let err = ident("IItems.Dao", "Items.DaoImpl").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidIdentifier { ref name, .. } if name == "Items.DaoImpl"));
        assert!(type_tokens("ICatalogDao", "crate::model::CatalogModel").is_ok());
        assert!(type_tokens("ICatalogDao", "crate::model::").is_err());
    }
}
