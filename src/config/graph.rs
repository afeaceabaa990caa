//! Directed graph over declared type names, walked depth-first with a depth bound.

use crate::case::strip_interface_prefix;
use crate::config::types::{DeclarationSet, TypeDeclaration};
use std::collections::HashMap;

pub const MAX_SUPERTYPE_DEPTH: usize = 10;

/// Base type every facade implementation derives from; never counts as a capability.
pub const ROOT_BASE_TYPE: &str = "AbstractDatabase";

/// Undeclared names (marker types) are leaves.
pub struct TypeGraph<'a> {
    decls: HashMap<&'a str, &'a TypeDeclaration>,
}

impl<'a> TypeGraph<'a> {
    pub fn new(set: &'a DeclarationSet) -> Self {
        TypeGraph {
            decls: set.types.iter().map(|t| (t.name.as_str(), t)).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&'a TypeDeclaration> {
        self.decls.get(name).copied()
    }

    pub fn supertypes(&self, name: &str) -> &'a [String] {
        self.decls.get(name).map(|d| d.extends.as_slice()).unwrap_or(&[])
    }

    /// True if some super-type of `start`, within `MAX_SUPERTYPE_DEPTH` levels, matches one
    /// of `markers`. `start` itself is not considered.
    pub fn reaches(&self, start: &str, markers: &[&str]) -> bool {
        let mut depths = HashMap::new();
        self.walk(start, markers, 1, &mut depths)
    }

    /// `depths` keeps the shallowest level each name was expanded at; a name reached again
    /// by a shorter path is expanded again so its own parents get the remaining budget.
    fn walk(&self, name: &str, markers: &[&str], depth: usize, depths: &mut HashMap<&'a str, usize>) -> bool {
        if depth > MAX_SUPERTYPE_DEPTH {
            return false;
        }
        for sup in self.supertypes(name) {
            if sup == ROOT_BASE_TYPE {
                continue;
            }
            if is_marker(sup, markers) {
                return true;
            }
            if depths.get(sup.as_str()).is_some_and(|seen| *seen <= depth) {
                continue;
            }
            depths.insert(sup.as_str(), depth);
            if self.walk(sup, markers, depth + 1, depths) {
                return true;
            }
        }
        false
    }

    /// Declared interface ancestors of `start` in depth-first order, nearest first. Marker
    /// types, undeclared names and the root base type are skipped along with their parents.
    pub fn interface_ancestors(&self, start: &str, markers: &[&str]) -> Vec<&'a TypeDeclaration> {
        let mut out = Vec::new();
        let mut depths = HashMap::new();
        self.collect_ancestors(start, markers, 1, &mut depths, &mut out);
        out
    }

    fn collect_ancestors(
        &self,
        name: &str,
        markers: &[&str],
        depth: usize,
        depths: &mut HashMap<&'a str, usize>,
        out: &mut Vec<&'a TypeDeclaration>,
    ) {
        if depth > MAX_SUPERTYPE_DEPTH {
            return;
        }
        for sup in self.supertypes(name) {
            if sup == ROOT_BASE_TYPE || is_marker(sup, markers) {
                continue;
            }
            let first = match depths.get(sup.as_str()) {
                Some(seen) if *seen <= depth => continue,
                Some(_) => false,
                None => true,
            };
            depths.insert(sup.as_str(), depth);
            if let Some(decl) = self.get(sup) {
                if !decl.kind.is_instantiable() {
                    if first {
                        out.push(decl);
                    }
                    self.collect_ancestors(sup, markers, depth + 1, depths, out);
                }
            }
        }
    }
}

fn is_marker(name: &str, markers: &[&str]) -> bool {
    let stripped = strip_interface_prefix(name);
    markers.iter().any(|m| *m == name || *m == stripped)
}
