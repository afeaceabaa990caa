//! Code Synthesis Engine: resolved descriptors in, Rust modules out.
//!
//! Generation is all-or-nothing. [`generate`] builds every file in memory and fails on the
//! first descriptor it cannot synthesize; nothing touches disk until
//! [`GeneratedCode::write_to_dir`].

pub mod emit;
pub mod ir;
mod synth;

use crate::config::{resolve, DeclarationSet, ResolvedSchema};
use crate::error::SchemaError;
use crate::settings::Settings;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const GENERATED_HEADER: &str = "This file was generated by dao-synth. Do not modify!";

#[derive(Clone, Debug)]
pub struct GeneratorOptions {
    /// Path generated code uses to reach this crate.
    pub runtime_crate: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            runtime_crate: "dao_synth".to_string(),
        }
    }
}

impl GeneratorOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        GeneratorOptions {
            runtime_crate: settings.runtime_crate.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct GeneratedFile {
    /// Relative to the output directory.
    pub path: String,
    pub content: String,
}

#[derive(Clone, Debug, Default)]
pub struct GeneratedCode {
    pub files: Vec<GeneratedFile>,
    /// The same modules inlined into one file, for `include!` from a build script.
    pub single_file: String,
}

impl GeneratedCode {
    pub fn file(&self, path: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Write every file under `dir`, creating it if needed.
    pub fn write_to_dir(&self, dir: &Path) -> Result<Vec<PathBuf>, SchemaError> {
        let write_error = |path: &Path, source| SchemaError::Write {
            path: path.display().to_string(),
            source,
        };
        std::fs::create_dir_all(dir).map_err(|e| write_error(dir, e))?;
        let mut written = Vec::with_capacity(self.files.len());
        for file in &self.files {
            let path = dir.join(&file.path);
            std::fs::write(&path, &file.content).map_err(|e| write_error(&path, e))?;
            written.push(path);
        }
        tracing::info!(dir = %dir.display(), files = written.len(), "generated sources written");
        Ok(written)
    }

    /// Write [`GeneratedCode::single_file`] to `path`.
    pub fn write_single_file(&self, path: &Path) -> Result<(), SchemaError> {
        std::fs::write(path, &self.single_file).map_err(|source| SchemaError::Write {
            path: path.display().to_string(),
            source,
        })?;
        tracing::info!(path = %path.display(), "generated source written");
        Ok(())
    }
}

/// One target language.
pub trait Codegen {
    fn generate(&self, schema: &ResolvedSchema) -> Result<GeneratedCode, SchemaError>;
    fn language(&self) -> &str;
}

pub struct RustCodegen {
    options: GeneratorOptions,
}

impl RustCodegen {
    pub fn new(options: GeneratorOptions) -> Self {
        RustCodegen { options }
    }
}

impl Codegen for RustCodegen {
    fn generate(&self, schema: &ResolvedSchema) -> Result<GeneratedCode, SchemaError> {
        let units = synth::Synth::new(schema, &self.options.runtime_crate).units()?;
        let mut modules = Vec::with_capacity(units.len());
        let mut seen = HashSet::new();
        let mut files = Vec::with_capacity(units.len() + 1);
        for unit in &units {
            if !seen.insert(unit.module.as_str()) {
                return Err(SchemaError::DuplicateDeclaration(format!(
                    "{} (module {})",
                    unit.source, unit.module
                )));
            }
            let header = [GENERATED_HEADER.to_string(), format!("Source: {}", unit.source)];
            files.push(GeneratedFile {
                path: format!("{}.rs", unit.module),
                content: emit::render_unit(unit, &header)?,
            });
            modules.push(unit.module.clone());
        }
        files.push(GeneratedFile {
            path: "mod.rs".to_string(),
            content: emit::render_mod_file(&modules, &[GENERATED_HEADER.to_string()])?,
        });
        let single_file = emit::render_inline(&units, &[GENERATED_HEADER.to_string()])?;
        tracing::info!(
            resources = schema.resources.len(),
            facades = schema.facades.len(),
            files = files.len(),
            "code generated"
        );
        Ok(GeneratedCode { files, single_file })
    }

    fn language(&self) -> &str {
        "rust"
    }
}

pub fn generate(schema: &ResolvedSchema, options: &GeneratorOptions) -> Result<GeneratedCode, SchemaError> {
    RustCodegen::new(options.clone()).generate(schema)
}

/// Validate, resolve and generate in one step.
pub fn generate_from_declarations(set: &DeclarationSet, options: &GeneratorOptions) -> Result<GeneratedCode, SchemaError> {
    let schema = resolve(set)?;
    generate(&schema, options)
}
