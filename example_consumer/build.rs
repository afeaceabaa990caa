//! Generates the accessors declared in `declarations.json` into `$OUT_DIR/generated.rs`.

use dao_synth::{generate, load_from_path, resolve, GeneratorOptions};
use std::env;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let declarations = manifest_dir.join("declarations.json");
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed={}", declarations.display());

    let schema = resolve(&load_from_path(&declarations)?)?;
    let code = generate(&schema, &GeneratorOptions::default())?;
    code.write_single_file(&PathBuf::from(env::var("OUT_DIR")?).join("generated.rs"))?;
    Ok(())
}
