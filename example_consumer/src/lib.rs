//! Accessors and facades generated from `declarations.json` by the build script.

pub mod generated {
    include!(concat!(env!("OUT_DIR"), "/generated.rs"));
}
