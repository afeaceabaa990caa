//! Declarations: raw types, validation, and the resolved descriptor model.

pub mod graph;
pub mod types;
pub mod loader;
pub mod validator;
pub mod resolved;

pub use types::*;
pub use loader::*;
pub use validator::*;
pub use resolved::*;
