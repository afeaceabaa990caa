//! Statement text builders. Identifiers come from generated metadata only; values are inlined literals.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;
