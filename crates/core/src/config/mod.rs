//! Tool configuration loading and schema definitions
//!
//! Optional `.circle-build.toml` overrides for the settings resolver.

mod loader;
mod schema;

pub use loader::ToolConfig;
pub use schema::*;
