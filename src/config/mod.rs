//! Configuration module
//!
//! Plugin options, their defaults, and loading them from YAML.

pub mod loader;
pub mod schema;

pub use loader::{load_config, parse_config};
pub use schema::{ConfigOverrides, DEFAULT_TEMPLATE, PluginConfig};
