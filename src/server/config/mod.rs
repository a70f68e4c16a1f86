//! Server configuration.

mod loader;
mod types;
mod validation;

pub use loader::{ConfigLoader, load_config};
pub use types::{ExportConfig, ResourcesConfig, ServerBindConfig, ServerConfig};
pub use validation::{ConfigError, validate_config};
