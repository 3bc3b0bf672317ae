//! Configuration loading and logging setup for the alembic distributor.

pub mod loader;
pub mod logging;
pub mod schema;

pub use loader::{ConfigError, find_config_file, load_config, load_config_from_dir};
pub use logging::{LogLevel, LogSettings, init_logging};
pub use schema::ConfigData;
