pub mod config;
pub mod run;
pub mod tracing;
pub mod wiring;

pub use config::{default_config_path, load_config, load_config_or_default, AppConfig};
pub use run::run_app;
pub use wiring::{open_store, Engine, EnginePorts, WiringError};
